use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A verified caller. The uid is the identity provider's stable subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    uid: String,
}

impl Identity {
    /// Returns `None` for a blank uid.
    pub fn new(uid: impl Into<String>) -> Option<Self> {
        let uid = uid.into();
        if uid.trim().is_empty() {
            return None;
        }

        Some(Self { uid })
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_uid_is_rejected() {
        assert!(Identity::new("").is_none());
        assert!(Identity::new("   ").is_none());
        assert_eq!(Identity::new("user-1").map(|i| i.uid().to_string()), Some("user-1".to_string()));
    }
}
