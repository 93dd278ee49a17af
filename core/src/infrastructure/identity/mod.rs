pub mod firebase_verifier;

pub use firebase_verifier::FirebaseTokenVerifier;
