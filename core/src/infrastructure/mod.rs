pub mod firestore;
pub mod google_auth;
pub mod identity;
pub mod llm;
pub mod local_store;
pub mod video;
