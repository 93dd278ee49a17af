pub mod codec;
pub mod errors;
pub mod repository;

pub use repository::FirestoreDocumentStore;
