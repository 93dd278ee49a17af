pub mod repository;

pub use repository::LocalFileStore;
