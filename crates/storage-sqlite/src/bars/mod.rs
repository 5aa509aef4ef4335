mod repository;

pub use repository::SqliteBarStore;
