pub mod manager;
pub mod models;
pub mod repository;
pub mod seed;
pub mod stores;

pub use manager::{DatabaseError, DatabaseManager};
