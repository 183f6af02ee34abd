/// Tournament and prediction storage backends.
pub mod bracket_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
