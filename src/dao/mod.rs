/// Snapshot storage backends.
pub mod game_store;
/// Serialized game shapes.
pub mod models;
/// Storage abstraction layer errors.
pub mod storage;
