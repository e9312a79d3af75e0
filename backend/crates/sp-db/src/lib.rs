pub mod connection;
pub mod error;
pub mod repositories;
pub mod sqlite_store;

pub use connection::{MIGRATOR, connect, connect_in_memory};
pub use error::{DbError, Result};
pub use repositories::activity_repository::ActivityRepository;
pub use repositories::user_repository::UserRepository;
pub use sqlite_store::SqlitePresenceStore;
