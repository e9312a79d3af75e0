pub mod error;
pub mod models;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{CoreError, Result};
pub use error_location::ErrorLocation;
pub use models::activity_listing::ActivityListing;
pub use models::presence_entry::PresenceEntry;
pub use models::presence_snapshot::{PresenceSnapshot, is_online};
pub use models::presence_update::PresenceUpdate;
pub use models::role::Role;
pub use models::role_member::RoleMember;
pub use store::{ActivityStore, UserStore};

/// Numeric user identifier shared by the user and activity tables
pub type UserId = i64;
