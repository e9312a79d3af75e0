pub mod activity_listing;
pub mod presence_entry;
pub mod presence_snapshot;
pub mod presence_update;
pub mod role;
pub mod role_member;
