pub mod activity_repository;
pub mod user_repository;

/// Display name as the portal renders it: "First Last", trimmed
pub(crate) fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim())
        .trim()
        .to_string()
}
