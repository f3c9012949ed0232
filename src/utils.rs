// Small shared helpers

use uuid::Uuid;

/// Generate a unique token with the given prefix.
///
/// Used for login identifiers and secrets during the first-login bootstrap.
/// Uniqueness comes from uuid v4; the prefix is purely cosmetic.
pub fn guid(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4())
}
