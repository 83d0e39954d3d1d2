//! Demand id generation.
//!
//! Ids are opaque, immutable, and assigned once at creation: `dm-` plus the
//! first eight hex digits of a v4 UUID. Short enough to type, long enough
//! that a back-office portfolio never collides in practice.

use uuid::Uuid;

/// Prefix shared by every generated demand id.
pub const ID_PREFIX: &str = "dm-";

/// Generate a fresh demand id.
#[must_use]
pub fn generate_demand_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{ID_PREFIX}{}", &hex[..8])
}
