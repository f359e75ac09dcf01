//! Identifier generation for slides, elements, cells, and tag groups.

use uuid::Uuid;

/// Length of generated identifiers.
pub const ID_LEN: usize = 10;

/// Generate a fresh, short unique identifier.
pub fn new_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ID_LEN);
    id
}
