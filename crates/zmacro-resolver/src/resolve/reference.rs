//! Positional references `$1`..`$9`. No data access.

use crate::expression;
use crate::itemkey;
use crate::substitute::{ReferenceMiss, References};

/// References of a trigger name: the n-th literal operand of the
/// (user-macro expanded) expression. Out of range renders empty.
pub fn from_expression(expression: &str) -> References {
    References::new(expression::literal_values(expression), ReferenceMiss::Empty)
}

/// References of an item name: the n-th parameter of the item key. Out of
/// range stays as written.
pub fn from_item_key(key: &str) -> References {
    References::new(itemkey::parameters(key), ReferenceMiss::Keep)
}
