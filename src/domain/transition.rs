//! Transition detector. Decides whether a write of the watched field means
//! "this user just became available".

use crate::domain::FieldValue;

/// True iff `before` is not exactly `true` and `after` is exactly `true`.
///
/// Absent, `null`, `false` and any non-boolean value all count as "not available".
pub fn is_qualifying_transition(before: &FieldValue, after: &FieldValue) -> bool {
    !before.is_true() && after.is_true()
}
