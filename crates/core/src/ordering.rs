//! Ordering helpers for steps within a wizard and fields within a step.
//!
//! Both use 1-based positions (`step_number`, `order_index`) that must be
//! unique per parent. A reorder request carries the complete new sequence
//! of child ids; it is valid only as a permutation of the current children.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Check that `requested` is a permutation of `existing`.
///
/// `entity` names the children in error messages (e.g. `"step"`).
pub fn validate_permutation(
    existing: &[DbId],
    requested: &[DbId],
    entity: &str,
) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(requested.len());
    for id in requested {
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!(
                "Duplicate {entity} id {id} in reorder request"
            )));
        }
    }

    let existing_set: HashSet<DbId> = existing.iter().copied().collect();
    if let Some(foreign) = requested.iter().find(|id| !existing_set.contains(id)) {
        return Err(CoreError::Validation(format!(
            "{entity} {foreign} does not belong to this parent"
        )));
    }
    if requested.len() != existing.len() {
        return Err(CoreError::Validation(format!(
            "Reorder must list all {} {entity}s, got {}",
            existing.len(),
            requested.len()
        )));
    }
    Ok(())
}

/// Move the item at `from` to `to`, shifting the items in between.
///
/// Out-of-range indexes leave the slice untouched and return `false`.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Whether `numbers` is exactly `{1..=N}` with no gaps or duplicates.
pub fn is_contiguous(numbers: &[i32]) -> bool {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    sorted.iter().zip(1..).all(|(n, expected)| *n == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ids(n: usize) -> Vec<DbId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn permutation_is_accepted() {
        let existing = ids(3);
        let requested = vec![existing[2], existing[0], existing[1]];
        assert!(validate_permutation(&existing, &requested, "step").is_ok());
    }

    #[test]
    fn empty_parent_accepts_empty_request() {
        assert!(validate_permutation(&[], &[], "field").is_ok());
    }

    #[test]
    fn missing_child_is_rejected() {
        let existing = ids(3);
        let err = validate_permutation(&existing, &existing[..2], "step").unwrap_err();
        assert!(err.to_string().contains("all 3 steps"));
    }

    #[test]
    fn duplicate_child_is_rejected() {
        let existing = ids(2);
        let requested = vec![existing[0], existing[0]];
        assert!(validate_permutation(&existing, &requested, "step").is_err());
    }

    #[test]
    fn foreign_child_is_rejected() {
        let existing = ids(2);
        let requested = vec![existing[0], Uuid::new_v4()];
        let err = validate_permutation(&existing, &requested, "field").unwrap_err();
        assert!(err.to_string().contains("does not belong"));
    }

    #[test]
    fn move_item_forward_and_back() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        assert!(move_item(&mut v, 0, 2));
        assert_eq!(v, vec!['b', 'c', 'a', 'd']);
        assert!(move_item(&mut v, 3, 0));
        assert_eq!(v, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn move_item_out_of_range_is_noop() {
        let mut v = vec![1, 2];
        assert!(!move_item(&mut v, 0, 5));
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    fn contiguity() {
        assert!(is_contiguous(&[]));
        assert!(is_contiguous(&[2, 1, 3]));
        assert!(!is_contiguous(&[1, 3]));
        assert!(!is_contiguous(&[1, 1, 2]));
        assert!(!is_contiguous(&[0, 1]));
    }
}
