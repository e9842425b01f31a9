use super::types::{ReferenceError, TodoRecord};
use uuid::Uuid;

pub fn find_record<'a>(records: &'a [TodoRecord], id: Uuid) -> Option<&'a TodoRecord> {
    records.iter().find(|record| record.id == id)
}

pub fn find_record_mut<'a>(records: &'a mut [TodoRecord], id: Uuid) -> Option<&'a mut TodoRecord> {
    records.iter_mut().find(|record| record.id == id)
}

/// Index of the todo named by a 1-based position or an id prefix.
///
/// A number counts as a position only when it is within the list; otherwise it
/// is matched as an id prefix like any other reference, since short ids may be
/// all digits.
pub fn resolve_reference(records: &[TodoRecord], reference: &str) -> Result<usize, ReferenceError> {
    let reference = reference.trim();
    if let Ok(position) = reference.parse::<usize>() {
        if (1..=records.len()).contains(&position) {
            return Ok(position - 1);
        }
    }

    let prefix = reference.to_lowercase();
    if prefix.is_empty() {
        return Err(ReferenceError::NotFound(reference.to_string()));
    }

    let matches: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.id.to_string().starts_with(&prefix))
        .map(|(i, _)| i)
        .collect();

    match matches.as_slice() {
        [index] => Ok(*index),
        [] => Err(ReferenceError::NotFound(reference.to_string())),
        _ => Err(ReferenceError::Ambiguous(reference.to_string())),
    }
}

/// Sorted, deduplicated indices that are in bounds for `len`.
fn valid_indices(indices: &[usize], len: usize) -> Vec<usize> {
    let mut valid: Vec<usize> = indices.iter().copied().filter(|&i| i < len).collect();
    valid.sort_unstable();
    valid.dedup();
    valid
}

/// Removes the items at `indices`. Returns how many were removed.
pub fn remove_indices<T>(items: &mut Vec<T>, indices: &[usize]) -> usize {
    let valid = valid_indices(indices, items.len());
    for &index in valid.iter().rev() {
        items.remove(index);
    }
    valid.len()
}

/// Moves the items at `from` so they sit before the item originally at `to`.
///
/// `to` is an offset into the sequence before the move and is clamped to its
/// length; `len` means "to the end". The moved items keep their relative
/// order. Returns false when the sequence is left unchanged.
pub fn move_indices<T>(items: &mut Vec<T>, from: &[usize], to: usize) -> bool {
    let valid = valid_indices(from, items.len());
    if valid.is_empty() {
        return false;
    }

    let to = to.min(items.len());
    let insert_at = to - valid.iter().filter(|&&i| i < to).count();

    let already_in_place = valid
        .iter()
        .enumerate()
        .all(|(offset, &index)| index == insert_at + offset);
    if already_in_place {
        return false;
    }

    let mut moved = Vec::with_capacity(valid.len());
    for &index in valid.iter().rev() {
        moved.push(items.remove(index));
    }
    moved.reverse();

    items.splice(insert_at..insert_at, moved);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn with_id(id: &str) -> TodoRecord {
        let mut record = TodoRecord::new(id, Utc::now());
        record.id = Uuid::parse_str(id).unwrap();
        record
    }

    fn numbered_records() -> Vec<TodoRecord> {
        vec![
            with_id("a1b2c3d4-0000-4000-8000-000000000001"),
            with_id("12345678-0000-4000-8000-000000000002"),
            with_id("a1b2ffff-0000-4000-8000-000000000003"),
        ]
    }

    fn letters() -> Vec<char> {
        vec!['A', 'B', 'C', 'D']
    }

    fn moved(from: &[usize], to: usize) -> (Vec<char>, bool) {
        let mut items = letters();
        let changed = move_indices(&mut items, from, to);
        (items, changed)
    }

    #[test]
    fn test_move_single_down() {
        assert_eq!(moved(&[0], 2), (vec!['B', 'A', 'C', 'D'], true));
    }

    #[test]
    fn test_move_single_up_to_front() {
        assert_eq!(moved(&[3], 0), (vec!['D', 'A', 'B', 'C'], true));
    }

    #[test]
    fn test_move_to_end() {
        assert_eq!(moved(&[0], 4), (vec!['B', 'C', 'D', 'A'], true));
    }

    #[test]
    fn test_move_destination_clamped() {
        assert_eq!(moved(&[1], 99), (vec!['A', 'C', 'D', 'B'], true));
    }

    #[test]
    fn test_move_scattered_subset_spanning_destination() {
        assert_eq!(moved(&[0, 2], 2), (vec!['B', 'A', 'C', 'D'], true));
        assert_eq!(moved(&[3, 1], 0), (vec!['B', 'D', 'A', 'C'], true));
        assert_eq!(moved(&[0, 3], 2), (vec!['B', 'A', 'D', 'C'], true));
    }

    #[test]
    fn test_move_onto_itself_is_noop() {
        assert_eq!(moved(&[1], 1), (letters(), false));
        assert_eq!(moved(&[1], 2), (letters(), false));
        assert_eq!(moved(&[1, 2], 3), (letters(), false));
    }

    #[test]
    fn test_move_ignores_out_of_range_and_duplicates() {
        assert_eq!(moved(&[7], 0), (letters(), false));
        assert_eq!(moved(&[2, 2, 9], 0), (vec!['C', 'A', 'B', 'D'], true));
    }

    #[test]
    fn test_remove_indices() {
        let mut items = letters();
        assert_eq!(remove_indices(&mut items, &[3, 0, 0, 8]), 2);
        assert_eq!(items, vec!['B', 'C']);
    }

    #[test]
    fn test_resolve_position_within_list() {
        let records = numbered_records();
        assert_eq!(resolve_reference(&records, "1"), Ok(0));
        assert_eq!(resolve_reference(&records, " 3 "), Ok(2));
    }

    #[test]
    fn test_resolve_all_digit_id_prefix() {
        let records = numbered_records();
        assert_eq!(resolve_reference(&records, "12345678"), Ok(1));
        assert_eq!(resolve_reference(&records, "1234"), Ok(1));
    }

    #[test]
    fn test_resolve_id_prefix_is_case_insensitive() {
        let records = numbered_records();
        assert_eq!(resolve_reference(&records, "A1B2C3"), Ok(0));
    }

    #[test]
    fn test_resolve_ambiguous_prefix() {
        let records = numbered_records();
        assert_eq!(
            resolve_reference(&records, "a1b2"),
            Err(ReferenceError::Ambiguous("a1b2".to_string()))
        );
    }

    #[test]
    fn test_resolve_unknown_reference() {
        let records = numbered_records();
        for reference in ["0", "4", "99", "ffff", ""] {
            assert_eq!(
                resolve_reference(&records, reference),
                Err(ReferenceError::NotFound(reference.to_string()))
            );
        }
    }
}
