//! The cursor adjustment law, deterministic and randomized.

use notation_doc::{Cursor, Document};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_cursor_before_edit_is_untouched() {
    let mut doc = Document::new("abcdefghij", None);
    let id = doc.create_cursor(Cursor::new(1, Some(3)));
    let mut edit = doc.edit();
    edit.replace(5, Some(8), "XY");
    edit.commit().unwrap();
    assert_eq!(doc.cursor(id).unwrap(), Cursor::new(1, Some(3)));
}

#[test]
fn test_cursor_after_edit_shifts_by_delta() {
    let mut doc = Document::new("abcdefghij", None);
    let id = doc.create_cursor(Cursor::new(6, Some(9)));
    let mut edit = doc.edit();
    // delete 3 chars, insert 1: delta is -2
    edit.replace(1, Some(4), "X");
    edit.commit().unwrap();
    assert_eq!(doc.cursor(id).unwrap(), Cursor::new(4, Some(7)));
}

#[test]
fn test_cursor_inside_deleted_range_clamps_to_edit_start() {
    let mut doc = Document::new("abcdefghij", None);
    let id = doc.create_cursor(Cursor::new(4, Some(6)));
    let mut edit = doc.edit();
    edit.delete(2, Some(8));
    edit.commit().unwrap();
    assert_eq!(doc.cursor(id).unwrap(), Cursor::new(2, Some(2)));
}

#[test]
fn test_unbounded_delete_clamps_cursor() {
    let mut doc = Document::new("abcdefghij", None);
    let id = doc.create_cursor(Cursor::new(4, Some(9)));
    let mut edit = doc.edit();
    edit.replace(3, None, "!");
    edit.commit().unwrap();
    // start clamps to the edit start, end to the end of the insertion
    assert_eq!(doc.cursor(id).unwrap(), Cursor::new(3, Some(4)));
}

#[test]
fn test_multiple_cursors_adjust_independently() {
    let mut doc = Document::new("one two three", None);
    let before = doc.create_cursor(Cursor::new(0, Some(3)));
    let covering = doc.create_cursor(Cursor::new(4, Some(7)));
    let after = doc.create_cursor(Cursor::new(8, Some(13)));

    let mut edit = doc.edit();
    edit.replace(4, Some(7), "TWO-LONGER");
    edit.commit().unwrap();

    assert_eq!(doc.cursor(before).unwrap(), Cursor::new(0, Some(3)));
    assert_eq!(doc.cursor(covering).unwrap(), Cursor::new(4, Some(14)));
    assert_eq!(doc.cursor(after).unwrap(), Cursor::new(15, Some(20)));
}

/// The adjustment rule, restated independently of the implementation.
fn expected(
    cursor: (usize, Option<usize>),
    edit: (usize, usize, usize),
) -> (usize, Option<usize>) {
    let (c_start, c_end) = cursor;
    let (e_start, e_end, inserted) = edit;
    let new_start = if c_start > e_start {
        if e_end >= c_start {
            e_start
        } else {
            c_start + e_start + inserted - e_end
        }
    } else {
        c_start
    };
    let new_end = c_end.map(|ce| {
        if ce >= e_start {
            if e_end >= ce {
                e_start + inserted
            } else {
                ce + e_start + inserted - e_end
            }
        } else {
            ce
        }
    });
    (new_start, new_end)
}

#[test]
fn test_cursor_adjustment_law_randomized() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for round in 0..500 {
        let len: usize = rng.gen_range(1..60);
        let text: String = (0..len).map(|i| if i % 7 == 3 { '\n' } else { 'a' }).collect();
        let mut doc = Document::new(&text, None);
        let size = doc.size();

        let c_start = rng.gen_range(0..=size);
        let c_end = if rng.gen_bool(0.2) {
            None
        } else {
            Some(rng.gen_range(c_start..=size))
        };
        let id = doc.create_cursor(Cursor::new(c_start, c_end));

        let e_start = rng.gen_range(0..=size);
        let e_end = rng.gen_range(e_start..=size);
        let inserted = rng.gen_range(0..5);
        if e_start == e_end && inserted == 0 {
            continue;
        }
        let replacement = "x".repeat(inserted);

        let mut edit = doc.edit();
        edit.replace(e_start, Some(e_end), &replacement);
        edit.commit().unwrap();

        let adjusted = doc.cursor(id).unwrap();
        let (want_start, want_end) = expected((c_start, c_end), (e_start, e_end, inserted));
        assert_eq!(
            (adjusted.start, adjusted.end),
            (want_start, want_end),
            "round {round}: cursor ({c_start},{c_end:?}) edit ({e_start},{e_end},+{inserted})"
        );

        // structural invariants
        let new_size = doc.size();
        assert!(adjusted.start <= new_size);
        if let Some(end) = adjusted.end {
            assert!(adjusted.start <= end);
            assert!(end <= new_size);
        }
    }
}
