//! Cursors: (start, end) ranges over a document that survive edits.
//!
//! A [`Cursor`] is a plain value; registering it with
//! [`Document::create_cursor`](crate::Document::create_cursor) stores it in a
//! document-owned slot, and the document rewrites every registered cursor
//! during each committed edit transaction, before the text changes are
//! materialized. The adjustment rule is asymmetric on purpose: text inserted
//! exactly at a cursor's start stays outside the range, text inserted exactly
//! at its end is absorbed into it, which is what selection behavior in an
//! editor calls for.

use crate::document::Document;

/// Handle to a cursor registered with a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorId(pub(crate) usize);

/// A range in a document. `end == None` denotes the document end, so the
/// range keeps extending as text is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Start character offset.
    pub start: usize,
    /// End character offset, or `None` for the document end.
    pub end: Option<usize>,
}

impl Cursor {
    /// A cursor over `start..end`.
    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// A cursor covering the whole document.
    pub fn all() -> Self {
        Self {
            start: 0,
            end: None,
        }
    }

    /// Selects the whole document.
    pub fn select_all(&mut self) {
        self.start = 0;
        self.end = None;
    }

    /// `true` when the range is non-empty.
    pub fn has_selection(&self, doc: &Document) -> bool {
        self.start != self.end.unwrap_or_else(|| doc.size())
    }

    /// The selected text.
    pub fn text(&self, doc: &Document) -> String {
        doc.text_range(self.start, self.end)
    }

    /// The line the start offset points into.
    pub fn start_block(&self, doc: &Document) -> usize {
        doc.block_index_at(self.start)
    }

    /// The line the end offset points into (the last line for an unbounded
    /// end).
    pub fn end_block(&self, doc: &Document) -> usize {
        match self.end {
            None => doc.block_count() - 1,
            Some(end) => doc.block_index_at(end),
        }
    }

    /// The selected lines, as an inclusive index range.
    ///
    /// When the selection ends exactly at the start of a line, that line is
    /// not included (unless the selection is empty).
    pub fn blocks(&self, doc: &Document) -> std::ops::RangeInclusive<usize> {
        let first = self.start_block(doc);
        let last = match self.end {
            None => doc.block_count() - 1,
            Some(end) if end == self.start => first,
            Some(end) => {
                let mut last = first;
                for line in first + 1..doc.block_count() {
                    if doc.position(line) >= end {
                        break;
                    }
                    last = line;
                }
                last
            }
        };
        first..=last
    }

    /// The text before the start offset on its line.
    pub fn text_before(&self, doc: &Document) -> String {
        let block = self.start_block(doc);
        let column = self.start - doc.position(block);
        doc.text_line(block)
            .map(|t| t.chars().take(column).collect())
            .unwrap_or_default()
    }

    /// The text after the end offset on its line (empty for an unbounded
    /// end).
    pub fn text_after(&self, doc: &Document) -> String {
        let Some(end) = self.end else {
            return String::new();
        };
        let block = doc.block_index_at(end);
        let column = end - doc.position(block);
        doc.text_line(block)
            .map(|t| t.chars().skip(column).collect())
            .unwrap_or_default()
    }

    /// Moves the end to the end of its line.
    pub fn select_to_block_end(&mut self, doc: &Document) {
        if self.end.is_some() {
            let block = self.end_block(doc);
            let len = doc.text_line(block).map(|t| t.chars().count()).unwrap_or(0);
            self.end = Some(doc.position(block) + len);
        }
    }

    /// Moves the start to the start of its line.
    pub fn select_to_block_start(&mut self, doc: &Document) {
        let block = self.start_block(doc);
        self.start = doc.position(block);
    }

    /// Moves the start right past leading characters matching `pred`.
    pub fn lstrip(&mut self, doc: &Document, pred: impl Fn(char) -> bool) {
        if !self.has_selection(doc) {
            return;
        }
        let text = self.text(doc);
        self.start += text.chars().take_while(|c| pred(*c)).count();
    }

    /// Moves the end left past trailing characters matching `pred`.
    pub fn rstrip(&mut self, doc: &Document, pred: impl Fn(char) -> bool) {
        if !self.has_selection(doc) {
            return;
        }
        let text = self.text(doc);
        let trailing = text.chars().rev().take_while(|c| pred(*c)).count();
        let end = self.end.unwrap_or_else(|| doc.size()) - trailing;
        if end < doc.size() {
            self.end = Some(end);
        }
    }

    /// Trims matching characters from both ends, keeping the interior.
    pub fn strip(&mut self, doc: &Document, pred: impl Fn(char) -> bool) {
        self.rstrip(doc, &pred);
        self.lstrip(doc, &pred);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_and_selection() {
        let doc = Document::new("hi there, folks!", None);
        let cursor = Cursor::new(3, Some(8));
        assert_eq!(cursor.text(&doc), "there");
        assert!(cursor.has_selection(&doc));
        assert!(!Cursor::new(4, Some(4)).has_selection(&doc));
        assert!(Cursor::new(4, None).has_selection(&doc));
        assert!(!Cursor::new(16, None).has_selection(&doc));
    }

    #[test]
    fn test_insertion_at_end_extends_range() {
        let mut doc = Document::new("hi there, folks!", None);
        let id = doc.create_cursor(Cursor::new(8, Some(8)));
        let mut edit = doc.edit();
        edit.insert(8, "new text");
        edit.commit().unwrap();
        let cursor = doc.cursor(id).unwrap();
        assert_eq!((cursor.start, cursor.end), (8, Some(16)));
    }

    #[test]
    fn test_insertion_at_start_stays_outside() {
        let mut doc = Document::new("abcdef", None);
        let id = doc.create_cursor(Cursor::new(2, Some(4)));
        let mut edit = doc.edit();
        edit.insert(2, "xx");
        edit.commit().unwrap();
        let cursor = doc.cursor(id).unwrap();
        // start pinned, end shifted
        assert_eq!((cursor.start, cursor.end), (2, Some(6)));
    }

    #[test]
    fn test_deletion_covering_cursor_collapses_it() {
        let mut doc = Document::new("abcdefgh", None);
        let id = doc.create_cursor(Cursor::new(3, Some(5)));
        let mut edit = doc.edit();
        edit.replace(2, Some(7), "X");
        edit.commit().unwrap();
        let cursor = doc.cursor(id).unwrap();
        assert_eq!((cursor.start, cursor.end), (2, Some(3)));
    }

    #[test]
    fn test_edit_after_cursor_leaves_it_alone() {
        let mut doc = Document::new("abcdefgh", None);
        let id = doc.create_cursor(Cursor::new(1, Some(3)));
        let mut edit = doc.edit();
        edit.replace(5, Some(7), "XYZ");
        edit.commit().unwrap();
        assert_eq!(doc.cursor(id).unwrap(), Cursor::new(1, Some(3)));
    }

    #[test]
    fn test_edit_before_cursor_shifts_it() {
        let mut doc = Document::new("abcdefgh", None);
        let id = doc.create_cursor(Cursor::new(4, Some(6)));
        let mut edit = doc.edit();
        edit.replace(0, Some(2), "x");
        edit.commit().unwrap();
        assert_eq!(doc.cursor(id).unwrap(), Cursor::new(3, Some(5)));
    }

    #[test]
    fn test_unbounded_cursor_end_stays_unbounded() {
        let mut doc = Document::new("abcdefgh", None);
        let id = doc.create_cursor(Cursor::new(2, None));
        let mut edit = doc.edit();
        edit.insert(0, "xx");
        edit.commit().unwrap();
        // the start shifts with the insertion, the end keeps tracking the
        // document end
        assert_eq!(doc.cursor(id).unwrap(), Cursor::new(4, None));
    }

    #[test]
    fn test_blocks_excludes_line_after_selection_end() {
        let doc = Document::new("one\ntwo\nthree", None);
        // selection ending exactly at the start of line 1
        assert_eq!(Cursor::new(0, Some(4)).blocks(&doc), 0..=0);
        assert_eq!(Cursor::new(0, Some(5)).blocks(&doc), 0..=1);
        assert_eq!(Cursor::new(2, None).blocks(&doc), 0..=2);
        assert_eq!(Cursor::new(5, Some(5)).blocks(&doc), 1..=1);
    }

    #[test]
    fn test_select_to_block_edges() {
        let doc = Document::new("one\ntwo\nthree", None);
        let mut cursor = Cursor::new(5, Some(6));
        cursor.select_to_block_start(&doc);
        cursor.select_to_block_end(&doc);
        assert_eq!(cursor, Cursor::new(4, Some(7)));
        assert_eq!(cursor.text(&doc), "two");
    }

    #[test]
    fn test_strip_whitespace() {
        let doc = Document::new("  hello  world  ", None);
        let mut cursor = Cursor::new(0, Some(9));
        cursor.strip(&doc, char::is_whitespace);
        assert_eq!(cursor.text(&doc), "hello");
        assert_eq!(cursor, Cursor::new(2, Some(7)));
    }

    #[test]
    fn test_strip_on_unbounded_end() {
        let doc = Document::new("  hello  ", None);
        let mut cursor = Cursor::all();
        cursor.strip(&doc, char::is_whitespace);
        assert_eq!(cursor.start, 2);
        assert_eq!(cursor.end, Some(7));
        assert_eq!(cursor.text(&doc), "hello");
    }

    #[test]
    fn test_text_before_and_after() {
        let doc = Document::new("one\ntwo\nthree", None);
        let cursor = Cursor::new(5, Some(6));
        assert_eq!(cursor.text_before(&doc), "t");
        assert_eq!(cursor.text_after(&doc), "o");
    }
}
