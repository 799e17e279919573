//! The document model: lines with cached tokens and frozen lexer states,
//! transactional edits, and incremental re-lexing.
//!
//! The text is stored as an ordered sequence of blocks (lines). Each block
//! caches its token list and the lexer state at its end, so a re-lex after an
//! edit starts at the first modified line and stops as soon as a freshly
//! computed end-of-line state equals the state cached for that line; later
//! lines cannot tokenize differently.
//!
//! Edits are queued in an [`EditSession`] and applied on
//! [`EditSession::commit`] in descending start order, so that the offsets of
//! edits earlier in the document stay valid while later ones are spliced in.
//! Overlapping or out-of-range edits are caller bugs and fail the whole
//! transaction.

use std::path::Path;
use std::sync::Arc;

use notation_lex::{guess_mode, Lexicon, Mode, State, Token};
use thiserror::Error;
use tracing::{debug, trace};

use crate::cursor::{Cursor, CursorId};

/// Errors loading a document from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid UTF-8.
    #[error("decode error: {0}")]
    Decode(#[from] std::str::Utf8Error),
}

/// Errors committing an edit transaction. These indicate caller bugs, not
/// malformed document text; the transaction is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// Two edits in one transaction overlap.
    #[error("overlapping edit {start}..{end}")]
    Overlap {
        /// Start offset of the offending edit.
        start: usize,
        /// Effective end offset of the offending edit.
        end: usize,
    },
    /// An edit lies outside the document.
    #[error("edit {start}..{end} outside document of size {size}")]
    OutOfRange {
        /// Start offset of the offending edit.
        start: usize,
        /// Effective end offset of the offending edit.
        end: usize,
        /// The document size at commit time.
        size: usize,
    },
}

/// One line of the document.
struct Block {
    text: String,
    /// Absolute character offset of the line start. Freshly inserted blocks
    /// hold `usize::MAX` until positions are recomputed, which keeps them out
    /// of offset lookups during edit application.
    position: usize,
    cache: Option<LineCache>,
}

struct LineCache {
    tokens: Vec<Token>,
    state_end: State,
}

impl Block {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            position: usize::MAX,
            cache: None,
        }
    }
}

/// A queued replacement; `end == None` means "to the end of the document".
struct Change {
    start: usize,
    end: Option<usize>,
    text: String,
}

/// A mutable, always-tokenized music-notation source document.
///
/// All offsets are character offsets. Line endings are normalized to LF on
/// load (`\r` is stripped, also from replacement text), and
/// [`Document::plaintext`] round-trips the normalized text exactly.
pub struct Document {
    blocks: Vec<Block>,
    mode: Option<Mode>,
    guessed_mode: Mode,
    lexicon: Arc<Lexicon>,
    cursors: Vec<Option<Cursor>>,
    lexed_lines: u64,
    modified: bool,
}

impl Document {
    /// Creates a document from text, fully lexing it. With `mode == None` the
    /// mode is guessed from the content and re-guessed after every commit.
    pub fn new(text: &str, mode: Option<Mode>) -> Self {
        Self::with_lexicon(Lexicon::shared(), text, mode)
    }

    /// Like [`Document::new`] with an explicitly shared lexicon.
    pub fn with_lexicon(lexicon: Arc<Lexicon>, text: &str, mode: Option<Mode>) -> Self {
        let mut doc = Self {
            blocks: Vec::new(),
            mode,
            guessed_mode: Mode::Lilypond,
            lexicon,
            cursors: Vec::new(),
            lexed_lines: 0,
            modified: false,
        };
        doc.set_text(text);
        doc
    }

    /// Loads a UTF-8 file. Decode failures are reported, never replaced by
    /// empty content.
    pub fn from_file(path: impl AsRef<Path>, mode: Option<Mode>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let text = std::str::from_utf8(&bytes)?;
        let mode = mode.or_else(|| {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(Mode::for_filename)
        });
        Ok(Self::new(text, mode))
    }

    /// Replaces the whole text, clearing the modified flag. Registered
    /// cursors keep their positions.
    pub fn set_text(&mut self, text: &str) {
        let text = text.replace('\r', "");
        self.blocks = text.split('\n').map(Block::new).collect();
        self.blocks[0].position = 0;
        self.update_positions(0);
        if self.mode.is_none() {
            self.guessed_mode = guess_mode(&text);
        }
        self.update_all_tokens();
        self.modified = false;
    }

    /// The explicit mode, or `None` when the mode is auto-guessed.
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// The mode the document is currently lexed with.
    pub fn active_mode(&self) -> Mode {
        self.mode.unwrap_or(self.guessed_mode)
    }

    /// Sets or clears the explicit mode, re-lexing when the effective mode
    /// changes.
    pub fn set_mode(&mut self, mode: Option<Mode>) {
        if mode == self.mode {
            return;
        }
        let old_mode = self.mode.take();
        self.mode = mode;
        match mode {
            None => {
                self.guessed_mode = guess_mode(&self.plaintext());
                if Some(self.guessed_mode) == old_mode {
                    return;
                }
            }
            Some(new_mode) => {
                if old_mode.is_none() && new_mode == self.guessed_mode {
                    return;
                }
            }
        }
        self.update_all_tokens();
    }

    /// The shared lexicon this document lexes with.
    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Whether the document changed since load / [`Document::set_text`].
    pub fn modified(&self) -> bool {
        self.modified
    }

    /// Total number of lines lexed since creation. Incremental re-lexing is
    /// observable through this counter.
    pub fn lexed_line_count(&self) -> u64 {
        self.lexed_lines
    }

    /// Number of lines. At least 1; an empty document has one empty line.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of characters in the document.
    pub fn size(&self) -> usize {
        let last = &self.blocks[self.blocks.len() - 1];
        last.position + last.text.chars().count()
    }

    /// The document text, lines joined with `\n`.
    pub fn plaintext(&self) -> String {
        let mut out = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&block.text);
        }
        out
    }

    /// The text between two offsets (`end == None` means document end).
    pub fn text_range(&self, start: usize, end: Option<usize>) -> String {
        let text = self.plaintext();
        match end {
            Some(end) => text
                .chars()
                .skip(start)
                .take(end.saturating_sub(start))
                .collect(),
            None => text.chars().skip(start).collect(),
        }
    }

    /// The text of a line, without the newline.
    pub fn text_line(&self, line: usize) -> Option<&str> {
        self.blocks.get(line).map(|b| b.text.as_str())
    }

    /// The absolute character offset of a line start.
    ///
    /// Panics on an invalid line index; indices come from this document, so
    /// an invalid one is a caller bug.
    pub fn position(&self, line: usize) -> usize {
        self.blocks[line].position
    }

    /// The line containing the given character offset (offsets past the end
    /// clamp to the last line).
    pub fn block_index_at(&self, position: usize) -> usize {
        let mut lo = 0usize;
        let mut hi = self.blocks.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            if position < self.blocks[mid].position {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo - 1
    }

    /// `true` if the line is empty or whitespace.
    pub fn is_blank(&self, line: usize) -> bool {
        self.blocks
            .get(line)
            .is_none_or(|b| b.text.chars().all(char::is_whitespace))
    }

    /// The cached tokens of a line (line-relative offsets). Empty for an
    /// invalid index.
    pub fn tokens(&self, line: usize) -> &[Token] {
        self.blocks
            .get(line)
            .and_then(|b| b.cache.as_ref())
            .map(|c| c.tokens.as_slice())
            .unwrap_or(&[])
    }

    /// The tokens of a line with document-absolute offsets.
    pub fn tokens_with_position(&self, line: usize) -> Vec<Token> {
        let position = self.blocks.get(line).map(|b| b.position).unwrap_or(0);
        self.tokens(line)
            .iter()
            .map(|t| t.at(position + t.pos()))
            .collect()
    }

    /// The lexer state at the start of the document.
    pub fn initial_state(&self) -> State {
        State::for_mode(self.active_mode())
    }

    /// The lexer state at the start of a line.
    pub fn state(&self, line: usize) -> State {
        if line == 0 {
            return self.initial_state();
        }
        self.state_end(line - 1)
            .unwrap_or_else(|| self.initial_state())
    }

    /// The lexer state at the end of a line, if cached.
    pub fn state_end(&self, line: usize) -> Option<State> {
        self.blocks
            .get(line)
            .and_then(|b| b.cache.as_ref())
            .map(|c| c.state_end.clone())
    }

    /// Starts an edit transaction. Queue replacements on the returned session
    /// and [`EditSession::commit`] it; dropping the session discards them.
    pub fn edit(&mut self) -> EditSession<'_> {
        EditSession {
            doc: self,
            changes: Vec::new(),
        }
    }

    /// Registers a cursor to be adjusted on every committed edit.
    pub fn create_cursor(&mut self, cursor: Cursor) -> CursorId {
        let id = CursorId(self.cursors.len());
        self.cursors.push(Some(cursor));
        id
    }

    /// The current value of a registered cursor.
    pub fn cursor(&self, id: CursorId) -> Option<Cursor> {
        self.cursors.get(id.0).copied().flatten()
    }

    /// Overwrites a registered cursor.
    pub fn set_cursor(&mut self, id: CursorId, cursor: Cursor) {
        if let Some(slot) = self.cursors.get_mut(id.0) {
            *slot = Some(cursor);
        }
    }

    /// Unregisters a cursor.
    pub fn remove_cursor(&mut self, id: CursorId) {
        if let Some(slot) = self.cursors.get_mut(id.0) {
            *slot = None;
        }
    }

    fn update_positions(&mut self, from: usize) {
        let mut pos = if from == 0 {
            0
        } else {
            self.blocks[from].position
        };
        for block in &mut self.blocks[from..] {
            block.position = pos;
            pos += block.text.chars().count() + 1;
        }
    }

    fn update_all_tokens(&mut self) {
        let mut state = self.initial_state();
        for block in &mut self.blocks {
            let tokens = self.lexicon.lex_line(&block.text, &mut state);
            block.cache = Some(LineCache {
                tokens,
                state_end: state.clone(),
            });
        }
        self.lexed_lines += self.blocks.len() as u64;
    }

    fn commit_changes(&mut self, mut changes: Vec<Change>) -> Result<(), EditError> {
        if changes.is_empty() {
            return Ok(());
        }
        let size = self.size();
        for change in &changes {
            let end = change.end.unwrap_or(size);
            if change.start > size || end > size {
                return Err(EditError::OutOfRange {
                    start: change.start,
                    end,
                    size,
                });
            }
        }

        // Descending start order; for equal starts, unbounded ends first,
        // then larger ends first.
        changes.sort_by(|a, b| {
            b.start.cmp(&a.start).then_with(|| match (a.end, b.end) {
                (None, None) => std::cmp::Ordering::Equal,
                (None, Some(_)) => std::cmp::Ordering::Less,
                (Some(_), None) => std::cmp::Ordering::Greater,
                (Some(a_end), Some(b_end)) => b_end.cmp(&a_end),
            })
        });

        let mut pos = size;
        for change in &changes {
            let end = change.end.unwrap_or(size);
            if end > pos {
                return Err(EditError::Overlap {
                    start: change.start,
                    end,
                });
            }
            pos = change.start;
        }

        // Cursors are adjusted with pre-application offsets, before any text
        // changes.
        for change in &changes {
            self.adjust_cursors(change);
        }

        let mut first = self.blocks.len();
        for change in &changes {
            first = self.apply_change(change);
        }
        self.update_positions(first);
        self.modified = true;
        debug!(
            edits = changes.len(),
            first_line = first,
            "committed edit transaction"
        );
        self.relex_from(first);
        Ok(())
    }

    fn adjust_cursors(&mut self, change: &Change) {
        let inserted = change.text.chars().count();
        for cursor in self.cursors.iter_mut().flatten() {
            if cursor.start > change.start {
                match change.end {
                    Some(end) if end < cursor.start => {
                        cursor.start = cursor.start + change.start + inserted - end;
                    }
                    _ => cursor.start = change.start,
                }
            }
            if let Some(cursor_end) = cursor.end {
                if cursor_end >= change.start {
                    match change.end {
                        Some(end) if end < cursor_end => {
                            cursor.end = Some(cursor_end + change.start + inserted - end);
                        }
                        _ => cursor.end = Some(change.start + inserted),
                    }
                }
            }
        }
    }

    /// Applies one change to the block array and returns the first modified
    /// line index.
    fn apply_change(&mut self, change: &Change) -> usize {
        let s = self.block_index_at(change.start);
        let col = char_to_byte(&self.blocks[s].text, change.start - self.blocks[s].position);

        match change.end {
            None => {
                self.blocks[s].text.truncate(col);
                self.blocks.drain(s + 1..);
            }
            Some(end) => {
                let e = self.block_index_at(end);
                let e_col = char_to_byte(&self.blocks[e].text, end - self.blocks[e].position);
                let tail = self.blocks[e].text[e_col..].to_string();
                self.blocks[s].text.truncate(col);
                self.blocks[s].text.push_str(&tail);
                if e > s {
                    self.blocks.drain(s + 1..=e);
                }
            }
        }

        if !change.text.is_empty() {
            let mut lines = change.text.split('\n');
            let first_line = lines.next().unwrap_or_default();
            let rest: Vec<&str> = lines.collect();
            let tail = self.blocks[s].text.split_off(col);
            self.blocks[s].text.push_str(first_line);
            if rest.is_empty() {
                self.blocks[s].text.push_str(&tail);
            } else {
                let mut new_blocks: Vec<Block> = rest.iter().map(|l| Block::new(l)).collect();
                let last = new_blocks.len() - 1;
                new_blocks[last].text.push_str(&tail);
                self.blocks.splice(s + 1..s + 1, new_blocks);
            }
        }

        self.blocks[s].cache = None;
        s
    }

    fn relex_from(&mut self, first: usize) {
        if self.mode.is_none() {
            let guess = guess_mode(&self.plaintext());
            if guess != self.guessed_mode {
                debug!(from = %self.guessed_mode, to = %guess, "mode guess changed, re-lexing document");
                self.guessed_mode = guess;
                self.update_all_tokens();
                return;
            }
        }

        let mut state = self.state(first);
        let mut relexed = 0u64;
        let mut reparse = false;
        for i in first..self.blocks.len() {
            if reparse || self.blocks[i].cache.is_none() {
                let tokens = self.lexicon.lex_line(&self.blocks[i].text, &mut state);
                relexed += 1;
                let changed = self.blocks[i]
                    .cache
                    .as_ref()
                    .is_none_or(|c| c.state_end != state);
                self.blocks[i].cache = Some(LineCache {
                    tokens,
                    state_end: state.clone(),
                });
                reparse = changed;
            } else if let Some(cache) = &self.blocks[i].cache {
                state = cache.state_end.clone();
            }
        }
        self.lexed_lines += relexed;
        trace!(first_line = first, lines = relexed, "incremental re-lex");
    }
}

/// A pending edit transaction on a [`Document`].
///
/// Replacements may be queued in any order as long as they do not overlap;
/// they are applied atomically on [`EditSession::commit`] in descending start
/// order, so each queued offset refers to the document as it was when the
/// session started.
pub struct EditSession<'a> {
    doc: &'a mut Document,
    changes: Vec<Change>,
}

impl EditSession<'_> {
    /// Queues replacing `start..end` with `text`. `end == None` replaces to
    /// the document end; a reversed bounded range is swapped. `\r` characters
    /// in the replacement are stripped.
    pub fn replace(&mut self, start: usize, end: Option<usize>, text: &str) -> &mut Self {
        let (start, end) = match end {
            Some(e) if e < start => (e, Some(start)),
            other => (start, other),
        };
        let text = text.replace('\r', "");
        if !text.is_empty() || end != Some(start) {
            self.changes.push(Change { start, end, text });
        }
        self
    }

    /// Queues inserting `text` at `position`.
    pub fn insert(&mut self, position: usize, text: &str) -> &mut Self {
        self.replace(position, Some(position), text)
    }

    /// Queues deleting `start..end`.
    pub fn delete(&mut self, start: usize, end: Option<usize>) -> &mut Self {
        self.replace(start, end, "")
    }

    /// Applies all queued changes: cursors are adjusted, the text is spliced,
    /// and the affected lines are re-lexed. On error nothing is applied.
    pub fn commit(self) -> Result<(), EditError> {
        let EditSession { doc, changes } = self;
        doc.commit_changes(changes)
    }
}

fn char_to_byte(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plaintext_round_trip() {
        let text = "\\version \"2.24\"\n{ c d e }\n";
        let doc = Document::new(text, None);
        assert_eq!(doc.plaintext(), text);
        assert!(!doc.modified());
    }

    #[test]
    fn test_cr_stripped_on_load() {
        let doc = Document::new("{ c }\r\n{ d }\r\n", None);
        assert_eq!(doc.plaintext(), "{ c }\n{ d }\n");
    }

    #[test]
    fn test_block_index_at() {
        let doc = Document::new("abc\nde\nfgh", None);
        assert_eq!(doc.block_index_at(0), 0);
        assert_eq!(doc.block_index_at(3), 0); // the newline belongs to line 0
        assert_eq!(doc.block_index_at(4), 1);
        assert_eq!(doc.block_index_at(6), 1);
        assert_eq!(doc.block_index_at(7), 2);
        assert_eq!(doc.block_index_at(100), 2);
        assert_eq!(doc.size(), 10);
    }

    #[test]
    fn test_insert_and_delete() {
        let mut doc = Document::new("some string", None);
        let mut edit = doc.edit();
        edit.insert(5, "different ");
        edit.commit().unwrap();
        assert_eq!(doc.plaintext(), "some different string");
        assert!(doc.modified());

        let mut edit = doc.edit();
        edit.delete(5, Some(15));
        edit.commit().unwrap();
        assert_eq!(doc.plaintext(), "some string");
    }

    #[test]
    fn test_multiline_replace_merges_lines() {
        let mut doc = Document::new("one\ntwo\nthree\nfour", None);
        let mut edit = doc.edit();
        // replace "wo\nthr" with "X"
        edit.replace(5, Some(11), "X");
        edit.commit().unwrap();
        assert_eq!(doc.plaintext(), "one\ntXee\nfour");
        assert_eq!(doc.block_count(), 3);
    }

    #[test]
    fn test_replacement_with_newlines_creates_blocks() {
        let mut doc = Document::new("one\ntwo", None);
        let mut edit = doc.edit();
        edit.insert(3, "\nmid1\nmid2");
        edit.commit().unwrap();
        assert_eq!(doc.plaintext(), "one\nmid1\nmid2\ntwo");
        assert_eq!(doc.block_count(), 4);
        assert_eq!(doc.position(3), 14);
    }

    #[test]
    fn test_unbounded_end_truncates() {
        let mut doc = Document::new("one\ntwo\nthree", None);
        let mut edit = doc.edit();
        edit.replace(5, None, "!");
        edit.commit().unwrap();
        assert_eq!(doc.plaintext(), "one\nt!");
        assert_eq!(doc.block_count(), 2);
    }

    #[test]
    fn test_multiple_edits_one_transaction() {
        let mut doc = Document::new("aaa bbb ccc", None);
        let mut edit = doc.edit();
        edit.replace(0, Some(3), "xx");
        edit.replace(8, Some(11), "yy");
        edit.commit().unwrap();
        assert_eq!(doc.plaintext(), "xx bbb yy");
    }

    #[test]
    fn test_overlapping_edits_fail() {
        let mut doc = Document::new("aaa bbb ccc", None);
        let mut edit = doc.edit();
        edit.replace(0, Some(5), "x");
        edit.replace(4, Some(8), "y");
        let err = edit.commit().unwrap_err();
        assert!(matches!(err, EditError::Overlap { .. }));
        // nothing was applied
        assert_eq!(doc.plaintext(), "aaa bbb ccc");
        assert!(!doc.modified());
    }

    #[test]
    fn test_out_of_range_edit_fails() {
        let mut doc = Document::new("short", None);
        let mut edit = doc.edit();
        edit.insert(99, "x");
        let err = edit.commit().unwrap_err();
        assert!(matches!(err, EditError::OutOfRange { .. }));
    }

    #[test]
    fn test_dropped_session_discards_changes() {
        let mut doc = Document::new("text", None);
        {
            let mut edit = doc.edit();
            edit.insert(0, "dropped ");
        }
        assert_eq!(doc.plaintext(), "text");
    }

    #[test]
    fn test_incremental_relex_stops_early() {
        let mut doc = Document::new("\\relative c' {\nc4 d e f\ng a b c\n}", None);
        let after_load = doc.lexed_line_count();
        assert_eq!(after_load, 4);

        // replace the "d" on line 1 with "dis"
        let pos = doc.plaintext().find(" d ").unwrap() + 1;
        let mut edit = doc.edit();
        edit.replace(pos, Some(pos + 1), "dis");
        edit.commit().unwrap();

        // Only line 1 needed re-lexing: its end state still matches.
        assert_eq!(doc.lexed_line_count(), after_load + 1);
        assert_eq!(doc.plaintext(), "\\relative c' {\nc4 dis e f\ng a b c\n}");
    }

    #[test]
    fn test_relex_propagates_while_state_changes() {
        let mut doc = Document::new("{ c %{ x\ny\nz %} d\ne }", None);
        let after_load = doc.lexed_line_count();

        // Deleting the comment opener changes the state of every following
        // line up to (and including) the closer's line.
        let pos = doc.plaintext().find("%{").unwrap();
        let mut edit = doc.edit();
        edit.delete(pos, Some(pos + 2));
        edit.commit().unwrap();

        // Lines 0..=2 relex (state changed); line 3's start state converges
        // again only after line 2, so line 3 must have been relexed as well
        // only if its incoming state changed. The comment closed on line 2,
        // so line 3's incoming state is unchanged and is not relexed.
        assert_eq!(doc.lexed_line_count(), after_load + 3);
    }

    #[test]
    fn test_full_vs_incremental_equivalence() {
        let text = "\\score {\n  \\new Staff {\n    c4 d e f %{ x\n    %} g a\n  }\n}";
        let mut doc = Document::new(text, None);
        let pos = doc.plaintext().find("e f").unwrap();
        let mut edit = doc.edit();
        edit.replace(pos, Some(pos + 1), "ees");
        edit.commit().unwrap();

        let fresh = Document::new(&doc.plaintext(), None);
        assert_eq!(doc.block_count(), fresh.block_count());
        for line in 0..doc.block_count() {
            assert_eq!(doc.tokens(line), fresh.tokens(line), "line {line}");
            assert_eq!(doc.state_end(line), fresh.state_end(line), "line {line}");
        }
    }

    #[test]
    fn test_mode_guess_change_relexes_everything() {
        let mut doc = Document::new("<html><body>x</body></html>", None);
        assert_eq!(doc.active_mode(), Mode::Html);

        let mut edit = doc.edit();
        edit.replace(0, None, "\\relative { c }");
        edit.commit().unwrap();
        assert_eq!(doc.active_mode(), Mode::Lilypond);
        assert!(doc
            .tokens(0)
            .iter()
            .any(|t| t.kind() == notation_lex::TokenKind::Note));
    }

    #[test]
    fn test_explicit_mode_is_not_reguessed() {
        let mut doc = Document::new("<html>", Some(Mode::Lilypond));
        let mut edit = doc.edit();
        edit.insert(0, "@node ");
        edit.commit().unwrap();
        assert_eq!(doc.active_mode(), Mode::Lilypond);
    }

    #[test]
    fn test_token_coverage_every_line() {
        let text = "\\header {\n  title = \"A B\"\n}\n{ c4( d) e }";
        let doc = Document::new(text, None);
        for line in 0..doc.block_count() {
            let rebuilt: String = doc.tokens(line).iter().map(|t| t.text()).collect();
            assert_eq!(rebuilt, doc.text_line(line).unwrap(), "line {line}");
        }
    }

    #[test]
    fn test_tokens_with_position() {
        let doc = Document::new("{ c }\n{ d }", None);
        let tokens = doc.tokens_with_position(1);
        assert_eq!(tokens[0].pos(), 6);
        assert_eq!(tokens[0].text(), "{");
    }

    #[test]
    fn test_set_mode_relexes() {
        let mut doc = Document::new("(define x 1)", Some(Mode::Lilypond));
        doc.set_mode(Some(Mode::Scheme));
        assert!(doc
            .tokens(0)
            .iter()
            .any(|t| t.kind() == notation_lex::TokenKind::SchemeKeyword));
    }
}
