//! The Source: a forward, range-scoped token stream with boundary policies,
//! optional state tracking, and one-token pushback.
//!
//! Every higher-level editing transform reads its tokens through a Source:
//! the boundary policy decides what happens to tokens straddling the cursor's
//! edges, the tracked state answers "what context am I in right now", and
//! [`Source::until_parser_end`] consumes exactly one balanced construct.

use std::sync::Arc;

use notation_lex::{Lexicon, State, Token};

use crate::cursor::Cursor;
use crate::document::Document;

/// How tokens at the range boundaries are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Tokens merely touching the boundary offsets are included.
    Outside,
    /// Tokens overlapping a boundary are included.
    Partial,
    /// Only tokens fully inside the range are included.
    Inside,
}

/// Whether the source follows the lexer state while yielding tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// No state; [`Source::state`] returns `None`.
    No,
    /// Start from the document's cached state at the first yielded line and
    /// follow every token.
    FromDocument,
}

/// A forward token stream over a cursor's range.
///
/// Yields the tokens of the selected range line by line, synthesizing a
/// virtual newline between lines (the tracked state does not follow those).
/// The stream is an ordinary [`Iterator`].
pub struct Source<'a> {
    doc: &'a Document,
    lexicon: Arc<Lexicon>,
    boundary: Boundary,
    with_position: bool,
    state: Option<State>,
    line: usize,
    idx: usize,
    /// Start-boundary filtering is only active in the first block, until the
    /// first token passes.
    filter_start: bool,
    start_pos: usize,
    end_bounded: bool,
    end_block: usize,
    end_pos: usize,
    pending_newline: bool,
    done: bool,
    last: Option<Token>,
    pushed_back: bool,
}

impl<'a> Source<'a> {
    /// A source over `cursor`'s range.
    ///
    /// With `with_position`, yielded tokens carry document-absolute offsets.
    pub fn new(
        doc: &'a Document,
        cursor: Cursor,
        track_state: TrackState,
        boundary: Boundary,
        with_position: bool,
    ) -> Self {
        let start_block = doc.block_index_at(cursor.start);
        let state = match track_state {
            TrackState::No => None,
            TrackState::FromDocument => Some(doc.state(start_block)),
        };
        let start_pos = if with_position {
            cursor.start
        } else {
            cursor.start - doc.position(start_block)
        };
        let (end_bounded, end_block, end_pos) = match cursor.end {
            None => (false, doc.block_count() - 1, 0),
            Some(end) => {
                let end_block = doc.block_index_at(end);
                let end_pos = if with_position {
                    end
                } else {
                    end - doc.position(end_block)
                };
                (true, end_block, end_pos)
            }
        };
        Self {
            doc,
            lexicon: doc.lexicon().clone(),
            boundary,
            with_position,
            state,
            line: start_block,
            idx: 0,
            filter_start: cursor.start > 0,
            start_pos,
            end_bounded,
            end_block,
            end_pos,
            pending_newline: false,
            done: false,
            last: None,
            pushed_back: false,
        }
    }

    /// The document this source reads.
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// The line the most recent token came from.
    pub fn current_block(&self) -> usize {
        self.line
    }

    /// The tracked state, reflecting every token yielded so far.
    pub fn state(&self) -> Option<&State> {
        self.state.as_ref()
    }

    /// Re-returns the most recently yielded token.
    pub fn token(&self) -> Option<&Token> {
        self.last.as_ref()
    }

    /// The document-absolute position of a token from this source.
    pub fn position(&self, token: &Token) -> usize {
        if self.with_position {
            token.pos()
        } else {
            self.doc.position(self.line) + token.pos()
        }
    }

    /// Makes the next call to [`Iterator::next`] yield the last token again.
    ///
    /// One slot deep: calling it repeatedly only affects the most recent
    /// token.
    pub fn pushback(&mut self) {
        if self.last.is_some() {
            self.pushed_back = true;
        }
    }

    /// Undoes a [`Source::pushback`].
    pub fn cancel_pushback(&mut self) {
        self.pushed_back = false;
    }

    /// Yields tokens until the tracked state's depth drops below its depth at
    /// the time of this call, i.e. consumes one balanced construct.
    ///
    /// Panics when state tracking is disabled; that is a caller bug.
    pub fn until_parser_end(&mut self) -> UntilParserEnd<'_, 'a> {
        let depth = self
            .state
            .as_ref()
            .expect("until_parser_end requires state tracking")
            .depth();
        UntilParserEnd {
            source: self,
            depth,
            finished: false,
        }
    }

    fn start_skip(&self, token: &Token) -> bool {
        match self.boundary {
            Boundary::Outside => token.end() < self.start_pos,
            Boundary::Partial => token.end() <= self.start_pos,
            Boundary::Inside => token.pos() < self.start_pos,
        }
    }

    fn end_stop(&self, token: &Token) -> bool {
        match self.boundary {
            Boundary::Outside => token.pos() > self.end_pos,
            Boundary::Partial => token.pos() >= self.end_pos,
            Boundary::Inside => token.end() > self.end_pos,
        }
    }

    /// The virtual newline between the previous line and the current one.
    fn newline(&self) -> Token {
        if self.with_position {
            Token::virtual_newline(self.doc.position(self.line) - 1)
        } else {
            let len = self
                .doc
                .text_line(self.line - 1)
                .map(|t| t.chars().count())
                .unwrap_or(0);
            Token::virtual_newline(len)
        }
    }
}

impl Iterator for Source<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pushed_back {
            self.pushed_back = false;
            return self.last.clone();
        }
        if self.done {
            return None;
        }
        loop {
            if self.pending_newline {
                self.pending_newline = false;
                let newline = self.newline();
                self.last = Some(newline.clone());
                return Some(newline);
            }
            let tokens = self.doc.tokens(self.line);
            if let Some(raw) = tokens.get(self.idx) {
                self.idx += 1;
                // The state follows every token of the line, including ones
                // the boundary filters drop.
                if let Some(state) = self.state.as_mut() {
                    self.lexicon.follow(state, raw);
                }
                let token = if self.with_position {
                    raw.at(self.doc.position(self.line) + raw.pos())
                } else {
                    raw.clone()
                };
                if self.filter_start {
                    if self.start_skip(&token) {
                        continue;
                    }
                    self.filter_start = false;
                }
                if self.end_bounded && self.line == self.end_block && self.end_stop(&token) {
                    self.done = true;
                    return None;
                }
                self.last = Some(token.clone());
                return Some(token);
            }
            if self.end_bounded && self.line == self.end_block {
                self.done = true;
                return None;
            }
            if self.line + 1 >= self.doc.block_count() {
                self.done = true;
                return None;
            }
            self.line += 1;
            self.idx = 0;
            self.filter_start = false;
            self.pending_newline = true;
        }
    }
}

/// Iterator returned by [`Source::until_parser_end`].
pub struct UntilParserEnd<'s, 'a> {
    source: &'s mut Source<'a>,
    depth: usize,
    finished: bool,
}

impl Iterator for UntilParserEnd<'_, '_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.source.next()?;
        if let Some(state) = self.source.state() {
            if state.depth() < self.depth && !self.source.pushed_back {
                self.finished = true;
            }
        }
        Some(token)
    }
}
