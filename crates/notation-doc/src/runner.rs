//! The Runner: a bidirectional token cursor over a whole document.
//!
//! A Runner can be parked at any offset and then stepped token by token in
//! either direction, crossing line boundaries. At each boundary it yields a
//! virtual newline token, so callers looking for line breaks need not track
//! block changes themselves. Stepping never skips blank lines; they simply
//! contribute no tokens between two newlines.

use notation_lex::Token;

use crate::cursor::Cursor;
use crate::document::Document;

/// A stateful bidirectional token iterator.
///
/// Cloning yields an independent runner at the same position, which is how
/// lookahead is done without losing one's place.
#[derive(Clone)]
pub struct Runner<'a> {
    doc: &'a Document,
    line: usize,
    /// Index of the current token; -1 is "before the first token", the token
    /// count is "past the last token".
    index: isize,
    with_position: bool,
}

impl<'a> Runner<'a> {
    /// A runner at the start of the document.
    ///
    /// With `with_position`, yielded tokens carry document-absolute offsets
    /// instead of line-relative ones.
    pub fn new(doc: &'a Document, with_position: bool) -> Self {
        Self {
            doc,
            line: 0,
            index: -1,
            with_position,
        }
    }

    /// A runner parked at a cursor's start position.
    ///
    /// With `after_token == false`, the next [`Runner::forward`] yields the
    /// first token that starts at or after the position; with
    /// `after_token == true` the runner is placed after the token covering
    /// the position, so [`Runner::backward`] yields it.
    pub fn at(doc: &'a Document, cursor: Cursor, after_token: bool, with_position: bool) -> Self {
        let mut runner = Self::new(doc, with_position);
        runner.set_position(cursor.start, after_token);
        runner
    }

    /// The document this runner walks.
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// The line the runner is currently on.
    pub fn current_block(&self) -> usize {
        self.line
    }

    /// Parks the runner at the given character offset; see [`Runner::at`].
    pub fn set_position(&mut self, position: usize, after_token: bool) {
        let line = self.doc.block_index_at(position);
        self.move_to_block(line, false);
        if after_token {
            while let Some(token) = self.forward_within_line() {
                if self.position() + token.len() >= position {
                    self.index += 1;
                    break;
                }
            }
        } else {
            while let Some(token) = self.forward_within_line() {
                if self.position() + token.len() > position {
                    self.index -= 1;
                    break;
                }
            }
        }
    }

    /// Parks the runner at the start (or past the end) of a line. Returns
    /// `false` for an invalid line.
    pub fn move_to_block(&mut self, line: usize, at_end: bool) -> bool {
        if line >= self.doc.block_count() {
            return false;
        }
        self.line = line;
        self.index = if at_end {
            self.doc.tokens(line).len() as isize
        } else {
            -1
        };
        true
    }

    /// The next token, crossing line boundaries with a virtual newline.
    /// `None` at the document end.
    pub fn forward(&mut self) -> Option<Token> {
        self.advance(false)
    }

    /// The next token on the current line only.
    pub fn forward_within_line(&mut self) -> Option<Token> {
        self.advance(true)
    }

    /// The previous token, crossing line boundaries with a virtual newline.
    /// `None` at the document start.
    pub fn backward(&mut self) -> Option<Token> {
        self.retreat(false)
    }

    /// The previous token on the current line only.
    pub fn backward_within_line(&mut self) -> Option<Token> {
        self.retreat(true)
    }

    fn advance(&mut self, current_block: bool) -> Option<Token> {
        let tokens = self.doc.tokens(self.line);
        if self.index + 1 < tokens.len() as isize {
            self.index += 1;
            return Some(self.adjust(tokens[self.index as usize].clone()));
        }
        if current_block {
            return None;
        }
        // The newline sits at the end of the line we are leaving.
        let newline = self.newline();
        if !self.next_block() {
            return None;
        }
        Some(newline)
    }

    fn retreat(&mut self, current_block: bool) -> Option<Token> {
        let tokens = self.doc.tokens(self.line);
        if self.index > 0 && !tokens.is_empty() {
            self.index -= 1;
            return Some(self.adjust(tokens[self.index as usize].clone()));
        }
        if current_block || !self.previous_block() {
            return None;
        }
        Some(self.newline())
    }

    /// Moves to the next line, at its start by default. Returns `false` at
    /// the last line.
    pub fn next_block(&mut self) -> bool {
        self.move_to_block(self.line + 1, false)
    }

    /// Moves to the previous line, past its end by default. Returns `false`
    /// at the first line.
    pub fn previous_block(&mut self) -> bool {
        if self.line == 0 {
            return false;
        }
        self.move_to_block(self.line - 1, true)
    }

    /// Re-returns the token the runner currently points at, if the line has
    /// any.
    pub fn token(&self) -> Option<Token> {
        let tokens = self.doc.tokens(self.line);
        if tokens.is_empty() {
            return None;
        }
        let index = self.index.clamp(0, tokens.len() as isize - 1) as usize;
        Some(self.adjust(tokens[index].clone()))
    }

    /// The document-absolute position of the current token (the line start
    /// for a line without tokens).
    pub fn position(&self) -> usize {
        let tokens = self.doc.tokens(self.line);
        if tokens.is_empty() {
            return self.doc.position(self.line);
        }
        let index = self.index.clamp(0, tokens.len() as isize - 1) as usize;
        self.doc.position(self.line) + tokens[index].pos()
    }

    /// An independent runner at the same position.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    fn adjust(&self, token: Token) -> Token {
        if self.with_position {
            let position = self.doc.position(self.line);
            let pos = token.pos();
            token.at(position + pos)
        } else {
            token
        }
    }

    /// The virtual newline at the end of the current line.
    fn newline(&self) -> Token {
        let mut pos = self
            .doc
            .text_line(self.line)
            .map(|t| t.chars().count())
            .unwrap_or(0);
        if self.with_position {
            pos += self.doc.position(self.line);
        }
        Token::virtual_newline(pos)
    }
}
