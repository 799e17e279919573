#![warn(missing_docs)]
//! `notation-doc` - A mutable, always-tokenized music-notation source document
//!
//! # Overview
//!
//! A [`Document`] holds LilyPond (or Scheme/HTML/Texinfo) source as a
//! sequence of lines, each with cached tokens and the frozen lexer state at
//! its end. Edits are queued in a transaction and applied atomically; only
//! the lines an edit actually affects are re-lexed, and registered
//! [`Cursor`]s are adjusted so they stay meaningful across the change.
//!
//! On top of the document sit two token iterators:
//!
//! - [`Runner`] - bidirectional, single-token stepping over the whole
//!   document, for local lookback/lookahead (bracket matching, indentation).
//! - [`Source`] - forward, cursor-scoped, with a boundary policy
//!   ([`Boundary`]) and optional state tracking; the basis for all editing
//!   transforms. [`music_items`] / [`extract_durations`] are the music-aware
//!   scanner built on it.
//!
//! # Example
//!
//! ```rust
//! use notation_doc::{Cursor, Document};
//!
//! let mut doc = Document::new("{ c4 d e }", None);
//! let id = doc.create_cursor(Cursor::new(2, Some(4)));
//!
//! let mut edit = doc.edit();
//! edit.insert(0, "\\relative ");
//! edit.commit().unwrap();
//!
//! assert_eq!(doc.plaintext(), "\\relative { c4 d e }");
//! // the registered cursor still covers "c4"
//! let cursor = doc.cursor(id).unwrap();
//! assert_eq!(cursor.text(&doc), "c4");
//! ```
//!
//! All offsets are character offsets; text is LF-normalized on load (`\r` is
//! stripped) and [`Document::plaintext`] round-trips it exactly.

mod cursor;
mod document;
mod music;
mod runner;
mod source;

pub use cursor::{Cursor, CursorId};
pub use document::{Document, EditError, EditSession, LoadError};
pub use music::{extract_durations, music_items, preceding_duration, ItemOptions, MusicItem};
pub use runner::Runner;
pub use source::{Boundary, Source, TrackState, UntilParserEnd};
