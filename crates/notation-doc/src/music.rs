//! Scanning music items (notes, rests, skips, chords) and their durations.
//!
//! This is the reader side of duration editing: it walks a cursor's range
//! with a state-tracking [`Source`] and groups the tokens belonging to one
//! musical item, collecting its duration tokens separately so a transform can
//! rewrite or extract them.

use notation_lex::{ParserId, Token, TokenKind};

use crate::cursor::Cursor;
use crate::document::Document;
use crate::runner::Runner;
use crate::source::{Boundary, Source, TrackState};

/// One music item with a (possibly implicit) duration.
#[derive(Debug, Clone)]
pub struct MusicItem {
    /// The item's tokens, except durations.
    pub tokens: Vec<Token>,
    /// The item's duration tokens (length, dots, scaling).
    pub dur_tokens: Vec<Token>,
    /// Whether the duration may be removed without changing meaning.
    pub may_remove: bool,
    /// Where a duration could be inserted.
    pub insert_pos: usize,
    /// Document-absolute start of the item.
    pub pos: usize,
    /// Document-absolute end of the item.
    pub end: usize,
}

/// Options for [`music_items`].
#[derive(Debug, Clone, Copy)]
pub struct ItemOptions {
    /// Include pitches in `\relative`, `\transpose` etc. arguments.
    pub command: bool,
    /// Include pitches inside chords.
    pub chord: bool,
    /// Boundary policy for the cursor's range.
    pub boundary: Boundary,
}

impl Default for ItemOptions {
    fn default() -> Self {
        Self {
            command: false,
            chord: false,
            boundary: Boundary::Inside,
        }
    }
}

/// Tokens that can begin a music item.
fn is_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Rest
            | TokenKind::Skip
            | TokenKind::Note
            | TokenKind::ChordEnd
            | TokenKind::Octave
            | TokenKind::OctaveCheck
            | TokenKind::AccidentalReminder
            | TokenKind::AccidentalCautionary
    ) || kind.is_duration()
}

/// Tokens that continue the current music item.
fn is_stay(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Octave
            | TokenKind::OctaveCheck
            | TokenKind::AccidentalReminder
            | TokenKind::AccidentalCautionary
            | TokenKind::Tie
    ) || kind.is_duration()
}

fn make_item(tokens: &[Token]) -> MusicItem {
    let pos = tokens[0].pos();
    let end = tokens[tokens.len() - 1].end();
    let mut plain = Vec::new();
    let mut dur = Vec::new();
    for token in tokens {
        if token.kind().is_duration() {
            dur.push(token.clone());
        } else {
            plain.push(token.clone());
        }
    }
    let may_remove = !plain
        .iter()
        .any(|t| matches!(t.text(), "\\skip" | "\\tempo" | "\\tuplet" | "\\partial"));
    let insert_pos = if let Some(first_dur) = dur.first() {
        first_dur.pos()
    } else {
        plain
            .iter()
            .rev()
            .find(|t| t.kind() != TokenKind::Tie)
            .or_else(|| plain.last())
            .map(|t| t.end())
            .unwrap_or(end)
    };
    MusicItem {
        tokens: plain,
        dur_tokens: dur,
        may_remove,
        insert_pos,
        pos,
        end,
    }
}

/// Collects the music items in a cursor's range.
///
/// Pitch-command arguments and chord contents are skipped unless enabled in
/// `options`; the duration of a `\tuplet` fraction belongs to the `\tuplet`
/// item, not the following note.
pub fn music_items(doc: &Document, cursor: Cursor, options: ItemOptions) -> Vec<MusicItem> {
    let mut source = Source::new(doc, cursor, TrackState::FromDocument, options.boundary, true);
    let mut items = Vec::new();

    let skip_parser = |parser: ParserId| {
        (!options.command && parser == ParserId::LyPitchCommand)
            || (!options.chord && parser == ParserId::LyChord)
    };

    'outer: loop {
        let Some(first) = source.next() else { break };
        if source.state().is_some_and(|s| skip_parser(s.parser())) {
            continue;
        }
        let mut token = first;

        if token.text() == "\\tuplet" {
            let mut item = vec![token.clone()];
            let mut exhausted = true;
            while let Some(t) = source.next() {
                token = t;
                if token.kind().is_duration() {
                    item.push(token.clone());
                    while let Some(t2) = source.next() {
                        token = t2;
                        if !token.kind().is_duration() {
                            exhausted = false;
                            break;
                        }
                        item.push(token.clone());
                    }
                    break;
                } else if token.kind().is_numeric() {
                    item.push(token.clone());
                } else if !token.kind().is_space() {
                    exhausted = false;
                    break;
                }
            }
            items.push(make_item(&item));
            if exhausted {
                break 'outer;
            }
        }

        let mut length_seen = false;
        while is_start(token.kind()) {
            let mut item = vec![token.clone()];
            if token.kind() == TokenKind::Length {
                length_seen = true;
            }
            let mut exhausted = true;
            while let Some(t) = source.next() {
                token = t;
                if token.kind() == TokenKind::Length {
                    if length_seen {
                        items.push(make_item(&item));
                        length_seen = false;
                        exhausted = false;
                        break;
                    }
                    length_seen = true;
                } else if token.kind().is_space() {
                    continue;
                } else if token.kind() == TokenKind::ChordSeparator {
                    // the bass note of chordmode "c/g" is not an item
                    while let Some(t2) = source.next() {
                        if !(t2.kind().is_space() || t2.kind() == TokenKind::Note) {
                            break;
                        }
                    }
                    continue;
                } else if !is_stay(token.kind()) {
                    items.push(make_item(&item));
                    length_seen = false;
                    exhausted = false;
                    break;
                }
                item.push(token.clone());
            }
            if exhausted {
                items.push(make_item(&item));
                break 'outer;
            }
        }
    }

    items
}

/// The duration tokens immediately preceding the cursor, closest first in
/// text order. Empty when no duration precedes it.
pub fn preceding_duration(doc: &Document, cursor: Cursor) -> Vec<Token> {
    let mut runner = Runner::at(doc, cursor, false, false);
    while let Some(token) = runner.backward() {
        if token.kind().is_duration() {
            let mut durations = vec![token];
            while let Some(t) = runner.backward() {
                if t.kind().is_duration() {
                    durations.push(t);
                } else if !t.kind().is_space() {
                    break;
                }
            }
            durations.reverse();
            return durations;
        }
    }
    Vec::new()
}

/// The written duration of every music item in the cursor's range, as one
/// string per item (ties included, empty where the duration is implicit).
///
/// When the first item has no written duration, the duration in effect is
/// looked up backward from the cursor, defaulting to `"4"`.
pub fn extract_durations(doc: &Document, cursor: Cursor) -> Vec<String> {
    let items = music_items(doc, cursor, ItemOptions::default());
    let mut durations: Vec<Vec<Token>> = items
        .iter()
        .map(|item| {
            let mut tokens = item.dur_tokens.clone();
            tokens.extend(
                item.tokens
                    .iter()
                    .filter(|t| t.kind() == TokenKind::Tie)
                    .cloned(),
            );
            tokens
        })
        .collect();
    if let Some(first) = durations.first() {
        if first.is_empty() {
            let preceding = preceding_duration(doc, cursor);
            durations[0] = if preceding.is_empty() {
                vec![Token::new(TokenKind::Length, "4", 0)]
            } else {
                preceding
            };
        }
    }
    durations
        .into_iter()
        .map(|tokens| tokens.iter().map(|t| t.text()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_music_items_basic() {
        let doc = Document::new("{ c4 d e8. f }", None);
        let items = music_items(&doc, Cursor::all(), ItemOptions::default());
        let durations: Vec<String> = items
            .iter()
            .map(|i| i.dur_tokens.iter().map(|t| t.text()).collect())
            .collect();
        assert_eq!(durations, vec!["4", "", "8.", ""]);
        assert!(items.iter().all(|i| i.may_remove));
    }

    #[test]
    fn test_chord_counts_as_one_item() {
        let doc = Document::new("{ <c e g>2 d }", None);
        let items = music_items(&doc, Cursor::all(), ItemOptions::default());
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].tokens[0].text(), ">");
        assert_eq!(items[0].dur_tokens[0].text(), "2");
    }

    #[test]
    fn test_relative_pitch_is_skipped() {
        let doc = Document::new("\\relative c' { d4 e }", None);
        let items = music_items(&doc, Cursor::all(), ItemOptions::default());
        // the "c'" argument of \relative is not an item
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].tokens[0].text(), "d");
    }

    #[test]
    fn test_insert_pos_of_durationless_item() {
        let doc = Document::new("{ cis d4 }", None);
        let items = music_items(&doc, Cursor::all(), ItemOptions::default());
        // "cis" ends at offset 5; a duration would be inserted there
        assert_eq!(items[0].insert_pos, 5);
        assert_eq!(items[1].insert_pos, doc.plaintext().find('4').unwrap());
    }

    #[test]
    fn test_extract_durations_spec_scenario() {
        let doc = Document::new("\\relative{<c d>8 c[ d4 e] f\\)]}", None);
        let durations = extract_durations(&doc, Cursor::all());
        assert_eq!(durations, vec!["8", "", "4", "", ""]);
    }

    #[test]
    fn test_extract_durations_substitutes_preceding() {
        let doc = Document::new("{ c2 d e }", None);
        // select only "d e"
        let start = doc.plaintext().find('d').unwrap();
        let durations = extract_durations(&doc, Cursor::new(start, None));
        assert_eq!(durations, vec!["2", ""]);
    }

    #[test]
    fn test_extract_durations_defaults_to_quarter() {
        let doc = Document::new("{ d e }", None);
        let start = doc.plaintext().find('d').unwrap();
        let durations = extract_durations(&doc, Cursor::new(start, None));
        assert_eq!(durations, vec!["4", ""]);
    }

    #[test]
    fn test_tuplet_duration_belongs_to_tuplet() {
        let doc = Document::new("{ \\tuplet 3/2 { c8 d e } }", None);
        let items = music_items(&doc, Cursor::all(), ItemOptions::default());
        let tuplet = &items[0];
        assert_eq!(tuplet.tokens[0].text(), "\\tuplet");
        assert!(!tuplet.may_remove);
        // the notes keep their own durations
        let durations: Vec<String> = items[1..]
            .iter()
            .map(|i| i.dur_tokens.iter().map(|t| t.text()).collect())
            .collect();
        assert_eq!(durations, vec!["8", "", ""]);
    }

    #[test]
    fn test_ties_are_part_of_extraction() {
        let doc = Document::new("{ c2~ c }", None);
        let durations = extract_durations(&doc, Cursor::all());
        assert_eq!(durations, vec!["2~", ""]);
    }
}
