//! Selecting music with a Source and extracting items and durations.

use notation_doc::{music_items, Boundary, Cursor, Document, ItemOptions, Source, TrackState};
use notation_lex::TokenKind;
use pretty_assertions::assert_eq;

#[test]
fn test_music_items_report_exact_offsets() {
    //        0123456789012345
    let doc = Document::new("{ a!4 ( bf'16) }", None);
    // select from the first note through the closing slur
    let cursor = Cursor::new(2, Some(13));
    let items = music_items(&doc, cursor, ItemOptions::default());

    assert_eq!(items.len(), 2);

    let first = &items[0];
    let texts: Vec<&str> = first.tokens.iter().map(|t| t.text()).collect();
    assert_eq!(texts, vec!["a", "!"]);
    assert_eq!(first.tokens[0].kind(), TokenKind::Note);
    assert_eq!(first.tokens[1].kind(), TokenKind::AccidentalReminder);
    assert_eq!(first.dur_tokens[0].text(), "4");
    assert_eq!((first.pos, first.end), (2, 5));
    assert_eq!(first.tokens[0].pos(), 2);
    assert_eq!(first.dur_tokens[0].pos(), 4);

    let second = &items[1];
    let texts: Vec<&str> = second.tokens.iter().map(|t| t.text()).collect();
    assert_eq!(texts, vec!["bf", "'"]);
    assert_eq!(second.tokens[1].kind(), TokenKind::Octave);
    assert_eq!(second.dur_tokens[0].text(), "16");
    assert_eq!((second.pos, second.end), (8, 13));
    assert_eq!(second.dur_tokens[0].pos(), 11);
}

#[test]
fn test_inside_selection_excludes_straddling_tokens() {
    let doc = Document::new("{ a!4 ( bf'16) }", None);
    // cut into the middle of "bf": Inside drops it, Partial keeps it
    let cursor = Cursor::new(9, Some(13));

    let inside: Vec<String> = Source::new(&doc, cursor, TrackState::No, Boundary::Inside, true)
        .map(|t| t.text().to_string())
        .collect();
    assert_eq!(inside, vec!["'", "16"]);

    let partial: Vec<String> = Source::new(&doc, cursor, TrackState::No, Boundary::Partial, true)
        .map(|t| t.text().to_string())
        .collect();
    assert_eq!(partial, vec!["bf", "'", "16"]);

    let outside: Vec<String> = Source::new(&doc, cursor, TrackState::No, Boundary::Outside, true)
        .map(|t| t.text().to_string())
        .collect();
    assert_eq!(outside, vec!["bf", "'", "16", ")"]);
}

#[test]
fn test_items_respect_selection_boundaries() {
    let doc = Document::new("{ c4 d4 e4 f4 }", None);
    let text = doc.plaintext();
    // select "d4 e4" only
    let start = text.find('d').unwrap();
    let end = text.find('e').unwrap() + 2;
    let items = music_items(&doc, Cursor::new(start, Some(end)), ItemOptions::default());
    let starts: Vec<&str> = items.iter().map(|i| i.tokens[0].text()).collect();
    assert_eq!(starts, vec!["d", "e"]);
}

#[test]
fn test_chord_contents_skipped_unless_enabled() {
    let doc = Document::new("{ <c e g>4 }", None);

    let without = music_items(&doc, Cursor::all(), ItemOptions::default());
    assert_eq!(without.len(), 1);
    assert_eq!(without[0].tokens[0].text(), ">");

    let with_chord = music_items(
        &doc,
        Cursor::all(),
        ItemOptions {
            chord: true,
            ..ItemOptions::default()
        },
    );
    // each chord note is now an item of its own, plus the chord end
    assert!(with_chord.len() > 1);
    assert_eq!(with_chord[0].tokens[0].text(), "c");
}

#[test]
fn test_items_across_line_break() {
    let doc = Document::new("{ c4\nd e }", None);
    let items = music_items(&doc, Cursor::all(), ItemOptions::default());
    let starts: Vec<&str> = items.iter().map(|i| i.tokens[0].text()).collect();
    assert_eq!(starts, vec!["c", "d", "e"]);
}
