//! Grammar modes (file dialects) and content-based mode guessing.

use crate::state::ParserId;

/// The grammar dialect a document is lexed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// LilyPond notation source.
    Lilypond,
    /// A standalone Scheme file.
    Scheme,
    /// HTML with embedded LilyPond (`<lilypond>` tags).
    Html,
    /// Texinfo with embedded LilyPond (`@lilypond` blocks).
    Texinfo,
}

impl Mode {
    /// All modes, in guessing priority order.
    pub const ALL: &'static [Mode] = &[Mode::Lilypond, Mode::Scheme, Mode::Html, Mode::Texinfo];

    /// The root grammar context for this mode.
    pub fn initial_parser(self) -> ParserId {
        match self {
            Mode::Lilypond => ParserId::LyGlobal,
            Mode::Scheme => ParserId::SchemeMain,
            Mode::Html => ParserId::HtmlMain,
            Mode::Texinfo => ParserId::TexinfoMain,
        }
    }

    /// The canonical lowercase name of the mode.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Lilypond => "lilypond",
            Mode::Scheme => "scheme",
            Mode::Html => "html",
            Mode::Texinfo => "texinfo",
        }
    }

    /// Looks a mode up by name.
    pub fn from_name(name: &str) -> Option<Mode> {
        Mode::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// Picks a mode from a filename extension, if it is a known one.
    pub fn for_filename(filename: &str) -> Option<Mode> {
        let ext = filename.rsplit('.').next()?;
        match ext {
            "ly" | "ily" | "lyi" => Some(Mode::Lilypond),
            "scm" => Some(Mode::Scheme),
            "html" | "htm" | "xml" => Some(Mode::Html),
            "texi" | "texinfo" | "itexi" => Some(Mode::Texinfo),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Guesses the mode of a text from its first non-blank characters.
///
/// The heuristic: leading `%` or `\` reads as LilyPond, `<` as HTML, `#!`,
/// `;` or `(` as Scheme, `@` as Texinfo; anything else defaults to LilyPond.
/// Documents without an explicit mode re-run this on every committed edit.
pub fn guess_mode(text: &str) -> Mode {
    let text = text.trim_start();
    if text.starts_with('%') || text.starts_with('\\') {
        Mode::Lilypond
    } else if text.starts_with('<') {
        Mode::Html
    } else if text.starts_with("#!") || text.starts_with(';') || text.starts_with('(') {
        Mode::Scheme
    } else if text.starts_with('@') {
        Mode::Texinfo
    } else {
        Mode::Lilypond
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mode() {
        assert_eq!(guess_mode("\\version \"2.24.0\"\n"), Mode::Lilypond);
        assert_eq!(guess_mode("% a comment\n{ c }"), Mode::Lilypond);
        assert_eq!(guess_mode("  <html>\n<body>"), Mode::Html);
        assert_eq!(guess_mode("; scheme comment"), Mode::Scheme);
        assert_eq!(guess_mode("(define x 1)"), Mode::Scheme);
        assert_eq!(guess_mode("@node Top"), Mode::Texinfo);
        assert_eq!(guess_mode("{ c d e }"), Mode::Lilypond);
        assert_eq!(guess_mode(""), Mode::Lilypond);
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_name(mode.name()), Some(*mode));
        }
        assert_eq!(Mode::from_name("docbook"), None);
    }

    #[test]
    fn test_mode_for_filename() {
        assert_eq!(Mode::for_filename("score.ly"), Some(Mode::Lilypond));
        assert_eq!(Mode::for_filename("lib.ily"), Some(Mode::Lilypond));
        assert_eq!(Mode::for_filename("init.scm"), Some(Mode::Scheme));
        assert_eq!(Mode::for_filename("page.html"), Some(Mode::Html));
        assert_eq!(Mode::for_filename("manual.texi"), Some(Mode::Texinfo));
        assert_eq!(Mode::for_filename("README"), None);
    }
}
