//! Token values and the token-kind taxonomy.
//!
//! A [`Token`] is a classified, positioned slice of one source line. Tokens own
//! their text (they are copied out of the line buffer when produced), so they
//! remain valid after the document changes; `pos` is the character offset
//! within the line, unless the token came from a `*_with_position` accessor, in
//! which case it is document-absolute.
//!
//! The taxonomy is a closed enum. Membership in the abstract categories the
//! rest of the engine cares about (space, comment, string, indent/dedent,
//! duration, matched pairs) is expressed as predicate methods rather than a
//! type hierarchy, so callers can dispatch without downcasting.

/// The name shared by the two halves of a paired spanner token.
///
/// Matching is by name *and* nesting depth: a `Slur` end closes the nearest
/// unclosed `Slur` start, independent of any brackets in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchName {
    /// `{` / `}`
    Bracket,
    /// `<<` / `>>`
    Simultaneous,
    /// `(` / `)`
    Slur,
    /// `\(` / `\)`
    PhrasingSlur,
    /// `[` / `]`
    Beam,
    /// `\[` / `\]`
    Ligature,
    /// Scheme `(` / `)`
    SchemeParen,
    /// Scheme-embedded LilyPond `#{` / `#}`
    SchemeLily,
}

/// Which half of a paired spanner a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSide {
    /// Opens the pair; the matching token lies forward in the text.
    Start,
    /// Closes the pair; the matching token lies backward in the text.
    End,
}

/// The classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TokenKind {
    // Generic kinds, shared by all grammars.
    /// Text no rule recognized; the lexer still makes progress through it.
    Unparsed,
    /// A run of whitespace.
    Space,
    /// The virtual token synthesized at line boundaries by iterators.
    Newline,
    /// Erroneous input (e.g. music syntax inside a chord that disallows it).
    Error,
    /// Comment content.
    Comment,
    /// A comment running to the end of the line.
    LineComment,
    /// Opens a multi-line comment.
    BlockCommentStart,
    /// Closes a multi-line comment.
    BlockCommentEnd,
    /// Whitespace inside a multi-line comment.
    BlockCommentSpace,
    /// Opens a quoted string.
    StringStart,
    /// Closes a quoted string.
    StringEnd,
    /// String content between the quotes.
    StringContent,
    /// An escaped character inside a string.
    StringEscape,

    // Numeric values.
    /// An unsigned integer.
    IntegerValue,
    /// A decimal number.
    DecimalValue,
    /// A fraction like `3/4`.
    Fraction,

    // LilyPond music.
    /// A pitch name.
    Note,
    /// A rest (`r` or `R`).
    Rest,
    /// An invisible rest (`s`).
    Skip,
    /// Octave marks (`'` or `,` runs).
    Octave,
    /// An octave check (`=`, optionally with octave marks).
    OctaveCheck,
    /// A reminder accidental (`!`).
    AccidentalReminder,
    /// A cautionary accidental (`?`).
    AccidentalCautionary,
    /// A duration number or named length (`4`, `8.`, `\breve` …).
    Length,
    /// An augmentation dot following a length.
    Dot,
    /// A duration scaling factor (`*2/3`).
    Scaling,
    /// A dynamic mark (`\f`, `\cresc`, `\<` …).
    Dynamic,
    /// A named articulation, ornament or script (`\staccato`, `\trill` …).
    Articulation,
    /// A direction prefix (`-`, `_`, `^`).
    Direction,
    /// A script abbreviation after a direction (`.`, `>`, `+` …).
    ScriptAbbreviation,
    /// A fingering digit after a direction.
    Fingering,
    /// A string number (`\3`).
    StringNumber,
    /// `(`
    SlurStart,
    /// `)`
    SlurEnd,
    /// `\(`
    PhrasingSlurStart,
    /// `\)`
    PhrasingSlurEnd,
    /// `~`
    Tie,
    /// `[`
    BeamStart,
    /// `]`
    BeamEnd,
    /// `\[`
    LigatureStart,
    /// `\]`
    LigatureEnd,
    /// The colon starting a tremolo.
    TremoloColon,
    /// The duration of a tremolo.
    TremoloDuration,
    /// `<` opening a chord.
    ChordStart,
    /// `>` closing a chord.
    ChordEnd,
    /// A bar check (`|`).
    PipeSymbol,
    /// `\\` separating voices.
    VoiceSeparator,

    // Brackets and other delimiters.
    /// `{`
    OpenBracket,
    /// `}`
    CloseBracket,
    /// `<<`
    OpenSimultaneous,
    /// `>>`
    CloseSimultaneous,
    /// `=`
    EqualSign,
    /// The dot in `\override Staff.Stem`.
    DotSetOverride,

    // Chord mode items.
    /// A chord modifier (`maj`, `dim` …).
    ChordModifier,
    /// `:`, `^` or `/` separating chord parts.
    ChordSeparator,
    /// A chord step number.
    ChordStepNumber,
    /// The dot separating chord steps.
    ChordDot,

    // Words and commands.
    /// A built-in keyword (`\score`, `\layout` …).
    Keyword,
    /// A built-in music command (`\clef`, `\relative`, `\times` …).
    Command,
    /// A backslashed command not in the built-in word lists.
    UserCommand,
    /// `\markup`, `\markuplines` or `\markuplist`.
    Markup,
    /// A markup command (`\bold`, `\italic` …).
    MarkupCommand,
    /// A plain word inside markup.
    MarkupWord,
    /// A variable name without backslash.
    Name,
    /// A context name (`Staff`, `Voice` …), backslashed or not.
    ContextName,
    /// A grob name (`Stem`, `NoteHead` …).
    GrobName,
    /// A context property name.
    ContextProperty,
    /// A `\paper` block variable.
    PaperVariable,
    /// A `\header` block variable.
    HeaderVariable,
    /// A `\layout`/`\midi` block variable.
    LayoutVariable,
    /// A repeat type after `\repeat` (`volta`, `unfold` …).
    RepeatSpecifier,
    /// A clef name after `\clef`.
    ClefSpecifier,
    /// A measurement unit (`\cm`, `\mm` …).
    Unit,
    /// `#` or `$` switching to Scheme.
    SchemeStart,

    // Lyric mode.
    /// A lyric syllable.
    LyricText,
    /// `--`
    LyricHyphen,
    /// `__`
    LyricExtender,
    /// `_`
    LyricSkip,
    /// `~` tying lyric syllables.
    LyricTie,

    // Scheme.
    /// Scheme `(` (including vector `#(`).
    SchemeOpenParen,
    /// Scheme `)`.
    SchemeCloseParen,
    /// `'`, `` ` `` or `,`.
    SchemeQuote,
    /// The dot in a dotted pair.
    SchemeDot,
    /// `#t` or `#f`.
    SchemeBool,
    /// A character literal (`#\a`).
    SchemeChar,
    /// A number, fraction or float.
    SchemeNumber,
    /// An unclassified Scheme word.
    SchemeWord,
    /// A special form (`define`, `lambda` …).
    SchemeKeyword,
    /// A known procedure name.
    SchemeFunction,
    /// `#{` entering LilyPond from Scheme.
    SchemeLilyStart,
    /// `#}` leaving embedded LilyPond.
    SchemeLilyEnd,

    // HTML.
    /// `<tag` or `</tag`.
    TagStart,
    /// `>` or `/>` closing a tag.
    TagEnd,
    /// An attribute name.
    AttrName,
    /// An unquoted attribute value.
    AttrValue,
    /// An entity reference (`&amp;`).
    EntityRef,
    /// One of the `<lilypond>` family of tags.
    LilypondTag,
    /// The colon separating inline LilyPond in `<lilypond: … />`.
    Colon,

    // Texinfo.
    /// An `@command`.
    TexKeyword,
    /// `@command{` opening a brace block.
    TexBlockStart,
    /// `}` closing a brace block.
    TexBlockEnd,
    /// An escape or accent construct (`@@`, `@'e` …).
    TexEscape,
    /// Content of a `@lilypond[...]` option block.
    TexAttribute,
    /// `[` opening lilypond options.
    TexAttrStart,
    /// `]` closing lilypond options.
    TexAttrEnd,
    /// Verbatim content.
    Verbatim,
}

impl TokenKind {
    /// Whitespace, including the virtual newline.
    pub fn is_space(self) -> bool {
        matches!(
            self,
            TokenKind::Space | TokenKind::Newline | TokenKind::BlockCommentSpace
        )
    }

    /// Any part of a line or block comment.
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            TokenKind::Comment
                | TokenKind::LineComment
                | TokenKind::BlockCommentStart
                | TokenKind::BlockCommentEnd
                | TokenKind::BlockCommentSpace
        )
    }

    /// Any part of a quote-delimited string.
    pub fn is_string(self) -> bool {
        matches!(
            self,
            TokenKind::StringStart | TokenKind::StringEnd | TokenKind::StringContent
        )
    }

    /// Tokens after which the following lines should indent one level more.
    pub fn is_indent(self) -> bool {
        matches!(
            self,
            TokenKind::OpenBracket
                | TokenKind::OpenSimultaneous
                | TokenKind::BlockCommentStart
                | TokenKind::SchemeOpenParen
                | TokenKind::SchemeLilyStart
        )
    }

    /// Tokens after which the following lines should indent one level less.
    pub fn is_dedent(self) -> bool {
        matches!(
            self,
            TokenKind::CloseBracket
                | TokenKind::CloseSimultaneous
                | TokenKind::BlockCommentEnd
                | TokenKind::SchemeCloseParen
                | TokenKind::SchemeLilyEnd
        )
    }

    /// Length, augmentation dot or scaling: the duration tokens of a note.
    pub fn is_duration(self) -> bool {
        matches!(
            self,
            TokenKind::Length | TokenKind::Dot | TokenKind::Scaling
        )
    }

    /// Numeric values in any grammar.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerValue
                | TokenKind::DecimalValue
                | TokenKind::Fraction
                | TokenKind::SchemeNumber
        )
    }

    /// Erroneous input recovered as a token.
    pub fn is_error(self) -> bool {
        self == TokenKind::Error
    }

    /// The pair name and side for matched spanner tokens, `None` otherwise.
    pub fn match_pair(self) -> Option<(MatchName, MatchSide)> {
        use MatchSide::{End, Start};
        Some(match self {
            TokenKind::OpenBracket => (MatchName::Bracket, Start),
            TokenKind::CloseBracket => (MatchName::Bracket, End),
            TokenKind::OpenSimultaneous => (MatchName::Simultaneous, Start),
            TokenKind::CloseSimultaneous => (MatchName::Simultaneous, End),
            TokenKind::SlurStart => (MatchName::Slur, Start),
            TokenKind::SlurEnd => (MatchName::Slur, End),
            TokenKind::PhrasingSlurStart => (MatchName::PhrasingSlur, Start),
            TokenKind::PhrasingSlurEnd => (MatchName::PhrasingSlur, End),
            TokenKind::BeamStart => (MatchName::Beam, Start),
            TokenKind::BeamEnd => (MatchName::Beam, End),
            TokenKind::LigatureStart => (MatchName::Ligature, Start),
            TokenKind::LigatureEnd => (MatchName::Ligature, End),
            TokenKind::SchemeOpenParen => (MatchName::SchemeParen, Start),
            TokenKind::SchemeCloseParen => (MatchName::SchemeParen, End),
            TokenKind::SchemeLilyStart => (MatchName::SchemeLily, Start),
            TokenKind::SchemeLilyEnd => (MatchName::SchemeLily, End),
            _ => return None,
        })
    }
}

/// A classified, positioned slice of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
    pos: usize,
}

impl Token {
    /// Creates a token. `pos` is a character offset.
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            pos,
        }
    }

    /// The virtual newline token iterators synthesize at line boundaries.
    pub fn virtual_newline(pos: usize) -> Self {
        Self::new(TokenKind::Newline, "\n", pos)
    }

    /// The token's classification.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The token's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Start offset, in characters.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// `true` for tokens with no text (never produced by the lexer).
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Exclusive end offset, in characters.
    pub fn end(&self) -> usize {
        self.pos + self.len()
    }

    /// The same token shifted to a new start offset (e.g. line-relative to
    /// document-absolute).
    pub fn at(&self, pos: usize) -> Self {
        Self {
            kind: self.kind,
            text: self.text.clone(),
            pos,
        }
    }
}
