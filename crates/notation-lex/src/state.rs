//! The lexer state: a stack of grammar contexts.
//!
//! Lexing a line both consumes the line and transforms a [`State`]; caching a
//! state is just cloning it, and two states compare equal exactly when lexing
//! any further text from either would produce identical tokens. That
//! structural equality is what lets the document stop incremental re-lexing
//! early.

use crate::mode::Mode;

/// Identifies one grammar context (one entry on the state stack).
///
/// Contexts are closed grammar data: each has a rule table, a default token
/// kind for unmatched text, and possibly a fallthrough action (see
/// [`crate::lexer::Lexicon`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ParserId {
    // LilyPond
    /// Top level of a LilyPond file.
    LyGlobal,
    /// A music expression (`{ … }` or `<< … >>`).
    LyMusic,
    /// Inside a chord `< … >`.
    LyChord,
    /// Inside a double-quoted string.
    LyString,
    /// Inside a `%{ … %}` comment.
    LyBlockComment,
    /// Inside markup; the argument count tracks how many arguments remain.
    LyMarkup,
    /// Inside `\score { … }`.
    LyScore,
    /// After `\score`, waiting for `{`.
    LyExpectScore,
    /// Inside `\book { … }`.
    LyBook,
    /// After `\book`, waiting for `{`.
    LyExpectBook,
    /// Inside `\bookpart { … }`.
    LyBookPart,
    /// After `\bookpart`, waiting for `{`.
    LyExpectBookPart,
    /// Inside `\paper { … }`.
    LyPaper,
    /// After `\paper`, waiting for `{`.
    LyExpectPaper,
    /// Inside `\header { … }`.
    LyHeader,
    /// After `\header`, waiting for `{`.
    LyExpectHeader,
    /// Inside `\layout { … }`.
    LyLayout,
    /// After `\layout`, waiting for `{`.
    LyExpectLayout,
    /// Inside `\midi { … }`.
    LyMidi,
    /// After `\midi`, waiting for `{`.
    LyExpectMidi,
    /// Inside `\with { … }`.
    LyWith,
    /// After `\with`, waiting for `{`.
    LyExpectWith,
    /// Inside `\context { … }` of a layout block.
    LyContext,
    /// After layout `\context`, waiting for `{`.
    LyExpectContext,
    /// After `\repeat`, reading the type and count.
    LyRepeat,
    /// After a length, reading augmentation dots.
    LyDuration,
    /// After the dots, reading a scaling factor.
    LyDurationScaling,
    /// After `\override`, up to the equal sign.
    LyOverride,
    /// After `\revert`.
    LyRevert,
    /// After `\set`, up to the equal sign.
    LySet,
    /// After `\unset`.
    LyUnset,
    /// After `\new`, `\context` or `\change`, reading the context name.
    LyTranslator,
    /// After the translator's context name, waiting for `=`.
    LyExpectTranslatorId,
    /// After the `=`, reading the translator id.
    LyTranslatorId,
    /// After `\clef`, reading the clef name.
    LyClef,
    /// After a direction, reading a script abbreviation or fingering.
    LyScriptOrFingering,
    /// After a lyric-mode command, waiting for `{`.
    LyExpectLyricMode,
    /// Inside lyric mode.
    LyLyricMode,
    /// After a chord-mode command, waiting for `{`.
    LyExpectChordMode,
    /// Inside chord mode.
    LyChordMode,
    /// After a chord separator, reading modifiers and steps.
    LyChordItems,
    /// After a note-mode command, waiting for `{`.
    LyExpectNoteMode,
    /// Inside note mode.
    LyNoteMode,
    /// After a drum-mode command, waiting for `{`.
    LyExpectDrumMode,
    /// Inside drum mode.
    LyDrumMode,
    /// After a figure-mode command, waiting for `{`.
    LyExpectFigureMode,
    /// Inside figure mode.
    LyFigureMode,
    /// After `\relative`, `\transpose` etc., reading pitch arguments.
    LyPitchCommand,
    /// After a tremolo colon, reading the duration.
    LyTremolo,

    // Scheme
    /// A Scheme expression.
    SchemeMain,
    /// Inside a Scheme string.
    SchemeString,
    /// Inside a `#! … !#` comment.
    SchemeBlockComment,
    /// Inside `#{ … #}` embedded LilyPond.
    SchemeLily,

    // HTML
    /// Top level of an HTML file.
    HtmlMain,
    /// Inside a tag, reading attributes.
    HtmlAttr,
    /// Inside a double-quoted attribute value.
    HtmlStringDq,
    /// Inside a single-quoted attribute value.
    HtmlStringSq,
    /// Inside `<!-- … -->`.
    HtmlComment,
    /// After `=`, reading an unquoted attribute value.
    HtmlValue,
    /// Inside a `<lilypond …>` tag, reading attributes.
    HtmlLilypondAttr,
    /// Inside a `<lilypondfile …>` tag, reading attributes.
    HtmlLilypondFileOptions,
    /// LilyPond between `<lilypond>` and `</lilypond>`.
    HtmlLilypond,
    /// Inline LilyPond in `<lilypond: … />`.
    HtmlLilypondInline,

    // Texinfo
    /// Top level of a Texinfo file.
    TexinfoMain,
    /// Inside `@ignore … @end ignore`.
    TexinfoComment,
    /// Inside an `@command{ … }` brace block.
    TexinfoBlock,
    /// Inside `@verbatim … @end verbatim`.
    TexinfoVerbatim,
    /// After `@lilypond`, reading `[options]` before `{`.
    TexinfoLilypondBlockAttr,
    /// After environment-style `@lilypond`, reading `[options]`.
    TexinfoLilypondEnvAttr,
    /// Inside the `[options]` of a lilypond block.
    TexinfoLilypondAttr,
    /// After `@lilypondfile`, reading `[options]` before `{`.
    TexinfoLilypondFile,
    /// LilyPond inside `@lilypond{ … }`.
    TexinfoLilypondBlock,
    /// LilyPond inside `@lilypond … @end lilypond`.
    TexinfoLilypondEnv,
}

impl ParserId {
    /// Every context, in declaration order. The discriminant doubles as the
    /// index into the compiled [`crate::lexer::Lexicon`] tables.
    pub const ALL: &'static [ParserId] = &[
        ParserId::LyGlobal,
        ParserId::LyMusic,
        ParserId::LyChord,
        ParserId::LyString,
        ParserId::LyBlockComment,
        ParserId::LyMarkup,
        ParserId::LyScore,
        ParserId::LyExpectScore,
        ParserId::LyBook,
        ParserId::LyExpectBook,
        ParserId::LyBookPart,
        ParserId::LyExpectBookPart,
        ParserId::LyPaper,
        ParserId::LyExpectPaper,
        ParserId::LyHeader,
        ParserId::LyExpectHeader,
        ParserId::LyLayout,
        ParserId::LyExpectLayout,
        ParserId::LyMidi,
        ParserId::LyExpectMidi,
        ParserId::LyWith,
        ParserId::LyExpectWith,
        ParserId::LyContext,
        ParserId::LyExpectContext,
        ParserId::LyRepeat,
        ParserId::LyDuration,
        ParserId::LyDurationScaling,
        ParserId::LyOverride,
        ParserId::LyRevert,
        ParserId::LySet,
        ParserId::LyUnset,
        ParserId::LyTranslator,
        ParserId::LyExpectTranslatorId,
        ParserId::LyTranslatorId,
        ParserId::LyClef,
        ParserId::LyScriptOrFingering,
        ParserId::LyExpectLyricMode,
        ParserId::LyLyricMode,
        ParserId::LyExpectChordMode,
        ParserId::LyChordMode,
        ParserId::LyChordItems,
        ParserId::LyExpectNoteMode,
        ParserId::LyNoteMode,
        ParserId::LyExpectDrumMode,
        ParserId::LyDrumMode,
        ParserId::LyExpectFigureMode,
        ParserId::LyFigureMode,
        ParserId::LyPitchCommand,
        ParserId::LyTremolo,
        ParserId::SchemeMain,
        ParserId::SchemeString,
        ParserId::SchemeBlockComment,
        ParserId::SchemeLily,
        ParserId::HtmlMain,
        ParserId::HtmlAttr,
        ParserId::HtmlStringDq,
        ParserId::HtmlStringSq,
        ParserId::HtmlComment,
        ParserId::HtmlValue,
        ParserId::HtmlLilypondAttr,
        ParserId::HtmlLilypondFileOptions,
        ParserId::HtmlLilypond,
        ParserId::HtmlLilypondInline,
        ParserId::TexinfoMain,
        ParserId::TexinfoComment,
        ParserId::TexinfoBlock,
        ParserId::TexinfoVerbatim,
        ParserId::TexinfoLilypondBlockAttr,
        ParserId::TexinfoLilypondEnvAttr,
        ParserId::TexinfoLilypondAttr,
        ParserId::TexinfoLilypondFile,
        ParserId::TexinfoLilypondBlock,
        ParserId::TexinfoLilypondEnv,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// The grammar dialect this context belongs to, if it carries one.
    ///
    /// Helper contexts (strings, comments, argument readers) carry none; the
    /// effective mode at a point in the text is that of the innermost context
    /// that has one, see [`State::mode`].
    pub fn mode(self) -> Option<Mode> {
        use ParserId::*;
        match self {
            LyGlobal | LyMusic | LyChord | LyScore | LyExpectScore | LyBook | LyExpectBook
            | LyBookPart | LyExpectBookPart | LyPaper | LyExpectPaper | LyHeader
            | LyExpectHeader | LyLayout | LyExpectLayout | LyMidi | LyExpectMidi | LyWith
            | LyExpectWith | LyContext | LyExpectContext | LyOverride | LySet | LyLyricMode
            | LyChordMode | LyNoteMode | LyDrumMode | LyFigureMode | SchemeLily
            | HtmlLilypond | HtmlLilypondInline | TexinfoLilypondBlock | TexinfoLilypondEnv => {
                Some(Mode::Lilypond)
            }
            SchemeMain => Some(Mode::Scheme),
            HtmlMain => Some(Mode::Html),
            TexinfoMain => Some(Mode::Texinfo),
            _ => None,
        }
    }
}

/// One entry of the state stack: a context plus its pending argument count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// The active context.
    pub parser: ParserId,
    /// Arguments still expected before the context auto-closes.
    pub argcount: u16,
}

/// The full lexer state: an ordered stack of [`Frame`]s.
///
/// The bottom frame is the mode's root context and is never popped. Cloning is
/// cheap (the stack is rarely more than a handful of frames deep) and clones
/// are what the document caches per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    stack: Vec<Frame>,
}

impl State {
    /// A state with a single root context.
    pub fn new(initial: ParserId) -> Self {
        Self {
            stack: vec![Frame {
                parser: initial,
                argcount: 0,
            }],
        }
    }

    /// The initial state for a grammar mode.
    pub fn for_mode(mode: Mode) -> Self {
        Self::new(mode.initial_parser())
    }

    /// The currently active context.
    pub fn parser(&self) -> ParserId {
        self.stack[self.stack.len() - 1].parser
    }

    /// The number of active contexts (1 or more).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// All frames, bottom first.
    pub fn frames(&self) -> &[Frame] {
        &self.stack
    }

    /// The dialect at this point in the text: the innermost context carrying a
    /// mode tag.
    pub fn mode(&self) -> Option<Mode> {
        self.stack.iter().rev().find_map(|f| f.parser.mode())
    }

    pub(crate) fn enter(&mut self, parser: ParserId, argcount: u16) {
        self.stack.push(Frame { parser, argcount });
    }

    /// Pops the current context. The root context is never popped.
    pub(crate) fn leave(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    pub(crate) fn replace(&mut self, parser: ParserId, argcount: u16) {
        let top = self.stack.len() - 1;
        self.stack[top] = Frame { parser, argcount };
    }

    pub(crate) fn top_mut(&mut self) -> &mut Frame {
        let top = self.stack.len() - 1;
        &mut self.stack[top]
    }

    /// One argument of the current construct has been consumed: pops every
    /// context waiting for its final argument, then decrements the first one
    /// still expecting more.
    pub(crate) fn end_argument(&mut self) {
        while self.stack.len() > 1 {
            let top = self.top_mut();
            if top.argcount == 1 {
                self.stack.pop();
            } else {
                if top.argcount > 0 {
                    top.argcount -= 1;
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_parser_is_never_left() {
        let mut state = State::new(ParserId::LyGlobal);
        assert!(!state.leave());
        assert_eq!(state.depth(), 1);
        state.enter(ParserId::LyMusic, 0);
        assert!(state.leave());
        assert_eq!(state.parser(), ParserId::LyGlobal);
    }

    #[test]
    fn test_end_argument_cascades_through_single_arg_frames() {
        let mut state = State::new(ParserId::LyGlobal);
        state.enter(ParserId::LyMarkup, 1);
        state.enter(ParserId::LyMarkup, 1);
        state.end_argument();
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_end_argument_decrements_multi_arg_frames() {
        let mut state = State::new(ParserId::LyGlobal);
        state.enter(ParserId::LyMarkup, 3);
        state.end_argument();
        assert_eq!(state.depth(), 2);
        assert_eq!(state.frames()[1].argcount, 2);
    }

    #[test]
    fn test_structural_equality() {
        let mut a = State::new(ParserId::LyGlobal);
        let mut b = State::new(ParserId::LyGlobal);
        assert_eq!(a, b);
        a.enter(ParserId::LyMusic, 0);
        assert_ne!(a, b);
        b.enter(ParserId::LyMusic, 0);
        assert_eq!(a, b);
        b.top_mut().argcount = 1;
        assert_ne!(a, b);
    }

    #[test]
    fn test_mode_is_taken_from_innermost_tagged_frame() {
        let mut state = State::for_mode(Mode::Lilypond);
        assert_eq!(state.mode(), Some(Mode::Lilypond));
        state.enter(ParserId::SchemeMain, 1);
        assert_eq!(state.mode(), Some(Mode::Scheme));
        state.enter(ParserId::SchemeString, 0);
        assert_eq!(state.mode(), Some(Mode::Scheme));
        state.enter(ParserId::SchemeLily, 0);
        assert_eq!(state.mode(), Some(Mode::Lilypond));
    }
}
