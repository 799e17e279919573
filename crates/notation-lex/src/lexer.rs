//! The rule-table lexer engine.
//!
//! A [`Lexicon`] holds one compiled rule table per grammar context
//! ([`ParserId`]). Scanning a line repeatedly searches the active context's
//! rules from the current position and takes the leftmost match, breaking ties
//! by rule order; text no rule covers becomes the context's default token
//! kind. A matched rule may transform the [`State`] (enter/leave/replace a
//! context), which is how strings, comments, Scheme expressions and all other
//! sub-languages nest.
//!
//! Fallthrough contexts (argument readers like the duration or clef contexts)
//! match anchored at the scan position only; when nothing matches they apply
//! their fallthrough action (leaving or replacing the context) and the same
//! position is scanned again with the new context. The end of the line never
//! triggers a fallthrough, so such contexts persist across line boundaries
//! like any other.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use onig::{Regex, Region, SearchOptions};
use thiserror::Error;
use tracing::debug;

use crate::scheme;
use crate::state::{ParserId, State};
use crate::token::{Token, TokenKind};
use crate::words;
use crate::{html, lilypond, texinfo};

/// The state transformation a matched rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// No state change.
    None,
    /// Enter a context with its base argument count.
    Enter(ParserId),
    /// Enter a context with an explicit argument count.
    EnterArgs(ParserId, u16),
    /// Leave the current context.
    Leave,
    /// Leave the current context, then close one pending argument.
    LeaveEndArg,
    /// Close one pending argument.
    EndArg,
    /// Replace the current context.
    Replace(ParserId),
    /// Close a markup brace group: pop pending-argument markup frames, the
    /// group itself, then one argument.
    PopMarkup,
    /// A markup command: argument count depends on the command word.
    MarkupCommand,
    /// `\relative`-family command: `\transpose` takes two pitches, the rest
    /// one.
    PitchCommand,
    /// A pitch argument was consumed.
    DecArg,
    /// Leave once all pitch arguments have been consumed.
    LeaveIfArgsDone,
    /// Leave when the word is lowercase (an unknown user property name).
    LeaveIfLower,
}

/// What a fallthrough context does when nothing matches at the scan position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fallthrough {
    Leave,
    Replace(ParserId),
}

/// How a rule determines the kind of its token.
#[derive(Debug, Clone, Copy)]
pub(crate) enum KindSpec {
    Fixed(TokenKind),
    /// A Scheme word, classified by lookup in the word lists.
    SchemeWord,
}

impl KindSpec {
    fn resolve(self, text: &str) -> TokenKind {
        match self {
            KindSpec::Fixed(kind) => kind,
            KindSpec::SchemeWord => scheme::classify_word(text),
        }
    }

    fn produces(self, kind: TokenKind) -> bool {
        match self {
            KindSpec::Fixed(k) => k == kind,
            KindSpec::SchemeWord => matches!(
                kind,
                TokenKind::SchemeWord | TokenKind::SchemeKeyword | TokenKind::SchemeFunction
            ),
        }
    }

    fn kinds(self) -> Vec<TokenKind> {
        match self {
            KindSpec::Fixed(k) => vec![k],
            KindSpec::SchemeWord => vec![
                TokenKind::SchemeWord,
                TokenKind::SchemeKeyword,
                TokenKind::SchemeFunction,
            ],
        }
    }
}

/// One recognition rule of a context, before compilation.
#[derive(Clone)]
pub(crate) struct RuleSpec {
    pub pattern: String,
    pub kind: KindSpec,
    pub action: Action,
}

/// A recognition rule with no state effect.
pub(crate) fn rule(pattern: impl Into<String>, kind: TokenKind) -> RuleSpec {
    RuleSpec {
        pattern: pattern.into(),
        kind: KindSpec::Fixed(kind),
        action: Action::None,
    }
}

/// A recognition rule with a state effect.
pub(crate) fn rule_action(
    pattern: impl Into<String>,
    kind: TokenKind,
    action: Action,
) -> RuleSpec {
    RuleSpec {
        pattern: pattern.into(),
        kind: KindSpec::Fixed(kind),
        action,
    }
}

/// One grammar context, before compilation.
pub(crate) struct ParserSpec {
    pub id: ParserId,
    pub default_kind: TokenKind,
    pub argcount: u16,
    pub fallthrough: Option<Fallthrough>,
    pub rules: Vec<RuleSpec>,
}

impl ParserSpec {
    pub(crate) fn new(id: ParserId, rules: Vec<RuleSpec>) -> Self {
        Self {
            id,
            default_kind: TokenKind::Unparsed,
            argcount: 0,
            fallthrough: None,
            rules,
        }
    }

    pub(crate) fn default_kind(mut self, kind: TokenKind) -> Self {
        self.default_kind = kind;
        self
    }

    pub(crate) fn argcount(mut self, argcount: u16) -> Self {
        self.argcount = argcount;
        self
    }

    pub(crate) fn fallthrough(mut self, fallthrough: Fallthrough) -> Self {
        self.fallthrough = Some(fallthrough);
        self
    }
}

/// Errors building a [`Lexicon`].
#[derive(Debug, Error)]
pub enum GrammarError {
    /// A rule pattern failed to compile.
    #[error("regex compile error for pattern '{pattern}': {message}")]
    RegexCompile {
        /// The offending pattern.
        pattern: String,
        /// The regex engine's message.
        message: String,
    },
    /// A grammar context was defined twice.
    #[error("duplicate grammar context {0:?}")]
    DuplicateContext(ParserId),
    /// A grammar context has no definition.
    #[error("missing grammar context {0:?}")]
    MissingContext(ParserId),
}

struct CompiledRule {
    regex: Regex,
    kind: KindSpec,
    action: Action,
}

struct CompiledParser {
    default_kind: TokenKind,
    argcount: u16,
    fallthrough: Option<Fallthrough>,
    rules: Vec<CompiledRule>,
    /// Token kinds this context's rules can produce (used by [`Lexicon::follow`]).
    accepts: HashSet<TokenKind>,
}

/// The compiled rule tables for every grammar context of every mode.
///
/// Building compiles a few hundred regexes, so a `Lexicon` is meant to be
/// built once and shared (see [`Lexicon::shared`]). It is immutable and
/// thread-safe.
pub struct Lexicon {
    parsers: Vec<CompiledParser>,
}

static SHARED: LazyLock<Arc<Lexicon>> =
    LazyLock::new(|| Arc::new(Lexicon::new().expect("built-in grammar tables compile")));

impl Lexicon {
    /// Compiles the built-in grammar tables.
    pub fn new() -> Result<Lexicon, GrammarError> {
        let mut specs: Vec<ParserSpec> = Vec::new();
        specs.extend(lilypond::specs());
        specs.extend(scheme::specs());
        specs.extend(html::specs());
        specs.extend(texinfo::specs());

        let mut slots: Vec<Option<CompiledParser>> = Vec::new();
        slots.resize_with(ParserId::ALL.len(), || None);

        let mut rule_count = 0usize;
        for spec in specs {
            let slot = &mut slots[spec.id.index()];
            if slot.is_some() {
                return Err(GrammarError::DuplicateContext(spec.id));
            }
            let mut rules = Vec::new();
            let mut seen_patterns = HashSet::new();
            let mut accepts = HashSet::new();
            for rule_spec in spec.rules {
                // Identical patterns in one context collapse to the first
                // occurrence, so context-specific actions win over the ones a
                // shared rule group carries.
                if !seen_patterns.insert(rule_spec.pattern.clone()) {
                    continue;
                }
                let regex = Regex::new(&rule_spec.pattern).map_err(|e| {
                    GrammarError::RegexCompile {
                        pattern: rule_spec.pattern.clone(),
                        message: e.to_string(),
                    }
                })?;
                accepts.extend(rule_spec.kind.kinds());
                rules.push(CompiledRule {
                    regex,
                    kind: rule_spec.kind,
                    action: rule_spec.action,
                });
            }
            rule_count += rules.len();
            *slot = Some(CompiledParser {
                default_kind: spec.default_kind,
                argcount: spec.argcount,
                fallthrough: spec.fallthrough,
                rules,
                accepts,
            });
        }

        let mut parsers = Vec::with_capacity(slots.len());
        for (i, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(parser) => parsers.push(parser),
                None => return Err(GrammarError::MissingContext(ParserId::ALL[i])),
            }
        }
        debug!(contexts = parsers.len(), rules = rule_count, "compiled grammar tables");
        Ok(Lexicon { parsers })
    }

    /// The process-wide shared lexicon.
    pub fn shared() -> Arc<Lexicon> {
        SHARED.clone()
    }

    fn parser(&self, id: ParserId) -> &CompiledParser {
        &self.parsers[id.index()]
    }

    /// The base argument count a context starts with when entered without an
    /// explicit one.
    pub(crate) fn base_argcount(&self, id: ParserId) -> u16 {
        self.parser(id).argcount
    }

    /// Lexes one line (no `\n`), transforming `state` in place and returning
    /// the tokens with line-relative character offsets.
    ///
    /// The whole line is always consumed; text no rule recognizes becomes the
    /// active context's default token kind, so concatenating the returned
    /// token texts reconstructs the line exactly.
    pub fn lex_line(&self, text: &str, state: &mut State) -> Vec<Token> {
        debug_assert!(!text.contains('\n'), "lex_line expects a single line");
        let mut tokens = Vec::new();
        let mut pos_byte = 0usize;
        let mut pos_char = 0usize;
        let len = text.len();

        // Bounds the fallthrough-rescan loop against degenerate tables.
        let mut iterations = 0usize;
        let max_iterations = (len + 1).saturating_mul(16).max(256);

        while pos_byte < len {
            iterations += 1;
            if iterations > max_iterations {
                let rest = &text[pos_byte..];
                tokens.push(Token::new(TokenKind::Unparsed, rest, pos_char));
                break;
            }

            let spec = self.parser(state.parser());
            match self.find_match(&spec.rules, text, pos_byte) {
                Some((idx, start, end)) if spec.fallthrough.is_none() || start == pos_byte => {
                    if start > pos_byte {
                        let chunk = &text[pos_byte..start];
                        tokens.push(Token::new(spec.default_kind, chunk, pos_char));
                        pos_char += chunk.chars().count();
                        pos_byte = start;
                    }
                    let rule = &spec.rules[idx];
                    let chunk = &text[start..end];
                    if chunk.is_empty() {
                        // A zero-width match may only transform state; if it
                        // does not, force one character of progress.
                        let before = state.clone();
                        self.apply_action(state, rule.action, chunk);
                        if *state == before {
                            let ch_len = text[pos_byte..]
                                .chars()
                                .next()
                                .map(char::len_utf8)
                                .unwrap_or(1);
                            let chunk = &text[pos_byte..pos_byte + ch_len];
                            tokens.push(Token::new(spec.default_kind, chunk, pos_char));
                            pos_char += 1;
                            pos_byte += ch_len;
                        }
                        continue;
                    }
                    let kind = rule.kind.resolve(chunk);
                    tokens.push(Token::new(kind, chunk, pos_char));
                    self.apply_action(state, rule.action, chunk);
                    pos_char += chunk.chars().count();
                    pos_byte = end;
                }
                _ => {
                    if let Some(fallthrough) = spec.fallthrough {
                        if !self.apply_fallthrough(state, fallthrough) {
                            let rest = &text[pos_byte..];
                            tokens.push(Token::new(spec.default_kind, rest, pos_char));
                            break;
                        }
                    } else {
                        let rest = &text[pos_byte..];
                        tokens.push(Token::new(spec.default_kind, rest, pos_char));
                        break;
                    }
                }
            }
        }
        tokens
    }

    /// Replays a cached token's state effect.
    ///
    /// Used when walking already-lexed tokens with a live state (see the
    /// document's `Source`): fallthrough contexts that could not have produced
    /// the token are left first, exactly as they would have been during
    /// lexing, then the token's own action is applied.
    pub fn follow(&self, state: &mut State, token: &Token) {
        loop {
            let spec = self.parser(state.parser());
            let Some(fallthrough) = spec.fallthrough else {
                break;
            };
            if spec.accepts.contains(&token.kind()) {
                break;
            }
            if !self.apply_fallthrough(state, fallthrough) {
                break;
            }
        }
        let action = self.action_for(state.parser(), token);
        self.apply_action(state, action, token.text());
    }

    fn action_for(&self, parser: ParserId, token: &Token) -> Action {
        let spec = self.parser(parser);
        for rule in &spec.rules {
            if rule.kind.produces(token.kind()) {
                return rule.action;
            }
        }
        Action::None
    }

    fn find_match(
        &self,
        rules: &[CompiledRule],
        text: &str,
        from: usize,
    ) -> Option<(usize, usize, usize)> {
        let mut best: Option<(usize, usize, usize)> = None;
        for (i, rule) in rules.iter().enumerate() {
            let mut region = Region::new();
            if rule
                .regex
                .search_with_options(
                    text,
                    from,
                    text.len(),
                    SearchOptions::SEARCH_OPTION_NONE,
                    Some(&mut region),
                )
                .is_none()
            {
                continue;
            }
            let Some((start, end)) = region.pos(0) else {
                continue;
            };
            let earlier = match best {
                None => true,
                Some((_, best_start, _)) => start < best_start,
            };
            if earlier {
                best = Some((i, start, end));
            }
            if start == from {
                // Nothing can match earlier, and later rules lose ties.
                break;
            }
        }
        best
    }

    fn apply_fallthrough(&self, state: &mut State, fallthrough: Fallthrough) -> bool {
        match fallthrough {
            Fallthrough::Leave => state.leave(),
            Fallthrough::Replace(parser) => {
                state.replace(parser, self.base_argcount(parser));
                true
            }
        }
    }

    fn apply_action(&self, state: &mut State, action: Action, text: &str) {
        match action {
            Action::None => {}
            Action::Enter(parser) => state.enter(parser, self.base_argcount(parser)),
            Action::EnterArgs(parser, argcount) => state.enter(parser, argcount),
            Action::Leave => {
                state.leave();
            }
            Action::LeaveEndArg => {
                state.leave();
                state.end_argument();
            }
            Action::EndArg => state.end_argument(),
            Action::Replace(parser) => state.replace(parser, self.base_argcount(parser)),
            Action::PopMarkup => {
                while state.depth() > 1 && top_argcount(state) > 0 {
                    state.leave();
                }
                state.leave();
                state.end_argument();
            }
            Action::MarkupCommand => {
                let command = text.strip_prefix('\\').unwrap_or(text);
                match words::markup_command_argcount(command) {
                    Some(0) => state.end_argument(),
                    Some(argcount) => state.enter(ParserId::LyMarkup, argcount),
                    None => state.enter(ParserId::LyMarkup, 1),
                }
            }
            Action::PitchCommand => {
                let argcount = if text == "\\transpose" { 2 } else { 1 };
                state.enter(ParserId::LyPitchCommand, argcount);
            }
            Action::DecArg => {
                let top = state.top_mut();
                top.argcount = top.argcount.saturating_sub(1);
            }
            Action::LeaveIfArgsDone => {
                if top_argcount(state) == 0 {
                    state.leave();
                }
            }
            Action::LeaveIfLower => {
                if text.chars().next().is_some_and(char::is_lowercase) {
                    state.leave();
                }
            }
        }
    }
}

fn top_argcount(state: &State) -> u16 {
    state.frames().last().map(|f| f.argcount).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;
    use pretty_assertions::assert_eq;

    fn lex_all(text: &str, mode: Mode) -> (Vec<Vec<(TokenKind, String)>>, State) {
        let lexicon = Lexicon::shared();
        let mut state = State::for_mode(mode);
        let mut lines = Vec::new();
        for line in text.split('\n') {
            let tokens = lexicon.lex_line(line, &mut state);
            lines.push(
                tokens
                    .into_iter()
                    .map(|t| (t.kind(), t.text().to_string()))
                    .collect(),
            );
        }
        (lines, state)
    }

    #[test]
    fn test_tables_compile() {
        assert!(Lexicon::new().is_ok());
    }

    #[test]
    fn test_simple_music() {
        let (lines, state) = lex_all(r"\relative c' { c d e }", Mode::Lilypond);
        let kinds: Vec<TokenKind> = lines[0].iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Command,          // \relative
                TokenKind::Space,
                TokenKind::Note,             // c
                TokenKind::Octave,           // '
                TokenKind::Space,
                TokenKind::OpenBracket,      // {
                TokenKind::Space,
                TokenKind::Note,
                TokenKind::Space,
                TokenKind::Note,
                TokenKind::Space,
                TokenKind::Note,
                TokenKind::Space,
                TokenKind::CloseBracket,     // }
            ]
        );
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_token_coverage_reconstructs_line() {
        let line = r#"\score { \new Staff << c4 d8. e16 r2 | %{ x %} "a b" #'(1 2) >> }"#;
        let lexicon = Lexicon::shared();
        let mut state = State::for_mode(Mode::Lilypond);
        let tokens = lexicon.lex_line(line, &mut state);
        let rebuilt: String = tokens.iter().map(|t| t.text()).collect();
        assert_eq!(rebuilt, line);
        // Offsets are contiguous as well.
        let mut pos = 0;
        for token in &tokens {
            assert_eq!(token.pos(), pos);
            pos = token.end();
        }
    }

    #[test]
    fn test_string_spans_lines() {
        let (lines, state) = lex_all("title = \"My\nSong\" c", Mode::Lilypond);
        assert_eq!(lines[0].last().unwrap().0, TokenKind::StringContent);
        assert_eq!(lines[1][0], (TokenKind::StringContent, "Song".to_string()));
        assert_eq!(lines[1][1].0, TokenKind::StringEnd);
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let (lines, _) = lex_all("%{ one\ntwo %} c", Mode::Lilypond);
        assert_eq!(lines[0][0].0, TokenKind::BlockCommentStart);
        assert!(lines[1].iter().any(|(k, _)| *k == TokenKind::BlockCommentEnd));
        // after %}, c at toplevel is a variable name
        assert_eq!(lines[1].last().unwrap().0, TokenKind::Name);
    }

    #[test]
    fn test_line_comment_ends_at_newline() {
        let (lines, state) = lex_all("% hello\nc =", Mode::Lilypond);
        assert_eq!(lines[0][0].0, TokenKind::LineComment);
        assert_eq!(lines[1][0].0, TokenKind::Name);
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_scheme_roundtrip_to_lilypond() {
        let (lines, state) = lex_all(r"{ c #(+ 1 2) d }", Mode::Lilypond);
        let kinds: Vec<TokenKind> = lines[0].iter().map(|(k, _)| *k).collect();
        assert!(kinds.contains(&TokenKind::SchemeStart));
        assert!(kinds.contains(&TokenKind::SchemeOpenParen));
        assert!(kinds.contains(&TokenKind::SchemeNumber));
        // the d after the Scheme expression is a note again
        let d_index = lines[0].iter().position(|(_, t)| t == "d").unwrap();
        assert_eq!(lines[0][d_index].0, TokenKind::Note);
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_scheme_datum_ends_argument() {
        let (lines, state) = lex_all(r"{ c #t d }", Mode::Lilypond);
        let d_index = lines[0].iter().position(|(_, t)| t == "d").unwrap();
        assert_eq!(lines[0][d_index].0, TokenKind::Note);
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_durations_and_dots() {
        let (lines, _) = lex_all("{ c4. d8*2/3 }", Mode::Lilypond);
        let tokens = &lines[0];
        assert!(tokens.contains(&(TokenKind::Length, "4".to_string())));
        assert!(tokens.contains(&(TokenKind::Dot, ".".to_string())));
        assert!(tokens.contains(&(TokenKind::Length, "8".to_string())));
        assert!(tokens.contains(&(TokenKind::Scaling, "*2/3".to_string())));
    }

    #[test]
    fn test_unmatched_closer_saturates() {
        let (lines, state) = lex_all("} } c", Mode::Lilypond);
        assert_eq!(lines[0][0].0, TokenKind::CloseBracket);
        assert_eq!(state.depth(), 1);
        assert_eq!(state.parser(), ParserId::LyGlobal);
    }

    #[test]
    fn test_markup_nested_braces() {
        let (lines, state) = lex_all(r"\markup \bold { a b }", Mode::Lilypond);
        let kinds: Vec<TokenKind> = lines[0].iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds[0], TokenKind::Markup);
        assert!(kinds.contains(&TokenKind::MarkupCommand));
        assert!(kinds.contains(&TokenKind::MarkupWord));
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_chord_and_error_in_chord() {
        let (lines, _) = lex_all("{ <c e g>4 <c-^>8 }", Mode::Lilypond);
        let tokens = &lines[0];
        assert!(tokens.contains(&(TokenKind::ChordStart, "<".to_string())));
        assert!(tokens.contains(&(TokenKind::ChordEnd, ">".to_string())));
        // articulation inside a chord is an error
        assert!(tokens.contains(&(TokenKind::Error, "-^".to_string())));
    }

    #[test]
    fn test_dynamics_not_user_commands() {
        let (lines, _) = lex_all(r"{ c\f d\mp e\cresc }", Mode::Lilypond);
        let dynamics: Vec<&(TokenKind, String)> = lines[0]
            .iter()
            .filter(|(k, _)| *k == TokenKind::Dynamic)
            .collect();
        assert_eq!(dynamics.len(), 3);
    }

    #[test]
    fn test_html_with_embedded_lilypond() {
        let (lines, state) = lex_all("<p>text</p> <lilypond> { c } </lilypond>", Mode::Html);
        let kinds: Vec<TokenKind> = lines[0].iter().map(|(k, _)| *k).collect();
        assert!(kinds.contains(&TokenKind::TagStart));
        assert!(kinds.contains(&TokenKind::LilypondTag));
        assert!(kinds.contains(&TokenKind::OpenBracket));
        assert!(kinds.contains(&TokenKind::Note));
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_texinfo_lilypond_environment() {
        let (lines, _) = lex_all("@node Top\n@lilypond\n{ c }\n@end lilypond", Mode::Texinfo);
        assert_eq!(lines[0][0].0, TokenKind::TexKeyword);
        assert_eq!(lines[1][0].0, TokenKind::TexKeyword);
        assert!(lines[2].iter().any(|(k, _)| *k == TokenKind::Note));
        assert_eq!(lines[3][0].0, TokenKind::TexKeyword);
    }

    #[test]
    fn test_follow_replays_state_changes() {
        let lexicon = Lexicon::shared();
        let line = r#"{ c "open"#;
        let mut lex_state = State::for_mode(Mode::Lilypond);
        let tokens = lexicon.lex_line(line, &mut lex_state);

        let mut follow_state = State::for_mode(Mode::Lilypond);
        for token in &tokens {
            lexicon.follow(&mut follow_state, token);
        }
        assert_eq!(follow_state, lex_state);
    }

    #[test]
    fn test_follow_replays_fallthrough() {
        let lexicon = Lexicon::shared();
        // After `c4`, the duration context is active; the following note makes
        // it fall back to music.
        let line = "{ c4 d }";
        let mut lex_state = State::for_mode(Mode::Lilypond);
        let tokens = lexicon.lex_line(line, &mut lex_state);

        let mut follow_state = State::for_mode(Mode::Lilypond);
        for token in &tokens {
            lexicon.follow(&mut follow_state, token);
        }
        assert_eq!(follow_state, lex_state);
    }

    #[test]
    fn test_unparsed_progress_on_garbage() {
        let lexicon = Lexicon::shared();
        let mut state = State::for_mode(Mode::Lilypond);
        let tokens = lexicon.lex_line("héllo ωorld", &mut state);
        let rebuilt: String = tokens.iter().map(|t| t.text()).collect();
        assert_eq!(rebuilt, "héllo ωorld");
    }
}
