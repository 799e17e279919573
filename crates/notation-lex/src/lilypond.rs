//! The LilyPond grammar contexts.
//!
//! Rule groups mirror where items may occur: `space`/`base` items can appear
//! almost everywhere, `command` items in both toplevel and music expressions,
//! `music` items inside `{ … }` / `<< … >>`. Context tables are assembled
//! from these groups; identical patterns collapse to the first occurrence, so
//! a context can override the action of a shared rule by listing its own
//! version first.

use crate::lexer::{rule, rule_action, Action, Fallthrough, ParserSpec, RuleSpec};
use crate::state::ParserId;
use crate::token::TokenKind;
use crate::words;

const RE_ARTICULATION: &str = r"[-_^][_.>|+^-]";
const RE_DYNAMIC: &str = r"\\[<!>]|\\(f{1,5}|p{1,5}|mf|mp|fp|spp?|sff?|sfz|rfz|cresc|decresc|dim|cr|decr)(?![A-Za-z])";
const RE_DURATION: &str =
    r"(\\(maxima|longa|breve)\b|(1|2|4|8|16|32|64|128|256|512|1024|2048)(?!\d))";
const RE_SCALING: &str = r"\*[\t ]*\d+(/\d+)?";
const RE_NAME: &str = r"[a-zA-Z]+(?![a-zA-Z])";

fn backslashed(words: &[&str]) -> String {
    format!(r"\\({})(?![A-Za-z])", words::alternation(words))
}

fn word_bounded(words: &[&str]) -> String {
    format!(r"\b({})\b", words::alternation(words))
}

/// Whitespace and comments.
fn space_items() -> Vec<RuleSpec> {
    vec![
        rule(r"\s+", TokenKind::Space),
        rule_action(
            r"%\{",
            TokenKind::BlockCommentStart,
            Action::Enter(ParserId::LyBlockComment),
        ),
        rule(r"%.*$", TokenKind::LineComment),
    ]
}

/// Whitespace, comments, Scheme and strings.
fn base_items() -> Vec<RuleSpec> {
    let mut items = space_items();
    items.push(rule_action(
        r"[#$](?![{}])",
        TokenKind::SchemeStart,
        Action::EnterArgs(ParserId::SchemeMain, 1),
    ));
    items.push(rule_action(
        r#"""#,
        TokenKind::StringStart,
        Action::Enter(ParserId::LyString),
    ));
    items
}

/// Commands that may appear in both toplevel and music expressions.
fn command_items() -> Vec<RuleSpec> {
    vec![
        rule_action(
            r"\\repeat(?![A-Za-z])",
            TokenKind::Command,
            Action::Enter(ParserId::LyRepeat),
        ),
        rule_action(
            r"\\(relative|transpose|transposition|key|octaveCheck)\b",
            TokenKind::Command,
            Action::PitchCommand,
        ),
        rule_action(
            r"\\override\b",
            TokenKind::Keyword,
            Action::Enter(ParserId::LyOverride),
        ),
        rule_action(
            r"\\revert\b",
            TokenKind::Keyword,
            Action::Enter(ParserId::LyRevert),
        ),
        rule_action(
            r"\\set\b",
            TokenKind::Keyword,
            Action::Enter(ParserId::LySet),
        ),
        rule_action(
            r"\\unset\b",
            TokenKind::Keyword,
            Action::Enter(ParserId::LyUnset),
        ),
        rule_action(
            r"\\new\b",
            TokenKind::Command,
            Action::Enter(ParserId::LyTranslator),
        ),
        rule_action(
            r"\\context\b",
            TokenKind::Command,
            Action::Enter(ParserId::LyTranslator),
        ),
        rule_action(
            r"\\change\b",
            TokenKind::Command,
            Action::Enter(ParserId::LyTranslator),
        ),
        rule_action(
            r"\\with\b",
            TokenKind::Keyword,
            Action::Enter(ParserId::LyExpectWith),
        ),
        rule_action(
            r"\\clef\b",
            TokenKind::Command,
            Action::Enter(ParserId::LyClef),
        ),
        rule_action(
            r"\\(chords|chordmode)\b",
            TokenKind::Command,
            Action::Enter(ParserId::LyExpectChordMode),
        ),
        rule_action(
            r"\\(drums|drummode)\b",
            TokenKind::Command,
            Action::Enter(ParserId::LyExpectDrumMode),
        ),
        rule_action(
            r"\\(figures|figuremode)\b",
            TokenKind::Command,
            Action::Enter(ParserId::LyExpectFigureMode),
        ),
        rule_action(
            r"\\(lyricmode|((old)?add)?lyrics|lyricsto)\b",
            TokenKind::Command,
            Action::Enter(ParserId::LyExpectLyricMode),
        ),
        rule_action(
            r"\\(notes|notemode)\b",
            TokenKind::Command,
            Action::Enter(ParserId::LyExpectNoteMode),
        ),
        rule_action(
            r"\\markup(?![A-Za-z])",
            TokenKind::Markup,
            Action::EnterArgs(ParserId::LyMarkup, 1),
        ),
        rule_action(
            r"\\markuplines(?![A-Za-z])",
            TokenKind::Markup,
            Action::EnterArgs(ParserId::LyMarkup, 1),
        ),
        rule_action(
            r"\\markuplist(?![A-Za-z])",
            TokenKind::Markup,
            Action::EnterArgs(ParserId::LyMarkup, 1),
        ),
        rule_action(
            backslashed(words::LILYPOND_KEYWORDS),
            TokenKind::Keyword,
            Action::EndArg,
        ),
        rule_action(
            backslashed(words::LILYPOND_MUSIC_COMMANDS),
            TokenKind::Command,
            Action::EndArg,
        ),
        rule(r"\\[A-Za-z]+(?![A-Za-z])", TokenKind::UserCommand),
    ]
}

/// Items for toplevel, book, bookpart and score bodies.
fn toplevel_base_items() -> Vec<RuleSpec> {
    let mut items = base_items();
    items.push(rule_action(r"\d+/\d+", TokenKind::Fraction, Action::EndArg));
    items.push(rule_action(
        r"\{",
        TokenKind::OpenBracket,
        Action::Enter(ParserId::LyMusic),
    ));
    items.push(rule_action(
        r"<<",
        TokenKind::OpenSimultaneous,
        Action::Enter(ParserId::LyMusic),
    ));
    items.extend(command_items());
    items
}

/// Items inside music expressions, including the tremolo colon.
pub(crate) fn music_rules() -> Vec<RuleSpec> {
    let mut items = base_items();
    items.extend(vec![
        rule(RE_DYNAMIC, TokenKind::Dynamic),
        rule(r"s(?![A-Za-z])", TokenKind::Skip),
        rule(r"[Rr](?![A-Za-z])", TokenKind::Rest),
        rule(r"[a-x]+(?![A-Za-z])", TokenKind::Note),
        rule_action(r"\d+/\d+", TokenKind::Fraction, Action::EndArg),
        rule_action(
            RE_DURATION,
            TokenKind::Length,
            Action::Enter(ParserId::LyDuration),
        ),
        rule(r",+|'+", TokenKind::Octave),
        rule(r"=(,+|'+)?", TokenKind::OctaveCheck),
        rule(r"\?", TokenKind::AccidentalCautionary),
        rule(r"!", TokenKind::AccidentalReminder),
        rule(r"\|", TokenKind::PipeSymbol),
        rule(r"\\\\", TokenKind::VoiceSeparator),
        rule_action(
            r"\{",
            TokenKind::OpenBracket,
            Action::Enter(ParserId::LyMusic),
        ),
        rule_action(r"\}", TokenKind::CloseBracket, Action::LeaveEndArg),
        rule_action(
            r"<<",
            TokenKind::OpenSimultaneous,
            Action::Enter(ParserId::LyMusic),
        ),
        rule_action(r">>", TokenKind::CloseSimultaneous, Action::LeaveEndArg),
        rule_action(r"<", TokenKind::ChordStart, Action::Enter(ParserId::LyChord)),
        rule(word_bounded(words::CONTEXTS), TokenKind::ContextName),
        rule(word_bounded(words::GROBS), TokenKind::GrobName),
        rule(r"\(", TokenKind::SlurStart),
        rule(r"\)", TokenKind::SlurEnd),
        rule(r"\\\(", TokenKind::PhrasingSlurStart),
        rule(r"\\\)", TokenKind::PhrasingSlurEnd),
        rule(r"~", TokenKind::Tie),
        rule(r"\[", TokenKind::BeamStart),
        rule(r"\]", TokenKind::BeamEnd),
        rule(r"\\\[", TokenKind::LigatureStart),
        rule(r"\\\]", TokenKind::LigatureEnd),
        rule_action(
            r"[-_^]",
            TokenKind::Direction,
            Action::Enter(ParserId::LyScriptOrFingering),
        ),
        rule(backslashed(words::ARTICULATIONS), TokenKind::Articulation),
        rule(r"\\\d+", TokenKind::StringNumber),
        rule_action(r"\d+", TokenKind::IntegerValue, Action::EndArg),
    ]);
    items.extend(command_items());
    items.push(rule_action(
        r":",
        TokenKind::TremoloColon,
        Action::Enter(ParserId::LyTremolo),
    ));
    items
}

/// Items of the file toplevel.
pub(crate) fn global_rules() -> Vec<RuleSpec> {
    let mut items = vec![
        rule_action(
            r"\\book\b",
            TokenKind::Keyword,
            Action::Enter(ParserId::LyExpectBook),
        ),
        rule_action(
            r"\\bookpart\b",
            TokenKind::Keyword,
            Action::Enter(ParserId::LyExpectBookPart),
        ),
        rule_action(
            r"\\score\b",
            TokenKind::Keyword,
            Action::Enter(ParserId::LyExpectScore),
        ),
        rule_action(
            r"\\markup(?![A-Za-z])",
            TokenKind::Markup,
            Action::EnterArgs(ParserId::LyMarkup, 1),
        ),
        rule_action(
            r"\\markuplines(?![A-Za-z])",
            TokenKind::Markup,
            Action::EnterArgs(ParserId::LyMarkup, 1),
        ),
        rule_action(
            r"\\markuplist(?![A-Za-z])",
            TokenKind::Markup,
            Action::EnterArgs(ParserId::LyMarkup, 1),
        ),
        rule_action(
            r"\\paper\b",
            TokenKind::Keyword,
            Action::Enter(ParserId::LyExpectPaper),
        ),
        rule_action(
            r"\\header\b",
            TokenKind::Keyword,
            Action::Enter(ParserId::LyExpectHeader),
        ),
        rule_action(
            r"\\layout\b",
            TokenKind::Keyword,
            Action::Enter(ParserId::LyExpectLayout),
        ),
    ];
    items.extend(toplevel_base_items());
    items.push(rule(RE_NAME, TokenKind::Name));
    items.push(rule(r"=", TokenKind::EqualSign));
    items
}

/// A context waiting for `{` that then becomes `target`.
fn expect_open_bracket(id: ParserId, target: ParserId) -> ParserSpec {
    let mut items = space_items();
    items.push(rule_action(
        r"\{",
        TokenKind::OpenBracket,
        Action::Replace(target),
    ));
    ParserSpec::new(id, items)
        .default_kind(TokenKind::Error)
        .fallthrough(Fallthrough::Leave)
}

/// A context waiting for `{` or `<<` before an input-mode body.
fn expect_input_mode(id: ParserId, target: ParserId, extra: Vec<RuleSpec>) -> ParserSpec {
    let mut items = space_items();
    items.push(rule_action(
        r"\{",
        TokenKind::OpenBracket,
        Action::Replace(target),
    ));
    items.push(rule_action(
        r"<<",
        TokenKind::OpenSimultaneous,
        Action::Replace(target),
    ));
    items.extend(extra);
    ParserSpec::new(id, items).fallthrough(Fallthrough::Leave)
}

fn close_bracket() -> RuleSpec {
    rule_action(r"\}", TokenKind::CloseBracket, Action::LeaveEndArg)
}

fn markup_commands() -> Vec<RuleSpec> {
    vec![
        rule_action(
            r"\\markup(?![A-Za-z])",
            TokenKind::Markup,
            Action::EnterArgs(ParserId::LyMarkup, 1),
        ),
        rule_action(
            r"\\markuplines(?![A-Za-z])",
            TokenKind::Markup,
            Action::EnterArgs(ParserId::LyMarkup, 1),
        ),
        rule_action(
            r"\\markuplist(?![A-Za-z])",
            TokenKind::Markup,
            Action::EnterArgs(ParserId::LyMarkup, 1),
        ),
    ]
}

pub(crate) fn specs() -> Vec<ParserSpec> {
    let mut specs = Vec::new();

    specs.push(ParserSpec::new(ParserId::LyGlobal, global_rules()));
    specs.push(ParserSpec::new(ParserId::LyMusic, music_rules()));

    // Inside chords, music punctuation that only makes sense outside is an
    // error token.
    let mut chord_items = vec![
        rule(
            format!(
                "{}|{}|{}|{}|{}",
                RE_ARTICULATION, "<<|>>", r"\\[\\\]\[()]", RE_DURATION, RE_SCALING
            ),
            TokenKind::Error,
        ),
        rule_action(r">", TokenKind::ChordEnd, Action::Leave),
    ];
    chord_items.extend(music_rules());
    specs.push(ParserSpec::new(ParserId::LyChord, chord_items));

    specs.push(
        ParserSpec::new(
            ParserId::LyString,
            vec![
                rule_action(r#"""#, TokenKind::StringEnd, Action::LeaveEndArg),
                rule(r#"\\[\\"]"#, TokenKind::StringEscape),
            ],
        )
        .default_kind(TokenKind::StringContent),
    );

    specs.push(
        ParserSpec::new(
            ParserId::LyBlockComment,
            vec![
                rule(r"\s+", TokenKind::BlockCommentSpace),
                rule_action(r"%\}", TokenKind::BlockCommentEnd, Action::Leave),
            ],
        )
        .default_kind(TokenKind::Comment),
    );

    let mut markup_items = vec![
        rule_action(
            r"\\score\b",
            TokenKind::Keyword,
            Action::Enter(ParserId::LyExpectScore),
        ),
        rule_action(
            r"\\[A-Za-z]+(-[A-Za-z]+)*(?![A-Za-z])",
            TokenKind::MarkupCommand,
            Action::MarkupCommand,
        ),
        rule_action(
            r"\{",
            TokenKind::OpenBracket,
            Action::Enter(ParserId::LyMarkup),
        ),
        rule_action(r"\}", TokenKind::CloseBracket, Action::PopMarkup),
        rule_action(r#"[^{}"\\\s#%]+"#, TokenKind::MarkupWord, Action::EndArg),
    ];
    markup_items.extend(base_items());
    specs.push(ParserSpec::new(ParserId::LyMarkup, markup_items));

    // \score { … }, \book { … } and friends.
    let mut score_items = vec![close_bracket()];
    score_items.push(rule_action(
        r"\\header\b",
        TokenKind::Keyword,
        Action::Enter(ParserId::LyExpectHeader),
    ));
    score_items.push(rule_action(
        r"\\layout\b",
        TokenKind::Keyword,
        Action::Enter(ParserId::LyExpectLayout),
    ));
    score_items.push(rule_action(
        r"\\midi\b",
        TokenKind::Keyword,
        Action::Enter(ParserId::LyExpectMidi),
    ));
    score_items.push(rule_action(
        r"\\with\b",
        TokenKind::Keyword,
        Action::Enter(ParserId::LyExpectWith),
    ));
    score_items.extend(toplevel_base_items());
    specs.push(ParserSpec::new(ParserId::LyScore, score_items));
    specs.push(expect_open_bracket(ParserId::LyExpectScore, ParserId::LyScore));

    let mut book_items = vec![close_bracket()];
    book_items.extend(markup_commands());
    book_items.push(rule_action(
        r"\\bookpart\b",
        TokenKind::Keyword,
        Action::Enter(ParserId::LyExpectBookPart),
    ));
    book_items.push(rule_action(
        r"\\score\b",
        TokenKind::Keyword,
        Action::Enter(ParserId::LyExpectScore),
    ));
    book_items.push(rule_action(
        r"\\paper\b",
        TokenKind::Keyword,
        Action::Enter(ParserId::LyExpectPaper),
    ));
    book_items.push(rule_action(
        r"\\header\b",
        TokenKind::Keyword,
        Action::Enter(ParserId::LyExpectHeader),
    ));
    book_items.push(rule_action(
        r"\\layout\b",
        TokenKind::Keyword,
        Action::Enter(ParserId::LyExpectLayout),
    ));
    book_items.extend(toplevel_base_items());
    specs.push(ParserSpec::new(ParserId::LyBook, book_items.clone()));
    specs.push(expect_open_bracket(ParserId::LyExpectBook, ParserId::LyBook));

    // A bookpart allows the same items minus nested bookparts.
    let bookpart_items: Vec<RuleSpec> = book_items
        .into_iter()
        .filter(|r| r.pattern != r"\\bookpart\b")
        .collect();
    specs.push(ParserSpec::new(ParserId::LyBookPart, bookpart_items));
    specs.push(expect_open_bracket(
        ParserId::LyExpectBookPart,
        ParserId::LyBookPart,
    ));

    let mut paper_items = base_items();
    paper_items.push(close_bracket());
    paper_items.extend(markup_commands());
    paper_items.push(rule(
        word_bounded(words::PAPER_VARIABLES),
        TokenKind::PaperVariable,
    ));
    paper_items.push(rule(r"=", TokenKind::EqualSign));
    paper_items.push(rule_action(
        r"-?\d+(\.\d+)?",
        TokenKind::DecimalValue,
        Action::EndArg,
    ));
    paper_items.push(rule(r"\\(mm|cm|in|pt)\b", TokenKind::Unit));
    specs.push(ParserSpec::new(ParserId::LyPaper, paper_items));
    specs.push(expect_open_bracket(ParserId::LyExpectPaper, ParserId::LyPaper));

    let mut header_items = vec![close_bracket()];
    header_items.extend(markup_commands());
    header_items.push(rule(
        word_bounded(words::HEADER_VARIABLES),
        TokenKind::HeaderVariable,
    ));
    header_items.push(rule(r"=", TokenKind::EqualSign));
    header_items.extend(toplevel_base_items());
    specs.push(ParserSpec::new(ParserId::LyHeader, header_items));
    specs.push(expect_open_bracket(
        ParserId::LyExpectHeader,
        ParserId::LyHeader,
    ));

    let mut layout_items = base_items();
    layout_items.push(close_bracket());
    layout_items.push(rule_action(
        r"\\context\b",
        TokenKind::Keyword,
        Action::Enter(ParserId::LyExpectContext),
    ));
    layout_items.push(rule(
        word_bounded(words::LAYOUT_VARIABLES),
        TokenKind::LayoutVariable,
    ));
    layout_items.push(rule(r"=", TokenKind::EqualSign));
    layout_items.push(rule_action(
        r"-?\d+(\.\d+)?",
        TokenKind::DecimalValue,
        Action::EndArg,
    ));
    layout_items.push(rule(r"\\(mm|cm|in|pt)\b", TokenKind::Unit));
    specs.push(ParserSpec::new(ParserId::LyLayout, layout_items));
    specs.push(expect_open_bracket(
        ParserId::LyExpectLayout,
        ParserId::LyLayout,
    ));

    let mut midi_items = base_items();
    midi_items.push(close_bracket());
    midi_items.push(rule_action(
        r"\\context\b",
        TokenKind::Keyword,
        Action::Enter(ParserId::LyExpectContext),
    ));
    midi_items.push(rule(
        word_bounded(words::LAYOUT_VARIABLES),
        TokenKind::LayoutVariable,
    ));
    midi_items.push(rule(r"=", TokenKind::EqualSign));
    midi_items.push(rule_action(
        r"-?\d+(\.\d+)?",
        TokenKind::DecimalValue,
        Action::EndArg,
    ));
    midi_items.push(rule(r"\\(mm|cm|in|pt)\b", TokenKind::Unit));
    specs.push(ParserSpec::new(ParserId::LyMidi, midi_items));
    specs.push(expect_open_bracket(ParserId::LyExpectMidi, ParserId::LyMidi));

    let mut with_items = vec![close_bracket()];
    with_items.push(rule(
        word_bounded(words::CONTEXT_PROPERTIES),
        TokenKind::ContextProperty,
    ));
    with_items.push(rule(r"=", TokenKind::EqualSign));
    with_items.extend(toplevel_base_items());
    specs.push(ParserSpec::new(ParserId::LyWith, with_items));
    specs.push(expect_open_bracket(ParserId::LyExpectWith, ParserId::LyWith));

    let mut context_items = vec![close_bracket()];
    context_items.push(rule(
        format!(r"\\({})\b", words::alternation(words::CONTEXTS)),
        TokenKind::ContextName,
    ));
    context_items.push(rule(
        word_bounded(words::CONTEXT_PROPERTIES),
        TokenKind::ContextProperty,
    ));
    context_items.push(rule(r"=", TokenKind::EqualSign));
    context_items.extend(toplevel_base_items());
    specs.push(ParserSpec::new(ParserId::LyContext, context_items));
    specs.push(expect_open_bracket(
        ParserId::LyExpectContext,
        ParserId::LyContext,
    ));

    let mut repeat_items = space_items();
    repeat_items.push(rule(
        format!(r"\b({})(?![A-Za-z])", words::alternation(words::REPEAT_TYPES)),
        TokenKind::RepeatSpecifier,
    ));
    repeat_items.push(rule(
        format!(r#""({})""#, words::alternation(words::REPEAT_TYPES)),
        TokenKind::RepeatSpecifier,
    ));
    repeat_items.push(rule_action(r"\d+", TokenKind::IntegerValue, Action::Leave));
    specs.push(
        ParserSpec::new(ParserId::LyRepeat, repeat_items).fallthrough(Fallthrough::Leave),
    );

    let mut duration_items = space_items();
    duration_items.push(rule(r"\.", TokenKind::Dot));
    specs.push(
        ParserSpec::new(ParserId::LyDuration, duration_items)
            .fallthrough(Fallthrough::Replace(ParserId::LyDurationScaling)),
    );

    let mut scaling_items = space_items();
    scaling_items.push(rule(RE_SCALING, TokenKind::Scaling));
    specs.push(
        ParserSpec::new(ParserId::LyDurationScaling, scaling_items)
            .fallthrough(Fallthrough::Leave),
    );

    let mut override_items = vec![
        rule(word_bounded(words::CONTEXTS), TokenKind::ContextName),
        rule(r"\.", TokenKind::DotSetOverride),
        rule(word_bounded(words::GROBS), TokenKind::GrobName),
        rule_action(r"=", TokenKind::EqualSign, Action::Leave),
        rule(RE_NAME, TokenKind::Name),
    ];
    override_items.extend(base_items());
    specs.push(ParserSpec::new(ParserId::LyOverride, override_items));

    let mut revert_items = space_items();
    revert_items.push(rule(word_bounded(words::CONTEXTS), TokenKind::ContextName));
    revert_items.push(rule(r"\.", TokenKind::DotSetOverride));
    revert_items.push(rule(word_bounded(words::GROBS), TokenKind::GrobName));
    revert_items.push(rule(RE_NAME, TokenKind::Name));
    revert_items.push(rule_action(
        r"[#$](?![{}])",
        TokenKind::SchemeStart,
        Action::EnterArgs(ParserId::SchemeMain, 1),
    ));
    specs.push(
        ParserSpec::new(ParserId::LyRevert, revert_items).fallthrough(Fallthrough::Leave),
    );

    let mut set_items = vec![
        rule(word_bounded(words::CONTEXTS), TokenKind::ContextName),
        rule(r"\.", TokenKind::DotSetOverride),
        rule(
            word_bounded(words::CONTEXT_PROPERTIES),
            TokenKind::ContextProperty,
        ),
        rule_action(r"=", TokenKind::EqualSign, Action::Leave),
        rule(RE_NAME, TokenKind::Name),
    ];
    set_items.extend(base_items());
    specs.push(ParserSpec::new(ParserId::LySet, set_items));

    let mut unset_items = space_items();
    unset_items.push(rule(word_bounded(words::CONTEXTS), TokenKind::ContextName));
    unset_items.push(rule(r"\.", TokenKind::DotSetOverride));
    unset_items.push(rule_action(
        word_bounded(words::CONTEXT_PROPERTIES),
        TokenKind::ContextProperty,
        Action::Leave,
    ));
    unset_items.push(rule_action(RE_NAME, TokenKind::Name, Action::LeaveIfLower));
    specs.push(ParserSpec::new(ParserId::LyUnset, unset_items).fallthrough(Fallthrough::Leave));

    let mut translator_items = space_items();
    translator_items.push(rule_action(
        word_bounded(words::CONTEXTS),
        TokenKind::ContextName,
        Action::Replace(ParserId::LyExpectTranslatorId),
    ));
    translator_items.push(rule_action(
        RE_NAME,
        TokenKind::Name,
        Action::Replace(ParserId::LyExpectTranslatorId),
    ));
    specs.push(
        ParserSpec::new(ParserId::LyTranslator, translator_items)
            .fallthrough(Fallthrough::Leave),
    );

    let mut translator_id_eq = space_items();
    translator_id_eq.push(rule_action(
        r"=",
        TokenKind::EqualSign,
        Action::Replace(ParserId::LyTranslatorId),
    ));
    specs.push(
        ParserSpec::new(ParserId::LyExpectTranslatorId, translator_id_eq)
            .fallthrough(Fallthrough::Leave),
    );

    let mut translator_id_items = space_items();
    translator_id_items.push(rule_action(RE_NAME, TokenKind::Name, Action::Leave));
    translator_id_items.push(rule_action(
        r#"""#,
        TokenKind::StringStart,
        Action::Enter(ParserId::LyString),
    ));
    specs.push(
        ParserSpec::new(ParserId::LyTranslatorId, translator_id_items)
            .argcount(1)
            .fallthrough(Fallthrough::Leave),
    );

    let mut clef_items = space_items();
    clef_items.push(rule_action(
        word_bounded(words::CLEFS),
        TokenKind::ClefSpecifier,
        Action::Leave,
    ));
    clef_items.push(rule_action(
        r#"""#,
        TokenKind::StringStart,
        Action::Enter(ParserId::LyString),
    ));
    specs.push(
        ParserSpec::new(ParserId::LyClef, clef_items)
            .argcount(1)
            .fallthrough(Fallthrough::Leave),
    );

    let mut script_items = space_items();
    script_items.push(rule_action(
        r"[+|>._^-]",
        TokenKind::ScriptAbbreviation,
        Action::Leave,
    ));
    script_items.push(rule_action(r"\d", TokenKind::Fingering, Action::Leave));
    specs.push(
        ParserSpec::new(ParserId::LyScriptOrFingering, script_items)
            .argcount(1)
            .fallthrough(Fallthrough::Leave),
    );

    specs.push(expect_input_mode(
        ParserId::LyExpectLyricMode,
        ParserId::LyLyricMode,
        vec![
            rule_action(
                r"[#$](?![{}])",
                TokenKind::SchemeStart,
                Action::EnterArgs(ParserId::SchemeMain, 1),
            ),
            rule_action(
                r#"""#,
                TokenKind::StringStart,
                Action::Enter(ParserId::LyString),
            ),
            rule(RE_NAME, TokenKind::Name),
        ],
    ));

    let mut lyric_items = base_items();
    lyric_items.extend(vec![
        rule_action(r"\}", TokenKind::CloseBracket, Action::LeaveEndArg),
        rule_action(r">>", TokenKind::CloseSimultaneous, Action::LeaveEndArg),
        rule_action(
            r"\{",
            TokenKind::OpenBracket,
            Action::Enter(ParserId::LyLyricMode),
        ),
        rule_action(
            r"<<",
            TokenKind::OpenSimultaneous,
            Action::Enter(ParserId::LyLyricMode),
        ),
        rule(r"\|", TokenKind::PipeSymbol),
        rule(r"--", TokenKind::LyricHyphen),
        rule(r"__", TokenKind::LyricExtender),
        rule(r"_", TokenKind::LyricSkip),
        rule(r"~", TokenKind::LyricTie),
        rule(r#"[^\\\s\d~"]+"#, TokenKind::LyricText),
        rule(RE_DYNAMIC, TokenKind::Dynamic),
        rule(r"s(?![A-Za-z])", TokenKind::Skip),
        rule_action(
            RE_DURATION,
            TokenKind::Length,
            Action::Enter(ParserId::LyDuration),
        ),
    ]);
    lyric_items.extend(markup_commands());
    lyric_items.extend(command_items());
    specs.push(ParserSpec::new(ParserId::LyLyricMode, lyric_items));

    specs.push(expect_input_mode(
        ParserId::LyExpectChordMode,
        ParserId::LyChordMode,
        vec![],
    ));
    let mut chordmode_items = vec![
        rule_action(
            r"\{",
            TokenKind::OpenBracket,
            Action::Enter(ParserId::LyChordMode),
        ),
        rule_action(
            r"<<",
            TokenKind::OpenSimultaneous,
            Action::Enter(ParserId::LyChordMode),
        ),
    ];
    chordmode_items.extend(music_rules());
    chordmode_items.push(rule_action(
        r":|\^|/\+?",
        TokenKind::ChordSeparator,
        Action::Enter(ParserId::LyChordItems),
    ));
    specs.push(ParserSpec::new(ParserId::LyChordMode, chordmode_items));

    specs.push(
        ParserSpec::new(
            ParserId::LyChordItems,
            vec![
                rule(r":|\^|/\+?", TokenKind::ChordSeparator),
                rule(
                    r"((?<![a-z])|^)(aug|dim|sus|min|maj|m)(?![a-z])",
                    TokenKind::ChordModifier,
                ),
                rule(r"\d+[-+]?", TokenKind::ChordStepNumber),
                rule(r"\.", TokenKind::ChordDot),
                rule(r"[a-x]+(?![A-Za-z])", TokenKind::Note),
            ],
        )
        .fallthrough(Fallthrough::Leave),
    );

    specs.push(expect_input_mode(
        ParserId::LyExpectNoteMode,
        ParserId::LyNoteMode,
        vec![],
    ));
    specs.push(ParserSpec::new(ParserId::LyNoteMode, music_rules()));

    specs.push(expect_input_mode(
        ParserId::LyExpectDrumMode,
        ParserId::LyDrumMode,
        vec![],
    ));
    specs.push(ParserSpec::new(ParserId::LyDrumMode, music_rules()));

    specs.push(expect_input_mode(
        ParserId::LyExpectFigureMode,
        ParserId::LyFigureMode,
        vec![],
    ));
    specs.push(ParserSpec::new(ParserId::LyFigureMode, music_rules()));

    specs.push(
        ParserSpec::new(
            ParserId::LyPitchCommand,
            vec![
                rule_action(r"\s+", TokenKind::Space, Action::LeaveIfArgsDone),
                rule_action(
                    r"%\{",
                    TokenKind::BlockCommentStart,
                    Action::Enter(ParserId::LyBlockComment),
                ),
                rule(r"%.*$", TokenKind::LineComment),
                rule_action(r"[a-x]+(?![A-Za-z])", TokenKind::Note, Action::DecArg),
                rule(r",+|'+", TokenKind::Octave),
            ],
        )
        .argcount(1)
        .fallthrough(Fallthrough::Leave),
    );

    specs.push(
        ParserSpec::new(
            ParserId::LyTremolo,
            vec![rule_action(
                r"\b(8|16|32|64|128|256|512|1024|2048)(?!\d)",
                TokenKind::TremoloDuration,
                Action::Leave,
            )],
        )
        .fallthrough(Fallthrough::Leave),
    );

    specs
}
