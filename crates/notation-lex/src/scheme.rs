//! The Scheme grammar contexts.
//!
//! Scheme appears both standalone (`.scm` files) and embedded in LilyPond
//! after `#`/`$`; in the embedded case the entry frame carries one pending
//! argument, so a single complete datum returns to the host grammar. `#{ … #}`
//! nests LilyPond music back inside Scheme.

use crate::lexer::{rule, rule_action, Action, KindSpec, ParserSpec, RuleSpec};
use crate::lilypond;
use crate::state::ParserId;
use crate::token::TokenKind;
use crate::words;

/// Classifies a matched Scheme word by the word lists.
pub(crate) fn classify_word(text: &str) -> TokenKind {
    if words::SCHEME_KEYWORDS.contains(&text) {
        TokenKind::SchemeKeyword
    } else if words::SCHEME_FUNCTIONS.contains(&text) {
        TokenKind::SchemeFunction
    } else {
        TokenKind::SchemeWord
    }
}

pub(crate) fn specs() -> Vec<ParserSpec> {
    let main_items = vec![
        rule(r"\s+", TokenKind::Space),
        rule_action(
            r"\(",
            TokenKind::SchemeOpenParen,
            Action::Enter(ParserId::SchemeMain),
        ),
        rule_action(r"\)", TokenKind::SchemeCloseParen, Action::LeaveEndArg),
        rule(r";.*$", TokenKind::LineComment),
        rule_action(
            r"#!",
            TokenKind::BlockCommentStart,
            Action::Enter(ParserId::SchemeBlockComment),
        ),
        rule_action(
            r"#\{",
            TokenKind::SchemeLilyStart,
            Action::Enter(ParserId::SchemeLily),
        ),
        rule_action(
            r"#\(",
            TokenKind::SchemeOpenParen,
            Action::Enter(ParserId::SchemeMain),
        ),
        rule(r"\.(?!\S)", TokenKind::SchemeDot),
        rule_action(r"#[tf]\b", TokenKind::SchemeBool, Action::EndArg),
        rule_action(r"#\\([a-z]+|.)", TokenKind::SchemeChar, Action::EndArg),
        rule(r"['`,]", TokenKind::SchemeQuote),
        rule_action(
            r"-?\d+/\d+(?=$|[)\s])",
            TokenKind::SchemeNumber,
            Action::EndArg,
        ),
        rule_action(
            r"-?((\d+(\.\d*)|\.\d+)(E\d+)?)(?=$|[)\s])",
            TokenKind::SchemeNumber,
            Action::EndArg,
        ),
        rule_action(
            r"(-?\d+|#(b[0-1]+|o[0-7]+|x[0-9a-fA-F]+)|[-+]inf.0|[-+]?nan.0)(?=$|[)\s])",
            TokenKind::SchemeNumber,
            Action::EndArg,
        ),
        RuleSpec {
            pattern: r#"[^()"{}\s]+"#.to_string(),
            kind: KindSpec::SchemeWord,
            action: Action::EndArg,
        },
        rule_action(
            r#"""#,
            TokenKind::StringStart,
            Action::Enter(ParserId::SchemeString),
        ),
    ];

    let mut lily_items = vec![rule_action(
        r"#\}",
        TokenKind::SchemeLilyEnd,
        Action::Leave,
    )];
    lily_items.extend(lilypond::music_rules());

    vec![
        ParserSpec::new(ParserId::SchemeMain, main_items),
        ParserSpec::new(
            ParserId::SchemeString,
            vec![
                rule_action(r#"""#, TokenKind::StringEnd, Action::LeaveEndArg),
                rule(r#"\\[\\"]"#, TokenKind::StringEscape),
            ],
        )
        .default_kind(TokenKind::StringContent),
        ParserSpec::new(
            ParserId::SchemeBlockComment,
            vec![rule_action(
                r"!#",
                TokenKind::BlockCommentEnd,
                Action::Leave,
            )],
        )
        .default_kind(TokenKind::Comment),
        ParserSpec::new(ParserId::SchemeLily, lily_items),
    ]
}
