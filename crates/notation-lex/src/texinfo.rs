//! The Texinfo grammar contexts, recognizing `@lilypond` blocks.

use crate::lexer::{rule, rule_action, Action, Fallthrough, ParserSpec};
use crate::lilypond;
use crate::state::ParserId;
use crate::token::TokenKind;

const RE_ACCENT: &str = r#"@['",=^`~](\{[a-zA-Z]\}|[a-zA-Z]\b)"#;
const RE_ESCAPE: &str = r"@[@{}]";

pub(crate) fn specs() -> Vec<ParserSpec> {
    let main_items = vec![
        rule(r"@c\b.*$", TokenKind::LineComment),
        rule_action(
            r"@ignore\b",
            TokenKind::BlockCommentStart,
            Action::Enter(ParserId::TexinfoComment),
        ),
        rule(RE_ACCENT, TokenKind::TexEscape),
        rule(RE_ESCAPE, TokenKind::TexEscape),
        rule_action(
            r"@lilypond(?=(\[[a-zA-Z,=0-9\\\s]+\])?\{)",
            TokenKind::TexBlockStart,
            Action::Enter(ParserId::TexinfoLilypondBlockAttr),
        ),
        rule_action(
            r"@lilypond\b",
            TokenKind::TexKeyword,
            Action::Enter(ParserId::TexinfoLilypondEnvAttr),
        ),
        rule_action(
            r"@lilypondfile\b",
            TokenKind::TexBlockStart,
            Action::Enter(ParserId::TexinfoLilypondFile),
        ),
        rule_action(
            r"@[a-zA-Z]+\{",
            TokenKind::TexBlockStart,
            Action::Enter(ParserId::TexinfoBlock),
        ),
        rule_action(
            r"@verbatim\b",
            TokenKind::TexKeyword,
            Action::Enter(ParserId::TexinfoVerbatim),
        ),
        rule(r"@[a-zA-Z]+", TokenKind::TexKeyword),
    ];

    let block_items = vec![
        rule_action(r"\}", TokenKind::TexBlockEnd, Action::Leave),
        rule(RE_ACCENT, TokenKind::TexEscape),
        rule(RE_ESCAPE, TokenKind::TexEscape),
        rule_action(
            r"@[a-zA-Z]+\{",
            TokenKind::TexBlockStart,
            Action::Enter(ParserId::TexinfoBlock),
        ),
        rule(r"@[a-zA-Z]+", TokenKind::TexKeyword),
    ];

    let mut lilypond_block_items = vec![rule_action(
        r"\}",
        TokenKind::TexBlockEnd,
        Action::Leave,
    )];
    lilypond_block_items.extend(lilypond::global_rules());

    let mut lilypond_env_items = vec![rule_action(
        r"@end\s+lilypond\b",
        TokenKind::TexKeyword,
        Action::Leave,
    )];
    lilypond_env_items.extend(lilypond::global_rules());

    vec![
        ParserSpec::new(ParserId::TexinfoMain, main_items),
        ParserSpec::new(
            ParserId::TexinfoComment,
            vec![rule_action(
                r"@end\s+ignore\b",
                TokenKind::BlockCommentEnd,
                Action::Leave,
            )],
        )
        .default_kind(TokenKind::Comment),
        ParserSpec::new(ParserId::TexinfoBlock, block_items),
        ParserSpec::new(
            ParserId::TexinfoVerbatim,
            vec![rule_action(
                r"@end\s+verbatim\b",
                TokenKind::TexKeyword,
                Action::Leave,
            )],
        )
        .default_kind(TokenKind::Verbatim),
        ParserSpec::new(
            ParserId::TexinfoLilypondBlockAttr,
            vec![
                rule_action(
                    r"\[",
                    TokenKind::TexAttrStart,
                    Action::Enter(ParserId::TexinfoLilypondAttr),
                ),
                rule_action(
                    r"\{",
                    TokenKind::TexBlockStart,
                    Action::Replace(ParserId::TexinfoLilypondBlock),
                ),
            ],
        ),
        ParserSpec::new(
            ParserId::TexinfoLilypondEnvAttr,
            vec![rule_action(
                r"\[",
                TokenKind::TexAttrStart,
                Action::Enter(ParserId::TexinfoLilypondAttr),
            )],
        )
        .fallthrough(Fallthrough::Replace(ParserId::TexinfoLilypondEnv)),
        ParserSpec::new(
            ParserId::TexinfoLilypondAttr,
            vec![rule_action(r"\]", TokenKind::TexAttrEnd, Action::Leave)],
        )
        .default_kind(TokenKind::TexAttribute),
        ParserSpec::new(
            ParserId::TexinfoLilypondFile,
            vec![
                rule_action(
                    r"\[",
                    TokenKind::TexAttrStart,
                    Action::Enter(ParserId::TexinfoLilypondAttr),
                ),
                rule_action(
                    r"\{",
                    TokenKind::TexBlockStart,
                    Action::Replace(ParserId::TexinfoBlock),
                ),
            ],
        ),
        ParserSpec::new(ParserId::TexinfoLilypondBlock, lilypond_block_items),
        ParserSpec::new(ParserId::TexinfoLilypondEnv, lilypond_env_items),
    ]
}
