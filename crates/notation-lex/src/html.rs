//! The HTML grammar contexts, recognizing embedded LilyPond.
//!
//! `<lilypond> … </lilypond>` switches to the full LilyPond toplevel,
//! `<lilypond: c d e />` lexes inline music, and `<lilypondfile>` /
//! `<lilypondversion>` are recognized as tags.

use crate::lexer::{rule, rule_action, Action, Fallthrough, ParserSpec};
use crate::lilypond;
use crate::state::ParserId;
use crate::token::TokenKind;

const RE_ENTITY: &str = r"\&(#\d+|#[xX][0-9A-Fa-f]+|[A-Za-z_:][\w.:_-]*);";
const RE_ATTR_NAME: &str = r"\w+([-_:]\w+)?";

pub(crate) fn specs() -> Vec<ParserSpec> {
    let main_items = vec![
        rule(r"\s+", TokenKind::Space),
        rule(r"<lilypondversion/?>", TokenKind::LilypondTag),
        rule_action(
            r"</?lilypondfile\b",
            TokenKind::LilypondTag,
            Action::Enter(ParserId::HtmlLilypondFileOptions),
        ),
        rule_action(
            r"<lilypond\b",
            TokenKind::LilypondTag,
            Action::Enter(ParserId::HtmlLilypondAttr),
        ),
        rule_action(
            r"<!--",
            TokenKind::BlockCommentStart,
            Action::Enter(ParserId::HtmlComment),
        ),
        rule_action(
            r"</?\w[-_:\w]*\b",
            TokenKind::TagStart,
            Action::Enter(ParserId::HtmlAttr),
        ),
        rule(RE_ENTITY, TokenKind::EntityRef),
    ];

    let attr_items = vec![
        rule(r"\s+", TokenKind::Space),
        rule_action(r"/?>", TokenKind::TagEnd, Action::Leave),
        rule(RE_ATTR_NAME, TokenKind::AttrName),
        rule_action(r"=", TokenKind::EqualSign, Action::Enter(ParserId::HtmlValue)),
        rule_action(
            r#"""#,
            TokenKind::StringStart,
            Action::Enter(ParserId::HtmlStringDq),
        ),
        rule_action(
            r"'",
            TokenKind::StringStart,
            Action::Enter(ParserId::HtmlStringSq),
        ),
    ];

    let lilypond_attr_items = vec![
        rule(r"\s+", TokenKind::Space),
        rule(RE_ATTR_NAME, TokenKind::AttrName),
        rule_action(r"=", TokenKind::EqualSign, Action::Enter(ParserId::HtmlValue)),
        rule_action(
            r#"""#,
            TokenKind::StringStart,
            Action::Enter(ParserId::HtmlStringDq),
        ),
        rule_action(
            r"'",
            TokenKind::StringStart,
            Action::Enter(ParserId::HtmlStringSq),
        ),
        rule_action(
            r">",
            TokenKind::LilypondTag,
            Action::Replace(ParserId::HtmlLilypond),
        ),
        rule_action(
            r":",
            TokenKind::Colon,
            Action::Replace(ParserId::HtmlLilypondInline),
        ),
    ];

    let file_options_items = vec![
        rule(r"\s+", TokenKind::Space),
        rule(RE_ATTR_NAME, TokenKind::AttrName),
        rule_action(r"=", TokenKind::EqualSign, Action::Enter(ParserId::HtmlValue)),
        rule_action(
            r#"""#,
            TokenKind::StringStart,
            Action::Enter(ParserId::HtmlStringDq),
        ),
        rule_action(
            r"'",
            TokenKind::StringStart,
            Action::Enter(ParserId::HtmlStringSq),
        ),
        rule_action(r"/?>", TokenKind::LilypondTag, Action::Leave),
    ];

    let mut lilypond_items = vec![rule_action(
        r"</lilypond>",
        TokenKind::LilypondTag,
        Action::Leave,
    )];
    lilypond_items.extend(lilypond::global_rules());

    let mut inline_items = vec![rule_action(r"/?>", TokenKind::LilypondTag, Action::Leave)];
    inline_items.extend(lilypond::music_rules());

    vec![
        ParserSpec::new(ParserId::HtmlMain, main_items),
        ParserSpec::new(ParserId::HtmlAttr, attr_items),
        ParserSpec::new(
            ParserId::HtmlStringDq,
            vec![
                rule_action(r#"""#, TokenKind::StringEnd, Action::Leave),
                rule(RE_ENTITY, TokenKind::EntityRef),
            ],
        )
        .default_kind(TokenKind::StringContent),
        ParserSpec::new(
            ParserId::HtmlStringSq,
            vec![
                rule_action(r"'", TokenKind::StringEnd, Action::Leave),
                rule(RE_ENTITY, TokenKind::EntityRef),
            ],
        )
        .default_kind(TokenKind::StringContent),
        ParserSpec::new(
            ParserId::HtmlComment,
            vec![rule_action(
                r"-->",
                TokenKind::BlockCommentEnd,
                Action::Leave,
            )],
        )
        .default_kind(TokenKind::Comment),
        ParserSpec::new(
            ParserId::HtmlValue,
            vec![
                rule(r"\s+", TokenKind::Space),
                rule_action(r"\w+", TokenKind::AttrValue, Action::Leave),
            ],
        )
        .fallthrough(Fallthrough::Leave),
        ParserSpec::new(ParserId::HtmlLilypondAttr, lilypond_attr_items),
        ParserSpec::new(ParserId::HtmlLilypondFileOptions, file_options_items),
        ParserSpec::new(ParserId::HtmlLilypond, lilypond_items),
        ParserSpec::new(ParserId::HtmlLilypondInline, inline_items),
    ]
}
