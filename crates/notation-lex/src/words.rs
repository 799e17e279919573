//! Word lists driving the keyword-style recognition rules.
//!
//! These tables are joined into regex alternations when the [`crate::lexer::Lexicon`]
//! is built. Scheme words are classified by lookup instead, after a generic
//! word rule matched.

/// LilyPond keywords (backslashed, non-music).
pub const LILYPOND_KEYWORDS: &[&str] = &[
    "accepts",
    "alias",
    "book",
    "bookpart",
    "consists",
    "context",
    "defaultchild",
    "denies",
    "description",
    "etc",
    "header",
    "hide",
    "include",
    "inherit-acceptability",
    "language",
    "layout",
    "midi",
    "name",
    "omit",
    "once",
    "override",
    "paper",
    "remove",
    "revert",
    "score",
    "set",
    "tagGroup",
    "temporary",
    "type",
    "undo",
    "unset",
    "version",
    "with",
];

/// LilyPond music commands (backslashed). Abridged to the commonly used set.
pub const LILYPOND_MUSIC_COMMANDS: &[&str] = &[
    "absolute",
    "acciaccatura",
    "accidentalStyle",
    "addlyrics",
    "addQuote",
    "afterGrace",
    "allowPageTurn",
    "alternative",
    "appoggiatura",
    "arpeggio",
    "autoBeamOff",
    "autoBeamOn",
    "bar",
    "barNumberCheck",
    "bendAfter",
    "break",
    "breathe",
    "cadenzaOff",
    "cadenzaOn",
    "compressFullBarRests",
    "crossStaff",
    "cueDuring",
    "defaultTimeSignature",
    "dynamicDown",
    "dynamicNeutral",
    "dynamicUp",
    "easyHeadsOff",
    "easyHeadsOn",
    "endSpanners",
    "episemFinis",
    "episemInitium",
    "featherDurations",
    "fermataMarkup",
    "glissando",
    "grace",
    "harmonic",
    "hideNotes",
    "improvisationOff",
    "improvisationOn",
    "instrumentSwitch",
    "inversion",
    "invertChords",
    "killCues",
    "label",
    "laissezVibrer",
    "mark",
    "melisma",
    "melismaEnd",
    "mergeDifferentlyDottedOff",
    "mergeDifferentlyDottedOn",
    "mergeDifferentlyHeadedOff",
    "mergeDifferentlyHeadedOn",
    "noBeam",
    "noBreak",
    "noPageBreak",
    "noPageTurn",
    "octaveCheck",
    "oneVoice",
    "ottava",
    "pageBreak",
    "pageTurn",
    "parallelMusic",
    "parenthesize",
    "partcombine",
    "partial",
    "phrasingSlurDashed",
    "phrasingSlurDotted",
    "phrasingSlurDown",
    "phrasingSlurNeutral",
    "phrasingSlurSolid",
    "phrasingSlurUp",
    "quoteDuring",
    "relative",
    "resetRelativeOctave",
    "sacredHarpHeads",
    "shiftDurations",
    "shiftOff",
    "shiftOn",
    "shiftOnn",
    "shiftOnnn",
    "slurDashed",
    "slurDotted",
    "slurDown",
    "slurNeutral",
    "slurSolid",
    "slurUp",
    "small",
    "stemDown",
    "stemNeutral",
    "stemUp",
    "stopStaff",
    "startStaff",
    "tag",
    "tempo",
    "tieDashed",
    "tieDotted",
    "tieDown",
    "tieNeutral",
    "tieSolid",
    "tieUp",
    "time",
    "times",
    "transposedCueDuring",
    "tuplet",
    "tupletDown",
    "tupletNeutral",
    "tupletUp",
    "tweak",
    "unfoldRepeats",
    "voiceFour",
    "voiceFourStyle",
    "voiceNeutralStyle",
    "voiceOne",
    "voiceOneStyle",
    "voiceThree",
    "voiceThreeStyle",
    "voiceTwo",
    "voiceTwoStyle",
];

/// Articulations, ornaments and scripts (backslashed), combined into one
/// recognition rule.
pub const ARTICULATIONS: &[&str] = &[
    // articulations
    "accent",
    "espressivo",
    "marcato",
    "portato",
    "staccatissimo",
    "staccato",
    "tenuto",
    // ornaments
    "prall",
    "mordent",
    "prallmordent",
    "turn",
    "upprall",
    "downprall",
    "upmordent",
    "downmordent",
    "lineprall",
    "prallprall",
    "pralldown",
    "prallup",
    "reverseturn",
    "trill",
    // fermatas
    "shortfermata",
    "fermata",
    "longfermata",
    "verylongfermata",
    // instrument scripts
    "upbow",
    "downbow",
    "flageolet",
    "open",
    "halfopen",
    "lheel",
    "rheel",
    "ltoe",
    "rtoe",
    "snappizzicato",
    "stopped",
    // repeat scripts
    "segno",
    "coda",
    "varcoda",
    "signumcongruentiae",
];

/// Context (translator) names.
pub const CONTEXTS: &[&str] = &[
    "ChoirStaff",
    "ChordNames",
    "CueVoice",
    "Devnull",
    "DrumStaff",
    "DrumVoice",
    "Dynamics",
    "FiguredBass",
    "FretBoards",
    "Global",
    "GrandStaff",
    "GregorianTranscriptionStaff",
    "GregorianTranscriptionVoice",
    "KievanStaff",
    "KievanVoice",
    "Lyrics",
    "MensuralStaff",
    "MensuralVoice",
    "NoteNames",
    "NullVoice",
    "PetrucciStaff",
    "PetrucciVoice",
    "PianoStaff",
    "RhythmicStaff",
    "Score",
    "Staff",
    "StaffGroup",
    "TabStaff",
    "TabVoice",
    "Timing",
    "VaticanaStaff",
    "VaticanaVoice",
    "Voice",
];

/// Layout object (grob) names. Abridged to the commonly tweaked set.
pub const GROBS: &[&str] = &[
    "Accidental",
    "AccidentalCautionary",
    "AccidentalPlacement",
    "Arpeggio",
    "BarLine",
    "BarNumber",
    "BassFigure",
    "Beam",
    "BreathingSign",
    "ChordName",
    "Clef",
    "Custos",
    "Dots",
    "DynamicLineSpanner",
    "DynamicText",
    "DynamicTextSpanner",
    "Fingering",
    "Flag",
    "Glissando",
    "GraceSpacing",
    "Hairpin",
    "InstrumentName",
    "InstrumentSwitch",
    "KeyCancellation",
    "KeySignature",
    "LaissezVibrerTie",
    "LedgerLineSpanner",
    "LyricExtender",
    "LyricHyphen",
    "LyricSpace",
    "LyricText",
    "MetronomeMark",
    "MultiMeasureRest",
    "MultiMeasureRestNumber",
    "MultiMeasureRestText",
    "NoteCollision",
    "NoteColumn",
    "NoteHead",
    "NoteSpacing",
    "OttavaBracket",
    "PercentRepeat",
    "PhrasingSlur",
    "RehearsalMark",
    "RepeatSlash",
    "Rest",
    "RestCollision",
    "Script",
    "ScriptColumn",
    "Slur",
    "SostenutoPedal",
    "SpacingSpanner",
    "SpanBar",
    "StaffGrouper",
    "StaffSymbol",
    "Stem",
    "StemTremolo",
    "StringNumber",
    "SustainPedal",
    "System",
    "SystemStartBar",
    "SystemStartBrace",
    "SystemStartBracket",
    "TextScript",
    "TextSpanner",
    "Tie",
    "TieColumn",
    "TimeSignature",
    "TrillSpanner",
    "TupletBracket",
    "TupletNumber",
    "UnaCordaPedal",
    "VerticalAxisGroup",
    "VoltaBracket",
];

/// Context property names. Abridged to the commonly set ones.
pub const CONTEXT_PROPERTIES: &[&str] = &[
    "aDueText",
    "alignAboveContext",
    "alignBelowContext",
    "autoBeaming",
    "barAlways",
    "barCheckSynchronize",
    "beamExceptions",
    "chordChanges",
    "chordNameLowercaseMinor",
    "clefGlyph",
    "clefOctavation",
    "clefPosition",
    "completionBusy",
    "countPercentRepeats",
    "currentBarNumber",
    "drumStyleTable",
    "explicitClefVisibility",
    "explicitKeySignatureVisibility",
    "fontSize",
    "instrumentCueName",
    "instrumentName",
    "keepAliveInterfaces",
    "keyAlterationOrder",
    "lyricMelismaAlignment",
    "majorSevenSymbol",
    "measureLength",
    "measurePosition",
    "melismaBusyProperties",
    "midiInstrument",
    "minimumFret",
    "noteToFretFunction",
    "ottavation",
    "pedalSustainStyle",
    "restNumberThreshold",
    "shortInstrumentName",
    "shortVocalName",
    "skipBars",
    "skipTypesetting",
    "staffLineLayoutFunction",
    "stanza",
    "stringNumberOrientations",
    "stringTunings",
    "subdivideBeams",
    "suggestAccidentals",
    "tempoHideNote",
    "tempoWholesPerMinute",
    "tieWaitForNote",
    "timeSignatureFraction",
    "tupletFullLength",
    "tupletSpannerDuration",
    "vocalName",
    "voltaSpannerDuration",
];

/// Variables recognized inside a `\paper` block.
pub const PAPER_VARIABLES: &[&str] = &[
    "annotate-spacing",
    "auto-first-page-number",
    "binding-offset",
    "bottom-margin",
    "check-consistency",
    "evenFooterMarkup",
    "evenHeaderMarkup",
    "first-page-number",
    "horizontal-shift",
    "indent",
    "inner-margin",
    "left-margin",
    "line-width",
    "max-systems-per-page",
    "min-systems-per-page",
    "oddFooterMarkup",
    "oddHeaderMarkup",
    "outer-margin",
    "page-breaking",
    "page-count",
    "page-spacing-weight",
    "paper-height",
    "paper-width",
    "print-all-headers",
    "print-first-page-number",
    "print-page-number",
    "ragged-bottom",
    "ragged-last",
    "ragged-last-bottom",
    "ragged-right",
    "right-margin",
    "short-indent",
    "system-count",
    "systems-per-page",
    "top-margin",
    "two-sided",
];

/// Variables recognized inside a `\header` block.
pub const HEADER_VARIABLES: &[&str] = &[
    "arranger",
    "breakbefore",
    "composer",
    "copyright",
    "date",
    "dedication",
    "instrument",
    "lyricist",
    "meter",
    "mutopiacomposer",
    "mutopiainstrument",
    "mutopiaopus",
    "mutopiapoet",
    "mutopiatitle",
    "opus",
    "piece",
    "poet",
    "subsubtitle",
    "subtitle",
    "tagline",
    "texidoc",
    "title",
];

/// Variables recognized inside `\layout` and `\midi` blocks.
pub const LAYOUT_VARIABLES: &[&str] = &[
    "indent",
    "line-width",
    "ragged-last",
    "ragged-right",
    "system-count",
];

/// Repeat types after `\repeat`.
pub const REPEAT_TYPES: &[&str] = &["percent", "tremolo", "unfold", "volta"];

/// Plain clef names after `\clef`.
pub const CLEFS: &[&str] = &[
    "alto",
    "baritone",
    "bass",
    "french",
    "mezzosoprano",
    "percussion",
    "soprano",
    "subbass",
    "tab",
    "tenor",
    "treble",
    "varbaritone",
];

/// Markup commands taking no argument.
pub const MARKUP_COMMANDS_NARGS_0: &[&str] = &[
    "doubleflat",
    "doublesharp",
    "eyeglasses",
    "fermata",
    "flat",
    "natural",
    "null",
    "semiflat",
    "semisharp",
    "sesquiflat",
    "sesquisharp",
    "sharp",
    "strut",
    "table-of-contents",
];

/// Markup commands taking two arguments.
pub const MARKUP_COMMANDS_NARGS_2: &[&str] = &[
    "combine",
    "fraction",
    "halign",
    "hcenter-in",
    "lower",
    "magnify",
    "note",
    "on-the-fly",
    "override",
    "pad-around",
    "pad-markup",
    "pad-x",
    "page-link",
    "raise",
    "rotate",
    "scale",
    "translate",
    "translate-scaled",
    "with-color",
    "with-url",
    "woodwind-diagram",
];

/// Markup commands taking three arguments.
pub const MARKUP_COMMANDS_NARGS_3: &[&str] = &[
    "arrow-head",
    "beam",
    "draw-circle",
    "epsfile",
    "filled-box",
    "general-align",
    "note-by-number",
    "pad-to-box",
    "page-ref",
    "with-dimensions",
    "with-link",
];

/// Markup commands taking four arguments.
pub const MARKUP_COMMANDS_NARGS_4: &[&str] = &["put-adjacent"];

/// Scheme special forms, for word classification.
pub const SCHEME_KEYWORDS: &[&str] = &[
    "and",
    "begin",
    "case",
    "cond",
    "define",
    "define-markup-command",
    "define-music-function",
    "define-public",
    "define-syntax",
    "delay",
    "do",
    "else",
    "if",
    "lambda",
    "let",
    "let*",
    "letrec",
    "or",
    "quasiquote",
    "quote",
    "set!",
    "unless",
    "unquote",
    "when",
];

/// Well-known Scheme procedures, for word classification.
pub const SCHEME_FUNCTIONS: &[&str] = &[
    "append",
    "apply",
    "assoc",
    "assq",
    "car",
    "cdr",
    "cons",
    "display",
    "eq?",
    "equal?",
    "eqv?",
    "for-each",
    "length",
    "list",
    "list->string",
    "ly:export",
    "ly:music-property",
    "make-moment",
    "map",
    "markup",
    "member",
    "memq",
    "newline",
    "not",
    "null?",
    "number->string",
    "number?",
    "pair?",
    "reverse",
    "string->number",
    "string->symbol",
    "string-append",
    "string?",
    "symbol->string",
    "symbol?",
];

/// The number of arguments a markup command expects. Commands not listed in
/// any table take a single markup argument.
pub fn markup_command_argcount(command: &str) -> Option<u16> {
    if MARKUP_COMMANDS_NARGS_0.contains(&command) {
        Some(0)
    } else if MARKUP_COMMANDS_NARGS_2.contains(&command) {
        Some(2)
    } else if MARKUP_COMMANDS_NARGS_3.contains(&command) {
        Some(3)
    } else if MARKUP_COMMANDS_NARGS_4.contains(&command) {
        Some(4)
    } else {
        None
    }
}

/// Joins a word list into a regex alternation group.
pub(crate) fn alternation(words: &[&str]) -> String {
    let mut out = String::with_capacity(words.len() * 8);
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push('|');
        }
        for ch in word.chars() {
            if "\\^$.|?*+()[]{}".contains(ch) {
                out.push('\\');
            }
            out.push(ch);
        }
    }
    out
}
