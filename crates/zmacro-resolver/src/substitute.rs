//! Text substitution pass.
//!
//! The text is cut into pieces by a single forward cursor: plain text,
//! brace spans (`{...}`) and positional references (`$1`..`$9`). A span is
//! only closed by a `}` seen before any other `{`; an opening brace with no
//! such `}` is ordinary text. Inside the context of a user macro
//! (`{$NAME:"..."}`) quoted braces do not count.
//!
//! Substitution never rescans inserted text: output is assembled from the
//! source pieces, so the cursor always continues right after the token it
//! just replaced.

use std::borrow::Cow;

use rustc_hash::FxHashMap;

use zmacro_core::constants::UNRESOLVED_MACRO_STRING;

/// One piece of a text, borrowed from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'t> {
    Text(&'t str),
    /// A closed `{...}` span, braces included.
    Span(&'t str),
    /// `$1`..`$9`, with its 1-based index.
    Reference { text: &'t str, index: u8 },
}

impl<'t> Piece<'t> {
    pub fn as_str(&self) -> &'t str {
        match *self {
            Self::Text(s) | Self::Span(s) => s,
            Self::Reference { text, .. } => text,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SpanState {
    InBrace,
    UserMacroName,
    UserMacroContext,
    Quoted,
    Escaped,
}

/// Byte offset of the `}` closing the span opened at `start`, if any.
fn span_end(text: &str, start: usize) -> Option<usize> {
    let mut state = SpanState::InBrace;
    for (offset, ch) in text[start..].char_indices().skip(1) {
        let pos = start + offset;
        state = match (state, ch) {
            (SpanState::Quoted, '\\') => SpanState::Escaped,
            (SpanState::Quoted, '"') => SpanState::UserMacroContext,
            (SpanState::Quoted, _) => SpanState::Quoted,
            (SpanState::Escaped, _) => SpanState::Quoted,
            (_, '{') => return None,
            (_, '}') => return Some(pos),
            (SpanState::InBrace, '$') if offset == 1 => SpanState::UserMacroName,
            (SpanState::UserMacroName, ':') => SpanState::UserMacroContext,
            (SpanState::UserMacroContext, '"') => SpanState::Quoted,
            (s, _) => s,
        };
    }
    None
}

/// Cut `text` into pieces. Concatenating the pieces yields `text` again.
pub fn split(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;
    let bytes = text.as_bytes();

    while let Some(ch) = text[pos..].chars().next() {
        match ch {
            '{' => {
                if let Some(end) = span_end(text, pos) {
                    if literal_start < pos {
                        pieces.push(Piece::Text(&text[literal_start..pos]));
                    }
                    pieces.push(Piece::Span(&text[pos..=end]));
                    pos = end + 1;
                    literal_start = pos;
                    continue;
                }
            }
            '$' => {
                if let Some(&digit) = bytes.get(pos + 1) {
                    if (b'1'..=b'9').contains(&digit) {
                        if literal_start < pos {
                            pieces.push(Piece::Text(&text[literal_start..pos]));
                        }
                        pieces.push(Piece::Reference {
                            text: &text[pos..pos + 2],
                            index: digit - b'0',
                        });
                        pos += 2;
                        literal_start = pos;
                        continue;
                    }
                }
            }
            _ => {}
        }
        pos += ch.len_utf8();
    }

    if literal_start < text.len() {
        pieces.push(Piece::Text(&text[literal_start..]));
    }
    pieces
}

/// What an out-of-range `$n` turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceMiss {
    /// Replace with the empty string (trigger names).
    Empty,
    /// Leave `$n` in the text (item names).
    Keep,
}

/// Values for `$1`..`$9`, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct References {
    pub values: Vec<String>,
    pub miss: ReferenceMiss,
}

impl References {
    pub fn new(values: Vec<String>, miss: ReferenceMiss) -> Self {
        Self { values, miss }
    }

    fn lookup<'a>(&'a self, index: u8, text: &'a str) -> &'a str {
        match self.values.get(usize::from(index) - 1) {
            Some(value) => value,
            None => match self.miss {
                ReferenceMiss::Empty => "",
                ReferenceMiss::Keep => text,
            },
        }
    }
}

/// One substitution pass over a text.
pub struct Substitution<'a> {
    values: &'a FxHashMap<String, String>,
    unresolved: Option<&'a dyn Fn(&str) -> bool>,
    references: Option<&'a References>,
}

impl<'a> Substitution<'a> {
    pub fn new(values: &'a FxHashMap<String, String>) -> Self {
        Self {
            values,
            unresolved: None,
            references: None,
        }
    }

    /// Spans accepted by `known` but missing from the value map become
    /// the unresolved sentinel instead of staying untouched.
    pub fn with_unresolved(mut self, known: &'a dyn Fn(&str) -> bool) -> Self {
        self.unresolved = Some(known);
        self
    }

    pub fn with_references(mut self, references: &'a References) -> Self {
        self.references = Some(references);
        self
    }

    fn replace<'t>(&'t self, piece: Piece<'t>) -> Cow<'t, str> {
        match piece {
            Piece::Text(text) => Cow::Borrowed(text),
            Piece::Span(span) => match self.values.get(span) {
                Some(value) => Cow::Borrowed(value.as_str()),
                None if self.unresolved.is_some_and(|known| known(span)) => {
                    Cow::Borrowed(UNRESOLVED_MACRO_STRING)
                }
                None => Cow::Borrowed(span),
            },
            Piece::Reference { text, index } => match self.references {
                Some(refs) => Cow::Borrowed(refs.lookup(index, text)),
                None => Cow::Borrowed(text),
            },
        }
    }

    pub fn apply(&self, text: &str) -> String {
        if !text.contains(['{', '$']) {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        for piece in split(text) {
            out.push_str(&self.replace(piece));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> FxHashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_split_round_trips() {
        for text in [
            "",
            "plain",
            "{A}{B}",
            "{{A}",
            "a } b { c",
            "$1 and $0 and $",
            "{$X:\"a}b\"} tail",
            "héllo {HOST.NAME} wörld",
        ] {
            let joined: String = split(text).iter().map(|p| p.as_str()).collect();
            assert_eq!(joined, text);
        }
    }

    #[test]
    fn test_later_brace_restarts_span() {
        let pieces = split("{{HOST.NAME}");
        assert_eq!(
            pieces,
            vec![Piece::Text("{"), Piece::Span("{HOST.NAME}")]
        );
    }

    #[test]
    fn test_unclosed_brace_is_text_and_references_survive() {
        let pieces = split("{ $1");
        assert_eq!(
            pieces,
            vec![
                Piece::Text("{ "),
                Piece::Reference {
                    text: "$1",
                    index: 1
                }
            ]
        );
    }

    #[test]
    fn test_quoted_context_keeps_braces() {
        let pieces = split(r#"{$M:"a}\"b"}!"#);
        assert_eq!(pieces, vec![Piece::Span(r#"{$M:"a}\"b"}"#), Piece::Text("!")]);
    }

    #[test]
    fn test_length_changing_replacement() {
        let map = values(&[("{A}", "xx"), ("{B}", "y")]);
        assert_eq!(Substitution::new(&map).apply("{A}{B}"), "xxy");
        let map = values(&[("{LONG.TOKEN}", ""), ("{B}", "longer value")]);
        assert_eq!(
            Substitution::new(&map).apply("<{LONG.TOKEN}|{B}>"),
            "<|longer value>"
        );
    }

    #[test]
    fn test_inserted_text_is_not_rescanned() {
        let map = values(&[("{A}", "{B}"), ("{B}", "b")]);
        assert_eq!(Substitution::new(&map).apply("{A}"), "{B}");
    }

    #[test]
    fn test_unknown_spans_left_alone() {
        let map = values(&[("{A}", "a")]);
        assert_eq!(Substitution::new(&map).apply("{Z} {A} {"), "{Z} a {");
    }

    #[test]
    fn test_known_but_missing_becomes_sentinel() {
        let map = FxHashMap::default();
        let known = |span: &str| span == "{HOST.NAME3}";
        let out = Substitution::new(&map)
            .with_unresolved(&known)
            .apply("{HOST.NAME3} {OTHER}");
        assert_eq!(out, "*UNKNOWN* {OTHER}");
    }

    #[test]
    fn test_references_by_miss_policy() {
        let map = FxHashMap::default();
        let refs = References::new(vec!["5".into()], ReferenceMiss::Empty);
        assert_eq!(
            Substitution::new(&map).with_references(&refs).apply("$1<$2>"),
            "5<>"
        );
        let refs = References::new(vec!["eth0".into()], ReferenceMiss::Keep);
        assert_eq!(
            Substitution::new(&map).with_references(&refs).apply("$1 $2"),
            "eth0 $2"
        );
        // no references configured: `$n` is plain text
        assert_eq!(Substitution::new(&map).apply("$1"), "$1");
    }
}
