//! Trigger expression helpers: function slots and literal operands.

use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;

use zmacro_core::types::FunctionId;

use crate::substitute::{split, Piece};
use crate::usermacro;

static RE_NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?[KMGTsmhdw]?").ok()
});

/// Function id of a `{<digits>}` span.
pub fn function_id(span: &str) -> Option<FunctionId> {
    let digits = span.strip_prefix('{')?.strip_suffix('}')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok().map(FunctionId)
}

/// Every function id of an expression, in order of appearance.
pub fn function_ids(expression: &str) -> Vec<FunctionId> {
    split(expression)
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Span(span) => function_id(span),
            _ => None,
        })
        .collect()
}

/// Slot number -> function id for one expression.
///
/// Slot `n` (1-based) is the n-th function reference by position, not by
/// id value. Slot 0 is the slot of macros written without a number and
/// aliases slot 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionIndex {
    slots: SmallVec<[FunctionId; 4]>,
}

impl FunctionIndex {
    pub fn parse(expression: &str) -> Self {
        Self {
            slots: function_ids(expression).into_iter().collect(),
        }
    }

    pub fn get(&self, slot: u8) -> Option<FunctionId> {
        let position = usize::from(slot.max(1)) - 1;
        self.slots.get(position).copied()
    }

    pub fn function_ids(&self) -> impl Iterator<Item = FunctionId> + '_ {
        self.slots.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn unquote(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Byte length of the quoted string starting at the beginning of `text`.
fn quoted_len(text: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, ch) in text.char_indices().skip(1) {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Literal operands of an expression in order of appearance: numbers
/// (with an optional suffix), user macros and unquoted strings.
///
/// Function references and other macros are skipped; digits that belong to
/// an identifier (`and`, `or`, function names) do not count.
pub fn literal_values(expression: &str) -> Vec<String> {
    let mut values = Vec::new();
    let Some(number) = RE_NUMBER.as_ref() else {
        tracing::warn!("number pattern failed to compile");
        return values;
    };

    for piece in split(expression) {
        let text = match piece {
            Piece::Span(span) => {
                if usermacro::is_user_macro(span) {
                    values.push(span.to_string());
                }
                continue;
            }
            Piece::Reference { text, .. } | Piece::Text(text) => text,
        };

        let mut pos = 0;
        while let Some(ch) = text[pos..].chars().next() {
            let rest = &text[pos..];
            if ch == '"' {
                if let Some(len) = quoted_len(rest) {
                    values.push(unquote(&rest[..len]));
                    pos += len;
                    continue;
                }
            } else if ch.is_ascii_alphabetic() || ch == '_' {
                pos += rest
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(rest.len());
                continue;
            } else if let Some(m) = number.find(rest) {
                values.push(m.as_str().to_string());
                pos += m.end();
                continue;
            }
            pos += ch.len_utf8();
        }
    }
    values
}
