//! User macro syntax: `{$NAME}`, `{$NAME:ctx}`, `{$NAME:"ctx"}` and
//! `{$NAME:regex:"pattern"}`.

use std::sync::LazyLock;

use regex::Regex;

static RE_USER_MACRO: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r#"^\{\$([A-Z0-9_.]+)(?::[ ]*((?:regex:[ ]*)?(?:"(?:[^"\\]|\\.)*"[ ]*|[^"}]*)))?\}$"#,
    )
    .ok()
});

/// Context part of a user macro.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MacroContext {
    Exact(String),
    Regex(String),
}

/// A parsed user macro reference or definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserMacro {
    pub name: String,
    pub context: Option<MacroContext>,
}

fn unquote_context(raw: &str) -> String {
    let trimmed = raw.trim_end_matches(' ');
    match trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\\\"", "\""),
        None => raw.to_string(),
    }
}

impl UserMacro {
    /// Parse a full `{$...}` text. Returns `None` when it is not a user macro.
    pub fn parse(text: &str) -> Option<Self> {
        let re = RE_USER_MACRO.as_ref()?;
        let caps = re.captures(text)?;
        let name = caps.get(1)?.as_str().to_string();
        let context = caps.get(2).map(|m| {
            let raw = m.as_str();
            match raw.strip_prefix("regex:") {
                Some(pattern) => MacroContext::Regex(unquote_context(pattern.trim_start())),
                None => MacroContext::Exact(unquote_context(raw)),
            }
        });
        Some(Self { name, context })
    }

    /// The context a lookup is made with. A regex context in a reference is
    /// not a lookup context; it only has meaning on definitions.
    pub fn lookup_context(&self) -> Option<&str> {
        match &self.context {
            Some(MacroContext::Exact(ctx)) => Some(ctx),
            _ => None,
        }
    }
}

/// Whether `text` is a user macro reference as it may appear in resolvable
/// text. Regex contexts are only valid on definitions.
pub fn is_user_macro(text: &str) -> bool {
    text.starts_with("{$")
        && UserMacro::parse(text)
            .is_some_and(|parsed| !matches!(parsed.context, Some(MacroContext::Regex(_))))
}
