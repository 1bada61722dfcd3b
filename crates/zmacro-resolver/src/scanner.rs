//! Token scanner: finds the macros of given categories in a text.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use zmacro_core::constants::MAX_SLOT;

use crate::substitute::{split, Piece};
use crate::usermacro;

static RE_BUILTIN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^\{(HOSTNAME|HOST\.HOST|HOST\.NAME|HOST\.ID|IPADDRESS|HOST\.IP|HOST\.DNS|HOST\.CONN|HOST\.PORT|ITEM\.LASTVALUE|ITEM\.VALUE|TRIGGER\.ID|TRIGGER\.VALUE)([1-9]?)\}$",
    )
    .ok()
});

/// Macro family; decides which resolver answers a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Host,
    Interface,
    Item,
    Trigger,
}

/// Built-in macro names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MacroName {
    Hostname,
    HostHost,
    HostName,
    HostId,
    IpAddress,
    HostIp,
    HostDns,
    HostConn,
    HostPort,
    ItemLastValue,
    ItemValue,
    TriggerId,
    TriggerValue,
}

impl MacroName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hostname => "HOSTNAME",
            Self::HostHost => "HOST.HOST",
            Self::HostName => "HOST.NAME",
            Self::HostId => "HOST.ID",
            Self::IpAddress => "IPADDRESS",
            Self::HostIp => "HOST.IP",
            Self::HostDns => "HOST.DNS",
            Self::HostConn => "HOST.CONN",
            Self::HostPort => "HOST.PORT",
            Self::ItemLastValue => "ITEM.LASTVALUE",
            Self::ItemValue => "ITEM.VALUE",
            Self::TriggerId => "TRIGGER.ID",
            Self::TriggerValue => "TRIGGER.VALUE",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "HOSTNAME" => Self::Hostname,
            "HOST.HOST" => Self::HostHost,
            "HOST.NAME" => Self::HostName,
            "HOST.ID" => Self::HostId,
            "IPADDRESS" => Self::IpAddress,
            "HOST.IP" => Self::HostIp,
            "HOST.DNS" => Self::HostDns,
            "HOST.CONN" => Self::HostConn,
            "HOST.PORT" => Self::HostPort,
            "ITEM.LASTVALUE" => Self::ItemLastValue,
            "ITEM.VALUE" => Self::ItemValue,
            "TRIGGER.ID" => Self::TriggerId,
            "TRIGGER.VALUE" => Self::TriggerValue,
            _ => return None,
        })
    }

    pub fn category(self) -> Category {
        match self {
            Self::Hostname | Self::HostHost | Self::HostName | Self::HostId => Category::Host,
            Self::IpAddress | Self::HostIp | Self::HostDns | Self::HostConn | Self::HostPort => {
                Category::Interface
            }
            Self::ItemLastValue | Self::ItemValue => Category::Item,
            Self::TriggerId | Self::TriggerValue => Category::Trigger,
        }
    }

    /// Trigger macros never carry a slot number.
    pub fn takes_slot(self) -> bool {
        self.category() != Category::Trigger
    }
}

impl fmt::Display for MacroName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A built-in macro occurrence: name plus slot (0 when unnumbered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MacroToken {
    pub name: MacroName,
    pub slot: u8,
}

impl MacroToken {
    pub fn new(name: MacroName, slot: u8) -> Self {
        Self { name, slot }
    }

    /// Parse a full `{NAME}` / `{NAMEn}` span.
    pub fn parse(span: &str) -> Option<Self> {
        let caps = RE_BUILTIN.as_ref()?.captures(span)?;
        let name = MacroName::from_name(caps.get(1)?.as_str())?;
        let slot = match caps.get(2).map(|m| m.as_str()) {
            Some(digit) if !digit.is_empty() => digit.parse::<u8>().ok()?,
            _ => 0,
        };
        if slot > MAX_SLOT || (slot > 0 && !name.takes_slot()) {
            return None;
        }
        Some(Self { name, slot })
    }

    /// The token exactly as written in source text.
    pub fn literal(&self) -> String {
        if self.slot == 0 {
            format!("{{{}}}", self.name)
        } else {
            format!("{{{}{}}}", self.name, self.slot)
        }
    }
}

/// Which built-in macros a field accepts.
#[derive(Debug, Clone, Copy)]
pub struct TokenFilter<'a> {
    pub names: &'a [MacroName],
    /// Whether `{NAMEn}` forms are accepted.
    pub numbered: bool,
}

impl TokenFilter<'_> {
    pub fn accepts(&self, token: &MacroToken) -> bool {
        self.names.contains(&token.name) && (self.numbered || token.slot == 0)
    }

    pub fn parse(&self, span: &str) -> Option<MacroToken> {
        MacroToken::parse(span).filter(|token| self.accepts(token))
    }
}

/// Built-in tokens of a text grouped by name: `name -> slots`.
///
/// Repeated occurrences collapse; a name used with two slots contributes
/// both.
pub fn scan(text: &str, filter: TokenFilter<'_>) -> BTreeMap<MacroName, BTreeSet<u8>> {
    let mut found: BTreeMap<MacroName, BTreeSet<u8>> = BTreeMap::new();
    for token in tokens(text, filter) {
        found.entry(token.name).or_default().insert(token.slot);
    }
    found
}

/// Distinct built-in tokens of a text, in first-seen order.
pub fn tokens(text: &str, filter: TokenFilter<'_>) -> Vec<MacroToken> {
    let mut out: Vec<MacroToken> = Vec::new();
    if !text.contains('{') {
        return out;
    }
    for piece in split(text) {
        if let Piece::Span(span) = piece {
            if let Some(token) = filter.parse(span) {
                if !out.contains(&token) {
                    out.push(token);
                }
            }
        }
    }
    out
}

/// Distinct user macro texts in a text.
pub fn user_macros(text: &str) -> BTreeSet<String> {
    if !text.contains("{$") {
        return BTreeSet::new();
    }
    split(text)
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Span(span) if usermacro::is_user_macro(span) => Some(span.to_string()),
            _ => None,
        })
        .collect()
}

/// Whether the text has any `$1`..`$9` reference outside brace spans.
pub fn has_references(text: &str) -> bool {
    text.contains('$')
        && split(text)
            .iter()
            .any(|piece| matches!(piece, Piece::Reference { .. }))
}
