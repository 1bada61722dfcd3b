//! Field configurations: which macros a field may contain and how they bind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use zmacro_core::errors::ResolveError;

use crate::resolve::interface::InterfaceSelection;
use crate::scanner::{Category, MacroName, TokenFilter};

use MacroName::*;

/// Rules for resolving one kind of field.
#[derive(Debug, Clone, Copy)]
pub struct FieldConfig {
    /// Built-in macros the field may contain.
    pub macros: &'static [MacroName],
    /// Whether `{NAMEn}` forms address function slots.
    pub numbered: bool,
    pub interface: InterfaceSelection,
    pub user_macros: bool,
    /// `{ITEM.VALUE}` uses the value at event time instead of the latest.
    pub item_value_at_event: bool,
}

const HOST_NAMES: &[MacroName] = &[Hostname, HostHost, HostName];

impl FieldConfig {
    pub const TRIGGER_NAME: Self = Self {
        macros: &[
            Hostname,
            HostHost,
            HostName,
            IpAddress,
            HostIp,
            HostDns,
            HostConn,
            HostPort,
            ItemLastValue,
            ItemValue,
        ],
        numbered: true,
        interface: InterfaceSelection::Prioritised,
        user_macros: true,
        item_value_at_event: false,
    };

    pub const TRIGGER_DESCRIPTION: Self = Self::TRIGGER_NAME;

    pub const TRIGGER_URL: Self = Self {
        macros: &[
            TriggerId, HostId, HostHost, HostName, IpAddress, HostIp, HostDns, HostConn, HostPort,
        ],
        ..Self::TRIGGER_NAME
    };

    pub const ITEM_KEY: Self = Self {
        macros: &[
            Hostname, HostHost, HostName, IpAddress, HostIp, HostDns, HostConn,
        ],
        numbered: false,
        interface: InterfaceSelection::ItemOrPrioritised,
        user_macros: true,
        item_value_at_event: false,
    };

    pub const USER_ONLY: Self = Self {
        macros: &[],
        numbered: false,
        interface: InterfaceSelection::Prioritised,
        user_macros: true,
        item_value_at_event: false,
    };

    pub const NONE: Self = Self {
        user_macros: false,
        ..Self::USER_ONLY
    };

    pub fn filter(&self) -> TokenFilter<'static> {
        TokenFilter {
            names: self.macros,
            numbered: self.numbered,
        }
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.macros.iter().any(|name| name.category() == category)
    }

    const fn text(macros: &'static [MacroName], interface: InterfaceSelection) -> Self {
        Self {
            macros,
            numbered: false,
            interface,
            user_macros: true,
            item_value_at_event: false,
        }
    }
}

/// Named configurations for free-standing texts bound to a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextConfig {
    ScriptConfirmation,
    HttpTestName,
    /// Interface addresses; only the main agent interface counts.
    HostInterfaceIpDns,
    /// Used to expand interface addresses themselves; has no interface
    /// macros so it cannot recurse.
    HostInterfaceIpDnsAgentPrimary,
    HostInterfacePort,
    #[serde(rename = "screenElementURL")]
    ScreenElementUrl,
    #[serde(rename = "screenElementURLUser")]
    ScreenElementUrlUser,
    MapLabel,
}

const TEXT_HOST_ADDRESS: &[MacroName] = &[
    Hostname, HostHost, HostName, IpAddress, HostIp, HostDns, HostConn,
];
const TEXT_HOST_ID_ADDRESS: &[MacroName] = &[
    Hostname, HostHost, HostName, HostId, IpAddress, HostIp, HostDns, HostConn,
];

impl TextConfig {
    pub const ALL: [Self; 8] = [
        Self::ScriptConfirmation,
        Self::HttpTestName,
        Self::HostInterfaceIpDns,
        Self::HostInterfaceIpDnsAgentPrimary,
        Self::HostInterfacePort,
        Self::ScreenElementUrl,
        Self::ScreenElementUrlUser,
        Self::MapLabel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ScriptConfirmation => "scriptConfirmation",
            Self::HttpTestName => "httpTestName",
            Self::HostInterfaceIpDns => "hostInterfaceIpDns",
            Self::HostInterfaceIpDnsAgentPrimary => "hostInterfaceIpDnsAgentPrimary",
            Self::HostInterfacePort => "hostInterfacePort",
            Self::ScreenElementUrl => "screenElementURL",
            Self::ScreenElementUrlUser => "screenElementURLUser",
            Self::MapLabel => "mapLabel",
        }
    }

    pub fn field_config(self) -> FieldConfig {
        use InterfaceSelection::{AgentOnly, Prioritised};
        match self {
            Self::ScriptConfirmation | Self::HttpTestName => {
                FieldConfig::text(TEXT_HOST_ADDRESS, Prioritised)
            }
            Self::HostInterfaceIpDns => FieldConfig::text(TEXT_HOST_ADDRESS, AgentOnly),
            Self::HostInterfaceIpDnsAgentPrimary => FieldConfig::text(HOST_NAMES, Prioritised),
            Self::HostInterfacePort | Self::ScreenElementUrlUser => FieldConfig::USER_ONLY,
            Self::ScreenElementUrl | Self::MapLabel => {
                FieldConfig::text(TEXT_HOST_ID_ADDRESS, Prioritised)
            }
        }
    }
}

impl fmt::Display for TextConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextConfig {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|config| config.name() == s)
            .ok_or_else(|| ResolveError::UnknownTextConfig {
                name: s.to_string(),
            })
    }
}
