//! Read-only records consumed by the resolver.
//!
//! Everything here is a snapshot fetched at the start of a batch. The
//! engine never mutates these; resolved text is returned separately.

use serde::{Deserialize, Serialize};

use super::identifiers::{FunctionId, HostId, InterfaceId, ItemId, TriggerId, ValueMapId};

/// A trigger as handed to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub trigger_id: TriggerId,
    /// Trigger name template, e.g. `High load on {HOST.NAME}`.
    pub description: String,
    /// Boolean expression over `{<functionid>}` references.
    pub expression: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub url: String,
    /// 0 = OK, 1 = PROBLEM.
    #[serde(default)]
    pub value: i32,
    /// Event time, used when item values are resolved "at event time".
    #[serde(default)]
    pub clock: i64,
    #[serde(default)]
    pub ns: i32,
}

impl Trigger {
    pub fn new(
        trigger_id: impl Into<TriggerId>,
        description: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            trigger_id: trigger_id.into(),
            description: description.into(),
            expression: expression.into(),
            comments: String::new(),
            url: String::new(),
            value: 0,
            clock: 0,
            ns: 0,
        }
    }
}

/// One function of a trigger expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRow {
    pub function_id: FunctionId,
    pub trigger_id: TriggerId,
    pub item_id: ItemId,
    /// Host owning the item. Denormalised for cheap host lookups.
    pub host_id: HostId,
    /// Aggregation name, e.g. `last`, `avg`.
    pub function: String,
    #[serde(default)]
    pub parameter: String,
}

/// Declared storage type of an item's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Float,
    Character,
    Log,
    Unsigned,
    Text,
}

impl ValueType {
    /// Numeric code used by the storage layer.
    pub fn code(self) -> i64 {
        match self {
            Self::Float => 0,
            Self::Character => 1,
            Self::Log => 2,
            Self::Unsigned => 3,
            Self::Text => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Float),
            1 => Some(Self::Character),
            2 => Some(Self::Log),
            3 => Some(Self::Unsigned),
            4 => Some(Self::Text),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Float | Self::Unsigned)
    }
}

/// A monitored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    pub item_id: ItemId,
    pub host_id: HostId,
    #[serde(default)]
    pub interface_id: Option<InterfaceId>,
    pub name: String,
    pub key: String,
    pub value_type: ValueType,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub value_map_id: Option<ValueMapId>,
}

/// A host or template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRow {
    pub host_id: HostId,
    /// Technical name (`{HOST.HOST}`).
    pub host: String,
    /// Visible name (`{HOST.NAME}`).
    pub name: String,
}

/// Host interface kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceType {
    Agent,
    Snmp,
    Ipmi,
    Jmx,
}

impl InterfaceType {
    /// Selection weight when a host has several main interfaces.
    /// Agent > SNMP > JMX > IPMI.
    pub fn priority(self) -> u8 {
        match self {
            Self::Agent => 4,
            Self::Snmp => 3,
            Self::Jmx => 2,
            Self::Ipmi => 1,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Agent => 1,
            Self::Snmp => 2,
            Self::Ipmi => 3,
            Self::Jmx => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Agent),
            2 => Some(Self::Snmp),
            3 => Some(Self::Ipmi),
            4 => Some(Self::Jmx),
            _ => None,
        }
    }
}

/// A host interface. Only `main` interfaces are candidates for host-level
/// interface macros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRow {
    pub interface_id: InterfaceId,
    pub host_id: HostId,
    #[serde(rename = "type")]
    pub interface_type: InterfaceType,
    pub main: bool,
    pub use_ip: bool,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub dns: String,
    #[serde(default)]
    pub port: String,
}

impl InterfaceRow {
    /// Address used for connections: IP when `use_ip`, DNS otherwise.
    pub fn conn(&self) -> &str {
        if self.use_ip {
            &self.ip
        } else {
            &self.dns
        }
    }
}

/// A stored item value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryValue {
    pub clock: i64,
    #[serde(default)]
    pub ns: i32,
    pub value: String,
}

/// One entry of a value map: raw value -> display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueMapping {
    pub value_map_id: ValueMapId,
    pub value: String,
    pub new_value: String,
}

/// A user macro defined on a host or template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMacroRow {
    pub host_id: HostId,
    /// Full macro text, e.g. `{$PORT}` or `{$PORT:"eth0"}`.
    pub macro_name: String,
    pub value: String,
}

/// Host (or template) -> linked template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLink {
    pub host_id: HostId,
    pub template_id: HostId,
}

/// A user macro defined globally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalMacroRow {
    pub macro_name: String,
    pub value: String,
}

/// Trigger -> host it monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerHost {
    pub trigger_id: TriggerId,
    pub host_id: HostId,
}
