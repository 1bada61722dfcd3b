//! Record types and typed identifiers.

pub mod collections;
pub mod identifiers;
pub mod records;

pub use collections::{FxHashMap, FxHashSet};
pub use identifiers::{FunctionId, HostId, InterfaceId, ItemId, TriggerId, ValueMapId};
pub use records::{
    FunctionRow, GlobalMacroRow, HistoryValue, HostRow, InterfaceRow, InterfaceType, ItemRow,
    TemplateLink, Trigger, TriggerHost, UserMacroRow, ValueMapping, ValueType,
};
