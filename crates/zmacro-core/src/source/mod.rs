//! The data-access collaborator contract.
//!
//! The resolver never talks to storage directly. Every lookup goes through
//! a `DataSource`, always in bulk: each method takes the full set of ids a
//! batch needs so one resolution pass issues a bounded number of queries.

pub mod memory;

pub use memory::{CallStats, HistoryRecord, MemorySource, Snapshot};

use crate::errors::SourceError;
use crate::types::{
    FunctionId, FunctionRow, FxHashMap, GlobalMacroRow, HistoryValue, HostId, HostRow,
    InterfaceRow, ItemId, ItemRow, TemplateLink, TriggerHost, TriggerId, UserMacroRow, ValueMapId,
    ValueMapping,
};

/// Read-only bulk queries the resolver depends on.
///
/// Implementations must be safe to share between threads; independent
/// batches may resolve concurrently against the same source. Ids with no
/// matching row are simply absent from the result.
pub trait DataSource: Send + Sync {
    fn fetch_functions(&self, function_ids: &[FunctionId]) -> Result<Vec<FunctionRow>, SourceError>;

    fn fetch_items(&self, item_ids: &[ItemId]) -> Result<Vec<ItemRow>, SourceError>;

    fn fetch_hosts(&self, host_ids: &[HostId]) -> Result<Vec<HostRow>, SourceError>;

    /// All interfaces of the given hosts, main or not.
    fn fetch_interfaces(&self, host_ids: &[HostId]) -> Result<Vec<InterfaceRow>, SourceError>;

    /// Latest value per item with `clock >= since`.
    fn fetch_last_values(
        &self,
        item_ids: &[ItemId],
        since: i64,
    ) -> Result<FxHashMap<ItemId, HistoryValue>, SourceError>;

    /// Latest value of each item at or before its `(clock, ns)`, keyed by
    /// the requested point.
    fn fetch_values_at(
        &self,
        points: &[(ItemId, i64, i32)],
    ) -> Result<FxHashMap<(ItemId, i64, i32), HistoryValue>, SourceError>;

    fn fetch_value_maps(
        &self,
        value_map_ids: &[ValueMapId],
    ) -> Result<Vec<ValueMapping>, SourceError>;

    /// Distinct hosts monitored by each trigger.
    fn fetch_trigger_hosts(&self, trigger_ids: &[TriggerId])
        -> Result<Vec<TriggerHost>, SourceError>;

    fn fetch_host_macros(&self, host_ids: &[HostId]) -> Result<Vec<UserMacroRow>, SourceError>;

    fn fetch_host_template_links(
        &self,
        host_ids: &[HostId],
    ) -> Result<Vec<TemplateLink>, SourceError>;

    fn fetch_global_macros(&self) -> Result<Vec<GlobalMacroRow>, SourceError>;
}
