//! In-memory `DataSource` over a fixed snapshot.
//!
//! Used by tests, benchmarks and callers that already hold their records
//! in memory. Every query is counted so tests can assert how many round
//! trips a resolution pass issued.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use super::DataSource;
use crate::errors::SourceError;
use crate::types::{
    FunctionId, FunctionRow, FxHashMap, FxHashSet, GlobalMacroRow, HistoryValue, HostId, HostRow,
    InterfaceRow, ItemId, ItemRow, TemplateLink, TriggerHost, TriggerId, UserMacroRow, ValueMapId,
    ValueMapping,
};

/// One stored value of one item, as it appears in a snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub item_id: ItemId,
    #[serde(flatten)]
    pub value: HistoryValue,
}

/// Serializable set of records backing a `MemorySource`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub functions: Vec<FunctionRow>,
    pub items: Vec<ItemRow>,
    pub hosts: Vec<HostRow>,
    pub interfaces: Vec<InterfaceRow>,
    pub history: Vec<HistoryRecord>,
    pub value_maps: Vec<ValueMapping>,
    pub host_macros: Vec<UserMacroRow>,
    pub template_links: Vec<TemplateLink>,
    pub global_macros: Vec<GlobalMacroRow>,
}

/// Number of calls made to each query since creation or the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallStats {
    pub functions: usize,
    pub items: usize,
    pub hosts: usize,
    pub interfaces: usize,
    pub last_values: usize,
    pub value_at: usize,
    pub value_maps: usize,
    pub trigger_hosts: usize,
    pub host_macros: usize,
    pub template_links: usize,
    pub global_macros: usize,
}

impl CallStats {
    pub fn total(&self) -> usize {
        self.functions
            + self.items
            + self.hosts
            + self.interfaces
            + self.last_values
            + self.value_at
            + self.value_maps
            + self.trigger_hosts
            + self.host_macros
            + self.template_links
            + self.global_macros
    }

    /// Calls made by the user-macro inheritance walk.
    pub fn macro_queries(&self) -> usize {
        self.host_macros + self.template_links + self.global_macros
    }
}

#[derive(Debug, Default)]
struct Counters {
    functions: AtomicUsize,
    items: AtomicUsize,
    hosts: AtomicUsize,
    interfaces: AtomicUsize,
    last_values: AtomicUsize,
    value_at: AtomicUsize,
    value_maps: AtomicUsize,
    trigger_hosts: AtomicUsize,
    host_macros: AtomicUsize,
    template_links: AtomicUsize,
    global_macros: AtomicUsize,
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::Relaxed);
}

/// `DataSource` answering from an in-memory `Snapshot`.
#[derive(Debug, Default)]
pub struct MemorySource {
    data: Snapshot,
    counters: Counters,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(data: Snapshot) -> Self {
        Self {
            data,
            counters: Counters::default(),
        }
    }

    /// Build a source from a JSON-encoded `Snapshot`.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let data: Snapshot =
            serde_json::from_str(json).map_err(|e| SourceError::InvalidSnapshot {
                message: e.to_string(),
            })?;
        Ok(Self::from_snapshot(data))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.data
    }

    pub fn with_host(mut self, host_id: u64, host: &str, name: &str) -> Self {
        self.data.hosts.push(HostRow {
            host_id: HostId(host_id),
            host: host.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_item(mut self, item: ItemRow) -> Self {
        self.data.items.push(item);
        self
    }

    pub fn with_function(mut self, function: FunctionRow) -> Self {
        self.data.functions.push(function);
        self
    }

    pub fn with_interface(mut self, interface: InterfaceRow) -> Self {
        self.data.interfaces.push(interface);
        self
    }

    pub fn with_value(mut self, item_id: u64, clock: i64, value: &str) -> Self {
        self.data.history.push(HistoryRecord {
            item_id: ItemId(item_id),
            value: HistoryValue {
                clock,
                ns: 0,
                value: value.to_string(),
            },
        });
        self
    }

    pub fn with_value_mapping(mut self, value_map_id: u64, value: &str, new_value: &str) -> Self {
        self.data.value_maps.push(ValueMapping {
            value_map_id: ValueMapId(value_map_id),
            value: value.to_string(),
            new_value: new_value.to_string(),
        });
        self
    }

    pub fn with_host_macro(mut self, host_id: u64, macro_name: &str, value: &str) -> Self {
        self.data.host_macros.push(UserMacroRow {
            host_id: HostId(host_id),
            macro_name: macro_name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn with_template_link(mut self, host_id: u64, template_id: u64) -> Self {
        self.data.template_links.push(TemplateLink {
            host_id: HostId(host_id),
            template_id: HostId(template_id),
        });
        self
    }

    pub fn with_global_macro(mut self, macro_name: &str, value: &str) -> Self {
        self.data.global_macros.push(GlobalMacroRow {
            macro_name: macro_name.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Query counts so far.
    pub fn calls(&self) -> CallStats {
        let c = &self.counters;
        let load = |a: &AtomicUsize| a.load(Ordering::Relaxed);
        CallStats {
            functions: load(&c.functions),
            items: load(&c.items),
            hosts: load(&c.hosts),
            interfaces: load(&c.interfaces),
            last_values: load(&c.last_values),
            value_at: load(&c.value_at),
            value_maps: load(&c.value_maps),
            trigger_hosts: load(&c.trigger_hosts),
            host_macros: load(&c.host_macros),
            template_links: load(&c.template_links),
            global_macros: load(&c.global_macros),
        }
    }

    pub fn reset_calls(&self) {
        let c = &self.counters;
        for counter in [
            &c.functions,
            &c.items,
            &c.hosts,
            &c.interfaces,
            &c.last_values,
            &c.value_at,
            &c.value_maps,
            &c.trigger_hosts,
            &c.host_macros,
            &c.template_links,
            &c.global_macros,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

fn id_set<T: Copy + Eq + std::hash::Hash>(ids: &[T]) -> FxHashSet<T> {
    ids.iter().copied().collect()
}

impl DataSource for MemorySource {
    fn fetch_functions(&self, function_ids: &[FunctionId]) -> Result<Vec<FunctionRow>, SourceError> {
        bump(&self.counters.functions);
        let wanted = id_set(function_ids);
        Ok(self
            .data
            .functions
            .iter()
            .filter(|f| wanted.contains(&f.function_id))
            .cloned()
            .collect())
    }

    fn fetch_items(&self, item_ids: &[ItemId]) -> Result<Vec<ItemRow>, SourceError> {
        bump(&self.counters.items);
        let wanted = id_set(item_ids);
        Ok(self
            .data
            .items
            .iter()
            .filter(|i| wanted.contains(&i.item_id))
            .cloned()
            .collect())
    }

    fn fetch_hosts(&self, host_ids: &[HostId]) -> Result<Vec<HostRow>, SourceError> {
        bump(&self.counters.hosts);
        let wanted = id_set(host_ids);
        Ok(self
            .data
            .hosts
            .iter()
            .filter(|h| wanted.contains(&h.host_id))
            .cloned()
            .collect())
    }

    fn fetch_interfaces(&self, host_ids: &[HostId]) -> Result<Vec<InterfaceRow>, SourceError> {
        bump(&self.counters.interfaces);
        let wanted = id_set(host_ids);
        Ok(self
            .data
            .interfaces
            .iter()
            .filter(|i| wanted.contains(&i.host_id))
            .cloned()
            .collect())
    }

    fn fetch_last_values(
        &self,
        item_ids: &[ItemId],
        since: i64,
    ) -> Result<FxHashMap<ItemId, HistoryValue>, SourceError> {
        bump(&self.counters.last_values);
        let wanted = id_set(item_ids);
        let mut latest: FxHashMap<ItemId, HistoryValue> = FxHashMap::default();
        for record in &self.data.history {
            if !wanted.contains(&record.item_id) || record.value.clock < since {
                continue;
            }
            let newer = latest.get(&record.item_id).map_or(true, |cur| {
                (record.value.clock, record.value.ns) > (cur.clock, cur.ns)
            });
            if newer {
                latest.insert(record.item_id, record.value.clone());
            }
        }
        Ok(latest)
    }

    fn fetch_values_at(
        &self,
        points: &[(ItemId, i64, i32)],
    ) -> Result<FxHashMap<(ItemId, i64, i32), HistoryValue>, SourceError> {
        bump(&self.counters.value_at);
        Ok(points
            .iter()
            .filter_map(|&(item_id, clock, ns)| {
                self.data
                    .history
                    .iter()
                    .filter(|r| r.item_id == item_id && (r.value.clock, r.value.ns) <= (clock, ns))
                    .max_by_key(|r| (r.value.clock, r.value.ns))
                    .map(|r| ((item_id, clock, ns), r.value.clone()))
            })
            .collect())
    }

    fn fetch_value_maps(
        &self,
        value_map_ids: &[ValueMapId],
    ) -> Result<Vec<ValueMapping>, SourceError> {
        bump(&self.counters.value_maps);
        let wanted = id_set(value_map_ids);
        Ok(self
            .data
            .value_maps
            .iter()
            .filter(|m| wanted.contains(&m.value_map_id))
            .cloned()
            .collect())
    }

    fn fetch_trigger_hosts(
        &self,
        trigger_ids: &[TriggerId],
    ) -> Result<Vec<TriggerHost>, SourceError> {
        bump(&self.counters.trigger_hosts);
        let wanted = id_set(trigger_ids);
        let mut seen: FxHashSet<(TriggerId, HostId)> = FxHashSet::default();
        let mut rows = Vec::new();
        for f in &self.data.functions {
            if wanted.contains(&f.trigger_id) && seen.insert((f.trigger_id, f.host_id)) {
                rows.push(TriggerHost {
                    trigger_id: f.trigger_id,
                    host_id: f.host_id,
                });
            }
        }
        Ok(rows)
    }

    fn fetch_host_macros(&self, host_ids: &[HostId]) -> Result<Vec<UserMacroRow>, SourceError> {
        bump(&self.counters.host_macros);
        let wanted = id_set(host_ids);
        Ok(self
            .data
            .host_macros
            .iter()
            .filter(|m| wanted.contains(&m.host_id))
            .cloned()
            .collect())
    }

    fn fetch_host_template_links(
        &self,
        host_ids: &[HostId],
    ) -> Result<Vec<TemplateLink>, SourceError> {
        bump(&self.counters.template_links);
        let wanted = id_set(host_ids);
        Ok(self
            .data
            .template_links
            .iter()
            .filter(|l| wanted.contains(&l.host_id))
            .copied()
            .collect())
    }

    fn fetch_global_macros(&self) -> Result<Vec<GlobalMacroRow>, SourceError> {
        bump(&self.counters.global_macros);
        Ok(self.data.global_macros.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_value_respects_lower_bound() {
        let src = MemorySource::new()
            .with_value(1, 100, "old")
            .with_value(1, 200, "new")
            .with_value(2, 50, "stale");
        let values = src.fetch_last_values(&[ItemId(1), ItemId(2)], 100).unwrap();
        assert_eq!(values[&ItemId(1)].value, "new");
        assert!(!values.contains_key(&ItemId(2)));
    }

    #[test]
    fn test_value_at_picks_latest_not_after() {
        let src = MemorySource::new()
            .with_value(1, 100, "a")
            .with_value(1, 200, "b")
            .with_value(1, 300, "c");
        let found = src
            .fetch_values_at(&[(ItemId(1), 250, 0), (ItemId(1), 99, 0), (ItemId(1), 300, 0)])
            .unwrap();
        assert_eq!(found[&(ItemId(1), 250, 0)].value, "b");
        assert_eq!(found[&(ItemId(1), 300, 0)].value, "c");
        assert!(!found.contains_key(&(ItemId(1), 99, 0)));
        assert_eq!(src.calls().value_at, 1);
    }

    #[test]
    fn test_calls_are_counted_and_reset() {
        let src = MemorySource::new();
        src.fetch_hosts(&[HostId(1)]).unwrap();
        src.fetch_hosts(&[HostId(2)]).unwrap();
        src.fetch_global_macros().unwrap();
        let calls = src.calls();
        assert_eq!(calls.hosts, 2);
        assert_eq!(calls.macro_queries(), 1);
        assert_eq!(calls.total(), 3);
        src.reset_calls();
        assert_eq!(src.calls().total(), 0);
    }

    #[test]
    fn test_from_json_snapshot() {
        let json = r#"{
            "hosts": [{"host_id": 10, "host": "web01", "name": "Web 01"}],
            "history": [{"item_id": 5, "clock": 10, "value": "1.5"}]
        }"#;
        let src = MemorySource::from_json(json).unwrap();
        assert_eq!(src.snapshot().hosts.len(), 1);
        assert_eq!(src.snapshot().history[0].value.value, "1.5");
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = MemorySource::from_json("{not json").unwrap_err();
        assert!(matches!(err, SourceError::InvalidSnapshot { .. }));
    }
}
