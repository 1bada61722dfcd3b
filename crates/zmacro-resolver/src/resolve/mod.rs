//! Per-category value resolvers.
//!
//! Every resolver works on a whole batch of token sites at once and issues
//! one bulk query per table it needs. Results land in a per-entry map from
//! literal token text to replacement. Sites whose data is gone get the
//! unresolved sentinel; nothing here fails on a miss.

pub mod host;
pub mod interface;
pub mod item;
pub mod reference;
pub mod user;

use rustc_hash::{FxHashMap, FxHashSet};

use zmacro_core::types::{HostId, InterfaceId, ItemId};

use crate::scanner::{Category, MacroToken};

/// Replacement values of one entry, keyed by literal token text.
pub type EntryValues = FxHashMap<String, String>;

/// What a token resolves against once its slot is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub host_id: HostId,
    pub item_id: Option<ItemId>,
    /// The item's own interface, when it has one.
    pub interface_id: Option<InterfaceId>,
}

impl Target {
    pub fn host(host_id: HostId) -> Self {
        Self {
            host_id,
            item_id: None,
            interface_id: None,
        }
    }
}

/// One built-in token of one entry, bound to its target.
#[derive(Debug, Clone, Copy)]
pub struct TokenSite {
    /// Index of the entry in the batch.
    pub entry: usize,
    pub token: MacroToken,
    pub target: Target,
}

pub(crate) fn sites_of(sites: &[TokenSite], category: Category) -> Vec<&TokenSite> {
    sites
        .iter()
        .filter(|site| site.token.name.category() == category)
        .collect()
}

/// Distinct values in first-seen order.
pub(crate) fn distinct<T: Copy + Eq + std::hash::Hash>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = FxHashSet::default();
    values.filter(|v| seen.insert(*v)).collect()
}

pub(crate) fn set(values: &mut [EntryValues], site: &TokenSite, value: String) {
    values[site.entry].insert(site.token.literal(), value);
}
