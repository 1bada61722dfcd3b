//! Item value macros: `{ITEM.LASTVALUE}` and `{ITEM.VALUE}`.

use rustc_hash::FxHashMap;

use zmacro_core::constants::UNRESOLVED_MACRO_STRING;
use zmacro_core::errors::SourceError;
use zmacro_core::types::{HistoryValue, ItemId, ItemRow, ValueMapId};
use zmacro_core::DataSource;

use super::{distinct, set, sites_of, EntryValues, TokenSite};
use crate::format::format_history_value;
use crate::scanner::{Category, MacroName};

/// Event time of an entry: `(clock, ns)`.
pub type EventTime = (i64, i32);

#[derive(Debug, Clone, Copy)]
pub struct ItemValueOptions {
    /// Oldest clock a "last value" may have.
    pub since: i64,
    pub trim_length: usize,
    /// `{ITEM.VALUE}` is the value at the entry's event time.
    pub at_event: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Lookup {
    Latest(ItemId),
    At(ItemId, i64, i32),
}

fn lookup_for(site: &TokenSite, item_id: ItemId, events: &[Option<EventTime>], at_event: bool) -> Lookup {
    let event = events.get(site.entry).copied().flatten();
    match (site.token.name, event) {
        (MacroName::ItemValue, Some((clock, ns))) if at_event => Lookup::At(item_id, clock, ns),
        _ => Lookup::Latest(item_id),
    }
}

pub fn resolve<S: DataSource + ?Sized>(
    source: &S,
    sites: &[TokenSite],
    events: &[Option<EventTime>],
    options: ItemValueOptions,
    values: &mut [EntryValues],
) -> Result<(), SourceError> {
    let sites = sites_of(sites, Category::Item);
    if sites.is_empty() {
        return Ok(());
    }

    let item_ids = distinct(sites.iter().filter_map(|site| site.target.item_id));
    let items: FxHashMap<ItemId, ItemRow> = if item_ids.is_empty() {
        FxHashMap::default()
    } else {
        source
            .fetch_items(&item_ids)?
            .into_iter()
            .map(|item| (item.item_id, item))
            .collect()
    };

    let lookups = distinct(sites.iter().filter_map(|site| {
        let item_id = site.target.item_id.filter(|id| items.contains_key(id))?;
        Some(lookup_for(site, item_id, events, options.at_event))
    }));

    let latest_ids: Vec<ItemId> = lookups
        .iter()
        .filter_map(|lookup| match lookup {
            Lookup::Latest(id) => Some(*id),
            Lookup::At(..) => None,
        })
        .collect();
    let latest = if latest_ids.is_empty() {
        FxHashMap::default()
    } else {
        source.fetch_last_values(&latest_ids, options.since)?
    };

    let points: Vec<(ItemId, i64, i32)> = lookups
        .iter()
        .filter_map(|lookup| match *lookup {
            Lookup::At(id, clock, ns) => Some((id, clock, ns)),
            Lookup::Latest(_) => None,
        })
        .collect();
    let at_event = if points.is_empty() {
        FxHashMap::default()
    } else {
        source.fetch_values_at(&points)?
    };

    let found: FxHashMap<Lookup, HistoryValue> = lookups
        .iter()
        .filter_map(|lookup| {
            let value = match *lookup {
                Lookup::Latest(id) => latest.get(&id),
                Lookup::At(id, clock, ns) => at_event.get(&(id, clock, ns)),
            };
            Some((*lookup, value?.clone()))
        })
        .collect();

    let map_ids = distinct(found.keys().filter_map(|lookup| {
        let id = match lookup {
            Lookup::Latest(id) | Lookup::At(id, ..) => id,
        };
        items.get(id).and_then(|item| item.value_map_id)
    }));
    let mappings: FxHashMap<(ValueMapId, String), String> = if map_ids.is_empty() {
        FxHashMap::default()
    } else {
        source
            .fetch_value_maps(&map_ids)?
            .into_iter()
            .map(|m| ((m.value_map_id, m.value), m.new_value))
            .collect()
    };

    for site in sites {
        let resolved = site
            .target
            .item_id
            .and_then(|id| items.get(&id))
            .and_then(|item| {
                let lookup = lookup_for(site, item.item_id, events, options.at_event);
                let stored = found.get(&lookup)?;
                let mapped = item
                    .value_map_id
                    .and_then(|map_id| mappings.get(&(map_id, stored.value.clone())));
                Some(format_history_value(
                    item,
                    &stored.value,
                    mapped.map(String::as_str),
                    options.trim_length,
                ))
            });
        set(
            values,
            site,
            resolved.unwrap_or_else(|| UNRESOLVED_MACRO_STRING.to_string()),
        );
    }

    tracing::debug!(
        items = items.len(),
        lookups = lookups.len(),
        found = found.len(),
        "item values resolved"
    );
    Ok(())
}
