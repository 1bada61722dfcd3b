//! Item names, item keys and function parameters.

use std::collections::BTreeMap;

use smallvec::SmallVec;
use tracing::instrument;

use zmacro_core::errors::{ResolveError, SourceError};
use zmacro_core::types::{FunctionId, FunctionRow, ItemId, ItemRow};
use zmacro_core::DataSource;

use super::{Binding, Entry, FieldConfig, HostScope, MacroResolver};
use crate::resolve::{reference, Target};

fn item_target(item: &ItemRow) -> Target {
    Target {
        host_id: item.host_id,
        item_id: Some(item.item_id),
        interface_id: item.interface_id,
    }
}

fn item_entry<'t>(item: &ItemRow, text: &'t str) -> Entry<'t> {
    Entry::new(
        text,
        Binding::Fixed(item_target(item)),
        HostScope::Hosts(SmallVec::from_elem(item.host_id, 1)),
    )
}

impl<S: DataSource + ?Sized> MacroResolver<'_, S> {
    pub(crate) fn item_keys(&self, items: &[ItemRow]) -> Result<Vec<(ItemId, String)>, SourceError> {
        let entries: Vec<Entry<'_>> = items.iter().map(|item| item_entry(item, &item.key)).collect();
        let resolved = self.resolve_entries(&entries, &FieldConfig::ITEM_KEY)?;
        Ok(items.iter().map(|item| item.item_id).zip(resolved).collect())
    }

    pub(crate) fn function_parameters(
        &self,
        functions: &[FunctionRow],
    ) -> Result<Vec<(FunctionId, String)>, SourceError> {
        let entries: Vec<Entry<'_>> = functions
            .iter()
            .map(|f| {
                Entry::new(
                    &f.parameter,
                    Binding::Unbound,
                    HostScope::Hosts(SmallVec::from_elem(f.host_id, 1)),
                )
            })
            .collect();
        let resolved = self.resolve_entries(&entries, &FieldConfig::USER_ONLY)?;
        Ok(functions.iter().map(|f| f.function_id).zip(resolved).collect())
    }

    /// Expand host, interface and user macros in item keys. Interface
    /// macros use the item's own interface when it has one.
    #[instrument(skip(self, items), fields(batch = items.len()))]
    pub fn resolve_item_keys(
        &self,
        items: &[ItemRow],
    ) -> Result<BTreeMap<ItemId, String>, ResolveError> {
        Ok(self.item_keys(items)?.into_iter().collect())
    }

    /// Expand item names: user macros of the item's host, and `$n` bound to
    /// the n-th parameter of the expanded key.
    #[instrument(skip(self, items), fields(batch = items.len()))]
    pub fn resolve_item_names(
        &self,
        items: &[ItemRow],
    ) -> Result<BTreeMap<ItemId, String>, ResolveError> {
        let keys = self.item_keys(items)?;
        let entries: Vec<Entry<'_>> = items
            .iter()
            .zip(&keys)
            .map(|(item, (_, key))| {
                item_entry(item, &item.name).with_references(Some(reference::from_item_key(key)))
            })
            .collect();
        let resolved = self.resolve_entries(&entries, &FieldConfig::USER_ONLY)?;
        Ok(items.iter().map(|item| item.item_id).zip(resolved).collect())
    }

    /// Expand user macros in function parameters, looked up on the
    /// function's host.
    #[instrument(skip(self, functions), fields(batch = functions.len()))]
    pub fn resolve_function_parameters(
        &self,
        functions: &[FunctionRow],
    ) -> Result<BTreeMap<FunctionId, String>, ResolveError> {
        Ok(self.function_parameters(functions)?.into_iter().collect())
    }
}
