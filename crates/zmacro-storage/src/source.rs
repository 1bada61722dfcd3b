//! `DataSource` implementation over a `DatabaseManager`.

use std::path::Path;

use zmacro_core::config::StorageConfig;
use zmacro_core::errors::{SourceError, StorageError};
use zmacro_core::source::{DataSource, Snapshot};
use zmacro_core::types::{
    FunctionId, FunctionRow, FxHashMap, GlobalMacroRow, HistoryValue, HostId, HostRow,
    InterfaceRow, ItemId, ItemRow, TemplateLink, Trigger, TriggerHost, TriggerId, UserMacroRow,
    ValueMapId, ValueMapping,
};

use crate::connection::DatabaseManager;
use crate::queries;
use crate::sqlite_err;

/// Answers resolver queries from SQLite. Reads go through the read pool.
pub struct SqliteSource {
    db: DatabaseManager,
}

impl SqliteSource {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self::new(DatabaseManager::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::new(DatabaseManager::open_in_memory()?))
    }

    pub fn open_with_config(config: &StorageConfig) -> Result<Self, StorageError> {
        Ok(Self::new(DatabaseManager::open_with_config(config)?))
    }

    pub fn db(&self) -> &DatabaseManager {
        &self.db
    }

    /// Write every record of `snapshot` in one transaction.
    pub fn import_snapshot(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        self.db.with_writer(|conn| {
            let tx = conn.unchecked_transaction().map_err(sqlite_err)?;
            for host in &snapshot.hosts {
                queries::hosts::insert(&tx, host)?;
            }
            for link in &snapshot.template_links {
                queries::macros::insert_template_link(&tx, link)?;
            }
            for iface in &snapshot.interfaces {
                queries::interfaces::insert(&tx, iface)?;
            }
            for item in &snapshot.items {
                queries::items::insert(&tx, item)?;
            }
            for function in &snapshot.functions {
                queries::functions::insert(&tx, function)?;
            }
            for record in &snapshot.history {
                queries::history::insert(&tx, record.item_id, &record.value)?;
            }
            for mapping in &snapshot.value_maps {
                queries::valuemaps::insert(&tx, mapping)?;
            }
            for m in &snapshot.host_macros {
                queries::macros::insert_host_macro(&tx, m)?;
            }
            for m in &snapshot.global_macros {
                queries::macros::insert_global_macro(&tx, m)?;
            }
            tx.commit().map_err(sqlite_err)?;
            tracing::debug!(
                hosts = snapshot.hosts.len(),
                items = snapshot.items.len(),
                functions = snapshot.functions.len(),
                "imported snapshot"
            );
            Ok(())
        })
    }

    /// Parse a JSON `Snapshot` and import it.
    pub fn import_json(&self, json: &str) -> Result<(), SourceError> {
        let snapshot: Snapshot =
            serde_json::from_str(json).map_err(|e| SourceError::InvalidSnapshot {
                message: e.to_string(),
            })?;
        Ok(self.import_snapshot(&snapshot)?)
    }

    pub fn insert_triggers(&self, triggers: &[Trigger]) -> Result<(), StorageError> {
        self.db.with_writer(|conn| {
            let tx = conn.unchecked_transaction().map_err(sqlite_err)?;
            for trigger in triggers {
                queries::triggers::insert(&tx, trigger)?;
            }
            tx.commit().map_err(sqlite_err)
        })
    }

    pub fn load_triggers(&self, ids: &[TriggerId]) -> Result<Vec<Trigger>, StorageError> {
        self.db
            .with_reader(|conn| queries::triggers::query_by_ids(conn, ids))
    }
}

impl DataSource for SqliteSource {
    fn fetch_functions(&self, function_ids: &[FunctionId]) -> Result<Vec<FunctionRow>, SourceError> {
        Ok(self
            .db
            .with_reader(|conn| queries::functions::query_by_ids(conn, function_ids))?)
    }

    fn fetch_items(&self, item_ids: &[ItemId]) -> Result<Vec<ItemRow>, SourceError> {
        Ok(self
            .db
            .with_reader(|conn| queries::items::query_by_ids(conn, item_ids))?)
    }

    fn fetch_hosts(&self, host_ids: &[HostId]) -> Result<Vec<HostRow>, SourceError> {
        Ok(self
            .db
            .with_reader(|conn| queries::hosts::query_by_ids(conn, host_ids))?)
    }

    fn fetch_interfaces(&self, host_ids: &[HostId]) -> Result<Vec<InterfaceRow>, SourceError> {
        Ok(self
            .db
            .with_reader(|conn| queries::interfaces::query_by_hosts(conn, host_ids))?)
    }

    fn fetch_last_values(
        &self,
        item_ids: &[ItemId],
        since: i64,
    ) -> Result<FxHashMap<ItemId, HistoryValue>, SourceError> {
        Ok(self
            .db
            .with_reader(|conn| queries::history::query_last(conn, item_ids, since))?)
    }

    fn fetch_values_at(
        &self,
        points: &[(ItemId, i64, i32)],
    ) -> Result<FxHashMap<(ItemId, i64, i32), HistoryValue>, SourceError> {
        Ok(self
            .db
            .with_reader(|conn| queries::history::query_at(conn, points))?)
    }

    fn fetch_value_maps(
        &self,
        value_map_ids: &[ValueMapId],
    ) -> Result<Vec<ValueMapping>, SourceError> {
        Ok(self
            .db
            .with_reader(|conn| queries::valuemaps::query_by_ids(conn, value_map_ids))?)
    }

    fn fetch_trigger_hosts(
        &self,
        trigger_ids: &[TriggerId],
    ) -> Result<Vec<TriggerHost>, SourceError> {
        Ok(self
            .db
            .with_reader(|conn| queries::functions::query_trigger_hosts(conn, trigger_ids))?)
    }

    fn fetch_host_macros(&self, host_ids: &[HostId]) -> Result<Vec<UserMacroRow>, SourceError> {
        Ok(self
            .db
            .with_reader(|conn| queries::macros::query_host_macros(conn, host_ids))?)
    }

    fn fetch_host_template_links(
        &self,
        host_ids: &[HostId],
    ) -> Result<Vec<TemplateLink>, SourceError> {
        Ok(self
            .db
            .with_reader(|conn| queries::macros::query_template_links(conn, host_ids))?)
    }

    fn fetch_global_macros(&self) -> Result<Vec<GlobalMacroRow>, SourceError> {
        Ok(self.db.with_reader(queries::macros::query_global_macros)?)
    }
}
