//! Queries for the functions table.
//!
//! The owning host is joined in from `items`; a function whose item is
//! gone is not returned.

use rusqlite::{params, Connection};
use zmacro_core::errors::StorageError;
use zmacro_core::types::{FunctionId, FunctionRow, HostId, ItemId, TriggerHost, TriggerId};

use super::{from_sql, placeholders, select_in, sql_ids, to_sql};
use crate::sqlite_err;

pub fn insert(conn: &Connection, row: &FunctionRow) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO functions (functionid, triggerid, itemid, name, parameter)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            to_sql(row.function_id.get()),
            to_sql(row.trigger_id.get()),
            to_sql(row.item_id.get()),
            row.function,
            row.parameter,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn query_by_ids(
    conn: &Connection,
    ids: &[FunctionId],
) -> Result<Vec<FunctionRow>, StorageError> {
    select_in(
        conn,
        &sql_ids(ids),
        &[],
        |n| {
            format!(
                "SELECT f.functionid, f.triggerid, f.itemid, i.hostid, f.name, f.parameter
                 FROM functions f JOIN items i ON i.itemid = f.itemid
                 WHERE f.functionid IN ({})",
                placeholders(n)
            )
        },
        |row| {
            Ok(FunctionRow {
                function_id: FunctionId(from_sql(row.get(0)?)),
                trigger_id: TriggerId(from_sql(row.get(1)?)),
                item_id: ItemId(from_sql(row.get(2)?)),
                host_id: HostId(from_sql(row.get(3)?)),
                function: row.get(4)?,
                parameter: row.get(5)?,
            })
        },
    )
}

/// Distinct (trigger, host) pairs.
pub fn query_trigger_hosts(
    conn: &Connection,
    trigger_ids: &[TriggerId],
) -> Result<Vec<TriggerHost>, StorageError> {
    select_in(
        conn,
        &sql_ids(trigger_ids),
        &[],
        |n| {
            format!(
                "SELECT DISTINCT f.triggerid, i.hostid
                 FROM functions f JOIN items i ON i.itemid = f.itemid
                 WHERE f.triggerid IN ({})
                 ORDER BY f.triggerid, i.hostid",
                placeholders(n)
            )
        },
        |row| {
            Ok(TriggerHost {
                trigger_id: TriggerId(from_sql(row.get(0)?)),
                host_id: HostId(from_sql(row.get(1)?)),
            })
        },
    )
}
