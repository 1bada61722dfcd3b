//! Queries for the valuemap_mapping table.

use rusqlite::{params, Connection};
use zmacro_core::errors::StorageError;
use zmacro_core::types::{ValueMapId, ValueMapping};

use super::{from_sql, placeholders, select_in, sql_ids, to_sql};
use crate::sqlite_err;

pub fn insert(conn: &Connection, row: &ValueMapping) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO valuemap_mapping (valuemapid, value, newvalue)
         VALUES (?1, ?2, ?3)",
        params![to_sql(row.value_map_id.get()), row.value, row.new_value],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn query_by_ids(
    conn: &Connection,
    ids: &[ValueMapId],
) -> Result<Vec<ValueMapping>, StorageError> {
    select_in(
        conn,
        &sql_ids(ids),
        &[],
        |n| {
            format!(
                "SELECT valuemapid, value, newvalue FROM valuemap_mapping
                 WHERE valuemapid IN ({})",
                placeholders(n)
            )
        },
        |row| {
            Ok(ValueMapping {
                value_map_id: ValueMapId(from_sql(row.get(0)?)),
                value: row.get(1)?,
                new_value: row.get(2)?,
            })
        },
    )
}
