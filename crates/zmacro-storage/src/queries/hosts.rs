//! Queries for the hosts table.

use rusqlite::{params, Connection};
use zmacro_core::errors::StorageError;
use zmacro_core::types::{HostId, HostRow};

use super::{from_sql, placeholders, select_in, sql_ids, to_sql};
use crate::sqlite_err;

pub fn insert(conn: &Connection, row: &HostRow) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO hosts (hostid, host, name) VALUES (?1, ?2, ?3)",
        params![to_sql(row.host_id.get()), row.host, row.name],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn query_by_ids(conn: &Connection, ids: &[HostId]) -> Result<Vec<HostRow>, StorageError> {
    select_in(
        conn,
        &sql_ids(ids),
        &[],
        |n| {
            format!(
                "SELECT hostid, host, name FROM hosts WHERE hostid IN ({})",
                placeholders(n)
            )
        },
        |row| {
            Ok(HostRow {
                host_id: HostId(from_sql(row.get(0)?)),
                host: row.get(1)?,
                name: row.get(2)?,
            })
        },
    )
}
