//! Queries for the triggers table.

use rusqlite::{params, Connection};
use zmacro_core::errors::StorageError;
use zmacro_core::types::{Trigger, TriggerId};

use super::{from_sql, placeholders, select_in, sql_ids, to_sql};
use crate::sqlite_err;

pub fn insert(conn: &Connection, row: &Trigger) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO triggers
             (triggerid, description, expression, comments, url, value, lastchange, lastchange_ns)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            to_sql(row.trigger_id.get()),
            row.description,
            row.expression,
            row.comments,
            row.url,
            row.value,
            row.clock,
            row.ns,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Load triggers, ordered by id.
pub fn query_by_ids(conn: &Connection, ids: &[TriggerId]) -> Result<Vec<Trigger>, StorageError> {
    let mut rows = select_in(
        conn,
        &sql_ids(ids),
        &[],
        |n| {
            format!(
                "SELECT triggerid, description, expression, comments, url, value,
                        lastchange, lastchange_ns
                 FROM triggers WHERE triggerid IN ({})",
                placeholders(n)
            )
        },
        |row| {
            Ok(Trigger {
                trigger_id: TriggerId(from_sql(row.get(0)?)),
                description: row.get(1)?,
                expression: row.get(2)?,
                comments: row.get(3)?,
                url: row.get(4)?,
                value: row.get(5)?,
                clock: row.get(6)?,
                ns: row.get(7)?,
            })
        },
    )?;
    rows.sort_by_key(|t| t.trigger_id);
    Ok(rows)
}
