//! Queries for the history table.

use rusqlite::{params, Connection, OptionalExtension};
use zmacro_core::errors::StorageError;
use zmacro_core::types::{FxHashMap, HistoryValue, ItemId};

use super::{from_sql, placeholders, select_in, sql_ids, to_sql};
use crate::sqlite_err;

pub fn insert(conn: &Connection, item_id: ItemId, value: &HistoryValue) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO history (itemid, clock, ns, value) VALUES (?1, ?2, ?3, ?4)",
        params![to_sql(item_id.get()), value.clock, value.ns, value.value],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Latest value per item with `clock >= since`.
pub fn query_last(
    conn: &Connection,
    item_ids: &[ItemId],
    since: i64,
) -> Result<FxHashMap<ItemId, HistoryValue>, StorageError> {
    let rows = select_in(
        conn,
        &sql_ids(item_ids),
        &[since],
        |n| {
            format!(
                "SELECT h.itemid, h.clock, h.ns, h.value
                 FROM history h
                 JOIN (
                     SELECT itemid, MAX(clock * 1000000000 + ns) AS pos
                     FROM history
                     WHERE itemid IN ({}) AND clock >= ?
                     GROUP BY itemid
                 ) latest
                   ON latest.itemid = h.itemid
                  AND h.clock * 1000000000 + h.ns = latest.pos",
                placeholders(n)
            )
        },
        |row| {
            Ok((
                ItemId(from_sql(row.get(0)?)),
                HistoryValue {
                    clock: row.get(1)?,
                    ns: row.get(2)?,
                    value: row.get(3)?,
                },
            ))
        },
    )?;
    Ok(rows.into_iter().collect())
}

/// Latest value of each item at or before its `(clock, ns)`.
///
/// Runs on one connection with a single cached statement; points with no
/// history at or before them are absent from the result.
pub fn query_at(
    conn: &Connection,
    points: &[(ItemId, i64, i32)],
) -> Result<FxHashMap<(ItemId, i64, i32), HistoryValue>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT clock, ns, value FROM history
             WHERE itemid = ?1 AND (clock < ?2 OR (clock = ?2 AND ns <= ?3))
             ORDER BY clock DESC, ns DESC
             LIMIT 1",
        )
        .map_err(sqlite_err)?;
    let mut found = FxHashMap::default();
    for &(item_id, clock, ns) in points {
        let value = stmt
            .query_row(params![to_sql(item_id.get()), clock, ns], |row| {
                Ok(HistoryValue {
                    clock: row.get(0)?,
                    ns: row.get(1)?,
                    value: row.get(2)?,
                })
            })
            .optional()
            .map_err(sqlite_err)?;
        if let Some(value) = value {
            found.insert((item_id, clock, ns), value);
        }
    }
    Ok(found)
}
