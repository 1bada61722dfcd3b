//! Per-table query modules.
//!
//! Selects take id slices and issue one statement per chunk of
//! `MAX_BATCH` ids, so a batch of any size stays below SQLite's
//! host-parameter limit.

pub mod functions;
pub mod history;
pub mod hosts;
pub mod interfaces;
pub mod items;
pub mod macros;
pub mod triggers;
pub mod valuemaps;

use rusqlite::{params_from_iter, Connection, Row};
use zmacro_core::errors::StorageError;

use crate::sqlite_err;

/// Ids bound per `IN (...)` list.
pub const MAX_BATCH: usize = 500;

/// `?, ?, ?` with `n` placeholders.
pub(crate) fn placeholders(n: usize) -> String {
    let mut s = String::with_capacity(n * 3);
    for i in 0..n {
        if i > 0 {
            s.push_str(", ");
        }
        s.push('?');
    }
    s
}

/// Sorted, deduplicated SQL ids.
pub(crate) fn sql_ids<I: Copy + Into<u64>>(ids: &[I]) -> Vec<i64> {
    let mut out: Vec<i64> = ids.iter().map(|&id| to_sql(id.into())).collect();
    out.sort_unstable();
    out.dedup();
    out
}

pub(crate) fn to_sql(id: u64) -> i64 {
    id as i64
}

pub(crate) fn from_sql(id: i64) -> u64 {
    id as u64
}

/// Run `sql_for(n)` once per chunk of ids, collecting every mapped row.
/// `extra` is bound after the ids of each chunk.
pub(crate) fn select_in<T, F>(
    conn: &Connection,
    ids: &[i64],
    extra: &[i64],
    sql_for: impl Fn(usize) -> String,
    map: F,
) -> Result<Vec<T>, StorageError>
where
    F: Fn(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut out = Vec::new();
    for chunk in ids.chunks(MAX_BATCH) {
        let sql = sql_for(chunk.len());
        let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_err)?;
        let rows = stmt
            .query_map(params_from_iter(chunk.iter().chain(extra.iter())), &map)
            .map_err(sqlite_err)?;
        for row in rows {
            out.push(row.map_err(sqlite_err)?);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(0), "");
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }

    #[test]
    fn test_sql_ids_sorted_and_deduped() {
        assert_eq!(sql_ids(&[3u64, 1, 3, 2]), vec![1, 2, 3]);
    }
}
