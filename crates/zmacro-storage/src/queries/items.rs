//! Queries for the items table.

use rusqlite::{params, Connection};
use zmacro_core::errors::StorageError;
use zmacro_core::types::{HostId, InterfaceId, ItemId, ItemRow, ValueMapId, ValueType};

use super::{from_sql, placeholders, select_in, sql_ids, to_sql};
use crate::sqlite_err;

pub fn insert(conn: &Connection, row: &ItemRow) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO items
             (itemid, hostid, interfaceid, name, key_, value_type, units, valuemapid)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            to_sql(row.item_id.get()),
            to_sql(row.host_id.get()),
            row.interface_id.map(|id| to_sql(id.get())),
            row.name,
            row.key,
            row.value_type.code(),
            row.units,
            row.value_map_id.map(|id| to_sql(id.get())),
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn query_by_ids(conn: &Connection, ids: &[ItemId]) -> Result<Vec<ItemRow>, StorageError> {
    select_in(
        conn,
        &sql_ids(ids),
        &[],
        |n| {
            format!(
                "SELECT itemid, hostid, interfaceid, name, key_, value_type, units, valuemapid
                 FROM items WHERE itemid IN ({})",
                placeholders(n)
            )
        },
        map_row,
    )
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<ItemRow> {
    let code: i64 = row.get(5)?;
    let value_type =
        ValueType::from_code(code).ok_or(rusqlite::Error::IntegralValueOutOfRange(5, code))?;
    Ok(ItemRow {
        item_id: ItemId(from_sql(row.get(0)?)),
        host_id: HostId(from_sql(row.get(1)?)),
        interface_id: row.get::<_, Option<i64>>(2)?.map(|id| InterfaceId(from_sql(id))),
        name: row.get(3)?,
        key: row.get(4)?,
        value_type,
        units: row.get(6)?,
        value_map_id: row.get::<_, Option<i64>>(7)?.map(|id| ValueMapId(from_sql(id))),
    })
}
