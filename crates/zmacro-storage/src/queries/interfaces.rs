//! Queries for the interface table.

use rusqlite::{params, Connection};
use zmacro_core::errors::StorageError;
use zmacro_core::types::{HostId, InterfaceId, InterfaceRow, InterfaceType};

use super::{from_sql, placeholders, select_in, sql_ids, to_sql};
use crate::sqlite_err;

pub fn insert(conn: &Connection, row: &InterfaceRow) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO interface
             (interfaceid, hostid, type, main, useip, ip, dns, port)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            to_sql(row.interface_id.get()),
            to_sql(row.host_id.get()),
            row.interface_type.code(),
            row.main as i32,
            row.use_ip as i32,
            row.ip,
            row.dns,
            row.port,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn query_by_hosts(
    conn: &Connection,
    host_ids: &[HostId],
) -> Result<Vec<InterfaceRow>, StorageError> {
    select_in(
        conn,
        &sql_ids(host_ids),
        &[],
        |n| {
            format!(
                "SELECT interfaceid, hostid, type, main, useip, ip, dns, port
                 FROM interface WHERE hostid IN ({})
                 ORDER BY interfaceid",
                placeholders(n)
            )
        },
        map_row,
    )
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<InterfaceRow> {
    let code: i64 = row.get(2)?;
    let interface_type =
        InterfaceType::from_code(code).ok_or(rusqlite::Error::IntegralValueOutOfRange(2, code))?;
    Ok(InterfaceRow {
        interface_id: InterfaceId(from_sql(row.get(0)?)),
        host_id: HostId(from_sql(row.get(1)?)),
        interface_type,
        main: row.get::<_, i32>(3)? != 0,
        use_ip: row.get::<_, i32>(4)? != 0,
        ip: row.get(5)?,
        dns: row.get(6)?,
        port: row.get(7)?,
    })
}
