//! Queries for user macros and template links.
//! hostmacro, globalmacro, hosts_templates.

use rusqlite::{params, Connection};
use zmacro_core::errors::StorageError;
use zmacro_core::types::{GlobalMacroRow, HostId, TemplateLink, UserMacroRow};

use super::{from_sql, placeholders, select_in, sql_ids, to_sql};
use crate::sqlite_err;

pub fn insert_host_macro(conn: &Connection, row: &UserMacroRow) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO hostmacro (hostid, macro, value) VALUES (?1, ?2, ?3)",
        params![to_sql(row.host_id.get()), row.macro_name, row.value],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn insert_global_macro(conn: &Connection, row: &GlobalMacroRow) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO globalmacro (macro, value) VALUES (?1, ?2)",
        params![row.macro_name, row.value],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn insert_template_link(conn: &Connection, link: &TemplateLink) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR IGNORE INTO hosts_templates (hostid, templateid) VALUES (?1, ?2)",
        params![to_sql(link.host_id.get()), to_sql(link.template_id.get())],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn query_host_macros(
    conn: &Connection,
    host_ids: &[HostId],
) -> Result<Vec<UserMacroRow>, StorageError> {
    select_in(
        conn,
        &sql_ids(host_ids),
        &[],
        |n| {
            format!(
                "SELECT hostid, macro, value FROM hostmacro
                 WHERE hostid IN ({})
                 ORDER BY hostmacroid",
                placeholders(n)
            )
        },
        |row| {
            Ok(UserMacroRow {
                host_id: HostId(from_sql(row.get(0)?)),
                macro_name: row.get(1)?,
                value: row.get(2)?,
            })
        },
    )
}

pub fn query_template_links(
    conn: &Connection,
    host_ids: &[HostId],
) -> Result<Vec<TemplateLink>, StorageError> {
    select_in(
        conn,
        &sql_ids(host_ids),
        &[],
        |n| {
            format!(
                "SELECT hostid, templateid FROM hosts_templates
                 WHERE hostid IN ({})",
                placeholders(n)
            )
        },
        |row| {
            Ok(TemplateLink {
                host_id: HostId(from_sql(row.get(0)?)),
                template_id: HostId(from_sql(row.get(1)?)),
            })
        },
    )
}

pub fn query_global_macros(conn: &Connection) -> Result<Vec<GlobalMacroRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT macro, value FROM globalmacro ORDER BY globalmacroid")
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(GlobalMacroRow {
                macro_name: row.get(0)?,
                value: row.get(1)?,
            })
        })
        .map_err(sqlite_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}
