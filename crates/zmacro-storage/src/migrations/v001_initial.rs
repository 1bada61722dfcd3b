//! V001: monitoring configuration snapshot.
//! hosts, templates links, interfaces, items, triggers, functions,
//! history, value maps, user macros.

pub const MIGRATION_SQL: &str = r#"
-- Hosts and templates share one id space.
CREATE TABLE IF NOT EXISTS hosts (
    hostid INTEGER PRIMARY KEY,
    host TEXT NOT NULL,
    name TEXT NOT NULL
) STRICT;

-- Host (or template) -> linked template.
CREATE TABLE IF NOT EXISTS hosts_templates (
    hostid INTEGER NOT NULL,
    templateid INTEGER NOT NULL,
    PRIMARY KEY (hostid, templateid)
) STRICT;

CREATE TABLE IF NOT EXISTS interface (
    interfaceid INTEGER PRIMARY KEY,
    hostid INTEGER NOT NULL,
    type INTEGER NOT NULL,
    main INTEGER NOT NULL DEFAULT 0,
    useip INTEGER NOT NULL DEFAULT 1,
    ip TEXT NOT NULL DEFAULT '',
    dns TEXT NOT NULL DEFAULT '',
    port TEXT NOT NULL DEFAULT ''
) STRICT;

CREATE INDEX IF NOT EXISTS idx_interface_hostid ON interface(hostid);

CREATE TABLE IF NOT EXISTS items (
    itemid INTEGER PRIMARY KEY,
    hostid INTEGER NOT NULL,
    interfaceid INTEGER,
    name TEXT NOT NULL,
    key_ TEXT NOT NULL,
    value_type INTEGER NOT NULL,
    units TEXT NOT NULL DEFAULT '',
    valuemapid INTEGER
) STRICT;

CREATE INDEX IF NOT EXISTS idx_items_hostid ON items(hostid);

CREATE TABLE IF NOT EXISTS triggers (
    triggerid INTEGER PRIMARY KEY,
    description TEXT NOT NULL,
    expression TEXT NOT NULL,
    comments TEXT NOT NULL DEFAULT '',
    url TEXT NOT NULL DEFAULT '',
    value INTEGER NOT NULL DEFAULT 0,
    lastchange INTEGER NOT NULL DEFAULT 0,
    lastchange_ns INTEGER NOT NULL DEFAULT 0
) STRICT;

-- Host id is not stored: it is always the host of the item.
CREATE TABLE IF NOT EXISTS functions (
    functionid INTEGER PRIMARY KEY,
    triggerid INTEGER NOT NULL,
    itemid INTEGER NOT NULL,
    name TEXT NOT NULL,
    parameter TEXT NOT NULL DEFAULT ''
) STRICT;

CREATE INDEX IF NOT EXISTS idx_functions_triggerid ON functions(triggerid);

-- Values of every type are stored as text.
CREATE TABLE IF NOT EXISTS history (
    itemid INTEGER NOT NULL,
    clock INTEGER NOT NULL,
    ns INTEGER NOT NULL DEFAULT 0,
    value TEXT NOT NULL,
    PRIMARY KEY (itemid, clock, ns)
) STRICT;

CREATE TABLE IF NOT EXISTS valuemap_mapping (
    valuemapid INTEGER NOT NULL,
    value TEXT NOT NULL,
    newvalue TEXT NOT NULL,
    PRIMARY KEY (valuemapid, value)
) STRICT;

CREATE TABLE IF NOT EXISTS hostmacro (
    hostmacroid INTEGER PRIMARY KEY AUTOINCREMENT,
    hostid INTEGER NOT NULL,
    macro TEXT NOT NULL,
    value TEXT NOT NULL DEFAULT '',
    UNIQUE (hostid, macro)
) STRICT;

CREATE TABLE IF NOT EXISTS globalmacro (
    globalmacroid INTEGER PRIMARY KEY AUTOINCREMENT,
    macro TEXT NOT NULL UNIQUE,
    value TEXT NOT NULL DEFAULT ''
) STRICT;
"#;
