//! V002: lookups by clock for "value at event time".

pub const MIGRATION_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_history_itemid_clock
    ON history(itemid, clock DESC, ns DESC);
"#;
