//! Display formatting of stored item values.

pub mod units;

pub use units::{convert_units, format_float};

use zmacro_core::types::{ItemRow, ValueType};

/// Shorten `value` to `limit` characters plus `...` when longer.
pub fn trim_text(value: &str, limit: usize) -> String {
    match value.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}

/// Render a stored value for display.
///
/// `mapped` is the value-map entry for the raw value, if the item has a
/// value map and it covers this value.
pub fn format_history_value(
    item: &ItemRow,
    value: &str,
    mapped: Option<&str>,
    trim_length: usize,
) -> String {
    match item.value_type {
        ValueType::Float | ValueType::Unsigned => match mapped {
            Some(text) => format!("{text} ({value})"),
            None => convert_units(value, &item.units),
        },
        ValueType::Character => {
            let trimmed = trim_text(value, trim_length);
            match mapped {
                Some(text) => format!("{text} ({trimmed})"),
                None => trimmed,
            }
        }
        ValueType::Text | ValueType::Log => trim_text(value, trim_length),
    }
}

#[cfg(test)]
mod tests {
    use zmacro_core::types::{HostId, ItemId};

    use super::*;

    fn item(value_type: ValueType, units: &str) -> ItemRow {
        ItemRow {
            item_id: ItemId(1),
            host_id: HostId(1),
            interface_id: None,
            name: "item".into(),
            key: "key".into(),
            value_type,
            units: units.into(),
            value_map_id: None,
        }
    }

    #[test]
    fn test_numeric_value_map_wins_over_units() {
        let it = item(ValueType::Unsigned, "B");
        assert_eq!(format_history_value(&it, "1", Some("Up"), 20), "Up (1)");
        assert_eq!(format_history_value(&it, "2048", None, 20), "2 KB");
    }

    #[test]
    fn test_text_is_trimmed_by_chars() {
        let it = item(ValueType::Text, "");
        let long = "ä".repeat(25);
        let out = format_history_value(&it, &long, None, 20);
        assert_eq!(out, format!("{}...", "ä".repeat(20)));
        assert_eq!(format_history_value(&it, "short", None, 20), "short");
    }

    #[test]
    fn test_character_map_applies_after_trim() {
        let it = item(ValueType::Character, "");
        assert_eq!(
            format_history_value(&it, "abcdef", Some("Letters"), 3),
            "Letters (abc...)"
        );
    }

    #[test]
    fn test_log_ignores_value_map() {
        let it = item(ValueType::Log, "");
        assert_eq!(format_history_value(&it, "line", Some("x"), 20), "line");
    }
}
