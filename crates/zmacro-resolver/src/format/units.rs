//! Unit-aware rendering of numeric item values.

use chrono::DateTime;

const SEC_PER_MIN: f64 = 60.0;
const SEC_PER_HOUR: f64 = 3_600.0;
const SEC_PER_DAY: f64 = 86_400.0;
const SEC_PER_MONTH: f64 = 2_592_000.0;
const SEC_PER_YEAR: f64 = 31_536_000.0;

const ROUNDOFF_SUFFIXED: i32 = 2;
const ROUNDOFF_UNSUFFIXED: i32 = 4;

/// Integers above this many digits are not precise enough to show a time
/// of day next to the day count.
const FLOAT_DIG: usize = 15;

const POWER_PREFIXES: [&str; 9] = ["", "K", "M", "G", "T", "P", "E", "Z", "Y"];

/// Units that are printed as-is, never scaled.
const UNSCALED_UNITS: [&str; 4] = ["%", "ms", "rpm", "RPM"];

/// Parse a value the way a numeric check would: optional sign, digits,
/// fraction, exponent. No `inf`/`nan`, no hex.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    let body = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    let mut chars = body.chars().peekable();
    let mut mantissa_digits = 0;
    while chars.next_if(|c| c.is_ascii_digit()).is_some() {
        mantissa_digits += 1;
    }
    if chars.next_if_eq(&'.').is_some() {
        while chars.next_if(|c| c.is_ascii_digit()).is_some() {
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if chars.next_if(|c| *c == 'e' || *c == 'E').is_some() {
        chars.next_if(|c| *c == '+' || *c == '-');
        let mut exponent_digits = 0;
        while chars.next_if(|c| c.is_ascii_digit()).is_some() {
            exponent_digits += 1;
        }
        if exponent_digits == 0 {
            return None;
        }
    }
    if chars.next().is_some() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Round to `decimals` places (or significant digits below 1) and drop
/// trailing zeros.
pub fn format_float(number: f64, decimals: i32) -> String {
    if number == 0.0 {
        return "0".to_string();
    }
    if number.is_infinite() {
        return if number > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let exponent = number.abs().log10().floor() as i32;
    let places = if exponent < 0 {
        decimals - exponent - 1
    } else {
        decimals
    };
    let rendered = format!("{:.*}", places.max(0) as usize, number);
    let trimmed = if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered.as_str()
    };
    if trimmed == "-0" || trimmed == "0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `N days, HH:MM:SS`.
pub fn convert_uptime(value: f64) -> String {
    let value = value.round();
    let abs = value.abs();
    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }

    let days = (abs / SEC_PER_DAY).floor();
    if days != 0.0 {
        let unit = if days == 1.0 { "day" } else { "days" };
        out.push_str(&format!("{} {}", format_float(days, 0), unit));
    }

    if format!("{abs:.0}").len() <= FLOAT_DIG {
        if days != 0.0 {
            out.push_str(", ");
        }
        let mut rest = abs - days * SEC_PER_DAY;
        let hours = (rest / SEC_PER_HOUR).floor();
        rest -= hours * SEC_PER_HOUR;
        let minutes = (rest / SEC_PER_MIN).floor();
        let seconds = rest - minutes * SEC_PER_MIN;
        out.push_str(&format!(
            "{:02}:{:02}:{:02}",
            hours as u64, minutes as u64, seconds as u64
        ));
    }
    out
}

/// Duration with at most three adjacent units, e.g. `1d 2h 3m` or
/// `5s 120ms`.
pub fn convert_seconds(value: f64) -> String {
    let abs = value.abs();
    let mut rest = abs.floor();
    let mut parts: Vec<(String, &str)> = Vec::new();
    let mut start: Option<i32> = None;

    let years = (rest / SEC_PER_YEAR).floor();
    if years > 0.0 {
        parts.push((format_float(years, ROUNDOFF_SUFFIXED), "y"));
        rest -= years * SEC_PER_YEAR;
        start = Some(0);
    }

    let months = (rest / SEC_PER_MONTH).floor();
    if months == 12.0 {
        // 360 days and up round into a year.
        let bumped = if start.is_none() { 1.0 } else { years + 1.0 };
        parts.retain(|(_, unit)| *unit != "y");
        parts.push((format_float(bumped, ROUNDOFF_SUFFIXED), "y"));
    } else {
        if months > 0.0 {
            parts.push((format_float(months, ROUNDOFF_SUFFIXED), "M"));
            rest -= months * SEC_PER_MONTH;
            start.get_or_insert(1);
        }

        for (level, per_part, unit) in [
            (2, SEC_PER_DAY, "d"),
            (3, SEC_PER_HOUR, "h"),
            (4, SEC_PER_MIN, "m"),
        ] {
            let count = (rest / per_part).floor();
            if count > 0.0 {
                parts.push((format_float(count, ROUNDOFF_SUFFIXED), unit));
                rest -= count * per_part;
                start.get_or_insert(level);
            }
            if start.is_some_and(|s| level - s >= 2) {
                break;
            }
        }

        if start.map_or(true, |s| s >= 3) {
            if rest > 0.0 {
                parts.push((format_float(rest, ROUNDOFF_SUFFIXED), "s"));
            }
            if start.map_or(true, |s| s >= 4) {
                let millis = abs.fract() * 1000.0;
                if millis > 0.0 {
                    let rendered = format_float(millis, ROUNDOFF_SUFFIXED);
                    if rendered != "0" {
                        parts.push((rendered, "ms"));
                    }
                }
            }
        }
    }

    if parts.is_empty() {
        return "0".to_string();
    }
    let joined = parts
        .iter()
        .map(|(count, unit)| format!("{count}{unit}"))
        .collect::<Vec<_>>()
        .join(" ");
    if value < 0.0 {
        format!("-{joined}")
    } else {
        joined
    }
}

/// `Y-m-d H:i:s`, UTC.
pub fn convert_unixtime(value: f64) -> String {
    match DateTime::from_timestamp(value.trunc() as i64, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format_float(value, ROUNDOFF_UNSUFFIXED),
    }
}

/// Render `value` with `units`, scaling by 1000 (1024 for `B`/`Bps`) and
/// prefixing K, M, G... Non-numeric values are returned unchanged.
pub fn convert_units(value: &str, units: &str) -> String {
    let Some(number) = parse_numeric(value) else {
        return value.to_string();
    };

    match units {
        "unixtime" => return convert_unixtime(number),
        "uptime" => return convert_uptime(number),
        "s" => return convert_seconds(number),
        _ => {}
    }

    let (units, forced_raw) = match units.strip_prefix('!') {
        Some(stripped) => (stripped, true),
        None => (units, false),
    };

    let (rendered, result_units) =
        if forced_raw || units.is_empty() || UNSCALED_UNITS.contains(&units) || number.abs() < 1.0
        {
            (format_float(number, ROUNDOFF_UNSUFFIXED), units.to_string())
        } else {
            let base = if units == "B" || units == "Bps" {
                1024.0
            } else {
                1000.0
            };
            let mut rendered = String::new();
            let mut prefix = "";
            for (power, candidate) in POWER_PREFIXES.iter().enumerate() {
                let decimals = if candidate.is_empty() {
                    ROUNDOFF_UNSUFFIXED
                } else {
                    ROUNDOFF_SUFFIXED
                };
                let scaled = number / f64::powi(base, power as i32);
                rendered = format_float(scaled, decimals);
                prefix = candidate;
                if parse_numeric(&rendered).map_or(true, |v| v.abs() < base) {
                    break;
                }
            }
            let prefix = if rendered == "0" { "" } else { prefix };
            (rendered, format!("{prefix}{units}"))
        };

    if result_units.is_empty() {
        rendered
    } else {
        format!("{rendered} {result_units}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float_trims() {
        assert_eq!(format_float(1.5, 4), "1.5");
        assert_eq!(format_float(2.0, 4), "2");
        assert_eq!(format_float(3.14159265, 4), "3.1416");
        assert_eq!(format_float(0.000123456, 4), "0.0001235");
        assert_eq!(format_float(-0.0, 4), "0");
    }

    #[test]
    fn test_bytes_use_1024() {
        assert_eq!(convert_units("1024", "B"), "1 KB");
        assert_eq!(convert_units("1536", "B"), "1.5 KB");
        assert_eq!(convert_units("1000", "bps"), "1 Kbps");
        assert_eq!(convert_units("2500000", "bps"), "2.5 Mbps");
    }

    #[test]
    fn test_unscaled_units() {
        assert_eq!(convert_units("99.123456", "%"), "99.1235 %");
        assert_eq!(convert_units("1500", "rpm"), "1500 rpm");
        assert_eq!(convert_units("1500", "!items"), "1500 items");
        assert_eq!(convert_units("0.5", "B"), "0.5 B");
        assert_eq!(convert_units("12345", ""), "12345");
    }

    #[test]
    fn test_non_numeric_passthrough() {
        assert_eq!(convert_units("running", "B"), "running");
        assert_eq!(convert_units("1e", "B"), "1e");
    }

    #[test]
    fn test_time_units() {
        assert_eq!(convert_units("0", "unixtime"), "1970-01-01 00:00:00");
        assert_eq!(convert_units("90061", "uptime"), "1 day, 01:01:01");
        assert_eq!(convert_units("3600", "uptime"), "01:00:00");
        assert_eq!(convert_units("172800", "uptime"), "2 days, 00:00:00");
        assert_eq!(convert_units("93784", "s"), "1d 2h 3m");
        assert_eq!(convert_units("1.5", "s"), "1s 500ms");
        assert_eq!(convert_units("0", "s"), "0");
    }
}
