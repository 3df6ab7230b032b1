//! Time quantity normalization
//!
//! Converts free text `amount` + `unit` pairs into seconds. Used for the
//! `seconds` field of timers and for [`Recipe::total_time`](crate::Recipe::total_time).
//! All functions here are pure.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

static DEFAULT_UNITS: Lazy<TimeUnits> = Lazy::new(TimeUnits::default);

/// Table of known time unit labels
///
/// Lookup is by exact, case-insensitive label first. When the label is
/// unknown and the prefix fallback is enabled, the first character decides:
/// `s` is seconds, `m` minutes and `h` hours. The fallback is inherited
/// behavior and ambiguous on purpose-built input (`"mg"` lands on minutes);
/// extend the table with [`TimeUnits::with_label`] where that matters.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeUnits {
    labels: IndexMap<String, f64>,
    prefix_fallback: bool,
}

const SECOND_LABELS: &str = "s,sec,secs,second,seconds";
const MINUTE_LABELS: &str = "m,min,mins,minute,minutes";
const HOUR_LABELS: &str = "h,hr,hrs,hour,hours";

impl Default for TimeUnits {
    fn default() -> Self {
        let mut units = Self {
            labels: IndexMap::new(),
            prefix_fallback: true,
        };
        for (family, mult) in [
            (SECOND_LABELS, 1.0),
            (MINUTE_LABELS, 60.0),
            (HOUR_LABELS, 3600.0),
        ] {
            for label in family.split(',') {
                units.labels.insert(label.to_string(), mult);
            }
        }
        units
    }
}

impl TimeUnits {
    /// A table with no labels and no prefix fallback, everything is zero
    /// seconds until labels are added
    pub fn empty() -> Self {
        Self {
            labels: IndexMap::new(),
            prefix_fallback: false,
        }
    }

    /// Adds a label with its multiplier in seconds
    pub fn with_label(mut self, label: &str, seconds: f64) -> Self {
        self.labels.insert(label.trim().to_lowercase(), seconds);
        self
    }

    /// Enable or disable the `s`/`m`/`h` prefix fallback
    pub fn with_prefix_fallback(mut self, enabled: bool) -> Self {
        self.prefix_fallback = enabled;
        self
    }

    /// Converts an amount and unit to seconds
    ///
    /// A non numeric amount or an unknown unit contributes `0.0`, never an
    /// error.
    pub fn to_seconds(&self, amount: &str, unit: &str) -> f64 {
        let Some(amount) = parse_number(amount.trim()) else {
            return 0.0;
        };
        if amount <= 0.0 {
            return 0.0;
        }
        let unit = unit.trim().to_lowercase();
        if let Some(mult) = self.labels.get(&unit) {
            return amount * mult;
        }
        if self.prefix_fallback {
            if unit.starts_with('s') {
                return amount;
            }
            if unit.starts_with('m') {
                return amount * 60.0;
            }
            if unit.starts_with('h') {
                return amount * 3600.0;
            }
        }
        0.0
    }
}

/// [`TimeUnits::to_seconds`] with the default table
pub fn to_seconds(amount: &str, unit: &str) -> f64 {
    DEFAULT_UNITS.to_seconds(amount, unit)
}

/// Parses an integer, decimal or `a/b` fraction
///
/// Numbers must round-trip through their string form, so `"2"` and `"1.5"`
/// parse while `"2.0"` or `"1e3"` do not. Fractions need both sides to
/// round-trip and a non zero denominator.
pub fn parse_number(s: &str) -> Option<f64> {
    if let Ok(n) = s.parse::<f64>() {
        if n.to_string() == s {
            return Some(n);
        }
    }
    let (num, den) = s.split_once('/')?;
    let n = num.parse::<f64>().ok().filter(|v| v.to_string() == num)?;
    let d = den.parse::<f64>().ok().filter(|v| v.to_string() == den)?;
    (d != 0.0).then(|| n / d)
}

/// Formats seconds for display: `45s`, `5:30`, `1:01:05`
pub fn format_seconds(seconds: f64) -> String {
    let total = seconds.round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else if minutes > 0 {
        format!("{minutes}:{secs:02}")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1/2", "hours" => 1800.0)]
    #[test_case("90", "minutes" => 5400.0)]
    #[test_case("30", "seconds" => 30.0)]
    #[test_case("abc", "minutes" => 0.0)]
    #[test_case("1.5", "h" => 5400.0)]
    #[test_case("3", "min" => 180.0)]
    #[test_case("10", "days" => 0.0 ; "unknown unit is zero")]
    #[test_case("1", "mg" => 60.0 ; "inherited prefix quirk")]
    #[test_case("-5", "minutes" => 0.0 ; "negative amounts are zero")]
    #[test_case("1/0", "minutes" => 0.0 ; "zero denominator")]
    fn seconds(amount: &str, unit: &str) -> f64 {
        to_seconds(amount, unit)
    }

    #[test]
    fn number_round_trip() {
        assert_eq!(parse_number("2"), Some(2.0));
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number("3/4"), Some(0.75));
        assert_eq!(parse_number("2.0"), None);
        assert_eq!(parse_number("1e3"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("1/2/3"), None);
    }

    #[test]
    fn custom_table() {
        let units = TimeUnits::empty().with_label("tick", 0.5);
        assert_eq!(units.to_seconds("4", "tick"), 2.0);
        // no fallback on an empty table
        assert_eq!(units.to_seconds("4", "minutes"), 0.0);
    }

    #[test]
    fn display() {
        assert_eq!(format_seconds(45.0), "45s");
        assert_eq!(format_seconds(330.0), "5:30");
        assert_eq!(format_seconds(3665.0), "1:01:05");
        assert_eq!(format_seconds(0.0), "0s");
    }
}
