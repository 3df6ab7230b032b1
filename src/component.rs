//! Component builders
//!
//! Turn the raw captures from the line scanner into model values: name
//! trimming, `{amount%unit}` splitting and timer seconds derivation.

use crate::model::{Cookware, Ingredient, MetadataEntry, Timer};
use crate::time::TimeUnits;

/// The capture matched the grammar but trimmed down to nothing usable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EmptyName;

pub(crate) fn build_ingredient(
    name: &str,
    body: Option<&str>,
    raw: &str,
) -> Result<Ingredient, EmptyName> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EmptyName);
    }
    let (amount, unit) = match body {
        Some(body) => split_amount_unit(body),
        None => (None, None),
    };
    Ok(Ingredient {
        name: name.to_string(),
        amount,
        unit,
        raw: raw.to_string(),
    })
}

pub(crate) fn build_cookware(name: &str, raw: &str) -> Result<Cookware, EmptyName> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EmptyName);
    }
    Ok(Cookware {
        name: name.to_string(),
        raw: raw.to_string(),
    })
}

pub(crate) fn build_timer(name: &str, body: &str, raw: &str, units: &TimeUnits) -> Timer {
    // the scanner only emits timer captures with a `%` inside
    let (amount, unit) = body.split_once('%').unwrap_or((body, ""));
    let name = name.trim();
    let amount = amount.trim().to_string();
    let unit = unit.trim().to_string();
    let seconds = units.to_seconds(&amount, &unit);
    Timer {
        name: (!name.is_empty()).then(|| name.to_string()),
        amount,
        unit,
        seconds,
        raw: raw.to_string(),
    }
}

pub(crate) fn build_metadata(content: &str) -> Result<MetadataEntry, MetadataProblem> {
    let Some((key, value)) = content.split_once(':') else {
        return Err(MetadataProblem::MissingColon);
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(MetadataProblem::EmptyKey);
    }
    Ok(MetadataEntry {
        key: key.to_string(),
        value: value.trim().to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetadataProblem {
    MissingColon,
    EmptyKey,
}

/// Splits brace content on the first `%`: left is the amount, right the
/// unit. Empty sides collapse to [`None`].
fn split_amount_unit(body: &str) -> (Option<String>, Option<String>) {
    match body.split_once('%') {
        Some((amount, unit)) => (non_empty(amount), non_empty(unit)),
        None => (non_empty(body), None),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_unit_split() {
        assert_eq!(split_amount_unit("2%tbsp"), (Some("2".into()), Some("tbsp".into())));
        assert_eq!(split_amount_unit(" 2 % tbsp "), (Some("2".into()), Some("tbsp".into())));
        assert_eq!(split_amount_unit("3"), (Some("3".into()), None));
        assert_eq!(split_amount_unit(""), (None, None));
        assert_eq!(split_amount_unit("2%"), (Some("2".into()), None));
        // only the first `%` splits
        assert_eq!(split_amount_unit("2%a%b"), (Some("2".into()), Some("a%b".into())));
    }

    #[test]
    fn ingredient_names() {
        let igr = build_ingredient(" olive oil ", Some("2%tbsp"), "@ olive oil {2%tbsp}").unwrap();
        assert_eq!(igr.name, "olive oil");
        assert_eq!(igr.amount.as_deref(), Some("2"));
        assert_eq!(igr.unit.as_deref(), Some("tbsp"));

        assert_eq!(build_ingredient("  ", Some("2%tbsp"), "@  {2%tbsp}"), Err(EmptyName));
    }

    #[test]
    fn timer_seconds() {
        let units = TimeUnits::default();
        let t = build_timer("", "1%minute", "~{1%minute}", &units);
        assert_eq!(t.name, None);
        assert_eq!(t.seconds, 60.0);

        let t = build_timer(" rest ", "1/2%hour", "~ rest {1/2%hour}", &units);
        assert_eq!(t.name.as_deref(), Some("rest"));
        assert_eq!(t.amount, "1/2");
        assert_eq!(t.unit, "hour");
        assert_eq!(t.seconds, 1800.0);
    }

    #[test]
    fn metadata_entries() {
        let entry = build_metadata(" servings : 4 ").unwrap();
        assert_eq!(entry.key, "servings");
        assert_eq!(entry.value, "4");

        // the value keeps everything after the first colon
        let entry = build_metadata(" source: https://example.org/x ").unwrap();
        assert_eq!(entry.value, "https://example.org/x");

        assert_eq!(build_metadata("no colon"), Err(MetadataProblem::MissingColon));
        assert_eq!(build_metadata(" : value"), Err(MetadataProblem::EmptyKey));
    }
}
