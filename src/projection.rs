//! Display-ready projections of a parsed recipe
//!
//! The boundary a renderer consumes: steps with component indices resolved
//! to the actual entities, and ingredients grouped by name with merged
//! quantities.

use std::fmt::Display;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{Cookware, Ingredient, Item, Recipe, Step, Timer};
use crate::time::parse_number;

/// A step element resolved for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StepPart<'a> {
    /// Plain text between components
    Text { value: &'a str },
    Ingredient { ingredient: &'a Ingredient },
    Cookware { cookware: &'a Cookware },
    Timer { timer: &'a Timer },
}

impl Recipe {
    /// All steps flattened into renderable parts, in document order
    pub fn flatten_steps(&self) -> Vec<Vec<StepPart<'_>>> {
        self.steps.iter().map(|s| self.flatten_step(s)).collect()
    }

    fn flatten_step<'a>(&'a self, step: &'a Step) -> Vec<StepPart<'a>> {
        use crate::model::ComponentKind::*;
        step.items
            .iter()
            .map(|item| match item {
                Item::Text { value } => StepPart::Text { value },
                Item::Component { value } => match value.kind {
                    Ingredient => StepPart::Ingredient {
                        ingredient: &self.ingredients[value.index],
                    },
                    Cookware => StepPart::Cookware {
                        cookware: &self.cookware[value.index],
                    },
                    Timer => StepPart::Timer {
                        timer: &self.timers[value.index],
                    },
                },
            })
            .collect()
    }

    /// Ingredients grouped by name, in order of first appearance
    ///
    /// Quantities with the same unit merge additively when the amounts are
    /// numeric. Everything else is carried in the
    /// [`other`](GroupedQuantity::other) bucket, nothing is dropped.
    pub fn group_ingredients(&self) -> Vec<GroupedIngredient<'_>> {
        let mut groups: IndexMap<&str, GroupedIngredient<'_>> = IndexMap::new();
        for (index, ingredient) in self.ingredients.iter().enumerate() {
            let group = groups
                .entry(ingredient.name.as_str())
                .or_insert_with(|| GroupedIngredient {
                    index,
                    ingredient,
                    references: 0,
                    quantity: GroupedQuantity::default(),
                });
            group.references += 1;
            group
                .quantity
                .add(ingredient.amount.as_deref(), ingredient.unit.as_deref());
        }
        groups.into_values().collect()
    }
}

/// Ingredient with the quantities of all its same-named references grouped
///
/// Created from [`Recipe::group_ingredients`].
#[derive(Debug, Clone, Serialize)]
pub struct GroupedIngredient<'a> {
    /// Index of the first reference in [`Recipe::ingredients`]
    pub index: usize,
    /// First reference of the ingredient
    pub ingredient: &'a Ingredient,
    /// Number of references in the recipe
    pub references: usize,
    /// Grouped quantity of all the references
    pub quantity: GroupedQuantity,
}

/// Additive totals per unit plus everything that cannot be merged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedQuantity {
    /// Keyed by unit text, `None` is the unitless bucket
    units: IndexMap<Option<String>, f64>,
    other: Vec<String>,
}

impl GroupedQuantity {
    pub(crate) fn add(&mut self, amount: Option<&str>, unit: Option<&str>) {
        let Some(amount) = amount else { return };
        match parse_number(amount.trim()) {
            Some(n) => {
                *self.units.entry(unit.map(str::to_string)).or_insert(0.0) += n;
            }
            None => self.other.push(match unit {
                Some(unit) => format!("{amount} {unit}"),
                None => amount.to_string(),
            }),
        }
    }

    /// Merged total for a unit, if any reference used it
    pub fn total_for(&self, unit: Option<&str>) -> Option<f64> {
        self.units.get(&unit.map(str::to_string)).copied()
    }

    /// Quantities that could not be merged numerically, verbatim
    pub fn other(&self) -> &[String] {
        &self.other
    }

    /// Check if no reference carried a quantity
    pub fn is_empty(&self) -> bool {
        self.units.is_empty() && self.other.is_empty()
    }
}

impl Display for GroupedQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        let mut sep = |f: &mut std::fmt::Formatter<'_>| {
            if first {
                first = false;
                Ok(())
            } else {
                f.write_str(", ")
            }
        };
        for (unit, total) in &self.units {
            sep(f)?;
            f.write_str(&format_number(*total))?;
            if let Some(unit) = unit {
                write!(f, " {unit}")?;
            }
        }
        for text in &self.other {
            sep(f)?;
            f.write_str(text)?;
        }
        Ok(())
    }
}

impl Serialize for GroupedQuantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Rounds to 3 decimal places and drops the fraction when whole
fn format_number(n: f64) -> String {
    let rounded = (n * 1000.0).round() / 1000.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}
