//! Recipe representation

use serde::{Deserialize, Serialize};

/// A complete recipe
///
/// This is the root aggregate produced by a parse call. It is immutable
/// after construction, an edit to the source means a new parse.
///
/// The canonical component lists hold one entry per reference in the text;
/// nothing is merged. Deduplicated views are projections, see
/// [`Recipe::group_ingredients`](crate::projection).
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Clone)]
pub struct Recipe {
    /// Metadata entries in document order
    pub metadata: Metadata,
    /// All the ingredient references
    pub ingredients: Vec<Ingredient>,
    /// All the cookware references
    pub cookware: Vec<Cookware>,
    /// All the timer references
    pub timers: Vec<Timer>,
    /// The steps, in document order
    pub steps: Vec<Step>,
}

impl Recipe {
    /// Sum of all the timer durations, in seconds
    pub fn total_time(&self) -> f64 {
        self.timers.iter().map(|t| t.seconds).sum()
    }

    /// Rebuilds the source text of a step from its items
    ///
    /// This reproduces the original line with comments stripped.
    pub fn step_text(&self, step: &Step) -> String {
        let mut out = String::new();
        for item in &step.items {
            match item {
                Item::Text { value } => out.push_str(value),
                Item::Component { value } => out.push_str(self.component_raw(value)),
            }
        }
        out
    }

    pub(crate) fn component_raw(&self, component: &Component) -> &str {
        match component.kind {
            ComponentKind::Ingredient => &self.ingredients[component.index].raw,
            ComponentKind::Cookware => &self.cookware[component.index].raw,
            ComponentKind::Timer => &self.timers[component.index].raw,
        }
    }
}

/// Ordered `key: value` metadata entries
///
/// Duplicate keys are kept; [`Metadata::get`] returns the last value, which
/// is what a reader editing top to bottom expects to win.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Clone)]
#[serde(transparent)]
pub struct Metadata {
    pub entries: Vec<MetadataEntry>,
}

impl Metadata {
    /// Last value for a key, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|e| (e.key.as_str(), e.value.as_str()))
    }
}

/// One `>> key: value` line
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

/// A step holding interleaved text and component references
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Step {
    /// [`Item`]s in strict left to right source order
    pub items: Vec<Item>,
}

/// A step item
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Item {
    /// Just plain text
    Text { value: String },
    /// A [`Component`] reference
    Component { value: Component },
}

/// A reference to a component in the [`Recipe`] canonical lists
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct Component {
    /// What kind of component it is
    pub kind: ComponentKind,
    /// The index into the corresponding vec of [`Recipe`]
    pub index: usize,
}

/// Component kind used in [`Component`]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Ingredient,
    Cookware,
    Timer,
}

/// A recipe ingredient
///
/// The amount is kept as the raw text it was written with, `1/2` stays
/// `1/2` and never becomes `0.5` in the model.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Ingredient {
    /// Name, trimmed
    pub name: String,
    /// Raw amount text, if any
    pub amount: Option<String>,
    /// Unit text, if any
    pub unit: Option<String>,
    /// Exact source text of the reference
    pub raw: String,
}

impl Ingredient {
    /// Amount and unit joined for display, e.g. `2 tbsp`
    pub fn quantity_display(&self) -> Option<String> {
        match (&self.amount, &self.unit) {
            (Some(amount), Some(unit)) => Some(format!("{amount} {unit}")),
            (Some(amount), None) => Some(amount.clone()),
            (None, _) => None,
        }
    }
}

/// A recipe cookware item
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Cookware {
    /// Name, trimmed
    pub name: String,
    /// Exact source text of the reference
    pub raw: String,
}

/// A recipe timer
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Timer {
    /// Optional label, e.g. `~rest{10%minutes}`
    pub name: Option<String>,
    /// Raw amount text
    pub amount: String,
    /// Unit text
    pub unit: String,
    /// Duration normalized to seconds, `0.0` when the unit is unknown
    pub seconds: f64,
    /// Exact source text of the reference
    pub raw: String,
}
