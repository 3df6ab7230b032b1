//! A lightweight [cooklang](https://cooklang.org/) recipe parser.
//!
//! Parses `.cook` documents into a structured [`Recipe`]: metadata,
//! ingredients, cookware, timers and the steps that reference them, keeping
//! the original text interleaving so the recipe can be rendered back.
//!
//! Also includes:
//! - Annotated error reports with source spans.
//! - Time normalization for timers and total time.
//! - Ingredient grouping for shopping-list style views.
//!
//! # Basic usage
//!
//! For a single document, [`parse`] does the job:
//!
//! ```rust
//! let (recipe, _warnings) = cooklite::parse("Add the @salt now").into_result()?;
//! assert_eq!(recipe.ingredients.len(), 1);
//! assert_eq!(recipe.ingredients[0].name, "salt");
//! # Ok::<(), cooklite::error::Report>(())
//! ```
//!
//! To parse more than one document or to change the configuration,
//! construct a [`RecipeParser`] and reuse it:
//!
//! ```rust
//! use cooklite::{ParseMode, RecipeParser};
//!
//! let parser = RecipeParser::new(ParseMode::Permissive);
//! let result = parser.parse("Mix the @ dough");
//! // permissive parses always have output, problems become warnings
//! assert!(result.has_output());
//! assert!(result.has_warnings());
//! ```
//!
//! # Parse modes
//!
//! The parser has two modes and they are not equivalent on malformed input:
//!
//! - [`ParseMode::Strict`] (the default) fails the whole document on the
//!   first malformed component. An editor preview that re-parses on every
//!   keystroke wants this, a half-built recipe is confusing.
//! - [`ParseMode::Permissive`] always returns a best-effort [`Recipe`] and
//!   reports problems as warnings, keeping the offending text as plain
//!   prose.

#![warn(rustdoc::broken_intra_doc_links, clippy::doc_markdown)]

pub mod error;
pub mod model;
pub mod projection;
pub mod span;
pub mod time;

mod component;
mod lexer;
mod parser;

use serde::{Deserialize, Serialize};

pub use error::{ParserError, ParserWarning, PassResult, Report};
pub use model::*;
pub use projection::{GroupedIngredient, GroupedQuantity, StepPart};
pub use span::Span;
pub use time::TimeUnits;

/// How the parser reacts to malformed components
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Fail the whole document on the first malformed component, partial
    /// results are discarded
    #[default]
    Strict,
    /// Always return a best-effort recipe plus a list of warnings
    Permissive,
}

/// A cooklang parser
///
/// Parsing is pure and synchronous, the parser holds no state between
/// calls and can be shared freely between threads.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecipeParser {
    mode: ParseMode,
    time_units: TimeUnits,
}

pub type RecipeResult = PassResult<Recipe>;

impl RecipeParser {
    /// Creates a new parser with the default time unit table
    pub fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            time_units: TimeUnits::default(),
        }
    }

    /// Replaces the time unit table used for timer normalization
    pub fn with_time_units(mut self, time_units: TimeUnits) -> Self {
        self.time_units = time_units;
        self
    }

    /// Get the configured mode
    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Get the time unit table
    pub fn time_units(&self) -> &TimeUnits {
        &self.time_units
    }

    /// Parse a recipe document
    #[tracing::instrument(level = "debug", name = "parse", skip_all, fields(len = input.len()))]
    pub fn parse(&self, input: &str) -> RecipeResult {
        parser::parse_document(input, self.mode, &self.time_units)
    }
}

/// Parse a recipe with a default, strict [`RecipeParser`]
pub fn parse(input: &str) -> RecipeResult {
    RecipeParser::default().parse(input)
}
