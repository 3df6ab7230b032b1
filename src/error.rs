//! Error types, warnings and report formatting.

use std::borrow::Cow;

use thiserror::Error;

use crate::span::Span;

/// Error produced while parsing a recipe
///
/// Every error carries the 1-indexed line number and the offending text so
/// the consumer can point at the problem without re-scanning the source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// A sigil was found but the expected component structure did not match
    #[error("malformed {container} in line {line}: '{text}'")]
    MalformedEntity {
        /// Kind of component that failed to parse
        container: &'static str,
        /// Offending source text
        text: String,
        /// Line number, starting at 1
        line: usize,
        /// Location in the source
        span: Span,
    },
}

/// Non fatal diagnostic produced while parsing a recipe
///
/// In [`ParseMode::Permissive`](crate::ParseMode::Permissive) malformed
/// components degrade into warnings instead of failing the parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParserWarning {
    /// A malformed component was kept as plain text
    #[error("malformed {container} in line {line} treated as text: '{text}'")]
    IgnoredEntity {
        container: &'static str,
        text: String,
        line: usize,
        span: Span,
    },
    /// A `>>` line without `key: value` structure
    #[error("metadata directive without ':' in line {line} treated as a step")]
    MetadataWithoutColon { line: usize, span: Span },
    /// A `[-` opened in `line` with no matching `-]` before the end of the
    /// document, everything after it was ignored
    #[error("block comment opened in line {line} is never closed")]
    UnclosedBlockComment { line: usize, span: Span },
}

/// Trait to enhance diagnostics with information for rich reports
pub trait RichError: std::error::Error {
    fn span(&self) -> Span;
    fn label(&self) -> Option<Cow<'static, str>> {
        None
    }
    fn help(&self) -> Option<Cow<'static, str>> {
        None
    }
    fn kind(&self) -> ariadne::ReportKind {
        ariadne::ReportKind::Error
    }
}

impl RichError for ParserError {
    fn span(&self) -> Span {
        match self {
            ParserError::MalformedEntity { span, .. } => *span,
        }
    }

    fn label(&self) -> Option<Cow<'static, str>> {
        match self {
            ParserError::MalformedEntity { container, .. } => {
                Some(format!("this {container} could not be parsed").into())
            }
        }
    }

    fn help(&self) -> Option<Cow<'static, str>> {
        match self {
            ParserError::MalformedEntity { container, .. } => match *container {
                "ingredient" => Some("write `@name` or `@multi word name{}`".into()),
                "cookware" => Some("write `#name` or `#multi word name{}`".into()),
                "timer" => Some("write `~{amount%unit}`".into()),
                "metadata" => Some("write `>> key: value`".into()),
                _ => None,
            },
        }
    }
}

impl RichError for ParserWarning {
    fn span(&self) -> Span {
        match self {
            ParserWarning::IgnoredEntity { span, .. } => *span,
            ParserWarning::MetadataWithoutColon { span, .. } => *span,
            ParserWarning::UnclosedBlockComment { span, .. } => *span,
        }
    }

    fn label(&self) -> Option<Cow<'static, str>> {
        match self {
            ParserWarning::IgnoredEntity { .. } => Some("kept as plain text".into()),
            ParserWarning::MetadataWithoutColon { .. } => Some("missing `:` here".into()),
            ParserWarning::UnclosedBlockComment { .. } => Some("opened here".into()),
        }
    }

    fn help(&self) -> Option<Cow<'static, str>> {
        match self {
            ParserWarning::IgnoredEntity { .. } => None,
            ParserWarning::MetadataWithoutColon { .. } => Some("write `>> key: value`".into()),
            ParserWarning::UnclosedBlockComment { .. } => Some("close it with `-]`".into()),
        }
    }

    fn kind(&self) -> ariadne::ReportKind {
        ariadne::ReportKind::Warning
    }
}

/// Errors and warnings container with fancy formatting
///
/// The [`Display`](std::fmt::Display) implementation is plain text, use
/// [`Report::write`] or [`Report::eprint`] for the annotated version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub(crate) errors: Vec<ParserError>,
    pub(crate) warnings: Vec<ParserWarning>,
}

impl Report {
    /// Errors of the report
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    /// Warnings of the report
    pub fn warnings(&self) -> &[ParserWarning] {
        &self.warnings
    }

    /// Check if the report has errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report has no errors and no warnings
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Write an annotated report for every diagnostic
    pub fn write(
        &self,
        file_name: &str,
        source_code: &str,
        hide_warnings: bool,
        w: &mut impl std::io::Write,
    ) -> std::io::Result<()> {
        let mut cache = SingleFileCache::new(file_name, source_code);
        if !hide_warnings {
            for warn in &self.warnings {
                build_report(warn, file_name, source_code).write(&mut cache, &mut *w)?;
            }
        }
        for err in &self.errors {
            build_report(err, file_name, source_code).write(&mut cache, &mut *w)?;
        }
        Ok(())
    }

    /// Prints an annotated report to stderr
    pub fn eprint(
        &self,
        file_name: &str,
        source_code: &str,
        hide_warnings: bool,
    ) -> std::io::Result<()> {
        self.write(file_name, source_code, hide_warnings, &mut std::io::stderr())
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for warn in &self.warnings {
            writeln!(f, "warning: {warn}")?;
        }
        for err in &self.errors {
            writeln!(f, "error: {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Report {}

/// Output of a parse call: a possible value plus its diagnostics
///
/// In strict mode an error means there is no output. In permissive mode
/// there is always output, possibly with warnings attached.
#[derive(Debug, Clone, PartialEq)]
pub struct PassResult<T> {
    output: Option<T>,
    warnings: Vec<ParserWarning>,
    errors: Vec<ParserError>,
}

impl<T> PassResult<T> {
    pub(crate) fn new(
        output: Option<T>,
        warnings: Vec<ParserWarning>,
        errors: Vec<ParserError>,
    ) -> Self {
        Self {
            output,
            warnings,
            errors,
        }
    }

    /// Check if the result has any output. It may still carry warnings.
    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    /// Check if the result has errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the result has warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get the output
    pub fn output(&self) -> Option<&T> {
        self.output.as_ref()
    }

    /// Get the warnings
    pub fn warnings(&self) -> &[ParserWarning] {
        &self.warnings
    }

    /// Get the errors
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    /// Transform into a common rust [`Result`]
    pub fn into_result(mut self) -> Result<(T, Vec<ParserWarning>), Report> {
        if let Some(o) = self.output.take() {
            if self.errors.is_empty() {
                return Ok((o, self.warnings));
            }
        }
        Err(self.into_report())
    }

    /// Transform into a [`Report`] discarding the output
    pub fn into_report(self) -> Report {
        Report {
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    /// Take the output discarding the diagnostics
    pub fn take_output(&mut self) -> Option<T> {
        self.output.take()
    }

    /// Transform into the output discarding the diagnostics
    pub fn into_output(self) -> Option<T> {
        self.output
    }

    /// Get output, warnings and errors in a tuple
    pub fn into_tuple(self) -> (Option<T>, Vec<ParserWarning>, Vec<ParserError>) {
        (self.output, self.warnings, self.errors)
    }

    /// Map the inner output
    pub fn map<F, O>(self, f: F) -> PassResult<O>
    where
        F: FnOnce(T) -> O,
    {
        PassResult {
            output: self.output.map(f),
            warnings: self.warnings,
            errors: self.errors,
        }
    }
}

/// Diagnostics accumulator used during a parse pass
#[derive(Debug)]
pub(crate) struct Context {
    pub errors: Vec<ParserError>,
    pub warnings: Vec<ParserWarning>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            errors: vec![],
            warnings: vec![],
        }
    }
}

impl Context {
    pub fn error(&mut self, e: ParserError) {
        self.errors.push(e);
    }

    pub fn warn(&mut self, w: ParserWarning) {
        self.warnings.push(w);
    }

    pub fn finish<T>(self, output: Option<T>) -> PassResult<T> {
        PassResult::new(output, self.warnings, self.errors)
    }
}

fn build_report<'a>(
    err: &'a dyn RichError,
    file_name: &str,
    src_code: &str,
) -> ariadne::Report<'a> {
    use ariadne::{Label, Report};

    let span = err.span().to_chars_span(src_code, file_name);
    let mut r = Report::build(err.kind(), (), span.start()).with_message(err);

    let mut label = Label::new(span.range());
    if let Some(text) = err.label() {
        label = label.with_message(text);
    }
    r.add_label(label);

    if let Some(help) = err.help() {
        r.set_help(help);
    }

    r.finish()
}

// ariadne cache for a single source file
struct SingleFileCache(String, ariadne::Source);

impl SingleFileCache {
    fn new(file_name: &str, src_code: &str) -> Self {
        Self(file_name.into(), src_code.into())
    }
}

impl ariadne::Cache<()> for SingleFileCache {
    fn fetch(&mut self, _id: &()) -> Result<&ariadne::Source, Box<dyn std::fmt::Debug + '_>> {
        Ok(&self.1)
    }

    fn display<'a>(&self, _id: &'a ()) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.0.clone()))
    }
}
