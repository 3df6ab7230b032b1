//! Recipe assembly
//!
//! Walks the document line by line: strips comments, routes metadata lines
//! into the metadata list and groups the scanned tokens of every other line
//! into a [`Step`], accumulating the canonical component lists along the
//! way. Components inside steps are stored as indices into those lists, so
//! the same conceptual ingredient never exists as two mutable copies.

use crate::component::{
    build_cookware, build_ingredient, build_metadata, build_timer, MetadataProblem,
};
use crate::error::{Context, ParserError, ParserWarning, PassResult};
use crate::lexer::{scan_line, strip_comments, TokenKind};
use crate::model::{Component, ComponentKind, Item, Recipe, Step};
use crate::span::Span;
use crate::time::TimeUnits;
use crate::ParseMode;

pub(crate) fn parse_document(input: &str, mode: ParseMode, units: &TimeUnits) -> PassResult<Recipe> {
    let mut ctx = Context::default();
    let mut recipe = Recipe::default();
    let mut in_block_comment = false;
    let mut block_open: Option<(usize, Span)> = None;
    let mut offset = 0;

    for (idx, raw_line) in input.split('\n').enumerate() {
        let source = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        let stripped = strip_comments(source, &mut in_block_comment);
        if in_block_comment {
            // remember where the still open block comment started
            if let Some(open) = source.rfind("[-") {
                block_open = Some((idx + 1, Span::new(offset + open, offset + open + 2)));
            }
        } else {
            block_open = None;
        }
        let info = LineInfo {
            number: idx + 1,
            source,
            start: offset,
        };
        if !parse_line(&stripped, &info, mode, units, &mut recipe, &mut ctx) {
            // fail-fast: discard everything built so far
            return ctx.finish(None);
        }
        offset += raw_line.len() + 1;
    }

    // an open block comment at the end of the document swallowed every
    // line after it, that deserves a trace
    if let Some((line, span)) = block_open {
        ctx.warn(ParserWarning::UnclosedBlockComment { line, span });
    }

    ctx.finish(Some(recipe))
}

struct LineInfo<'i> {
    /// 1-indexed line number
    number: usize,
    /// Original line, comments included
    source: &'i str,
    /// Byte offset of the line start in the document
    start: usize,
}

impl LineInfo<'_> {
    fn line_span(&self) -> Span {
        Span::new(self.start, self.start + self.source.len())
    }

    /// Span of `raw` inside the original line. Comment stripping moves
    /// offsets around, so the text is located again in the source; if a
    /// comment sat in the middle of it the whole line is the span.
    ///
    /// `from` is the token's offset in the comment-stripped line. Stripping
    /// only removes bytes, so the match in the source is never earlier than
    /// that; searching from there keeps repeated text (a lone `@`) from
    /// resolving to an earlier occurrence.
    fn span_of(&self, raw: &str, from: usize) -> Span {
        match self.source.match_indices(raw).find(|(i, _)| *i >= from) {
            Some((i, _)) => Span::new(self.start + i, self.start + i + raw.len()),
            None => self.line_span(),
        }
    }
}

/// Returns `false` when a strict parse must stop.
fn parse_line(
    line: &str,
    info: &LineInfo<'_>,
    mode: ParseMode,
    units: &TimeUnits,
    recipe: &mut Recipe,
    ctx: &mut Context,
) -> bool {
    if line.trim().is_empty() {
        return true;
    }

    // a metadata line never mixes with other tokens
    if let Some(content) = line.strip_prefix(">>") {
        match build_metadata(content) {
            Ok(entry) => {
                recipe.metadata.entries.push(entry);
                return true;
            }
            Err(MetadataProblem::EmptyKey) => {
                if !malformed(mode, ctx, "metadata", line.trim(), info.line_span(), info) {
                    return false;
                }
                // permissive keeps the line as prose
                recipe.steps.push(Step {
                    items: vec![Item::Text {
                        value: line.to_string(),
                    }],
                });
                return true;
            }
            Err(MetadataProblem::MissingColon) => {
                // the original grammar does not recognize this as metadata,
                // scan it as a regular step but leave a trace
                ctx.warn(ParserWarning::MetadataWithoutColon {
                    line: info.number,
                    span: info.line_span(),
                });
            }
        }
    }

    let mut items: Vec<Item> = Vec::new();
    for token in scan_line(line) {
        let raw = &line[token.span.range()];
        match token.kind {
            TokenKind::Text => push_text(&mut items, raw),
            TokenKind::Ingredient { name, body } => match build_ingredient(name, body, raw) {
                Ok(ingredient) => {
                    items.push(component_item(
                        ComponentKind::Ingredient,
                        recipe.ingredients.len(),
                    ));
                    recipe.ingredients.push(ingredient);
                }
                Err(_) => {
                    let span = info.span_of(raw, token.span.start());
                    if !malformed(mode, ctx, "ingredient", raw, span, info) {
                        return false;
                    }
                    push_text(&mut items, raw);
                }
            },
            TokenKind::Cookware { name } => match build_cookware(name, raw) {
                Ok(cookware) => {
                    items.push(component_item(
                        ComponentKind::Cookware,
                        recipe.cookware.len(),
                    ));
                    recipe.cookware.push(cookware);
                }
                Err(_) => {
                    let span = info.span_of(raw, token.span.start());
                    if !malformed(mode, ctx, "cookware", raw, span, info) {
                        return false;
                    }
                    push_text(&mut items, raw);
                }
            },
            TokenKind::Timer { name, body } => {
                items.push(component_item(ComponentKind::Timer, recipe.timers.len()));
                recipe.timers.push(build_timer(name, body, raw, units));
            }
            TokenKind::BadSigil { container } => {
                let rest = &line[token.span.start()..];
                let span = info.span_of(raw, token.span.start());
                if !malformed(mode, ctx, container, rest, span, info) {
                    return false;
                }
                push_text(&mut items, raw);
            }
        }
    }

    if !items.is_empty() {
        recipe.steps.push(Step { items });
    }
    true
}

fn component_item(kind: ComponentKind, index: usize) -> Item {
    Item::Component {
        value: Component { kind, index },
    }
}

/// Merge runs of plain text into a single item so a line with one component
/// always yields at most text-component-text.
fn push_text(items: &mut Vec<Item>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Item::Text { value }) = items.last_mut() {
        value.push_str(text);
    } else {
        items.push(Item::Text {
            value: text.to_string(),
        });
    }
}

/// Records a malformed component. Returns `false` when the parse must stop.
fn malformed(
    mode: ParseMode,
    ctx: &mut Context,
    container: &'static str,
    text: &str,
    span: Span,
    info: &LineInfo<'_>,
) -> bool {
    let text = snippet(text);
    match mode {
        ParseMode::Strict => {
            ctx.error(ParserError::MalformedEntity {
                container,
                text,
                line: info.number,
                span,
            });
            false
        }
        ParseMode::Permissive => {
            ctx.warn(ParserWarning::IgnoredEntity {
                container,
                text,
                line: info.number,
                span,
            });
            true
        }
    }
}

fn snippet(s: &str) -> String {
    const MAX_CHARS: usize = 40;
    let mut out: String = s.chars().take(MAX_CHARS).collect();
    if out.len() < s.len() {
        out.push('…');
    }
    out
}
