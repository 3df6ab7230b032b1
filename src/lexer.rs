//! Line scanner
//!
//! One forward pass over a comment-stripped line produces a flat token
//! stream: plain text spans and raw component captures. Grouping the tokens
//! into step items happens later in the parser, so the scan never needs to
//! re-run a pattern or split on a matched substring.

use std::borrow::Cow;

use finl_unicode::categories::CharacterCategories;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Token<'i> {
    pub kind: TokenKind<'i>,
    /// Byte span within the scanned line
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TokenKind<'i> {
    /// Plain text between components
    Text,
    /// `@name`, `@name{amount%unit}` or `@multi word name{}`
    Ingredient { name: &'i str, body: Option<&'i str> },
    /// `#name` or `#multi word name{}`
    Cookware { name: &'i str },
    /// `~label{amount%unit}`, label possibly empty
    Timer { name: &'i str, body: &'i str },
    /// A sigil that matches the grammar but captures no usable name
    BadSigil { container: &'static str },
}

/// Removes `--` line comments and `[- -]` block comments from one line.
///
/// `in_block` carries an open block comment over to the following lines, so
/// stripping stays line-bounded while multi-line block comments still work.
pub(crate) fn strip_comments<'i>(line: &'i str, in_block: &mut bool) -> Cow<'i, str> {
    if !*in_block && !line.contains("--") && !line.contains("[-") {
        return Cow::Borrowed(line);
    }
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    loop {
        if *in_block {
            match rest.find("-]") {
                Some(close) => {
                    rest = &rest[close + 2..];
                    *in_block = false;
                }
                // comment continues on the next line
                None => break,
            }
        } else {
            let line_comment = rest.find("--");
            let block_comment = rest.find("[-");
            // line comment wins when it comes first, the rest of the line is gone
            if let Some(lc) = line_comment.filter(|lc| block_comment.map_or(true, |bc| *lc < bc)) {
                out.push_str(&rest[..lc]);
                break;
            } else if let Some(bc) = block_comment {
                out.push_str(&rest[..bc]);
                rest = &rest[bc + 2..];
                *in_block = true;
            } else {
                out.push_str(rest);
                break;
            }
        }
    }
    Cow::Owned(out)
}

/// Scans a comment-stripped line into a flat token stream.
///
/// The tokens cover the whole line: concatenating the spans in order yields
/// the input back.
pub(crate) fn scan_line(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;
    while pos < line.len() {
        let rest = &line[pos..];
        let c = rest.chars().next().unwrap();
        let scanned = match c {
            '@' => scan_ingredient(rest),
            '#' => scan_cookware(rest),
            '~' => scan_timer(rest),
            _ => None,
        };
        if let Some((kind, len)) = scanned {
            if text_start < pos {
                tokens.push(Token {
                    kind: TokenKind::Text,
                    span: Span::new(text_start, pos),
                });
            }
            tokens.push(Token {
                kind,
                span: Span::new(pos, pos + len),
            });
            pos += len;
            text_start = pos;
        } else {
            pos += c.len_utf8();
        }
    }
    if text_start < line.len() {
        tokens.push(Token {
            kind: TokenKind::Text,
            span: Span::new(text_start, line.len()),
        });
    }
    tokens
}

fn scan_ingredient(rest: &str) -> Option<(TokenKind<'_>, usize)> {
    debug_assert!(rest.starts_with('@'));
    // the long form needs at least one name character before the braces
    if let Some((name, body, len)) = braced_body(rest).filter(|(name, ..)| !name.is_empty()) {
        return Some((
            TokenKind::Ingredient {
                name,
                body: Some(body),
            },
            len,
        ));
    }
    match bare_name(rest) {
        BareName::Name(name) => Some((TokenKind::Ingredient { name, body: None }, 1 + name.len())),
        BareName::Unusable => Some((
            TokenKind::BadSigil {
                container: "ingredient",
            },
            1,
        )),
        BareName::NoMatch => None,
    }
}

fn scan_cookware(rest: &str) -> Option<(TokenKind<'_>, usize)> {
    debug_assert!(rest.starts_with('#'));
    // cookware braces carry no amount, only empty `{}` closes the long form
    if let Some((name, body, len)) = braced_body(rest).filter(|(name, ..)| !name.is_empty()) {
        if body.is_empty() {
            return Some((TokenKind::Cookware { name }, len));
        }
    }
    match bare_name(rest) {
        BareName::Name(name) => Some((TokenKind::Cookware { name }, 1 + name.len())),
        BareName::Unusable => Some((
            TokenKind::BadSigil {
                container: "cookware",
            },
            1,
        )),
        BareName::NoMatch => None,
    }
}

fn scan_timer(rest: &str) -> Option<(TokenKind<'_>, usize)> {
    debug_assert!(rest.starts_with('~'));
    let (name, body, len) = braced_body(rest)?;
    // a timer needs `amount%unit` with a numeric looking amount, anything
    // else leaves the tilde as plain prose
    let (amount, _unit) = body.split_once('%')?;
    if !is_timer_amount(amount.trim()) {
        return None;
    }
    Some((TokenKind::Timer { name, body }, len))
}

/// Integer, decimal or `a/b` fraction
fn is_timer_amount(s: &str) -> bool {
    !s.is_empty()
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '/')
        && s.matches('/').count() <= 1
}

/// `sigil name { body }` form. The name may contain spaces and punctuation
/// but never another sigil, and the braces must close on the same line.
///
/// Returns `(name, body, total matched len)` in bytes from the sigil.
fn braced_body(rest: &str) -> Option<(&str, &str, usize)> {
    let after = &rest[1..];
    let mut open = None;
    for (i, c) in after.char_indices() {
        match c {
            '{' => {
                open = Some(i);
                break;
            }
            '@' | '#' | '~' => return None,
            _ => {}
        }
    }
    let open = open?;
    let close = after[open + 1..].find('}')?;
    let name = &after[..open];
    let body = &after[open + 1..open + 1 + close];
    Some((name, body, 1 + open + 1 + close + 1))
}

enum BareName<'i> {
    Name(&'i str),
    /// The grammar matches but only an empty name could be captured
    Unusable,
    NoMatch,
}

/// `sigil word` form, the name stops at the first non word character.
fn bare_name(rest: &str) -> BareName<'_> {
    let after = &rest[1..];
    let end = after
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(after.len());
    if end > 0 {
        BareName::Name(&after[..end])
    } else if after.chars().any(is_word_char) {
        BareName::Unusable
    } else {
        BareName::NoMatch
    }
}

fn is_word_char(c: char) -> bool {
    match c {
        c if c.is_alphabetic() => true,
        '0'..='9' | '_' => true,
        ' ' | '\t' | '\r' | '\n' => false,
        '@' | '#' | '~' | '{' | '}' | '%' | '+' | '=' | '<' | '>' | '|' | '$' | '^' | '`' => false,
        c if c.is_separator_space() || c.is_punctuation() || c.is_symbol() => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<TokenKind<'_>> {
        scan_line(line).into_iter().map(|t| t.kind).collect()
    }

    fn strip(line: &str) -> String {
        let mut in_block = false;
        strip_comments(line, &mut in_block).into_owned()
    }

    #[test]
    fn line_comment() {
        assert_eq!(strip("a step -- note to self"), "a step ");
        assert_eq!(strip("-- whole line"), "");
        assert_eq!(strip("no comment here"), "no comment here");
    }

    #[test]
    fn block_comment() {
        assert_eq!(strip("before [- hidden -] after"), "before  after");
        assert_eq!(strip("[- a -][- b -]x"), "x");
        // line comment wins when it comes first
        assert_eq!(strip("a -- b [- c -]"), "a ");
    }

    #[test]
    fn block_comment_spans_lines() {
        let mut in_block = false;
        assert_eq!(strip_comments("start [- open", &mut in_block), "start ");
        assert!(in_block);
        assert_eq!(strip_comments("still hidden", &mut in_block), "");
        assert!(in_block);
        assert_eq!(strip_comments("end -] visible", &mut in_block), " visible");
        assert!(!in_block);
    }

    #[test]
    fn plain_text() {
        assert_eq!(kinds("just a step"), vec![TokenKind::Text]);
        assert_eq!(kinds("tilde ~ alone"), vec![TokenKind::Text]);
        assert!(kinds("").is_empty());
    }

    #[test]
    fn bare_ingredient() {
        assert_eq!(
            kinds("add @salt now"),
            vec![
                TokenKind::Text,
                TokenKind::Ingredient {
                    name: "salt",
                    body: None
                },
                TokenKind::Text,
            ]
        );
        // bare names stop at punctuation
        assert_eq!(
            kinds("@salt."),
            vec![
                TokenKind::Ingredient {
                    name: "salt",
                    body: None
                },
                TokenKind::Text,
            ]
        );
    }

    #[test]
    fn braced_ingredient() {
        assert_eq!(
            kinds("@olive oil{2%tbsp}"),
            vec![TokenKind::Ingredient {
                name: "olive oil",
                body: Some("2%tbsp"),
            }]
        );
        assert_eq!(
            kinds("@ground pepper{}"),
            vec![TokenKind::Ingredient {
                name: "ground pepper",
                body: Some(""),
            }]
        );
        // unclosed brace falls back to the single word form
        assert_eq!(
            kinds("@flour{2"),
            vec![
                TokenKind::Ingredient {
                    name: "flour",
                    body: None
                },
                TokenKind::Text,
            ]
        );
        // the long form needs a name, braces alone are prose
        assert_eq!(kinds("@{}"), vec![TokenKind::Text]);
        assert_eq!(kinds("#{}"), vec![TokenKind::Text]);
        assert_eq!(
            kinds("@{2%tbsp}"),
            vec![
                TokenKind::BadSigil {
                    container: "ingredient"
                },
                TokenKind::Text,
            ]
        );
    }

    #[test]
    fn cookware() {
        assert_eq!(
            kinds("#frying pan{}"),
            vec![TokenKind::Cookware { name: "frying pan" }]
        );
        assert_eq!(
            kinds("#pot"),
            vec![TokenKind::Cookware { name: "pot" }]
        );
        // non empty braces are not part of the cookware grammar
        assert_eq!(
            kinds("#pan{2}"),
            vec![TokenKind::Cookware { name: "pan" }, TokenKind::Text]
        );
    }

    #[test]
    fn timer() {
        assert_eq!(
            kinds("~{10%minutes}"),
            vec![TokenKind::Timer {
                name: "",
                body: "10%minutes",
            }]
        );
        assert_eq!(
            kinds("~rest{1/2%hour}"),
            vec![TokenKind::Timer {
                name: "rest",
                body: "1/2%hour",
            }]
        );
        // missing unit separator or non numeric amount is prose
        assert_eq!(kinds("~{10}"), vec![TokenKind::Text]);
        assert_eq!(kinds("~{soon%minutes}"), vec![TokenKind::Text]);
    }

    #[test]
    fn bad_sigil() {
        assert_eq!(
            kinds("@ salt"),
            vec![
                TokenKind::BadSigil {
                    container: "ingredient"
                },
                TokenKind::Text,
            ]
        );
        // nothing usable after the sigil, the whole thing stays plain text
        assert_eq!(kinds("mix it @"), vec![TokenKind::Text]);
        assert_eq!(kinds("what?! @ ?!"), vec![TokenKind::Text]);
    }

    #[test]
    fn spans_cover_line() {
        let line = "Heat @olive oil{2%tbsp} in a #frying pan{}.";
        let tokens = scan_line(line);
        let mut rebuilt = String::new();
        for t in &tokens {
            rebuilt.push_str(&line[t.span.range()]);
        }
        assert_eq!(rebuilt, line);
    }
}
