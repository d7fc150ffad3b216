//! Directive syntax parsing.
//!
//! A directive is a comment line at the top of a cell whose comment marker
//! is followed by a pipe: `#| name arg...`. The name selects which
//! processors act on the cell; the argument tokens are preserved for the
//! matching processor and never interpreted here.
//!
//! Quarto option lines (`#| echo: false`) and cell magics (`%%time`) also
//! live in the cell header but are not processor directives; they stay in
//! the source when directive removal is enabled.

use crate::cell::Cell;
use crate::language::comment_marker;

/// A directive token extracted from a cell's leading comment lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Directive name (the first payload token).
    pub name: String,
    /// Remaining payload tokens, uninterpreted.
    pub args: Vec<String>,
}

impl Directive {
    /// Create a directive.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Classification of a line within a cell's leading header.
enum HeaderLine {
    /// Comment-pipe line; `None` when the payload is empty (`#|`).
    Directive(Option<Directive>),
    /// Quarto option line (`#| echo: false`), kept in the source.
    QuartoOption,
    /// Cell magic (`%%time`), kept in the source.
    Magic,
    /// Blank line, scanned past.
    Blank,
}

/// Classify a header line, or `None` if the line is ordinary source
/// (which terminates the header scan).
fn classify(line: &str, marker: &str) -> Option<HeaderLine> {
    let trimmed = line.trim_start();
    if trimmed.trim_end().is_empty() {
        return Some(HeaderLine::Blank);
    }
    if is_cell_magic(trimmed) {
        return Some(HeaderLine::Magic);
    }

    // A comment marker without a pipe is ordinary source, not a directive.
    let rest = trimmed.strip_prefix(marker)?.trim_start();
    let payload = rest.strip_prefix('|')?.trim();

    if payload.is_empty() {
        return Some(HeaderLine::Directive(None));
    }
    if is_quarto_option(payload) {
        return Some(HeaderLine::QuartoOption);
    }

    let mut tokens = payload.split_whitespace().map(str::to_owned);
    let name = tokens.next()?;
    Some(HeaderLine::Directive(Some(Directive {
        name,
        args: tokens.collect(),
    })))
}

/// Whether a header line is a cell magic (`%%name`).
fn is_cell_magic(trimmed: &str) -> bool {
    trimmed
        .strip_prefix("%%")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Whether a directive payload is a Quarto option (`name: value`).
fn is_quarto_option(payload: &str) -> bool {
    let name_len = payload
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(payload.len());
    name_len > 0 && payload[name_len..].trim_start().starts_with(':')
}

/// Normalize a Quarto option line to a single space after the colon.
fn normalize_quarto_option(line: &str) -> String {
    let Some(colon) = line.find(':') else {
        return line.to_owned();
    };
    let head = &line[..colon];
    let newline = if line.ends_with('\n') { "\n" } else { "" };
    let value = line[colon + 1..].trim();
    if value.is_empty() {
        format!("{head}:{newline}")
    } else {
        format!("{head}: {value}{newline}")
    }
}

/// Parse a single line of cell source for a directive.
///
/// Returns `None` for ordinary source, blank lines, cell magics, Quarto
/// options, and comment lines without a pipe.
#[must_use]
pub fn parse_directive_line(line: &str, marker: &str) -> Option<Directive> {
    match classify(line, marker)? {
        HeaderLine::Directive(directive) => directive,
        _ => None,
    }
}

/// Extract directives from a cell's leading comment lines.
///
/// Scans from the top of the cell and stops at the first line that is
/// neither blank, a cell magic, nor a comment-pipe line. Directives
/// accumulate in order of appearance, unique by name (a repeated name
/// keeps its first position but takes the later arguments).
///
/// With `remove` set, directive lines are stripped from the cell source;
/// Quarto options (normalized to one space after the colon) and cell
/// magics stay in place. The parsed directive list is populated
/// identically either way.
pub fn extract_directives(cell: &mut Cell, language: &str, remove: bool) {
    let marker = comment_marker(language);
    let lines: Vec<&str> = cell.source.split_inclusive('\n').collect();

    let mut directives: Vec<Directive> = Vec::new();
    let mut kept_header = String::new();
    let mut body_start = lines.len();

    for (i, line) in lines.iter().enumerate() {
        match classify(line, marker) {
            Some(HeaderLine::Directive(Some(directive))) => {
                push_directive(&mut directives, directive);
            }
            Some(HeaderLine::Directive(None) | HeaderLine::Blank) => {}
            Some(HeaderLine::QuartoOption) => kept_header.push_str(&normalize_quarto_option(line)),
            Some(HeaderLine::Magic) => kept_header.push_str(line),
            None => {
                body_start = i;
                break;
            }
        }
    }

    if remove {
        kept_header.push_str(&lines[body_start..].concat());
        cell.source = kept_header;
    }
    cell.set_directives(directives);
}

/// Insert a directive, deduplicating by name.
fn push_directive(directives: &mut Vec<Directive>, directive: Directive) {
    match directives.iter_mut().find(|d| d.name == directive.name) {
        Some(existing) => existing.args = directive.args,
        None => directives.push(directive),
    }
}
