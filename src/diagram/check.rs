//! Structural checks run before a description reaches the Mermaid engine.
//!
//! The engine is lenient and draws something for almost any input. Slides
//! need the opposite: a description that is not a well-formed flowchart
//! must fail so its placeholder stays unrendered. This module rejects empty
//! descriptions, non-flowchart headers, unbalanced shape delimiters,
//! unclosed quotes, and links without a target.

use crate::error::DiagramError;

/// Diagram headers that exist in Mermaid but are not drawn on slides.
const UNSUPPORTED_HEADERS: &[&str] = &[
    "sequenceDiagram",
    "classDiagram",
    "classDiagram-v2",
    "stateDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "journey",
    "gantt",
    "pie",
    "quadrantChart",
    "requirementDiagram",
    "gitGraph",
    "mindmap",
    "timeline",
    "sankey-beta",
    "xychart-beta",
    "block-beta",
    "C4Context",
];

/// Statements whose arguments are free-form styling text.
const STYLE_KEYWORDS: &[&str] = &["style", "classDef", "class", "linkStyle", "click"];

/// Link operators, longest first.
const LINKS: &[&str] = &["--->", "-.->", "-->", "---", "-.-", "==>", "==="];

/// Directions accepted after the header keyword.
const DIRECTIONS: &[&str] = &["TD", "TB", "BT", "LR", "RL"];

/// Summary of a description that passed every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checked {
    /// Number of statements after the header.
    pub statements: usize,
}

/// Checks that `source` is a well-formed flowchart description.
///
/// # Errors
///
/// Returns the first problem found, with its 1-based line number.
pub fn check(source: &str) -> Result<Checked, DiagramError> {
    let mut lines = source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with("%%"));

    let Some((header_line, header)) = lines.next() else {
        return Err(DiagramError::Empty);
    };

    // `graph TD; A --> B` puts statements on the header line.
    let (header, inline_rest) = header
        .split_once(';')
        .map_or((header, ""), |(head, rest)| (head.trim(), rest));
    check_header(header, header_line)?;

    let mut statements = 0;
    let body = std::iter::once((header_line, inline_rest)).chain(lines);
    for (line, text) in body {
        for statement in split_statements(text) {
            check_statement(statement, line)?;
            statements += 1;
        }
    }

    Ok(Checked { statements })
}

fn check_header(header: &str, line: usize) -> Result<(), DiagramError> {
    let mut tokens = header.split_whitespace();
    let keyword = tokens.next().unwrap_or_default();

    if keyword.eq_ignore_ascii_case("flowchart") || keyword.eq_ignore_ascii_case("graph") {
        return match tokens.next() {
            Some(token) if !DIRECTIONS.contains(&token.to_ascii_uppercase().as_str()) => {
                Err(DiagramError::Syntax {
                    line,
                    message: format!("unknown direction '{token}'"),
                })
            }
            _ => Ok(()),
        };
    }

    if UNSUPPORTED_HEADERS.contains(&keyword) {
        return Err(DiagramError::Unsupported(keyword.to_string()));
    }

    Err(DiagramError::InvalidHeader {
        line,
        found: header.to_string(),
    })
}

/// Splits a line on `;` outside quotes and delimiters, dropping empty parts.
fn split_statements(line: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut start = 0;

    for (i, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '[' | '(' | '{' if !quoted => depth += 1,
            ']' | ')' | '}' if !quoted => depth = depth.saturating_sub(1),
            ';' if !quoted && depth == 0 => {
                parts.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&line[start..]);
    parts.into_iter().map(str::trim).filter(|s| !s.is_empty()).collect()
}

fn check_statement(statement: &str, line: usize) -> Result<(), DiagramError> {
    let keyword = statement.split_whitespace().next().unwrap_or_default();
    if STYLE_KEYWORDS.contains(&keyword) {
        return Ok(());
    }

    check_delimiters(statement, line)?;

    if ends_with_link(statement) {
        return Err(DiagramError::Syntax {
            line,
            message: "link has no target".to_string(),
        });
    }
    Ok(())
}

/// True when the statement ends in a link operator, optionally followed by
/// a `|label|`.
fn ends_with_link(statement: &str) -> bool {
    let is_link_end = |text: &str| LINKS.iter().any(|link| text.trim_end().ends_with(link));
    let labelled = statement
        .strip_suffix('|')
        .and_then(|rest| rest.rfind('|').map(|i| &rest[..i]));
    is_link_end(statement) || labelled.is_some_and(is_link_end)
}

/// Walks shape delimiters and quotes, reporting the first one left open.
fn check_delimiters(statement: &str, line: usize) -> Result<(), DiagramError> {
    let mut stack: Vec<char> = Vec::new();
    let mut quoted = false;

    for c in statement.chars() {
        if quoted {
            quoted = c != '"';
            continue;
        }
        match c {
            '"' => quoted = true,
            '[' | '(' | '{' => stack.push(c),
            ']' | ')' | '}' => match stack.pop() {
                Some(open) if closer(open) == c => {}
                Some(open) => {
                    return Err(DiagramError::Syntax {
                        line,
                        message: format!("'{open}' closed by '{c}'"),
                    });
                }
                // `A>label]` closes a shape opened by `>`
                None if c == ']' => {}
                None => {
                    return Err(DiagramError::Syntax {
                        line,
                        message: format!("unexpected '{c}'"),
                    });
                }
            },
            _ => {}
        }
    }

    if quoted {
        return Err(unterminated(line, '"'));
    }
    match stack.first() {
        Some(&open) => Err(unterminated(line, open)),
        None => Ok(()),
    }
}

const fn closer(open: char) -> char {
    match open {
        '[' => ']',
        '(' => ')',
        '{' => '}',
        other => other,
    }
}

fn unterminated(line: usize, open: char) -> DiagramError {
    DiagramError::Unterminated {
        line,
        open: open.to_string(),
        close: closer(open).to_string(),
    }
}
