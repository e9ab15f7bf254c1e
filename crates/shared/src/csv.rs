//! Minimal CSV writing and splitting.
//!
//! Fields containing the delimiter, a double quote or a line break are wrapped
//! in double quotes, with embedded quotes doubled (RFC 4180 style). Rows are
//! terminated by `\n`.

use std::borrow::Cow;
use thiserror::Error;

/// Column delimiter used for every export.
pub const DELIMITER: char = ',';

const QUOTE: char = '"';

/// Error type for splitting a CSV row.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsvError {
    #[error("Unterminated quoted field")]
    UnterminatedQuote,
    #[error("Unexpected character '{0}' after closing quote")]
    UnexpectedCharacter(char),
}

/// Escapes a single field value.
///
/// Returns the input unchanged when no quoting is needed.
pub fn escape_field(value: &str) -> Cow<'_, str> {
    let needs_quoting = value
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\n' || c == '\r');

    if !needs_quoting {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push(QUOTE);
    for c in value.chars() {
        if c == QUOTE {
            escaped.push(QUOTE);
        }
        escaped.push(c);
    }
    escaped.push(QUOTE);
    Cow::Owned(escaped)
}

/// Appends one escaped row, including the trailing newline, to `out`.
pub fn write_row<I, S>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        out.push_str(&escape_field(field.as_ref()));
    }
    out.push('\n');
}

/// Splits a single row (without its trailing newline) into field values,
/// undoing the escaping applied by [`escape_field`].
pub fn split_row(line: &str) -> Result<Vec<String>, CsvError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;
    let mut just_closed = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    current.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                    just_closed = true;
                }
            } else {
                current.push(c);
            }
            continue;
        }

        if c == DELIMITER {
            fields.push(std::mem::take(&mut current));
            just_closed = false;
        } else if just_closed {
            return Err(CsvError::UnexpectedCharacter(c));
        } else if c == QUOTE && current.is_empty() {
            in_quotes = true;
        } else {
            current.push(c);
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote);
    }

    fields.push(current);
    Ok(fields)
}
