/*!
Defines the [`Error`] type returned while converting INSERT statements.
*/

use bstr::{BStr, BString, ByteSlice};
use thiserror::Error;

use std::fmt::Display;

use crate::scanner::tuple_end;

pub(crate) const INPUT_GRAPHEMES_TO_SHOW: usize = 100;

/// A snippet of the input that failed to parse, printed by the
/// [`Display`] implementation of [`Error`].
///
/// Shows a whole SQL tuple if the snippet starts with one,
/// otherwise up to a maximum number of graphemes.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snippet(pub BString);

impl Snippet {
    pub(crate) fn new(input: &[u8]) -> Self {
        Self(show_input(input.as_bstr()).to_owned())
    }
}

fn show_input(input: &BStr) -> &BStr {
    if input.is_empty() {
        return input;
    }
    // Try to get a whole SQL tuple.
    if input[0] == b'(' {
        if let Some(end) = tuple_end(input, 0) {
            let tuple = &input.as_bytes()[..=end];
            if tuple.graphemes().nth(INPUT_GRAPHEMES_TO_SHOW).is_none() {
                return tuple.as_bstr();
            }
        }
    }
    // Get up to a maximum number of characters.
    let (_, end, _) = input
        .grapheme_indices()
        .take(INPUT_GRAPHEMES_TO_SHOW)
        .last()
        .expect("we have checked that input is not empty");
    input[..end].as_bstr()
}

impl Display for Snippet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        if self.0.is_empty() {
            write!(f, "(empty)")?;
        }
        Ok(())
    }
}

/// The error type used throughout the crate.
///
/// Every parse error aborts the statement it occurred in;
/// none of them are recoverable.
#[derive(Debug, Error)]
pub enum Error {
    /// The tuple starting at `offset` has no closing parenthesis outside of a
    /// quoted string.
    #[error("malformed tuple at byte {offset}, no terminator found:\n\t{tuple}")]
    MalformedTuple { offset: usize, tuple: Snippet },
    #[error("expected a value list starting with “(” at\n\t{values}")]
    EmptyOrInvalidValueList { values: Snippet },
    /// `row` is the 0-based index of the tuple in the statement,
    /// `position` the byte offset inside the tuple's interior.
    #[error("expected {expected} at byte {position} of row {row}:\n\t{tuple}")]
    FieldDecode {
        row: usize,
        position: usize,
        expected: &'static str,
        tuple: Snippet,
    },
    #[error("expected “INSERT INTO `table` VALUES” at\n\t{line}")]
    UnrecognizedStatementShape { line: Snippet },
    #[error("on line {number}: {source}")]
    Line {
        number: usize,
        #[source]
        source: Box<Error>,
    },
    #[error("failed to read input")]
    Io(#[from] std::io::Error),
    #[error("failed to write output")]
    Output(#[from] csv::Error),
}

impl Error {
    pub(crate) fn at_line(self, number: usize) -> Self {
        Error::Line {
            number,
            source: Box::new(self),
        }
    }

    /// Returns `true` if the error was caused by the reader of the output
    /// going away, for instance `head` closing a pipe.
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            Error::Io(e) => e.kind() == std::io::ErrorKind::BrokenPipe,
            Error::Output(e) => match e.kind() {
                csv::ErrorKind::Io(e) => e.kind() == std::io::ErrorKind::BrokenPipe,
                _ => false,
            },
            Error::Line { source, .. } => source.is_broken_pipe(),
            _ => false,
        }
    }
}

#[test]
fn test_snippet_shows_whole_tuple() {
    assert_eq!(
        Snippet::new(br"(1,'a)b'),(2,'c')").to_string(),
        r"(1,'a)b')"
    );
    assert_eq!(Snippet::new(b"").to_string(), "(empty)");
    let long = "x".repeat(150);
    assert_eq!(Snippet::new(long.as_bytes()).0.len(), INPUT_GRAPHEMES_TO_SHOW);
}

#[test]
fn test_broken_pipe() {
    use std::io;
    let e = Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
    assert!(e.is_broken_pipe());
    assert!(e.at_line(3).is_broken_pipe());
    let e = Error::from(io::Error::new(io::ErrorKind::Other, "disk full"));
    assert!(!e.is_broken_pipe());
}
