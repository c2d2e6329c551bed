/*!
Decodes the fields of a tuple interior.

Fields are separated by commas. A field that starts with a single quote is a
string: the quotes are removed, and a backslash makes the byte after it
literal, so `\'` is a quote and `\\` a backslash. There are no other escape
sequences: `\n` is just `n`. Doubled quotes are not an escape.
Any other field, like a number or `NULL`, is kept as it is.
*/

use bstr::B;
use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, take, take_while},
    character::complete::char,
    combinator::{all_consuming, cut, map, opt},
    error::{context, VerboseError, VerboseErrorKind},
    multi::separated_list1,
    sequence::{preceded, terminated},
    Offset,
};

use std::borrow::Cow;

use crate::error::{Error, Snippet};

/// The decoded fields of one tuple.
pub type Record<'a> = Vec<Cow<'a, [u8]>>;

type IResult<'a, T> = nom::IResult<&'a [u8], T, VerboseError<&'a [u8]>>;

fn quoted(s: &[u8]) -> IResult<'_, Cow<'_, [u8]>> {
    context(
        "quoted string",
        preceded(
            char('\''),
            cut(terminated(
                map(
                    opt(escaped_transform(is_not(B("\\'")), '\\', take(1usize))),
                    |opt| Cow::Owned(opt.unwrap_or_else(Vec::new)),
                ),
                context("closing quote", char('\'')),
            )),
        ),
    )(s)
}

fn unquoted(s: &[u8]) -> IResult<'_, Cow<'_, [u8]>> {
    map(take_while(|b| b != b','), Cow::Borrowed)(s)
}

fn record(s: &[u8]) -> IResult<'_, Record<'_>> {
    all_consuming(separated_list1(
        char(','),
        alt((quoted, unquoted)),
    ))(s)
}

/// Decodes the fields of a tuple with its parentheses removed.
/// An empty interior has no fields.
///
/// `row` is only used in the error.
///
/// # Errors
///
/// Returns [`Error::FieldDecode`] for an unterminated string or for
/// anything other than a comma after a closing quote.
pub fn decode_tuple(interior: &[u8], row: usize) -> Result<Record<'_>, Error> {
    if interior.is_empty() {
        return Ok(Vec::new());
    }
    match record(interior) {
        Ok((_, fields)) => Ok(fields),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let (input, expected) = e
                .errors
                .iter()
                .find_map(|(input, kind)| match kind {
                    VerboseErrorKind::Context(label) => Some((*input, *label)),
                    _ => None,
                })
                .unwrap_or_else(|| {
                    let input = e.errors.first().map_or(interior, |(input, _)| *input);
                    (input, "“,” or end of row")
                });
            Err(Error::FieldDecode {
                row,
                position: interior.offset(input),
                expected,
                tuple: Snippet::new(interior),
            })
        }
        Err(nom::Err::Incomplete(_)) => unreachable!("complete parsers never return Incomplete"),
    }
}

/// Decodes every tuple of a statement, in order.
///
/// # Errors
///
/// Stops at the first tuple that fails to decode.
pub fn reencode<'a, I>(tuples: I) -> Result<Vec<Record<'a>>, Error>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    tuples
        .into_iter()
        .enumerate()
        .map(|(row, tuple)| decode_tuple(tuple, row))
        .collect()
}
