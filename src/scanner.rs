/*!
Splits the value list of an `INSERT` statement into its tuples.

A tuple ends at the first closing parenthesis that is not inside a
single-quoted string. A single quote is escaped, and does not open or
close a string, if it is preceded by an odd number of backslashes.
*/

use bstr::ByteSlice;

use crate::error::{Error, Snippet};

/// Returns the offset of the closing parenthesis of the tuple that starts at
/// `start`, or `None` if it is unterminated.
///
/// A quote is escaped if the run of backslashes before it has odd length.
/// The run is counted while scanning, not by looking back from each quote.
pub(crate) fn tuple_end(values: &[u8], start: usize) -> Option<usize> {
    let mut inside_str = false;
    let mut backslashes = values
        .get(..=start)?
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count();
    for (idx, &b) in values.iter().enumerate().skip(start + 1) {
        match b {
            b'\\' => {
                backslashes += 1;
                continue;
            }
            b'\'' if backslashes % 2 == 0 => inside_str = !inside_str,
            b')' if !inside_str => return Some(idx),
            _ => {}
        }
        backslashes = 0;
    }
    None
}

/**
Finds the tuple that starts at `start`, which should point to an opening
parenthesis.

Returns the tuple including its parentheses, and the offset just after it.
`None` as `start` means that no tuple remains, and gives `Ok(None)`.

# Errors

Returns [`Error::MalformedTuple`] if there is no closing parenthesis outside
of a quoted string between `start` and the end of `values`.
*/
pub fn find_next_tuple(
    values: &[u8],
    start: Option<usize>,
) -> Result<Option<(&[u8], usize)>, Error> {
    let start = match start {
        Some(start) => start,
        None => return Ok(None),
    };
    match tuple_end(values, start) {
        Some(end) => Ok(Some((&values[start..=end], end + 1))),
        None => Err(Error::MalformedTuple {
            offset: start,
            tuple: Snippet::new(values.get(start..).unwrap_or_default()),
        }),
    }
}

/**
Iterator over the interiors of the tuples in a value list,
in the order they appear. Returned by [`Tuples::new`].

Each item is a tuple with its enclosing parentheses removed.
After an error the iterator yields nothing more.
*/
#[derive(Debug, Clone)]
pub struct Tuples<'a> {
    values: &'a [u8],
    next: Option<usize>,
}

impl<'a> Tuples<'a> {
    /// # Errors
    ///
    /// Returns [`Error::EmptyOrInvalidValueList`] if `values` does not start
    /// with `(`.
    pub fn new(values: &'a [u8]) -> Result<Self, Error> {
        if values.first() != Some(&b'(') {
            return Err(Error::EmptyOrInvalidValueList {
                values: Snippet::new(values),
            });
        }
        Ok(Self {
            values,
            next: Some(0),
        })
    }
}

impl<'a> Iterator for Tuples<'a> {
    type Item = Result<&'a [u8], Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match find_next_tuple(self.values, self.next.take()) {
            Ok(Some((tuple, end))) => {
                tracing::trace!(start = end - tuple.len(), end, "found tuple");
                // The next tuple starts at the first parenthesis after this one.
                self.next = self.values[end..].find_byte(b'(').map(|i| end + i);
                Some(Ok(&tuple[1..tuple.len() - 1]))
            }
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<'a> std::iter::FusedIterator for Tuples<'a> {}

/// Collects the interiors of all tuples in `values`, in order.
///
/// # Errors
///
/// Fails if `values` does not start with `(` or if any tuple is unterminated.
pub fn split_tuples(values: &[u8]) -> Result<Vec<&[u8]>, Error> {
    Tuples::new(values)?.collect()
}
