/*!
Recognizes `INSERT` lines and splits them into a label and a value list.
*/

use bstr::{ByteSlice, B};
use nom::{
    bytes::complete::{tag, take_until},
    character::complete::multispace0,
    combinator::recognize,
    error::ErrorKind,
    sequence::{terminated, tuple},
    IResult,
};

use crate::error::{Error, Snippet};

/// Returns `true` if `line` starts an `INSERT` statement.
pub fn is_insert(line: &[u8]) -> bool {
    line.starts_with(b"INSERT INTO")
}

/// One `INSERT INTO `table` VALUES (...),(...);` line.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Statement<'a> {
    /// From the start of the line through `VALUES`.
    pub label: &'a [u8],
    /// The tuples, without the final semicolon.
    pub values: &'a [u8],
}

fn statement_label(s: &[u8]) -> IResult<&[u8], &[u8], (&[u8], ErrorKind)> {
    terminated(
        recognize(tuple((
            tag(B("INSERT INTO `")),
            take_until(B("` VALUES")),
            tag(B("` VALUES")),
        ))),
        multispace0,
    )(s)
}

impl<'a> Statement<'a> {
    /// Parses a line that [`is_insert`].
    /// A trailing line break and semicolon are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnrecognizedStatementShape`] if the line does not
    /// start with ``INSERT INTO `table` VALUES``.
    pub fn parse(line: &'a [u8]) -> Result<Self, Error> {
        let line = line.trim_end_with(|c| c == '\n' || c == '\r');
        let (values, label) =
            statement_label(line).map_err(|_| Error::UnrecognizedStatementShape {
                line: Snippet::new(line),
            })?;
        let values = values.strip_suffix(b";").unwrap_or(values);
        Ok(Self { label, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_insert() {
        assert!(is_insert(b"INSERT INTO `t` VALUES (1);"));
        assert!(!is_insert(b"-- INSERT INTO `t` VALUES (1);"));
        assert!(!is_insert(b"CREATE TABLE `t` (id int);"));
        assert!(!is_insert(b""));
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            Statement::parse(B("INSERT INTO `page` VALUES (1,'a'),(2,'b');\n")).unwrap(),
            Statement {
                label: B("INSERT INTO `page` VALUES"),
                values: B("(1,'a'),(2,'b')"),
            }
        );
        assert_eq!(
            Statement::parse(B("INSERT INTO `page` VALUES (1)\r\n")).unwrap(),
            Statement {
                label: B("INSERT INTO `page` VALUES"),
                values: B("(1)"),
            }
        );
    }

    #[test]
    fn test_values_keyword_inside_string() {
        let statement =
            Statement::parse(B("INSERT INTO `t` VALUES (1,'` VALUES (2)');")).unwrap();
        assert_eq!(statement.label, B("INSERT INTO `t` VALUES"));
        assert_eq!(statement.values, B("(1,'` VALUES (2)')"));
    }

    #[test]
    fn test_unrecognized_shape() {
        for line in &[
            B("INSERT INTO t VALUES (1);"),
            B("INSERT INTO `t` (a, b) VALUES (1,2);"),
            B("INSERT INTO `t`"),
        ] {
            assert!(matches!(
                Statement::parse(line),
                Err(Error::UnrecognizedStatementShape { .. })
            ));
        }
    }

    #[test]
    fn test_empty_values() {
        let statement = Statement::parse(B("INSERT INTO `t` VALUES ;")).unwrap();
        assert_eq!(statement.values, B(""));
    }
}
