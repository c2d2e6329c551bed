/*!
Converts the `INSERT` statements of a MySQL dump into tab-separated values.

Each line of the form ``INSERT INTO `table` VALUES (...),(...);`` is written as
the line up to `VALUES`, followed by one record per tuple. String fields are
unescaped, and a field is quoted in the output only if it contains a tab, a
double quote, or a line break. Other lines are skipped.

```
# fn main() -> Result<(), mysqldump_to_tsv::Error> {
let dump = b"-- comment\nINSERT INTO `t` VALUES (1,'a'),(2,'b\\'s'),(3,NULL);\n";
let mut output = Vec::new();
mysqldump_to_tsv::convert(&dump[..], &mut output)?;
assert_eq!(output, b"INSERT INTO `t` VALUES\n1\ta\n2\tb's\n3\tNULL\n");
# Ok(())
# }
```
*/

#![cfg_attr(docsrs, feature(doc_cfg))]

use bstr::ByteSlice;
use std::io::{BufRead, Write};

pub mod error;
pub mod fields;
pub mod output;
pub mod scanner;
pub mod statement;

#[cfg(feature = "utils")]
#[cfg_attr(docsrs, doc(cfg(feature = "utils")))]
pub mod utils;

pub use error::Error;
pub use fields::{decode_tuple, reencode, Record};
pub use output::TsvWriter;
pub use scanner::{find_next_tuple, split_tuples, Tuples};
pub use statement::{is_insert, Statement};

/// Counts of what a [`Converter`] has written.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Stats {
    pub statements: usize,
    pub rows: usize,
}

/// Converts lines one at a time, writing to `W`.
pub struct Converter<W: Write> {
    output: TsvWriter<W>,
    stats: Stats,
}

impl<W: Write> Converter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            output: TsvWriter::new(writer),
            stats: Stats::default(),
        }
    }

    /**
    Converts one line of a dump.

    Returns `Ok(None)` if the line is not an `INSERT` statement,
    otherwise the number of rows written.
    Every tuple is decoded before anything is written,
    so nothing is written for a statement that fails to parse.
    */
    pub fn convert_line(&mut self, line: &[u8]) -> Result<Option<usize>, Error> {
        if !is_insert(line) {
            return Ok(None);
        }
        let statement = Statement::parse(line)?;
        let tuples = split_tuples(statement.values)?;
        let records = reencode(tuples)?;
        self.output.write_line(statement.label)?;
        self.output.write_records(&records)?;
        tracing::debug!(
            label = %statement.label.as_bstr(),
            rows = records.len(),
            "converted statement"
        );
        self.stats.statements += 1;
        self.stats.rows += records.len();
        Ok(Some(records.len()))
    }

    /// Converts every line of `reader`.
    ///
    /// # Errors
    ///
    /// Stops at the first line that fails to convert, returning an
    /// [`Error::Line`] with its 1-based line number.
    /// Statements before it have already been written, but not flushed.
    pub fn convert_reader<R: BufRead>(&mut self, mut reader: R) -> Result<(), Error> {
        let mut line = Vec::new();
        let mut number = 0;
        loop {
            line.clear();
            if reader
                .read_until(b'\n', &mut line)
                .map_err(|e| Error::from(e).at_line(number + 1))?
                == 0
            {
                return Ok(());
            }
            number += 1;
            self.convert_line(&line).map_err(|e| e.at_line(number))?;
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.output.flush()
    }

    /// Flushes and returns the writer.
    pub fn into_inner(self) -> Result<W, Error> {
        self.output.into_inner()
    }
}

/// Converts every line of `reader`, writing to `writer`.
///
/// # Errors
///
/// Stops at the first line that fails to convert, returning an
/// [`Error::Line`] with its 1-based line number.
/// Statements before it have already been written and flushed.
pub fn convert<R: BufRead, W: Write>(reader: R, writer: W) -> Result<Stats, Error> {
    let mut converter = Converter::new(writer);
    let result = converter.convert_reader(reader);
    converter.flush()?;
    result.map(|()| converter.stats())
}
