/*!
Writes decoded records as tab-separated values.

A field is put in double quotes only if it contains a tab, a double quote,
or a line break, and double quotes inside it are doubled.
This is unlike the input, where quotes are escaped with backslashes.
*/

use std::io::Write;

use crate::error::Error;
use crate::fields::Record;

/// Writes statement labels and records to `W`.
///
/// Records are quoted into a buffer that is reused between calls, and each
/// call writes to `W` once. `W` is only flushed by [`flush`](Self::flush)
/// and [`into_inner`](Self::into_inner).
pub struct TsvWriter<W: Write> {
    out: W,
    builder: csv::WriterBuilder,
    buf: Vec<u8>,
}

impl<W: Write> TsvWriter<W> {
    pub fn new(writer: W) -> Self {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(b'\t')
            .quote(b'"')
            .double_quote(true)
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            // Statements for different tables have different numbers of fields.
            .flexible(true)
            .has_headers(false);
        Self {
            out: writer,
            builder,
            buf: Vec::new(),
        }
    }

    /// Writes `line` as it is, followed by a newline.
    pub fn write_line(&mut self, line: &[u8]) -> Result<(), Error> {
        self.buf.clear();
        self.buf.extend_from_slice(line);
        self.buf.push(b'\n');
        self.out.write_all(&self.buf)?;
        Ok(())
    }

    pub fn write_record(&mut self, record: &Record<'_>) -> Result<(), Error> {
        self.write_records(std::slice::from_ref(record))
    }

    pub fn write_records(&mut self, records: &[Record<'_>]) -> Result<(), Error> {
        self.buf.clear();
        let mut records = records.iter().peekable();
        while records.peek().is_some() {
            {
                let mut wtr = self.builder.from_writer(&mut self.buf);
                while let Some(record) = records.next_if(|r| !r.is_empty()) {
                    wtr.write_record(record.iter().map(|f| f.as_ref()))?;
                }
                wtr.flush()?;
            }
            // The csv writer would write `""` for a record with no fields,
            // which reads back as one empty field.
            while records.next_if(|r| r.is_empty()).is_some() {
                self.buf.push(b'\n');
            }
        }
        self.out.write_all(&self.buf)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.out.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> Result<W, Error> {
        self.out.flush()?;
        Ok(self.out)
    }
}
