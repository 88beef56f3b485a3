//! Output formatting for profile and count tables.
//!
//! Uses itoa for integer formatting to avoid allocation in the hot path.

use crate::accumulator::FragmentCounts;
use crate::error::Result;
use crate::join::SignalRow;
use std::io::{BufWriter, Write};

/// Buffer size for writers (2MB default).
const DEFAULT_BUFFER_SIZE: usize = 2 * 1024 * 1024;

/// Column names of the profile table, in order.
pub const PROFILE_COLUMNS: [&str; 12] = [
    "sample",
    "chromosome",
    "position",
    "frag_depth_all",
    "frag_suscp_all",
    "frag_depth_nodup",
    "frag_suscp_nodup",
    "protection_score_plus",
    "protection_score_minus",
    "protection_score_plus_nodup",
    "protection_score_minus_nodup",
    "region_id",
];

/// Column names of the QC count table, in order.
pub const COUNT_COLUMNS: [&str; 6] = [
    "sample",
    "chromosome",
    "allfrag",
    "allfrag-crit",
    "nodup",
    "nodup-crit",
];

/// Write a CSV text field, quoting it when it holds a separator, quote or newline.
fn write_csv_field<W: Write>(writer: &mut W, field: &str) -> std::io::Result<()> {
    if field.bytes().any(|b| matches!(b, b',' | b'"' | b'\n' | b'\r')) {
        writer.write_all(b"\"")?;
        writer.write_all(field.replace('"', "\"\"").as_bytes())?;
        writer.write_all(b"\"")
    } else {
        writer.write_all(field.as_bytes())
    }
}

/// CSV writer for per-position profile rows of one sample.
pub struct ProfileWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    sample: String,
    rows_written: u64,
}

impl<W: Write> ProfileWriter<W> {
    /// Create a writer with the default buffer size.
    pub fn new(output: W, sample: impl Into<String>) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, output, sample)
    }

    /// Create a writer with a specified buffer size.
    pub fn with_capacity(capacity: usize, output: W, sample: impl Into<String>) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            sample: sample.into(),
            rows_written: 0,
        }
    }

    /// Write the header line.
    pub fn write_header(&mut self) -> Result<()> {
        self.writer.write_all(PROFILE_COLUMNS.join(",").as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write one profile row.
    #[inline]
    pub fn write_row(&mut self, row: &SignalRow<'_>) -> Result<()> {
        write_csv_field(&mut self.writer, &self.sample)?;
        self.writer.write_all(b",")?;
        write_csv_field(&mut self.writer, row.chromosome)?;
        self.writer.write_all(b",")?;
        self.writer
            .write_all(self.itoa_buf.format(row.position).as_bytes())?;
        for value in row.values.as_array() {
            self.writer.write_all(b",")?;
            self.writer.write_all(self.itoa_buf.format(value).as_bytes())?;
        }
        self.writer.write_all(b",")?;
        write_csv_field(&mut self.writer, row.region_id)?;
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    /// Write already formatted rows as-is.
    pub fn write_bytes(&mut self, bytes: &[u8], rows: u64) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.rows_written += rows;
        Ok(())
    }

    /// Number of rows written so far (header excluded).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }
}

/// Tab-separated writer for per-chromosome fragment counts.
pub struct CountsWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
}

impl<W: Write> CountsWriter<W> {
    pub fn new(output: W) -> Self {
        Self {
            writer: BufWriter::new(output),
            itoa_buf: itoa::Buffer::new(),
        }
    }

    /// Write the header line.
    pub fn write_header(&mut self) -> Result<()> {
        self.writer.write_all(COUNT_COLUMNS.join("\t").as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write the counts of one chromosome.
    pub fn write_counts(
        &mut self,
        sample: &str,
        chromosome: &str,
        counts: &FragmentCounts,
    ) -> Result<()> {
        self.writer.write_all(sample.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(chromosome.as_bytes())?;
        for value in [
            counts.allfrag,
            counts.allfrag_crit,
            counts.nodup,
            counts.nodup_crit,
        ] {
            self.writer.write_all(b"\t")?;
            self.writer.write_all(self.itoa_buf.format(value).as_bytes())?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
