//! Table and JSON printing

use crate::error::Result;
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Stdout, Write};
use tabled::builder::Builder;
use tabled::settings::Style;

/// Output format of listing commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Render rows as a borderless table
///
/// Rows shorter than `headers` are padded with empty cells.
pub fn render_table(headers: &[&str], rows: &[Vec<String>], no_headers: bool) -> String {
    let width = headers.len();
    let mut builder = Builder::default();
    if !no_headers {
        builder.push_record(headers.iter().map(|h| (*h).to_string()));
    }
    for row in rows {
        let mut cells = row.clone();
        if cells.len() < width {
            cells.resize(width, String::new());
        }
        builder.push_record(cells);
    }

    let mut table = builder.build();
    table.with(Style::blank());
    table.to_string()
}

/// Writes command output in the selected format
pub struct Printer<W: Write> {
    format: OutputFormat,
    no_headers: bool,
    out: W,
    /// JSON items of a paged listing, held until `finish`
    pending: Vec<serde_json::Value>,
}

impl Printer<Stdout> {
    /// Printer writing to standard output
    pub fn stdout(format: OutputFormat, no_headers: bool) -> Self {
        Self::new(format, no_headers, io::stdout())
    }
}

impl<W: Write> Printer<W> {
    /// Create a printer over any writer
    pub fn new(format: OutputFormat, no_headers: bool, out: W) -> Self {
        Self {
            format,
            no_headers,
            out,
            pending: Vec::new(),
        }
    }

    /// Check if JSON output was requested
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print one batch of rows
    ///
    /// In JSON mode `items` is printed instead of the table.
    pub fn rows<T: Serialize + ?Sized>(
        &mut self,
        items: &T,
        headers: &[&str],
        rows: &[Vec<String>],
    ) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(items),
            OutputFormat::Table => self.table(headers, rows),
        }
    }

    /// Print one page of a paged listing
    ///
    /// Tables are written per page. In JSON mode the items are buffered and
    /// written by [`Printer::finish`] as a single array.
    pub fn page<T: Serialize>(
        &mut self,
        items: &[T],
        headers: &[&str],
        rows: &[Vec<String>],
    ) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                for item in items {
                    self.pending.push(serde_json::to_value(item)?);
                }
                Ok(())
            }
            OutputFormat::Table => self.table(headers, rows),
        }
    }

    /// Complete a paged listing, writing the buffered JSON array
    pub fn finish(&mut self) -> Result<()> {
        if !self.is_json() {
            return Ok(());
        }
        let items = std::mem::take(&mut self.pending);
        self.json(&items)
    }

    fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
        let table = render_table(headers, rows, self.no_headers);
        if !table.is_empty() {
            writeln!(self.out, "{table}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Print a value as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value)?;
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Print a plain line
    pub fn line(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.out, "{message}")?;
        Ok(())
    }

    /// Print a success message
    pub fn success(&mut self, message: impl Display) -> Result<()> {
        self.line(format_args!("✔ {message}"))
    }

    /// Consume the printer and return its writer
    pub fn into_inner(self) -> W {
        self.out
    }
}
