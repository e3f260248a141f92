use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;
use tokio::fs;

use crate::core::{ColumnLayout, CompositeRow, Result};

/// Finished recording: header plus rows, tab-separated on output
///
/// Elapsed time is written with 2 decimals, channel values with 3.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingLog {
    layout: ColumnLayout,
    rows: Vec<CompositeRow>,
}

impl RecordingLog {
    pub fn new(layout: ColumnLayout, rows: Vec<CompositeRow>) -> Self {
        Self { layout, rows }
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn header(&self) -> Vec<&'static str> {
        self.layout.header()
    }

    pub fn rows(&self) -> &[CompositeRow] {
        &self.rows
    }

    pub fn to_tsv(&self) -> String {
        let mut out = String::with_capacity(64 * (self.rows.len() + 1));
        out.push_str(&self.header().join("\t"));
        out.push('\n');

        for row in &self.rows {
            // Writing into a String cannot fail
            let _ = write!(out, "{:.2}", row.elapsed_ms);
            for value in &row.values {
                let _ = write!(out, "\t{:.3}", value);
            }
            out.push('\n');
        }
        out
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.to_tsv().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_tsv()).await?;
        log::info!("Wrote {} rows to {:?}", self.rows.len(), path);
        Ok(())
    }
}
