//! Output formatting abstraction for text vs JSON rendering
//!
//! All subcommand output flows through [`OutputWriter`] to stdout.
//! Logs go to stderr, so stdout carries only status lines or JSON.
//!
//! Long-running stages print text as they go with [`OutputWriter::stream`]
//! and close with [`OutputWriter::finish`], which only writes the JSON document.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Writes CLI payloads in the selected format.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a payload to stdout.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.render_to(payload, &mut handle)
    }

    /// Render a payload to an arbitrary writer.
    pub fn render_to<T: Render + Serialize>(
        &self,
        payload: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => payload.render_text(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }

    /// Write a progress item to stdout as soon as it is known. Text mode only.
    pub fn stream<T: Render>(&self, item: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.stream_to(item, &mut handle)
    }

    pub fn stream_to<T: Render>(&self, item: &T, w: &mut dyn Write) -> Result<(), CliError> {
        if self.format == OutputFormat::Text {
            item.render_text(w)?;
            w.flush()?;
        }
        Ok(())
    }

    /// Render the final payload of a streamed command. JSON mode only.
    pub fn finish<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.finish_to(payload, &mut handle)
    }

    pub fn finish_to<T: Render + Serialize>(
        &self,
        payload: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => Ok(()),
            OutputFormat::Json => self.render_to(payload, w),
        }
    }
}

/// Human-readable text rendering.
///
/// Implemented by every CLI output payload alongside `serde::Serialize`.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}
