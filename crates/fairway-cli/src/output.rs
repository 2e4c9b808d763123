//! Output formatting and writing utilities
//!
//! Tool results are written to stdout in the selected format. Status
//! messages only appear in human mode so that machine formats stay parseable.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use fairway_core::{HealthReport, HealthStatus, ResponseBody};
use serde::Serialize;
use std::io::{self, Write};
use tracing::trace;

/// Formatting of serializable values per output format
pub trait OutputFormatter {
    fn format<T: Serialize>(&self, value: &T, pretty: bool) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T, pretty: bool) -> Result<String> {
        match self {
            OutputFormat::Json if !pretty => Ok(serde_json::to_string(value)?),
            OutputFormat::Json | OutputFormat::JsonPretty | OutputFormat::Human => {
                Ok(serde_json::to_string_pretty(value)?)
            }
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T, pretty: bool) -> Result<()> {
        if tracing::enabled!(tracing::Level::TRACE) {
            let mut logged = serde_json::to_value(value)?;
            redaction::redact_json_value(&mut logged);
            trace!(data = %logged, "Writing output");
        }

        let formatted = self.format.format(value, pretty)?;
        if formatted.ends_with('\n') {
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write a successful tool body. Text bodies (HTML, XML) are written verbatim.
    pub fn response_body(&mut self, body: &ResponseBody, pretty: bool) -> Result<()> {
        match body {
            ResponseBody::Json(value) => self.data(value, pretty),
            ResponseBody::Text(text) => self.writeln(text),
        }
    }

    /// Write a health report
    pub fn health_report(&mut self, report: &HealthReport) -> Result<()> {
        if !self.is_human() {
            return self.data(report, false);
        }

        let status = match report.status {
            HealthStatus::Ok => "ok",
            HealthStatus::AuthError => "auth_error",
            HealthStatus::Error => "error",
        };
        let status = match (self.use_color, report.status) {
            (false, _) => status.to_string(),
            (true, HealthStatus::Ok) => status.green().bold().to_string(),
            (true, HealthStatus::AuthError) => status.yellow().bold().to_string(),
            (true, HealthStatus::Error) => status.red().bold().to_string(),
        };
        let authenticated = match report.authenticated {
            Some(true) => "yes",
            Some(false) => "no",
            None => "unknown",
        };

        self.writeln(&format!("Status:        {}", status))?;
        self.writeln(&format!("Reachable:     {}", if report.reachable { "yes" } else { "no" }))?;
        self.writeln(&format!("Authenticated: {}", authenticated))?;
        self.writeln(&format!("Version:       {}", report.version))?;
        self.writeln(&format!("Message:       {}", report.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Captured(Rc<RefCell<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    fn writer(format: OutputFormat) -> (OutputWriter, Captured) {
        let captured = Captured::default();
        let writer = OutputWriter::with_writer(format, false, false, Box::new(captured.clone()));
        (writer, captured)
    }

    #[test]
    fn test_json_compact_and_pretty() {
        let value = json!({"events": [{"event": {"id": "12300956988786918579"}}]});

        let (mut compact, captured) = writer(OutputFormat::Json);
        compact.data(&value, false).unwrap();
        assert_eq!(
            captured.text(),
            "{\"events\":[{\"event\":{\"id\":\"12300956988786918579\"}}]}\n"
        );

        let (mut pretty, captured) = writer(OutputFormat::Json);
        pretty.data(&value, true).unwrap();
        assert!(captured.text().contains("\n  \"events\""));
    }

    #[test]
    fn test_text_body_is_verbatim() {
        let (mut out, captured) = writer(OutputFormat::Json);
        out.response_body(&ResponseBody::Text("<table></table>".to_string()), true)
            .unwrap();
        assert_eq!(captured.text(), "<table></table>\n");
    }

    #[test]
    fn test_status_messages_only_in_human_mode() {
        let (mut machine, captured) = writer(OutputFormat::Json);
        machine.info("hello").unwrap();
        machine.success("done").unwrap();
        assert!(captured.text().is_empty());

        let (mut human, captured) = writer(OutputFormat::Human);
        human.info("hello").unwrap();
        assert_eq!(captured.text(), "INFO: hello\n");
    }

    #[test]
    fn test_health_report_human() {
        let report = HealthReport {
            status: HealthStatus::AuthError,
            reachable: true,
            authenticated: Some(false),
            version: "0.1.0".to_string(),
            message: "Invalid or expired API key.".to_string(),
        };
        let (mut out, captured) = writer(OutputFormat::Human);
        out.health_report(&report).unwrap();

        let text = captured.text();
        assert!(text.contains("Status:        auth_error"));
        assert!(text.contains("Authenticated: no"));
    }

    #[test]
    fn test_yaml_output() {
        let (mut out, captured) = writer(OutputFormat::Yaml);
        out.data(&json!({"name": "Spring Open"}), false).unwrap();
        assert_eq!(captured.text(), "name: Spring Open\n");
    }
}
