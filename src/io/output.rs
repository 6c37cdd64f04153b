use crate::cli::ReportFormat;
use crate::commands::rewrite::{FileReport, RunReport};
use crate::errors::{Diagnostic, Severity};
use colored::*;
use std::io::Write;

pub trait ReportWriter {
    fn write_report(&mut self, report: &RunReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &RunReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }
}

pub struct TextWriter<W: Write> {
    writer: W,
}

impl<W: Write> TextWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_file(&mut self, file: &FileReport) -> anyhow::Result<()> {
        let status = if file.is_failure() {
            "failed".red().bold()
        } else if file.changed {
            "rewritten".green()
        } else {
            "unchanged".dimmed()
        };
        writeln!(self.writer, "{:>10} {}", status, file.path.display())?;

        if let Some(error) = &file.error {
            writeln!(self.writer, "           {}", error.red())?;
        }
        for diagnostic in &file.diagnostics {
            self.write_diagnostic(diagnostic)?;
        }
        Ok(())
    }

    fn write_diagnostic(&mut self, diagnostic: &Diagnostic) -> anyhow::Result<()> {
        let code = format!("[{}]", diagnostic.code);
        let code = match diagnostic.severity {
            Severity::Skipped => code.yellow(),
            Severity::Fatal => code.red(),
        };
        writeln!(
            self.writer,
            "           {} {} at {}: {}",
            code, diagnostic.class_name, diagnostic.location, diagnostic.message
        )?;
        Ok(())
    }
}

impl<W: Write> ReportWriter for TextWriter<W> {
    fn write_report(&mut self, report: &RunReport) -> anyhow::Result<()> {
        // untouched files without findings only add noise
        for file in report
            .files
            .iter()
            .filter(|f| f.changed || f.error.is_some() || !f.diagnostics.is_empty())
        {
            self.write_file(file)?;
        }

        let summary = format!(
            "{} files, {} rewritten, {} diagnostics, {} failed",
            report.files.len(),
            report.changed_count(),
            report.diagnostic_count(),
            report.failure_count()
        );
        if report.is_success() {
            writeln!(self.writer, "{}", summary.bold())?;
        } else {
            writeln!(self.writer, "{}", summary.red().bold())?;
        }
        Ok(())
    }
}

pub fn create_writer(format: ReportFormat) -> Box<dyn ReportWriter> {
    match format {
        ReportFormat::Text => Box::new(TextWriter::new(std::io::stdout())),
        ReportFormat::Json => Box::new(JsonWriter::new(std::io::stdout())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NodePath, Step};
    use crate::errors::RewriteError;
    use std::path::PathBuf;

    fn report() -> RunReport {
        let diagnostic = Diagnostic::new(
            "ListTest",
            NodePath::root().child(Step::Type(0)).child(Step::Member(3)),
            &RewriteError::UnresolvedBinding("context.assertIsSatisfied()".into()),
        );
        RunReport {
            files: vec![
                FileReport {
                    path: PathBuf::from("trees/ListTest.json"),
                    changed: true,
                    written: None,
                    diagnostics: vec![diagnostic],
                    error: None,
                },
                FileReport {
                    path: PathBuf::from("trees/Plain.json"),
                    changed: false,
                    written: None,
                    diagnostics: vec![],
                    error: None,
                },
            ],
        }
    }

    #[test]
    fn test_text_report_lists_findings() {
        let mut buffer = Vec::new();
        TextWriter::new(&mut buffer).write_report(&report()).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("trees/ListTest.json"));
        assert!(text.contains("unresolved-binding"));
        assert!(!text.contains("Plain.json"));
        assert!(text.contains("2 files, 1 rewritten, 1 diagnostics, 0 failed"));
    }

    #[test]
    fn test_json_report_shape() {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer).write_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["files"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["files"][0]["diagnostics"][0]["severity"], "skipped");
        assert!(value["files"][1].get("error").is_none());
    }
}
