//! Output formatting for validation reports.
//!
//! Three formats are supported:
//!
//! | Format | Module | Use case |
//! |--------|--------|----------|
//! | [`Text`](OutputFormat::Text)   | [`text`]  | Terminal / CI logs |
//! | [`Json`](OutputFormat::Json)   | [`json`]  | Automation / scripting |
//! | [`Sarif`](OutputFormat::Sarif) | [`sarif`] | Code-scanning integration |
//!
//! Use [`format_report`] to render a [`ValidationReport`] in any of the above
//! formats. Text output is split across two streams (warnings and the
//! success line on stdout, errors on stderr); the document formats write
//! everything to stdout.

pub mod json;
pub mod sarif;
pub mod text;

use crate::diagnostic::ValidationReport;

/// Supported output formats for validation reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `warn:` / `error:` lines, the format CI logs expect.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
    /// [SARIF 2.1.0](https://sarifweb.azurewebsites.net/) for code-scanning tools.
    Sarif,
}

/// A rendered report, split by destination stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub stdout: String,
    pub stderr: String,
}

/// Formats a [`ValidationReport`] in the requested [`OutputFormat`].
///
/// `color` only affects [`OutputFormat::Text`].
///
/// # Examples
///
/// ```rust,no_run
/// use bagakit_skill_maker::output::{format_report, OutputFormat};
/// # use bagakit_skill_maker::diagnostic::ValidationReport;
/// # fn example(report: &ValidationReport) -> serde_json::Result<()> {
/// let rendered = format_report(report, OutputFormat::Json, false)?;
/// println!("{}", rendered.stdout);
/// # Ok(())
/// # }
/// ```
pub fn format_report(
    report: &ValidationReport,
    format: OutputFormat,
    color: bool,
) -> serde_json::Result<Rendered> {
    match format {
        OutputFormat::Text => Ok(text::format(report, color)),
        OutputFormat::Json => Ok(Rendered {
            stdout: json::format(report)?,
            stderr: String::new(),
        }),
        OutputFormat::Sarif => Ok(Rendered {
            stdout: sarif::format(report)?,
            stderr: String::new(),
        }),
    }
}
