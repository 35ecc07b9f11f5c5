//! The run report: an append-only log accumulated across a whole batch and
//! persisted once at the end.

/// Width of the rule drawn above and below section banners.
const RULE_WIDTH: usize = 50;

/// Ordered log lines for one pipeline run.
///
/// Every line is mirrored to `tracing` as it is appended, so operators see
/// progress live while the report itself is only persisted after the last
/// record.
#[derive(Debug, Default)]
pub struct ReportLog {
    lines: Vec<String>,
}

impl ReportLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line to the report.
    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.lines.push(message);
    }

    /// Append a section banner: the title between two rules of `marker`
    /// characters.
    pub fn section(&mut self, title: &str, marker: char) {
        let rule = marker.to_string().repeat(RULE_WIDTH);
        self.log(format!("\n{rule}\n{title}\n{rule}\n"));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Assemble the final multi-line report message.
    pub fn into_message(self) -> String {
        self.lines.join("\n")
    }
}
