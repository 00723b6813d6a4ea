//! Terminal output for CLI commands.
//!
//! Status lines are styled and written to stderr. Command results (JSON,
//! route lists) are written plain to stdout so they can be piped.

use std::fmt::Display;

use console::{Style, Term};

pub(crate) struct Output {
    status: Term,
    results: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            results: Term::stdout(),
        }
    }

    fn status_line(&self, style: &Style, msg: impl Display) {
        let _ = self.status.write_line(&style.apply_to(msg).to_string());
    }

    pub(crate) fn info(&self, msg: &str) {
        self.status_line(&Style::new(), msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.status_line(&Style::new().green(), msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.status_line(&Style::new().yellow(), msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.status_line(&Style::new().red(), msg);
    }

    /// Headline such as the server address or a redirect target.
    pub(crate) fn highlight(&self, msg: &str) {
        self.status_line(&Style::new().cyan().bold(), msg);
    }

    /// One result line on stdout.
    pub(crate) fn data(&self, line: &str) {
        let _ = self.results.write_line(line);
    }

    /// A result value on stdout as pretty JSON.
    pub(crate) fn json(&self, value: &impl serde::Serialize) -> Result<(), serde_json::Error> {
        self.data(&serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
