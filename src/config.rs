//! Run configuration shared by the runner and the reporter.

use termcolor::ColorChoice;

/// The manifest file extension looked for during directory discovery.
pub const DEFAULT_MANIFEST_SUFFIX: &str = "test";

/// Configuration for test execution and reporting.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Print expected and actual values for passing cases too.
    pub verbose: bool,
    /// Color policy for the report.
    pub color: ColorChoice,
    /// Extension (without the dot) that marks a manifest file.
    pub manifest_suffix: String,
    /// Case-insensitive substring a case name must contain to run.
    pub filter: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            color: detect_color(),
            manifest_suffix: DEFAULT_MANIFEST_SUFFIX.to_string(),
            filter: None,
        }
    }
}

impl RunConfig {
    /// Returns the reason a case named `name` is filtered out, if it is.
    pub fn filter_reason(&self, name: &str) -> Option<String> {
        let filter = self.filter.as_deref()?;
        if name.to_lowercase().contains(&filter.to_lowercase()) {
            None
        } else {
            Some(format!("Filtered out by substring: {filter}"))
        }
    }
}

/// Colors only when stdout is a terminal.
pub fn detect_color() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
