//! Error types for holiday-engine operations.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A rule identifier with no registered computation. `region` is filled in
    /// once the failure is attributed to the region rule that referenced it.
    #[error("Unknown rule `{rule}`{}", scope(.region))]
    UnknownRule {
        rule: String,
        region: Option<String>,
    },

    #[error("Holiday provider unavailable for {region}: {reason}")]
    ProviderUnavailable { region: String, reason: String },

    #[error("Audit export to {} failed: {source}", .path.display())]
    AuditWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The rule source does not have the expected structure. Fatal for the run.
    #[error("Malformed rule set: {0}")]
    MalformedRuleSet(String),

    #[error("Custom events file {}: {reason}", .path.display())]
    CustomEvents { path: PathBuf, reason: String },

    #[error("Invalid region code: {0}")]
    InvalidRegion(String),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRecurrence(String),

    #[error("Year {0} is outside the supported calendar range")]
    InvalidYear(i32),

    #[error("Invalid settings: {0}")]
    Settings(String),
}

impl EngineError {
    /// True for misconfiguration that strict callers should escalate.
    pub fn is_unknown_rule(&self) -> bool {
        matches!(self, EngineError::UnknownRule { .. })
    }

    /// Attribute an unknown-rule failure to the region that referenced the rule.
    pub fn in_region(self, code: &str) -> Self {
        match self {
            EngineError::UnknownRule { rule, .. } => EngineError::UnknownRule {
                rule,
                region: Some(code.to_string()),
            },
            other => other,
        }
    }
}

fn scope(region: &Option<String>) -> String {
    match region {
        Some(code) => format!(" referenced by region {code}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
