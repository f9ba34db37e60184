// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for provisioning operations
//!
//! Every core operation reports failure as a [`FailedOperation`]: an ordered,
//! non-empty list of [`Problem`]s. Aggregating paths (principal resolution,
//! ACL updates) append problems instead of replacing them.
//!
//! Bootstrap concerns (HTTP client construction, configuration) use
//! [`ProvisionerError`] instead.

use std::fmt;
use thiserror::Error;

/// A single problem encountered while provisioning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// Human readable description, surfaced verbatim to the caller
    pub description: String,

    /// Rendered underlying error, if any
    pub cause: Option<String>,
}

impl Problem {
    /// Create a problem without an underlying cause
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            cause: None,
        }
    }

    /// Create a problem wrapping the error that caused it
    pub fn with_cause(description: impl Into<String>, cause: &dyn std::error::Error) -> Self {
        Self {
            description: description.into(),
            cause: Some(cause.to_string()),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

/// A failed operation carrying every problem that caused it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.problems))]
pub struct FailedOperation {
    problems: Vec<Problem>,
}

fn render(problems: &[Problem]) -> String {
    problems
        .iter()
        .map(|p| p.description.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl FailedOperation {
    /// Build a failed operation from a list of problems
    ///
    /// An empty list is replaced by a generic problem so the invariant
    /// "never empty" holds.
    pub fn new(problems: Vec<Problem>) -> Self {
        if problems.is_empty() {
            return Self::single(Problem::new("Unknown failure"));
        }
        Self { problems }
    }

    /// Failed operation with exactly one problem
    pub fn single(problem: Problem) -> Self {
        Self {
            problems: vec![problem],
        }
    }

    /// Shorthand for a single problem without cause
    pub fn message(description: impl Into<String>) -> Self {
        Self::single(Problem::new(description))
    }

    /// The problems, in the order they were recorded
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Consume into the list of problems
    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }

    /// Descriptions only, in order
    pub fn descriptions(&self) -> Vec<String> {
        self.problems.iter().map(|p| p.description.clone()).collect()
    }

    /// Append the problems of `other` after the ones already recorded
    pub fn merge(mut self, other: FailedOperation) -> Self {
        self.problems.extend(other.problems);
        self
    }
}

impl From<Problem> for FailedOperation {
    fn from(problem: Problem) -> Self {
        Self::single(problem)
    }
}

/// Result type for provisioning operations
pub type ProvisionResult<T> = Result<T, FailedOperation>;

/// Errors raised while wiring the provisioner together
#[derive(Debug, Error)]
pub enum ProvisionerError {
    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Directory data could not be loaded
    #[error("Directory error: {0}")]
    Directory(String),
}

/// Result type for bootstrap operations
pub type ProvisionerResult<T> = Result<T, ProvisionerError>;

impl From<reqwest::Error> for ProvisionerError {
    fn from(err: reqwest::Error) -> Self {
        ProvisionerError::HttpClient(err.to_string())
    }
}

impl From<serde_yaml::Error> for ProvisionerError {
    fn from(err: serde_yaml::Error) -> Self {
        ProvisionerError::Directory(err.to_string())
    }
}
