//! Error types for the resolution engine
//!
//! Failures split into two channels: resolution errors, which the engine
//! owns and formats into a trace report, and target errors raised inside
//! the embedder's own routines, which pass through untouched.

use thiserror::Error;

use crate::trace::Trace;

/// A failure in matching tokens against the component graph.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// A named member is absent on the current component
    #[error("cannot find member `{name}` on {component}")]
    MemberNotFound { name: String, component: String },

    /// A callable was invoked without a value for a required parameter
    #[error("`{routine}` is missing a value for required argument `{name}`")]
    MissingRequired { routine: String, name: String },

    /// A flag matches more than one remaining parameter
    #[error("flag `{flag}` is ambiguous: could be {}", .candidates.join(" or "))]
    AmbiguousFlag {
        flag: String,
        candidates: Vec<String>,
    },

    /// Leftover tokens that nothing can consume
    #[error("could not consume arguments: {}", .tokens.join(" "))]
    UnconsumedTokens { tokens: Vec<String> },

    /// Malformed invocation before any resolution step
    #[error("{message}")]
    Usage { message: String },
}

impl ResolutionError {
    /// Create a new member-not-found error
    pub fn member_not_found(name: impl Into<String>, component: impl Into<String>) -> Self {
        Self::MemberNotFound {
            name: name.into(),
            component: component.into(),
        }
    }

    /// Create a new missing-required-argument error
    pub fn missing_required(routine: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingRequired {
            routine: routine.into(),
            name: name.into(),
        }
    }

    /// Create a new ambiguous-flag error
    pub fn ambiguous_flag(flag: impl Into<String>, candidates: Vec<String>) -> Self {
        Self::AmbiguousFlag {
            flag: flag.into(),
            candidates,
        }
    }

    /// Create a new unconsumed-tokens error
    pub fn unconsumed(tokens: Vec<String>) -> Self {
        Self::UnconsumedTokens { tokens }
    }

    /// Create a new usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}

/// Top-level error for one resolution.
///
/// `Resolution` carries the partial trace for reporting and maps to exit
/// status 2 in process mode. `Target` is an error raised by the embedder's
/// own routine; it keeps its original identity (downcastable through
/// `anyhow`) and maps to exit status 1.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{source}")]
    Resolution {
        #[source]
        source: ResolutionError,
        trace: Trace,
    },

    #[error(transparent)]
    Target(#[from] anyhow::Error),
}

impl Error {
    /// Wrap a resolution error together with the trace accumulated so far
    pub fn resolution(source: ResolutionError, trace: Trace) -> Self {
        Self::Resolution { source, trace }
    }

    /// The trace behind a resolution error, if this is one
    pub fn trace(&self) -> Option<&Trace> {
        match self {
            Self::Resolution { trace, .. } => Some(trace),
            Self::Target(_) => None,
        }
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;
