//! Run configuration
//!
//! Centralizes the options one resolution runs under, derived from the
//! parsed flag block, and validates them.

use serde::{Deserialize, Serialize};

use crate::cli::FlagArgs;
use crate::core::ResolveOptions;
use crate::error::ResolutionError;

/// Options for one resolution run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOptions {
    /// Display name used in usage lines and trace headers
    pub name: String,
    /// Chaining separator token
    pub separator: String,
    /// Render the synopsis and exit successfully
    pub help: bool,
    /// Render the full trace and exit successfully
    pub trace: bool,
    /// Emit a completion script and exit successfully
    pub completion: bool,
    /// Hand off to the interactive collaborator (unsupported)
    pub interactive: bool,
    /// Enable debug logging
    pub verbose: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            name: "cli".to_string(),
            separator: "-".to_string(),
            help: false,
            trace: false,
            completion: false,
            interactive: false,
            verbose: false,
        }
    }
}

impl RunOptions {
    /// Build run options from a parsed flag block
    pub fn from_flags(args: &FlagArgs, name: impl Into<String>) -> Result<Self, ResolutionError> {
        let options = Self {
            name: name.into(),
            separator: args.separator.clone(),
            help: args.help,
            trace: args.trace,
            completion: args.completion,
            interactive: args.interactive,
            verbose: args.verbose,
        };
        options.validate()?;
        Ok(options)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ResolutionError> {
        if self.separator.is_empty() {
            return Err(ResolutionError::usage("separator must not be empty"));
        }
        if self.separator == "--" {
            return Err(ResolutionError::usage(
                "separator must not collide with the flag-block marker",
            ));
        }
        Ok(())
    }

    /// The resolver-facing slice of these options.
    ///
    /// Help and completion requests suppress the final auto-call: a
    /// callable is never executed merely to have something to render.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            separator: self.separator.clone(),
            skip_final_call: self.help || self.completion,
        }
    }
}
