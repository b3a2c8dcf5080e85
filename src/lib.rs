//! # autocli
//!
//! Turn an arbitrary in-memory value into a command-line interface without
//! any interface-description code. A caller supplies a root [`Value`] and
//! a sequence of string tokens (from argv or a shell-like string); the
//! engine walks the value, resolving each token as a member access, call
//! argument, or navigation step, and returns or prints the final value.
//!
//! ## Features
//!
//! - Schema-free dispatch over values, mappings, sequences, objects, and
//!   routines registered through the builder API
//! - Flag binding with prefix matching, `--noX` negation, variadics, and
//!   literal value inference
//! - Left-to-right call chaining through a separator token (default `-`)
//! - A per-run resolution trace behind `--trace`, `--help`, and error exits
//!
//! ## Example
//!
//! ```
//! use autocli::{Object, Outcome, Routine, Value, dispatch};
//!
//! let calc = Object::new("calc").member(
//!     "double",
//!     Routine::function("double")
//!         .param_default("count", 0)
//!         .build(|args| Ok(Value::Int(2 * args.value("count").as_int().unwrap_or(0)))),
//! );
//!
//! let outcome = dispatch(Value::from(calc), "double 5")?;
//! assert_eq!(outcome, Outcome::Value(Value::Int(10)));
//! # Ok::<(), autocli::Error>(())
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod core;
pub mod error;
pub mod report;
pub mod routine;
pub mod trace;
pub mod value;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub use config::RunOptions;
pub use error::{Error, ResolutionError};
pub use routine::{CallArgs, Param, ParamKind, Routine, RoutineKind};
pub use trace::{StepKind, Trace, TraceElement};
pub use value::{Category, Object, Value};

/// Initialize logging with appropriate verbosity
pub fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// A command, either pre-split or as a shell-like string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandInput {
    Line(String),
    Tokens(Vec<String>),
}

impl CommandInput {
    fn into_tokens(self) -> Vec<String> {
        match self {
            CommandInput::Line(line) => core::token::split_line(&line),
            CommandInput::Tokens(tokens) => tokens,
        }
    }
}

impl From<&str> for CommandInput {
    fn from(line: &str) -> Self {
        CommandInput::Line(line.to_string())
    }
}

impl From<String> for CommandInput {
    fn from(line: String) -> Self {
        CommandInput::Line(line)
    }
}

impl From<Vec<String>> for CommandInput {
    fn from(tokens: Vec<String>) -> Self {
        CommandInput::Tokens(tokens)
    }
}

impl From<Vec<&str>> for CommandInput {
    fn from(tokens: Vec<&str>) -> Self {
        CommandInput::Tokens(tokens.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for CommandInput {
    fn from(tokens: &[&str]) -> Self {
        CommandInput::Tokens(tokens.iter().map(|s| s.to_string()).collect())
    }
}

/// What a report request produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Help,
    Trace,
    Completion,
}

/// Rendered text for a help/trace/completion request (exit-0 semantics)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: ReportKind,
    pub text: String,
}

/// The result of a dispatch: a final value, or rendered report text when
/// the flag block asked for one
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Value),
    Report(Report),
}

impl Outcome {
    /// The final value, unless a report was requested
    pub fn into_value(self) -> Option<Value> {
        match self {
            Outcome::Value(value) => Some(value),
            Outcome::Report(_) => None,
        }
    }
}

/// Resolve `command` against `root` with the default display name.
///
/// The command may carry a flag block after a bare `--`; `--help`,
/// `--trace`, and `--completion` turn the outcome into a [`Report`].
/// Resolution failures come back as [`Error::Resolution`] with the partial
/// trace attached; failures inside the target's own routines come back as
/// [`Error::Target`] with their original identity.
pub fn dispatch(root: Value, command: impl Into<CommandInput>) -> Result<Outcome, Error> {
    dispatch_named(root, command, "cli")
}

/// [`dispatch`] with an explicit display name
pub fn dispatch_named(
    root: Value,
    command: impl Into<CommandInput>,
    name: &str,
) -> Result<Outcome, Error> {
    let (tokens, flags) = core::token::split_flag_block(command.into().into_tokens());

    let usage = |message: String| {
        Error::resolution(ResolutionError::usage(message), Trace::new(name))
    };
    let flag_args = cli::parse_flag_block(&flags).map_err(|e| usage(e.to_string()))?;
    let options =
        RunOptions::from_flags(&flag_args, name).map_err(|e| usage(e.to_string()))?;

    if options.completion {
        return Ok(Outcome::Report(Report {
            kind: ReportKind::Completion,
            text: completion::bash_script(&options.name, &root.member_names()),
        }));
    }

    match core::resolve(root, &tokens, &options.name, &options.resolve_options()) {
        Ok(resolution) => {
            if options.help || options.trace {
                let mut sections = Vec::new();
                if options.trace {
                    sections.push(report::render_trace(&resolution.trace));
                }
                if options.help {
                    sections.push(report::synopsis(&resolution.trace, &resolution.value));
                }
                let kind = if options.help {
                    ReportKind::Help
                } else {
                    ReportKind::Trace
                };
                return Ok(Outcome::Report(Report {
                    kind,
                    text: sections.join("\n\n"),
                }));
            }
            Ok(Outcome::Value(resolution.value))
        }
        Err(Error::Resolution { trace, .. }) if options.help || options.trace => {
            // An explicit report request wins over the failure
            let kind = if options.help {
                ReportKind::Help
            } else {
                ReportKind::Trace
            };
            Ok(Outcome::Report(Report {
                kind,
                text: report::render_trace(&trace),
            }))
        }
        Err(err) => Err(err),
    }
}
