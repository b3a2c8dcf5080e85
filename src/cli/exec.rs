//! Process entry points
//!
//! Drives one resolution from argv to an exit status: 0 for success and
//! for help/trace/completion requests, 2 for resolution errors (reported
//! on the error stream), 1 for failures inside the target's own routines.

use std::process::ExitCode;

use tracing::debug;

use crate::completion;
use crate::config::RunOptions;
use crate::core::token;
use crate::error::Error;
use crate::report;
use crate::trace::Trace;
use crate::value::Value;
use crate::{cli, core, setup_logging};

/// Run against `std::env::args`, defaulting the display name to the
/// binary's basename
pub fn run(root: Value, name: Option<&str>) -> ExitCode {
    let mut argv: Vec<String> = std::env::args().collect();
    let program = if argv.is_empty() {
        String::new()
    } else {
        argv.remove(0)
    };
    let default_name = std::path::Path::new(&program)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cli".to_string());
    run_with(root, name.unwrap_or(&default_name), &argv)
}

/// Run against an explicit token sequence
pub fn run_with(root: Value, name: &str, argv: &[String]) -> ExitCode {
    let (command, flags) = token::split_flag_block(argv.to_vec());

    let flag_args = match cli::parse_flag_block(&flags) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };
    let options = match RunOptions::from_flags(&flag_args, name) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    if options.verbose {
        // Fails when a host application already installed a subscriber;
        // logging then goes through theirs.
        let _ = setup_logging(true);
    }
    if options.interactive {
        eprintln!("interactive mode is not supported by this build");
    }
    debug!("running `{}` with {} command token(s)", name, command.len());

    if options.completion {
        let mut trace = Trace::new(&options.name);
        trace.initial(root.summary());
        trace.completion_requested();
        if options.trace {
            println!("{}", report::render_trace(&trace));
        }
        print!("{}", completion::bash_script(&options.name, &root.member_names()));
        return ExitCode::SUCCESS;
    }

    match core::resolve(root, &command, &options.name, &options.resolve_options()) {
        Ok(resolution) => {
            if options.trace {
                println!("{}", report::render_trace(&resolution.trace));
            }
            if options.help {
                println!("{}", report::synopsis(&resolution.trace, &resolution.value));
            }
            if options.trace || options.help {
                return ExitCode::SUCCESS;
            }
            print_result(&resolution.trace, &resolution.value);
            ExitCode::SUCCESS
        }
        Err(Error::Resolution { source, trace }) => {
            if options.trace || options.help {
                // An explicit report request wins over the failure; the
                // partial trace is what gets rendered.
                println!("{}", report::render_trace(&trace));
                return ExitCode::SUCCESS;
            }
            eprintln!("{}", report::error_report(&trace, &source));
            ExitCode::from(2)
        }
        Err(Error::Target(err)) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

/// Print the final component: plain values directly, strings bare, the
/// nothing sentinel silently, member-bearing components as a synopsis
fn print_result(trace: &Trace, value: &Value) {
    match value {
        Value::Unit => {}
        Value::Str(s) => println!("{s}"),
        Value::Object(_) | Value::Routine(_) => {
            println!("{}", report::synopsis(trace, value));
        }
        other => println!("{other}"),
    }
}
