//! Trace and synopsis rendering
//!
//! Renders the audit trail for `--trace` and error exits, and a synopsis
//! block (NAME / SYNOPSIS / COMMANDS / FLAGS) for help and for final
//! components that are not plain values. Rendering never invokes a
//! callable.

use crate::error::ResolutionError;
use crate::routine::{ParamKind, Routine};
use crate::trace::{StepKind, Trace, TraceElement};
use crate::value::{Category, Value};

/// Render the full ordered trace as a numbered listing
pub fn render_trace(trace: &Trace) -> String {
    let mut out = String::from("Resolution trace:\n");
    for (i, element) in trace.elements().iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, describe_element(element)));
    }
    out.pop();
    out
}

fn describe_element(element: &TraceElement) -> String {
    match element.kind {
        StepKind::InitialComponent => format!("Initial component ({})", element.summary),
        StepKind::AccessedMember => {
            format!("Accessed member \"{}\" ({})", element.target, element.summary)
        }
        StepKind::CalledRoutine => format!(
            "Called routine \"{}\" ({}, {})",
            element.target,
            tokens_phrase(element.consumed),
            element.summary
        ),
        StepKind::InstantiatedClass => format!(
            "Instantiated class \"{}\" ({}, {})",
            element.target,
            tokens_phrase(element.consumed),
            element.summary
        ),
        StepKind::CompletionRequested => "Generated completion script".to_string(),
        StepKind::Error => format!("Error: {}", element.summary),
    }
}

fn tokens_phrase(consumed: usize) -> String {
    if consumed == 1 {
        "consumed 1 token".to_string()
    } else {
        format!("consumed {consumed} tokens")
    }
}

/// Render the synopsis block for the component resolution stopped on
pub fn synopsis(trace: &Trace, component: &Value) -> String {
    let path = trace.command_path();
    let mut out = String::new();
    out.push_str("NAME\n");
    out.push_str(&format!("    {}\n\n", trace.name()));
    out.push_str("SYNOPSIS\n");
    match component.category() {
        Category::Callable => {
            let Value::Routine(routine) = component else {
                unreachable!("callable components are routines");
            };
            out.push_str(&format!("    {path} {}\n", usage_line(routine)));
            let flags = flag_lines(routine);
            if !flags.is_empty() {
                out.push_str("\nFLAGS\n");
                for line in flags {
                    out.push_str(&format!("    {line}\n"));
                }
            }
        }
        Category::Mapping | Category::Object => {
            out.push_str(&format!("    {path} COMMAND\n"));
            let commands = component.member_names();
            if !commands.is_empty() {
                out.push_str("\nCOMMANDS\n    COMMAND is one of:\n");
                for command in commands {
                    out.push_str(&format!("        {command}\n"));
                }
            }
        }
        Category::Sequence => {
            out.push_str(&format!("    {path} INDEX\n"));
            let commands = component.member_names();
            if !commands.is_empty() {
                out.push_str("\nCOMMANDS\n    COMMAND is one of:\n");
                for command in commands {
                    out.push_str(&format!("        {command}\n"));
                }
            }
        }
        Category::Primitive => {
            out.push_str(&format!("    {path}\n\nVALUE\n    {component}\n"));
        }
    }
    while out.ends_with('\n') {
        out.pop();
    }
    out
}

/// Usage fragment for one routine: positionals by slot, flags by name.
/// Constructor parameters always render as flags; constructors never take
/// positional tokens.
fn usage_line(routine: &Routine) -> String {
    let mut parts = Vec::new();
    for param in routine.params() {
        let upper = param.name.to_uppercase();
        match param.kind {
            ParamKind::Positional if !routine.is_constructor() => {
                if param.default.is_some() {
                    parts.push(format!("[{upper}]"));
                } else {
                    parts.push(upper);
                }
            }
            ParamKind::Positional => {
                if param.default.is_some() {
                    parts.push(format!("[--{}={}]", param.name, upper));
                } else {
                    parts.push(format!("--{}={}", param.name, upper));
                }
            }
            ParamKind::NamedOnly => {
                if param.default.is_some() {
                    parts.push(format!("[--{}={}]", param.name, upper));
                } else {
                    parts.push(format!("--{}={}", param.name, upper));
                }
            }
            ParamKind::VarPositional => parts.push(format!("[{upper}...]")),
            ParamKind::VarNamed => parts.push("[--KEY=VALUE...]".to_string()),
        }
    }
    parts.join(" ")
}

fn flag_lines(routine: &Routine) -> Vec<String> {
    routine
        .named_params()
        .map(|param| match &param.default {
            Some(default) => format!("--{}    default: {default}", param.name),
            None => format!("--{}    (required)", param.name),
        })
        .collect()
}

/// Error-stream report: the trace (already ending on the error element)
/// followed by the error message itself
pub fn error_report(trace: &Trace, error: &ResolutionError) -> String {
    format!("{}\n\n{error}", render_trace(trace))
}
