//! The resolution loop
//!
//! Repeatedly classifies the current component, delegates to the binder
//! when it is callable, navigates members otherwise, and appends one trace
//! element per step. Errors from the embedder's own routines propagate
//! untouched; resolution errors stop the loop and carry the partial trace.

use tracing::{debug, instrument};

use crate::core::binder;
use crate::core::literal::LiteralParser;
use crate::error::{Error, ResolutionError};
use crate::trace::Trace;
use crate::value::{Category, Value};

/// Options controlling one resolution
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Token that closes argument consumption for the current call
    /// (default `-`)
    pub separator: String,
    /// When help or completion was requested: do not invoke a trailing
    /// callable just to have something to render
    pub skip_final_call: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            separator: "-".to_string(),
            skip_final_call: false,
        }
    }
}

/// A completed resolution: the final component and its audit trail
#[derive(Debug, Clone)]
pub struct Resolution {
    pub value: Value,
    pub trace: Trace,
}

/// Resolve `tokens` against `root`.
///
/// `name` is only used for display (usage lines, trace headers).
#[instrument(skip(root, options))]
pub fn resolve(
    root: Value,
    tokens: &[String],
    name: &str,
    options: &ResolveOptions,
) -> Result<Resolution, Error> {
    let parser = LiteralParser::new();
    let mut trace = Trace::new(name);
    let mut component = root;
    let mut queue: Vec<String> = tokens.to_vec();
    trace.initial(component.summary());
    debug!("initial component: {}", component.summary());

    loop {
        if let Value::Routine(routine) = &component {
            if queue.is_empty() && options.skip_final_call {
                break;
            }
            let boundary = queue.iter().position(|t| *t == options.separator);
            let window = &queue[..boundary.unwrap_or(queue.len())];
            let binding = match binder::bind(routine, window, &parser) {
                Ok(binding) => binding,
                Err(err) => {
                    trace.error(err.to_string());
                    return Err(Error::resolution(err, trace));
                }
            };
            debug!(
                "calling {} with {} consumed token(s)",
                routine.name(),
                binding.consumed
            );
            // Target errors bypass trace formatting entirely
            let result = routine.invoke(&binding.args)?;

            let target = routine.name().to_string();
            let is_constructor = routine.is_constructor();
            let mut rebuilt = binding.remaining.clone();
            if let Some(pos) = boundary {
                let mut after = queue[pos..].to_vec();
                // The boundary separator is spent only when the call
                // consumed its whole window; a constructor's pass-through
                // tokens still need it to force the next call's boundary.
                if binding.remaining.is_empty() {
                    after.remove(0);
                }
                rebuilt.extend(after);
            }
            queue = rebuilt;

            if is_constructor {
                trace.instantiated(target, binding.consumed, result.summary());
            } else {
                trace.called(target, binding.consumed, result.summary());
            }
            component = result;
            continue;
        }

        let Some(token) = queue.first().cloned() else {
            break;
        };
        if token == options.separator {
            // Idempotent: a separator the component has no use for
            queue.remove(0);
            continue;
        }

        match component.access(&token) {
            Some(next) => {
                debug!("accessed member {} -> {}", token, next.summary());
                trace.accessed(&token, next.summary());
                queue.remove(0);
                component = next;
            }
            None => {
                let err = match component.category() {
                    Category::Mapping | Category::Sequence | Category::Object => {
                        ResolutionError::member_not_found(&token, component.describe())
                    }
                    _ => ResolutionError::unconsumed(queue.clone()),
                };
                trace.error(err.to_string());
                return Err(Error::resolution(err, trace));
            }
        }
    }

    Ok(Resolution {
        value: component,
        trace,
    })
}
