//! Argument binding
//!
//! Matches a window of tokens (everything up to the next separator or end
//! of input) against a routine's parameter spec. Flags bind by exact name,
//! then unique prefix among still-unbound parameters; `--noX` with no
//! inline value binds `X` to false; remaining bare tokens fill positional
//! parameters in declaration order. Rightmost binding of a repeated name
//! wins.
//!
//! Constructors bind named flags only: their bare tokens stay in
//! `remaining` for the resolver to spend on the produced instance.

use tracing::debug;

use crate::core::literal::LiteralParser;
use crate::core::token::{flag_parts, is_flag};
use crate::error::ResolutionError;
use crate::routine::{CallArgs, ParamKind, Routine};
use crate::value::Value;

/// A successful binding over one token window
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Arguments ready for `Routine::invoke`
    pub args: CallArgs,
    /// Number of window tokens this binding consumed
    pub consumed: usize,
    /// Unconsumed window tokens, in their original order
    pub remaining: Vec<String>,
}

/// Bind `window` against `routine`'s parameter spec.
///
/// The window never contains the separator; the resolver slices it off
/// beforehand.
pub fn bind(
    routine: &Routine,
    window: &[String],
    parser: &LiteralParser,
) -> Result<Binding, ResolutionError> {
    let mut named: Vec<(String, Value)> = Vec::new();
    let mut kwargs: Vec<(String, Value)> = Vec::new();
    let mut varargs: Vec<Value> = Vec::new();
    let mut consumed = vec![false; window.len()];
    let accepts_kwargs = routine.var_named().is_some();

    // Flag pass
    let mut i = 0;
    while i < window.len() {
        let token = &window[i];
        if !is_flag(token) {
            i += 1;
            continue;
        }
        let (name, inline) = flag_parts(token);
        let next_value = match inline {
            Some(_) => None,
            None => window.get(i + 1).filter(|t| !is_flag(t.as_str())),
        };

        if let Some(param) = resolve_flag(routine, &named, token, &name)? {
            debug!("flag {} bound parameter {}", token, param);
            consumed[i] = true;
            if let Some(raw) = inline {
                set_named(&mut named, param, parser.parse(&raw));
            } else if let Some(raw) = next_value {
                set_named(&mut named, param, parser.parse(raw));
                consumed[i + 1] = true;
                i += 1;
            } else {
                set_named(&mut named, param, Value::Bool(true));
            }
            i += 1;
            continue;
        }

        // `no`-negation: only without an inline value, and only after the
        // literal name failed to match (`--nothing` prefers a parameter
        // actually called `nothing`).
        if inline.is_none()
            && let Some(stripped) = name.strip_prefix("no").filter(|s| !s.is_empty())
        {
            if let Some(param) = resolve_flag(routine, &named, token, stripped)? {
                debug!("flag {} negates parameter {}", token, param);
                consumed[i] = true;
                set_named(&mut named, param, Value::Bool(false));
                i += 1;
                continue;
            }
            if accepts_kwargs {
                consumed[i] = true;
                set_named(&mut kwargs, stripped.to_string(), Value::Bool(false));
                i += 1;
                continue;
            }
        }

        if accepts_kwargs {
            consumed[i] = true;
            if let Some(raw) = inline {
                set_named(&mut kwargs, name, parser.parse(&raw));
            } else if let Some(raw) = next_value {
                set_named(&mut kwargs, name, parser.parse(raw));
                consumed[i + 1] = true;
                i += 1;
            } else {
                set_named(&mut kwargs, name, Value::Bool(true));
            }
            i += 1;
            continue;
        }

        // Unmatched flag with no variadic-named sink: left in place,
        // reported below.
        i += 1;
    }

    // Positional pass; constructors take no positional tokens at all
    if !routine.is_constructor() {
        let has_var_positional = routine.var_positional().is_some();
        let open_slots: Vec<String> = routine
            .params()
            .iter()
            .filter(|p| p.kind == ParamKind::Positional)
            .filter(|p| !named.iter().any(|(n, _)| *n == p.name))
            .map(|p| p.name.clone())
            .collect();
        let mut slots = open_slots.into_iter();
        let mut next_slot = slots.next();
        for (idx, token) in window.iter().enumerate() {
            if consumed[idx] || is_flag(token) {
                continue;
            }
            if let Some(param) = next_slot.take() {
                set_named(&mut named, param, parser.parse(token));
                consumed[idx] = true;
                next_slot = slots.next();
            } else if has_var_positional {
                varargs.push(parser.parse(token));
                consumed[idx] = true;
            }
        }
    }

    // Defaults for whatever stayed unbound
    for param in routine.named_params() {
        if named.iter().any(|(n, _)| *n == param.name) {
            continue;
        }
        if let Some(default) = &param.default {
            named.push((param.name.clone(), default.clone()));
        } else {
            return Err(ResolutionError::missing_required(
                routine.name(),
                &param.name,
            ));
        }
    }

    let remaining: Vec<String> = window
        .iter()
        .enumerate()
        .filter(|(idx, _)| !consumed[*idx])
        .map(|(_, t)| t.clone())
        .collect();

    if routine.is_constructor() {
        // Stray flags cannot reach the instance; bare tokens can.
        let stray: Vec<String> = remaining
            .iter()
            .filter(|t| is_flag(t.as_str()))
            .cloned()
            .collect();
        if !stray.is_empty() {
            return Err(ResolutionError::unconsumed(stray));
        }
    } else if !remaining.is_empty() {
        return Err(ResolutionError::unconsumed(remaining));
    }

    // Reorder declared bindings into declaration order for the closure
    let bound: Vec<(String, Value)> = routine
        .named_params()
        .filter_map(|p| {
            named
                .iter()
                .find(|(n, _)| *n == p.name)
                .map(|(n, v)| (n.clone(), v.clone()))
        })
        .collect();

    let consumed_count = consumed.iter().filter(|c| **c).count();
    Ok(Binding {
        args: CallArgs::new(bound, varargs, kwargs),
        consumed: consumed_count,
        remaining,
    })
}

/// Match a flag name against the declared parameters: exact name first
/// (re-bindable, rightmost wins), then a unique strict prefix among the
/// still-unbound ones. Multiple prefix candidates are ambiguous.
fn resolve_flag(
    routine: &Routine,
    named: &[(String, Value)],
    token: &str,
    name: &str,
) -> Result<Option<String>, ResolutionError> {
    if name.is_empty() {
        return Ok(None);
    }
    if let Some(param) = routine.named_params().find(|p| p.name == name) {
        return Ok(Some(param.name.clone()));
    }
    let candidates: Vec<String> = routine
        .named_params()
        .filter(|p| !named.iter().any(|(n, _)| *n == p.name))
        .filter(|p| p.name.starts_with(name))
        .map(|p| p.name.clone())
        .collect();
    match candidates.len() {
        0 => Ok(None),
        1 => Ok(Some(candidates.into_iter().next().expect("one candidate"))),
        _ => Err(ResolutionError::ambiguous_flag(token, candidates)),
    }
}

/// Insert or overwrite a binding; later bindings win
fn set_named(bindings: &mut Vec<(String, Value)>, name: String, value: Value) {
    match bindings.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = value,
        None => bindings.push((name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routine::Routine;

    fn parser() -> LiteralParser {
        LiteralParser::new()
    }

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// identity(alpha, beta='0'), mirroring a routine with one required
    /// and one defaulted parameter
    fn identity() -> Routine {
        Routine::function("identity")
            .param("alpha")
            .param_default("beta", "0")
            .build(|args| {
                Ok(Value::List(vec![
                    args.value("alpha").clone(),
                    args.value("beta").clone(),
                ]))
            })
    }

    fn bind_ok(routine: &Routine, window: &[&str]) -> Binding {
        bind(routine, &tokens(window), &parser()).expect("binding should succeed")
    }

    fn bound_value<'a>(binding: &'a Binding, name: &str) -> &'a Value {
        binding.args.value(name)
    }

    #[test]
    fn test_positional_fill_in_declaration_order() {
        let binding = bind_ok(&identity(), &["1", "2"]);
        assert_eq!(bound_value(&binding, "alpha"), &Value::Int(1));
        assert_eq!(bound_value(&binding, "beta"), &Value::Int(2));
        assert_eq!(binding.consumed, 2);
        assert!(binding.remaining.is_empty());
    }

    #[test]
    fn test_named_beats_positional_order() {
        // --beta takes the first token; the bare token fills alpha
        let binding = bind_ok(&identity(), &["--beta", "2", "1"]);
        assert_eq!(bound_value(&binding, "alpha"), &Value::Int(1));
        assert_eq!(bound_value(&binding, "beta"), &Value::Int(2));

        let binding = bind_ok(&identity(), &["1", "--alpha", "2"]);
        assert_eq!(bound_value(&binding, "alpha"), &Value::Int(2));
        assert_eq!(bound_value(&binding, "beta"), &Value::Int(1));
    }

    #[test]
    fn test_flag_without_value_before_flag_binds_true() {
        let binding = bind_ok(&identity(), &["--alpha", "--beta=10"]);
        assert_eq!(bound_value(&binding, "alpha"), &Value::Bool(true));
        assert_eq!(bound_value(&binding, "beta"), &Value::Int(10));
    }

    #[test]
    fn test_flag_consumes_following_value_token() {
        let binding = bind_ok(&identity(), &["--alpha", "10"]);
        assert_eq!(bound_value(&binding, "alpha"), &Value::Int(10));
        assert_eq!(bound_value(&binding, "beta"), &Value::from("0"));
    }

    #[test]
    fn test_single_hyphen_flags_work() {
        let binding = bind_ok(&identity(), &["-alpha=False", "10"]);
        assert_eq!(bound_value(&binding, "alpha"), &Value::Bool(false));
        assert_eq!(bound_value(&binding, "beta"), &Value::Int(10));
    }

    #[test]
    fn test_negative_number_is_a_value_not_a_flag() {
        let binding = bind_ok(&identity(), &["-alpha", "-10", "-beta"]);
        assert_eq!(bound_value(&binding, "alpha"), &Value::Int(-10));
        assert_eq!(bound_value(&binding, "beta"), &Value::Bool(true));
    }

    #[test]
    fn test_short_flag_unique_prefix() {
        let binding = bind_ok(&identity(), &["-a", "42", "-b"]);
        assert_eq!(bound_value(&binding, "alpha"), &Value::Int(42));
        assert_eq!(bound_value(&binding, "beta"), &Value::Bool(true));
    }

    #[test]
    fn test_ambiguous_short_flag() {
        let similar = Routine::function("identity")
            .param_default("bool_one", Value::Unit)
            .param_default("bool_two", Value::Unit)
            .build(|_| Ok(Value::Unit));
        let err = bind(&similar, &tokens(&["-b"]), &parser()).expect_err("ambiguous");
        match err {
            ResolutionError::AmbiguousFlag { flag, candidates } => {
                assert_eq!(flag, "-b");
                assert_eq!(candidates, vec!["bool_one", "bool_two"]);
            }
            other => panic!("expected AmbiguousFlag, got {other}"),
        }
    }

    #[test]
    fn test_exact_match_beats_prefix() {
        // identity2(a, alpha): -a is exact, -alpha is exact, --a is exact
        let routine = Routine::function("identity2")
            .param_default("a", Value::Unit)
            .param_default("alpha", Value::Unit)
            .build(|_| Ok(Value::Unit));
        let binding = bind_ok(&routine, &["-a"]);
        assert_eq!(bound_value(&binding, "a"), &Value::Bool(true));
        assert_eq!(bound_value(&binding, "alpha"), &Value::Unit);

        let binding = bind_ok(&routine, &["-alpha"]);
        assert_eq!(bound_value(&binding, "a"), &Value::Unit);
        assert_eq!(bound_value(&binding, "alpha"), &Value::Bool(true));

        let binding = bind_ok(&routine, &["-a", "-alpha"]);
        assert_eq!(bound_value(&binding, "a"), &Value::Bool(true));
        assert_eq!(bound_value(&binding, "alpha"), &Value::Bool(true));
    }

    #[test]
    fn test_boolean_negation() {
        let routine = Routine::function("fn1")
            .param("thing")
            .param("nothing")
            .build(|_| Ok(Value::Unit));
        let binding = bind_ok(&routine, &["--thing", "--nonothing"]);
        assert_eq!(bound_value(&binding, "thing"), &Value::Bool(true));
        assert_eq!(bound_value(&binding, "nothing"), &Value::Bool(false));

        // The literal name wins before `no` stripping
        let binding = bind_ok(&routine, &["--thing", "--nothing"]);
        assert_eq!(bound_value(&binding, "nothing"), &Value::Bool(true));
    }

    #[test]
    fn test_rightmost_binding_wins() {
        let routine = Routine::function("fn1")
            .param_default("thing", Value::Unit)
            .param("nothing")
            .build(|_| Ok(Value::Unit));
        let binding = bind_ok(&routine, &["--nothing", "--nonothing"]);
        assert_eq!(bound_value(&binding, "nothing"), &Value::Bool(false));
    }

    #[test]
    fn test_negation_falls_through_to_kwargs() {
        // fn(arg, **kwargs)
        let routine = Routine::function("fn3")
            .param("arg")
            .var_named("kwargs")
            .build(|_| Ok(Value::Unit));

        let binding = bind_ok(&routine, &["--arg=value", "--thing"]);
        assert_eq!(
            binding.args.kwargs(),
            &[("thing".to_string(), Value::Bool(true))]
        );

        let binding = bind_ok(&routine, &["--arg=value", "--nothing"]);
        assert_eq!(
            binding.args.kwargs(),
            &[("thing".to_string(), Value::Bool(false))]
        );

        let binding = bind_ok(&routine, &["--arg=value", "--nonothing"]);
        assert_eq!(
            binding.args.kwargs(),
            &[("nothing".to_string(), Value::Bool(false))]
        );
    }

    #[test]
    fn test_inline_value_disables_negation() {
        // fn(thing, **kwargs): --nothing=true goes to kwargs untouched
        let routine = Routine::function("fn2")
            .param("thing")
            .var_named("kwargs")
            .build(|_| Ok(Value::Unit));
        let binding = bind_ok(&routine, &["--nothing", "--nothing=true"]);
        assert_eq!(bound_value(&binding, "thing"), &Value::Bool(false));
        assert_eq!(
            binding.args.kwargs(),
            &[("nothing".to_string(), Value::Bool(true))]
        );
    }

    #[test]
    fn test_kwargs_consume_following_values() {
        let routine = Routine::function("props")
            .var_named("kwargs")
            .build(|_| Ok(Value::Unit));
        let binding = bind_ok(&routine, &["--name", "David", "--age", "24"]);
        assert_eq!(
            binding.args.kwargs(),
            &[
                ("name".to_string(), Value::from("David")),
                ("age".to_string(), Value::Int(24)),
            ]
        );
        assert_eq!(binding.consumed, 4);
    }

    #[test]
    fn test_var_positional_absorbs_window() {
        let routine = Routine::function("cumsums")
            .var_positional("items")
            .build(|_| Ok(Value::Unit));
        let binding = bind_ok(&routine, &["a", "b", "c", "d"]);
        assert_eq!(binding.args.varargs().len(), 4);
        assert!(binding.remaining.is_empty());
    }

    #[test]
    fn test_var_positional_after_named() {
        let routine = Routine::function("varchars")
            .param("alpha")
            .param("beta")
            .var_positional("chars")
            .build(|_| Ok(Value::Unit));
        let binding = bind_ok(&routine, &["1", "2", "c", "d"]);
        assert_eq!(bound_value(&binding, "alpha"), &Value::Int(1));
        assert_eq!(bound_value(&binding, "beta"), &Value::Int(2));
        assert_eq!(
            binding.args.varargs(),
            &[Value::from("c"), Value::from("d")]
        );
    }

    #[test]
    fn test_missing_required() {
        let err = bind(&identity(), &tokens(&[]), &parser()).expect_err("missing alpha");
        match err {
            ResolutionError::MissingRequired { routine, name } => {
                assert_eq!(routine, "identity");
                assert_eq!(name, "alpha");
            }
            other => panic!("expected MissingRequired, got {other}"),
        }
    }

    #[test]
    fn test_leftover_tokens_are_an_error() {
        let routine = Routine::function("run")
            .param("cell")
            .build(|_| Ok(Value::Unit));
        let err = bind(&routine, &tokens(&["b1", "b2", "b3"]), &parser()).expect_err("leftover");
        match err {
            ResolutionError::UnconsumedTokens { tokens } => {
                assert_eq!(tokens, vec!["b2", "b3"]);
            }
            other => panic!("expected UnconsumedTokens, got {other}"),
        }
    }

    #[test]
    fn test_unmatched_flag_without_kwargs_is_an_error() {
        let err = bind(&identity(), &tokens(&["--alpha", "--test"]), &parser())
            .expect_err("unmatched flag");
        assert!(matches!(err, ResolutionError::UnconsumedTokens { .. }));
    }

    #[test]
    fn test_named_only_rejects_positional_tokens() {
        let routine = Routine::function("double")
            .named_only("count")
            .build(|_| Ok(Value::Unit));
        assert!(bind(&routine, &tokens(&["5"]), &parser()).is_err());

        let binding = bind_ok(&routine, &["--count", "5"]);
        assert_eq!(bound_value(&binding, "count"), &Value::Int(5));
    }

    #[test]
    fn test_constructor_passes_bare_tokens_through() {
        let ctor = Routine::constructor("WithDefaults").build(|_| Ok(Value::Unit));
        let binding = bind_ok(&ctor, &["double", "2"]);
        assert_eq!(binding.consumed, 0);
        assert_eq!(binding.remaining, vec!["double", "2"]);
    }

    #[test]
    fn test_constructor_requires_flags_for_params() {
        let ctor = Routine::constructor("InstanceVars")
            .param("arg1")
            .param("arg2")
            .build(|_| Ok(Value::Unit));
        // Positional tokens never reach a constructor
        assert!(matches!(
            bind(&ctor, &tokens(&["a1", "a2"]), &parser()),
            Err(ResolutionError::MissingRequired { .. })
        ));

        let binding = bind_ok(&ctor, &["--arg1=a1", "--arg2=a2"]);
        assert_eq!(bound_value(&binding, "arg1"), &Value::from("a1"));
        assert_eq!(bound_value(&binding, "arg2"), &Value::from("a2"));
    }

    #[test]
    fn test_quoted_flag_lookalike_binds_positionally() {
        let binding = bind_ok(&identity(), &["--alpha", "True", "\"--test\""]);
        assert_eq!(bound_value(&binding, "alpha"), &Value::Bool(true));
        assert_eq!(bound_value(&binding, "beta"), &Value::from("--test"));
    }
}
