//! Worked example: a small calculator exposed as a CLI.
//!
//! Shows the registration surface end to end — routines with defaults and
//! named-only parameters, variadics, a constructor, plain data members —
//! and doubles as the fixture for the process-contract integration tests.

use std::process::ExitCode;

use autocli::{Object, Routine, Value, cli};

fn main() -> ExitCode {
    cli::run(calculator(), Some("calc"))
}

fn calculator() -> Value {
    Object::new("calc")
        .member(
            "double",
            Routine::function("double")
                .param_default("count", 0)
                .build(|args| scale(args.value("count"), 2)),
        )
        .member(
            "triple",
            Routine::function("triple")
                .param_default("count", 0)
                .build(|args| scale(args.value("count"), 3)),
        )
        .member(
            "add",
            Routine::function("add")
                .param("a")
                .param_default("b", 0)
                .build(|args| numeric_add(args.value("a"), args.value("b"))),
        )
        .member(
            "divide",
            Routine::function("divide")
                .param("dividend")
                .param_default("divisor", 1)
                .build(|args| {
                    let dividend = as_number(args.value("dividend"))?;
                    let divisor = as_number(args.value("divisor"))?;
                    if divisor == 0.0 {
                        anyhow::bail!("division by zero");
                    }
                    Ok(Value::Float(dividend / divisor))
                }),
        )
        .member(
            "greet",
            Routine::function("greet")
                .param_default("name", "world")
                .named_only_default("shout", false)
                .build(|args| {
                    let name = match args.value("name") {
                        Value::Str(s) => s.clone(),
                        other => other.to_string(),
                    };
                    let mut greeting = format!("Hello, {name}!");
                    if args.value("shout").truthy() {
                        greeting = greeting.to_uppercase();
                    }
                    Ok(Value::Str(greeting))
                }),
        )
        .member(
            "stats",
            Object::new("stats")
                .member(
                    "total",
                    Routine::function("total")
                        .var_positional("values")
                        .build(|args| {
                            let mut sum = 0.0;
                            for value in args.varargs() {
                                sum += as_number(value)?;
                            }
                            Ok(number(sum))
                        }),
                )
                .member(
                    "count",
                    Routine::function("count")
                        .var_positional("values")
                        .build(|args| Ok(Value::Int(args.varargs().len() as i64))),
                ),
        )
        .member(
            "counter",
            Routine::constructor("Counter")
                .param_default("start", 0)
                .build(|args| {
                    let start = args.value("start").clone();
                    Ok(Value::from(
                        Object::new("Counter").member("value", start).member(
                            "describe",
                            Routine::function("describe")
                                .build(|_| Ok(Value::from("a counter"))),
                        ),
                    ))
                }),
        )
        .member(
            "words",
            Value::List(vec![
                Value::from("zero"),
                Value::from("one"),
                Value::from("two"),
                Value::from("three"),
            ]),
        )
        .member(
            "table",
            Value::Map(vec![
                ("pi".to_string(), Value::Float(3.14159)),
                ("e".to_string(), Value::Float(2.71828)),
            ]),
        )
        .into()
}

fn scale(value: &Value, factor: i64) -> anyhow::Result<Value> {
    match value {
        Value::Int(n) => Ok(Value::Int(factor * n)),
        Value::Float(x) => Ok(Value::Float(factor as f64 * x)),
        other => anyhow::bail!("cannot scale {}", other.type_name()),
    }
}

fn numeric_add(a: &Value, b: &Value) -> anyhow::Result<Value> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x + y)),
        _ => Ok(Value::Float(as_number(a)? + as_number(b)?)),
    }
}

fn as_number(value: &Value) -> anyhow::Result<f64> {
    value
        .as_float()
        .ok_or_else(|| anyhow::anyhow!("expected a number, got {}", value.type_name()))
}

fn number(x: f64) -> Value {
    if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        Value::Int(x as i64)
    } else {
        Value::Float(x)
    }
}
