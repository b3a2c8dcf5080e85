//! The dynamic value model and capability classifier
//!
//! Components under resolution are [`Value`]s. Classification is
//! structural: the engine asks a value what it can do (be called, look up
//! keys, index elements, expose members) rather than checking a fixed type
//! list. When capabilities overlap, Callable wins, then Mapping, Sequence,
//! Object, Primitive.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::routine::Routine;

/// Capability category of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Callable,
    Mapping,
    Sequence,
    Object,
    Primitive,
}

/// A dynamic value: the unit of resolution.
///
/// Cheap to clone; routines share their native closure behind an `Rc`.
/// Tuple and set literals both parse into `List` — nothing downstream
/// distinguishes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The nothing sentinel (`none`/`None`/`null` literals)
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// Insertion-ordered string-keyed mapping
    Map(Vec<(String, Value)>),
    Object(Object),
    Routine(Routine),
}

impl Value {
    /// Capability category, with the precedence fixed above
    pub fn category(&self) -> Category {
        match self {
            Value::Routine(_) => Category::Callable,
            Value::Map(_) => Category::Mapping,
            Value::List(_) => Category::Sequence,
            Value::Object(_) => Category::Object,
            _ => Category::Primitive,
        }
    }

    /// Short type label for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "nothing",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
            Value::Routine(_) => "routine",
        }
    }

    /// Label used in error messages, naming objects and routines
    pub fn describe(&self) -> String {
        match self {
            Value::Object(obj) => format!("object `{}`", obj.name()),
            Value::Routine(r) => format!("routine `{}`", r.name()),
            other => other.type_name().to_string(),
        }
    }

    /// One-line summary for trace elements
    pub fn summary(&self) -> String {
        match self {
            Value::Unit => "nothing".to_string(),
            Value::Bool(b) => format!("bool: {b}"),
            Value::Int(n) => format!("int: {n}"),
            Value::Float(_) => format!("float: {self}"),
            Value::Str(s) => {
                if s.chars().count() > 32 {
                    let head: String = s.chars().take(32).collect();
                    format!("string: \"{head}...\"")
                } else {
                    format!("string: \"{s}\"")
                }
            }
            Value::List(items) => format!("list ({} items)", items.len()),
            Value::Map(entries) => format!("map ({} entries)", entries.len()),
            Value::Object(obj) => format!("object {}", obj.name()),
            Value::Routine(r) => {
                if r.is_constructor() {
                    format!("constructor {}", r.name())
                } else {
                    format!("routine {}", r.name())
                }
            }
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view; integers coerce to floats
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Unit => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            Value::Object(_) | Value::Routine(_) => true,
        }
    }

    /// Member names this component exposes, for synopsis and completion.
    ///
    /// Constructors only expose parameter names: without reflection the
    /// members of the eventual instance are unknowable before invocation.
    pub fn member_names(&self) -> Vec<String> {
        match self {
            Value::Object(obj) => obj.member_names().map(str::to_string).collect(),
            Value::Map(entries) => entries.iter().map(|(k, _)| k.clone()).collect(),
            Value::List(_) | Value::Str(_) => builtin_names(self),
            Value::Routine(r) => r
                .named_params()
                .map(|p| format!("--{}", p.name))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Resolve one navigation token against this component: mapping key,
    /// sequence index (negative counts from the end), object member, then
    /// built-in members. `None` means the token names nothing here.
    pub fn access(&self, token: &str) -> Option<Value> {
        match self {
            Value::Map(entries) => {
                let normalized = token.replace('-', "_");
                entries
                    .iter()
                    .find(|(k, _)| k == token || k.replace('-', "_") == normalized)
                    .map(|(_, v)| v.clone())
            }
            Value::List(items) => match token.parse::<i64>() {
                Ok(index) => {
                    let len = items.len() as i64;
                    let index = if index < 0 { len + index } else { index };
                    if (0..len).contains(&index) {
                        Some(items[index as usize].clone())
                    } else {
                        None
                    }
                }
                Err(_) => builtin_member(self, token),
            },
            Value::Object(obj) => obj.get(token).cloned(),
            Value::Str(_) => builtin_member(self, token),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => {
                // Keep a decimal point so floats stay distinguishable
                if x.is_finite() && x.fract() == 0.0 {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Object(obj) => write!(f, "<{}>", obj.name()),
            Value::Routine(r) => write!(f, "<routine {}>", r.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl From<Routine> for Value {
    fn from(r: Routine) -> Self {
        Value::Routine(r)
    }
}

/// A named object with an ordered member list.
///
/// Member lookup treats `-` and `_` as equivalent, so `as-bool` on the
/// command line reaches a member registered as `as_bool`.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    name: String,
    members: Vec<(String, Value)>,
}

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Register a member (builder style)
    pub fn member(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.members.push((name.replace('-', "_"), value.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(n, _)| n.as_str())
    }

    pub fn get(&self, token: &str) -> Option<&Value> {
        let normalized = token.replace('-', "_");
        self.members
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, v)| v)
    }
}

fn builtin_names(value: &Value) -> Vec<String> {
    let names: &[&str] = match value {
        Value::Str(_) => &["upper", "lower", "strip", "count"],
        Value::List(_) => &["count", "index"],
        _ => &[],
    };
    names.iter().map(|n| n.to_string()).collect()
}

/// Built-in callable members on strings and lists, mirroring the handful
/// of receiver methods command chains actually reach for.
fn builtin_member(value: &Value, name: &str) -> Option<Value> {
    match (value, name) {
        (Value::Str(s), "upper") => {
            let s = s.clone();
            Some(Value::Routine(
                Routine::function("upper").build(move |_| Ok(Value::Str(s.to_uppercase()))),
            ))
        }
        (Value::Str(s), "lower") => {
            let s = s.clone();
            Some(Value::Routine(
                Routine::function("lower").build(move |_| Ok(Value::Str(s.to_lowercase()))),
            ))
        }
        (Value::Str(s), "strip") => {
            let s = s.clone();
            Some(Value::Routine(
                Routine::function("strip").build(move |_| Ok(Value::Str(s.trim().to_string()))),
            ))
        }
        (Value::Str(s), "count") => {
            let s = s.clone();
            Some(Value::Routine(
                Routine::function("count").param("text").build(move |args| {
                    let needle = match args.value("text") {
                        Value::Str(t) => t.clone(),
                        other => other.to_string(),
                    };
                    if needle.is_empty() {
                        anyhow::bail!("cannot count an empty string");
                    }
                    Ok(Value::Int(s.matches(&needle).count() as i64))
                }),
            ))
        }
        (Value::List(items), "count") => {
            let items = items.clone();
            Some(Value::Routine(
                Routine::function("count").param("item").build(move |args| {
                    let item = args.value("item");
                    Ok(Value::Int(
                        items.iter().filter(|v| *v == item).count() as i64
                    ))
                }),
            ))
        }
        (Value::List(items), "index") => {
            let items = items.clone();
            Some(Value::Routine(
                Routine::function("index").param("item").build(move |args| {
                    let item = args.value("item");
                    items
                        .iter()
                        .position(|v| v == item)
                        .map(|i| Value::Int(i as i64))
                        .ok_or_else(|| anyhow::anyhow!("{item} is not in the list"))
                }),
            ))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_precedence() {
        assert_eq!(
            Value::Routine(Routine::function("f").build(|_| Ok(Value::Unit))).category(),
            Category::Callable
        );
        assert_eq!(Value::Map(vec![]).category(), Category::Mapping);
        assert_eq!(Value::List(vec![]).category(), Category::Sequence);
        assert_eq!(Value::from(Object::new("x")).category(), Category::Object);
        assert_eq!(Value::Int(1).category(), Category::Primitive);
    }

    #[test]
    fn test_list_indexing_with_negatives() {
        let list = Value::List(vec![
            Value::from("zero"),
            Value::from("one"),
            Value::from("two"),
            Value::from("three"),
        ]);
        assert_eq!(list.access("2"), Some(Value::from("two")));
        assert_eq!(list.access("-1"), Some(Value::from("three")));
        assert_eq!(list.access("7"), None);
    }

    #[test]
    fn test_map_key_lookup_is_raw_first() {
        let map = Value::Map(vec![
            ("echo".to_string(), Value::from("E")),
            ("has-dash".to_string(), Value::from(1)),
        ]);
        assert_eq!(map.access("echo"), Some(Value::from("E")));
        assert_eq!(map.access("has_dash"), Some(Value::from(1)));
        assert_eq!(map.access("missing"), None);
    }

    #[test]
    fn test_object_member_hyphen_equivalence() {
        let obj = Object::new("Underscores").member("underscore_example", "fish fingers");
        assert_eq!(
            obj.get("underscore-example"),
            Some(&Value::from("fish fingers"))
        );
        assert_eq!(
            obj.get("underscore_example"),
            Some(&Value::from("fish fingers"))
        );
    }

    #[test]
    fn test_string_builtin_members() {
        let value = Value::from("Echo");
        let lower = value.access("lower").expect("builtin present");
        match lower {
            Value::Routine(r) => {
                assert_eq!(
                    r.invoke(&crate::routine::CallArgs::default()).unwrap(),
                    Value::from("echo")
                );
            }
            other => panic!("expected routine, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_list_count_builtin() {
        let list = Value::List(vec![Value::from("alex"), Value::from("bethany")]);
        let count = list.access("count").expect("builtin present");
        let Value::Routine(routine) = count else {
            panic!("expected routine");
        };
        let args = crate::routine::CallArgs::new(
            vec![("item".to_string(), Value::from("bethany"))],
            vec![],
            vec![],
        );
        assert_eq!(routine.invoke(&args).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(Value::Int(10).to_string(), "10");
        assert_eq!(Value::Float(8.2).to_string(), "8.2");
        assert_eq!(Value::Float(10.0).to_string(), "10.0");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::from("ab")]).to_string(),
            "[1, \"ab\"]"
        );
        assert_eq!(
            Value::Map(vec![("name".to_string(), Value::from("David"))]).to_string(),
            "{name: \"David\"}"
        );
    }
}
