//! Callable components and their parameter specifications
//!
//! Rust has no runtime reflection, so parameter names, kinds, and defaults
//! come in through this registration surface: the embedder describes each
//! callable with a [`RoutineBuilder`] and supplies a native closure that
//! receives the bound arguments as [`CallArgs`].

use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// How a parameter can be bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Bindable positionally or by flag name
    Positional,
    /// Bindable by flag name only
    NamedOnly,
    /// Absorbs all remaining positional tokens in the window
    VarPositional,
    /// Absorbs flags that match no declared parameter
    VarNamed,
}

/// One parameter descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub default: Option<Value>,
}

impl Param {
    /// A parameter is required when it has no default and is not variadic
    pub fn is_required(&self) -> bool {
        self.default.is_none()
            && matches!(self.kind, ParamKind::Positional | ParamKind::NamedOnly)
    }
}

/// Whether invoking the routine runs a function or produces an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineKind {
    Function,
    Constructor,
}

type NativeFn = Rc<dyn Fn(&CallArgs) -> anyhow::Result<Value>>;

/// A callable component: name, parameter spec, and native closure.
///
/// The closure is an opaque blocking call from the engine's perspective;
/// an embedder wrapping async work drives it to completion inside.
#[derive(Clone)]
pub struct Routine {
    name: String,
    kind: RoutineKind,
    params: Vec<Param>,
    func: NativeFn,
}

impl Routine {
    /// Start describing a plain function
    pub fn function(name: impl Into<String>) -> RoutineBuilder {
        RoutineBuilder::new(name, RoutineKind::Function)
    }

    /// Start describing a constructor; constructors bind named flags only
    /// and pass every other token through to the produced instance
    pub fn constructor(name: impl Into<String>) -> RoutineBuilder {
        RoutineBuilder::new(name, RoutineKind::Constructor)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RoutineKind {
        self.kind
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == RoutineKind::Constructor
    }

    /// Parameter descriptors in declaration order
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Declared (non-variadic) parameters in declaration order
    pub fn named_params(&self) -> impl Iterator<Item = &Param> {
        self.params
            .iter()
            .filter(|p| matches!(p.kind, ParamKind::Positional | ParamKind::NamedOnly))
    }

    pub fn var_positional(&self) -> Option<&Param> {
        self.params.iter().find(|p| p.kind == ParamKind::VarPositional)
    }

    pub fn var_named(&self) -> Option<&Param> {
        self.params.iter().find(|p| p.kind == ParamKind::VarNamed)
    }

    /// Execute the native closure with bound arguments.
    ///
    /// Errors returned here are target errors: the engine propagates them
    /// unmodified instead of formatting them into a trace report.
    pub fn invoke(&self, args: &CallArgs) -> anyhow::Result<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routine")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Routine {
    fn eq(&self, other: &Self) -> bool {
        // Closures have no useful identity; compare declared signatures.
        self.name == other.name && self.kind == other.kind && self.params == other.params
    }
}

/// Builder for [`Routine`] parameter specifications
pub struct RoutineBuilder {
    name: String,
    kind: RoutineKind,
    params: Vec<Param>,
}

impl RoutineBuilder {
    fn new(name: impl Into<String>, kind: RoutineKind) -> Self {
        Self {
            name: name.into(),
            kind,
            params: Vec::new(),
        }
    }

    /// Add a required positional-or-named parameter
    pub fn param(self, name: &str) -> Self {
        self.push(name, ParamKind::Positional, None)
    }

    /// Add a positional-or-named parameter with a default
    pub fn param_default(self, name: &str, default: impl Into<Value>) -> Self {
        self.push(name, ParamKind::Positional, Some(default.into()))
    }

    /// Add a required named-only parameter
    pub fn named_only(self, name: &str) -> Self {
        self.push(name, ParamKind::NamedOnly, None)
    }

    /// Add a named-only parameter with a default
    pub fn named_only_default(self, name: &str, default: impl Into<Value>) -> Self {
        self.push(name, ParamKind::NamedOnly, Some(default.into()))
    }

    /// Add the variadic positional parameter
    pub fn var_positional(self, name: &str) -> Self {
        self.push(name, ParamKind::VarPositional, None)
    }

    /// Add the variadic named parameter
    pub fn var_named(self, name: &str) -> Self {
        self.push(name, ParamKind::VarNamed, None)
    }

    /// Attach the native closure and validate the parameter spec.
    ///
    /// Panics on a malformed spec (duplicate names, repeated or non-trailing
    /// variadics); that is a programming error in the registration, not a
    /// runtime condition.
    pub fn build(self, func: impl Fn(&CallArgs) -> anyhow::Result<Value> + 'static) -> Routine {
        let mut seen = Vec::new();
        let mut saw_variadic = false;
        for param in &self.params {
            assert!(
                !seen.contains(&param.name),
                "duplicate parameter `{}` on routine `{}`",
                param.name,
                self.name
            );
            seen.push(param.name.clone());
            match param.kind {
                ParamKind::Positional | ParamKind::NamedOnly => {
                    assert!(
                        !saw_variadic,
                        "parameter `{}` on routine `{}` declared after a variadic",
                        param.name, self.name
                    );
                }
                ParamKind::VarPositional | ParamKind::VarNamed => saw_variadic = true,
            }
        }
        assert!(
            self.params
                .iter()
                .filter(|p| p.kind == ParamKind::VarPositional)
                .count()
                <= 1
                && self
                    .params
                    .iter()
                    .filter(|p| p.kind == ParamKind::VarNamed)
                    .count()
                    <= 1,
            "routine `{}` declares more than one variadic of the same kind",
            self.name
        );

        Routine {
            name: self.name,
            kind: self.kind,
            params: self.params,
            func: Rc::new(func),
        }
    }

    fn push(mut self, name: &str, kind: ParamKind, default: Option<Value>) -> Self {
        self.params.push(Param {
            name: name.replace('-', "_"),
            kind,
            default,
        });
        self
    }
}

/// Arguments bound by the binder, handed to the native closure.
///
/// Every declared parameter is present in `bound` (defaults applied), so
/// closures read declared parameters with [`CallArgs::value`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    bound: Vec<(String, Value)>,
    varargs: Vec<Value>,
    kwargs: Vec<(String, Value)>,
}

impl CallArgs {
    pub fn new(
        bound: Vec<(String, Value)>,
        varargs: Vec<Value>,
        kwargs: Vec<(String, Value)>,
    ) -> Self {
        Self {
            bound,
            varargs,
            kwargs,
        }
    }

    /// Look up a declared parameter by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bound
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Read a declared parameter the binder guarantees to be present.
    ///
    /// Panics if `name` was never declared on the routine; that is a
    /// mismatch between the parameter spec and the closure, not input.
    pub fn value(&self, name: &str) -> &Value {
        self.get(name)
            .unwrap_or_else(|| panic!("parameter `{name}` is not declared on this routine"))
    }

    /// Tokens absorbed by the variadic positional parameter
    pub fn varargs(&self) -> &[Value] {
        &self.varargs
    }

    /// Flags absorbed by the variadic named parameter, in flag order
    pub fn kwargs(&self) -> &[(String, Value)] {
        &self.kwargs
    }
}
