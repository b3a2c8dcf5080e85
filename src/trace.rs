//! The resolution audit trail
//!
//! Every resolution owns exactly one [`Trace`]: an append-only sequence of
//! steps consumed afterwards by the reporter. Elements are immutable once
//! appended.

use serde::{Deserialize, Serialize};

/// The kind of one resolution step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    /// The root component, before any token was consumed
    InitialComponent,
    /// A member, key, or index was accessed on the current component
    AccessedMember,
    /// A routine was executed with bound arguments
    CalledRoutine,
    /// A constructor was executed, producing an instance
    InstantiatedClass,
    /// A completion script was requested instead of further resolution
    CompletionRequested,
    /// Resolution stopped on an error
    Error,
}

/// One recorded resolution step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceElement {
    /// What happened at this step
    pub kind: StepKind,
    /// Display name of the member or routine involved
    pub target: String,
    /// How many tokens this step consumed
    pub consumed: usize,
    /// Short summary of the resulting value
    pub summary: String,
}

/// Ordered record of resolution steps for one command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    name: String,
    elements: Vec<TraceElement>,
}

impl Trace {
    /// Create an empty trace for the CLI named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    /// The display name the trace was created with
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All recorded steps, in order
    pub fn elements(&self) -> &[TraceElement] {
        &self.elements
    }

    /// Record the root component
    pub fn initial(&mut self, summary: impl Into<String>) {
        self.push(StepKind::InitialComponent, "", 0, summary);
    }

    /// Record a member/key/index access
    pub fn accessed(&mut self, member: impl Into<String>, summary: impl Into<String>) {
        self.push(StepKind::AccessedMember, member, 1, summary);
    }

    /// Record a routine call
    pub fn called(
        &mut self,
        routine: impl Into<String>,
        consumed: usize,
        summary: impl Into<String>,
    ) {
        self.push(StepKind::CalledRoutine, routine, consumed, summary);
    }

    /// Record a constructor call
    pub fn instantiated(
        &mut self,
        class: impl Into<String>,
        consumed: usize,
        summary: impl Into<String>,
    ) {
        self.push(StepKind::InstantiatedClass, class, consumed, summary);
    }

    /// Record a completion-script request
    pub fn completion_requested(&mut self) {
        self.push(StepKind::CompletionRequested, "", 0, "completion script");
    }

    /// Record the error that stopped resolution
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.push(StepKind::Error, "", 0, message);
    }

    /// The command path so far: the CLI name followed by each accessed or
    /// called target, used for synopsis usage lines.
    pub fn command_path(&self) -> String {
        let mut path = self.name.clone();
        for element in &self.elements {
            if element.kind == StepKind::AccessedMember {
                path.push(' ');
                path.push_str(&element.target);
            }
        }
        path
    }

    fn push(
        &mut self,
        kind: StepKind,
        target: impl Into<String>,
        consumed: usize,
        summary: impl Into<String>,
    ) {
        self.elements.push(TraceElement {
            kind,
            target: target.into(),
            consumed,
            summary: summary.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_append_in_order() {
        let mut trace = Trace::new("calc");
        trace.initial("object calc");
        trace.accessed("double", "routine double");
        trace.called("double", 1, "int: 10");

        let kinds: Vec<StepKind> = trace.elements().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::InitialComponent,
                StepKind::AccessedMember,
                StepKind::CalledRoutine,
            ]
        );
    }

    #[test]
    fn test_command_path_follows_accesses() {
        let mut trace = Trace::new("calc");
        trace.initial("object calc");
        trace.accessed("stats", "object stats");
        trace.accessed("count", "routine count");
        assert_eq!(trace.command_path(), "calc stats count");
    }
}
