//! Ordered predicate + message rules.

use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
type MessageFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// A single validation rule: a pure predicate and the message reported when
/// it fails.
#[derive(Clone)]
pub struct Rule {
    predicate: Predicate,
    message: MessageFn,
}

impl Rule {
    /// Create a rule with a fixed message.
    pub fn new<P>(predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        Self {
            predicate: Arc::new(predicate),
            message: Arc::new(move |_| message.clone()),
        }
    }

    /// Create a rule whose message is rendered from the rejected value.
    pub fn with_message_fn<P, M>(predicate: P, message: M) -> Self
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
        M: Fn(&Value) -> String + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            message: Arc::new(message),
        }
    }

    /// Run the rule; `Err` carries the failure message.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        if (self.predicate)(value) {
            Ok(())
        } else {
            Err((self.message)(value))
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").finish_non_exhaustive()
    }
}

/// Rules in insertion order, evaluated short-circuit.
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    rules: Vec<Rule>,
}

impl RuleChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Replace the message of the most recently added rule. Returns `false`
    /// when the chain is empty.
    pub fn override_last(&mut self, message: impl Into<String>) -> bool {
        match self.rules.last_mut() {
            Some(rule) => {
                let message = message.into();
                rule.message = Arc::new(move |_| message.clone());
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate rules in order and stop at the first failure.
    ///
    /// Returns at most one message; an empty list means every rule passed.
    pub fn evaluate(&self, value: &Value) -> Vec<String> {
        self.rules
            .iter()
            .find_map(|rule| rule.check(value).err())
            .into_iter()
            .collect()
    }
}
