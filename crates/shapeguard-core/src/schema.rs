//! The schema handle and the builder traits shared by every schema kind.

use crate::array::ArrayKind;
use crate::combinator::Combinator;
use crate::descriptor::{fragment, Descriptor};
use crate::object::ObjectKind;
use crate::rule::{Rule, RuleChain};
use crate::value::Value;
use crate::wrapper::Wrapper;
use serde_json::{json, Value as Json};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Mutable per-instance state. Rules and descriptor are updated together by
/// each chain call but are otherwise independent stores.
#[derive(Debug)]
pub(crate) struct State {
    pub(crate) chain: RuleChain,
    pub(crate) descriptor: Descriptor,
}

/// Evaluate + export capability implemented by every schema kind.
pub(crate) trait Node: Send + Sync {
    fn evaluate(&self, schema: &Schema, value: &Value) -> Vec<String>;

    fn export(&self, schema: &Schema) -> Descriptor {
        schema.descriptor()
    }
}

/// Leaf schemas: the rule chain is the whole story.
struct Primitive;

impl Node for Primitive {
    fn evaluate(&self, schema: &Schema, value: &Value) -> Vec<String> {
        schema.run_chain(value)
    }
}

pub(crate) enum Kind {
    Primitive,
    Object(ObjectKind),
    Array(ArrayKind),
    Combinator(Combinator),
    Wrapper(Wrapper),
}

impl Kind {
    fn node(&self) -> &dyn Node {
        match self {
            Kind::Primitive => &Primitive,
            Kind::Object(kind) => kind,
            Kind::Array(kind) => kind,
            Kind::Combinator(kind) => kind,
            Kind::Wrapper(kind) => kind,
        }
    }
}

struct SchemaInner {
    type_name: String,
    kind: Kind,
    state: RwLock<State>,
}

/// A shared, mutable schema instance.
///
/// `Schema` is a handle: cloning it yields another reference to the same
/// instance, and chain calls on any handle are visible through all of them.
/// A schema embedded in an object shape and chained afterwards validates
/// with the later rules as well.
#[derive(Clone)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

impl Schema {
    pub(crate) fn from_parts(type_name: impl Into<String>, kind: Kind, descriptor: Descriptor) -> Self {
        Self {
            inner: Arc::new(SchemaInner {
                type_name: type_name.into(),
                kind,
                state: RwLock::new(State {
                    chain: RuleChain::new(),
                    descriptor,
                }),
            }),
        }
    }

    /// Create an empty leaf schema with a free-form type tag.
    ///
    /// The descriptor starts as `{"type": <type_name>}` and the rule chain
    /// is empty, so every value passes until rules are added.
    pub fn primitive(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let descriptor = Descriptor::new(&type_name);
        Self::from_parts(type_name, Kind::Primitive, descriptor)
    }

    /// The schema's type tag, e.g. `"string"`, `"object"`, `"oneOf"`.
    pub fn type_name(&self) -> &str {
        &self.inner.type_name
    }

    /// Append a rule and return the same schema.
    pub fn add_rule(self, rule: Rule) -> Self {
        self.write().chain.push(rule);
        self
    }

    /// Shallow-merge a descriptor fragment and return the same schema.
    pub fn merge_descriptor(self, fragment: impl IntoIterator<Item = (String, Json)>) -> Self {
        self.write().descriptor.merge(fragment);
        self
    }

    /// Validate a value. An empty list means the value conforms.
    pub fn evaluate(&self, value: &Value) -> Vec<String> {
        self.inner.kind.node().evaluate(self, value)
    }

    /// Export the accumulated descriptor, with children nested for
    /// structural schemas and combinators.
    pub fn export(&self) -> Descriptor {
        self.inner.kind.node().export(self)
    }

    /// Snapshot of this instance's own descriptor, without nested children.
    pub fn descriptor(&self) -> Descriptor {
        self.read().descriptor.clone()
    }

    /// Number of rules in this instance's chain.
    pub fn rule_count(&self) -> usize {
        self.read().chain.len()
    }

    /// Whether an object shape may omit this schema's key. Looks through
    /// nullable wrappers.
    pub fn is_optional(&self) -> bool {
        match &self.inner.kind {
            Kind::Wrapper(wrapper) => wrapper.is_optional(),
            _ => false,
        }
    }

    /// Whether two handles point at the same instance.
    pub fn ptr_eq(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    pub(crate) fn run_chain(&self, value: &Value) -> Vec<String> {
        self.read().chain.evaluate(value)
    }

    /// Push a rule and record its descriptor fact under one lock.
    pub(crate) fn constrain(&self, rule: Rule, fragment: Vec<(String, Json)>) {
        let mut state = self.write();
        state.chain.push(rule);
        state.descriptor.merge(fragment);
    }

    pub(crate) fn annotate(&self, fragment: Vec<(String, Json)>) {
        self.write().descriptor.merge(fragment);
    }

    pub(crate) fn override_last_message(&self, message: String) {
        if !self.write().chain.override_last(message) {
            tracing::debug!(schema = %self.type_name(), "no rule to attach a custom message to");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type", &self.inner.type_name)
            .field("rules", &self.rule_count())
            .finish_non_exhaustive()
    }
}

/// Access to the underlying [`Schema`] handle of a typed builder.
pub trait AsSchema {
    fn as_schema(&self) -> &Schema;

    /// Clone the underlying handle.
    fn to_schema(&self) -> Schema {
        self.as_schema().clone()
    }
}

impl AsSchema for Schema {
    fn as_schema(&self) -> &Schema {
        self
    }
}

/// The evaluate + export interface, available on every schema and builder.
pub trait Validator {
    fn evaluate(&self, value: &Value) -> Vec<String>;

    fn export(&self) -> Descriptor;

    fn is_valid(&self, value: &Value) -> bool {
        self.evaluate(value).is_empty()
    }
}

impl<T: AsSchema> Validator for T {
    fn evaluate(&self, value: &Value) -> Vec<String> {
        self.as_schema().evaluate(value)
    }

    fn export(&self) -> Descriptor {
        self.as_schema().export()
    }
}

/// Documentation modifiers and the optional/nullable wrappers.
///
/// Descriptor modifiers mutate the receiver; `optional` and `nullable`
/// allocate a new wrapping schema.
pub trait Describe: AsSchema + Sized {
    fn name(self, name: impl Into<String>) -> Self {
        self.as_schema().annotate(fragment([("name", Json::String(name.into()))]));
        self
    }

    fn description(self, description: impl Into<String>) -> Self {
        self.as_schema()
            .annotate(fragment([("description", Json::String(description.into()))]));
        self
    }

    fn example(self, example: impl Into<Json>) -> Self {
        self.as_schema().annotate(fragment([("example", example.into())]));
        self
    }

    fn default_value(self, default: impl Into<Json>) -> Self {
        self.as_schema().annotate(fragment([("default", default.into())]));
        self
    }

    fn deprecated(self) -> Self {
        self.as_schema().annotate(fragment([("deprecated", Json::Bool(true))]));
        self
    }

    fn read_only(self) -> Self {
        self.as_schema().annotate(fragment([("readOnly", Json::Bool(true))]));
        self
    }

    fn write_only(self) -> Self {
        self.as_schema().annotate(fragment([("writeOnly", Json::Bool(true))]));
        self
    }

    fn external_docs(self, url: impl Into<String>, description: impl Into<String>) -> Self {
        let docs = json!({ "url": url.into(), "description": description.into() });
        self.as_schema().annotate(fragment([("externalDocs", docs)]));
        self
    }

    /// Wrap into a schema that also accepts `Undefined`.
    fn optional(self) -> Schema {
        Wrapper::optional(self.to_schema())
    }

    /// Wrap into a schema that also accepts `Null`.
    fn nullable(self) -> Schema {
        Wrapper::nullable(self.to_schema())
    }
}

impl<T: AsSchema> Describe for T {}

/// Custom rules for schemas evaluated through a rule chain.
pub trait Refine: AsSchema + Sized {
    /// Append a custom rule.
    fn test<P>(self, predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.as_schema()
            .constrain(Rule::new(predicate, message), Vec::new());
        self
    }

    /// Replace the message of the most recently added rule.
    fn with_message(self, message: impl Into<String>) -> Self {
        self.as_schema().override_last_message(message.into());
        self
    }
}
