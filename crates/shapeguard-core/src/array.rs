//! Indexed structural validation: homogeneous arrays and tuples.

use crate::descriptor::{fragment, Descriptor};
use crate::rule::Rule;
use crate::schema::{AsSchema, Kind, Node, Refine, Schema};
use crate::value::Value;
use serde_json::Value as Json;
use std::sync::{PoisonError, RwLock};

const DUPLICATES: &str = "duplicates not allowed";
const NOT_ALLOWED: &str = "some of provided values are not allowed";

pub(crate) enum Items {
    /// One schema applied to every element.
    Each(Schema),
    /// One schema per position.
    Tuple(Vec<Schema>),
}

#[derive(Debug, Default)]
struct Constraints {
    unique: bool,
    allowed: Option<Vec<Value>>,
    denied: Option<Vec<Value>>,
}

pub(crate) struct ArrayKind {
    items: Items,
    constraints: RwLock<Constraints>,
}

fn has_duplicates(items: &[Value]) -> bool {
    items
        .iter()
        .enumerate()
        .any(|(i, item)| items[..i].iter().any(|seen| seen.same_value(item)))
}

fn contains(values: &[Value], item: &Value) -> bool {
    values.iter().any(|value| value.same_value(item))
}

impl ArrayKind {
    fn check_items(&self, items: &[Value]) -> Vec<String> {
        match &self.items {
            Items::Tuple(schemas) => {
                if items.len() != schemas.len() {
                    return vec!["invalid array length".to_string()];
                }
                schemas
                    .iter()
                    .zip(items)
                    .map(|(schema, item)| schema.evaluate(item))
                    .find(|errors| !errors.is_empty())
                    .unwrap_or_default()
            }
            Items::Each(schema) => items
                .iter()
                .map(|item| schema.evaluate(item))
                .find(|errors| !errors.is_empty())
                .unwrap_or_default(),
        }
    }

    fn check_constraints(&self, items: &[Value]) -> Option<&'static str> {
        let constraints = self
            .constraints
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        if constraints.unique && has_duplicates(items) {
            return Some(DUPLICATES);
        }
        if let Some(allowed) = &constraints.allowed {
            if items.iter().any(|item| !contains(allowed, item)) {
                return Some(NOT_ALLOWED);
            }
        }
        if let Some(denied) = &constraints.denied {
            if items.iter().any(|item| contains(denied, item)) {
                return Some(NOT_ALLOWED);
            }
        }
        None
    }
}

impl Node for ArrayKind {
    fn evaluate(&self, schema: &Schema, value: &Value) -> Vec<String> {
        let Some(items) = value.as_array() else {
            return vec![format!("{} is not an array", value.type_of())];
        };

        let errors = self.check_items(items);
        if !errors.is_empty() {
            tracing::trace!("array element rejected");
            return errors;
        }

        if let Some(message) = self.check_constraints(items) {
            tracing::trace!(reason = message, "array constraint violated");
            return vec![message.to_string()];
        }

        schema.run_chain(value)
    }

    fn export(&self, schema: &Schema) -> Descriptor {
        let mut descriptor = schema.descriptor();
        match &self.items {
            Items::Each(item) => descriptor.insert("items", item.export().into_json()),
            Items::Tuple(items) => descriptor.insert(
                "tuple",
                Json::Array(items.iter().map(|item| item.export().into_json()).collect()),
            ),
        }
        descriptor
    }
}

/// Schema for arrays, either homogeneous or positional (tuple mode).
#[derive(Debug, Clone)]
pub struct ArraySchema(Schema);

impl ArraySchema {
    /// Every element must satisfy `item`.
    pub fn of(item: impl AsSchema) -> Self {
        Self::build(Items::Each(item.to_schema()))
    }

    /// Element `i` must satisfy `items[i]`, and the length must match.
    pub fn tuple<S: AsSchema>(items: impl IntoIterator<Item = S>) -> Self {
        Self::build(Items::Tuple(
            items.into_iter().map(|item| item.to_schema()).collect(),
        ))
    }

    fn build(items: Items) -> Self {
        let kind = ArrayKind {
            items,
            constraints: RwLock::new(Constraints::default()),
        };
        Self(Schema::from_parts(
            "array",
            Kind::Array(kind),
            Descriptor::new("array"),
        ))
    }

    fn update(&self, apply: impl FnOnce(&mut Constraints)) {
        if let Kind::Array(kind) = self.0.kind() {
            apply(&mut kind.constraints.write().unwrap_or_else(PoisonError::into_inner));
        }
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self.0.kind(), Kind::Array(ArrayKind { items: Items::Tuple(_), .. }))
    }

    pub fn min(self, min: usize) -> Self {
        self.0.constrain(
            Rule::new(
                move |v| v.as_array().is_some_and(|a| a.len() >= min),
                format!("shall contain at least {min} items"),
            ),
            fragment([("minItems", Json::from(min))]),
        );
        self
    }

    pub fn max(self, max: usize) -> Self {
        self.0.constrain(
            Rule::new(
                move |v| v.as_array().is_some_and(|a| a.len() <= max),
                format!("shall contain at most {max} items"),
            ),
            fragment([("maxItems", Json::from(max))]),
        );
        self
    }

    pub fn length(self, length: usize) -> Self {
        self.0.constrain(
            Rule::new(
                move |v| v.as_array().is_some_and(|a| a.len() == length),
                format!("shall contain exactly {length} items"),
            ),
            fragment([
                ("minItems", Json::from(length)),
                ("maxItems", Json::from(length)),
            ]),
        );
        self
    }

    /// Reject arrays holding the same value twice. Composites compare by
    /// identity.
    pub fn unique(self) -> Self {
        self.update(|c| c.unique = true);
        self.0.constrain(
            Rule::new(
                |v| v.as_array().is_some_and(|a| !has_duplicates(a)),
                DUPLICATES,
            ),
            fragment([("uniqueItems", Json::Bool(true))]),
        );
        self
    }

    /// Every element must be one of `values`.
    pub fn valid<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let listed = Json::Array(values.iter().map(Value::to_json).collect());
        self.update(|c| c.allowed = Some(values));
        self.0.annotate(fragment([("enum", listed)]));
        self
    }

    /// No element may be one of `values`.
    pub fn invalid<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let listed = Json::Array(values.iter().map(Value::to_json).collect());
        self.update(|c| c.denied = Some(values));
        self.0
            .annotate(fragment([("not", serde_json::json!({ "enum": listed }))]));
        self
    }
}

impl AsSchema for ArraySchema {
    fn as_schema(&self) -> &Schema {
        &self.0
    }
}

impl Refine for ArraySchema {}

impl From<ArraySchema> for Schema {
    fn from(array: ArraySchema) -> Self {
        array.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Validator;
    use serde_json::json;

    fn number() -> Schema {
        Schema::primitive("number").add_rule(Rule::with_message_fn(
            |v| v.as_f64().is_some(),
            |v| format!("{v} is not a valid integer number"),
        ))
    }

    fn text() -> Schema {
        Schema::primitive("string").add_rule(Rule::with_message_fn(
            |v| v.as_str().is_some(),
            |v| format!("type {} is not a string", v.type_of()),
        ))
    }

    fn input(json: Json) -> Value {
        Value::from(json)
    }

    #[test]
    fn rejects_non_arrays_with_type_name() {
        let schema = ArraySchema::of(number());
        assert_eq!(schema.evaluate(&Value::from("x")), vec!["string is not an array"]);
        assert_eq!(schema.evaluate(&Value::Undefined), vec!["undefined is not an array"]);
        assert_eq!(schema.evaluate(&input(json!({}))), vec!["object is not an array"]);
    }

    #[test]
    fn homogeneous_reports_first_bad_element_unprefixed() {
        let schema = ArraySchema::of(number());
        assert!(schema.evaluate(&input(json!([]))).is_empty());
        assert_eq!(
            schema.evaluate(&input(json!([1, "a", true]))),
            vec!["a is not a valid integer number"]
        );
    }

    #[test]
    fn tuple_checks_length_then_positions() {
        let schema = ArraySchema::tuple([number(), text()]);
        assert!(schema.is_tuple());
        assert_eq!(schema.evaluate(&input(json!([1]))), vec!["invalid array length"]);
        assert_eq!(
            schema.evaluate(&input(json!([1, 2]))),
            vec!["type number is not a string"]
        );
        assert!(schema.evaluate(&input(json!([1, "x"]))).is_empty());
    }

    #[test]
    fn unique_precedes_count_rules() {
        let schema = ArraySchema::of(number()).min(2).unique();
        assert_eq!(schema.evaluate(&input(json!([1, 1]))), vec![DUPLICATES]);
        assert_eq!(
            schema.evaluate(&input(json!([1]))),
            vec!["shall contain at least 2 items"]
        );
        assert!(schema.evaluate(&input(json!([1, 2]))).is_empty());
    }

    #[test]
    fn composites_are_unique_by_identity() {
        let shared = input(json!({"a": 1}));
        let schema = ArraySchema::of(Schema::primitive("any")).unique();
        let distinct = Value::array([input(json!({"a": 1})), input(json!({"a": 1}))]);
        let same = Value::array([shared.clone(), shared]);
        assert!(schema.evaluate(&distinct).is_empty());
        assert_eq!(schema.evaluate(&same), vec![DUPLICATES]);
    }

    #[test]
    fn count_rules() {
        let max = ArraySchema::of(number()).max(1);
        assert_eq!(
            max.evaluate(&input(json!([1, 2]))),
            vec!["shall contain at most 1 items"]
        );
        let exact = ArraySchema::of(number()).length(2);
        assert_eq!(
            exact.evaluate(&input(json!([1]))),
            vec!["shall contain exactly 2 items"]
        );
    }

    #[test]
    fn allow_and_deny_lists() {
        let allowed = ArraySchema::of(number()).valid([1, 2]);
        assert!(allowed.evaluate(&input(json!([2, 1, 2]))).is_empty());
        assert_eq!(allowed.evaluate(&input(json!([3]))), vec![NOT_ALLOWED]);

        let denied = ArraySchema::of(number()).invalid([3]);
        assert!(denied.evaluate(&input(json!([1]))).is_empty());
        assert_eq!(denied.evaluate(&input(json!([1, 3]))), vec![NOT_ALLOWED]);
    }

    /// Records the field names of every event it sees.
    #[derive(Default)]
    struct FieldRecorder {
        fields: std::sync::Mutex<Vec<(String, String)>>,
    }

    impl tracing::field::Visit for &FieldRecorder {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            self.fields
                .lock()
                .unwrap()
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }

    struct Recording(std::sync::Arc<FieldRecorder>);

    impl tracing::Subscriber for Recording {
        fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
            true
        }
        fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }
        fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}
        fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}
        fn event(&self, event: &tracing::Event<'_>) {
            event.record(&mut &*self.0);
        }
        fn enter(&self, _: &tracing::span::Id) {}
        fn exit(&self, _: &tracing::span::Id) {}
    }

    #[test]
    fn constraint_trace_keeps_event_text_separate() {
        let recorder = std::sync::Arc::new(FieldRecorder::default());
        let schema = ArraySchema::of(number()).unique();
        tracing::subscriber::with_default(Recording(recorder.clone()), || {
            assert_eq!(schema.evaluate(&input(json!([2, 2]))), vec![DUPLICATES]);
        });

        let fields = recorder.fields.lock().unwrap();
        assert!(fields
            .iter()
            .any(|(name, value)| name == "reason" && value.contains(DUPLICATES)));
        assert!(fields
            .iter()
            .filter(|(name, _)| name == "message")
            .all(|(_, value)| value.contains("array constraint violated")));
    }

    #[test]
    fn export_nests_items_and_tuple() {
        let each = ArraySchema::of(number()).min(1).unique().export();
        assert_eq!(each.get("items"), Some(&json!({"type": "number"})));
        assert_eq!(each.get("minItems"), Some(&json!(1)));
        assert_eq!(each.get("uniqueItems"), Some(&json!(true)));

        let tuple = ArraySchema::tuple([number(), text()]).export();
        assert_eq!(
            tuple.get("tuple"),
            Some(&json!([{"type": "number"}, {"type": "string"}]))
        );
        assert!(tuple.get("items").is_none());
    }
}
