//! Keyed structural validation.

use crate::descriptor::Descriptor;
use crate::schema::{AsSchema, Kind, Node, Refine, Schema};
use crate::value::{Map, Value};
use serde_json::Value as Json;
use std::sync::Arc;

/// Ordered mapping from property name to child schema.
///
/// Declaration order decides which missing key is reported first.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    fields: Vec<(String, Schema)>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property. Redeclaring a name replaces its schema in place.
    pub fn field(mut self, name: impl Into<String>, schema: impl AsSchema) -> Self {
        let name = name.into();
        let schema = schema.to_schema();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = schema,
            None => self.fields.push((name, schema)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, schema)| schema)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.fields.iter().map(|(key, schema)| (key.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, S> FromIterator<(K, S)> for Shape
where
    K: Into<String>,
    S: AsSchema,
{
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Shape::new(), |shape, (key, schema)| shape.field(key, schema))
    }
}

pub(crate) struct ObjectKind {
    shape: Arc<Shape>,
    loose: bool,
}

/// A present key holds anything but `Undefined`.
fn lookup<'a>(map: &'a Map, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_undefined())
}

impl Node for ObjectKind {
    fn evaluate(&self, schema: &Schema, value: &Value) -> Vec<String> {
        let Some(map) = value.as_object() else {
            return vec!["not an object".to_string()];
        };

        for (key, child) in self.shape.iter() {
            if lookup(map, key).is_none() && !child.is_optional() {
                tracing::trace!(key, "required key missing");
                return vec![format!("key \"{key}\" not found")];
            }
        }

        if !self.loose && map.keys().any(|key| !self.shape.contains_key(key)) {
            tracing::trace!("input carries keys outside the shape");
            return vec!["unknown keys not allowed".to_string()];
        }

        for (key, child) in self.shape.iter() {
            let Some(item) = lookup(map, key) else {
                continue;
            };
            let errors = child.evaluate(item);
            if !errors.is_empty() {
                tracing::trace!(key, "nested value rejected");
                return errors
                    .into_iter()
                    .map(|message| format!("key \"{key}\" {message}"))
                    .collect();
            }
        }

        schema.run_chain(value)
    }

    fn export(&self, schema: &Schema) -> Descriptor {
        let mut descriptor = schema.descriptor();
        let shape: serde_json::Map<String, Json> = self
            .shape
            .iter()
            .map(|(key, child)| (key.to_string(), child.export().into_json()))
            .collect();
        let required: Vec<Json> = self
            .shape
            .iter()
            .filter(|(_, child)| !child.is_optional())
            .map(|(key, _)| Json::from(key))
            .collect();
        descriptor.insert("shape", Json::Object(shape));
        descriptor.insert("required", Json::Array(required));
        descriptor
    }
}

/// Schema for keyed objects with a fixed shape.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    schema: Schema,
    shape: Arc<Shape>,
}

impl ObjectSchema {
    pub fn new(shape: Shape) -> Self {
        let mut descriptor = Descriptor::new("object");
        descriptor.insert("additionalProperties", false);
        Self::build(Arc::new(shape), false, descriptor)
    }

    fn build(shape: Arc<Shape>, loose: bool, descriptor: Descriptor) -> Self {
        let kind = ObjectKind {
            shape: Arc::clone(&shape),
            loose,
        };
        Self {
            schema: Schema::from_parts("object", Kind::Object(kind), descriptor),
            shape,
        }
    }

    /// A new object schema over the same shape that tolerates unknown keys.
    ///
    /// The descriptor is copied; rules added with [`Refine::test`] are not.
    pub fn loose(&self) -> Self {
        let mut descriptor = self.schema.descriptor();
        descriptor.insert("additionalProperties", true);
        Self::build(Arc::clone(&self.shape), true, descriptor)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn is_loose(&self) -> bool {
        matches!(self.schema.kind(), Kind::Object(kind) if kind.loose)
    }
}

impl AsSchema for ObjectSchema {
    fn as_schema(&self) -> &Schema {
        &self.schema
    }
}

impl Refine for ObjectSchema {}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        object.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;
    use crate::schema::{Describe, Validator};
    use serde_json::json;

    fn int() -> Schema {
        Schema::primitive("number").add_rule(Rule::new(
            |v| v.as_f64().is_some_and(|n| n.fract() == 0.0),
            "shall be an integer",
        ))
    }

    fn text() -> Schema {
        Schema::primitive("string").add_rule(Rule::new(|v| v.as_str().is_some(), "not a string"))
    }

    fn user() -> ObjectSchema {
        ObjectSchema::new(Shape::new().field("id", int()).field("name", text()))
    }

    fn input(json: Json) -> Value {
        Value::from(json)
    }

    #[test]
    fn rejects_non_objects() {
        for value in [Value::Null, Value::from(1), input(json!([1]))] {
            assert_eq!(user().evaluate(&value), vec!["not an object"]);
        }
    }

    #[test]
    fn reports_first_missing_key_in_shape_order() {
        assert_eq!(
            user().evaluate(&input(json!({"id": 2}))),
            vec!["key \"name\" not found"]
        );
        assert_eq!(user().evaluate(&input(json!({}))), vec!["key \"id\" not found"]);
    }

    #[test]
    fn missing_check_precedes_nested_errors() {
        assert_eq!(
            user().evaluate(&input(json!({"id": 2.5}))),
            vec!["key \"name\" not found"]
        );
    }

    #[test]
    fn optional_keys_may_be_absent() {
        let schema = ObjectSchema::new(Shape::new().field("id", int()).field("note", text().optional()));
        assert!(schema.evaluate(&input(json!({"id": 1}))).is_empty());
        assert_eq!(
            schema.evaluate(&input(json!({"id": 1, "note": 5}))),
            vec!["key \"note\" not a string"]
        );
    }

    #[test]
    fn unknown_keys_rejected_unless_loose() {
        let strict = user();
        let value = input(json!({"id": 1, "name": "a", "extra": true}));
        assert_eq!(strict.evaluate(&value), vec!["unknown keys not allowed"]);

        let loose = strict.loose();
        assert!(loose.is_loose());
        assert!(!strict.is_loose());
        assert!(loose.evaluate(&value).is_empty());
    }

    #[test]
    fn unknown_key_check_precedes_nested_errors() {
        let value = input(json!({"id": 1.5, "name": "a", "extra": true}));
        assert_eq!(user().evaluate(&value), vec!["unknown keys not allowed"]);
    }

    #[test]
    fn nested_errors_are_prefixed_and_stop_at_first_key() {
        let value = input(json!({"id": 3.21, "name": 7}));
        assert_eq!(user().evaluate(&value), vec!["key \"id\" shall be an integer"]);
    }

    #[test]
    fn custom_rules_run_after_keys() {
        let schema = user().test(
            |v| v.as_object().is_some_and(|m| m.len() == 2),
            "custom rule",
        );
        assert!(schema.evaluate(&input(json!({"id": 1, "name": "a"}))).is_empty());
        // Loose copies do not inherit custom rules.
        let loose = schema.loose();
        assert!(loose.evaluate(&input(json!({"id": 1, "name": "a", "x": 1}))).is_empty());
    }

    #[test]
    fn export_nests_children() {
        let schema = ObjectSchema::new(
            Shape::new()
                .field("id", int().description("identifier"))
                .field("note", text().optional()),
        );
        let d = schema.export();
        assert_eq!(d.get("type"), Some(&json!("object")));
        assert_eq!(d.get("additionalProperties"), Some(&json!(false)));
        assert_eq!(d.get("required"), Some(&json!(["id"])));
        assert_eq!(
            d.get("shape").and_then(|s| s.get("id")),
            Some(&json!({"type": "number", "description": "identifier"}))
        );
        assert_eq!(
            d.get("shape").and_then(|s| s.get("note")).and_then(|n| n.get("optional")),
            Some(&json!(true))
        );
    }

    #[test]
    fn shape_redeclaration_replaces_in_place() {
        let shape = Shape::new().field("a", int()).field("b", text()).field("a", text());
        let keys: Vec<&str> = shape.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(shape.get("a").map(Schema::type_name), Some("string"));
    }

    #[test]
    fn shape_from_iterator() {
        let shape: Shape = [("x", int()), ("y", int())].into_iter().collect();
        assert_eq!(shape.len(), 2);
        assert!(shape.contains_key("y"));
    }
}
