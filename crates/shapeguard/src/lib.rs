//! # shapeguard
//!
//! Chainable runtime schema validation for dynamically typed values.
//!
//! Schemas are built from named constructors and refined by chaining
//! modifiers. Validating a value returns the list of messages the schema
//! produced; an empty list means the value is valid.
//!
//! ## Quick Start
//!
//! ```rust
//! use shapeguard::prelude::*;
//! use serde_json::json;
//!
//! let user = object(
//!     Shape::new()
//!         .field("id", number().integer().positive())
//!         .field("email", string().email())
//!         .field("nickname", string().max(20).optional()),
//! );
//!
//! let errors = validate_json(&user, &json!({"id": 7, "email": "bob"}));
//! assert_eq!(errors, vec!["key \"email\" should be a valid email"]);
//! ```
//!
//! ## Schema kinds
//!
//! - **Primitives**: [`boolean`], [`string`], [`number`], [`date`]
//! - **Structures**: [`object`], [`array`], [`tuple`]
//! - **Combinators**: [`one_of`], [`any_of`], [`all_of`], [`not`]
//! - **Wrappers**: `.optional()` and `.nullable()` on any schema
//!
//! Every schema exports its constraints as a [`Descriptor`] through
//! [`export_metadata`].

mod error;

pub use error::ValidationError;

// Re-export core functionality
pub use shapeguard_core::{
    all_of, any_of, not, one_of, ArraySchema, AsSchema, BooleanSchema, DateBound, DateSchema,
    Describe, Descriptor, Map, NumberSchema, ObjectSchema, Refine, Result, Rule, RuleChain,
    Schema, SchemaError, Shape, StringSchema, Validator, Value,
};

/// A boolean schema.
pub fn boolean() -> BooleanSchema {
    BooleanSchema::new()
}

/// A string schema.
pub fn string() -> StringSchema {
    StringSchema::new()
}

/// A number schema. `NaN` is never a valid number.
pub fn number() -> NumberSchema {
    NumberSchema::new()
}

/// A date schema, accepting [`Value::Date`].
pub fn date() -> DateSchema {
    DateSchema::new()
}

/// An object schema over the given shape. Unknown keys are rejected unless
/// the schema is made [`loose`](ObjectSchema::loose).
pub fn object(shape: Shape) -> ObjectSchema {
    ObjectSchema::new(shape)
}

/// A homogeneous array schema.
pub fn array(item: impl AsSchema) -> ArraySchema {
    ArraySchema::of(item)
}

/// A positional array schema: one schema per index, fixed length.
pub fn tuple<S: AsSchema>(items: impl IntoIterator<Item = S>) -> ArraySchema {
    ArraySchema::tuple(items)
}

/// Validate `value` against `schema`.
///
/// Returns the ordered list of failure messages; empty means valid.
pub fn validate(schema: &impl AsSchema, value: &Value) -> Vec<String> {
    let schema = schema.as_schema();
    let errors = schema.evaluate(value);
    tracing::debug!(
        schema = schema.type_name(),
        errors = errors.len(),
        "validated value"
    );
    errors
}

/// Validate a JSON document. JSON has no `undefined`, so absent object keys
/// are the only way a value can be missing.
pub fn validate_json(schema: &impl AsSchema, json: &serde_json::Value) -> Vec<String> {
    validate(schema, &Value::from(json.clone()))
}

/// Validate `value`, turning failure messages into a [`ValidationError`].
pub fn check(schema: &impl AsSchema, value: &Value) -> std::result::Result<(), ValidationError> {
    let errors = validate(schema, value);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}

/// The schema's introspection descriptor, with nested children expanded.
pub fn export_metadata(schema: &impl AsSchema) -> Descriptor {
    schema.as_schema().export()
}

/// Prelude module - import everything you need with `use shapeguard::prelude::*`
pub mod prelude {
    pub use crate::{
        all_of, any_of, array, boolean, check, date, export_metadata, not, number, object,
        one_of, string, tuple, validate, validate_json, ValidationError,
    };
    pub use shapeguard_core::{
        AsSchema, Describe, Descriptor, Refine, Schema, SchemaError, Shape, Validator, Value,
    };
}
