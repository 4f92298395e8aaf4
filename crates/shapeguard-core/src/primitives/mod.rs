//! Leaf schemas built on the rule chain.
//!
//! Every primitive starts with a type-check rule; each constraint modifier
//! pushes one more rule and records the matching descriptor fact.

use crate::descriptor::fragment;
use crate::rule::Rule;
use crate::schema::Schema;
use crate::value::Value;
use serde_json::{json, Value as Json};

/// Wires a newtype over [`Schema`] into the builder traits.
macro_rules! impl_builder {
    ($builder:ident) => {
        impl $crate::schema::AsSchema for $builder {
            fn as_schema(&self) -> &$crate::schema::Schema {
                &self.0
            }
        }

        impl $crate::schema::Refine for $builder {}

        impl Default for $builder {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<$builder> for $crate::schema::Schema {
            fn from(builder: $builder) -> Self {
                builder.0
            }
        }
    };
}

mod boolean;
mod date;
mod number;
mod string;

pub use boolean::BooleanSchema;
pub use date::{DateBound, DateSchema};
pub use number::NumberSchema;
pub use string::StringSchema;

fn render(values: &[Value]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_json(values: &[Value]) -> Json {
    Json::Array(values.iter().map(Value::to_json).collect())
}

/// Accept only the listed values.
pub(crate) fn allow(schema: &Schema, values: Vec<Value>, verb: &str) {
    let message = format!("{verb} be one of: {}", render(&values));
    let listed = to_json(&values);
    schema.constrain(
        Rule::new(move |v| values.iter().any(|a| a.same_value(v)), message),
        fragment([("enum", listed)]),
    );
}

/// Reject the listed values.
pub(crate) fn deny(schema: &Schema, values: Vec<Value>, verb: &str) {
    let message = format!("{verb} not be one of: {}", render(&values));
    let listed = to_json(&values);
    schema.constrain(
        Rule::new(move |v| !values.iter().any(|d| d.same_value(v)), message),
        fragment([("not", json!({ "enum": listed }))]),
    );
}
