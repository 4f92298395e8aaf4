//! Logical composition of schemas.
//!
//! Unlike rule chains, combinators evaluate every sub-schema on each call
//! and report all of their messages after a summary line.

use crate::descriptor::Descriptor;
use crate::schema::{AsSchema, Kind, Node, Schema};
use crate::value::Value;
use serde_json::Value as Json;

pub(crate) enum Combinator {
    OneOf(Vec<Schema>),
    AnyOf(Vec<Schema>),
    AllOf(Vec<Schema>),
    Not { base: Schema, excluded: Schema },
}

/// Evaluate every schema, keeping per-schema results in declaration order.
fn run_all(schemas: &[Schema], value: &Value) -> Vec<Vec<String>> {
    schemas.iter().map(|schema| schema.evaluate(value)).collect()
}

fn with_summary(summary: &str, results: Vec<Vec<String>>) -> Vec<String> {
    std::iter::once(summary.to_string())
        .chain(results.into_iter().flatten())
        .collect()
}

impl Node for Combinator {
    fn evaluate(&self, _schema: &Schema, value: &Value) -> Vec<String> {
        match self {
            Combinator::OneOf(schemas) => {
                let results = run_all(schemas, value);
                match results.iter().filter(|errors| errors.is_empty()).count() {
                    1 => Vec::new(),
                    0 => with_summary("none of the provided schemas is valid", results),
                    matched => {
                        tracing::trace!(matched, "oneOf matched several schemas");
                        with_summary("more than one schema is valid", results)
                    }
                }
            }
            Combinator::AnyOf(schemas) => {
                let results = run_all(schemas, value);
                if results.iter().any(Vec::is_empty) {
                    Vec::new()
                } else {
                    with_summary("all schemas are invalid", results)
                }
            }
            Combinator::AllOf(schemas) => {
                let results = run_all(schemas, value);
                if results.iter().all(Vec::is_empty) {
                    Vec::new()
                } else {
                    with_summary("some of the provided schemas are invalid", results)
                }
            }
            Combinator::Not { base, excluded } => {
                let base_errors = base.evaluate(value);
                let excluded_errors = excluded.evaluate(value);
                if !base_errors.is_empty() {
                    with_summary("base schema is invalid", vec![base_errors])
                } else if excluded_errors.is_empty() {
                    vec!["value must not match the excluded schema".to_string()]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn export(&self, schema: &Schema) -> Descriptor {
        let exported = |schemas: &[Schema]| {
            Json::Array(schemas.iter().map(|s| s.export().into_json()).collect())
        };
        let mut descriptor = schema.descriptor();
        match self {
            Combinator::OneOf(schemas) => descriptor.insert("oneOf", exported(schemas)),
            Combinator::AnyOf(schemas) => descriptor.insert("anyOf", exported(schemas)),
            Combinator::AllOf(schemas) => descriptor.insert("allOf", exported(schemas)),
            Combinator::Not { base, excluded } => {
                descriptor.insert("base", base.export().into_json());
                descriptor.insert("not", excluded.export().into_json());
            }
        }
        descriptor
    }
}

fn build(type_name: &str, combinator: Combinator) -> Schema {
    Schema::from_parts(type_name, Kind::Combinator(combinator), Descriptor::new(type_name))
}

fn collect<S: AsSchema>(schemas: impl IntoIterator<Item = S>) -> Vec<Schema> {
    schemas.into_iter().map(|schema| schema.to_schema()).collect()
}

/// Valid iff exactly one sub-schema accepts the value.
pub fn one_of<S: AsSchema>(schemas: impl IntoIterator<Item = S>) -> Schema {
    build("oneOf", Combinator::OneOf(collect(schemas)))
}

/// Valid iff at least one sub-schema accepts the value.
pub fn any_of<S: AsSchema>(schemas: impl IntoIterator<Item = S>) -> Schema {
    build("anyOf", Combinator::AnyOf(collect(schemas)))
}

/// Valid iff every sub-schema accepts the value.
pub fn all_of<S: AsSchema>(schemas: impl IntoIterator<Item = S>) -> Schema {
    build("allOf", Combinator::AllOf(collect(schemas)))
}

/// Valid iff `base` accepts the value and `excluded` rejects it.
pub fn not(base: impl AsSchema, excluded: impl AsSchema) -> Schema {
    build(
        "not",
        Combinator::Not {
            base: base.to_schema(),
            excluded: excluded.to_schema(),
        },
    )
}
