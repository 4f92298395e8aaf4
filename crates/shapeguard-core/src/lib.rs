//! # shapeguard core
//!
//! Runtime schema validation for dynamically typed values. A schema is built
//! by chaining modifier calls and then evaluated against a candidate
//! [`Value`], producing an ordered list of error messages. An empty list
//! means the value is valid.
//!
//! ## Example
//!
//! ```rust
//! use shapeguard_core::{ArraySchema, NumberSchema, Validator, Value};
//!
//! let ids = ArraySchema::of(NumberSchema::new().integer()).min(2).unique();
//!
//! let input = Value::from(serde_json::json!([1, 1]));
//! assert_eq!(ids.evaluate(&input), vec!["duplicates not allowed"]);
//! ```
//!
//! ## Evaluation
//!
//! - Primitive schemas run their rule chain and stop at the first failure.
//! - Objects and arrays check structure first, delegate to their children,
//!   then run their own chain.
//! - Combinators evaluate every child and report all messages after a
//!   summary line.
//!
//! Every schema also exports a [`Descriptor`], a flat JSON-like map of the
//! constraints it enforces. Descriptors are for introspection only and never
//! influence validation.

mod array;
mod combinator;
mod descriptor;
mod error;
mod object;
mod primitives;
mod rule;
mod schema;
mod value;
mod wrapper;


pub use array::ArraySchema;
pub use combinator::{all_of, any_of, not, one_of};
pub use descriptor::Descriptor;
pub use error::{Result, SchemaError};
pub use object::{ObjectSchema, Shape};
pub use primitives::{BooleanSchema, DateBound, DateSchema, NumberSchema, StringSchema};
pub use rule::{Rule, RuleChain};
pub use schema::{AsSchema, Describe, Refine, Schema, Validator};
pub use value::{Map, Value};
