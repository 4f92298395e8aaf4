use super::{allow, deny};
use crate::descriptor::fragment;
use crate::error::{Result, SchemaError};
use crate::rule::Rule;
use crate::schema::Schema;
use crate::value::{format_number, number_to_json, Value};
use serde_json::Value as Json;

/// Numbers. `NaN` is rejected by the type check.
#[derive(Debug, Clone)]
pub struct NumberSchema(Schema);

impl_builder!(NumberSchema);

impl NumberSchema {
    pub fn new() -> Self {
        let schema = Schema::primitive("number");
        schema.constrain(
            Rule::with_message_fn(
                |v| matches!(v, Value::Number(n) if !n.is_nan()),
                |v| format!("{v} is not a valid integer number"),
            ),
            Vec::new(),
        );
        Self(schema)
    }

    fn bound<P>(self, predicate: P, message: String, key: &str, value: Json) -> Self
    where
        P: Fn(f64) -> bool + Send + Sync + 'static,
    {
        self.0.constrain(
            Rule::new(move |v| v.as_f64().is_some_and(&predicate), message),
            fragment([(key, value)]),
        );
        self
    }

    pub fn integer(self) -> Self {
        self.bound(
            |n| n.is_finite() && n.fract() == 0.0,
            "shall be an integer".to_string(),
            "type",
            Json::from("integer"),
        )
    }

    pub fn gt(self, limit: f64) -> Self {
        self.bound(
            move |n| n > limit,
            format!("shall be greater than {}", format_number(limit)),
            "exclusiveMinimum",
            number_to_json(limit),
        )
    }

    pub fn gte(self, limit: f64) -> Self {
        self.bound(
            move |n| n >= limit,
            format!("shall be greater than or equal to {}", format_number(limit)),
            "minimum",
            number_to_json(limit),
        )
    }

    pub fn lt(self, limit: f64) -> Self {
        self.bound(
            move |n| n < limit,
            format!("shall be less than {}", format_number(limit)),
            "exclusiveMaximum",
            number_to_json(limit),
        )
    }

    pub fn lte(self, limit: f64) -> Self {
        self.bound(
            move |n| n <= limit,
            format!("shall be less than or equal to {}", format_number(limit)),
            "maximum",
            number_to_json(limit),
        )
    }

    /// Alias of [`gte`](Self::gte).
    pub fn min(self, limit: f64) -> Self {
        self.gte(limit)
    }

    /// Alias of [`lte`](Self::lte).
    pub fn max(self, limit: f64) -> Self {
        self.lte(limit)
    }

    pub fn positive(self) -> Self {
        self.bound(
            |n| n > 0.0,
            "shall be positive".to_string(),
            "exclusiveMinimum",
            Json::from(0),
        )
    }

    pub fn negative(self) -> Self {
        self.bound(
            |n| n < 0.0,
            "shall be negative".to_string(),
            "exclusiveMaximum",
            Json::from(0),
        )
    }

    /// Require a multiple of `step`, which must be finite and positive.
    pub fn multiple_of(self, step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(SchemaError::invalid_configuration(format!(
                "multiple_of expects a finite positive step, got {}",
                format_number(step)
            )));
        }
        Ok(self.bound(
            move |n| {
                let quotient = n / step;
                (quotient - quotient.round()).abs() < 1e-9
            },
            format!("shall be a multiple of {}", format_number(step)),
            "multipleOf",
            number_to_json(step),
        ))
    }

    pub fn valid(self, values: impl IntoIterator<Item = f64>) -> Self {
        allow(&self.0, values.into_iter().map(Value::Number).collect(), "shall");
        self
    }

    pub fn invalid(self, values: impl IntoIterator<Item = f64>) -> Self {
        deny(&self.0, values.into_iter().map(Value::Number).collect(), "shall");
        self
    }
}
