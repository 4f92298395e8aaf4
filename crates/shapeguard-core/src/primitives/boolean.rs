use crate::descriptor::fragment;
use crate::rule::Rule;
use crate::schema::Schema;
use crate::value::Value;
use serde_json::json;

#[derive(Debug, Clone)]
pub struct BooleanSchema(Schema);

impl_builder!(BooleanSchema);

impl BooleanSchema {
    pub fn new() -> Self {
        let schema = Schema::primitive("boolean");
        schema.constrain(
            Rule::with_message_fn(
                |v| matches!(v, Value::Bool(_)),
                |v| format!("type {} is not a boolean", v.type_of()),
            ),
            Vec::new(),
        );
        Self(schema)
    }

    /// Accept only `true`.
    pub fn truthy(self) -> Self {
        self.0.constrain(
            Rule::new(|v| matches!(v, Value::Bool(true)), "shall be true"),
            fragment([("enum", json!([true]))]),
        );
        self
    }

    /// Accept only `false`.
    pub fn falsy(self) -> Self {
        self.0.constrain(
            Rule::new(|v| matches!(v, Value::Bool(false)), "shall be false"),
            fragment([("enum", json!([false]))]),
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Validator;

    #[test]
    fn type_check() {
        let schema = BooleanSchema::new();
        assert!(schema.evaluate(&Value::from(false)).is_empty());
        assert_eq!(schema.evaluate(&Value::from(1)), vec!["type number is not a boolean"]);
        assert_eq!(schema.evaluate(&Value::from("true")), vec!["type string is not a boolean"]);
    }

    #[test]
    fn truthy_and_falsy() {
        assert_eq!(
            BooleanSchema::new().truthy().evaluate(&Value::from(false)),
            vec!["shall be true"]
        );
        assert_eq!(
            BooleanSchema::new().falsy().evaluate(&Value::from(true)),
            vec!["shall be false"]
        );
        assert_eq!(
            BooleanSchema::new().truthy().export().get("enum"),
            Some(&json!([true]))
        );
    }
}
