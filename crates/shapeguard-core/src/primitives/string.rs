use super::{allow, deny};
use crate::descriptor::fragment;
use crate::error::{Result, SchemaError};
use crate::rule::Rule;
use crate::schema::Schema;
use crate::value::Value;
use regex::Regex;
use serde_json::Value as Json;
use std::sync::OnceLock;

/// Built-in string formats, each checked against a lazily compiled pattern.
#[derive(Debug, Clone, Copy)]
enum Format {
    Email,
    Url,
}

impl Format {
    fn pattern(self) -> &'static str {
        match self {
            Format::Email => concat!(
                r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@",
                r"[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?",
                r"(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
            ),
            Format::Url => r"^(https?|ftp)://[^\s/$.?#].[^\s]*$",
        }
    }

    /// The descriptor `format` keyword.
    fn keyword(self) -> &'static str {
        match self {
            Format::Email => "email",
            Format::Url => "uri",
        }
    }

    fn message(self) -> &'static str {
        match self {
            Format::Email => "should be a valid email",
            Format::Url => "should be a valid url",
        }
    }

    fn matches(self, text: &str) -> bool {
        static COMPILED: [OnceLock<Option<Regex>>; 2] = [OnceLock::new(), OnceLock::new()];
        COMPILED[self as usize]
            .get_or_init(|| Regex::new(self.pattern()).ok())
            .as_ref()
            .is_some_and(|regex| regex.is_match(text))
    }
}

fn length(v: &Value) -> Option<usize> {
    v.as_str().map(|s| s.chars().count())
}

/// Strings. Lengths count Unicode scalar values.
#[derive(Debug, Clone)]
pub struct StringSchema(Schema);

impl_builder!(StringSchema);

impl StringSchema {
    pub fn new() -> Self {
        let schema = Schema::primitive("string");
        schema.constrain(
            Rule::with_message_fn(
                |v| v.as_str().is_some(),
                |v| format!("type {} is not a string", v.type_of()),
            ),
            Vec::new(),
        );
        Self(schema)
    }

    pub fn min(self, min: usize) -> Self {
        self.0.constrain(
            Rule::new(
                move |v| length(v).is_some_and(|len| len >= min),
                format!("should be longer than {} symbols", min as i64 - 1),
            ),
            fragment([("minLength", Json::from(min))]),
        );
        self
    }

    pub fn max(self, max: usize) -> Self {
        self.0.constrain(
            Rule::new(
                move |v| length(v).is_some_and(|len| len <= max),
                format!("should be shorter than {} symbols", max + 1),
            ),
            fragment([("maxLength", Json::from(max))]),
        );
        self
    }

    pub fn length(self, exact: usize) -> Self {
        self.0.constrain(
            Rule::new(
                move |v| length(v) == Some(exact),
                format!("should be exactly {exact} symbols long"),
            ),
            fragment([
                ("minLength", Json::from(exact)),
                ("maxLength", Json::from(exact)),
            ]),
        );
        self
    }

    pub fn not_empty(self) -> Self {
        self.0.constrain(
            Rule::new(
                |v| length(v).is_some_and(|len| len > 0),
                "should not be empty",
            ),
            fragment([("minLength", Json::from(1))]),
        );
        self
    }

    /// Require a regex match. An invalid pattern is a configuration error.
    pub fn pattern(self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|err| {
            SchemaError::invalid_configuration(format!("invalid pattern `{pattern}`: {err}"))
        })?;
        self.0.constrain(
            Rule::new(
                move |v| v.as_str().is_some_and(|s| regex.is_match(s)),
                format!("should match pattern {pattern}"),
            ),
            fragment([("pattern", Json::from(pattern))]),
        );
        Ok(self)
    }

    pub fn email(self) -> Self {
        self.format(Format::Email)
    }

    pub fn url(self) -> Self {
        self.format(Format::Url)
    }

    fn format(self, format: Format) -> Self {
        self.0.constrain(
            Rule::new(
                move |v| v.as_str().is_some_and(|s| format.matches(s)),
                format.message(),
            ),
            fragment([("format", Json::from(format.keyword()))]),
        );
        self
    }

    pub fn valid<S: Into<String>>(self, values: impl IntoIterator<Item = S>) -> Self {
        let values = values.into_iter().map(|s| Value::String(s.into())).collect();
        allow(&self.0, values, "should");
        self
    }

    pub fn invalid<S: Into<String>>(self, values: impl IntoIterator<Item = S>) -> Self {
        let values = values.into_iter().map(|s| Value::String(s.into())).collect();
        deny(&self.0, values, "should");
        self
    }
}
