use crate::descriptor::fragment;
use crate::error::{Result, SchemaError};
use crate::rule::Rule;
use crate::schema::Schema;
use crate::value::Value;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde_json::Value as Json;

/// Anything usable as a date range bound.
pub trait DateBound {
    fn to_datetime(&self) -> Result<DateTime<Utc>>;
}

impl DateBound for DateTime<Utc> {
    fn to_datetime(&self) -> Result<DateTime<Utc>> {
        Ok(*self)
    }
}

impl DateBound for NaiveDate {
    fn to_datetime(&self) -> Result<DateTime<Utc>> {
        self.and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .ok_or_else(|| SchemaError::invalid_configuration(format!("invalid date bound {self}")))
    }
}

/// RFC 3339 timestamps or plain `YYYY-MM-DD` dates.
impl DateBound for str {
    fn to_datetime(&self) -> Result<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(self) {
            return Ok(parsed.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(self, "%Y-%m-%d")
            .map_err(|err| {
                SchemaError::invalid_configuration(format!("invalid date bound `{self}`: {err}"))
            })?
            .to_datetime()
    }
}

impl DateBound for &str {
    fn to_datetime(&self) -> Result<DateTime<Utc>> {
        (**self).to_datetime()
    }
}

impl DateBound for String {
    fn to_datetime(&self) -> Result<DateTime<Utc>> {
        self.as_str().to_datetime()
    }
}

fn iso(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn date_of(value: &Value) -> Option<&DateTime<Utc>> {
    match value {
        Value::Date(date) => Some(date),
        _ => None,
    }
}

/// Points in time, held as [`Value::Date`].
#[derive(Debug, Clone)]
pub struct DateSchema(Schema);

impl_builder!(DateSchema);

impl DateSchema {
    pub fn new() -> Self {
        let schema = Schema::primitive("date").merge_descriptor(fragment([(
            "format",
            Json::from("date-time"),
        )]));
        schema.constrain(
            Rule::with_message_fn(
                |v| date_of(v).is_some(),
                |v| format!("{v} is not a valid date"),
            ),
            Vec::new(),
        );
        Self(schema)
    }

    /// Reject dates before `bound`.
    pub fn min(self, bound: impl DateBound) -> Result<Self> {
        let min = bound.to_datetime()?;
        let iso = iso(&min);
        self.0.constrain(
            Rule::new(
                move |v| date_of(v).is_some_and(|d| *d >= min),
                format!("shall not be earlier than {iso}"),
            ),
            fragment([("minimum", Json::from(iso))]),
        );
        Ok(self)
    }

    /// Reject dates after `bound`.
    pub fn max(self, bound: impl DateBound) -> Result<Self> {
        let max = bound.to_datetime()?;
        let iso = iso(&max);
        self.0.constrain(
            Rule::new(
                move |v| date_of(v).is_some_and(|d| *d <= max),
                format!("shall not be later than {iso}"),
            ),
            fragment([("maximum", Json::from(iso))]),
        );
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Validator;
    use serde_json::json;

    fn at(ymd: &str) -> Value {
        Value::from(ymd.to_datetime().unwrap())
    }

    #[test]
    fn type_check_renders_value() {
        let schema = DateSchema::new();
        assert!(schema.evaluate(&at("2024-02-29")).is_empty());
        assert_eq!(
            schema.evaluate(&Value::from("2024-02-29")),
            vec!["2024-02-29 is not a valid date"]
        );
        assert_eq!(schema.evaluate(&Value::Null), vec!["null is not a valid date"]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let schema = DateSchema::new()
            .min("2020-01-01")
            .unwrap()
            .max("2020-12-31T23:59:59Z")
            .unwrap();
        assert!(schema.evaluate(&at("2020-01-01")).is_empty());
        assert_eq!(
            schema.evaluate(&at("2019-12-31")),
            vec!["shall not be earlier than 2020-01-01T00:00:00.000Z"]
        );
        assert_eq!(
            schema.evaluate(&at("2021-01-01")),
            vec!["shall not be later than 2020-12-31T23:59:59.000Z"]
        );
    }

    #[test]
    fn unparsable_bound_is_a_configuration_error() {
        let err = DateSchema::new().min("yesterday").unwrap_err();
        assert_eq!(err.code(), "bad_request");
        assert!(err.message().contains("yesterday"));
        assert!(DateSchema::new().max(String::from("2020-13-01")).is_err());
    }

    #[test]
    fn descriptor_records_format_and_bounds() {
        let bound = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let d = DateSchema::new().min(bound).unwrap().export();
        assert_eq!(
            d.into_json(),
            json!({"type": "date", "format": "date-time", "minimum": "2000-01-01T00:00:00.000Z"})
        );
    }
}
