//! Optional and nullable decorators.

use crate::schema::{Kind, Node, Schema};
use crate::value::Value;
use serde_json::Value as Json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Accepts {
    Undefined,
    Null,
}

/// Accepts one extra "empty" value and otherwise delegates to `inner`.
///
/// Wrappers carry no rules of their own; evaluation is overridden entirely.
pub(crate) struct Wrapper {
    inner: Schema,
    accepts: Accepts,
}

impl Wrapper {
    pub(crate) fn optional(inner: Schema) -> Schema {
        Self::wrap(inner, Accepts::Undefined)
    }

    pub(crate) fn nullable(inner: Schema) -> Schema {
        Self::wrap(inner, Accepts::Null)
    }

    fn wrap(inner: Schema, accepts: Accepts) -> Schema {
        // Snapshot taken now; later chain calls on `inner` still affect
        // validation but not this descriptor.
        let mut descriptor = inner.export();
        let (type_name, flag) = match accepts {
            Accepts::Undefined => ("optional", "optional"),
            Accepts::Null => ("nullable", "nullable"),
        };
        descriptor.insert(flag, Json::Bool(true));
        Schema::from_parts(type_name, Kind::Wrapper(Wrapper { inner, accepts }), descriptor)
    }

    pub(crate) fn is_optional(&self) -> bool {
        match self.accepts {
            Accepts::Undefined => true,
            Accepts::Null => self.inner.is_optional(),
        }
    }
}

impl Node for Wrapper {
    fn evaluate(&self, _schema: &Schema, value: &Value) -> Vec<String> {
        let accepted = match self.accepts {
            Accepts::Undefined => value.is_undefined(),
            Accepts::Null => value.is_null(),
        };
        if accepted {
            Vec::new()
        } else {
            self.inner.evaluate(value)
        }
    }
}
