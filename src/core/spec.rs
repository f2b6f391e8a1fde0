//! Resolution descriptors: how a property obtains its value.

use crate::data::{Expression, Transform};
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;

/// The single active resolution mode of a property.
///
/// Being a sum type, a spec can never carry more than one of a literal
/// value, a field reference and an expression.
#[derive(Clone)]
pub enum SpecMode<T> {
    Value(T),
    Field(String),
    Expr(Rc<dyn Expression>),
}

impl<T: fmt::Debug> fmt::Debug for SpecMode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecMode::Value(v) => f.debug_tuple("Value").field(v).finish(),
            SpecMode::Field(name) => f.debug_tuple("Field").field(name).finish(),
            SpecMode::Expr(expr) => f.debug_tuple("Expr").field(&expr.name()).finish(),
        }
    }
}

/// Resolution mode plus an optional post-resolution transform
#[derive(Clone, Debug)]
pub struct Spec<T> {
    pub mode: SpecMode<T>,
    pub transform: Option<Rc<dyn Transform>>,
}

impl<T> Spec<T> {
    pub fn value(value: T) -> Self {
        Self {
            mode: SpecMode::Value(value),
            transform: None,
        }
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self {
            mode: SpecMode::Field(name.into()),
            transform: None,
        }
    }

    pub fn expr(expr: Rc<dyn Expression>) -> Self {
        Self {
            mode: SpecMode::Expr(expr),
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: Rc<dyn Transform>) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn as_value(&self) -> Option<&T> {
        match &self.mode {
            SpecMode::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&str> {
        match &self.mode {
            SpecMode::Field(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self.mode, SpecMode::Value(_))
    }
}

/// Keys that mark a JSON object as a spec rather than a literal
pub(crate) const SPEC_KEYS: &[&str] = &["value", "field", "expr", "transform", "units"];

/// A spec object parsed from JSON, before its value is typed
#[derive(Debug, PartialEq)]
pub(crate) enum RawSpec {
    Value(Value),
    Field(String),
}

/// Split a JSON assignment into a raw spec and an optional `units` entry.
///
/// Objects with none of [`SPEC_KEYS`] are literal values. Spec objects must
/// carry exactly one of `value`, `field` and `expr`; expressions and
/// transforms cannot be given as JSON.
pub(crate) fn parse_spec_json(value: &Value) -> Result<(RawSpec, Option<Value>), ()> {
    let Value::Object(map) = value else {
        return Ok((RawSpec::Value(value.clone()), None));
    };
    if !SPEC_KEYS.iter().any(|k| map.contains_key(*k)) {
        return Ok((RawSpec::Value(value.clone()), None));
    }
    parse_spec_object(map)
}

fn parse_spec_object(map: &Map<String, Value>) -> Result<(RawSpec, Option<Value>), ()> {
    let present = ["value", "field", "expr"]
        .iter()
        .filter(|k| map.contains_key(**k))
        .count();
    if present != 1 || map.contains_key("expr") || map.contains_key("transform") {
        return Err(());
    }
    if map.keys().any(|k| !SPEC_KEYS.contains(&k.as_str())) {
        return Err(());
    }
    let units = map.get("units").cloned();
    let raw = match (map.get("value"), map.get("field")) {
        (Some(v), None) => RawSpec::Value(v.clone()),
        (None, Some(Value::String(name))) => RawSpec::Field(name.clone()),
        _ => return Err(()),
    };
    Ok((raw, units))
}
