//! Named, validated, observable model attributes.

use crate::core::spec::{RawSpec, parse_spec_json};
use crate::core::{Kind, Signal, Spec, SpecMode};
use crate::data::{Expression, Transform};
use crate::error::{PlotError, PlotResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt;
use std::rc::Rc;

/// Anything a property can hold.
pub trait PropertyValue:
    Clone + fmt::Debug + Serialize + DeserializeOwned + PartialEq + 'static
{
}

impl<T> PropertyValue for T where
    T: Clone + fmt::Debug + Serialize + DeserializeOwned + PartialEq + 'static
{
}

/// Payload of a property's change signal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyChange {
    pub owner: &'static str,
    pub attr: String,
    pub version: u64,
}

/// A single attribute of a model.
pub struct Property<T: PropertyValue> {
    owner: &'static str,
    attr: String,
    kind: Kind,
    default: T,
    spec: Spec<T>,
    dirty: bool,
    internal: bool,
    optional: bool,
    vectorized: bool,
    version: u64,
    change: Signal<PropertyChange>,
}

impl<T: PropertyValue> Property<T> {
    pub fn new(owner: &'static str, attr: impl Into<String>, kind: Kind, default: T) -> Self {
        Self {
            owner,
            attr: attr.into(),
            kind,
            spec: Spec::value(default.clone()),
            default,
            dirty: false,
            internal: false,
            optional: false,
            vectorized: false,
            version: 0,
            change: Signal::new(),
        }
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub(crate) fn set_optional(&mut self, optional: bool) {
        self.optional = optional;
    }

    /// Allow field and expression specs; set by the vector spec wrappers
    pub(crate) fn set_vectorized(&mut self) {
        self.vectorized = true;
    }

    pub fn owner(&self) -> &'static str {
        self.owner
    }

    pub fn attr(&self) -> &str {
        &self.attr
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn spec(&self) -> &Spec<T> {
        &self.spec
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_internal(&self) -> bool {
        self.internal
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// True when the property resolves per row and may read a field
    pub fn is_vectorized(&self) -> bool {
        self.vectorized
    }

    /// Bumped on every mutation; resolved arrays are tagged with it
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check a value against the declared kind
    pub fn validate(&self, value: &T) -> PlotResult<()> {
        let json = serde_json::to_value(value)?;
        if self.kind.valid(&json) {
            Ok(())
        } else {
            Err(PlotError::validation(&self.attr, &json))
        }
    }

    /// The literal value; fails unless the spec is in value mode.
    pub fn value(&self) -> PlotResult<&T> {
        self.spec.as_value().ok_or_else(|| PlotError::InvalidState {
            attr: self.attr.clone(),
        })
    }

    /// True when the spec is a literal null (`None`, NaN numbers)
    pub fn is_null(&self) -> bool {
        self.spec
            .as_value()
            .and_then(|v| serde_json::to_value(v).ok())
            .is_some_and(|v| v.is_null())
    }

    pub fn set_value(&mut self, value: T) -> PlotResult<()> {
        self.validate(&value)?;
        self.replace_mode(SpecMode::Value(value));
        Ok(())
    }

    /// Read the named data source column; value-only properties refuse.
    pub fn set_field(&mut self, name: impl Into<String>) -> PlotResult<()> {
        let name = name.into();
        if !self.vectorized {
            return Err(PlotError::validation(&self.attr, &json!({ "field": name })));
        }
        self.replace_mode(SpecMode::Field(name));
        Ok(())
    }

    pub fn set_expr(&mut self, expr: Rc<dyn Expression>) -> PlotResult<()> {
        if !self.vectorized {
            return Err(PlotError::validation(&self.attr, &json!({ "expr": expr.name() })));
        }
        self.replace_mode(SpecMode::Expr(expr));
        Ok(())
    }

    pub fn set_transform(&mut self, transform: Option<Rc<dyn Transform>>) {
        self.spec.transform = transform;
        self.touch();
    }

    /// Replace the whole spec (mode and transform)
    pub fn set_spec(&mut self, spec: Spec<T>) -> PlotResult<()> {
        match spec.as_value() {
            Some(value) => self.validate(value)?,
            None if !self.vectorized => {
                return Err(PlotError::validation(&self.attr, &mode_json(&spec.mode)));
            }
            None => {}
        }
        self.spec = spec;
        self.touch();
        Ok(())
    }

    /// Return to the default value without marking the property dirty
    pub fn reset(&mut self) {
        self.spec = Spec::value(self.default.clone());
        self.dirty = false;
        self.version += 1;
        self.notify();
    }

    /// Assign from JSON: a literal, `{"value": ...}` or `{"field": ...}`
    pub fn set_json(&mut self, value: &Value) -> PlotResult<()> {
        let (raw, units) = parse_spec_json(value).map_err(|_| PlotError::validation(&self.attr, value))?;
        if units.is_some() {
            return Err(PlotError::validation(&self.attr, value));
        }
        self.apply_raw(raw)
    }

    pub(crate) fn apply_raw(&mut self, raw: RawSpec) -> PlotResult<()> {
        match raw {
            RawSpec::Value(json) => {
                if !self.kind.valid(&json) {
                    return Err(PlotError::validation(&self.attr, &json));
                }
                let value: T = serde_json::from_value(json.clone())
                    .map_err(|_| PlotError::validation(&self.attr, &json))?;
                self.replace_mode(SpecMode::Value(value));
            }
            RawSpec::Field(name) => self.set_field(name)?,
        }
        Ok(())
    }

    /// The active spec as JSON
    pub fn spec_json(&self) -> Value {
        let mut spec = mode_json(&self.spec.mode);
        if let (Some(transform), Value::Object(map)) = (&self.spec.transform, &mut spec) {
            map.insert("transform".into(), Value::String(transform.name().to_string()));
        }
        spec
    }

    pub fn on_change(&mut self, slot: impl Fn(&PropertyChange) + 'static) {
        self.change.connect(slot);
    }

    pub fn change(&self) -> &Signal<PropertyChange> {
        &self.change
    }

    pub(crate) fn replace_mode(&mut self, mode: SpecMode<T>) {
        self.spec.mode = mode;
        self.touch();
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.version += 1;
        self.notify();
    }

    fn notify(&self) {
        self.change.emit(&PropertyChange {
            owner: self.owner,
            attr: self.attr.clone(),
            version: self.version,
        });
    }
}

fn mode_json<T: Serialize>(mode: &SpecMode<T>) -> Value {
    match mode {
        SpecMode::Value(v) => json!({ "value": serde_json::to_value(v).unwrap_or(Value::Null) }),
        SpecMode::Field(name) => json!({ "field": name }),
        SpecMode::Expr(expr) => json!({ "expr": expr.name() }),
    }
}

impl<T: PropertyValue> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("attr", &self.attr)
            .field("spec", &self.spec)
            .field("dirty", &self.dirty)
            .finish()
    }
}

/// Type-erased access to a property, for dynamic (document) updates.
pub trait AnyProperty {
    fn attr(&self) -> &str;
    fn kind(&self) -> Kind;
    fn is_dirty(&self) -> bool;
    fn set_json(&mut self, value: &Value) -> PlotResult<()>;
    fn spec_json(&self) -> Value;
}

impl<T: PropertyValue> AnyProperty for Property<T> {
    fn attr(&self) -> &str {
        Property::attr(self)
    }

    fn kind(&self) -> Kind {
        Property::kind(self)
    }

    fn is_dirty(&self) -> bool {
        Property::is_dirty(self)
    }

    fn set_json(&mut self, value: &Value) -> PlotResult<()> {
        Property::set_json(self, value)
    }

    fn spec_json(&self) -> Value {
        Property::spec_json(self)
    }
}
