//! Rack/module/page/parameter types
//!
//! These are value snapshots handed out by a [`ParameterModel`](crate::ParameterModel).
//! The surface runtime caches them for the lifetime of a page activation and
//! refreshes them from change notifications.
//!
//! Each parameter kind knows how to scale a normalized control position
//! (0.0-1.0) into its own value space, how to order two of its values, and
//! how to format a value for a 21-character screen line:
//! - Float: linear between min and max
//! - Int: linear, rounded to whole steps
//! - Pct: 0.0 to 100.0
//! - Boolean: 0.0 / 1.0, switching at the midpoint
//! - Enum: one of a fixed list of labels, ordered by list position

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identifier of a rack, module, page or parameter
pub type EntityId = String;

/// Origin of a parameter mutation
///
/// Every committed change carries one of these so that consumers can tell
/// their own writes apart from changes made elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeSource {
    /// This device's own hardware
    Local,
    /// A network peer, identified by its address
    Remote(String),
    /// A preset being applied
    Preset,
    /// A MIDI CC routed through the CC mapping table
    Midi,
}

impl ChangeSource {
    /// Check if the change came from this device's hardware
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }
}

impl fmt::Display for ChangeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote(peer) => write!(f, "remote:{}", peer),
            Self::Preset => write!(f, "preset"),
            Self::Midi => write!(f, "midi"),
        }
    }
}

/// A parameter value: numeric or textual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Float(f32),
    Text(String),
}

impl ParamValue {
    /// Get the numeric value, if this is a float
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Get the text value, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Float(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Parameter type, which determines scaling, ordering and formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamKind {
    /// Continuous value between min and max
    Float { min: f32, max: f32 },
    /// Whole-numbered value between min and max
    Int { min: i32, max: i32 },
    /// Percentage, 0 to 100
    Pct,
    /// On/off switch
    Boolean,
    /// One of a fixed list of labels
    Enum { values: Vec<String> },
}

impl ParamKind {
    /// Scale a normalized control position (0.0-1.0) into this kind's values
    ///
    /// Out-of-range and NaN inputs are clamped to the nearest end.
    pub fn calc_float(&self, normalized: f32) -> ParamValue {
        let n = if normalized.is_nan() {
            0.0
        } else {
            normalized.clamp(0.0, 1.0)
        };

        match self {
            Self::Float { min, max } => ParamValue::Float(min + n * (max - min)),
            Self::Int { min, max } => {
                let span = (*max - *min) as f32;
                ParamValue::Float((*min as f32 + n * span).round())
            }
            Self::Pct => ParamValue::Float(n * 100.0),
            Self::Boolean => ParamValue::Float(if n > 0.5 { 1.0 } else { 0.0 }),
            Self::Enum { values } => {
                if values.is_empty() {
                    return ParamValue::Text(String::new());
                }
                let idx = ((n * values.len() as f32) as usize).min(values.len() - 1);
                ParamValue::Text(values[idx].clone())
            }
        }
    }

    /// Clamp a value into this kind's range
    ///
    /// Returns `None` when the value has the wrong shape (text for a numeric
    /// kind, a number for an enum) or names an unknown enum label.
    pub fn clamp(&self, value: ParamValue) -> Option<ParamValue> {
        match (self, value) {
            (Self::Float { min, max }, ParamValue::Float(v)) if !v.is_nan() => {
                Some(ParamValue::Float(v.max(*min).min(*max)))
            }
            (Self::Int { min, max }, ParamValue::Float(v)) if !v.is_nan() => {
                Some(ParamValue::Float(v.round().max(*min as f32).min(*max as f32)))
            }
            (Self::Pct, ParamValue::Float(v)) if !v.is_nan() => {
                Some(ParamValue::Float(v.clamp(0.0, 100.0)))
            }
            (Self::Boolean, ParamValue::Float(v)) if !v.is_nan() => {
                Some(ParamValue::Float(if v > 0.5 { 1.0 } else { 0.0 }))
            }
            (Self::Enum { values }, ParamValue::Text(s)) if values.contains(&s) => {
                Some(ParamValue::Text(s))
            }
            _ => None,
        }
    }

    /// Order two values of this kind
    ///
    /// Numeric kinds compare numerically (exact equality, no tolerance).
    /// Enum values compare by their position in the label list. Values
    /// that cannot be compared return `None`.
    pub fn compare(&self, a: &ParamValue, b: &ParamValue) -> Option<Ordering> {
        match (self, a, b) {
            (Self::Enum { values }, ParamValue::Text(a), ParamValue::Text(b)) => {
                let pa = values.iter().position(|v| v == a)?;
                let pb = values.iter().position(|v| v == b)?;
                Some(pa.cmp(&pb))
            }
            (_, ParamValue::Float(a), ParamValue::Float(b)) => a.partial_cmp(b),
            _ => None,
        }
    }

    /// Format a value for display
    pub fn format(&self, value: &ParamValue) -> String {
        match (self, value) {
            (_, ParamValue::Text(s)) => s.clone(),
            (Self::Int { .. }, ParamValue::Float(v)) => format!("{}", v.round() as i64),
            (Self::Pct, ParamValue::Float(v)) => format!("{:.1}", v),
            (Self::Boolean, ParamValue::Float(v)) => {
                if *v > 0.5 { "on".to_string() } else { "off".to_string() }
            }
            (_, ParamValue::Float(v)) => {
                let magnitude = v.abs();
                if magnitude >= 100.0 {
                    format!("{:.0}", v)
                } else if magnitude >= 10.0 {
                    format!("{:.1}", v)
                } else {
                    format!("{:.2}", v)
                }
            }
        }
    }

    /// Unit shown when a parameter doesn't declare one
    pub fn default_unit(&self) -> &'static str {
        match self {
            Self::Pct => "%",
            _ => "",
        }
    }

    /// Initial value for a freshly created parameter
    pub fn default_value(&self) -> ParamValue {
        match self {
            Self::Float { min, .. } => ParamValue::Float(*min),
            Self::Int { min, .. } => ParamValue::Float(*min as f32),
            Self::Pct | Self::Boolean => ParamValue::Float(0.0),
            Self::Enum { values } => {
                ParamValue::Text(values.first().cloned().unwrap_or_default())
            }
        }
    }
}

/// A single parameter of a module
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub id: EntityId,
    pub display_name: String,
    pub unit: String,
    pub kind: ParamKind,
    /// Current value, used for display and for pot lock comparisons
    pub current: ParamValue,
}

impl Parameter {
    /// Create a parameter at its kind's default value
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, kind: ParamKind) -> Self {
        let unit = kind.default_unit().to_string();
        let current = kind.default_value();
        Self {
            id: id.into(),
            display_name: display_name.into(),
            unit,
            kind,
            current,
        }
    }

    /// Set the display unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Set the initial value (ignored if not valid for the kind)
    pub fn with_value(mut self, value: impl Into<ParamValue>) -> Self {
        if let Some(v) = self.kind.clamp(value.into()) {
            self.current = v;
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn display_unit(&self) -> &str {
        &self.unit
    }

    pub fn current(&self) -> &ParamValue {
        &self.current
    }

    /// Current value formatted for the screen
    pub fn display_value(&self) -> String {
        self.kind.format(&self.current)
    }

    /// Scale a normalized control position into this parameter's values
    pub fn calc_float(&self, normalized: f32) -> ParamValue {
        self.kind.calc_float(normalized)
    }

    /// Order two values of this parameter
    pub fn compare(&self, a: &ParamValue, b: &ParamValue) -> Option<Ordering> {
        self.kind.compare(a, b)
    }
}

/// A page: an ordered group of parameters sized to the physical pots
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: EntityId,
    pub display_name: String,
    pub param_ids: Vec<EntityId>,
}

impl Page {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, param_ids: &[&str]) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            param_ids: param_ids.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// A module: a named unit owning pages of parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub id: EntityId,
    pub display_name: String,
    pub module_type: String,
    pub pages: Vec<Page>,
}

/// Notification of a committed parameter mutation
#[derive(Debug, Clone, PartialEq)]
pub struct ParamChange {
    pub source: ChangeSource,
    pub rack_id: EntityId,
    pub module_id: EntityId,
    /// Parameter state after the change
    pub parameter: Parameter,
}
