//! Dynamic record model for the merged catalog datasets.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};


/// One coerced cell value. Numbers compare via `total_cmp`, so the type is
/// `Eq`/`Ord` and can be used directly as a sort or bucket key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Canonical string form, used as the bucket key and for set membership.
    /// Whole numbers render without a decimal point so a re-parsed key
    /// coerces back to the same value.
    pub fn render_key(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Scalar::Text(s) => s.clone(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Scalar::Bool(_) => 0,
            Scalar::Number(_) => 1,
            Scalar::Text(_) => 2,
        }
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
            (Scalar::Number(a), Scalar::Number(b)) => a.total_cmp(b),
            (Scalar::Text(a), Scalar::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scalar {}


/// A field holds either one scalar or the ordered sequence produced by
/// multivalue splitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(Scalar),
    Many(Vec<Scalar>),
}

impl FieldValue {
    /// Uniform slice view over one or many values.
    pub fn scalars(&self) -> &[Scalar] {
        match self {
            FieldValue::Single(s) => std::slice::from_ref(s),
            FieldValue::Many(v) => v.as_slice(),
        }
    }
}


/// One merged catalog entry. Immutable once ingested; a reload swaps the
/// whole record set rather than mutating records in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Record {
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// All values of a field; an absent field is the empty slice.
    pub fn values(&self, field: &str) -> &[Scalar] {
        self.fields.get(field).map(FieldValue::scalars).unwrap_or(&[])
    }

    pub fn first(&self, field: &str) -> Option<&Scalar> {
        self.values(field).first()
    }

    /// The record's merge key rendered as a string, if present.
    pub fn key_string(&self, key_field: &str) -> Option<String> {
        self.first(key_field).map(Scalar::render_key)
    }
}
