//! Label schemas and canonical series keys.
//!
//! A [`LabelSchema`] is the ordered list of label names fixed per family.
//! A [`LabelKey`] is the owned, canonical tuple of label values for one series.
//! Lookups go through the [`LabelTuple`] view so that probing the series map
//! with a borrowed `&[&str]` never allocates; owned keys are built only when
//! a new series is inserted.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::{MetricsError, Result};

/// Ordered, positional view over a tuple of label values.
pub trait LabelTuple {
    fn arity(&self) -> usize;
    fn value(&self, idx: usize) -> &str;
}

impl LabelTuple for &[&str] {
    fn arity(&self) -> usize {
        self.len()
    }
    fn value(&self, idx: usize) -> &str {
        self[idx]
    }
}

fn hash_tuple<H: Hasher>(t: &dyn LabelTuple, state: &mut H) {
    state.write_usize(t.arity());
    for i in 0..t.arity() {
        t.value(i).hash(state);
    }
}

fn tuple_eq(a: &dyn LabelTuple, b: &dyn LabelTuple) -> bool {
    a.arity() == b.arity() && (0..a.arity()).all(|i| a.value(i) == b.value(i))
}

impl Hash for dyn LabelTuple + '_ {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_tuple(self, state);
    }
}

impl PartialEq for dyn LabelTuple + '_ {
    fn eq(&self, other: &Self) -> bool {
        tuple_eq(self, other)
    }
}

impl Eq for dyn LabelTuple + '_ {}

/// Owned label values of one series, in schema order.
/// Cloning is a reference-count bump.
#[derive(Clone)]
pub struct LabelKey(Arc<[Box<str>]>);

impl LabelKey {
    pub(crate) fn from_values(values: &[&str]) -> Self {
        Self(values.iter().map(|v| Box::<str>::from(*v)).collect())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|v| &**v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl LabelTuple for LabelKey {
    fn arity(&self) -> usize {
        self.0.len()
    }
    fn value(&self, idx: usize) -> &str {
        &self.0[idx]
    }
}

impl<'a> Borrow<dyn LabelTuple + 'a> for LabelKey {
    fn borrow(&self) -> &(dyn LabelTuple + 'a) {
        self
    }
}

impl Hash for LabelKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_tuple(self, state);
    }
}

impl PartialEq for LabelKey {
    fn eq(&self, other: &Self) -> bool {
        tuple_eq(self, other)
    }
}

impl Eq for LabelKey {}

impl fmt::Debug for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values()).finish()
    }
}

impl Serialize for LabelKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.values())
    }
}

/// Ordered label names shared by every series of a family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSchema {
    names: Arc<[String]>,
}

impl LabelSchema {
    /// Validate and build a schema.
    ///
    /// Names must look like `[a-zA-Z_][a-zA-Z0-9_]*`, must not use the reserved
    /// `__` prefix and must be unique.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        for (i, name) in names.iter().enumerate() {
            if !is_valid_label_name(name) || names[..i].contains(name) {
                return Err(MetricsError::InvalidLabelName(name.clone()));
            }
        }
        Ok(Self {
            names: names.into(),
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Arity check performed before every update.
    pub fn check(&self, values: &[&str]) -> Result<()> {
        if values.len() != self.names.len() {
            return Err(MetricsError::SchemaMismatch {
                expected: self.names.len(),
                got: values.len(),
            });
        }
        Ok(())
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, excluding the reserved `__` prefix.
pub fn is_valid_label_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
