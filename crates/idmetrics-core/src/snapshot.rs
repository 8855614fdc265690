//! Immutable point-in-time copies of registry state.
//!
//! Each series copy is internally consistent; different series (and
//! different families) may reflect slightly different instants.

use serde::Serialize;

use crate::family::Desc;
use crate::label::LabelKey;
use crate::store::SeriesValue;

#[derive(Debug, Clone, Serialize)]
pub struct RegistrySnapshot {
    pub families: Vec<FamilySnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilySnapshot {
    #[serde(flatten)]
    pub desc: Desc,
    pub series: Vec<SeriesSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesSnapshot {
    pub label_values: LabelKey,
    pub value: SeriesValue,
}

impl RegistrySnapshot {
    pub fn family(&self, name: &str) -> Option<&FamilySnapshot> {
        self.families.iter().find(|f| f.desc.name == name)
    }
}

impl FamilySnapshot {
    /// Series whose label values equal `values` (schema order).
    pub fn series(&self, values: &[&str]) -> Option<&SeriesSnapshot> {
        self.series.iter().find(|s| {
            s.label_values.len() == values.len()
                && s.label_values.values().eq(values.iter().copied())
        })
    }
}
