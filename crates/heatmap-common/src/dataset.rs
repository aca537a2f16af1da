//! Data-set wire format: `{"max": 6, "data": [[x, y, count], ...]}`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::HeatmapResult;

/// A single `[x, y, count]` observation.
///
/// Coordinates are signed on the wire so that out-of-range points can be
/// carried through and dropped by the store instead of failing the parse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint(pub i64, pub i64, pub f64);

impl DataPoint {
    pub fn x(&self) -> i64 {
        self.0
    }

    pub fn y(&self) -> i64 {
        self.1
    }

    pub fn count(&self) -> f64 {
        self.2
    }
}

/// A bulk data set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    /// Normalization maximum. Values below the largest count are raised to it
    #[serde(default)]
    pub max: f64,

    #[serde(default)]
    pub data: Vec<DataPoint>,
}

impl DataSet {
    pub fn new(max: f64, data: Vec<DataPoint>) -> Self {
        Self { max, data }
    }

    pub fn from_json(json: &str) -> HeatmapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> HeatmapResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> HeatmapResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
