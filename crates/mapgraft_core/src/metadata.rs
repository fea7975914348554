//! Model metadata lookup.
//!
//! The classifier needs each model's bounding volume. Where that comes from
//! is up to the host; [`BoundsTable`] serves it from a JSON file of
//! per-model bounding boxes.

use std::collections::HashMap;
use std::path::Path;

use mapgraft_math::{Aabb, Vec3};
use serde::Deserialize;
use thiserror::Error;

/// Errors from a model metadata lookup.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("No metadata for model '{0}'")]
    UnknownModel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bounds table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Source of model bounding volumes.
pub trait ModelMetadata {
    /// Volume of the model's unscaled bounds, in target units cubed.
    fn bounds_volume(&self, model: &str) -> MetadataResult<f64>;
}

impl<F> ModelMetadata for F
where
    F: Fn(&str) -> MetadataResult<f64>,
{
    fn bounds_volume(&self, model: &str) -> MetadataResult<f64> {
        self(model)
    }
}

#[derive(Deserialize)]
struct BoundsEntry {
    min: [f32; 3],
    max: [f32; 3],
}

/// Model bounds keyed by model reference.
///
/// JSON layout: `{ "models/rock.vmdl": { "min": [x, y, z], "max": [x, y, z] } }`
#[derive(Clone, Debug, Default)]
pub struct BoundsTable {
    bounds: HashMap<String, Aabb>,
}

impl BoundsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bounds table from JSON text.
    pub fn from_json_str(text: &str) -> MetadataResult<Self> {
        let raw: HashMap<String, BoundsEntry> = serde_json::from_str(text)?;
        let bounds = raw
            .into_iter()
            .map(|(model, entry)| {
                let aabb = Aabb::from_points(Vec3::from_array(entry.min), Vec3::from_array(entry.max));
                (model, aabb)
            })
            .collect();
        Ok(Self { bounds })
    }

    /// Load a bounds table from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> MetadataResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn insert(&mut self, model: impl Into<String>, bounds: Aabb) {
        self.bounds.insert(model.into(), bounds);
    }

    pub fn get(&self, model: &str) -> Option<&Aabb> {
        self.bounds.get(model)
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

impl ModelMetadata for BoundsTable {
    fn bounds_volume(&self, model: &str) -> MetadataResult<f64> {
        self.bounds
            .get(model)
            .map(Aabb::volume)
            .ok_or_else(|| MetadataError::UnknownModel(model.to_string()))
    }
}
