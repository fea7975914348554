//! Run-based batching of a group's transform entries.
//!
//! Entries are scanned once, in source order. Consecutive entries with the
//! exact same scale form a run: the first entry of a run becomes a
//! [`NewBase`], the rest become [`InstancePlacement`]s of it. Attributes on
//! the emitted bases are left at their defaults for the classifier to fill.

use mapgraft_math::{quat_to_euler, rescale_linear, EulerAngles, Vec3};

use crate::config::ImportConfig;
use crate::placement::{InstancePlacement, NewBase, PlacementAttributes, PlacementOp, PROP_CLASS};
use crate::scene::{SourceTags, TransformEntry};

/// Model name for a group. Terrain models are exported under a `_Terrain` suffix.
pub fn model_name(group_name: &str, tags: SourceTags) -> String {
    if tags.terrain {
        format!("{}_Terrain", group_name)
    } else {
        group_name.to_string()
    }
}

/// Model reference in the target scene.
pub fn model_reference(model_name: &str) -> String {
    format!("models/{}.vmdl", model_name)
}

#[derive(Debug)]
enum BatchState {
    /// Nothing emitted yet
    Empty,
    /// Last base emitted and the scale its run shares
    Current { local_id: String, scale: Vec3 },
}

/// Scan state for one group.
#[derive(Debug)]
pub struct Batcher {
    model: String,
    model_ref: String,
    terrain: bool,
    instancing: bool,
    state: BatchState,
}

impl Batcher {
    /// Create a batcher for a group of `group_len` decoded entries.
    ///
    /// Instancing is off when disabled in the config and for single-entry
    /// groups.
    pub fn new(model: &str, group_len: usize, config: &ImportConfig, tags: SourceTags) -> Self {
        Self {
            model: model.to_string(),
            model_ref: model_reference(model),
            terrain: tags.terrain,
            instancing: config.instance_objects && group_len > 1,
            state: BatchState::Empty,
        }
    }

    fn angles(&self, entry: &TransformEntry) -> EulerAngles {
        if self.terrain {
            EulerAngles::ZERO
        } else {
            quat_to_euler(entry.rotation)
        }
    }

    /// Consume the next entry of the group.
    pub fn push(&mut self, entry: &TransformEntry) -> PlacementOp {
        let position = rescale_linear(entry.translation);
        let angles = self.angles(entry);

        if self.instancing {
            // Exact comparison: only bit-identical scales share a base
            if let BatchState::Current { local_id, scale } = &self.state {
                if *scale == entry.scale {
                    return PlacementOp::Instance(InstancePlacement {
                        base_local_id: local_id.clone(),
                        position,
                        angles,
                    });
                }
            }
        }

        let local_id = format!("{} {}", self.model, entry.index);
        self.state = BatchState::Current {
            local_id: local_id.clone(),
            scale: entry.scale,
        };

        PlacementOp::NewBase(NewBase {
            local_id,
            class_hint: PROP_CLASS.to_string(),
            model: self.model_ref.clone(),
            scale: entry.scale,
            position,
            angles,
            attributes: PlacementAttributes::default(),
        })
    }
}

/// Batch a whole group in one call.
pub fn batch_group(
    model: &str,
    entries: &[TransformEntry],
    config: &ImportConfig,
    tags: SourceTags,
) -> Vec<PlacementOp> {
    let mut batcher = Batcher::new(model, entries.len(), config, tags);
    entries.iter().map(|entry| batcher.push(entry)).collect()
}
