//! Per-base placement attributes.
//!
//! Rules, applied in order:
//!
//! 1. With `autoset_detail`, models whose scaled bounding volume is at most
//!    128³ are detail geometry; larger ones (or ones whose volume cannot be
//!    looked up) are occluders. Terrain is then also made an occluder and
//!    excluded from mesh merging. Without `autoset_detail` none of this runs
//!    and the host keeps its own defaults.
//! 2. Dynamic objects are never occluders.
//! 3. Terrain with `override_terrain_materials` gets the dev material;
//!    otherwise `override_all_materials` gives the dev material plus a random
//!    opaque render colour.

use mapgraft_math::Vec3;
use rand::Rng;

use crate::config::ImportConfig;
use crate::metadata::ModelMetadata;
use crate::placement::{NewBase, PlacementAttributes, Rgba, DEV_MATERIAL};
use crate::scene::SourceTags;

/// Largest scaled volume still treated as detail geometry.
pub const DETAIL_MAX_VOLUME: f64 = 128.0 * 128.0 * 128.0;

/// Computes [`PlacementAttributes`] for new bases.
pub struct Classifier<'a> {
    config: &'a ImportConfig,
    metadata: &'a dyn ModelMetadata,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a ImportConfig, metadata: &'a dyn ModelMetadata) -> Self {
        Self { config, metadata }
    }

    /// Attributes for a model placed at `scale`.
    ///
    /// The random source is only drawn from when all materials are overridden.
    pub fn classify<R: Rng + ?Sized>(
        &self,
        model: &str,
        scale: Vec3,
        tags: SourceTags,
        rng: &mut R,
    ) -> PlacementAttributes {
        let mut attrs = PlacementAttributes::default();

        if self.config.autoset_detail {
            match self.metadata.bounds_volume(model) {
                Ok(volume) => {
                    let scaled = volume * scale.x as f64 * scale.y as f64 * scale.z as f64;
                    if scaled <= DETAIL_MAX_VOLUME {
                        attrs.detail_geometry = true;
                    } else {
                        attrs.occluder = true;
                    }
                }
                Err(err) => {
                    log::warn!("Bounds lookup failed for {}: {}, treating as large", model, err);
                    attrs.occluder = true;
                }
            }
            attrs.size_classified = true;

            // Small terrain keeps its detail flag
            if tags.terrain {
                attrs.occluder = true;
                attrs.disable_mesh_merging = true;
            }
        }

        if tags.dynamics {
            attrs.occluder = false;
        }

        if tags.terrain && self.config.override_terrain_materials {
            attrs.material_override = Some(DEV_MATERIAL.to_string());
        } else if self.config.override_all_materials {
            attrs.material_override = Some(DEV_MATERIAL.to_string());
            attrs.render_color = Some(Rgba::opaque(rng.gen(), rng.gen(), rng.gen()));
        }

        attrs
    }

    /// Fill in the attributes of a freshly batched base.
    pub fn annotate<R: Rng + ?Sized>(&self, base: &mut NewBase, tags: SourceTags, rng: &mut R) {
        base.attributes = self.classify(&base.model, base.scale, tags, rng);
    }
}
