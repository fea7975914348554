//! Placement records handed to the scene sink.
//!
//! A group scan produces a stream of [`PlacementOp`]s: a [`NewBase`] defines
//! a placeable model at a pose, and each following [`InstancePlacement`]
//! duplicates that base at a new pose.

use std::fmt;

use mapgraft_math::{EulerAngles, Vec3};
use serde::Serialize;

/// Entity class used for static model placements.
pub const PROP_CLASS: &str = "prop_static";

/// Material applied when materials are overridden.
pub const DEV_MATERIAL: &str = "materials/dev/reflectivity_50.vmat";

/// 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque colour from RGB components.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.r, self.g, self.b, self.a)
    }
}

/// Per-base attributes computed once by the classifier.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PlacementAttributes {
    /// Small, cheap-to-cull scenery
    pub detail_geometry: bool,

    /// Candidate for visibility occlusion
    pub occluder: bool,

    /// Keep the host from merging this model's meshes
    pub disable_mesh_merging: bool,

    /// Set when the size-based rules ran; the two visibility flags above are
    /// left to the host otherwise
    pub size_classified: bool,

    /// Material forced onto the model
    pub material_override: Option<String>,

    /// Tint applied alongside an override material
    pub render_color: Option<Rgba>,
}

/// A new base placement.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewBase {
    /// `"<model> <entry index>"`, unique within its group
    pub local_id: String,

    /// Entity class in the target scene
    pub class_hint: String,

    /// Model reference (`models/<model>.vmdl`)
    pub model: String,

    /// Scale shared by every instance of this base
    pub scale: Vec3,

    /// Position in target units
    pub position: Vec3,

    pub angles: EulerAngles,

    pub attributes: PlacementAttributes,
}

impl NewBase {
    /// Flat key/value view of this placement for hosts that store entities
    /// as string properties. Unset optional attributes are omitted, as are
    /// `detailgeometry` and `visoccluder` on bases that were not size-classified.
    pub fn key_values(&self) -> Vec<(&'static str, String)> {
        let attrs = &self.attributes;
        let mut kv = vec![
            ("classname", self.class_hint.clone()),
            ("targetname", self.local_id.clone()),
            ("model", self.model.clone()),
            ("origin", format_vec3(self.position)),
            ("angles", self.angles.to_string()),
            ("scales", format_vec3(self.scale)),
        ];

        if attrs.size_classified {
            kv.push(("detailgeometry", flag(attrs.detail_geometry)));
            kv.push(("visoccluder", flag(attrs.occluder)));
        }

        if attrs.disable_mesh_merging {
            kv.push(("disablemeshmerging", flag(true)));
        }
        if let Some(material) = &attrs.material_override {
            kv.push(("materialoverride", material.clone()));
        }
        if let Some(color) = attrs.render_color {
            kv.push(("rendercolor", color.to_string()));
        }

        kv
    }
}

/// A duplicate of an earlier base at a new pose.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstancePlacement {
    /// `local_id` of the base this duplicates
    pub base_local_id: String,

    /// Position in target units
    pub position: Vec3,

    pub angles: EulerAngles,
}

/// One step of a group's placement stream.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlacementOp {
    NewBase(NewBase),
    Instance(InstancePlacement),
}

impl PlacementOp {
    pub fn is_base(&self) -> bool {
        matches!(self, PlacementOp::NewBase(_))
    }

    /// Position in target units.
    pub fn position(&self) -> Vec3 {
        match self {
            PlacementOp::NewBase(base) => base.position,
            PlacementOp::Instance(instance) => instance.position,
        }
    }

    pub fn angles(&self) -> EulerAngles {
        match self {
            PlacementOp::NewBase(base) => base.angles,
            PlacementOp::Instance(instance) => instance.angles,
        }
    }
}

pub(crate) fn format_vec3(v: Vec3) -> String {
    format!("{} {} {}", v.x, v.y, v.z)
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}
