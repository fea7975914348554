//! Light and light probe volume conversion.
//!
//! Lights and cubemaps go through the same decode and unit conversion as
//! static models but are placed one record per entry, without batching.

use mapgraft_math::{quat_to_euler, rescale_linear, EulerAngles, Vec3, units::SOURCE_TO_TARGET_UNITS};
use serde::Serialize;

use crate::placement::{format_vec3, Rgba};
use crate::scene::{EntryExtra, Group, TransformEntry};

/// Parent group for imported lights.
pub const LIGHTS_GROUP: &str = "Lights";

/// Parent group for imported probe volumes.
pub const CUBEMAPS_GROUP: &str = "Cubemaps";

pub const RECT_LIGHT_CLASS: &str = "light_rect";
pub const OMNI_LIGHT_CLASS: &str = "light_omni";
pub const PROBE_VOLUME_CLASS: &str = "env_combined_light_probe_volume";

/// Range given to every imported light.
pub const LIGHT_RANGE: f32 = 512.0;

/// Brightness given to every imported light.
pub const LIGHT_BRIGHTNESS: f32 = 0.65;

/// A light ready for the scene sink.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LightRecord {
    /// `"<Type>_<group>"`
    pub name: String,
    pub class_hint: String,
    /// Position in target units
    pub position: Vec3,
    pub color: Rgba,
    /// Rect light source dimensions `(dim0, dim1)`
    pub source_dims: Option<(f32, f32)>,
    pub range: f32,
    pub brightness: f32,
    pub baked_light_indexing: u32,
}

impl LightRecord {
    /// Flat key/value view of this light.
    pub fn key_values(&self) -> Vec<(&'static str, String)> {
        let mut kv = vec![
            ("classname", self.class_hint.clone()),
            ("targetname", self.name.clone()),
            ("origin", format_vec3(self.position)),
            ("color", self.color.to_string()),
            ("baked_light_indexing", self.baked_light_indexing.to_string()),
            ("range", self.range.to_string()),
            ("brightness", self.brightness.to_string()),
        ];
        if let Some((dim0, dim1)) = self.source_dims {
            kv.push(("lightsourcedim0", dim0.to_string()));
            kv.push(("lightsourcedim1", dim1.to_string()));
        }
        kv
    }
}

/// A light probe volume built from a cubemap entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProbeVolumeRecord {
    pub name: String,
    pub class_hint: String,
    /// Position in target units
    pub position: Vec3,
    pub angles: EulerAngles,
    pub box_mins: Vec3,
    pub box_maxs: Vec3,
}

impl ProbeVolumeRecord {
    /// Flat key/value view of this volume.
    pub fn key_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("classname", self.class_hint.clone()),
            ("targetname", self.name.clone()),
            ("origin", format_vec3(self.position)),
            ("angles", self.angles.to_string()),
            ("box_mins", format_vec3(self.box_mins)),
            ("box_maxs", format_vec3(self.box_maxs)),
        ]
    }
}

/// Convert one light entry. Entries without light fields yield `None`.
pub fn convert_light(group_name: &str, entry: &TransformEntry) -> Option<LightRecord> {
    let EntryExtra::Light(light) = &entry.extra else {
        return None;
    };

    // Area lights are rectangles; everything else falls back to an omni light
    let (class_hint, source_dims) = match (light.kind.as_str(), light.size) {
        ("Area", Some(size)) => (RECT_LIGHT_CLASS, Some((size.y, size.x))),
        _ => (OMNI_LIGHT_CLASS, None),
    };

    // Float to int casts truncate and saturate into 0..=255
    let channel = |c: f32| (c * 255.0) as u8;

    Some(LightRecord {
        name: format!("{}_{}", light.kind, group_name),
        class_hint: class_hint.to_string(),
        position: rescale_linear(entry.translation),
        color: Rgba::opaque(channel(light.color.x), channel(light.color.y), channel(light.color.z)),
        source_dims,
        range: LIGHT_RANGE,
        brightness: LIGHT_BRIGHTNESS,
        baked_light_indexing: 0,
    })
}

/// Convert every light entry of a group.
pub fn convert_lights(group: &Group) -> Vec<LightRecord> {
    group
        .entries
        .iter()
        .filter_map(|entry| convert_light(&group.name, entry))
        .collect()
}

/// Convert one cubemap entry. The entry's scale is the half-extent of the
/// volume in source units.
pub fn convert_probe_volume(group_name: &str, entry: &TransformEntry) -> ProbeVolumeRecord {
    let extent = entry.scale * SOURCE_TO_TARGET_UNITS;
    ProbeVolumeRecord {
        name: group_name.to_string(),
        class_hint: PROBE_VOLUME_CLASS.to_string(),
        position: rescale_linear(entry.translation),
        angles: quat_to_euler(entry.rotation),
        box_mins: -extent,
        box_maxs: extent,
    }
}

/// Convert every cubemap entry of a group.
pub fn convert_probe_volumes(group: &Group) -> Vec<ProbeVolumeRecord> {
    group
        .entries
        .iter()
        .map(|entry| convert_probe_volume(&group.name, entry))
        .collect()
}
