//! JSON scene description decoder.

use std::fmt;

use mapgraft_math::{Quat, Vec3};
use serde_json::Value;
use thiserror::Error;

use super::fields::{self, FieldResult};
use crate::scene::{
    Category, DecalFields, EntryExtra, Group, LightFields, SceneDescription, SourceTags,
    TransformEntry,
};

/// A single entry (or whole group) that could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFault {
    pub category: Category,
    pub group: String,
    /// Entry position within the group, `None` when the group itself is malformed
    pub index: Option<usize>,
    pub message: String,
}

impl fmt::Display for EntryFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}/{}[{}]: {}", self.category, self.group, index, self.message),
            None => write!(f, "{}/{}: {}", self.category, self.group, self.message),
        }
    }
}

/// Errors that can occur while decoding a source document.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Syntax error: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("Malformed document at '{path}': {message}")]
    Malformed { path: String, message: String },

    #[error("Category '{0}' not present")]
    MissingCategory(Category),
}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Decode raw document bytes into a scene description.
///
/// Categories missing from the document are simply absent from the result;
/// use [`SceneDescription::category`] where a category is required.
pub fn decode_document(bytes: &[u8], tags: SourceTags) -> DecodeResult<SceneDescription> {
    let root: Value = serde_json::from_slice(bytes)?;
    let root = root.as_object().ok_or_else(|| DecodeError::Malformed {
        path: "/".to_string(),
        message: "top level is not an object".to_string(),
    })?;

    let mut scene = SceneDescription::new(tags);
    for category in Category::ALL {
        if let Some(value) = root.get(category.key()) {
            let groups = decode_category(category, value)?;
            scene.insert_category(category, groups);
        }
    }

    Ok(scene)
}

fn decode_category(category: Category, value: &Value) -> DecodeResult<Vec<Group>> {
    let named = value.as_object().ok_or_else(|| DecodeError::Malformed {
        path: category.key().to_string(),
        message: "expected an object of named groups".to_string(),
    })?;

    let mut groups = Vec::with_capacity(named.len());
    for (name, value) in named {
        let mut group = Group::new(name.as_str());

        let Some(items) = value.as_array() else {
            group.faults.push(EntryFault {
                category,
                group: name.clone(),
                index: None,
                message: "expected an array of entries".to_string(),
            });
            groups.push(group);
            continue;
        };

        for (index, item) in items.iter().enumerate() {
            match decode_entry(category, index, item) {
                Ok(entry) => group.entries.push(entry),
                Err(message) => group.faults.push(EntryFault {
                    category,
                    group: name.clone(),
                    index: Some(index),
                    message,
                }),
            }
        }

        log::debug!(
            "Decoded {}/{}: {} entries, {} faults",
            category,
            name,
            group.entries.len(),
            group.faults.len()
        );
        groups.push(group);
    }

    Ok(groups)
}

fn decode_entry(category: Category, index: usize, value: &Value) -> FieldResult<TransformEntry> {
    let obj = value
        .as_object()
        .ok_or_else(|| "entry is not an object".to_string())?;

    match category {
        Category::Instances | Category::Cubemaps => Ok(TransformEntry::new(
            index,
            fields::vec3(obj, "Translation")?,
            fields::quat(obj, "Rotation")?,
            fields::scale(obj, "Scale")?,
        )),
        Category::Lights => {
            let kind = fields::string(obj, "Type")?;
            let size = fields::optional_vec2(obj, "Size")?;
            if kind == "Area" && size.is_none() {
                return Err("area light without 'Size'".to_string());
            }
            let scale = if obj.contains_key("Scale") {
                fields::scale(obj, "Scale")?
            } else {
                Vec3::ONE
            };

            Ok(TransformEntry {
                index,
                translation: fields::vec3(obj, "Translation")?,
                rotation: fields::quat(obj, "Rotation")?,
                scale,
                extra: EntryExtra::Light(LightFields {
                    kind,
                    color: fields::vec3(obj, "Color")?,
                    size,
                }),
            })
        }
        Category::Decals => Ok(TransformEntry {
            index,
            translation: fields::vec3(obj, "Origin")?,
            rotation: Quat::IDENTITY,
            scale: fields::scale(obj, "Scale")?,
            extra: EntryExtra::Decal(DecalFields {
                corner1: fields::vec3(obj, "Corner1")?,
                corner2: fields::vec3(obj, "Corner2")?,
                material: fields::string(obj, "Material")?,
            }),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> DecodeResult<SceneDescription> {
        decode_document(text.as_bytes(), SourceTags::default())
    }

    #[test]
    fn test_decode_instances() {
        let scene = decode(
            r#"{
                "Instances": {
                    "Rock_A": [
                        { "Translation": [1, 2, 3], "Rotation": [0, 0, 0, 1], "Scale": [1, 1, 1] },
                        { "Translation": [4, 5, 6], "Rotation": [0, 0, 0, 1], "Scale": [2, 2, 2] }
                    ]
                }
            }"#,
        )
        .unwrap();

        let groups = scene.category(Category::Instances).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Rock_A");
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[0].entries[1].index, 1);
        assert_eq!(groups[0].entries[1].translation, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(groups[0].entries[1].scale, Vec3::splat(2.0));
    }

    #[test]
    fn test_group_order_is_document_order() {
        let scene = decode(
            r#"{ "Instances": { "Zeta": [], "Alpha": [], "Mid": [] } }"#,
        )
        .unwrap();

        let names: Vec<_> = scene
            .groups(Category::Instances)
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(decode("{ \"Instances\": "), Err(DecodeError::Syntax(_))));
    }

    #[test]
    fn test_top_level_not_object() {
        assert!(matches!(decode("[1, 2]"), Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn test_missing_and_empty_categories() {
        let scene = decode(r#"{ "Instances": {} }"#).unwrap();

        assert!(scene.category(Category::Instances).unwrap().is_empty());
        assert!(matches!(
            scene.category(Category::Decals),
            Err(DecodeError::MissingCategory(Category::Decals))
        ));
    }

    #[test]
    fn test_malformed_entry_is_localized() {
        let scene = decode(
            r#"{
                "Instances": {
                    "Crate": [
                        { "Translation": [0, 0, 0], "Rotation": [0, 0, 0, 1], "Scale": [1, 1, 1] },
                        { "Translation": [0, 0], "Rotation": [0, 0, 0, 1], "Scale": [1, 1, 1] },
                        { "Translation": [0, 0, 1], "Rotation": [0, 0, 0, 1], "Scale": [1, 1, 1] }
                    ],
                    "Broken": 7
                }
            }"#,
        )
        .unwrap();

        let groups = scene.groups(Category::Instances);
        let crate_group = &groups[0];
        assert_eq!(crate_group.entries.len(), 2);
        assert_eq!(crate_group.entries[1].index, 2);
        assert_eq!(crate_group.faults.len(), 1);
        assert_eq!(crate_group.faults[0].index, Some(1));
        assert_eq!(crate_group.faults[0].group, "Crate");

        assert!(groups[1].is_empty());
        assert_eq!(groups[1].faults[0].index, None);
        assert_eq!(scene.faults().count(), 2);
    }

    #[test]
    fn test_category_not_object_fails_document() {
        let err = decode(r#"{ "Instances": [1, 2, 3] }"#).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { ref path, .. } if path == "Instances"));
    }

    #[test]
    fn test_decode_lights() {
        let scene = decode(
            r#"{
                "Lights": {
                    "Lamp": [
                        { "Translation": [1, 0, 0], "Rotation": [0, 0, 0, 1], "Type": "Area", "Color": [1, 0.5, 0], "Size": [2, 4] },
                        { "Translation": [0, 0, 0], "Rotation": [0, 0, 0, 1], "Type": "Point", "Color": [1, 1, 1] },
                        { "Translation": [0, 0, 0], "Rotation": [0, 0, 0, 1], "Type": "Area", "Color": [1, 1, 1] }
                    ]
                }
            }"#,
        )
        .unwrap();

        let lamp = &scene.groups(Category::Lights)[0];
        assert_eq!(lamp.entries.len(), 2);
        assert_eq!(lamp.faults.len(), 1);

        match &lamp.entries[0].extra {
            EntryExtra::Light(light) => {
                assert_eq!(light.kind, "Area");
                assert_eq!(light.size, Some(mapgraft_math::Vec2::new(2.0, 4.0)));
                assert_eq!(light.color, Vec3::new(1.0, 0.5, 0.0));
            }
            other => panic!("expected light fields, got {other:?}"),
        }
        assert_eq!(lamp.entries[1].scale, Vec3::ONE);
    }

    #[test]
    fn test_decode_decals() {
        let scene = decode(
            r#"{
                "Decals": {
                    "Scorch": [
                        { "Origin": [1, 2, 3], "Corner1": [0, 0, 1], "Corner2": [0, 0, -1], "Material": "scorch_01", "Scale": 0.5 }
                    ]
                }
            }"#,
        )
        .unwrap();

        let decal = &scene.groups(Category::Decals)[0].entries[0];
        assert_eq!(decal.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(decal.scale, Vec3::splat(0.5));
        match &decal.extra {
            EntryExtra::Decal(fields) => {
                assert_eq!(fields.material, "scorch_01");
                assert_eq!(fields.probe_segment(), (Vec3::Z, -Vec3::Z));
            }
            other => panic!("expected decal fields, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let scene = decode(r#"{ "Version": 3, "Instances": {} }"#).unwrap();
        assert!(scene.has_category(Category::Instances));
    }
}
