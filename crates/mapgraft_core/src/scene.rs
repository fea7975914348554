//! Decoded scene description types.
//!
//! A [`SceneDescription`] is the typed form of one source document: named
//! groups of transform entries, filed under a [`Category`]. It is built once
//! by the decoder and never modified afterwards.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use mapgraft_math::{Quat, Vec2, Vec3};

use crate::document::{DecodeError, EntryFault};

/// Top-level document category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Instances,
    Lights,
    Cubemaps,
    Decals,
}

impl Category {
    /// All categories, in document order.
    pub const ALL: [Category; 4] = [
        Category::Instances,
        Category::Lights,
        Category::Cubemaps,
        Category::Decals,
    ];

    /// The key this category is stored under in the source document.
    pub fn key(self) -> &'static str {
        match self {
            Category::Instances => "Instances",
            Category::Lights => "Lights",
            Category::Cubemaps => "Cubemaps",
            Category::Decals => "Decals",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Classification tags resolved from the source file path.
///
/// The source exporter writes terrain and dynamic objects into separately
/// named files; these tags carry that signal so nothing downstream needs to
/// look at the path again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceTags {
    /// Source path mentions `Terrain`
    pub terrain: bool,

    /// Source path mentions `Dynamics`
    pub dynamics: bool,
}

impl SourceTags {
    /// Resolve tags from a source file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_string_lossy();
        Self {
            terrain: path.contains("Terrain"),
            dynamics: path.contains("Dynamics"),
        }
    }
}

/// Light-specific entry fields.
#[derive(Clone, Debug, PartialEq)]
pub struct LightFields {
    /// Light type as written by the exporter (`"Area"`, `"Point"`, ...)
    pub kind: String,

    /// Linear RGB colour (0-1)
    pub color: Vec3,

    /// Area light dimensions, present for area lights
    pub size: Option<Vec2>,
}

/// Decal-specific entry fields. All points stay in source units.
#[derive(Clone, Debug, PartialEq)]
pub struct DecalFields {
    /// First corner of the projection box
    pub corner1: Vec3,

    /// Opposite corner of the projection box
    pub corner2: Vec3,

    /// Source material identifier
    pub material: String,
}

impl DecalFields {
    /// Probe segment from corner1 to corner2, used to find the surface the
    /// decal is projected onto.
    pub fn probe_segment(&self) -> (Vec3, Vec3) {
        (self.corner1, self.corner2)
    }
}

/// Fields that only some categories carry.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EntryExtra {
    #[default]
    None,
    Light(LightFields),
    Decal(DecalFields),
}

/// One rigid-body transform inside a group.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformEntry {
    /// Position of this entry in the source array
    pub index: usize,

    /// Translation in source units (meters)
    pub translation: Vec3,

    /// Rotation, as written (not normalized)
    pub rotation: Quat,

    /// Per-axis scale
    pub scale: Vec3,

    /// Category-specific fields
    pub extra: EntryExtra,
}

impl TransformEntry {
    /// Create an entry with only a transform.
    pub fn new(index: usize, translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            index,
            translation,
            rotation,
            scale,
            extra: EntryExtra::None,
        }
    }
}

/// A named, ordered list of transform entries.
#[derive(Clone, Debug, Default)]
pub struct Group {
    /// Asset, light or cubemap name
    pub name: String,

    /// Successfully decoded entries, in source order
    pub entries: Vec<TransformEntry>,

    /// Entries that failed to decode and were left out
    pub faults: Vec<EntryFault>,
}

impl Group {
    /// Create an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Number of decoded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The decoded content of one source document.
#[derive(Clone, Debug, Default)]
pub struct SceneDescription {
    /// Tags resolved from the source path
    pub tags: SourceTags,

    /// Groups per category present in the document, each in document order
    categories: HashMap<Category, Vec<Group>>,
}

impl SceneDescription {
    /// Create an empty description.
    pub fn new(tags: SourceTags) -> Self {
        Self {
            tags,
            categories: HashMap::new(),
        }
    }

    /// Add a category and its groups.
    pub fn insert_category(&mut self, category: Category, groups: Vec<Group>) {
        self.categories.insert(category, groups);
    }

    /// Whether the document contained the category key at all.
    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains_key(&category)
    }

    /// Groups of a category the caller requires to be present.
    pub fn category(&self, category: Category) -> Result<&[Group], DecodeError> {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .ok_or(DecodeError::MissingCategory(category))
    }

    /// Groups of a category, or nothing if the document did not have it.
    pub fn groups(&self, category: Category) -> &[Group] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total decoded entries across all groups of a category.
    pub fn entry_count(&self, category: Category) -> usize {
        self.groups(category).iter().map(Group::len).sum()
    }

    /// Entries that failed to decode across all categories.
    pub fn faults(&self) -> impl Iterator<Item = &EntryFault> {
        self.categories
            .values()
            .flat_map(|groups| groups.iter())
            .flat_map(|group| group.faults.iter())
    }
}
