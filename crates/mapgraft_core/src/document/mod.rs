//! Source document decoding.
//!
//! Turns the JSON scene description written by the source exporter into a
//! typed [`SceneDescription`](crate::scene::SceneDescription).
//!
//! ## Document layout
//!
//! ```text
//! {
//!   "Instances": { "<model>":   [ { "Translation": [x,y,z], "Rotation": [x,y,z,w], "Scale": [x,y,z] }, ... ] },
//!   "Lights":    { "<light>":   [ { ..., "Type": "Area", "Color": [r,g,b], "Size": [w,h] }, ... ] },
//!   "Cubemaps":  { "<cubemap>": [ { "Translation": ..., "Rotation": ..., "Scale": ... }, ... ] },
//!   "Decals":    { "<decal>":   [ { "Origin": ..., "Corner1": ..., "Corner2": ..., "Material": "...", "Scale": s }, ... ] }
//! }
//! ```
//!
//! All categories are optional. Malformed entries are recorded on their
//! group and left out; only a syntax error or a structurally wrong category
//! fails the whole document.
//!
//! # Example
//!
//! ```ignore
//! use mapgraft_core::document::decode_document;
//! use mapgraft_core::scene::{Category, SourceTags};
//!
//! let scene = decode_document(&bytes, SourceTags::from_path(&path))?;
//! println!("{} instances", scene.entry_count(Category::Instances));
//! ```

mod decoder;
mod fields;

pub use decoder::*;
