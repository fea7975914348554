//! Mapgraft Core - scene description import and placement batching.
//!
//! This crate provides:
//!
//! - **Document decoding**: JSON scene descriptions into `SceneDescription`
//! - **Batching**: run-based grouping of equal-scale entries into bases and instances
//! - **Classification**: detail geometry, occluder and material attributes per base
//! - **Orchestration**: multi-file import runs streaming records into a `SceneSink`
//!
//! # Example
//!
//! ```ignore
//! use mapgraft_core::{BoundsTable, FsSupplier, ImportConfig, Importer, JsonLinesSink, LogReporter};
//!
//! let config = ImportConfig::default();
//! let bounds = BoundsTable::from_json_file("bounds.json")?;
//! let mut sink = JsonLinesSink::new(std::io::stdout().lock());
//!
//! let summary = Importer::new(&config, &bounds)
//!     .run(&paths, &FsSupplier, &mut sink, &mut LogReporter);
//! println!("Imported {} files", summary.files_processed);
//! ```

pub mod batch;
pub mod classify;
pub mod config;
pub mod document;
pub mod import;
pub mod lights;
pub mod metadata;
pub mod placement;
pub mod scene;
pub mod sink;

// Re-export commonly used types
pub use batch::{batch_group, Batcher};
pub use classify::Classifier;
pub use config::ImportConfig;
pub use document::{decode_document, DecodeError};
pub use import::{FsSupplier, Importer, LogReporter, RunReporter, RunSummary, SourceSupplier};
pub use lights::{LightRecord, ProbeVolumeRecord};
pub use metadata::{BoundsTable, ModelMetadata};
pub use placement::{InstancePlacement, NewBase, PlacementAttributes, PlacementOp};
pub use scene::{Category, Group, SceneDescription, SourceTags, TransformEntry};
pub use sink::{JsonLinesSink, RecordingSink, SceneSink, SinkError};
