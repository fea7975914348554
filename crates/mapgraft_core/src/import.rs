//! Import orchestration.
//!
//! [`Importer`] walks the selected source files one at a time: decode, batch
//! and classify each `Instances` group, then convert lights and cubemaps,
//! streaming every record to the scene sink. Failures stay local: a bad entry
//! is skipped, a rejected group is abandoned, a bad file is counted and the
//! run moves on.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::batch::{model_name, Batcher};
use crate::classify::Classifier;
use crate::config::ImportConfig;
use crate::document::{decode_document, DecodeError};
use crate::lights::{convert_lights, convert_probe_volumes, CUBEMAPS_GROUP, LIGHTS_GROUP};
use crate::metadata::ModelMetadata;
use crate::placement::PlacementOp;
use crate::scene::{Category, Group, SceneDescription, SourceTags};
use crate::sink::{SceneSink, SinkResult};

/// Errors that stop one source file from importing.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Supplier of raw source document bytes.
pub trait SourceSupplier {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads source documents from the filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSupplier;

impl SourceSupplier for FsSupplier {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// In-memory documents keyed by path.
impl SourceSupplier for HashMap<PathBuf, Vec<u8>> {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
        })
    }
}

/// Totals for one import run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Files decoded and processed
    pub files_processed: usize,
    /// Files that could not be read or decoded
    pub files_failed: usize,
    pub bases: usize,
    pub instances: usize,
    pub lights: usize,
    pub probe_volumes: usize,
    /// Entries left out because they failed to decode
    pub skipped_entries: usize,
    /// Groups abandoned after the sink rejected a record
    pub rejected_groups: usize,
    /// Set when the run stopped early on request
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// Receives the summary at the end of a run.
pub trait RunReporter {
    fn report(&mut self, summary: &RunSummary);
}

/// Reports the run summary through the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl RunReporter for LogReporter {
    fn report(&mut self, summary: &RunSummary) {
        log::info!(
            "Imported {} files in {:.2} seconds ({} failed): {} bases, {} instances, {} lights, {} probe volumes",
            summary.files_processed,
            summary.elapsed.as_secs_f64(),
            summary.files_failed,
            summary.bases,
            summary.instances,
            summary.lights,
            summary.probe_volumes
        );
    }
}

/// Parent group name for a source file: its stem without the `_info` suffix.
pub fn parent_group_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");
    stem.strip_suffix("_info").unwrap_or(stem).to_string()
}

/// Drives a run over a list of source files.
pub struct Importer<'a> {
    config: &'a ImportConfig,
    metadata: &'a dyn ModelMetadata,
    rng: StdRng,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> Importer<'a> {
    /// Create an importer with an entropy-seeded colour source.
    pub fn new(config: &'a ImportConfig, metadata: &'a dyn ModelMetadata) -> Self {
        Self {
            config,
            metadata,
            rng: StdRng::from_entropy(),
            cancel: None,
        }
    }

    /// Seed the render colour source for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Stop before the next source file once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Import every file in `paths`, in order, and report the summary.
    pub fn run(
        &mut self,
        paths: &[PathBuf],
        supplier: &dyn SourceSupplier,
        sink: &mut dyn SceneSink,
        reporter: &mut dyn RunReporter,
    ) -> RunSummary {
        let start = Instant::now();
        let mut summary = RunSummary::default();

        for path in paths {
            if self.cancelled() {
                log::info!("Import cancelled before {}", path.display());
                summary.cancelled = true;
                break;
            }

            match self.import_file(path, supplier, sink, &mut summary) {
                Ok(()) => summary.files_processed += 1,
                Err(err) => {
                    log::error!("{}", err);
                    summary.files_failed += 1;
                }
            }
        }

        summary.elapsed = start.elapsed();
        reporter.report(&summary);
        summary
    }

    /// Import a single source file, adding its totals to `summary`.
    pub fn import_file(
        &mut self,
        path: &Path,
        supplier: &dyn SourceSupplier,
        sink: &mut dyn SceneSink,
        summary: &mut RunSummary,
    ) -> ImportResult<()> {
        let bytes = supplier.read(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scene = decode_document(&bytes, SourceTags::from_path(path)).map_err(|source| {
            ImportError::Decode {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let parent = parent_group_name(path);

        for fault in scene.faults() {
            log::warn!("{}: skipping {}", path.display(), fault);
            summary.skipped_entries += 1;
        }

        if self.config.import_objects {
            self.import_objects(&scene, &parent, sink, summary);
        }
        if self.config.import_lights {
            self.import_lights(&scene, &parent, sink, summary);
        }
        if self.config.import_cubemaps {
            self.import_cubemaps(&scene, &parent, sink, summary);
        }

        Ok(())
    }

    fn import_objects(
        &mut self,
        scene: &SceneDescription,
        parent: &str,
        sink: &mut dyn SceneSink,
        summary: &mut RunSummary,
    ) {
        if scene.entry_count(Category::Instances) == 0 {
            log::info!("{} contains no models, skipping", parent);
            return;
        }

        for group in scene.groups(Category::Instances) {
            if group.is_empty() {
                continue;
            }
            let (bases, instances) = (summary.bases, summary.instances);
            match self.import_group(group, scene.tags, parent, sink, summary) {
                Ok(()) => log::debug!(
                    "{}/{}: {} bases, {} instances",
                    parent,
                    group.name,
                    summary.bases - bases,
                    summary.instances - instances
                ),
                Err(err) => {
                    log::warn!("{}/{}: group abandoned: {}", parent, group.name, err);
                    summary.rejected_groups += 1;
                }
            }
        }
    }

    /// Batch, classify and place one group. Ops are counted as the sink
    /// accepts them, so a group abandoned partway still shows what it placed.
    fn import_group(
        &mut self,
        group: &Group,
        tags: SourceTags,
        parent: &str,
        sink: &mut dyn SceneSink,
        summary: &mut RunSummary,
    ) -> SinkResult<()> {
        let classifier = Classifier::new(self.config, self.metadata);
        let model = model_name(&group.name, tags);
        let mut batcher = Batcher::new(&model, group.len(), self.config, tags);

        for entry in &group.entries {
            let mut op = batcher.push(entry);
            if let PlacementOp::NewBase(base) = &mut op {
                classifier.annotate(base, tags, &mut self.rng);
            }
            sink.place(parent, &op)?;

            if op.is_base() {
                summary.bases += 1;
            } else {
                summary.instances += 1;
            }
        }

        Ok(())
    }

    fn import_lights(
        &mut self,
        scene: &SceneDescription,
        parent: &str,
        sink: &mut dyn SceneSink,
        summary: &mut RunSummary,
    ) {
        if scene.entry_count(Category::Lights) == 0 {
            log::info!("{} contains no lights, skipping", parent);
            return;
        }

        for group in scene.groups(Category::Lights) {
            for light in convert_lights(group) {
                if let Err(err) = sink.place_light(LIGHTS_GROUP, &light) {
                    log::warn!("{}: light {} abandoned: {}", parent, group.name, err);
                    summary.rejected_groups += 1;
                    break;
                }
                summary.lights += 1;
            }
        }
    }

    fn import_cubemaps(
        &mut self,
        scene: &SceneDescription,
        parent: &str,
        sink: &mut dyn SceneSink,
        summary: &mut RunSummary,
    ) {
        if scene.entry_count(Category::Cubemaps) == 0 {
            log::info!("{} contains no cubemaps, skipping", parent);
            return;
        }

        for group in scene.groups(Category::Cubemaps) {
            for volume in convert_probe_volumes(group) {
                if let Err(err) = sink.place_probe_volume(CUBEMAPS_GROUP, &volume) {
                    log::warn!("{}: cubemap {} abandoned: {}", parent, group.name, err);
                    summary.rejected_groups += 1;
                    break;
                }
                summary.probe_volumes += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_group_name() {
        assert_eq!(parent_group_name(Path::new("maps/edz_info.cfg")), "edz");
        assert_eq!(parent_group_name(Path::new("maps/edz_Terrain_info.cfg")), "edz_Terrain");
        assert_eq!(parent_group_name(Path::new("maps/plain.cfg")), "plain");
    }

    #[test]
    fn test_memory_supplier_missing_file() {
        let supplier: HashMap<PathBuf, Vec<u8>> = HashMap::new();
        let err = supplier.read(Path::new("nope.cfg")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_cancel_before_first_file() {
        let config = ImportConfig::default();
        let metadata = |_: &str| -> crate::metadata::MetadataResult<f64> { Ok(1.0) };
        let flag = Arc::new(AtomicBool::new(true));
        let mut importer = Importer::new(&config, &metadata).with_cancel_flag(flag);

        let supplier: HashMap<PathBuf, Vec<u8>> = HashMap::new();
        let mut sink = crate::sink::RecordingSink::new();
        let summary = importer.run(
            &[PathBuf::from("a_info.cfg")],
            &supplier,
            &mut sink,
            &mut LogReporter,
        );

        assert!(summary.cancelled);
        assert_eq!(summary.files_processed, 0);
        assert_eq!(summary.files_failed, 0);
    }
}
