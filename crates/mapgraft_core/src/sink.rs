//! Scene sink: where finished placement records go.
//!
//! The host editor implements [`SceneSink`] to materialize records as scene
//! nodes. Two stock sinks are provided: [`RecordingSink`] keeps everything in
//! memory and [`JsonLinesSink`] writes one JSON object per record.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use crate::lights::{LightRecord, ProbeVolumeRecord};
use crate::placement::PlacementOp;

/// Errors reported by a scene sink.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Placement rejected: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Consumer of placement records.
///
/// `parent` names the group the record belongs under in the host scene.
pub trait SceneSink {
    fn place(&mut self, parent: &str, op: &PlacementOp) -> SinkResult<()>;

    fn place_light(&mut self, parent: &str, light: &LightRecord) -> SinkResult<()>;

    fn place_probe_volume(&mut self, parent: &str, volume: &ProbeVolumeRecord) -> SinkResult<()>;
}

/// A record as received by a sink, with its parent group.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkRecord {
    Placement { parent: String, op: PlacementOp },
    Light { parent: String, light: LightRecord },
    ProbeVolume { parent: String, volume: ProbeVolumeRecord },
}

impl SinkRecord {
    pub fn parent(&self) -> &str {
        match self {
            SinkRecord::Placement { parent, .. }
            | SinkRecord::Light { parent, .. }
            | SinkRecord::ProbeVolume { parent, .. } => parent,
        }
    }
}

/// Sink that keeps every record in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub records: Vec<SinkRecord>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placement ops received under `parent`, in order.
    pub fn placements<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a PlacementOp> + 'a {
        self.records.iter().filter_map(move |record| match record {
            SinkRecord::Placement { parent: p, op } if p == parent => Some(op),
            _ => None,
        })
    }

    pub fn lights(&self) -> impl Iterator<Item = &LightRecord> {
        self.records.iter().filter_map(|record| match record {
            SinkRecord::Light { light, .. } => Some(light),
            _ => None,
        })
    }

    pub fn probe_volumes(&self) -> impl Iterator<Item = &ProbeVolumeRecord> {
        self.records.iter().filter_map(|record| match record {
            SinkRecord::ProbeVolume { volume, .. } => Some(volume),
            _ => None,
        })
    }
}

impl SceneSink for RecordingSink {
    fn place(&mut self, parent: &str, op: &PlacementOp) -> SinkResult<()> {
        self.records.push(SinkRecord::Placement {
            parent: parent.to_string(),
            op: op.clone(),
        });
        Ok(())
    }

    fn place_light(&mut self, parent: &str, light: &LightRecord) -> SinkResult<()> {
        self.records.push(SinkRecord::Light {
            parent: parent.to_string(),
            light: light.clone(),
        });
        Ok(())
    }

    fn place_probe_volume(&mut self, parent: &str, volume: &ProbeVolumeRecord) -> SinkResult<()> {
        self.records.push(SinkRecord::ProbeVolume {
            parent: parent.to_string(),
            volume: volume.clone(),
        });
        Ok(())
    }
}

/// Sink that writes newline-delimited JSON.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> SinkResult<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_record(&mut self, record: &SinkRecord) -> SinkResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }
}

impl<W: Write> SceneSink for JsonLinesSink<W> {
    fn place(&mut self, parent: &str, op: &PlacementOp) -> SinkResult<()> {
        self.write_record(&SinkRecord::Placement {
            parent: parent.to_string(),
            op: op.clone(),
        })
    }

    fn place_light(&mut self, parent: &str, light: &LightRecord) -> SinkResult<()> {
        self.write_record(&SinkRecord::Light {
            parent: parent.to_string(),
            light: light.clone(),
        })
    }

    fn place_probe_volume(&mut self, parent: &str, volume: &ProbeVolumeRecord) -> SinkResult<()> {
        self.write_record(&SinkRecord::ProbeVolume {
            parent: parent.to_string(),
            volume: volume.clone(),
        })
    }
}
