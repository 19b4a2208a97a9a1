use std::collections::BTreeMap;

use log::{debug, info};

use crate::{
    checkpoint::{Checkpoint, Layer},
    config::AnalysisConfig,
    error::Result,
    sampling::Coord,
};

/// Recorded values of one coordinate, by generation.
pub type Series = BTreeMap<u32, f64>;

/// The series of every sampled coordinate of one matrix, in sampling order.
#[derive(Debug, Clone)]
pub struct WeightSeries {
    layer: Layer,
    entries: Vec<(Coord, Series)>,
}

impl WeightSeries {
    pub fn new(layer: Layer, coords: &[Coord]) -> Self {
        Self {
            layer,
            entries: coords.iter().map(|&c| (c, Series::new())).collect(),
        }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Series)> {
        self.entries.iter().map(|(c, s)| (*c, s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records this matrix's sampled weights from `checkpoint`. Coordinates
    /// the checkpoint does not cover get no point for `generation`.
    pub fn record(&mut self, generation: u32, checkpoint: &Checkpoint) {
        for (coord, series) in &mut self.entries {
            if let Some(value) = checkpoint.value(self.layer, *coord) {
                series.insert(generation, value);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub loaded: usize,
    pub missing: usize,
}

/// Everything a scan collected.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub wi: WeightSeries,
    pub wo: WeightSeries,
    pub summary: ScanSummary,
}

/// Walks the configured generations in increasing order and records the
/// sampled weights of every checkpoint that exists.
///
/// # Errors
/// Returns a `TraceError` if an existing checkpoint cannot be read or parsed.
pub fn scan_checkpoints(
    config: &AnalysisConfig,
    wi_coords: &[Coord],
    wo_coords: &[Coord],
) -> Result<ScanResult> {
    let mut wi = WeightSeries::new(Layer::Wi, wi_coords);
    let mut wo = WeightSeries::new(Layer::Wo, wo_coords);
    let mut summary = ScanSummary::default();

    for generation in config.generations() {
        info!("processing generation {generation}");

        let path = config.checkpoint_path(generation);
        let Some(checkpoint) = Checkpoint::load_if_exists(&path)? else {
            debug!(generation = generation; "checkpoint missing, skipping");
            summary.missing += 1;
            continue;
        };

        wi.record(generation, &checkpoint);
        wo.record(generation, &checkpoint);
        summary.loaded += 1;
    }

    info!(
        "scanned {} generation(s): {} loaded, {} missing",
        summary.loaded + summary.missing,
        summary.loaded,
        summary.missing
    );

    Ok(ScanResult { wi, wo, summary })
}
