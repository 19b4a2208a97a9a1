//! Traces sampled weights of a network across training checkpoints and
//! renders them as Chart.js line charts.

pub mod chart;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod report;
pub mod sampling;
pub mod scan;

use rand::{rngs::StdRng, SeedableRng};

pub use config::AnalysisConfig;
pub use error::{Result, TraceError};

use crate::{
    checkpoint::Layer,
    report::OutputFiles,
    sampling::choose_coords,
    scan::ScanSummary,
};

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct Report {
    pub files: OutputFiles,
    pub summary: ScanSummary,
}

/// Runs the whole trace: shape discovery, coordinate sampling, generation
/// scan, chart assembly and output emission.
///
/// # Errors
/// Returns a `TraceError` if the config is invalid, the final checkpoint is
/// missing or malformed, any existing checkpoint cannot be parsed or an
/// output file cannot be written.
pub fn run(config: &AnalysisConfig) -> Result<Report> {
    config.validate()?;

    let shapes = checkpoint::discover_shapes(config)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mode = config.sampling_mode();
    let count = config.max_weights_to_plot;
    let wi_coords = choose_coords(Layer::Wi, shapes.wi, count, mode, &mut rng);
    let wo_coords = choose_coords(Layer::Wo, shapes.wo, count, mode, &mut rng);
    log::info!(
        "tracking {} wi and {} wo weight(s) ({mode:?})",
        wi_coords.len(),
        wo_coords.len()
    );

    let scan = scan::scan_checkpoints(config, &wi_coords, &wo_coords)?;

    let generations = config.generations();
    let wi_chart = chart::build_chart(&generations, &scan.wi, &mut rng);
    let wo_chart = chart::build_chart(&generations, &scan.wo, &mut rng);

    let files = report::write_outputs(&config.output_dir, &wi_chart, &wo_chart)?;

    Ok(Report {
        files,
        summary: scan.summary,
    })
}
