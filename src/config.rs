use std::{
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{Result, TraceError},
    sampling::SamplingMode,
};

const DEFAULT_STEP: NonZeroU32 = NonZeroU32::new(100).unwrap();

/// Every knob of a weight trace run.
///
/// The defaults describe the othello training run the tool was first written
/// for: individual 0, generations 1000 through 64206 every 100, and 100
/// randomly chosen weights per matrix.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Last generation to scan. Its checkpoint fixes the matrix shapes.
    pub final_generation: u32,
    /// Individual id, i.e. the checkpoint file stem inside a generation dir.
    pub target_individual: u32,
    /// Weights tracked per matrix.
    pub max_weights_to_plot: usize,
    /// Pick weights at random instead of the first ones in row-major order.
    pub sample_weights: bool,
    pub first_generation: u32,
    pub generation_step: NonZeroU32,
    /// Root holding one sub directory per generation.
    pub train_dir: PathBuf,
    /// Where the JSON and HTML outputs are written.
    pub output_dir: PathBuf,
    /// Fixes both sampled coordinates and series colors when set.
    pub seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            final_generation: 64206,
            target_individual: 0,
            max_weights_to_plot: 100,
            sample_weights: true,
            first_generation: 1000,
            generation_step: DEFAULT_STEP,
            train_dir: PathBuf::from("./train"),
            output_dir: PathBuf::from("."),
            seed: None,
        }
    }
}

impl AnalysisConfig {
    /// Loads a config from a JSON file. Missing fields take their default.
    ///
    /// # Errors
    /// Returns a `TraceError` if the file cannot be read, is not a valid
    /// config object or fails [`AnalysisConfig::validate`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TraceError::io(path, e))?;
        let config: Self = serde_json::from_str(&content).map_err(|source| TraceError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `InvalidConfig` if the generation range is inverted.
    pub fn validate(&self) -> Result<()> {
        if self.first_generation > self.final_generation {
            return Err(TraceError::InvalidConfig(format!(
                "first_generation ({}) is after final_generation ({})",
                self.first_generation, self.final_generation
            )));
        }

        Ok(())
    }

    pub fn sampling_mode(&self) -> SamplingMode {
        if self.sample_weights {
            SamplingMode::Random
        } else {
            SamplingMode::Sequential
        }
    }

    /// The generation axis: `first_generation` to `final_generation`
    /// inclusive, every `generation_step`.
    pub fn generations(&self) -> Vec<u32> {
        (self.first_generation..=self.final_generation)
            .step_by(self.generation_step.get() as usize)
            .collect()
    }

    pub fn checkpoint_path(&self, generation: u32) -> PathBuf {
        self.train_dir
            .join(generation.to_string())
            .join(format!("{}.json", self.target_individual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_generation_axis() {
        let config = AnalysisConfig::default();
        let gens = config.generations();

        assert_eq!(gens.first(), Some(&1000));
        assert_eq!(gens[1], 1100);
        assert_eq!(gens.last(), Some(&64200));
        assert_eq!(gens.len(), 633);
    }

    #[test]
    fn final_generation_is_inclusive() {
        let config = AnalysisConfig {
            first_generation: 1000,
            final_generation: 1300,
            ..Default::default()
        };

        assert_eq!(config.generations(), vec![1000, 1100, 1200, 1300]);
    }

    #[test]
    fn single_generation_range() {
        let config = AnalysisConfig {
            first_generation: 500,
            final_generation: 500,
            ..Default::default()
        };

        assert_eq!(config.generations(), vec![500]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let config = AnalysisConfig {
            first_generation: 2000,
            final_generation: 1000,
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(TraceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn checkpoint_path_layout() {
        let config = AnalysisConfig {
            train_dir: PathBuf::from("runs/train"),
            target_individual: 7,
            ..Default::default()
        };

        assert_eq!(
            config.checkpoint_path(1200),
            PathBuf::from("runs/train/1200/7.json")
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"final_generation": 3000, "sample_weights": false}"#)
                .unwrap();

        assert_eq!(config.final_generation, 3000);
        assert_eq!(config.sampling_mode(), SamplingMode::Sequential);
        assert_eq!(config.max_weights_to_plot, 100);
        assert_eq!(config.generation_step.get(), 100);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn unknown_and_zero_step_fields_are_rejected() {
        assert!(serde_json::from_str::<AnalysisConfig>(r#"{"generations": 3}"#).is_err());
        assert!(serde_json::from_str::<AnalysisConfig>(r#"{"generation_step": 0}"#).is_err());
    }

    #[test]
    fn missing_config_file() {
        let path = std::env::temp_dir().join("weight_trace_missing_config.json");
        let _ = std::fs::remove_file(&path);

        assert!(matches!(
            AnalysisConfig::from_json_file(&path),
            Err(TraceError::Io { .. })
        ));
    }
}
