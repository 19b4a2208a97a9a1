use std::{fmt, io, path::Path};

use ndarray::Array2;
use serde::Deserialize;

use crate::{
    config::AnalysisConfig,
    error::{Result, TraceError},
    sampling::Coord,
};

/// One of the two weight matrices stored in a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Input to hidden.
    Wi,
    /// Hidden to output.
    Wo,
}

impl Layer {
    pub const ALL: [Layer; 2] = [Layer::Wi, Layer::Wo];

    /// The checkpoint key, also used as the series label prefix.
    pub fn key(self) -> &'static str {
        match self {
            Self::Wi => "wi",
            Self::Wo => "wo",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Wi => "Input-Hidden Weights",
            Self::Wo => "Hidden-Output Weights",
        }
    }

    pub fn data_file_name(self) -> &'static str {
        match self {
            Self::Wi => "wi_data_b.json",
            Self::Wo => "wo_data_b.json",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Matrix dimensions as `(rows, cols)`.
pub type Shape = (usize, usize);

/// On-disk layout. The trainer also writes sizes and biases, which are ignored.
#[derive(Deserialize)]
struct RawCheckpoint {
    wi: Vec<Vec<f64>>,
    wo: Vec<Vec<f64>>,
}

/// The weights of one individual at one generation.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    wi: Array2<f64>,
    wo: Array2<f64>,
}

impl Checkpoint {
    /// Reads and parses a checkpoint file.
    ///
    /// # Errors
    /// Returns a `TraceError` if the file cannot be read, is not a checkpoint
    /// object or holds a matrix with rows of different lengths.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TraceError::io(path, e))?;
        Self::parse(path, &content)
    }

    /// Like [`Checkpoint::load`], but a missing file is `Ok(None)`.
    ///
    /// # Errors
    /// Any failure other than the file not existing.
    pub fn load_if_exists(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(path, &content).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TraceError::io(path, e)),
        }
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        let raw: RawCheckpoint =
            serde_json::from_str(content).map_err(|source| TraceError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            wi: to_matrix(path, Layer::Wi, raw.wi)?,
            wo: to_matrix(path, Layer::Wo, raw.wo)?,
        })
    }

    pub fn matrix(&self, layer: Layer) -> &Array2<f64> {
        match layer {
            Layer::Wi => &self.wi,
            Layer::Wo => &self.wo,
        }
    }

    pub fn shape(&self, layer: Layer) -> Shape {
        self.matrix(layer).dim()
    }

    /// The weight at `coord`, or `None` if this checkpoint's matrix is too
    /// small to contain it.
    pub fn value(&self, layer: Layer, coord: Coord) -> Option<f64> {
        self.matrix(layer).get((coord.row, coord.col)).copied()
    }
}

fn to_matrix(path: &Path, layer: Layer, rows: Vec<Vec<f64>>) -> Result<Array2<f64>> {
    let cols = rows.first().map_or(0, Vec::len);
    let n_rows = rows.len();

    if let Some(row) = rows.iter().position(|r| r.len() != cols) {
        return Err(TraceError::Ragged {
            path: path.to_path_buf(),
            layer: layer.key(),
            row,
        });
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, cols), flat).map_err(|_| TraceError::Ragged {
        path: path.to_path_buf(),
        layer: layer.key(),
        row: 0,
    })
}

/// The shapes of both matrices, taken from the final generation's checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shapes {
    pub wi: Shape,
    pub wo: Shape,
}

impl Shapes {
    pub fn of(&self, layer: Layer) -> Shape {
        match layer {
            Layer::Wi => self.wi,
            Layer::Wo => self.wo,
        }
    }
}

/// Loads the final checkpoint of the configured individual and reports the
/// shape of each matrix.
///
/// # Errors
/// Returns a `TraceError` if the checkpoint is missing or malformed, or if
/// either matrix has no rows or no columns.
pub fn discover_shapes(config: &AnalysisConfig) -> Result<Shapes> {
    let path = config.checkpoint_path(config.final_generation);
    let checkpoint = Checkpoint::load(&path)?;

    for layer in Layer::ALL {
        let (rows, cols) = checkpoint.shape(layer);
        if rows == 0 || cols == 0 {
            return Err(TraceError::EmptyMatrix {
                path,
                layer: layer.key(),
            });
        }
    }

    log::info!(
        "{}: wi is {:?}, wo is {:?}",
        path.display(),
        checkpoint.shape(Layer::Wi),
        checkpoint.shape(Layer::Wo)
    );

    Ok(Shapes {
        wi: checkpoint.shape(Layer::Wi),
        wo: checkpoint.shape(Layer::Wo),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(json: &str) -> Result<Checkpoint> {
        Checkpoint::parse(Path::new("test.json"), json)
    }

    #[test]
    fn parses_both_matrices() {
        let ckpt = parse(r#"{"wi": [[1, 2, 3], [4, 5, 6]], "wo": [[0.5], [-0.5], [1.5]]}"#).unwrap();

        assert_eq!(ckpt.shape(Layer::Wi), (2, 3));
        assert_eq!(ckpt.shape(Layer::Wo), (3, 1));
        assert_eq!(ckpt.value(Layer::Wi, Coord::new(1, 2)), Some(6.0));
        assert_eq!(ckpt.value(Layer::Wo, Coord::new(1, 0)), Some(-0.5));
    }

    #[test]
    fn ignores_sizes_and_biases() {
        let json = r#"{
            "inputSize": 1, "hiddenSize": 1, "outputSize": 1,
            "wi": [[0.25]], "wo": [[0.75]],
            "biasI": [0.0], "biasO": [0.0]
        }"#;

        let ckpt = parse(json).unwrap();
        assert_eq!(ckpt.value(Layer::Wo, Coord::new(0, 0)), Some(0.75));
    }

    #[test]
    fn out_of_range_coord_has_no_value() {
        let ckpt = parse(r#"{"wi": [[1.0]], "wo": [[2.0]]}"#).unwrap();

        assert_eq!(ckpt.value(Layer::Wi, Coord::new(0, 1)), None);
        assert_eq!(ckpt.value(Layer::Wi, Coord::new(3, 0)), None);
    }

    #[test]
    fn empty_matrix_loads_as_zero_by_zero() {
        let ckpt = parse(r#"{"wi": [], "wo": [[2.0]]}"#).unwrap();
        assert_eq!(ckpt.shape(Layer::Wi), (0, 0));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = parse(r#"{"wi": [[1.0, 2.0], [3.0]], "wo": [[2.0]]}"#).unwrap_err();

        assert!(matches!(
            err,
            TraceError::Ragged {
                layer: "wi",
                row: 1,
                ..
            }
        ));
    }

    #[test]
    fn missing_key_is_a_json_error() {
        assert!(matches!(
            parse(r#"{"wi": [[1.0]]}"#),
            Err(TraceError::Json { .. })
        ));
        assert!(matches!(parse("not json"), Err(TraceError::Json { .. })));
    }

    #[test]
    fn load_if_exists_on_missing_file() {
        let path = std::env::temp_dir().join("weight_trace_no_such_checkpoint.json");
        let _ = std::fs::remove_file(&path);

        assert!(Checkpoint::load_if_exists(&path).unwrap().is_none());
        assert!(matches!(
            Checkpoint::load(&path),
            Err(TraceError::Io { .. })
        ));
    }

    fn train_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("weight_trace_ckpt_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn discovers_shapes_from_final_generation() {
        let dir = train_dir("shapes");
        std::fs::create_dir_all(dir.join("1200")).unwrap();
        std::fs::write(
            dir.join("1200").join("3.json"),
            r#"{"wi": [[1, 2], [3, 4], [5, 6]], "wo": [[1, 2, 3, 4]]}"#,
        )
        .unwrap();

        let config = AnalysisConfig {
            train_dir: dir,
            final_generation: 1200,
            target_individual: 3,
            ..Default::default()
        };

        let shapes = discover_shapes(&config).unwrap();
        assert_eq!(shapes.of(Layer::Wi), (3, 2));
        assert_eq!(shapes.of(Layer::Wo), (1, 4));
    }

    #[test]
    fn empty_final_matrix_aborts() {
        let dir = train_dir("empty_final");
        std::fs::create_dir_all(dir.join("1000")).unwrap();
        std::fs::write(dir.join("1000").join("0.json"), r#"{"wi": [[1.0]], "wo": []}"#).unwrap();

        let config = AnalysisConfig {
            train_dir: dir,
            final_generation: 1000,
            ..Default::default()
        };

        assert!(matches!(
            discover_shapes(&config),
            Err(TraceError::EmptyMatrix { layer: "wo", .. })
        ));
    }

    #[test]
    fn missing_final_checkpoint_aborts() {
        let config = AnalysisConfig {
            train_dir: train_dir("missing_final"),
            ..Default::default()
        };

        assert!(matches!(
            discover_shapes(&config),
            Err(TraceError::Io { .. })
        ));
    }
}
