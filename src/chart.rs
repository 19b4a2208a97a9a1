use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::scan::WeightSeries;

/// One line of a Chart.js line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    /// One entry per label; `None` where the generation has no value.
    pub data: Vec<Option<f64>>,
    pub fill: bool,
    pub border_color: String,
}

/// The `data` object of a Chart.js line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<u32>,
    pub datasets: Vec<Dataset>,
}

/// Aligns every series of `series` to the `generations` axis, one dataset
/// per sampled coordinate.
pub fn build_chart<R: Rng + ?Sized>(
    generations: &[u32],
    series: &WeightSeries,
    rng: &mut R,
) -> ChartData {
    let layer = series.layer();
    let datasets = series
        .iter()
        .map(|(coord, values)| Dataset {
            label: format!("{layer}{coord}"),
            data: generations.iter().map(|g| values.get(g).copied()).collect(),
            fill: false,
            border_color: random_color(rng),
        })
        .collect();

    ChartData {
        labels: generations.to_vec(),
        datasets,
    }
}

/// An opaque `rgba(r,g,b,1)` color. Nothing prevents two series from getting
/// the same or nearly the same color.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let (r, g, b): (u8, u8, u8) = (rng.random(), rng.random(), rng.random());
    format!("rgba({r},{g},{b},1)")
}
