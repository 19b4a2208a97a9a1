use std::path::{Path, PathBuf};

use crate::{
    chart::ChartData,
    checkpoint::Layer,
    error::{Result, TraceError},
};

pub const HTML_FILE_NAME: &str = "weight_analysis_b.html";
const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js";

/// Renders a standalone page drawing both charts with Chart.js.
///
/// # Errors
/// Returns `Serialize` if either chart cannot be turned into JSON.
pub fn render_html(wi: &ChartData, wo: &ChartData) -> Result<String> {
    let wi_json = serde_json::to_string(wi)?;
    let wo_json = serde_json::to_string(wo)?;
    let wi_title = Layer::Wi.title();
    let wo_title = Layer::Wo.title();

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Neural Network Weight Analysis</title>
    <script src="{CHART_JS_URL}"></script>
</head>
<body>
    <div style="width: 80%; margin: 0 auto;">
        <h1>{wi_title}</h1>
        <canvas id="wiChart"></canvas>
        <h1>{wo_title}</h1>
        <canvas id="woChart"></canvas>
    </div>

    <script>
        const wiData = {wi_json};
        const woData = {wo_json};

        const wiCtx = document.getElementById('wiChart').getContext('2d');
        new Chart(wiCtx, {{
            type: 'line',
            data: wiData,
            options: {{
                scales: {{
                    y: {{
                        beginAtZero: true
                    }}
                }}
            }}
        }});

        const woCtx = document.getElementById('woChart').getContext('2d');
        new Chart(woCtx, {{
            type: 'line',
            data: woData,
            options: {{
                scales: {{
                    y: {{
                        beginAtZero: true
                    }}
                }}
            }}
        }});
    </script>
</body>
</html>
"#
    ))
}

/// Paths of the files written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub wi_json: PathBuf,
    pub wo_json: PathBuf,
    pub html: PathBuf,
}

/// Writes both chart data files and the HTML page into `output_dir`,
/// creating the directory if needed.
///
/// # Errors
/// Returns a `TraceError` if serialization or any write fails.
pub fn write_outputs(output_dir: &Path, wi: &ChartData, wo: &ChartData) -> Result<OutputFiles> {
    std::fs::create_dir_all(output_dir).map_err(|e| TraceError::io(output_dir, e))?;

    let files = OutputFiles {
        wi_json: output_dir.join(Layer::Wi.data_file_name()),
        wo_json: output_dir.join(Layer::Wo.data_file_name()),
        html: output_dir.join(HTML_FILE_NAME),
    };

    write_file(&files.wi_json, &serde_json::to_string(wi)?)?;
    write_file(&files.wo_json, &serde_json::to_string(wo)?)?;
    write_file(&files.html, &render_html(wi, wo)?)?;

    Ok(files)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| TraceError::io(path, e))?;
    log::info!("wrote {}", path.display());
    Ok(())
}
