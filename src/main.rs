use std::{env, process};

use log::info;
use weight_trace::AnalysisConfig;

fn main() {
    env_logger::init();

    // The only argument is an optional JSON config file.
    let config = match env::args().nth(1) {
        Some(path) => match AnalysisConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {e}");
                process::exit(1);
            }
        },
        None => AnalysisConfig::default(),
    };

    match weight_trace::run(&config) {
        Ok(report) => info!(
            "done: {} checkpoint(s) traced into {}",
            report.summary.loaded,
            report.files.html.display()
        ),
        Err(e) => {
            eprintln!("Error tracing weights: {e}");
            process::exit(1);
        }
    }
}
