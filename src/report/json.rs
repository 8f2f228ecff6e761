use crate::core::threshold::{PairMeans, ThresholdResult};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    threshold_percent: u8,
    means: &'a PairMeans,
    passing: Vec<PassingPair>,
}

#[derive(Serialize)]
struct PassingPair {
    pair: String,
    average: f64,
}

pub fn generate_json_report(result: &ThresholdResult) -> Result<String> {
    let report = JsonReport {
        threshold_percent: result.threshold_percent,
        means: &result.means,
        passing: result
            .passing
            .iter()
            .map(|(pair, average)| PassingPair {
                pair: pair.label(),
                average: *average,
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}
