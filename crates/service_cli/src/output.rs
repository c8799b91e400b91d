//! Table and JSON rendering of command results

use montecarlo_core::{ConfidenceInterval, SimulationResult};
use serde::Serialize;

use crate::config::OutputFormat;
use crate::Result;

/// One engine run
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    /// Policy that produced the run
    pub policy: &'static str,
    /// Engine output
    pub result: SimulationResult,
    /// 95% confidence interval
    pub ci_95: ConfidenceInterval,
    /// Absolute distance from the exact answer, when known
    pub error: Option<f64>,
}

impl Row {
    /// Builds a row, computing the error against `exact`
    pub fn new(policy: &'static str, result: SimulationResult, exact: Option<f64>) -> Self {
        Self {
            policy,
            result,
            ci_95: result.ci_95(),
            error: exact.map(|x| (result.estimate - x).abs()),
        }
    }
}

/// Output of one command
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Human-readable title
    pub title: String,
    /// Exact answer, when known
    pub exact: Option<f64>,
    /// Runs in execution order
    pub rows: Vec<Row>,
}

impl Report {
    /// Empty report
    pub fn new(title: impl Into<String>, exact: Option<f64>) -> Self {
        Self {
            title: title.into(),
            exact,
            rows: Vec::new(),
        }
    }

    /// Appends a run
    pub fn push(&mut self, policy: &'static str, result: SimulationResult) {
        self.rows.push(Row::new(policy, result, self.exact));
    }

    /// Renders the report in the requested format
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Table => Ok(self.to_table()),
        }
    }

    fn to_table(&self) -> String {
        let rule = "-".repeat(84);
        let mut out = String::new();

        out.push_str(&format!("\n=== {} ===\n", self.title));
        if let Some(exact) = self.exact {
            out.push_str(&format!("Exact value: {:.6}\n", exact));
        }
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "{:>12}{:>12}{:>15}{:>15}{:>15}{:>15}\n",
            "Policy", "Samples", "Estimate", "Error", "Std Error", "Time (ms)"
        ));
        out.push_str(&rule);
        out.push('\n');

        for row in &self.rows {
            let error = row
                .error
                .map(|e| format!("{:.2e}", e))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "{:>12}{:>12}{:>15.6}{:>15}{:>15.6}{:>15.4}\n",
                row.policy,
                row.result.iterations,
                row.result.estimate,
                error,
                row.result.standard_error,
                row.result.elapsed_ms
            ));
        }
        out.push_str(&rule);
        out.push('\n');
        out
    }
}
