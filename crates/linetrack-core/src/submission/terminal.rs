//! Terminal quality measurements
//!
//! Each submission may carry up to [`TERMINAL_SLOTS`] crimped-terminal
//! inspections. Every metric can arrive twice: the value read off the
//! measuring device and a value typed in by hand. The hand-typed value wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entry::{parse_optional_real, SubmissionError};

/// Number of terminal slots a single submission can describe
pub const TERMINAL_SLOTS: usize = 2;

// ============================================================================
// METRICS
// ============================================================================

/// The five quality metrics recorded per terminal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalMetric {
    CrimpHeight,
    CrimpWidth,
    InsulationHeight,
    InsulationWidth,
    PullForce,
}

impl TerminalMetric {
    /// All metrics in export column order
    pub const ALL: [TerminalMetric; 5] = [
        TerminalMetric::CrimpHeight,
        TerminalMetric::CrimpWidth,
        TerminalMetric::InsulationHeight,
        TerminalMetric::InsulationWidth,
        TerminalMetric::PullForce,
    ];

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalMetric::CrimpHeight => "crimp_height",
            TerminalMetric::CrimpWidth => "crimp_width",
            TerminalMetric::InsulationHeight => "insulation_height",
            TerminalMetric::InsulationWidth => "insulation_width",
            TerminalMetric::PullForce => "pull_force",
        }
    }

    /// Human-readable column label
    pub fn label(&self) -> &'static str {
        match self {
            TerminalMetric::CrimpHeight => "Crimp Height",
            TerminalMetric::CrimpWidth => "Crimp Width",
            TerminalMetric::InsulationHeight => "Insulation Height",
            TerminalMetric::InsulationWidth => "Insulation Width",
            TerminalMetric::PullForce => "Pull Force",
        }
    }
}

impl std::fmt::Display for TerminalMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolve one metric: a manual value overrides the measured one.
pub fn resolve_metric(manual: Option<f64>, measured: Option<f64>) -> Option<f64> {
    manual.or(measured)
}

// ============================================================================
// READINGS
// ============================================================================

/// Measured and manual values for a single metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricReading {
    pub measured: Option<f64>,
    pub manual: Option<f64>,
}

impl MetricReading {
    pub fn new(measured: Option<f64>, manual: Option<f64>) -> Self {
        Self { measured, manual }
    }

    /// The value shown on the dashboard
    pub fn resolve(&self) -> Option<f64> {
        resolve_metric(self.manual, self.measured)
    }

    pub fn is_empty(&self) -> bool {
        self.measured.is_none() && self.manual.is_none()
    }
}

/// One terminal slot's inspection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerminalMeasurements {
    readings: BTreeMap<TerminalMetric, MetricReading>,
}

impl TerminalMeasurements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, metric: TerminalMetric, reading: MetricReading) -> Self {
        self.set(metric, reading);
        self
    }

    pub fn set(&mut self, metric: TerminalMetric, reading: MetricReading) {
        if reading.is_empty() {
            self.readings.remove(&metric);
        } else {
            self.readings.insert(metric, reading);
        }
    }

    pub fn get(&self, metric: TerminalMetric) -> MetricReading {
        self.readings.get(&metric).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Every metric merged with [`resolve_metric`]
    pub fn resolved(&self) -> BTreeMap<TerminalMetric, Option<f64>> {
        TerminalMetric::ALL
            .iter()
            .map(|metric| (*metric, self.get(*metric).resolve()))
            .collect()
    }
}

// ============================================================================
// WIRE INPUT
// ============================================================================

/// Raw metric values as sent by the worker page (strings or numbers)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricInput {
    #[serde(default)]
    pub measured: Option<Value>,
    #[serde(default)]
    pub manual: Option<Value>,
}

/// Raw terminal slot as sent by the worker page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalInput {
    #[serde(default)]
    pub crimp_height: Option<MetricInput>,
    #[serde(default)]
    pub crimp_width: Option<MetricInput>,
    #[serde(default)]
    pub insulation_height: Option<MetricInput>,
    #[serde(default)]
    pub insulation_width: Option<MetricInput>,
    #[serde(default)]
    pub pull_force: Option<MetricInput>,
}

impl TerminalInput {
    fn metric(&self, metric: TerminalMetric) -> Option<&MetricInput> {
        match metric {
            TerminalMetric::CrimpHeight => self.crimp_height.as_ref(),
            TerminalMetric::CrimpWidth => self.crimp_width.as_ref(),
            TerminalMetric::InsulationHeight => self.insulation_height.as_ref(),
            TerminalMetric::InsulationWidth => self.insulation_width.as_ref(),
            TerminalMetric::PullForce => self.pull_force.as_ref(),
        }
    }

    /// Parse every metric; blank values count as absent.
    pub fn into_measurements(self) -> Result<TerminalMeasurements, SubmissionError> {
        let mut measurements = TerminalMeasurements::new();
        for metric in TerminalMetric::ALL {
            let Some(input) = self.metric(metric) else {
                continue;
            };
            let measured = parse_optional_real(metric.as_str(), input.measured.as_ref())?;
            let manual = parse_optional_real(metric.as_str(), input.manual.as_ref())?;
            measurements.set(metric, MetricReading::new(measured, manual));
        }
        Ok(measurements)
    }
}

// ============================================================================
// TESTS
// ============================================================================
