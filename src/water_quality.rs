// 💧 Water Quality Scoring
// Scores each reading against its optimal range, then combines them into a
// single weighted quality score in [0, 1]

use crate::db::Observation;
use serde::{Deserialize, Serialize};

// ============================================================================
// PARAMETERS
// ============================================================================

/// The four readings that feed the overall water quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterParameter {
    /// Dissolved oxygen (mg/L)
    DissolvedOxygen,
    /// Turbidity (NTU)
    Turbidity,
    /// Microplastic concentration (particles/L)
    Microplastic,
    /// Chemical pollutant index
    ChemicalPollutants,
}

impl WaterParameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterParameter::DissolvedOxygen => "Dissolved Oxygen",
            WaterParameter::Turbidity => "Turbidity",
            WaterParameter::Microplastic => "Microplastic Count",
            WaterParameter::ChemicalPollutants => "Chemical Pollutants",
        }
    }

    /// Optimal range for this parameter
    pub fn optimal_range(&self) -> (f64, f64) {
        match self {
            WaterParameter::DissolvedOxygen => (6.5, 8.5),
            WaterParameter::Turbidity => (0.0, 5.0),
            WaterParameter::Microplastic => (0.0, 10.0),
            WaterParameter::ChemicalPollutants => (0.0, 2.0),
        }
    }

    /// Weight of this parameter in the overall score (weights sum to 1.0)
    pub fn importance(&self) -> f64 {
        match self {
            WaterParameter::DissolvedOxygen => 0.3,
            WaterParameter::Turbidity => 0.2,
            WaterParameter::Microplastic => 0.3,
            WaterParameter::ChemicalPollutants => 0.2,
        }
    }

    pub fn all() -> [WaterParameter; 4] {
        [
            WaterParameter::DissolvedOxygen,
            WaterParameter::Turbidity,
            WaterParameter::Microplastic,
            WaterParameter::ChemicalPollutants,
        ]
    }
}

/// Score a single reading against an optimal range
///
/// 1.0 inside the range; outside it, the score decays linearly with the
/// relative distance from the nearest bound and bottoms out at 0.
pub fn parameter_score(value: f64, optimal_range: (f64, f64)) -> f64 {
    let (min_val, max_val) = optimal_range;

    if min_val <= value && value <= max_val {
        1.0
    } else if value < min_val {
        // min_val of 0 cannot reach this branch (value would be negative and
        // negative readings are rejected by the quality engine); guard anyway
        if min_val <= 0.0 {
            return 0.0;
        }
        (1.0 - (min_val - value) / min_val).max(0.0)
    } else {
        if max_val <= 0.0 {
            return 0.0;
        }
        (1.0 - (value - max_val) / max_val).max(0.0)
    }
}

// ============================================================================
// QUALITY BAND
// ============================================================================

/// Display band for an overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityBand {
    Good,
    Moderate,
    Poor,
}

impl QualityBand {
    /// Band thresholds: > 0.7 Good, > 0.4 Moderate, else Poor
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            QualityBand::Good
        } else if score > 0.4 {
            QualityBand::Moderate
        } else {
            QualityBand::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityBand::Good => "Good",
            QualityBand::Moderate => "Moderate",
            QualityBand::Poor => "Poor",
        }
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// Per-parameter score alongside the raw reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterScore {
    pub parameter: WaterParameter,
    pub value: f64,
    pub score: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterQualityReport {
    pub station: String,
    pub date: String,
    pub parameters: Vec<ParameterScore>,
    pub overall_score: f64,
    pub band: QualityBand,
}

impl WaterQualityReport {
    pub fn summary(&self) -> String {
        format!(
            "{} @ {}: {:.1}% ({})",
            self.station,
            self.date,
            self.overall_score * 100.0,
            self.band.as_str()
        )
    }
}

/// Overall water quality score in [0, 1] for one observation
///
/// Weighted sum of the four parameter scores: oxygen 0.3, turbidity 0.2,
/// microplastic 0.3, chemical pollutants 0.2
pub fn water_quality_score(obs: &Observation) -> f64 {
    WaterParameter::all()
        .iter()
        .map(|p| p.importance() * parameter_score(reading_for(obs, *p), p.optimal_range()))
        .sum()
}

/// Full per-parameter breakdown for one observation
pub fn assess(obs: &Observation) -> WaterQualityReport {
    let parameters: Vec<ParameterScore> = WaterParameter::all()
        .iter()
        .map(|p| {
            let value = reading_for(obs, *p);
            ParameterScore {
                parameter: *p,
                value,
                score: parameter_score(value, p.optimal_range()),
                weight: p.importance(),
            }
        })
        .collect();

    let overall_score = parameters.iter().map(|p| p.weight * p.score).sum();

    WaterQualityReport {
        station: obs.station.clone(),
        date: obs.date.clone(),
        parameters,
        overall_score,
        band: QualityBand::from_score(overall_score),
    }
}

fn reading_for(obs: &Observation, parameter: WaterParameter) -> f64 {
    match parameter {
        WaterParameter::DissolvedOxygen => obs.dissolved_oxygen,
        WaterParameter::Turbidity => obs.turbidity,
        WaterParameter::Microplastic => obs.microplastic,
        WaterParameter::ChemicalPollutants => obs.chemical_pollutants,
    }
}

// ============================================================================
// TESTS
// ============================================================================
