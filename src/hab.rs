// 🦠 Harmful Algal Bloom Risk
// Weighted risk score over temperature, nutrients, salinity and pH

use crate::db::Observation;
use serde::{Deserialize, Serialize};

// ============================================================================
// RISK FACTORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    WaterTemperature,
    NutrientLevels,
    Salinity,
    PhLevel,
}

impl RiskFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFactor::WaterTemperature => "Water Temperature",
            RiskFactor::NutrientLevels => "Nutrient Levels",
            RiskFactor::Salinity => "Salinity",
            RiskFactor::PhLevel => "pH Levels",
        }
    }

    /// Sensitivity weight of this factor in the risk score (weights sum to 1.0)
    pub fn sensitivity(&self) -> f64 {
        match self {
            RiskFactor::WaterTemperature => 0.3,
            RiskFactor::NutrientLevels => 0.3,
            RiskFactor::Salinity => 0.2,
            RiskFactor::PhLevel => 0.2,
        }
    }

    pub fn all() -> [RiskFactor; 4] {
        [
            RiskFactor::WaterTemperature,
            RiskFactor::NutrientLevels,
            RiskFactor::Salinity,
            RiskFactor::PhLevel,
        ]
    }
}

// ============================================================================
// RISK LEVELS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// score > 0.8 Critical, > 0.6 High, > 0.4 Moderate, else Low
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            RiskLevel::Critical
        } else if score > 0.6 {
            RiskLevel::High
        } else if score > 0.4 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

// ============================================================================
// INPUTS & SCORING
// ============================================================================

/// Environmental parameters feeding the bloom risk model
///
/// Instrument ranges: temperature 20-35 degC, nutrients 0-10, salinity
/// 30-40 PSU, pH 6-9. Values outside those ranges are accepted and the
/// normalized factors are clamped to [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HabInputs {
    pub water_temp: f64,
    pub nutrient_levels: f64,
    pub salinity: f64,
    pub ph: f64,
}

impl HabInputs {
    pub fn from_observation(obs: &Observation) -> Self {
        HabInputs {
            water_temp: obs.water_temp,
            nutrient_levels: obs.nutrient_levels,
            salinity: obs.salinity,
            ph: obs.ph,
        }
    }

    /// Normalized contribution of one factor before weighting, in [0, 1]
    ///
    /// Temperature and nutrients scale with their magnitude; salinity and pH
    /// peak at their biological optimum (35 PSU, pH 8) and fall off with
    /// distance from it.
    fn normalized(&self, factor: RiskFactor) -> f64 {
        let raw = match factor {
            RiskFactor::WaterTemperature => self.water_temp / 35.0,
            RiskFactor::NutrientLevels => self.nutrient_levels / 10.0,
            RiskFactor::Salinity => 1.0 - (self.salinity - 35.0).abs() / 10.0,
            RiskFactor::PhLevel => 1.0 - (self.ph - 8.0).abs() / 2.0,
        };
        raw.clamp(0.0, 1.0)
    }
}

/// Weighted contribution of one factor to the final score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: RiskFactor,
    pub label: String,
    pub sensitivity: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabRiskReport {
    pub inputs: HabInputs,
    pub score: f64,
    pub level: RiskLevel,
    pub contributions: Vec<FactorContribution>,
    pub primary_concerns: Vec<String>,
}

/// Risk score in [0, 1] for the given environmental inputs
pub fn risk_score(inputs: &HabInputs) -> f64 {
    RiskFactor::all()
        .iter()
        .map(|f| f.sensitivity() * inputs.normalized(*f))
        .sum()
}

/// Full risk breakdown for the given environmental inputs
pub fn assess(inputs: &HabInputs) -> HabRiskReport {
    let contributions: Vec<FactorContribution> = RiskFactor::all()
        .iter()
        .map(|f| FactorContribution {
            factor: *f,
            label: f.as_str().to_string(),
            sensitivity: f.sensitivity(),
            contribution: f.sensitivity() * inputs.normalized(*f),
        })
        .collect();

    let score = contributions.iter().map(|c| c.contribution).sum();

    HabRiskReport {
        inputs: *inputs,
        score,
        level: RiskLevel::from_score(score),
        contributions,
        primary_concerns: vec![
            "Water quality degradation".to_string(),
            "Marine life stress".to_string(),
            "Ecosystem imbalance".to_string(),
        ],
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn default_inputs() -> HabInputs {
        // The instrument defaults: 25 degC, nutrients 2, salinity 35, pH 8
        HabInputs {
            water_temp: 25.0,
            nutrient_levels: 2.0,
            salinity: 35.0,
            ph: 8.0,
        }
    }

    #[test]
    fn test_sensitivities_sum_to_one() {
        let total: f64 = RiskFactor::all().iter().map(|f| f.sensitivity()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_inputs_score() {
        // 0.3*(25/35) + 0.3*(2/10) + 0.2*1 + 0.2*1 = 0.674...
        let score = risk_score(&default_inputs());
        let expected = 0.3 * (25.0 / 35.0) + 0.3 * 0.2 + 0.2 + 0.2;
        assert!((score - expected).abs() < 1e-9);
        assert_eq!(RiskLevel::from_score(score), RiskLevel::High);
    }

    #[test]
    fn test_worst_case_inputs_are_critical() {
        let inputs = HabInputs {
            water_temp: 35.0,
            nutrient_levels: 10.0,
            salinity: 35.0,
            ph: 8.0,
        };
        let score = risk_score(&inputs);
        assert!((score - 1.0).abs() < 1e-9);
        assert_eq!(RiskLevel::from_score(score), RiskLevel::Critical);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        // Salinity far from 35 would make its factor negative unclamped
        let inputs = HabInputs {
            water_temp: 25.0,
            nutrient_levels: 2.0,
            salinity: 20.0,
            ph: 4.0,
        };
        let score = risk_score(&inputs);
        assert!(score >= 0.0 && score <= 1.0);

        // Both distance factors clamp to 0, leaving temp + nutrients
        let expected = 0.3 * (25.0 / 35.0) + 0.3 * 0.2;
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_risk_level_thresholds() {
        assert_eq!(RiskLevel::from_score(0.81), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(0.8), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.61), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.6), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(0.41), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(0.4), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
    }

    #[test]
    fn test_assess_breakdown_sums_to_score() {
        let report = assess(&default_inputs());

        assert_eq!(report.contributions.len(), 4);
        let sum: f64 = report.contributions.iter().map(|c| c.contribution).sum();
        assert!((sum - report.score).abs() < 1e-9);
        assert_eq!(report.primary_concerns.len(), 3);
    }

    #[test]
    fn test_from_observation() {
        use std::collections::HashMap;

        let obs = Observation {
            date: "01/15/2025".to_string(),
            station: "Harbor Mouth".to_string(),
            dissolved_oxygen: 7.0,
            turbidity: 3.0,
            microplastic: 5.0,
            chemical_pollutants: 1.0,
            water_temp: 31.0,
            nutrient_levels: 8.0,
            salinity: 34.0,
            ph: 8.2,
            notes: String::new(),
            source_file: "test.csv".to_string(),
            line_number: "2".to_string(),
            id: "obs-1".to_string(),
            version: 1,
            system_time: None,
            metadata: HashMap::new(),
        };

        let inputs = HabInputs::from_observation(&obs);
        assert_eq!(inputs.water_temp, 31.0);
        assert_eq!(inputs.nutrient_levels, 8.0);

        let report = assess(&inputs);
        assert!(report.score > 0.6, "warm, nutrient-rich water is high risk");
    }
}
