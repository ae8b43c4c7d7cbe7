// 🪸 Coral Reef Health Assessment
// Condition distribution across the surveyed reef and per-condition
// recovery potential

use serde::{Deserialize, Serialize};

// ============================================================================
// CORAL CONDITIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoralCondition {
    Healthy,
    EarlyBleaching,
    AdvancedBleaching,
    Disease,
}

impl CoralCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoralCondition::Healthy => "Healthy Coral",
            CoralCondition::EarlyBleaching => "Early Bleaching",
            CoralCondition::AdvancedBleaching => "Advanced Bleaching",
            CoralCondition::Disease => "Coral Disease",
        }
    }

    pub fn all() -> [CoralCondition; 4] {
        [
            CoralCondition::Healthy,
            CoralCondition::EarlyBleaching,
            CoralCondition::AdvancedBleaching,
            CoralCondition::Disease,
        ]
    }
}

/// Prevalence weight and recovery potential for one condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CoralProfile {
    pub weight: f64,
    pub recovery_potential: f64,
}

pub struct CoralModel;

impl CoralModel {
    pub fn profile(condition: CoralCondition) -> CoralProfile {
        match condition {
            CoralCondition::Healthy => CoralProfile {
                weight: 0.4,
                recovery_potential: 0.9,
            },
            CoralCondition::EarlyBleaching => CoralProfile {
                weight: 0.3,
                recovery_potential: 0.6,
            },
            CoralCondition::AdvancedBleaching => CoralProfile {
                weight: 0.2,
                recovery_potential: 0.2,
            },
            CoralCondition::Disease => CoralProfile {
                weight: 0.1,
                recovery_potential: 0.1,
            },
        }
    }
}

// ============================================================================
// ASSESSMENT REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoralConditionReport {
    pub condition: CoralCondition,
    pub label: String,
    pub weight: f64,
    pub recovery_potential: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoralAssessment {
    pub conditions: Vec<CoralConditionReport>,
    /// Prevalence-weighted recovery outlook in [0, 1]
    pub recovery_outlook: f64,
    pub stress_factors: Vec<String>,
}

impl CoralAssessment {
    pub fn report() -> Self {
        let conditions: Vec<CoralConditionReport> = CoralCondition::all()
            .iter()
            .map(|c| {
                let profile = CoralModel::profile(*c);
                CoralConditionReport {
                    condition: *c,
                    label: c.as_str().to_string(),
                    weight: profile.weight,
                    recovery_potential: profile.recovery_potential,
                }
            })
            .collect();

        let recovery_outlook = conditions
            .iter()
            .map(|c| c.weight * c.recovery_potential)
            .sum();

        CoralAssessment {
            conditions,
            recovery_outlook,
            stress_factors: vec![
                "Ocean temperature".to_string(),
                "Water acidity".to_string(),
                "Environmental pollution".to_string(),
            ],
        }
    }

    /// Fraction of the reef showing any bleaching or disease
    pub fn degraded_fraction(&self) -> f64 {
        self.conditions
            .iter()
            .filter(|c| c.condition != CoralCondition::Healthy)
            .map(|c| c.weight)
            .sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_weights_sum_to_one() {
        let total: f64 = CoralCondition::all()
            .iter()
            .map(|c| CoralModel::profile(*c).weight)
            .sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_recovery_potentials() {
        assert_eq!(
            CoralModel::profile(CoralCondition::Healthy).recovery_potential,
            0.9
        );
        assert_eq!(
            CoralModel::profile(CoralCondition::Disease).recovery_potential,
            0.1
        );
    }

    #[test]
    fn test_weighted_recovery_outlook() {
        let assessment = CoralAssessment::report();

        // 0.4*0.9 + 0.3*0.6 + 0.2*0.2 + 0.1*0.1 = 0.59
        assert!((assessment.recovery_outlook - 0.59).abs() < 1e-9);
    }

    #[test]
    fn test_degraded_fraction() {
        let assessment = CoralAssessment::report();
        // 0.3 + 0.2 + 0.1 = 0.6
        assert!((assessment.degraded_fraction() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_stress_factors_present() {
        let assessment = CoralAssessment::report();
        assert_eq!(assessment.stress_factors.len(), 3);
        assert!(assessment
            .stress_factors
            .iter()
            .any(|f| f.contains("temperature")));
    }
}
