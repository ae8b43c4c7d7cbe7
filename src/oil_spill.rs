// 🛢️ Oil Spill Impact Assessment
// Severity-level distribution plus classification of an observed impact
// fraction into a severity level

use serde::{Deserialize, Serialize};

// ============================================================================
// SEVERITY LEVELS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpillSeverity {
    Minor,
    Moderate,
    Major,
    Catastrophic,
}

impl SpillSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpillSeverity::Minor => "Minor Spill",
            SpillSeverity::Moderate => "Moderate Spill",
            SpillSeverity::Major => "Major Spill",
            SpillSeverity::Catastrophic => "Catastrophic Spill",
        }
    }

    pub fn all() -> [SpillSeverity; 4] {
        [
            SpillSeverity::Minor,
            SpillSeverity::Moderate,
            SpillSeverity::Major,
            SpillSeverity::Catastrophic,
        ]
    }
}

/// Detection weight and ecological impact for one severity level
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpillProfile {
    pub detection_weight: f64,
    pub ecological_impact: f64,
}

pub struct OilSpillModel;

impl OilSpillModel {
    pub fn profile(severity: SpillSeverity) -> SpillProfile {
        match severity {
            SpillSeverity::Minor => SpillProfile {
                detection_weight: 0.4,
                ecological_impact: 0.3,
            },
            SpillSeverity::Moderate => SpillProfile {
                detection_weight: 0.3,
                ecological_impact: 0.6,
            },
            SpillSeverity::Major => SpillProfile {
                detection_weight: 0.2,
                ecological_impact: 0.9,
            },
            SpillSeverity::Catastrophic => SpillProfile {
                detection_weight: 0.1,
                ecological_impact: 1.0,
            },
        }
    }
}

/// Map an observed impact fraction onto the smallest severity level that
/// covers it (Minor covers up to 0.3, Moderate up to 0.6, Major up to 0.9)
pub fn classify(impact: f64) -> SpillSeverity {
    for severity in SpillSeverity::all() {
        if impact <= OilSpillModel::profile(severity).ecological_impact {
            return severity;
        }
    }
    SpillSeverity::Catastrophic
}

// ============================================================================
// ASSESSMENT REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpillSeverityReport {
    pub severity: SpillSeverity,
    pub label: String,
    pub detection_weight: f64,
    pub ecological_impact: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OilSpillAssessment {
    pub severity_levels: Vec<SpillSeverityReport>,
    pub critical_effects: Vec<String>,
}

impl OilSpillAssessment {
    pub fn report() -> Self {
        let severity_levels = SpillSeverity::all()
            .iter()
            .map(|s| {
                let profile = OilSpillModel::profile(*s);
                SpillSeverityReport {
                    severity: *s,
                    label: s.as_str().to_string(),
                    detection_weight: profile.detection_weight,
                    ecological_impact: profile.ecological_impact,
                }
            })
            .collect();

        OilSpillAssessment {
            severity_levels,
            critical_effects: vec![
                "Marine habitat damage".to_string(),
                "Ecosystem disruption".to_string(),
                "Biodiversity impact".to_string(),
            ],
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_weights_sum_to_one() {
        let total: f64 = SpillSeverity::all()
            .iter()
            .map(|s| OilSpillModel::profile(*s).detection_weight)
            .sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_impact_is_monotonic_with_severity() {
        let impacts: Vec<f64> = SpillSeverity::all()
            .iter()
            .map(|s| OilSpillModel::profile(*s).ecological_impact)
            .collect();
        assert!(impacts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0.0), SpillSeverity::Minor);
        assert_eq!(classify(0.3), SpillSeverity::Minor);
        assert_eq!(classify(0.31), SpillSeverity::Moderate);
        assert_eq!(classify(0.6), SpillSeverity::Moderate);
        assert_eq!(classify(0.85), SpillSeverity::Major);
        assert_eq!(classify(0.95), SpillSeverity::Catastrophic);
        assert_eq!(classify(1.0), SpillSeverity::Catastrophic);
        // Values past 1.0 still classify
        assert_eq!(classify(1.5), SpillSeverity::Catastrophic);
    }

    #[test]
    fn test_report_contents() {
        let assessment = OilSpillAssessment::report();

        assert_eq!(assessment.severity_levels.len(), 4);
        assert_eq!(assessment.critical_effects.len(), 3);

        let major = assessment
            .severity_levels
            .iter()
            .find(|s| s.severity == SpillSeverity::Major)
            .unwrap();
        assert_eq!(major.detection_weight, 0.2);
        assert_eq!(major.ecological_impact, 0.9);
    }
}
