// 🧴 Plastic Waste Analysis
// Detection-weight distribution per plastic category and the ecological
// impact assessment derived from it

use serde::{Deserialize, Serialize};

// ============================================================================
// PLASTIC CATEGORIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlasticType {
    Microplastics,
    FishingNets,
    PlasticBottles,
    IndustrialWaste,
}

impl PlasticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlasticType::Microplastics => "Microplastics",
            PlasticType::FishingNets => "Fishing Nets",
            PlasticType::PlasticBottles => "Plastic Bottles",
            PlasticType::IndustrialWaste => "Industrial Plastic Waste",
        }
    }

    pub fn all() -> [PlasticType; 4] {
        [
            PlasticType::Microplastics,
            PlasticType::FishingNets,
            PlasticType::PlasticBottles,
            PlasticType::IndustrialWaste,
        ]
    }
}

/// Detection weight and ecological impact for one plastic category
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlasticProfile {
    pub detection_weight: f64,
    pub ecological_impact: f64,
}

/// Survey-calibrated distribution of plastic categories
pub struct PlasticModel;

impl PlasticModel {
    pub fn profile(plastic_type: PlasticType) -> PlasticProfile {
        match plastic_type {
            PlasticType::Microplastics => PlasticProfile {
                detection_weight: 0.3,
                ecological_impact: 0.8,
            },
            PlasticType::FishingNets => PlasticProfile {
                detection_weight: 0.2,
                ecological_impact: 0.7,
            },
            PlasticType::PlasticBottles => PlasticProfile {
                detection_weight: 0.25,
                ecological_impact: 0.6,
            },
            PlasticType::IndustrialWaste => PlasticProfile {
                detection_weight: 0.15,
                ecological_impact: 0.9,
            },
        }
    }
}

/// Qualitative description of an impact fraction
pub fn impact_description(impact: f64) -> &'static str {
    if impact > 0.8 {
        "Severe impact requiring immediate attention"
    } else if impact > 0.6 {
        "Significant impact on marine life"
    } else if impact > 0.4 {
        "Moderate environmental concern"
    } else {
        "Lower impact but monitoring required"
    }
}

// ============================================================================
// ANALYSIS REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlasticCategoryReport {
    pub plastic_type: PlasticType,
    pub label: String,
    pub detection_weight: f64,
    pub ecological_impact: f64,
    pub impact_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlasticAnalysis {
    pub categories: Vec<PlasticCategoryReport>,
    pub recommended_actions: Vec<String>,
}

impl PlasticAnalysis {
    pub fn report() -> Self {
        let categories = PlasticType::all()
            .iter()
            .map(|t| {
                let profile = PlasticModel::profile(*t);
                PlasticCategoryReport {
                    plastic_type: *t,
                    label: t.as_str().to_string(),
                    detection_weight: profile.detection_weight,
                    ecological_impact: profile.ecological_impact,
                    impact_description: impact_description(profile.ecological_impact).to_string(),
                }
            })
            .collect();

        PlasticAnalysis {
            categories,
            recommended_actions: vec![
                "Reduce single-use plastics".to_string(),
                "Support local recycling programs".to_string(),
                "Choose sustainable alternatives".to_string(),
            ],
        }
    }

    /// Category with the highest ecological impact
    pub fn worst_category(&self) -> Option<&PlasticCategoryReport> {
        self.categories.iter().max_by(|a, b| {
            a.ecological_impact
                .partial_cmp(&b.ecological_impact)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
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
        let total: f64 = PlasticType::all()
            .iter()
            .map(|t| PlasticModel::profile(*t).detection_weight)
            .sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_impact_descriptions() {
        assert_eq!(
            impact_description(0.9),
            "Severe impact requiring immediate attention"
        );
        assert_eq!(impact_description(0.7), "Significant impact on marine life");
        assert_eq!(impact_description(0.5), "Moderate environmental concern");
        assert_eq!(impact_description(0.3), "Lower impact but monitoring required");
        // Boundary: 0.8 is not "severe"
        assert_eq!(impact_description(0.8), "Significant impact on marine life");
    }

    #[test]
    fn test_report_contents() {
        let analysis = PlasticAnalysis::report();

        assert_eq!(analysis.categories.len(), 4);
        assert_eq!(analysis.recommended_actions.len(), 3);

        let micro = analysis
            .categories
            .iter()
            .find(|c| c.plastic_type == PlasticType::Microplastics)
            .unwrap();
        assert_eq!(micro.detection_weight, 0.3);
        assert_eq!(micro.ecological_impact, 0.8);
        assert_eq!(micro.label, "Microplastics");
    }

    #[test]
    fn test_worst_category_is_industrial() {
        let analysis = PlasticAnalysis::report();
        let worst = analysis.worst_category().unwrap();
        assert_eq!(worst.plastic_type, PlasticType::IndustrialWaste);
        assert_eq!(worst.ecological_impact, 0.9);
    }
}
