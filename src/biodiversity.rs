// 🐠 Biodiversity & Ecosystem Health
// Species-group health table plus the combined assessment that drives
// conservation recommendations

use crate::db::Observation;
use crate::water_quality::{self, QualityBand};
use serde::{Deserialize, Serialize};

// ============================================================================
// SPECIES GROUPS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeciesGroup {
    Fish,
    Mammals,
    Invertebrates,
    PlantLife,
}

impl SpeciesGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesGroup::Fish => "Fish",
            SpeciesGroup::Mammals => "Mammals",
            SpeciesGroup::Invertebrates => "Invertebrates",
            SpeciesGroup::PlantLife => "Plant Life",
        }
    }

    pub fn all() -> [SpeciesGroup; 4] {
        [
            SpeciesGroup::Fish,
            SpeciesGroup::Mammals,
            SpeciesGroup::Invertebrates,
            SpeciesGroup::PlantLife,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Stable,
    Declining,
    Critical,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Stable => "Stable",
            Trend::Declining => "Declining",
            Trend::Critical => "Critical",
        }
    }
}

/// Health band for a single species group (bar colors in the dashboard)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    Healthy,
    Stressed,
    Critical,
}

impl HealthBand {
    /// index > 0.6 healthy, > 0.4 stressed, else critical
    pub fn from_index(index: f64) -> Self {
        if index > 0.6 {
            HealthBand::Healthy
        } else if index > 0.4 {
            HealthBand::Stressed
        } else {
            HealthBand::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthBand::Healthy => "Healthy",
            HealthBand::Stressed => "Stressed",
            HealthBand::Critical => "Critical",
        }
    }
}

// ============================================================================
// SPECIES HEALTH MODEL
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesHealth {
    pub group: SpeciesGroup,
    pub health_index: f64,
    pub trend: Trend,
    pub band: HealthBand,
}

/// Baseline survey table: health index and population trend per group
pub struct BiodiversityModel {
    entries: Vec<(SpeciesGroup, f64, Trend)>,
}

impl BiodiversityModel {
    pub fn new() -> Self {
        BiodiversityModel {
            entries: vec![
                (SpeciesGroup::Fish, 0.7, Trend::Declining),
                (SpeciesGroup::Mammals, 0.6, Trend::Stable),
                (SpeciesGroup::Invertebrates, 0.5, Trend::Declining),
                (SpeciesGroup::PlantLife, 0.4, Trend::Critical),
            ],
        }
    }

    pub fn species_health(&self) -> Vec<SpeciesHealth> {
        self.entries
            .iter()
            .map(|(group, index, trend)| SpeciesHealth {
                group: *group,
                health_index: *index,
                trend: *trend,
                band: HealthBand::from_index(*index),
            })
            .collect()
    }

    pub fn health_index(&self, group: SpeciesGroup) -> Option<f64> {
        self.entries
            .iter()
            .find(|(g, _, _)| *g == group)
            .map(|(_, index, _)| *index)
    }

    pub fn average_health(&self) -> f64 {
        let sum: f64 = self.entries.iter().map(|(_, index, _)| index).sum();
        sum / self.entries.len() as f64
    }
}

impl Default for BiodiversityModel {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ECOSYSTEM ASSESSMENT
// ============================================================================

/// Urgency of the recommended conservation actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionUrgency {
    Critical,
    Preventive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConservationPlan {
    pub urgency: ActionUrgency,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcosystemAssessment {
    pub station: String,
    pub date: String,
    pub water_quality_score: f64,
    pub water_quality_band: QualityBand,
    pub species_health: Vec<SpeciesHealth>,
    pub average_species_health: f64,
    pub plan: ConservationPlan,
}

impl EcosystemAssessment {
    /// Combine one observation's water quality with the species survey table
    pub fn assess(obs: &Observation) -> Self {
        let model = BiodiversityModel::new();
        Self::assess_with_model(obs, &model)
    }

    pub fn assess_with_model(obs: &Observation, model: &BiodiversityModel) -> Self {
        let water_quality_score = water_quality::water_quality_score(obs);
        let species_health = model.species_health();
        let average_species_health = model.average_health();

        let plan = conservation_plan(water_quality_score, average_species_health);

        EcosystemAssessment {
            station: obs.station.clone(),
            date: obs.date.clone(),
            water_quality_score,
            water_quality_band: QualityBand::from_score(water_quality_score),
            species_health,
            average_species_health,
            plan,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} @ {}: water quality {:.1}%, species health {:.1}%, {} actions",
            self.station,
            self.date,
            self.water_quality_score * 100.0,
            self.average_species_health * 100.0,
            match self.plan.urgency {
                ActionUrgency::Critical => "critical",
                ActionUrgency::Preventive => "preventive",
            }
        )
    }
}

/// Critical action list when either signal drops below 0.5, preventive otherwise
pub fn conservation_plan(water_quality: f64, avg_species_health: f64) -> ConservationPlan {
    if water_quality < 0.5 || avg_species_health < 0.5 {
        ConservationPlan {
            urgency: ActionUrgency::Critical,
            actions: vec![
                "Implement immediate water quality improvement measures".to_string(),
                "Establish protected marine zones".to_string(),
                "Reduce industrial discharge".to_string(),
                "Monitor species population regularly".to_string(),
            ],
        }
    } else {
        ConservationPlan {
            urgency: ActionUrgency::Preventive,
            actions: vec![
                "Continue regular ecosystem monitoring".to_string(),
                "Maintain sustainable fishing practices".to_string(),
                "Support marine conservation programs".to_string(),
                "Engage in community education".to_string(),
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
    use std::collections::HashMap;

    fn observation_with_quality(do_mg: f64, ntu: f64, particles: f64, chem: f64) -> Observation {
        Observation {
            date: "01/15/2025".to_string(),
            station: "Lagoon South".to_string(),
            dissolved_oxygen: do_mg,
            turbidity: ntu,
            microplastic: particles,
            chemical_pollutants: chem,
            water_temp: 25.0,
            nutrient_levels: 2.0,
            salinity: 35.0,
            ph: 8.0,
            notes: String::new(),
            source_file: "test.csv".to_string(),
            line_number: "2".to_string(),
            id: "obs-1".to_string(),
            version: 1,
            system_time: None,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn test_model_table() {
        let model = BiodiversityModel::new();

        assert_eq!(model.health_index(SpeciesGroup::Fish), Some(0.7));
        assert_eq!(model.health_index(SpeciesGroup::PlantLife), Some(0.4));

        // (0.7 + 0.6 + 0.5 + 0.4) / 4 = 0.55
        assert!((model.average_health() - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_health_bands() {
        assert_eq!(HealthBand::from_index(0.7), HealthBand::Healthy);
        assert_eq!(HealthBand::from_index(0.6), HealthBand::Stressed);
        assert_eq!(HealthBand::from_index(0.5), HealthBand::Stressed);
        assert_eq!(HealthBand::from_index(0.4), HealthBand::Critical);
    }

    #[test]
    fn test_species_health_carries_trend() {
        let model = BiodiversityModel::new();
        let health = model.species_health();

        assert_eq!(health.len(), 4);

        let mammals = health
            .iter()
            .find(|h| h.group == SpeciesGroup::Mammals)
            .unwrap();
        assert_eq!(mammals.trend, Trend::Stable);
        assert_eq!(mammals.band, HealthBand::Stressed);

        let plants = health
            .iter()
            .find(|h| h.group == SpeciesGroup::PlantLife)
            .unwrap();
        assert_eq!(plants.trend, Trend::Critical);
        assert_eq!(plants.band, HealthBand::Critical);
    }

    #[test]
    fn test_preventive_plan_for_healthy_water() {
        // All readings optimal: water quality 1.0, species average 0.55
        let obs = observation_with_quality(7.0, 3.0, 5.0, 1.0);
        let assessment = EcosystemAssessment::assess(&obs);

        assert_eq!(assessment.plan.urgency, ActionUrgency::Preventive);
        assert!(assessment
            .plan
            .actions
            .iter()
            .any(|a| a.contains("sustainable fishing")));
    }

    #[test]
    fn test_critical_plan_for_degraded_water() {
        // Everything out of range pushes the score below 0.5
        let obs = observation_with_quality(1.0, 18.0, 40.0, 9.0);
        let assessment = EcosystemAssessment::assess(&obs);

        assert!(assessment.water_quality_score < 0.5);
        assert_eq!(assessment.plan.urgency, ActionUrgency::Critical);
        assert!(assessment
            .plan
            .actions
            .iter()
            .any(|a| a.contains("protected marine zones")));
    }

    #[test]
    fn test_critical_plan_when_species_health_low() {
        // Plan flips to critical on species health alone
        let plan = conservation_plan(0.9, 0.45);
        assert_eq!(plan.urgency, ActionUrgency::Critical);

        let plan = conservation_plan(0.9, 0.55);
        assert_eq!(plan.urgency, ActionUrgency::Preventive);
    }
}
