// 🚨 Alert Rules - Rules as Data
// Threshold rules over station readings; rules can be loaded from JSON so
// field teams can tune them without a rebuild

use crate::db::Observation;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// Which reading a rule watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchedReading {
    DissolvedOxygen,
    Turbidity,
    Microplastic,
    ChemicalPollutants,
    WaterTemp,
    NutrientLevels,
    Salinity,
    Ph,
}

impl WatchedReading {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchedReading::DissolvedOxygen => "dissolved_oxygen",
            WatchedReading::Turbidity => "turbidity",
            WatchedReading::Microplastic => "microplastic",
            WatchedReading::ChemicalPollutants => "chemical_pollutants",
            WatchedReading::WaterTemp => "water_temp",
            WatchedReading::NutrientLevels => "nutrient_levels",
            WatchedReading::Salinity => "salinity",
            WatchedReading::Ph => "ph",
        }
    }

    pub fn value_of(&self, obs: &Observation) -> f64 {
        match self {
            WatchedReading::DissolvedOxygen => obs.dissolved_oxygen,
            WatchedReading::Turbidity => obs.turbidity,
            WatchedReading::Microplastic => obs.microplastic,
            WatchedReading::ChemicalPollutants => obs.chemical_pollutants,
            WatchedReading::WaterTemp => obs.water_temp,
            WatchedReading::NutrientLevels => obs.nutrient_levels,
            WatchedReading::Salinity => obs.salinity,
            WatchedReading::Ph => obs.ph,
        }
    }
}

/// Fire when the reading is above or below the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Above,
    Below,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    /// Rule ID for tracking
    pub id: String,

    /// Reading this rule watches
    pub reading: WatchedReading,

    /// Fire direction relative to the threshold
    pub condition: Condition,

    pub threshold: f64,

    /// Severity label shown on the dashboard (e.g. "warning", "critical")
    pub severity: String,

    /// Advice text attached to a fired alert
    pub advice: String,

    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,

    /// Priority (higher = evaluated first)
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    0
}

impl AlertRule {
    /// Check whether this rule fires for the given observation
    pub fn matches(&self, obs: &Observation) -> bool {
        let value = self.reading.value_of(obs);

        if !value.is_finite() {
            return false;
        }

        match self.condition {
            Condition::Above => value > self.threshold,
            Condition::Below => value < self.threshold,
        }
    }
}

// ============================================================================
// FIRED ALERT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub rule_id: String,
    pub station: String,
    pub date: String,
    pub reading: WatchedReading,
    pub observed_value: f64,
    pub threshold: f64,
    pub severity: String,
    pub advice: String,
    pub confidence: f64,
}

impl Alert {
    pub fn summary(&self) -> String {
        format!(
            "[{}] {} @ {}: {} = {:.2} (threshold {:.2})",
            self.severity,
            self.station,
            self.date,
            self.reading.as_str(),
            self.observed_value,
            self.threshold
        )
    }
}

// ============================================================================
// ALERT ENGINE
// ============================================================================

pub struct AlertEngine {
    rules: Vec<AlertRule>,
}

impl AlertEngine {
    /// Create a new empty engine
    pub fn new() -> Self {
        AlertEngine { rules: Vec::new() }
    }

    /// Engine loaded with the built-in rule set
    pub fn with_default_rules() -> Self {
        AlertEngine::from_rules(default_rules())
    }

    /// Load rules from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read rules file: {:?}", path.as_ref()))?;

        let rules: Vec<AlertRule> =
            serde_json::from_str(&content).context("Failed to parse rules JSON")?;

        Ok(AlertEngine::from_rules(rules))
    }

    /// Create engine from a list of rules
    pub fn from_rules(mut rules: Vec<AlertRule>) -> Self {
        // Sort by priority (higher first)
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        AlertEngine { rules }
    }

    /// Add a single rule
    pub fn add_rule(&mut self, rule: AlertRule) {
        self.rules.push(rule);
        // Re-sort by priority
        self.rules.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// Evaluate all rules against one observation; every matching rule fires
    pub fn evaluate(&self, obs: &Observation) -> Vec<Alert> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(obs))
            .map(|rule| Alert {
                rule_id: rule.id.clone(),
                station: obs.station.clone(),
                date: obs.date.clone(),
                reading: rule.reading,
                observed_value: rule.reading.value_of(obs),
                threshold: rule.threshold,
                severity: rule.severity.clone(),
                advice: rule.advice.clone(),
                confidence: rule.confidence,
            })
            .collect()
    }

    /// Evaluate a batch of observations
    pub fn evaluate_batch(&self, observations: &[Observation]) -> Vec<Alert> {
        observations
            .iter()
            .flat_map(|obs| self.evaluate(obs))
            .collect()
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Built-in rule set covering the conditions field teams watch for
pub fn default_rules() -> Vec<AlertRule> {
    vec![
        AlertRule {
            id: "hypoxia".to_string(),
            reading: WatchedReading::DissolvedOxygen,
            condition: Condition::Below,
            threshold: 4.0,
            severity: "critical".to_string(),
            advice: "Hypoxic water; check for eutrophication and fish kills".to_string(),
            confidence: 0.95,
            priority: 100,
        },
        AlertRule {
            id: "high_turbidity".to_string(),
            reading: WatchedReading::Turbidity,
            condition: Condition::Above,
            threshold: 10.0,
            severity: "warning".to_string(),
            advice: "Turbid water; inspect for runoff or dredging upstream".to_string(),
            confidence: 0.85,
            priority: 50,
        },
        AlertRule {
            id: "microplastic_load".to_string(),
            reading: WatchedReading::Microplastic,
            condition: Condition::Above,
            threshold: 25.0,
            severity: "warning".to_string(),
            advice: "Elevated microplastic; schedule a debris survey".to_string(),
            confidence: 0.85,
            priority: 50,
        },
        AlertRule {
            id: "chemical_pollution".to_string(),
            reading: WatchedReading::ChemicalPollutants,
            condition: Condition::Above,
            threshold: 5.0,
            severity: "critical".to_string(),
            advice: "Chemical pollutant spike; trace industrial discharge".to_string(),
            confidence: 0.9,
            priority: 100,
        },
        AlertRule {
            id: "bloom_temperature".to_string(),
            reading: WatchedReading::WaterTemp,
            condition: Condition::Above,
            threshold: 30.0,
            severity: "warning".to_string(),
            advice: "Bloom-favoring temperature; run the bloom risk model".to_string(),
            confidence: 0.8,
            priority: 40,
        },
        AlertRule {
            id: "nutrient_enrichment".to_string(),
            reading: WatchedReading::NutrientLevels,
            condition: Condition::Above,
            threshold: 7.0,
            severity: "warning".to_string(),
            advice: "Nutrient enrichment; check agricultural runoff sources".to_string(),
            confidence: 0.85,
            priority: 40,
        },
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn observation() -> Observation {
        Observation {
            date: "01/15/2025".to_string(),
            station: "Harbor Mouth".to_string(),
            dissolved_oxygen: 7.2,
            turbidity: 3.0,
            microplastic: 5.0,
            chemical_pollutants: 1.0,
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
    fn test_rule_matches_above_and_below() {
        let rule = AlertRule {
            id: "hypoxia".to_string(),
            reading: WatchedReading::DissolvedOxygen,
            condition: Condition::Below,
            threshold: 4.0,
            severity: "critical".to_string(),
            advice: "test".to_string(),
            confidence: 0.95,
            priority: 0,
        };

        let mut obs = observation();
        assert!(!rule.matches(&obs));

        obs.dissolved_oxygen = 3.2;
        assert!(rule.matches(&obs));

        // Exactly at the threshold does not fire
        obs.dissolved_oxygen = 4.0;
        assert!(!rule.matches(&obs));
    }

    #[test]
    fn test_clean_observation_fires_nothing() {
        let engine = AlertEngine::with_default_rules();
        let alerts = engine.evaluate(&observation());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_every_matching_rule_fires() {
        let engine = AlertEngine::with_default_rules();

        let mut obs = observation();
        obs.dissolved_oxygen = 2.0;
        obs.water_temp = 32.0;
        obs.nutrient_levels = 9.0;

        let alerts = engine.evaluate(&obs);
        assert_eq!(alerts.len(), 3);

        let ids: Vec<&str> = alerts.iter().map(|a| a.rule_id.as_str()).collect();
        assert!(ids.contains(&"hypoxia"));
        assert!(ids.contains(&"bloom_temperature"));
        assert!(ids.contains(&"nutrient_enrichment"));

        // Priority order: hypoxia (100) evaluates before the warnings
        assert_eq!(alerts[0].rule_id, "hypoxia");
        assert_eq!(alerts[0].severity, "critical");
    }

    #[test]
    fn test_alert_carries_context() {
        let engine = AlertEngine::with_default_rules();

        let mut obs = observation();
        obs.chemical_pollutants = 8.5;

        let alerts = engine.evaluate(&obs);
        assert_eq!(alerts.len(), 1);

        let alert = &alerts[0];
        assert_eq!(alert.station, "Harbor Mouth");
        assert_eq!(alert.observed_value, 8.5);
        assert_eq!(alert.threshold, 5.0);
        assert!(alert.summary().contains("chemical_pollutants"));
    }

    #[test]
    fn test_evaluate_batch() {
        let engine = AlertEngine::with_default_rules();

        let mut hot = observation();
        hot.water_temp = 33.0;
        let clean = observation();

        let alerts = engine.evaluate_batch(&[hot, clean]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].rule_id, "bloom_temperature");
    }

    #[test]
    fn test_rules_json_roundtrip() {
        let rules = default_rules();
        let json = serde_json::to_string(&rules).unwrap();
        let parsed: Vec<AlertRule> = serde_json::from_str(&json).unwrap();

        let engine = AlertEngine::from_rules(parsed);
        assert_eq!(engine.rule_count(), rules.len());
    }

    #[test]
    fn test_rule_priority_ordering() {
        let mut engine = AlertEngine::new();

        engine.add_rule(AlertRule {
            id: "low".to_string(),
            reading: WatchedReading::Turbidity,
            condition: Condition::Above,
            threshold: 5.0,
            severity: "info".to_string(),
            advice: "low priority".to_string(),
            confidence: 0.5,
            priority: 1,
        });

        engine.add_rule(AlertRule {
            id: "high".to_string(),
            reading: WatchedReading::Turbidity,
            condition: Condition::Above,
            threshold: 8.0,
            severity: "warning".to_string(),
            advice: "high priority".to_string(),
            confidence: 0.9,
            priority: 100,
        });

        let mut obs = observation();
        obs.turbidity = 12.0;

        let alerts = engine.evaluate(&obs);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].rule_id, "high");
        assert_eq!(alerts[1].rule_id, "low");
    }
}
