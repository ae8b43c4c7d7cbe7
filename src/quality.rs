// ✅ Observation Quality Engine
// Validates every field of an observation against instrument bounds and
// produces confidence-scored quality reports

use crate::db::Observation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub rule_name: String,
    pub field: String,
    pub message: String,
    pub confidence: f64,
    pub severity: Severity,
}

impl ValidationResult {
    pub fn pass(rule_name: &str, field: &str, message: &str) -> Self {
        ValidationResult {
            passed: true,
            rule_name: rule_name.to_string(),
            field: field.to_string(),
            message: message.to_string(),
            confidence: 1.0,
            severity: Severity::Info,
        }
    }

    pub fn fail(rule_name: &str, field: &str, message: &str, severity: Severity) -> Self {
        ValidationResult {
            passed: false,
            rule_name: rule_name.to_string(),
            field: field.to_string(),
            message: message.to_string(),
            confidence: if severity == Severity::Critical {
                0.0
            } else {
                0.5
            },
            severity,
        }
    }
}

// ============================================================================
// QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub observation_id: String,
    pub overall_quality: f64,
    pub overall_confidence: f64,
    pub validations: Vec<ValidationResult>,
    pub issues: Vec<QualityIssue>,
    pub passed_count: usize,
    pub failed_count: usize,
    pub needs_review: bool,
}

impl QualityReport {
    pub fn summary(&self) -> String {
        format!(
            "Quality: {:.1}%, Confidence: {:.1}%, Issues: {} ({} critical)",
            self.overall_quality * 100.0,
            self.overall_confidence * 100.0,
            self.issues.len(),
            self.issues
                .iter()
                .filter(|i| i.severity == Severity::Critical)
                .count()
        )
    }

    pub fn is_high_quality(&self) -> bool {
        self.overall_quality >= 0.8 && self.overall_confidence >= 0.7
    }

    pub fn has_critical_issues(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Critical)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub field: String,
    pub issue: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Reading is invalid or missing critical information
    Warning,  // Reading is questionable or incomplete
    Info,     // Reading is valid but could be improved
}

// ============================================================================
// PLAUSIBLE INSTRUMENT BOUNDS
// ============================================================================

/// Physically plausible bound for one reading, checked before any scoring
struct ReadingBound {
    field: &'static str,
    min: f64,
    max: f64,
    unit: &'static str,
}

const READING_BOUNDS: [ReadingBound; 8] = [
    ReadingBound {
        field: "dissolved_oxygen",
        min: 0.0,
        max: 20.0,
        unit: "mg/L",
    },
    ReadingBound {
        field: "turbidity",
        min: 0.0,
        max: 1000.0,
        unit: "NTU",
    },
    ReadingBound {
        field: "microplastic",
        min: 0.0,
        max: 10_000.0,
        unit: "particles/L",
    },
    ReadingBound {
        field: "chemical_pollutants",
        min: 0.0,
        max: 10.0,
        unit: "index",
    },
    ReadingBound {
        field: "water_temp",
        min: -2.0,
        max: 40.0,
        unit: "degC",
    },
    ReadingBound {
        field: "nutrient_levels",
        min: 0.0,
        max: 10.0,
        unit: "index",
    },
    ReadingBound {
        field: "salinity",
        min: 0.0,
        max: 45.0,
        unit: "PSU",
    },
    ReadingBound {
        field: "ph",
        min: 0.0,
        max: 14.0,
        unit: "pH",
    },
];

// ============================================================================
// QUALITY ENGINE
// ============================================================================

pub struct QualityEngine {
    /// Minimum confidence threshold for "needs_review"
    review_threshold: f64,
}

impl QualityEngine {
    pub fn new() -> Self {
        QualityEngine {
            review_threshold: 0.7,
        }
    }

    /// Validate an observation and generate quality report
    pub fn validate(&self, obs: &Observation) -> QualityReport {
        let mut validations = Vec::new();
        let mut issues = Vec::new();

        // Rule 1: Date format valid
        let date_result = self.validate_date(&obs.date);
        if !date_result.passed {
            issues.push(QualityIssue {
                severity: date_result.severity.clone(),
                field: "date".to_string(),
                issue: date_result.message.clone(),
                recommendation: "Fix date format to MM/DD/YYYY or YYYY-MM-DD".to_string(),
            });
        }
        validations.push(date_result);

        // Rule 2: Station not empty
        let station_result = self.validate_station(&obs.station);
        if !station_result.passed {
            issues.push(QualityIssue {
                severity: station_result.severity.clone(),
                field: "station".to_string(),
                issue: station_result.message.clone(),
                recommendation: "Record the monitoring station the sample came from".to_string(),
            });
        }
        validations.push(station_result);

        // Rules 3-10: Each reading finite and within instrument bounds
        for bound in &READING_BOUNDS {
            let value = reading_value(obs, bound.field);
            let result = self.validate_reading(bound, value);
            if !result.passed {
                issues.push(QualityIssue {
                    severity: result.severity.clone(),
                    field: bound.field.to_string(),
                    issue: result.message.clone(),
                    recommendation: format!(
                        "Check the {} probe; plausible range is {} to {} {}",
                        bound.field, bound.min, bound.max, bound.unit
                    ),
                });
            }
            validations.push(result);
        }

        // Rule 11: Provenance (source_file + line_number) present
        let provenance_result = self.validate_provenance(&obs.source_file, &obs.line_number);
        if !provenance_result.passed {
            issues.push(QualityIssue {
                severity: provenance_result.severity.clone(),
                field: "provenance".to_string(),
                issue: provenance_result.message.clone(),
                recommendation: "Add source_file and line_number for audit trail".to_string(),
            });
        }
        validations.push(provenance_result);

        // Rule 12: Identity fields initialized (only meaningful once assigned)
        if !obs.id.is_empty() {
            let identity_result = self.validate_identity_fields(obs);
            if !identity_result.passed {
                issues.push(QualityIssue {
                    severity: identity_result.severity.clone(),
                    field: "identity".to_string(),
                    issue: identity_result.message.clone(),
                    recommendation: "Ensure UUID, version, and system time are initialized"
                        .to_string(),
                });
            }
            validations.push(identity_result);
        }

        // Calculate overall metrics
        let passed_count = validations.iter().filter(|v| v.passed).count();
        let failed_count = validations.len() - passed_count;
        let overall_quality = passed_count as f64 / validations.len() as f64;

        let overall_confidence: f64 =
            validations.iter().map(|v| v.confidence).sum::<f64>() / validations.len() as f64;

        let needs_review = overall_confidence < self.review_threshold;

        QualityReport {
            observation_id: obs.id.clone(),
            overall_quality,
            overall_confidence,
            validations,
            issues,
            passed_count,
            failed_count,
            needs_review,
        }
    }

    /// Batch validate multiple observations
    pub fn validate_batch(&self, observations: &[Observation]) -> Vec<QualityReport> {
        observations.iter().map(|obs| self.validate(obs)).collect()
    }

    /// Generate summary statistics for batch validation
    pub fn batch_summary(&self, reports: &[QualityReport]) -> BatchSummary {
        let total = reports.len();
        let high_quality = reports.iter().filter(|r| r.is_high_quality()).count();
        let needs_review = reports.iter().filter(|r| r.needs_review).count();
        let has_critical = reports.iter().filter(|r| r.has_critical_issues()).count();

        let avg_quality: f64 = if total == 0 {
            0.0
        } else {
            reports.iter().map(|r| r.overall_quality).sum::<f64>() / total as f64
        };
        let avg_confidence: f64 = if total == 0 {
            0.0
        } else {
            reports.iter().map(|r| r.overall_confidence).sum::<f64>() / total as f64
        };

        BatchSummary {
            total_observations: total,
            high_quality_count: high_quality,
            needs_review_count: needs_review,
            critical_issues_count: has_critical,
            average_quality: avg_quality,
            average_confidence: avg_confidence,
        }
    }

    // ========================================================================
    // VALIDATION RULES
    // ========================================================================

    fn validate_date(&self, date: &str) -> ValidationResult {
        if date.is_empty() {
            return ValidationResult::fail(
                "date_not_empty",
                "date",
                "Date is empty",
                Severity::Critical,
            );
        }

        // Try parsing MM/DD/YYYY
        if NaiveDate::parse_from_str(date, "%m/%d/%Y").is_ok() {
            return ValidationResult::pass("date_valid", "date", "Date format valid (MM/DD/YYYY)");
        }

        // Try parsing YYYY-MM-DD
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
            return ValidationResult::pass("date_valid", "date", "Date format valid (YYYY-MM-DD)");
        }

        ValidationResult::fail(
            "date_invalid_format",
            "date",
            &format!("Invalid date format: {}", date),
            Severity::Critical,
        )
    }

    fn validate_station(&self, station: &str) -> ValidationResult {
        if station.is_empty() {
            return ValidationResult::fail(
                "station_empty",
                "station",
                "Station is empty",
                Severity::Critical,
            );
        }

        if station.len() < 2 {
            return ValidationResult::fail(
                "station_too_short",
                "station",
                "Station name too short",
                Severity::Warning,
            );
        }

        ValidationResult::pass(
            "station_present",
            "station",
            &format!("Station present: {}", station),
        )
    }

    fn validate_reading(&self, bound: &ReadingBound, value: f64) -> ValidationResult {
        let rule = format!("{}_in_bounds", bound.field);

        if value.is_nan() || value.is_infinite() {
            return ValidationResult::fail(
                &rule,
                bound.field,
                &format!("{} is not a valid number", bound.field),
                Severity::Critical,
            );
        }

        if value < bound.min || value > bound.max {
            return ValidationResult::fail(
                &rule,
                bound.field,
                &format!(
                    "{} reading {} {} outside plausible range {} to {}",
                    bound.field, value, bound.unit, bound.min, bound.max
                ),
                Severity::Critical,
            );
        }

        ValidationResult::pass(
            &rule,
            bound.field,
            &format!("{} within plausible range", bound.field),
        )
    }

    fn validate_provenance(&self, source_file: &str, line_number: &str) -> ValidationResult {
        if source_file.is_empty() {
            return ValidationResult::fail(
                "provenance_no_source",
                "provenance",
                "Source file is missing",
                Severity::Warning,
            );
        }

        if line_number.is_empty() {
            return ValidationResult::fail(
                "provenance_no_line",
                "provenance",
                "Line number is missing",
                Severity::Info,
            );
        }

        ValidationResult::pass(
            "provenance_complete",
            "provenance",
            &format!("Provenance: {}:{}", source_file, line_number),
        )
    }

    fn validate_identity_fields(&self, obs: &Observation) -> ValidationResult {
        if obs.id.is_empty() {
            return ValidationResult::fail(
                "identity_no_uuid",
                "identity",
                "Missing UUID",
                Severity::Critical,
            );
        }

        if obs.version <= 0 {
            return ValidationResult::fail(
                "identity_no_version",
                "identity",
                "Missing version number",
                Severity::Warning,
            );
        }

        if obs.system_time.is_none() {
            return ValidationResult::fail(
                "identity_no_system_time",
                "identity",
                "Missing system time",
                Severity::Warning,
            );
        }

        ValidationResult::pass("identity_complete", "identity", "Identity fields complete")
    }
}

impl Default for QualityEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn reading_value(obs: &Observation, field: &str) -> f64 {
    match field {
        "dissolved_oxygen" => obs.dissolved_oxygen,
        "turbidity" => obs.turbidity,
        "microplastic" => obs.microplastic,
        "chemical_pollutants" => obs.chemical_pollutants,
        "water_temp" => obs.water_temp,
        "nutrient_levels" => obs.nutrient_levels,
        "salinity" => obs.salinity,
        "ph" => obs.ph,
        _ => f64::NAN,
    }
}

// ============================================================================
// BATCH SUMMARY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_observations: usize,
    pub high_quality_count: usize,
    pub needs_review_count: usize,
    pub critical_issues_count: usize,
    pub average_quality: f64,
    pub average_confidence: f64,
}

impl BatchSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} observations: {:.1}% quality, {:.1}% confidence | {} high quality, {} need review, {} critical",
            self.total_observations,
            self.average_quality * 100.0,
            self.average_confidence * 100.0,
            self.high_quality_count,
            self.needs_review_count,
            self.critical_issues_count
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    fn create_valid_observation() -> Observation {
        let mut obs = Observation {
            date: "01/15/2025".to_string(),
            station: "Reef Crest North".to_string(),
            dissolved_oxygen: 7.2,
            turbidity: 3.0,
            microplastic: 5.0,
            chemical_pollutants: 1.0,
            water_temp: 25.0,
            nutrient_levels: 2.0,
            salinity: 35.0,
            ph: 8.0,
            notes: String::new(),
            source_file: "survey_jan_2025.csv".to_string(),
            line_number: "23".to_string(),
            id: String::new(),
            version: 0,
            system_time: Some(Utc::now()),
            metadata: HashMap::new(),
        };

        obs.init_identity_fields();
        obs
    }

    #[test]
    fn test_validate_perfect_observation() {
        let engine = QualityEngine::new();
        let obs = create_valid_observation();

        let report = engine.validate(&obs);

        assert!(report.is_high_quality());
        assert!(!report.needs_review);
        assert!(!report.has_critical_issues());
        assert!(report.overall_quality >= 0.9);
        assert_eq!(report.issues.len(), 0);
    }

    #[test]
    fn test_validate_invalid_date() {
        let engine = QualityEngine::new();
        let mut obs = create_valid_observation();
        obs.date = "invalid-date".to_string();

        let report = engine.validate(&obs);

        assert!(report.has_critical_issues());
        assert!(report.issues.iter().any(|i| i.field == "date"));
    }

    #[test]
    fn test_validate_iso_date_accepted() {
        let engine = QualityEngine::new();
        let mut obs = create_valid_observation();
        obs.date = "2025-01-15".to_string();

        let report = engine.validate(&obs);
        assert!(!report.issues.iter().any(|i| i.field == "date"));
    }

    #[test]
    fn test_validate_out_of_bounds_reading() {
        let engine = QualityEngine::new();
        let mut obs = create_valid_observation();
        obs.ph = 15.2;

        let report = engine.validate(&obs);

        assert!(report.has_critical_issues());
        assert!(report.issues.iter().any(|i| i.field == "ph"));
    }

    #[test]
    fn test_validate_negative_concentration() {
        let engine = QualityEngine::new();
        let mut obs = create_valid_observation();
        obs.microplastic = -1.0;

        let report = engine.validate(&obs);

        assert!(report.issues.iter().any(|i| i.field == "microplastic"));
    }

    #[test]
    fn test_validate_nan_reading() {
        let engine = QualityEngine::new();
        let mut obs = create_valid_observation();
        obs.turbidity = f64::NAN;

        let report = engine.validate(&obs);

        assert!(report.has_critical_issues());
        assert!(report
            .issues
            .iter()
            .any(|i| i.field == "turbidity" && i.issue.contains("not a valid number")));
    }

    #[test]
    fn test_validate_missing_station() {
        let engine = QualityEngine::new();
        let mut obs = create_valid_observation();
        obs.station = String::new();

        let report = engine.validate(&obs);

        assert!(report.has_critical_issues());
        assert!(report.issues.iter().any(|i| i.field == "station"));
    }

    #[test]
    fn test_validate_missing_provenance() {
        let engine = QualityEngine::new();
        let mut obs = create_valid_observation();
        obs.source_file = String::new();

        let report = engine.validate(&obs);

        assert!(report
            .issues
            .iter()
            .any(|i| i.field == "provenance" && i.severity == Severity::Warning));
    }

    #[test]
    fn test_identity_rule_skipped_without_uuid() {
        let engine = QualityEngine::new();
        let mut obs = create_valid_observation();
        obs.id = String::new();
        obs.version = 0;
        obs.system_time = None;

        let report = engine.validate(&obs);

        assert!(report.validations.iter().all(|v| v.field != "identity"));
    }

    #[test]
    fn test_batch_validation_and_summary() {
        let engine = QualityEngine::new();

        let mut bad = create_valid_observation();
        bad.salinity = 90.0;

        let observations = vec![
            create_valid_observation(),
            create_valid_observation(),
            bad,
        ];

        let reports = engine.validate_batch(&observations);
        assert_eq!(reports.len(), 3);

        let summary = engine.batch_summary(&reports);
        assert_eq!(summary.total_observations, 3);
        assert_eq!(summary.high_quality_count, 3); // one failed rule of 12 still scores high
        assert_eq!(summary.critical_issues_count, 1);
        assert!(!summary.summary().is_empty());
    }

    #[test]
    fn test_empty_batch_summary() {
        let engine = QualityEngine::new();
        let summary = engine.batch_summary(&[]);

        assert_eq!(summary.total_observations, 0);
        assert_eq!(summary.average_quality, 0.0);
    }
}
