// 🔍 Deduplication Engine - Detect duplicate observations
// Two strategies: Exact Match and Near Match (re-logged samples)

use crate::db::Observation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// MATCH STRATEGY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchStrategy {
    /// Exact match: same station, same date, identical readings
    ExactMatch,

    /// Near match: same station, dates within ±1 day, readings within
    /// instrument tolerance (a sample logged twice with slight drift)
    NearMatch,
}

// ============================================================================
// DUPLICATE MATCH RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// Index of first observation
    pub obs1_index: usize,

    /// Index of second observation
    pub obs2_index: usize,

    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,

    /// Which strategy detected this match
    pub strategy: MatchStrategy,

    /// Human-readable explanation
    pub reason: String,
}

// ============================================================================
// DEDUPLICATION ENGINE
// ============================================================================

pub struct DeduplicationEngine {
    /// Confidence for exact matches (default: 0.95)
    pub exact_match_confidence: f64,

    /// Confidence for near matches (default: 0.70)
    pub near_match_confidence: f64,

    /// Reading tolerance for near matching, as a fraction of the reading
    /// magnitude (default: 0.05)
    pub near_reading_tolerance: f64,

    /// Date tolerance for near matching in days (default: 1)
    pub near_date_tolerance_days: i64,
}

impl DeduplicationEngine {
    /// Create engine with default thresholds
    pub fn new() -> Self {
        DeduplicationEngine {
            exact_match_confidence: 0.95,
            near_match_confidence: 0.70,
            near_reading_tolerance: 0.05,
            near_date_tolerance_days: 1,
        }
    }

    /// Find all duplicate matches in a list of observations
    pub fn find_duplicates(&self, observations: &[Observation]) -> Vec<DuplicateMatch> {
        let mut matches = Vec::new();

        // Compare each observation with every other observation
        for i in 0..observations.len() {
            for j in (i + 1)..observations.len() {
                let obs1 = &observations[i];
                let obs2 = &observations[j];

                // Try exact match first (highest confidence)
                if let Some(m) = self.check_exact_match(i, j, obs1, obs2) {
                    matches.push(m);
                    continue;
                }

                // Fall back to near match
                if let Some(m) = self.check_near_match(i, j, obs1, obs2) {
                    matches.push(m);
                }
            }
        }

        matches
    }

    /// Strategy 1: Exact Match
    /// Same station, same date, identical readings
    fn check_exact_match(
        &self,
        i: usize,
        j: usize,
        obs1: &Observation,
        obs2: &Observation,
    ) -> Option<DuplicateMatch> {
        if obs1.station != obs2.station {
            return None;
        }

        if obs1.date != obs2.date {
            return None;
        }

        let identical = readings(obs1)
            .iter()
            .zip(readings(obs2).iter())
            .all(|(a, b)| (a - b).abs() < 1e-6);

        if !identical {
            return None;
        }

        Some(DuplicateMatch {
            obs1_index: i,
            obs2_index: j,
            confidence: self.exact_match_confidence,
            strategy: MatchStrategy::ExactMatch,
            reason: format!("Exact match: {} | {}", obs1.station, obs1.date),
        })
    }

    /// Strategy 2: Near Match
    /// Same station, dates within tolerance, readings within tolerance
    fn check_near_match(
        &self,
        i: usize,
        j: usize,
        obs1: &Observation,
        obs2: &Observation,
    ) -> Option<DuplicateMatch> {
        if obs1.station != obs2.station {
            return None;
        }

        // Parse dates
        let date1 = parse_date(&obs1.date)?;
        let date2 = parse_date(&obs2.date)?;

        let date_diff = (date1 - date2).num_days().abs();
        if date_diff > self.near_date_tolerance_days {
            return None;
        }

        // Every reading must be within tolerance of its counterpart
        let all_close = readings(obs1)
            .iter()
            .zip(readings(obs2).iter())
            .all(|(a, b)| {
                let scale = a.abs().max(b.abs()).max(1.0);
                (a - b).abs() <= self.near_reading_tolerance * scale
            });

        if !all_close {
            return None;
        }

        Some(DuplicateMatch {
            obs1_index: i,
            obs2_index: j,
            confidence: self.near_match_confidence,
            strategy: MatchStrategy::NearMatch,
            reason: format!(
                "Near match: {} | {} vs {} ({} day(s) apart)",
                obs1.station, obs1.date, obs2.date, date_diff
            ),
        })
    }
}

impl Default for DeduplicationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn readings(obs: &Observation) -> [f64; 8] {
    [
        obs.dissolved_oxygen,
        obs.turbidity,
        obs.microplastic,
        obs.chemical_pollutants,
        obs.water_temp,
        obs.nutrient_levels,
        obs.salinity,
        obs.ph,
    ]
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(date, "%Y-%m-%d"))
        .ok()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn observation(date: &str, station: &str) -> Observation {
        Observation {
            date: date.to_string(),
            station: station.to_string(),
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
            id: "obs".to_string(),
            version: 1,
            system_time: None,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn test_exact_match_detected() {
        let engine = DeduplicationEngine::new();

        let observations = vec![
            observation("01/15/2025", "Reef Crest North"),
            observation("01/15/2025", "Reef Crest North"),
        ];

        let matches = engine.find_duplicates(&observations);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].strategy, MatchStrategy::ExactMatch);
        assert_eq!(matches[0].confidence, 0.95);
        assert_eq!((matches[0].obs1_index, matches[0].obs2_index), (0, 1));
    }

    #[test]
    fn test_different_stations_never_match() {
        let engine = DeduplicationEngine::new();

        let observations = vec![
            observation("01/15/2025", "Reef Crest North"),
            observation("01/15/2025", "Harbor Mouth"),
        ];

        let matches = engine.find_duplicates(&observations);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_near_match_adjacent_day_with_drift() {
        let engine = DeduplicationEngine::new();

        let mut drifted = observation("01/16/2025", "Reef Crest North");
        drifted.dissolved_oxygen = 7.3; // within 5% of 7.2
        drifted.turbidity = 3.1;

        let observations = vec![observation("01/15/2025", "Reef Crest North"), drifted];

        let matches = engine.find_duplicates(&observations);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].strategy, MatchStrategy::NearMatch);
        assert_eq!(matches[0].confidence, 0.70);
        assert!(matches[0].reason.contains("1 day(s) apart"));
    }

    #[test]
    fn test_near_match_rejects_large_drift() {
        let engine = DeduplicationEngine::new();

        let mut drifted = observation("01/16/2025", "Reef Crest North");
        drifted.dissolved_oxygen = 4.0; // far from 7.2

        let observations = vec![observation("01/15/2025", "Reef Crest North"), drifted];

        let matches = engine.find_duplicates(&observations);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_near_match_rejects_distant_dates() {
        let engine = DeduplicationEngine::new();

        let observations = vec![
            observation("01/15/2025", "Reef Crest North"),
            observation("01/20/2025", "Reef Crest North"),
        ];

        let matches = engine.find_duplicates(&observations);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_mixed_date_formats_compare() {
        let engine = DeduplicationEngine::new();

        let observations = vec![
            observation("01/15/2025", "Reef Crest North"),
            observation("2025-01-15", "Reef Crest North"),
        ];

        // Dates differ as strings, so no exact match, but the near matcher
        // parses both formats and sees the same day
        let matches = engine.find_duplicates(&observations);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].strategy, MatchStrategy::NearMatch);
    }

    #[test]
    fn test_unparseable_dates_are_skipped() {
        let engine = DeduplicationEngine::new();

        let observations = vec![
            observation("not-a-date", "Reef Crest North"),
            observation("also-bad", "Reef Crest North"),
        ];

        // Same station but exact match fails on date string and near match
        // cannot parse; no panic, no match
        let matches = engine.find_duplicates(&observations);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_three_way_duplicates_report_all_pairs() {
        let engine = DeduplicationEngine::new();

        let observations = vec![
            observation("01/15/2025", "Lagoon South"),
            observation("01/15/2025", "Lagoon South"),
            observation("01/15/2025", "Lagoon South"),
        ];

        let matches = engine.find_duplicates(&observations);
        assert_eq!(matches.len(), 3); // (0,1), (0,2), (1,2)
    }
}
