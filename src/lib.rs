// Marine Ecosystem Guardian - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod db;
pub mod water_quality;
pub mod biodiversity;
pub mod plastic;
pub mod coral;
pub mod oil_spill;
pub mod hab;
pub mod quality;
pub mod alerts;
pub mod dedup;
pub mod guide;
pub mod entities;

// Re-export commonly used types
pub use db::{
    Observation, StationStat, Event,
    load_csv, setup_database, insert_observations,
    get_all_observations, get_observations_by_station, get_station_stats,
    verify_count, insert_event, get_events_for_entity,
};
pub use water_quality::{
    WaterParameter, QualityBand, ParameterScore, WaterQualityReport,
    parameter_score, water_quality_score,
};
pub use biodiversity::{
    SpeciesGroup, Trend, HealthBand, SpeciesHealth, BiodiversityModel,
    ActionUrgency, ConservationPlan, EcosystemAssessment, conservation_plan,
};
pub use plastic::{
    PlasticType, PlasticProfile, PlasticModel, PlasticAnalysis, impact_description,
};
pub use coral::{
    CoralCondition, CoralProfile, CoralModel, CoralAssessment,
};
pub use oil_spill::{
    SpillSeverity, SpillProfile, OilSpillModel, OilSpillAssessment,
};
pub use hab::{
    RiskFactor, RiskLevel, HabInputs, HabRiskReport, risk_score,
};
pub use quality::{
    QualityEngine, QualityReport, ValidationResult, QualityIssue, Severity, BatchSummary,
};
pub use alerts::{
    AlertRule, AlertEngine, Alert, WatchedReading, Condition, default_rules,
};
pub use dedup::{
    DeduplicationEngine, DuplicateMatch, MatchStrategy,
};
pub use guide::{
    PreventionGuide, Resource, ImpactStatistic,
};
pub use entities::{
    Station, StationKind, StationRegistry,
    Species, ConservationStatus, SpeciesRegistry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
