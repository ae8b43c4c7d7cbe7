// 📍 Station Entity - Stable identity + normalization
//
// "Station name is a VALUE (can change), Station UUID is IDENTITY (never changes)"
//
// Problem solved:
// - "Reef Crest N", "Reef Crest North", "RCN-01" all name the same site
// - Renaming a site does not break historical observations
// - UUID provides a stable foreign key for observations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

// ============================================================================
// STATION KIND
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StationKind {
    /// Reef survey site
    Reef,

    /// Coastal / nearshore site
    Coastal,

    /// Open-ocean buoy or transect
    OpenOcean,

    /// Estuary / river mouth
    Estuary,

    /// Unknown / Other
    Unknown,
}

impl StationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationKind::Reef => "Reef",
            StationKind::Coastal => "Coastal",
            StationKind::OpenOcean => "Open Ocean",
            StationKind::Estuary => "Estuary",
            StationKind::Unknown => "Unknown",
        }
    }
}

// ============================================================================
// STATION ENTITY
// ============================================================================

/// Station Entity - identity/value separation
///
/// Identity: UUID (never changes)
/// Values: canonical_name, aliases, region, kind (can change over time)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Stable identity (UUID) - NEVER changes
    pub id: String,

    /// Canonical name (the "official" name we use)
    pub canonical_name: String,

    /// Alternative names that map to this station
    /// Example: ["Reef Crest N", "RCN-01"]
    pub aliases: Vec<String>,

    /// Region label (e.g. "North Atoll")
    pub region: String,

    /// Kind of monitoring site
    pub kind: StationKind,

    // Versioning (temporal tracking)
    pub version: i64,
    pub system_time: DateTime<Utc>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,

    /// Extensible metadata
    pub metadata: serde_json::Value,
}

impl Station {
    /// Create new station entity with UUID
    pub fn new(canonical_name: String, region: String, kind: StationKind) -> Self {
        let now = Utc::now();

        Station {
            id: uuid::Uuid::new_v4().to_string(),
            canonical_name,
            aliases: Vec::new(),
            region,
            kind,
            version: 1,
            system_time: now,
            valid_from: now,
            valid_until: None,
            metadata: serde_json::json!({}),
        }
    }

    /// Add an alias to this station
    pub fn add_alias(&mut self, alias: String) {
        if !self.aliases.contains(&alias) && alias != self.canonical_name {
            self.aliases.push(alias);
        }
    }

    /// Check if a string matches this station (canonical name or any alias)
    pub fn matches(&self, station_string: &str) -> bool {
        let lower = station_string.to_lowercase();

        if self.canonical_name.to_lowercase().contains(&lower)
            || lower.contains(&self.canonical_name.to_lowercase())
        {
            return true;
        }

        self.aliases.iter().any(|alias| {
            let alias_lower = alias.to_lowercase();
            alias_lower.contains(&lower) || lower.contains(&alias_lower)
        })
    }

    /// Get all names (canonical + aliases)
    pub fn all_names(&self) -> Vec<String> {
        let mut names = vec![self.canonical_name.clone()];
        names.extend(self.aliases.clone());
        names
    }

    /// Check if this version is current
    pub fn is_current(&self) -> bool {
        self.valid_until.is_none()
    }

    /// Create next version (for updating values)
    pub fn next_version(&self) -> Station {
        let now = Utc::now();
        let mut next = self.clone();
        next.version += 1;
        next.valid_from = now;
        next.valid_until = None;
        next
    }
}

// ============================================================================
// STATION REGISTRY
// ============================================================================

/// Registry of all known monitoring stations
///
/// Multi-version storage: stores ALL versions, never deletes.
/// In production this would be backed by a database with compound key
/// (id, version).
pub struct StationRegistry {
    /// ALL versions of all stations (append-only, never delete)
    versions: Arc<RwLock<Vec<Station>>>,
}

impl StationRegistry {
    /// Create new registry with the default survey network
    pub fn new() -> Self {
        let mut registry = StationRegistry {
            versions: Arc::new(RwLock::new(Vec::new())),
        };

        registry.register_default_stations();
        registry
    }

    /// Empty registry (for programs that load their own network)
    pub fn empty() -> Self {
        StationRegistry {
            versions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Initialize with the core survey network
    fn register_default_stations(&mut self) {
        let mut reef_north = Station::new(
            "Reef Crest North".to_string(),
            "North Atoll".to_string(),
            StationKind::Reef,
        );
        reef_north.add_alias("Reef Crest N".to_string());
        reef_north.add_alias("RCN-01".to_string());
        self.register(reef_north);

        let mut lagoon = Station::new(
            "Lagoon South".to_string(),
            "South Atoll".to_string(),
            StationKind::Reef,
        );
        lagoon.add_alias("LS-02".to_string());
        self.register(lagoon);

        let mut harbor = Station::new(
            "Harbor Mouth".to_string(),
            "Main Island".to_string(),
            StationKind::Coastal,
        );
        harbor.add_alias("HM-03".to_string());
        harbor.add_alias("Harbour Mouth".to_string());
        self.register(harbor);

        let mut estuary = Station::new(
            "River Delta East".to_string(),
            "Main Island".to_string(),
            StationKind::Estuary,
        );
        estuary.add_alias("RDE-04".to_string());
        self.register(estuary);

        let mut buoy = Station::new(
            "Offshore Buoy 7".to_string(),
            "Open Water".to_string(),
            StationKind::OpenOcean,
        );
        buoy.add_alias("OB-07".to_string());
        self.register(buoy);
    }

    /// Register a new station version (append-only, never overwrites)
    pub fn register(&mut self, station: Station) {
        let mut versions = self.versions.write().unwrap();
        versions.push(station);
    }

    /// Get ALL versions of a station by ID
    pub fn get_all_versions(&self, id: &str) -> Vec<Station> {
        let versions = self.versions.read().unwrap();
        versions.iter().filter(|s| s.id == id).cloned().collect()
    }

    /// Get current version of a station by ID
    pub fn get_current_version(&self, id: &str) -> Option<Station> {
        let versions = self.versions.read().unwrap();
        versions
            .iter()
            .filter(|s| s.id == id && s.is_current())
            .cloned()
            .next()
    }

    /// Get station as of a specific time (temporal query)
    pub fn get_station_at_time(&self, id: &str, as_of: DateTime<Utc>) -> Option<Station> {
        let versions = self.versions.read().unwrap();
        versions
            .iter()
            .filter(|s| s.id == id)
            .find(|s| {
                s.valid_from <= as_of && (s.valid_until.is_none() || s.valid_until.unwrap() > as_of)
            })
            .cloned()
    }

    /// Update station (creates new version, expires old version)
    pub fn update_station<F>(&mut self, id: &str, mut update_fn: F) -> Result<(), String>
    where
        F: FnMut(&mut Station),
    {
        let now = Utc::now();

        let current = self
            .get_current_version(id)
            .ok_or_else(|| format!("Station not found: {}", id))?;

        let mut expired = current.clone();
        expired.valid_until = Some(now);

        let mut next = current.next_version();
        update_fn(&mut next);

        {
            let mut versions = self.versions.write().unwrap();

            versions.retain(|s| !(s.id == id && s.is_current()));

            versions.push(expired);
            versions.push(next);
        }

        Ok(())
    }

    /// Find station by string (searches canonical name and aliases)
    pub fn find_by_string(&self, station_string: &str) -> Option<Station> {
        let versions = self.versions.read().unwrap();
        versions
            .iter()
            .filter(|s| s.is_current())
            .find(|station| station.matches(station_string))
            .cloned()
    }

    /// Find station by UUID - returns current version
    pub fn find_by_id(&self, id: &str) -> Option<Station> {
        self.get_current_version(id)
    }

    /// Get all stations (current versions only)
    pub fn all_stations(&self) -> Vec<Station> {
        let versions = self.versions.read().unwrap();
        let mut current: Vec<Station> =
            versions.iter().filter(|s| s.is_current()).cloned().collect();

        current.sort_by(|a, b| a.id.cmp(&b.id).then(b.version.cmp(&a.version)));
        current.dedup_by(|a, b| a.id == b.id);

        current
    }

    /// Count total stations (current versions only)
    pub fn count(&self) -> usize {
        self.all_stations().len()
    }

    /// Get stations by kind (current versions only)
    pub fn by_kind(&self, kind: StationKind) -> Vec<Station> {
        self.all_stations()
            .into_iter()
            .filter(|s| s.kind == kind)
            .collect()
    }

    /// Get stations by region (current versions only)
    pub fn by_region(&self, region: &str) -> Vec<Station> {
        self.all_stations()
            .into_iter()
            .filter(|s| s.region == region)
            .collect()
    }

    /// Normalize a station string to its canonical name
    ///
    /// Example: "RCN-01" resolves to "Reef Crest North"
    pub fn normalize(&self, station_string: &str) -> Option<String> {
        self.find_by_string(station_string)
            .map(|station| station.canonical_name)
    }

    /// Get station ID for a station string (for foreign key references)
    pub fn get_id(&self, station_string: &str) -> Option<String> {
        self.find_by_string(station_string).map(|station| station.id)
    }
}

impl Default for StationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_creation() {
        let station = Station::new(
            "Test Site".to_string(),
            "Test Region".to_string(),
            StationKind::Reef,
        );

        assert!(!station.id.is_empty());
        assert_eq!(station.canonical_name, "Test Site");
        assert_eq!(station.region, "Test Region");
        assert_eq!(station.version, 1);
        assert!(station.is_current());
        assert_eq!(station.aliases.len(), 0);
    }

    #[test]
    fn test_station_add_alias() {
        let mut station = Station::new(
            "Reef Crest North".to_string(),
            "North Atoll".to_string(),
            StationKind::Reef,
        );

        station.add_alias("RCN-01".to_string());
        station.add_alias("Reef Crest N".to_string());
        station.add_alias("RCN-01".to_string()); // Duplicate - should not add

        assert_eq!(station.aliases.len(), 2);
    }

    #[test]
    fn test_station_matches() {
        let mut station = Station::new(
            "Reef Crest North".to_string(),
            "North Atoll".to_string(),
            StationKind::Reef,
        );
        station.add_alias("RCN-01".to_string());

        assert!(station.matches("Reef Crest North"));
        assert!(station.matches("reef crest north")); // Case insensitive
        assert!(station.matches("RCN-01"));
        assert!(station.matches("rcn-01"));

        assert!(!station.matches("Harbor Mouth"));
    }

    #[test]
    fn test_registry_initialization() {
        let registry = StationRegistry::new();

        assert_eq!(registry.count(), 5);

        let names: Vec<String> = registry
            .all_stations()
            .iter()
            .map(|s| s.canonical_name.clone())
            .collect();

        assert!(names.contains(&"Reef Crest North".to_string()));
        assert!(names.contains(&"Harbor Mouth".to_string()));
        assert!(names.contains(&"Offshore Buoy 7".to_string()));
    }

    #[test]
    fn test_registry_normalize() {
        let registry = StationRegistry::new();

        assert_eq!(
            registry.normalize("RCN-01"),
            Some("Reef Crest North".to_string())
        );
        assert_eq!(
            registry.normalize("Harbour Mouth"),
            Some("Harbor Mouth".to_string())
        );
        assert_eq!(registry.normalize("Nowhere Shoal"), None);
    }

    #[test]
    fn test_registry_get_id_is_stable() {
        let registry = StationRegistry::new();

        let id1 = registry.get_id("RCN-01");
        let id2 = registry.get_id("Reef Crest North");

        assert!(id1.is_some());
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_registry_by_kind_and_region() {
        let registry = StationRegistry::new();

        assert_eq!(registry.by_kind(StationKind::Reef).len(), 2);
        assert_eq!(registry.by_kind(StationKind::Estuary).len(), 1);
        assert_eq!(registry.by_region("Main Island").len(), 2);
    }

    #[test]
    fn test_update_preserves_history() {
        let mut registry = StationRegistry::empty();

        let station = Station::new(
            "Test Site".to_string(),
            "Test Region".to_string(),
            StationKind::Coastal,
        );
        let station_id = station.id.clone();
        registry.register(station);

        registry
            .update_station(&station_id, |s| {
                s.region = "Moved Region".to_string();
            })
            .unwrap();

        let versions = registry.get_all_versions(&station_id);
        assert_eq!(versions.len(), 2);

        // Version 1 is expired, version 2 is current
        assert!(versions[0].valid_until.is_some());
        assert_eq!(versions[0].region, "Test Region");
        assert!(versions[1].valid_until.is_none());
        assert_eq!(versions[1].region, "Moved Region");
        assert_eq!(versions[1].version, 2);

        // Identity persists
        assert_eq!(versions[0].id, versions[1].id);
    }

    #[test]
    fn test_temporal_query() {
        use chrono::Duration;

        let mut registry = StationRegistry::empty();

        let station = Station::new(
            "Test Site".to_string(),
            "Test Region".to_string(),
            StationKind::Coastal,
        );
        let station_id = station.id.clone();
        let t0 = Utc::now();
        registry.register(station);

        std::thread::sleep(std::time::Duration::from_millis(10));
        let t1 = Utc::now();

        registry
            .update_station(&station_id, |s| {
                s.region = "Moved Region".to_string();
            })
            .unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));
        let t2 = Utc::now();

        // Before the station existed
        let before = t0 - Duration::seconds(1);
        assert!(registry.get_station_at_time(&station_id, before).is_none());

        // After creation, before the update
        let at_t1 = registry.get_station_at_time(&station_id, t1).unwrap();
        assert_eq!(at_t1.version, 1);
        assert_eq!(at_t1.region, "Test Region");

        // After the update
        let at_t2 = registry.get_station_at_time(&station_id, t2).unwrap();
        assert_eq!(at_t2.version, 2);
        assert_eq!(at_t2.region, "Moved Region");
    }

    #[test]
    fn test_update_nonexistent_station_fails() {
        let mut registry = StationRegistry::empty();

        let result = registry.update_station("non-existent-id", |s| {
            s.region = "XX".to_string();
        });

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Station not found"));
    }
}
