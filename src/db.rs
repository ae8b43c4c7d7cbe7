use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;

/// Water-sample observation from a monitoring station
/// Core readings are immutable, metadata can grow without breaking changes
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Observation {
    // ========================================================================
    // CORE READINGS (never change - immutable schema)
    // ========================================================================
    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Station")]
    pub station: String,

    /// Dissolved oxygen in mg/L
    #[serde(rename = "Dissolved_Oxygen")]
    pub dissolved_oxygen: f64,

    /// Turbidity in NTU
    #[serde(rename = "Turbidity")]
    pub turbidity: f64,

    /// Microplastic concentration in particles/L
    #[serde(rename = "Microplastic")]
    pub microplastic: f64,

    /// Chemical pollutant index (0-10)
    #[serde(rename = "Chemical_Pollutants")]
    pub chemical_pollutants: f64,

    /// Water temperature in degrees Celsius
    #[serde(rename = "Water_Temp")]
    pub water_temp: f64,

    /// Nutrient level index (0-10)
    #[serde(rename = "Nutrient_Levels")]
    pub nutrient_levels: f64,

    /// Salinity in PSU
    #[serde(rename = "Salinity")]
    pub salinity: f64,

    #[serde(rename = "pH")]
    pub ph: f64,

    #[serde(rename = "Notes", default)]
    pub notes: String,

    // ========================================================================
    // PROVENANCE (audit trail back to the raw file)
    // ========================================================================
    #[serde(rename = "Source_File", default)]
    pub source_file: String,

    #[serde(rename = "Line_Number", default)]
    pub line_number: String,

    // ========================================================================
    // IDENTITY & VERSIONING
    // ========================================================================
    /// Stable identity (UUID) - NEVER changes, even when values are corrected
    /// This is DIFFERENT from idempotency_hash (which is for deduplication)
    #[serde(default = "default_uuid")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Version number (monotonically increasing)
    #[serde(default)]
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub version: i64,

    /// System time: When this record was created in our system
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_time: Option<DateTime<Utc>>,

    // ========================================================================
    // EXTENSIBLE METADATA (can grow without schema changes)
    // ========================================================================
    #[serde(default)]
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

// Helper functions for serde defaults
fn default_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn is_zero_i64(val: &i64) -> bool {
    *val == 0
}

impl Observation {
    /// Compute idempotency hash for duplicate detection
    /// NOTE: This is for DEDUPLICATION, not IDENTITY!
    /// Identity = id (UUID), Deduplication = hash
    pub fn compute_idempotency_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!(
            "{}{}{}{}{}{}{}{}{}{}",
            self.date,
            self.station,
            self.dissolved_oxygen,
            self.turbidity,
            self.microplastic,
            self.chemical_pollutants,
            self.water_temp,
            self.nutrient_levels,
            self.salinity,
            self.ph,
        ));
        format!("{:x}", hasher.finalize())
    }

    /// Initialize identity fields for a freshly loaded observation
    pub fn init_identity_fields(&mut self) {
        if self.id.is_empty() {
            self.id = uuid::Uuid::new_v4().to_string();
        }

        if self.version == 0 {
            self.version = 1;
        }

        if self.system_time.is_none() {
            self.system_time = Some(Utc::now());
        }
    }

    /// Get identity (stable UUID)
    pub fn identity(&self) -> &str {
        &self.id
    }

    // ========================================================================
    // EXTENSIBILITY HELPERS
    // Add new fields without modifying struct or database schema
    // ========================================================================

    /// Set provenance metadata (when and how this observation was loaded)
    pub fn set_provenance(
        &mut self,
        loaded_at: DateTime<Utc>,
        loader_version: &str,
        transformation_log: Vec<String>,
    ) {
        self.metadata.insert(
            "loaded_at".to_string(),
            serde_json::json!(loaded_at.to_rfc3339()),
        );
        self.metadata.insert(
            "loader_version".to_string(),
            serde_json::json!(loader_version),
        );
        self.metadata.insert(
            "transformation_log".to_string(),
            serde_json::json!(transformation_log),
        );
    }

    /// Set verification status (e.g. after a manual field check)
    pub fn set_verification(&mut self, verified: bool, verifier: &str, verified_at: DateTime<Utc>) {
        self.metadata
            .insert("verified".to_string(), serde_json::json!(verified));
        self.metadata
            .insert("verified_by".to_string(), serde_json::json!(verifier));
        self.metadata.insert(
            "verified_at".to_string(),
            serde_json::json!(verified_at.to_rfc3339()),
        );
    }

    /// Get metadata value by key
    pub fn get_metadata(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }

    /// Check if metadata key exists
    pub fn has_metadata(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }
}

/// Event for audit trail (every change is an event)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
    pub actor: String,
}

impl Event {
    pub fn new(
        event_type: &str,
        entity_type: &str,
        entity_id: &str,
        data: serde_json::Value,
        actor: &str,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
            actor: actor.to_string(),
        }
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Observations Table (with extensible metadata column)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS observations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            idempotency_hash TEXT UNIQUE NOT NULL,
            date TEXT NOT NULL,
            station TEXT NOT NULL,
            dissolved_oxygen REAL NOT NULL,
            turbidity REAL NOT NULL,
            microplastic REAL NOT NULL,
            chemical_pollutants REAL NOT NULL,
            water_temp REAL NOT NULL,
            nutrient_levels REAL NOT NULL,
            salinity REAL NOT NULL,
            ph REAL NOT NULL,
            notes TEXT,
            source_file TEXT NOT NULL,
            line_number TEXT NOT NULL,
            metadata TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            obs_uuid TEXT UNIQUE,
            version INTEGER DEFAULT 1,
            system_time TEXT
        )",
        [],
    )?;

    // ==========================================================================
    // Events Table (audit trail / event sourcing)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            data TEXT NOT NULL,
            actor TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_idempotency_hash ON observations(idempotency_hash)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_date ON observations(date)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_station ON observations(station)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_type, entity_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp)",
        [],
    )?;

    Ok(())
}

pub fn load_csv(csv_path: &Path) -> Result<Vec<Observation>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut observations = Vec::new();

    for (idx, result) in rdr.deserialize().enumerate() {
        let mut observation: Observation = result.context("Failed to deserialize observation")?;

        // Initialize identity fields (UUID, version, system time)
        observation.init_identity_fields();

        // Fill provenance if the CSV did not carry it
        if observation.source_file.is_empty() {
            observation.source_file = csv_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        if observation.line_number.is_empty() {
            // +2: header row plus 1-based numbering
            observation.line_number = (idx + 2).to_string();
        }

        observation.set_provenance(
            Utc::now(),
            "csv_loader_v1.0",
            vec!["loaded_from_csv".to_string()],
        );

        observations.push(observation);
    }

    Ok(observations)
}

pub fn insert_observations(conn: &Connection, observations: &[Observation]) -> Result<usize> {
    let mut inserted = 0;
    let mut duplicates = 0;

    for obs in observations {
        let hash = obs.compute_idempotency_hash();

        // Serialize metadata to JSON
        let metadata_json = serde_json::to_string(&obs.metadata)?;
        let system_time_str = obs.system_time.map(|dt| dt.to_rfc3339());

        let result = conn.execute(
            "INSERT INTO observations (
                idempotency_hash, date, station, dissolved_oxygen, turbidity,
                microplastic, chemical_pollutants, water_temp, nutrient_levels,
                salinity, ph, notes, source_file, line_number, metadata,
                obs_uuid, version, system_time
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            params![
                hash,
                obs.date,
                obs.station,
                obs.dissolved_oxygen,
                obs.turbidity,
                obs.microplastic,
                obs.chemical_pollutants,
                obs.water_temp,
                obs.nutrient_levels,
                obs.salinity,
                obs.ph,
                obs.notes,
                obs.source_file,
                obs.line_number,
                metadata_json,
                if obs.id.is_empty() { None } else { Some(&obs.id) },
                obs.version,
                system_time_str,
            ],
        );

        match result {
            Ok(_) => {
                inserted += 1;

                // Log event to audit trail
                let event = Event::new(
                    "observation_added",
                    "observation",
                    &hash,
                    serde_json::json!({
                        "station": obs.station,
                        "date": obs.date,
                        "source_file": obs.source_file,
                    }),
                    "csv_importer",
                );
                let _ = insert_event(conn, &event);
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                duplicates += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("✓ Inserted: {} observations", inserted);
    println!("✓ Skipped duplicates: {}", duplicates);

    Ok(inserted)
}

/// Insert event into audit trail
pub fn insert_event(conn: &Connection, event: &Event) -> Result<()> {
    let data_json = serde_json::to_string(&event.data)?;

    conn.execute(
        "INSERT INTO events (
            event_id, timestamp, event_type, entity_type, entity_id, data, actor
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.event_id,
            event.timestamp.to_rfc3339(),
            event.event_type,
            event.entity_type,
            event.entity_id,
            data_json,
            event.actor,
        ],
    )?;

    Ok(())
}

/// Get events for a specific entity
pub fn get_events_for_entity(
    conn: &Connection,
    entity_type: &str,
    entity_id: &str,
) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, entity_type, entity_id, data, actor
         FROM events
         WHERE entity_type = ?1 AND entity_id = ?2
         ORDER BY timestamp DESC",
    )?;

    let events = stmt
        .query_map(params![entity_type, entity_id], |row| {
            let timestamp_str: String = row.get(1)?;
            let data_json: String = row.get(5)?;

            Ok(Event {
                event_id: row.get(0)?,
                timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                    .map_err(|_| rusqlite::Error::InvalidQuery)?
                    .with_timezone(&Utc),
                event_type: row.get(2)?,
                entity_type: row.get(3)?,
                entity_id: row.get(4)?,
                data: serde_json::from_str(&data_json)
                    .map_err(|_| rusqlite::Error::InvalidQuery)?,
                actor: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

fn observation_from_row(row: &rusqlite::Row) -> rusqlite::Result<Observation> {
    let metadata_json: Option<String> = row.get(14)?;
    let metadata = if let Some(json_str) = metadata_json {
        serde_json::from_str(&json_str).unwrap_or_default()
    } else {
        HashMap::new()
    };

    let obs_uuid: Option<String> = row.get(15)?;
    let version: Option<i64> = row.get(16)?;
    let system_time_str: Option<String> = row.get(17)?;
    let system_time = system_time_str
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Ok(Observation {
        date: row.get(0)?,
        station: row.get(1)?,
        dissolved_oxygen: row.get(2)?,
        turbidity: row.get(3)?,
        microplastic: row.get(4)?,
        chemical_pollutants: row.get(5)?,
        water_temp: row.get(6)?,
        nutrient_levels: row.get(7)?,
        salinity: row.get(8)?,
        ph: row.get(9)?,
        notes: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
        source_file: row.get(11)?,
        line_number: row.get(12)?,
        id: obs_uuid.unwrap_or_default(),
        version: version.unwrap_or(0),
        system_time,
        metadata,
    })
}

const OBSERVATION_COLUMNS: &str = "date, station, dissolved_oxygen, turbidity,
                microplastic, chemical_pollutants, water_temp, nutrient_levels,
                salinity, ph, notes, source_file, line_number, created_at,
                metadata, obs_uuid, version, system_time";

pub fn get_all_observations(conn: &Connection) -> Result<Vec<Observation>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM observations ORDER BY date DESC",
        OBSERVATION_COLUMNS
    ))?;

    let observations = stmt
        .query_map([], observation_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(observations)
}

pub fn get_observations_by_station(conn: &Connection, station: &str) -> Result<Vec<Observation>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM observations WHERE station = ?1 ORDER BY date DESC",
        OBSERVATION_COLUMNS
    ))?;

    let observations = stmt
        .query_map([station], observation_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(observations)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM observations", [], |row| row.get(0))?;

    Ok(count)
}

/// Per-station aggregate statistics
#[derive(Debug, Clone, Serialize)]
pub struct StationStat {
    pub station: String,
    pub observation_count: i64,
    pub date_range: String,
    pub avg_dissolved_oxygen: f64,
    pub avg_turbidity: f64,
    pub avg_microplastic: f64,
    pub avg_chemical_pollutants: f64,
}

/// Get statistics grouped by station
pub fn get_station_stats(conn: &Connection) -> Result<Vec<StationStat>> {
    let mut stmt = conn.prepare(
        "SELECT
            station,
            COUNT(*) as count,
            MIN(date) || ' - ' || MAX(date) as date_range,
            AVG(dissolved_oxygen) as avg_do,
            AVG(turbidity) as avg_turbidity,
            AVG(microplastic) as avg_microplastic,
            AVG(chemical_pollutants) as avg_chemical
         FROM observations
         GROUP BY station
         ORDER BY station",
    )?;

    let stats = stmt
        .query_map([], |row| {
            Ok(StationStat {
                station: row.get(0)?,
                observation_count: row.get(1)?,
                date_range: row.get(2)?,
                avg_dissolved_oxygen: row.get(3)?,
                avg_turbidity: row.get(4)?,
                avg_microplastic: row.get(5)?,
                avg_chemical_pollutants: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper function to create test observations with all required fields
    pub(crate) fn create_test_observation(date: &str, station: &str) -> Observation {
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
            id: String::new(), // Will be set by init_identity_fields()
            version: 0,
            system_time: None,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn test_idempotency_import_twice() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let mut observations = vec![
            create_test_observation("12/31/2024", "Reef Crest North"),
            create_test_observation("12/30/2024", "Harbor Mouth"),
            create_test_observation("12/29/2024", "Lagoon South"),
        ];
        for obs in &mut observations {
            obs.init_identity_fields();
        }

        // First import
        let inserted1 = insert_observations(&conn, &observations).unwrap();
        let count1 = verify_count(&conn).unwrap();

        // Second import (same observations)
        let inserted2 = insert_observations(&conn, &observations).unwrap();
        let count2 = verify_count(&conn).unwrap();

        assert_eq!(inserted1, 3, "First import should insert 3 observations");
        assert_eq!(count1, 3);
        assert_eq!(
            inserted2, 0,
            "Second import should insert 0 observations (all duplicates)"
        );
        assert_eq!(count2, 3);
    }

    #[test]
    fn test_compute_idempotency_hash() {
        let obs = create_test_observation("12/31/2024", "Reef Crest North");

        let hash1 = obs.compute_idempotency_hash();
        let hash2 = obs.compute_idempotency_hash();

        // Same observation should produce same hash
        assert_eq!(hash1, hash2, "Same observation should produce same hash");
        assert_eq!(hash1.len(), 64, "SHA-256 hash should be 64 hex characters");

        // Different reading should produce a different hash
        let mut other = create_test_observation("12/31/2024", "Reef Crest North");
        other.dissolved_oxygen = 4.1;
        assert_ne!(hash1, other.compute_idempotency_hash());
    }

    #[test]
    fn test_extensible_metadata() {
        let mut obs = create_test_observation("12/31/2024", "Reef Crest North");

        obs.set_provenance(
            Utc::now(),
            "test_loader_v1.0",
            vec!["step1".to_string(), "step2".to_string()],
        );
        obs.set_verification(true, "field_team", Utc::now());

        assert!(obs.has_metadata("loaded_at"));
        assert!(obs.has_metadata("loader_version"));
        assert!(obs.has_metadata("verified_by"));
        assert_eq!(
            obs.get_metadata("verified"),
            Some(&serde_json::json!(true))
        );
    }

    #[test]
    fn test_init_identity_fields() {
        let mut obs = create_test_observation("12/31/2024", "Reef Crest North");
        assert!(obs.id.is_empty());

        obs.init_identity_fields();

        assert!(!obs.id.is_empty());
        assert_eq!(obs.version, 1);
        assert!(obs.system_time.is_some());

        // Calling again must not reassign identity
        let id = obs.id.clone();
        obs.init_identity_fields();
        assert_eq!(obs.id, id);
    }

    #[test]
    fn test_event_log() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let event = Event::new(
            "test_event",
            "observation",
            "test_id_123",
            serde_json::json!({"test": "data"}),
            "test_actor",
        );

        insert_event(&conn, &event).unwrap();

        let events = get_events_for_entity(&conn, "observation", "test_id_123").unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "test_event");
        assert_eq!(events[0].actor, "test_actor");
    }

    #[test]
    fn test_station_queries_and_stats() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let mut observations = vec![
            create_test_observation("12/31/2024", "Reef Crest North"),
            create_test_observation("12/30/2024", "Reef Crest North"),
            create_test_observation("12/29/2024", "Harbor Mouth"),
        ];
        // Vary a reading so the hashes differ
        observations[1].turbidity = 6.5;
        for obs in &mut observations {
            obs.init_identity_fields();
        }

        insert_observations(&conn, &observations).unwrap();

        let reef = get_observations_by_station(&conn, "Reef Crest North").unwrap();
        assert_eq!(reef.len(), 2);
        assert!(reef.iter().all(|o| o.station == "Reef Crest North"));

        let stats = get_station_stats(&conn).unwrap();
        assert_eq!(stats.len(), 2);

        let reef_stat = stats
            .iter()
            .find(|s| s.station == "Reef Crest North")
            .unwrap();
        assert_eq!(reef_stat.observation_count, 2);
        assert!((reef_stat.avg_turbidity - 4.75).abs() < 1e-9);
        assert!(reef_stat.date_range.contains("12/30/2024"));
    }

    #[test]
    fn test_roundtrip_preserves_readings() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let mut obs = create_test_observation("2024-12-31", "Lagoon South");
        obs.notes = "spring tide".to_string();
        obs.init_identity_fields();

        insert_observations(&conn, &[obs.clone()]).unwrap();

        let stored = get_all_observations(&conn).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].station, "Lagoon South");
        assert_eq!(stored[0].notes, "spring tide");
        assert_eq!(stored[0].id, obs.id);
        assert_eq!(stored[0].version, 1);
        assert!((stored[0].ph - 8.0).abs() < 1e-9);
        assert!(stored[0].system_time.is_some());
    }
}
