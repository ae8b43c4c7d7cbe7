// 🐢 Species Entity - Stable identity for tracked marine species
//
// "Common name is a VALUE (can change), Species UUID is IDENTITY (never changes)"
//
// Problem solved:
// - "Green Turtle", "Green Sea Turtle", "C. mydas" all name the same species
// - Conservation status changes over time without losing history

use crate::biodiversity::SpeciesGroup;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

// ============================================================================
// CONSERVATION STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConservationStatus {
    LeastConcern,
    NearThreatened,
    Vulnerable,
    Endangered,
    CriticallyEndangered,
    Unknown,
}

impl ConservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConservationStatus::LeastConcern => "Least Concern",
            ConservationStatus::NearThreatened => "Near Threatened",
            ConservationStatus::Vulnerable => "Vulnerable",
            ConservationStatus::Endangered => "Endangered",
            ConservationStatus::CriticallyEndangered => "Critically Endangered",
            ConservationStatus::Unknown => "Unknown",
        }
    }

    /// Threatened covers Vulnerable and worse
    pub fn is_threatened(&self) -> bool {
        matches!(
            self,
            ConservationStatus::Vulnerable
                | ConservationStatus::Endangered
                | ConservationStatus::CriticallyEndangered
        )
    }
}

// ============================================================================
// SPECIES ENTITY
// ============================================================================

/// Species Entity - identity/value separation
///
/// Identity: UUID (never changes)
/// Values: common_name, scientific_name, status, aliases (can change)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    /// Stable identity (UUID) - NEVER changes
    pub id: String,

    /// Common name (the "official" name we use)
    pub common_name: String,

    /// Scientific (binomial) name
    pub scientific_name: String,

    /// Alternative names that map to this species
    pub aliases: Vec<String>,

    /// Which survey group this species belongs to
    pub group: SpeciesGroup,

    /// Current conservation status
    pub status: ConservationStatus,

    // Versioning (temporal tracking)
    pub version: i64,
    pub system_time: DateTime<Utc>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl Species {
    pub fn new(
        common_name: String,
        scientific_name: String,
        group: SpeciesGroup,
        status: ConservationStatus,
    ) -> Self {
        let now = Utc::now();

        Species {
            id: uuid::Uuid::new_v4().to_string(),
            common_name,
            scientific_name,
            aliases: Vec::new(),
            group,
            status,
            version: 1,
            system_time: now,
            valid_from: now,
            valid_until: None,
        }
    }

    pub fn add_alias(&mut self, alias: String) {
        if !self.aliases.contains(&alias) && alias != self.common_name {
            self.aliases.push(alias);
        }
    }

    /// Check if a string matches this species (common, scientific or alias)
    pub fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();

        if self.common_name.to_lowercase() == lower
            || self.scientific_name.to_lowercase() == lower
        {
            return true;
        }

        self.aliases
            .iter()
            .any(|alias| alias.to_lowercase() == lower)
    }

    pub fn is_current(&self) -> bool {
        self.valid_until.is_none()
    }

    pub fn next_version(&self) -> Species {
        let now = Utc::now();
        let mut next = self.clone();
        next.version += 1;
        next.valid_from = now;
        next.valid_until = None;
        next
    }
}

// ============================================================================
// SPECIES REGISTRY
// ============================================================================

/// Registry of tracked species (append-only multi-version store)
pub struct SpeciesRegistry {
    versions: Arc<RwLock<Vec<Species>>>,
}

impl SpeciesRegistry {
    /// Create new registry with the core tracked species
    pub fn new() -> Self {
        let mut registry = SpeciesRegistry {
            versions: Arc::new(RwLock::new(Vec::new())),
        };

        registry.register_default_species();
        registry
    }

    pub fn empty() -> Self {
        SpeciesRegistry {
            versions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn register_default_species(&mut self) {
        // Turtles are counted on the fish transects in this survey design
        let mut turtle = Species::new(
            "Green Sea Turtle".to_string(),
            "Chelonia mydas".to_string(),
            SpeciesGroup::Fish,
            ConservationStatus::Endangered,
        );
        turtle.add_alias("Green Turtle".to_string());
        self.register(turtle);

        let mut grouper = Species::new(
            "Nassau Grouper".to_string(),
            "Epinephelus striatus".to_string(),
            SpeciesGroup::Fish,
            ConservationStatus::CriticallyEndangered,
        );
        grouper.add_alias("Cherna".to_string());
        self.register(grouper);

        let mut manatee = Species::new(
            "West Indian Manatee".to_string(),
            "Trichechus manatus".to_string(),
            SpeciesGroup::Mammals,
            ConservationStatus::Vulnerable,
        );
        manatee.add_alias("Sea Cow".to_string());
        self.register(manatee);

        let conch = Species::new(
            "Queen Conch".to_string(),
            "Aliger gigas".to_string(),
            SpeciesGroup::Invertebrates,
            ConservationStatus::NearThreatened,
        );
        self.register(conch);

        let mut seagrass = Species::new(
            "Turtle Grass".to_string(),
            "Thalassia testudinum".to_string(),
            SpeciesGroup::PlantLife,
            ConservationStatus::LeastConcern,
        );
        seagrass.add_alias("Turtlegrass".to_string());
        self.register(seagrass);
    }

    /// Register a new species version (append-only)
    pub fn register(&mut self, species: Species) {
        let mut versions = self.versions.write().unwrap();
        versions.push(species);
    }

    pub fn get_current_version(&self, id: &str) -> Option<Species> {
        let versions = self.versions.read().unwrap();
        versions
            .iter()
            .filter(|s| s.id == id && s.is_current())
            .cloned()
            .next()
    }

    pub fn get_all_versions(&self, id: &str) -> Vec<Species> {
        let versions = self.versions.read().unwrap();
        versions.iter().filter(|s| s.id == id).cloned().collect()
    }

    /// Update species (creates new version, expires old version)
    pub fn update_species<F>(&mut self, id: &str, mut update_fn: F) -> Result<(), String>
    where
        F: FnMut(&mut Species),
    {
        let now = Utc::now();

        let current = self
            .get_current_version(id)
            .ok_or_else(|| format!("Species not found: {}", id))?;

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

    pub fn find_by_name(&self, name: &str) -> Option<Species> {
        let versions = self.versions.read().unwrap();
        versions
            .iter()
            .filter(|s| s.is_current())
            .find(|species| species.matches(name))
            .cloned()
    }

    pub fn all_species(&self) -> Vec<Species> {
        let versions = self.versions.read().unwrap();
        let mut current: Vec<Species> =
            versions.iter().filter(|s| s.is_current()).cloned().collect();

        current.sort_by(|a, b| a.id.cmp(&b.id).then(b.version.cmp(&a.version)));
        current.dedup_by(|a, b| a.id == b.id);

        current
    }

    pub fn count(&self) -> usize {
        self.all_species().len()
    }

    /// Current species in one survey group
    pub fn by_group(&self, group: SpeciesGroup) -> Vec<Species> {
        self.all_species()
            .into_iter()
            .filter(|s| s.group == group)
            .collect()
    }

    /// Current species at or worse than Vulnerable
    pub fn threatened(&self) -> Vec<Species> {
        self.all_species()
            .into_iter()
            .filter(|s| s.status.is_threatened())
            .collect()
    }
}

impl Default for SpeciesRegistry {
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
    fn test_species_creation_and_matching() {
        let mut species = Species::new(
            "Green Sea Turtle".to_string(),
            "Chelonia mydas".to_string(),
            SpeciesGroup::Fish,
            ConservationStatus::Endangered,
        );
        species.add_alias("Green Turtle".to_string());

        assert!(species.matches("Green Sea Turtle"));
        assert!(species.matches("chelonia mydas"));
        assert!(species.matches("green turtle"));
        assert!(!species.matches("Hawksbill"));
        assert!(species.is_current());
    }

    #[test]
    fn test_registry_defaults() {
        let registry = SpeciesRegistry::new();

        assert_eq!(registry.count(), 5);
        assert!(registry.find_by_name("Sea Cow").is_some());
        assert!(registry.find_by_name("Thalassia testudinum").is_some());
    }

    #[test]
    fn test_by_group() {
        let registry = SpeciesRegistry::new();

        assert_eq!(registry.by_group(SpeciesGroup::Mammals).len(), 1);
        assert_eq!(registry.by_group(SpeciesGroup::PlantLife).len(), 1);
        assert_eq!(registry.by_group(SpeciesGroup::Fish).len(), 2);
    }

    #[test]
    fn test_threatened_filter() {
        let registry = SpeciesRegistry::new();

        let threatened = registry.threatened();
        // Turtle (EN), Grouper (CR), Manatee (VU)
        assert_eq!(threatened.len(), 3);
        assert!(threatened.iter().all(|s| s.status.is_threatened()));
    }

    #[test]
    fn test_status_update_preserves_history() {
        let mut registry = SpeciesRegistry::empty();

        let species = Species::new(
            "Test Fish".to_string(),
            "Testus piscis".to_string(),
            SpeciesGroup::Fish,
            ConservationStatus::LeastConcern,
        );
        let id = species.id.clone();
        registry.register(species);

        registry
            .update_species(&id, |s| {
                s.status = ConservationStatus::Vulnerable;
            })
            .unwrap();

        let versions = registry.get_all_versions(&id);
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].status, ConservationStatus::LeastConcern);
        assert!(versions[0].valid_until.is_some());
        assert_eq!(versions[1].status, ConservationStatus::Vulnerable);
        assert!(versions[1].is_current());

        let current = registry.get_current_version(&id).unwrap();
        assert_eq!(current.version, 2);
    }

    #[test]
    fn test_update_nonexistent_species_fails() {
        let mut registry = SpeciesRegistry::empty();

        let result = registry.update_species("missing", |s| {
            s.status = ConservationStatus::Unknown;
        });

        assert!(result.is_err());
    }
}
