// Entity Models
// "Identity persists, values change"
//
// Each entity has:
// - Stable identity (UUID) that NEVER changes
// - Timeline of immutable values with temporal tracking
// - Registry for normalization and lookups

pub mod species;
pub mod station;

pub use species::{ConservationStatus, Species, SpeciesRegistry};
pub use station::{Station, StationKind, StationRegistry};
