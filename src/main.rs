// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use rusqlite::Connection;
use std::env;
use std::path::{Path, PathBuf};

// Use library instead of local modules
use marine_guardian::{
    get_all_observations, insert_observations, load_csv, setup_database, verify_count,
    AlertEngine, DeduplicationEngine, EcosystemAssessment, HabInputs, QualityEngine,
    SpeciesRegistry,
};

/// Default database location; override with the trailing CLI argument
fn default_db_path() -> PathBuf {
    PathBuf::from("observations.db")
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("import") => {
            let csv_path = args
                .get(2)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("observations.csv"));
            let db_path = args.get(3).map(PathBuf::from).unwrap_or_else(default_db_path);
            run_import(&csv_path, &db_path)?;
        }
        Some("report") => {
            let db_path = args.get(2).map(PathBuf::from).unwrap_or_else(default_db_path);
            run_report(&db_path)?;
        }
        Some("dedup") => {
            let db_path = args.get(2).map(PathBuf::from).unwrap_or_else(default_db_path);
            run_dedup(&db_path)?;
        }
        _ => {
            // UI mode (default)
            run_ui_mode(&default_db_path())?;
        }
    }

    Ok(())
}

fn run_import(csv_path: &Path, db_path: &Path) -> Result<()> {
    println!("🌊 Marine Ecosystem Guardian - Observation Import");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load CSV
    println!("\n📂 Loading CSV from {:?}...", csv_path);
    let observations = load_csv(csv_path)?;
    println!("✓ Loaded {} observations from CSV", observations.len());

    // 2. Setup database
    println!("\n🔧 Setting up database...");
    let conn = Connection::open(db_path)?;
    setup_database(&conn)?;
    println!("✓ Database initialized with WAL mode");

    // 3. Insert observations
    println!("\n💾 Inserting observations...");
    insert_observations(&conn, &observations)?;

    // 4. Verify count
    println!("\n🔍 Verifying database...");
    let count = verify_count(&conn)?;
    println!("✓ Database contains {} observations", count);

    // 5. Data quality pass
    println!("\n✅ Running data quality checks...");
    let engine = QualityEngine::new();
    let reports = engine.validate_batch(&observations);
    let summary = engine.batch_summary(&reports);
    println!("   {}", summary.summary());

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if count == observations.len() as i64 {
        println!("🎉 Import complete: {} observations stored", count);
    } else {
        println!("✅ Import complete");
        println!("✓ Unique observations: {}", count);
        println!(
            "✓ Duplicates detected: {}",
            observations.len() as i64 - count
        );
    }

    Ok(())
}

fn run_report(db_path: &Path) -> Result<()> {
    println!("🌊 Marine Ecosystem Guardian - Assessment Report");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if !db_path.exists() {
        eprintln!("❌ Database not found at {:?}", db_path);
        eprintln!("   Run: marine-guardian import <observations.csv>");
        eprintln!("   to import observations first.");
        std::process::exit(1);
    }

    let conn = Connection::open(db_path)?;
    let observations = get_all_observations(&conn)?;

    if observations.is_empty() {
        println!("No observations stored yet.");
        return Ok(());
    }

    // Latest observation drives the headline assessment
    let latest = &observations[0];
    let assessment = EcosystemAssessment::assess(latest);
    println!("\n📊 {}", assessment.summary());

    println!("\n   Species health:");
    for entry in &assessment.species_health {
        println!(
            "   {:<14} {:.2} ({}, {})",
            entry.group.as_str(),
            entry.health_index,
            entry.band.as_str(),
            entry.trend.as_str()
        );
    }

    println!("\n   Conservation actions:");
    for action in &assessment.plan.actions {
        println!("   • {}", action);
    }

    // Bloom risk from the latest observation
    let hab_report = marine_guardian::hab::assess(&HabInputs::from_observation(latest));
    println!(
        "\n🦠 Bloom risk: {:.1}% ({})",
        hab_report.score * 100.0,
        hab_report.level.as_str()
    );

    // Alerts over the whole log
    let alerts = AlertEngine::with_default_rules().evaluate_batch(&observations);
    println!("\n🚨 Active alerts: {}", alerts.len());
    for alert in alerts.iter().take(10) {
        println!("   {}", alert.summary());
    }

    // Threatened species on the watch list
    let registry = SpeciesRegistry::new();
    let threatened = registry.threatened();
    println!("\n🐢 Threatened species tracked: {}", threatened.len());
    for species in &threatened {
        println!(
            "   {} ({}) - {}",
            species.common_name,
            species.scientific_name,
            species.status.as_str()
        );
    }

    // Data quality over the whole log
    let engine = QualityEngine::new();
    let reports = engine.validate_batch(&observations);
    println!("\n✅ {}", engine.batch_summary(&reports).summary());

    Ok(())
}

fn run_dedup(db_path: &Path) -> Result<()> {
    println!("🔍 Marine Ecosystem Guardian - Duplicate Scan");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if !db_path.exists() {
        eprintln!("❌ Database not found at {:?}", db_path);
        std::process::exit(1);
    }

    let conn = Connection::open(db_path)?;
    let observations = get_all_observations(&conn)?;

    let engine = DeduplicationEngine::new();
    let matches = engine.find_duplicates(&observations);

    if matches.is_empty() {
        println!("\n✓ No duplicate observations found ({} checked)", observations.len());
        return Ok(());
    }

    println!(
        "\n⚠️  Found {} possible duplicate pair(s) in {} observations:",
        matches.len(),
        observations.len()
    );
    for m in &matches {
        println!("   [{:.0}%] {}", m.confidence * 100.0, m.reason);
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(db_path: &Path) -> Result<()> {
    println!("🖥️  Loading Marine Ecosystem Guardian UI...\n");

    if !db_path.exists() {
        eprintln!("❌ Database not found!");
        eprintln!("   Run: marine-guardian import <observations.csv>");
        eprintln!("   to import observations first.");
        std::process::exit(1);
    }

    let conn = Connection::open(db_path)?;

    // Load observations
    println!("📊 Loading observations...");
    let observations = get_all_observations(&conn)?;
    let total_count = verify_count(&conn)?;

    println!("✓ Loaded {} observations\n", observations.len());
    println!("Starting UI... (Press 'q' to quit)\n");

    // Create and run app
    let mut app = ui::App::new(observations, total_count);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_db_path: &Path) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use web UI: cargo run --bin guardian-server --features server");
    std::process::exit(1);
}
