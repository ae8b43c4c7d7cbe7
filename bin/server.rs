// Marine Ecosystem Guardian - Web Server
// JSON API plus the browser dashboard

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use marine_guardian::{
    get_all_observations, get_observations_by_station, get_station_stats, hab,
    water_quality, AlertEngine, CoralAssessment, EcosystemAssessment, HabInputs,
    Observation, OilSpillAssessment, PlasticAnalysis, PreventionGuide, QualityBand,
    StationRegistry, StationStat,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

/// Observation response (simplified for API, with derived score)
#[derive(Serialize)]
struct ObservationResponse {
    date: String,
    station: String,
    dissolved_oxygen: f64,
    turbidity: f64,
    microplastic: f64,
    chemical_pollutants: f64,
    water_temp: f64,
    nutrient_levels: f64,
    salinity: f64,
    ph: f64,
    water_quality_score: f64,
    band: String,
    source_file: String,
}

impl From<Observation> for ObservationResponse {
    fn from(obs: Observation) -> Self {
        let score = water_quality::water_quality_score(&obs);
        Self {
            date: obs.date,
            station: obs.station,
            dissolved_oxygen: obs.dissolved_oxygen,
            turbidity: obs.turbidity,
            microplastic: obs.microplastic,
            chemical_pollutants: obs.chemical_pollutants,
            water_temp: obs.water_temp,
            nutrient_levels: obs.nutrient_levels,
            salinity: obs.salinity,
            ph: obs.ph,
            water_quality_score: score,
            band: QualityBand::from_score(score).as_str().to_string(),
            source_file: obs.source_file,
        }
    }
}

/// Station response
#[derive(Serialize)]
struct StationResponse {
    station: String,
    observation_count: i64,
    date_range: String,
    avg_dissolved_oxygen: f64,
    avg_turbidity: f64,
    avg_microplastic: f64,
    avg_chemical_pollutants: f64,
}

impl From<StationStat> for StationResponse {
    fn from(stat: StationStat) -> Self {
        Self {
            station: stat.station,
            observation_count: stat.observation_count,
            date_range: stat.date_range,
            avg_dissolved_oxygen: stat.avg_dissolved_oxygen,
            avg_turbidity: stat.avg_turbidity,
            avg_microplastic: stat.avg_microplastic,
            avg_chemical_pollutants: stat.avg_chemical_pollutants,
        }
    }
}

// ============================================================================
// Query parameter types (defaults match the field instrument defaults)
// ============================================================================

#[derive(Deserialize)]
struct WaterQualityParams {
    #[serde(default = "default_oxygen")]
    oxygen: f64,
    #[serde(default = "default_turbidity")]
    turbidity: f64,
    #[serde(default = "default_microplastic")]
    microplastic: f64,
    #[serde(default = "default_chemical")]
    chemical: f64,
}

fn default_oxygen() -> f64 {
    7.0
}
fn default_turbidity() -> f64 {
    3.0
}
fn default_microplastic() -> f64 {
    5.0
}
fn default_chemical() -> f64 {
    1.0
}

#[derive(Deserialize)]
struct HabParams {
    #[serde(default = "default_temp")]
    temp: f64,
    #[serde(default = "default_nutrients")]
    nutrients: f64,
    #[serde(default = "default_salinity")]
    salinity: f64,
    #[serde(default = "default_ph")]
    ph: f64,
}

fn default_temp() -> f64 {
    25.0
}
fn default_nutrients() -> f64 {
    2.0
}
fn default_salinity() -> f64 {
    35.0
}
fn default_ph() -> f64 {
    8.0
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/observations - Get all observations
async fn get_observations(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    match get_all_observations(&conn) {
        Ok(observations) => {
            let response: Vec<ObservationResponse> =
                observations.into_iter().map(|obs| obs.into()).collect();

            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => {
            eprintln!("Error getting observations: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::ok(Vec::<ObservationResponse>::new())),
            )
                .into_response()
        }
    }
}

/// GET /api/observations/:station - Get observations from one station
async fn get_station_observations(
    State(state): State<AppState>,
    Path(station): Path<String>,
) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    // Decode URL-encoded station name, then resolve aliases ("RCN-01")
    // to the canonical name observations are stored under
    let decoded_station = urlencoding::decode(&station)
        .unwrap_or_else(|_| station.clone().into())
        .into_owned();
    let decoded_station = StationRegistry::new()
        .normalize(&decoded_station)
        .unwrap_or(decoded_station);

    match get_observations_by_station(&conn, &decoded_station) {
        Ok(observations) => {
            let response: Vec<ObservationResponse> =
                observations.into_iter().map(|obs| obs.into()).collect();

            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => {
            eprintln!(
                "Error getting observations for station {}: {}",
                decoded_station, e
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::ok(Vec::<ObservationResponse>::new())),
            )
                .into_response()
        }
    }
}

/// GET /api/stations - Get all stations with statistics
async fn get_stations(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    match get_station_stats(&conn) {
        Ok(stats) => {
            let response: Vec<StationResponse> =
                stats.into_iter().map(|stat| stat.into()).collect();

            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => {
            eprintln!("Error getting stations: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::ok(Vec::<StationResponse>::new())),
            )
                .into_response()
        }
    }
}

/// GET /api/assessment - Ecosystem assessment from the latest observation
async fn get_assessment(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    match get_all_observations(&conn) {
        Ok(observations) => {
            if let Some(latest) = observations.first() {
                let assessment = EcosystemAssessment::assess(latest);
                (StatusCode::OK, Json(ApiResponse::ok(Some(assessment)))).into_response()
            } else {
                (
                    StatusCode::OK,
                    Json(ApiResponse::ok(None::<EcosystemAssessment>)),
                )
                    .into_response()
            }
        }
        Err(e) => {
            eprintln!("Error building assessment: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::ok(None::<EcosystemAssessment>)),
            )
                .into_response()
        }
    }
}

/// GET /api/alerts - Active alerts across all observations
async fn get_alerts(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    match get_all_observations(&conn) {
        Ok(observations) => {
            let alerts = AlertEngine::with_default_rules().evaluate_batch(&observations);
            (StatusCode::OK, Json(ApiResponse::ok(alerts))).into_response()
        }
        Err(e) => {
            eprintln!("Error evaluating alerts: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::ok(Vec::<marine_guardian::Alert>::new())),
            )
                .into_response()
        }
    }
}

/// GET /api/water-quality - Score ad-hoc readings (dashboard sliders)
async fn get_water_quality(Query(params): Query<WaterQualityParams>) -> impl IntoResponse {
    use marine_guardian::{parameter_score, WaterParameter};

    let oxygen_score =
        parameter_score(params.oxygen, WaterParameter::DissolvedOxygen.optimal_range());
    let turbidity_score =
        parameter_score(params.turbidity, WaterParameter::Turbidity.optimal_range());
    let microplastic_score =
        parameter_score(params.microplastic, WaterParameter::Microplastic.optimal_range());
    let chemical_score = parameter_score(
        params.chemical,
        WaterParameter::ChemicalPollutants.optimal_range(),
    );

    let overall = 0.3 * oxygen_score
        + 0.2 * turbidity_score
        + 0.3 * microplastic_score
        + 0.2 * chemical_score;

    let body = serde_json::json!({
        "oxygen_score": oxygen_score,
        "turbidity_score": turbidity_score,
        "microplastic_score": microplastic_score,
        "chemical_score": chemical_score,
        "overall_score": overall,
        "band": QualityBand::from_score(overall).as_str(),
    });

    Json(ApiResponse::ok(body))
}

/// GET /api/hab - Bloom risk for ad-hoc environmental inputs
async fn get_hab_risk(Query(params): Query<HabParams>) -> impl IntoResponse {
    let inputs = HabInputs {
        water_temp: params.temp,
        nutrient_levels: params.nutrients,
        salinity: params.salinity,
        ph: params.ph,
    };

    Json(ApiResponse::ok(hab::assess(&inputs)))
}

/// GET /api/plastic - Plastic waste analysis
async fn get_plastic() -> impl IntoResponse {
    Json(ApiResponse::ok(PlasticAnalysis::report()))
}

/// GET /api/coral - Coral reef assessment
async fn get_coral() -> impl IntoResponse {
    Json(ApiResponse::ok(CoralAssessment::report()))
}

/// GET /api/oil-spill - Oil spill assessment
async fn get_oil_spill() -> impl IntoResponse {
    Json(ApiResponse::ok(OilSpillAssessment::report()))
}

/// GET /api/guide - Prevention guide content
async fn get_guide() -> impl IntoResponse {
    Json(ApiResponse::ok(PreventionGuide::new()))
}

/// GET / - Serve dashboard
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

/// GET /guide - Serve prevention guide page
async fn serve_guide() -> impl IntoResponse {
    Html(include_str!("../web/guide.html"))
}

/// GET /about - Serve about page
async fn serve_about() -> impl IntoResponse {
    Html(include_str!("../web/about.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌊 Marine Ecosystem Guardian - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Open database (path from first argument)
    let db_arg = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "observations.db".to_string());
    let db_path = std::path::Path::new(&db_arg);

    if !db_path.exists() {
        eprintln!("❌ Database not found at {:?}", db_path);
        eprintln!("   Run: marine-guardian import <observations.csv>");
        eprintln!("   to import observations first.");
        std::process::exit(1);
    }

    let conn = Connection::open(db_path).expect("Failed to open database");
    println!("✓ Database opened: {:?}", db_path);

    // Create shared state
    let state = AppState {
        db: Arc::new(Mutex::new(conn)),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/observations", get(get_observations))
        .route("/observations/:station", get(get_station_observations))
        .route("/stations", get(get_stations))
        .route("/assessment", get(get_assessment))
        .route("/alerts", get(get_alerts))
        .route("/water-quality", get(get_water_quality))
        .route("/hab", get(get_hab_risk))
        .route("/plastic", get(get_plastic))
        .route("/coral", get(get_coral))
        .route("/oil-spill", get(get_oil_spill))
        .route("/guide", get(get_guide))
        .with_state(state.clone());

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .route("/guide", get(serve_guide))
        .route("/about", get(serve_about))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web"))
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: http://localhost:3000/api/observations");
    println!("   UI:  http://localhost:3000");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
