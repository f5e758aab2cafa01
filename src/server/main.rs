//! HTTP API for boundary lookups and survey coverage.
//!
//! Loads the boundary index once at startup; survey tables are fetched on
//! demand and cached until refreshed.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use batas::cache::{MemoryCache, SourceCache};
use batas::config::{BoundaryConfig, Config};
use batas::coverage::{analyze, CoverageReport, SurveyFetcher, SurveySource, SurveyTable};
use batas::extract;
use batas::models::{GeoPoint, Tier};
use batas::pip::{BoundaryIndex, PipService, Resolution};

#[derive(Parser, Debug)]
#[command(name = "batas-server")]
#[command(about = "Boundary lookup and coverage analysis server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Directory holding the default boundary files (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Survey CSV URL or path (overrides config)
    #[arg(long)]
    survey: Option<String>,

    /// Survey name column (overrides config)
    #[arg(long)]
    survey_column: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Application state shared across handlers
struct AppState {
    pip: PipService,
    survey: Option<SurveySource>,
    fetcher: SurveyFetcher,
    survey_cache: MemoryCache<SurveySource, Arc<SurveyTable>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = &args.data_dir {
        config.boundaries = BoundaryConfig::in_dir(dir);
    }
    if let Some(survey) = args.survey {
        config.survey.source = Some(survey);
    }
    if args.survey_column.is_some() {
        config.survey.column = args.survey_column;
    }
    let listen = args.listen.unwrap_or(config.server.listen);

    info!("Batas Server");

    let index = BoundaryIndex::load(&config.boundaries.sources());
    if index.is_empty() {
        warn!("No boundaries loaded; every lookup will come back empty");
    }

    let survey = config.survey.source.as_deref().map(SurveySource::from);
    match &survey {
        Some(source) => info!("Survey source: {}", source),
        None => warn!("No survey source configured; coverage is unavailable"),
    }

    let state = Arc::new(AppState {
        pip: PipService::new(Arc::new(index)),
        survey,
        fetcher: SurveyFetcher::new(config.survey.column)
            .context("Failed to create HTTP client")?,
        survey_cache: MemoryCache::new(),
    });

    let app = router(state);

    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/locate", get(locate_handler))
        .route("/v1/coverage", get(coverage_handler))
        .route("/v1/coverage/refresh", post(refresh_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let index = state.pip.index();
    let count = |tier| index.boundaries_for(tier).len();
    let complete = Tier::all().iter().all(|tier| index.has_tier(*tier));

    Json(HealthResponse {
        status: if complete { "ok" } else { "degraded" },
        sls: count(Tier::Sls),
        lingkungan: count(Tier::Lingkungan),
        kelurahan: count(Tier::Kelurahan),
        survey_configured: state.survey.is_some(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    sls: usize,
    lingkungan: usize,
    kelurahan: usize,
    survey_configured: bool,
}

/// Resolve a map link or explicit coordinate in every tier
async fn locate_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocateParams>,
) -> Result<Json<LocateResponse>, (StatusCode, String)> {
    let point = match (params.lat, params.lon, params.url.as_deref()) {
        (Some(lat), Some(lon), _) => GeoPoint::new(lat, lon),
        (_, _, Some(url)) => extract(url).ok_or_else(|| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "could not extract coordinates".to_string(),
            )
        })?,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "expected either url or lat and lon".to_string(),
            ))
        }
    };

    let tiers = state.pip.lookup(&point);

    Ok(Json(LocateResponse {
        lat: point.lat,
        lon: point.lon,
        tiers,
    }))
}

/// Coverage of one tier against the current survey table
async fn coverage_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CoverageParams>,
) -> Result<Json<CoverageReport>, (StatusCode, String)> {
    let source = state.survey.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "no survey source configured".to_string(),
        )
    })?;

    let table = state
        .fetcher
        .fetch_cached(source, &state.survey_cache)
        .await
        .map_err(|e| {
            tracing::error!("Survey load failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("survey data unavailable: {}", e),
            )
        })?;

    let tier = params.tier.unwrap_or(Tier::Sls);
    Ok(Json(analyze(state.pip.index(), tier, &table)))
}

/// Drop the cached survey so the next coverage request refetches it
async fn refresh_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.survey_cache.clear();
    info!("Survey cache cleared");
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
struct LocateParams {
    /// Map link containing @lat,lon or q=lat,lon
    url: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Deserialize)]
struct CoverageParams {
    tier: Option<Tier>,
}

#[derive(Serialize)]
struct LocateResponse {
    lat: f64,
    lon: f64,
    tiers: Resolution,
}
