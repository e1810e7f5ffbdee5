use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use triage_ai::config::AppConfig;
use triage_ai::error::AppError;
use triage_ai::telemetry;
use triage_ai::workflows::formulary::FormularyImporter;
use triage_ai::workflows::triage::medication::{self, MedicationTables};
use triage_ai::workflows::triage::nutrition;
use triage_ai::workflows::triage::{
    triage_router, LogPublisher, MedicationTriageRequest, NutritionTriageRequest, TriageService,
    UrgencyAssessment,
};

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Clinical Triage Orchestrator",
    about = "Run the urgency triage service or score a single request from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single triage request without starting the service
    Triage {
        #[command(subcommand)]
        command: TriageCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum TriageCommand {
    /// Assess a medication triage request read from a JSON file
    Medication(MedicationArgs),
    /// Assess a nutrition triage request read from a JSON file
    Nutrition(NutritionArgs),
}

#[derive(Args, Debug)]
struct MedicationArgs {
    /// Path to a JSON file containing the triage request
    #[arg(long)]
    input: PathBuf,
    /// Optional formulary CSV export replacing the built-in tables
    #[arg(long)]
    formulary: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct NutritionArgs {
    /// Path to a JSON file containing the triage request
    #[arg(long)]
    input: PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Triage {
            command: TriageCommand::Medication(args),
        } => run_medication_assessment(args),
        Command::Triage {
            command: TriageCommand::Nutrition(args),
        } => run_nutrition_assessment(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let service = Arc::new(TriageService::new(Arc::new(LogPublisher))?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(triage_router(service))
        .layer(prometheus_layer);

    let addr = config.server.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "urgency triage service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_medication_assessment(args: MedicationArgs) -> Result<(), AppError> {
    let request: MedicationTriageRequest = read_request(&args.input)?;

    let tables = match args.formulary {
        Some(path) => FormularyImporter::from_path(path)?,
        None => MedicationTables::standard(),
    };

    let service = TriageService::with_configs(
        Arc::new(LogPublisher),
        medication::config_with_tables(tables),
        nutrition::standard_config(),
    )?;

    let assessment = service.assess_medication(request)?;
    render_assessment(&assessment)
}

fn run_nutrition_assessment(args: NutritionArgs) -> Result<(), AppError> {
    let request: NutritionTriageRequest = read_request(&args.input)?;

    let service = TriageService::new(Arc::new(LogPublisher))?;
    let assessment = service.assess_nutrition(request)?;
    render_assessment(&assessment)
}

fn read_request<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn render_assessment(assessment: &UrgencyAssessment) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(assessment)?);
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
