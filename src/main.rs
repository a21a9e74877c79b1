use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use hermes::api::{self, SecurityConfig};
use hermes::config::HermesConfig;
use hermes::db;
use hermes_core::progress::ProjectMetrics;

#[derive(Parser)]
#[command(name = "hermes")]
#[command(about = "Project governance for the HERMES method")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HERMES server
    Serve {
        /// Port for HTTP API (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the governance state of a stored project
    Status {
        /// Project id
        id: Uuid,
    },
    /// Print the active tailoring catalog as JSON
    Catalog,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "hermes=debug,hermes_core=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_database(config: &HermesConfig) -> anyhow::Result<db::Database> {
    let db = match &config.database_path {
        Some(path) => db::Database::open(path.clone())?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

async fn serve(config: HermesConfig) -> anyhow::Result<()> {
    let db = open_database(&config)?;
    let catalog = config.catalog()?;
    let security = SecurityConfig::from_config(&config);
    if security.api_key.is_some() {
        tracing::info!("API key authentication enabled");
    }

    let app = api::create_router_with_security(db, catalog, security);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("HERMES server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn print_status(config: &HermesConfig, id: Uuid) -> anyhow::Result<()> {
    let db = open_database(config)?;
    let stored = db
        .get_project(id)?
        .ok_or_else(|| anyhow::anyhow!("Project not found: {id}"))?;
    let project = &stored.project;
    let metrics = ProjectMetrics::of(project);

    println!("{} ({})", project.master_data.project_name, stored.id);
    println!(
        "Approach: {}  Size: {}  Current phase: {}",
        project.master_data.approach.as_str(),
        project.master_data.project_size.as_str(),
        project.master_data.current_phase
    );
    println!(
        "Progress: {:.1}%  Budget used: {:.1}%  Risk: {}  Quality: {}%",
        metrics.total_progress,
        metrics.budget_usage * 100.0,
        metrics.risk_level.as_str(),
        metrics.quality_score
    );
    println!(
        "Phases completed: {}/{}  Milestones reached: {}/{}",
        metrics.phases_completed,
        metrics.phase_count,
        metrics.milestones_reached,
        metrics.milestone_count
    );

    for phase in &project.phases {
        let validation = project.phase_validation(phase.key.as_str())?;
        let failures = validation.failures();
        let verdict = if failures.is_empty() {
            "ready".to_string()
        } else {
            failures.join(", ")
        };
        println!("  {:<16} {:<12} {}", phase.key.as_str(), phase.status.as_str(), verdict);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = HermesConfig::load();

    match cli.command {
        Some(Commands::Serve { port }) => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await?;
        }
        Some(Commands::Status { id }) => {
            print_status(&config, id)?;
        }
        Some(Commands::Catalog) => {
            let catalog = config.catalog()?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        None => {
            serve(config).await?;
        }
    }

    Ok(())
}
