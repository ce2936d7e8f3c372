use std::process::ExitCode;

use clap::{Parser, Subcommand};

use simple_acl::cli::{run_check, run_full_name};
use simple_acl::{create_app, AclConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "lightweight role/owner access checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a permission set against a user record (exit 0 = allow, 2 = deny)
    Check {
        /// User record as JSON, e.g. '{"id": 5, "role": "editor"}'
        #[arg(long, default_value = "{}")]
        user: String,
        /// Permission set as JSON, e.g. '["admin", "editor"]' or '{"owner": 5}'
        #[arg(long)]
        perms: String,
    },
    /// Print the display name of a user record
    FullName {
        #[arg(long)]
        user: String,
    },
    /// Run the demo server on APP_PORT
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    load_env();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { user, perms } => {
            let outcome = run_check(&user, &perms)?;
            println!("{}", outcome.message);
            Ok(ExitCode::from(outcome.exit_code()))
        }
        Commands::FullName { user } => {
            println!("{}", run_full_name(&user)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Serve => {
            serve().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = AclConfig::from_env()?;
    tracing::info!(realm = %config.realm, mode = ?config.mode, "access control configured");

    let app = create_app(config);

    let port = std::env::var("APP_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8000);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(crate_env);
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr);

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
