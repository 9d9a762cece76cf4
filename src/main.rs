use std::path::PathBuf;

use clap::Parser;
use coursehub::{db::Db, names, services::auth::PasswordScheme, utils, AppState};

/// Log filter used when `RUST_LOG` is unset. `TraceLayer` logs requests at DEBUG.
const DEFAULT_LOG_FILTER: &str = "tower_http=debug,coursehub=debug";

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// libSQL database URL. `file:` URLs open a local database.
    #[arg(long, env, default_value = names::DEFAULT_DATABASE_URL)]
    database_url: String,

    /// libSQL authentication token, only used for remote databases.
    #[arg(long, env = "DATABASE_AUTH_TOKEN", default_value = "")]
    auth_token: String,

    /// Directory holding uploaded files and the event log.
    #[arg(long, env, default_value = "data")]
    data_dir: PathBuf,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:5000")]
    address: String,

    /// How passwords are stored and compared.
    #[arg(long, env, value_enum, default_value_t = PasswordScheme::Plain)]
    password_scheme: PasswordScheme,

    /// Skip seeding demo courses and users into an empty database.
    #[arg(long)]
    no_seed: bool,

    /// Largest accepted request body, uploads included.
    #[arg(long, env, default_value_t = 50 * 1024 * 1024)]
    max_upload_bytes: usize,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    tokio::fs::create_dir_all(&args.data_dir).await?;
    if let Some(path) = args.database_url.strip_prefix("file:") {
        if let Some(parent) = std::path::Path::new(path).parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let db = Db::new(args.database_url, args.auth_token).await?;
    if !args.no_seed {
        db.seed_demo_data(&args.password_scheme).await?;
    }

    let state = AppState::new(
        db,
        &args.data_dir,
        args.password_scheme,
        args.max_upload_bytes,
    );
    let app = coursehub::router(state);

    let listener = tokio::net::TcpListener::bind(&args.address).await?;
    tracing::info!(
        "coursehub {} listening on {}",
        utils::VERSION,
        listener.local_addr()?
    );
    axum::serve(listener, app).await?;

    Ok(())
}
