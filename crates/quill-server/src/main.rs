//! quill-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the blog API over HTTP.
//!
//! # Token minting
//!
//! To issue a bearer token for the configured secret:
//!
//! ```
//! cargo run -p quill-server --bin server -- \
//!   --mint-token --subject u1 --email u1@example.com --display-name "User One"
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use quill_server::{
  AppState, ServerConfig,
  assets::FsAssetStore,
  auth::{Claims, HmacVerifier, mint_token},
};
use quill_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Quill blog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print a signed bearer token for the configured secret and exit.
  #[arg(long)]
  mint_token: bool,

  /// Subject id for `--mint-token`.
  #[arg(long)]
  subject: Option<String>,

  /// Email for `--mint-token`.
  #[arg(long)]
  email: Option<String>,

  /// Display name for `--mint-token`.
  #[arg(long)]
  display_name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("QUILL"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Helper mode: mint a token and exit.
  if cli.mint_token {
    let claims = Claims {
      sub:   cli.subject.context("--subject is required with --mint-token")?,
      email: cli.email.context("--email is required with --mint-token")?,
      name:  cli
        .display_name
        .context("--display-name is required with --mint-token")?,
      exp:   None,
    };
    println!("{}", mint_token(&server_cfg.token_secret, &claims));
    return Ok(());
  }

  // Expand `~` in filesystem paths.
  let store_path = expand_tilde(&server_cfg.store_path);
  let media_dir = expand_tilde(&server_cfg.media_dir);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Build application state.
  let state = AppState {
    store:    Arc::new(store),
    assets:   Arc::new(FsAssetStore::new(
      &media_dir,
      &server_cfg.public_base_url,
    )),
    verifier: Arc::new(HmacVerifier::new(&server_cfg.token_secret)),
    config:   Arc::new(server_cfg.clone()),
  };

  let app = quill_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
