//! Console Store CLI application
//!
//! Terminal consumer of the admin console store: sign in, browse users and
//! products page by page, and inspect the dashboard.

use std::process;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use console_store::app::{AdminStore, SessionStorage};
use console_store::cli::{
    handle_config, handle_dashboard, handle_login, handle_logout, handle_products, handle_users,
    handle_whoami, run_shell, Cli, Commands,
};
use console_store::config::AppConfig;
use console_store::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if e.is_recoverable() {
            eprintln!("The failure may be temporary; run the command again.");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let mut config = AppConfig::load(cli.global.config.clone()).await?;

    // CLI flags take precedence over file and environment
    if let Some(base_url) = &cli.global.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(session_file) = &cli.global.session_file {
        config.session.storage_path = Some(session_file.clone());
    }

    init_logging(&cli, &config);
    info!("Console Store v{} starting", env!("CARGO_PKG_VERSION"));

    if let Commands::Config(args) = cli.command {
        return handle_config(&config, args).await;
    }

    let storage: Arc<dyn SessionStorage> = Arc::new(config.session_storage()?);
    let store = AdminStore::new(config.to_store_config(), storage)?;
    store.initialize().await;

    let quiet = cli.global.quiet;
    let result = match cli.command {
        Commands::Login(args) => {
            info!("Executing login command");
            handle_login(&store, args, quiet).await
        }
        Commands::Logout => handle_logout(&store).await,
        Commands::Whoami => handle_whoami(&store).await,
        Commands::Users(args) => {
            info!("Executing users command");
            handle_users(&store, args, quiet).await
        }
        Commands::Products(args) => {
            info!("Executing products command");
            handle_products(&store, args, quiet).await
        }
        Commands::Dashboard => handle_dashboard(&store, quiet).await,
        Commands::Shell => run_shell(&store).await,
        Commands::Config(_) => Ok(()),
    };

    store.dispose().await;
    result
}

/// Initialize logging from CLI verbosity, falling back to the config file level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let level = match cli.log_level() {
        Some(level) => level.to_string().to_lowercase(),
        None => config.logging.level.clone(),
    };

    let mut filter = EnvFilter::from_default_env();
    match format!("console_store={}", level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log level '{}': {}", level, e),
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
