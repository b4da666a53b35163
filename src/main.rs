use rolereg::config::{self, StoreConfig, DEFAULT_HOST, DEFAULT_PORT};
use rolereg::models::{AppState, RegistrationRequest, Role};
use rolereg::routes::build_router;
use rolereg::services::RegistrationService;
use rolereg::store::{ContentStore, GitHubContentStore, MemoryContentStore};

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn build_service(env_file: Option<&str>, memory: bool) -> RegistrationService {
    config::load_env_file(env_file);
    let config = StoreConfig::from_env();

    let store: Arc<dyn ContentStore> = if memory {
        tracing::warn!("Using the in-memory store; registrations are lost on exit");
        Arc::new(MemoryContentStore::new())
    } else {
        if let Err(e) = config.validate() {
            eprintln!("{}: {}", yansi::Paint::new("Invalid configuration").red(), e);
            process::exit(1);
        }
        match GitHubContentStore::new(&config) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(%e, "Failed to build the GitHub client");
                eprintln!("{}: {}", yansi::Paint::new("Failed to build the GitHub client").red(), e);
                process::exit(1);
            }
        }
    };

    tracing::info!(
        repository = %config.store_repository,
        base_path = %config.base_path,
        memory,
        "Record store configured"
    );
    RegistrationService::new(store, &config)
}

async fn start_server(state: AppState, host: &str, port: u16) {
    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::red("Invalid host/port format"), e);
            process::exit(1);
        }
    };
    let app = build_router(state);
    tracing::info!(%addr, "Starting registration server");
    println!(
        "{} {}",
        yansi::Paint::new("Registration endpoint listening on").green(),
        yansi::Paint::new(format!("http://{}/api/register/<role>", addr)).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", yansi::Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new("Please stop any process using this port, or start the server with a different --port value.").yellow()
            );
            process::exit(1);
        }
    }
}

#[derive(Parser)]
#[command(
    name = "rolereg",
    author,
    version,
    about = "Role-scoped user registration backed by a GitHub repository",
    long_about = r#"rolereg stores user accounts as one JSON file per role inside a GitHub repository.

Configuration comes from the environment (or a .env file):
  GITHUB_TOKEN        token with contents read/write access
  GITHUB_REPO         repository as owner/repo
  GITHUB_API_URL      API base URL (default https://api.github.com)
  STORE_BASE_PATH     directory holding the role files (default database/user)
  STORE_TIMEOUT_SECS  request timeout for the GitHub API (default 30)
  BCRYPT_COST         bcrypt cost factor (default 10)

Examples:
  1) Run the server:
      rolereg serve --host 0.0.0.0 --port 8080
  2) Register from the terminal:
      rolereg register owner alice 's3cret'
"#,
    after_help = "Use `rolereg <subcommand> --help` to get subcommand specific options."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
        /// Keep records in memory instead of GitHub (for local testing)
        #[arg(long, default_value_t = false)]
        memory: bool,
    },
    /// Validate configuration and probe the repository
    #[command(
        about = "Validate configuration and ensure the repository is reachable.",
        long_about = "Check that GITHUB_TOKEN and GITHUB_REPO are set, then read the owner record set to confirm the token can reach the repository."
    )]
    CheckConfig {
        #[arg(long)]
        env_file: Option<String>,
    },
    /// Register a user directly, without the HTTP server
    #[command(
        about = "Register a user",
        long_about = "Run the same registration the HTTP endpoint performs: validate, read the role file, reject duplicates, hash and append, write back."
    )]
    Register {
        role: String,
        username: String,
        password: String,
        #[arg(long)]
        env_file: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    let command = cli.command.unwrap_or(Commands::Serve {
        host: DEFAULT_HOST.to_string(),
        port: DEFAULT_PORT,
        env_file: None,
        memory: false,
    });

    match command {
        Commands::Serve {
            host,
            port,
            env_file,
            memory,
        } => {
            let state = AppState::new(build_service(env_file.as_deref(), memory));
            start_server(state, &host, port).await;
        }
        Commands::CheckConfig { env_file } => {
            let service = build_service(env_file.as_deref(), false);
            match service.read_record_set(Role::Owner).await {
                Ok((set, token)) => {
                    let state = if token.is_some() { "exists" } else { "not created yet" };
                    println!(
                        "{} ({} {}, {} records)",
                        yansi::Paint::new("Configuration looks valid").green(),
                        service.store_path(Role::Owner),
                        state,
                        set.len()
                    );
                }
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::new("Configuration appears invalid").red(), e);
                    process::exit(1);
                }
            }
        }
        Commands::Register {
            role,
            username,
            password,
            env_file,
        } => {
            let service = build_service(env_file.as_deref(), false);
            let request = match RegistrationRequest::validate(Some(&role), Some(&username), Some(&password)) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::new("Invalid request").red(), e);
                    process::exit(2);
                }
            };
            match service.register(request).await {
                Ok(record) => {
                    println!(
                        "{} '{}' {} {}",
                        yansi::Paint::new("User").green(),
                        record.username,
                        yansi::Paint::new("registered for").green(),
                        role
                    );
                }
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::new("Registration failed").red(), e);
                    process::exit(1);
                }
            }
        }
    }
}
