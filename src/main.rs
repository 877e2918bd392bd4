use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use semaphoreui_provider::api::SemaphoreClient;
use semaphoreui_provider::config::Config;
use semaphoreui_provider::resource::{
    get_schemas, ExtractValueKind, IntegrationKind, IntegrationMatcherKind, LookupQuery, Resource,
    ResourceKind, ResourceType, ALL_RESOURCE_TYPES,
};
use semaphoreui_provider::ProviderError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Manage SemaphoreUI integrations, matchers and extract values declaratively
#[derive(Parser, Debug)]
#[command(name = "semaphoreui-provider", version, about, long_about = None)]
struct Args {
    /// API base URL, e.g. https://semaphore.example.com/api
    #[arg(long, global = true)]
    url: Option<String>,

    /// API token
    #[arg(long, global = true)]
    api_token: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true)]
    tls_skip_verify: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an object from a plan document and print its state
    Create {
        resource_type: ResourceType,
        /// Plan document (YAML or JSON, `-` for stdin)
        plan: PathBuf,
    },
    /// Refresh a state document from the server
    Read {
        resource_type: ResourceType,
        state: PathBuf,
    },
    /// Apply a plan to the object tracked by a prior state
    Update {
        resource_type: ResourceType,
        prior: PathBuf,
        plan: PathBuf,
    },
    /// Remove the object tracked by a state document
    Delete {
        resource_type: ResourceType,
        state: PathBuf,
    },
    /// Adopt an existing object, e.g. `project/42/integration/7/matcher/3`
    Import {
        resource_type: ResourceType,
        id: String,
    },
    /// Look an object up by ID (or name, for integrations)
    Lookup {
        resource_type: ResourceType,
        query: PathBuf,
    },
    /// Print the schema of one or all resource types
    Schema { resource_type: Option<ResourceType> },
    /// List resource type names
    Types,
    /// Store connection settings in the config file
    Configure {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        api_token: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// One lifecycle call with its decoded input documents
enum Lifecycle {
    Create { plan: Value },
    Read { state: Value },
    Update { prior: Value, plan: Value },
    Delete { state: Value },
    Import { id: String },
    Lookup { query: Value },
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = match (EnvFilter::try_from_default_env().ok(), level.to_tracing_level()) {
        (Some(filter), _) => filter,
        (None, Some(level)) => EnvFilter::default().add_directive(LevelFilter::from_level(level).into()),
        (None, None) => return Ok(None),
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("semaphoreui-provider started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = Config::config_dir() {
        return config_dir.join("provider.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".semaphoreui-provider").join("provider.log");
    }
    PathBuf::from("semaphoreui-provider.log")
}

/// Read a YAML or JSON document from a file, or stdin for `-`
fn read_document(path: &Path) -> Result<Value> {
    let content = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?
    };

    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run<K: ResourceKind>(
    client: &SemaphoreClient,
    call: Lifecycle,
) -> Result<Option<Value>, ProviderError> {
    let resource = Resource::<K>::new(client);

    let model = match call {
        Lifecycle::Create { plan } => resource.create(&Resource::<K>::decode(plan)?).await?,
        Lifecycle::Read { state } => resource.read(&Resource::<K>::decode(state)?).await?,
        Lifecycle::Update { prior, plan } => {
            let prior = Resource::<K>::decode(prior)?;
            let plan = Resource::<K>::decode(plan)?;
            resource.update(&prior, &plan).await?
        }
        Lifecycle::Delete { state } => {
            resource.delete(&Resource::<K>::decode(state)?).await?;
            return Ok(None);
        }
        Lifecycle::Import { id } => resource.import(&id).await?,
        Lifecycle::Lookup { query } => {
            let query: LookupQuery<K::Scope> = serde_json::from_value(query)
                .map_err(|e| ProviderError::InvalidConfiguration(e.to_string()))?;
            resource.lookup(&query).await?
        }
    };

    Ok(Some(serde_json::to_value(model)?))
}

async fn dispatch(
    client: &SemaphoreClient,
    resource_type: ResourceType,
    call: Lifecycle,
) -> Result<Option<Value>, ProviderError> {
    match resource_type {
        ResourceType::Integration => run::<IntegrationKind>(client, call).await,
        ResourceType::IntegrationMatcher => run::<IntegrationMatcherKind>(client, call).await,
        ResourceType::IntegrationExtractValue => run::<ExtractValueKind>(client, call).await,
    }
}

fn build_client(args: &Args) -> Result<SemaphoreClient> {
    let mut config = Config::load().with_env();
    if let Some(url) = &args.url {
        config.url = Some(url.clone());
    }
    if let Some(token) = &args.api_token {
        config.api_token = Some(token.clone());
    }
    if args.tls_skip_verify {
        config.tls_skip_verify = Some(true);
    }

    let url = config.effective_url();
    tracing::info!("Using SemaphoreUI API at {}", url);
    if config.api_token.is_none() {
        tracing::warn!("No API token configured, requests are sent unauthenticated");
    }

    SemaphoreClient::new(
        &url,
        config.api_token.as_deref(),
        config.effective_tls_skip_verify(),
    )
    .context("Failed to create SemaphoreUI client")
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let (resource_type, call) = match &args.command {
        Command::Types => {
            for t in ALL_RESOURCE_TYPES {
                println!("{}\t{}", t.type_name(), t.short_name());
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::Schema { resource_type } => {
            let value = match resource_type {
                Some(t) => serde_json::to_value(t.schema())?,
                None => serde_json::to_value(get_schemas())?,
            };
            print_json(&value)?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Configure { url, api_token } => {
            let mut config = Config::load();
            if let Some(url) = url {
                config.url = Some(url.clone());
            }
            if let Some(token) = api_token {
                config.api_token = Some(token.clone());
            }
            config.save()?;
            eprintln!("Saved configuration to {:?}", Config::config_dir().unwrap_or_default());
            return Ok(ExitCode::SUCCESS);
        }
        Command::Create { resource_type, plan } => (
            *resource_type,
            Lifecycle::Create {
                plan: read_document(plan)?,
            },
        ),
        Command::Read {
            resource_type,
            state,
        } => (
            *resource_type,
            Lifecycle::Read {
                state: read_document(state)?,
            },
        ),
        Command::Update {
            resource_type,
            prior,
            plan,
        } => (
            *resource_type,
            Lifecycle::Update {
                prior: read_document(prior)?,
                plan: read_document(plan)?,
            },
        ),
        Command::Delete {
            resource_type,
            state,
        } => (
            *resource_type,
            Lifecycle::Delete {
                state: read_document(state)?,
            },
        ),
        Command::Import { resource_type, id } => {
            (*resource_type, Lifecycle::Import { id: id.clone() })
        }
        Command::Lookup {
            resource_type,
            query,
        } => (
            *resource_type,
            Lifecycle::Lookup {
                query: read_document(query)?,
            },
        ),
    };

    let client = build_client(&args)?;

    match dispatch(&client, resource_type, call).await {
        Ok(Some(state)) => {
            print_json(&state)?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            tracing::error!("{} failed: {}", resource_type, err);
            let diagnostic = err.diagnostic(resource_type.display_name());
            eprintln!("Error: {}", diagnostic.summary);
            eprintln!("{}", diagnostic.detail);
            if let Some(hint) = diagnostic.hint {
                eprintln!("\nHint: {}", hint);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
