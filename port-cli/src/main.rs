use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use log::debug;

use port_client::{ClientConfig, SearchRequest};
use port_core::provider::Provider;
use port_core::resource::{Resource, ResourceId, ResourceKind};
use port_provider::PortProvider;

#[derive(Parser)]
#[command(name = "port")]
#[command(about = "Manage software catalog blueprints, entities and scorecards", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Base URL of the catalog API
    #[arg(long, global = true, env = "PORT_BASE_URL", default_value = ClientConfig::DEFAULT_BASE_URL)]
    base_url: String,

    /// Client ID used to obtain an access token
    #[arg(long, global = true, env = "PORT_CLIENT_ID")]
    client_id: Option<String>,

    /// Client secret used to obtain an access token
    #[arg(long, global = true, env = "PORT_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "PORT_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current state of a resource
    Get {
        /// Resource kind (blueprint, entity or scorecard)
        kind: ResourceKind,
        /// Blueprint the resource belongs to, or the blueprint itself
        blueprint: String,
        /// Resource identifier; not used for blueprints
        identifier: Option<String>,
    },
    /// Create or update the resources listed in a JSON file
    Apply {
        /// Path to a JSON array of resources tagged with their `kind`
        file: PathBuf,
    },
    /// Delete a resource
    Delete {
        /// Resource kind (blueprint, entity or scorecard)
        kind: ResourceKind,
        /// Blueprint the resource belongs to, or the blueprint itself
        blueprint: String,
        /// Resource identifier; not used for blueprints
        identifier: Option<String>,
    },
    /// Search entities with a query read from a JSON file
    Search {
        /// Path to the search query
        file: PathBuf,

        /// Only return these entity fields (repeatable)
        #[arg(long)]
        include: Vec<String>,

        /// Omit these entity fields (repeatable)
        #[arg(long)]
        exclude: Vec<String>,

        /// Attach related entity titles to relations
        #[arg(long)]
        attach_title_to_relation: bool,

        /// Return calculated properties as well
        #[arg(long)]
        include_calculated_properties: bool,
    },
    /// List the resource types this tool manages
    Types,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Get {
            kind,
            blueprint,
            identifier,
        } => match resource_id(kind, blueprint, identifier) {
            Ok(id) => run_get(&cli.connection, id).await,
            Err(e) => Err(e),
        },
        Commands::Apply { file } => run_apply(&cli.connection, &file).await,
        Commands::Delete {
            kind,
            blueprint,
            identifier,
        } => match resource_id(kind, blueprint, identifier) {
            Ok(id) => run_delete(&cli.connection, id).await,
            Err(e) => Err(e),
        },
        Commands::Search {
            file,
            include,
            exclude,
            attach_title_to_relation,
            include_calculated_properties,
        } => {
            let options = SearchOptions {
                include,
                exclude,
                attach_title_to_relation,
                include_calculated_properties,
            };
            run_search(&cli.connection, &file, options).await
        }
        Commands::Types => run_types(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

// =============================================================================
// Commands
// =============================================================================

async fn run_get(connection: &ConnectionArgs, id: ResourceId) -> Result<(), String> {
    let provider = get_provider(connection).await?;
    let state = provider.read(&id).await.map_err(|e| e.to_string())?;

    match state.resource {
        Some(resource) => print_json(&resource),
        None => Err(format!("{} not found", id)),
    }
}

async fn run_apply(connection: &ConnectionArgs, file: &PathBuf) -> Result<(), String> {
    let content = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
    let resources = parse_resources(&content)?;

    if resources.is_empty() {
        println!("{}", "No resources to apply.".green());
        return Ok(());
    }

    let provider = get_provider(connection).await?;

    eprintln!("{}", "Applying changes...".cyan().bold());

    let mut applied = Vec::new();
    let mut failure_count = 0;

    for resource in &resources {
        let id = resource.id();
        let current = match provider.read(&id).await {
            Ok(state) => state,
            Err(e) => {
                eprintln!("  {} read {} - {}", "✗".red(), id, e);
                failure_count += 1;
                continue;
            }
        };

        let (action, result) = if current.exists() {
            ("update", provider.update(&id, &current, resource).await)
        } else {
            ("create", provider.create(resource).await)
        };

        match result {
            Ok(state) => {
                eprintln!("  {} {} {}", "✓".green(), action, id);
                applied.extend(state.resource);
            }
            Err(e) => {
                eprintln!("  {} {} {} - {}", "✗".red(), action, id, e);
                failure_count += 1;
            }
        }
    }

    print_json(&applied)?;

    if failure_count == 0 {
        eprintln!(
            "{}",
            format!("Apply complete! {} resources applied.", applied.len())
                .green()
                .bold()
        );
        Ok(())
    } else {
        Err(format!(
            "Apply failed. {} succeeded, {} failed.",
            applied.len(),
            failure_count
        ))
    }
}

async fn run_delete(connection: &ConnectionArgs, id: ResourceId) -> Result<(), String> {
    let provider = get_provider(connection).await?;
    provider.delete(&id).await.map_err(|e| e.to_string())?;
    println!("{} Deleted {}", "✓".green(), id);
    Ok(())
}

struct SearchOptions {
    include: Vec<String>,
    exclude: Vec<String>,
    attach_title_to_relation: bool,
    include_calculated_properties: bool,
}

async fn run_search(
    connection: &ConnectionArgs,
    file: &PathBuf,
    options: SearchOptions,
) -> Result<(), String> {
    let content = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
    let request = build_search_request(&content, options)?;

    let provider = connect(connection).await?;
    let result = provider.search(request).await.map_err(|e| e.to_string())?;
    print_json(&result)
}

fn run_types() -> Result<(), String> {
    for resource_type in port_provider::resources::resource_types() {
        println!(
            "{:<16} {:<10} {}",
            resource_type.name().bold(),
            resource_type.kind(),
            resource_type.description()
        );
    }
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn client_config(connection: &ConnectionArgs) -> Result<ClientConfig, String> {
    let client_id = connection
        .client_id
        .clone()
        .ok_or("Missing client ID: pass --client-id or set PORT_CLIENT_ID")?;
    let client_secret = connection
        .client_secret
        .clone()
        .ok_or("Missing client secret: pass --client-secret or set PORT_CLIENT_SECRET")?;

    Ok(ClientConfig::new(client_id, client_secret)
        .with_base_url(connection.base_url.clone())
        .with_timeout(Duration::from_secs(connection.timeout_secs)))
}

async fn connect(connection: &ConnectionArgs) -> Result<PortProvider, String> {
    let config = client_config(connection)?;
    debug!("Connecting to {}", config.base_url);
    PortProvider::connect(&config).await.map_err(|e| e.to_string())
}

async fn get_provider(connection: &ConnectionArgs) -> Result<Box<dyn Provider>, String> {
    Ok(Box::new(connect(connection).await?))
}

fn resource_id(
    kind: ResourceKind,
    blueprint: String,
    identifier: Option<String>,
) -> Result<ResourceId, String> {
    match (kind, identifier) {
        (ResourceKind::Blueprint, None) => Ok(ResourceId::blueprint(blueprint)),
        (ResourceKind::Blueprint, Some(_)) => {
            Err("A blueprint is addressed by its identifier alone".to_string())
        }
        (kind, Some(identifier)) => Ok(ResourceId::new(kind, blueprint, identifier)),
        (kind, None) => Err(format!("Missing identifier for {}", kind)),
    }
}

fn parse_resources(content: &str) -> Result<Vec<Resource>, String> {
    serde_json::from_str(content).map_err(|e| format!("Invalid resource file: {}", e))
}

fn build_search_request(content: &str, options: SearchOptions) -> Result<SearchRequest, String> {
    let query = serde_json::from_str(content).map_err(|e| format!("Invalid query file: {}", e))?;

    Ok(SearchRequest {
        include: options.include,
        exclude: options.exclude,
        attach_title_to_relation: options.attach_title_to_relation.then_some(true),
        exclude_calculated_properties: options.include_calculated_properties.then_some(false),
        ..SearchRequest::new(query)
    })
}

fn print_json(value: &impl serde::Serialize) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}
