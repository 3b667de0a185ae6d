//! Pet Registry CLI
//!
//! Command-line access to the registry through a JSON-RPC node with an
//! unlocked account:
//! - Register, transfer and update pets
//! - Look up pets by id or owner
//! - Generate a config file

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pet_registry::chain::{Address, HttpTransport, Wallet};
use pet_registry::config::{generate_default_config, Config};
use pet_registry::projection::{project, ViewPet};
use pet_registry::registry::{
    pet_id_from_receipt, PetId, PetRegistry, PetUpdate, RegisterDraft, RegistryClient,
};
use pet_registry::session::ChainSessionProvider;

#[derive(Parser)]
#[command(name = "petreg")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Register and look up pets on the on-chain pet registry")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Registry contract address
    #[arg(long, global = true)]
    pub contract: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new pet owned by the node's first account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        breed: String,
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: String,
        #[arg(long, default_value = "")]
        image_url: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Show one pet
    Show {
        /// Pet id (42 or #42)
        id: PetId,
    },

    /// List the pets of an owner
    Mine {
        /// Owner address (default: the node's first account)
        #[arg(long)]
        owner: Option<Address>,
    },

    /// Transfer a pet to a new owner
    Transfer { id: PetId, to: Address },

    /// Update a pet's descriptive fields; omitted fields keep their value
    Update {
        id: PetId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        breed: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Total number of registered pets
    Total,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("pet_registry={0},petreg={0}", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.rpc_url {
        config.rpc.url = url.clone();
    }
    if let Some(contract) = &cli.contract {
        config.contract.address = contract.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let config = load_config(&cli)?;
    init_logging(&config);
    tracing::debug!("Pet Registry CLI v{}", env!("CARGO_PKG_VERSION"));

    let deployment = config.deployment()?;
    let transport = HttpTransport::new(config.rpc.url.clone(), config.rpc.request_timeout())
        .with_context(|| format!("creating RPC client for {}", config.rpc.url))?;
    let provider = ChainSessionProvider::new(Wallet::new(transport), deployment);

    // Reads need no account; `from` is left to the node
    let reader = RegistryClient::new(
        provider.wallet().clone(),
        provider.deployment().contract_address,
        Address::ZERO,
        provider.deployment().confirmation,
    );

    match cli.command {
        Commands::Register {
            name,
            breed,
            birth_date,
            image_url,
            description,
        } => {
            let pet = RegisterDraft {
                name,
                breed,
                birth_date,
                image_url,
                description,
            }
            .to_new_pet()?;

            let session = provider.connect().await?;
            let pending = session.registry.submit_register(&pet).await?;
            println!("Submitted {}", pending.tx());
            let receipt = pending.confirm().await?;
            let id = pet_id_from_receipt(&receipt, session.registry.contract_address())?;
            println!("Registered pet #{} in block {}", id, block_label(receipt.block()));
        }

        Commands::Show { id } => {
            let pet = project(&reader.get_pet(id).await?);
            print_pets(cli.format, std::slice::from_ref(&pet))?;
        }

        Commands::Mine { owner } => {
            let owner = match owner {
                Some(owner) => owner,
                None => provider.connect().await?.account,
            };
            let ids = reader.get_owner_pets(&owner).await?;
            let mut pets = Vec::with_capacity(ids.len());
            for id in ids {
                pets.push(project(&reader.get_pet(id).await?));
            }
            if pets.is_empty() && cli.format == OutputFormat::Table {
                println!("No pets registered to {}", owner);
            } else {
                print_pets(cli.format, &pets)?;
            }
        }

        Commands::Transfer { id, to } => {
            let session = provider.connect().await?;
            let pending = session.registry.submit_transfer(id, &to).await?;
            println!("Submitted {}", pending.tx());
            let receipt = pending.confirm().await?;
            println!(
                "Pet #{} transferred to {} in block {}",
                id,
                to,
                block_label(receipt.block())
            );
        }

        Commands::Update {
            id,
            name,
            breed,
            image_url,
            description,
        } => {
            let session = provider.connect().await?;
            let current = session.registry.get_pet(id).await?;
            let mut update = PetUpdate::from(&current);
            if let Some(name) = name {
                update.name = name;
            }
            if let Some(breed) = breed {
                update.breed = breed;
            }
            if let Some(image_url) = image_url {
                update.image_url = image_url;
            }
            if let Some(description) = description {
                update.description = description;
            }

            let pending = session.registry.submit_update(id, &update).await?;
            println!("Submitted {}", pending.tx());
            let receipt = pending.confirm().await?;
            println!("Pet #{} updated in block {}", id, block_label(receipt.block()));
        }

        Commands::Total => {
            let total = reader.get_total_pets().await?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::json!({ "total": total })),
                OutputFormat::Table => println!("{} pets registered", total),
            }
        }

        // Written out before any config was loaded
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn block_label(block: Option<u64>) -> String {
    block.map_or_else(|| "(pending)".to_string(), |b| b.to_string())
}

fn print_pets(format: OutputFormat, pets: &[ViewPet]) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(pets)?),
        OutputFormat::Table => {
            println!(
                "{:<6} {:<16} {:<18} {:<18} {:<14} {}",
                "ID", "Name", "Breed", "Born", "Owner", "Active"
            );
            println!("{}", "-".repeat(80));
            for pet in pets {
                println!(
                    "{:<6} {:<16} {:<18} {:<18} {:<14} {}",
                    format!("#{}", pet.id),
                    pet.name,
                    pet.breed,
                    pet.birth_date.display(),
                    pet.owner_short,
                    if pet.is_active { "yes" } else { "no" }
                );
                if let Some(description) = &pet.description {
                    println!("       {}", description);
                }
            }
        }
    }
    Ok(())
}
