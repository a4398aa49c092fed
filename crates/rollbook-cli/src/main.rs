use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use dotenvy::dotenv;
use rollbook::allocator::{SequentialIdAllocator, namespace};
use rollbook::rollbook_config::{AllocatorConfig, DirectoryConfig};
use rollbook::rollbook_core::{Credential, CredentialGenerator};
use rollbook::rollbook_models::{DirectorySnapshot, Identifier, Namespace, Role, UserForm};
use rollbook::{HttpDirectory, logging, validate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "rollbook-cli")]
#[command(about = "Rollbook CLI - Propose user IDs and passwords for new school users", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Propose the next user ID for a role within a school
    NextId {
        /// student, teacher or admin (prompted if not provided)
        #[arg(short = 'r', long)]
        role: Option<String>,

        /// School code, e.g. NPS (prompted if not provided)
        #[arg(short = 's', long)]
        school: Option<String>,

        /// Existing user IDs to allocate around
        #[arg(short = 'e', long = "existing", num_args = 1..)]
        existing: Vec<String>,

        /// Ask the user directory for the authoritative next ID
        #[arg(long, conflicts_with_all = ["existing", "prefill"])]
        remote: bool,

        /// Fetch existing IDs from the user directory and compute locally
        #[arg(long, conflicts_with = "existing")]
        prefill: bool,
    },
    /// Generate a temporary password
    Password {
        /// Password length (defaults to ROLLBOOK_PASSWORD_LENGTH or 8)
        #[arg(short = 'l', long)]
        length: Option<usize>,
    },
    /// Validate a new-user form stored as JSON
    Validate {
        /// student, teacher or admin (prompted if not provided)
        #[arg(short = 'r', long)]
        role: Option<String>,

        /// Path to the form JSON file
        #[arg(short = 'f', long)]
        file: PathBuf,
    },
    /// Propose a user ID and a temporary password together
    NewUser {
        /// student, teacher or admin (prompted if not provided)
        #[arg(short = 'r', long)]
        role: Option<String>,

        /// School code, e.g. NPS (prompted if not provided)
        #[arg(short = 's', long)]
        school: Option<String>,

        /// Ask the user directory for the authoritative next ID
        #[arg(long)]
        remote: bool,

        /// Print the proposal as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Proposal<'a> {
    user_id: String,
    password: &'a str,
    provisional: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::NextId {
            role,
            school,
            existing,
            remote,
            prefill,
        } => handle_next_id(role, school, existing, remote, prefill).await,
        Commands::Password { length } => handle_password(length),
        Commands::Validate { role, file } => handle_validate(role, file),
        Commands::NewUser {
            role,
            school,
            remote,
            json,
        } => handle_new_user(role, school, remote, json).await,
    }
}

fn prompt_role(role: Option<String>) -> Result<String> {
    if let Some(role) = role {
        return Ok(role);
    }
    let roles = ["student", "teacher", "admin"];
    let selected = Select::new()
        .with_prompt("Role")
        .items(&roles)
        .default(0)
        .interact()
        .context("Failed to read role")?;
    Ok(roles[selected].to_string())
}

fn prompt_school(school: Option<String>) -> Result<String> {
    match school {
        Some(school) => Ok(school),
        None => Input::new()
            .with_prompt("School code")
            .interact_text()
            .context("Failed to read school code"),
    }
}

fn prompt_namespace(role: Option<String>, school: Option<String>) -> Result<Namespace> {
    let role = prompt_role(role)?;
    let school = prompt_school(school)?;
    namespace(&role, &school).context("Invalid role or school code")
}

async fn propose_id(
    allocator: &SequentialIdAllocator,
    namespace: &Namespace,
    existing: Vec<String>,
    remote: bool,
    prefill: bool,
) -> Result<Identifier> {
    if remote || prefill {
        let config = DirectoryConfig::from_env();
        info!(base_url = %config.base_url, "Using user directory");
        let directory = HttpDirectory::new(&config).context("Failed to create directory client")?;

        let identifier = if remote {
            allocator.allocate_from_directory(&directory, namespace).await
        } else {
            allocator.prefill_from_directory(&directory, namespace).await
        };
        return identifier.context("Could not obtain a user ID from the directory");
    }

    let snapshot: DirectorySnapshot = existing.into_iter().collect();
    allocator
        .allocate_locally(namespace, &snapshot)
        .context("Could not allocate a user ID")
}

async fn handle_next_id(
    role: Option<String>,
    school: Option<String>,
    existing: Vec<String>,
    remote: bool,
    prefill: bool,
) -> Result<ExitCode> {
    let namespace = prompt_namespace(role, school)?;
    let allocator = SequentialIdAllocator::from_config(&AllocatorConfig::from_env());

    let identifier = propose_id(&allocator, &namespace, existing, remote, prefill).await?;
    println!("{}", identifier);
    Ok(ExitCode::SUCCESS)
}

fn credential_generator(length: Option<usize>) -> Result<CredentialGenerator> {
    let length = length.unwrap_or_else(|| AllocatorConfig::from_env().password_length);
    CredentialGenerator::new(length).context("Invalid password length")
}

fn handle_password(length: Option<usize>) -> Result<ExitCode> {
    let credential = credential_generator(length)?.generate();
    println!("{}", credential.as_str());
    Ok(ExitCode::SUCCESS)
}

fn validate_form_file(role: Role, file: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let form: UserForm = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {} as a user form", file.display()))?;
    Ok(validate(role, &form))
}

/// Process exit status for a validation result: 0 when clean, 1 otherwise.
fn validation_status(errors: &[String]) -> u8 {
    if errors.is_empty() { 0 } else { 1 }
}

fn handle_validate(role: Option<String>, file: PathBuf) -> Result<ExitCode> {
    let role: Role = prompt_role(role)?.parse().context("Invalid role")?;
    let errors = validate_form_file(role, &file)?;

    if errors.is_empty() {
        println!("✅ Form is valid");
    } else {
        println!("❌ {} problem(s) found:", errors.len());
        for error in &errors {
            println!("   - {}", error);
        }
    }
    Ok(ExitCode::from(validation_status(&errors)))
}

fn proposal_json(identifier: &Identifier, credential: &Credential) -> Result<String> {
    let proposal = Proposal {
        user_id: identifier.to_string(),
        password: credential.as_str(),
        provisional: true,
    };
    Ok(serde_json::to_string_pretty(&proposal)?)
}

async fn handle_new_user(
    role: Option<String>,
    school: Option<String>,
    remote: bool,
    json: bool,
) -> Result<ExitCode> {
    let namespace = prompt_namespace(role, school)?;
    let config = AllocatorConfig::from_env();
    let allocator = SequentialIdAllocator::from_config(&config);
    let generator = credential_generator(Some(config.password_length))?;

    let identifier = propose_id(&allocator, &namespace, Vec::new(), remote, false).await?;
    let credential = generator.generate();

    if json {
        println!("{}", proposal_json(&identifier, &credential)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("✅ Proposed new {}", namespace.role);
    println!("   User ID:  {}", identifier);
    println!("   Password: {}", credential.as_str());
    if !remote {
        println!("   (computed without the directory; confirm against the server)");
    }
    Ok(ExitCode::SUCCESS)
}
