//! Mentora CLI: exercise the platform API from a terminal.
//!
//! Sessions persist in a credentials file between invocations, the same way
//! the web client keeps its token pair in durable storage.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mentora::{
    ApiTransport, Gate, SessionManager,
    creds::FileStore,
    resources::{Education, Experience, Resource, ResourceClient, Skill, SkillDraft, SkillLevel},
    session::{Credentials, ProfilePatch},
};

#[derive(Parser)]
#[command(name = "mentora", version, about = "Mentora platform client")]
struct Cli {
    /// API base URL
    #[arg(long, env = "MENTORA_API_URL", default_value = "http://localhost:8000/api")]
    api_url: String,

    /// Credentials file
    #[arg(long, env = "MENTORA_CREDENTIALS", default_value = ".mentora/credentials.json")]
    credentials: PathBuf,

    /// Require admin privilege for the session
    #[arg(long)]
    admin: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the session and clear stored credentials
    Logout,
    /// Show the current principal
    Whoami,
    /// Update profile fields
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// List skills
    Skills,
    /// Add a skill
    AddSkill {
        name: String,
        #[arg(long, default_value = "beginner")]
        level: String,
    },
    /// List education entries
    Education,
    /// List experience entries
    Experience,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("mentora=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let transport = Arc::new(ApiTransport::new(&cli.api_url)?);
    let store = Arc::new(FileStore::new(&cli.credentials));
    let gate = if cli.admin { Gate::Admin } else { Gate::General };
    let session = SessionManager::new(transport.clone(), store, gate);

    match cli.command {
        Command::Login { email, password } => {
            let principal = session.login(&Credentials::new(email, password)).await?;
            println!("Logged in as {} ({})", principal.display_name(), principal.email);
        }
        Command::Logout => {
            session.initialize().await?;
            session.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => {
            session.initialize().await?;
            match session.principal().await {
                Some(principal) => {
                    println!("{} <{}>", principal.display_name(), principal.email);
                    println!("role: {:?}", principal.user_type);
                    if principal.is_admin() {
                        println!("admin access: yes");
                    }
                }
                None => println!("Not logged in"),
            }
        }
        Command::Profile {
            first_name,
            last_name,
        } => {
            require_session(&session).await?;
            let patch = ProfilePatch {
                first_name,
                last_name,
                ..Default::default()
            };
            let principal = session.update_profile(&patch).await?;
            println!("Profile updated: {}", principal.display_name());
        }
        Command::Skills => {
            require_session(&session).await?;
            let skills = ResourceClient::<Skill>::new(transport.clone());
            for skill in skills.list().await? {
                let verified = if skill.verified { " (verified)" } else { "" };
                println!("#{} {} [{:?}]{verified}", skill.id, skill.name, skill.level);
            }
        }
        Command::AddSkill { name, level } => {
            require_session(&session).await?;
            let level = parse_level(&level)?;
            let skills = ResourceClient::<Skill>::new(transport.clone());
            let created = skills.create(&SkillDraft { name, level }).await?;
            println!("Added skill #{} {}", created.id, created.name);
        }
        Command::Education => {
            require_session(&session).await?;
            let education = ResourceClient::<Education>::new(transport.clone());
            for entry in education.list().await? {
                println!(
                    "#{} {}: {} in {} ({})",
                    entry.id(),
                    entry.institution,
                    entry.degree,
                    entry.field_of_study,
                    if entry.current { "current" } else { "past" }
                );
            }
        }
        Command::Experience => {
            require_session(&session).await?;
            let experience = ResourceClient::<Experience>::new(transport.clone());
            for entry in experience.list().await? {
                println!(
                    "#{} {} at {} ({})",
                    entry.id(),
                    entry.position,
                    entry.company,
                    if entry.current { "current" } else { "past" }
                );
            }
        }
    }

    Ok(())
}

/// Resolve the stored session and fail early when there is none.
async fn require_session(session: &SessionManager) -> Result<(), Box<dyn std::error::Error>> {
    session.initialize().await?;
    let state = session.state().await;
    if state.is_resolving() {
        return Err("server unreachable, try again".into());
    }
    if !state.is_authenticated() {
        return Err("not logged in (run `mentora login`)".into());
    }
    Ok(())
}

fn parse_level(level: &str) -> Result<SkillLevel, String> {
    match level {
        "beginner" => Ok(SkillLevel::Beginner),
        "intermediate" => Ok(SkillLevel::Intermediate),
        "advanced" => Ok(SkillLevel::Advanced),
        "expert" => Ok(SkillLevel::Expert),
        other => Err(format!("unknown skill level '{other}'")),
    }
}
