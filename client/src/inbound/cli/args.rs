//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};

/// `career-sync` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "career-sync",
    about = "Sign in to the career guidance backend and inspect synchronised data",
    version
)]
pub struct Cli {
    /// Action to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported actions.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Sign in and store the session identity.
    Login {
        /// Account email.
        #[arg(long, value_name = "email")]
        email: String,
        /// Account password.
        #[arg(long, value_name = "password", env = "CAREER_SYNC_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and store the session identity.
    Signup {
        /// Display name.
        #[arg(long, value_name = "name")]
        name: String,
        /// Account email.
        #[arg(long, value_name = "email")]
        email: String,
        /// Account password.
        #[arg(long, value_name = "password", env = "CAREER_SYNC_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session identity.
    Logout,
    /// Fetch one entity for the signed-in user.
    Fetch {
        /// Entity to fetch.
        #[arg(value_enum)]
        entity: EntityKind,
    },
    /// Fetch the detail view of one catalogue skill.
    Skill {
        /// Catalogue skill id.
        #[arg(value_name = "id")]
        id: String,
    },
}

/// Entities reachable through `fetch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityKind {
    /// User profile.
    Profile,
    /// Onboarding answers.
    Onboarding,
    /// Listed skills.
    Skills,
    /// Portfolio projects.
    Projects,
    /// Career history roles.
    Roles,
    /// Career goals.
    Goals,
    /// Platform-wide trending skills.
    Trending,
}
