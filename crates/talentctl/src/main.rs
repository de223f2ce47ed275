//! Talent Control - CLI for the talent tree progression system.
//!
//! State lives in a JSON file next to an analytics companion file;
//! every subcommand loads, mutates through the core engine, saves and
//! prints a plain-ASCII report.

mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use talent_core::analytics::{AnalyticsStore, ANALYTICS_FILE};
use talent_core::store::TalentStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "talentctl")]
#[command(about = "Talent tree progression for autonomous agents", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the talent state file (defaults to ~/.talent-tree.json)
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the state file
    Init,

    /// Show the talent tree
    Show,

    /// Choose a specialization branch
    Spec {
        /// Branch name: security, development, automation or research
        branch: String,
    },

    /// Spend a talent point
    Upgrade {
        /// Talent id, e.g. threat_scanner or "Git Master"
        talent: String,
    },

    /// Detailed progress report
    Progress,

    /// Reset all talents and refund spent points
    Reset,

    /// Manage talent presets
    Preset {
        #[command(subcommand)]
        command: PresetCommands,
    },

    /// Award XP for activity
    Award {
        #[command(subcommand)]
        command: AwardCommands,
    },

    /// Usage analytics and recommendations
    Analytics {
        /// Window for recent activity, in days
        #[arg(long, default_value_t = 7)]
        days: i64,
    },

    /// Export the build as JSON
    Export {
        /// Include usage analytics in the export
        #[arg(long)]
        analytics: bool,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Import a build from a file or share code
    Import {
        /// Path to an exported build file
        file: Option<PathBuf>,

        /// Base64 share code
        #[arg(long)]
        code: Option<String>,
    },

    /// Print a share code for the current build
    Share,
}

#[derive(Subcommand)]
enum PresetCommands {
    /// List available presets
    List,

    /// Apply a preset, replacing the current build
    Apply {
        /// Preset name, e.g. security-analyst or devops
        name: String,
    },
}

#[derive(Subcommand)]
enum AwardCommands {
    /// Award XP for a skill use
    Skill {
        /// Skill name, matched against branch keywords
        skill: String,
    },

    /// Award XP for a completed task
    Task {
        /// Complex tasks are worth double
        #[arg(long)]
        complex: bool,
    },

    /// Claim the once-per-day bonus
    Daily,

    /// Grant a named achievement
    Achievement {
        /// Achievement name
        name: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let store = match &cli.state_file {
        Some(path) => TalentStore::new(path.clone()),
        None => TalentStore::default_location(),
    };
    // Analytics sit next to the state file.
    let analytics_store = match store.path().parent() {
        Some(dir) => AnalyticsStore::new(dir.join(ANALYTICS_FILE)),
        None => AnalyticsStore::default_location(),
    };

    match cli.command {
        None | Some(Commands::Show) => commands::show(&store),
        Some(Commands::Init) => commands::init(&store),
        Some(Commands::Spec { branch }) => commands::spec(&store, &branch),
        Some(Commands::Upgrade { talent }) => commands::upgrade(&store, &talent),
        Some(Commands::Progress) => commands::progress(&store),
        Some(Commands::Reset) => commands::reset(&store),
        Some(Commands::Preset { command }) => match command {
            PresetCommands::List => commands::preset_list(),
            PresetCommands::Apply { name } => commands::preset_apply(&store, &name),
        },
        Some(Commands::Award { command }) => match command {
            AwardCommands::Skill { skill } => commands::award_skill(&store, &analytics_store, &skill),
            AwardCommands::Task { complex } => commands::award_task(&store, &analytics_store, complex),
            AwardCommands::Daily => commands::award_daily(&store),
            AwardCommands::Achievement { name } => {
                commands::award_achievement(&store, &analytics_store, &name)
            }
        },
        Some(Commands::Analytics { days }) => commands::analytics(&store, &analytics_store, days),
        Some(Commands::Export { analytics, out }) => {
            commands::export(&store, &analytics_store, analytics, out)
        }
        Some(Commands::Import { file, code }) => commands::import(&store, &analytics_store, file, code),
        Some(Commands::Share) => commands::share(&store),
    }
}
