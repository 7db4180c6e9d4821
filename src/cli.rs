use bagakit_skill_maker::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bagakit-skill-maker",
    version,
    about = "Scaffold and validate Bagakit skill bundles"
)]
pub struct Cli {
    /// Log debug events to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new skill bundle skeleton
    Init {
        /// Skill name; normalized to lowercase-kebab-case
        #[arg(long)]
        name: String,

        /// Parent directory for the new skill
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Also create agents/openai.yaml
        #[arg(long)]
        with_agents: bool,
    },

    /// Validate a skill bundle directory
    Validate {
        /// Path to the skill directory
        #[arg(required_unless_present = "skill_dir")]
        path: Option<PathBuf>,

        /// Path to the skill directory (alternative to the positional argument)
        #[arg(long, conflicts_with = "path")]
        skill_dir: Option<PathBuf>,

        /// Output format
        #[arg(long, short, default_value = "text", value_enum)]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List all built-in rules with descriptions
    ListRules,

    /// Show full explanation for a rule
    Explain {
        /// Rule ID (e.g., "payload/duplicate-include")
        rule_id: String,
    },
}
