use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Generate missing audio for phrasebook sections.
    Generate(GenerateArgs),
    /// Show audio status for every section without generating anything.
    Check,
    /// Synthesize a single text to an audio file.
    Say(SayArgs),
}

#[derive(Clone, Debug, Args)]
pub struct GenerateArgs {
    /// Sections to generate (defaults to every section with missing audio).
    #[arg(value_name = "SECTION", conflicts_with = "all")]
    pub sections: Vec<String>,

    /// Generate every configured section.
    #[arg(long)]
    pub all: bool,

    /// Regenerate audio that already exists.
    #[arg(long)]
    pub force: bool,

    /// Only report status, same as `canto check`.
    #[arg(long)]
    pub check: bool,

    /// Do not ask for confirmation before generating missing sections.
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Clone, Debug, Args)]
pub struct SayArgs {
    /// Text to speak.
    pub text: String,

    /// Output file.
    #[arg(short, long, default_value = "test.mp3")]
    pub output: String,
}
