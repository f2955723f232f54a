use crate::api::client::Provider;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for vibe-preview.
#[derive(Parser, Debug, PartialEq, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for vibe-preview.
#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum Commands {
    /// Bundle a project into a single script plus stylesheet.
    Bundle {
        /// Project directory.
        dir: PathBuf,

        /// Write bundle.js and bundle.css here instead of printing the code.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Render the sandboxed preview page for a project.
    Preview {
        /// Project directory.
        dir: PathBuf,

        /// Output HTML file.
        #[arg(short, long, default_value = "preview.html")]
        out: PathBuf,

        /// Keep running and re-render whenever the project changes.
        #[arg(short, long)]
        watch: bool,

        /// Polling interval for --watch, in milliseconds.
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },

    /// Split a saved model reply into files.
    Parse {
        /// File containing the model reply.
        response: PathBuf,

        /// Path that receives text before the first file marker.
        #[arg(long, default_value = "/src/App.tsx")]
        default_path: String,

        /// Import the parsed files into this project directory.
        #[arg(long)]
        write: Option<PathBuf>,
    },

    /// Line diff of two files.
    Diff {
        old: PathBuf,
        new: PathBuf,

        /// Use a minimal edit script instead of index-aligned lines.
        #[arg(long)]
        minimal: bool,
    },

    /// Print the project's file tree.
    Tree {
        /// Project directory.
        dir: PathBuf,
    },

    /// Generate code from a prompt.
    Generate {
        /// Project directory.
        dir: PathBuf,

        /// Prompt for the AI.
        #[arg(short, long)]
        prompt: Option<String>,

        /// Extra constraint for the generated code (repeatable).
        #[arg(short, long = "constraint")]
        constraints: Vec<String>,

        /// Overwrite project files instead of writing to the output directory.
        #[arg(short, long)]
        auto: bool,
    },

    /// Ask the AI to fix a preview error.
    Fix {
        /// Project directory.
        dir: PathBuf,

        /// Error message to fix.
        #[arg(short, long, conflicts_with = "error_report")]
        error: Option<String>,

        /// JSON preview-error message as posted by the preview frame.
        #[arg(long)]
        error_report: Option<String>,

        /// File that receives a single-file answer.
        #[arg(short, long, default_value = "/src/App.tsx")]
        file: String,

        /// Overwrite project files instead of writing to the output directory.
        #[arg(short, long)]
        auto: bool,
    },

    /// One chat turn about the project.
    Chat {
        /// Project directory.
        dir: PathBuf,

        /// Message to send.
        #[arg(short, long, required_unless_present = "reset")]
        message: Option<String>,

        /// Include this project file as code context.
        #[arg(short, long)]
        file: Option<String>,

        /// Forget the saved conversation before sending.
        #[arg(long)]
        reset: bool,
    },

    /// Export the project as a zip with a git skeleton.
    Export {
        /// Project directory.
        dir: PathBuf,

        /// Repository name (defaults to the directory name).
        #[arg(short, long)]
        name: Option<String>,

        /// Output zip file (defaults to <name>.zip).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Manage configuration options.
    Config {
        /// Set the log level (debug, info, warn, error, off).
        #[arg(long)]
        set_log_level: Option<String>,

        /// Set the output directory.
        #[arg(long)]
        set_output_directory: Option<String>,

        /// Set the maximum number of retries for API calls.
        #[arg(long)]
        set_retries: Option<u32>,
    },

    /// Manage model configuration options.
    ModelConfig {
        /// Set the provider.
        #[arg(long, value_enum)]
        set_provider: Option<Provider>,

        /// Set the API key.
        #[arg(long)]
        set_api_key: Option<String>,

        /// Set the model name (empty string resets to the provider default).
        #[arg(long)]
        set_model: Option<String>,

        /// Set extra instructions appended to every system prompt.
        #[arg(long)]
        set_system_prompt: Option<String>,

        /// Set the temperature for the AI.
        #[arg(long)]
        set_temperature: Option<f32>,

        /// Set the maximum tokens per reply.
        #[arg(long)]
        set_max_tokens: Option<u32>,
    },
}
