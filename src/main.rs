use clap::Parser;
use vibe_preview::cli::args::{Args, Commands};
use vibe_preview::commands;
use vibe_preview::errors::AppError;
use vibe_preview::utils::config::{read_config, Config};
use vibe_preview::utils::logger;

/// The main entry point of the application
#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Read config.toml
    let config = read_config()?;
    logger::setup_logger(&config);

    handle_subcommands(args.command, config).await
}

async fn handle_subcommands(command: Commands, config: Config) -> Result<(), AppError> {
    match command {
        Commands::Bundle { dir, out_dir } => {
            commands::handle_bundle_subcommand(&dir, out_dir.as_deref()).await
        }
        Commands::Preview {
            dir,
            out,
            watch,
            interval_ms,
        } => commands::handle_preview_subcommand(&dir, &out, watch, interval_ms).await,
        Commands::Parse {
            response,
            default_path,
            write,
        } => commands::handle_parse_subcommand(&response, &default_path, write.as_deref()).await,
        Commands::Diff { old, new, minimal } => {
            commands::handle_diff_subcommand(&old, &new, minimal).await
        }
        Commands::Tree { dir } => commands::handle_tree_subcommand(&dir).await,
        Commands::Generate {
            dir,
            prompt,
            constraints,
            auto,
        } => commands::handle_generate_subcommand(&config, &dir, prompt, constraints, auto).await,
        Commands::Fix {
            dir,
            error,
            error_report,
            file,
            auto,
        } => {
            commands::handle_fix_subcommand(&config, &dir, error, error_report, &file, auto).await
        }
        Commands::Chat {
            dir,
            message,
            file,
            reset,
        } => {
            commands::handle_chat_subcommand(&config, &dir, message, file.as_deref(), reset).await
        }
        Commands::Export { dir, name, out } => {
            commands::handle_export_subcommand(&dir, name, out).await
        }
        Commands::Config {
            set_log_level,
            set_output_directory,
            set_retries,
        } => {
            commands::handle_config_subcommand(
                config,
                set_log_level,
                set_output_directory,
                set_retries,
            )
            .await
        }
        Commands::ModelConfig {
            set_provider,
            set_api_key,
            set_model,
            set_system_prompt,
            set_temperature,
            set_max_tokens,
        } => {
            commands::handle_model_config_subcommand(
                config,
                set_provider,
                set_api_key,
                set_model,
                set_system_prompt,
                set_temperature,
                set_max_tokens,
            )
            .await
        }
    }
}
