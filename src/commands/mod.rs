use crate::api::client::{AiClient, Provider};
use crate::bundler::bundle_multi_file_project;
use crate::cli::display::CliDisplayManager;
use crate::diff::{DiffMode, FileDiff};
use crate::errors::AppError;
use crate::file_processing::response_parser::{parse_multi_file_response, DEFAULT_ENTRY_PATH};
use crate::file_processing::writer::WriteSummary;
use crate::file_processing::{export, history, reader, writer};
use crate::models::ai::CodeGenerationRequest;
use crate::models::VirtualFile;
use crate::preview::{change_key, generate_preview_html, render_host_page, PreviewMessage};
use crate::utils::config::{write_config, Config};
use crate::vfs::{normalize_path, VirtualFileSystem};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;

/// Handles the bundle subcommand
pub async fn handle_bundle_subcommand(dir: &Path, out_dir: Option<&Path>) -> Result<(), AppError> {
    let vfs = reader::load_project(dir).await?;
    let bundle = bundle_multi_file_project(&vfs);

    match out_dir {
        Some(out_dir) => {
            let (code_path, css_path) = writer::write_bundle(out_dir, &bundle).await?;
            println!("Wrote {} and {}", code_path.display(), css_path.display());
        }
        None => println!("{}", bundle.code),
    }
    Ok(())
}

/// Handles the preview subcommand
pub async fn handle_preview_subcommand(
    dir: &Path,
    out: &Path,
    watch: bool,
    interval_ms: u64,
) -> Result<(), AppError> {
    let display_manager = CliDisplayManager::new();
    let vfs = reader::load_project(dir).await?;
    write_preview(dir, out, &vfs).await?;
    display_manager.print_info(&format!("Preview written to {}", out.display()));

    if !watch {
        return Ok(());
    }

    display_manager.print_info("Watching for changes (Ctrl+C to stop)");
    let mut last_key = change_key(&vfs);
    let mut interval = tokio::time::interval(Duration::from_millis(interval_ms.max(50)));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let vfs = reader::load_project(dir).await?;
                let key = change_key(&vfs);
                if key != last_key {
                    log::debug!("Change key moved, re-rendering preview");
                    write_preview(dir, out, &vfs).await?;
                    display_manager.print_info(&format!("Re-rendered {} file(s)", vfs.len()));
                    last_key = key;
                }
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                println!();
                return Ok(());
            }
        }
    }
}

async fn write_preview(dir: &Path, out: &Path, vfs: &VirtualFileSystem) -> Result<(), AppError> {
    let srcdoc = generate_preview_html(vfs);
    let title = format!("Preview: {}", project_name(dir));
    fs::write(out, render_host_page(&title, &srcdoc)).await?;
    Ok(())
}

/// Handles the parse subcommand
pub async fn handle_parse_subcommand(
    response: &Path,
    default_path: &str,
    write: Option<&Path>,
) -> Result<(), AppError> {
    let display_manager = CliDisplayManager::new();
    let text = reader::read_text_file(response).await?;

    let Some(files) = parse_multi_file_response(&text, default_path) else {
        display_manager.print_warning(&format!(
            "No multi-file answer found; the reply is a single file for {}",
            normalize_path(default_path)
        ));
        return Ok(());
    };

    match write {
        Some(dir) => {
            let before = reader::load_project(dir).await?;
            let mut after = before.clone();
            after.import_all(files);
            let summary = writer::sync_project(dir, &before, &after).await?;
            display_manager.print_info(&format!(
                "Imported {} file(s) into {} ({} written, {} removed)",
                after.len(),
                dir.display(),
                summary.written,
                summary.removed
            ));
        }
        None => display_manager.print_files(&files),
    }
    Ok(())
}

/// Handles the diff subcommand
pub async fn handle_diff_subcommand(old: &Path, new: &Path, minimal: bool) -> Result<(), AppError> {
    let old_text = reader::read_text_file(old).await?;
    let new_text = reader::read_text_file(new).await?;
    let mode = if minimal {
        DiffMode::Minimal
    } else {
        DiffMode::Indexed
    };
    let diff = FileDiff::new(&new.display().to_string(), &old_text, &new_text, mode);
    CliDisplayManager::new().print_diff(&diff);
    Ok(())
}

/// Handles the tree subcommand
pub async fn handle_tree_subcommand(dir: &Path) -> Result<(), AppError> {
    let vfs = reader::load_project(dir).await?;
    println!("{}/", project_name(dir));
    CliDisplayManager::new().print_tree(&vfs.file_tree());
    Ok(())
}

/// Handles the generate subcommand
pub async fn handle_generate_subcommand(
    config: &Config,
    dir: &Path,
    prompt: Option<String>,
    constraints: Vec<String>,
    auto: bool,
) -> Result<(), AppError> {
    let prompt = prompt.ok_or(AppError::MissingPrompt)?;
    let mut client = build_client(config)?;
    let history_file = history::history_path(Path::new(&config.output_directory));
    client.sync_history(history::load_history(&history_file).await?);
    let start_time = Instant::now();
    let mut display_manager = CliDisplayManager::new();
    display_manager.print_header();

    let before = reader::load_project(dir).await?;
    display_manager.print_project_loaded("[1/3]", before.len());

    let request = CodeGenerationRequest {
        prompt,
        context: (!before.is_empty()).then(|| before.to_prompt_context()),
        constraints,
    };

    display_manager.print_ai_query_start("[2/3]", config.provider.display_name(), client.model());
    display_manager.start_spinner("Waiting for generated code");
    let response = client.generate_code(&request).await;
    display_manager.stop_spinner();
    let response = response?;
    if let Some(explanation) = &response.explanation {
        display_manager.print_info(explanation);
    }
    history::save_history(&history_file, client.history()).await?;

    let after = apply_response(&before, &response.code, DEFAULT_ENTRY_PATH);
    let summary = save_results(&display_manager, config, dir, &before, &after, auto).await?;
    display_manager.print_footer(summary.written, summary.removed, start_time.elapsed());
    Ok(())
}

/// Handles the fix subcommand
pub async fn handle_fix_subcommand(
    config: &Config,
    dir: &Path,
    error: Option<String>,
    error_report: Option<String>,
    file: &str,
    auto: bool,
) -> Result<(), AppError> {
    let error = error_text(error, error_report)?;
    let client = build_client(config)?;
    let start_time = Instant::now();
    let mut display_manager = CliDisplayManager::new();
    display_manager.print_header();

    let before = reader::load_project(dir).await?;
    display_manager.print_project_loaded("[1/3]", before.len());
    if before.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "No project files found in {}",
            dir.display()
        )));
    }

    display_manager.print_ai_query_start("[2/3]", config.provider.display_name(), client.model());
    display_manager.print_info(&format!("Error: {}", first_line(&error)));
    display_manager.start_spinner("Waiting for fixed code");
    let response = client
        .fix_code(&before.to_prompt_context(), Some(&error))
        .await;
    display_manager.stop_spinner();
    let response = response?;

    let after = apply_response(&before, &response.code, file);
    let summary = save_results(&display_manager, config, dir, &before, &after, auto).await?;
    display_manager.print_footer(summary.written, summary.removed, start_time.elapsed());
    Ok(())
}

/// Handles the chat subcommand
pub async fn handle_chat_subcommand(
    config: &Config,
    dir: &Path,
    message: Option<String>,
    file: Option<&str>,
    reset: bool,
) -> Result<(), AppError> {
    let history_file = history::history_path(Path::new(&config.output_directory));
    if reset {
        history::save_history(&history_file, &[]).await?;
        CliDisplayManager::new().print_info("Conversation history cleared");
    }
    let Some(message) = message else {
        return Ok(());
    };

    let mut client = build_client(config)?;
    client.sync_history(history::load_history(&history_file).await?);
    let vfs = reader::load_project(dir).await?;

    let code_context = match file {
        Some(file) => {
            let path = normalize_path(file);
            let content = vfs.get(&path).ok_or_else(|| {
                AppError::InvalidInput(format!("File not found in project: {}", path))
            })?;
            Some(content.to_string())
        }
        None => None,
    };

    let mut display_manager = CliDisplayManager::new();
    display_manager.start_spinner("Waiting for reply");
    let reply = client.chat(&message, code_context.as_deref()).await;
    display_manager.stop_spinner();
    println!("{}", reply?);
    history::save_history(&history_file, client.history()).await?;
    Ok(())
}

/// Handles the export subcommand
pub async fn handle_export_subcommand(
    dir: &Path,
    name: Option<String>,
    out: Option<PathBuf>,
) -> Result<(), AppError> {
    let vfs = reader::load_project(dir).await?;
    let repo_name = name.unwrap_or_else(|| project_name(dir));
    let out = out.unwrap_or_else(|| PathBuf::from(format!("{}.zip", repo_name)));

    let bytes = export::export_project_zip(&vfs, &repo_name)?;
    fs::write(&out, bytes).await?;
    CliDisplayManager::new().print_info(&format!(
        "Exported {} file(s) to {}",
        vfs.len(),
        out.display()
    ));
    Ok(())
}

/// Handles the config subcommand
pub async fn handle_config_subcommand(
    mut config: Config,
    set_log_level: Option<String>,
    set_output_directory: Option<String>,
    set_retries: Option<u32>,
) -> Result<(), AppError> {
    if let Some(log_level) = set_log_level {
        config.log_level = log_level.clone();
        println!("Log level set to {}", log_level);
    }

    if let Some(output_directory) = set_output_directory {
        config.output_directory = output_directory.clone();
        println!("Output directory set to {}", output_directory);
    }

    if let Some(retries) = set_retries {
        config.retries = retries;
        println!("Retries set to {}", retries);
    }

    crate::utils::config::validate_config(&config)?;
    write_config(&config)?;
    Ok(())
}

/// Handles the model-config subcommand
pub async fn handle_model_config_subcommand(
    mut config: Config,
    set_provider: Option<Provider>,
    set_api_key: Option<String>,
    set_model: Option<String>,
    set_system_prompt: Option<String>,
    set_temperature: Option<f32>,
    set_max_tokens: Option<u32>,
) -> Result<(), AppError> {
    if let Some(provider) = set_provider {
        config.provider = provider;
        println!("Provider set to {}", provider.display_name());
    }

    if let Some(api_key) = set_api_key {
        config.api_key = Some(api_key);
        println!("API key set");
    }

    if let Some(model) = set_model {
        if model.trim().is_empty() {
            config.model = None;
            println!("Model reset to provider default");
        } else {
            println!("Model set to {}", model);
            config.model = Some(model);
        }
    }

    if let Some(system_prompt) = set_system_prompt {
        config.system_prompt = system_prompt.clone();
        println!("System prompt set to: {}", system_prompt);
    }

    if let Some(temperature) = set_temperature {
        config.temperature = temperature;
        println!("Temperature set to: {}", temperature);
    }

    if let Some(max_tokens) = set_max_tokens {
        config.max_tokens = max_tokens;
        println!("Max tokens set to: {}", max_tokens);
    }

    crate::utils::config::validate_config(&config)?;
    write_config(&config)?;
    Ok(())
}

fn build_client(config: &Config) -> Result<AiClient, AppError> {
    let api_key = config
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or(AppError::MissingApiKey)?;
    Ok(AiClient::new(
        config.provider,
        api_key,
        config.request_options(),
    ))
}

/// Applies a model answer to a copy of the project.
///
/// A multi-file answer replaces the whole file set. Anything else is the new
/// content of `target_file`.
pub fn apply_response(
    before: &VirtualFileSystem,
    response_code: &str,
    target_file: &str,
) -> VirtualFileSystem {
    let mut after = before.clone();
    match parse_multi_file_response(response_code, target_file) {
        Some(files) => {
            log::info!("Importing {} file(s) from multi-file answer", files.len());
            after.import_all(files);
        }
        None => after.set(normalize_path(target_file), response_code),
    }
    after
}

/// Index-aligned diffs for every path whose content differs.
pub fn changed_files(before: &VirtualFileSystem, after: &VirtualFileSystem) -> Vec<FileDiff> {
    let mut paths: Vec<&str> = before.paths().chain(after.paths()).collect();
    paths.sort_unstable();
    paths.dedup();

    paths
        .into_iter()
        .filter(|path| before.get(path) != after.get(path))
        .map(|path| {
            FileDiff::new(
                path,
                before.get(path).unwrap_or_default(),
                after.get(path).unwrap_or_default(),
                DiffMode::Indexed,
            )
        })
        .collect()
}

/// The error text to send to the model, from a plain message or a JSON
/// `preview-error` report.
pub fn error_text(error: Option<String>, error_report: Option<String>) -> Result<String, AppError> {
    if let Some(error) = error.filter(|e| !e.trim().is_empty()) {
        return Ok(error);
    }
    let report = error_report.ok_or(AppError::MissingErrorReport)?;
    PreviewMessage::from_json(&report)
        .map(|message| message.describe())
        .ok_or_else(|| {
            AppError::InvalidInput(format!("Not a preview-error report: {}", report))
        })
}

async fn save_results(
    display_manager: &CliDisplayManager,
    config: &Config,
    dir: &Path,
    before: &VirtualFileSystem,
    after: &VirtualFileSystem,
    auto: bool,
) -> Result<WriteSummary, AppError> {
    display_manager.print_saving_results_start("[3/3]");
    let diffs = changed_files(before, after);
    if diffs.is_empty() {
        display_manager.print_info("The answer did not change any file");
        return Ok(WriteSummary::default());
    }
    for diff in &diffs {
        display_manager.print_diff(diff);
    }

    if auto {
        let summary = writer::sync_project(dir, before, after).await?;
        display_manager.print_saving_results_success(true, &dir.display().to_string());
        return Ok(summary);
    }

    let output_dir = Path::new(&config.output_directory)
        .join("vibe.output")
        .join("code");
    writer::reset_output_dir(&output_dir).await?;
    let changed: Vec<VirtualFile> = after
        .iter()
        .filter(|(path, content)| before.get(path) != Some(*content))
        .map(|(path, content)| VirtualFile::new(path, content))
        .collect();
    let written = writer::write_files(&output_dir, &changed).await?;
    for path in before.paths().filter(|p| !after.has(p)) {
        display_manager.print_warning(&format!("{} would be removed (use --auto to apply)", path));
    }
    display_manager.print_saving_results_success(false, &output_dir.display().to_string());
    Ok(WriteSummary {
        written,
        removed: 0,
    })
}

fn project_name(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "vibe-project".to_string())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
