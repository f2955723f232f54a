use crate::diff::FileDiff;
use crate::models::{DiffKind, FileNode, VirtualFile};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TICKS: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Manages CLI display and output formatting.
#[derive(Default)]
pub struct CliDisplayManager {
    spinner: Option<ProgressBar>,
}

impl CliDisplayManager {
    /// Creates a new `CliDisplayManager`.
    pub fn new() -> Self {
        CliDisplayManager { spinner: None }
    }

    /// Prints the application header.
    pub fn print_header(&self) {
        println!("\n{}", "╭──────────────────────────╮".bright_magenta());
        println!(
            "{}",
            format!("│  🎲 vibe-preview v{:<7}│", env!("CARGO_PKG_VERSION"))
                .bright_magenta()
                .bold()
        );
        println!("{}\n", "╰──────────────────────────╯".bright_magenta());
    }

    pub fn print_project_loaded(&self, step: &str, file_count: usize) {
        self.print_section(
            "📁",
            &format!("{} Loading Project", step),
            &format!("Found {} file(s)", file_count),
        );
    }

    pub fn print_ai_query_start(&self, step: &str, provider: &str, model: &str) {
        self.print_section(
            "⚓",
            &format!("{} Querying {}", step, provider),
            &format!("Model: {}", model),
        );
    }

    /// Prints the start of saving results.
    pub fn print_saving_results_start(&self, step: &str) {
        self.print_section("💾", &format!("{} Saving Results", step), "");
    }

    /// Prints a success message for saving results.
    pub fn print_saving_results_success(&self, auto: bool, location: &str) {
        match auto {
            true => self.print_info(&format!("Successfully updated project files in '{}'", location)),
            false => self.print_info(&format!("Successfully saved results to '{}'", location)),
        }
    }

    /// Prints the application footer.
    pub fn print_footer(&self, written: usize, removed: usize, duration: Duration) {
        println!();
        println!(
            "{}",
            format!("⚡ Wrote {} file(s)", written).bright_white().dimmed(),
        );
        if removed > 0 {
            println!(
                "{}",
                format!("⚡ Removed {} file(s)", removed)
                    .bright_white()
                    .dimmed(),
            );
        }
        println!(
            "{}",
            format!("⚡ Completed in {:.2?}", duration)
                .bright_white()
                .dimmed(),
        );
        println!();
    }

    /// Starts a spinner for ongoing operations.
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template(&format!(
            "   {} {{spinner}} {}",
            "→".bright_white(),
            message.italic().bright_white()
        ))
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&SPINNER_TICKS);
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Stops the spinner.
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Prints a colored diff with a one-line summary.
    pub fn print_diff(&self, diff: &FileDiff) {
        let summary = diff.summary();
        println!(
            "   {} {} {} {}",
            "±".bright_yellow(),
            diff.file_name.bright_cyan().bold(),
            format!("+{}", summary.added).green(),
            format!("-{}", summary.removed).red(),
        );
        if summary.is_unchanged() {
            self.print_info("No changes");
            return;
        }
        for line in &diff.lines {
            let rendered = format!("{:>5} {} {}", line.line_number, marker(line.kind), line.line);
            match line.kind {
                DiffKind::Add => println!("{}", rendered.green()),
                DiffKind::Remove => println!("{}", rendered.red()),
                DiffKind::Same => println!("{}", rendered.dimmed()),
            }
        }
    }

    pub fn print_tree(&self, nodes: &[FileNode]) {
        for line in render_tree(nodes) {
            println!("{}", line);
        }
    }

    /// Prints parsed files with a header per file.
    pub fn print_files(&self, files: &[VirtualFile]) {
        for file in files {
            println!("{} {}", "//".bright_yellow(), file.path.bright_cyan().bold());
            println!("{}\n", file.content);
        }
    }

    pub fn print_warning(&self, message: &str) {
        println!("   {} {}", "!".bright_yellow().bold(), message.yellow());
    }

    /// Helper function to print a section header.
    pub fn print_section(&self, icon: &str, title: &str, description: &str) {
        println!("{} {}", icon.bright_yellow(), title.bright_cyan().bold());
        if !description.is_empty() {
            println!(
                "   {} {}",
                "→".bright_white(),
                description.italic().bright_white()
            );
        }
    }

    /// Helper function to print an informational message.
    pub fn print_info(&self, message: &str) {
        println!(
            "   {} {}",
            "→".bright_white(),
            message.italic().bright_white()
        );
    }
}

fn marker(kind: DiffKind) -> char {
    match kind {
        DiffKind::Add => '+',
        DiffKind::Remove => '-',
        DiffKind::Same => ' ',
    }
}

/// Plain-text tree, one line per node, folders suffixed with `/`.
pub fn render_tree(nodes: &[FileNode]) -> Vec<String> {
    let mut lines = Vec::new();
    render_level(nodes, "", &mut lines);
    lines
}

fn render_level(nodes: &[FileNode], prefix: &str, lines: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let branch = if last { "└── " } else { "├── " };
        match node {
            FileNode::Folder { name, children, .. } => {
                lines.push(format!("{}{}{}/", prefix, branch, name));
                let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
                render_level(children, &child_prefix, lines);
            }
            FileNode::File { name, .. } => lines.push(format!("{}{}{}", prefix, branch, name)),
        }
    }
}
