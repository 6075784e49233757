//! Nopad - a markdown note pad with live heading styling and typing glow.
//!
//! # Usage
//!
//! ```bash
//! nopad
//! nopad notes.md
//! nopad --fade-ms 400 --no-glow notes.md
//! nopad --dump notes.md
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use nopad::app::App;
use nopad::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use nopad::editor::NoteBuffer;
use nopad::engine::StyleEngine;
use nopad::perf;
use nopad::theme::Theme;

/// A markdown note pad with live heading styling and typing glow
#[derive(Parser, Debug)]
#[command(name = "nopad", version, about, long_about = None)]
struct Cli {
    /// Markdown file to seed the note with (never written back)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Glow fade duration in milliseconds
    #[arg(long, value_name = "MS")]
    fade_ms: Option<u64>,

    /// Glow animation tick period in milliseconds
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,

    /// Disable the typing glow
    #[arg(long)]
    no_glow: bool,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Write fade tick and restyle events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,

    /// Print the styled runs of FILE and exit without starting the UI
    #[arg(long, requires = "file")]
    dump: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    tracing::debug!(?effective, "effective config");

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("NOPAD_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        tracing::warn!(
            path = %render_debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            %err,
            "failed to initialize render debug log"
        );
    }

    let text = match &cli.file {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("File not found: {}", path.display());
            }
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => String::new(),
    };

    let theme = Theme::nopad();
    let engine_config = effective.to_engine_config();

    if cli.dump {
        let mut buffer = NoteBuffer::new(&text, theme.base_attributes());
        let mut engine = StyleEngine::new(engine_config, theme);
        engine.request_initial_styling(&mut buffer);
        print!("{}", nopad::ui::styled_runs(&buffer));
        return Ok(());
    }

    // Run the application
    let mut app = App::new(text)
        .with_file_path(cli.file)
        .with_engine_config(engine_config)
        .with_theme(theme);

    app.run().context("Application error")
}
