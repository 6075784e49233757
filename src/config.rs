use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::engine::EngineConfig;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub fade_ms: Option<u64>,
    pub tick_ms: Option<u64>,
    pub no_glow: bool,
    pub perf: bool,
    pub render_debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            fade_ms: other.fade_ms.or(self.fade_ms),
            tick_ms: other.tick_ms.or(self.tick_ms),
            no_glow: self.no_glow || other.no_glow,
            perf: self.perf || other.perf,
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
        }
    }

    /// Engine settings with these flags applied over the defaults.
    ///
    /// Zero durations are ignored; a zero tick period would spin the loop.
    pub fn to_engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        if let Some(ms) = self.fade_ms.filter(|ms| *ms > 0) {
            config.fade_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = self.tick_ms.filter(|ms| *ms > 0) {
            config.tick_period = Duration::from_millis(ms);
        }
        config.glow_enabled = !self.no_glow;
        config
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("nopad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("nopad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("nopad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("nopad").join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".nopadrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# nopad defaults (saved with --save)".to_string());
    if let Some(ms) = flags.fade_ms {
        lines.push(format!("--fade-ms {ms}"));
    }
    if let Some(ms) = flags.tick_ms {
        lines.push(format!("--tick-ms {ms}"));
    }
    if flags.no_glow {
        lines.push("--no-glow".to_string());
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags this module knows out of a token list; everything else is
/// skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--no-glow" {
            flags.no_glow = true;
        } else if token == "--perf" {
            flags.perf = true;
        } else if token == "--fade-ms" || token == "--tick-ms" || token == "--render-debug-log" {
            if let Some(next) = tokens.get(i + 1) {
                apply_valued(&mut flags, token, next);
                i += 1;
            }
        } else if let Some((name, value)) = token.split_once('=') {
            apply_valued(&mut flags, name, value);
        }
        i += 1;
    }
    flags
}

fn apply_valued(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--fade-ms" => {
            if let Ok(ms) = value.parse() {
                flags.fade_ms = Some(ms);
            }
        }
        "--tick-ms" => {
            if let Ok(ms) = value.parse() {
                flags.tick_ms = Some(ms);
            }
        }
        "--render-debug-log" => flags.render_debug_log = Some(PathBuf::from(value)),
        _ => {}
    }
}
