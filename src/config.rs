//! Persistent default flags.
//!
//! Defaults live in a global config file and an optional `.mdsyncrc` in the
//! working directory. Both hold command-line flags, one or more per line,
//! with `#` comments. Command-line flags override file flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_sync: bool,
    pub no_open: bool,
    pub sync_delay_ms: Option<u64>,
    pub export: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_sync: self.no_sync || other.no_sync,
            no_open: self.no_open || other.no_open,
            sync_delay_ms: other.sync_delay_ms.or(self.sync_delay_ms),
            export: other.export.clone().or_else(|| self.export.clone()),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("mdsync").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("mdsync")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("mdsync").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("mdsync").join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".mdsyncrc")
}

/// # Errors
/// Returns an error if the file exists but cannot be read.
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

/// # Errors
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# mdsync defaults (saved with --save)".to_string()];
    if flags.no_sync {
        lines.push("--no-sync".to_string());
    }
    if flags.no_open {
        lines.push("--no-open".to_string());
    }
    if let Some(ms) = flags.sync_delay_ms {
        lines.push(format!("--sync-delay {ms}"));
    }
    if let Some(path) = &flags.export {
        lines.push(format!("--export {}", path.display()));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags this module persists out of raw arguments. Unknown tokens
/// (including the file argument) are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = token
            .split_once('=')
            .map_or((token, None), |(name, value)| (name, Some(value.to_string())));
        let takes_value = matches!(name, "--sync-delay" | "--export" | "--log-file");
        let value = if takes_value && inline_value.is_none() {
            i += 1;
            tokens.get(i).cloned()
        } else {
            inline_value
        };
        match name {
            "--no-sync" => flags.no_sync = true,
            "--no-open" => flags.no_open = true,
            "--sync-delay" => {
                if let Some(ms) = value.and_then(|v| v.parse().ok()) {
                    flags.sync_delay_ms = Some(ms);
                }
            }
            "--export" => flags.export = value.map(PathBuf::from),
            "--log-file" => flags.log_file = value.map(PathBuf::from),
            _ => {}
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&args(&[
            "mdsync",
            "--no-sync",
            "--sync-delay",
            "90",
            "--export=out/print.html",
            "--log-file",
            "sync.log",
            "notes.md",
        ]));
        assert!(flags.no_sync);
        assert!(!flags.no_open);
        assert_eq!(flags.sync_delay_ms, Some(90));
        assert_eq!(flags.export, Some(PathBuf::from("out/print.html")));
        assert_eq!(flags.log_file, Some(PathBuf::from("sync.log")));
    }

    #[test]
    fn test_bad_delay_is_ignored() {
        let flags = parse_flag_tokens(&args(&["--sync-delay=soon", "--no-open"]));
        assert_eq!(flags.sync_delay_ms, None);
        assert!(flags.no_open);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            no_open: true,
            sync_delay_ms: Some(300),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            no_sync: true,
            sync_delay_ms: Some(50),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.no_open);
        assert!(merged.no_sync);
        assert_eq!(merged.sync_delay_ms, Some(50));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".mdsyncrc");
        let flags = ConfigFlags {
            no_sync: true,
            no_open: true,
            sync_delay_ms: Some(200),
            export: Some(PathBuf::from("print.html")),
            log_file: Some(PathBuf::from("mdsync.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
