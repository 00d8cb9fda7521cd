use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use relaybot_core::{AppSettings, EnvLookup, SettingsFile, SettingsLevel};

/// The file `load` reads: an explicit path, else the workspace file when it
/// exists, else the user file
pub fn discover(explicit: Option<&Path>, cwd: &Path) -> SettingsFile {
    if let Some(path) = explicit {
        return SettingsFile::new(path, SettingsLevel::Workspace);
    }
    let workspace = SettingsFile::workspace(cwd);
    if workspace.exists() {
        workspace
    } else {
        SettingsFile::user()
    }
}

/// Effective settings: file values, then environment overrides
pub fn load(file: &SettingsFile, env: &dyn EnvLookup) -> Result<AppSettings> {
    let mut settings = file
        .load()
        .with_context(|| format!("reading settings from {}", file.path().display()))?;
    settings.apply_env(env);
    settings.validate().context("invalid settings after environment overrides")?;
    Ok(settings)
}

pub fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_workspace_file_wins_when_present() {
        let dir = TempDir::new().unwrap();
        assert_eq!(discover(None, dir.path()).level(), SettingsLevel::User);

        let workspace = SettingsFile::workspace(dir.path());
        workspace.save(&AppSettings::default()).unwrap();
        let found = discover(None, dir.path());
        assert_eq!(found.level(), SettingsLevel::Workspace);
        assert_eq!(found.path(), workspace.path());

        let explicit = dir.path().join("other.yaml");
        assert_eq!(discover(Some(&explicit), dir.path()).path(), explicit.as_path());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let file = SettingsFile::new(dir.path().join("config.yaml"), SettingsLevel::Workspace);
        std::fs::write(file.path(), "llm:\n  model: from-file\n").unwrap();

        let env: HashMap<String, String> = [("AI_MODEL".to_string(), "from-env".to_string())].into();
        let settings = load(&file, &env).unwrap();
        assert_eq!(settings.llm.model, "from-env");
    }
}
