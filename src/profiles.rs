//! Named configuration profiles.
//!
//! A profile directory holds one `<name>.toml` [`GeneratorConfig`] per
//! profile and a `.current` file naming the active one. Without a pointer
//! the `default` profile is active, and a `default` profile that was never
//! saved reads as the built-in defaults.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::{ClozeError, Result};
use crate::store::replace_file;

/// Profile used when none was selected
pub const DEFAULT_PROFILE: &str = "default";

/// Profile directory used by the command-line tool
pub const DEFAULT_PROFILES_DIR: &str = "clozeProfiles";

const CURRENT_POINTER: &str = ".current";
const PROFILE_EXTENSION: &str = "toml";

/// Check a profile name: non-empty, letters, digits, `-` and `_` only
pub fn is_valid_profile_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

fn checked_name(name: &str) -> Result<&str> {
    if is_valid_profile_name(name) {
        Ok(name)
    } else {
        Err(ClozeError::InvalidProfileName(name.to_string()))
    }
}

/// A directory of configuration profiles
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ProfileStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, PROFILE_EXTENSION))
    }

    pub fn exists(&self, name: &str) -> bool {
        is_valid_profile_name(name) && self.profile_path(name).is_file()
    }

    /// Names of the saved profiles, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ClozeError::io(&self.root, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ClozeError::io(&self.root, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PROFILE_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_profile_name(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Name of the active profile
    pub fn current_name(&self) -> Result<String> {
        let path = self.root.join(CURRENT_POINTER);
        match fs::read_to_string(&path) {
            Ok(text) => {
                let name = text.trim();
                if name.is_empty() {
                    Ok(DEFAULT_PROFILE.to_string())
                } else {
                    Ok(name.to_string())
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(DEFAULT_PROFILE.to_string()),
            Err(e) => Err(ClozeError::io(path, e)),
        }
    }

    /// Make a saved profile the active one
    pub fn set_current(&self, name: &str) -> Result<()> {
        let name = checked_name(name)?;
        if !self.exists(name) {
            return Err(ClozeError::UnknownProfile(name.to_string()));
        }

        let path = self.root.join(CURRENT_POINTER);
        replace_file(&path, |writer| {
            writeln!(writer, "{}", name).map_err(|e| ClozeError::io(&path, e))
        })?;
        info!("Current profile set to '{}'", name);
        Ok(())
    }

    /// Load a profile by name
    pub fn load(&self, name: &str) -> Result<GeneratorConfig> {
        let name = checked_name(name)?;
        let path = self.profile_path(name);
        if path.is_file() {
            debug!("Loading profile '{}' from '{}'", name, path.display());
            return GeneratorConfig::load(&path);
        }
        if name == DEFAULT_PROFILE {
            return Ok(GeneratorConfig::default());
        }
        Err(ClozeError::UnknownProfile(name.to_string()))
    }

    /// Load the active profile
    pub fn load_current(&self) -> Result<GeneratorConfig> {
        self.load(&self.current_name()?)
    }

    /// Save a profile, creating the profile directory when needed
    pub fn save(&self, name: &str, config: &GeneratorConfig) -> Result<()> {
        let name = checked_name(name)?;
        config.validate()?;
        let text = config.to_toml()?;

        fs::create_dir_all(&self.root).map_err(|e| ClozeError::io(&self.root, e))?;
        let path = self.profile_path(name);
        replace_file(&path, |writer| {
            writer
                .write_all(text.as_bytes())
                .map_err(|e| ClozeError::io(&path, e))
        })?;
        debug!("Saved profile '{}' to '{}'", name, path.display());
        Ok(())
    }

    /// Create a new profile with the default settings
    pub fn add(&self, name: &str) -> Result<()> {
        let name = checked_name(name)?;
        if self.exists(name) {
            return Err(ClozeError::ProfileExists(name.to_string()));
        }
        self.save(name, &GeneratorConfig::default())?;
        info!("Added profile '{}'", name);
        Ok(())
    }

    /// Delete a profile; with `cascade` its output file goes too.
    ///
    /// Deleting the active profile makes `default` active again.
    pub fn delete(&self, name: &str, cascade: bool) -> Result<()> {
        let name = checked_name(name)?;
        if !self.exists(name) {
            return Err(ClozeError::UnknownProfile(name.to_string()));
        }

        if cascade {
            let config = self.load(name)?;
            match fs::remove_file(&config.output_file) {
                Ok(()) => info!("Deleted '{}'", config.output_file.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(ClozeError::io(&config.output_file, e)),
            }
        }

        let path = self.profile_path(name);
        fs::remove_file(&path).map_err(|e| ClozeError::io(&path, e))?;

        if self.current_name()? == name {
            let pointer = self.root.join(CURRENT_POINTER);
            fs::remove_file(&pointer).map_err(|e| ClozeError::io(&pointer, e))?;
        }
        info!("Deleted profile '{}'", name);
        Ok(())
    }

    /// Change the active profile and save it
    pub fn update_current<F>(&self, change: F) -> Result<GeneratorConfig>
    where
        F: FnOnce(&mut GeneratorConfig),
    {
        let name = self.current_name()?;
        let mut config = self.load(&name)?;
        change(&mut config);
        self.save(&name, &config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionStrategy;
    use pretty_assertions::assert_eq;

    fn store() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let profiles = ProfileStore::new(dir.path().join("profiles"));
        (dir, profiles)
    }

    #[test]
    fn test_fresh_store_uses_default() {
        let (_dir, profiles) = store();
        assert!(profiles.list().unwrap().is_empty());
        assert_eq!(profiles.current_name().unwrap(), DEFAULT_PROFILE);
        assert_eq!(profiles.load_current().unwrap(), GeneratorConfig::default());
    }

    #[test]
    fn test_add_list_and_switch() {
        let (_dir, profiles) = store();
        profiles.add("spanish").unwrap();
        profiles.add("french").unwrap();
        assert_eq!(profiles.list().unwrap(), vec!["french", "spanish"]);

        profiles.set_current("spanish").unwrap();
        assert_eq!(profiles.current_name().unwrap(), "spanish");

        assert!(matches!(
            profiles.add("french"),
            Err(ClozeError::ProfileExists(_))
        ));
        assert!(matches!(
            profiles.set_current("german"),
            Err(ClozeError::UnknownProfile(_))
        ));
        assert!(matches!(
            profiles.add("../escape"),
            Err(ClozeError::InvalidProfileName(_))
        ));
    }

    #[test]
    fn test_update_current_persists() {
        let (_dir, profiles) = store();
        profiles.add("spanish").unwrap();
        profiles.set_current("spanish").unwrap();

        profiles
            .update_current(|config| {
                config.flashcards_per_word = 5;
                config.algorithm = SelectionStrategy::HighestProportionOfNewWords;
                config.add_bury_word("el");
            })
            .unwrap();

        let config = profiles.load("spanish").unwrap();
        assert_eq!(config.flashcards_per_word, 5);
        assert_eq!(config.algorithm, SelectionStrategy::HighestProportionOfNewWords);
        assert_eq!(config.words_to_bury, vec!["el"]);
        assert!(matches!(
            profiles.load("french"),
            Err(ClozeError::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_update_rejects_invalid_settings() {
        let (_dir, profiles) = store();
        assert!(matches!(
            profiles.update_current(|config| config.flashcards_per_word = 0),
            Err(ClozeError::InvalidFlashcardsPerWord)
        ));
        assert!(profiles.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_current_falls_back_to_default() {
        let (dir, profiles) = store();
        profiles.add("spanish").unwrap();
        profiles.set_current("spanish").unwrap();

        let output = dir.path().join("spanish.json");
        fs::write(&output, "{}").unwrap();
        profiles
            .update_current(|config| config.output_file = output.clone())
            .unwrap();

        profiles.delete("spanish", true).unwrap();
        assert!(!output.exists());
        assert!(profiles.list().unwrap().is_empty());
        assert_eq!(profiles.current_name().unwrap(), DEFAULT_PROFILE);
        assert!(matches!(
            profiles.delete("spanish", false),
            Err(ClozeError::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_delete_keeps_output_without_cascade() {
        let (dir, profiles) = store();
        let output = dir.path().join("out.json");
        fs::write(&output, "{}").unwrap();

        profiles
            .save(
                "keep",
                &GeneratorConfig {
                    output_file: output.clone(),
                    ..Default::default()
                },
            )
            .unwrap();
        profiles.delete("keep", false).unwrap();
        assert!(output.exists());
    }
}
