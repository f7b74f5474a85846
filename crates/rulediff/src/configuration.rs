//! TOML configuration.
//!
//! ```toml
//! comment_prefix  = "rulediff"
//! indent          = 2
//! prune_unchanged = false
//!
//! [[protected]]
//! element = "MetadataType"
//! id_tag  = "Name"
//! ```
//!
//! Missing keys fall back to the defaults of [`Config::default`], which protect the Goobi
//! ruleset classes `MetadataType`, `DocStrctType` and `Group` by their `Name` child.

use super::*;
use crate::element::Options;

/// Settings for reading, comparing and writing rulesets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Text every annotation comment starts with
  pub comment_prefix:  String,
  /// Indentation of written documents in spaces
  pub indent:          usize,
  /// Drop protected elements that compared equal from the diff document
  pub prune_unchanged: bool,
  /// Element classes carrying an identity
  pub protected:       Vec<ProtectedClass>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      comment_prefix:  "rulediff".to_string(),
      indent:          2,
      prune_unchanged: false,
      protected:       vec![
        ProtectedClass::new("MetadataType", "Name"),
        ProtectedClass::new("DocStrctType", "Name"),
        ProtectedClass::new("Group", "Name"),
      ],
    }
  }
}

impl Config {
  /// Default location of the configuration file, `<config dir>/rulediff/config.toml`.
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("rulediff").join("config.toml")
  }

  /// Reads a configuration file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
  }

  /// Loads the configuration to use.
  ///
  /// An explicit path must exist. Without one, the default path is used if a file is there,
  /// otherwise the built-in defaults apply.
  pub fn load(path: Option<&Path>) -> Result<Config> {
    match path {
      Some(path) => Config::from_path(path),
      None => {
        let default_path = Config::default_path();
        if default_path.exists() {
          Config::from_path(default_path)
        } else {
          trace!("No configuration at {}, using defaults", default_path.display());
          Ok(Config::default())
        }
      },
    }
  }

  /// Writes the configuration, creating parent directories as needed.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(self)?)?;
    debug!("Saved configuration to {}", path.display());
    Ok(())
  }

  /// Comparison options derived from this configuration.
  pub fn options(&self) -> Options {
    Options { comment_prefix: self.comment_prefix.clone(), prune_unchanged: self.prune_unchanged }
  }

  /// Rejects classes with empty names and an empty comment prefix.
  fn validate(&self) -> Result<()> {
    if self.comment_prefix.trim().is_empty() {
      return Err(RulediffError::Config("comment_prefix must not be empty".to_string()));
    }
    if let Some(class) =
      self.protected.iter().find(|class| class.element.is_empty() || class.id_tag.is_empty())
    {
      return Err(RulediffError::Config(format!(
        "Protected class needs both element and id_tag, got {class:?}"
      )));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[traced_test]
  #[test]
  fn test_partial_config_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
      &path,
      r#"
prune_unchanged = true

[[protected]]
element = "Metadata"
id_tag = "InternalName"
"#,
    )
    .unwrap();

    let config = Config::from_path(&path).unwrap();
    assert!(config.prune_unchanged);
    assert_eq!(config.comment_prefix, "rulediff");
    assert_eq!(config.indent, 2);
    assert_eq!(config.protected, vec![ProtectedClass::new("Metadata", "InternalName")]);
    assert!(config.options().prune_unchanged);
  }

  #[traced_test]
  #[test]
  fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = Config { indent: 4, ..Config::default() };
    config.save(&path).unwrap();
    assert_eq!(Config::load(Some(path.as_path())).unwrap(), config);
  }

  #[traced_test]
  #[test]
  fn test_invalid_configs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    std::fs::write(&path, "comment_prefix = \"\"").unwrap();
    assert!(matches!(Config::from_path(&path), Err(RulediffError::Config(_))));

    std::fs::write(&path, "[[protected]]\nelement = \"MetadataType\"\nid_tag = \"\"").unwrap();
    assert!(matches!(Config::from_path(&path), Err(RulediffError::Config(_))));

    std::fs::write(&path, "indent = \"two\"").unwrap();
    assert!(matches!(Config::from_path(&path), Err(RulediffError::TomlDe(_))));

    assert!(matches!(Config::load(Some(dir.path().join("missing.toml").as_path())), Err(RulediffError::Io(_))));
  }

  #[traced_test]
  #[test]
  fn test_default_classes() {
    let integrity = Integrity::from_config(&Config::default());
    let names: Vec<_> = integrity.classes().map(|class| class.element).collect();
    assert_eq!(names, vec!["DocStrctType", "Group", "MetadataType"]);
    assert!(Config::default_path().ends_with("rulediff/config.toml"));
  }
}
