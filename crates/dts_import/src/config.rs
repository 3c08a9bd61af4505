use std::{fs, path::Path};

use serde::Deserialize;

/// Object names kept visible when the default player body is hidden.
pub const BLOCKHEAD_NODES: [&str; 9] = [
    "HeadSkin", "chest", "Larm", "Lhand", "Rarm", "Rhand", "pants", "LShoe", "RShoe",
];

/// How the node hierarchy is represented in the host scene.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeMode {
    /// One empty transform object per node.
    #[default]
    Empty,
    // Accepted for compatibility; neither builds anything yet.
    Armature,
    Bone,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ImportConfig {
    pub node_mode: NodeMode,
    pub hide_default_player: bool,
    pub debug_report: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

impl ImportConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn visibility(&self) -> VisibilityPolicy {
        if self.hide_default_player {
            VisibilityPolicy::HideExcept(BLOCKHEAD_NODES.iter().map(|s| s.to_string()).collect())
        } else {
            VisibilityPolicy::ShowAll
        }
    }
}

/// Decides which created mesh objects start out hidden.
#[derive(Clone, Debug, PartialEq)]
pub enum VisibilityPolicy {
    ShowAll,
    HideExcept(Vec<String>),
}

impl VisibilityPolicy {
    pub fn is_hidden(&self, object_name: &str) -> bool {
        match self {
            VisibilityPolicy::ShowAll => false,
            VisibilityPolicy::HideExcept(keep) => !keep.iter().any(|k| k == object_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = ImportConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ImportConfig::default());
        assert_eq!(config.node_mode, NodeMode::Empty);
    }

    #[test]
    fn node_mode_uses_upper_case_names() {
        let config =
            ImportConfig::from_json_str(r#"{ "node_mode": "ARMATURE", "debug_report": true }"#)
                .unwrap();
        assert_eq!(config.node_mode, NodeMode::Armature);
        assert!(config.debug_report);
        assert!(ImportConfig::from_json_str(r#"{ "node_mode": "SKELETON" }"#).is_err());
    }

    #[test]
    fn hide_default_player_keeps_body_parts() {
        let config = ImportConfig {
            hide_default_player: true,
            ..Default::default()
        };
        let policy = config.visibility();
        assert!(!policy.is_hidden("chest"));
        assert!(!policy.is_hidden("RShoe"));
        assert!(policy.is_hidden("Accessory"));
        assert!(!ImportConfig::default().visibility().is_hidden("Accessory"));
    }

    #[test]
    fn config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.json");
        fs::write(&path, r#"{ "hide_default_player": true }"#).unwrap();

        let config = ImportConfig::from_path(&path).unwrap();
        assert!(config.hide_default_player);
        assert!(matches!(
            ImportConfig::from_path(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
