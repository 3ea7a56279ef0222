//! Persisted explorer configuration: quick access, layout sizes, and the
//! editable/readonly folder lists that feed the permission rule set.

use std::{
    fs,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::api_error::ApiResult;
use crate::rules::PathRuleSet;

mod error;

use error::{map_api_result, ConfigError, ConfigErrorCode, ConfigResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExplorerConfig {
    pub default_path: Option<String>,
    pub quick_access: Vec<String>,
    pub sidebar_width: Option<f64>,
    pub expanded_paths: Vec<String>,
    pub quick_access_height: Option<f64>,
    pub view: Option<String>,
    pub editable_folders: Vec<String>,
    pub readonly_folders: Vec<String>,
}

/// Partial update from the frontend; unset fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub default_path: Option<String>,
    pub quick_access: Option<Vec<String>>,
    pub sidebar_width: Option<f64>,
    pub expanded_paths: Option<Vec<String>>,
    pub quick_access_height: Option<f64>,
    pub view: Option<String>,
    pub editable_folders: Option<Vec<String>>,
    pub readonly_folders: Option<Vec<String>>,
}

/// Pure shallow merge: every set patch field replaces the base field whole.
pub fn merge(base: ExplorerConfig, patch: ConfigPatch) -> ExplorerConfig {
    ExplorerConfig {
        default_path: patch.default_path.or(base.default_path),
        quick_access: patch.quick_access.unwrap_or(base.quick_access),
        sidebar_width: patch.sidebar_width.or(base.sidebar_width),
        expanded_paths: patch.expanded_paths.unwrap_or(base.expanded_paths),
        quick_access_height: patch.quick_access_height.or(base.quick_access_height),
        view: patch.view.or(base.view),
        editable_folders: patch.editable_folders.unwrap_or(base.editable_folders),
        readonly_folders: patch.readonly_folders.unwrap_or(base.readonly_folders),
    }
}

pub(crate) fn config_dir() -> ConfigResult<PathBuf> {
    if let Some(dir) = std::env::var_os("FERRY_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs_next::data_dir()
        .map(|base| base.join("ferry"))
        .ok_or_else(|| {
            ConfigError::new(
                ConfigErrorCode::NoDataDir,
                "No platform data directory available",
            )
        })
}

fn config_path() -> ConfigResult<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub(crate) fn read_config() -> ConfigResult<ExplorerConfig> {
    let path = config_path()?;
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ExplorerConfig::default())
        }
        Err(e) => {
            return Err(ConfigError::new(
                ConfigErrorCode::IoError,
                format!("Failed to read config {}: {e}", path.display()),
            ))
        }
    };
    serde_json::from_str(&raw).map_err(|e| {
        // A corrupt file should not brick the app; surface and start over.
        warn!(path = %path.display(), error = %e, "config file unreadable");
        ConfigError::new(
            ConfigErrorCode::ParseFailed,
            format!("Config file is not valid JSON: {e}"),
        )
    })
}

fn write_config(config: &ExplorerConfig) -> ConfigResult<()> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir).map_err(|e| {
        ConfigError::new(
            ConfigErrorCode::IoError,
            format!("Failed to create config dir {}: {e}", dir.display()),
        )
    })?;
    let path = config_path()?;
    let raw = serde_json::to_string_pretty(config).map_err(|e| {
        ConfigError::new(
            ConfigErrorCode::SerializeFailed,
            format!("Failed to serialize config: {e}"),
        )
    })?;
    fs::write(&path, raw).map_err(|e| {
        ConfigError::new(
            ConfigErrorCode::IoError,
            format!("Failed to write config {}: {e}", path.display()),
        )
    })
}

/// Rule set compiled from the stored folder lists. Re-read per mutating
/// operation; the lists are small and read-mostly.
pub(crate) fn current_rules() -> ApiResult<PathRuleSet> {
    let config = map_api_result(read_config())?;
    Ok(PathRuleSet::from_lists(
        &config.editable_folders,
        &config.readonly_folders,
    ))
}

#[tauri::command]
pub fn load_config() -> ApiResult<ExplorerConfig> {
    map_api_result(read_config())
}

#[tauri::command]
pub fn update_config(patch: ConfigPatch) -> ApiResult<ExplorerConfig> {
    map_api_result(update_config_impl(patch))
}

fn update_config_impl(patch: ConfigPatch) -> ConfigResult<ExplorerConfig> {
    let merged = merge(read_config()?, patch);
    write_config(&merged)?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unset_fields_and_replaces_set_ones() {
        let base = ExplorerConfig {
            default_path: Some("/home".into()),
            quick_access: vec!["/home/docs".into()],
            sidebar_width: Some(220.0),
            editable_folders: vec!["/home".into()],
            ..Default::default()
        };
        let patch = ConfigPatch {
            sidebar_width: Some(260.0),
            editable_folders: Some(vec!["/home".into(), "/srv".into()]),
            ..Default::default()
        };

        let merged = merge(base.clone(), patch);
        assert_eq!(merged.default_path, base.default_path);
        assert_eq!(merged.quick_access, base.quick_access);
        assert_eq!(merged.sidebar_width, Some(260.0));
        assert_eq!(
            merged.editable_folders,
            vec!["/home".to_string(), "/srv".to_string()]
        );
    }

    #[test]
    fn merge_with_empty_patch_is_identity() {
        let base = ExplorerConfig {
            view: Some("list".into()),
            readonly_folders: vec!["/etc".into()],
            ..Default::default()
        };
        assert_eq!(merge(base.clone(), ConfigPatch::default()), base);
    }

    #[test]
    fn patch_can_clear_a_list_by_sending_empty() {
        let base = ExplorerConfig {
            expanded_paths: vec!["/a".into(), "/b".into()],
            ..Default::default()
        };
        let patch = ConfigPatch {
            expanded_paths: Some(Vec::new()),
            ..Default::default()
        };
        assert!(merge(base, patch).expanded_paths.is_empty());
    }
}
