//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::{EntityId, EntityPrefix};

/// Represents a stocktake project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .stocktake/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current =
            std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            let marker = current.join(".stocktake");
            if marker.is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let marker = root.join(".stocktake");
        if marker.exists() {
            return Err(ProjectError::AlreadyExists(root.clone()));
        }

        Self::write_skeleton(&root)?;
        Ok(Self { root })
    }

    /// Force initialization even if .stocktake/ exists
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_skeleton(&root)?;
        Ok(Self { root })
    }

    fn write_skeleton(root: &Path) -> Result<(), ProjectError> {
        let marker = root.join(".stocktake");
        std::fs::create_dir_all(&marker).map_err(|e| ProjectError::IoError(e.to_string()))?;

        let config_path = marker.join("config.yaml");
        std::fs::write(&config_path, Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Self::create_entity_dirs(root)
    }

    fn default_config() -> &'static str {
        r#"# Stocktake project configuration

# Default author for new entities (can be overridden by global config)
# author: ""

# Editor to use for `stocktake <entity> edit` (default: $EDITOR)
# editor: ""

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto
"#
    }

    fn create_entity_dirs(root: &Path) -> Result<(), ProjectError> {
        let dirs = [
            "catalog/categories",
            "catalog/products",
            "purchasing/suppliers",
            "purchasing/orders",
        ];

        for dir in dirs {
            std::fs::create_dir_all(root.join(dir))
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(())
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .stocktake configuration directory
    pub fn stocktake_dir(&self) -> PathBuf {
        self.root.join(".stocktake")
    }

    /// Get the path for a new entity file
    pub fn entity_path(&self, prefix: EntityPrefix, id: &EntityId) -> PathBuf {
        self.root
            .join(Self::entity_directory(prefix))
            .join(format!("{}.stk.yaml", id))
    }

    /// Get the directory for a given entity prefix
    pub fn entity_directory(prefix: EntityPrefix) -> &'static str {
        match prefix {
            EntityPrefix::Cat => "catalog/categories",
            EntityPrefix::Prod => "catalog/products",
            EntityPrefix::Sup => "purchasing/suppliers",
            EntityPrefix::Po => "purchasing/orders",
        }
    }

    /// Get the absolute directory for a given entity prefix
    pub fn entity_dir(&self, prefix: EntityPrefix) -> PathBuf {
        self.root.join(Self::entity_directory(prefix))
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a stocktake project (searched from {searched_from:?}). Run 'stocktake init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("stocktake project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.stocktake_dir().exists());
        assert!(project.stocktake_dir().join("config.yaml").exists());
        assert!(project.root().join("catalog/categories").is_dir());
        assert!(project.root().join("catalog/products").is_dir());
        assert!(project.root().join("purchasing/suppliers").is_dir());
        assert!(project.root().join("purchasing/orders").is_dir());
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
    }

    #[test]
    fn test_project_discover_finds_marker() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("some/nested/dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let project = Project::discover_from(&subdir).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_discover_fails_without_marker() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }

    #[test]
    fn test_entity_path_uses_prefix_directory() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        let id = EntityId::new(EntityPrefix::Prod);

        let path = project.entity_path(EntityPrefix::Prod, &id);
        assert!(path.starts_with(project.root().join("catalog/products")));
        assert!(path.to_string_lossy().ends_with(".stk.yaml"));
    }
}
