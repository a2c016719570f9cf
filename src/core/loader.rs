//! Entity loading utilities
//!
//! This module provides generic utilities for loading entities from the
//! filesystem, reducing boilerplate in command implementations.

use miette::{IntoDiagnostic, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::entity::Entity;
use crate::core::identity::EntityPrefix;
use crate::core::project::Project;

/// Serialize an entity to its canonical `{id}.stk.yaml` location,
/// creating the entity directory if needed. Returns the written path.
pub fn save_entity<T: Entity>(
    project: &Project,
    prefix: EntityPrefix,
    entity: &T,
) -> Result<PathBuf> {
    let path = project.entity_path(prefix, entity.id());
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(entity).into_diagnostic()?;
    fs::write(&path, yaml).into_diagnostic()?;
    Ok(path)
}

/// Load all entities of type T from a directory
///
/// Walks the directory recursively for .yaml files and deserializes them,
/// so entity files may be organized into subdirectories. Files that fail
/// to parse are silently skipped.
pub fn load_all<T: DeserializeOwned + 'static>(dir: &Path) -> Result<Vec<T>> {
    let mut entities = Vec::new();

    if !dir.exists() {
        return Ok(entities);
    }

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().map_or(false, |e| e == "yaml") {
            if let Ok(content) = fs::read_to_string(path) {
                if let Ok(entity) = serde_yml::from_str::<T>(&content) {
                    entities.push(entity);
                }
            }
        }
    }

    Ok(entities)
}

/// Find an entity file by ID (supports partial matching)
///
/// Searches recursively for a file whose stem contains the given ID.
/// Returns the first match found.
pub fn find_entity_file(dir: &Path, id: &str) -> Option<PathBuf> {
    if !dir.exists() {
        return None;
    }

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().map_or(false, |e| e == "yaml") {
            let filename = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            if filename.contains(id) {
                return Some(path.to_path_buf());
            }
        }
    }

    None
}

/// Load a single entity by ID
///
/// Searches for an entity file matching the ID and deserializes it.
/// Returns the path and entity if found.
pub fn load_entity<T: DeserializeOwned + 'static>(dir: &Path, id: &str) -> Result<Option<(PathBuf, T)>> {
    if let Some(path) = find_entity_file(dir, id) {
        let content = fs::read_to_string(&path).into_diagnostic()?;
        let entity: T = serde_yml::from_str(&content).into_diagnostic()?;
        return Ok(Some((path, entity)));
    }
    Ok(None)
}
