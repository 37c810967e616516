// ride_sim/src/simulation/config/catalog.rs

//! The `PrefabCatalog`: every `.toml` under the catalog root, keyed by its
//! dotted relative path.

use bevy::prelude::*;
use figment::{
    providers::{Format, Toml},
    value::Value,
    Figment,
};
use std::{collections::HashMap, path::Path};
use walkdir::WalkDir;

/// Default location of the catalog, relative to the working directory.
pub const DEFAULT_CATALOG_ROOT: &str = "assets/catalog";

/// Raw prefab tables. The key is a namespace string such as
/// `"vehicles.skimmer"` for `assets/catalog/vehicles/skimmer.toml`.
#[derive(Resource, Default, Debug, Clone)]
pub struct PrefabCatalog(pub HashMap<String, Value>);

impl PrefabCatalog {
    /// Walks `root` and parses every `.toml` file below it. Files that fail to
    /// parse are logged and skipped; a missing root gives an empty catalog.
    pub fn load_from_dir(root: &Path) -> Self {
        let mut catalog = Self::default();
        if !root.exists() {
            warn!(
                "[CONFIG] Catalog directory not found at {:?}, no prefabs will be loaded.",
                root
            );
            return catalog;
        }

        info!("[CONFIG] Loading prefab catalog from: {:?}", root);

        for entry in WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "toml"))
        {
            let path = entry.path();
            let Some(key) = catalog_key(root, path) else {
                continue;
            };

            match Figment::new().merge(Toml::file(path)).extract::<Value>() {
                Ok(data) => {
                    debug!("[CONFIG] Loaded catalog item: '{}'", key);
                    catalog.0.insert(key, data);
                }
                Err(e) => {
                    error!("[CONFIG] Failed to load catalog item from {:?}: {}", path, e);
                }
            }
        }
        catalog
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }
}

/// `root/vehicles/skimmer.toml` -> `"vehicles.skimmer"`.
fn catalog_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn keys_are_dotted_relative_paths() {
        let root = PathBuf::from("assets").join("catalog");
        let path = root.join("vehicles").join("skimmer.toml");
        assert_eq!(catalog_key(&root, &path).as_deref(), Some("vehicles.skimmer"));
        assert_eq!(catalog_key(&root, Path::new("elsewhere/x.toml")), None);
    }

    #[test]
    fn missing_root_gives_an_empty_catalog() {
        let catalog = PrefabCatalog::load_from_dir(Path::new("does/not/exist"));
        assert!(catalog.0.is_empty());
    }
}
