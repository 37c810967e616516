// ride_sim/src/simulation/config/resolver.rs

use super::catalog::PrefabCatalog;
use super::ConfigLoadError;
use figment::value::{Dict, Tag, Value};

/// Prefabs may build on each other, but a chain longer than this is treated as
/// a cycle.
const MAX_PREFAB_DEPTH: usize = 16;

/// Expands every `from = "..."` reference in `vehicle` against the catalog.
///
/// The referenced prefab is resolved first, then the keys next to `from` are
/// deep-merged over it. The `from` keys themselves never reach the output.
pub fn resolve_vehicle_value(
    vehicle: &Value,
    catalog: &PrefabCatalog,
) -> Result<Value, ConfigLoadError> {
    resolve_value_recursively(vehicle, catalog, 0)
}

/// Merges `overrides` into `base`, recursing into tables present on both sides.
/// A table that carries its own `from` replaces the base entry wholesale.
pub(crate) fn deep_merge(base: &mut Dict, overrides: &Dict) {
    for (key, override_val) in overrides {
        if override_val
            .as_dict()
            .is_some_and(|d| d.contains_key("from"))
        {
            base.insert(key.clone(), override_val.clone());
            continue;
        }

        if let Some(base_val) = base.get_mut(key) {
            if let (Some(base_sub), Some(override_sub)) = (base_val.as_dict(), override_val.as_dict()) {
                let mut merged = base_sub.clone();
                deep_merge(&mut merged, override_sub);
                *base_val = Value::Dict(Tag::Default, merged);
                continue;
            }
        }
        base.insert(key.clone(), override_val.clone());
    }
}

fn resolve_value_recursively(
    value: &Value,
    catalog: &PrefabCatalog,
    depth: usize,
) -> Result<Value, ConfigLoadError> {
    // --- Resolve the node itself ---
    let reference = value
        .as_dict()
        .and_then(|dict| dict.get("from").and_then(Value::as_str).map(|key| (dict, key)));

    let current_node = match reference {
        Some((dict, from_key)) => {
            if depth >= MAX_PREFAB_DEPTH {
                return Err(ConfigLoadError::PrefabTooDeep(from_key.to_string()));
            }
            let base = catalog
                .get(from_key)
                .ok_or_else(|| ConfigLoadError::UnknownPrefab(from_key.to_string()))?;
            let mut merged = resolve_value_recursively(base, catalog, depth + 1)?
                .into_dict()
                .ok_or_else(|| ConfigLoadError::PrefabNotATable(from_key.to_string()))?;
            deep_merge(&mut merged, dict);
            Value::Dict(Tag::Default, merged)
        }
        None => value.clone(),
    };

    // --- Then its children ---
    match current_node {
        Value::Dict(tag, dict) => {
            let mut resolved = Dict::new();
            for (key, child) in &dict {
                if key == "from" {
                    continue;
                }
                resolved.insert(key.clone(), resolve_value_recursively(child, catalog, depth)?);
            }
            Ok(Value::Dict(tag, resolved))
        }
        Value::Array(tag, items) => {
            let resolved = items
                .iter()
                .map(|item| resolve_value_recursively(item, catalog, depth))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(tag, resolved))
        }
        leaf => Ok(leaf),
    }
}
