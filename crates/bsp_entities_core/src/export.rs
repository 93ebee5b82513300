//! Export registered entity class definitions to JSON for editor integration.
//!
//! Generates a machine-readable description of every registered classname:
//! its base class plus the merged set of bindable keys with their converter
//! families. Map editors use this for key autocompletion on known classes.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::registry::EntityClassRegistry;

/// Serialized description of one registered entity class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassExport {
    pub name: String,

    /// Classname of the embedded base variant, absent for chain roots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    pub fields: Vec<FieldExport>,
}

/// Serialized description of one bindable key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldExport {
    pub key: String,

    /// Converter family: "text", "bool", "int", "float", "vector" or "color"
    #[serde(rename = "type")]
    pub kind: String,
}

/// Generate export data for all registered entity classes.
///
/// Classes are sorted by name and each class lists its full merged key set,
/// inherited entries included, sorted by key. Separated from file I/O to
/// enable testing.
pub fn build_export_data(registry: &EntityClassRegistry) -> Vec<ClassExport> {
    let mut classes: Vec<ClassExport> = registry
        .iter()
        .map(|info| {
            let mut fields: Vec<FieldExport> = registry
                .bindings_for(info.type_id)
                .map(|table| {
                    table
                        .iter()
                        .map(|(key, spec)| FieldExport {
                            key: key.to_string(),
                            kind: spec.kind.name().to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default();
            fields.sort_by(|a, b| a.key.cmp(&b.key));

            // A base outside the registry is the plain record, not a class.
            let base = info
                .base
                .and_then(|base_id| registry.info_of(base_id))
                .map(|base_info| base_info.class_name.to_string());

            ClassExport {
                name: info.class_name.to_string(),
                base,
                fields,
            }
        })
        .collect();

    classes.sort_by(|a, b| a.name.cmp(&b.name));
    classes
}

/// Write the class definitions of all registered entity classes to a JSON
/// file.
///
/// # Example
///
/// ```no_run
/// use bsp_entities_core::export::write_class_definitions;
/// use bsp_entities_core::registry::EntityClassRegistry;
///
/// let registry = EntityClassRegistry::build()?;
/// write_class_definitions(&registry, "entity-classes.json")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_class_definitions(
    registry: &EntityClassRegistry,
    output_path: impl AsRef<Path>,
) -> io::Result<()> {
    let path = output_path.as_ref();
    let classes = build_export_data(registry);

    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &classes)?;

    info!(
        "Exported {} entity class definitions to {}",
        classes.len(),
        path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(classes: &'a [ClassExport], name: &str) -> &'a ClassExport {
        classes
            .iter()
            .find(|class| class.name == name)
            .unwrap_or_else(|| panic!("class {name:?} missing from export"))
    }

    #[test]
    fn test_export_lists_merged_fields_sorted() {
        let registry = EntityClassRegistry::build().unwrap();
        let classes = build_export_data(&registry);

        let environment = find(&classes, "light_environment");
        assert_eq!(environment.base.as_deref(), Some("light"));

        let keys: Vec<&str> = environment.fields.iter().map(|field| field.key.as_str()).collect();
        assert!(keys.contains(&"origin"));
        assert!(keys.contains(&"pitch"));
        assert!(keys.windows(2).all(|pair| pair[0] <= pair[1]));

        let light_field = environment.fields.iter().find(|field| field.key == "_light").unwrap();
        assert_eq!(light_field.kind, "color");
    }

    #[test]
    fn test_chain_roots_export_no_base() {
        let registry = EntityClassRegistry::build().unwrap();
        let classes = build_export_data(&registry);
        assert!(find(&classes, "worldspawn").base.is_none());
    }

    #[test]
    fn test_classes_sorted_by_name() {
        let registry = EntityClassRegistry::build().unwrap();
        let classes = build_export_data(&registry);
        assert!(classes.windows(2).all(|pair| pair[0].name <= pair[1].name));
    }

    #[test]
    fn test_write_class_definitions_produces_valid_json() {
        let registry = EntityClassRegistry::build().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entity-classes.json");

        write_class_definitions(&registry, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        let array = parsed.as_array().unwrap();
        assert!(!array.is_empty());
        assert!(array.iter().any(|class| class["name"] == "light"));

        // Chain roots serialize without a base key at all.
        let worldspawn = array.iter().find(|class| class["name"] == "worldspawn").unwrap();
        assert!(worldspawn.get("base").is_none());
    }
}
