use crate::error::{Error, Result};
use crate::models::smart::AttributeDefinition;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const BUNDLED: &str = include_str!("../../assets/smart_attributes.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    attribute: Vec<RawDefinition>,
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
    id:   i64,
    name: String,
}

/// Known attribute ids and their names, in listing order.
///
/// Loaded once and never mutated, so a shared reference can be handed to
/// assemblers running on several threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeCatalog {
    definitions: Vec<AttributeDefinition>,
    index:       BTreeMap<u8, usize>,
}

impl AttributeCatalog {
    /// Parse a TOML listing of `[[attribute]]` tables.
    pub fn load(source: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(source)
            .map_err(|e| Error::Catalog(format!("invalid catalog: {}", e)))?;

        let mut catalog = AttributeCatalog::default();
        for (n, raw) in file.attribute.into_iter().enumerate() {
            let id = u8::try_from(raw.id)
                .ok()
                .filter(|id| *id != 0)
                .ok_or_else(|| Error::Catalog(format!(
                    "entry {}: id {} outside 1..=255", n + 1, raw.id
                )))?;

            let name = raw.name.trim();
            if name.is_empty() {
                return Err(Error::Catalog(format!("entry {}: id {} has no name", n + 1, id)));
            }
            if catalog.index.contains_key(&id) {
                return Err(Error::Catalog(format!("entry {}: duplicate id {}", n + 1, id)));
            }

            catalog.index.insert(id, catalog.definitions.len());
            catalog.definitions.push(AttributeDefinition { id, name: name.to_string() });
        }
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::load(&text)
    }

    /// The standard ATA attribute table shipped with the binary.
    pub fn bundled() -> Result<Self> {
        Self::load(BUNDLED)
    }

    pub fn get(&self, id: u8) -> Option<&AttributeDefinition> {
        self.index.get(&id).map(|&i| &self.definitions[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttributeDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize { self.definitions.len() }
    pub fn is_empty(&self) -> bool { self.definitions.is_empty() }
}

impl<'a> IntoIterator for &'a AttributeCatalog {
    type Item = &'a AttributeDefinition;
    type IntoIter = std::slice::Iter<'a, AttributeDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.definitions.iter()
    }
}
