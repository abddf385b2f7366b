//! Resource catalog loading and management.
//!
//! Resource densities feed vessel mass and the shielding surcharge for
//! high-energy cargo. The catalog is read from a CSV file with a `name` and a
//! `density` (tonnes per unit) column; a built-in catalog covers the stock
//! resources.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const BUILTIN_CATALOG: &str = include_str!("../data/resources.csv");

/// Physical properties of one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    pub name: String,
    /// Mass of one unit in tonnes.
    pub density: f64,
}

impl ResourceDefinition {
    /// Validate resource properties for correctness.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::ResourceCatalog {
                message: "resource name must not be empty".to_string(),
            });
        }
        if !self.density.is_finite() || self.density < 0.0 {
            return Err(Error::ResourceCatalog {
                message: format!(
                    "density for '{}' must be a finite non-negative number",
                    self.name
                ),
            });
        }
        Ok(())
    }
}

/// Collection of resource definitions loaded from a CSV file.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    resources: HashMap<String, ResourceDefinition>,
    source: Option<PathBuf>,
}

impl ResourceCatalog {
    /// Catalog of stock resources compiled into the library.
    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_CATALOG.as_bytes())
    }

    /// Load a resource catalog from a file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut catalog = Self::from_reader(file)?;
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Load a resource catalog from a reader (e.g., file or in-memory buffer).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| Error::ResourceCatalog {
                message: format!("failed to read resource catalog headers: {err}"),
            })?
            .clone();

        let normalize = |s: &str| {
            s.to_ascii_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect::<String>()
        };
        let normalized_headers: Vec<String> = headers.iter().map(&normalize).collect();

        let synonyms: &[(&str, &[&str])] = &[
            ("name", &["name", "resource", "resource_name"]),
            (
                "density",
                &["density", "density_t", "density_t_per_unit", "tonnes_per_unit"],
            ),
        ];

        let mut index_map: BTreeMap<&str, usize> = BTreeMap::new();
        for (canon, alts) in synonyms {
            if let Some(i) = alts.iter().find_map(|alt| {
                let alt_n = normalize(alt);
                normalized_headers.iter().position(|h| *h == alt_n)
            }) {
                index_map.insert(*canon, i);
            }
        }

        let missing: Vec<&str> = ["name", "density"]
            .into_iter()
            .filter(|c| !index_map.contains_key(c))
            .collect();
        if !missing.is_empty() {
            return Err(Error::ResourceCatalog {
                message: format!(
                    "resource catalog missing required columns: {}. Available: {}",
                    missing.join(", "),
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        let mut resources = HashMap::new();
        for (offset, result) in csv_reader.records().enumerate() {
            // Header is line 1.
            let row = offset + 2;
            let record = result?;
            let get = |field: &str| -> Option<String> {
                index_map
                    .get(field)
                    .and_then(|&i| record.get(i))
                    .map(|s| s.trim().to_string())
            };

            let name = get("name").unwrap_or_default();
            let density = get("density")
                .ok_or_else(|| Error::ResourceCatalog {
                    message: format!("missing density for resource '{name}' at row {row}"),
                })?
                .parse::<f64>()
                .map_err(|e| Error::ResourceCatalog {
                    message: format!("invalid density for resource '{name}' at row {row}: {e}"),
                })?;

            let definition = ResourceDefinition { name, density };
            definition.validate()?;

            let key = normalize_name(&definition.name);
            if resources.contains_key(&key) {
                return Err(Error::DuplicateResource { name: key });
            }
            resources.insert(key, definition);
        }

        Ok(Self {
            resources,
            source: None,
        })
    }

    /// Get a resource by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&ResourceDefinition> {
        self.resources.get(&normalize_name(name))
    }

    /// Density in tonnes per unit; unknown resources are massless.
    pub fn density(&self, name: &str) -> f64 {
        self.get(name).map(|r| r.density).unwrap_or(0.0)
    }

    /// Get all resources sorted by name.
    pub fn resources_sorted(&self) -> Vec<&ResourceDefinition> {
        let mut resources: Vec<&ResourceDefinition> = self.resources.values().collect();
        resources.sort_by(|a, b| a.name.cmp(&b.name));
        resources
    }

    /// Get the source path if the catalog was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
