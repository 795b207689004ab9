//! On-disk component library: one JSON file per component plus index.json

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::component::{ComponentIndex, ExtractedComponent};
use crate::core::error::{Error, Result};

const INDEX_FILE: &str = "index.json";

pub struct ComponentStore {
    dir: PathBuf,
}

impl ComponentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn component_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    pub fn save(&self, component: &ExtractedComponent) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.component_path(&component.id);
        fs::write(&path, serde_json::to_string_pretty(component)?)?;
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<ExtractedComponent> {
        let path = self.component_path(id);
        if !path.exists() {
            return Err(Error::NotFound {
                kind: "component",
                name: id.to_string(),
            });
        }
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    fn component_files(&self) -> impl Iterator<Item = PathBuf> {
        WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension().is_some_and(|ext| ext == "json")
                    && p.file_name().is_some_and(|n| n != INDEX_FILE)
            })
    }

    /// Ids that already have a component file.
    pub fn existing_ids(&self) -> BTreeSet<String> {
        self.component_files()
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect()
    }

    /// Every readable component, in file name order. Unreadable files are
    /// logged and skipped.
    pub fn load_all(&self) -> Vec<ExtractedComponent> {
        self.component_files()
            .filter_map(|path| {
                let parsed = fs::read_to_string(&path)
                    .map_err(Error::from)
                    .and_then(|data| serde_json::from_str(&data).map_err(Error::from));
                match parsed {
                    Ok(component) => Some(component),
                    Err(e) => {
                        tracing::warn!("Skipping {}: {}", path.display(), e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Rebuild index.json from every component file.
    pub fn rebuild_index(&self) -> Result<ComponentIndex> {
        let index = ComponentIndex::build(&self.load_all());
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(INDEX_FILE), serde_json::to_string_pretty(&index)?)?;
        Ok(index)
    }

    pub fn by_aesthetic(&self, aesthetic: &str) -> Result<Vec<ExtractedComponent>> {
        let index = self.load_index()?;
        Ok(self.load_group(index.by_aesthetic.get(aesthetic)))
    }

    pub fn by_type(&self, component_type: &str) -> Result<Vec<ExtractedComponent>> {
        let index = self.load_index()?;
        Ok(self.load_group(index.by_type.get(component_type)))
    }

    pub fn by_screen(&self, screen_type: &str) -> Result<Vec<ExtractedComponent>> {
        let index = self.load_index()?;
        Ok(self.load_group(index.by_screen.get(screen_type)))
    }

    /// Components of one index group. Ids whose file went missing are skipped.
    fn load_group(&self, ids: Option<&Vec<String>>) -> Vec<ExtractedComponent> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| match self.load(id) {
                Ok(component) => Some(component),
                Err(Error::NotFound { .. }) => None,
                Err(e) => {
                    tracing::warn!("Skipping component {}: {}", id, e);
                    None
                }
            })
            .collect()
    }

    pub fn load_index(&self) -> Result<ComponentIndex> {
        let path = self.dir.join(INDEX_FILE);
        if !path.exists() {
            return Err(Error::MissingResource {
                resource: "Component index",
                path,
                remediation: "Run: refmatch extract".to_string(),
            });
        }
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}
