use crate::engine::{EngineConfig, SavedSelections};
use crate::recipe::{NewRecipe, Recipe};
use crate::RecipeId;
use anyhow::{Context, Result};
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Location of the host-owned preference files. Each file holds exactly the
/// flat serialized string of one selection store.
#[derive(Debug, Clone)]
pub struct PrefsPaths {
    pub root: PathBuf,
}

impl PrefsPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn favorites(&self) -> PathBuf { self.root.join("favorites.txt") }
    fn shopping_list(&self) -> PathBuf { self.root.join("shopping_list.txt") }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    let mut f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("opening {}", path.display())),
    };
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    Ok(Some(buf.trim().to_string()))
}

fn write_string(root: &Path, path: &Path, contents: &str) -> Result<()> {
    create_dir_all(root)?;
    let mut f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    f.write_all(contents.as_bytes())?;
    Ok(())
}

/// `None` when the preference was never saved.
pub fn load_favorites(paths: &PrefsPaths) -> Result<Option<String>> {
    read_optional(&paths.favorites())
}

pub fn save_favorites(paths: &PrefsPaths, serialized: &str) -> Result<()> {
    write_string(&paths.root, &paths.favorites(), serialized)
}

pub fn load_shopping_list(paths: &PrefsPaths) -> Result<Option<String>> {
    read_optional(&paths.shopping_list())
}

pub fn save_shopping_list(paths: &PrefsPaths, serialized: &str) -> Result<()> {
    write_string(&paths.root, &paths.shopping_list(), serialized)
}

/// Both preference files. A file that cannot be read is logged and treated as never saved.
pub fn read_saved_selections(paths: &PrefsPaths) -> SavedSelections {
    let read = |what: &str, result: Result<Option<String>>| {
        result.unwrap_or_else(|err| {
            tracing::warn!(error = %err, what, "ignoring unreadable preference file");
            None
        })
    };
    SavedSelections {
        favorites: read("favorites", load_favorites(paths)),
        shopping_list: read("shopping_list", load_shopping_list(paths)),
    }
}

/// Engine configuration from a JSON file, or the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else { return Ok(EngineConfig::default()) };
    let f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

/// Reads a catalog from a `.json` file (array or single object), a `.jsonl`
/// file, or a directory of them. Ids are assigned from 0 in file order,
/// files sorted by path.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<Recipe>> {
    let path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if path.is_file() {
        files.push(path.to_path_buf());
    } else {
        anyhow::bail!("catalog path {} does not exist", path.display());
    }

    let mut drafts: Vec<NewRecipe> = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut drafts)?;
        } else {
            read_json(&file, &mut drafts)?;
        }
    }
    tracing::info!(count = drafts.len(), catalog = %path.display(), "read catalog");

    drafts
        .into_iter()
        .enumerate()
        .map(|(i, draft)| -> Result<Recipe> {
            let id = RecipeId::try_from(i).context("catalog too large")?;
            Ok(draft.with_id(id))
        })
        .collect()
}

fn read_jsonl(file: &Path, drafts: &mut Vec<NewRecipe>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let draft = serde_json::from_str(&line).with_context(|| format!("{}:{}", file.display(), n + 1))?;
        drafts.push(draft);
    }
    Ok(())
}

fn read_json(file: &Path, drafts: &mut Vec<NewRecipe>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader).with_context(|| format!("parsing {}", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                drafts.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => drafts.push(serde_json::from_value(json)?),
        _ => tracing::warn!(file = %file.display(), "ignoring catalog file without recipes"),
    }
    Ok(())
}
