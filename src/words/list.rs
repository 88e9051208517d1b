use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::{fs, path::Path};

use crate::error::WordListError;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// The canonical, read-only list of words a game draws from.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WordList {
    pub name: String,
    #[serde(default)]
    pub size: u32,
    pub words: Vec<String>,
}

impl WordList {
    pub fn new(name: impl Into<String>, words: Vec<String>) -> Self {
        Self {
            name: name.into(),
            size: words.len() as u32,
            words,
        }
    }

    /// One of the lists bundled into the binary, e.g. `"polish"`.
    pub fn embedded(name: &str) -> Result<Self, WordListError> {
        let file_name = format!("{name}.json");
        let file = LANG_DIR
            .get_file(&file_name)
            .ok_or_else(|| WordListError::NotFound(file_name.clone()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| WordListError::NotUtf8(file_name.clone()))?;

        Ok(from_str::<WordList>(contents)?.normalized())
    }

    /// Reads a user-supplied list. `.json` files use the bundled schema,
    /// anything else is one word per line with `#` comments.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WordListError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| WordListError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            return Ok(from_str::<WordList>(&contents)?.normalized());
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string());
        let words = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        Ok(Self::new(name, words))
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    // blank entries would surface as empty cards
    fn normalized(mut self) -> Self {
        self.words.retain(|w| !w.trim().is_empty());
        self.size = self.words.len() as u32;
        self
    }
}
