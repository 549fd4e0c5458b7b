pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Resolve a structured input: an explicit file wins, then piped stdin.
/// None when neither is present so the caller can fall back to flags.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Some(file::read_document(path)?)),
        None => stdin::read_piped(),
    }
}
