use crate::error::Error;
use crate::json_values_replacer::{replace_json_values, ReplacementValue};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Loads test fixtures from disk, optionally substituting `%key%`
/// placeholders before parsing.
pub struct FileLoader;

impl FileLoader {
    pub fn load_string<P: AsRef<Path>>(path: P) -> Result<String, Error> {
        let path = path.as_ref();

        fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.display().to_string(),
            source,
        })
    }

    /// Loads a JSON fixture, applies the replacements and returns the
    /// resulting text. The substituted document must still parse.
    pub fn load_json_string_with_replacements<P: AsRef<Path>>(
        path: P,
        values: &HashMap<String, ReplacementValue>,
    ) -> Result<String, Error> {
        let path = path.as_ref();
        let contents = Self::load_string(path)?;
        let replaced = replace_json_values(values, &contents);

        Self::parse_json(path, &replaced)?;
        Ok(replaced)
    }

    pub fn load_json_value<P: AsRef<Path>>(path: P) -> Result<Value, Error> {
        let path = path.as_ref();
        let contents = Self::load_string(path)?;

        Self::parse_json(path, &contents)
    }

    pub fn load_json_value_with_replacements<P: AsRef<Path>>(
        path: P,
        values: &HashMap<String, ReplacementValue>,
    ) -> Result<Value, Error> {
        let path = path.as_ref();
        let contents = Self::load_string(path)?;
        let replaced = replace_json_values(values, &contents);

        Self::parse_json(path, &replaced)
    }

    fn parse_json(path: &Path, contents: &str) -> Result<Value, Error> {
        serde_json::from_str(contents).map_err(|source| Error::InvalidJsonFile {
            path: path.display().to_string(),
            source,
        })
    }
}
