use std::path::Path;
use std::sync::LazyLock;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use crate::error::{CotorError, Result};

/// File name of the project manifest.
pub const COMPOSER_JSON: &str = "composer.json";

static FIRST_KEY_INDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^( +)""#).expect("valid indent pattern"));

/// A `composer.json` document.
///
/// Keys keep their original order and the indentation width (2 or 4 spaces) of the
/// source text is remembered, so writing an untouched document back produces the
/// same bytes plus a single trailing newline.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerJson {
    json: Map<String, Value>,
    indent: usize,
}

impl ComposerJson {
    /// Parses the raw text of a manifest.
    ///
    /// # Errors
    /// Returns a manifest error if `content` is not JSON or its root is not an object.
    pub fn parse(content: &str) -> Result<ComposerJson> {
        let value: Value = serde_json::from_str(content).map_err(CotorError::ManifestParse)?;
        let Value::Object(json) = value else {
            return Err(CotorError::ManifestNotObject);
        };
        Ok(ComposerJson {
            json,
            indent: detect_indent(content),
        })
    }

    /// Reads and parses the manifest at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ComposerJson> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CotorError::io(path, e))?;
        ComposerJson::parse(&content)
    }

    /// Serializes the whole document and replaces the file at `path`.
    ///
    /// The file is only touched once serialization has succeeded.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_pretty_string()?;
        std::fs::write(path, content).map_err(|e| CotorError::io(path, e))
    }

    pub fn json(&self) -> &Map<String, Value> {
        &self.json
    }

    pub fn json_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.json
    }

    pub fn set_json(&mut self, json: Map<String, Value>) {
        self.json = json;
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Pretty prints the document with the remembered indentation and a trailing newline.
    /// Slashes are never escaped.
    pub fn to_pretty_string(&self) -> Result<String> {
        let indent = " ".repeat(self.indent);
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.json
            .serialize(&mut serializer)
            .map_err(CotorError::ManifestSerialize)?;
        let mut content = String::from_utf8_lossy(&buf).into_owned();
        content.push('\n');
        Ok(content)
    }
}

/// Detects the indentation from the first indented key line: four or more spaces
/// mean 4, everything else (including minified documents) 2.
fn detect_indent(content: &str) -> usize {
    match FIRST_KEY_INDENT.captures(content) {
        Some(captures) if captures[1].len() >= 4 => 4,
        _ => 2,
    }
}
