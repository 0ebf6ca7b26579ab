//! The `extra.cotor` block of `composer.json`, tracking installed tools and their extensions.
//!
//! ```json
//! "extra": {
//!     "cotor": {
//!         "phpstan/phpstan": "^1.10",
//!         "extensions": {
//!             "phpstan/phpstan": { "phpstan/phpstan-symfony": "^1.3" }
//!         }
//!     }
//! }
//! ```

use serde_json::{Map, Value};
use crate::manifest::ComposerJson;
use crate::package::{Package, WILDCARD};

pub const COMPOSER_EXTRA: &str = "extra";
pub const COTOR_EXTRA: &str = "cotor";
pub const COTOR_EXTRA_EXTENSIONS: &str = "extensions";
/// Key an old release wrongly stored the block under.
const LEGACY_EXTRAS: &str = "extras";

/// Extensions tracked for one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedExtensions {
    pub tool: String,
    pub extensions: Vec<(String, String)>,
}

impl ComposerJson {
    fn cotor_block(&self) -> Option<&Map<String, Value>> {
        self.json()
            .get(COMPOSER_EXTRA)?
            .as_object()?
            .get(COTOR_EXTRA)?
            .as_object()
    }

    /// Tracked tools as `(composer name, constraint)` in document order.
    pub fn tracked_tools(&self) -> Vec<(String, String)> {
        let Some(block) = self.cotor_block() else {
            return Vec::new();
        };
        block
            .iter()
            .filter(|(name, _)| name.as_str() != COTOR_EXTRA_EXTENSIONS)
            .map(|(name, version)| (name.clone(), constraint_of(version)))
            .collect()
    }

    /// Tracked extensions grouped per tool in document order.
    pub fn tracked_extensions(&self) -> Vec<TrackedExtensions> {
        let Some(extensions) = self
            .cotor_block()
            .and_then(|block| block.get(COTOR_EXTRA_EXTENSIONS))
            .and_then(Value::as_object)
        else {
            return Vec::new();
        };
        extensions
            .iter()
            .map(|(tool, packages)| TrackedExtensions {
                tool: tool.clone(),
                extensions: packages
                    .as_object()
                    .map(|packages| {
                        packages
                            .iter()
                            .map(|(name, version)| (name.clone(), constraint_of(version)))
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Records `package` in the tools block.
    ///
    /// An existing entry is only overwritten when `replace` is set or it still holds the
    /// wildcard. Returns whether the document changed.
    pub fn track_tool(&mut self, package: &Package, replace: bool) -> bool {
        let key = package.composer_name();
        let block = cotor_block_mut(self.json_mut());
        let overwrite = match block.get(&key) {
            None => true,
            Some(existing) => replace || constraint_of(existing) == WILDCARD,
        };
        if !overwrite {
            return false;
        }
        let changed = block.get(&key).and_then(Value::as_str) != Some(package.version());
        block.insert(key, Value::String(package.version().to_string()));
        sort_keys(block);
        changed
    }

    /// Records `extension` under `extensions.<tool>`, sorting every level on the way.
    pub fn track_extension(&mut self, tool: &Package, extension: &Package) {
        let block = cotor_block_mut(self.json_mut());
        let extensions = object_entry(block, COTOR_EXTRA_EXTENSIONS);
        let packages = object_entry(extensions, &tool.composer_name());
        packages.insert(
            extension.composer_name(),
            Value::String(extension.version().to_string()),
        );
        sort_keys(packages);
        sort_keys(extensions);
        sort_keys(block);
    }

    /// Moves a block stored under `extras.cotor` to `extra.cotor`.
    /// Returns whether anything was migrated.
    pub fn migrate_legacy_extras(&mut self) -> bool {
        let legacy = self
            .json()
            .get(LEGACY_EXTRAS)
            .and_then(Value::as_object)
            .and_then(|extras| extras.get(COTOR_EXTRA))
            .cloned();
        let Some(legacy) = legacy else {
            return false;
        };
        let json = self.json_mut();
        let retained: Map<String, Value> = std::mem::take(json)
            .into_iter()
            .filter(|(key, _)| key != LEGACY_EXTRAS)
            .collect();
        *json = retained;
        object_entry(json, COMPOSER_EXTRA).insert(COTOR_EXTRA.to_string(), legacy);
        true
    }
}

fn constraint_of(value: &Value) -> String {
    value.as_str().unwrap_or(WILDCARD).to_string()
}

fn cotor_block_mut(json: &mut Map<String, Value>) -> &mut Map<String, Value> {
    let extra = object_entry(json, COMPOSER_EXTRA);
    object_entry(extra, COTOR_EXTRA)
}

/// Returns the object stored at `key`, inserting (or replacing a non-object value with)
/// an empty one.
fn object_entry<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let entry = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    match entry {
        Value::Object(object) => object,
        _ => unreachable!("entry was just made an object"),
    }
}

fn sort_keys(map: &mut Map<String, Value>) {
    let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    map.extend(entries);
}
