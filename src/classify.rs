use std::fs;
use std::path::Path;

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::config::Rules;

/// The slice of package.json the classifier cares about. Unknown fields are
/// ignored; dependency version specifiers are irrelevant.
#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

/// Returns true when `dir/package.json` declares any configured Vue
/// signature among its regular or dev dependencies.
///
/// Any read or parse failure classifies the directory as not-a-project;
/// malformed manifests are a normal occurrence during a home-directory walk
/// and never surface as errors.
pub fn is_vue_project(dir: &Path, rules: &Rules) -> bool {
    let manifest_path = dir.join("package.json");
    let contents = match fs::read_to_string(&manifest_path) {
        Ok(contents) => contents,
        Err(_) => return false,
    };
    let manifest: Manifest = match serde_json::from_str(&contents) {
        Ok(manifest) => manifest,
        Err(_) => return false,
    };

    manifest
        .dependencies
        .keys()
        .chain(manifest.dev_dependencies.keys())
        .any(|name| rules.signatures.contains(&name.to_ascii_lowercase()))
}
