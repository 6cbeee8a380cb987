//! Path-manifest checker.
//!
//! A manifest is a newline-delimited list of space-separated path templates,
//! each containing the literal `${OVS_PATH}` placeholder. Substituting a root
//! directory yields concrete paths, which are then filtered by existence.

use std::io::BufRead;
use std::path::PathBuf;

use log::debug;

/// Placeholder substituted with the root directory.
pub const PLACEHOLDER: &str = "${OVS_PATH}";

/// Substitute the root directory into one path template.
pub fn expand_template(template: &str, root: &str) -> PathBuf {
    PathBuf::from(template.replace(PLACEHOLDER, root))
}

/// Expand every template in the manifest and return the paths that exist on
/// the filesystem, in manifest order. Paths that do not exist are skipped.
pub fn existing_paths(manifest: impl BufRead, root: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut found = vec![];
    for line in manifest.lines() {
        let line = line?;
        for template in line.split(' ').filter(|t| !t.is_empty()) {
            let path = expand_template(template, root);
            if path.exists() {
                found.push(path);
            } else {
                debug!("no such path: {}", path.display());
            }
        }
    }
    Ok(found)
}
