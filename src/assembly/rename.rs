//! Rename normalizer.
//!
//! Versioned plugin filenames (`sonar-csharp-plugin-9.32.0.jar`) are renamed
//! to fixed canonical names (`sonar-csharp-plugin.jar`) so downstream
//! consumers can reference a stable filename. Rules are applied in
//! declaration order against the directory's immediate children.
//!
//! A rule matching more than one file is a packaging bug (two versions of the
//! same plugin staged at once) and fails the run rather than silently letting
//! the last match win.

use std::path::Path;

use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, info};

use crate::assembly::error::{AssemblyError, AssemblyResult};
use crate::assembly::scan::find_matching;
use crate::config::Config;

/// One compiled rename rule.
#[derive(Debug)]
pub struct RenameRule {
    /// Filename pattern the rule matches. Anchored to the whole filename.
    pub pattern: Regex,

    /// Canonical filename matches are renamed to.
    pub canonical: String,
}

/// Compiles the configured pattern → canonical-name map into rules,
/// preserving declaration order.
///
/// # Errors
///
/// Returns [`AssemblyError::InvalidPattern`] if a pattern does not compile.
/// [`Config::validate`] normally catches this earlier.
pub fn compile_rules(rules: &IndexMap<String, String>) -> AssemblyResult<Vec<RenameRule>> {
    rules
        .iter()
        .map(|(pattern, canonical)| {
            // Anchor so `sonar-csharp-plugin-.*\.jar` cannot match in the
            // middle of a longer filename.
            let anchored = format!("^(?:{pattern})$");
            let pattern = Regex::new(&anchored).map_err(|e| AssemblyError::InvalidPattern {
                pattern: anchored.clone(),
                message: e.to_string(),
            })?;
            Ok(RenameRule {
                pattern,
                canonical: canonical.clone(),
            })
        })
        .collect()
}

/// Compiles the rename rules declared in `config`.
///
/// # Errors
///
/// See [`compile_rules`].
pub fn rules_from_config(config: &Config) -> AssemblyResult<Vec<RenameRule>> {
    compile_rules(&config.rename_rules)
}

/// Applies each rule to the immediate children of `directory`.
///
/// Matching files are moved (not copied) to the rule's canonical name.
/// Re-running is a no-op: canonical names no longer match the versioned
/// patterns.
///
/// # Errors
///
/// Returns [`AssemblyError::AmbiguousRename`] if one rule matches several
/// files, or a write error if a rename fails.
pub fn normalize(directory: &Path, rules: &[RenameRule]) -> AssemblyResult<()> {
    for rule in rules {
        let matches = find_matching(directory, |name| rule.pattern.is_match(name))?;

        match matches.as_slice() {
            [] => {
                debug!(pattern = %rule.pattern, "rename rule matched nothing");
            }
            [single] => {
                let target = directory.join(&rule.canonical);
                std::fs::rename(single, &target)
                    .map_err(|e| AssemblyError::write(&target, e))?;
                info!(
                    from = %single.display(),
                    to = %target.display(),
                    "normalised plugin filename"
                );
            }
            many => {
                return Err(AssemblyError::AmbiguousRename {
                    pattern: rule.pattern.to_string(),
                    matches: many
                        .iter()
                        .map(|p| p.file_name().unwrap_or_default().to_string_lossy().into_owned())
                        .collect(),
                });
            }
        }
    }

    Ok(())
}
