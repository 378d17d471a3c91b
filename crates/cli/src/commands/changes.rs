//! Planned writes of generated files, compared against what is on disk.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use console::style;
use nullobj_core::GeneratedSource;
use similar::{ChangeTag, TextDiff};

/// A generated file and the current content at its destination.
#[derive(Debug)]
pub struct FileChange {
    /// Path relative to the output directory.
    pub rel_path: String,
    /// Content to write.
    pub new_content: String,
    /// Current content (None if the file doesn't exist).
    pub existing_content: Option<String>,
}

impl FileChange {
    /// The destination does not exist yet.
    pub fn is_new(&self) -> bool {
        self.existing_content.is_none()
    }

    /// The destination exists with different content.
    pub fn is_modified(&self) -> bool {
        match &self.existing_content {
            Some(existing) => existing != &self.new_content,
            None => false,
        }
    }

    /// Unified diff against the current content, or `None` when nothing
    /// would change or the file is new.
    pub fn generate_diff(&self) -> Option<String> {
        let existing = self.existing_content.as_ref()?;
        if existing == &self.new_content {
            return None;
        }

        let diff = TextDiff::from_lines(existing, &self.new_content);
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n",
            style(format!("--- {} (current)", self.rel_path)).bold()
        ));
        output.push_str(&format!(
            "{}\n",
            style(format!("+++ {} (generated)", self.rel_path)).bold()
        ));

        for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
            if idx > 0 {
                output.push_str("...\n");
            }
            for op in group {
                for change in diff.iter_changes(op) {
                    let mut line = match change.tag() {
                        ChangeTag::Delete => format!("-{}", change.value()),
                        ChangeTag::Insert => format!("+{}", change.value()),
                        ChangeTag::Equal => format!(" {}", change.value()),
                    };
                    if change.missing_newline() {
                        line.push('\n');
                    }
                    let styled = match change.tag() {
                        ChangeTag::Delete => style(line).red().to_string(),
                        ChangeTag::Insert => style(line).green().to_string(),
                        ChangeTag::Equal => line,
                    };
                    output.push_str(&styled);
                }
            }
        }

        Some(output)
    }
}

/// Pair every generated source with the current content under `out_dir`.
pub fn collect_file_changes(
    out_dir: &Path,
    sources: &[GeneratedSource],
) -> Result<Vec<FileChange>, String> {
    sources
        .iter()
        .map(|source| {
            let target = out_dir.join(&source.file_name);
            let existing_content = if target.exists() {
                Some(
                    fs::read_to_string(&target)
                        .map_err(|err| format!("Failed to read {}: {err}", target.display()))?,
                )
            } else {
                None
            };
            Ok(FileChange {
                rel_path: source.file_name.clone(),
                new_content: source.text.clone(),
                existing_content,
            })
        })
        .collect()
}

/// Companion files under `out_dir` (names ending in `file_name_suffix`) that
/// are not among `sources`, sorted by name. A missing directory has none.
pub fn collect_stale_files(
    out_dir: &Path,
    file_name_suffix: &str,
    sources: &[GeneratedSource],
) -> Result<Vec<String>, String> {
    if !out_dir.is_dir() {
        return Ok(Vec::new());
    }
    let read_err = |err: std::io::Error| format!("Failed to read {}: {err}", out_dir.display());
    let produced: HashSet<&str> = sources
        .iter()
        .map(|source| source.file_name.as_str())
        .collect();

    let mut stale = Vec::new();
    for entry in fs::read_dir(out_dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if !entry.file_type().map_err(read_err)?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if name.ends_with(file_name_suffix) && !produced.contains(name.as_str()) {
            stale.push(name);
        }
    }
    stale.sort();
    Ok(stale)
}

/// Delete `rel_paths` under `out_dir`. Returns how many were removed.
pub fn remove_stale_files(out_dir: &Path, rel_paths: &[String]) -> Result<usize, String> {
    for rel_path in rel_paths {
        fs::remove_file(out_dir.join(rel_path))
            .map_err(|err| format!("Failed to remove {rel_path}: {err}"))?;
    }
    Ok(rel_paths.len())
}

/// Write every new or modified file. Returns `(created, modified)`.
pub fn apply_changes(out_dir: &Path, changes: &[FileChange]) -> Result<(usize, usize), String> {
    let mut created = 0;
    let mut modified = 0;

    for change in changes {
        if change.is_new() || change.is_modified() {
            fs::create_dir_all(out_dir)
                .map_err(|err| format!("Failed to create directory: {err}"))?;
            fs::write(out_dir.join(&change.rel_path), &change.new_content)
                .map_err(|err| format!("Failed to write {}: {err}", change.rel_path))?;

            if change.is_new() {
                created += 1;
            } else {
                modified += 1;
            }
        }
    }

    Ok((created, modified))
}
