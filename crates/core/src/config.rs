//! Generator options, loaded from `nullobj.toml`.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock Unity flavoured output:
//!
//! ```toml
//! type_suffix = "AsNullObj"
//! log_call = "UnityEngine.Debug.Log"
//!
//! [[completed_tasks]]
//! type_name = "UniTask"
//! completed = "UniTask.CompletedTask"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::decl::normalize_reference;
use crate::writer::DEFAULT_INDENT_WIDTH;

/// Default options file name looked up next to the input.
pub const CONFIG_FILE_NAME: &str = "nullobj.toml";

/// Errors raised while loading or validating options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The options file is not valid TOML or has unknown keys.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Options could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A field holds a value the generator cannot use.
    #[error("invalid config value for '{field}': {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Return-type convention whose stub returns an already completed value
/// instead of `default`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompletedTaskConvention {
    /// Unqualified, non-generic type name, e.g. `UniTask`.
    pub type_name: String,
    /// Expression returned by the stub, e.g. `UniTask.CompletedTask`.
    pub completed: String,
}

impl CompletedTaskConvention {
    fn new(type_name: &str, completed: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            completed: completed.to_string(),
        }
    }
}

/// Options controlling emitted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorOptions {
    /// Appended to the target name to form the companion name.
    pub type_suffix: String,
    /// Extension of generated files, without the dot.
    pub file_extension: String,
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Generator name written in the companion's leading comment.
    pub generator_name: String,
    /// Plain log call.
    pub log_call: String,
    /// Error-level log call.
    pub log_error_call: String,
    /// Warning-level log call.
    pub log_warning_call: String,
    /// Exception type thrown by throwing stubs.
    pub exception_type: String,
    /// Fire-and-forget async return conventions.
    pub completed_tasks: Vec<CompletedTaskConvention>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            type_suffix: "AsNullObj".to_string(),
            file_extension: "cs".to_string(),
            indent_width: DEFAULT_INDENT_WIDTH,
            generator_name: "NullObjectGenerator".to_string(),
            log_call: "UnityEngine.Debug.Log".to_string(),
            log_error_call: "UnityEngine.Debug.LogError".to_string(),
            log_warning_call: "UnityEngine.Debug.LogWarning".to_string(),
            exception_type: "System.Exception".to_string(),
            completed_tasks: vec![
                CompletedTaskConvention::new("UniTask", "UniTask.CompletedTask"),
                CompletedTaskConvention::new("Task", "System.Threading.Tasks.Task.CompletedTask"),
                CompletedTaskConvention::new(
                    "ValueTask",
                    "System.Threading.Tasks.ValueTask.CompletedTask",
                ),
            ],
        }
    }
}

impl GeneratorOptions {
    /// Parse and validate options from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(contents)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Render the options as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values that would produce uncompilable output.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("type_suffix", &self.type_suffix),
            ("file_extension", &self.file_extension),
            ("log_call", &self.log_call),
            ("log_error_call", &self.log_error_call),
            ("log_warning_call", &self.log_warning_call),
            ("exception_type", &self.exception_type),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if self.file_extension.starts_with('.') {
            return Err(ConfigError::Invalid {
                field: "file_extension",
                reason: format!("'{}' must not start with a dot", self.file_extension),
            });
        }
        if let Some(convention) = self
            .completed_tasks
            .iter()
            .find(|c| c.type_name.trim().is_empty() || c.completed.trim().is_empty())
        {
            return Err(ConfigError::Invalid {
                field: "completed_tasks",
                reason: format!(
                    "entry '{}' needs both type_name and completed",
                    convention.type_name
                ),
            });
        }
        Ok(())
    }

    /// Name of the companion type for `simple_name`.
    pub fn companion_name(&self, simple_name: &str) -> String {
        format!("{simple_name}{}", self.type_suffix)
    }

    /// Generated file name for `simple_name`, e.g. `FooAsNullObj.g.cs`.
    pub fn file_name(&self, simple_name: &str) -> String {
        format!("{simple_name}{}", self.file_name_suffix())
    }

    /// Ending shared by every generated companion file, e.g. `AsNullObj.g.cs`.
    pub fn file_name_suffix(&self) -> String {
        format!("{}.g.{}", self.type_suffix, self.file_extension)
    }

    /// Completed value for `return_type` when it follows a fire-and-forget
    /// convention. Only the unqualified, non-generic form matches.
    pub fn completed_value(&self, return_type: &str) -> Option<&str> {
        let name = normalize_reference(return_type);
        if name.contains('<') {
            return None;
        }
        let simple = name.rsplit('.').next().unwrap_or(name);
        self.completed_tasks
            .iter()
            .find(|convention| convention.type_name == simple)
            .map(|convention| convention.completed.as_str())
    }
}
