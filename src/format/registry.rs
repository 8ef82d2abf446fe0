//! Format Registry
//!
//! In-memory registry of named rule sets. Built-in formats are embedded in
//! the binary; user and workspace directories can add or override them.

use super::schema::{Format, FormatError, RuleSet};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File suffix recognised when scanning format directories
pub const FORMAT_FILE_SUFFIX: &str = ".roster-format.toml";

/// Name of the format used when nothing else is configured
pub const DEFAULT_FORMAT: &str = "t20";

const BUILTIN_FORMATS: [(&str, &str); 2] = [
    (
        "t20.roster-format.toml",
        include_str!("../../resources/formats/t20.roster-format.toml"),
    ),
    (
        "odi.roster-format.toml",
        include_str!("../../resources/formats/odi.roster-format.toml"),
    ),
];

/// Loading priority of a format source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormatPriority {
    BuiltIn = 0,
    UserGlobal = 1,
    Workspace = 2,
}

/// A registered format with its source and priority
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFormat {
    pub format: Format,
    pub priority: FormatPriority,
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: HashMap<String, LoadedFormat>,
    active_format: Option<String>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self {
            formats: HashMap::new(),
            active_format: None,
        }
    }

    /// Registry holding the embedded formats, with the default one active
    pub fn with_builtin_formats() -> Self {
        let mut registry = Self::new();
        registry.add_builtin_formats();
        registry.set_active_format(DEFAULT_FORMAT);
        registry
    }

    /// Register the formats embedded in the binary
    pub fn add_builtin_formats(&mut self) {
        for (file_name, content) in BUILTIN_FORMATS {
            match Format::from_toml_str(content, file_name) {
                Ok(format) => {
                    self.register(format, FormatPriority::BuiltIn, None);
                }
                Err(e) => {
                    log::warn!("Failed to parse embedded format {}: {}", file_name, e);
                    if file_name.starts_with(DEFAULT_FORMAT) {
                        self.add_fallback_default_format();
                    }
                }
            }
        }
    }

    /// Hard-coded default used when the embedded TOML cannot be read
    fn add_fallback_default_format(&mut self) {
        let format = Format {
            name: DEFAULT_FORMAT.to_string(),
            version: Some("fallback".to_string()),
            description: Some("Fallback T20 rules".to_string()),
            rules: RuleSet::default(),
        };
        self.register(format, FormatPriority::BuiltIn, None);
    }

    /// Add a format at workspace priority, replacing any format with the same name
    pub fn add_format(&mut self, format: Format) {
        self.formats.insert(
            format.name.clone(),
            LoadedFormat {
                format,
                priority: FormatPriority::Workspace,
                source_path: None,
            },
        );
    }

    /// Insert unless a higher-priority format of the same name is present.
    /// Returns whether the format was stored.
    pub fn register(
        &mut self,
        format: Format,
        priority: FormatPriority,
        source_path: Option<PathBuf>,
    ) -> bool {
        if let Some(existing) = self.formats.get(&format.name) {
            if existing.priority > priority {
                log::debug!(
                    "Keeping {:?} format '{}' over {:?} definition",
                    existing.priority,
                    format.name,
                    priority
                );
                return false;
            }
        }

        self.formats.insert(
            format.name.clone(),
            LoadedFormat {
                format,
                priority,
                source_path,
            },
        );
        true
    }

    /// Load every `*.roster-format.toml` file in `dir`.
    ///
    /// A missing directory is not an error. Files that fail to parse are
    /// logged and skipped. Returns the number of formats registered.
    pub fn load_from_directory(&mut self, dir: &Path, priority: FormatPriority) -> usize {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("Format directory {} not readable: {}", dir.display(), e);
                return 0;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(FORMAT_FILE_SUFFIX))
            })
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match load_format_file(&path) {
                Ok(format) => {
                    log::info!("Loaded format '{}' from {}", format.name, path.display());
                    if self.register(format, priority, Some(path)) {
                        loaded += 1;
                    }
                }
                Err(e) => log::warn!("Skipping format file: {}", e),
            }
        }

        loaded
    }

    /// Set the active format
    pub fn set_active_format(&mut self, name: &str) -> bool {
        if self.formats.contains_key(name) {
            self.active_format = Some(name.to_string());
            true
        } else {
            false
        }
    }

    /// Get the currently active format
    pub fn active_format(&self) -> Option<&Format> {
        self.active_format
            .as_ref()
            .and_then(|name| self.formats.get(name))
            .map(|loaded| &loaded.format)
    }

    /// Rules of the active format, or the T20 defaults when none is active
    pub fn active_rules(&self) -> RuleSet {
        self.active_format()
            .map(|f| f.rules.clone())
            .unwrap_or_default()
    }

    pub fn get_format(&self, name: &str) -> Option<&LoadedFormat> {
        self.formats.get(name)
    }

    /// List all available format names, sorted
    pub fn list_formats(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formats.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

fn load_format_file(path: &Path) -> Result<Format, FormatError> {
    let content = fs::read_to_string(path).map_err(|source| FormatError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Format::from_toml_str(&content, &path.display().to_string())
}
