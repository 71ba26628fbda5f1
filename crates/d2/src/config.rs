//! Configuration types for D2 compilation.
//!
//! All types implement [`serde::Deserialize`] and default every field, so a
//! configuration file only needs the settings it changes.
//!
//! # Example
//!
//! ```
//! # use d2::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(!config.compile().utf16());
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Compiler settings.
    #[serde(default)]
    compile: CompileConfig,
}

impl AppConfig {
    pub fn new(compile: CompileConfig) -> Self {
        Self { compile }
    }

    /// Returns the compiler configuration.
    pub fn compile(&self) -> &CompileConfig {
        &self.compile
    }

    /// Mutable access for command-line overrides.
    pub fn compile_mut(&mut self) -> &mut CompileConfig {
        &mut self.compile
    }
}

/// Settings passed to the compiler.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompileConfig {
    /// Count diagnostic columns in UTF-16 code units.
    #[serde(default)]
    utf16: bool,
}

impl CompileConfig {
    pub fn new(utf16: bool) -> Self {
        Self { utf16 }
    }

    pub fn utf16(&self) -> bool {
        self.utf16
    }

    pub fn set_utf16(&mut self, utf16: bool) {
        self.utf16 = utf16;
    }
}
