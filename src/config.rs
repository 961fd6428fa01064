// File: src/config.rs
//
// Optional `scribo.toml` configuration.
//
// Every field has a default, so an empty file (or no file at all) gives the
// stock behavior. Sections:
//   log_level           - default tracing filter for the binary
//   [lexer]             - tokenizer switches
//   [interpreter]       - runtime switches
//   [output]            - terminal rendering

use crate::errors::ScriboError;
use crate::interpreter::InterpreterOptions;
use crate::lexer::LexerOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "scribo.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log_level: String,
    pub lexer: LexerSection,
    pub interpreter: InterpreterSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LexerSection {
    /// Turns on the newline and end-of-input terminator checks after `:=`
    pub strict_terminators: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterpreterSection {
    pub echo_read_prompt: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "warn".to_string(),
            lexer: LexerSection::default(),
            interpreter: InterpreterSection::default(),
            output: OutputSection::default(),
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        OutputSection { color: true }
    }
}

impl Config {
    /// Loads configuration.
    ///
    /// With an explicit path the file must exist. Without one,
    /// `scribo.toml` in the working directory is used when present and the
    /// defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Config, ScriboError> {
        let path = match path {
            Some(path) => path,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Config::default());
                }
                fallback
            }
        };

        let text = fs::read_to_string(path).map_err(|e| {
            ScriboError::config_error(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        let config = Config::from_toml(&text)
            .map_err(|e| ScriboError::config_error(format!("{}: {}", path.display(), e.message)))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Config, ScriboError> {
        toml::from_str(text).map_err(|e| ScriboError::config_error(e.message().to_string()))
    }

    pub fn lexer_options(&self) -> LexerOptions {
        LexerOptions { strict_terminators: self.lexer.strict_terminators }
    }

    pub fn interpreter_options(&self) -> InterpreterOptions {
        InterpreterOptions { echo_read_prompt: self.interpreter.echo_read_prompt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level, "warn");
        assert!(config.output.color);
        assert!(!config.lexer.strict_terminators);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            log_level = "debug"
            [lexer]
            strict_terminators = true
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.lexer_options().strict_terminators);
        assert!(!config.interpreter_options().echo_read_prompt);
        assert!(config.output.color);
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let err = Config::from_toml("[lexer]\nstrict = true\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConfigError);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = Config::load(Some(Path::new("does/not/exist/scribo.toml"))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConfigError);
    }
}
