//! Runtime configuration via `valuekit.toml`
//!
//! All settings have defaults, so an empty file (or no file at all) is a valid
//! configuration. A configuration may be installed once per process; until
//! then [`RuntimeConfig::global`] returns the defaults.

use crate::error::{Error, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name conventionally placed next to the host application.
pub const CONFIG_FILE_NAME: &str = "valuekit.toml";

static INSTALLED: OnceCell<RuntimeConfig> = OnceCell::new();

/// Runtime configuration loaded from `valuekit.toml`.
///
/// # Example
///
/// ```toml
/// # Maximum number of links followed when walking a cause chain
/// cause_chain_limit = 1024
/// # Maximum number of frames retained in a captured stack trace
/// stack_frame_limit = 1024
/// # Warn when a sort/distinct stage buffers more elements than this
/// buffer_warn_threshold = 1000000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Maximum number of links followed when walking a throwable cause chain.
    #[serde(default = "default_cause_chain_limit")]
    pub cause_chain_limit: usize,
    /// Maximum number of frames kept by `set_stack_trace`.
    #[serde(default = "default_stack_frame_limit")]
    pub stack_frame_limit: usize,
    /// Element count above which buffering stream stages log a warning.
    #[serde(default = "default_buffer_warn_threshold")]
    pub buffer_warn_threshold: usize,
}

fn default_cause_chain_limit() -> usize {
    1024
}

fn default_stack_frame_limit() -> usize {
    1024
}

fn default_buffer_warn_threshold() -> usize {
    1_000_000
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            cause_chain_limit: default_cause_chain_limit(),
            stack_frame_limit: default_stack_frame_limit(),
            buffer_warn_threshold: default_buffer_warn_threshold(),
        }
    }
}

impl RuntimeConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not valid TOML or a limit is zero.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RuntimeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, `Error::Config` if it
    /// does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# valuekit runtime configuration
#
# Maximum number of links followed when walking a throwable cause chain.
cause_chain_limit = 1024

# Maximum number of frames retained in a stack trace.
stack_frame_limit = 1024

# Sorting and distinct stages log a warning once they buffer more elements
# than this.
buffer_warn_threshold = 1000000
"#
    }

    fn validate(&self) -> Result<()> {
        if self.cause_chain_limit == 0 {
            return Err(Error::Config("cause_chain_limit must be at least 1".into()));
        }
        if self.stack_frame_limit == 0 {
            return Err(Error::Config("stack_frame_limit must be at least 1".into()));
        }
        Ok(())
    }

    /// The installed configuration, or the defaults if none was installed.
    pub fn global() -> &'static RuntimeConfig {
        INSTALLED.get_or_init(RuntimeConfig::default)
    }

    /// Install this configuration for the rest of the process.
    ///
    /// # Errors
    ///
    /// Returns `Error::IllegalState` if a configuration was already installed
    /// or the defaults were already observed through [`RuntimeConfig::global`].
    pub fn install(self) -> Result<()> {
        self.validate()?;
        INSTALLED
            .set(self)
            .map_err(|_| Error::illegal_state("runtime configuration already installed"))
    }
}
