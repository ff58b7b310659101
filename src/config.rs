use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::adapter::EnrichmentRequest;
use crate::error::EnrichmentError;
use crate::external::tools::BLACKSHEEPWALL;

/// One option a module exposes to the host's option system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub default: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Descriptive metadata the host shows for the module.
#[derive(Debug, Clone, Copy)]
pub struct ModuleMeta {
    pub name: &'static str,
    pub author: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    /// Query the host runs to produce the module's domain list.
    pub query: &'static str,
    pub options: &'static [OptionSpec],
}

pub const META: ModuleMeta = ModuleMeta {
    name: "Blacksheepwall Domain Search",
    author: "Tom Steele",
    version: "v1.0.0",
    description: "Runs domain based searches using blacksheepwall and a configuration file.",
    query: "SELECT DISTINCT domain FROM domains WHERE domain IS NOT NULL",
    options: &[
        OptionSpec {
            name: "config",
            default: "",
            required: true,
            description: "file location of bsw config file",
        },
        OptionSpec {
            name: "save_location",
            default: "",
            required: false,
            description: "file location to save JSON output, is only used when a single domain is provided",
        },
    ],
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModuleOptions {
    /// blacksheepwall config file, handed to the tool as-is.
    pub config: String,
    /// Empty means "do not save".
    pub save_location: String,
    pub tool: String,
    pub timeout_secs: Option<u64>,
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            config: String::new(),
            save_location: String::new(),
            tool: BLACKSHEEPWALL.to_string(),
            timeout_secs: None,
        }
    }
}

impl ModuleOptions {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn validate(&self) -> Result<(), EnrichmentError> {
        if self.config.trim().is_empty() {
            return Err(EnrichmentError::InvalidInput("option 'config' is required".into()));
        }
        if self.tool.trim().is_empty() {
            return Err(EnrichmentError::InvalidInput("option 'tool' must not be empty".into()));
        }
        Ok(())
    }

    /// Apply command-line values on top of file (or default) options.
    /// `None` leaves the existing value alone.
    pub fn with_overrides(
        mut self,
        config: Option<String>,
        save_location: Option<String>,
        tool: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(c) = config {
            self.config = c;
        }
        if let Some(s) = save_location {
            self.save_location = s;
        }
        if let Some(t) = tool {
            self.tool = t;
        }
        if timeout_secs.is_some() {
            self.timeout_secs = timeout_secs;
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn request(&self, domains: Vec<String>) -> Result<EnrichmentRequest, EnrichmentError> {
        self.validate()?;
        let save = (!self.save_location.is_empty()).then(|| self.save_location.clone());
        EnrichmentRequest::new(domains, self.config.clone(), save)
    }
}
