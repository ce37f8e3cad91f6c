use crate::state::LabelStyle;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration of the reference bus and its line controllers.
///
/// ```yaml
/// num_caches: 4
/// labels: full
/// log_transitions: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of caches snooping the bus.
    pub num_caches: usize,
    /// How transient states are rendered in diagnostics.
    pub labels: LabelStyle,
    /// Log every line transition at debug level.
    pub log_transitions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_caches: 4,
            labels: LabelStyle::Base,
            log_transitions: true,
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.num_caches == 0 {
            return Err(Error::Invalid("need at least one cache".to_string()));
        }
        Ok(())
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_yaml(s)
    }
}
