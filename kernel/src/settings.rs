//! Settings that control how expressions are compiled into rough-set filters.
//!
//! Settings usually arrive as a string-keyed property map (e.g. session variables forwarded by the
//! coordinator), see [`FilterSettings::try_from_properties`]. They can also be deserialized
//! directly with serde.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Error, FilterResult};

pub const ENABLE_ROUGH_SET_FILTER: &str = "enable_rough_set_filter";
pub const MAX_EXPR_DEPTH: &str = "max_expr_depth";
pub const LOG_UNSUPPORTED: &str = "log_unsupported";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSettings {
    /// When false, every compilation yields a filter that matches everything.
    pub enable_rough_set_filter: bool,
    /// Subtrees nested deeper than this are not compiled.
    pub max_expr_depth: usize,
    /// Log every expression that could not be compiled, at debug level.
    pub log_unsupported: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            enable_rough_set_filter: true,
            max_expr_depth: 256,
            log_unsupported: true,
        }
    }
}

impl FilterSettings {
    /// Parses settings from a property map. Missing keys keep their default value; unknown keys
    /// and unparsable values are rejected.
    pub fn try_from_properties<I, K, V>(properties: I) -> FilterResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Self::default();
        for (key, value) in properties {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                ENABLE_ROUGH_SET_FILTER => settings.enable_rough_set_filter = parse(key, value)?,
                MAX_EXPR_DEPTH => {
                    settings.max_expr_depth = parse(key, value)?;
                    if settings.max_expr_depth == 0 {
                        return Err(Error::invalid_config(format!(
                            "{MAX_EXPR_DEPTH} must be positive"
                        )));
                    }
                }
                LOG_UNSUPPORTED => settings.log_unsupported = parse(key, value)?,
                _ => {
                    warn!("Rejecting unknown filter setting {key}={value}");
                    return Err(Error::invalid_config(format!("unknown setting '{key}'")));
                }
            }
        }
        Ok(settings)
    }

    /// Renders the settings as a property map accepted by [`Self::try_from_properties`].
    pub fn to_properties(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                ENABLE_ROUGH_SET_FILTER.to_string(),
                self.enable_rough_set_filter.to_string(),
            ),
            (MAX_EXPR_DEPTH.to_string(), self.max_expr_depth.to_string()),
            (
                LOG_UNSUPPORTED.to_string(),
                self.log_unsupported.to_string(),
            ),
        ])
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> FilterResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::invalid_config(format!("invalid value for '{key}': '{value}'")))
}
