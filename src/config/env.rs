use std::env::VarError;
use std::time::Duration;

use humantime::parse_duration;

use crate::error::ConfigError;

/// Source of override variables; `std::env::var` outside of tests.
pub(super) type Lookup<'a> = &'a dyn Fn(&'static str) -> Result<String, VarError>;

/// Read `key`, treating an unset or blank variable as absent.
pub(super) fn env_string(
    lookup: Lookup<'_>,
    key: &'static str,
) -> std::result::Result<Option<String>, ConfigError> {
    match lookup(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(ConfigError::Other(format!("{key}: {err}"))),
    }
}

pub(super) fn env_duration(
    lookup: Lookup<'_>,
    key: &'static str,
) -> std::result::Result<Option<Duration>, ConfigError> {
    parse_value(key, env_string(lookup, key)?, |raw| {
        parse_duration(raw).map_err(|err| err.to_string())
    })
}

fn parse_value<T>(
    key: &'static str,
    value: Option<String>,
    parse: impl FnOnce(&str) -> std::result::Result<T, String>,
) -> std::result::Result<Option<T>, ConfigError> {
    value
        .map(|raw| {
            parse(raw.trim()).map_err(|message| ConfigError::InvalidField {
                field: key,
                message,
            })
        })
        .transpose()
}
