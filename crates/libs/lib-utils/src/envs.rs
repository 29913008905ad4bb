//! # Environment Variables
//!
//! Utilities for reading and parsing environment variables.

use std::env;
use std::str::FromStr;

/// Get an environment variable by name.
pub fn get_env(name: &'static str) -> Result<String, Error> {
    env::var(name).map_err(|_| Error::MissingEnv(name))
}

/// Get and parse an environment variable.
pub fn get_env_parse<T: FromStr>(name: &'static str) -> Result<T, Error> {
    let val = get_env(name)?;
    parse_value(name, &val)
}

/// Parse a value that was looked up under `name` from any source
/// (process environment, compile-time `option_env!`, a test map).
pub fn parse_value<T: FromStr>(name: &'static str, value: &str) -> Result<T, Error> {
    value.trim().parse::<T>().map_err(|_| Error::WrongFormat(name))
}

// region:    --- Error
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    MissingEnv(&'static str),
    WrongFormat(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_trims() {
        let ms: u64 = parse_value("PRESALE_DEEP_LINK_FALLBACK_MS", " 1500 ").unwrap();
        assert_eq!(ms, 1500);
    }

    #[test]
    fn test_parse_value_wrong_format() {
        let res = parse_value::<u64>("PRESALE_DEEP_LINK_FALLBACK_MS", "soon");
        assert_eq!(res, Err(Error::WrongFormat("PRESALE_DEEP_LINK_FALLBACK_MS")));
    }

    #[test]
    fn test_get_env_missing() {
        let res = get_env("LIB_UTILS_TEST_SURELY_UNSET_VARIABLE");
        assert_eq!(res, Err(Error::MissingEnv("LIB_UTILS_TEST_SURELY_UNSET_VARIABLE")));
    }
}
