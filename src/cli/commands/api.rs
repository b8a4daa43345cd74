//! Where the authentication API lives.

use crate::backend::DEFAULT_TIMEOUT_SECONDS;
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_API_TIMEOUT_SECONDS: &str = "api-timeout-seconds";

#[derive(Debug, Clone)]
pub struct Options {
    pub url: String,
    pub timeout_seconds: u64,
}

impl Options {
    /// # Errors
    /// Returns an error if `--api-url` is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let url = matches
            .get_one::<String>(ARG_API_URL)
            .cloned()
            .context("missing required argument: --api-url")?;
        let timeout_seconds = matches
            .get_one::<u64>(ARG_API_TIMEOUT_SECONDS)
            .copied()
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        Ok(Self {
            url,
            timeout_seconds,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the authentication API, e.g. https://api.portal.dev")
                .env("PORTAL_API_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_API_TIMEOUT_SECONDS)
                .long(ARG_API_TIMEOUT_SECONDS)
                .help("Timeout for each call to the authentication API")
                .env("PORTAL_API_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
