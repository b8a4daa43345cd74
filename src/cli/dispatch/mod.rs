//! Turn validated CLI matches into the action to run.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{api, session, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let api_opts = api::Options::parse(matches)?;
    let session_opts = session::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        api_url: api_opts.url,
        api_timeout_seconds: api_opts.timeout_seconds,
        frontend_base_url: session_opts.frontend_base_url,
        session_ttl_seconds: session_opts.session_ttl_seconds,
    }))
}
