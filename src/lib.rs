//! # Portal (account frontend actions)
//!
//! `portal` serves the server side of an account frontend: signup, activation,
//! login, password reset and profile editing. It owns no user data; every
//! action forwards a JSON request to a remote authentication API and every
//! signed-in request re-validates its session against that same API.
//!
//! ## Sessions
//!
//! A session holds the `JWT` access/refresh pair issued by the remote API plus
//! the user's profile. On every read the access token is verified; when it is
//! rejected it is refreshed once. If that fails too, the session is dropped and
//! the request is treated as signed out. Refresh tokens are never rotated.

pub mod backend;
pub mod cli;
pub mod forms;
pub mod session;
pub mod web;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
