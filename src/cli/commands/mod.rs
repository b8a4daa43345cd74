pub mod api;
pub mod logging;
pub mod session;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("portal")
        .about("Account portal backed by a remote authentication API")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("PORTAL_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = api::with_args(command);
    let command = session::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        temp_env::with_vars(
            [
                ("PORTAL_PORT", None::<&str>),
                ("PORTAL_API_URL", None::<&str>),
                ("PORTAL_API_TIMEOUT_SECONDS", None::<&str>),
                ("PORTAL_FRONTEND_BASE_URL", None::<&str>),
                ("PORTAL_SESSION_TTL_SECONDS", None::<&str>),
                ("PORTAL_LOG_LEVEL", None::<&str>),
            ],
            f,
        )
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "portal");
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        cleared_env(|| {
            let matches = new().get_matches_from(vec![
                "portal",
                "--api-url",
                "https://api.portal.dev",
            ]);
            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
            assert_eq!(
                matches
                    .get_one::<u64>(api::ARG_API_TIMEOUT_SECONDS)
                    .copied(),
                Some(10)
            );
            assert_eq!(
                matches
                    .get_one::<String>(session::ARG_FRONTEND_BASE_URL)
                    .cloned(),
                Some("http://localhost:3000".to_string())
            );
            assert_eq!(
                matches
                    .get_one::<u64>(session::ARG_SESSION_TTL_SECONDS)
                    .copied(),
                Some(2_592_000)
            );
        });
    }

    #[test]
    fn test_api_url_required() {
        cleared_env(|| {
            let result = new().try_get_matches_from(vec!["portal"]);
            assert_eq!(
                result.map_err(|e| e.kind()).err(),
                Some(clap::error::ErrorKind::MissingRequiredArgument)
            );
        });
    }

    #[test]
    fn test_zero_timeout_rejected() {
        cleared_env(|| {
            let result = new().try_get_matches_from(vec![
                "portal",
                "--api-url",
                "https://api.portal.dev",
                "--api-timeout-seconds",
                "0",
            ]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_zero_session_ttl_rejected() {
        cleared_env(|| {
            let result = new().try_get_matches_from(vec![
                "portal",
                "--api-url",
                "https://api.portal.dev",
                "--session-ttl-seconds",
                "0",
            ]);
            assert_eq!(
                result.map_err(|e| e.kind()).err(),
                Some(clap::error::ErrorKind::ValueValidation)
            );
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("PORTAL_PORT", Some("443")),
                ("PORTAL_API_URL", Some("https://api.portal.dev")),
                ("PORTAL_API_TIMEOUT_SECONDS", Some("3")),
                ("PORTAL_FRONTEND_BASE_URL", Some("https://portal.dev")),
                ("PORTAL_SESSION_TTL_SECONDS", Some("3600")),
                ("PORTAL_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["portal"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(api::ARG_API_URL).cloned(),
                    Some("https://api.portal.dev".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<u64>(api::ARG_API_TIMEOUT_SECONDS)
                        .copied(),
                    Some(3)
                );
                assert_eq!(
                    matches
                        .get_one::<u64>(session::ARG_SESSION_TTL_SECONDS)
                        .copied(),
                    Some(3600)
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("PORTAL_LOG_LEVEL", Some(level)),
                    ("PORTAL_API_URL", Some("https://api.portal.dev")),
                ],
                || {
                    let matches = new().get_matches_from(vec!["portal"]);
                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        u8::try_from(index).ok()
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5 {
            cleared_env(|| {
                let mut args = vec![
                    "portal".to_string(),
                    "--api-url".to_string(),
                    "https://api.portal.dev".to_string(),
                ];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }
}
