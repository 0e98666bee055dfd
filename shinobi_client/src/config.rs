use shinobi_core::game::GameId;
use thiserror::Error;

pub const DEFAULT_SERVER: &str = "http://localhost:5000";
pub const USAGE: &str = "Usage: shinobi_ui_cli [SERVER_URL] USERNAME [GAME_ID]
  env fallbacks: SHINOBI_SERVER, SHINOBI_USER, SHINOBI_PASSWORD, SHINOBI_GAME";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing setting: {0}")]
    Missing(&'static str),
    #[error("not a game id: {0}")]
    InvalidGameId(String),
    #[error("server url must start with http:// or https://: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: String,
    pub username: String,
    pub password: Option<String>,
    pub gid: Option<GameId>,
}

impl ClientConfig {
    /// Reads the process arguments, falling back to the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        ClientConfig::from_args(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Positional arguments win over the environment. A single argument that
    /// looks like a url is the server; otherwise arguments are read as
    /// `USERNAME [GAME_ID]` after an optional server url.
    pub fn from_args<I, E>(args: I, env: E) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut args = args.into_iter().peekable();

        let server_given = args.peek().map_or(false, |first| first.contains("://"));
        let server_arg = if server_given { args.next() } else { None };
        let server_url = server_arg
            .or_else(|| env("SHINOBI_SERVER"))
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());
        if !(server_url.starts_with("http://") || server_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(server_url));
        }

        let username = args
            .next()
            .or_else(|| env("SHINOBI_USER"))
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::Missing("username"))?;

        let gid = match args.next().or_else(|| env("SHINOBI_GAME")) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<GameId>()
                    .map_err(|_| ConfigError::InvalidGameId(raw.clone()))?,
            ),
            None => None,
        };

        Ok(ClientConfig {
            server_url: server_url.trim_end_matches('/').to_string(),
            username,
            password: env("SHINOBI_PASSWORD"),
            gid,
        })
    }
}
