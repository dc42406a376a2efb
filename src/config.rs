/// Client credentials for the Spotify Web API, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(
                f,
                "Missing Spotify credentials: {} is not set. \
                 Set SPOTIPY_CLIENT_ID and SPOTIPY_CLIENT_SECRET in a .env file or environment variables.",
                var
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

const CLIENT_ID_VARS: [&str; 2] = ["SPOTIPY_CLIENT_ID", "SPOTIFY_CLIENT_ID"];
const CLIENT_SECRET_VARS: [&str; 2] = ["SPOTIPY_CLIENT_SECRET", "SPOTIFY_CLIENT_SECRET"];

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |vars: &[&'static str]| {
            vars.iter()
                .filter_map(|key| lookup(*key))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
        };

        let client_id =
            first_set(&CLIENT_ID_VARS[..]).ok_or(ConfigError::Missing(CLIENT_ID_VARS[0]))?;
        let client_secret =
            first_set(&CLIENT_SECRET_VARS[..]).ok_or(ConfigError::Missing(CLIENT_SECRET_VARS[0]))?;

        Ok(Self {
            client_id,
            client_secret,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
