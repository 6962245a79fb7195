use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Default Zoom OAuth base URL used when `ZOOM_OAUTH_BASE_URL` is not set.
pub const DEFAULT_ZOOM_OAUTH_BASE_URL: &str = "https://zoom.us";

/// Default Zoom REST API base URL used when `ZOOM_API_BASE_URL` is not set.
pub const DEFAULT_ZOOM_API_BASE_URL: &str = "https://api.zoom.us/v2";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The Zoom OAuth application client ID.
    #[arg(long, env)]
    zoom_meeting_client_id: Option<String>,

    /// The Zoom OAuth application client secret.
    #[arg(long, env)]
    zoom_meeting_client_secret: Option<String>,

    /// Initial access token seed. Lets the relay serve meeting requests
    /// immediately after a restart without redoing the OAuth consent flow.
    #[arg(long, env)]
    access_token: Option<String>,

    /// Initial refresh token seed, paired with the access token seed.
    #[arg(long, env)]
    refresh_access_token: Option<String>,

    /// The base URL of Zoom's OAuth endpoints.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_ZOOM_OAUTH_BASE_URL)]
    zoom_oauth_base_url: String,

    /// The base URL of the Zoom REST API.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_ZOOM_API_BASE_URL)]
    zoom_api_base_url: String,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 3000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Returns the Zoom OAuth client ID, if configured.
    pub fn zoom_client_id(&self) -> Option<String> {
        self.zoom_meeting_client_id.clone()
    }

    pub fn set_zoom_client_id(mut self, client_id: String) -> Self {
        self.zoom_meeting_client_id = Some(client_id);
        self
    }

    /// Returns the Zoom OAuth client secret, if configured.
    pub fn zoom_client_secret(&self) -> Option<String> {
        self.zoom_meeting_client_secret.clone()
    }

    pub fn set_zoom_client_secret(mut self, client_secret: String) -> Self {
        self.zoom_meeting_client_secret = Some(client_secret);
        self
    }

    /// Returns the seed access token used to prime the token store at startup.
    pub fn initial_access_token(&self) -> Option<String> {
        self.access_token.clone()
    }

    /// Returns the seed refresh token used to prime the token store at startup.
    pub fn initial_refresh_token(&self) -> Option<String> {
        self.refresh_access_token.clone()
    }

    /// Returns the Zoom OAuth base URL.
    pub fn zoom_oauth_base_url(&self) -> &str {
        &self.zoom_oauth_base_url
    }

    pub fn set_zoom_oauth_base_url(mut self, base_url: String) -> Self {
        self.zoom_oauth_base_url = base_url;
        self
    }

    /// Returns the Zoom REST API base URL.
    pub fn zoom_api_base_url(&self) -> &str {
        &self.zoom_api_base_url
    }

    pub fn set_zoom_api_base_url(mut self, base_url: String) -> Self {
        self.zoom_api_base_url = base_url;
        self
    }

    /// The OAuth redirect URI registered with Zoom. Fixed to the local
    /// callback endpoint on the configured port.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/api/callback", self.port)
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        // This could check an environment variable, or a config field
        self.runtime_env() == RustEnv::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_config(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("zoom_meeting_relay").chain(args.iter().copied()))
            .expect("Failed to parse test config")
    }

    #[test]
    fn test_default_port_and_interface() {
        let config = parse_config(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.interface.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_default_base_urls() {
        let config = parse_config(&[]);
        assert_eq!(config.zoom_oauth_base_url(), DEFAULT_ZOOM_OAUTH_BASE_URL);
        assert_eq!(config.zoom_api_base_url(), DEFAULT_ZOOM_API_BASE_URL);
    }

    #[test]
    fn test_redirect_uri_tracks_port() {
        let config = parse_config(&["--port", "8080"]);
        assert_eq!(config.redirect_uri(), "http://localhost:8080/api/callback");
    }

    #[test]
    fn test_base_url_overrides() {
        let config = parse_config(&[])
            .set_zoom_oauth_base_url("http://127.0.0.1:1234".to_string())
            .set_zoom_api_base_url("http://127.0.0.1:1234/v2".to_string());
        assert_eq!(config.zoom_oauth_base_url(), "http://127.0.0.1:1234");
        assert_eq!(config.zoom_api_base_url(), "http://127.0.0.1:1234/v2");
    }

    #[test]
    fn test_runtime_env_parsing() {
        assert_eq!("production".parse::<RustEnv>(), Ok(RustEnv::Production));
        assert_eq!("STAGING".parse::<RustEnv>(), Ok(RustEnv::Staging));
        assert!("qa".parse::<RustEnv>().is_err());
    }
}
