use advisor::AdvisorConfig;
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use engine::LoginPolicy;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/trustbank.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LoginMode {
    /// Any username and password sign in.
    #[default]
    Open,
    /// Only `admin` / `1234`.
    Fixed,
}

impl From<LoginMode> for LoginPolicy {
    fn from(mode: LoginMode) -> Self {
        match mode {
            LoginMode::Open => LoginPolicy::AcceptAny,
            LoginMode::Fixed => LoginPolicy::Fixed,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    pub mode: LoginMode,
    /// Ask for an authenticator code at sign-in once 2FA is on.
    pub second_factor: bool,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            mode: LoginMode::Open,
            second_factor: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub state_path: String,
    pub log_file: String,
    pub log_level: String,
    pub timezone: String,
    pub login: LoginConfig,
    pub advisor: AdvisorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_path: "config/trustbank_state.json".to_string(),
            log_file: "trustbank.log".to_string(),
            log_level: "info".to_string(),
            timezone: "America/New_York".to_string(),
            login: LoginConfig::default(),
            advisor: AdvisorConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|err| {
            config::ConfigError::Message(format!("invalid timezone {}: {err}", self.timezone))
                .into()
        })
    }
}

#[derive(Debug, Parser)]
#[command(name = "trustbank", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the persisted session file.
    #[arg(long)]
    state_path: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Which credentials the sign-in form accepts.
    #[arg(long, value_enum)]
    login_mode: Option<LoginMode>,
    /// Log filter level (e.g. debug).
    #[arg(long)]
    log_level: Option<String>,
    /// Gemini API key; the config file value wins when both are set.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    build(Args::parse())
}

fn build(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(
        config::Environment::with_prefix("TRUSTBANK")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(state_path) = args.state_path {
        settings.state_path = state_path;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(mode) = args.login_mode {
        settings.login.mode = mode;
    }
    if let Some(level) = args.log_level {
        settings.log_level = level;
    }
    if settings.advisor.api_key.is_none() {
        settings.advisor.api_key = args.api_key;
    }

    settings.tz()?;
    Ok(settings)
}
