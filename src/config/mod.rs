use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub api_url: String,
    pub cookie_file: Option<PathBuf>,
    pub page_size: u32,
    pub roster_size: u32,
    pub profile_timeout_secs: u64,
    pub login_email: Option<String>,
    pub login_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cookie_file: None,
            page_size: 10,
            roster_size: 200,
            profile_timeout_secs: 15,
            login_email: None,
            login_password: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let defaults = Config::default();
        Ok(Config {
            api_url: optional("API_URL")?
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            cookie_file: optional("COOKIE_FILE")?.map(PathBuf::from),
            page_size: parse_or("PAGE_SIZE", defaults.page_size)?,
            roster_size: parse_or("ROSTER_SIZE", defaults.roster_size)?,
            profile_timeout_secs: optional("PROFILE_TIMEOUT")?
                .map(|v| v.trim_end_matches('s').to_string())
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.profile_timeout_secs),
            login_email: optional("DASHBOARD_EMAIL")?,
            login_password: optional("DASHBOARD_PASSWORD")?,
        })
    }

    /// 指向某个后端地址的默认配置
    pub fn for_api(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    pub fn profile_timeout(&self) -> Duration {
        Duration::from_secs(self.profile_timeout_secs)
    }
}

fn optional(key: &str) -> Result<Option<String>, env::VarError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e),
    }
}

fn parse_or(key: &str, default: u32) -> Result<u32, env::VarError> {
    Ok(match optional(key)? {
        Some(raw) => match raw.parse::<u32>() {
            Ok(value) if value > 0 => value,
            _ => {
                tracing::warn!("Invalid {} value {:?}, using {}", key, raw, default);
                default
            }
        },
        None => default,
    })
}
