use std::env;

use tracing::warn;

pub const DEFAULT_API_URL: &str = "https://api.brawlstars.com/v1";

const API_KEY_VAR: &str = "BRAWLSTARS_API_KEY";
const API_URL_VAR: &str = "BRAWLSTARS_API_URL";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_url: String,
}

impl Settings {
    pub fn new(api_key: &str) -> Settings {
        Settings {
            api_key: api_key.to_owned(),
            api_url: DEFAULT_API_URL.to_owned(),
        }
    }

    pub fn with_api_url(mut self, api_url: &str) -> Settings {
        self.api_url = api_url.trim_end_matches('/').to_owned();
        self
    }

    /// Reads the settings from the process environment.
    ///
    /// Expects `.env` to already be loaded by the caller. A missing key is not fatal,
    /// the API will reject the request and that gets reported like any other error.
    pub fn from_env() -> Settings {
        let api_key = env::var(API_KEY_VAR).unwrap_or_else(|_| {
            warn!("{} is not set, requests will be unauthorized", API_KEY_VAR);
            String::new()
        });

        let settings = Settings::new(&api_key);
        match env::var(API_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => settings.with_api_url(url.trim()),
            _ => settings,
        }
    }
}
