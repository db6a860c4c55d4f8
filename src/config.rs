use crate::constants::{DEFAULT_API_BASE, DEFAULT_PER_PAGE};

/// Runtime configuration, loaded from the environment.
pub struct Config {
    pub api_base_url: String,
    pub per_page: u32,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let api_base_url = std::env::var("SPORTRES_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        if api_base_url.trim().is_empty() {
            return Err("SPORTRES_API_BASE cannot be empty".to_string());
        }

        let per_page = match std::env::var("SPORTRES_PER_PAGE") {
            Ok(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or_else(|| format!("Invalid SPORTRES_PER_PAGE '{}'", raw))?,
            Err(_) => DEFAULT_PER_PAGE,
        };

        let email = std::env::var("SPORTRES_EMAIL").ok().filter(|v| !v.is_empty());
        let password = std::env::var("SPORTRES_PASSWORD")
            .ok()
            .filter(|v| !v.is_empty());

        Ok(Config {
            api_base_url,
            per_page,
            email,
            password,
        })
    }
}
