use chrono::Local;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::locales::Locale;
use crate::models::{Activity, Project};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

const CACHE_FILE_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Terminal,
    Light,
    Dark,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedData<T> {
    pub data: T,
    pub fetched_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheFile {
    pub version: u32,
    pub token_hash: String,
    #[serde(default)]
    pub projects: Option<CachedData<Vec<Project>>>,
    #[serde(default)]
    pub activities: Option<CachedData<Vec<Activity>>>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    server_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<ThemePreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    locale: Option<Locale>,
}

pub fn read_token() -> Option<String> {
    if let Ok(value) = env::var("PUNCHCLOCK_TOKEN") {
        if !value.trim().is_empty() {
            return Some(value.trim().to_string());
        }
    }

    let path = token_path()?;
    fs::read_to_string(path)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn write_token(token: &str) -> Result<(), io::Error> {
    let path = token_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Home directory not found"))?;
    fs::write(path, token)
}

pub fn read_server_url() -> Option<String> {
    if let Ok(value) = env::var("PUNCHCLOCK_SERVER") {
        if !value.trim().is_empty() {
            return Some(value.trim().to_string());
        }
    }
    read_config().and_then(|config| config.server_url)
}

pub fn write_server_url(value: &str) -> Result<(), io::Error> {
    let mut config = read_config().unwrap_or_default();
    config.server_url = Some(value.to_string());
    write_config(&config)
}

pub fn read_theme() -> Option<ThemePreference> {
    read_config().and_then(|config| config.theme)
}

pub fn write_theme(theme: ThemePreference) -> Result<(), io::Error> {
    let mut config = read_config().unwrap_or_default();
    config.theme = Some(theme);
    write_config(&config)
}

pub fn read_locale() -> Option<Locale> {
    read_config().and_then(|config| config.locale)
}

pub fn write_locale(locale: Locale) -> Result<(), io::Error> {
    let mut config = read_config().unwrap_or_default();
    config.locale = Some(locale);
    write_config(&config)
}

fn read_config() -> Option<Config> {
    let path = config_path()?;
    let contents = fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn write_config(config: &Config) -> Result<(), io::Error> {
    let path = config_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Home directory not found"))?;
    let json = serde_json::to_string_pretty(config)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
    fs::write(path, json)
}

pub fn read_cache() -> Option<CacheFile> {
    let path = cache_path()?;
    let contents = fs::read_to_string(path).ok()?;
    let cache: CacheFile = serde_json::from_str(&contents).ok()?;
    if cache.version != CACHE_FILE_VERSION {
        return None;
    }
    Some(cache)
}

pub fn write_cache(cache: &CacheFile) -> Result<(), io::Error> {
    let path = cache_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Home directory not found"))?;
    let json = serde_json::to_string_pretty(cache)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
    fs::write(path, json)
}

pub fn new_cache(token_hash: String) -> CacheFile {
    CacheFile {
        version: CACHE_FILE_VERSION,
        token_hash,
        projects: None,
        activities: None,
    }
}

pub fn now_rfc3339() -> String {
    Local::now().to_rfc3339()
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let result = hasher.finalize();
    result.iter().map(|byte| format!("{:02x}", byte)).collect()
}

fn token_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".punchclock");
    Some(path)
}

fn config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".punchclock.json");
    Some(path)
}

fn cache_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".punchclock-cache.json");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_token_is_stable() {
        let first = hash_token("token123");
        let second = hash_token("token123");
        assert_eq!(first, second);
        assert_ne!(first, "token123");
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = Config {
            server_url: Some("https://tracker.example.com".to_string()),
            theme: Some(ThemePreference::Dark),
            locale: Some(Locale::Ja),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.server_url.as_deref(), Some("https://tracker.example.com"));
        assert_eq!(parsed.theme, Some(ThemePreference::Dark));
        assert_eq!(parsed.locale, Some(Locale::Ja));
    }

    #[test]
    fn config_tolerates_missing_fields() {
        let parsed: Config = serde_json::from_str("{}").unwrap();
        assert!(parsed.server_url.is_none());
        assert!(parsed.theme.is_none());
        assert!(parsed.locale.is_none());
    }

    #[test]
    fn cache_file_serde_round_trip() {
        let cache = new_cache("abc".to_string());
        let json = serde_json::to_string(&cache).unwrap();
        let parsed: CacheFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.version, CACHE_FILE_VERSION);
        assert_eq!(parsed.token_hash, "abc");
        assert!(parsed.projects.is_none());
        assert!(parsed.activities.is_none());
    }
}
