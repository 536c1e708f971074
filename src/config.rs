use std::str::FromStr;

use anyhow::Context;
use time::{macros::format_description, UtcOffset};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Offset whose midnight starts a new day for expiry purposes.
    pub utc_offset: UtcOffset,
    pub page_size: usize,
    pub featured_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            utc_offset: UtcOffset::UTC,
            page_size: 9,
            featured_limit: 6,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let utc_offset = match lookup("FRIDGE_UTC_OFFSET") {
            Some(raw) => parse_offset(&raw)?,
            None => defaults.utc_offset,
        };
        let page_size = parse_or("FRIDGE_PAGE_SIZE", &lookup, defaults.page_size)?;
        anyhow::ensure!(page_size >= 1, "FRIDGE_PAGE_SIZE must be at least 1");

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or(defaults.host),
            port: parse_or("APP_PORT", &lookup, defaults.port)?,
            utc_offset,
            page_size,
            featured_limit: parse_or("FRIDGE_FEATURED_LIMIT", &lookup, defaults.featured_limit)?,
        })
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid {key} value '{raw}'")),
        None => Ok(default),
    }
}

fn parse_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    UtcOffset::parse(
        raw.trim(),
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .with_context(|| format!("invalid FRIDGE_UTC_OFFSET value '{raw}', expected e.g. +06:00"))
}
