use std::net::SocketAddr;

use anyhow::{Context, bail};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://fishington.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    /// Name of the well-known chat room, created at startup if missing.
    pub chat_room: String,
    pub event_slug: String,
    pub event_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: "sqlite::memory:".to_owned(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_connections: 16,
            chat_room: "general".to_owned(),
            event_slug: "basketball-trip".to_owned(),
            event_name: "Basketball Trip".to_owned(),
        }
    }
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> anyhow::Result<Config> {
        Config::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let defaults = Config::default();

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());
        let bind_addr: SocketAddr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
            .parse()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:8080")?;
        let max_connections = match lookup("MAX_CONNECTIONS") {
            Some(raw) => raw.parse::<u32>().context("MAX_CONNECTIONS must be a positive integer")?,
            None => defaults.max_connections,
        };

        let config = Config {
            database_url,
            bind_addr,
            max_connections,
            chat_room: lookup("CHAT_ROOM").unwrap_or(defaults.chat_room),
            event_slug: lookup("EVENT_SLUG").unwrap_or(defaults.event_slug),
            event_name: lookup("EVENT_NAME").unwrap_or(defaults.event_name),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.max_connections == 0 {
            bail!("MAX_CONNECTIONS must be at least 1");
        }
        let room_len = self.chat_room.chars().count();
        if room_len == 0 || room_len > 24 {
            bail!("CHAT_ROOM must be 1 to 24 characters, got {:?}", self.chat_room);
        }
        if !is_slug(&self.event_slug) {
            bail!("EVENT_SLUG must be 1 to 32 of [a-z0-9_-], got {:?}", self.event_slug);
        }
        let name_len = self.event_name.trim().chars().count();
        if name_len == 0 || name_len > 200 {
            bail!("EVENT_NAME must be 1 to 200 characters");
        }
        Ok(())
    }
}

fn is_slug(s: &str) -> bool {
    (1..=32).contains(&s.len())
        && s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}
