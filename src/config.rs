use std::env;

use crate::constants::env as keys;
use crate::error::{GraphError, Result};

/// OAuth 1.0a user-context credentials
#[derive(Clone)]
pub struct TwitterCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

/// Connection settings for the InfluxDB instance
#[derive(Clone)]
pub struct InfluxSettings {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
}

#[derive(Clone)]
pub struct Config {
    pub twitter: TwitterCredentials,

    /// Account whose counters are sampled
    pub twitter_user: String,

    pub influx: InfluxSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Keys are checked in a fixed order
    /// and the first absent one is reported.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut require = |key: &'static str| lookup(key).ok_or(GraphError::MissingConfig(key));

        Ok(Self {
            twitter: TwitterCredentials {
                api_key: require(keys::TWITTER_API_KEY)?,
                api_secret: require(keys::TWITTER_API_SECRET)?,
                access_token: require(keys::TWITTER_ACCESS_TOKEN)?,
                access_secret: require(keys::TWITTER_ACCESS_SECRET)?,
            },
            twitter_user: require(keys::TWITTER_USER)?,
            influx: InfluxSettings {
                host: require(keys::INFLUXDB_HOST)?,
                database: require(keys::INFLUXDB_DATABASE)?,
                user: require(keys::INFLUXDB_USER)?,
                password: require(keys::INFLUXDB_PASSWORD)?,
            },
        })
    }
}
