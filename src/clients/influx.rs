//! InfluxDB 1.x store backed by the `influxdb` client.
//!
//! Covers the four calls a sampling run needs: list databases, create one,
//! select the write target and write a batch of points.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use influxdb::{Client, InfluxDbWriteable, ReadQuery, Timestamp, WriteQuery};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::InfluxSettings;
use crate::constants::influx;
use crate::points::Point;

/// Time-series store the pipeline writes to
#[async_trait]
pub trait MetricStore: Send + Sync {
    async fn list_databases(&self) -> Result<Vec<String>>;

    async fn create_database(&self, name: &str) -> Result<()>;

    /// Target database for subsequent writes
    fn select_database(&mut self, name: &str);

    /// Submit all points in one write
    async fn write_points(&self, points: &[Point]) -> Result<()>;
}

/// Body of a /query response. An empty server answers SHOW DATABASES with a
/// series that has no `values`, so every level defaults.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    series: Vec<Series>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(default)]
    values: Vec<(String,)>,
}

pub struct InfluxClient {
    client: Client,
    url: String,
    user: String,
    password: String,
    database: Option<String>,
}

impl InfluxClient {
    /// Client for `http://<host>:8086`. No request is made until first use.
    pub fn new(settings: &InfluxSettings) -> Self {
        Self::with_url(influx::base_url(&settings.host), settings)
    }

    /// Client for an explicit base URL, keeping the credentials from `settings`
    pub fn with_url(url: impl Into<String>, settings: &InfluxSettings) -> Self {
        let url = url.into();
        let client = Client::new(url.clone(), settings.database.clone())
            .with_auth(settings.user.clone(), settings.password.clone());

        Self {
            client,
            url,
            user: settings.user.clone(),
            password: settings.password.clone(),
            database: None,
        }
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}

#[async_trait]
impl MetricStore for InfluxClient {
    async fn list_databases(&self) -> Result<Vec<String>> {
        let body = self
            .client
            .query(ReadQuery::new("SHOW DATABASES"))
            .await
            .context("Failed to run SHOW DATABASES")?;

        database_names(&body)
    }

    async fn create_database(&self, name: &str) -> Result<()> {
        let statement = format!("CREATE DATABASE {}", quote_identifier(name));
        self.client
            .query(ReadQuery::new(statement))
            .await
            .with_context(|| format!("Failed to create database {}", name))?;

        info!(database = %name, "Created InfluxDB database");
        Ok(())
    }

    fn select_database(&mut self, name: &str) {
        self.client = Client::new(self.url.clone(), name)
            .with_auth(self.user.clone(), self.password.clone());
        self.database = Some(name.to_string());
    }

    async fn write_points(&self, points: &[Point]) -> Result<()> {
        let database = self
            .database
            .as_deref()
            .ok_or_else(|| anyhow!("no database selected for write"))?;

        if points.is_empty() {
            return Ok(());
        }

        let queries = points
            .iter()
            .map(write_query)
            .collect::<Result<Vec<_>>>()?;

        debug!(database = %database, points = queries.len(), "Writing points");

        self.client
            .query(queries)
            .await
            .context("Failed to write points")?;

        Ok(())
    }
}

/// Map a point onto a seconds-precision write.
///
/// Line protocol cannot carry empty tag values, so those tags are left out.
/// Line breaks become a literal `\n`, and a trailing backslash is refused
/// because it would swallow the separator before the field set.
fn write_query(point: &Point) -> Result<WriteQuery> {
    let seconds = u128::try_from(point.time.timestamp())
        .with_context(|| format!("Timestamp {} predates the epoch", point.time))?;

    let mut query = Timestamp::Seconds(seconds).into_query(point.measurement.as_str());
    for (key, value) in point.tags.iter().filter(|(_, v)| !v.is_empty()) {
        if value.ends_with('\\') {
            bail!("tag {}={:?} ends with a backslash", key, value);
        }
        let value = value.replace('\r', "\\r").replace('\n', "\\n");
        query = query.add_tag(key.as_str(), value);
    }
    for (key, value) in &point.fields {
        query = query.add_field(key.as_str(), *value);
    }

    Ok(query)
}

/// Names from a SHOW DATABASES response, surfacing statement errors
fn database_names(body: &str) -> Result<Vec<String>> {
    let response: QueryResponse =
        serde_json::from_str(body).context("Failed to parse SHOW DATABASES response")?;

    if let Some(error) = response.results.iter().find_map(|r| r.error.as_ref()) {
        return Err(anyhow!("InfluxDB statement error: {}", error));
    }

    Ok(response
        .results
        .into_iter()
        .flat_map(|r| r.series)
        .flat_map(|s| s.values)
        .map(|(name,)| name)
        .collect())
}

/// Double-quote an InfluxQL identifier
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
