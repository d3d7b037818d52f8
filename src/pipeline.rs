use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::clients::{MetricStore, ProfileSource};
use crate::error::{GraphError, Result};
use crate::points::{build_points, Point};

/// Make sure `name` exists on the store, then select it for writes.
///
/// Creation only happens when no existing database matches the name exactly.
/// Returns whether the database was created.
pub async fn ensure_database<S>(store: &mut S, name: &str) -> anyhow::Result<bool>
where
    S: MetricStore + ?Sized,
{
    let databases = store
        .list_databases()
        .await
        .context("Failed to list databases")?;

    let created = if databases.iter().any(|db| db == name) {
        false
    } else {
        store
            .create_database(name)
            .await
            .with_context(|| format!("Failed to create database {}", name))?;
        true
    };

    store.select_database(name);
    info!(database = %name, created, "Selected InfluxDB database");

    Ok(created)
}

/// One sampling run: fetch, bootstrap, build, write
pub struct Pipeline<P, S> {
    profiles: P,
    store: S,
}

impl<P: ProfileSource, S: MetricStore> Pipeline<P, S> {
    pub fn new(profiles: P, store: S) -> Self {
        Self { profiles, store }
    }

    pub fn profiles(&self) -> &P {
        &self.profiles
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Sample `user` and write its counters into `database`, stamped with
    /// `captured_at`. Stops at the first failing step.
    pub async fn run(
        &mut self,
        user: &str,
        database: &str,
        captured_at: DateTime<Utc>,
    ) -> Result<Vec<Point>> {
        let counters = self
            .profiles
            .fetch_profile(user)
            .await
            .map_err(GraphError::Twitter)?;

        ensure_database(&mut self.store, database)
            .await
            .map_err(GraphError::DatabaseBootstrap)?;

        let points = build_points(user, captured_at, &counters);
        for point in &points {
            if let Ok(json) = serde_json::to_string(point) {
                debug!(point = %json, "Built point");
            }
        }

        self.store
            .write_points(&points)
            .await
            .map_err(GraphError::DatabaseWrite)?;

        info!(
            user = %user,
            database = %database,
            points = points.len(),
            time = %captured_at,
            "Wrote profile counters"
        );

        Ok(points)
    }
}
