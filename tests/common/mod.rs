//! In-memory stand-ins for the Twitter API and InfluxDB.

#![allow(dead_code)]

pub mod http;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use twitter_graph::clients::{MetricStore, ProfileSource};
use twitter_graph::points::{Point, ProfileCounters};

pub fn sample_counters() -> ProfileCounters {
    ProfileCounters {
        followers_count: 10,
        friends_count: 5,
        listed_count: 2,
        favourites_count: 7,
        statuses_count: 100,
    }
}

pub fn new_year() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub struct FakeProfiles {
    counters: Option<ProfileCounters>,
    pub requested: Mutex<Vec<String>>,
}

impl FakeProfiles {
    pub fn returning(counters: ProfileCounters) -> Self {
        Self {
            counters: Some(counters),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Behaves like an unknown account
    pub fn failing() -> Self {
        Self {
            counters: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileSource for FakeProfiles {
    async fn fetch_profile(&self, username: &str) -> Result<ProfileCounters> {
        self.requested.lock().unwrap().push(username.to_string());
        self.counters
            .ok_or_else(|| anyhow!("User not found. (code 50)"))
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub databases: Mutex<Vec<String>>,
    pub selected: Option<String>,
    pub list_calls: AtomicUsize,
    pub create_calls: Mutex<Vec<String>>,
    pub write_calls: AtomicUsize,
    pub written: Mutex<Vec<Point>>,
    pub fail_list: bool,
    pub fail_write: bool,
}

impl FakeStore {
    pub fn with_databases(names: &[&str]) -> Self {
        Self {
            databases: Mutex::new(names.iter().map(|n| n.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn databases(&self) -> Vec<String> {
        self.databases.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn written(&self) -> Vec<Point> {
        self.written.lock().unwrap().clone()
    }

    /// Total number of calls of any kind the store has seen
    pub fn touched(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
            + self.created().len()
            + self.write_calls.load(Ordering::SeqCst)
            + usize::from(self.selected.is_some())
    }
}

#[async_trait]
impl MetricStore for FakeStore {
    async fn list_databases(&self) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.databases())
    }

    async fn create_database(&self, name: &str) -> Result<()> {
        self.create_calls.lock().unwrap().push(name.to_string());
        self.databases.lock().unwrap().push(name.to_string());
        Ok(())
    }

    fn select_database(&mut self, name: &str) {
        self.selected = Some(name.to_string());
    }

    async fn write_points(&self, points: &[Point]) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_write {
            return Err(anyhow!("InfluxDB returned 500 Internal Server Error: timeout"));
        }
        if self.selected.is_none() {
            return Err(anyhow!("no database selected for write"));
        }
        self.written.lock().unwrap().extend_from_slice(points);
        Ok(())
    }
}
