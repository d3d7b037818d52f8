//! Profile counters and the time-series points built from them.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::constants::{counters, influx, TIME_FORMAT};

/// Public counters of one account, valid at fetch time only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ProfileCounters {
    pub followers_count: i64,
    pub friends_count: i64,
    pub listed_count: i64,
    pub favourites_count: i64,
    pub statuses_count: i64,
}

impl ProfileCounters {
    /// Measurement name and value for each counter
    pub fn pairs(&self) -> [(&'static str, i64); 5] {
        [
            (counters::FOLLOWERS, self.followers_count),
            (counters::FRIENDS, self.friends_count),
            (counters::LISTED, self.listed_count),
            (counters::FAVOURITES, self.favourites_count),
            (counters::STATUSES, self.statuses_count),
        ]
    }
}

/// One timestamped observation, serialized in the InfluxDB JSON point shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    #[serde(serialize_with = "serialize_time")]
    pub time: DateTime<Utc>,
    pub fields: BTreeMap<String, i64>,
}

impl Point {
    pub fn new(measurement: &str, user: &str, time: DateTime<Utc>, value: i64) -> Self {
        Self {
            measurement: measurement.to_string(),
            tags: BTreeMap::from([(influx::USER_TAG.to_string(), user.to_string())]),
            time,
            fields: BTreeMap::from([(influx::VALUE_FIELD.to_string(), value)]),
        }
    }

    pub fn user(&self) -> Option<&str> {
        self.tags.get(influx::USER_TAG).map(String::as_str)
    }

    pub fn value(&self) -> Option<i64> {
        self.fields.get(influx::VALUE_FIELD).copied()
    }

    pub fn time_string(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }
}

fn serialize_time<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&time.format(TIME_FORMAT))
}

/// Truncate a timestamp to whole seconds
pub fn capture_time(now: DateTime<Utc>) -> DateTime<Utc> {
    now.trunc_subsecs(0)
}

/// One point per counter, all sharing the account tag and capture time
pub fn build_points(
    user: &str,
    captured_at: DateTime<Utc>,
    counters: &ProfileCounters,
) -> Vec<Point> {
    counters
        .pairs()
        .iter()
        .map(|(measurement, value)| Point::new(measurement, user, captured_at, *value))
        .collect()
}
