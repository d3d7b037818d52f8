pub mod influx;
pub mod twitter;

pub use influx::{InfluxClient, MetricStore};
pub use twitter::{ProfileSource, TwitterClient};
