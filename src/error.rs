use thiserror::Error;

/// Fatal failures of a sampling run, one variant per pipeline step
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("{0} not found in environment")]
    MissingConfig(&'static str),

    #[error("Twitter API error: {0:#}")]
    Twitter(anyhow::Error),

    #[error("InfluxDB bootstrap failed: {0:#}")]
    DatabaseBootstrap(anyhow::Error),

    #[error("InfluxDB write failed: {0:#}")]
    DatabaseWrite(anyhow::Error),
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;
