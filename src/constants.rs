// Environment variable names
pub mod env {
    pub const TWITTER_API_KEY: &str = "TWITTER_API_KEY";
    pub const TWITTER_API_SECRET: &str = "TWITTER_API_SECRET";
    pub const TWITTER_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
    pub const TWITTER_ACCESS_SECRET: &str = "TWITTER_ACCESS_SECRET";
    pub const TWITTER_USER: &str = "TWITTER_USER";
    pub const INFLUXDB_HOST: &str = "INFLUXDB_HOST";
    pub const INFLUXDB_DATABASE: &str = "INFLUXDB_DATABASE";
    pub const INFLUXDB_USER: &str = "INFLUXDB_USER";
    pub const INFLUXDB_PASSWORD: &str = "INFLUXDB_PASSWORD";

    /// Every required key, in the order they are checked
    pub const REQUIRED: [&str; 9] = [
        TWITTER_API_KEY,
        TWITTER_API_SECRET,
        TWITTER_ACCESS_TOKEN,
        TWITTER_ACCESS_SECRET,
        TWITTER_USER,
        INFLUXDB_HOST,
        INFLUXDB_DATABASE,
        INFLUXDB_USER,
        INFLUXDB_PASSWORD,
    ];
}

// Twitter API
pub mod twitter {
    /// v1.1 user lookup, returns the public profile counters
    pub const USERS_SHOW_URL: &str = "https://api.twitter.com/1.1/users/show.json";

    pub const OAUTH_SIGNATURE_METHOD: &str = "HMAC-SHA1";
    pub const OAUTH_VERSION: &str = "1.0";
}

// InfluxDB 1.x HTTP API
pub mod influx {
    pub const DEFAULT_PORT: u16 = 8086;

    /// Tag key holding the account name
    pub const USER_TAG: &str = "user";

    /// Field key holding the counter value
    pub const VALUE_FIELD: &str = "value";

    pub fn base_url(host: &str) -> String {
        format!("http://{}:{}", host, DEFAULT_PORT)
    }
}

// Measurement names, one per profile counter
pub mod counters {
    pub const FOLLOWERS: &str = "followers_count";
    pub const FRIENDS: &str = "friends_count";
    pub const LISTED: &str = "listed_count";
    pub const FAVOURITES: &str = "favourites_count";
    pub const STATUSES: &str = "statuses_count";
}

/// ISO-8601 UTC with second precision
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
