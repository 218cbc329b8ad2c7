use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Where the registry is restored from on start and saved to on shutdown.
    pub snapshot_path: Option<PathBuf>,
    /// How long one connection may take to send its request and read the reply.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 7782,
            snapshot_path: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: var("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            snapshot_path: var("SNAPSHOT_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            request_timeout: var("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Where a client on this machine reaches the server. A wildcard bind
    /// host is dialled on loopback.
    pub fn connect_addr(&self) -> String {
        match self.host.as_str() {
            "0.0.0.0" | "::" | "[::]" => format!("127.0.0.1:{}", self.port),
            host => format!("{host}:{}", self.port),
        }
    }
}
