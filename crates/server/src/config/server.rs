use serde::Deserialize;

/// HTTP server bind configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Graceful shutdown timeout in seconds.
    ///
    /// In-flight requests still running after this long are dropped.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_seconds: default_shutdown_timeout(),
        }
    }
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    8080
}

/// Web front-end configuration.
#[derive(Debug, Deserialize)]
pub struct StaticFilesConfig {
    /// Whether to serve the front-end.
    #[serde(default = "default_static_enabled")]
    pub enabled: bool,
    /// Directory containing the built front-end. Unknown paths fall back to
    /// its `index.html`.
    #[serde(default = "default_static_dist")]
    pub dist_path: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: default_static_enabled(),
            dist_path: default_static_dist(),
        }
    }
}

fn default_static_enabled() -> bool {
    true
}

fn default_static_dist() -> String {
    "static".to_owned()
}
