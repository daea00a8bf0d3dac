use serde::Deserialize;

/// Log output configuration.
///
/// The filter itself comes from `RUST_LOG` (default `info`).
///
/// # Example
///
/// ```toml
/// [telemetry]
/// format = "json"
/// ```
#[derive(Debug, Deserialize)]
pub struct TelemetryConfig {
    /// `"text"` for human-readable lines, `"json"` for one JSON object per
    /// event.
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl TelemetryConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

fn default_format() -> String {
    "text".to_owned()
}
