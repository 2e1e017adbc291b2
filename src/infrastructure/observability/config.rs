use serde::Deserialize;

/// Prometheus exporter settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route the exporter is mounted at
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Mount path with exactly one leading slash and no trailing one
    pub fn route(&self) -> String {
        let trimmed = self.path.trim().trim_matches('/');
        if trimmed.is_empty() {
            "/metrics".to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}
