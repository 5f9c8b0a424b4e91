// ============================================================================
// CONFIG - URLs base del servidor, resueltas en tiempo de compilación
// ============================================================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Farm server origin. Falls back to the page's own origin, which is the
    /// normal production deployment (front served by the farm server itself).
    pub server_url: String,
    /// Optional dedicated statistics backend; same origin by default.
    pub stats_url: String,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de
    /// compilación (via build.rs / .env), con fallback al origin de la página.
    pub fn from_env() -> Self {
        let server_url = option_env!("SERVER_URL")
            .map(str::to_string)
            .unwrap_or_else(current_origin);
        let stats_url = option_env!("STATS_URL")
            .map(str::to_string)
            .unwrap_or_else(|| server_url.clone());
        Self { server_url, stats_url }
    }

    /// Base del API de flags/teams.
    pub fn api_url(&self) -> String {
        format!("{}/api", self.server_url)
    }

    /// Base del API de estadísticas.
    pub fn stats_api_url(&self) -> String {
        format!("{}/api/stats", self.stats_url)
    }
}

#[cfg(target_arch = "wasm32")]
fn current_origin() -> String {
    web_sys::window()
        .and_then(|win| win.location().origin().ok())
        .unwrap_or_else(|| "http://127.0.0.1:5000".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn current_origin() -> String {
    "http://127.0.0.1:5000".to_string()
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_appends_api_path() {
        let config = AppConfig {
            server_url: "http://127.0.0.1:5000".to_string(),
            stats_url: "http://127.0.0.1:5001".to_string(),
        };
        assert_eq!(config.api_url(), "http://127.0.0.1:5000/api");
        assert_eq!(config.stats_api_url(), "http://127.0.0.1:5001/api/stats");
    }
}
