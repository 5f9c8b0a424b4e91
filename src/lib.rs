// ============================================================================
// FARM MONITOR - Capa de estado del front del farm server
// ============================================================================
// Sincroniza el estado visible (flags paginadas y filtradas, teams) con el
// API HTTP del farm server, adjuntando la credencial de sesión a cada
// petición y reaccionando a los 403. Las vistas (render puro) viven fuera:
// hablan con este crate a través de los exports wasm de abajo y del evento
// `routechange`.

pub mod config;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(target_arch = "wasm32")]
pub mod boot {
    use crate::config::CONFIG;
    use crate::models::FilterSet;
    use crate::router::{self, Route};
    use crate::services::{install_interceptors, ApiClient, GlooTransport};
    use crate::state::{CredentialState, FarmStore};
    use crate::utils::url::password_from_location;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    // Instancia global del store, viva mientras viva la página
    thread_local! {
        static STORE: RefCell<Option<FarmStore<GlooTransport>>> = RefCell::new(None);
    }

    /// Cliente contra el API de flags/teams, con los dos interceptores
    /// instalados.
    fn build_api_client(credential: CredentialState) -> ApiClient<GlooTransport> {
        install_interceptors(
            ApiClient::new(CONFIG.api_url(), GlooTransport),
            credential,
            password_from_location,
            || router::push(Route::Login),
        )
    }

    /// Segundo cliente, contra el backend de estadísticas: misma cadena de
    /// interceptores, otra URL base. Lo consume la capa de render (las vistas
    /// de gráficas); dentro de este crate nadie lo llama.
    pub fn build_stats_client(credential: CredentialState) -> ApiClient<GlooTransport> {
        install_interceptors(
            ApiClient::new(CONFIG.stats_api_url(), GlooTransport),
            credential,
            password_from_location,
            || router::push(Route::Login),
        )
    }

    fn with_store<R>(f: impl FnOnce(&FarmStore<GlooTransport>) -> R) -> Option<R> {
        STORE.with(|cell| cell.borrow().as_ref().map(f))
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::default());
        log::info!("🚀 Farm Monitor - capa de estado inicializada");

        let credential = CredentialState::load();
        let api = Rc::new(build_api_client(credential.clone()));
        let store = FarmStore::new(api, credential);

        STORE.with(|cell| {
            *cell.borrow_mut() = Some(store.clone());
        });

        // Carga inicial: flags (con refresh de opciones encadenado) y teams
        spawn_local(async move {
            store.fetch_flags().await;
            store.fetch_teams().await;
        });

        Ok(())
    }

    /// Cambia de página y recarga las flags. Llamable desde las vistas.
    #[wasm_bindgen]
    pub fn update_page(page: u32) {
        if let Some(store) = with_store(|s| s.clone()) {
            spawn_local(async move {
                store.update_page(page).await;
            });
        }
    }

    /// Reemplaza los filtros activos (JSON con los nombres de campo del
    /// servidor; `null` = sin filtros) y recarga las flags.
    #[wasm_bindgen]
    pub fn apply_flag_filters(filters_json: &str) {
        let filters: Option<FilterSet> = match serde_json::from_str(filters_json) {
            Ok(filters) => filters,
            Err(e) => {
                log::error!("❌ Filtros inválidos: {}", e);
                return;
            }
        };
        if let Some(store) = with_store(|s| s.clone()) {
            spawn_local(async move {
                store.commit_flag_filters(filters);
                store.fetch_flags().await;
            });
        }
    }

    /// Recarga la lista de teams.
    #[wasm_bindgen]
    pub fn refresh_teams() {
        if let Some(store) = with_store(|s| s.clone()) {
            spawn_local(async move {
                store.fetch_teams().await;
            });
        }
    }
}
