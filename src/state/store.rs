// ============================================================================
// FARM STORE - Estado global sincronizado con el servidor
// ============================================================================
// Único dueño del estado visible: página actual de flags, filtros activos,
// opciones de filtrado y lista de teams. Toda mutación pasa por un commit con
// nombre; los commits son reemplazos de valor síncronos y atómicos, nunca
// mutación parcial de campos. Los fetch son tareas async que se suspenden en
// el I/O; en el event loop cooperativo cada commit es atómico por sí solo.

use crate::models::{Flag, FilterOptions, FilterSet, Team};
use crate::services::api_client::{
    ApiClient, FilterConfigResponse, FlagsResponse, TeamsResponse, Transport,
};
use crate::state::{CredentialState, FetchGate};
use crate::utils::FLAGS_PER_PAGE;
use std::cell::RefCell;
use std::rc::Rc;

pub struct FarmStore<T> {
    api: Rc<ApiClient<T>>,
    credential: CredentialState,

    total_flags: Rc<RefCell<u64>>,
    selected_page: Rc<RefCell<u32>>,
    flags: Rc<RefCell<Vec<Flag>>>,
    flag_filters: Rc<RefCell<Option<FilterSet>>>,
    server_tz: Rc<RefCell<Option<String>>>,
    filter_options: Rc<RefCell<FilterOptions>>,
    flag_format: Rc<RefCell<serde_json::Value>>,
    teams: Rc<RefCell<Vec<Team>>>,

    // Un gate por familia de fetch: solo la respuesta más reciente de cada
    // familia llega a hacer commit (ver fetch_gate.rs).
    flags_gate: FetchGate,
    filter_config_gate: FetchGate,
    teams_gate: FetchGate,
}

impl<T> Clone for FarmStore<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            credential: self.credential.clone(),
            total_flags: self.total_flags.clone(),
            selected_page: self.selected_page.clone(),
            flags: self.flags.clone(),
            flag_filters: self.flag_filters.clone(),
            server_tz: self.server_tz.clone(),
            filter_options: self.filter_options.clone(),
            flag_format: self.flag_format.clone(),
            teams: self.teams.clone(),
            flags_gate: self.flags_gate.clone(),
            filter_config_gate: self.filter_config_gate.clone(),
            teams_gate: self.teams_gate.clone(),
        }
    }
}

impl<T: Transport> FarmStore<T> {
    pub fn new(api: Rc<ApiClient<T>>, credential: CredentialState) -> Self {
        Self {
            api,
            credential,
            total_flags: Rc::new(RefCell::new(0)),
            selected_page: Rc::new(RefCell::new(1)),
            flags: Rc::new(RefCell::new(Vec::new())),
            flag_filters: Rc::new(RefCell::new(None)),
            server_tz: Rc::new(RefCell::new(None)),
            filter_options: Rc::new(RefCell::new(FilterOptions::default())),
            flag_format: Rc::new(RefCell::new(serde_json::Value::Null)),
            teams: Rc::new(RefCell::new(Vec::new())),
            flags_gate: FetchGate::new(),
            filter_config_gate: FetchGate::new(),
            teams_gate: FetchGate::new(),
        }
    }

    // ------------------------------------------------------------------
    // Getters (siempre copia/clone; nadie lee-modifica el estado directo)
    // ------------------------------------------------------------------

    pub fn total_flags(&self) -> u64 {
        *self.total_flags.borrow()
    }

    pub fn selected_page(&self) -> u32 {
        *self.selected_page.borrow()
    }

    pub fn flags(&self) -> Vec<Flag> {
        self.flags.borrow().clone()
    }

    pub fn flag_filters(&self) -> Option<FilterSet> {
        self.flag_filters.borrow().clone()
    }

    pub fn server_tz(&self) -> Option<String> {
        self.server_tz.borrow().clone()
    }

    pub fn filter_options(&self) -> FilterOptions {
        self.filter_options.borrow().clone()
    }

    pub fn flag_format(&self) -> serde_json::Value {
        self.flag_format.borrow().clone()
    }

    pub fn teams(&self) -> Vec<Team> {
        self.teams.borrow().clone()
    }

    pub fn server_password(&self) -> Option<String> {
        self.credential.get()
    }

    // ------------------------------------------------------------------
    // Commits
    // ------------------------------------------------------------------

    pub fn commit_total_flags(&self, total: u64) {
        *self.total_flags.borrow_mut() = total;
    }

    pub fn commit_selected_page(&self, page: u32) {
        *self.selected_page.borrow_mut() = page;
    }

    pub fn commit_flags(&self, flags: Vec<Flag>) {
        *self.flags.borrow_mut() = flags;
    }

    /// Reemplaza el set de filtros entero; nunca se mezclan campos de sets
    /// distintos.
    pub fn commit_flag_filters(&self, filters: Option<FilterSet>) {
        *self.flag_filters.borrow_mut() = filters;
    }

    pub fn commit_server_tz(&self, tz: Option<String>) {
        *self.server_tz.borrow_mut() = tz;
    }

    /// Reemplaza las tres listas de opciones a la vez.
    pub fn commit_filter_options(&self, options: FilterOptions) {
        *self.filter_options.borrow_mut() = options;
    }

    pub fn commit_flag_format(&self, format: serde_json::Value) {
        *self.flag_format.borrow_mut() = format;
    }

    pub fn commit_teams(&self, teams: Vec<Team>) {
        *self.teams.borrow_mut() = teams;
    }

    pub fn commit_server_password(&self, password: Option<String>) {
        self.credential.commit(password);
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Pide la página actual de flags con los filtros activos. En éxito
    /// comitea la lista (en el orden del servidor) y el total reportado; en
    /// fallo lo registra y deja el estado anterior visible. Haya ido como
    /// haya ido, después refresca las opciones de filtrado; son dos pasos
    /// secuenciales, no una transacción.
    pub async fn fetch_flags(&self) {
        let ticket = self.flags_gate.begin();

        let mut params: Vec<(String, String)> = vec![
            ("page".to_string(), self.selected_page().to_string()),
            ("page_size".to_string(), FLAGS_PER_PAGE.to_string()),
        ];
        if let Some(filters) = self.flag_filters() {
            params.extend(filters.to_query());
        }

        match self.api.get_json::<FlagsResponse>("/filter_flags", &params).await {
            Ok(data) => {
                if self.flags_gate.admits(ticket) {
                    log::info!("🚩 {} flags recibidas, total {}", data.flags.len(), data.total);
                    self.commit_flags(data.flags);
                    self.commit_total_flags(data.total);
                } else {
                    log::info!("⏭️ Respuesta de flags desfasada, descartada");
                }
            }
            Err(e) => log::error!("❌ Error fetching flags: {}", e),
        }

        self.fetch_filter_options().await;
    }

    /// Comitea la página pedida y relanza el fetch. Sin validación de rango:
    /// el servidor es la autoridad sobre qué páginas existen.
    pub async fn update_page(&self, page: u32) {
        self.commit_selected_page(page);
        self.fetch_flags().await;
    }

    /// Pide la configuración de filtros. En éxito reemplaza opciones, formato
    /// de flag y zona horaria del servidor en bloque; en fallo deja lo
    /// anterior.
    pub async fn fetch_filter_options(&self) {
        let ticket = self.filter_config_gate.begin();

        match self.api.get_json::<FilterConfigResponse>("/filter_config", &[]).await {
            Ok(data) => {
                if self.filter_config_gate.admits(ticket) {
                    self.commit_filter_options(data.filters);
                    self.commit_flag_format(data.flag_format);
                    self.commit_server_tz(Some(data.server_tz));
                } else {
                    log::info!("⏭️ Respuesta de filter_config desfasada, descartada");
                }
            }
            Err(e) => log::error!("❌ Error fetching filter options: {}", e),
        }
    }

    /// Pide la lista de teams y la reemplaza entera en éxito.
    pub async fn fetch_teams(&self) {
        let ticket = self.teams_gate.begin();

        match self.api.get_json::<TeamsResponse>("/teams", &[]).await {
            Ok(teams) => {
                if self.teams_gate.admits(ticket) {
                    log::info!("👥 {} teams recibidos", teams.len());
                    self.commit_teams(teams);
                } else {
                    log::info!("⏭️ Respuesta de teams desfasada, descartada");
                }
            }
            Err(e) => log::error!("❌ Error fetching teams: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api_client::testing::{ok_body, MockTransport};
    use crate::services::api_client::{ApiError, RequestDescriptor, TransportResponse};
    use futures::executor::block_on;
    use futures::future::join;
    use std::cell::Cell;
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    fn flags_body(ids: &[u32], total: u64) -> String {
        let flags: Vec<String> = ids
            .iter()
            .map(|id| {
                format!(
                    r#"{{"flag": "FLAG{id}=", "sploit": "s{id}", "team": "10.60.{id}.2",
                        "time": 1700000000, "status": "QUEUED", "checksystem_response": null}}"#
                )
            })
            .collect();
        format!(r#"{{"flags": [{}], "total": {}, "page": 1, "page_size": 30}}"#, flags.join(","), total)
    }

    fn filter_config_body() -> String {
        r#"{
            "filters": {"sploit": ["s1"], "team": ["10.60.1.2"], "status": ["QUEUED"]},
            "flag_format": "[A-Z0-9]{31}=",
            "server_tz": "UTC"
        }"#
        .to_string()
    }

    fn store_with(
        responses: Vec<Result<TransportResponse, ApiError>>,
    ) -> (FarmStore<MockTransport>, Rc<RefCell<Vec<RequestDescriptor>>>) {
        let transport = MockTransport::new(responses);
        let requests = transport.requests.clone();
        let api = Rc::new(ApiClient::new("http://farm/api".to_string(), transport));
        let store = FarmStore::new(api, CredentialState::new(None));
        (store, requests)
    }

    #[test]
    fn test_fetch_flags_end_to_end() {
        let (store, requests) = store_with(vec![
            ok_body(&flags_body(&[1, 2], 45)),
            ok_body(&filter_config_body()),
        ]);
        store.commit_selected_page(2);
        store.commit_flag_filters(Some(FilterSet {
            status: Some("up".to_string()),
            ..Default::default()
        }));

        block_on(store.fetch_flags());

        let requests = requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url, "http://farm/api/filter_flags");
        assert_eq!(
            requests[0].query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "30".to_string()),
                ("status".to_string(), "up".to_string()),
            ]
        );
        assert_eq!(requests[1].url, "http://farm/api/filter_config");

        assert_eq!(store.flags().len(), 2);
        assert_eq!(store.total_flags(), 45);
        // El refresh de opciones también comiteó lo suyo
        assert_eq!(store.server_tz(), Some("UTC".to_string()));
        assert_eq!(store.filter_options().sploit, vec!["s1".to_string()]);
    }

    #[test]
    fn test_fetch_flags_without_filters_sends_only_paging() {
        let (store, requests) = store_with(vec![
            ok_body(&flags_body(&[1], 1)),
            ok_body(&filter_config_body()),
        ]);

        block_on(store.fetch_flags());

        assert_eq!(
            requests.borrow()[0].query,
            vec![
                ("page".to_string(), "1".to_string()),
                ("page_size".to_string(), "30".to_string()),
            ]
        );
    }

    #[test]
    fn test_fetch_flags_failure_keeps_state_and_still_refreshes_options() {
        let (store, requests) = store_with(vec![
            ok_body(&flags_body(&[1, 2], 45)),
            ok_body(&filter_config_body()),
            Err(ApiError::network("Network error: down")),
            ok_body(&filter_config_body()),
        ]);

        block_on(store.fetch_flags());
        assert_eq!(store.total_flags(), 45);

        block_on(store.fetch_flags());
        // Estado intacto tras el fallo
        assert_eq!(store.flags().len(), 2);
        assert_eq!(store.total_flags(), 45);
        // Y el segundo paso se lanzó igualmente: 4 peticiones en total
        let requests = requests.borrow();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[3].url, "http://farm/api/filter_config");
    }

    #[test]
    fn test_update_page_commits_page_regardless_of_outcome() {
        let (store, _) = store_with(vec![
            Err(ApiError::network("down")),
            Err(ApiError::network("down")),
            ok_body(&flags_body(&[1], 1)),
            ok_body(&filter_config_body()),
        ]);

        block_on(store.update_page(7));
        assert_eq!(store.selected_page(), 7);

        block_on(store.update_page(3));
        assert_eq!(store.selected_page(), 3);
    }

    #[test]
    fn test_filter_options_replaced_wholesale() {
        let (store, _) = store_with(vec![]);

        store.commit_filter_options(FilterOptions {
            team: vec!["A".to_string(), "B".to_string()],
            ..Default::default()
        });
        store.commit_flag_format(serde_json::Value::String("X".to_string()));
        store.commit_server_tz(Some("UTC".to_string()));

        assert_eq!(store.filter_options().team, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(store.flag_format(), serde_json::Value::String("X".to_string()));
        assert_eq!(store.server_tz(), Some("UTC".to_string()));

        // Un commit con opciones vacías reemplaza, no mezcla
        store.commit_filter_options(FilterOptions::default());
        assert!(store.filter_options().team.is_empty());
    }

    #[test]
    fn test_fetch_filter_options_failure_keeps_previous() {
        let (store, _) = store_with(vec![
            ok_body(&filter_config_body()),
            Err(ApiError::http(500, "boom")),
        ]);

        block_on(store.fetch_filter_options());
        assert_eq!(store.server_tz(), Some("UTC".to_string()));

        block_on(store.fetch_filter_options());
        assert_eq!(store.server_tz(), Some("UTC".to_string()));
        assert_eq!(store.filter_options().status, vec!["QUEUED".to_string()]);
    }

    #[test]
    fn test_fetch_teams_replaces_list_and_survives_failure() {
        let (store, _) = store_with(vec![
            ok_body(r#"[{"name": "A", "address": "10.60.1.2"}, {"name": "B", "address": "10.60.2.2"}]"#),
            Err(ApiError::network("down")),
            ok_body(r#"[{"name": "C", "address": "10.60.3.2"}]"#),
        ]);

        block_on(store.fetch_teams());
        assert_eq!(store.teams().len(), 2);

        block_on(store.fetch_teams());
        assert_eq!(store.teams().len(), 2);
        assert_eq!(store.teams()[0].name, "A");

        block_on(store.fetch_teams());
        assert_eq!(store.teams().len(), 1);
        assert_eq!(store.teams()[0].name, "C");
    }

    #[test]
    fn test_flag_filters_replaced_not_merged() {
        let (store, _) = store_with(vec![]);
        store.commit_flag_filters(Some(FilterSet {
            sploit: Some("s1".to_string()),
            status: Some("ACCEPTED".to_string()),
            ..Default::default()
        }));
        store.commit_flag_filters(Some(FilterSet {
            team: Some("10.60.1.2".to_string()),
            ..Default::default()
        }));

        let filters = store.flag_filters().unwrap();
        assert_eq!(filters.team, Some("10.60.1.2".to_string()));
        assert_eq!(filters.sploit, None);
        assert_eq!(filters.status, None);

        store.commit_flag_filters(None);
        assert!(store.flag_filters().is_none());
    }

    // --------------------------------------------------------------
    // Carrera de respuestas desordenadas: la desfasada no hace commit
    // --------------------------------------------------------------

    struct YieldOnce {
        yielded: bool,
    }

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.yielded {
                Poll::Ready(())
            } else {
                self.yielded = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    /// Retrasa la primera petición un turno del event loop, de modo que su
    /// respuesta llega después de la de una petición posterior.
    struct DelayFirstTransport {
        inner: MockTransport,
        pending_delay: Cell<bool>,
    }

    impl Transport for DelayFirstTransport {
        async fn execute(
            &self,
            request: &RequestDescriptor,
        ) -> Result<TransportResponse, ApiError> {
            if self.pending_delay.replace(false) {
                YieldOnce { yielded: false }.await;
            }
            self.inner.execute(request).await
        }
    }

    #[test]
    fn test_stale_overlapping_response_is_dropped() {
        // Orden de resolución: el fetch B (página nueva) responde primero con
        // total 45; el fetch A (desfasado) responde después con total 999 y
        // debe descartarse.
        let transport = DelayFirstTransport {
            inner: MockTransport::new(vec![
                ok_body(&flags_body(&[3, 4], 45)),
                ok_body(&filter_config_body()),
                ok_body(&flags_body(&[1], 999)),
                ok_body(&filter_config_body()),
            ]),
            pending_delay: Cell::new(true),
        };
        let api = Rc::new(ApiClient::new("http://farm/api".to_string(), transport));
        let store = FarmStore::new(api, CredentialState::new(None));

        let stale = store.fetch_flags();
        let fresh = store.fetch_flags();
        block_on(join(stale, fresh));

        assert_eq!(store.total_flags(), 45);
        assert_eq!(store.flags().len(), 2);
        assert_eq!(store.flags()[0].sploit, "s3");
    }
}
