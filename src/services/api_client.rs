// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio: un transporte configurado con una URL base y la
// cadena de interceptores instalada. Sin retry, sin cache.
// ============================================================================

use crate::models::{Flag, FilterOptions, Team};
use crate::services::interceptors::ResponseObserver;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;

/// Fallo de una petición. `status` es `None` cuando nunca hubo respuesta
/// (fallo de red).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self { status: None, message: message.into() }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self { status: Some(status), message: message.into() }
    }

    pub fn is_forbidden(&self) -> bool {
        self.status == Some(403)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Petición en construcción: lo que ven (y mutan) los request interceptors
/// antes de que el transporte la ejecute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn get(url: String, query: Vec<(String, String)>) -> Self {
        Self { url, query, headers: Vec::new() }
    }

    /// Sets a header, replacing any previous value for the same name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(existing, _)| existing != name);
        self.headers.push((name.to_string(), value.to_string()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Respuesta cruda del transporte, antes de parsear JSON.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Transporte HTTP. En producción es gloo-net; los tests usan un mock.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn execute(&self, request: &RequestDescriptor) -> Result<TransportResponse, ApiError>;
}

pub type RequestInterceptor = Box<dyn Fn(&mut RequestDescriptor)>;

/// Cliente configurado contra una URL base, con pipeline explícito de
/// interceptores: lista ordenada de transformaciones de petición y de
/// observadores de respuesta.
pub struct ApiClient<T> {
    base_url: String,
    transport: T,
    request_interceptors: Vec<RequestInterceptor>,
    response_observers: Vec<ResponseObserver>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: String, transport: T) -> Self {
        Self {
            base_url,
            transport,
            request_interceptors: Vec::new(),
            response_observers: Vec::new(),
        }
    }

    pub fn with_request_interceptor(
        mut self,
        interceptor: impl Fn(&mut RequestDescriptor) + 'static,
    ) -> Self {
        self.request_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn with_response_observer(mut self, observer: ResponseObserver) -> Self {
        self.response_observers.push(observer);
        self
    }

    /// GET parametrizado: interceptores de petición en orden, transporte,
    /// observadores de respuesta, y por último el parseo JSON. Los
    /// observadores nunca se tragan el error; solo añaden efectos.
    pub async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<R, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = RequestDescriptor::get(url, query.to_vec());
        for interceptor in &self.request_interceptors {
            interceptor(&mut request);
        }

        let outcome = self.transport.execute(&request).await;
        for observer in &self.response_observers {
            match &outcome {
                Ok(response) => (observer.on_success)(response.status),
                Err(error) => (observer.on_failure)(error),
            }
        }

        let response = outcome?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::http(response.status, format!("Parse error: {}", e)))
    }
}

/// Transporte de producción sobre gloo-net.
#[cfg(target_arch = "wasm32")]
pub struct GlooTransport;

#[cfg(target_arch = "wasm32")]
impl Transport for GlooTransport {
    async fn execute(&self, request: &RequestDescriptor) -> Result<TransportResponse, ApiError> {
        let mut builder = gloo_net::http::Request::get(&request.url).query(
            request
                .query
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::network(format!("Network error: {}", e)))?;

        let status = response.status();
        if !response.ok() {
            return Err(ApiError::http(
                status,
                format!("HTTP {}: {}", status, response.status_text()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::http(status, format!("Body error: {}", e)))?;
        Ok(TransportResponse { status, body })
    }
}

// ============================================================================
// Payloads del servidor
// ============================================================================

/// Respuesta de `GET /filter_flags`. El servidor también repite `page` y
/// `page_size`; no los necesitamos.
#[derive(Debug, Clone, Deserialize)]
pub struct FlagsResponse {
    pub flags: Vec<Flag>,
    pub total: u64,
}

/// Respuesta de `GET /filter_config`.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfigResponse {
    pub filters: FilterOptions,
    pub flag_format: serde_json::Value,
    pub server_tz: String,
}

/// Respuesta de `GET /teams`: lista plana.
pub type TeamsResponse = Vec<Team>;
