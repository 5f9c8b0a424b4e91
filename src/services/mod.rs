pub mod api_client;
pub mod interceptors;

pub use api_client::{
    ApiClient, ApiError, FilterConfigResponse, FlagsResponse, RequestDescriptor, Transport,
    TransportResponse,
};
pub use interceptors::{
    error_handler_interceptor, install_interceptors, password_check_interceptor, ResponseObserver,
};

#[cfg(target_arch = "wasm32")]
pub use api_client::GlooTransport;
