// ============================================================================
// INTERCEPTORS - Credencial en cada petición, 403 → login
// ============================================================================

use crate::services::api_client::{ApiClient, ApiError, RequestDescriptor, Transport};
use crate::state::CredentialState;

/// Observador de respuesta de dos brazos, el equivalente explícito del par
/// `{ onFulfilled, onRejected }`. El brazo de éxito deja pasar la respuesta
/// sin tocarla; el de fallo solo añade efectos y el error siempre se propaga
/// al llamador.
pub struct ResponseObserver {
    pub on_success: Box<dyn Fn(u16)>,
    pub on_failure: Box<dyn Fn(&ApiError)>,
}

/// Request interceptor: resuelve la credencial (query param `password` por
/// delante del valor guardado) y la adjunta como header `Authorization` en
/// cada petición saliente. Síncrono: corre en el camino crítico.
///
/// `url_password` se inyecta (en producción `utils::url::password_from_location`)
/// para que el interceptor sea testeable sin navegador.
pub fn password_check_interceptor(
    credential: CredentialState,
    url_password: impl Fn() -> Option<String> + 'static,
) -> impl Fn(&mut RequestDescriptor) + 'static {
    move |request| {
        let password = credential.resolve(url_password());
        // Sin credencial también se manda el header, vacío; el servidor es
        // quien decide si eso basta.
        request.set_header("Authorization", password.as_deref().unwrap_or(""));
    }
}

/// Response observer: ante un 403 navega a la vista de login (callback
/// inyectado; en producción `router::push(Route::Login)`). Un fallo sin
/// respuesta (red caída) no tiene status y no navega.
pub fn error_handler_interceptor(on_forbidden: impl Fn() + 'static) -> ResponseObserver {
    ResponseObserver {
        on_success: Box::new(|_status| {}),
        on_failure: Box::new(move |error| {
            if error.is_forbidden() {
                log::warn!("🔒 Servidor respondió 403, redirigiendo a login");
                on_forbidden();
            }
        }),
    }
}

/// Instala la cadena estándar del front en un cliente: credencial en cada
/// petición saliente y 403 → login. Todos los clientes (API de flags/teams,
/// backend de estadísticas) llevan la misma cadena.
pub fn install_interceptors<T: Transport>(
    client: ApiClient<T>,
    credential: CredentialState,
    url_password: impl Fn() -> Option<String> + 'static,
    on_forbidden: impl Fn() + 'static,
) -> ApiClient<T> {
    client
        .with_request_interceptor(password_check_interceptor(credential, url_password))
        .with_response_observer(error_handler_interceptor(on_forbidden))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn request() -> RequestDescriptor {
        RequestDescriptor::get("http://farm/api/filter_flags".to_string(), Vec::new())
    }

    #[test]
    fn test_url_password_wins_and_is_committed() {
        let credential = CredentialState::new(Some("old".to_string()));
        let interceptor =
            password_check_interceptor(credential.clone(), || Some("new".to_string()));

        let mut req = request();
        interceptor(&mut req);

        assert_eq!(req.header("Authorization"), Some("new"));
        assert_eq!(credential.get(), Some("new".to_string()));
    }

    #[test]
    fn test_held_password_used_when_url_has_none() {
        let credential = CredentialState::new(Some("held".to_string()));
        let interceptor = password_check_interceptor(credential.clone(), || None);

        let mut req = request();
        interceptor(&mut req);

        assert_eq!(req.header("Authorization"), Some("held"));
        assert_eq!(credential.get(), Some("held".to_string()));
    }

    #[test]
    fn test_no_password_anywhere_sends_empty_header() {
        let credential = CredentialState::new(None);
        let interceptor = password_check_interceptor(credential.clone(), || None);

        let mut req = request();
        interceptor(&mut req);

        assert_eq!(req.header("Authorization"), Some(""));
        assert_eq!(credential.get(), None);
    }

    #[test]
    fn test_forbidden_navigates_exactly_once() {
        let navigations = Rc::new(RefCell::new(0u32));
        let counter = navigations.clone();
        let observer = error_handler_interceptor(move || *counter.borrow_mut() += 1);

        (observer.on_failure)(&ApiError::http(403, "Forbidden"));
        assert_eq!(*navigations.borrow(), 1);
    }

    #[test]
    fn test_other_failures_do_not_navigate() {
        let navigations = Rc::new(RefCell::new(0u32));
        let counter = navigations.clone();
        let observer = error_handler_interceptor(move || *counter.borrow_mut() += 1);

        (observer.on_failure)(&ApiError::http(500, "boom"));
        (observer.on_failure)(&ApiError::network("down"));
        (observer.on_success)(200);
        assert_eq!(*navigations.borrow(), 0);
    }

    #[test]
    fn test_install_interceptors_wires_credential_and_login_redirect() {
        use crate::services::api_client::testing::MockTransport;
        use futures::executor::block_on;

        let transport = MockTransport::new(vec![Err(ApiError::http(403, "Forbidden"))]);
        let requests = transport.requests.clone();
        let navigations = Rc::new(RefCell::new(0u32));
        let counter = navigations.clone();
        let client = install_interceptors(
            ApiClient::new("http://farm/api/stats".to_string(), transport),
            CredentialState::new(Some("held".to_string())),
            || None,
            move || *counter.borrow_mut() += 1,
        );

        let result: Result<serde_json::Value, ApiError> =
            block_on(client.get_json("/series", &[]));
        assert!(result.unwrap_err().is_forbidden());
        assert_eq!(*navigations.borrow(), 1);
        assert_eq!(
            requests.borrow()[0].header("Authorization"),
            Some("held")
        );
        assert_eq!(requests.borrow()[0].url, "http://farm/api/stats/series");
    }
}
