// ============================================================================
// ROUTER - Rutas con nombre y navegación programática
// ============================================================================
// The route table itself (which view renders where) belongs to the rendering
// layer; this module only knows the route names and how to push one.

/// Named routes of the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Flags,
    Teams,
    Login,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Flags => "flags",
            Route::Teams => "teams",
            Route::Login => "login",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Flags => "/",
            Route::Teams => "/teams",
            Route::Login => "/login",
        }
    }
}

/// Pushes a history entry for the route and notifies the rendering layer with
/// a `routechange` CustomEvent carrying the route name.
#[cfg(target_arch = "wasm32")]
pub fn push(route: Route) {
    use wasm_bindgen::JsValue;

    let Some(window) = web_sys::window() else {
        return;
    };

    if let Ok(history) = window.history() {
        if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(route.path())) {
            log::error!("❌ Error pushing route {}: {:?}", route.name(), e);
            return;
        }
    }

    let init = web_sys::CustomEventInit::new();
    init.set_detail(&JsValue::from_str(route.name()));
    if let Ok(event) = web_sys::CustomEvent::new_with_event_init_dict("routechange", &init) {
        let _ = window.dispatch_event(&event);
    }
    log::info!("🧭 Navegando a la ruta: {}", route.name());
}
