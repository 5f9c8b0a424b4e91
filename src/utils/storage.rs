// ============================================================================
// STORAGE - Persistencia en localStorage (con fallback en memoria para tests)
// ============================================================================

use serde::{de::DeserializeOwned, Serialize};

#[cfg(target_arch = "wasm32")]
mod backend {
    use web_sys::{window, Storage};

    pub fn get_local_storage() -> Option<Storage> {
        window()?.local_storage().ok()?
    }

    pub fn set_item(key: &str, value: &str) -> Result<(), String> {
        let storage = get_local_storage().ok_or("No se pudo acceder a localStorage")?;
        storage
            .set_item(key, value)
            .map_err(|_| "Error guardando en localStorage".to_string())
    }

    pub fn get_item(key: &str) -> Option<String> {
        get_local_storage()?.get_item(key).ok()?
    }

    pub fn remove_item(key: &str) -> Result<(), String> {
        let storage = get_local_storage().ok_or("No se pudo acceder a localStorage")?;
        storage
            .remove_item(key)
            .map_err(|_| "Error eliminando de localStorage".to_string())
    }
}

// Fuera de wasm no hay localStorage; un mapa en memoria mantiene la misma
// semántica para los tests nativos.
#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use std::cell::RefCell;
    use std::collections::HashMap;

    thread_local! {
        static STORE: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
    }

    pub fn set_item(key: &str, value: &str) -> Result<(), String> {
        STORE.with(|store| {
            store.borrow_mut().insert(key.to_string(), value.to_string());
        });
        Ok(())
    }

    pub fn get_item(key: &str) -> Option<String> {
        STORE.with(|store| store.borrow().get(key).cloned())
    }

    pub fn remove_item(key: &str) -> Result<(), String> {
        STORE.with(|store| {
            store.borrow_mut().remove(key);
        });
        Ok(())
    }
}

pub fn save_to_storage<T: Serialize>(key: &str, value: &T) -> Result<(), String> {
    let json = serde_json::to_string(value)
        .map_err(|e| format!("Error serializando datos: {}", e))?;
    backend::set_item(key, &json)
}

pub fn load_from_storage<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = backend::get_item(key)?;
    serde_json::from_str(&json).ok()
}

pub fn remove_from_storage(key: &str) -> Result<(), String> {
    backend::remove_item(key)
}
