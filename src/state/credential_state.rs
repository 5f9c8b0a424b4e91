// ============================================================================
// CREDENTIAL STATE - La contraseña del servidor, compartida y persistida
// ============================================================================
// La celda es un Rc compartido entre el store y el request interceptor: el
// valor que guarda el store y el que se inyecta en la petición son el mismo
// por construcción, sin ventana de desincronización.

use crate::utils::{load_from_storage, save_to_storage, SERVER_PASSWORD_KEY};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone)]
pub struct CredentialState {
    value: Rc<RefCell<Option<String>>>,
}

impl CredentialState {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            value: Rc::new(RefCell::new(initial)),
        }
    }

    /// Restaura la contraseña persistida de sesiones anteriores. Es el único
    /// campo del store que sobrevive a un reload.
    pub fn load() -> Self {
        let persisted: Option<String> =
            load_from_storage::<Option<String>>(SERVER_PASSWORD_KEY).flatten();
        Self::new(persisted)
    }

    pub fn get(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    /// Commit: reemplaza el valor y lo persiste.
    pub fn commit(&self, password: Option<String>) {
        if let Err(e) = save_to_storage(SERVER_PASSWORD_KEY, &password) {
            log::error!("❌ Error persistiendo la contraseña: {}", e);
        }
        *self.value.borrow_mut() = password;
    }

    /// Resuelve la credencial para la próxima petición: el parámetro de la URL
    /// gana siempre que esté presente; si no, el valor guardado. Si el valor
    /// resuelto difiere del guardado se hace commit (y se persiste).
    ///
    /// La comparación es igualdad estricta de `Option<String>`. El original
    /// comparaba con igualdad laxa; aquí dos tokens distintos son distintos
    /// aunque parezcan el mismo número ("07" != "7").
    pub fn resolve(&self, url_password: Option<String>) -> Option<String> {
        let held = self.get();
        let resolved = url_password.or_else(|| held.clone());
        if resolved != held {
            self.commit(resolved.clone());
        }
        resolved
    }
}
