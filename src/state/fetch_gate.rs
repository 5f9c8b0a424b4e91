// ============================================================================
// FETCH GATE - Último-gana para peticiones solapadas
// ============================================================================
// Los fetch no se cancelan ni se deduplican: cambios de página rápidos dejan
// varias peticiones en vuelo y las respuestas pueden llegar desordenadas. El
// gate da un ticket monótono por invocación y solo deja hacer commit a la
// respuesta del ticket más reciente; las demás se descartan.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct FetchGate {
    current: Rc<Cell<u64>>,
}

impl FetchGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emite el ticket de una nueva invocación, invalidando los anteriores.
    pub fn begin(&self) -> u64 {
        let ticket = self.current.get() + 1;
        self.current.set(ticket);
        ticket
    }

    /// ¿Sigue siendo este ticket el más reciente?
    pub fn admits(&self, ticket: u64) -> bool {
        self.current.get() == ticket
    }
}
