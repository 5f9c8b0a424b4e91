/// Flags mostradas por página. Fijo en tiempo de compilación, el servidor
/// acepta 1..=100.
pub const FLAGS_PER_PAGE: u32 = 30;

/// localStorage key for the persisted server password. The password is the
/// only durable piece of store state.
pub const SERVER_PASSWORD_KEY: &str = "farmMonitor_serverPassword";
