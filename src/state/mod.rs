pub mod credential_state;
pub mod fetch_gate;
pub mod store;

pub use credential_state::CredentialState;
pub use fetch_gate::FetchGate;
pub use store::FarmStore;
