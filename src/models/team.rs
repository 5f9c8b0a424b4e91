use serde::{Deserialize, Serialize};

/// One opponent team, as listed by the farm server config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub address: String,
}
