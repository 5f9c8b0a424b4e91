// ============================================================================
// FILTER MODELS - Filtros activos y opciones de filtrado del servidor
// ============================================================================

use serde::{Deserialize, Serialize};

/// Active server-side constraints on the flag listing. Field names follow the
/// server's query parameters. The store replaces the whole set at once; there
/// is no field-by-field merging across commits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sploit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksystem_response: Option<String>,
    #[serde(
        default,
        rename = "time-since",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_since: Option<String>,
    #[serde(
        default,
        rename = "time-until",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_until: Option<String>,
}

impl FilterSet {
    /// Query parameters for the fields that are actually set, using the
    /// server's wire names.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let fields: [(&str, &Option<String>); 7] = [
            ("sploit", &self.sploit),
            ("status", &self.status),
            ("team", &self.team),
            ("flag", &self.flag),
            ("checksystem_response", &self.checksystem_response),
            ("time-since", &self.time_since),
            ("time-until", &self.time_until),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                params.push((name.to_string(), value.clone()));
            }
        }
        params
    }

    pub fn is_empty(&self) -> bool {
        self.to_query().is_empty()
    }
}

/// The server-declared universe of valid filter values per dimension.
/// Dimensions the server omits come back as empty lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub sploit: Vec<String>,
    #[serde(default)]
    pub team: Vec<String>,
    #[serde(default)]
    pub status: Vec<String>,
}
