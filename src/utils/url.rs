// ============================================================================
// URL - Acceso a la query string de la página actual
// ============================================================================

/// Reads the `password` query parameter from the current page URL.
/// The password can be handed out as a link: `https://farm/?password=...`.
#[cfg(target_arch = "wasm32")]
pub fn password_from_location() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    password_from_query(&search)
}

/// Parses the `password` parameter out of a raw query string ("?a=b&c=d").
pub fn password_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    if query.is_empty() {
        return None;
    }
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == "password" {
            return Some(decode_component(value));
        }
    }
    None
}

// Minimal percent-decoding, enough for opaque password tokens. Trabaja byte
// a byte: tras un '%' puede venir cualquier cosa, incluido UTF-8 multibyte,
// y eso no puede romper el parseo.
fn decode_component(value: &str) -> String {
    let value = value.replace('+', " ");
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or(value)
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
