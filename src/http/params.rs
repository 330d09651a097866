//! # Decodificación de parámetros
//! src/http/params.rs
//!
//! Extrae pares `clave=valor` de un request:
//! - POST: del body, separado por `&`
//! - GET: del path, separado por `?`
//!
//! No hay URL-decoding. Cada fragmento se corta por `=` y solo se acepta si
//! quedan exactamente dos partes; el resto se descarta sin error.
//!
//! ## Modos para GET
//!
//! [`ParamMode::Literal`] reproduce el comportamiento que esperan los
//! clientes existentes: el path completo se corta en `?`, así que
//! `/x?a=1&b=2` produce los fragmentos `/x` y `a=1&b=2`, y ninguno es un
//! par válido. [`ParamMode::Query`] toma solo lo que sigue al primer `?` y
//! lo separa por `&`.

use super::request::{Method, Request};
use std::collections::HashMap;

/// Cómo se interpretan los parámetros de un GET
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ParamMode {
    /// Separar el path completo por `?`
    #[default]
    Literal,

    /// Separar la query string por `&`
    Query,
}

/// Decodifica los parámetros de un request
///
/// # Ejemplo
/// ```
/// use tiny_httpd::http::{ParamMode, Request};
///
/// let raw = b"GET /update?update=www%2Findex.html HTTP/1.1\r\nHost: esp32\r\n\r\n";
/// let request = Request::parse(raw).unwrap();
/// let params = request.params(ParamMode::Literal);
///
/// assert_eq!(params.get("update").map(String::as_str), Some("www%2Findex.html"));
/// ```
pub fn decode(request: &Request, mode: ParamMode) -> HashMap<String, String> {
    match request.method() {
        Some(Method::POST) => {
            let body = String::from_utf8_lossy(request.body());
            collect_pairs(body.split('&'))
        }
        Some(Method::GET) => match mode {
            ParamMode::Literal => collect_pairs(request.path().split('?')),
            ParamMode::Query => match request.path().split_once('?') {
                Some((_, query)) => collect_pairs(query.split('&')),
                None => HashMap::new(),
            },
        },
        _ => HashMap::new(),
    }
}

/// Duplicados: gana la última aparición
fn collect_pairs<'a>(fragments: impl Iterator<Item = &'a str>) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for fragment in fragments {
        let parts: Vec<&str> = fragment.split('=').collect();
        if let [key, value] = parts.as_slice() {
            params.insert(key.to_string(), value.to_string());
        }
    }

    params
}
