//! # Parsing de Requests HTTP
//! src/http/request.rs
//!
//! Parser minimalista que trabaja sobre una única lectura del socket.
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /path?update=file.txt HTTP/1.1\r\n
//! Host: 192.168.4.1\r\n
//! \r\n
//! <body>
//! ```
//!
//! ## Reglas
//!
//! 1. **Request Line**: todo lo anterior al primer `\r\n`, separado por
//!    espacios simples en `METHOD PATH VERSION`. Si faltan tokens el
//!    request se construye igual, pero sin método (el router responde 500).
//! 2. **Headers**: bloque hasta el primer `\r\n\r\n`, una línea `Name: Value`
//!    por header. Los nombres se guardan tal cual llegaron.
//! 3. **Body**: los bytes restantes de la lectura, sin recortar a
//!    `Content-Length`.
//!
//! Si falta cualquiera de los dos separadores el parse falla con
//! [`ParseError`] y el servidor responde con la página 404.

use super::params::{self, ParamMode};
use memchr::memmem;
use std::collections::HashMap;
use tracing::debug;

/// Métodos HTTP reconocidos
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso (y el canal de upload de `/update`)
    GET,

    /// POST - Enviar datos `k=v&k=v` en el body
    POST,

    /// PUT - Reemplazar un recurso
    PUT,

    /// DELETE - Eliminar un recurso
    DELETE,

    /// Cualquier otro token; se enruta igual que los demás
    Other(String),
}

impl Method {
    /// Convierte el primer token de la request line en un método
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::Other(token) => token,
        }
    }
}

/// Request parseado. Uno por conexión, nunca compartido entre threads.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// `None` cuando la request line tiene menos de 3 tokens
    method: Option<Method>,

    /// Request-target completo, query string incluida
    path: Option<String>,

    /// Versión HTTP, solo informativa
    version: Option<String>,

    headers: HashMap<String, String>,

    /// Bytes posteriores al bloque de headers dentro de la primera lectura
    body: Vec<u8>,
}

/// Request malformado: falta uno de los separadores
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No hay `\r\n` que cierre la request line
    MissingRequestLineEnd,

    /// No hay `\r\n\r\n` entre headers y body
    MissingHeaderEnd,

    /// La request line no es UTF-8
    InvalidRequestLine,

    /// El bloque de headers no es UTF-8
    InvalidHeaders,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingRequestLineEnd => write!(f, "Malformed request: no CRLF after request line"),
            ParseError::MissingHeaderEnd => write!(f, "Malformed request: no CRLF CRLF after headers"),
            ParseError::InvalidRequestLine => write!(f, "Malformed request: request line is not UTF-8"),
            ParseError::InvalidHeaders => write!(f, "Malformed request: headers are not UTF-8"),
        }
    }
}

impl std::error::Error for ParseError {}

impl Request {
    /// Parsea un request desde los bytes de una lectura
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use tiny_httpd::http::{Method, Request};
    ///
    /// let raw = b"GET /index.html HTTP/1.1\r\nHost: esp32\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), Some(&Method::GET));
    /// assert_eq!(request.path(), "/index.html");
    /// assert_eq!(request.header("Host"), Some("esp32"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // 1. Request line
        let line_end = memmem::find(buffer, b"\r\n").ok_or(ParseError::MissingRequestLineEnd)?;
        let request_line = std::str::from_utf8(&buffer[..line_end])
            .map_err(|_| ParseError::InvalidRequestLine)?;

        let mut request = Request::default();
        let tokens: Vec<&str> = request_line.trim().split(' ').collect();
        if tokens.len() >= 3 {
            request.method = Some(Method::from_token(tokens[0]));
            request.path = Some(tokens[1].to_string());
            request.version = Some(tokens[2].to_string());
        } else {
            debug!(line = request_line, "request line incompleta, sin método");
        }

        // 2. Headers y body
        let (raw_headers, body) = Self::split_header_block(&buffer[line_end + 2..])?;
        request.headers = Self::parse_headers(raw_headers)?;
        request.body = body.to_vec();

        Ok(request)
    }

    /// Separa el resto del buffer en el primer `\r\n\r\n`. Un request sin
    /// ningún header no lo tiene y es malformado.
    fn split_header_block(rest: &[u8]) -> Result<(&[u8], &[u8]), ParseError> {
        let end = memmem::find(rest, b"\r\n\r\n").ok_or(ParseError::MissingHeaderEnd)?;
        Ok((&rest[..end], &rest[end + 4..]))
    }

    /// Cada línea se corta en el primer `": "`; las que no lo tienen se ignoran
    fn parse_headers(raw: &[u8]) -> Result<HashMap<String, String>, ParseError> {
        let raw = std::str::from_utf8(raw).map_err(|_| ParseError::InvalidHeaders)?;
        let mut headers = HashMap::new();

        for line in raw.split("\r\n") {
            match line.trim().split_once(": ") {
                Some((name, value)) => {
                    headers.insert(name.to_string(), value.to_string());
                }
                None => debug!(line, "header sin separador ignorado"),
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Método HTTP, `None` si la request line estaba incompleta
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// Path crudo (con query string). Vacío si no hubo request line completa.
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or("")
    }

    /// Path sin query string: la clave de la tabla de rutas
    pub fn route_key(&self) -> &str {
        let path = self.path();
        match path.find('?') {
            Some(pos) => &path[..pos],
            None => path,
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico (sensible a mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Parámetros del request; ver [`params::decode`]
    pub fn params(&self, mode: ParamMode) -> HashMap<String, String> {
        params::decode(self, mode)
    }
}
