//! # Errores del servidor
//! src/error.rs
//!
//! Todos los errores se convierten en una respuesta HTTP en el borde de cada
//! conexión; ninguno llega al loop de accept.
//!
//! | Error           | Respuesta |
//! |-----------------|-----------|
//! | `Malformed`     | 404       |
//! | `MissingMethod` | 500       |
//! | `AccessDenied`  | 404       |
//! | `NotFound`      | 404       |
//! | `UploadWrite`   | 500       |
//! | `Io`            | 500       |

use crate::http::{ParseError, StatusCode};
use std::io;

#[derive(Debug)]
pub enum ServeError {
    /// Faltan separadores en el request
    Malformed(ParseError),

    /// Request line incompleta: no hay método
    MissingMethod,

    /// Archivo o directorio en la blacklist
    AccessDenied(String),

    /// No se pudo abrir o leer el archivo pedido
    NotFound(io::Error),

    /// No se pudo escribir el destino de un upload
    UploadWrite(io::Error),

    /// Error de I/O sobre la conexión
    Io(io::Error),
}

impl ServeError {
    /// Página de error que le corresponde a este error
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::Malformed(_) | ServeError::AccessDenied(_) | ServeError::NotFound(_) => {
                StatusCode::NotFound
            }
            ServeError::MissingMethod | ServeError::UploadWrite(_) | ServeError::Io(_) => {
                StatusCode::InternalServerError
            }
        }
    }
}

impl std::fmt::Display for ServeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServeError::Malformed(e) => write!(f, "{}", e),
            ServeError::MissingMethod => write!(f, "Request line without method"),
            ServeError::AccessDenied(path) => write!(f, "Permission denied: {}", path),
            ServeError::NotFound(e) => write!(f, "File not available: {}", e),
            ServeError::UploadWrite(e) => write!(f, "Upload write failed: {}", e),
            ServeError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServeError::Malformed(e) => Some(e),
            ServeError::NotFound(e) | ServeError::UploadWrite(e) | ServeError::Io(e) => Some(e),
            ServeError::MissingMethod | ServeError::AccessDenied(_) => None,
        }
    }
}

impl From<io::Error> for ServeError {
    fn from(e: io::Error) -> Self {
        ServeError::Io(e)
    }
}

impl From<ParseError> for ServeError {
    fn from(e: ParseError) -> Self {
        ServeError::Malformed(e)
    }
}
