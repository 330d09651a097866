//! # Módulo HTTP
//!
//! Protocolo HTTP reducido para dispositivos con muy poca memoria:
//!
//! - Parsing de requests a partir de una sola lectura del socket
//! - Decodificación de parámetros `k=v&k=v`
//! - Escritura de respuestas directamente sobre la conexión
//! - Códigos de estado
//!
//! ## Diferencias con HTTP/1.1
//!
//! - Nada de conexiones persistentes ni pipelining: una respuesta y se cierra
//! - Sin chunked transfer-encoding ni `Content-Length` en las respuestas
//! - Las respuestas separan líneas con `\n`, no con `\r\n`
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! <body>
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\n
//! Content-Type: application/json\n
//! \n
//! {"ok": true}\n
//! \n
//! ```

mod bytes;
pub mod params;
pub mod request;
pub mod response;
pub mod status;

pub(crate) use bytes::replace_all;
pub use params::ParamMode;
pub use request::{Method, ParseError, Request};
pub use response::ResponseWriter;
pub use status::StatusCode;
