//! # Escritura de Respuestas HTTP
//!
//! Las respuestas se escriben directamente sobre la conexión, en tres pasos
//! que siempre van en este orden:
//!
//! ```text
//! HTTP/1.1 200 OK\n            <- send_status
//! Content-Type: text/html\n    <- send_headers
//! \n<body>\n\n                 <- send_body (y se cierra la conexión)
//! ```
//!
//! Los saltos de línea son `\n` simples, no `\r\n`: los clientes existentes
//! de este protocolo dependen de ese formato. No hay keep-alive, toda
//! respuesta termina cerrando la conexión.
//!
//! ## Ejemplo de uso
//!
//! ```ignore
//! fn hello(_req: &Request, out: &mut ResponseWriter<'_>) -> std::io::Result<()> {
//!     out.send_status(StatusCode::Ok)?;
//!     out.send_headers([("Content-Type", "text/plain")])?;
//!     out.send_body(b"hello")
//! }
//! ```

use super::bytes::replace_all;
use super::StatusCode;
use crate::config::Config;
use crate::server::Connection;
use serde::Serialize;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Escritor de respuestas sobre una conexión
///
/// Recuerda si ya se escribió algún byte (para decidir si todavía se puede
/// mandar una página de error) y si la conexión ya se cerró.
pub struct ResponseWriter<'a> {
    conn: &'a mut dyn Connection,
    config: &'a Config,
    started: bool,
    closed: bool,
}

impl<'a> ResponseWriter<'a> {
    pub fn new(conn: &'a mut dyn Connection, config: &'a Config) -> Self {
        Self {
            conn,
            config,
            started: false,
            closed: false,
        }
    }

    /// Configuración del servidor (raíz, páginas de error, blacklists)
    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// `true` si ya salió algún byte de la respuesta
    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Lectura bloqueante adicional sobre la misma conexión
    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.conn.read(buf)
    }

    /// Escribe bytes tal cual
    pub fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "connection already closed"));
        }
        self.started = true;
        self.conn.write_all(bytes)
    }

    /// Status line: `HTTP/1.1 <status>\n`
    pub fn send_status(&mut self, status: StatusCode) -> io::Result<()> {
        self.write_raw(format!("HTTP/1.1 {}\n", status).as_bytes())
    }

    /// Un `key: value\n` por header; un mapa vacío no escribe nada
    pub fn send_headers<I, K, V>(&mut self, headers: I) -> io::Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in headers {
            self.write_raw(format!("{}: {}\n", key.as_ref(), value.as_ref()).as_bytes())?;
        }
        Ok(())
    }

    /// `\n` + body + `\n\n`, luego cierra la conexión
    pub fn send_body(&mut self, body: &[u8]) -> io::Result<()> {
        self.write_raw(b"\n")?;
        self.write_raw(body)?;
        self.write_raw(b"\n\n")?;
        self.close()
    }

    /// Cierra la conexión. Llamarlo de nuevo no hace nada.
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.conn.close()
    }

    /// 200 sin headers ni body
    pub fn send_ok(&mut self) -> io::Result<()> {
        self.send_empty(StatusCode::Ok)
    }

    fn send_empty(&mut self, status: StatusCode) -> io::Result<()> {
        self.send_status(status)?;
        self.send_headers(std::iter::empty::<(&str, &str)>())?;
        self.send_body(b"")
    }

    /// 200 con `Content-Type: application/json` y el valor serializado
    pub fn send_json<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        let body = serde_json::to_vec(value)?;
        self.send_status(StatusCode::Ok)?;
        self.send_headers([("Content-Type", "application/json")])?;
        self.send_body(&body)
    }

    /// Renderiza un template sin variables
    pub fn render(&mut self, template: &Path, status: StatusCode) {
        self.render_with(template, &[] as &[(&str, &str)], status);
    }

    /// Renderiza un template HTML línea por línea reemplazando `{{nombre}}`
    ///
    /// El reemplazo es por línea: un placeholder partido entre dos líneas no
    /// se sustituye. Cualquier error (template inexistente, conexión caída)
    /// se registra y la conexión se cierra con lo que ya se haya enviado.
    pub fn render_with<K, V>(&mut self, template: &Path, vars: &[(K, V)], status: StatusCode)
    where
        K: AsRef<str>,
        V: Display,
    {
        if let Err(e) = self.try_render(template, vars, status) {
            warn!(template = %template.display(), error = %e, "render fallido");
        }
        if let Err(e) = self.close() {
            debug!(error = %e, "error al cerrar la conexión");
        }
    }

    fn try_render<K, V>(&mut self, template: &Path, vars: &[(K, V)], status: StatusCode) -> io::Result<()>
    where
        K: AsRef<str>,
        V: Display,
    {
        self.send_status(status)?;
        self.send_headers([("Content-Type", "text/html")])?;
        self.write_raw(b"\n")?;

        let replacements: Vec<(Vec<u8>, Vec<u8>)> = vars
            .iter()
            .map(|(name, value)| {
                (
                    format!("{{{{{}}}}}", name.as_ref()).into_bytes(),
                    value.to_string().into_bytes(),
                )
            })
            .collect();

        let mut reader = BufReader::new(File::open(template)?);
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            let mut rendered = line.clone();
            for (placeholder, value) in &replacements {
                rendered = replace_all(&rendered, placeholder, value);
            }
            self.write_raw(&rendered)?;
        }

        self.write_raw(b"\n\n")
    }

    /// Página de error configurada para `status`
    ///
    /// Los códigos sin template (302, 400, 403) salen con body vacío.
    pub fn render_error(&mut self, status: StatusCode) {
        match self.config.error_page(status) {
            Some(page) => self.render(&page, status),
            None => {
                if let Err(e) = self.send_empty(status) {
                    debug!(error = %e, "no se pudo enviar la respuesta de error");
                }
            }
        }
    }

    /// Respuesta de error de último recurso
    ///
    /// Si todavía no salió nada se renderiza la página de `status`; si la
    /// respuesta ya empezó solo queda cerrar.
    pub fn fail(&mut self, status: StatusCode) {
        if self.started {
            if let Err(e) = self.close() {
                debug!(error = %e, "error al cerrar la conexión");
            }
        } else {
            self.render_error(status);
        }
    }
}
