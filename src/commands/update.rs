//! # Subida de archivos (`/update`)
//! src/commands/update.rs
//!
//! Protocolo crudo sobre la misma conexión del request:
//!
//! ```text
//! GET /update?update=www%2Findex.html HTTP/1.1\r\n
//! Host: esp32\r\n
//! \r\n
//! <bytes del archivo>#fileend#
//! ```
//!
//! No hay `Content-Length`: el archivo termina en el centinela `#fileend#`
//! o cuando el cliente cierra la conexión. Ambos casos cuentan como subida
//! completa. No hay tamaño máximo ni timeout.
//!
//! El destino se resuelve contra la raíz configurada; `%2F` se reemplaza
//! por `/` y no se hace ningún otro percent-decoding. Destinos con `..`,
//! `.` o absolutos se rechazan. Las blacklists de lectura no aplican: subir
//! un nuevo `main.py` es justamente el caso de uso.

use crate::config::{UPLOAD_CHUNK_SIZE, UPLOAD_SENTINEL};
use crate::error::ServeError;
use crate::http::{replace_all, Method, Request, ResponseWriter, StatusCode};
use crate::static_files::is_inside_root;
use memchr::memmem;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

/// Path de la ruta built-in
pub const UPDATE_PATH: &str = "/update";

/// Nombre del parámetro con el path destino
const DESTINATION_PARAM: &str = "update";

/// Handler para /update?update=PATH
///
/// # Respuestas
/// - 200 con body vacío cuando el archivo quedó escrito
/// - Página 500 si el método no es GET, falta `update`, el destino sale de
///   la raíz o no se puede escribir
pub fn update_handler(req: &Request, out: &mut ResponseWriter<'_>) -> io::Result<()> {
    if req.method() != Some(&Method::GET) {
        warn!(method = req.method().map(Method::as_str), "update requiere GET");
        out.render_error(StatusCode::InternalServerError);
        return Ok(());
    }

    let params = req.params(out.config().param_mode);
    let Some(destination) = params.get(DESTINATION_PARAM) else {
        warn!("update sin parámetro de destino");
        out.render_error(StatusCode::InternalServerError);
        return Ok(());
    };

    let destination = destination.replace("%2F", "/");
    if destination.is_empty() || !is_inside_root(&destination) {
        warn!(destination = %destination, "destino fuera de la raíz");
        out.render_error(StatusCode::InternalServerError);
        return Ok(());
    }
    let path = out.config().resolve(&destination);
    info!(file = %path.display(), "recibiendo archivo");

    match receive(&path, req.body(), out) {
        Ok(bytes) => {
            info!(file = %path.display(), bytes, "archivo actualizado");
            out.send_ok()
        }
        Err(e) => {
            warn!(file = %path.display(), error = %e, "update fallido");
            out.fail(e.status());
            Ok(())
        }
    }
}

/// Escribe el archivo: primero el body ya leído, después lecturas de 8192
/// bytes hasta encontrar el centinela o hasta que el peer cierre
fn receive(path: &Path, initial: &[u8], out: &mut ResponseWriter<'_>) -> Result<u64, ServeError> {
    let mut file = File::create(path).map_err(ServeError::UploadWrite)?;
    let mut written = 0u64;

    if write_chunk(&mut file, initial, &mut written)? {
        return finish(file, written);
    }

    let mut buffer = vec![0u8; UPLOAD_CHUNK_SIZE];
    loop {
        let n = out.read(&mut buffer)?;
        if n == 0 {
            // El peer cerró: se da por terminada la subida
            return finish(file, written);
        }
        if write_chunk(&mut file, &buffer[..n], &mut written)? {
            return finish(file, written);
        }
    }
}

/// Escribe un chunk sin el centinela; `true` si el centinela apareció
fn write_chunk(file: &mut File, chunk: &[u8], written: &mut u64) -> Result<bool, ServeError> {
    let done = memmem::find(chunk, UPLOAD_SENTINEL).is_some();
    let data = if done {
        replace_all(chunk, UPLOAD_SENTINEL, b"")
    } else {
        chunk.to_vec()
    };

    file.write_all(&data).map_err(ServeError::UploadWrite)?;
    *written += data.len() as u64;
    Ok(done)
}

fn finish(mut file: File, written: u64) -> Result<u64, ServeError> {
    file.flush().map_err(ServeError::UploadWrite)?;
    Ok(written)
}
