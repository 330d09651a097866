//! # Archivos estáticos
//! src/static_files.rs
//!
//! Sirve cualquier path que no esté en la tabla de rutas. El archivo se
//! manda en chunks de 1024 bytes para no cargarlo entero en memoria.
//!
//! Cualquier falla (blacklist, archivo inexistente, error de lectura) termina
//! igual para el cliente: la página 404.

use crate::config::{Config, FILE_CHUNK_SIZE};
use crate::error::ServeError;
use crate::http::{ResponseWriter, StatusCode};
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path};
use tracing::{debug, info};

/// Extensión usada cuando el nombre no tiene punto
const NO_EXTENSION: &str = "bin";

/// Content-Type para extensiones que no están en la tabla
const DEFAULT_CONTENT_TYPE: &str = "application/file";

/// Lo que sigue al último `.`; `bin` si no hay ninguno
pub fn extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => NO_EXTENSION,
    }
}

/// Tabla de tipos MIME por extensión
pub fn content_type(extension: &str) -> &'static str {
    match extension {
        "css" => "text/css",
        "html" => "text/html",
        "jpeg" | "jpg" => "image/jpeg",
        "js" => "text/javascript",
        "json" => "application/json",
        "rtf" => "application/rtf",
        "svg" => "image/svg+xml",
        "ico" => "application/ico",
        "bin" => "file/bin",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// `true` si el path relativo solo tiene segmentos normales, o sea que al
/// resolverlo contra la raíz no puede salir de ella
pub fn is_inside_root(filename: &str) -> bool {
    Path::new(filename)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

/// Rechaza blacklists y cualquier path que no sea una secuencia de
/// segmentos normales (`.`, `..`, absolutos)
pub fn check_access(filename: &str, config: &Config) -> Result<(), ServeError> {
    if !is_inside_root(filename) {
        return Err(ServeError::AccessDenied(filename.to_string()));
    }

    // Path::components ignora `.` intermedios y `//`; las blacklists se
    // comparan contra la forma normalizada
    let normalized = Path::new(filename)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if config.is_denied_file(&normalized) || config.is_denied_dir(&normalized) {
        return Err(ServeError::AccessDenied(filename.to_string()));
    }

    Ok(())
}

/// Abre el archivo pedido, relativo a la raíz configurada
pub fn open(filename: &str, config: &Config) -> Result<File, ServeError> {
    check_access(filename, config)?;

    let path = config.resolve(filename);
    let file = File::open(&path).map_err(ServeError::NotFound)?;
    if file.metadata().map_err(ServeError::NotFound)?.is_dir() {
        return Err(ServeError::NotFound(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is a directory", path.display()),
        )));
    }

    Ok(file)
}

/// Sirve `filename` o, si algo falla, la página 404
pub fn send_file(filename: &str, out: &mut ResponseWriter<'_>) {
    match stream_file(filename, out) {
        Ok(bytes) => info!(file = filename, bytes, "archivo servido"),
        Err(e) => {
            debug!(file = filename, error = %e, "no se pudo servir el archivo");
            out.fail(StatusCode::NotFound);
        }
    }
}

fn stream_file(filename: &str, out: &mut ResponseWriter<'_>) -> Result<u64, ServeError> {
    let mut file = open(filename, out.config())?;

    out.send_status(StatusCode::Ok)?;
    out.send_headers([("Content-Type", content_type(extension(filename)))])?;
    out.write_raw(b"\n")?;

    let mut buffer = [0u8; FILE_CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        out.write_raw(&buffer[..n])?;
        total += n as u64;
    }

    out.write_raw(b"\n\n")?;
    out.close()?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::connection::mock::MockConnection;
    use std::fs;

    fn site() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("html")).unwrap();
        fs::write(dir.path().join("html/404.html"), "<h1>404</h1>").unwrap();
        let config = Config {
            root: dir.path().to_path_buf(),
            ..Config::default()
        };
        (dir, config)
    }

    fn serve(filename: &str, config: &Config) -> MockConnection {
        let mut conn = MockConnection::new();
        let mut out = ResponseWriter::new(&mut conn, config);
        send_file(filename, &mut out);
        conn
    }

    const NOT_FOUND_PAGE: &str = "HTTP/1.1 404 Not Found\nContent-Type: text/html\n\n<h1>404</h1>\n\n";

    #[test]
    fn test_extension() {
        assert_eq!(extension("app.js"), "js");
        assert_eq!(extension("archive.tar.gz"), "gz");
        assert_eq!(extension("firmware"), "bin");
        assert_eq!(extension("trailing."), "");
    }

    #[test]
    fn test_content_type_table() {
        assert_eq!(content_type("css"), "text/css");
        assert_eq!(content_type("html"), "text/html");
        assert_eq!(content_type("jpg"), "image/jpeg");
        assert_eq!(content_type("jpeg"), "image/jpeg");
        assert_eq!(content_type("js"), "text/javascript");
        assert_eq!(content_type("json"), "application/json");
        assert_eq!(content_type("svg"), "image/svg+xml");
        assert_eq!(content_type("ico"), "application/ico");
        assert_eq!(content_type(extension("firmware")), "file/bin");
        assert_eq!(content_type("png"), "application/file");
    }

    #[test]
    fn test_streams_exact_bytes_in_small_chunks() {
        let (dir, config) = site();
        let content: Vec<u8> = (0..2600u32).map(|i| (i % 251) as u8).collect();
        fs::write(dir.path().join("app.js"), &content).unwrap();

        let conn = serve("app.js", &config);

        let head = b"HTTP/1.1 200 OK\nContent-Type: text/javascript\n\n";
        assert!(conn.written.starts_with(head));
        assert!(conn.written.ends_with(b"\n\n"));
        let body = &conn.written[head.len()..conn.written.len() - 2];
        assert_eq!(body, content.as_slice());
        assert!(conn.write_sizes.iter().all(|&n| n <= FILE_CHUNK_SIZE));
        assert!(conn.closed);
    }

    #[test]
    fn test_empty_file() {
        let (dir, config) = site();
        fs::write(dir.path().join("empty.css"), b"").unwrap();

        let conn = serve("empty.css", &config);
        assert_eq!(conn.output(), "HTTP/1.1 200 OK\nContent-Type: text/css\n\n\n\n");
    }

    #[test]
    fn test_blacklisted_file_is_not_found() {
        let (dir, config) = site();
        fs::write(dir.path().join("boot.py"), "secret").unwrap();

        let conn = serve("boot.py", &config);
        assert_eq!(conn.output(), NOT_FOUND_PAGE);

        // Exista o no, la respuesta es la misma
        let conn = serve("main.py", &config);
        assert_eq!(conn.output(), NOT_FOUND_PAGE);
    }

    #[test]
    fn test_blacklisted_directory_is_not_found() {
        let (dir, config) = site();
        fs::create_dir(dir.path().join("python")).unwrap();
        fs::write(dir.path().join("python/lib.py"), "code").unwrap();

        let conn = serve("python/lib.py", &config);
        assert_eq!(conn.output(), NOT_FOUND_PAGE);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_dir, config) = site();
        let conn = serve("nope.html", &config);
        assert_eq!(conn.output(), NOT_FOUND_PAGE);
    }

    #[test]
    fn test_directory_is_not_found() {
        let (_dir, config) = site();
        let conn = serve("html", &config);
        assert_eq!(conn.output(), NOT_FOUND_PAGE);

        let conn = serve("", &config);
        assert_eq!(conn.output(), NOT_FOUND_PAGE);
    }

    #[test]
    fn test_traversal_is_rejected() {
        let (dir, config) = site();
        fs::write(dir.path().join("html/secret.txt"), "x").unwrap();

        assert!(matches!(
            check_access("html/../html/secret.txt", &config),
            Err(ServeError::AccessDenied(_))
        ));
        assert!(matches!(check_access("/etc/passwd", &config), Err(ServeError::AccessDenied(_))));
        assert!(check_access("html/secret.txt", &config).is_ok());

        let conn = serve("../etc/passwd", &config);
        assert_eq!(conn.output(), NOT_FOUND_PAGE);
    }

    #[test]
    fn test_blacklists_hold_for_equivalent_paths() {
        let (dir, config) = site();
        fs::write(dir.path().join("boot.py"), "SECRET").unwrap();
        fs::create_dir(dir.path().join("python")).unwrap();
        fs::write(dir.path().join("python/x.py"), "SECRET").unwrap();

        for filename in ["./boot.py", "python/./x.py", "./python/x.py", "python//x.py", "boot.py/"] {
            assert!(
                matches!(check_access(filename, &config), Err(ServeError::AccessDenied(_))),
                "{}",
                filename
            );
            let conn = serve(filename, &config);
            assert_eq!(conn.output(), NOT_FOUND_PAGE, "{}", filename);
        }
    }
}
