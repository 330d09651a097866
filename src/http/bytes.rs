//! Utilidades sobre slices de bytes

use memchr::memmem;

/// Reemplaza todas las apariciones (sin solaparse, de izquierda a derecha)
pub(crate) fn replace_all(haystack: &[u8], pattern: &[u8], with: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut last = 0;

    for pos in memmem::find_iter(haystack, pattern) {
        out.extend_from_slice(&haystack[last..pos]);
        out.extend_from_slice(with);
        last = pos + pattern.len();
    }

    out.extend_from_slice(&haystack[last..]);
    out
}
