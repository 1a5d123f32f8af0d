//! normalize.rs
//!
//! Convierte las filas crudas del CSV en `LocationRecord` para el mapa.
//!
//! - `lat`/`long` se interpretan como flotantes por prefijo ("41.8 N" -> 41.8)
//! - `prof` como entero por prefijo ("5.9" -> 5, "0x1A" -> 26)
//! - Se descarta la fila si lat o long no dan un número finito
//! - `prof` y `tipologia` no se validan: si vienen mal quedan en `None`
//!
//! El `id` es la posición de la fila en el CSV, asignada antes de filtrar.

use crate::types::{LocationRecord, LocationSet, RawRecord};

pub fn normalize_locations(rows: &[RawRecord]) -> Vec<LocationRecord> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let lat = row.get("lat").and_then(parse_float_prefix).filter(|v| v.is_finite())?;
            let long = row.get("long").and_then(parse_float_prefix).filter(|v| v.is_finite())?;
            Some(LocationRecord {
                id: i.to_string(),
                numero: row.get("numero").map(str::to_string),
                lat,
                long,
                profondita: row.get("prof").and_then(parse_int_prefix),
                tipologia: row.get("tipologia").map(str::to_string),
            })
        })
        .collect()
}

pub fn location_set(rows: Vec<RawRecord>) -> LocationSet {
    LocationSet { total_rows: rows.len(), locations: normalize_locations(&rows) }
}

/// Búsqueda de la tabla: subcadena sin distinguir mayúsculas sobre `numero`.
pub fn filter_by_label<'a>(items: &'a [LocationRecord], term: &str) -> Vec<&'a LocationRecord> {
    if term.is_empty() {
        return items.iter().collect();
    }
    let needle = term.to_lowercase();
    items
        .iter()
        .filter(|it| {
            it.numero
                .as_deref()
                .map_or(false, |n| n.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Mayor prefijo decimal válido tras espacios iniciales; admite `Infinity` con signo.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+') | Some(b'-')) { i += 1; }

    if s[i..].starts_with("Infinity") {
        return Some(if b.first() == Some(&b'-') { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() { i += 1; }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < b.len() && b[j].is_ascii_digit() { j += 1; }
        digits += j - frac_start;
        if digits > 0 { i = j; }
    }
    if digits == 0 { return None; }

    // exponente solo si lleva al menos un dígito
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') { j += 1; }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() { j += 1; }
        if j > exp_start { i = j; }
    }

    s[..i].parse::<f64>().ok()
}

/// Mayor prefijo entero tras espacios iniciales; `0x` cambia a base 16.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (neg, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, rest) = if rest.starts_with("0x") || rest.starts_with("0X") {
        (16, &rest[2..])
    } else {
        (10, rest)
    };
    let end = rest
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(rest.len(), |(idx, _)| idx);
    if end == 0 { return None; }
    let magnitude = i64::from_str_radix(&rest[..end], radix).ok()?;
    Some(if neg { -magnitude } else { magnitude })
}
