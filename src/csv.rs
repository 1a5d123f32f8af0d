//! csv.rs
//!
//! Parser del CSV publicado por la hoja de cálculo.
//!
//! - Separa por '\n' y por ','; la primera línea son las cabeceras.
//! - Cada valor se empareja por posición con su cabecera y se recorta.
//! - Nunca falla: líneas cortas dejan `None` en las cabeceras finales.
//!
//! No hay soporte de comillas: una coma dentro de un campo desalinea la fila.

use crate::types::RawRecord;

pub fn parse_csv(raw: &str) -> Vec<RawRecord> {
    let mut lines = raw.split('\n');
    let headers: Vec<&str> = match lines.next() {
        Some(first) => first.split(',').map(str::trim).collect(),
        None => return Vec::new(),
    };

    // Las líneas en blanco no se filtran: un '\n' final produce una fila degenerada
    lines
        .map(|line| {
            let values: Vec<&str> = line.split(',').collect();
            let mut rec = RawRecord::new();
            for (i, h) in headers.iter().enumerate() {
                rec.insert(*h, values.get(i).map(|v| v.trim().to_string()));
            }
            rec
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_and_values_are_trimmed() {
        let rows = parse_csv(" numero , lat \n A1 , 41.8 ");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["numero", "lat"]);
        assert_eq!(rows[0].get("numero"), Some("A1"));
        assert_eq!(rows[0].get("lat"), Some("41.8"));
    }

    #[test]
    fn n_lines_give_n_records_in_column_order() {
        let rows = parse_csv("a,b,c\n1,2,3\n4,5,6\n7,8,9");
        assert_eq!(rows.len(), 3);
        for r in &rows {
            assert_eq!(r.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        }
        assert_eq!(rows[2].values().collect::<Vec<_>>(), vec![Some("7"), Some("8"), Some("9")]);
    }

    #[test]
    fn short_line_leaves_trailing_headers_missing() {
        let rows = parse_csv("a,b,c\n1");
        assert_eq!(rows[0].values().collect::<Vec<_>>(), vec![Some("1"), None, None]);
        assert!(rows[0].contains_key("c"));
    }

    #[test]
    fn extra_values_are_ignored() {
        let rows = parse_csv("a,b\n1,2,3,4");
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0].get("b"), Some("2"));
    }

    #[test]
    fn trailing_newline_yields_degenerate_record() {
        let rows = parse_csv("a,b\n1,2\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].values().collect::<Vec<_>>(), vec![Some(""), None]);
    }

    #[test]
    fn header_only_and_empty_input() {
        assert!(parse_csv("numero,lat,long").is_empty());
        assert!(parse_csv("").is_empty());
    }

    #[test]
    fn crlf_is_trimmed() {
        let rows = parse_csv("a,b\r\n1,2\r\n3,4");
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(rows[0].get("b"), Some("2"));
        assert_eq!(rows[1].get("a"), Some("3"));
    }

    #[test]
    fn quoted_comma_misaligns() {
        let rows = parse_csv("a,b\n\"x,y\",z");
        assert_eq!(rows[0].get("a"), Some("\"x"));
        assert_eq!(rows[0].get("b"), Some("y\""));
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = "numero,lat\nA1,41.8\nA2,\n";
        assert_eq!(parse_csv(text), parse_csv(text));
    }
}
