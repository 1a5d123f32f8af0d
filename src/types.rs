//! types.rs
//! Modelos de datos compartidos por el servicio: filas crudas del CSV,
//! ubicaciones normalizadas para el mapa, estado de cada vista, KPIs y configuración

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Una línea de datos del CSV: cabecera -> valor, en el orden de las cabeceras.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, Option<String>)>,
}

impl RawRecord {
    pub fn new() -> Self { Self::default() }

    /// Si la clave ya existe se sobrescribe el valor y conserva su posición.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }
    }

    /// `None` tanto si la cabecera no existe como si la línea no traía ese campo.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = Option<&str>> {
        self.fields.iter().map(|(_, v)| v.as_deref())
    }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Punto del impianto listo para pintar en el mapa.
/// `lat`/`long` siempre finitos; profundidad y tipología pasan sin validar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocationRecord {
    pub id: String,
    pub numero: Option<String>,
    pub lat: f64,
    pub long: f64,
    pub profondita: Option<i64>,
    pub tipologia: Option<String>,
}

/// Salida de la vista de mapa: ubicaciones válidas y total de filas leídas.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LocationSet {
    pub total_rows: usize,
    pub locations: Vec<LocationRecord>,
}

impl LocationSet {
    pub fn dropped(&self) -> usize { self.total_rows.saturating_sub(self.locations.len()) }
}

/// Estado propio de una vista (tabla o mapa).
#[derive(Clone, Debug, Serialize)]
pub struct ViewState<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub data: T,
}

impl<T: Default> Default for ViewState<T> {
    fn default() -> Self {
        Self { loading: false, error: None, fetched_at: None, data: T::default() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub rows: usize,
    pub locations: usize,
    pub dropped: usize,
    pub sheet_loading: bool,
    pub map_loading: bool,
    pub sheet_error: Option<String>,
    pub map_error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapCfg {
    pub title: String,
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapCfg {
    fn default() -> Self {
        Self {
            title: "Impianto Mitilicoltura Fiumicino".into(),
            center: [41.8755, 12.1447],
            zoom: 11,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppCfg {
    pub bind: String,
    pub sheet_url: String,
    pub web_dir: String,
    pub map: MapCfg,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".into(),
            sheet_url: "https://docs.google.com/spreadsheets/d/e/2PACX-1vS0W4j01qgeA0BlgW4f6PAoJzXBZLVw3DGONHeWnzTO2SdtysSM38I5alXnmATvYdzu13MnMQ-A0WH1/pub?gid=0&single=true&output=csv".into(),
            web_dir: "web".into(),
            map: MapCfg::default(),
        }
    }
}

impl AppCfg {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Aplica overrides sobre los valores por defecto. Números mal formados se ignoran.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut c = Self::default();
        if let Some(v) = var("BIND") { c.bind = v; }
        if let Some(v) = var("SHEET_URL") { c.sheet_url = v; }
        if let Some(v) = var("WEB_DIR") { c.web_dir = v; }
        if let Some(v) = var("MAP_TITLE") { c.map.title = v; }
        if let Some(v) = var("MAP_LAT") { c.map.center[0] = v.parse().unwrap_or(c.map.center[0]); }
        if let Some(v) = var("MAP_LON") { c.map.center[1] = v.parse().unwrap_or(c.map.center[1]); }
        if let Some(v) = var("MAP_ZOOM") { c.map.zoom = v.parse().unwrap_or(c.map.zoom); }
        c
    }
}
