//! api.rs
//! Rutas HTTP: /health, /kpis, /sheet, /locations, /map/markers, /map/view y los reintentos.

use axum::{
    extract::{Query, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, services::ServeDir};

use crate::normalize::filter_by_label;
use crate::types::{Kpis, LocationRecord, LocationSet, MapCfg, RawRecord, ViewState};
use crate::view::View;

#[derive(Clone)]
pub struct ApiState {
    pub sheet: Arc<View<Vec<RawRecord>>>,
    pub map: Arc<View<LocationSet>>,
    pub map_cfg: MapCfg,
    pub web_dir: String,
}

pub fn router(state: ApiState) -> Router {
    let web = ServeDir::new(&state.web_dir);
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/kpis", get(kpis))
        .route("/sheet", get(sheet))
        .route("/sheet/retry", post(retry_sheet))
        .route("/locations", get(locations))
        .route("/map/markers", get(map_markers))
        .route("/map/view", get(map_view_cfg))
        .route("/map/retry", post(retry_map))
        .fallback_service(web)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}

/// Tabla cruda: las cabeceras son las claves de la primera fila.
#[derive(Serialize)]
struct SheetOut {
    loading: bool,
    error: Option<String>,
    fetched_at: Option<DateTime<Utc>>,
    headers: Vec<String>,
    rows: Vec<RawRecord>,
}

async fn sheet(State(st): State<ApiState>) -> impl IntoResponse {
    let s = st.sheet.snapshot();
    let headers: Vec<String> = s
        .data
        .first()
        .map(|r| r.keys().map(str::to_string).collect())
        .unwrap_or_default();
    Json(SheetOut { loading: s.loading, error: s.error, fetched_at: s.fetched_at, headers, rows: s.data })
}

/// Query de /locations
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Texto a buscar dentro de `numero` (sin distinguir mayúsculas)
    pub q: Option<String>,
}

async fn locations(State(st): State<ApiState>, Query(q): Query<SearchQuery>) -> impl IntoResponse {
    let s = st.map.snapshot();
    let term = q.q.unwrap_or_default();
    let data: Vec<LocationRecord> = filter_by_label(&s.data.locations, &term).into_iter().cloned().collect();
    Json(ViewState { loading: s.loading, error: s.error, fetched_at: s.fetched_at, data })
}

async fn map_markers(State(st): State<ApiState>) -> impl IntoResponse {
    let s = st.map.snapshot();
    let mut fc = markers_geojson(&s.data.locations);
    // miembros extra del FeatureCollection para que el mapa sepa si sigue cargando
    fc["loading"] = json!(s.loading);
    fc["error"] = json!(s.error);
    (
        [(CONTENT_TYPE, "application/geo+json; charset=utf-8")],
        fc.to_string(),
    )
}

async fn map_view_cfg(State(st): State<ApiState>) -> impl IntoResponse {
    Json(st.map_cfg.clone())
}

async fn kpis(State(st): State<ApiState>) -> impl IntoResponse {
    let sheet = st.sheet.snapshot();
    let map = st.map.snapshot();
    Json(Kpis {
        rows: sheet.data.len(),
        locations: map.data.locations.len(),
        dropped: map.data.dropped(),
        sheet_loading: sheet.loading,
        map_loading: map.loading,
        sheet_error: sheet.error,
        map_error: map.error,
    })
}

async fn retry_sheet(State(st): State<ApiState>) -> impl IntoResponse {
    st.sheet.refresh();
    (StatusCode::ACCEPTED, Json(json!({ "view": st.sheet.name(), "status": "refreshing" })))
}

async fn retry_map(State(st): State<ApiState>) -> impl IntoResponse {
    st.map.refresh();
    (StatusCode::ACCEPTED, Json(json!({ "view": st.map.name(), "status": "refreshing" })))
}

/// FeatureCollection con un Point por ubicación (GeoJSON va en lon,lat).
pub fn markers_geojson(items: &[LocationRecord]) -> Value {
    let features: Vec<Value> = items
        .iter()
        .map(|it| {
            json!({
                "type": "Feature",
                "id": it.id,
                "geometry": { "type": "Point", "coordinates": [it.long, it.lat] },
                "properties": {
                    "numero": it.numero,
                    "profondita": it.profondita,
                    "tipologia": it.tipologia,
                    "popup": popup_lines(it),
                }
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

/// Texto del popup del marcador: título y luego los campos; los ausentes quedan vacíos.
pub fn popup_lines(it: &LocationRecord) -> Vec<String> {
    let numero = it.numero.as_deref().unwrap_or("");
    vec![
        numero.to_string(),
        format!("Numero: {numero}"),
        format!("Latitudine: {}", it.lat),
        format!("Longitudine: {}", it.long),
        format!("Profondità: {}", it.profondita.map(|p| p.to_string()).unwrap_or_default()),
        format!("Tipologia: {}", it.tipologia.as_deref().unwrap_or("")),
    ]
}
