//! view.rs
//!
//! Controlador de una vista (tabla cruda o mapa).
//!
//! - Cada vista tiene su propio estado: loading / error / datos / timestamp
//! - `refresh()` lanza una única tarea descarga -> parse -> transformación
//! - Un reintento aborta la tarea en curso; el contador de generación impide
//!   que una tarea vieja pise el estado de una más nueva
//!
//! Los consumidores leen con `snapshot()` o esperan con `settled()`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use reqwest::Client;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::csv::parse_csv;
use crate::fetch::fetch_csv;
use crate::normalize::location_set;
use crate::types::{LocationSet, RawRecord, ViewState};

pub type Transform<T> = fn(Vec<RawRecord>) -> T;

pub struct View<T> {
    name: &'static str,
    client: Client,
    url: String,
    transform: Transform<T>,
    state: Arc<watch::Sender<ViewState<T>>>,
    generation: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// Tabla genérica con las filas tal cual salen del parser.
pub fn sheet_view(client: Client, url: impl Into<String>) -> View<Vec<RawRecord>> {
    View::<Vec<RawRecord>>::new("sheet", client, url, |rows| rows)
}

/// Mapa: filas normalizadas, sin las que no tienen coordenadas válidas.
pub fn map_view(client: Client, url: impl Into<String>) -> View<LocationSet> {
    View::new("map", client, url, location_set)
}

impl<T> View<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    pub fn new(name: &'static str, client: Client, url: impl Into<String>, transform: Transform<T>) -> Self {
        let (tx, _rx) = watch::channel(ViewState::default());
        Self {
            name,
            client,
            url: url.into(),
            transform,
            state: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &'static str { self.name }

    /// Reemplaza cualquier descarga en curso por una nueva. Debe llamarse dentro de un runtime tokio.
    pub fn refresh(&self) {
        let mut slot = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(prev) = slot.take() {
            if !prev.is_finished() {
                debug!("{}: descarga anterior reemplazada", self.name);
                prev.abort();
            }
        }

        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let name = self.name;
        let client = self.client.clone();
        let url = self.url.clone();
        let transform = self.transform;
        let state = self.state.clone();
        let generation = self.generation.clone();

        *slot = Some(tokio::spawn(async move {
            info!("{name}: descargando {url}");
            let outcome = fetch_csv(&client, &url).await.map(|text| transform(parse_csv(&text)));
            let ok = outcome.is_ok();
            let applied = state.send_if_modified(|s| {
                // sólo escribe la última generación
                if generation.load(Ordering::SeqCst) != ticket {
                    return false;
                }
                s.loading = false;
                match outcome {
                    Ok(data) => {
                        s.data = data;
                        s.error = None;
                        s.fetched_at = Some(Utc::now());
                    }
                    Err(e) => s.error = Some(e.to_string()),
                }
                true
            });
            match (applied, ok) {
                (false, _) => debug!("{name}: resultado de la generación {ticket} descartado"),
                (true, true) => info!("{name}: datos actualizados (generación {ticket})"),
                (true, false) => warn!("{name}: descarga fallida (generación {ticket})"),
            }
        }));
    }

    pub fn snapshot(&self) -> ViewState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.state.subscribe()
    }

    /// Espera a que no haya descarga en curso y devuelve el estado resultante.
    pub async fn settled(&self) -> ViewState<T> {
        let mut rx = self.state.subscribe();
        let out = match rx.wait_for(|s| !s.loading).await {
            Ok(s) => s.clone(),
            Err(_) => self.snapshot(),
        };
        out
    }
}

impl<T> Drop for View<T> {
    fn drop(&mut self) {
        if let Some(h) = self.task.get_mut().ok().and_then(|slot| slot.take()) {
            h.abort();
        }
    }
}
