//! fetch.rs
//! Descarga del CSV publicado: un GET, sin caché ni reintentos automáticos.

use reqwest::Client;
use tracing::{debug, warn};

use crate::errors::FetchError;

/// Cliente HTTP compartido por las vistas, con compresión.
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder().brotli(true).gzip(true).deflate(true).build()
}

pub async fn fetch_csv(client: &Client, url: &str) -> Result<String, FetchError> {
    let resp = client.get(url).send().await.map_err(|e| {
        warn!("GET {url}: {e}");
        FetchError::Transport(e)
    })?;
    let status = resp.status();
    if !status.is_success() {
        warn!("HTTP {status} en {url}");
        return Err(FetchError::Status(status));
    }
    let text = resp.text().await.map_err(|e| {
        warn!("cuerpo de {url}: {e}");
        FetchError::Body(e)
    })?;
    debug!("{} bytes desde {url}", text.len());
    Ok(text)
}
