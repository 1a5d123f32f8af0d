use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sheetmap::{api, fetch, view, AppCfg};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs (RUST_LOG manda; por defecto info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppCfg::from_env();
    info!("Fuente CSV: {}", cfg.sheet_url);

    let client = fetch::http_client()?;

    // Cada vista con su propio estado y su propia descarga
    let sheet = Arc::new(view::sheet_view(client.clone(), cfg.sheet_url.clone()));
    let map = Arc::new(view::map_view(client, cfg.sheet_url.clone()));
    sheet.refresh();
    map.refresh();

    let app = api::router(api::ApiState {
        sheet: sheet.clone(),
        map: map.clone(),
        map_cfg: cfg.map.clone(),
        web_dir: cfg.web_dir.clone(),
    });
    info!("Escuchando en http://{}", cfg.bind);
    let listener = tokio::net::TcpListener::bind(&cfg.bind).await?;
    let serve = axum::serve(listener, app);
    tokio::select! {
        r = serve => { r?; },
        _ = signal::ctrl_c() => { info!("Señal de salida recibida"); }
    }

    Ok(())
}
