use thiserror::Error;

/// Fallo al traer el CSV publicado. El texto visible es siempre genérico;
/// la causa concreta queda en `source()` y en los logs.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch data")]
    Status(reqwest::StatusCode),
    #[error("Failed to fetch data")]
    Transport(#[source] reqwest::Error),
    #[error("Failed to read response body")]
    Body(#[source] reqwest::Error),
}
