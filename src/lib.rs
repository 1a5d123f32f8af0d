//! sheetmap
//!
//! Servicio que descarga la hoja publicada como CSV, la parsea y expone
//! las filas como tabla y como marcadores de mapa.

pub mod api;
pub mod csv;
pub mod errors;
pub mod fetch;
pub mod normalize;
pub mod types;
pub mod view;

pub use errors::FetchError;
pub use types::{AppCfg, LocationRecord, LocationSet, RawRecord, ViewState};
