//! Load-time error taxonomy.
//!
//! Every variant here is fatal for the whole load: the dashboard renders
//! from a fully validated table or not at all.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    /// The source CSV does not exist. The run halts before any rendering.
    #[error("no se encontró el archivo '{}'", path.display())]
    SourceNotFound { path: PathBuf },

    /// A `Fecha` cell did not parse under the fixed `YYYY-MM-DD` format.
    /// Rows are never skipped; one bad date fails the whole load.
    #[error("fecha inválida '{value}' en la fila {row} (se esperaba YYYY-MM-DD)")]
    MalformedDate { row: u64, value: String },

    /// Any other cell that fails to deserialize (e.g. a non-numeric
    /// `Precio Total`). Surfaced as its own kind rather than coerced to zero.
    #[error("fila {row} inválida: {source}")]
    MalformedRow {
        row: u64,
        #[source]
        source: csv::Error,
    },

    #[error("error de E/S leyendo '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
