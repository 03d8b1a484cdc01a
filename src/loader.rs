//! CSV dataset loading.
//!
//! Reads the sales CSV into a [`SalesTable`], coercing the `Fecha` column to a
//! calendar date under the fixed `%Y-%m-%d` format. Loading is all-or-nothing:
//! a missing file or a single malformed row fails the whole load, so the rest
//! of the pipeline only ever sees validated data.

use crate::error::LoadError;
use crate::table::{SalesRecord, SalesTable};
use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Fixed parse format for the `Fecha` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One CSV row as it appears in the source, before date coercion.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Fecha")]
    fecha: String,
    #[serde(rename = "Sucursal")]
    sucursal: String,
    #[serde(rename = "Hora")]
    hora: u8,
    #[serde(rename = "Nombre_Mes")]
    nombre_mes: String,
    #[serde(rename = "Producto")]
    producto: String,
    #[serde(rename = "Precio Total")]
    precio_total: f64,
    #[serde(rename = "Unidades", default)]
    unidades: Option<u64>,
}

/// Loads and validates the sales CSV at `path`.
///
/// # Errors
///
/// - [`LoadError::SourceNotFound`] if the file does not exist.
/// - [`LoadError::MalformedDate`] if any `Fecha` cell fails the fixed format.
/// - [`LoadError::MalformedRow`] for any other cell that fails to deserialize.
pub fn load(path: impl AsRef<Path>) -> Result<SalesTable, LoadError> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let mut rdr = csv::Reader::from_reader(file);

    // The units fallback is a schema-level decision made exactly once here,
    // from header presence, never per row.
    let has_units = rdr
        .headers()
        .map_err(|e| LoadError::MalformedRow { row: 1, source: e })?
        .iter()
        .any(|h| h == "Unidades");

    let mut rows = Vec::new();

    for (i, result) in rdr.deserialize::<RawRecord>().enumerate() {
        // Row 1 is the header line.
        let row_number = i as u64 + 2;

        let raw = result.map_err(|e| LoadError::MalformedRow {
            row: row_number,
            source: e,
        })?;

        let date = NaiveDate::parse_from_str(&raw.fecha, DATE_FORMAT).map_err(|_| {
            LoadError::MalformedDate {
                row: row_number,
                value: raw.fecha.clone(),
            }
        })?;

        rows.push(SalesRecord {
            date,
            branch: raw.sucursal,
            hour: raw.hora,
            month_name: raw.nombre_mes,
            product: raw.producto,
            total_price: raw.precio_total,
            units: raw.unidades,
        });
    }

    debug!(path = %path.display(), rows = rows.len(), has_units, "Dataset parsed");

    Ok(SalesTable::new(rows, has_units))
}

static TABLE: OnceCell<SalesTable> = OnceCell::new();

/// Loads the table once per process and returns the cached instance on every
/// later call. The table is immutable after the first successful load; a
/// failed load caches nothing, so the next call retries.
pub fn load_cached(path: impl AsRef<Path>) -> Result<&'static SalesTable, LoadError> {
    let path = path.as_ref();
    let mut first_load = false;

    let table = TABLE.get_or_try_init(|| {
        first_load = true;
        load(path)
    })?;

    if first_load {
        info!(path = %path.display(), rows = table.len(), "Dataset loaded and cached");
    }

    Ok(table)
}
