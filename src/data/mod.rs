//! Data module - CSV loading and cleanup

mod loader;

pub use loader::{load_dataset, normalize_column_name, LoaderError, DATA_DIR, DEFAULT_CSV, TEXT_COLUMNS};
