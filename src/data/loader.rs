//! CSV Dataset Loader Module
//! Locates the life-expectancy CSV, loads it with Polars, and applies the
//! light cleanup the rest of the toolkit relies on: duplicate removal,
//! column-name normalization, and numeric coercion.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Exact filename tried first during default-file discovery.
pub const DEFAULT_CSV: &str = "Country's_life_expectancy_data(2016_2024).csv";

/// Directory searched when no explicit path is given, relative to the
/// working directory.
pub const DATA_DIR: &str = "data";

/// Columns never subjected to numeric coercion.
pub const TEXT_COLUMNS: [&str; 2] = ["country", "status"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV not found at: {0}")]
    FileNotFound(PathBuf),
    #[error("CSV not found. Expected {expected} or a file like {dir}/Country*.csv", expected = .0.display(), dir = DATA_DIR)]
    NoDefaultCsv(PathBuf),
    #[error("multiple candidate CSVs found ({}); pass an explicit path", .0.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    AmbiguousDefault(Vec<PathBuf>),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Load the dataset and do light cleanup:
/// - drop exact duplicate rows (first occurrence kept)
/// - normalize column names to snake_case
/// - coerce columns to numeric where every value permits it
///
/// With no path, searches the `data` directory for [`DEFAULT_CSV`], then for
/// a single `Country*.csv` candidate. More than one candidate is an error
/// rather than a silent pick.
pub fn load_dataset(path: Option<&Path>) -> Result<DataFrame, LoaderError> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LoaderError::FileNotFound(p.to_path_buf()));
            }
            p.to_path_buf()
        }
        None => find_default_csv(Path::new(DATA_DIR))?,
    };
    log::info!("loading dataset from {}", path.display());

    // Schema inference is disabled so every column arrives as text; typing
    // happens in coerce_columns under the allow-list rules.
    let df = LazyCsvReader::new(path.to_string_lossy().into_owned())
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;

    let df = normalize_columns(df)?;
    let df = coerce_columns(df)?;
    log::info!("loaded {} rows x {} columns", df.height(), df.width());
    Ok(df)
}

fn find_default_csv(data_dir: &Path) -> Result<PathBuf, LoaderError> {
    let exact = data_dir.join(DEFAULT_CSV);
    if exact.exists() {
        return Ok(exact);
    }

    let entries = match std::fs::read_dir(data_dir) {
        Ok(entries) => entries,
        Err(_) => return Err(LoaderError::NoDefaultCsv(exact)),
    };
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with("Country") && name.ends_with(".csv"))
                .unwrap_or(false)
        })
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(LoaderError::NoDefaultCsv(exact)),
        1 => Ok(candidates.remove(0)),
        _ => Err(LoaderError::AmbiguousDefault(candidates)),
    }
}

/// Canonicalize one raw header: trimmed, lower-case, spaces and hyphens as
/// underscores, parentheses and apostrophes (including the mis-encoded
/// right-single-quote sequence) stripped.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace('-', "_")
        .replace(['(', ')'], "")
        .replace("â€™", "")
        .replace('\'', "")
}

fn normalize_columns(df: DataFrame) -> PolarsResult<DataFrame> {
    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .map(|col| {
            let name = normalize_column_name(col.name());
            col.as_materialized_series()
                .clone()
                .with_name(name.into())
                .into_column()
        })
        .collect();
    // DataFrame::new re-checks name uniqueness, so two headers collapsing to
    // the same normalized name surface as an error here.
    DataFrame::new(columns)
}

fn coerce_columns(mut df: DataFrame) -> PolarsResult<DataFrame> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    for name in names {
        if TEXT_COLUMNS.contains(&name.as_str()) {
            continue;
        }
        let col = df.column(&name)?;
        if col.dtype() != &DataType::String {
            continue;
        }
        if name == "year" {
            // Nullable integer: unparsable years become missing, never a
            // hard error.
            let year = col.cast(&DataType::Int64)?;
            df.with_column(year)?;
            continue;
        }
        // Whole-column cast: either every non-missing value parses, or the
        // column stays text.
        let casted = col.as_materialized_series().strict_cast(&DataType::Float64);
        match casted {
            Ok(numeric) => {
                df.with_column(numeric)?;
            }
            Err(_) => log::debug!("column {name} kept as text"),
        }
    }
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_csv(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn normalizes_header_punctuation() {
        assert_eq!(normalize_column_name("Life Expectancy"), "life_expectancy");
        assert_eq!(normalize_column_name(" GDP-per-capita "), "gdp_per_capita");
        assert_eq!(
            normalize_column_name("Country's_life_expectancy_data(2016_2024)"),
            "countrys_life_expectancy_data2016_2024"
        );
        assert_eq!(normalize_column_name("Countryâ€™s Data"), "countrys_data");
    }

    #[test]
    fn load_cleans_and_types_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "Country_life.csv",
            "Country,Year,Life Expectancy,GDP,Status,Notes\n\
             Thailand,2020,75.5,7000,1,a\n\
             Thailand,2020,75.5,7000,1,a\n\
             Japan,20xx,84.0,,2,7\n",
        );
        let df = load_dataset(Some(&path)).unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["country", "year", "life_expectancy", "gdp", "status", "notes"]
        );

        // exact duplicate dropped, first occurrence kept
        assert_eq!(df.height(), 2);
        let countries = df.column("country").unwrap().str().unwrap();
        assert_eq!(countries.get(0), Some("Thailand"));
        assert_eq!(countries.get(1), Some("Japan"));

        // year is nullable Int64; "20xx" became missing
        assert_eq!(df.column("year").unwrap().dtype(), &DataType::Int64);
        let years = df.column("year").unwrap().i64().unwrap();
        assert_eq!(years.get(0), Some(2020));
        assert_eq!(years.get(1), None);

        // gdp coerced despite the blank cell
        assert_eq!(df.column("gdp").unwrap().dtype(), &DataType::Float64);
        let gdp = df.column("gdp").unwrap().f64().unwrap();
        assert_eq!(gdp.get(0), Some(7000.0));
        assert_eq!(gdp.get(1), None);

        // status is allow-listed text even though every value is numeric;
        // notes is mixed and stays text
        assert_eq!(df.column("status").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("notes").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn load_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "Country_life.csv",
            "Country,Year,Life Expectancy\nThailand,2020,75.5\nJapan,,\n",
        );
        let first = load_dataset(Some(&path)).unwrap();
        let second = load_dataset(Some(&path)).unwrap();
        assert_eq!(first.shape(), second.shape());
        assert!(first.equals_missing(&second));
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_dataset(Some(Path::new("/definitely/not/here.csv"))).unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
    }

    #[test]
    fn default_discovery_tie_break() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            find_default_csv(dir.path()),
            Err(LoaderError::NoDefaultCsv(_))
        ));

        let only = write_csv(dir.path(), "Country_a.csv", "Country\nThailand\n");
        assert_eq!(find_default_csv(dir.path()).unwrap(), only);

        write_csv(dir.path(), "Country_b.csv", "Country\nJapan\n");
        match find_default_csv(dir.path()) {
            Err(LoaderError::AmbiguousDefault(candidates)) => {
                assert_eq!(candidates.len(), 2)
            }
            other => panic!("expected AmbiguousDefault, got {other:?}"),
        }

        // the exact default name wins outright
        let exact = write_csv(dir.path(), DEFAULT_CSV, "Country\nKenya\n");
        assert_eq!(find_default_csv(dir.path()).unwrap(), exact);
    }
}
