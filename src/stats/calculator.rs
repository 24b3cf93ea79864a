//! EDA Query Module
//! Pure aggregations over the loaded dataset: missing-value counts,
//! descriptive statistics, Pearson correlation, top-N ranking, and
//! single-country trends. Nothing here mutates the input table.

use polars::prelude::*;
use statrs::statistics::Statistics;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Required columns missing: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("query failed: {0}")]
    Polars(#[from] PolarsError),
}

/// One row of the summary-statistics table. Text columns carry `count` and
/// `unique`; numeric columns carry the describe-style fields.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub unique: Option<usize>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Square Pearson correlation matrix over a set of numeric columns.
/// `None` marks pairs with fewer than two overlapping observations.
#[derive(Debug, Clone)]
pub struct CorrMatrix {
    pub columns: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl CorrMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values[row][col]
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One row of a top-N ranking. `year` is absent when the table has no year
/// column or the row's year is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub country: String,
    pub year: Option<i64>,
    pub life_expectancy: f64,
}

/// One point of a country's life-expectancy trend.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub year: i64,
    pub life_expectancy: f64,
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|col| col.as_str() == name)
}

/// Check that every listed column exists, otherwise report exactly the
/// missing subset in the order given.
pub fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), StatsError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !has_column(df, name))
        .map(|name| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(StatsError::MissingColumns(missing))
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

/// Row-aligned values of a column as `f64`, missing entries preserved.
fn aligned_f64(col: &Column) -> PolarsResult<Vec<Option<f64>>> {
    let casted = col.cast(&DataType::Float64)?;
    Ok(casted.f64()?.into_iter().collect())
}

fn non_missing_f64(col: &Column) -> PolarsResult<Vec<f64>> {
    let casted = col.cast(&DataType::Float64)?;
    Ok(casted.f64()?.into_iter().flatten().collect())
}

/// Non-missing values of one numeric column.
pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, StatsError> {
    require_columns(df, &[name])?;
    Ok(non_missing_f64(df.column(name)?)?)
}

/// Row-aligned (x, y) pairs with either side missing dropped.
pub fn paired_values(df: &DataFrame, x: &str, y: &str) -> Result<Vec<(f64, f64)>, StatsError> {
    require_columns(df, &[x, y])?;
    let xs = aligned_f64(df.column(x)?)?;
    let ys = aligned_f64(df.column(y)?)?;
    Ok(xs
        .into_iter()
        .zip(ys)
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect())
}

/// Count of missing entries per column, sorted descending. Ties keep table
/// column order.
pub fn missing_values(df: &DataFrame) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = df
        .get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.null_count()))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Per-column descriptive statistics, one row per source column in table
/// order, numeric and text columns both included.
pub fn summary_stats(df: &DataFrame) -> Result<Vec<ColumnSummary>, StatsError> {
    let mut rows = Vec::with_capacity(df.width());
    for col in df.get_columns() {
        let count = col.len() - col.null_count();
        if is_numeric(col.dtype()) {
            let values = non_missing_f64(col)?;
            rows.push(describe_numeric(col.name().as_str(), count, &values));
        } else {
            // distinct non-missing values; polars counts null as a value
            let mut unique = col.n_unique()?;
            if col.null_count() > 0 {
                unique -= 1;
            }
            rows.push(ColumnSummary {
                column: col.name().to_string(),
                count,
                unique: Some(unique),
                mean: None,
                std: None,
                min: None,
                q25: None,
                median: None,
                q75: None,
                max: None,
            });
        }
    }
    Ok(rows)
}

fn describe_numeric(name: &str, count: usize, values: &[f64]) -> ColumnSummary {
    if values.is_empty() {
        return ColumnSummary {
            column: name.to_string(),
            count,
            unique: None,
            mean: None,
            std: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    ColumnSummary {
        column: name.to_string(),
        count,
        unique: None,
        mean: Some(values.mean()),
        std: Some(values.std_dev()),
        min: sorted.first().copied(),
        q25: Some(percentile(&sorted, 25.0)),
        median: Some(percentile(&sorted, 50.0)),
        q75: Some(percentile(&sorted, 75.0)),
        max: sorted.last().copied(),
    }
}

/// Calculate percentile using linear interpolation (NumPy compatible).
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_values[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    if lower == upper {
        sorted_values[lower]
    } else {
        sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
    }
}

/// Pearson correlation over pairwise-complete observations. `None` below two
/// overlapping observations or when either side has zero variance.
fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let paired: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if paired.len() < 2 {
        return None;
    }

    let n = paired.len() as f64;
    let mean_x = paired.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = paired.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &paired {
        numerator += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Pairwise Pearson correlation over the numeric columns. A caller-supplied
/// list is filtered to columns that exist and are numeric, keeping caller
/// order; an empty result falls back to the full numeric set.
pub fn corr_numeric(df: &DataFrame, columns: Option<&[String]>) -> Result<CorrMatrix, StatsError> {
    let numeric = numeric_column_names(df);
    let selected: Vec<String> = columns
        .map(|cols| {
            cols.iter()
                .filter(|name| numeric.contains(name))
                .cloned()
                .collect::<Vec<String>>()
        })
        .filter(|cols| !cols.is_empty())
        .unwrap_or(numeric);

    let series: Vec<Vec<Option<f64>>> = selected
        .iter()
        .map(|name| aligned_f64(df.column(name)?))
        .collect::<PolarsResult<_>>()?;

    let n = selected.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = if i == j {
                pearson(&series[i], &series[j]).map(|_| 1.0)
            } else {
                pearson(&series[i], &series[j])
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrMatrix {
        columns: selected,
        values,
    })
}

/// Top `n` rows by life expectancy, descending, optionally filtered to one
/// year first. Rows with a missing life expectancy are dropped; ties keep
/// input order.
pub fn top_by_life_expectancy(
    df: &DataFrame,
    year: Option<i64>,
    n: usize,
) -> Result<Vec<RankEntry>, StatsError> {
    require_columns(df, &["life_expectancy"])?;
    require_columns(df, &["country"])?;

    let countries = df.column("country")?.str()?;
    let life_col = df.column("life_expectancy")?.cast(&DataType::Float64)?;
    let life = life_col.f64()?;
    let year_col = df
        .column("year")
        .ok()
        .map(|col| col.cast(&DataType::Int64))
        .transpose()?;
    let years = year_col.as_ref().map(|col| col.i64()).transpose()?;

    let mut entries = Vec::new();
    for i in 0..df.height() {
        let Some(life_expectancy) = life.get(i) else {
            continue;
        };
        let row_year = years.and_then(|ca| ca.get(i));
        if let Some(wanted) = year {
            // the year filter only applies when a year column exists
            if years.is_some() && row_year != Some(wanted) {
                continue;
            }
        }
        entries.push(RankEntry {
            country: countries.get(i).unwrap_or("").to_string(),
            year: row_year,
            life_expectancy,
        });
    }

    entries.sort_by(|a, b| {
        b.life_expectancy
            .partial_cmp(&a.life_expectancy)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(n);
    Ok(entries)
}

/// Life-expectancy trend for one country, matched case-insensitively,
/// ascending by year. Rows missing the year or the value are dropped.
pub fn lifeexp_trend(df: &DataFrame, country: &str) -> Result<Vec<TrendPoint>, StatsError> {
    require_columns(df, &["country", "year", "life_expectancy"])?;

    let countries = df.column("country")?.str()?;
    let year_col = df.column("year")?.cast(&DataType::Int64)?;
    let years = year_col.i64()?;
    let life_col = df.column("life_expectancy")?.cast(&DataType::Float64)?;
    let life = life_col.f64()?;

    let wanted = country.to_lowercase();
    let mut points = Vec::new();
    for i in 0..df.height() {
        let Some(name) = countries.get(i) else {
            continue;
        };
        if name.to_lowercase() != wanted {
            continue;
        }
        let (Some(year), Some(life_expectancy)) = (years.get(i), life.get(i)) else {
            continue;
        };
        points.push(TrendPoint {
            year,
            life_expectancy,
        });
    }

    points.sort_by_key(|point| point.year);
    Ok(points)
}

/// Most frequent non-null year, smallest first on ties, falling back to the
/// maximum year. `None` when the table has no usable year values.
pub fn most_common_year(df: &DataFrame) -> Option<i64> {
    let year_col = df.column("year").ok()?.cast(&DataType::Int64).ok()?;
    let years = year_col.i64().ok()?;

    let mut counts: HashMap<i64, usize> = HashMap::new();
    for year in years.into_iter().flatten() {
        *counts.entry(year).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by_key(|&(year, count)| (count, std::cmp::Reverse(year)))
        .map(|(year, _)| year)
        .or_else(|| years.max())
}
