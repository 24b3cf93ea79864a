//! Text Report Module
//! Formats query results as aligned text sections and prints the five-part
//! EDA report: missing values, summary statistics, top-N ranking, the
//! correlation matrix, and (optionally) one country's trend.

use polars::prelude::DataFrame;

use crate::stats::{self, ColumnSummary, CorrMatrix, RankEntry, StatsError, TrendPoint};

/// Rows of the summary table shown in the report.
const SUMMARY_HEAD: usize = 15;

fn fmt_float(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "NaN".to_string())
}

fn fmt_count(value: Option<usize>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "NaN".to_string())
}

pub fn format_missing_values(counts: &[(String, usize)]) -> String {
    let width = counts
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (name, count) in counts {
        out.push_str(&format!("{name:<width$}  {count}\n"));
    }
    out
}

pub fn format_summary(rows: &[ColumnSummary]) -> String {
    let shown = &rows[..rows.len().min(SUMMARY_HEAD)];
    let width = shown
        .iter()
        .map(|row| row.column.len())
        .max()
        .unwrap_or(0)
        .max("column".len());

    let mut out = format!(
        "{:<width$}  {:>6}  {:>6}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}\n",
        "column", "count", "unique", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for row in shown {
        out.push_str(&format!(
            "{:<width$}  {:>6}  {:>6}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}\n",
            row.column,
            row.count,
            fmt_count(row.unique),
            fmt_float(row.mean),
            fmt_float(row.std),
            fmt_float(row.min),
            fmt_float(row.q25),
            fmt_float(row.median),
            fmt_float(row.q75),
            fmt_float(row.max),
        ));
    }
    out
}

pub fn format_ranking(entries: &[RankEntry]) -> String {
    let width = entries
        .iter()
        .map(|entry| entry.country.len())
        .max()
        .unwrap_or(0)
        .max("country".len());

    let mut out = format!(
        "{:<width$}  {:>5}  {:>15}\n",
        "country", "year", "life_expectancy"
    );
    for entry in entries {
        let year = entry
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "NaN".to_string());
        out.push_str(&format!(
            "{:<width$}  {:>5}  {:>15.1}\n",
            entry.country, year, entry.life_expectancy
        ));
    }
    out
}

pub fn format_corr(matrix: &CorrMatrix) -> String {
    if matrix.is_empty() {
        return "(no numeric columns)\n".to_string();
    }
    let width = matrix
        .columns
        .iter()
        .map(|name| name.len())
        .max()
        .unwrap_or(0)
        .max(6);

    let mut out = format!("{:<width$}", "");
    for name in &matrix.columns {
        out.push_str(&format!("  {name:>width$}"));
    }
    out.push('\n');
    for (i, name) in matrix.columns.iter().enumerate() {
        out.push_str(&format!("{name:<width$}"));
        for j in 0..matrix.columns.len() {
            let cell = matrix
                .get(i, j)
                .map(|r| format!("{r:.3}"))
                .unwrap_or_else(|| "NaN".to_string());
            out.push_str(&format!("  {cell:>width$}"));
        }
        out.push('\n');
    }
    out
}

pub fn format_trend(points: &[TrendPoint]) -> String {
    let mut out = format!("{:>5}  {:>15}\n", "year", "life_expectancy");
    for point in points {
        out.push_str(&format!(
            "{:>5}  {:>15.1}\n",
            point.year, point.life_expectancy
        ));
    }
    out
}

/// Print the report sections to stdout in fixed order. The trend section is
/// only printed when a country was requested.
pub fn print_report(
    df: &DataFrame,
    top: usize,
    year: Option<i64>,
    country: Option<&str>,
    corrcols: &[String],
) -> Result<(), StatsError> {
    println!("\n=== Missing Values ===");
    print!("{}", format_missing_values(&stats::missing_values(df)));

    println!("\n=== Summary Stats (head) ===");
    print!("{}", format_summary(&stats::summary_stats(df)?));

    match year {
        Some(y) => println!("\n=== Top {top} by Life Expectancy in {y} ==="),
        None => println!("\n=== Top {top} by Life Expectancy ==="),
    }
    print!(
        "{}",
        format_ranking(&stats::top_by_life_expectancy(df, year, top)?)
    );

    println!("\n=== Correlation (numeric) ===");
    let cols = if corrcols.is_empty() {
        None
    } else {
        Some(corrcols)
    };
    print!("{}", format_corr(&stats::corr_numeric(df, cols)?));

    if let Some(country) = country {
        println!("\n=== Trend for {country} ===");
        print!("{}", format_trend(&stats::lifeexp_trend(df, country)?));
    }
    Ok(())
}
