//! Chart Renderer Module
//! Renders the EDA chart set as PNG files with Plotters: a life-expectancy
//! histogram, a GDP scatter, a top-N bar chart, and a per-country trend line.
//! Filenames are deterministic functions of the parameters.

use plotters::prelude::*;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::stats::{self, StatsError};

/// 6.4in x 4.8in at 200 DPI.
pub const IMAGE_SIZE: (u32, u32) = (1280, 960);

const HIST_BINS: usize = 30;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to render chart: {0}")]
    Render(String),
}

fn render_err<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

/// Create the output directory. Callers run this once before rendering;
/// nothing else in this module touches the filesystem layout.
pub fn prepare_output_dir(dir: &Path) -> Result<(), ChartError> {
    std::fs::create_dir_all(dir).map_err(|source| ChartError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Lower-cased, space-to-underscore form of a country name, used in the
/// trend-chart filename.
pub fn sanitize_file_stem(country: &str) -> String {
    country.to_lowercase().replace(' ', "_")
}

fn value_bounds(values: &[f64], fallback: (f64, f64)) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return fallback;
    }
    if lo == hi {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

/// Histogram of life expectancy over a fixed bin count.
/// Writes `life_expectancy_hist.png`.
pub fn plot_lifeexp_distribution(df: &DataFrame, out_dir: &Path) -> Result<PathBuf, ChartError> {
    stats::require_columns(df, &["life_expectancy"])?;
    let values = stats::column_values(df, "life_expectancy")?;
    let path = out_dir.join("life_expectancy_hist.png");

    let (lo, hi) = value_bounds(&values, (0.0, 1.0));
    let bin_width = (hi - lo) / HIST_BINS as f64;
    let mut counts = vec![0u32; HIST_BINS];
    for &v in &values {
        let idx = (((v - lo) / bin_width) as usize).min(HIST_BINS - 1);
        counts[idx] += 1;
    }
    let top = counts.iter().copied().max().unwrap_or(0).max(1);

    let root = BitMapBackend::new(&path, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Distribution of Life Expectancy (2016–2024)",
            ("sans-serif", 36),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(lo..hi, 0u32..top + top / 10 + 1)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc("Life Expectancy (years)")
        .y_desc("Count")
        .draw()
        .map_err(render_err)?;
    chart
        .draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = lo + i as f64 * bin_width;
            Rectangle::new([(x0, 0u32), (x0 + bin_width, count)], BLUE.mix(0.6).filled())
        }))
        .map_err(render_err)?;
    root.present().map_err(render_err)?;

    println!("Saved: {}", path.display());
    Ok(path.clone())
}

/// Scatter of GDP against life expectancy, log-scaled x-axis by default.
/// Falls back to a linear axis when any GDP value is non-positive.
/// Writes `gdp_vs_life_expectancy.png`.
pub fn plot_gdp_vs_lifeexp(
    df: &DataFrame,
    out_dir: &Path,
    log_x: bool,
) -> Result<PathBuf, ChartError> {
    stats::require_columns(df, &["gdp", "life_expectancy"])?;
    let points = stats::paired_values(df, "gdp", "life_expectancy")?;
    let path = out_dir.join("gdp_vs_life_expectancy.png");

    let xs: Vec<f64> = points.iter().map(|&(x, _)| x).collect();
    let ys: Vec<f64> = points.iter().map(|&(_, y)| y).collect();
    let (x_lo, x_hi) = value_bounds(&xs, (1.0, 10.0));
    let (y_lo, y_hi) = value_bounds(&ys, (0.0, 1.0));
    let use_log = log_x && x_lo > 0.0;
    if log_x && !use_log {
        log::warn!("non-positive GDP values, falling back to a linear x-axis");
    }

    let root = BitMapBackend::new(&path, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    if use_log {
        let mut chart = ChartBuilder::on(&root)
            .caption("GDP vs Life Expectancy", ("sans-serif", 36))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d((x_lo..x_hi).log_scale(), y_lo..y_hi)
            .map_err(render_err)?;
        chart
            .configure_mesh()
            .x_desc("GDP (log scale)")
            .y_desc("Life Expectancy (years)")
            .draw()
            .map_err(render_err)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, BLUE.mix(0.5).filled())),
            )
            .map_err(render_err)?;
    } else {
        let mut chart = ChartBuilder::on(&root)
            .caption("GDP vs Life Expectancy", ("sans-serif", 36))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(render_err)?;
        chart
            .configure_mesh()
            .x_desc("GDP")
            .y_desc("Life Expectancy (years)")
            .draw()
            .map_err(render_err)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, BLUE.mix(0.5).filled())),
            )
            .map_err(render_err)?;
    }
    root.present().map_err(render_err)?;

    println!("Saved: {}", path.display());
    Ok(path.clone())
}

/// Bar chart of the top `n` countries by life expectancy in one year.
/// Writes `top_{n}_life_expectancy_{year}.png`.
pub fn plot_top_countries_by_year(
    df: &DataFrame,
    out_dir: &Path,
    year: i64,
    n: usize,
) -> Result<PathBuf, ChartError> {
    stats::require_columns(df, &["country", "year", "life_expectancy"])?;
    let ranking = stats::top_by_life_expectancy(df, Some(year), n)?;
    let path = out_dir.join(format!("top_{n}_life_expectancy_{year}.png"));

    let labels: Vec<String> = ranking.iter().map(|entry| entry.country.clone()).collect();
    let y_hi = ranking
        .iter()
        .map(|entry| entry.life_expectancy)
        .fold(1.0f64, f64::max)
        * 1.05;
    let slots = ranking.len().max(1) as i32;

    let root = BitMapBackend::new(&path, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Top {n} Countries by Life Expectancy in {year}"),
            ("sans-serif", 36),
        )
        .margin(20)
        .x_label_area_size(90)
        .y_label_area_size(70)
        .build_cartesian_2d((0..slots).into_segmented(), 0f64..y_hi)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc("Country")
        .y_desc("Life Expectancy (years)")
        .x_labels(ranking.len().max(1))
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()
        .map_err(render_err)?;
    chart
        .draw_series(ranking.iter().enumerate().map(|(i, entry)| {
            let i = i as i32;
            Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), entry.life_expectancy),
                ],
                BLUE.mix(0.7).filled(),
            )
        }))
        .map_err(render_err)?;
    root.present().map_err(render_err)?;

    println!("Saved: {}", path.display());
    Ok(path.clone())
}

/// Line chart of one country's life expectancy over the years, with point
/// markers. Writes `trend_{country}.png` (sanitized name).
pub fn plot_country_trend(
    df: &DataFrame,
    out_dir: &Path,
    country: &str,
) -> Result<PathBuf, ChartError> {
    stats::require_columns(df, &["country", "year", "life_expectancy"])?;
    let points = stats::lifeexp_trend(df, country)?;
    let path = out_dir.join(format!("trend_{}.png", sanitize_file_stem(country)));

    let (x_lo, x_hi) = match (points.first(), points.last()) {
        (Some(first), Some(last)) if first.year != last.year => (first.year, last.year),
        (Some(only), _) => (only.year - 1, only.year + 1),
        _ => (0, 1),
    };
    let ys: Vec<f64> = points.iter().map(|point| point.life_expectancy).collect();
    let (y_lo, y_hi) = value_bounds(&ys, (0.0, 1.0));

    let root = BitMapBackend::new(&path, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Life Expectancy Trend: {country}"),
            ("sans-serif", 36),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Life Expectancy (years)")
        .draw()
        .map_err(render_err)?;
    chart
        .draw_series(LineSeries::new(
            points
                .iter()
                .map(|point| (point.year, point.life_expectancy)),
            &BLUE,
        ))
        .map_err(render_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|point| Circle::new((point.year, point.life_expectancy), 5, BLUE.filled())),
        )
        .map_err(render_err)?;
    root.present().map_err(render_err)?;

    println!("Saved: {}", path.display());
    Ok(path.clone())
}

/// Render the whole chart set: the histogram always, the GDP scatter when a
/// gdp column exists, the top-N bar chart for the given year (or the most
/// frequent one) when a year column exists, and the trend for `country`.
pub fn render_all(
    df: &DataFrame,
    out_dir: &Path,
    country: &str,
    n: usize,
    year: Option<i64>,
    log_x: bool,
) -> Result<(), ChartError> {
    plot_lifeexp_distribution(df, out_dir)?;
    if stats::has_column(df, "gdp") {
        plot_gdp_vs_lifeexp(df, out_dir, log_x)?;
    }
    if stats::has_column(df, "year") {
        match year.or_else(|| stats::most_common_year(df)) {
            Some(year) => {
                plot_top_countries_by_year(df, out_dir, year, n)?;
            }
            None => log::warn!("year column has no usable values, skipping the top-{n} chart"),
        }
    }
    plot_country_trend(df, out_dir, country)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample_df() -> DataFrame {
        df!(
            "country" => ["Thailand", "Thailand", "Japan", "Japan"],
            "year" => [2020i64, 2021, 2020, 2021],
            "life_expectancy" => [75.5, 76.0, 84.0, 84.5],
            "gdp" => [7000.0, 7200.0, 40000.0, 41000.0],
        )
        .unwrap()
    }

    #[test]
    fn sanitizes_country_file_stem() {
        assert_eq!(sanitize_file_stem("New Zealand"), "new_zealand");
        assert_eq!(sanitize_file_stem("Thailand"), "thailand");
    }

    #[test]
    fn missing_columns_fail_before_rendering() {
        let df = df!("country" => ["Thailand"]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        match plot_gdp_vs_lifeexp(&df, dir.path(), true) {
            Err(ChartError::Stats(StatsError::MissingColumns(missing))) => {
                assert_eq!(missing, vec!["gdp", "life_expectancy"])
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn render_all_writes_the_chart_set() {
        let df = sample_df();
        let dir = tempfile::tempdir().unwrap();
        prepare_output_dir(dir.path()).unwrap();
        render_all(&df, dir.path(), "Thailand", 10, None, true).unwrap();

        for name in [
            "life_expectancy_hist.png",
            "gdp_vs_life_expectancy.png",
            "top_10_life_expectancy_2020.png",
            "trend_thailand.png",
        ] {
            assert!(dir.path().join(name).exists(), "missing {name}");
        }
    }
}
