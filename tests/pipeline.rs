//! End-to-end checks: load a real CSV from disk, then run the query layer
//! against the cleaned table.

use std::path::PathBuf;

use longevity::data::load_dataset;
use longevity::stats;

fn write_sample_csv(dir: &std::path::Path) -> PathBuf {
    let path = dir.join("Country_life_expectancy.csv");
    std::fs::write(
        &path,
        "Country,Year,Life Expectancy,GDP\n\
         Thailand,2020,75.5,7000\n\
         Thailand,2021,76.0,7200\n",
    )
    .unwrap();
    path
}

#[test]
fn loaded_columns_are_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample_csv(dir.path());
    let df = load_dataset(Some(&path)).unwrap();

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["country", "year", "life_expectancy", "gdp"]);
    assert_eq!(df.height(), 2);
}

#[test]
fn trend_query_over_loaded_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample_csv(dir.path());
    let df = load_dataset(Some(&path)).unwrap();

    let points = stats::lifeexp_trend(&df, "thailand").unwrap();
    let pairs: Vec<(i64, f64)> = points
        .iter()
        .map(|point| (point.year, point.life_expectancy))
        .collect();
    assert_eq!(pairs, vec![(2020, 75.5), (2021, 76.0)]);
}

#[test]
fn top_query_over_loaded_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample_csv(dir.path());
    let df = load_dataset(Some(&path)).unwrap();

    let top = stats::top_by_life_expectancy(&df, Some(2021), 1).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].country, "Thailand");
    assert_eq!(top[0].year, Some(2021));
    assert_eq!(top[0].life_expectancy, 76.0);
}
