//! Stats module - query and aggregation layer

mod calculator;

pub use calculator::{
    column_values, corr_numeric, has_column, lifeexp_trend, missing_values, most_common_year,
    numeric_column_names, paired_values, require_columns, summary_stats, top_by_life_expectancy,
    ColumnSummary, CorrMatrix, RankEntry, StatsError, TrendPoint,
};
