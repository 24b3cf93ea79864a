//! Charts module - PNG chart rendering

mod renderer;

pub use renderer::{
    plot_country_trend, plot_gdp_vs_lifeexp, plot_lifeexp_distribution,
    plot_top_countries_by_year, prepare_output_dir, render_all, sanitize_file_stem, ChartError,
    IMAGE_SIZE,
};
