pub mod chart;
pub mod format;

pub use chart::{ChartLayout, ChartPoint, GridLine};
pub use format::{format_amount, format_percentage, format_price, format_timestamp};

pub fn index_html() -> &'static str {
    include_str!("../static/index.html")
}

pub fn styles_css() -> &'static str {
    include_str!("../static/styles.css")
}

pub fn app_js() -> &'static str {
    include_str!("../static/app.js")
}
