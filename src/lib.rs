//! Aggregation core for a customer satisfaction survey export.
//!
//! The loader turns the `;`-delimited export into [`types::SurveyRecord`]s;
//! everything else computes dashboard figures from those records. The
//! [`dataset::SurveyStore`] ties both together behind one loaded dataset.

pub mod config;
pub mod dataset;
pub mod error;
pub mod executives;
pub mod geography;
pub mod loader;
pub mod nps;
pub mod output;
pub mod reports;
pub mod segments;
pub mod stats;
pub mod suggestions;
pub mod technical;
pub mod types;
pub mod util;

pub use config::SurveyConfig;
pub use dataset::SurveyStore;
pub use error::{Result, SurveyError};
pub use stats::FilterField;
pub use types::{Metric, Segment, Stats, SurveyRecord};
