pub mod analysis;
pub mod error;
pub mod grid;
mod macros;
pub mod measure;
pub mod models;
mod pipe;
pub mod report;
pub mod source;
mod stage;
pub mod summary;
pub mod transitions;

pub use crate::analysis::{Analysis, AnalysisOptions, analyze_file, analyze_samples};
pub use crate::error::{Result, UptimeError};
pub use crate::grid::build_indicator_series;
pub use crate::models::{AnnotatedPoint, AnnotatedSeries, IndicatorPoint, IndicatorSeries, RawSample};
pub use crate::pipe::*;
pub use crate::report::{Report, meridiem_means, render_table};
pub use crate::source::{LogReaderOptions, parse_log, read_log};
pub use crate::stage::{OutputCollector, Stage, StageExt};
pub use crate::summary::{InterruptionMethod, Meridiem, Period, PeriodSummary, summarize, summarize_with};
pub use crate::transitions::{RunTracker, annotate_transitions};
