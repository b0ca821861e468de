pub mod outage_measurer;

pub use outage_measurer::{OutageMeasurer, OutageStats};
