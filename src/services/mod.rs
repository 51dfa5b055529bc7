pub mod change_detector;
pub mod report_service;
pub mod watch_service;

pub use change_detector::{diff_values, is_different, ChangeDetector, RecordedSnapshot};
pub use report_service::{ItemReport, PackageReport, ReportService};
pub use watch_service::{FetchOutcome, FetchSummary, WatchService};
