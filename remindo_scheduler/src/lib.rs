pub mod clock;
pub mod delivery;
mod due_scanner;
mod occurrence;

pub use due_scanner::{
    DEFAULT_SCAN_INTERVAL, DEFAULT_TOLERANCE, DueScanner, DueScannerHandle, DueScannerOptions,
    ScanReport,
};
pub use occurrence::{OccurrenceCalculator, next_occurrence};
