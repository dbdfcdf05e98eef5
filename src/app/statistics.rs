//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{WarningKind, WarningStats};

/// Prints warning counts per kind to the log.
///
/// Nothing is printed when no line was dropped.
pub fn print_warning_statistics(stats: &WarningStats) {
    let total = stats.total();
    if total == 0 {
        return;
    }

    info!("Dropped line counts ({} total):", total);
    for kind in WarningKind::iter() {
        let count = stats.count(kind);
        if count > 0 {
            info!("   {}: {}", kind.as_str(), count);
        }
    }
}

/// Prints a one-line summary of an export run.
pub fn print_export_summary(rows_written: usize, dropped: usize, elapsed_seconds: f64) {
    info!(
        "Exported {} row{} ({} dropped) in {:.1}s",
        rows_written,
        if rows_written == 1 { "" } else { "s" },
        dropped,
        elapsed_seconds
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::{DataWarning, WarningSink};
    use std::sync::Arc;

    #[test]
    fn test_print_warning_statistics_no_warnings() {
        let stats = WarningStats::new();
        // Should not panic when nothing was dropped
        print_warning_statistics(&stats);
    }

    #[test]
    fn test_print_warning_statistics_with_warnings() {
        let mut stats = Arc::new(WarningStats::new());
        stats.warn(&DataWarning::new(3, WarningKind::Conversion, "bad ip"));
        stats.warn(&DataWarning::new(4, WarningKind::FieldCount, "short"));
        print_warning_statistics(&stats);
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn test_print_export_summary() {
        print_export_summary(0, 0, 0.0);
        print_export_summary(1, 2, 1.25);
    }
}
