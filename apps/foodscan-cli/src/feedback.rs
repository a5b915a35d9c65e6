//! Audible scan acknowledgment.

use std::io::Write;

use foodscan_capture::{FeedbackError, ScanFeedback};

/// Rings the terminal bell on stderr.
pub struct TerminalBell;

impl ScanFeedback for TerminalBell {
    fn acknowledge(&self) -> Result<(), FeedbackError> {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}
