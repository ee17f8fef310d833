//! Outcomes of the ring's user-facing operations.
//!
//! Unmet preconditions are ordinary states (a single open window, nothing
//! selected) and are reported as skips rather than errors.

use crate::error::PlatformError;
use crate::types::{TabId, WindowId};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The host reports no current window
    NoActiveWindow,
    /// Fewer than two windows take part in the ordering
    OrderTooShort,
    /// The current window is still missing after the single retry
    ActiveWindowUnknown,
    TargetIsSource,
    /// Neither highlighted nor active tabs in the source window
    NoSelection,
    /// Another relocation holds the in-flight token
    Busy,
    /// The host reported none of the requested tabs as moved
    NothingMoved,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NoActiveWindow => "no active window",
            SkipReason::OrderTooShort => "fewer than two windows",
            SkipReason::ActiveWindowUnknown => "active window not in order",
            SkipReason::TargetIsSource => "target equals source",
            SkipReason::NoSelection => "no selected tabs",
            SkipReason::Busy => "relocation already in flight",
            SkipReason::NothingMoved => "host moved no tabs",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusOutcome {
    Focused { from: WindowId, to: WindowId },
    Skipped(SkipReason),
}

/// What a completed relocation did, including cosmetic follow-up failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationReport {
    pub source: WindowId,
    pub target: WindowId,
    /// Moved tabs in their original left-to-right order
    pub moved: Vec<TabId>,
    /// Positions of the moved tabs in the target, ascending
    pub positions: Vec<usize>,
    pub active_tab: TabId,
    pub focus_error: Option<PlatformError>,
    pub highlight_error: Option<PlatformError>,
    pub activate_error: Option<PlatformError>,
}

impl RelocationReport {
    /// True when every follow-up step after the move succeeded
    pub fn is_clean(&self) -> bool {
        self.focus_error.is_none() && self.highlight_error.is_none() && self.activate_error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocateOutcome {
    Moved(RelocationReport),
    Skipped(SkipReason),
}

impl fmt::Display for FocusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocusOutcome::Focused { from, to } => write!(f, "focused {to} (from {from})"),
            FocusOutcome::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

impl fmt::Display for RelocateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelocateOutcome::Moved(report) => {
                write!(
                    f,
                    "moved {} tab(s) {} -> {}",
                    report.moved.len(),
                    report.source,
                    report.target
                )?;
                if !report.is_clean() {
                    f.write_str(" (follow-up incomplete)")?;
                }
                Ok(())
            }
            RelocateOutcome::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

impl RelocateOutcome {
    pub fn report(&self) -> Option<&RelocationReport> {
        match self {
            RelocateOutcome::Moved(report) => Some(report),
            RelocateOutcome::Skipped(_) => None,
        }
    }
}
