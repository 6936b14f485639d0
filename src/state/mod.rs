//! Crawl lifecycle state
//!
//! This module defines the phase machine a crawl moves through and the
//! single-writer counters behind progress reporting. All mutation happens on
//! the coordinator's control task; collaborators only read.

use crate::MirrorError;
use std::fmt;

/// Phase of the overall crawl
///
/// Valid transitions:
///
/// ```text
/// Idle -> Running -> Completed
///              \-> Stopping -> Stopped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Crawl has been created but not started
    Idle,

    /// Frontier entries are being processed
    Running,

    /// Stop was requested; in-flight work is finishing, no new pops
    Stopping,

    /// Crawl exited early after a stop request
    Stopped,

    /// Frontier exhausted without a stop request
    Completed,
}

impl CrawlPhase {
    /// Returns true if this phase allows a transition to `next`
    pub fn can_transition_to(self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Stopping)
                | (Self::Running, Self::Completed)
                | (Self::Stopping, Self::Stopped)
        )
    }

    /// Returns true if the crawl is finished (no further processing)
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Completed)
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Completed => "completed",
        };
        write!(f, "{}", name)
    }
}

/// Counters and phase for a crawl in progress
///
/// `discovered` counts every URL ever queued, including the seed and entries
/// later discarded by the depth bound. `processed` counts frontier entries
/// that were actually taken up for rendering. Both grow monotonically.
#[derive(Debug, Clone)]
pub struct CrawlState {
    discovered: usize,
    processed: usize,
    phase: CrawlPhase,
}

impl CrawlState {
    /// Creates state for a crawl that has not started yet
    pub fn new() -> Self {
        Self {
            discovered: 0,
            processed: 0,
            phase: CrawlPhase::Idle,
        }
    }

    /// Records a newly queued URL
    pub fn record_discovered(&mut self) {
        self.discovered += 1;
    }

    /// Records a frontier entry taken up for processing
    pub fn record_processed(&mut self) {
        self.processed += 1;
    }

    /// Total URLs queued so far (monotone)
    pub fn discovered(&self) -> usize {
        self.discovered
    }

    /// Frontier entries processed so far (monotone)
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Current phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves the crawl to the next phase
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Transition applied
    /// * `Err(MirrorError::InvalidTransition)` - Transition not allowed
    pub fn transition(&mut self, next: CrawlPhase) -> Result<(), MirrorError> {
        if !self.phase.can_transition_to(next) {
            return Err(MirrorError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_run_transitions() {
        let mut state = CrawlState::new();
        assert_eq!(state.phase(), CrawlPhase::Idle);
        state.transition(CrawlPhase::Running).unwrap();
        state.transition(CrawlPhase::Completed).unwrap();
        assert!(state.phase().is_terminal());
    }

    #[test]
    fn test_stopped_run_transitions() {
        let mut state = CrawlState::new();
        state.transition(CrawlPhase::Running).unwrap();
        state.transition(CrawlPhase::Stopping).unwrap();
        state.transition(CrawlPhase::Stopped).unwrap();
        assert_eq!(state.phase(), CrawlPhase::Stopped);
    }

    #[test]
    fn test_invalid_transition_rejected() {
        let mut state = CrawlState::new();
        let result = state.transition(CrawlPhase::Completed);
        assert!(matches!(
            result,
            Err(MirrorError::InvalidTransition { .. })
        ));
        // Phase unchanged after a rejected transition
        assert_eq!(state.phase(), CrawlPhase::Idle);
    }

    #[test]
    fn test_terminal_phases() {
        assert!(CrawlPhase::Stopped.is_terminal());
        assert!(CrawlPhase::Completed.is_terminal());
        assert!(!CrawlPhase::Running.is_terminal());
        assert!(!CrawlPhase::Stopping.is_terminal());
    }

    #[test]
    fn test_counters_are_monotone() {
        let mut state = CrawlState::new();
        state.record_discovered();
        state.record_discovered();
        state.record_processed();
        assert_eq!(state.discovered(), 2);
        assert_eq!(state.processed(), 1);
    }
}
