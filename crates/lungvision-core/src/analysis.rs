//! Analysis step: one-shot submission guard and the cosmetic progress bar.

use std::time::Duration;

/// Interval between progress ticks while the request is in flight.
pub const PROGRESS_TICK: Duration = Duration::from_millis(50);
/// Pause at 100% before the results screen appears.
pub const COMPLETION_DELAY: Duration = Duration::from_millis(1000);
/// Progress never passes this until the request resolves.
pub const LOADING_CAP: u8 = 90;

/// Where the step 6 submission stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    /// User-facing error message; offers "Try Again"
    Failed(String),
}

/// Ensures the prediction request is issued once per wizard entry.
///
/// `begin` fires at most once until `reset`; after a failure only `retry`
/// can issue another request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisGuard {
    has_started: bool,
    status: AnalysisStatus,
}

impl AnalysisGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &AnalysisStatus {
        &self.status
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn is_loading(&self) -> bool {
        self.status == AnalysisStatus::Loading
    }

    /// Claim the first submission. Returns false on every later call.
    pub fn begin(&mut self) -> bool {
        if self.has_started {
            return false;
        }
        self.has_started = true;
        self.status = AnalysisStatus::Loading;
        true
    }

    /// Re-issue after a failure. Returns false unless the last attempt failed.
    pub fn retry(&mut self) -> bool {
        if !matches!(self.status, AnalysisStatus::Failed(_)) {
            return false;
        }
        self.status = AnalysisStatus::Loading;
        true
    }

    /// Record success of the in-flight request. Returns false, changing
    /// nothing, when no request is loading.
    pub fn succeed(&mut self) -> bool {
        if !self.is_loading() {
            return false;
        }
        self.status = AnalysisStatus::Succeeded;
        true
    }

    /// Record failure of the in-flight request. Returns false, changing
    /// nothing, when no request is loading.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if !self.is_loading() {
            return false;
        }
        self.status = AnalysisStatus::Failed(message.into());
        true
    }

    /// Re-arm for a fresh wizard entry.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Labels revealed as progress passes their threshold.
pub const MILESTONES: [(u8, &str); 3] = [
    (20, "Processing patient data..."),
    (50, "Analyzing risk factors..."),
    (80, "Generating recommendations..."),
];

/// Progress bar decoupled from real network progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressIndicator {
    percent: u8,
}

impl ProgressIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// One loading tick: +1, holding at the cap.
    pub fn tick(&mut self) -> u8 {
        if self.percent < LOADING_CAP {
            self.percent += 1;
        }
        self.percent
    }

    /// Apply the ticks for `elapsed` loading time.
    pub fn advance(&mut self, elapsed: Duration) -> u8 {
        let ticks = elapsed.as_millis() / PROGRESS_TICK.as_millis();
        let target = u128::from(self.percent) + ticks;
        self.percent = target.min(u128::from(LOADING_CAP.max(self.percent))) as u8;
        self.percent
    }

    /// The request resolved successfully.
    pub fn complete(&mut self) {
        self.percent = 100;
    }

    pub fn is_complete(&self) -> bool {
        self.percent == 100
    }

    /// Milestone labels reached so far.
    pub fn milestones(&self) -> impl Iterator<Item = &'static str> + '_ {
        MILESTONES
            .iter()
            .filter(move |(threshold, _)| self.percent > *threshold)
            .map(|(_, label)| *label)
    }

    pub fn reset(&mut self) {
        self.percent = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_is_one_shot() {
        let mut guard = AnalysisGuard::new();
        assert!(guard.begin());
        assert!(guard.is_loading());
        // re-render
        assert!(!guard.begin());
        assert!(!guard.begin());
    }

    #[test]
    fn test_retry_only_after_failure() {
        let mut guard = AnalysisGuard::new();
        assert!(!guard.retry());
        guard.begin();
        assert!(!guard.retry());

        guard.fail("Request timed out. Please try again.");
        assert_eq!(
            guard.status(),
            &AnalysisStatus::Failed("Request timed out. Please try again.".into())
        );
        assert!(guard.retry());
        assert!(guard.is_loading());
        assert!(!guard.begin());

        guard.succeed();
        assert!(!guard.retry());
    }

    #[test]
    fn test_outcome_requires_loading() {
        let mut guard = AnalysisGuard::new();
        assert!(!guard.fail("offline"));
        assert_eq!(guard.status(), &AnalysisStatus::Idle);
        assert!(!guard.retry());
        assert!(!guard.succeed());

        assert!(guard.begin());
        assert!(guard.fail("offline"));
        assert!(!guard.fail("again"));
        assert!(!guard.succeed());
        assert_eq!(guard.status(), &AnalysisStatus::Failed("offline".into()));
    }

    #[test]
    fn test_reset_rearms() {
        let mut guard = AnalysisGuard::new();
        guard.begin();
        guard.succeed();
        guard.reset();
        assert!(!guard.has_started());
        assert!(guard.begin());
    }

    #[test]
    fn test_progress_caps_until_complete() {
        let mut progress = ProgressIndicator::new();
        for _ in 0..200 {
            progress.tick();
        }
        assert_eq!(progress.percent(), LOADING_CAP);
        progress.complete();
        assert!(progress.is_complete());
    }

    #[test]
    fn test_progress_advance() {
        let mut progress = ProgressIndicator::new();
        assert_eq!(progress.advance(Duration::from_millis(1049)), 20);
        assert_eq!(progress.milestones().count(), 0);
        assert_eq!(progress.advance(Duration::from_millis(100)), 22);
        assert_eq!(progress.milestones().collect::<Vec<_>>(), vec![MILESTONES[0].1]);
        assert_eq!(progress.advance(Duration::from_secs(60)), LOADING_CAP);
        assert_eq!(progress.milestones().count(), 3);
    }
}
