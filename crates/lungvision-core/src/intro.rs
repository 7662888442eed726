//! Scripted intro sequence.
//!
//! The intro is a fixed list of `(phase, duration)` pairs. Which phase is
//! showing is a pure function of elapsed time, so the sequence can be driven
//! by any [`Clock`], including a manual one in tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// What the intro is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroPhase {
    /// Animated lungs illustration
    Lungs,
    /// Product wordmark
    Logo,
    Text(&'static str),
    /// "Let's Get Started" prompt; terminal phase
    Start,
}

/// The scripted sequence with literal durations.
pub const INTRO_SCRIPT: [(IntroPhase, Duration); 7] = [
    (IntroPhase::Lungs, Duration::from_millis(4000)),
    (IntroPhase::Logo, Duration::from_millis(2500)),
    (
        IntroPhase::Text("Your lungs breathe 20,000 times a day."),
        Duration::from_millis(2500),
    ),
    (IntroPhase::Text("Are you protecting them?"), Duration::from_millis(2500)),
    (IntroPhase::Text("Decode Your Risk."), Duration::from_millis(2000)),
    (IntroPhase::Text("Empower Your Life."), Duration::from_millis(2000)),
    (IntroPhase::Start, Duration::ZERO),
];

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock advanced by hand.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Phase index showing after `elapsed`. Always in range of `script`.
pub fn phase_index_at(script: &[(IntroPhase, Duration)], elapsed: Duration) -> usize {
    let mut boundary = Duration::ZERO;
    for (index, (_, duration)) in script.iter().enumerate() {
        boundary += *duration;
        if elapsed < boundary {
            return index;
        }
    }
    script.len().saturating_sub(1)
}

/// Total time until the terminal phase is reached.
pub fn script_duration(script: &[(IntroPhase, Duration)]) -> Duration {
    script.iter().map(|(_, d)| *d).sum()
}

/// Plays [`INTRO_SCRIPT`] against a clock.
#[derive(Debug)]
pub struct Intro<C: Clock> {
    clock: C,
    started_at: Duration,
    skipped: bool,
}

impl<C: Clock> Intro<C> {
    pub fn start(clock: C) -> Self {
        let started_at = clock.now();
        Self {
            clock,
            started_at,
            skipped: false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_sub(self.started_at)
    }

    pub fn phase_index(&self) -> usize {
        if self.skipped {
            return INTRO_SCRIPT.len() - 1;
        }
        phase_index_at(&INTRO_SCRIPT, self.elapsed())
    }

    pub fn phase(&self) -> IntroPhase {
        INTRO_SCRIPT[self.phase_index()].0
    }

    /// Time left in the current phase; zero once finished.
    pub fn remaining_in_phase(&self) -> Duration {
        if self.is_finished() {
            return Duration::ZERO;
        }
        let index = self.phase_index();
        let end = script_duration(&INTRO_SCRIPT[..=index]);
        end.saturating_sub(self.elapsed())
    }

    /// The skip control is offered until the start prompt appears.
    pub fn can_skip(&self) -> bool {
        !self.is_finished()
    }

    pub fn skip(&mut self) {
        self.skipped = true;
    }

    pub fn was_skipped(&self) -> bool {
        self.skipped
    }

    /// True once the start prompt is showing.
    pub fn is_finished(&self) -> bool {
        self.phase() == IntroPhase::Start
    }
}
