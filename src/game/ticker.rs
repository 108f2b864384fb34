use log::trace;
use std::time::Duration;

/// Phase of the tick driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    /// Waiting for the game to be started
    Idle,
    /// A periodic timer should be firing
    Running,
    /// Timer released after game over or unmount
    Stopped,
}

/// What the owner of the real timer has to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickTransition {
    /// Create a timer with the given period
    Start(Duration),
    /// Release the timer
    Stop,
}

/// Decides when the periodic move timer exists.
///
/// The driver does not own a timer itself. Whoever does (a tokio interval,
/// a test loop) applies the transitions returned by [`TickDriver::sync`] and
/// [`TickDriver::unmount`]. Every `Start` is followed by exactly one `Stop`
/// before the next `Start`.
#[derive(Debug, Clone)]
pub struct TickDriver {
    phase: TickPhase,
    period: Duration,
    mounted: bool,
}

impl TickDriver {
    pub fn new(period: Duration) -> Self {
        Self {
            phase: TickPhase::Idle,
            period,
            mounted: true,
        }
    }

    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TickPhase::Running
    }

    /// Reconcile the phase with the lifecycle flags
    pub fn sync(&mut self, game_started: bool, game_over: bool) -> Option<TickTransition> {
        if !self.mounted {
            return None;
        }

        let should_run = game_started && !game_over;
        match (self.phase, should_run) {
            (TickPhase::Running, false) => {
                self.phase = TickPhase::Stopped;
                trace!("Tick timer stopped");
                Some(TickTransition::Stop)
            }
            (TickPhase::Idle | TickPhase::Stopped, true) => {
                self.phase = TickPhase::Running;
                trace!("Tick timer started every {:?}", self.period);
                Some(TickTransition::Start(self.period))
            }
            _ => None,
        }
    }

    /// Tear down for good. Later syncs never restart the timer.
    pub fn unmount(&mut self) -> Option<TickTransition> {
        self.mounted = false;
        let was_running = self.is_running();
        self.phase = TickPhase::Stopped;

        if was_running {
            trace!("Tick timer released on unmount");
            Some(TickTransition::Stop)
        } else {
            None
        }
    }
}
