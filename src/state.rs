//! PDU operating state machine and the orthogonal health mode reported alongside it.

use serde::{Deserialize, Serialize};

/// The PDU's operating state. Wire encoding is pinned: `Boot=0`, `Load=1`,
/// `Operate=2`, `Safe=3`, `Maintenance=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum PduState {
    Boot = 0,
    Load = 1,
    Operate = 2,
    Safe = 3,
    Maintenance = 4,
}

impl PduState {
    /// The set of states this state may legally transition into.
    fn allowed_destinations(self) -> &'static [PduState] {
        match self {
            PduState::Boot => &[PduState::Load, PduState::Safe],
            PduState::Load => &[PduState::Operate, PduState::Safe, PduState::Boot],
            PduState::Operate => &[PduState::Safe, PduState::Load],
            PduState::Safe => &[PduState::Boot, PduState::Load, PduState::Operate, PduState::Maintenance],
            PduState::Maintenance => &[PduState::Boot, PduState::Safe],
        }
    }

    /// Whether `self -> destination` is a legal transition per the state matrix.
    pub fn can_transition_to(self, destination: PduState) -> bool {
        self.allowed_destinations().contains(&destination)
    }
}

/// PDU health mode, derived by the protection monitor. Never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum PduMode {
    Nominal = 0,
    Degraded = 1,
    Fault = 2,
}

/// Owns the current `PduState` and enforces the transition legality matrix.
#[derive(Debug)]
pub struct StateMachine {
    current: PduState,
}

impl StateMachine {
    pub fn new() -> Self {
        Self { current: PduState::Boot }
    }

    pub fn current(&self) -> PduState {
        self.current
    }

    /// Attempt a transition. Returns `true` and updates state on success; on
    /// rejection, state is left unchanged and `false` is returned.
    pub fn transition_to(&mut self, destination: PduState) -> bool {
        if self.current.can_transition_to(destination) {
            self.current = destination;
            true
        } else {
            false
        }
    }

    /// Writes to unit power lines are rejected only in `Boot`.
    pub fn accepts_line_writes(&self) -> bool {
        self.current != PduState::Boot
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
