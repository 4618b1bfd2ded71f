//! The PDU's single owned state object: operating state, line registers and
//! the measurement engine, bundled behind one `handle` entry point.

use crate::icd::{PduCommand, PduResponse};
use crate::lines::LineRegisters;
use crate::measurement::MeasurementEngine;
use crate::protection;
use crate::state::{PduState, StateMachine};
use tracing::{info, warn};

#[derive(Debug)]
pub struct PduSimulator {
    state: StateMachine,
    lines: LineRegisters,
    measurement: MeasurementEngine,
}

impl PduSimulator {
    pub fn new(measurement_seed: u64) -> Self {
        Self {
            state: StateMachine::new(),
            lines: LineRegisters::new(),
            measurement: MeasurementEngine::new(measurement_seed),
        }
    }

    pub fn current_state(&self) -> PduState {
        self.state.current()
    }

    /// Executes one already-parsed command against PDU state and returns its response.
    pub fn handle(&mut self, command: PduCommand) -> PduResponse {
        match command {
            PduCommand::ObcHeartBeat { heart_beat } => {
                info!(heart_beat, "heartbeat");
                PduResponse::PduHeartBeat { heart_beat, state: self.state.current() }
            }
            PduCommand::GetPduStatus => {
                let (protection_status, mode) = protection::evaluate(&self.lines, self.state.current());
                PduResponse::PduStatus { state: self.state.current(), protection_status, mode }
            }
            PduCommand::GetUnitLineStates => PduResponse::PduUnitLineStates { lines: self.lines.snapshot() },
            PduCommand::GetConvertedMeasurements { category } => {
                let measurements = self.measurement.measure(category, &self.lines);
                PduResponse::PduConvertedMeasurements { category, measurements }
            }
            PduCommand::SetUnitPwLines { category, parameters } => {
                if !self.state.accepts_line_writes() {
                    warn!(?category, state = ?self.state.current(), "SetUnitPwLines rejected in this state");
                    return PduResponse::PduMsgAcknowledgement { accepted: false };
                }
                self.lines.set(category, parameters);
                info!(?category, parameters, "SetUnitPwLines applied");
                PduResponse::PduMsgAcknowledgement { accepted: true }
            }
            PduCommand::ResetUnitPwLines { category, parameters } => {
                if !self.state.accepts_line_writes() {
                    warn!(?category, state = ?self.state.current(), "ResetUnitPwLines rejected in this state");
                    return PduResponse::PduMsgAcknowledgement { accepted: false };
                }
                self.lines.reset(category, parameters);
                info!(?category, parameters, "ResetUnitPwLines applied");
                PduResponse::PduMsgAcknowledgement { accepted: true }
            }
            PduCommand::PduGoLoad => self.transition(PduState::Load),
            PduCommand::PduGoOperate => self.transition(PduState::Operate),
            PduCommand::PduGoSafe => self.transition(PduState::Safe),
            PduCommand::PduGoBoot => self.transition(PduState::Boot),
            PduCommand::PduGoMaintenance => self.transition(PduState::Maintenance),
        }
    }

    fn transition(&mut self, destination: PduState) -> PduResponse {
        let from = self.state.current();
        let accepted = self.state.transition_to(destination);
        if accepted {
            info!(?from, ?destination, "state transition accepted");
        } else {
            warn!(?from, ?destination, "illegal state transition rejected");
        }
        PduResponse::PduMsgAcknowledgement { accepted }
    }
}
