//! # PDU Simulator
//!
//! A Power Distribution Unit simulator for spacecraft integration testing. Emulates
//! the flight PDU on behalf of an On-Board Computer: commands arrive as CCSDS-like
//! space packets over UDP, and the simulator replies with telemetry and
//! acknowledgements bit-compatible with the real unit's wire format.
//!
//! ## Architecture
//!
//! - [`packet`] - space packet codec (framing, sequence counting)
//! - [`icd`] - command/response schema, JSON (de)serialization
//! - [`state`] - PDU operating state machine and transition legality
//! - [`lines`] - the nine switchable power-line categories and their registers
//! - [`measurement`] - simulated per-line ADC current readings
//! - [`protection`] - protection-status and health-mode derivation
//! - [`pdu`] - the single owned PDU state object
//! - [`dispatcher`] - packet-in to packet-out request handling
//! - [`config`] - runtime configuration

#![deny(warnings)]
#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod dispatcher;
pub mod icd;
pub mod lines;
pub mod measurement;
pub mod packet;
pub mod pdu;
pub mod protection;
pub mod state;

pub use config::PduConfig;
pub use dispatcher::Dispatcher;
pub use icd::{PduCommand, PduResponse};
pub use pdu::PduSimulator;
pub use state::{PduMode, PduState};
