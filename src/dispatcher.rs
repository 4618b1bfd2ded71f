//! Packet-in -> decode -> ICD parse -> PDU handler -> ICD encode -> packet-out.
//!
//! Owns the response sequence counter; everything else lives in `PduSimulator`.

use crate::icd::{self, PduResponse};
use crate::packet::{self, PacketError};
use crate::pdu::PduSimulator;
use tracing::{error, warn};

/// `packet_subtype_class` used on outgoing responses: `1` per the ICD's telemetry
/// channel for command acknowledgements and status/telemetry replies alike.
const RESPONSE_SUBTYPE_CLASS: u8 = 1;

#[derive(Debug)]
pub struct Dispatcher {
    pdu: PduSimulator,
    apid: u16,
    sequence: u16,
}

impl Dispatcher {
    pub fn new(apid: u16, measurement_seed: u64) -> Self {
        Self { pdu: PduSimulator::new(measurement_seed), apid, sequence: 0 }
    }

    /// Processes one inbound datagram. Returns `Some(bytes)` with the response
    /// datagram to send back, or `None` when the request must be dropped silently
    /// (packet too short, or payload not valid UTF-8).
    pub fn process(&mut self, datagram: &[u8]) -> Option<Vec<u8>> {
        let decoded = match packet::decode(datagram) {
            Ok(decoded) => decoded,
            Err(PacketError::TooShort) => {
                warn!(len = datagram.len(), "dropping undersized packet");
                return None;
            }
            Err(PacketError::InvalidUtf8) => {
                warn!("dropping packet with non-UTF-8 payload");
                return None;
            }
        };

        let response = match icd::parse_command(decoded.payload) {
            Ok(command) => self.pdu.handle(command),
            Err(err) => {
                warn!(%err, "rejecting malformed command payload");
                PduResponse::PduMsgAcknowledgement { accepted: false }
            }
        };

        Some(self.encode_response(&response, decoded.packet_subtype))
    }

    fn encode_response(&mut self, response: &PduResponse, request_subtype: u8) -> Vec<u8> {
        let payload = response.to_json();
        let bytes = packet::encode(&payload, self.apid, self.sequence, false, RESPONSE_SUBTYPE_CLASS, request_subtype);
        self.sequence = self.sequence.wrapping_add(1) % packet::SEQ_COUNT_MODULUS;
        bytes
    }
}

/// Logs a transport-layer failure. Transport errors never produce a reply; the
/// caller already dropped the socket operation that failed.
pub fn log_transport_failure(context: &str, err: &std::io::Error) {
    error!(context, %err, "transport failure");
}
