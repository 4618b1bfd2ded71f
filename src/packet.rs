//! CCSDS-like space packet codec.
//!
//! Frames a JSON payload inside a fixed primary header (6 bytes) and a fixed-shape
//! secondary header (12 bytes), matching the wire format the flight PDU emits and
//! the OBC decodes. See the ICD for field-level semantics; this module only knows
//! about bytes.

use thiserror::Error;

/// Version field is always zero for this ICD revision.
const VERSION: u8 = 0;
/// Unsegmented sequence flags (`0b11`).
const SEQ_FLAGS: u8 = 0b11;
/// Sequence count wraps modulo 2^14.
pub const SEQ_COUNT_MODULUS: u16 = 1 << 14;
/// Primary header length in bytes.
const PRIMARY_HEADER_LEN: usize = 6;
/// Secondary header length in bytes.
const SECONDARY_HEADER_LEN: usize = 12;
/// Minimum total packet length before a packet is considered malformed.
pub const MIN_PACKET_LEN: usize = PRIMARY_HEADER_LEN + SECONDARY_HEADER_LEN;

/// The fixed trailing bytes of the secondary header, verbatim on every packet.
const SECONDARY_HEADER_TAIL: [u8; 8] = [0x2F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("packet shorter than the minimum header length ({MIN_PACKET_LEN} bytes)")]
    TooShort,
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,
}

/// A fully decoded space packet: header fields plus the raw JSON payload text.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPacket<'a> {
    pub apid: u16,
    pub is_command: bool,
    pub sequence_count: u16,
    pub packet_subtype_class: u8,
    pub packet_subtype: u8,
    pub payload: &'a str,
}

/// Encode a JSON payload into a space packet.
///
/// `is_command` is the primary header's type bit: `true` for OBC→PDU telecommands,
/// `false` for PDU→OBC telemetry/responses.
pub fn encode(
    payload_json: &str,
    apid: u16,
    sequence_count: u16,
    is_command: bool,
    packet_subtype_class: u8,
    packet_subtype: u8,
) -> Vec<u8> {
    let payload_bytes = payload_json.as_bytes();
    let seq_count = sequence_count % SEQ_COUNT_MODULUS;
    let packet_data_length = (SECONDARY_HEADER_LEN + payload_bytes.len()) as u16 - 1;

    let mut packet = Vec::with_capacity(MIN_PACKET_LEN + payload_bytes.len());

    let type_bit = u8::from(is_command);
    packet.push((VERSION << 5) | (type_bit << 4) | (1 << 3) | ((apid >> 8) as u8 & 0x07));
    packet.push((apid & 0xFF) as u8);
    packet.push((SEQ_FLAGS << 6) | ((seq_count >> 8) as u8 & 0x3F));
    packet.push((seq_count & 0xFF) as u8);
    packet.push((packet_data_length >> 8) as u8);
    packet.push((packet_data_length & 0xFF) as u8);

    packet.push(0x10);
    packet.push(packet_subtype_class);
    packet.push(packet_subtype);
    packet.push(0x00);
    packet.extend_from_slice(&SECONDARY_HEADER_TAIL);

    packet.extend_from_slice(payload_bytes);
    packet
}

/// Decode the primary and secondary headers and recover the JSON payload text.
///
/// Does not parse the payload as JSON; callers pass `payload` to the ICD layer.
pub fn decode(bytes: &[u8]) -> Result<DecodedPacket<'_>, PacketError> {
    if bytes.len() < MIN_PACKET_LEN {
        return Err(PacketError::TooShort);
    }

    let apid = (((bytes[0] & 0x07) as u16) << 8) | bytes[1] as u16;
    let is_command = (bytes[0] >> 4) & 0x01 == 1;
    let sequence_count = (((bytes[2] & 0x3F) as u16) << 8) | bytes[3] as u16;
    let packet_subtype_class = bytes[7];
    let packet_subtype = bytes[8];

    let payload = core::str::from_utf8(&bytes[MIN_PACKET_LEN..])
        .map_err(|_| PacketError::InvalidUtf8)?;

    Ok(DecodedPacket {
        apid,
        is_command,
        sequence_count,
        packet_subtype_class,
        packet_subtype,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_command_packet() {
        let encoded = encode(r#"{"ObcHeartBeat":{"HeartBeat":42}}"#, 0x100, 7, true, 1, 1);
        let decoded = decode(&encoded).expect("decode should succeed");

        assert_eq!(decoded.apid, 0x100);
        assert!(decoded.is_command);
        assert_eq!(decoded.sequence_count, 7);
        assert_eq!(decoded.packet_subtype_class, 1);
        assert_eq!(decoded.packet_subtype, 1);
        assert_eq!(decoded.payload, r#"{"ObcHeartBeat":{"HeartBeat":42}}"#);
    }

    #[test]
    fn response_packets_clear_the_type_bit() {
        let encoded = encode(r#"{"PduStatus":{}}"#, 0x100, 0, false, 1, 25);
        let decoded = decode(&encoded).unwrap();
        assert!(!decoded.is_command);
    }

    #[test]
    fn secondary_header_tail_is_emitted_verbatim() {
        let encoded = encode("{}", 0x100, 0, false, 1, 1);
        assert_eq!(encoded[6], 0x10);
        assert_eq!(&encoded[10..18], &SECONDARY_HEADER_TAIL);
    }

    #[test]
    fn sequence_count_wraps_modulo_16384() {
        let encoded = encode("{}", 0x100, SEQ_COUNT_MODULUS + 3, true, 1, 1);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.sequence_count, 3);
    }

    #[test]
    fn rejects_packets_shorter_than_the_header() {
        let short = vec![0u8; MIN_PACKET_LEN - 1];
        assert_eq!(decode(&short), Err(PacketError::TooShort));
    }

    #[test]
    fn rejects_non_utf8_payloads() {
        let mut bytes = encode("{}", 0x100, 0, true, 1, 1);
        bytes.truncate(MIN_PACKET_LEN);
        bytes.extend_from_slice(&[0xFF, 0xFE]);
        assert_eq!(decode(&bytes), Err(PacketError::InvalidUtf8));
    }

    #[test]
    fn apid_round_trips_for_non_default_values() {
        let encoded = encode("{}", 0x07FF, 0, true, 1, 1);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.apid, 0x07FF);
    }
}
