//! ICD command/response schema: maps the single top-level JSON key of a decoded
//! packet payload to a typed command, and encodes typed responses back to JSON.

use crate::lines::UnitLineCategory;
use crate::state::{PduMode, PduState};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IcdError {
    #[error("payload is not valid JSON")]
    InvalidJson,
    #[error("payload must have exactly one top-level key, found {0}")]
    NotSingleKeyObject(usize),
    #[error("unrecognised command {0:?}")]
    UnknownCommand(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// A decoded ICD telecommand, args already validated into native types.
#[derive(Debug, Clone, PartialEq)]
pub enum PduCommand {
    ObcHeartBeat { heart_beat: u32 },
    GetPduStatus,
    GetUnitLineStates,
    GetConvertedMeasurements { category: UnitLineCategory },
    SetUnitPwLines { category: UnitLineCategory, parameters: u16 },
    ResetUnitPwLines { category: UnitLineCategory, parameters: u16 },
    PduGoLoad,
    PduGoOperate,
    PduGoSafe,
    PduGoBoot,
    PduGoMaintenance,
}

#[derive(Debug, Deserialize)]
struct HeartBeatArgs {
    #[serde(rename = "HeartBeat")]
    heart_beat: u32,
}

#[derive(Debug, Deserialize)]
struct LogicUnitArgs {
    #[serde(rename = "LogicUnitId")]
    logic_unit_id: u8,
}

#[derive(Debug, Deserialize)]
struct UnitLineWriteArgs {
    #[serde(rename = "LogicUnitId")]
    logic_unit_id: u8,
    #[serde(rename = "Parameters")]
    parameters: u16,
}

fn category_from_id(id: u8) -> Result<UnitLineCategory, IcdError> {
    UnitLineCategory::from_logic_unit_id(id).ok_or(IcdError::InvalidArgument("LogicUnitId out of range 0..8"))
}

/// Parse a decoded payload string into a command. Rejects any payload whose
/// top-level JSON value is not an object with exactly one key.
pub fn parse_command(payload: &str) -> Result<PduCommand, IcdError> {
    let value: Value = serde_json::from_str(payload).map_err(|_| IcdError::InvalidJson)?;
    let object = value.as_object().ok_or(IcdError::InvalidJson)?;
    if object.len() != 1 {
        return Err(IcdError::NotSingleKeyObject(object.len()));
    }
    let (key, args) = object.iter().next().expect("checked len == 1");

    match key.as_str() {
        "ObcHeartBeat" => {
            let args: HeartBeatArgs =
                serde_json::from_value(args.clone()).map_err(|_| IcdError::InvalidArgument("HeartBeat"))?;
            Ok(PduCommand::ObcHeartBeat { heart_beat: args.heart_beat })
        }
        "GetPduStatus" => Ok(PduCommand::GetPduStatus),
        "GetUnitLineStates" => Ok(PduCommand::GetUnitLineStates),
        "GetConvertedMeasurements" => {
            let args: LogicUnitArgs =
                serde_json::from_value(args.clone()).map_err(|_| IcdError::InvalidArgument("LogicUnitId"))?;
            Ok(PduCommand::GetConvertedMeasurements { category: category_from_id(args.logic_unit_id)? })
        }
        "SetUnitPwLines" => {
            let args: UnitLineWriteArgs = serde_json::from_value(args.clone())
                .map_err(|_| IcdError::InvalidArgument("LogicUnitId/Parameters"))?;
            Ok(PduCommand::SetUnitPwLines {
                category: category_from_id(args.logic_unit_id)?,
                parameters: args.parameters,
            })
        }
        "ResetUnitPwLines" => {
            let args: UnitLineWriteArgs = serde_json::from_value(args.clone())
                .map_err(|_| IcdError::InvalidArgument("LogicUnitId/Parameters"))?;
            Ok(PduCommand::ResetUnitPwLines {
                category: category_from_id(args.logic_unit_id)?,
                parameters: args.parameters,
            })
        }
        "PduGoLoad" => Ok(PduCommand::PduGoLoad),
        "PduGoOperate" => Ok(PduCommand::PduGoOperate),
        "PduGoSafe" => Ok(PduCommand::PduGoSafe),
        "PduGoBoot" => Ok(PduCommand::PduGoBoot),
        "PduGoMaintenance" => Ok(PduCommand::PduGoMaintenance),
        unknown => Err(IcdError::UnknownCommand(unknown.to_string())),
    }
}

/// An encoded ICD response, ready to be serialized as the packet payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PduResponse {
    PduHeartBeat { heart_beat: u32, state: PduState },
    PduStatus { state: PduState, protection_status: u32, mode: PduMode },
    PduUnitLineStates { lines: [(UnitLineCategory, u16); crate::lines::NUM_CATEGORIES] },
    PduConvertedMeasurements { category: UnitLineCategory, measurements: Vec<f32> },
    PduMsgAcknowledgement { accepted: bool },
}

impl PduResponse {
    pub fn to_json(&self) -> String {
        let value = match self {
            PduResponse::PduHeartBeat { heart_beat, state } => json!({
                "PduHeartBeat": {
                    "HeartBeat": heart_beat,
                    "PduState": *state as u8,
                }
            }),
            PduResponse::PduStatus { state, protection_status, mode } => json!({
                "PduStatus": {
                    "PduState": *state as u8,
                    "ProtectionStatus": protection_status,
                    "PduMode": *mode as u8,
                }
            }),
            PduResponse::PduUnitLineStates { lines } => {
                let mut body = serde_json::Map::new();
                for (category, mask) in lines {
                    body.insert(category.name().to_string(), json!(mask));
                }
                json!({ "PduUnitLineStates": body })
            }
            PduResponse::PduConvertedMeasurements { category, measurements } => {
                let mut body = serde_json::Map::new();
                body.insert(category.adc_label().to_string(), json!(measurements));
                json!({ "PduConvertedMeasurements": body })
            }
            PduResponse::PduMsgAcknowledgement { accepted } => json!({
                "PduMsgAcknowledgement": {
                    "PduReturnCode": if *accepted { 0 } else { 1 },
                }
            }),
        };
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_heartbeat_command() {
        let cmd = parse_command(r#"{"ObcHeartBeat":{"HeartBeat":42}}"#).unwrap();
        assert_eq!(cmd, PduCommand::ObcHeartBeat { heart_beat: 42 });
    }

    #[test]
    fn parses_zero_arg_commands() {
        assert_eq!(parse_command(r#"{"GetPduStatus":{}}"#).unwrap(), PduCommand::GetPduStatus);
        assert_eq!(parse_command(r#"{"PduGoSafe":{}}"#).unwrap(), PduCommand::PduGoSafe);
    }

    #[test]
    fn rejects_multi_key_payloads() {
        let err = parse_command(r#"{"PduGoSafe":{},"PduGoLoad":{}}"#).unwrap_err();
        assert_eq!(err, IcdError::NotSingleKeyObject(2));
    }

    #[test]
    fn rejects_empty_object_payloads() {
        let err = parse_command("{}").unwrap_err();
        assert_eq!(err, IcdError::NotSingleKeyObject(0));
    }

    #[test]
    fn unknown_key_is_reported_as_unknown_command() {
        let err = parse_command(r#"{"DoSomethingUnrecognised":{}}"#).unwrap_err();
        assert_eq!(err, IcdError::UnknownCommand("DoSomethingUnrecognised".to_string()));
    }

    #[test]
    fn rejects_invalid_json() {
        assert_eq!(parse_command("not json"), Err(IcdError::InvalidJson));
    }

    #[test]
    fn logic_unit_id_out_of_range_is_invalid_argument() {
        let err = parse_command(r#"{"GetConvertedMeasurements":{"LogicUnitId":9}}"#).unwrap_err();
        assert_eq!(err, IcdError::InvalidArgument("LogicUnitId out of range 0..8"));
    }

    #[test]
    fn set_unit_pw_lines_parses_category_and_parameters() {
        let cmd = parse_command(r#"{"SetUnitPwLines":{"LogicUnitId":2,"Parameters":15}}"#).unwrap();
        assert_eq!(
            cmd,
            PduCommand::SetUnitPwLines { category: UnitLineCategory::ReactionWheelEnSel, parameters: 15 }
        );
    }

    #[test]
    fn heartbeat_response_echoes_value_and_reports_state() {
        let response = PduResponse::PduHeartBeat { heart_beat: 42, state: PduState::Boot };
        let json: Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(json["PduHeartBeat"]["HeartBeat"], 42);
        assert_eq!(json["PduHeartBeat"]["PduState"], 0);
    }

    #[test]
    fn unit_line_states_response_contains_all_nine_categories() {
        let lines = crate::lines::LineRegisters::new().snapshot();
        let response = PduResponse::PduUnitLineStates { lines };
        let json: Value = serde_json::from_str(&response.to_json()).unwrap();
        let body = json["PduUnitLineStates"].as_object().unwrap();
        for category in UnitLineCategory::ALL {
            assert!(body.contains_key(category.name()));
        }
    }

    #[test]
    fn acknowledgement_return_code_matches_accepted_flag() {
        let ack = PduResponse::PduMsgAcknowledgement { accepted: true };
        let json: Value = serde_json::from_str(&ack.to_json()).unwrap();
        assert_eq!(json["PduMsgAcknowledgement"]["PduReturnCode"], 0);

        let nack = PduResponse::PduMsgAcknowledgement { accepted: false };
        let json: Value = serde_json::from_str(&nack.to_json()).unwrap();
        assert_eq!(json["PduMsgAcknowledgement"]["PduReturnCode"], 1);
    }
}
