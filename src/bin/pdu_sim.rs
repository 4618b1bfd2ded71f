use clap::{App, Arg, SubCommand};
use colored::*;
use pdu_sim::config::{DEFAULT_APID, DEFAULT_BIND_PORT};
use pdu_sim::packet;
use tokio::net::UdpSocket;

const DEFAULT_HOST: &str = "127.0.0.1";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("pdu-sim")
        .version("0.1.0")
        .author("Space Systems Engineering Team")
        .about("ICD command-line client for the PDU simulator")
        .arg(
            Arg::with_name("host")
                .short("h")
                .long("host")
                .value_name("HOST")
                .help("Simulator host address")
                .takes_value(true)
                .default_value(DEFAULT_HOST)
                .global(true),
        )
        .arg(
            Arg::with_name("port")
                .short("p")
                .long("port")
                .value_name("PORT")
                .help("Simulator UDP port")
                .takes_value(true)
                .default_value(&DEFAULT_BIND_PORT.to_string())
                .global(true),
        )
        .arg(
            Arg::with_name("apid")
                .long("apid")
                .value_name("APID")
                .help("APID to stamp on outgoing packets")
                .takes_value(true)
                .default_value(&DEFAULT_APID.to_string())
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("heartbeat")
                .about("Send an ObcHeartBeat and print the reply")
                .arg(Arg::with_name("value").help("Heartbeat value to send").required(true)),
        )
        .subcommand(SubCommand::with_name("status").about("Get PduStatus"))
        .subcommand(
            SubCommand::with_name("lines")
                .about("Read or write unit power lines")
                .subcommand(
                    SubCommand::with_name("get").about("Get all unit line states (GetUnitLineStates)"),
                )
                .subcommand(
                    SubCommand::with_name("set")
                        .about("Set unit power lines (SetUnitPwLines)")
                        .arg(Arg::with_name("logic-unit-id").help("LogicUnitId 0..8").required(true))
                        .arg(Arg::with_name("mask").help("Bitmask to OR in").required(true)),
                )
                .subcommand(
                    SubCommand::with_name("reset")
                        .about("Reset unit power lines (ResetUnitPwLines)")
                        .arg(Arg::with_name("logic-unit-id").help("LogicUnitId 0..8").required(true))
                        .arg(Arg::with_name("mask").help("Bitmask to clear").required(true)),
                ),
        )
        .subcommand(
            SubCommand::with_name("measurements")
                .about("Get converted ADC measurements for a category")
                .arg(Arg::with_name("logic-unit-id").help("LogicUnitId 0..8").required(true)),
        )
        .subcommand(
            SubCommand::with_name("goto")
                .about("Request a PDU state transition")
                .arg(
                    Arg::with_name("state")
                        .help("Target state")
                        .required(true)
                        .possible_values(&["boot", "load", "operate", "safe", "maintenance"]),
                ),
        )
        .get_matches();

    let host = matches.value_of("host").unwrap();
    let port: u16 = matches.value_of("port").unwrap().parse()?;
    let apid: u16 = matches.value_of("apid").unwrap().parse()?;

    match matches.subcommand() {
        ("heartbeat", Some(sub)) => {
            let value: u32 = sub.value_of("value").unwrap().parse()?;
            let payload = serde_json::json!({ "ObcHeartBeat": { "HeartBeat": value } }).to_string();
            send_and_print(host, port, apid, &payload, 1, 1).await?;
        }
        ("status", _) => {
            let payload = serde_json::json!({ "GetPduStatus": {} }).to_string();
            send_and_print(host, port, apid, &payload, 3, 25).await?;
        }
        ("lines", Some(sub)) => match sub.subcommand() {
            ("get", _) => {
                let payload = serde_json::json!({ "GetUnitLineStates": {} }).to_string();
                send_and_print(host, port, apid, &payload, 3, 129).await?;
            }
            ("set", Some(lines_sub)) => {
                let id: u8 = lines_sub.value_of("logic-unit-id").unwrap().parse()?;
                let mask: u16 = lines_sub.value_of("mask").unwrap().parse()?;
                let payload =
                    serde_json::json!({ "SetUnitPwLines": { "LogicUnitId": id, "Parameters": mask } }).to_string();
                send_and_print(host, port, apid, &payload, 1, 64).await?;
            }
            ("reset", Some(lines_sub)) => {
                let id: u8 = lines_sub.value_of("logic-unit-id").unwrap().parse()?;
                let mask: u16 = lines_sub.value_of("mask").unwrap().parse()?;
                let payload =
                    serde_json::json!({ "ResetUnitPwLines": { "LogicUnitId": id, "Parameters": mask } }).to_string();
                send_and_print(host, port, apid, &payload, 1, 65).await?;
            }
            _ => println!("{}", "lines subcommand required: get, set or reset".yellow()),
        },
        ("measurements", Some(sub)) => {
            let id: u8 = sub.value_of("logic-unit-id").unwrap().parse()?;
            let payload = serde_json::json!({ "GetConvertedMeasurements": { "LogicUnitId": id } }).to_string();
            send_and_print(host, port, apid, &payload, 3, 131).await?;
        }
        ("goto", Some(sub)) => {
            let key = match sub.value_of("state").unwrap() {
                "boot" => "PduGoBoot",
                "load" => "PduGoLoad",
                "operate" => "PduGoOperate",
                "safe" => "PduGoSafe",
                "maintenance" => "PduGoMaintenance",
                other => unreachable!("clap validated possible_values, got {other}"),
            };
            let payload = serde_json::json!({ key: {} }).to_string();
            send_and_print(host, port, apid, &payload, 1, 200).await?;
        }
        _ => {
            println!("{}", "No command specified. Use --help for usage information.".yellow());
        }
    }

    Ok(())
}

async fn send_and_print(
    host: &str,
    port: u16,
    apid: u16,
    payload: &str,
    subtype_class: u8,
    subtype: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = packet::encode(payload, apid, 0, true, subtype_class, subtype);

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect((host, port)).await?;
    socket.send(&request).await?;

    let mut buf = vec![0u8; 65_507];
    let len = socket.recv(&mut buf).await?;
    let decoded = packet::decode(&buf[..len])?;

    match serde_json::from_str::<serde_json::Value>(decoded.payload) {
        Ok(value) => println!("{} {}", "<-".bright_blue(), serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{} {}", "<-".red(), decoded.payload),
    }

    Ok(())
}
