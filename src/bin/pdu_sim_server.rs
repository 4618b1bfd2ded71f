use clap::{App, Arg};
use pdu_sim::config::{PduConfig, DEFAULT_APID, DEFAULT_BIND_PORT, DEFAULT_MEASUREMENT_SEED};
use pdu_sim::dispatcher::log_transport_failure;
use pdu_sim::Dispatcher;
use tokio::net::UdpSocket;
use tracing::{info, warn};

const MAX_DATAGRAM_SIZE: usize = 65_507;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let matches = App::new("pdu-sim-server")
        .version("0.1.0")
        .author("Space Systems Engineering Team")
        .about("Power Distribution Unit simulator: UDP ICD dispatcher")
        .arg(
            Arg::with_name("bind-address")
                .long("bind-address")
                .value_name("ADDRESS")
                .help("Address to bind the UDP socket to")
                .takes_value(true)
                .default_value("0.0.0.0"),
        )
        .arg(
            Arg::with_name("port")
                .short("p")
                .long("port")
                .value_name("PORT")
                .help("UDP port to bind")
                .takes_value(true)
                .default_value(&DEFAULT_BIND_PORT.to_string()),
        )
        .arg(
            Arg::with_name("apid")
                .long("apid")
                .value_name("APID")
                .help("Application process identifier for emitted packets")
                .takes_value(true)
                .default_value(&DEFAULT_APID.to_string()),
        )
        .arg(
            Arg::with_name("measurement-seed")
                .long("measurement-seed")
                .value_name("SEED")
                .help("Seed for the measurement engine's RNG stream")
                .takes_value(true)
                .default_value(&DEFAULT_MEASUREMENT_SEED.to_string()),
        )
        .get_matches();

    let config = PduConfig {
        bind_address: matches.value_of("bind-address").unwrap().to_string(),
        bind_port: matches.value_of("port").unwrap().parse()?,
        apid: matches.value_of("apid").unwrap().parse()?,
        measurement_seed: matches.value_of("measurement-seed").unwrap().parse()?,
    };

    let socket = UdpSocket::bind(config.bind_socket_addr()).await?;
    info!(addr = %config.bind_socket_addr(), apid = config.apid, "PDU simulator ready");

    let mut dispatcher = Dispatcher::new(config.apid, config.measurement_seed);
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

    loop {
        let (len, src) = match socket.recv_from(&mut buf).await {
            Ok(result) => result,
            Err(err) => {
                log_transport_failure("recv_from", &err);
                continue;
            }
        };

        match dispatcher.process(&buf[..len]) {
            Some(response) => {
                if let Err(err) = socket.send_to(&response, src).await {
                    log_transport_failure("send_to", &err);
                }
            }
            None => {
                warn!(%src, "dropped malformed request");
            }
        }
    }
}
