use std::process;

use log::info;

use tetra_pei::link::{Link, LinkConfig};
use tetra_pei::message::{OutputMessage, Sink};
use tetra_pei::transport::serial;

/// Prints every decoded message to stdout.
struct StdoutSink;

impl Sink for StdoutSink {
    fn update(&mut self, message: OutputMessage) {
        println!("{}:", message.key);
        for (name, value) in &message.fields {
            println!("  {name} = {value}");
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let port = match args.next() {
        Some(port) => port,
        None => match serial::find_modem_port() {
            Ok(port) => port,
            Err(e) => {
                eprintln!("no modem port given and auto-detection failed: {e}");
                eprintln!("usage: tetra-pei <port> [baud]");
                process::exit(1);
            }
        },
    };
    let baud_rate = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(serial::DEFAULT_BAUD);

    let mut config = LinkConfig::new(port);
    config.baud_rate = baud_rate;

    let mut sink = StdoutSink;
    let mut link = match Link::connect(&config, &mut sink) {
        Ok(link) => link,
        Err(e) => {
            eprintln!("failed to connect: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = link.initialize_device() {
        eprintln!("device setup failed: {e}");
        process::exit(1);
    }

    info!("listening on {} at {} baud", config.port, config.baud_rate);
    if let Err(e) = link.run(&mut sink) {
        eprintln!("link error: {e}");
        process::exit(1);
    }
}
