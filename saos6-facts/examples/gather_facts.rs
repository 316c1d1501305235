//! Gather facts from a SAOS6 switch
//!
//! Connects to a console server port (raw TCP, already logged in) and
//! prints the gathered facts as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example gather_facts -- --host console1 --port 7001 --subset all --resources interfaces
//! ```

use std::env;
use std::time::Duration;

use saos6_facts::{DriverBuilder, Facts, InterfacesMode, Saos6Cliconf, SubsetRequest};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    eprintln!("Connecting to {}:{}...", args.host, args.port);
    let stream = TcpStream::connect((args.host.as_str(), args.port)).await?;

    let driver = DriverBuilder::new()
        .timeout(Duration::from_secs(args.timeout))
        .build(stream)?;
    let mut cliconf = Saos6Cliconf::new(driver);
    cliconf.open().await?;
    eprintln!("Session ready\n");

    let mode = if args.summary {
        InterfacesMode::Summary
    } else {
        InterfacesMode::Detailed
    };
    let facts = Facts::builder().interfaces_mode(mode).try_build()?;

    let gathered = facts
        .get_facts(
            &mut cliconf,
            args.subset.map(SubsetRequest::new),
            args.resources.map(SubsetRequest::new),
        )
        .await?;

    for warning in &gathered.warnings {
        eprintln!("warning: {warning}");
    }
    println!("{}", serde_json::to_string_pretty(&gathered.facts)?);

    Ok(())
}

struct Args {
    host: String,
    port: u16,
    timeout: u64,
    subset: Option<Vec<String>>,
    resources: Option<Vec<String>>,
    summary: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 23u16;
        let mut timeout = 30u64;
        let mut subset = None;
        let mut resources = None;
        let mut summary = false;

        let split = |s: &str| s.split(',').map(str::to_string).collect::<Vec<_>>();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(23);
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(30);
                    }
                }
                "--subset" | "-s" => {
                    i += 1;
                    if i < args.len() {
                        subset = Some(split(&args[i]));
                    }
                }
                "--resources" | "-r" => {
                    i += 1;
                    if i < args.len() {
                        resources = Some(split(&args[i]));
                    }
                }
                "--summary" => summary = true,
                "--help" => {
                    eprintln!(
                        "Usage: gather_facts [--host H] [--port P] [--timeout SECS] \
                         [--subset a,b] [--resources a,b] [--summary]"
                    );
                    std::process::exit(0);
                }
                other => eprintln!("Unknown argument: {other}"),
            }
            i += 1;
        }

        Self {
            host,
            port,
            timeout,
            subset,
            resources,
            summary,
        }
    }
}
