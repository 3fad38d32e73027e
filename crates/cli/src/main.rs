use clap::{Parser, Subcommand};
use ferrous_lookup_domain::CliOverrides;
use std::process::ExitCode;

mod bootstrap;
mod commands;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "lookup")]
#[command(version)]
#[command(about = "Ferrous Lookup - iterative DNS resolution from the root servers down")]
#[command(subcommand_negates_reqs = true)]
struct Cli {
    /// Domain name to resolve
    #[arg(required = true)]
    domain: Option<String>,

    /// Record type: A, NS, CNAME, MX or TXT
    #[arg(required = true, value_name = "TYPE")]
    record_type: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Root server to start from (IP or IP:PORT)
    #[arg(long, value_name = "ADDR", global = true)]
    root_server: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Answer DNS queries over UDP by resolving them iteratively
    Serve {
        /// UDP port to listen on
        #[arg(short = 'p', long)]
        port: Option<u16>,

        /// Bind address
        #[arg(short = 'b', long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (dns_port, bind_address) = match &cli.command {
        Some(Command::Serve { port, bind }) => (*port, bind.clone()),
        None => (None, None),
    };
    let cli_overrides = CliOverrides {
        dns_port,
        bind_address,
        root_server: cli.root_server.clone(),
        log_level: cli.log_level.clone(),
    };

    match run(cli, cli_overrides).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, cli_overrides: CliOverrides) -> anyhow::Result<()> {
    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);
    bootstrap::log_startup(&config);

    let services = di::DnsServices::new(&config)?;

    match (cli.command, cli.domain, cli.record_type) {
        (Some(Command::Serve { .. }), _, _) => commands::serve(&config, &services).await,
        (None, Some(domain), Some(record_type)) => {
            commands::lookup(&services, &domain, &record_type).await
        }
        _ => anyhow::bail!("expected <DOMAIN> <TYPE> or the serve subcommand"),
    }
}
