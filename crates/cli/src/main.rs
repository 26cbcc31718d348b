use clap::Parser;
use ferrous_query_domain::config::CliOverrides;
use ferrous_query_domain::{DnsName, RecordClass, RecordType};
use ferrous_query_infrastructure::DnsClient;
use tracing::info;

mod bootstrap;
mod output;

#[derive(Parser)]
#[command(name = "ferrous-query")]
#[command(version)]
#[command(about = "Ferrous Query - DNS lookups and zone transfers over UDP/TCP")]
struct Cli {
    /// Name to look up, or the zone to transfer with --axfr
    name: String,

    /// Record type (A, AAAA, MX, TXT, TYPE65, ...)
    #[arg(default_value = "A")]
    record_type: String,

    /// Name server as host[:port]; repeat to try several in order
    #[arg(short = 's', long = "server", value_name = "HOST[:PORT]")]
    servers: Vec<String>,

    /// Initial UDP wait per server, doubled every retry round
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Number of UDP retry rounds
    #[arg(long)]
    retries: Option<u32>,

    /// Deadline for TCP connect and reads
    #[arg(long)]
    tcp_timeout_ms: Option<u64>,

    /// Query class (IN, CH, HS, ANY)
    #[arg(long, default_value = "IN")]
    class: String,

    /// Transfer the whole zone over TCP
    #[arg(long)]
    axfr: bool,

    /// Clear the recursion-desired flag
    #[arg(long)]
    norecurse: bool,

    /// Only accept authoritative answers
    #[arg(long)]
    aa: bool,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        servers: (!cli.servers.is_empty()).then(|| cli.servers.clone()),
        timeout_ms: cli.timeout_ms,
        retries: cli.retries,
        tcp_timeout_ms: cli.tcp_timeout_ms,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!(
        servers = ?config.resolver.servers,
        timeout_ms = config.resolver.timeout_ms,
        retries = config.resolver.retries,
        "Starting ferrous-query v{}",
        env!("CARGO_PKG_VERSION")
    );

    let name: DnsName = cli.name.parse()?;
    let qclass: RecordClass = cli.class.parse().map_err(anyhow::Error::msg)?;
    let recursion = !cli.norecurse;

    let client = DnsClient::new(&config.resolver).await?;

    let (records, qtype) = if cli.axfr {
        let records = client.query_zone(&name, qclass, recursion).await;
        (records, RecordType::AXFR)
    } else {
        let qtype: RecordType = cli.record_type.parse().map_err(anyhow::Error::msg)?;
        let records = client.query(&name, qclass, qtype, recursion, cli.aa).await;
        (records, qtype)
    };
    client.close();

    let records = records?;
    let stdout = std::io::stdout();
    output::print_records(&mut stdout.lock(), &name, qclass, &qtype.to_string(), &records)?;

    Ok(())
}
