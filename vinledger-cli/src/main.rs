//! VinLedger CLI - client for the vehicle registry API.

use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use vinledger_core::{NewVehicle, VehicleStatus};

mod client;
mod commands;
mod exit_codes;
mod utils;

use client::RegistryClient;
use commands::lookup::Selector;
use exit_codes::ExitCode;
use utils::Output;

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success
  1   General error (including requests the server rejected)
  65  Verification flagged the vehicle (suspicious, stolen or unregistered)
  66  Invalid input or record not found
  69  Registry server unreachable";

#[derive(Parser)]
#[command(name = "vinledger")]
#[command(author, version, about = "Vehicle registry client: register, look up and verify vehicles", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// Registry server base URL
    #[arg(
        long,
        global = true,
        env = "VINLEDGER_SERVER",
        default_value = "http://127.0.0.1:3000"
    )]
    server: String,

    /// Log requests and decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print nothing on success
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Print raw JSON records
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a vehicle and mint its token
    Register(RegisterArgs),

    /// Find a vehicle by id, VIN, plates or NFT token
    Lookup(LookupArgs),

    /// Change a vehicle's status (authority action)
    Status {
        /// Vehicle id
        #[arg(value_name = "ID")]
        id: u64,

        /// New status: active, suspended or stolen
        #[arg(value_name = "STATUS", value_parser = parse_status)]
        status: VehicleStatus,
    },

    /// Verify a scanned QR code, verification URL or VIN
    Verify {
        /// QR payload JSON, verification URL or bare VIN
        #[arg(value_name = "SCAN")]
        scan: String,

        /// Wallet address of the verifier
        #[arg(long)]
        verifier: Option<String>,

        /// Only check the vehicle; do not record a verification
        #[arg(long)]
        no_record: bool,
    },

    /// List verifications recorded for a vehicle
    History {
        /// Vehicle id
        #[arg(value_name = "ID")]
        id: u64,
    },

    /// Show registry statistics
    Stats,

    /// Show the QR payload for a vehicle
    Qr {
        /// Vehicle id
        #[arg(value_name = "ID")]
        id: u64,
    },

    /// Log in as an authority
    Login {
        /// Authority code, e.g. AUTH001
        #[arg(value_name = "AUTHORITY_ID")]
        authority_id: String,

        /// Access key
        #[arg(long, env = "VINLEDGER_ACCESS_KEY", hide_env_values = true)]
        access_key: String,
    },
}

#[derive(Args)]
struct RegisterArgs {
    /// Vehicle identification number
    #[arg(long)]
    vin: String,

    /// Make and model
    #[arg(long)]
    model: String,

    /// Model year
    #[arg(long)]
    year: i32,

    #[arg(long)]
    color: String,

    /// License plate
    #[arg(long)]
    plates: String,

    /// Owner's full name
    #[arg(long)]
    owner: String,

    /// Owner's wallet address
    #[arg(long)]
    wallet: Option<String>,
}

#[derive(Args)]
#[command(group(ArgGroup::new("selector").required(true).args(["id", "vin", "plates", "nft"])))]
struct LookupArgs {
    /// Vehicle id
    #[arg(long)]
    id: Option<u64>,

    /// Vehicle identification number (exact match)
    #[arg(long)]
    vin: Option<String>,

    /// License plate (exact match)
    #[arg(long)]
    plates: Option<String>,

    /// NFT token id
    #[arg(long)]
    nft: Option<String>,
}

impl LookupArgs {
    fn selector(self) -> Option<Selector> {
        self.id
            .map(Selector::Id)
            .or(self.vin.map(Selector::Vin))
            .or(self.plates.map(Selector::Plates))
            .or(self.nft.map(Selector::NftId))
    }
}

fn parse_status(raw: &str) -> Result<VehicleStatus, String> {
    raw.parse()
        .map_err(|_| format!("expected one of: active, suspended, stolen (got '{}')", raw))
}

fn init_tracing(verbose: bool) {
    if !verbose {
        return;
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vinledger=debug")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let output = Output {
        quiet: cli.quiet,
        json: cli.json,
    };
    let client = RegistryClient::new(&cli.server)?;

    match cli.command {
        Commands::Register(args) => {
            let input = NewVehicle {
                vin: args.vin,
                model: args.model,
                year: args.year,
                color: args.color,
                plates: args.plates,
                owner: args.owner,
                wallet_address: args.wallet,
            };
            commands::register::execute(&client, input, output).await
        }
        Commands::Lookup(args) => match args.selector() {
            Some(selector) => commands::lookup::execute(&client, selector, output).await,
            None => anyhow::bail!("Invalid input: a lookup selector is required"),
        },
        Commands::Status { id, status } => {
            commands::status::execute(&client, id, status, output).await
        }
        Commands::Verify {
            scan,
            verifier,
            no_record,
        } => commands::verify::execute(&client, scan, verifier, !no_record, output).await,
        Commands::History { id } => commands::history::execute(&client, id, output).await,
        Commands::Stats => commands::stats::execute(&client, output).await,
        Commands::Qr { id } => commands::qr::execute(&client, id, output).await,
        Commands::Login {
            authority_id,
            access_key,
        } => commands::login::execute(&client, authority_id, access_key, output).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let quiet = cli.quiet;

    let exit = match run(cli).await {
        Ok(()) => ExitCode::success(),
        Err(err) => ExitCode::from_anyhow(&err),
    };

    if let Some(message) = &exit.message {
        if !quiet {
            eprintln!("{} {}", "error:".red().bold(), message);
        }
    }
    std::process::exit(exit.code);
}
