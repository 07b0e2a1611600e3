//! CLI for the HotelBooking contract and its file store.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use hotel_cid::{ContentIdentifier, encode_from_hex};
use hotel_client::{HotelSession, connect, init_logging};
use hotel_config::ClientConfig;
use tokio::fs;
use tracing::info;

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Client configuration, read by commands that talk to the network.
    #[clap(short, long, default_value = "./hotel.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Print the contract owner.
    Owner,
    /// Print the balance of the signing account.
    Balance,
    /// Register a hotel with a base price in wei.
    Register { name: String, price: String },
    /// Ask the contract for the price of a booking.
    Estimate {
        name: String,
        room_type: String,
        days: String,
    },
    /// Book a room, paying the estimated price.
    Book {
        name: String,
        room_type: String,
        days: String,
    },
    /// List the bookings of a hotel.
    Bookings { name: String },
    /// Add a file to the store and print its identifier.
    Upload { file: PathBuf },
    /// Store a content identifier for a hotel, uploading `--file` first if given.
    Attach {
        name: String,
        #[arg(long, conflicts_with = "cid", required_unless_present = "cid")]
        file: Option<PathBuf>,
        #[arg(long)]
        cid: Option<String>,
    },
    /// Print the content identifier stored for a hotel.
    GetHash { name: String },
    /// Fetch a file from the store.
    Download {
        cid: String,
        /// Defaults to a file named after the identifier.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the multihash of a content identifier in hex.
    CidToHex { cid: String },
    /// Encode a hex sha2-256 multihash (prefix `1220`) as a content identifier.
    HexToCid { hex: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Command::CidToHex { cid } => {
            let cid = cid.parse::<ContentIdentifier>().map_err(report)?;
            println!("{}", cid.to_hex().map_err(report)?);
            let parts = cid.to_parts().map_err(report)?;
            println!("hash function: {}", parts.hash_function_hex());
            println!("hash size:     {}", parts.hash_size_hex());
            println!("digest:        {}", parts.digest_hex());
            return Ok(());
        }
        Command::HexToCid { hex } => {
            println!("{}", encode_from_hex(hex).map_err(report)?);
            return Ok(());
        }
        _ => {}
    }

    let config = ClientConfig::read(&cli.config)
        .await
        .with_context(|| format!("could not read config: {:?}", cli.config))?;
    let session = connect(&config).await.context("failed to connect")?;
    info!(account = %session.account(), "session ready");

    run(&session, cli.command).await
}

async fn run(session: &HotelSession, cmd: Command) -> Result<()> {
    match cmd {
        Command::Owner => {
            println!("{}", session.owner().await.map_err(report)?)
        }
        Command::Balance => {
            println!("{} wei", session.balance().await.map_err(report)?)
        }
        Command::Register { name, price } => {
            let outcome = session
                .register_hotel(&name, &price)
                .await
                .map_err(report)?;
            println!("{outcome}")
        }
        Command::Estimate {
            name,
            room_type,
            days,
        } => {
            let price = session
                .estimate_price(&name, &room_type, &days)
                .await
                .map_err(report)?;
            println!("{price}")
        }
        Command::Book {
            name,
            room_type,
            days,
        } => {
            let outcome = session
                .book_hotel(&name, &room_type, &days)
                .await
                .map_err(report)?;
            println!("{outcome}");
            println!("balance: {} wei", session.balance().await.map_err(report)?)
        }
        Command::Bookings { name } => {
            for b in session.hotel_bookings(&name).await.map_err(report)? {
                println!("{b}")
            }
        }
        Command::Upload { file } => {
            let data = read_file(&file).await?;
            println!("{}", session.upload(data).await.map_err(report)?)
        }
        Command::Attach { name, file, cid } => {
            let outcome = match (file, cid) {
                (Some(file), _) => {
                    let data = read_file(&file).await?;
                    let (cid, outcome) = session
                        .upload_and_attach(&name, data)
                        .await
                        .map_err(report)?;
                    println!("{cid}");
                    outcome
                }
                (None, Some(cid)) => session
                    .attach_content_hash(&name, &cid)
                    .await
                    .map_err(report)?,
                (None, None) => anyhow::bail!("one of --file or --cid is required"),
            };
            println!("{outcome}")
        }
        Command::GetHash { name } => match session.ipfs_hash(&name).await.map_err(report)? {
            Some(cid) => println!("{cid}"),
            None => println!("no content stored for {name}"),
        },
        Command::Download { cid, out } => {
            let data = session.download(&cid).await.map_err(report)?;
            let path = out.unwrap_or_else(|| PathBuf::from(&cid));
            fs::write(&path, data)
                .await
                .with_context(|| format!("could not write {path:?}"))?;
            println!("{}", path.display())
        }
        Command::CidToHex { .. } | Command::HexToCid { .. } => {}
    }
    Ok(())
}

async fn read_file(path: &Path) -> Result<Bytes> {
    let data = fs::read(path)
        .await
        .with_context(|| format!("could not read {path:?}"))?;
    Ok(Bytes::from(data))
}

/// Attach the error kind so the user sees what failed.
fn report<E>(e: E) -> anyhow::Error
where
    E: Into<hotel_client::Error>,
{
    let e = e.into();
    let kind = e.kind();
    anyhow::Error::new(e).context(kind)
}
