//! kvrecord inspector
//!
//! Encodes, decodes and scans wire records from the command line.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kvrecord::{Config, PaddingMode, Record, RecordCodec, RecordError, RecordStream, RecordWriter, TypeTag};
use tracing_subscriber::{fmt, EnvFilter};

/// kvrecord inspector
#[derive(Parser, Debug)]
#[command(name = "kvrecord-inspect")]
#[command(about = "Encode, decode and scan typed key/value records")]
#[command(version)]
struct Args {
    /// Write INT64 records without the reserved 4-byte gap
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a record and print it as hex
    Encode {
        #[arg(short, long)]
        key: String,

        /// Value type name (string, int64)
        #[arg(short = 't', long = "type", value_parser = parse_type, default_value = "string")]
        value_type: TypeTag,

        #[arg(short, long)]
        value: String,
    },

    /// Decode a hex-encoded record
    Decode {
        /// Record bytes as hex
        hex: String,
    },

    /// Append a record to a file
    Append {
        file: PathBuf,

        #[arg(short, long)]
        key: String,

        /// Value type name (string, int64)
        #[arg(short = 't', long = "type", value_parser = parse_type, default_value = "string")]
        value_type: TypeTag,

        #[arg(short, long)]
        value: String,
    },

    /// Stream every value in a file without loading keys
    Scan { file: PathBuf },

    /// Print every full record in a file
    Dump { file: PathBuf },
}

fn parse_type(name: &str) -> Result<TypeTag, String> {
    name.parse::<TypeTag>().map_err(|e| e.to_string())
}

fn from_hex(text: &str) -> kvrecord::Result<Vec<u8>> {
    hex::decode(text.trim()).map_err(|e| RecordError::Decoding(format!("bad hex input: {}", e)))
}

fn run(args: Args) -> kvrecord::Result<()> {
    let padding = if args.compact {
        PaddingMode::Compact
    } else {
        PaddingMode::Preserve
    };
    let codec = RecordCodec::new(Config::builder().padding(padding).build());

    match args.command {
        Commands::Encode { key, value_type, value } => {
            let bytes = codec.encode(&Record::new(key, value_type, value))?;
            println!("{}", hex::encode(&bytes));
        }
        Commands::Decode { hex } => {
            let record = codec.decode(&from_hex(&hex)?)?;
            println!("{}\t{}\t{}", record.key, record.value_type, record.value);
        }
        Commands::Append { file, key, value_type, value } => {
            let out = OpenOptions::new().create(true).append(true).open(&file)?;
            let start = out.metadata()?.len();
            let mut writer = RecordWriter::with_codec(codec, BufWriter::new(out));
            let offset = writer.append(&Record::new(key, value_type, value))?;
            writer.flush()?;
            println!("{}", start + offset);
        }
        Commands::Scan { file } => {
            let mut stream = RecordStream::with_codec(codec, BufReader::new(File::open(&file)?));
            loop {
                let offset = stream.offset();
                match stream.next_value()? {
                    Some(value) => println!("{}\t{}\t{}", offset, value.type_name, value.value),
                    None => break,
                }
            }
        }
        Commands::Dump { file } => {
            let mut stream = RecordStream::with_codec(codec, BufReader::new(File::open(&file)?));
            loop {
                let offset = stream.offset();
                match stream.next_record()? {
                    Some(record) => println!(
                        "{}\t{}\t{}\t{}",
                        offset, record.key, record.value_type, record.value
                    ),
                    None => break,
                }
            }
        }
    }

    Ok(())
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvrecord=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!("kvrecord-inspect v{}", kvrecord::VERSION);

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
