//! Developer CLI for the acoustic payment codec, modem, and transport
//! layers.
//!
//! This binary is not the seller/buyer settlement demo; it exercises each
//! layer independently (wire codec over hex, modem over WAV, transport over
//! a real audio device), in the same spirit as the teacher shipping a
//! standalone server binary separate from any end-user chat client.
//!
//! Unlike the teacher's binaries, which report everything through
//! `tracing` and never write protocol data to stdout, this tool's hex and
//! field-dump output *is* the product (scripts pipe `encode-request` into
//! `send`, or diff `decode-request` against expected fields) and so is
//! deliberately exempt from the workspace's `print_stdout` lint.
#![allow(clippy::print_stdout)]

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tonepay_codec::{Network, PaymentRequest, PaymentResponse, Scheme};
use tonepay_transport::{AcousticLink, SystemAudioDevice};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tonepay developer tool
#[derive(Parser, Debug)]
#[command(name = "tonepay")]
#[command(about = "Exercise the acoustic payment codec, modem, and transport layers")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a payment request to hex on stdout.
    EncodeRequest {
        /// Protocol version
        #[arg(long, default_value_t = 1)]
        version: u8,
        /// Settlement network ID (0=base-sepolia, 1=base, 2=ethereum, 3=ethereum-sepolia)
        #[arg(long, default_value_t = 0)]
        network: u8,
        /// Settlement scheme ID (0=exact)
        #[arg(long, default_value_t = 0)]
        scheme: u8,
        /// Price in smallest token units
        #[arg(long)]
        price: u64,
        /// Recipient address, as 40 hex characters
        #[arg(long)]
        pay_to: String,
        /// Authorization validity window, in seconds
        #[arg(long)]
        timeout: u32,
        /// Broadcast nonce
        #[arg(long, default_value_t = 0)]
        nonce: u8,
    },

    /// Decode a payment request from hex on stdin, printing its fields.
    DecodeRequest,

    /// Encode a payment response to hex on stdout.
    EncodeResponse {
        /// Protocol version
        #[arg(long, default_value_t = 1)]
        version: u8,
        /// Settlement network ID
        #[arg(long, default_value_t = 0)]
        network: u8,
        /// Settlement scheme ID
        #[arg(long, default_value_t = 0)]
        scheme: u8,
        /// Signature recovery byte
        #[arg(long)]
        v: u8,
        /// Signature component r, as 64 hex characters
        #[arg(long)]
        r: String,
        /// Signature component s, as 64 hex characters
        #[arg(long)]
        s: String,
        /// Authorization nonce, as 64 hex characters
        #[arg(long)]
        nonce: String,
        /// Unix timestamp the authorization becomes valid
        #[arg(long)]
        valid_after: u32,
        /// Unix timestamp the authorization expires
        #[arg(long)]
        valid_before: u32,
    },

    /// Decode a payment response from hex on stdin, printing its fields.
    DecodeResponse,

    /// Modulate a hex payload from stdin into a WAV file.
    Modulate {
        /// Output WAV path
        #[arg(long)]
        out: PathBuf,
    },

    /// Demodulate a WAV file into a hex payload on stdout.
    Demodulate {
        /// Input WAV path
        #[arg(long)]
        input: PathBuf,
    },

    /// Play a hex payload from stdin over the default audio device.
    Send,

    /// Listen on the default audio device and print a recovered payload as hex.
    Receive {
        /// How long to listen before giving up, in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    match cli.command {
        Command::EncodeRequest { version, network, scheme, price, pay_to, timeout, nonce } => {
            let pay_to = parse_hex_exact::<20>(&pay_to)?;
            let request = PaymentRequest::new(
                version,
                Network::from_id(network),
                Scheme::from_id(scheme),
                price,
                pay_to,
                timeout,
                nonce,
            );
            println!("{}", hex::encode(request.encode()));
        }

        Command::DecodeRequest => {
            let bytes = hex::decode(read_stdin_trimmed()?)?;
            let request = PaymentRequest::decode(&bytes)?;
            println!("{request:#?}");
        }

        Command::EncodeResponse { version, network, scheme, v, r, s, nonce, valid_after, valid_before } => {
            let response = PaymentResponse {
                version,
                network: Network::from_id(network),
                scheme: Scheme::from_id(scheme),
                v,
                r: parse_hex_exact::<32>(&r)?,
                s: parse_hex_exact::<32>(&s)?,
                nonce: parse_hex_exact::<32>(&nonce)?,
                valid_after,
                valid_before,
            };
            println!("{}", hex::encode(response.encode()));
        }

        Command::DecodeResponse => {
            let bytes = hex::decode(read_stdin_trimmed()?)?;
            let response = PaymentResponse::decode(&bytes)?;
            println!("{response:#?}");
        }

        Command::Modulate { out } => {
            let payload = hex::decode(read_stdin_trimmed()?)?;
            let samples = tonepay_modem::modulate(&payload)?;
            write_wav(&out, &samples)?;
            tracing::info!(path = %out.display(), samples = samples.len(), "wrote modulated audio");
        }

        Command::Demodulate { input } => {
            let samples = read_wav(&input)?;
            let payload = tonepay_modem::demodulate(&samples)?;
            println!("{}", hex::encode(payload));
        }

        Command::Send => {
            let payload = hex::decode(read_stdin_trimmed()?)?;
            let link = AcousticLink::new(SystemAudioDevice::default());
            link.send(&payload)?;
        }

        Command::Receive { timeout_secs } => {
            let link = AcousticLink::new(SystemAudioDevice::default());
            match link.receive(Duration::from_secs(timeout_secs))? {
                Some(payload) => println!("{}", hex::encode(payload)),
                None => {
                    tracing::warn!("no frame recovered within the listening window");
                    return Err("no frame recovered".into());
                }
            }
        }
    }

    Ok(())
}

/// Decode `s` as hex into exactly `N` bytes.
fn parse_hex_exact<const N: usize>(s: &str) -> Result<[u8; N], Box<dyn std::error::Error>> {
    let bytes = hex::decode(s)?;
    let array: [u8; N] =
        bytes.try_into().map_err(|v: Vec<u8>| format!("expected {N} bytes, got {}", v.len()))?;
    Ok(array)
}

/// Read all of stdin as a trimmed UTF-8 string.
fn read_stdin_trimmed() -> Result<String, Box<dyn std::error::Error>> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input.trim().to_string())
}

/// Write mono `f32` samples to a WAV file at [`tonepay_modem::SAMPLE_RATE_HZ`].
fn write_wav(path: &PathBuf, samples: &[f32]) -> Result<(), Box<dyn std::error::Error>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: tonepay_modem::SAMPLE_RATE_HZ,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Read a WAV file's samples as mono `f32`, downmixing multi-channel files
/// by averaging.
fn read_wav(path: &PathBuf) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let raw: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => {
            reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?
        }
        hound::SampleFormat::Int => {
            let max = match spec.bits_per_sample {
                8 => 128.0,
                16 => 32_768.0,
                24 => 8_388_608.0,
                _ => 2_147_483_648.0,
            };
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    if spec.channels <= 1 {
        return Ok(raw);
    }

    let channels = usize::from(spec.channels);
    Ok(raw
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect())
}
