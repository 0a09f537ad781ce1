use std::path::PathBuf;

use clap::{Args, Subcommand};
use matrixbridge_pixel::PixelFormat;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod convert;
pub mod decode;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Host the legacy matrix socket and run a pipeline per connection.
    Serve(ServeArgs),
    /// Decode a capture file and print a per-packet summary.
    Decode(DecodeArgs),
    /// Convert one raw frame file between pixel formats.
    Convert(ConvertArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Decode(args) => decode::run(args, format),
        Command::Convert(args) => convert::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind the legacy socket on.
    #[arg(default_value = "127.0.0.1:7474")]
    pub addr: String,
    /// Pixel format carried by incoming matrix payloads.
    #[arg(long, default_value = "grgb")]
    pub source_format: PixelFormat,
    /// Pixel format delivered to the sink.
    #[arg(long, default_value = "rgba32")]
    pub target_format: PixelFormat,
    /// Frame-rate ceiling per connection (0 disables).
    #[arg(long, default_value_t = 25.0)]
    pub fps: f64,
    /// Maximum accepted payload size in bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_payload: Option<usize>,
    /// Write each delivered frame to this directory as a raw file.
    #[arg(long, value_name = "DIR")]
    pub dump_dir: Option<PathBuf>,
    /// Re-base echoed capture timestamps to wall-clock milliseconds.
    #[arg(long)]
    pub rebase_client_time: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Capture file of raw matrix-frame bytes.
    pub file: PathBuf,
    /// Stop after N packets.
    #[arg(long)]
    pub count: Option<usize>,
    /// Maximum accepted payload size in bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_payload: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input frame file (raw pixel data).
    pub input: PathBuf,
    /// Output frame file.
    pub output: PathBuf,
    /// Frame width in the input format's units.
    #[arg(long)]
    pub width: u32,
    /// Frame height in rows.
    #[arg(long)]
    pub height: u32,
    /// Input pixel format.
    #[arg(long)]
    pub from: PixelFormat,
    /// Output pixel format.
    #[arg(long)]
    pub to: PixelFormat,
    /// Clockwise rotation in degrees (0, 90, 180, 270).
    #[arg(long, default_value_t = 0)]
    pub rotate: u32,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
