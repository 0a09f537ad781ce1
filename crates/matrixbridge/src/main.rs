mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "matrixbridge", version, about = "Matrix-video bridge CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_subcommand() {
        let cli = Cli::try_parse_from([
            "matrixbridge",
            "serve",
            "0.0.0.0:7474",
            "--source-format",
            "uyvy",
            "--target-format",
            "i420",
            "--fps",
            "30",
        ])
        .expect("serve args should parse");

        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.addr, "0.0.0.0:7474");
        assert_eq!(args.fps, 30.0);
    }

    #[test]
    fn parses_decode_with_count() {
        let cli = Cli::try_parse_from([
            "matrixbridge",
            "--format",
            "json",
            "decode",
            "/tmp/capture.bin",
            "--count",
            "5",
        ])
        .expect("decode args should parse");
        assert!(matches!(cli.command, Command::Decode(_)));
    }

    #[test]
    fn rejects_unknown_pixel_format() {
        let err = Cli::try_parse_from([
            "matrixbridge",
            "convert",
            "in.raw",
            "out.raw",
            "--width",
            "4",
            "--height",
            "4",
            "--from",
            "bgr",
            "--to",
            "rgb24",
        ])
        .expect_err("unknown format should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_convert_with_rotation() {
        let cli = Cli::try_parse_from([
            "matrixbridge",
            "convert",
            "in.raw",
            "out.raw",
            "--width",
            "8",
            "--height",
            "6",
            "--from",
            "i420",
            "--to",
            "uyvy",
            "--rotate",
            "90",
        ])
        .expect("convert args should parse");

        let Command::Convert(args) = cli.command else {
            panic!("expected convert command");
        };
        assert_eq!(args.rotate, 90);
    }
}
