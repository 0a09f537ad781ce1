use matrixbridge_pixel::{convert, PixelBuffer, Rotation};
use serde::Serialize;

use crate::cmd::ConvertArgs;
use crate::exit::{io_error, pixel_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct ConvertOutput {
    input_format: String,
    output_format: String,
    width: u32,
    height: u32,
    rotation: u32,
    bytes_written: usize,
}

pub fn run(args: ConvertArgs, format: OutputFormat) -> CliResult<i32> {
    let rotation = Rotation::from_degrees(args.rotate).ok_or_else(|| {
        CliError::new(
            USAGE,
            format!("rotation must be a multiple of 90 degrees, got {}", args.rotate),
        )
    })?;

    let data = std::fs::read(&args.input).map_err(|err| io_error("read failed", err))?;
    let source = PixelBuffer::new(args.width, args.height, args.from, data)
        .map_err(|err| pixel_error("input rejected", err))?;
    let result =
        convert(&source, args.to, rotation).map_err(|err| pixel_error("conversion failed", err))?;

    std::fs::write(&args.output, result.data()).map_err(|err| io_error("write failed", err))?;

    let out = ConvertOutput {
        input_format: args.from.to_string(),
        output_format: result.format().to_string(),
        width: result.width(),
        height: result.height(),
        rotation: rotation.degrees(),
        bytes_written: result.data().len(),
    };
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Raw => {}
        _ => println!(
            "{} {}x{} -> {} {}x{} ({} bytes, rotated {})",
            out.input_format,
            args.width,
            args.height,
            out.output_format,
            out.width,
            out.height,
            out.bytes_written,
            out.rotation
        ),
    }

    Ok(SUCCESS)
}
