use matrixbridge_pipeline::DEFAULT_MAX_FRAME_RATE;
use matrixbridge_pixel::PixelFormat;
use matrixbridge_wire::{HEADER_BODY_SIZE, TIMING_RECORD_SIZE};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("matrixbridge {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    for line in extended_lines() {
        println!("{line}");
    }
    Ok(SUCCESS)
}

fn extended_lines() -> Vec<String> {
    let formats = [
        PixelFormat::Grgb,
        PixelFormat::Rgb24,
        PixelFormat::Rgba32,
        PixelFormat::Uyvy,
        PixelFormat::Ayuv,
        PixelFormat::I420,
    ]
    .map(|format| format.name())
    .join(", ");

    vec![
        "name: matrixbridge".to_string(),
        format!("version: {}", env!("CARGO_PKG_VERSION")),
        format!("target_os: {}", std::env::consts::OS),
        format!("target_arch: {}", std::env::consts::ARCH),
        format!("frame header: {HEADER_BODY_SIZE} bytes"),
        format!("timing record: {TIMING_RECORD_SIZE} bytes"),
        format!("pixel formats: {formats}"),
        format!("default fps ceiling: {DEFAULT_MAX_FRAME_RATE}"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_output_describes_the_bridge() {
        let lines = extended_lines();
        assert!(lines.contains(&"frame header: 288 bytes".to_string()));
        assert!(lines.contains(&"timing record: 28 bytes".to_string()));
        assert!(lines.iter().any(|line| line.contains("uyvy")));
        assert!(!lines.iter().any(|line| line.contains("unknown")));
    }
}
