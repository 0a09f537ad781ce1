use std::fmt;
use std::io;

use matrixbridge_pipeline::PipelineError;
use matrixbridge_pixel::PixelError;
use matrixbridge_wire::WireError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn wire_error(context: &str, err: WireError) -> CliError {
    match err {
        WireError::Io(source) => io_error(context, source),
        WireError::OversizedHeader { .. }
        | WireError::OversizedPayload { .. }
        | WireError::MalformedTimingRecord => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        WireError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn pixel_error(context: &str, err: PixelError) -> CliError {
    match err {
        PixelError::UnsupportedConversion { .. } | PixelError::UnsupportedRotation { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        PixelError::OddDimensions { .. } | PixelError::LengthMismatch { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn pipeline_error(context: &str, err: PipelineError) -> CliError {
    match err {
        PipelineError::Wire(err) => wire_error(context, err),
        PipelineError::Pixel(err) => pixel_error(context, err),
        PipelineError::MalformedMessage(err) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        PipelineError::Closed => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_faults_map_to_exit_codes() {
        let err = pipeline_error(
            "pipeline fault",
            PipelineError::Wire(WireError::OversizedPayload { size: 99, max: 1 }),
        );
        assert_eq!(err.code, DATA_INVALID);

        let err = pipeline_error(
            "pipeline fault",
            PipelineError::Wire(WireError::ConnectionClosed),
        );
        assert_eq!(err.code, FAILURE);

        let err = pipeline_error("pipeline fault", PipelineError::Closed);
        assert_eq!(err.code, INTERNAL);
    }

    #[test]
    fn conversion_faults_distinguish_usage_from_data() {
        use matrixbridge_pixel::PixelFormat;

        let err = pixel_error(
            "conversion failed",
            PixelError::UnsupportedConversion {
                from: PixelFormat::Rgb24,
                to: PixelFormat::I420,
            },
        );
        assert_eq!(err.code, USAGE);

        let err = pixel_error(
            "input rejected",
            PixelError::OddDimensions {
                format: PixelFormat::Uyvy,
                width: 3,
                height: 2,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
    }
}
