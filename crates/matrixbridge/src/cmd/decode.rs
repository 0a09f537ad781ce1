use matrixbridge_wire::{MatrixDecoder, WireConfig};
use tracing::info;

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, wire_error, CliResult, SUCCESS};
use crate::output::{print_packet, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = std::fs::read(&args.file).map_err(|err| io_error("read failed", err))?;

    let mut config = WireConfig::default();
    if let Some(max) = args.max_payload {
        config.max_payload_size = max;
    }

    let mut decoder = MatrixDecoder::with_config(config);
    decoder
        .feed(&bytes)
        .map_err(|err| wire_error("decode failed", err))?;

    let mut index = 0usize;
    loop {
        let packet = decoder
            .try_next()
            .map_err(|err| wire_error("decode failed", err))?;
        let Some(packet) = packet else {
            break;
        };

        print_packet(index, &packet, format);
        index += 1;

        if args.count.is_some_and(|count| index >= count) {
            break;
        }
    }

    info!(
        packets = index,
        trailing_bytes = decoder.buffered(),
        "capture decoded"
    );
    Ok(SUCCESS)
}
