use std::io::{ErrorKind, Read};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use matrixbridge_pipeline::{FrameSink, Pipeline, PipelineConfig};
use matrixbridge_pixel::PixelBuffer;
use tracing::{debug, info, warn};

use crate::cmd::ServeArgs;
use crate::exit::{io_error, pipeline_error, CliError, CliResult, SUCCESS};

const READ_CHUNK_SIZE: usize = 16 * 1024;
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let listener = TcpListener::bind(&args.addr).map_err(|err| io_error("bind failed", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| io_error("listener setup failed", err))?;

    let mut config = PipelineConfig::default()
        .with_formats(args.source_format, args.target_format)
        .with_max_frame_rate(args.fps)
        .with_rebase_client_time(args.rebase_client_time);
    if let Some(bytes) = args.max_payload {
        config = config.with_max_payload_size(bytes);
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    info!(addr = %args.addr, "matrix socket listening");

    let mut workers = Vec::new();
    let mut conn_id = 0u64;
    while running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer)) => {
                info!(%peer, conn_id, "connection accepted");
                let config = config.clone();
                let dump_dir = args.dump_dir.clone();
                let running = running.clone();
                let id = conn_id;
                conn_id += 1;
                workers.push(thread::spawn(move || {
                    if let Err(err) = serve_connection(stream, config, dump_dir, id, running) {
                        warn!(conn_id = id, code = err.code, "connection failed: {err}");
                    }
                }));
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(err) => return Err(io_error("accept failed", err)),
        }
    }

    info!("shutting down");
    for worker in workers {
        let _ = worker.join();
    }
    Ok(SUCCESS)
}

/// Drive one connection's pipeline until the peer hangs up or the
/// server stops. The ack stream shares the socket with the inbound
/// frames.
fn serve_connection(
    stream: TcpStream,
    config: PipelineConfig,
    dump_dir: Option<PathBuf>,
    conn_id: u64,
    running: Arc<AtomicBool>,
) -> CliResult<()> {
    let write_half = stream
        .try_clone()
        .map_err(|err| io_error("could not split connection", err))?;
    stream
        .set_read_timeout(Some(ACCEPT_POLL_INTERVAL))
        .map_err(|err| io_error("could not set read timeout", err))?;

    let mut pipeline = Pipeline::with_config(write_half, DumpSink { dump_dir, conn_id }, config);
    let mut stream = stream;
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];

    while running.load(Ordering::SeqCst) {
        let n = match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err)
                if err.kind() == ErrorKind::WouldBlock || err.kind() == ErrorKind::TimedOut =>
            {
                continue;
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                let _ = pipeline.close();
                return Err(io_error("read failed", err));
            }
        };

        if let Err(err) = pipeline.feed(&chunk[..n]) {
            let _ = pipeline.close();
            return Err(pipeline_error("pipeline fault", err));
        }
    }

    if let Err(err) = pipeline.close() {
        debug!(conn_id, %err, "close flush failed");
    }
    info!(
        conn_id,
        frames = pipeline.frames_delivered(),
        "connection finished"
    );
    Ok(())
}

/// Writes delivered frames to disk when a dump directory is configured;
/// otherwise just counts them.
struct DumpSink {
    dump_dir: Option<PathBuf>,
    conn_id: u64,
}

impl FrameSink for DumpSink {
    fn on_frame(&mut self, seq: u64, frame: PixelBuffer) {
        debug!(
            conn_id = self.conn_id,
            seq,
            width = frame.width(),
            height = frame.height(),
            format = %frame.format(),
            "frame delivered"
        );
        let Some(dir) = &self.dump_dir else {
            return;
        };
        let path = dir.join(format!(
            "conn{}-frame{seq:06}.{}",
            self.conn_id,
            frame.format()
        ));
        if let Err(err) = std::fs::write(&path, frame.data()) {
            warn!(path = %path.display(), %err, "frame dump failed");
        }
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
