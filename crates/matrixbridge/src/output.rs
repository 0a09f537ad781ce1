use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use matrixbridge_wire::{MatrixElement, MatrixPacket};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct PacketOutput {
    index: usize,
    planes: u32,
    element: &'static str,
    width: u32,
    height: u32,
    payload_size: usize,
    capture_time: f64,
}

pub fn print_packet(index: usize, packet: &MatrixPacket, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PacketOutput {
                index,
                planes: packet.header.plane_count,
                element: element_name(packet.header.element_type),
                width: packet.header.width(),
                height: packet.header.height(),
                payload_size: packet.payload.len(),
                capture_time: packet.header.capture_time,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "PLANES", "ELEMENT", "DIMS", "SIZE", "CAPTURED"])
                .add_row(vec![
                    index.to_string(),
                    packet.header.plane_count.to_string(),
                    element_name(packet.header.element_type).to_string(),
                    format!("{}x{}", packet.header.width(), packet.header.height()),
                    packet.payload.len().to_string(),
                    format!("{:.3}", packet.header.capture_time),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "packet={} planes={} element={} dims={}x{} size={} captured={:.3}",
                index,
                packet.header.plane_count,
                element_name(packet.header.element_type),
                packet.header.width(),
                packet.header.height(),
                packet.payload.len(),
                packet.header.capture_time
            );
        }
        OutputFormat::Raw => {
            print_raw(packet.payload.as_ref());
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn element_name(element: MatrixElement) -> &'static str {
    match element {
        MatrixElement::Char => "char",
        MatrixElement::Long => "long",
        MatrixElement::Float32 => "float32",
        MatrixElement::Float64 => "float64",
    }
}
