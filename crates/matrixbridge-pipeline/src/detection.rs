//! Detection side channel.
//!
//! The peer transport carries inference results back over a data
//! channel as JSON. The pipeline does not interpret them; it routes
//! well-formed reports to an injected [`DetectionOutlet`] and ignores
//! message types it does not know.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// One detected object in normalized frame coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    /// `[x, y, width, height]`, each in `0.0..=1.0`.
    #[serde(rename = "box")]
    pub bounds: [f32; 4],
}

/// A batch of detections for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_seq: Option<u64>,
    pub detections: Vec<Detection>,
}

/// Receiver for routed detection reports.
pub trait DetectionOutlet {
    fn on_detections(&mut self, report: DetectionReport);
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutlet;

impl DetectionOutlet for NullOutlet {
    fn on_detections(&mut self, _report: DetectionReport) {}
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ChannelMessage {
    Detections(DetectionReport),
    #[serde(other)]
    Unknown,
}

/// Route one data-channel message to the outlet.
///
/// Messages that are not valid JSON fail with
/// [`PipelineError::MalformedMessage`](crate::PipelineError::MalformedMessage);
/// valid JSON with an unrecognized `type` is logged and dropped.
pub fn route_data_channel_message(text: &str, outlet: &mut dyn DetectionOutlet) -> Result<()> {
    match serde_json::from_str::<ChannelMessage>(text)? {
        ChannelMessage::Detections(report) => outlet.on_detections(report),
        ChannelMessage::Unknown => debug!("ignoring unrecognized data channel message"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    #[derive(Default)]
    struct Capture {
        reports: Vec<DetectionReport>,
    }

    impl DetectionOutlet for Capture {
        fn on_detections(&mut self, report: DetectionReport) {
            self.reports.push(report);
        }
    }

    #[test]
    fn detections_message_reaches_outlet() {
        let text = r#"{
            "type": "detections",
            "frame_seq": 41,
            "detections": [
                {"label": "person", "confidence": 0.92, "box": [0.1, 0.2, 0.3, 0.4]}
            ]
        }"#;

        let mut outlet = Capture::default();
        route_data_channel_message(text, &mut outlet).unwrap();

        assert_eq!(outlet.reports.len(), 1);
        let report = &outlet.reports[0];
        assert_eq!(report.frame_seq, Some(41));
        assert_eq!(report.detections[0].label, "person");
        assert_eq!(report.detections[0].bounds, [0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn unknown_message_type_is_ignored() {
        let mut outlet = Capture::default();
        route_data_channel_message(r#"{"type": "stats", "fps": 30}"#, &mut outlet).unwrap();
        assert!(outlet.reports.is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut outlet = NullOutlet;
        let err = route_data_channel_message("not json", &mut outlet).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedMessage(_)));
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = DetectionReport {
            frame_seq: None,
            detections: vec![Detection {
                label: "cat".into(),
                confidence: 0.5,
                bounds: [0.0, 0.0, 1.0, 1.0],
            }],
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("frame_seq"));
        let back: DetectionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
