//! Per-frame output handed to the renderer.

use std::io::Write;

use orrery_camera::{CameraPose, ModeKind};
use orrery_sim::BodySnapshot;
use serde::Serialize;
use tracing::info;

use crate::AppError;

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub index: u64,
    /// Simulated seconds since start.
    pub simulated_time: f64,
    pub paused: bool,
    pub bodies: Vec<BodySnapshot>,
    /// Current rotation of the asteroid belt, if there is one.
    pub belt_rotation: Option<f64>,
    pub camera: CameraPose,
    pub camera_mode: ModeKind,
}

/// Render collaborator: receives one [`Frame`] per tick.
pub trait FrameSink {
    fn present(&mut self, frame: &Frame);
}

/// Logs a one-line frame summary every `every` frames.
#[derive(Debug, Clone)]
pub struct LogSink {
    every: u64,
}

impl LogSink {
    /// `every == 0` disables output.
    pub fn new(every: u32) -> Self {
        Self {
            every: u64::from(every),
        }
    }
}

impl FrameSink for LogSink {
    fn present(&mut self, frame: &Frame) {
        if self.every == 0 || frame.index % self.every != 0 {
            return;
        }
        let eye = frame.camera.position;
        info!(
            "frame {} t={:.2}s mode={} eye=({:.1}, {:.1}, {:.1}) bodies={}",
            frame.index,
            frame.simulated_time,
            frame.camera_mode,
            eye.x,
            eye.y,
            eye.z,
            frame.bodies.len()
        );
    }
}

/// Writes each frame as one JSON line.
///
/// `present` cannot fail, so the first write error is kept and returned by
/// [`finish`](Self::finish); later frames are dropped.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    error: Option<AppError>,
    written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
            written: 0,
        }
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<(), AppError> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and hand back the writer, or the first error seen.
    pub fn finish(mut self) -> Result<W, AppError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn present(&mut self, frame: &Frame) {
        if self.error.is_some() {
            return;
        }
        match self.write_frame(frame) {
            Ok(()) => self.written += 1,
            Err(err) => {
                tracing::error!(%err, "Frame dump failed; further frames dropped");
                self.error = Some(err);
            }
        }
    }
}

/// Fans one frame out to several sinks.
impl<A: FrameSink, B: FrameSink> FrameSink for (A, B) {
    fn present(&mut self, frame: &Frame) {
        self.0.present(frame);
        self.1.present(frame);
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn present(&mut self, frame: &Frame) {
        (**self).present(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn frame(index: u64) -> Frame {
        Frame {
            index,
            simulated_time: 1.5,
            paused: false,
            bodies: Vec::new(),
            belt_rotation: None,
            camera: CameraPose {
                position: DVec3::new(1.0, 2.0, 3.0),
                look_at: DVec3::ZERO,
            },
            camera_mode: ModeKind::Overview,
        }
    }

    #[test]
    fn test_json_sink_writes_one_line_per_frame() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.present(&frame(0));
        sink.present(&frame(1));
        assert_eq!(sink.written(), 2);
        let out = String::from_utf8(sink.finish().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(value["index"], 1);
        assert_eq!(value["camera_mode"], "Overview");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_sink_keeps_first_error() {
        let mut sink = JsonLinesSink::new(FailingWriter);
        sink.present(&frame(0));
        sink.present(&frame(1));
        assert_eq!(sink.written(), 0);
        assert!(sink.finish().is_err());
    }

    #[derive(Default)]
    struct Counter(u32);

    impl FrameSink for Counter {
        fn present(&mut self, _: &Frame) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_pair_sink_fans_out() {
        let mut pair = (Counter::default(), Counter::default());
        pair.present(&frame(3));
        assert_eq!((pair.0.0, pair.1.0), (1, 1));
    }
}
