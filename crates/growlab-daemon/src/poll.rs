//! The poll/render loop.
//!
//! One cycle pulls a reading from the sensor, probes disk usage, composes
//! a frame, and presents it. Cycles are independent: a failure in one is
//! logged and the next cycle starts fresh after the fixed interval.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use growlab_hw::{Framebuffer, OledDevice};
use tracing::warn;

use crate::screen::Screen;
use crate::sensors::disk::DiskProbe;
use crate::sensors::EnvSensor;

/// Destination for completed frames. A seam so tests can present into a
/// recording fake instead of a panel.
pub trait FrameSink {
    /// Submits one complete frame. The frame must become visible
    /// atomically: the surface shows either this frame or the previous
    /// one, never a partial draw.
    fn present(&mut self, frame: &Framebuffer) -> Result<()>;
}

impl FrameSink for OledDevice {
    fn present(&mut self, frame: &Framebuffer) -> Result<()> {
        self.redraw(frame)?;
        Ok(())
    }
}

/// The driving loop: sensor in, frames out, at a fixed cadence.
pub struct PollLoop<D: FrameSink, P: DiskProbe> {
    display: D,
    sensor: EnvSensor,
    probe: P,
    screen: Screen,
    disk_path: PathBuf,
    interval: Duration,
}

impl<D: FrameSink, P: DiskProbe> PollLoop<D, P> {
    pub fn new(
        display: D,
        sensor: EnvSensor,
        probe: P,
        screen: Screen,
        disk_path: PathBuf,
        interval: Duration,
    ) -> Self {
        Self {
            display,
            sensor,
            probe,
            screen,
            disk_path,
            interval,
        }
    }

    /// Runs one reading cycle: read, probe, render, present.
    ///
    /// A failing disk probe degrades to a placeholder line rather than
    /// failing the cycle; only a present failure is reported to the
    /// caller, and the loop treats that as non-fatal too.
    pub fn cycle(&mut self) -> Result<()> {
        let reading = self.sensor.read();
        let disk = match self.probe.usage(&self.disk_path) {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("disk usage probe failed for {:?}: {}", self.disk_path, e);
                None
            }
        };
        let frame = self.screen.render(&reading, disk.as_ref());
        self.display.present(frame)
    }

    /// Runs cycles forever at the fixed interval. Termination happens by
    /// dropping this future from a `select!` on a shutdown signal.
    pub async fn run(&mut self) {
        loop {
            if let Err(e) = self.cycle() {
                warn!("render cycle failed: {:#}", e);
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Gives back the display for release on shutdown.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::disk::DiskStats;
    use crate::sensors::SensorKind;
    use std::io;
    use std::path::Path;

    struct RecordingSink {
        frames: Vec<Framebuffer>,
    }

    impl FrameSink for RecordingSink {
        fn present(&mut self, frame: &Framebuffer) -> Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    struct FixedProbe(DiskStats);

    impl DiskProbe for FixedProbe {
        fn usage(&self, _path: &Path) -> io::Result<DiskStats> {
            Ok(self.0)
        }
    }

    struct FailingProbe;

    impl DiskProbe for FailingProbe {
        fn usage(&self, _path: &Path) -> io::Result<DiskStats> {
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"))
        }
    }

    fn poll_loop<P: DiskProbe>(probe: P) -> PollLoop<RecordingSink, P> {
        PollLoop::new(
            RecordingSink { frames: Vec::new() },
            EnvSensor::open(SensorKind::None, "auto").unwrap(),
            probe,
            Screen::new(),
            PathBuf::from("/"),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_cycle_presents_one_frame() {
        let mut poll = poll_loop(FixedProbe(DiskStats {
            used_bytes: 500000000,
            percent: 42.0,
        }));
        poll.cycle().unwrap();
        assert_eq!(poll.display_mut().frames.len(), 1);
        // The stub sensor still produces a visible frame (time + labels)
        assert!(poll.display_mut().frames[0].data().iter().any(|&b| b != 0));
    }

    #[test]
    fn test_cycle_survives_probe_failure() {
        let mut poll = poll_loop(FailingProbe);
        poll.cycle().unwrap();
        poll.cycle().unwrap();
        assert_eq!(poll.display_mut().frames.len(), 2);
    }
}
