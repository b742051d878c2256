use crate::monitor::MonitorBounds;
use std::time::{Duration, Instant};

/// Two left presses within this interval count as a double-click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

/// Screen quadrant of the active monitor, numbered as the operators know
/// them: 1 top-left, 2 top-right, 3 bottom-left, 4 bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub fn number(self) -> u8 {
        match self {
            Quadrant::TopLeft => 1,
            Quadrant::TopRight => 2,
            Quadrant::BottomLeft => 3,
            Quadrant::BottomRight => 4,
        }
    }
}

/// Classify a screen position against the monitor's midlines.
pub fn quadrant_at(x: f64, y: f64, monitor: &MonitorBounds) -> Quadrant {
    let local_x = x - monitor.x as f64;
    let local_y = y - monitor.y as f64;
    let left = local_x < monitor.width as f64 / 2.0;
    let top = local_y < monitor.height as f64 / 2.0;
    match (left, top) {
        (true, true) => Quadrant::TopLeft,
        (false, true) => Quadrant::TopRight,
        (true, false) => Quadrant::BottomLeft,
        (false, false) => Quadrant::BottomRight,
    }
}

/// Left-button double-click recognition. Recognition consumes the baseline,
/// so a third rapid press starts a fresh cycle instead of re-triggering.
#[derive(Debug, Default)]
pub struct DoubleClickDetector {
    last_press: Option<(Instant, (f64, f64))>,
}

impl DoubleClickDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one left-button press. Returns the press position when it
    /// completes a double-click.
    pub fn on_left_press(&mut self, x: f64, y: f64, now: Instant) -> Option<(f64, f64)> {
        match self.last_press.take() {
            Some((at, _)) if now.duration_since(at) <= DOUBLE_CLICK_WINDOW => Some((x, y)),
            _ => {
                self.last_press = Some((now, (x, y)));
                None
            }
        }
    }
}
