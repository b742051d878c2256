use crate::gesture::DoubleClickDetector;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// A recognized double-click, in screen coordinates, asking the GUI thread
/// to toggle the pane layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToggleRequest {
    pub x: f64,
    pub y: f64,
}

/// Raw events a listener backend produces. Button presses carry no position
/// on any platform hook, so the cursor is tracked from move events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseEvent {
    Moved { x: f64, y: f64 },
    LeftPress,
}

pub trait MouseBackend: Send + 'static {
    /// Run the platform listener, pushing events through `deliver`. Expected
    /// to block for the life of the process.
    fn listen(self: Box<Self>, deliver: Box<dyn FnMut(MouseEvent) + Send>);
}

/// Global hook via rdev.
#[derive(Debug, Default)]
pub struct RdevBackend;

impl MouseBackend for RdevBackend {
    fn listen(self: Box<Self>, mut deliver: Box<dyn FnMut(MouseEvent) + Send>) {
        let result = rdev::listen(move |event| match event.event_type {
            rdev::EventType::MouseMove { x, y } => deliver(MouseEvent::Moved { x, y }),
            rdev::EventType::ButtonPress(rdev::Button::Left) => deliver(MouseEvent::LeftPress),
            _ => {}
        });
        if let Err(err) = result {
            tracing::error!(?err, "mouse listener stopped");
        }
    }
}

/// Replays a fixed script instead of hooking the platform. Test use.
#[derive(Debug)]
pub struct MockMouseBackend {
    pub events: Vec<MouseEvent>,
}

impl MouseBackend for MockMouseBackend {
    fn listen(self: Box<Self>, mut deliver: Box<dyn FnMut(MouseEvent) + Send>) {
        for event in self.events {
            deliver(event);
        }
    }
}

/// Feeds backend events through the double-click detector; recognized
/// double-clicks cross to the GUI thread over `requests`. Never touches
/// window state directly.
#[derive(Debug)]
pub struct GestureFeed {
    detector: DoubleClickDetector,
    cursor: (f64, f64),
    requests: Sender<ToggleRequest>,
}

impl GestureFeed {
    pub fn new(requests: Sender<ToggleRequest>) -> Self {
        Self {
            detector: DoubleClickDetector::new(),
            cursor: (0.0, 0.0),
            requests,
        }
    }

    pub fn push(&mut self, event: MouseEvent, now: Instant) {
        match event {
            MouseEvent::Moved { x, y } => self.cursor = (x, y),
            MouseEvent::LeftPress => {
                let (x, y) = self.cursor;
                if let Some((click_x, click_y)) = self.detector.on_left_press(x, y, now) {
                    tracing::debug!(x = click_x, y = click_y, "double-click recognized");
                    let _ = self.requests.send(ToggleRequest {
                        x: click_x,
                        y: click_y,
                    });
                }
            }
        }
    }
}

/// Run the listener on a background thread for the life of the process.
pub fn spawn(backend: Box<dyn MouseBackend>, requests: Sender<ToggleRequest>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut feed = GestureFeed::new(requests);
        backend.listen(Box::new(move |event| feed.push(event, Instant::now())));
    })
}
