use crate::gesture::{quadrant_at, Quadrant};
use crate::monitor::MonitorBounds;
use crate::settings::WindowId;

/// Extra width granted to the surviving pane when the overlay collapses to
/// a single strip.
const EXPAND_EXTRA_WIDTH: u32 = 230;

const TILED_FONT_SIZE: f32 = 8.0;
const EXPANDED_FONT_SIZE: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Where one pane should sit and whether it should be shown at all. The GUI
/// applies these verbatim; nothing here touches a window handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneLayout {
    pub window: WindowId,
    pub visible: bool,
    pub rect: PaneRect,
    pub font_size: f32,
}

/// The pane each quadrant keeps visible. Column-major on purpose: the left
/// screen column holds panes A/B, the right column C/D.
pub fn pane_for(quadrant: Quadrant) -> WindowId {
    match quadrant {
        Quadrant::TopLeft => WindowId::A,
        Quadrant::BottomLeft => WindowId::B,
        Quadrant::TopRight => WindowId::C,
        Quadrant::BottomRight => WindowId::D,
    }
}

/// Plans pane visibility and geometry in response to toggle gestures.
/// Explicitly constructed once and handed to the GUI; holds no window
/// handles of its own.
#[derive(Debug)]
pub struct WindowController {
    monitor: MonitorBounds,
    hidden: bool,
    saved_quadrant: Option<Quadrant>,
}

impl WindowController {
    pub fn new(monitor: MonitorBounds) -> Self {
        Self {
            monitor,
            hidden: false,
            saved_quadrant: None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn saved_quadrant(&self) -> Option<Quadrant> {
        self.saved_quadrant
    }

    /// Handle a double-click at `click` (screen coordinates). Collapses the
    /// tiled layout to the clicked quadrant's pane, or restores the full
    /// layout if already collapsed. The restore branch ignores where the
    /// click landed, so two toggles always round-trip.
    pub fn toggle(&mut self, click: (f64, f64)) -> [PaneLayout; 4] {
        let quadrant = match self.saved_quadrant {
            // While collapsed, keep showing the pane that survived.
            Some(saved) if self.hidden => saved,
            _ => quadrant_at(click.0, click.1, &self.monitor),
        };
        if self.hidden {
            self.hidden = false;
            self.saved_quadrant = None;
            self.tiled()
        } else {
            self.hidden = true;
            self.saved_quadrant = Some(quadrant);
            self.collapsed(quadrant)
        }
    }

    /// The quarter-screen layout: each pane a fifth of the monitor wide and
    /// half of it tall, stacked in two columns.
    pub fn tiled(&self) -> [PaneLayout; 4] {
        let (width, height) = self.pane_size();
        self.positions().map(|(window, x, y)| PaneLayout {
            window,
            visible: true,
            rect: PaneRect {
                x,
                y,
                width,
                height,
            },
            font_size: TILED_FONT_SIZE,
        })
    }

    fn collapsed(&self, quadrant: Quadrant) -> [PaneLayout; 4] {
        let survivor = pane_for(quadrant);
        let (width, _) = self.pane_size();
        let mut layout = self.tiled();
        for pane in &mut layout {
            if pane.window == survivor {
                // The survivor moves to pane A's slot, widened and grown to
                // the full monitor height.
                pane.rect = PaneRect {
                    x: self.monitor.x,
                    y: self.monitor.y,
                    width: width + EXPAND_EXTRA_WIDTH,
                    height: self.monitor.height,
                };
                pane.font_size = EXPANDED_FONT_SIZE;
            } else {
                pane.visible = false;
            }
        }
        layout
    }

    fn pane_size(&self) -> (u32, u32) {
        (self.monitor.width / 5, self.monitor.height / 2)
    }

    fn positions(&self) -> [(WindowId, i32, i32); 4] {
        let (_, height) = self.pane_size();
        let left = self.monitor.x;
        let right = self.monitor.x + (self.monitor.width / 2) as i32;
        let top = self.monitor.y;
        let bottom = self.monitor.y + height as i32;
        [
            (WindowId::A, left, top),
            (WindowId::B, left, bottom),
            (WindowId::C, right, top),
            (WindowId::D, right, bottom),
        ]
    }
}
