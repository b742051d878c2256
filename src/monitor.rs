use anyhow::{bail, Context};
use screenshots::Screen;

/// Geometry of the display hosting the overlay, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl From<&Screen> for MonitorBounds {
    fn from(screen: &Screen) -> Self {
        let info = screen.display_info;
        Self {
            x: info.x,
            y: info.y,
            width: info.width,
            height: info.height,
        }
    }
}

/// Pick the display the overlay should cover: 1 = primary, anything else =
/// secondary. With a single display both selectors resolve to it. Finding
/// no display at all is fatal.
pub fn select(selector: u8) -> anyhow::Result<MonitorBounds> {
    let screens = Screen::all().context("enumerating displays")?;
    if screens.is_empty() {
        bail!("no display connected");
    }

    let primary = screens
        .iter()
        .find(|screen| screen.display_info.is_primary)
        .unwrap_or(&screens[0]);
    let secondary = screens
        .iter()
        .find(|screen| screen.display_info.id != primary.display_info.id)
        .unwrap_or(primary);

    let chosen = if selector == 1 { primary } else { secondary };
    Ok(MonitorBounds::from(chosen))
}
