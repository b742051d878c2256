use crate::controller::{PaneLayout, WindowController};
use crate::display::DisplayEngine;
use crate::hook::ToggleRequest;
use crate::relay::InboundMessage;
use crate::settings::WindowId;
use eframe::egui;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cadence of the queue drain and watch tick.
const DRAIN_INTERVAL: Duration = Duration::from_millis(100);

/// Pane background alpha (the overlay stays slightly see-through).
const PANE_ALPHA: u8 = 230;

const ALERT_BACKGROUND: egui::Color32 = egui::Color32::YELLOW;

static SURFACES_CLAIMED: AtomicBool = AtomicBool::new(false);

/// Owns all four pane surfaces: pane A is the root viewport, panes B-D are
/// immediate viewports re-declared every frame, so every window mutation
/// happens on the one GUI thread.
pub struct OverlayApp {
    engine: DisplayEngine,
    controller: WindowController,
    layout: [PaneLayout; 4],
    messages: Receiver<InboundMessage>,
    toggles: Receiver<ToggleRequest>,
    shutdown: Arc<AtomicBool>,
    blink_interval: Duration,
    started: Instant,
    layout_dirty: bool,
}

impl OverlayApp {
    /// Panics if called twice: a second owner of the pane surfaces is a
    /// wiring bug, not a runtime condition.
    pub fn new(
        engine: DisplayEngine,
        controller: WindowController,
        messages: Receiver<InboundMessage>,
        toggles: Receiver<ToggleRequest>,
        shutdown: Arc<AtomicBool>,
        blink_interval: Duration,
    ) -> Self {
        assert!(
            !SURFACES_CLAIMED.swap(true, Ordering::SeqCst),
            "overlay surfaces constructed twice"
        );
        let layout = controller.tiled();
        Self {
            engine,
            controller,
            layout,
            messages,
            toggles,
            shutdown,
            blink_interval,
            started: Instant::now(),
            layout_dirty: false,
        }
    }

    pub fn pane(&self, id: WindowId) -> &PaneLayout {
        &self.layout[id.index()]
    }

    fn drain(&mut self, now: Instant) {
        while let Ok(message) = self.messages.try_recv() {
            self.engine.handle(message.window, &message.text, now);
        }
        self.engine.tick(now);
        while let Ok(request) = self.toggles.try_recv() {
            self.layout = self.controller.toggle((request.x, request.y));
            self.layout_dirty = true;
        }
    }

    fn apply_root_layout(&self, ctx: &egui::Context) {
        let pane = self.pane(WindowId::A);
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(pane.visible));
        if pane.visible {
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
                pane.rect.x as f32,
                pane.rect.y as f32,
            )));
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                pane.rect.width as f32,
                pane.rect.height as f32,
            )));
        }
    }

    fn pane_colors(&self, alert: bool) -> (egui::Color32, egui::Color32) {
        if alert && blink_phase_on(self.started.elapsed(), self.blink_interval) {
            (ALERT_BACKGROUND, egui::Color32::BLACK)
        } else {
            (
                egui::Color32::from_rgba_unmultiplied(0, 0, 0, PANE_ALPHA),
                egui::Color32::WHITE,
            )
        }
    }

    fn draw_pane(&self, ctx: &egui::Context, id: WindowId) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.shutdown.store(true, Ordering::SeqCst);
        }

        let pane = self.pane(id);
        let state = self.engine.window(id);
        let (background, foreground) = self.pane_colors(state.alert_active());

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(background))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                            ui.label(
                                egui::RichText::new(state.text())
                                    .color(foreground)
                                    .size(pane.font_size),
                            );
                        });
                    });
            });
    }
}

impl eframe::App for OverlayApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.shutdown.load(Ordering::SeqCst) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        self.drain(Instant::now());

        if self.layout_dirty {
            self.apply_root_layout(ctx);
            self.layout_dirty = false;
        }

        self.draw_pane(ctx, WindowId::A);

        for id in [WindowId::B, WindowId::C, WindowId::D] {
            let pane = *self.pane(id);
            if !pane.visible {
                continue;
            }
            ctx.show_viewport_immediate(viewport_id(id), pane_builder(&pane), |ctx, _class| {
                self.draw_pane(ctx, id);
            });
        }

        ctx.request_repaint_after(DRAIN_INTERVAL);
    }
}

pub fn viewport_id(id: WindowId) -> egui::ViewportId {
    egui::ViewportId::from_hash_of(("pane", id.label()))
}

/// Builder for one secondary pane; egui diffs this against the previous
/// frame and applies geometry changes itself.
pub fn pane_builder(pane: &PaneLayout) -> egui::ViewportBuilder {
    egui::ViewportBuilder::default()
        .with_title(format!("pdv pane {}", pane.window.label()))
        .with_position(egui::pos2(pane.rect.x as f32, pane.rect.y as f32))
        .with_inner_size(egui::vec2(pane.rect.width as f32, pane.rect.height as f32))
        .with_decorations(false)
        .with_always_on_top()
        .with_transparent(true)
}

/// Which half of the blink cycle we are in; the alert colors show on the
/// "on" phase.
fn blink_phase_on(elapsed: Duration, interval: Duration) -> bool {
    if interval.is_zero() {
        return true;
    }
    (elapsed.as_millis() / interval.as_millis()) % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blink_alternates_per_interval() {
        let interval = Duration::from_millis(1000);
        assert!(blink_phase_on(Duration::from_millis(0), interval));
        assert!(blink_phase_on(Duration::from_millis(999), interval));
        assert!(!blink_phase_on(Duration::from_millis(1000), interval));
        assert!(blink_phase_on(Duration::from_millis(2000), interval));
    }

    #[test]
    fn zero_interval_stays_on() {
        assert!(blink_phase_on(Duration::from_secs(5), Duration::ZERO));
    }
}
