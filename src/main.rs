use pdv_monitor::controller::WindowController;
use pdv_monitor::display::DisplayEngine;
use pdv_monitor::gui::OverlayApp;
use pdv_monitor::hook::{self, RdevBackend};
use pdv_monitor::relay::{self, RelayConfig};
use pdv_monitor::settings::{Settings, WindowId};
use pdv_monitor::{logging, monitor};

use anyhow::Context;
use eframe::egui;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

fn main() -> anyhow::Result<()> {
    let settings = Settings::load("settings.json")?;
    logging::init(settings.debug_logging);

    // Everything fatal happens before the first window exists: display
    // enumeration and the relay bind.
    let monitor = monitor::select(settings.monitor)?;
    tracing::info!(?monitor, "overlay display selected");

    let relay_config = RelayConfig::from_settings(&settings);
    let socket = relay::bind(&relay_config)?;
    let (message_tx, message_rx) = mpsc::channel();
    let relay = relay::spawn(socket, relay_config, message_tx);

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("installing interrupt handler")?;

    let (toggle_tx, toggle_rx) = mpsc::channel();
    let _listener = hook::spawn(Box::new(RdevBackend), toggle_tx);

    let log_dir = settings
        .log_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let engine = DisplayEngine::new(&log_dir, settings.alert_timeout());
    let controller = WindowController::new(monitor);
    let app = OverlayApp::new(
        engine,
        controller,
        message_rx,
        toggle_rx,
        Arc::clone(&shutdown),
        settings.blink_interval(),
    );

    // Pane A doubles as the root viewport; its geometry seeds the native
    // window and the other three panes spawn from the first frame.
    let pane_a = *app.pane(WindowId::A);
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("pdv pane a")
            .with_position(egui::pos2(pane_a.rect.x as f32, pane_a.rect.y as f32))
            .with_inner_size(egui::vec2(
                pane_a.rect.width as f32,
                pane_a.rect.height as f32,
            ))
            .with_decorations(false)
            .with_always_on_top()
            .with_transparent(true),
        ..Default::default()
    };

    let result = eframe::run_native(
        "pdv_monitor",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    );

    relay.stop();
    result.map_err(|err| anyhow::anyhow!("gui event loop failed: {err}"))
}
