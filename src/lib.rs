pub mod controller;
pub mod display;
pub mod gesture;
pub mod gui;
pub mod hook;
pub mod logging;
pub mod monitor;
pub mod relay;
pub mod settings;
