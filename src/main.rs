#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Dataset records, sources and aggregation
mod data;

// Application constants
mod constants;

// Error handling
mod error;

// Dashboard configuration file
mod config;

// Linear/time scales and the geographic projection
mod scale;

// Filter state, controls and the application state container
mod state;

// Brush machines and the category toggle
mod interaction;

// View models and the render dispatcher
mod views;

// Background dataset loader
mod worker;

mod app;
mod ui;

#[cfg(test)]
mod fixtures;

use app::CrimeScope;
use config::DashboardConfig;

#[cfg(feature = "profile-with-puffin")]
fn start_puffin_server() {
    puffin::set_scopes_on(true);
    match puffin_http::Server::new("127.0.0.1:8585") {
        Ok(server) => {
            log::info!("Puffin server listening on 127.0.0.1:8585");
            // Keep serving for the lifetime of the process
            std::mem::forget(server);
        }
        Err(e) => log::warn!("Could not start puffin server: {}", e),
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    #[cfg(feature = "profile-with-puffin")]
    start_puffin_server();

    let config = DashboardConfig::discover();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "CrimeScope - Linked Incident Explorer",
        options,
        Box::new(|_| Ok(Box::new(CrimeScope::new(config)))),
    )
}
