//! Shared test fixtures

use chrono::{TimeZone, Utc};
use eframe::egui::{self, Event, Modifiers, PointerButton, Pos2, RawInput, Rect, Vec2};

use crate::config::DashboardConfig;
use crate::data::{DatasetStore, Record};
use crate::state::AppState;

/// 100 records over 2024: 60 THEFT, 40 ASSAULT, 8 of them in June.
pub fn sample_records() -> Vec<Record> {
    let mut records = Vec::new();
    for i in 0..100u32 {
        let category = if i < 60 { "THEFT" } else { "ASSAULT" };
        let timestamp = if i % 12 == 5 && i < 96 {
            // 8 records: i = 5, 17, 29, 41, 53, 65, 77, 89
            Utc.with_ymd_and_hms(2024, 6, 1 + (i % 28), 12, 0, 0).unwrap()
        } else {
            let month = [1, 2, 3, 4, 5, 7, 8, 9, 10, 11, 12][(i % 11) as usize];
            Utc.with_ymd_and_hms(2024, month, 1 + (i % 28), 9, 0, 0).unwrap()
        };
        let lat = 41.6 + (i as f64) * 0.004;
        let lon = -87.9 + (i as f64) * 0.003;
        records.push(Record::new(category, timestamp, lat, lon).unwrap());
    }
    records
}

/// State with [`sample_records`] installed
pub fn loaded_state() -> AppState {
    let mut state = AppState::new(&DashboardConfig::default());
    state.install(DatasetStore::new(sample_records(), 0, "fixture"));
    state
}

/// Input frames for a primary-button press at `from`, one pointer move per
/// entry of `path`, then a release where the path ends.
pub fn pointer_gesture(from: Pos2, path: &[Pos2]) -> Vec<Vec<Event>> {
    let button = |pos, pressed| Event::PointerButton {
        pos,
        button: PointerButton::Primary,
        pressed,
        modifiers: Modifiers::NONE,
    };
    let end = path.last().copied().unwrap_or(from);

    let mut frames = vec![vec![Event::PointerMoved(from), button(from, true)]];
    frames.extend(path.iter().map(|p| vec![Event::PointerMoved(*p)]));
    frames.push(vec![button(end, false)]);
    frames
}

/// Run `frames` through `ctx` on an 800x600 screen, `add_contents` filling a
/// frameless central panel. Two idle frames go first so widgets exist before
/// the first press is hit-tested.
pub fn run_frames(ctx: &egui::Context, frames: Vec<Vec<Event>>, mut add_contents: impl FnMut(&mut egui::Ui)) {
    let screen = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
    let warm_up = vec![Vec::new(), Vec::new()];
    for events in warm_up.into_iter().chain(frames) {
        let input = RawInput {
            screen_rect: Some(screen),
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default()
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| add_contents(ui));
        });
    }
}
