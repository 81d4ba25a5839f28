use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::constants::layout::{TABLE_HEADER_HEIGHT, TABLE_ROW_HEIGHT};
use crate::constants::preview::NO_DATA;
use crate::state::AppState;
use crate::views::TableModel;

/// First rows of the filtered set, or the empty placeholder
pub fn render_preview_table(state: &mut AppState, ui: &mut egui::Ui) {
    profiling::scope!("render_preview_table");

    let table = &state.views.table;
    if table.shows_placeholder() {
        ui.centered_and_justified(|ui| ui.weak(NO_DATA));
        return;
    }

    let mut copy_requested = false;
    ui.horizontal(|ui| {
        ui.strong("Preview");
        ui.weak(format!("first {} of the filtered records", table.rows.len()));
        if ui.small_button("Copy").on_hover_text("Copy rows as TSV (Ctrl+C)").clicked() {
            copy_requested = true;
        }
    });
    ui.separator();

    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(100.0).resizable(true))
        .column(Column::initial(200.0).resizable(true).clip(true))
        .column(Column::remainder())
        .header(TABLE_HEADER_HEIGHT, |mut header| {
            for title in TableModel::HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(TABLE_ROW_HEIGHT, table.rows.len(), |mut row| {
                let Some(record) = table.rows.get(row.index()) else {
                    return;
                };
                row.col(|ui| {
                    ui.label(&record.date);
                });
                row.col(|ui| {
                    ui.label(&record.category);
                });
                row.col(|ui| {
                    ui.monospace(&record.coordinates);
                });
            });
        });

    if ui.input(|i| i.modifiers.command && i.key_pressed(egui::Key::C)) {
        copy_requested = true;
    }
    if copy_requested {
        let tsv = state.views.table.to_tsv();
        if let Err(e) = copy_to_clipboard(&tsv) {
            log::warn!("Clipboard copy failed: {}", e);
            state.ui.set_error(format!("Clipboard unavailable: {}", e));
        }
    }
}

fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_owned())
}
