use eframe::egui::{self, ComboBox, Slider};

use crate::app::CrimeScope;
use crate::constants::controls::{DATA_LIMIT_STEP, MAX_DATA_LIMIT, MIN_DATA_LIMIT, TOP_N_CHOICES};
use crate::state::TimeGranularity;
use crate::views::group_thousands;

/// Render the toolbar: data source, filter reset and the control surface
pub fn render_toolbar(app: &mut CrimeScope, ctx: &egui::Context, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let loading = app.state.ui.is_loading();

        if ui
            .add_enabled(!loading, egui::Button::new("⟳ Reload"))
            .on_hover_text("Fetch the dataset again")
            .clicked()
        {
            app.reload();
        }
        if ui.button("Reset").on_hover_text("Clear all filters").clicked() {
            app.state.reset_filters();
        }
        if ui.button("📂").on_hover_text("Open CSV or Parquet export").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Data Files", &["csv", "parquet"])
                .pick_file()
            {
                app.open_file(path);
            }
        }
        if app.current_file.is_some()
            && ui.small_button("🌐").on_hover_text("Back to the remote endpoint").clicked()
        {
            app.use_endpoint();
        }

        ui.separator();

        let mut top_n = app.state.controls.top_n;
        ComboBox::from_label("Top")
            .selected_text(top_n.to_string())
            .show_ui(ui, |ui| {
                for choice in TOP_N_CHOICES {
                    ui.selectable_value(&mut top_n, choice, choice.to_string());
                }
            });
        app.state.set_top_n(top_n);

        let mut granularity = app.state.controls.granularity;
        ComboBox::from_label("Bins")
            .selected_text(granularity.label())
            .show_ui(ui, |ui| {
                for g in TimeGranularity::ALL {
                    ui.selectable_value(&mut granularity, g, g.label());
                }
            });
        app.state.set_granularity(granularity);

        ui.separator();

        let response = ui.add(
            Slider::new(&mut app.state.controls.data_limit, MIN_DATA_LIMIT..=MAX_DATA_LIMIT)
                .step_by(DATA_LIMIT_STEP)
                .text("rows")
                .custom_formatter(|v, _| group_thousands(v as usize)),
        );
        // Only a committed value triggers a reload
        if response.drag_stopped() || (response.changed() && !response.dragged()) {
            app.reload();
        }

        ui.separator();

        if ui.small_button("💾").on_hover_text("Save settings").clicked() {
            app.save_config();
        }
        if ui.small_button("📋").on_hover_text("Load settings").clicked() {
            app.load_config();
        }
    });

    // Drag and drop of a data file
    let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
    if let Some(path) = dropped {
        app.open_file(path);
    }
}
