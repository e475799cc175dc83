use egui_macroquad::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use flock::simulation::containment::{ContainmentMode, PlanarFrame};
use flock::simulation::params::Params;
use flock::simulation::swarm::Swarm;
use std::collections::VecDeque;

use super::ui::UIState;

pub(super) fn draw_stats_panel(
    egui_ctx: &egui::Context,
    state: &mut UIState,
    swarm: Option<&Swarm>,
    params: &mut Params,
) {
    egui::SidePanel::right("stats_panel")
        .default_width(state.stats_panel_width)
        .resizable(false)
        .show(egui_ctx, |ui| {
            ui.heading("Swarm");
            ui.separator();

            ui.horizontal(|ui| {
                let pause_text = if state.paused { "▶ Run" } else { "⏸ Pause" };
                if ui.button(pause_text).clicked() {
                    state.paused = !state.paused;
                }
                if ui.button("🔄 Regenerate").clicked() {
                    state.reset_requested = true;
                }
                if ui.button("💾 Save").clicked() {
                    state.save_requested = true;
                }
            });

            ui.checkbox(&mut state.rendering_enabled, "Rendering");
            ui.checkbox(&mut state.show_forces, "Show steering forces");

            if let Some(ref msg) = state.status_message {
                ui.label(msg);
            }

            ui.separator();

            ui.label("Simulation Speed");
            ui.add(egui::Slider::new(&mut state.simulation_speed, 0.1..=5.0).text("x"));
            ui.label(format!("Step time: {:.2}ms", state.last_step_time_ms));

            ui.separator();

            match (swarm, &state.latest_stats) {
                (Some(_), Some(stats)) => {
                    ui.label(format!("Time: {:.1}s", stats.time));
                    ui.label(format!("Agents: {}", stats.agents));
                    ui.label(format!("Mean speed: {:.2}", stats.mean_speed));
                    ui.label(format!("Max speed: {:.2}", stats.max_speed));
                    ui.collapsing("Species", |ui| {
                        for (species, count) in &stats.per_species {
                            ui.label(format!("{species}: {count}"));
                        }
                    });
                }
                _ => {
                    ui.label("No swarm generated");
                }
            }

            ui.separator();
            ui.label("Speed");
            draw_speed_plot(ui, &state.mean_speed_history, &state.max_speed_history);

            ui.separator();
            draw_params(ui, params);
        });
}

fn draw_params(ui: &mut egui::Ui, params: &mut Params) {
    ui.collapsing("Parameters (applied on regenerate)", |ui| {
        ui.add(egui::Slider::new(&mut params.max_speed, 0.0..=50.0).text("Max speed"));
        ui.add(
            egui::Slider::new(&mut params.heading_smoothing, 0.0..=20.0).text("Heading smoothing"),
        );

        ui.horizontal(|ui| {
            ui.label("Containment:");
            ui.radio_value(&mut params.containment, ContainmentMode::Volumetric, "Volumetric");
            ui.radio_value(&mut params.containment, ContainmentMode::Planar, "Planar");
        });

        if params.containment == ContainmentMode::Planar {
            let frame = params.planar_frame.get_or_insert_with(PlanarFrame::default);
            ui.add(egui::Slider::new(&mut frame.size.x, 1.0..=200.0).text("Plane width"));
            ui.add(egui::Slider::new(&mut frame.size.y, 1.0..=200.0).text("Plane depth"));
        }
    });
}

fn draw_speed_plot(ui: &mut egui::Ui, mean: &VecDeque<(f64, f64)>, max: &VecDeque<(f64, f64)>) {
    if mean.is_empty() {
        ui.label("Collecting data...");
        return;
    }

    Plot::new("speed_plot")
        .height(150.0)
        .show_axes([true, true])
        .legend(Legend::default())
        .label_formatter(|name, value| format!("{}\nTime: {:.1}s\nSpeed: {:.2}", name, value.x, value.y))
        .show(ui, |plot_ui| {
            let mean_points: PlotPoints = mean.iter().map(|&(x, y)| [x, y]).collect();
            plot_ui.line(
                Line::new(mean_points)
                    .color(egui::Color32::from_rgb(100, 150, 255))
                    .name("Mean"),
            );

            let max_points: PlotPoints = max.iter().map(|&(x, y)| [x, y]).collect();
            plot_ui.line(
                Line::new(max_points)
                    .color(egui::Color32::from_rgb(255, 120, 100))
                    .name("Max"),
            );
        });
}
