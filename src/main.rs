use flock::simulation::config::Scenario;
use flock::simulation::runner::Simulation;
use macroquad::prelude::{WHITE, clear_background, next_frame};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod demo;
mod graphics;
mod ui;

/// Simulated seconds per frame at 1x speed.
const FRAME_DT: f32 = 1.0 / 60.0;
const SAVE_PATH: &str = "flock_scenario.json";

#[macroquad::main("Flock")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let scenario = match std::env::args().nth(1) {
        Some(path) => match Scenario::load_from_file(&path) {
            Ok(scenario) => {
                info!(%path, "loaded scenario");
                scenario
            }
            Err(err) => {
                error!(%path, %err, "failed to load scenario, falling back to the demo");
                demo::scenario()
            }
        },
        None => demo::scenario(),
    };

    let mut params = scenario.params.clone();
    let mut simulation = Simulation::from_scenario(scenario);
    let mut ui_state = ui::UIState::new();
    ui_state.reset_requested = true;

    loop {
        if ui_state.reset_requested {
            ui_state.reset_requested = false;
            ui_state.reset_history();
            simulation.set_params(params.clone());
            ui_state.status_message = Some(match simulation.generate() {
                Ok(swarm) => format!("Generated {} agents", swarm.len()),
                Err(err) => {
                    error!(%err, "failed to generate swarm");
                    format!("Generation failed: {err}")
                }
            });
        }

        if ui_state.save_requested {
            ui_state.save_requested = false;
            let scenario = Scenario {
                params: params.clone(),
                swarm: simulation.config().clone(),
                seed: None,
            };
            ui_state.status_message = Some(match scenario.save_to_file(SAVE_PATH) {
                Ok(()) => {
                    info!(path = SAVE_PATH, "saved scenario");
                    format!("Saved to {SAVE_PATH}")
                }
                Err(err) => {
                    error!(%err, "failed to save scenario");
                    format!("Save failed: {err}")
                }
            });
        }

        if !ui_state.paused && simulation.is_generated() {
            let start = std::time::Instant::now();
            if let Err(err) = simulation.step(FRAME_DT * ui_state.simulation_speed) {
                error!(%err, "step failed");
                ui_state.paused = true;
            }
            ui_state.last_step_time_ms = start.elapsed().as_secs_f32() * 1000.0;
        }

        clear_background(WHITE);

        if let Some(swarm) = simulation.swarm() {
            ui_state.update_history(swarm);
            if ui_state.rendering_enabled {
                let view = graphics::View::for_swarm(swarm, ui_state.stats_panel_width);
                graphics::draw_swarm(swarm, &view, ui_state.show_forces);
            }
        }

        ui::draw_ui(&mut ui_state, simulation.swarm(), &mut params);
        ui::process_egui();

        next_frame().await
    }
}
