use egui_macroquad::egui;
use flock::simulation::params::Params;
use flock::simulation::stats::SwarmStats;
use flock::simulation::swarm::Swarm;
use std::collections::VecDeque;

const MAX_HISTORY_POINTS: usize = 500;

#[allow(clippy::struct_excessive_bools)]
pub struct UIState {
    pub stats_panel_width: f32,
    pub mean_speed_history: VecDeque<(f64, f64)>,
    pub max_speed_history: VecDeque<(f64, f64)>,
    pub latest_stats: Option<SwarmStats>,
    last_update_time: f32,
    update_interval: f32,
    pub paused: bool,
    pub save_requested: bool,
    pub reset_requested: bool,
    pub status_message: Option<String>,
    pub simulation_speed: f32,
    pub rendering_enabled: bool,
    pub show_forces: bool,
    pub last_step_time_ms: f32,
}

impl UIState {
    pub fn new() -> Self {
        Self {
            stats_panel_width: 300.0,
            mean_speed_history: VecDeque::new(),
            max_speed_history: VecDeque::new(),
            latest_stats: None,
            last_update_time: f32::NEG_INFINITY,
            update_interval: 0.25,
            paused: false,
            save_requested: false,
            reset_requested: false,
            status_message: None,
            simulation_speed: 1.0,
            rendering_enabled: true,
            show_forces: false,
            last_step_time_ms: 0.0,
        }
    }

    pub fn reset_history(&mut self) {
        self.mean_speed_history.clear();
        self.max_speed_history.clear();
        self.latest_stats = None;
        self.last_update_time = f32::NEG_INFINITY;
    }

    pub fn update_history(&mut self, swarm: &Swarm) {
        if swarm.time() - self.last_update_time < self.update_interval {
            return;
        }
        self.last_update_time = swarm.time();

        let stats = SwarmStats::collect(swarm);
        let t = stats.time as f64;
        self.mean_speed_history.push_back((t, stats.mean_speed as f64));
        self.max_speed_history.push_back((t, stats.max_speed as f64));

        if self.mean_speed_history.len() > MAX_HISTORY_POINTS {
            self.mean_speed_history.pop_front();
        }
        if self.max_speed_history.len() > MAX_HISTORY_POINTS {
            self.max_speed_history.pop_front();
        }

        self.latest_stats = Some(stats);
    }
}

pub fn draw_ui(state: &mut UIState, swarm: Option<&Swarm>, params: &mut Params) {
    egui_macroquad::ui(|egui_ctx| {
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::from_rgb(240, 240, 240));
        egui_ctx.set_visuals(visuals);

        super::stats::draw_stats_panel(egui_ctx, state, swarm, params);
    });
}

pub fn process_egui() {
    egui_macroquad::draw();
}
