use flock::simulation::containment::PlanarFrame;
use flock::simulation::species::SpeciesId;
use flock::simulation::swarm::Swarm;
use glam::{Quat, Vec2, Vec3};
use macroquad::color::{Color, DARKGRAY, hsl_to_rgb};
use macroquad::math::vec2;
use macroquad::shapes::{draw_line, draw_rectangle_lines, draw_triangle};
use macroquad::window::{screen_height, screen_width};

/// Side length of the square shown for volumetric swarms.
const VOLUMETRIC_VIEW_SIZE: f32 = 40.0;
/// Agent triangle length in pixels.
const AGENT_SIZE: f32 = 7.0;
/// Pixels per unit of force when force arrows are shown.
const FORCE_SCALE: f32 = 4.0;

/// Top-down projection of a swarm onto the screen.
///
/// Planar swarms are drawn in their plane's frame; volumetric swarms are
/// drawn looking down the world Y axis.
pub struct View {
    frame: PlanarFrame,
    panel_width: f32,
}

impl View {
    pub fn for_swarm(swarm: &Swarm, panel_width: f32) -> Self {
        let frame = swarm.params().active_plane().copied().unwrap_or_else(|| {
            PlanarFrame::new(Vec3::ZERO, Quat::IDENTITY, Vec2::splat(VOLUMETRIC_VIEW_SIZE))
        });
        Self { frame, panel_width }
    }

    fn scale(&self) -> f32 {
        let width = (screen_width() - self.panel_width).max(1.0);
        let size = self.frame.size.max(Vec2::splat(1.0));
        (width / size.x).min(screen_height() / size.y)
    }

    fn origin(&self) -> (f32, f32) {
        ((screen_width() - self.panel_width) / 2.0, screen_height() / 2.0)
    }

    fn to_screen(&self, position: Vec3) -> (f32, f32) {
        let local = self.frame.to_local(position);
        let (cx, cy) = self.origin();
        let scale = self.scale();
        (cx + local.x * scale, cy + local.z * scale)
    }

    fn direction_on_screen(&self, direction: Vec3) -> Option<(f32, f32)> {
        let local = self.frame.rotation.inverse() * direction;
        let flat = Vec2::new(local.x, local.z).try_normalize()?;
        Some((flat.x, flat.y))
    }
}

pub fn species_color(species: SpeciesId) -> Color {
    let hue = (species.0 as f32 * 0.13 + 0.05).fract();
    hsl_to_rgb(hue, 0.7, 0.5)
}

pub fn draw_swarm(swarm: &Swarm, view: &View, show_forces: bool) {
    let (cx, cy) = view.origin();
    let half = view.frame.size * view.scale() / 2.0;
    draw_rectangle_lines(cx - half.x, cy - half.y, half.x * 2.0, half.y * 2.0, 2.0, DARKGRAY);

    for agent in swarm.agents() {
        let (x, y) = view.to_screen(agent.position);
        let facing = view
            .direction_on_screen(agent.heading * Vec3::Z)
            .or_else(|| view.direction_on_screen(agent.velocity))
            .unwrap_or((0.0, -1.0));

        let (fx, fy) = facing;
        let (rx, ry) = (-fy, fx);
        let tip = vec2(x + fx * AGENT_SIZE, y + fy * AGENT_SIZE);
        let left = vec2(
            x - fx * AGENT_SIZE * 0.6 + rx * AGENT_SIZE * 0.5,
            y - fy * AGENT_SIZE * 0.6 + ry * AGENT_SIZE * 0.5,
        );
        let right = vec2(
            x - fx * AGENT_SIZE * 0.6 - rx * AGENT_SIZE * 0.5,
            y - fy * AGENT_SIZE * 0.6 - ry * AGENT_SIZE * 0.5,
        );

        draw_triangle(tip, left, right, species_color(agent.species_id()));
    }

    if show_forces {
        let forces = swarm.accumulate_forces();
        for (agent, force) in swarm.agents().iter().zip(forces) {
            let (x, y) = view.to_screen(agent.position);
            let local = view.frame.rotation.inverse() * force;
            draw_line(
                x,
                y,
                x + local.x * FORCE_SCALE,
                y + local.z * FORCE_SCALE,
                1.0,
                Color::from_rgba(220, 40, 40, 200),
            );
        }
    }
}
