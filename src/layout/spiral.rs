// Jittered Archimedean spiral search with an outer-ring fallback.
//
// Each label walks outward from the canvas center and takes the first
// candidate that clears every reserved box and stays inside the canvas.
// Labels that find nothing are reported as `Placement::Unplaced`.

use std::f32::consts::TAU;

use rand::Rng;

use super::geometry::{BoundingBox, collides, rotated_bounds};
use super::types::{Canvas, Placement};
use crate::config::LayoutConfig;

const QUARTER_TURNS: [f32; 4] = [0.0, 90.0, -90.0, 180.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchPhase {
    Spiral,
    Fallback,
}

impl SearchPhase {
    fn as_str(self) -> &'static str {
        match self {
            SearchPhase::Spiral => "spiral",
            SearchPhase::Fallback => "fallback",
        }
    }
}

/// Search for a spot for a `width` x `height` label. On success the
/// margin-expanded bounds are appended to `placed`.
pub fn place_item<R: Rng + ?Sized>(
    rng: &mut R,
    width: f32,
    height: f32,
    canvas: &Canvas,
    placed: &mut Vec<BoundingBox>,
    config: &LayoutConfig,
) -> Placement {
    let half_w = width.max(0.0) * 0.5;
    let half_h = height.max(0.0) * 0.5;

    let mut found = false;
    let mut placement = Placement::Unplaced;

    for attempt in 0..config.max_attempts {
        let base_angle = attempt as f32 * config.angle_increment;
        let angle = base_angle + jitter(rng, config.angle_jitter);
        let radius =
            config.start_radius + config.tightness * base_angle + jitter(rng, config.radius_jitter);
        let rotation = spiral_rotation(rng, angle, config);
        let candidate = Candidate {
            angle,
            radius,
            rotation,
        };
        if let Some(accepted) = candidate.try_reserve(half_w, half_h, canvas, placed, config) {
            trace_accept(SearchPhase::Spiral, attempt, &candidate);
            placement = accepted;
            found = true;
            break;
        }
    }

    if !found {
        for attempt in 0..config.fallback_attempts {
            let candidate = Candidate {
                angle: rng.gen_range(0.0..TAU),
                radius: rng.gen_range(config.fallback_min_radius..=config.fallback_max_radius),
                rotation: random_rotation(rng, config.rotation_range),
            };
            if let Some(accepted) = candidate.try_reserve(half_w, half_h, canvas, placed, config) {
                trace_accept(SearchPhase::Fallback, attempt, &candidate);
                placement = accepted;
                break;
            }
        }
    }

    placement
}

struct Candidate {
    angle: f32,
    radius: f32,
    rotation: f32,
}

impl Candidate {
    fn try_reserve(
        &self,
        half_w: f32,
        half_h: f32,
        canvas: &Canvas,
        placed: &mut Vec<BoundingBox>,
        config: &LayoutConfig,
    ) -> Option<Placement> {
        let (cx, cy) = canvas.center;
        let x = cx + self.radius * self.angle.cos();
        let y = cy + self.radius * self.angle.sin();
        let bounds = rotated_bounds(x, y, half_w, half_h, self.rotation);
        if !canvas.contains(&bounds) {
            return None;
        }
        let reserved = bounds.inflate(config.collision_margin);
        if collides(&reserved, placed) {
            return None;
        }
        placed.push(reserved);
        Some(Placement::Placed {
            x,
            y,
            rotation: self.rotation,
            bounds,
        })
    }
}

fn trace_accept(phase: SearchPhase, attempt: usize, candidate: &Candidate) {
    tracing::trace!(
        phase = phase.as_str(),
        attempt,
        radius = candidate.radius,
        rotation = candidate.rotation,
        "label placed"
    );
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    if amount > 0.0 {
        rng.gen_range(-amount..=amount)
    } else {
        0.0
    }
}

fn random_rotation<R: Rng + ?Sized>(rng: &mut R, range: f32) -> f32 {
    if range > 0.0 {
        rng.gen_range(-range..=range)
    } else {
        0.0
    }
}

/// Mostly a random tilt; sometimes the radial direction snapped to the
/// nearest quarter turn.
fn spiral_rotation<R: Rng + ?Sized>(rng: &mut R, angle: f32, config: &LayoutConfig) -> f32 {
    let rotation = random_rotation(rng, config.rotation_range);
    if rng.gen_bool(config.radial_rotation_probability) {
        return snap_to_quarter_turn(-angle.to_degrees());
    }
    rotation
}

fn snap_to_quarter_turn(degrees: f32) -> f32 {
    let mut best = QUARTER_TURNS[0];
    let mut best_dist = f32::MAX;
    for turn in QUARTER_TURNS {
        let dist = wrap_degrees(degrees - turn).abs();
        if dist < best_dist {
            best = turn;
            best_dist = dist;
        }
    }
    best
}

/// Normalize to `(-180, 180]`.
fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
