//! Ambient particle field drawn behind the page.
//!
//! The pool is sized once from the viewport width and never changes count;
//! resizing only changes the bounds particles wrap around.

use rand::Rng;

pub const DEFAULT_PARTICLE_LIMIT: usize = 60;
/// Viewport pixels per particle when sizing the pool.
pub const PARTICLE_SPACING: f64 = 25.0;
pub const OPACITY_MIN: f64 = 0.05;
pub const OPACITY_MAX: f64 = 0.6;

const RADIUS_RANGE: (f64, f64) = (0.5, 2.5);
const SPEED_MAX: f64 = 0.3;
const FADE_SPEED_RANGE: (f64, f64) = (0.002, 0.007);

/// Pool size for a viewport: `min(limit, floor(width / 25))`.
pub fn particle_count(viewport_width: f64, limit: usize) -> usize {
    if !viewport_width.is_finite() || viewport_width <= 0.0 {
        return 0;
    }
    ((viewport_width / PARTICLE_SPACING).floor() as usize).min(limit)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub vx: f64,
    pub vy: f64,
    pub opacity: f64,
    pub fading_in: bool,
    pub fade_speed: f64,
}

impl Particle {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64) -> Self {
        Self {
            x: rng.gen_range(0.0..=width.max(0.0)),
            y: rng.gen_range(0.0..=height.max(0.0)),
            radius: rng.gen_range(RADIUS_RANGE.0..RADIUS_RANGE.1),
            vx: rng.gen_range(-SPEED_MAX..SPEED_MAX),
            vy: rng.gen_range(-SPEED_MAX..SPEED_MAX),
            opacity: rng.gen_range(OPACITY_MIN..=OPACITY_MAX),
            fading_in: rng.gen_bool(0.5),
            fade_speed: rng.gen_range(FADE_SPEED_RANGE.0..FADE_SPEED_RANGE.1),
        }
    }

    /// Advance one frame: move, wrap to the opposite edge, oscillate opacity.
    pub fn step(&mut self, width: f64, height: f64) {
        self.x += self.vx;
        self.y += self.vy;

        if self.x < 0.0 {
            self.x = width;
        } else if self.x > width {
            self.x = 0.0;
        }
        if self.y < 0.0 {
            self.y = height;
        } else if self.y > height {
            self.y = 0.0;
        }

        if self.fading_in {
            self.opacity += self.fade_speed;
            if self.opacity >= OPACITY_MAX {
                self.opacity = OPACITY_MAX;
                self.fading_in = false;
            }
        } else {
            self.opacity -= self.fade_speed;
            if self.opacity <= OPACITY_MIN {
                self.opacity = OPACITY_MIN;
                self.fading_in = true;
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(width: f64, height: f64, limit: usize, rng: &mut R) -> Self {
        let count = particle_count(width, limit);
        let particles = (0..count)
            .map(|_| Particle::random(rng, width, height))
            .collect();
        Self {
            particles,
            width,
            height,
        }
    }

    /// New canvas bounds. The particle count stays fixed.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);
        for particle in &mut self.particles {
            particle.step(width, height);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[cfg(test)]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}
