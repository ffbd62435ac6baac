use fastrand::Rng;

/// The opacity of the line joining two particles that are right on top of each other.
const MAX_CONNECTION_OPACITY: f64 = 0.15;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT_RATIO: f64 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Particle {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) size: f64,
    pub(crate) speed_x: f64,
    pub(crate) speed_y: f64,
    pub(crate) opacity: f64,
}

impl Particle {
    fn random(rng: &mut Rng, width: f64, height: f64) -> Self {
        Self {
            x: rng.f64() * width,
            y: rng.f64() * height,
            size: rng.f64() * 2.0 + 1.0,
            speed_x: rng.f64() * 0.5 - 0.25,
            speed_y: rng.f64() * 0.5 - 0.25,
            opacity: rng.f64() * 0.5 + 0.2,
        }
    }

    /// The distance to another particle, measured in columns.
    pub(crate) fn distance(&self, other: &Particle) -> f64 {
        let dx = self.x - other.x;
        let dy = (self.y - other.y) * CELL_ASPECT_RATIO;
        dx.hypot(dy)
    }

    fn update(&mut self, width: f64, height: f64) {
        self.x += self.speed_x;
        self.y += self.speed_y;

        if self.x > width {
            self.x = 0.0;
        }
        if self.x < 0.0 {
            self.x = width;
        }
        if self.y > height {
            self.y = 0.0;
        }
        if self.y < 0.0 {
            self.y = height;
        }
    }
}

/// Particles drifting across the screen.
///
/// Particles that leave the field through one edge come back through the opposite one.
#[derive(Debug)]
pub(crate) struct ParticleField {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
}

impl ParticleField {
    pub(crate) fn new(count: usize, width: f64, height: f64, rng: &mut Rng) -> Self {
        let particles = (0..count).map(|_| Particle::random(rng, width, height)).collect();
        Self { particles, width, height }
    }

    pub(crate) fn update(&mut self) {
        for particle in &mut self.particles {
            particle.update(self.width, self.height);
        }
    }

    /// Change the field's size.
    ///
    /// Particles that are now outside of it will wrap around on their next update.
    pub(crate) fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Every pair of particles closer than `max_distance`, along with the opacity of the line
    /// that joins them.
    pub(crate) fn connections(&self, max_distance: f64) -> impl Iterator<Item = (&Particle, &Particle, f64)> + '_ {
        self.particles.iter().enumerate().flat_map(move |(index, from)| {
            self.particles[index + 1..].iter().filter_map(move |to| {
                connection_opacity(from.distance(to), max_distance).map(|opacity| (from, to, opacity))
            })
        })
    }
}

/// The opacity of the line joining two particles `distance` apart, if they are close enough.
///
/// This fades linearly from the maximum opacity down to zero at `max_distance`.
pub(crate) fn connection_opacity(distance: f64, max_distance: f64) -> Option<f64> {
    (distance < max_distance).then(|| MAX_CONNECTION_OPACITY * (1.0 - distance / max_distance))
}
