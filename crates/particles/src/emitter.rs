use glam::Vec2;
use parallax_common::{Rect, SceneError, WorldSize};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Closed interval sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        (self.min + (self.max - self.min) * rng.random::<f32>()).clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn validate(&self, name: &str, floor: f32, strict: bool) -> Result<(), SceneError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(SceneError::InvalidConfig(format!(
                "{name} must be a finite range with min <= max, got {}..{}",
                self.min, self.max
            )));
        }
        let below = if strict { self.min <= floor } else { self.min < floor };
        if below {
            return Err(SceneError::InvalidConfig(format!(
                "{name} must stay above {floor}, got min {}",
                self.min
            )));
        }
        Ok(())
    }
}

/// Smoke emitter tuning. All distances are world units, rates are per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Chance per tick that a pair spawns.
    pub spawn_probability: f32,
    pub size_range: ValueRange,
    /// Alpha lost per tick; lifetime is roughly `1/decay` ticks.
    pub decay_range: ValueRange,
    /// Outward horizontal drift speed.
    pub velocity_range: ValueRange,
    /// Upward speed.
    pub rise_range: ValueRange,
    /// Left emission point as a fraction of the background.
    pub left_anchor: [f32; 2],
    /// Right emission point as a fraction of the background.
    pub right_anchor: [f32; 2],
    /// Hard cap on live particles.
    pub max_particles: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            spawn_probability: 0.03,
            size_range: ValueRange::new(60.0, 140.0),
            decay_range: ValueRange::new(0.004, 0.01),
            velocity_range: ValueRange::new(0.05, 0.35),
            rise_range: ValueRange::new(0.3, 0.9),
            left_anchor: [0.3, 0.8],
            right_anchor: [0.7, 0.8],
            max_particles: 1024,
        }
    }
}

impl EmitterConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        if !self.spawn_probability.is_finite() || !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(SceneError::InvalidConfig(format!(
                "spawn_probability must be in [0, 1], got {}",
                self.spawn_probability
            )));
        }
        self.size_range.validate("size_range", 0.0, true)?;
        self.decay_range.validate("decay_range", 0.0, true)?;
        self.velocity_range.validate("velocity_range", 0.0, false)?;
        self.rise_range.validate("rise_range", f32::MIN, false)?;
        if !self
            .left_anchor
            .iter()
            .chain(&self.right_anchor)
            .all(|v| v.is_finite())
        {
            return Err(SceneError::InvalidConfig("anchors must be finite".into()));
        }
        Ok(())
    }
}

const ALPHA_EPSILON: f32 = 1e-3;

/// One smoke puff. Positions are world space; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// `x` drifts sideways; positive `y` rises.
    pub velocity: Vec2,
    pub size: f32,
    pub alpha: f32,
    pub decay: f32,
}

impl Particle {
    /// A fresh, fully opaque particle.
    pub fn new(position: Vec2, velocity: Vec2, size: f32, decay: f32) -> Self {
        Self {
            position,
            velocity,
            size,
            alpha: 1.0,
            decay,
        }
    }

    /// Alive while alpha exceeds a residue scaled to `decay`; absorbs the f32
    /// drift of repeated subtraction.
    pub fn is_alive(&self) -> bool {
        self.alpha > self.decay * ALPHA_EPSILON
    }

    /// Square quad centered on the particle.
    pub fn rect(&self) -> Rect {
        Rect::centered(self.position, self.size)
    }

    fn step(&mut self) {
        self.position.x += self.velocity.x;
        self.position.y -= self.velocity.y;
        self.alpha -= self.decay;
    }
}

/// Outcome of one emitter tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub culled: usize,
    pub live: usize,
}

/// Spawns, integrates and culls smoke particles.
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    config: EmitterConfig,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleEmitter {
    /// Emitter seeded from the OS.
    pub fn new(config: EmitterConfig) -> Result<Self, SceneError> {
        config.validate()?;
        Ok(Self {
            config,
            particles: Vec::new(),
            rng: StdRng::from_os_rng(),
        })
    }

    /// Emitter with a fixed seed; identical seeds and calls give identical particles.
    pub fn with_seed(config: EmitterConfig, seed: u64) -> Result<Self, SceneError> {
        config.validate()?;
        Ok(Self {
            config,
            particles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Roll the configured spawn probability once.
    pub fn maybe_spawn(&mut self, world: WorldSize) -> bool {
        self.try_spawn(self.config.spawn_probability, world)
    }

    /// Draw one uniform sample; spawn a pair if it falls below `rate`.
    pub fn try_spawn(&mut self, rate: f32, world: WorldSize) -> bool {
        let roll: f32 = self.rng.random();
        if roll < rate {
            self.spawn_pair(world)
        } else {
            false
        }
    }

    /// Spawn a mirrored pair: the left particle drifts left, the right one drifts right.
    ///
    /// Returns false when the pair would exceed `max_particles`.
    pub fn spawn_pair(&mut self, world: WorldSize) -> bool {
        if self.particles.len() + 2 > self.config.max_particles {
            tracing::trace!(
                live = self.particles.len(),
                "particle cap reached, pair skipped"
            );
            return false;
        }

        let speed = self.config.velocity_range.sample(&mut self.rng);
        let rise = self.config.rise_range.sample(&mut self.rng);
        let size = self.config.size_range.sample(&mut self.rng);
        let decay = self.config.decay_range.sample(&mut self.rng);

        let left = world.at_fraction(Vec2::from(self.config.left_anchor));
        let right = world.at_fraction(Vec2::from(self.config.right_anchor));

        self.particles
            .push(Particle::new(left, Vec2::new(-speed, rise), size, decay));
        self.particles
            .push(Particle::new(right, Vec2::new(speed, rise), size, decay));
        true
    }

    /// Insert a particle directly. Returns false at the cap.
    pub fn push(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.config.max_particles {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Integrate every particle, then cull those whose alpha reached zero.
    pub fn tick(&mut self) -> TickStats {
        for particle in &mut self.particles {
            particle.step();
        }
        let before = self.particles.len();
        self.particles.retain(Particle::is_alive);
        let stats = TickStats {
            culled: before - self.particles.len(),
            live: self.particles.len(),
        };
        if stats.culled > 0 {
            tracing::trace!(culled = stats.culled, live = stats.live, "particles culled");
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> WorldSize {
        WorldSize::new(1920.0, 1080.0).unwrap()
    }

    fn emitter() -> ParticleEmitter {
        ParticleEmitter::with_seed(EmitterConfig::default(), 7).unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(EmitterConfig::default().validate().is_ok());
    }

    #[test]
    fn particle_removed_when_alpha_reaches_zero() {
        let mut e = emitter();
        e.push(Particle::new(Vec2::ZERO, Vec2::ZERO, 10.0, 0.0625));
        for _ in 0..15 {
            e.tick();
        }
        assert_eq!(e.len(), 1);
        assert_eq!(e.particles()[0].alpha, 0.0625);

        let stats = e.tick();
        assert_eq!(stats, TickStats { culled: 1, live: 0 });
        assert!(e.is_empty());
    }

    #[test]
    fn hundredth_tick_lifecycle() {
        let mut e = emitter();
        e.push(Particle::new(Vec2::ZERO, Vec2::ZERO, 10.0, 0.01));
        for _ in 0..99 {
            e.tick();
        }
        assert_eq!(e.len(), 1, "alive after 99 ticks");
        assert!((e.particles()[0].alpha - 0.01).abs() < 1e-4);
        assert!(e.particles()[0].is_alive());

        let stats = e.tick();
        assert_eq!(stats, TickStats { culled: 1, live: 0 });
        assert!(e.is_empty(), "culled on tick 100");
    }

    #[test]
    fn tick_integrates_motion() {
        let mut e = emitter();
        e.push(Particle::new(
            Vec2::new(100.0, 500.0),
            Vec2::new(-2.0, 3.0),
            10.0,
            0.25,
        ));
        e.tick();
        let p = e.particles()[0];
        assert_eq!(p.position, Vec2::new(98.0, 497.0));
        assert_eq!(p.alpha, 0.75);
    }

    #[test]
    fn rate_one_always_spawns_and_zero_never() {
        let mut e = emitter();
        for _ in 0..10 {
            assert!(!e.try_spawn(0.0, world()));
        }
        assert!(e.is_empty());
        for _ in 0..5 {
            assert!(e.try_spawn(1.0, world()));
        }
        assert_eq!(e.len(), 10);
    }

    #[test]
    fn pairs_are_mirrored_and_drift_outward() {
        let mut e = emitter();
        assert!(e.spawn_pair(world()));
        let [left, right] = [e.particles()[0], e.particles()[1]];

        assert_eq!(left.position, Vec2::new(1920.0 * 0.3, 1080.0 * 0.8));
        assert_eq!(right.position, Vec2::new(1920.0 * 0.7, 1080.0 * 0.8));
        assert!(left.velocity.x <= 0.0);
        assert!(right.velocity.x >= 0.0);
        assert_eq!(left.velocity.x, -right.velocity.x);
        assert_eq!(left.velocity.y, right.velocity.y);
        assert_eq!(left.alpha, 1.0);

        let config = EmitterConfig::default();
        assert!(config.size_range.contains(left.size));
        assert!(config.decay_range.contains(left.decay));
        assert!(config.rise_range.contains(left.velocity.y));
        assert!(config.velocity_range.contains(right.velocity.x));
    }

    #[test]
    fn same_seed_same_particles() {
        let mut a = emitter();
        let mut b = emitter();
        for _ in 0..500 {
            a.maybe_spawn(world());
            b.maybe_spawn(world());
            a.tick();
            b.tick();
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn cap_limits_live_set() {
        let config = EmitterConfig {
            max_particles: 5,
            ..EmitterConfig::default()
        };
        let mut e = ParticleEmitter::with_seed(config, 1).unwrap();
        assert!(e.spawn_pair(world()));
        assert!(e.spawn_pair(world()));
        assert!(!e.spawn_pair(world()));
        assert_eq!(e.len(), 4);
        assert!(e.push(Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, 0.1)));
        assert!(!e.push(Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, 0.1)));
        assert_eq!(e.len(), 5);
    }

    #[test]
    fn steady_state_stays_bounded_under_defaults() {
        let mut e = emitter();
        let mut peak = 0;
        for _ in 0..20_000 {
            e.maybe_spawn(world());
            peak = peak.max(e.tick().live);
        }
        // Expected live count is about 2 * 0.03 * 1/decay, well under the cap.
        assert!(peak < 200, "peak {peak}");
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let bad = [
            EmitterConfig {
                spawn_probability: 1.5,
                ..EmitterConfig::default()
            },
            EmitterConfig {
                decay_range: ValueRange::new(0.0, 0.01),
                ..EmitterConfig::default()
            },
            EmitterConfig {
                size_range: ValueRange::new(50.0, 10.0),
                ..EmitterConfig::default()
            },
            EmitterConfig {
                left_anchor: [f32::NAN, 0.5],
                ..EmitterConfig::default()
            },
        ];
        for config in bad {
            assert!(matches!(
                ParticleEmitter::new(config),
                Err(SceneError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn config_parses_partial_yaml() {
        let config: EmitterConfig = serde_yaml::from_str(
            "spawn_probability: 0.1\nmax_particles: 64\ndecay_range: { min: 0.02, max: 0.05 }\n",
        )
        .unwrap();
        assert_eq!(config.spawn_probability, 0.1);
        assert_eq!(config.max_particles, 64);
        assert_eq!(config.decay_range, ValueRange::new(0.02, 0.05));
        assert_eq!(config.size_range, EmitterConfig::default().size_range);
    }
}
