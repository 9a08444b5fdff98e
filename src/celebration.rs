use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Sky, amber and pink; shared by both bursts.
pub const PALETTE: [(u8, u8, u8); 3] = [(0x38, 0xbd, 0xf8), (0xfb, 0xbf, 0x24), (0xf4, 0x72, 0xb6)];

const SYMBOLS: [char; 5] = ['*', '•', '✦', '▪', '◆'];
const GRAVITY: f64 = 30.0; // cells per second squared
const OFF_SCREEN_BUFFER: f64 = 5.0;

/// Which edge a burst is launched from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Launch angle in degrees, counter-clockwise from the positive x axis.
    fn angle(self) -> f64 {
        match self {
            Side::Left => 60.0,
            Side::Right => 120.0,
        }
    }
}

/// Shape of one burst
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub particle_count: usize,
    pub spread_deg: f64,
}

impl Default for Burst {
    fn default() -> Self {
        Self {
            particle_count: 5,
            spread_deg: 55.0,
        }
    }
}

/// Particle for celebration animation
#[derive(Debug, Clone)]
pub struct CelebrationParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    pub side: Side,
}

impl CelebrationParticle {
    fn launch(x: f64, y: f64, side: Side, spread_deg: f64, rng: &mut impl Rng) -> Self {
        let half_spread = spread_deg / 2.0;
        let angle = (side.angle() + rng.gen_range(-half_spread..=half_spread)).to_radians();
        let speed = rng.gen_range(18.0..32.0);

        Self {
            x,
            y,
            vel_x: speed * angle.cos(),
            // terminal cells are roughly twice as tall as they are wide
            vel_y: -speed * angle.sin() * 0.5,
            symbol: *SYMBOLS.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..PALETTE.len()),
            age: 0.0,
            max_age: rng.gen_range(1.0..2.0),
            side,
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.vel_x *= 0.98;

        self.age += dt;
        self.age < self.max_age
    }
}

/// Confetti shown once the whole verse is hidden. Emits a mirrored pair
/// of bursts on every tick until `duration` has passed since `start`,
/// then lets the remaining particles fall away and stops by itself.
#[derive(Debug)]
pub struct CelebrationAnimation {
    pub particles: Vec<CelebrationParticle>,
    pub duration: Duration,
    pub burst: Burst,
    pub is_active: bool,
    pub emissions: usize,
    started_at: Option<Instant>,
    last_tick: Option<Instant>,
    terminal_width: f64,
    terminal_height: f64,
}

impl CelebrationAnimation {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            duration: Duration::from_millis(3000),
            burst: Burst::default(),
            is_active: false,
            emissions: 0,
            started_at: None,
            last_tick: None,
            terminal_width: 80.0,
            terminal_height: 24.0,
        }
    }

    pub fn start(&mut self, width: u16, height: u16, now: Instant) {
        self.particles.clear();
        self.emissions = 0;
        self.started_at = Some(now);
        self.last_tick = Some(now);
        self.is_active = true;
        self.terminal_width = width as f64;
        self.terminal_height = height as f64;

        info!(width, height, "celebration started");
        self.emit();
    }

    /// Stop immediately, dropping any particles still in flight.
    pub fn cancel(&mut self) {
        if self.is_active {
            debug!("celebration cancelled");
        }
        self.particles.clear();
        self.is_active = false;
        self.started_at = None;
        self.last_tick = None;
    }

    /// Whether new bursts are still being launched at `now`.
    pub fn is_emitting(&self, now: Instant) -> bool {
        self.is_active
            && self
                .started_at
                .is_some_and(|start| now.saturating_duration_since(start) < self.duration)
    }

    /// Advance one frame. Returns whether the animation is still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.is_active {
            return false;
        }

        let dt = self
            .last_tick
            .map(|last| now.saturating_duration_since(last).as_secs_f64())
            .unwrap_or_default();
        self.last_tick = Some(now);

        let (width, height) = (self.terminal_width, self.terminal_height);
        self.particles.retain_mut(|particle| {
            let still_alive = particle.update(dt);
            let off_screen = particle.y > height + OFF_SCREEN_BUFFER
                || particle.x < -OFF_SCREEN_BUFFER
                || particle.x > width + OFF_SCREEN_BUFFER;
            still_alive && !off_screen
        });

        if self.is_emitting(now) {
            self.emit();
        } else if self.particles.is_empty() {
            self.is_active = false;
            self.started_at = None;
            debug!(emissions = self.emissions, "celebration finished");
        }

        self.is_active
    }

    fn emit(&mut self) {
        let mut rng = rand::thread_rng();
        let origin_y = self.terminal_height / 2.0;
        let right_x = (self.terminal_width - 1.0).max(0.0);

        for (x, side) in [(0.0, Side::Left), (right_x, Side::Right)] {
            for _ in 0..self.burst.particle_count {
                self.particles.push(CelebrationParticle::launch(
                    x,
                    origin_y,
                    side,
                    self.burst.spread_deg,
                    &mut rng,
                ));
            }
        }
        self.emissions += 1;
    }
}

impl Default for CelebrationAnimation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(50);

    #[test]
    fn starts_inactive() {
        let celebration = CelebrationAnimation::new();
        assert!(!celebration.is_active);
        assert!(celebration.particles.is_empty());
        assert_eq!(celebration.duration, Duration::from_millis(3000));
    }

    #[test]
    fn start_emits_a_pair_of_bursts() {
        let mut celebration = CelebrationAnimation::new();
        celebration.start(80, 24, Instant::now());

        assert!(celebration.is_active);
        assert_eq!(celebration.emissions, 1);
        assert_eq!(celebration.particles.len(), 10);

        let left = celebration
            .particles
            .iter()
            .filter(|p| p.side == Side::Left)
            .count();
        assert_eq!(left, 5);
    }

    #[test]
    fn bursts_are_mirrored() {
        let mut celebration = CelebrationAnimation::new();
        celebration.start(80, 24, Instant::now());

        for p in &celebration.particles {
            assert!(p.vel_y < 0.0, "particles launch upwards");
            assert!(p.color_index < PALETTE.len());
            match p.side {
                Side::Left => {
                    assert_eq!(p.x, 0.0);
                    assert!(p.vel_x > 0.0);
                }
                Side::Right => {
                    assert_eq!(p.x, 79.0);
                    assert!(p.vel_x < 0.0);
                }
            }
        }
    }

    #[test]
    fn emits_every_tick_inside_window() {
        let t0 = Instant::now();
        let mut celebration = CelebrationAnimation::new();
        celebration.start(80, 24, t0);

        for i in 1..=10 {
            assert!(celebration.tick(t0 + FRAME * i));
        }
        assert_eq!(celebration.emissions, 11);
        assert!(celebration.is_emitting(t0 + FRAME * 10));
    }

    #[test]
    fn stops_emitting_after_duration() {
        let t0 = Instant::now();
        let mut celebration = CelebrationAnimation::new();
        celebration.start(80, 24, t0);

        celebration.tick(t0 + Duration::from_millis(2950));
        let emitted = celebration.emissions;

        celebration.tick(t0 + Duration::from_millis(3000));
        assert_eq!(celebration.emissions, emitted);
        assert!(!celebration.is_emitting(t0 + Duration::from_millis(3000)));
    }

    #[test]
    fn terminates_on_its_own() {
        let t0 = Instant::now();
        let mut celebration = CelebrationAnimation::new();
        celebration.start(80, 24, t0);

        celebration.tick(t0 + Duration::from_millis(3000));
        let running = celebration.tick(t0 + Duration::from_secs(6));

        assert!(!running);
        assert!(!celebration.is_active);
        assert!(celebration.particles.is_empty());
        assert!(!celebration.tick(t0 + Duration::from_secs(7)));
    }

    #[test]
    fn cancel_stops_in_flight_animation() {
        let t0 = Instant::now();
        let mut celebration = CelebrationAnimation::new();
        celebration.start(80, 24, t0);
        celebration.tick(t0 + FRAME);

        celebration.cancel();
        assert!(!celebration.is_active);
        assert!(celebration.particles.is_empty());
        assert!(!celebration.tick(t0 + FRAME * 2));
    }

    #[test]
    fn restart_resets_counters() {
        let t0 = Instant::now();
        let mut celebration = CelebrationAnimation::new();
        celebration.start(80, 24, t0);
        celebration.tick(t0 + FRAME);
        celebration.cancel();

        celebration.start(40, 12, t0 + FRAME * 2);
        assert_eq!(celebration.emissions, 1);
        assert_eq!(celebration.particles.len(), 10);
    }

    #[test]
    fn particles_fall_under_gravity() {
        let mut rng = rand::thread_rng();
        let mut particle = CelebrationParticle::launch(10.0, 10.0, Side::Left, 55.0, &mut rng);
        let initial_vel_y = particle.vel_y;

        assert!(particle.update(0.1));
        assert!(particle.vel_y > initial_vel_y);
        assert!(particle.x > 10.0);
    }

    #[test]
    fn off_screen_particles_are_dropped() {
        let t0 = Instant::now();
        let mut celebration = CelebrationAnimation::new();
        celebration.start(20, 10, t0);

        let mut rng = rand::thread_rng();
        let mut stray = CelebrationParticle::launch(100.0, 100.0, Side::Left, 55.0, &mut rng);
        stray.max_age = 10.0;
        celebration.particles.push(stray);

        celebration.tick(t0 + FRAME);
        assert!(celebration.particles.iter().all(|p| p.x < 100.0));
    }
}
