//! Meteor shower: a periodic meteor spawner toggled by campaign triggers.
//!
//! The shower runs beside the sequencer, not through it. While active it
//! injects one meteor whenever the scheduled time passes and then draws the
//! next gap uniformly from the configured `[min, max]` range.

use bevy::prelude::*;
use rand::Rng;

use crate::constants::METEOR_SHOWER_INTERVAL_MS;

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct MeteorShower {
    active: bool,
    next_spawn_ms: u64,
    interval_ms: (u64, u64),
}

impl Default for MeteorShower {
    fn default() -> Self {
        let [min, max] = METEOR_SHOWER_INTERVAL_MS;
        Self::new((min, max))
    }
}

impl MeteorShower {
    pub fn new(interval_ms: (u64, u64)) -> Self {
        let (a, b) = interval_ms;
        Self {
            active: false,
            next_spawn_ms: 0,
            interval_ms: (a.min(b), a.max(b)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn next_spawn_ms(&self) -> u64 {
        self.next_spawn_ms
    }

    /// Switch the shower on or off. Switching on schedules the first meteor
    /// one interval from `now_ms`; repeating the current state changes nothing.
    pub fn set_active<R: Rng + ?Sized>(&mut self, active: bool, now_ms: u64, rng: &mut R) {
        if active && !self.active {
            self.next_spawn_ms = now_ms + self.draw_gap(rng);
        }
        self.active = active;
    }

    /// Stop and forget any pending spawn.
    pub fn reset(&mut self) {
        self.active = false;
        self.next_spawn_ms = 0;
    }

    /// Returns `true` when a meteor should spawn this tick.
    pub fn tick<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> bool {
        if !self.active || now_ms < self.next_spawn_ms {
            return false;
        }
        self.next_spawn_ms = now_ms + self.draw_gap(rng);
        true
    }

    fn draw_gap<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let (min, max) = self.interval_ms;
        rng.gen_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fixed_interval_spawns_three_in_five_seconds() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut shower = MeteorShower::new((1500, 1500));
        shower.set_active(true, 0, &mut rng);

        let spawned: Vec<u64> = (0..=5000)
            .filter(|now| shower.tick(*now, &mut rng))
            .collect();
        assert_eq!(spawned, vec![1500, 3000, 4500]);
    }

    #[test]
    fn inactive_shower_never_spawns() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut shower = MeteorShower::new((10, 20));
        assert!((0..1000).all(|now| !shower.tick(now, &mut rng)));

        shower.set_active(true, 0, &mut rng);
        shower.set_active(false, 5, &mut rng);
        assert!((0..1000).all(|now| !shower.tick(now, &mut rng)));
    }

    #[test]
    fn gaps_stay_within_range() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut shower = MeteorShower::new((2000, 1000));
        shower.set_active(true, 0, &mut rng);
        assert!((1000..=2000).contains(&shower.next_spawn_ms()));

        let mut last = None;
        for now in 0..60_000u64 {
            if shower.tick(now, &mut rng) {
                if let Some(prev) = last {
                    let gap = now - prev;
                    assert!((1000..=2000).contains(&gap));
                }
                last = Some(now);
            }
        }
    }

    #[test]
    fn re_enabling_does_not_reschedule() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut shower = MeteorShower::new((1500, 1500));
        shower.set_active(true, 0, &mut rng);
        shower.set_active(true, 1000, &mut rng);
        assert_eq!(shower.next_spawn_ms(), 1500);
    }
}
