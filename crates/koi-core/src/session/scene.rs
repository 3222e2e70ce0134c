//! Ephemeral scene entities: ripple markers and the bubble pool.
//!
//! All delays ride the session's logical clock, so dropping the scene
//! cancels every pending respawn.

use rand::Rng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// How long a ripple marker stays alive.
pub const RIPPLE_LIFETIME_MS: u64 = 1000;
/// Delay between popping a bubble and its replacement appearing.
pub const BUBBLE_RESPAWN_MS: u64 = 2000;
/// The bubble pool is held at this size by replacement-on-delay.
pub const BUBBLE_COUNT: usize = 5;
/// Cap on concurrent ripple markers; the oldest is evicted beyond this.
pub const MAX_RIPPLES: usize = 24;

/// Scene dimensions, used to place random entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for SceneBounds {
    fn default() -> Self {
        // Portrait phone canvas.
        Self {
            width: 390.0,
            height: 844.0,
        }
    }
}

/// A fire-and-forget tap marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ripple {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub age_ms: u64,
}

/// A poppable bubble. Popped bubbles linger invisibly until replaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub popped: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingRespawn {
    bubble_id: u64,
    remaining_ms: u64,
}

/// Transient entity state for one break scene.
#[derive(Debug)]
pub struct Scene {
    bounds: SceneBounds,
    rng: Pcg64,
    ripples: Vec<Ripple>,
    bubbles: Vec<Bubble>,
    respawns: Vec<PendingRespawn>,
    next_ripple_id: u64,
    next_bubble_id: u64,
}

impl Scene {
    pub fn new(bounds: SceneBounds, mut rng: Pcg64) -> Self {
        let mut next_bubble_id = 0;
        let bubbles = (0..BUBBLE_COUNT)
            .map(|_| {
                let b = spawn_bubble(&mut rng, bounds, next_bubble_id);
                next_bubble_id += 1;
                b
            })
            .collect();
        Self {
            bounds,
            rng,
            ripples: Vec::new(),
            bubbles,
            respawns: Vec::new(),
            next_ripple_id: 0,
            next_bubble_id,
        }
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// Count of bubbles that are visible and poppable.
    pub fn active_bubbles(&self) -> usize {
        self.bubbles.iter().filter(|b| !b.popped).count()
    }

    /// Advance all entity timers by `elapsed_ms`.
    pub fn advance(&mut self, elapsed_ms: u64, events: &mut Vec<Event>) {
        for ripple in &mut self.ripples {
            ripple.age_ms += elapsed_ms;
        }
        self.ripples.retain(|r| {
            if r.age_ms >= RIPPLE_LIFETIME_MS {
                events.push(Event::RippleFaded { id: r.id });
                false
            } else {
                true
            }
        });

        let mut due = Vec::new();
        for respawn in &mut self.respawns {
            respawn.remaining_ms = respawn.remaining_ms.saturating_sub(elapsed_ms);
            if respawn.remaining_ms == 0 {
                due.push(respawn.bubble_id);
            }
        }
        self.respawns.retain(|r| r.remaining_ms > 0);
        for old_id in due {
            self.bubbles.retain(|b| b.id != old_id);
            let bubble = spawn_bubble(&mut self.rng, self.bounds, self.next_bubble_id);
            self.next_bubble_id += 1;
            events.push(Event::BubbleRespawned {
                old_id,
                id: bubble.id,
            });
            self.bubbles.push(bubble);
        }
    }

    /// Add a ripple marker at a tap point, evicting the oldest when the
    /// concurrency cap is reached.
    pub fn spawn_ripple(&mut self, x: f32, y: f32, events: &mut Vec<Event>) {
        if self.ripples.len() >= MAX_RIPPLES {
            let oldest = self.ripples.remove(0);
            events.push(Event::RippleEvicted { id: oldest.id });
        }
        let id = self.next_ripple_id;
        self.next_ripple_id += 1;
        self.ripples.push(Ripple {
            id,
            x,
            y,
            age_ms: 0,
        });
        events.push(Event::RippleSpawned { id, x, y });
    }

    /// Pop an active bubble and schedule its replacement.
    ///
    /// Returns `None` if the id is unknown or already popped.
    pub fn pop_bubble(&mut self, id: u64) -> Option<Event> {
        let bubble = self.bubbles.iter_mut().find(|b| b.id == id && !b.popped)?;
        bubble.popped = true;
        self.respawns.push(PendingRespawn {
            bubble_id: id,
            remaining_ms: BUBBLE_RESPAWN_MS,
        });
        Some(Event::BubblePopped { id })
    }
}

fn spawn_bubble(rng: &mut Pcg64, bounds: SceneBounds, id: u64) -> Bubble {
    Bubble {
        id,
        x: position_with_margin(rng, bounds.width, 20.0),
        y: position_with_margin(rng, bounds.height, 150.0),
        size: rng.gen_range(20.0..40.0),
        popped: false,
    }
}

/// Random coordinate inside `extent`, keeping `margin` off both edges.
/// Extents too small for the margin collapse to the midpoint instead of
/// producing an empty range.
fn position_with_margin(rng: &mut Pcg64, extent: f32, margin: f32) -> f32 {
    if extent > 2.0 * margin {
        rng.gen_range(margin..extent - margin)
    } else {
        extent / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn scene() -> Scene {
        Scene::new(SceneBounds::default(), Pcg64::seed_from_u64(7))
    }

    #[test]
    fn starts_with_full_bubble_pool() {
        let s = scene();
        assert_eq!(s.bubbles().len(), BUBBLE_COUNT);
        assert_eq!(s.active_bubbles(), BUBBLE_COUNT);
    }

    #[test]
    fn bubbles_spawn_inside_bounds() {
        let s = scene();
        for b in s.bubbles() {
            assert!(b.x >= 20.0 && b.x <= s.bounds.width - 20.0);
            assert!(b.y >= 150.0 && b.y <= s.bounds.height - 150.0);
            assert!(b.size >= 20.0 && b.size < 40.0);
        }
    }

    #[test]
    fn tiny_bounds_place_bubbles_at_the_midpoint() {
        let s = Scene::new(
            SceneBounds {
                width: 30.0,
                height: 120.0,
            },
            Pcg64::seed_from_u64(7),
        );
        assert_eq!(s.bubbles().len(), BUBBLE_COUNT);
        for b in s.bubbles() {
            assert_eq!(b.x, 15.0);
            assert_eq!(b.y, 60.0);
        }
    }

    #[test]
    fn popped_bubble_is_replaced_after_delay() {
        let mut s = scene();
        let id = s.bubbles()[0].id;
        assert!(matches!(
            s.pop_bubble(id),
            Some(Event::BubblePopped { id: popped }) if popped == id
        ));
        assert_eq!(s.active_bubbles(), BUBBLE_COUNT - 1);

        let mut events = Vec::new();
        s.advance(BUBBLE_RESPAWN_MS - 1, &mut events);
        assert_eq!(s.active_bubbles(), BUBBLE_COUNT - 1);

        s.advance(1, &mut events);
        assert_eq!(s.active_bubbles(), BUBBLE_COUNT);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::BubbleRespawned { old_id, .. } if *old_id == id)));
        // The replacement gets a fresh id.
        assert!(s.bubbles().iter().all(|b| b.id != id));
    }

    #[test]
    fn popping_twice_is_a_no_op() {
        let mut s = scene();
        let id = s.bubbles()[0].id;
        assert!(s.pop_bubble(id).is_some());
        assert!(s.pop_bubble(id).is_none());
        assert!(s.pop_bubble(999).is_none());
    }

    #[test]
    fn ripples_fade_after_lifetime() {
        let mut s = scene();
        let mut events = Vec::new();
        s.spawn_ripple(10.0, 10.0, &mut events);
        assert_eq!(s.ripples().len(), 1);

        s.advance(RIPPLE_LIFETIME_MS, &mut events);
        assert!(s.ripples().is_empty());
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::RippleFaded { id: 0 })));
    }

    #[test]
    fn rapid_tapping_is_bounded() {
        let mut s = scene();
        let mut events = Vec::new();
        for i in 0..(MAX_RIPPLES + 10) {
            s.spawn_ripple(i as f32, i as f32, &mut events);
        }
        assert_eq!(s.ripples().len(), MAX_RIPPLES);
        let evicted = events
            .iter()
            .filter(|e| matches!(e, Event::RippleEvicted { .. }))
            .count();
        assert_eq!(evicted, 10);
        // Oldest went first.
        assert!(matches!(events
            .iter()
            .find(|e| matches!(e, Event::RippleEvicted { .. })),
            Some(Event::RippleEvicted { id: 0 })));
    }

    #[test]
    fn seeded_scenes_are_deterministic() {
        let a = scene();
        let b = scene();
        assert_eq!(a.bubbles(), b.bubbles());
    }
}
