//! Discrete notifications for collaborators (audio, screen shake, HUD flashes).
//!
//! The simulation pushes events while it ticks; the host drains them once per
//! frame. Nothing here ever blocks the simulation.

use glam::Vec3;

use crate::missile::MissileKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    MissileFired { kind: MissileKind, position: Vec3 },
    Explosion { position: Vec3, big: bool },
    Crash { position: Vec3 },
    /// A cannon was destroyed by a player missile.
    CannonDestroyed { position: Vec3 },
    /// The aircraft was hit and is going down.
    ShotDown { position: Vec3 },
}

#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SimEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Take everything queued since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_in_order() {
        let mut q = EventQueue::new();
        q.push(SimEvent::Crash { position: Vec3::ZERO });
        q.push(SimEvent::Explosion { position: Vec3::ONE, big: true });
        let drained = q.drain();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[0], SimEvent::Crash { .. }));
        assert!(q.is_empty());
    }
}
