//! Sound and particle cues
//!
//! The simulation never plays anything. Hosts map collision events to cues
//! here and hand them to whatever audio backend they have.

use crate::config::EffectHints;
use crate::sim::{BuffId, CollisionEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Normal food eaten
    Eat,
    /// Legendary eaten; hosts pick the cry by buff id
    LegendaryCry(Option<BuffId>),
    /// Enemy contact cost points
    EnemyHit,
    /// Enemy contact absorbed by immunity
    Deflect,
    /// Area item picked up
    ItemPickup,
    /// Wall or self collision
    GameOver,
    /// Game over with a new best score
    HighScore,
}

impl SoundEffect {
    /// Cue for a collision event
    pub fn for_event(event: &CollisionEvent) -> SoundEffect {
        match event {
            CollisionEvent::FoodEaten { .. } => SoundEffect::Eat,
            CollisionEvent::LegendaryEaten { id, .. } => SoundEffect::LegendaryCry(*id),
            CollisionEvent::AreaItemCollected { .. } => SoundEffect::ItemPickup,
            CollisionEvent::EnemyHit { .. } => SoundEffect::EnemyHit,
            CollisionEvent::Deflected { .. } => SoundEffect::Deflect,
            CollisionEvent::Terminal { .. } => SoundEffect::GameOver,
        }
    }
}

impl EffectHints {
    /// Explosion particle count for an eat event, `None` for everything else
    pub fn particles_for(&self, event: &CollisionEvent) -> Option<u32> {
        match event {
            CollisionEvent::FoodEaten { .. } => Some(self.normal_explosion_particles),
            CollisionEvent::LegendaryEaten { .. } => Some(self.legendary_explosion_particles),
            _ => None,
        }
    }
}

/// Host-side audio backend
pub trait CuePlayer {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Audio manager for the game
///
/// Owns the volume settings and forwards audible cues to a backend.
pub struct AudioManager<P: CuePlayer> {
    player: P,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<P: CuePlayer> AudioManager<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.player.play(effect, vol);
    }

    /// Play the cue for every collision event of a tick.
    /// A new best swaps the game over cue for the high score one.
    pub fn play_events(&mut self, events: &[CollisionEvent], new_best: bool) {
        for event in events {
            let effect = match SoundEffect::for_event(event) {
                SoundEffect::GameOver if new_best => SoundEffect::HighScore,
                effect => effect,
            };
            self.play(effect);
        }
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}

/// Backend that only logs, for headless runs
#[derive(Debug, Default)]
pub struct CueLog {
    pub played: Vec<SoundEffect>,
}

impl CuePlayer for CueLog {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("cue {:?} at volume {:.2}", effect, volume);
        self.played.push(effect);
    }
}
