//! Secret gesture-to-action table
//!
//! A table is rolled whenever live audio is switched on: the fourteen
//! actions are shuffled and the mapped gestures take them in order, so the
//! user has to discover what each gesture does.

use graphite_config::AudioConfig;
use graphite_tracking::Gesture;
use painting::RandomSource;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::AudioAction;

/// One gesture's action and its cooldown bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureMapping {
    pub gesture: Gesture,
    pub action: AudioAction,
    /// Confidence threshold; the classifier has no confidence, so unused
    pub threshold: f32,
    pub cooldown_ms: u64,
    /// Last time the mapping fired, `None` until it first does
    pub last_triggered_ms: Option<u64>,
}

impl GestureMapping {
    pub fn new(gesture: Gesture, action: AudioAction, cooldown_ms: u64) -> Self {
        Self {
            gesture,
            action,
            threshold: 0.0,
            cooldown_ms,
            last_triggered_ms: None,
        }
    }

    /// Whether the cooldown has run out at `now_ms`
    pub fn is_ready(&self, now_ms: u64) -> bool {
        match self.last_triggered_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.cooldown_ms,
            None => true,
        }
    }

    /// Record a trigger. The timestamp never moves backwards.
    pub fn mark_triggered(&mut self, now_ms: u64) {
        let last = self.last_triggered_ms.map_or(now_ms, |last| last.max(now_ms));
        self.last_triggered_ms = Some(last);
    }
}

/// Gesture mappings, at most one per gesture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingTable {
    mappings: Vec<GestureMapping>,
}

impl MappingTable {
    /// Roll a fresh table
    pub fn generate(config: &AudioConfig, rng: &mut impl RandomSource) -> Self {
        let mut actions = AudioAction::ALL;
        for i in (1..actions.len()).rev() {
            let j = rng.index(i + 1);
            actions.swap(i, j);
        }

        let mappings = Gesture::MAPPED
            .iter()
            .enumerate()
            .map(|(i, &gesture)| {
                let threshold = config.min_threshold + rng.next_f32() * config.threshold_jitter;
                let cooldown_ms = config.min_cooldown_ms
                    + (rng.next_f32() * config.cooldown_jitter_ms as f32) as u64;
                GestureMapping {
                    gesture,
                    action: actions[i % actions.len()],
                    threshold,
                    cooldown_ms,
                    last_triggered_ms: None,
                }
            })
            .collect::<Vec<_>>();

        for mapping in &mappings {
            debug!(
                "Mapping {} -> {} (cooldown {} ms)",
                mapping.gesture, mapping.action, mapping.cooldown_ms
            );
        }
        Self { mappings }
    }

    /// Build a table from explicit mappings. Later duplicates of a gesture
    /// are dropped.
    pub fn from_mappings(mappings: impl IntoIterator<Item = GestureMapping>) -> Self {
        let mut table = Self::default();
        for mapping in mappings {
            if table.get(mapping.gesture).is_none() {
                table.mappings.push(mapping);
            }
        }
        table
    }

    pub fn get(&self, gesture: Gesture) -> Option<&GestureMapping> {
        self.mappings.iter().find(|m| m.gesture == gesture)
    }

    pub fn get_mut(&mut self, gesture: Gesture) -> Option<&mut GestureMapping> {
        self.mappings.iter_mut().find(|m| m.gesture == gesture)
    }

    pub fn mappings(&self) -> &[GestureMapping] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
