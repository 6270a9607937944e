//! Gesture to audio action dispatch
//!
//! Each dispatch looks up the gesture's mapping, honours its cooldown, runs
//! the action through its probability gate and then takes one extra roll
//! that may start a recording on its own. The cooldown is consumed even
//! when the gate suppresses the action.

use graphite_tracking::Gesture;
use painting::RandomSource;
use tracing::debug;

use crate::action::AudioAction;
use crate::backend::AudioBackend;
use crate::mapping::MappingTable;
use crate::studio::{AudioStudio, StudioEvent};

/// Result of dispatching one gesture
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// No mapping for the gesture
    Unmapped,
    /// The mapping fired too recently
    CoolingDown,
    /// The mapping fired; `events` lists what actually happened
    Triggered {
        action: AudioAction,
        events: Vec<StudioEvent>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct GestureDispatcher {
    table: MappingTable,
}

impl GestureDispatcher {
    pub fn new(table: MappingTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// Swap in a freshly rolled table
    pub fn replace_table(&mut self, table: MappingTable) {
        self.table = table;
    }

    pub fn dispatch<B: AudioBackend>(
        &mut self,
        gesture: Gesture,
        now_ms: u64,
        studio: &mut AudioStudio<B>,
        rng: &mut impl RandomSource,
    ) -> DispatchOutcome {
        let Some(mapping) = self.table.get_mut(gesture) else {
            return DispatchOutcome::Unmapped;
        };
        if !mapping.is_ready(now_ms) {
            return DispatchOutcome::CoolingDown;
        }

        let action = mapping.action;
        mapping.mark_triggered(now_ms);
        debug!("Gesture {gesture} triggered {action}");

        let mut events = execute(action, now_ms, studio, rng);

        let spontaneous = studio.config().spontaneous_recording_probability;
        if !studio.is_recording() && rng.chance(spontaneous) {
            events.extend(studio.start_recording(now_ms, rng));
        }

        DispatchOutcome::Triggered { action, events }
    }
}

fn execute<B: AudioBackend>(
    action: AudioAction,
    now_ms: u64,
    studio: &mut AudioStudio<B>,
    rng: &mut impl RandomSource,
) -> Vec<StudioEvent> {
    let recording_probability = studio.config().recording_probability;
    let playback_probability = studio.config().playback_probability;

    match action {
        AudioAction::StartRecording => {
            if !studio.is_recording() && rng.chance(recording_probability) {
                studio.start_recording(now_ms, rng).into_iter().collect()
            } else {
                Vec::new()
            }
        }
        AudioAction::StopRecording => studio.stop_recording(rng),
        AudioAction::PlayLastRecording => {
            if rng.chance(playback_probability) {
                studio.play_last(rng).into_iter().collect()
            } else {
                Vec::new()
            }
        }
        AudioAction::ClearEffects => {
            studio.clear_effects();
            Vec::new()
        }
        AudioAction::LoopToggle => {
            studio.toggle_loop();
            Vec::new()
        }
        AudioAction::DeleteLastRecording => {
            studio.delete_last();
            Vec::new()
        }
        // Effects are picked at playback time
        AudioAction::ApplyReverb
        | AudioAction::ApplyDelay
        | AudioAction::ApplyDistortion
        | AudioAction::ApplyPitchShift
        | AudioAction::ApplyChorus
        | AudioAction::ApplyTremolo
        | AudioAction::ApplyAutoFilter
        | AudioAction::ApplyBitCrusher => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LoggingBackend;
    use crate::mapping::GestureMapping;
    use graphite_config::AudioConfig;
    use painting::SequenceRandom;

    fn studio() -> AudioStudio<LoggingBackend> {
        let mut studio = AudioStudio::new(LoggingBackend::default(), AudioConfig::default());
        studio.set_live(true);
        studio
    }

    fn dispatcher(action: AudioAction) -> GestureDispatcher {
        GestureDispatcher::new(MappingTable::from_mappings([GestureMapping::new(
            Gesture::Fist,
            action,
            1000,
        )]))
    }

    #[test]
    fn test_unmapped_gesture() {
        let mut d = dispatcher(AudioAction::LoopToggle);
        let mut s = studio();
        let mut rng = SequenceRandom::default();
        assert_eq!(
            d.dispatch(Gesture::SwipeDown, 0, &mut s, &mut rng),
            DispatchOutcome::Unmapped
        );
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_cooldown_boundary() {
        let mut d = dispatcher(AudioAction::LoopToggle);
        let mut s = studio();
        // side roll never hits
        let mut rng = SequenceRandom::constant(0.9);

        assert!(matches!(
            d.dispatch(Gesture::Fist, 0, &mut s, &mut rng),
            DispatchOutcome::Triggered { .. }
        ));
        assert!(s.is_looping());

        assert_eq!(
            d.dispatch(Gesture::Fist, 999, &mut s, &mut rng),
            DispatchOutcome::CoolingDown
        );
        assert!(s.is_looping());

        assert!(matches!(
            d.dispatch(Gesture::Fist, 1000, &mut s, &mut rng),
            DispatchOutcome::Triggered { .. }
        ));
        assert!(!s.is_looping());
    }

    #[test]
    fn test_gate_miss_still_consumes_cooldown() {
        let mut d = dispatcher(AudioAction::StartRecording);
        let mut s = studio();
        let mut rng = SequenceRandom::constant(0.9);

        let outcome = d.dispatch(Gesture::Fist, 0, &mut s, &mut rng);
        assert_eq!(
            outcome,
            DispatchOutcome::Triggered {
                action: AudioAction::StartRecording,
                events: vec![]
            }
        );
        assert!(!s.is_recording());
        assert_eq!(
            d.table().get(Gesture::Fist).and_then(|m| m.last_triggered_ms),
            Some(0)
        );
    }

    #[test]
    fn test_start_recording_gate_hit() {
        let mut d = dispatcher(AudioAction::StartRecording);
        let mut s = studio();
        // gate 0.1 < 0.15, length draw, no side roll while recording
        let mut rng = SequenceRandom::new(vec![0.1, 0.0]);

        let outcome = d.dispatch(Gesture::Fist, 0, &mut s, &mut rng);
        assert_eq!(
            outcome,
            DispatchOutcome::Triggered {
                action: AudioAction::StartRecording,
                events: vec![StudioEvent::RecordingStarted { length_ms: 2000 }]
            }
        );
        assert!(s.is_recording());
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_spontaneous_recording() {
        let mut d = dispatcher(AudioAction::ApplyChorus);
        let mut s = studio();
        // side roll 0.01 < 0.05, then the length draw
        let mut rng = SequenceRandom::new(vec![0.01, 0.0]);

        let outcome = d.dispatch(Gesture::Fist, 0, &mut s, &mut rng);
        assert_eq!(
            outcome,
            DispatchOutcome::Triggered {
                action: AudioAction::ApplyChorus,
                events: vec![StudioEvent::RecordingStarted { length_ms: 2000 }]
            }
        );
    }

    #[test]
    fn test_stop_and_delete() {
        let mut s = studio();
        let mut rng = SequenceRandom::constant(0.9);
        s.start_recording(0, &mut rng);

        let mut stop = dispatcher(AudioAction::StopRecording);
        let outcome = stop.dispatch(Gesture::Fist, 100, &mut s, &mut rng);
        assert!(matches!(
            outcome,
            DispatchOutcome::Triggered { ref events, .. }
                if events == &vec![StudioEvent::RecordingStored { id: 1 }]
        ));
        assert_eq!(s.recording_count(), 1);

        let mut delete = dispatcher(AudioAction::DeleteLastRecording);
        delete.dispatch(Gesture::Fist, 200, &mut s, &mut rng);
        assert_eq!(s.recording_count(), 0);
    }
}
