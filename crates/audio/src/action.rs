//! Audio actions and playback effects

use std::fmt;

use serde::{Deserialize, Serialize};

/// Effect a recording can be routed through on playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectKind {
    Reverb,
    Delay,
    Distortion,
    PitchShift,
    Chorus,
    Tremolo,
    AutoFilter,
    BitCrusher,
}

impl EffectKind {
    pub const ALL: [EffectKind; 8] = [
        EffectKind::Reverb,
        EffectKind::Delay,
        EffectKind::Distortion,
        EffectKind::PitchShift,
        EffectKind::Chorus,
        EffectKind::Tremolo,
        EffectKind::AutoFilter,
        EffectKind::BitCrusher,
    ];
}

/// What a gesture triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioAction {
    StartRecording,
    StopRecording,
    PlayLastRecording,
    ApplyReverb,
    ApplyDelay,
    ApplyDistortion,
    ApplyPitchShift,
    ApplyChorus,
    ApplyTremolo,
    ApplyAutoFilter,
    ApplyBitCrusher,
    ClearEffects,
    LoopToggle,
    DeleteLastRecording,
}

impl AudioAction {
    pub const ALL: [AudioAction; 14] = [
        AudioAction::StartRecording,
        AudioAction::StopRecording,
        AudioAction::PlayLastRecording,
        AudioAction::ApplyReverb,
        AudioAction::ApplyDelay,
        AudioAction::ApplyDistortion,
        AudioAction::ApplyPitchShift,
        AudioAction::ApplyChorus,
        AudioAction::ApplyTremolo,
        AudioAction::ApplyAutoFilter,
        AudioAction::ApplyBitCrusher,
        AudioAction::ClearEffects,
        AudioAction::LoopToggle,
        AudioAction::DeleteLastRecording,
    ];

    /// Effect named by an `apply*` action
    pub fn effect(&self) -> Option<EffectKind> {
        match self {
            AudioAction::ApplyReverb => Some(EffectKind::Reverb),
            AudioAction::ApplyDelay => Some(EffectKind::Delay),
            AudioAction::ApplyDistortion => Some(EffectKind::Distortion),
            AudioAction::ApplyPitchShift => Some(EffectKind::PitchShift),
            AudioAction::ApplyChorus => Some(EffectKind::Chorus),
            AudioAction::ApplyTremolo => Some(EffectKind::Tremolo),
            AudioAction::ApplyAutoFilter => Some(EffectKind::AutoFilter),
            AudioAction::ApplyBitCrusher => Some(EffectKind::BitCrusher),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioAction::StartRecording => "startRecording",
            AudioAction::StopRecording => "stopRecording",
            AudioAction::PlayLastRecording => "playLastRecording",
            AudioAction::ApplyReverb => "applyReverb",
            AudioAction::ApplyDelay => "applyDelay",
            AudioAction::ApplyDistortion => "applyDistortion",
            AudioAction::ApplyPitchShift => "applyPitchShift",
            AudioAction::ApplyChorus => "applyChorus",
            AudioAction::ApplyTremolo => "applyTremolo",
            AudioAction::ApplyAutoFilter => "applyAutoFilter",
            AudioAction::ApplyBitCrusher => "applyBitCrusher",
            AudioAction::ClearEffects => "clearEffects",
            AudioAction::LoopToggle => "loopToggle",
            AudioAction::DeleteLastRecording => "deleteLastRecording",
        }
    }
}

impl fmt::Display for AudioAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
