//! Tracking signals to drawing parameters
//!
//! The mapper is a pure computation over the current frame's signals and the
//! active style. Its only memory is the last mapped opacity, which is held
//! when face tilt is requested but no face is visible.

use glam::Vec2;
use tracing::debug;

use crate::constants::{
    ERASE_SMUDGE, OPACITY_RANGE, PRESSURE_RANGE, SPEED_NORMALIZER, WIDTH_RANGE,
};
use crate::random::RandomSource;
use crate::style::StyleConfig;

/// Per-frame stroke parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingParameters {
    /// 0.1-1.0
    pub pressure: f32,
    /// Line width in pixels, 0.2-5.0
    pub stroke_width: f32,
    /// 0.1-0.9
    pub opacity: f32,
    /// 0.0-1.0
    pub smudge_factor: f32,
}

impl Default for DrawingParameters {
    fn default() -> Self {
        Self {
            pressure: 0.5,
            stroke_width: 0.5,
            opacity: 0.6,
            smudge_factor: 0.0,
        }
    }
}

/// Signals read from the current frame
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalInputs {
    /// Raw hand velocity in pixels per frame
    pub velocity: Vec2,
    /// Microphone level 0.0-1.0
    pub audio_level: f32,
    /// Vertical eye offset, `None` without a usable face
    pub face_tilt: Option<f32>,
}

/// Hand speed scaled to 0.0-1.0
pub fn normalized_speed(velocity: Vec2) -> f32 {
    (velocity.length() / SPEED_NORMALIZER).min(1.0)
}

/// Maps signals to parameters, holding opacity across faceless frames
#[derive(Debug, Clone)]
pub struct ParameterMapper {
    held_opacity: f32,
}

impl Default for ParameterMapper {
    fn default() -> Self {
        Self {
            held_opacity: DrawingParameters::default().opacity,
        }
    }
}

impl ParameterMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opacity that will be reused while the face is missing
    pub fn held_opacity(&self) -> f32 {
        self.held_opacity
    }

    /// Compute this frame's parameters.
    ///
    /// Draws exactly one value from `rng`, and only when the style has
    /// `occasional_erase` set.
    pub fn map(
        &mut self,
        inputs: &SignalInputs,
        style: &StyleConfig,
        rng: &mut impl RandomSource,
    ) -> DrawingParameters {
        let speed = normalized_speed(inputs.velocity);

        let pressure = if style.pressure_from_audio {
            inputs.audio_level * style.audio_sensitivity
        } else {
            1.0 - speed
        };
        let pressure = clamp(pressure, PRESSURE_RANGE);

        let stroke_width = if style.width_from_hand_speed {
            style.base_width * (1.0 - speed * style.hand_speed_sensitivity)
        } else {
            style.base_width * pressure
        };
        let mut stroke_width = clamp(stroke_width, WIDTH_RANGE);

        let mut opacity = if style.opacity_from_face_tilt {
            match inputs.face_tilt {
                Some(tilt) => clamp(
                    style.base_opacity * (1.0 + tilt * style.face_tilt_sensitivity),
                    OPACITY_RANGE,
                ),
                None => self.held_opacity,
            }
        } else {
            clamp(style.base_opacity, OPACITY_RANGE)
        };
        self.held_opacity = opacity;

        let mut smudge_factor = if style.smudge_from_stillness
            && style.smudge_threshold > 0.0
            && speed < style.smudge_threshold
        {
            1.0 - speed / style.smudge_threshold
        } else {
            0.0
        };

        if style.occasional_erase && rng.next_f32() > style.erase_threshold {
            opacity = clamp(opacity * 0.1, OPACITY_RANGE);
            stroke_width = clamp(stroke_width * 2.0, WIDTH_RANGE);
            smudge_factor = ERASE_SMUDGE;
            debug!("ParameterMapper::map: erase override this frame");
        }

        DrawingParameters {
            pressure,
            stroke_width,
            opacity,
            smudge_factor: smudge_factor.clamp(0.0, 1.0),
        }
    }
}

#[inline]
fn clamp(value: f32, (min, max): (f32, f32)) -> f32 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;

    fn quiet_style() -> StyleConfig {
        StyleConfig {
            occasional_erase: false,
            ..StyleConfig::charcoal()
        }
    }

    fn in_ranges(p: &DrawingParameters) -> bool {
        (0.1..=1.0).contains(&p.pressure)
            && (0.2..=5.0).contains(&p.stroke_width)
            && (0.1..=0.9).contains(&p.opacity)
            && (0.0..=1.0).contains(&p.smudge_factor)
    }

    #[test]
    fn test_normalized_speed_caps_at_one() {
        assert_eq!(normalized_speed(Vec2::ZERO), 0.0);
        assert!((normalized_speed(Vec2::new(15.0, 0.0)) - 0.5).abs() < 1e-6);
        assert_eq!(normalized_speed(Vec2::new(300.0, 400.0)), 1.0);
    }

    #[test]
    fn test_pressure_from_audio() {
        let mut mapper = ParameterMapper::new();
        let mut rng = SequenceRandom::default();
        let inputs = SignalInputs {
            audio_level: 0.3,
            ..Default::default()
        };
        let params = mapper.map(&inputs, &quiet_style(), &mut rng);
        assert!((params.pressure - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_pressure_from_stillness() {
        let mut mapper = ParameterMapper::new();
        let mut rng = SequenceRandom::default();
        let style = StyleConfig {
            pressure_from_audio: false,
            width_from_hand_speed: false,
            ..quiet_style()
        };
        let inputs = SignalInputs {
            velocity: Vec2::new(15.0, 0.0),
            ..Default::default()
        };
        let params = mapper.map(&inputs, &style, &mut rng);
        assert!((params.pressure - 0.5).abs() < 1e-6);
        // Width follows pressure when not driven by speed
        assert!((params.stroke_width - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_width_shrinks_with_speed() {
        let mut mapper = ParameterMapper::new();
        let mut rng = SequenceRandom::default();
        let still = mapper.map(&SignalInputs::default(), &quiet_style(), &mut rng);
        let fast = mapper.map(
            &SignalInputs {
                velocity: Vec2::new(60.0, 0.0),
                ..Default::default()
            },
            &quiet_style(),
            &mut rng,
        );
        assert!((still.stroke_width - 1.8).abs() < 1e-6);
        // 1.8 * (1 - 1.2) is negative, so the floor applies
        assert_eq!(fast.stroke_width, 0.2);
    }

    #[test]
    fn test_opacity_from_face_tilt() {
        let mut mapper = ParameterMapper::new();
        let mut rng = SequenceRandom::default();
        let inputs = SignalInputs {
            face_tilt: Some(0.1),
            ..Default::default()
        };
        let params = mapper.map(&inputs, &quiet_style(), &mut rng);
        assert!((params.opacity - 0.77).abs() < 1e-6);
    }

    #[test]
    fn test_opacity_held_without_face() {
        let mut mapper = ParameterMapper::new();
        let mut rng = SequenceRandom::default();
        let tilted = SignalInputs {
            face_tilt: Some(0.2),
            ..Default::default()
        };
        let first = mapper.map(&tilted, &quiet_style(), &mut rng);
        let faceless = mapper.map(&SignalInputs::default(), &quiet_style(), &mut rng);
        assert_eq!(first.opacity, faceless.opacity);
        assert!((faceless.opacity - 0.84).abs() < 1e-6);
    }

    #[test]
    fn test_opacity_base_when_tilt_disabled() {
        let mut mapper = ParameterMapper::new();
        let mut rng = SequenceRandom::default();
        let style = StyleConfig {
            opacity_from_face_tilt: false,
            ..quiet_style()
        };
        let params = mapper.map(&SignalInputs::default(), &style, &mut rng);
        assert!((params.opacity - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_smudge_from_stillness() {
        let mut mapper = ParameterMapper::new();
        let mut rng = SequenceRandom::default();
        let still = mapper.map(&SignalInputs::default(), &quiet_style(), &mut rng);
        assert_eq!(still.smudge_factor, 1.0);

        // normalized speed 0.1 against threshold 0.25
        let slow = mapper.map(
            &SignalInputs {
                velocity: Vec2::new(3.0, 0.0),
                ..Default::default()
            },
            &quiet_style(),
            &mut rng,
        );
        assert!((slow.smudge_factor - 0.6).abs() < 1e-5);

        let fast = mapper.map(
            &SignalInputs {
                velocity: Vec2::new(0.0, 9.0),
                ..Default::default()
            },
            &quiet_style(),
            &mut rng,
        );
        assert_eq!(fast.smudge_factor, 0.0);
    }

    #[test]
    fn test_erase_override() {
        let mut mapper = ParameterMapper::new();
        let style = StyleConfig::charcoal();
        let inputs = SignalInputs {
            velocity: Vec2::new(30.0, 0.0),
            audio_level: 0.5,
            face_tilt: Some(0.0),
        };

        let mut no_erase = SequenceRandom::constant(0.5);
        let normal = mapper.map(&inputs, &style, &mut no_erase);
        assert_eq!(normal.smudge_factor, 0.0);
        assert!((normal.opacity - 0.7).abs() < 1e-6);

        let mut erase = SequenceRandom::constant(0.95);
        let erased = mapper.map(&inputs, &style, &mut erase);
        assert_eq!(erased.smudge_factor, 0.8);
        assert!((erased.stroke_width - normal.stroke_width * 2.0).abs() < 1e-6);
        assert_eq!(erased.opacity, 0.1);

        // Not sticky: the next frame rolls again
        let again = mapper.map(&inputs, &style, &mut no_erase);
        assert_eq!(again, normal);
    }

    #[test]
    fn test_outputs_stay_in_range() {
        let mut mapper = ParameterMapper::new();
        let velocities = [
            Vec2::ZERO,
            Vec2::new(1.0, 1.0),
            Vec2::new(-1e6, 1e6),
            Vec2::new(f32::MAX, 0.0),
        ];
        let levels = [0.0, 0.5, 1.0, 50.0];
        let tilts = [None, Some(0.0), Some(1.0), Some(100.0)];
        let styles = [
            StyleConfig::charcoal(),
            StyleConfig {
                pressure_from_audio: false,
                width_from_hand_speed: false,
                opacity_from_face_tilt: false,
                smudge_from_stillness: false,
                base_width: 100.0,
                base_opacity: 5.0,
                ..StyleConfig::charcoal()
            },
            StyleConfig {
                audio_sensitivity: 0.0,
                base_width: 0.0,
                base_opacity: 0.0,
                smudge_threshold: 0.0,
                erase_threshold: 0.0,
                ..StyleConfig::charcoal()
            },
        ];

        let mut rng = SequenceRandom::new(vec![0.0, 0.99, 0.5, 0.93]);
        for style in &styles {
            for &velocity in &velocities {
                for &audio_level in &levels {
                    for &face_tilt in &tilts {
                        let inputs = SignalInputs {
                            velocity,
                            audio_level,
                            face_tilt,
                        };
                        let params = mapper.map(&inputs, style, &mut rng);
                        assert!(in_ranges(&params), "{params:?} for {inputs:?}");
                    }
                }
            }
        }
    }
}
