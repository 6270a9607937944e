//! Gesture classification from a single hand snapshot
//!
//! Rules are checked in priority order and the first match wins:
//!
//! | # | Rule                                         | Gesture           |
//! |---|----------------------------------------------|-------------------|
//! | 1 | thumb-index < 0.1                            | `pinch`           |
//! | 2 | index-middle < 0.1 and thumb-index > 0.2     | `twoFingers`      |
//! | 3 | index-wrist < 0.2                            | `fist`            |
//! | 4 | index-wrist > 0.4                            | `openPalm`        |
//! | 5 | index above wrist by more than 0.2           | `indexPointing`   |
//! | 6 | hand speed > 15 px/frame                     | `swipe*`          |
//!
//! Distances are 3D in normalized landmark space.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::landmarks::HandLandmarks;

const PINCH_DISTANCE: f32 = 0.1;
const TWO_FINGER_DISTANCE: f32 = 0.1;
const TWO_FINGER_THUMB_CLEARANCE: f32 = 0.2;
const FIST_REACH: f32 = 0.2;
const OPEN_PALM_REACH: f32 = 0.4;
const POINTING_RISE: f32 = 0.2;
const SWIPE_SPEED: f32 = 15.0;

/// Discrete hand gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gesture {
    IndexPointing,
    Fist,
    OpenPalm,
    Pinch,
    TwoFingers,
    FingerSnap,
    CircleMotion,
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
}

impl Gesture {
    /// Gestures that receive an action when a mapping table is generated.
    /// `fingerSnap` and `circleMotion` are never classified, and `swipeDown`
    /// never gets a mapping.
    pub const MAPPED: [Gesture; 10] = [
        Gesture::IndexPointing,
        Gesture::Fist,
        Gesture::OpenPalm,
        Gesture::Pinch,
        Gesture::TwoFingers,
        Gesture::FingerSnap,
        Gesture::CircleMotion,
        Gesture::SwipeLeft,
        Gesture::SwipeRight,
        Gesture::SwipeUp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::IndexPointing => "indexPointing",
            Gesture::Fist => "fist",
            Gesture::OpenPalm => "openPalm",
            Gesture::Pinch => "pinch",
            Gesture::TwoFingers => "twoFingers",
            Gesture::FingerSnap => "fingerSnap",
            Gesture::CircleMotion => "circleMotion",
            Gesture::SwipeLeft => "swipeLeft",
            Gesture::SwipeRight => "swipeRight",
            Gesture::SwipeUp => "swipeUp",
            Gesture::SwipeDown => "swipeDown",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a hand snapshot.
///
/// `velocity` is the cursor velocity in canvas pixels per frame. A hand
/// missing any of the wrist, thumb, index or middle tips yields `None`.
pub fn classify(hand: &HandLandmarks, velocity: Vec2) -> Option<Gesture> {
    let wrist = hand.wrist()?;
    let thumb = hand.thumb_tip()?;
    let index = hand.index_tip()?;
    let middle = hand.middle_tip()?;

    let thumb_index = thumb.distance(index);
    let index_middle = index.distance(middle);
    let index_wrist = index.distance(wrist);

    if thumb_index < PINCH_DISTANCE {
        return Some(Gesture::Pinch);
    }
    if index_middle < TWO_FINGER_DISTANCE && thumb_index > TWO_FINGER_THUMB_CLEARANCE {
        return Some(Gesture::TwoFingers);
    }
    if index_wrist < FIST_REACH {
        return Some(Gesture::Fist);
    }
    if index_wrist > OPEN_PALM_REACH {
        return Some(Gesture::OpenPalm);
    }
    if index.y < wrist.y - POINTING_RISE {
        return Some(Gesture::IndexPointing);
    }

    if velocity.length() > SWIPE_SPEED {
        let gesture = if velocity.x.abs() > velocity.y.abs() {
            if velocity.x > 0.0 {
                Gesture::SwipeRight
            } else {
                Gesture::SwipeLeft
            }
        } else if velocity.y > 0.0 {
            Gesture::SwipeDown
        } else {
            Gesture::SwipeUp
        };
        return Some(gesture);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    use crate::landmarks::{HAND_LANDMARK_COUNT, INDEX_TIP, MIDDLE_TIP, THUMB_TIP, WRIST};

    fn hand(wrist: Vec3, thumb: Vec3, index: Vec3, middle: Vec3) -> HandLandmarks {
        let mut points = vec![Vec3::ZERO; HAND_LANDMARK_COUNT];
        points[WRIST] = wrist;
        points[THUMB_TIP] = thumb;
        points[INDEX_TIP] = index;
        points[MIDDLE_TIP] = middle;
        HandLandmarks::new(points)
    }

    /// Neutral hand: no static rule fires
    fn relaxed() -> HandLandmarks {
        hand(
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(0.8, 0.5, 0.0),
            Vec3::new(0.5, 0.2, 0.0),
            Vec3::new(0.7, 0.2, 0.0),
        )
    }

    #[test]
    fn test_index_pointing() {
        let h = hand(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(0.0, -0.3, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
        );
        assert_eq!(classify(&h, Vec2::ZERO), Some(Gesture::IndexPointing));
    }

    #[test]
    fn test_pinch_beats_two_fingers() {
        let index = Vec3::new(0.3, 0.3, 0.0);
        let h = hand(Vec3::ZERO, index, index, Vec3::new(0.35, 0.3, 0.0));
        assert_eq!(classify(&h, Vec2::ZERO), Some(Gesture::Pinch));
    }

    #[test]
    fn test_two_fingers() {
        let h = hand(
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(0.9, 0.5, 0.0),
            Vec3::new(0.5, 0.2, 0.0),
            Vec3::new(0.55, 0.2, 0.0),
        );
        assert_eq!(classify(&h, Vec2::ZERO), Some(Gesture::TwoFingers));
    }

    #[test]
    fn test_fist_and_open_palm() {
        let fist = hand(
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(0.8, 0.5, 0.0),
            Vec3::new(0.5, 0.4, 0.0),
            Vec3::new(0.8, 0.8, 0.0),
        );
        assert_eq!(classify(&fist, Vec2::ZERO), Some(Gesture::Fist));

        let open = hand(
            Vec3::new(0.5, 0.9, 0.0),
            Vec3::new(0.9, 0.5, 0.0),
            Vec3::new(0.5, 0.3, 0.0),
            Vec3::new(0.7, 0.3, 0.0),
        );
        assert_eq!(classify(&open, Vec2::ZERO), Some(Gesture::OpenPalm));
    }

    #[test]
    fn test_swipes() {
        // Index level with the wrist, so only motion can classify
        let h = hand(
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(0.5, 0.8, 0.0),
            Vec3::new(0.8, 0.5, 0.0),
            Vec3::new(0.8, 0.7, 0.0),
        );
        assert_eq!(classify(&h, Vec2::new(10.0, 10.0)), None);
        assert_eq!(classify(&h, Vec2::new(20.0, 5.0)), Some(Gesture::SwipeRight));
        assert_eq!(classify(&h, Vec2::new(-20.0, 5.0)), Some(Gesture::SwipeLeft));
        assert_eq!(classify(&h, Vec2::new(3.0, 20.0)), Some(Gesture::SwipeDown));
        assert_eq!(classify(&h, Vec2::new(3.0, -20.0)), Some(Gesture::SwipeUp));
        // Ties go vertical
        assert_eq!(classify(&h, Vec2::new(-12.0, -12.0)), Some(Gesture::SwipeUp));
    }

    #[test]
    fn test_static_rules_beat_swipe() {
        assert_eq!(
            classify(&relaxed(), Vec2::new(100.0, 0.0)),
            Some(Gesture::IndexPointing)
        );
    }

    #[test]
    fn test_incomplete_hand() {
        let h = HandLandmarks::new(vec![Vec3::ZERO; 10]);
        assert_eq!(classify(&h, Vec2::new(100.0, 0.0)), None);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Gesture::IndexPointing).unwrap();
        assert_eq!(json, "\"indexPointing\"");
        assert_eq!(Gesture::SwipeDown.to_string(), "swipeDown");
    }
}
