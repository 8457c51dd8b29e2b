//! Keypoint record produced by the perception pipeline.
//!
//! The record has a fixed shape: 21 landmarks per hand, 33 pose landmarks
//! with a visibility score and 468 face landmarks, all with coordinates
//! normalized to the frame. How frames are acquired and how landmarks are
//! detected is up to the [`PerceptionSource`] implementation.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::RecognitionError;

pub const HAND_LANDMARKS: usize = 21;
pub const POSE_LANDMARKS: usize = 33;
pub const FACE_LANDMARKS: usize = 468;

/// A normalized landmark: `x`, `y` in frame units, `z` relative depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A pose landmark with the detector's visibility score in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandKeypoints {
    pub left: Vec<Landmark>,
    pub right: Vec<Landmark>,
}

/// Landmarks extracted from one capture frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoints {
    pub hands: HandKeypoints,
    pub pose: Vec<PoseLandmark>,
    pub face: Vec<Landmark>,
}

impl Keypoints {
    /// A correctly shaped record with every landmark at the origin.
    pub fn zeroed() -> Self {
        Self {
            hands: HandKeypoints {
                left: vec![Landmark::default(); HAND_LANDMARKS],
                right: vec![Landmark::default(); HAND_LANDMARKS],
            },
            pose: vec![PoseLandmark::default(); POSE_LANDMARKS],
            face: vec![Landmark::default(); FACE_LANDMARKS],
        }
    }

    /// Whether every landmark array has its fixed cardinality.
    pub fn is_well_formed(&self) -> bool {
        self.hands.left.len() == HAND_LANDMARKS
            && self.hands.right.len() == HAND_LANDMARKS
            && self.pose.len() == POSE_LANDMARKS
            && self.face.len() == FACE_LANDMARKS
    }
}

/// One captured camera frame.
#[derive(Debug, Clone, Default)]
pub struct CaptureFrame {
    pub width: u32,
    pub height: u32,
    /// Raw pixel bytes, layout defined by the capture device.
    pub data: Vec<u8>,
}

impl CaptureFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Perception pipeline turning frames into keypoint records.
pub trait PerceptionSource: Send + Sync {
    fn extract_keypoints(&self, frame: &CaptureFrame) -> Result<Keypoints, RecognitionError>;
}

/// Stand-in perception source emitting random, correctly shaped landmarks.
#[derive(Debug)]
pub struct PlaceholderPerception<R = StdRng> {
    rng: Mutex<R>,
}

impl PlaceholderPerception<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl Default for PlaceholderPerception<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng + Send> PlaceholderPerception<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

fn random_landmark<R: Rng>(rng: &mut R) -> Landmark {
    Landmark {
        x: rng.random(),
        y: rng.random(),
        z: rng.random::<f32>() * 0.1,
    }
}

impl<R: Rng + Send> PerceptionSource for PlaceholderPerception<R> {
    fn extract_keypoints(&self, frame: &CaptureFrame) -> Result<Keypoints, RecognitionError> {
        if frame.is_empty() {
            return Err(RecognitionError::Perception(format!(
                "empty frame {}x{}",
                frame.width, frame.height
            )));
        }

        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        let rng = &mut *rng;
        let left = (0..HAND_LANDMARKS).map(|_| random_landmark(rng)).collect();
        let right = (0..HAND_LANDMARKS).map(|_| random_landmark(rng)).collect();
        let pose = (0..POSE_LANDMARKS)
            .map(|_| {
                let point = random_landmark(rng);
                PoseLandmark {
                    x: point.x,
                    y: point.y,
                    z: point.z,
                    visibility: rng.random(),
                }
            })
            .collect();
        let face = (0..FACE_LANDMARKS).map(|_| random_landmark(rng)).collect();

        Ok(Keypoints {
            hands: HandKeypoints { left, right },
            pose,
            face,
        })
    }
}
