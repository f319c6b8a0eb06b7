use crate::annotation::domain::frame_annotator::{FrameAnnotator, PersonPose};
use crate::pose::domain::landmark::{Landmark, Pose};
use crate::pose::domain::skeleton::POSE_CONNECTIONS;
use crate::shared::bounding_box::PixelRect;
use crate::shared::constants::LANDMARK_VISIBILITY_THRESHOLD;
use crate::shared::frame::Frame;
use crate::shared::BoxError;

use super::bitmap_font::draw_text;
use super::raster::{draw_line, fill_circle};

pub const CONNECTION_COLOR: [u8; 3] = [230, 66, 245];
pub const LANDMARK_COLOR: [u8; 3] = [66, 117, 245];
pub const LABEL_COLOR: [u8; 3] = [0, 255, 0];

const CONNECTION_THICKNESS: i32 = 2;
const LANDMARK_RADIUS: i32 = 2;
const LABEL_SCALE: i32 = 3;

/// Baseline offsets of the five angle labels relative to the box's top edge.
pub const LABEL_OFFSETS: [i32; 5] = [-20, 20, 60, 100, 140];

/// CPU annotator drawing the landmark skeleton and angle labels.
///
/// The skeleton is positioned by mapping crop-normalized landmarks back
/// through the person's crop rectangle. Landmarks that are not visible
/// enough, or that fall outside the crop, are skipped along with their
/// connections.
#[derive(Default)]
pub struct CpuPoseAnnotator;

impl CpuPoseAnnotator {
    pub fn new() -> Self {
        Self
    }
}

impl FrameAnnotator for CpuPoseAnnotator {
    fn annotate(&self, frame: &mut Frame, person: &PersonPose) -> Result<(), BoxError> {
        if let Some(pose) = &person.pose {
            draw_skeleton(frame, pose, &person.rect);
        }

        if let Some(angles) = &person.angles {
            let (x, y) = person.bbox.anchor();
            for (label, offset) in angles.labels().iter().zip(LABEL_OFFSETS) {
                draw_text(frame, x, y.saturating_add(offset), label, LABEL_SCALE, LABEL_COLOR);
            }
        }
        Ok(())
    }
}

fn drawable(landmark: &Landmark) -> bool {
    landmark.visibility >= LANDMARK_VISIBILITY_THRESHOLD
        && (0.0..=1.0).contains(&landmark.x)
        && (0.0..=1.0).contains(&landmark.y)
}

fn draw_skeleton(frame: &mut Frame, pose: &Pose, rect: &PixelRect) {
    let points: Vec<Option<(i32, i32)>> = pose
        .landmarks()
        .iter()
        .map(|lm| drawable(lm).then(|| rect.denormalize(lm.x, lm.y)))
        .collect();

    for (a, b) in POSE_CONNECTIONS {
        if let (Some(from), Some(to)) = (points[a.index()], points[b.index()]) {
            draw_line(frame, from, to, CONNECTION_THICKNESS, CONNECTION_COLOR);
        }
    }
    for (cx, cy) in points.iter().flatten() {
        fill_circle(frame, *cx, *cy, LANDMARK_RADIUS, LANDMARK_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::domain::joint_angle::JointAngles;
    use crate::pose::domain::landmark::{PoseLandmark, NUM_LANDMARKS};
    use crate::shared::bounding_box::BoundingBox;

    const BLACK: [u8; 3] = [0, 0, 0];

    fn count(frame: &Frame, color: [u8; 3]) -> usize {
        frame.data().chunks_exact(3).filter(|px| *px == color).count()
    }

    fn person(bbox: BoundingBox, pose: Option<Pose>) -> PersonPose {
        let rect = bbox.to_pixel_rect(200, 200).unwrap();
        let angles = pose.as_ref().map(JointAngles::from_pose);
        PersonPose {
            bbox,
            rect,
            pose,
            angles,
        }
    }

    fn pose_with(visibility: f64) -> Pose {
        let mut landmarks = [Landmark::new(0.5, 0.5, visibility); NUM_LANDMARKS];
        landmarks[PoseLandmark::LeftShoulder.index()] = Landmark::new(0.2, 0.3, visibility);
        landmarks[PoseLandmark::LeftElbow.index()] = Landmark::new(0.2, 0.6, visibility);
        Pose::new(landmarks)
    }

    #[test]
    fn test_no_pose_no_angles_leaves_frame_untouched() {
        let mut frame = Frame::filled(200, 200, BLACK, 0);
        let before = frame.data().to_vec();
        let mut p = person(BoundingBox::new(50.0, 50.0, 150.0, 150.0, 0.9), None);
        p.angles = None;
        CpuPoseAnnotator::new().annotate(&mut frame, &p).unwrap();
        assert_eq!(frame.data(), &before[..]);
    }

    #[test]
    fn test_visible_pose_draws_landmarks_and_connections() {
        let mut frame = Frame::filled(200, 200, BLACK, 0);
        let mut p = person(
            BoundingBox::new(100.0, 100.0, 200.0, 200.0, 0.9),
            Some(pose_with(1.0)),
        );
        p.angles = None;
        CpuPoseAnnotator::new().annotate(&mut frame, &p).unwrap();

        assert!(count(&frame, LANDMARK_COLOR) > 0);
        assert!(count(&frame, CONNECTION_COLOR) > 0);
        // Shoulder at (0.2, 0.3) of the crop → frame (120, 130)
        assert_eq!(frame.pixel(120, 130), Some(&LANDMARK_COLOR[..]));
        // Nothing left of the crop
        assert_eq!(frame.pixel(50, 150), Some(&BLACK[..]));
    }

    #[test]
    fn test_low_visibility_is_not_drawn() {
        let mut frame = Frame::filled(200, 200, BLACK, 0);
        let mut p = person(
            BoundingBox::new(0.0, 0.0, 100.0, 100.0, 0.9),
            Some(pose_with(0.2)),
        );
        p.angles = None;
        CpuPoseAnnotator::new().annotate(&mut frame, &p).unwrap();
        assert_eq!(count(&frame, LANDMARK_COLOR), 0);
        assert_eq!(count(&frame, CONNECTION_COLOR), 0);
    }

    #[test]
    fn test_landmark_outside_crop_is_skipped() {
        let mut landmarks = [Landmark::new(1.5, 0.5, 1.0); NUM_LANDMARKS];
        landmarks[0] = Landmark::new(0.5, 0.5, 1.0);
        let mut frame = Frame::filled(200, 200, BLACK, 0);
        let mut p = person(
            BoundingBox::new(0.0, 0.0, 100.0, 100.0, 0.9),
            Some(Pose::new(landmarks)),
        );
        p.angles = None;
        CpuPoseAnnotator::new().annotate(&mut frame, &p).unwrap();
        assert_eq!(count(&frame, CONNECTION_COLOR), 0);
        // Only the nose disc: radius 2 → 21 pixels
        assert_eq!(count(&frame, LANDMARK_COLOR), 21);
    }

    #[test]
    fn test_angles_draw_green_labels() {
        let mut frame = Frame::filled(200, 200, BLACK, 0);
        let p = person(
            BoundingBox::new(10.0, 40.0, 190.0, 199.0, 0.9),
            Some(pose_with(0.0)),
        );
        CpuPoseAnnotator::new().annotate(&mut frame, &p).unwrap();
        assert!(count(&frame, LABEL_COLOR) > 0);
        assert_eq!(count(&frame, LANDMARK_COLOR), 0);
    }

    fn labels_only(bbox: BoundingBox, frame_width: u32, frame_height: u32) -> PersonPose {
        PersonPose {
            bbox,
            rect: bbox.to_pixel_rect(frame_width, frame_height).unwrap(),
            pose: None,
            angles: Some(JointAngles {
                left_elbow: 90.0,
                right_elbow: -90.0,
                neck: 45.0,
                left_knee: 170.0,
                right_knee: -170.0,
            }),
        }
    }

    fn row_has(frame: &Frame, y: i32, color: [u8; 3]) -> bool {
        (0..frame.width() as i32).any(|x| frame.pixel(x, y) == Some(&color[..]))
    }

    #[test]
    fn test_labels_sit_on_fixed_baselines_below_the_box_corner() {
        let mut frame = Frame::filled(700, 220, BLACK, 0);
        // Anchor truncates to (30, 60)
        let p = labels_only(BoundingBox::new(30.4, 60.7, 300.0, 200.0, 0.9), 700, 220);
        CpuPoseAnnotator::new().annotate(&mut frame, &p).unwrap();

        let glyph_height = 7 * LABEL_SCALE;
        let bands: Vec<(i32, i32)> = [-20, 20, 60, 100, 140]
            .iter()
            .map(|offset| (60 + offset - glyph_height, 60 + offset - 1))
            .collect();

        for &(top, bottom) in &bands {
            // Every label starts with L, R or N, which light their left column
            // in the first and last glyph rows
            assert_eq!(frame.pixel(30, top), Some(&LABEL_COLOR[..]), "top {top}");
            assert_eq!(frame.pixel(30, bottom), Some(&LABEL_COLOR[..]), "bottom {bottom}");
            assert_eq!(frame.pixel(29, top), Some(&BLACK[..]));
            assert!(!row_has(&frame, top - 1, LABEL_COLOR), "above band {top}");
        }
        for y in 0..frame.height() as i32 {
            let in_band = bands.iter().any(|&(top, bottom)| (top..=bottom).contains(&y));
            if !in_band {
                assert!(!row_has(&frame, y, LABEL_COLOR), "stray label pixels in row {y}");
            }
        }
    }

    #[test]
    fn test_non_finite_box_corner_does_not_overflow() {
        let mut frame = Frame::filled(200, 200, BLACK, 0);
        let boxes = [
            BoundingBox::new(10.0, f64::NEG_INFINITY, 100.0, 100.0, 0.9),
            BoundingBox::new(f64::NEG_INFINITY, f64::NEG_INFINITY, 100.0, 100.0, 0.9),
            BoundingBox::new(10.0, -3.0e12, 100.0, 100.0, 0.9),
        ];
        for bbox in boxes {
            let p = labels_only(bbox, 200, 200);
            CpuPoseAnnotator::new().annotate(&mut frame, &p).unwrap();
        }
        assert_eq!(count(&frame, LABEL_COLOR), 0);
    }

    #[test]
    fn test_labels_near_top_edge_do_not_panic() {
        let mut frame = Frame::filled(200, 200, BLACK, 0);
        let p = person(
            BoundingBox::new(-30.0, -5.0, 80.0, 80.0, 0.9),
            Some(pose_with(1.0)),
        );
        CpuPoseAnnotator::new().annotate(&mut frame, &p).unwrap();
        assert!(count(&frame, LABEL_COLOR) > 0);
    }
}
