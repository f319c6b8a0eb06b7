use std::path::Path;
use std::time::{Duration, Instant};

use crate::annotation::domain::frame_annotator::{FrameAnnotator, PersonPose};
use crate::detection::domain::person_detector::PersonDetector;
use crate::pose::domain::joint_angle::JointAngles;
use crate::pose::domain::pose_estimator::PoseEstimator;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_encoder::FrameEncoder;
use crate::video::domain::video_reader::VideoReader;

use super::pipeline_error::PipelineError;
use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use super::stream_session::StreamSession;

/// How long the iterator sleeps between pause-flag checks.
pub const DEFAULT_PAUSE_POLL: Duration = Duration::from_millis(10);

/// The per-stream components, built fresh for every upload.
pub struct StreamComponents {
    pub reader: Box<dyn VideoReader>,
    pub detector: Box<dyn PersonDetector>,
    pub estimator: Box<dyn PoseEstimator>,
    pub annotator: Box<dyn FrameAnnotator>,
    pub encoder: Box<dyn FrameEncoder>,
}

/// One annotated, compressed frame ready to be sent as a multipart part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedFrame {
    pub index: usize,
    pub jpeg: Vec<u8>,
}

/// Outcome of a single [`PoseStreamUseCase::step`].
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    /// The session is paused; no frame was read.
    Paused,
    Frame(EncodedFrame),
    /// The frame with this index was processed but could not be encoded.
    Dropped(usize),
    /// The source is exhausted, was never opened, or the session was cancelled.
    Finished,
}

/// Drives one video through detection, pose estimation, annotation and
/// encoding, one frame per step.
///
/// Frames are pulled lazily: nothing is read from the source until the
/// caller asks for the next part, and nothing at all while the session is
/// paused. The use case is single-use; once finished it stays finished.
pub struct PoseStreamUseCase {
    components: StreamComponents,
    session: StreamSession,
    logger: Box<dyn PipelineLogger>,
    poll_interval: Duration,
    total_frames: usize,
    frames_read: usize,
    dropped_frames: usize,
    opened: bool,
    finished: bool,
}

impl PoseStreamUseCase {
    pub fn new(components: StreamComponents, session: StreamSession) -> Self {
        Self {
            components,
            session,
            logger: Box::new(NullPipelineLogger),
            poll_interval: DEFAULT_PAUSE_POLL,
            total_frames: 0,
            frames_read: 0,
            dropped_frames: 0,
            opened: false,
            finished: false,
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Zero spins instead of sleeping while paused.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn session(&self) -> &StreamSession {
        &self.session
    }

    /// Opens the video source.
    ///
    /// On failure the stream is marked finished, so it yields no parts.
    pub fn open(&mut self, path: &Path) -> Result<VideoMetadata, PipelineError> {
        match self.components.reader.open(path) {
            Ok(metadata) => {
                self.total_frames = metadata.total_frames;
                self.opened = true;
                self.logger.info(&format!(
                    "Streaming {} ({}x{}, {:.2} fps)",
                    path.display(),
                    metadata.width,
                    metadata.height,
                    metadata.fps
                ));
                Ok(metadata)
            }
            Err(source) => {
                self.finished = true;
                Err(PipelineError::Open {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Advances the stream by at most one frame.
    ///
    /// Errors end the stream: the reader is closed and later calls return
    /// [`Step::Finished`].
    pub fn step(&mut self) -> Result<Step, PipelineError> {
        if self.finished {
            return Ok(Step::Finished);
        }
        if !self.opened || self.session.is_cancelled() {
            self.finish();
            return Ok(Step::Finished);
        }
        if self.session.is_paused() {
            return Ok(Step::Paused);
        }

        let result = self.process_next();
        if matches!(result, Ok(Step::Finished) | Err(_)) {
            self.finish();
        }
        result
    }

    fn process_next(&mut self) -> Result<Step, PipelineError> {
        let t0 = Instant::now();
        let mut frame = match self.components.reader.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(Step::Finished),
            Err(source) => {
                return Err(PipelineError::Decode {
                    frame: self.frames_read,
                    source,
                })
            }
        };
        self.logger.timing("decode", elapsed_ms(t0));
        self.frames_read += 1;
        self.logger.progress(self.frames_read, self.total_frames);

        let persons = self.annotate_frame(&mut frame)?;
        self.logger.metric("persons", persons as f64);

        let t0 = Instant::now();
        match self.components.encoder.encode(&frame) {
            Ok(jpeg) => {
                self.logger.timing("encode", elapsed_ms(t0));
                Ok(Step::Frame(EncodedFrame {
                    index: frame.index(),
                    jpeg,
                }))
            }
            Err(e) => {
                log::warn!("Dropping frame {}: encoding failed: {e}", frame.index());
                self.dropped_frames += 1;
                self.logger
                    .metric("dropped_frames", self.dropped_frames as f64);
                Ok(Step::Dropped(frame.index()))
            }
        }
    }

    /// Detects persons and draws each one's skeleton and angle labels onto
    /// `frame`. Returns the number of persons annotated.
    ///
    /// Persons are processed in detection order on the same frame, so a
    /// later crop sees the overlays already drawn for earlier ones.
    fn annotate_frame(&mut self, frame: &mut Frame) -> Result<usize, PipelineError> {
        let index = frame.index();

        let t0 = Instant::now();
        let boxes = self
            .components
            .detector
            .detect(frame)
            .map_err(|source| PipelineError::Detection {
                frame: index,
                source,
            })?;
        self.logger.timing("detect", elapsed_ms(t0));

        let mut pose_ms = 0.0;
        let mut annotate_ms = 0.0;
        let mut persons = 0;

        for bbox in boxes {
            let Some(rect) = bbox.to_pixel_rect(frame.width(), frame.height()) else {
                continue;
            };

            let t0 = Instant::now();
            let crop = frame.crop(&rect);
            let pose = self
                .components
                .estimator
                .estimate(&crop)
                .map_err(|source| PipelineError::PoseEstimation {
                    frame: index,
                    source,
                })?;
            pose_ms += elapsed_ms(t0);

            let t0 = Instant::now();
            let angles = pose.as_ref().map(JointAngles::from_pose);
            let person = PersonPose {
                bbox,
                rect,
                pose,
                angles,
            };
            self.components
                .annotator
                .annotate(frame, &person)
                .map_err(|source| PipelineError::Annotation {
                    frame: index,
                    source,
                })?;
            annotate_ms += elapsed_ms(t0);
            persons += 1;
        }

        self.logger.timing("pose", pose_ms);
        self.logger.timing("annotate", annotate_ms);
        Ok(persons)
    }

    /// Waits one poll interval; call between [`Step::Paused`] results.
    pub fn idle(&self) {
        if self.poll_interval.is_zero() {
            std::hint::spin_loop();
        } else {
            std::thread::sleep(self.poll_interval);
        }
    }

    /// Closes the source and emits the logger summary. Idempotent; later
    /// steps return [`Step::Finished`].
    pub fn finish(&mut self) {
        if self.opened {
            self.components.reader.close();
            self.opened = false;
            self.logger.summary();
        }
        self.finished = true;
    }
}

impl Iterator for PoseStreamUseCase {
    type Item = Result<EncodedFrame, PipelineError>;

    /// Blocks while the session is paused, polling the flag.
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.step() {
                Ok(Step::Frame(frame)) => return Some(Ok(frame)),
                Ok(Step::Dropped(_)) => continue,
                Ok(Step::Paused) => self.idle(),
                Ok(Step::Finished) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
