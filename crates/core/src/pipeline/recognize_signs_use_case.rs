use std::time::Instant;

use crate::capture::domain::dataset_writer::DatasetWriter;
use crate::capture::domain::mode_controller::{KeyEvent, ModeController, ModeState};
use crate::capture::domain::sample_logger::SampleLogger;
use crate::classification::domain::label_table::LabelTable;
use crate::classification::domain::sign_classifier::{ClassificationResult, SignClassifier};
use crate::landmarks::domain::bounding_box::BoundingBox;
use crate::landmarks::domain::feature_vector::FeatureVector;
use crate::landmarks::domain::hand_landmarks::HandLandmarkSet;
use crate::landmarks::domain::landmark_normalizer::normalize;
use crate::landmarks::domain::landmark_source::{FrameObservation, LandmarkSource};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::KEY_ESCAPE;
use crate::shared::error::SignError;

/// Everything the session learned about one hand on one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandReport {
    pub landmarks: HandLandmarkSet,
    pub bbox: BoundingBox,
    /// `None` when no classifier is configured.
    pub result: Option<ClassificationResult>,
    /// Display name of the accepted label, when a label table is loaded.
    pub label_name: Option<String>,
    pub sample_written: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub index: usize,
    pub state: ModeState,
    pub hands: Vec<HandReport>,
    /// Hands dropped for this frame only (degenerate or malformed).
    pub skipped_hands: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames: usize,
    /// Frames the source could not deliver (unreadable or malformed).
    pub skipped_frames: usize,
    pub hands: usize,
    pub skipped_hands: usize,
    pub predictions: usize,
    pub samples: usize,
    /// The terminate key ended the session before the source ran out.
    pub terminated: bool,
}

/// Per-frame recognition and capture session.
///
/// Frame flow: key → mode controller; each hand → pixel landmarks →
/// bounding box + normalized features → classifier (when configured)
/// and sample logger (when the mode state calls for a capture).
pub struct RecognizeSignsUseCase {
    controller: ModeController,
    classifier: Option<Box<dyn SignClassifier>>,
    labels: Option<LabelTable>,
    sample_logger: SampleLogger,
    logger: Box<dyn PipelineLogger>,
}

impl RecognizeSignsUseCase {
    /// Builds a session, checking up front that the label table names
    /// every class the classifier can emit.
    pub fn new(
        mut classifier: Option<Box<dyn SignClassifier>>,
        labels: Option<LabelTable>,
        dataset_writer: Box<dyn DatasetWriter>,
        logger: Box<dyn PipelineLogger>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if let (Some(model), Some(labels)) = (classifier.as_mut(), labels.as_ref()) {
            let classes = model.class_count()?;
            labels.ensure_covers(classes)?;
            log::debug!("Classifier outputs {classes} classes, {} labels", labels.len());
        }
        Ok(Self {
            controller: ModeController::new(),
            classifier,
            labels,
            sample_logger: SampleLogger::new(dataset_writer),
            logger,
        })
    }

    pub fn state(&self) -> ModeState {
        self.controller.state()
    }

    /// Runs frames from `source` until it is exhausted or the terminate
    /// key is seen. `on_frame` observes every processed frame.
    ///
    /// A frame the source fails to deliver is skipped; only classifier,
    /// label lookup and dataset failures end the session early.
    pub fn execute(
        &mut self,
        source: &mut dyn LandmarkSource,
        mut on_frame: impl FnMut(&FrameReport),
    ) -> Result<SessionSummary, Box<dyn std::error::Error>> {
        let mut summary = SessionSummary::default();

        for frame in source.frames() {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Skipping frame: {e}");
                    summary.skipped_frames += 1;
                    continue;
                }
            };
            if frame.key == Some(KEY_ESCAPE) {
                self.logger.info("Terminate key received");
                summary.terminated = true;
                break;
            }

            let report = self.process_frame(&frame)?;
            summary.frames += 1;
            summary.hands += report.hands.len();
            summary.skipped_hands += report.skipped_hands;
            summary.predictions += report
                .hands
                .iter()
                .filter(|h| h.result.is_some_and(|r| r.label.is_some()))
                .count();
            summary.samples += report.hands.iter().filter(|h| h.sample_written).count();
            on_frame(&report);
        }

        self.logger.summary();
        Ok(summary)
    }

    /// Processes one frame. Unusable hands are skipped; classifier,
    /// label lookup and dataset failures abort.
    pub fn process_frame(
        &mut self,
        frame: &FrameObservation,
    ) -> Result<FrameReport, Box<dyn std::error::Error>> {
        let previous_mode = self.controller.state().mode;
        let state = self.controller.on_frame(KeyEvent::from(frame.key));
        if state.mode != previous_mode {
            self.logger.info(&format!("Mode: {}", state.mode));
        }

        let mut hands = Vec::with_capacity(frame.hands.len());
        let mut skipped_hands = 0;
        for coords in &frame.hands {
            let (landmarks, bbox, features) = match self.prepare_hand(coords, frame) {
                Ok(prepared) => prepared,
                Err(e) => {
                    match e {
                        SignError::DegenerateInput => {
                            log::debug!("Frame {}: skipping degenerate hand", frame.index)
                        }
                        other => log::warn!("Frame {}: skipping hand: {other}", frame.index),
                    }
                    skipped_hands += 1;
                    continue;
                }
            };

            let result = self.classify(&features)?;
            let label_name = match (result.and_then(|r| r.label), &self.labels) {
                (Some(label), Some(labels)) => Some(labels.name(label)?.to_string()),
                _ => None,
            };

            let start = Instant::now();
            let sample_written = self.sample_logger.log(&state, &features)?;
            self.logger
                .timing("log_sample", start.elapsed().as_secs_f64() * 1000.0);

            hands.push(HandReport {
                landmarks,
                bbox,
                result,
                label_name,
                sample_written,
            });
        }

        self.logger.metric("hands", hands.len() as f64);
        self.logger.metric(
            "samples",
            hands.iter().filter(|h| h.sample_written).count() as f64,
        );
        self.logger.frame_done(frame.index);

        Ok(FrameReport {
            index: frame.index,
            state,
            hands,
            skipped_hands,
        })
    }

    fn prepare_hand(
        &mut self,
        coords: &[(f64, f64)],
        frame: &FrameObservation,
    ) -> Result<(HandLandmarkSet, BoundingBox, FeatureVector), SignError> {
        let start = Instant::now();
        let landmarks = HandLandmarkSet::from_normalized(coords, frame.width, frame.height)?;
        let bbox = BoundingBox::from_points(landmarks.points())?;
        let features = normalize(&landmarks)?;
        self.logger
            .timing("normalize", start.elapsed().as_secs_f64() * 1000.0);
        Ok((landmarks, bbox, features))
    }

    fn classify(
        &mut self,
        features: &FeatureVector,
    ) -> Result<Option<ClassificationResult>, Box<dyn std::error::Error>> {
        let Some(classifier) = self.classifier.as_mut() else {
            return Ok(None);
        };
        let start = Instant::now();
        let result = classifier.classify(features)?;
        self.logger
            .timing("classify", start.elapsed().as_secs_f64() * 1000.0);
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::domain::mode_controller::Mode;
    use crate::capture::domain::sample::Sample;
    use crate::landmarks::domain::landmark_source::SourceMetadata;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use std::collections::VecDeque;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    /// Returns queued score vectors in order, repeating the last one.
    struct StubClassifier {
        scores: VecDeque<Vec<f32>>,
        classes: usize,
        calls: Arc<Mutex<usize>>,
    }

    impl StubClassifier {
        fn fixed(scores: Vec<f32>) -> Self {
            let classes = scores.len();
            Self {
                scores: VecDeque::from(vec![scores]),
                classes,
                calls: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl SignClassifier for StubClassifier {
        fn classify(
            &mut self,
            _features: &FeatureVector,
        ) -> Result<ClassificationResult, Box<dyn std::error::Error>> {
            *self.calls.lock().unwrap() += 1;
            let scores = if self.scores.len() > 1 {
                self.scores.pop_front().unwrap()
            } else {
                self.scores[0].clone()
            };
            Ok(ClassificationResult::from_scores(&scores)?)
        }

        fn class_count(&mut self) -> Result<usize, Box<dyn std::error::Error>> {
            Ok(self.classes)
        }
    }

    struct RecordingWriter {
        rows: Arc<Mutex<Vec<Sample>>>,
    }

    impl DatasetWriter for RecordingWriter {
        fn append(&mut self, sample: &Sample) -> Result<(), Box<dyn std::error::Error>> {
            self.rows.lock().unwrap().push(sample.clone());
            Ok(())
        }
    }

    struct StubSource {
        frames: Vec<FrameObservation>,
    }

    /// Yields `None` entries as read failures.
    struct UnreliableSource {
        frames: Vec<Option<FrameObservation>>,
    }

    impl LandmarkSource for UnreliableSource {
        fn open(&mut self, _path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
            Ok(SourceMetadata {
                source_name: "unreliable".to_string(),
                total_frames: None,
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<FrameObservation, Box<dyn std::error::Error>>> + '_>
        {
            Box::new(self.frames.drain(..).enumerate().map(|(i, f)| {
                f.ok_or_else(|| -> Box<dyn std::error::Error> {
                    format!("malformed frame at line {}", i + 1).into()
                })
            }))
        }

        fn close(&mut self) {}
    }

    impl LandmarkSource for StubSource {
        fn open(&mut self, _path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
            Ok(SourceMetadata {
                source_name: "stub".to_string(),
                total_frames: Some(self.frames.len()),
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<FrameObservation, Box<dyn std::error::Error>>> + '_>
        {
            Box::new(self.frames.drain(..).map(Ok))
        }

        fn close(&mut self) {}
    }

    // --- Helpers ---

    fn hand() -> Vec<(f64, f64)> {
        (0..21)
            .map(|i| (0.3 + 0.01 * i as f64, 0.6 - 0.015 * i as f64))
            .collect()
    }

    fn degenerate_hand() -> Vec<(f64, f64)> {
        vec![(0.5, 0.5); 21]
    }

    fn frame(index: usize, key: Option<char>, hands: Vec<Vec<(f64, f64)>>) -> FrameObservation {
        FrameObservation {
            index,
            width: 960,
            height: 540,
            key: key.map(|c| c as i32),
            hands,
        }
    }

    fn alphabet() -> LabelTable {
        let letters: Vec<String> = ('A'..='Z').map(|c| c.to_string()).collect();
        LabelTable::parse(&letters.join("\n")).unwrap()
    }

    fn use_case(
        classifier: Option<Box<dyn SignClassifier>>,
        labels: Option<LabelTable>,
    ) -> (RecognizeSignsUseCase, Arc<Mutex<Vec<Sample>>>) {
        let rows = Arc::new(Mutex::new(Vec::new()));
        let writer = Box::new(RecordingWriter { rows: rows.clone() });
        let uc = RecognizeSignsUseCase::new(classifier, labels, writer, Box::new(NullPipelineLogger))
            .unwrap();
        (uc, rows)
    }

    // --- Tests ---

    #[test]
    fn test_one_sample_per_letter_keypress() {
        let (mut uc, rows) = use_case(None, None);
        let mut source = StubSource {
            frames: vec![
                frame(0, Some('1'), vec![hand()]),
                frame(1, Some('a'), vec![hand()]),
                frame(2, None, vec![hand()]),
                frame(3, Some('b'), vec![hand()]),
            ],
        };

        let summary = uc.execute(&mut source, |_| {}).unwrap();

        let rows = rows.lock().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label_id(), 0);
        assert_eq!(rows[1].label_id(), 1);
        assert_eq!(summary.samples, 2);
        assert_eq!(summary.frames, 4);
    }

    #[test]
    fn test_bad_frame_skipped_session_continues() {
        let (mut uc, rows) = use_case(None, None);
        let mut source = UnreliableSource {
            frames: vec![
                Some(frame(0, Some('1'), vec![hand()])),
                None,
                Some(frame(2, Some('a'), vec![hand()])),
            ],
        };

        let mut seen = Vec::new();
        let summary = uc.execute(&mut source, |r| seen.push(r.index)).unwrap();

        assert_eq!(seen, vec![0, 2]);
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.skipped_frames, 1);
        assert_eq!(summary.samples, 1);
        let rows = rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label_id(), 0);
    }

    #[test]
    fn test_letters_in_normal_mode_not_logged() {
        let (mut uc, rows) = use_case(None, None);
        for (i, key) in ['a', 'b', 'c'].into_iter().enumerate() {
            let report = uc.process_frame(&frame(i, Some(key), vec![hand()])).unwrap();
            assert!(!report.hands[0].sample_written);
        }
        assert!(rows.lock().unwrap().is_empty());
    }

    #[test]
    fn test_letter_without_hand_logs_nothing() {
        let (mut uc, rows) = use_case(None, None);
        uc.process_frame(&frame(0, Some('1'), vec![])).unwrap();
        let report = uc.process_frame(&frame(1, Some('a'), vec![])).unwrap();
        assert!(report.hands.is_empty());
        assert_eq!(report.state.pending_label, Some(0));
        assert!(rows.lock().unwrap().is_empty());
    }

    #[test]
    fn test_degenerate_hand_skipped_others_processed() {
        let (mut uc, rows) = use_case(None, None);
        uc.process_frame(&frame(0, Some('1'), vec![])).unwrap();
        let report = uc
            .process_frame(&frame(1, Some('c'), vec![degenerate_hand(), hand()]))
            .unwrap();

        assert_eq!(report.skipped_hands, 1);
        assert_eq!(report.hands.len(), 1);
        let rows = rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label_id(), 2);
    }

    #[test]
    fn test_malformed_hand_skipped() {
        let (mut uc, _rows) = use_case(None, None);
        let short: Vec<(f64, f64)> = hand().into_iter().take(5).collect();
        let report = uc.process_frame(&frame(0, None, vec![short])).unwrap();
        assert_eq!(report.skipped_hands, 1);
        assert!(report.hands.is_empty());
    }

    #[test]
    fn test_bbox_and_landmarks_reported() {
        let (mut uc, _rows) = use_case(None, None);
        let report = uc.process_frame(&frame(0, None, vec![hand()])).unwrap();
        let hand = &report.hands[0];
        // x grows and y shrinks with the landmark index.
        assert_eq!(hand.bbox.x, hand.landmarks.wrist().x);
        assert_eq!(hand.bbox.y, hand.landmarks.points()[20].y);
        assert!(hand.bbox.width > 0 && hand.bbox.height > 0);
        assert!(hand.result.is_none());
    }

    #[test]
    fn test_accepted_prediction_named_from_labels() {
        let mut scores = vec![0.0; 26];
        scores[7] = 0.8;
        let classifier = Box::new(StubClassifier::fixed(scores));
        let (mut uc, _rows) = use_case(Some(classifier), Some(alphabet()));

        let report = uc.process_frame(&frame(0, None, vec![hand()])).unwrap();
        let hand = &report.hands[0];
        assert_eq!(hand.result.unwrap().label, Some(7));
        assert_eq!(hand.label_name.as_deref(), Some("H"));
    }

    #[test]
    fn test_low_confidence_has_no_label() {
        let mut scores = vec![0.03; 26];
        scores[3] = 0.24999;
        let classifier = Box::new(StubClassifier::fixed(scores));
        let (mut uc, _rows) = use_case(Some(classifier), Some(alphabet()));

        let report = uc.process_frame(&frame(0, None, vec![hand()])).unwrap();
        let hand = &report.hands[0];
        assert_eq!(hand.result.unwrap().label, None);
        assert_eq!(hand.label_name, None);
    }

    #[test]
    fn test_classifies_in_capture_mode_too() {
        let classifier = StubClassifier::fixed(vec![0.1, 0.9]);
        let calls = classifier.calls.clone();
        let (mut uc, rows) = use_case(Some(Box::new(classifier)), None);

        uc.process_frame(&frame(0, Some('1'), vec![hand()])).unwrap();
        let report = uc.process_frame(&frame(1, Some('d'), vec![hand()])).unwrap();

        assert_eq!(*calls.lock().unwrap(), 2);
        assert_eq!(report.state.mode, Mode::Capture);
        assert!(report.hands[0].sample_written);
        assert_eq!(rows.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_calls_are_independent() {
        let classifier = StubClassifier {
            scores: VecDeque::from(vec![vec![0.9, 0.1], vec![0.1, 0.1], vec![0.2, 0.8]]),
            classes: 2,
            calls: Arc::new(Mutex::new(0)),
        };
        let (mut uc, _rows) = use_case(Some(Box::new(classifier)), None);

        let labels: Vec<Option<usize>> = (0..3)
            .map(|i| {
                let report = uc.process_frame(&frame(i, None, vec![hand()])).unwrap();
                report.hands[0].result.unwrap().label
            })
            .collect();
        assert_eq!(labels, vec![Some(0), None, Some(1)]);
    }

    #[test]
    fn test_short_label_table_rejected_at_startup() {
        let classifier = Box::new(StubClassifier::fixed(vec![0.1; 26]));
        let labels = LabelTable::parse("A\nB\nC").unwrap();
        let writer = Box::new(RecordingWriter {
            rows: Arc::new(Mutex::new(Vec::new())),
        });
        let result = RecognizeSignsUseCase::new(
            Some(classifier),
            Some(labels),
            writer,
            Box::new(NullPipelineLogger),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_escape_stops_before_processing_frame() {
        let (mut uc, rows) = use_case(None, None);
        let mut source = StubSource {
            frames: vec![
                frame(0, Some('1'), vec![hand()]),
                FrameObservation {
                    key: Some(KEY_ESCAPE),
                    ..frame(1, None, vec![hand()])
                },
                frame(2, Some('a'), vec![hand()]),
            ],
        };

        let mut seen = Vec::new();
        let summary = uc.execute(&mut source, |r| seen.push(r.index)).unwrap();

        assert!(summary.terminated);
        assert_eq!(summary.frames, 1);
        assert_eq!(seen, vec![0]);
        assert!(rows.lock().unwrap().is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let classifier = Box::new(StubClassifier::fixed(vec![0.2, 0.8]));
        let (mut uc, _rows) = use_case(Some(classifier), None);
        let mut source = StubSource {
            frames: vec![
                frame(0, Some('1'), vec![hand(), degenerate_hand()]),
                frame(1, Some('z'), vec![hand()]),
                frame(2, None, vec![]),
            ],
        };

        let summary = uc.execute(&mut source, |_| {}).unwrap();
        assert_eq!(
            summary,
            SessionSummary {
                frames: 3,
                skipped_frames: 0,
                hands: 2,
                skipped_hands: 1,
                predictions: 2,
                samples: 1,
                terminated: false,
            }
        );
        assert_eq!(uc.state().mode, Mode::Capture);
    }
}
