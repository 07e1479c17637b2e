#![allow(dead_code)]

use guestpost_core::detector::interface::{Detector, DetectorError, DetectorResponse, Evidence};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued responses; the last one repeats once the queue drains.
pub struct FakeDetector {
    id: String,
    queue: Mutex<VecDeque<Result<DetectorResponse, DetectorError>>>,
    last: Mutex<Option<Result<DetectorResponse, DetectorError>>>,
}

impl FakeDetector {
    pub fn new(id: &str, responses: Vec<Result<DetectorResponse, DetectorError>>) -> Self {
        Self {
            id: id.to_string(),
            queue: Mutex::new(responses.into()),
            last: Mutex::new(None),
        }
    }

    pub fn scoring(id: &str, score: f64) -> Self {
        Self::new(id, vec![Ok(response(score, vec![]))])
    }

    pub fn failing(id: &str, err: DetectorError) -> Self {
        Self::new(id, vec![Err(err)])
    }
}

impl Detector for FakeDetector {
    fn detector_id(&self) -> &str {
        &self.id
    }

    fn score(&self, _text: &str) -> Result<DetectorResponse, DetectorError> {
        let next = self.queue.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(r) = next {
            *last = Some(r);
        }
        last.clone().expect("fake detector has no response queued")
    }
}

pub fn response(score: f64, evidence: Vec<Evidence>) -> DetectorResponse {
    DetectorResponse { score, evidence }
}

pub fn word_span(start_word: usize, end_word: usize) -> Evidence {
    Evidence::WordSpan {
        start_word,
        end_word,
        confidence: 0.9,
        source: Some("https://blog.test/original".to_string()),
    }
}
