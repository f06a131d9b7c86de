//! Background conversion worker.
//!
//! Conversion is synchronous and bounded by input length, but callers with a
//! UI thread still want it off their own thread. The worker owns a dedicated
//! thread fed by a channel; every submission carries a generation tag from a
//! shared counter, and the worker drops any submission that is stale by the
//! time it would run, so only the newest request does work.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::debug;

use crate::convert::{ConvertRequest, Converter};

struct ConvertWork {
    text: String,
    request: ConvertRequest,
    generation: u64,
}

/// A finished conversion, tagged with the generation it was submitted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOutcome {
    pub generation: u64,
    pub output: String,
}

pub struct ConvertWorker {
    work_tx: Sender<ConvertWork>,
    result_rx: Mutex<Receiver<ConvertOutcome>>,
    generation: Arc<AtomicU64>,
}

impl ConvertWorker {
    /// Spawn the worker thread. The converter's analyzer and dictionary are
    /// shared with the caller, not copied.
    pub fn spawn(converter: Arc<Converter>) -> Self {
        let (work_tx, work_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let generation = Arc::new(AtomicU64::new(0));
        let worker_generation = generation.clone();
        thread::Builder::new()
            .name("yomi-convert".to_string())
            .spawn(move || convert_worker(work_rx, result_tx, worker_generation, converter))
            .expect("failed to spawn convert worker");
        Self {
            work_tx,
            result_rx: Mutex::new(result_rx),
            generation,
        }
    }

    /// Queue a conversion and return its generation tag. Every earlier
    /// submission becomes stale.
    pub fn submit(&self, text: impl Into<String>, request: ConvertRequest) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.work_tx.send(ConvertWork {
            text: text.into(),
            request,
            generation,
        });
        generation
    }

    /// Mark everything queued or in flight as stale without submitting new
    /// work. Pending results are suppressed, not delivered late.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Non-blocking poll for a finished conversion.
    pub fn try_recv(&self) -> Option<ConvertOutcome> {
        self.result_rx.lock().ok()?.try_recv().ok()
    }

    /// Block until a conversion finishes. `None` once the worker is gone.
    pub fn recv(&self) -> Option<ConvertOutcome> {
        self.result_rx.lock().ok()?.recv().ok()
    }
}

fn convert_worker(
    work_rx: Receiver<ConvertWork>,
    result_tx: Sender<ConvertOutcome>,
    generation: Arc<AtomicU64>,
    converter: Arc<Converter>,
) {
    loop {
        let mut work = match work_rx.recv() {
            Ok(work) => work,
            // Channel closed: the owning handle is gone.
            Err(_) => return,
        };
        // Drain to the newest queued submission.
        while let Ok(newer) = work_rx.try_recv() {
            work = newer;
        }
        if work.generation != generation.load(Ordering::SeqCst) {
            debug!(generation = work.generation, "dropping stale conversion");
            continue;
        }

        let output = converter.convert(&work.text, &work.request);

        // Invalidated mid-conversion: the result must not surface.
        if work.generation != generation.load(Ordering::SeqCst) {
            debug!(generation = work.generation, "conversion superseded mid-flight");
            continue;
        }
        let _ = result_tx.send(ConvertOutcome {
            generation: work.generation,
            output,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::LexiconAnalyzer;
    use crate::dict::{DictEntry, TableDictionary};

    fn converter() -> Arc<Converter> {
        let pairs = [
            ("感じ", "かんじ"),
            ("一", "いち"),
            ("分", "ふん"),
            ("三", "さん"),
            ("百", "ひゃく"),
        ];
        let dict = Arc::new(TableDictionary::from_entries(
            pairs
                .iter()
                .map(|(spelling, reading)| DictEntry {
                    spellings: vec![spelling.to_string()],
                    readings: vec![reading.to_string()],
                })
                .collect(),
        ));
        Arc::new(Converter::new(
            Arc::new(LexiconAnalyzer::new(dict.clone())),
            dict,
        ))
    }

    fn work(text: &str, generation: u64) -> ConvertWork {
        ConvertWork {
            text: text.to_string(),
            request: ConvertRequest::default(),
            generation,
        }
    }

    #[test]
    fn test_submit_round_trip() {
        let worker = ConvertWorker::spawn(converter());
        let generation = worker.submit("感じ", ConvertRequest::default());
        let outcome = worker.recv().unwrap();
        assert_eq!(outcome.generation, generation);
        assert_eq!(outcome.output, "かんじ");
    }

    #[test]
    fn test_generations_are_monotonic() {
        let worker = ConvertWorker::spawn(converter());
        let a = worker.submit("一分", ConvertRequest::default());
        worker.invalidate();
        let b = worker.submit("三百", ConvertRequest::default());
        assert!(b > a + 1);
    }

    #[test]
    fn test_loop_drops_stale_work() {
        let (work_tx, work_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        // Counter already moved past this submission.
        work_tx.send(work("感じ", 4)).unwrap();
        drop(work_tx);
        convert_worker(work_rx, result_tx, Arc::new(AtomicU64::new(5)), converter());
        assert!(result_rx.recv().is_err());
    }

    #[test]
    fn test_loop_takes_newest_queued_submission() {
        let (work_tx, work_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        work_tx.send(work("三百", 1)).unwrap();
        work_tx.send(work("一分", 2)).unwrap();
        drop(work_tx);
        convert_worker(work_rx, result_tx, Arc::new(AtomicU64::new(2)), converter());
        let outcome = result_rx.recv().unwrap();
        assert_eq!(outcome.generation, 2);
        assert_eq!(outcome.output, "いっぷん");
        // The older submission never ran.
        assert!(result_rx.recv().is_err());
    }
}
