//! Lesson completion and quiz bookkeeping.
//!
//! State lives under two backend keys, both JSON:
//!
//! - `mlv:done`: ordered array of completed lesson slugs
//! - `mlv:quiz`: `{ slug: { total?, answers: { quizId: { selected, correct } } } }`
//!
//! A lesson is marked done automatically once its correct-answer count
//! reaches the recorded quiz total.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError, mpsc};

use serde::{Deserialize, Serialize};

use crate::backend::{FileBackend, MemoryBackend, ProgressBackend};
use crate::event::{ProgressEvent, ProgressEventReceiver};
use crate::ProgressError;

/// Backend key of the done list.
pub const DONE_KEY: &str = "mlv:done";
/// Backend key of the quiz store.
pub const QUIZ_KEY: &str = "mlv:quiz";

/// A recorded answer to one quiz question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub selected: u32,
    pub correct: bool,
}

/// Quiz state of one lesson.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizLessonState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    #[serde(default)]
    pub answers: BTreeMap<String, QuizAnswer>,
}

impl QuizLessonState {
    fn correct_count(&self) -> usize {
        self.answers.values().filter(|a| a.correct).count()
    }

    fn completion(&self) -> QuizCompletion {
        QuizCompletion::new(self.total.unwrap_or(0), self.answers.len(), self.correct_count())
    }
}

/// Summary of a lesson's quiz progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QuizCompletion {
    pub total: u32,
    pub answered: usize,
    pub correct: usize,
    pub completed: bool,
}

impl QuizCompletion {
    fn new(total: u32, answered: usize, correct: usize) -> Self {
        Self {
            total,
            answered,
            correct,
            completed: total > 0 && correct >= total as usize,
        }
    }
}

/// Everything a client needs to render progress indicators.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub done: Vec<String>,
    pub quiz: BTreeMap<String, QuizCompletion>,
}

type QuizStore = BTreeMap<String, QuizLessonState>;

/// Deterministic id of a quiz question within a lesson.
#[must_use]
pub fn quiz_id(slug: &str, question: &str) -> String {
    format!("{slug}::{question}")
}

/// Progress store over a [`ProgressBackend`].
///
/// Mutations are serialized within the process. Each mutation that persists
/// anything emits exactly one [`ProgressEvent`] to every live subscriber,
/// even when a follow-up write of the same mutation fails.
pub struct ProgressStore {
    backend: Box<dyn ProgressBackend>,
    subscribers: Mutex<Vec<mpsc::Sender<ProgressEvent>>>,
    write_lock: Mutex<()>,
}

impl ProgressStore {
    pub fn new(backend: impl ProgressBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            subscribers: Mutex::new(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Store that forgets everything when dropped.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Store persisted as JSON files under `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileBackend::new(dir))
    }

    /// Register a new observer.
    pub fn subscribe(&self) -> ProgressEventReceiver {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        ProgressEventReceiver::new(rx)
    }

    /// Deliver `event` to every subscriber, dropping closed ones.
    pub fn notify(&self, event: ProgressEvent) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(event).is_ok());
    }

    /// Completed lesson slugs in completion order.
    ///
    /// Missing or malformed state reads as empty.
    pub fn read_done(&self) -> Vec<String> {
        self.backend
            .get(DONE_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn is_done(&self, slug: &str) -> bool {
        self.read_done().iter().any(|s| s == slug)
    }

    /// Flip the completion state of `slug` and return the new done list.
    pub fn toggle_done(&self, slug: &str) -> Result<Vec<String>, ProgressError> {
        let _guard = self.lock_writes();
        let mut done = self.read_done();
        if let Some(pos) = done.iter().position(|s| s == slug) {
            done.remove(pos);
        } else {
            done.push(slug.to_owned());
        }
        self.write_done(&done)?;
        self.notify(ProgressEvent::changed());
        Ok(done)
    }

    /// Record how many questions a lesson's quiz has.
    ///
    /// Ignored when `slug` is empty or `total` is zero.
    pub fn set_quiz_total(&self, slug: &str, total: u32) -> Result<(), ProgressError> {
        if slug.is_empty() || total == 0 {
            return Ok(());
        }
        let _guard = self.lock_writes();
        let mut store = self.read_quiz_store();
        store.entry(slug.to_owned()).or_default().total = Some(total);
        self.write_quiz_store(&store)?;
        self.finish_quiz_write(slug, &store)
    }

    /// Record (or replace) the answer to one question.
    ///
    /// Ignored when `slug` or `quiz_id` is empty.
    pub fn set_quiz_answer(
        &self,
        slug: &str,
        quiz_id: &str,
        selected: u32,
        correct: bool,
    ) -> Result<(), ProgressError> {
        if slug.is_empty() || quiz_id.is_empty() {
            return Ok(());
        }
        let _guard = self.lock_writes();
        let mut store = self.read_quiz_store();
        store
            .entry(slug.to_owned())
            .or_default()
            .answers
            .insert(quiz_id.to_owned(), QuizAnswer { selected, correct });
        self.write_quiz_store(&store)?;
        self.finish_quiz_write(slug, &store)
    }

    /// Previously recorded answer, if any.
    pub fn quiz_answer(&self, slug: &str, quiz_id: &str) -> Option<QuizAnswer> {
        self.read_quiz_store()
            .get(slug)
            .and_then(|lesson| lesson.answers.get(quiz_id).copied())
    }

    pub fn quiz_completion(&self, slug: &str) -> QuizCompletion {
        self.read_quiz_store()
            .get(slug)
            .map(QuizLessonState::completion)
            .unwrap_or_default()
    }

    /// Completion summary for every lesson with quiz state.
    pub fn read_quiz_progress_map(&self) -> BTreeMap<String, QuizCompletion> {
        self.read_quiz_store()
            .into_iter()
            .map(|(slug, lesson)| (slug, lesson.completion()))
            .collect()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            done: self.read_done(),
            quiz: self.read_quiz_progress_map(),
        }
    }

    fn lock_writes(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_done(&self, done: &[String]) -> Result<(), ProgressError> {
        let raw = serde_json::to_string(done)?;
        self.backend.set(DONE_KEY, &raw)
    }

    /// Parse the quiz store leniently.
    ///
    /// A malformed store reads as empty; a lesson record of the wrong shape
    /// reads as fresh state.
    fn read_quiz_store(&self) -> QuizStore {
        let Some(raw) = self.backend.get(QUIZ_KEY) else {
            return QuizStore::new();
        };
        let Ok(entries) = serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&raw) else {
            tracing::warn!("ignoring malformed quiz progress");
            return QuizStore::new();
        };
        entries
            .into_iter()
            .map(|(slug, value)| {
                let lesson = serde_json::from_value(value).unwrap_or_else(|_| {
                    tracing::debug!(%slug, "resetting malformed quiz record");
                    QuizLessonState::default()
                });
                (slug, lesson)
            })
            .collect()
    }

    fn write_quiz_store(&self, store: &QuizStore) -> Result<(), ProgressError> {
        let raw = serde_json::to_string(store)?;
        self.backend.set(QUIZ_KEY, &raw)
    }

    /// Auto-complete after the quiz store was written, then notify.
    ///
    /// Subscribers are notified even when marking the lesson done fails.
    fn finish_quiz_write(&self, slug: &str, store: &QuizStore) -> Result<(), ProgressError> {
        let completed = self.auto_complete(slug, store);
        self.notify(ProgressEvent::changed());
        completed
    }

    fn auto_complete(&self, slug: &str, store: &QuizStore) -> Result<(), ProgressError> {
        let Some(lesson) = store.get(slug) else {
            return Ok(());
        };
        if !lesson.completion().completed {
            return Ok(());
        }
        let mut done = self.read_done();
        if done.iter().any(|s| s == slug) {
            return Ok(());
        }
        done.push(slug.to_owned());
        tracing::debug!(slug, "quiz complete, marking lesson done");
        self.write_done(&done)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_quiz_id_format() {
        assert_eq!(
            quiz_id("perceptron", "What is a margin?"),
            "perceptron::What is a margin?"
        );
    }

    #[test]
    fn test_read_done_empty_store() {
        let store = ProgressStore::in_memory();

        assert!(store.read_done().is_empty());
    }

    #[test]
    fn test_read_done_malformed_is_empty() {
        let store = ProgressStore::new(MemoryBackend::new().with_value(DONE_KEY, "{not json"));

        assert!(store.read_done().is_empty());
    }

    #[test]
    fn test_read_done_wrong_shape_is_empty() {
        let store = ProgressStore::new(MemoryBackend::new().with_value(DONE_KEY, r#"{"a":1}"#));

        assert!(store.read_done().is_empty());
    }

    #[test]
    fn test_toggle_done_appends_in_order() {
        let store = ProgressStore::in_memory();

        store.toggle_done("kernels").unwrap();
        let done = store.toggle_done("perceptron").unwrap();

        assert_eq!(done, vec!["kernels".to_owned(), "perceptron".to_owned()]);
        assert!(store.is_done("kernels"));
        assert!(!store.is_done("boosting"));
    }

    #[test]
    fn test_toggle_done_twice_restores_original() {
        let store = ProgressStore::in_memory();
        store.toggle_done("kernels").unwrap();
        let before = store.read_done();

        store.toggle_done("perceptron").unwrap();
        let after = store.toggle_done("perceptron").unwrap();

        assert_eq!(after, before);
    }

    #[test]
    fn test_set_quiz_total_then_correct_answers_marks_done() {
        let store = ProgressStore::in_memory();

        store.set_quiz_total("perceptron", 3).unwrap();
        for question in ["q1", "q2"] {
            store
                .set_quiz_answer("perceptron", &quiz_id("perceptron", question), 0, true)
                .unwrap();
        }
        assert!(!store.is_done("perceptron"));

        store
            .set_quiz_answer("perceptron", &quiz_id("perceptron", "q3"), 2, true)
            .unwrap();

        assert!(store.is_done("perceptron"));
        assert_eq!(
            store.quiz_completion("perceptron"),
            QuizCompletion {
                total: 3,
                answered: 3,
                correct: 3,
                completed: true,
            }
        );
    }

    #[test]
    fn test_answers_before_total_complete_when_total_arrives() {
        let store = ProgressStore::in_memory();
        store.set_quiz_answer("kernels", "kernels::a", 1, true).unwrap();
        store.set_quiz_answer("kernels", "kernels::b", 0, true).unwrap();

        store.set_quiz_total("kernels", 2).unwrap();

        assert_eq!(store.read_done(), vec!["kernels".to_owned()]);
    }

    #[test]
    fn test_incorrect_answers_do_not_complete() {
        let store = ProgressStore::in_memory();
        store.set_quiz_total("kernels", 2).unwrap();

        store.set_quiz_answer("kernels", "kernels::a", 1, true).unwrap();
        store.set_quiz_answer("kernels", "kernels::b", 3, false).unwrap();

        let completion = store.quiz_completion("kernels");
        assert_eq!(completion.answered, 2);
        assert_eq!(completion.correct, 1);
        assert!(!completion.completed);
        assert!(!store.is_done("kernels"));
    }

    #[test]
    fn test_auto_complete_does_not_duplicate_done_entry() {
        let store = ProgressStore::in_memory();
        store.toggle_done("kernels").unwrap();
        store.set_quiz_total("kernels", 1).unwrap();

        store.set_quiz_answer("kernels", "kernels::a", 0, true).unwrap();
        store.set_quiz_answer("kernels", "kernels::a", 0, true).unwrap();

        assert_eq!(store.read_done(), vec!["kernels".to_owned()]);
    }

    #[test]
    fn test_answer_replaces_previous_answer() {
        let store = ProgressStore::in_memory();

        store.set_quiz_answer("kernels", "kernels::a", 1, false).unwrap();
        store.set_quiz_answer("kernels", "kernels::a", 2, true).unwrap();

        assert_eq!(
            store.quiz_answer("kernels", "kernels::a"),
            Some(QuizAnswer {
                selected: 2,
                correct: true,
            })
        );
        assert_eq!(store.quiz_completion("kernels").answered, 1);
    }

    #[test]
    fn test_empty_inputs_are_ignored() {
        let store = ProgressStore::in_memory();
        let events = store.subscribe();

        store.set_quiz_total("", 3).unwrap();
        store.set_quiz_total("kernels", 0).unwrap();
        store.set_quiz_answer("", "x::y", 0, true).unwrap();
        store.set_quiz_answer("kernels", "", 0, true).unwrap();

        assert!(store.read_quiz_progress_map().is_empty());
        assert!(events.try_recv().is_none());
    }

    #[test]
    fn test_quiz_answer_missing() {
        let store = ProgressStore::in_memory();

        assert_eq!(store.quiz_answer("kernels", "kernels::a"), None);
        assert_eq!(store.quiz_completion("kernels"), QuizCompletion::default());
    }

    #[test]
    fn test_malformed_quiz_store_reads_as_empty() {
        let store = ProgressStore::new(MemoryBackend::new().with_value(QUIZ_KEY, "[1, 2]"));

        assert!(store.read_quiz_progress_map().is_empty());
    }

    #[test]
    fn test_malformed_lesson_record_treated_as_fresh() {
        let raw = r#"{
            "kernels": {"answers": [1, 2]},
            "boosting": {"total": 1, "answers": {"boosting::a": {"selected": 0, "correct": true}}}
        }"#;
        let store = ProgressStore::new(MemoryBackend::new().with_value(QUIZ_KEY, raw));

        let map = store.read_quiz_progress_map();
        assert_eq!(map["kernels"], QuizCompletion::default());
        assert!(map["boosting"].completed);

        store.set_quiz_answer("kernels", "kernels::a", 0, true).unwrap();
        let completion = store.quiz_completion("kernels");
        assert_eq!(completion.total, 0);
        assert_eq!(completion.answered, 1);
    }

    #[test]
    fn test_lesson_record_without_answers_keeps_total() {
        let raw = r#"{"kernels": {"total": 2}}"#;
        let store = ProgressStore::new(MemoryBackend::new().with_value(QUIZ_KEY, raw));

        assert_eq!(
            store.read_quiz_progress_map()["kernels"],
            QuizCompletion {
                total: 2,
                answered: 0,
                correct: 0,
                completed: false,
            }
        );
    }

    #[test]
    fn test_each_mutation_emits_one_event() {
        let store = ProgressStore::in_memory();
        let first = store.subscribe();
        let second = store.subscribe();

        store.toggle_done("kernels").unwrap();
        store.set_quiz_total("kernels", 1).unwrap();
        store.set_quiz_answer("kernels", "kernels::a", 0, true).unwrap();

        for receiver in [&first, &second] {
            let events: Vec<_> = std::iter::from_fn(|| receiver.try_recv()).collect();
            assert_eq!(events, vec![ProgressEvent::changed(); 3]);
        }
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let store = ProgressStore::in_memory();
        drop(store.subscribe());
        let live = store.subscribe();

        store.toggle_done("kernels").unwrap();

        assert_eq!(live.try_recv(), Some(ProgressEvent::changed()));
        assert_eq!(store.subscribers.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_write_sends_no_event() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("progress");
        std::fs::write(&blocker, "file").unwrap();
        let store = ProgressStore::open(&blocker);
        let events = store.subscribe();

        let result = store.toggle_done("kernels");

        assert!(result.is_err());
        assert!(events.try_recv().is_none());
    }

    /// Memory backend that refuses to persist the done list.
    struct ReadOnlyDone(MemoryBackend);

    impl ProgressBackend for ReadOnlyDone {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), ProgressError> {
            if key == DONE_KEY {
                return Err(ProgressError::write(
                    key,
                    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                ));
            }
            self.0.set(key, value)
        }
    }

    #[test]
    fn test_failed_auto_complete_still_announces_quiz_write() {
        let store = ProgressStore::new(ReadOnlyDone(MemoryBackend::new()));
        store.set_quiz_total("kernels", 1).unwrap();
        let events = store.subscribe();

        let result = store.set_quiz_answer("kernels", "kernels::a", 0, true);

        assert!(matches!(result, Err(ProgressError::Write { ref key, .. }) if key == DONE_KEY));
        assert_eq!(
            store.quiz_answer("kernels", "kernels::a"),
            Some(QuizAnswer {
                selected: 0,
                correct: true,
            })
        );
        assert_eq!(events.try_recv(), Some(ProgressEvent::changed()));
        assert!(events.try_recv().is_none());
        assert!(store.read_done().is_empty());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        {
            let store = ProgressStore::open(dir.path());
            store.set_quiz_total("perceptron", 1).unwrap();
            store
                .set_quiz_answer("perceptron", "perceptron::q", 1, true)
                .unwrap();
        }

        let reopened = ProgressStore::open(dir.path());

        assert_eq!(
            reopened.snapshot(),
            ProgressSnapshot {
                done: vec!["perceptron".to_owned()],
                quiz: BTreeMap::from([(
                    "perceptron".to_owned(),
                    QuizCompletion {
                        total: 1,
                        answered: 1,
                        correct: 1,
                        completed: true,
                    }
                )]),
            }
        );
    }

    #[test]
    fn test_quiz_store_json_shape() {
        let backend = MemoryBackend::new();
        let store = ProgressStore::new(backend);
        store.set_quiz_answer("kernels", "kernels::a", 2, false).unwrap();

        let raw = store.backend.get(QUIZ_KEY).unwrap();

        assert_eq!(
            raw,
            r#"{"kernels":{"answers":{"kernels::a":{"selected":2,"correct":false}}}}"#
        );
    }
}
