//! Learner progress for mlv.
//!
//! Tracks which lessons are done and how each lesson's quiz has been
//! answered. State is kept in a [`ProgressBackend`] as JSON values under
//! fixed keys, so the on-disk format matches what the site's browser client
//! keeps in local storage.
//!
//! # Example
//!
//! ```
//! use mlv_progress::{ProgressStore, quiz_id};
//!
//! let store = ProgressStore::in_memory();
//! store.set_quiz_total("perceptron", 1).unwrap();
//! store
//!     .set_quiz_answer("perceptron", &quiz_id("perceptron", "Is it linear?"), 0, true)
//!     .unwrap();
//!
//! assert!(store.is_done("perceptron"));
//! ```

mod backend;
mod error;
mod event;
mod store;
mod watch;

pub use backend::{FileBackend, MemoryBackend, ProgressBackend};
pub use error::ProgressError;
pub use event::{
    PROGRESS_EVENT, ProgressEvent, ProgressEventKind, ProgressEventReceiver, WatchHandle,
};
pub use store::{
    DONE_KEY, ProgressSnapshot, ProgressStore, QUIZ_KEY, QuizAnswer, QuizCompletion,
    QuizLessonState, quiz_id,
};
pub use watch::watch_dir;
