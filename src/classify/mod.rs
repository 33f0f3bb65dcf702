//! Heuristics deciding whether a commit is a test refactoring candidate.
//!
//! A commit qualifies when its message mentions both a `test*` word and a
//! `refactor*` word, and at least one changed file looks like test code
//! (`*Test.java` / `*test.java`, or a file name starting with `Test`/`test`).
//! A qualifying commit is additionally "test only" when every changed file
//! follows the `*Test.java` / `*test.java` convention.

pub mod commit;
pub mod file;
pub mod message;

pub use commit::{Classification, CommitClassifier};
pub use file::FileClassifier;
pub use message::matches_refactor_intent;
