//! Domain models for shotlist
//!
//! Contains the script model without any I/O concerns.

mod column;
mod id;
mod meta;
mod progress;
mod script;

pub use column::{Column, LabelSet};
pub use id::{IdError, TaskId};
pub use meta::{keys, ScriptMeta};
pub use progress::Progress;
pub use script::{Chapter, EditError, Placement, Script, Section, Task};
