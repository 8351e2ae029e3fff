//! # Markdown Codec
//!
//! Converts between script files and the [`Script`](crate::domain::Script)
//! model.
//!
//! ## File Format
//!
//! ```text
//! ---
//! scriptId: "lesson-1"
//! title: "Fire hit VFX"
//! exportDate: "2024-05-01T08:30:00.000Z"
//! ---
//!
//! # Fire hit VFX
//!
//! ## Intro
//!
//! <!-- TABLE_START -->
//! | 录视频 | 配音 | 时间轴 | 画面内容 | 旁白/对话 | 备注 |
//! | :---: | :---: | --- | --- | --- | --- |
//! | ✓ |   | <!-- id:t1 video:checked audio:unchecked -->0:15 | ... | ... | ... |
//! <!-- TABLE_END -->
//!
//! ### Chapter
//! ...
//! ```
//!
//! ## Key Types
//!
//! - [`decode`] / [`decode_with_diagnostics`] - Markdown to script
//! - [`encode`] / [`Encoder`] - script to Markdown
//! - [`Diagnostic`] - non-fatal findings from a decode
//! - [`Clock`] - injectable time source for `exportDate`

mod clock;
mod decoder;
mod diagnostic;
mod encoder;
mod frontmatter;
mod hierarchy;
mod marker;
mod table;

pub use clock::{Clock, FixedClock, SystemClock};
pub use decoder::{decode, decode_with_diagnostics, DecodeError, Decoded};
pub use diagnostic::Diagnostic;
pub use encoder::{encode, Encoder};
pub use marker::Marker;
