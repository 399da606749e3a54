//! Resume data model, read-only renderer and form populator.

pub mod form;
pub mod render;
pub mod value;

pub use form::{ControlKind, FormControl, ResumeForm};
pub use render::{render_lines, render_plain_text, render_record, RenderNode};
pub use value::Record;
