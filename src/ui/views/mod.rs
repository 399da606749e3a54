//! Application views (screens).

mod detail;
mod edit;

pub use detail::{DetailAction, DetailView};
pub use edit::{EditAction, EditView};
