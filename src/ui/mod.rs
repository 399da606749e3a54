//! User interface components and views.
//!
//! Views are whole screens owned by [`App`](crate::app::App); components are
//! the widgets and dialogs they are built from.

pub mod components;
pub mod theme;
pub mod views;
