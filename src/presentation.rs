//! Terminal front end: input surface, chat rendering and the top panel

mod input;
mod panel;
mod render;

pub use input::{Command, InputSurface, HELP};
pub use render::{ChatView, Line};
