pub mod background;
pub mod components;
pub mod starfield;
pub mod systems;
