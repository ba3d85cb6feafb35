pub mod gallery;
pub mod keybindings;
pub mod lightbox;
pub mod particles;
pub mod texture;
pub mod window;

pub use window::LandingWindow;
