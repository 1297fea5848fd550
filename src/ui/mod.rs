mod app;
mod artifact;
mod draw;

pub use app::App;
pub use draw::draw_ui;
