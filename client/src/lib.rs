mod app;
mod dom;
mod persistence;
mod render;
mod state;
mod util;

pub use app::run;
