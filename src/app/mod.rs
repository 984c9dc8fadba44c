mod app;
mod handler;
mod previews;
mod ui;

pub use handler::AppHandler;
