mod gui;

use gradebook::storage::DATA_FILE;
use iced::{window, Size};
use tracing_subscriber::EnvFilter;

const WINDOW_TITLE: &str = "Student Manager";
const WINDOW_SIZE: (f32, f32) = (800.0, 600.0);

/// Log filter comes from GRADEBOOK_LOG, then RUST_LOG, else `gradebook=info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("GRADEBOOK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("gradebook=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> iced::Result {
    init_tracing();

    iced::application(
        WINDOW_TITLE,
        gui::StudentManagerApp::update,
        gui::StudentManagerApp::view,
    )
    .subscription(gui::StudentManagerApp::subscription)
    .window(window::Settings {
        size: Size::new(WINDOW_SIZE.0, WINDOW_SIZE.1),
        resizable: true,
        // close requests go through the app so the roster is saved first
        exit_on_close_request: false,
        ..window::Settings::default()
    })
    .run_with(|| gui::StudentManagerApp::new(DATA_FILE))
}
