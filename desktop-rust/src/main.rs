mod app;
mod io;
mod model;

use app::DesktopApp;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "OmVetan Payroll",
        options,
        Box::new(|_cc| Box::new(DesktopApp::default())),
    )
}
