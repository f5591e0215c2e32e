use eframe::egui;
use tangocho::gui::TangochoApp;

fn main() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Tangocho"),
        ..Default::default()
    };

    eframe::run_native(
        "tangocho",
        options,
        Box::new(|cc| Ok(Box::new(TangochoApp::new(cc)))),
    )
}
