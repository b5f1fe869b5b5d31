use clap::Parser;
use eframe::egui;

use zone_edit::app::ZoneApp;
use zone_edit::config::{Cli, Settings};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zone_edit=info".into()),
        )
        .init();

    let settings = Settings::from_cli(Cli::parse());
    let title = match &settings.image {
        Some(path) => format!(
            "zone-edit — {} — {}",
            settings.site,
            path.file_name().unwrap_or_default().to_string_lossy()
        ),
        None => format!("zone-edit — {}", settings.site),
    };
    tracing::info!("Starting zone editor for site {}", settings.site);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(ZoneApp::new(settings)))),
    )
}
