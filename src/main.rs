use std::time::Duration;

use clap::Parser;
use eframe::egui;
use log::{debug, error, info, warn};

use sprocket::cli::Args;
use sprocket::core::effect::{Font, FontFamily};
use sprocket::core::event_queue::EventSender;
use sprocket::core::stepper::{FrameStepper, StepOutcome};
use sprocket::demo::DemoApp;
use sprocket::paths::{self, PathConfig};
use sprocket::platform::{EguiBackend, InputTranslator};
use sprocket::settings::Settings;
use sprocket::shell;

/// eframe host: translates input, steps one frame, paces repaints.
struct SprocketApp {
    stepper: FrameStepper<DemoApp, EguiBackend>,
    backend: EguiBackend,
    input: InputTranslator,
    sender: EventSender,
    frame_delay: Duration,
}

impl eframe::App for SprocketApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let events = ctx.input(|i| {
            self.backend.sync(i);
            self.input.translate(i)
        });
        for event in events {
            self.sender.send(event);
        }

        match self.stepper.step_frame(&mut self.backend) {
            Ok(StepOutcome::Continue) => ctx.request_repaint_after(self.frame_delay),
            Ok(StepOutcome::Quit) => {
                info!("Quit requested, exiting");
                std::process::exit(0);
            }
            Err(e) => {
                error!("Frame failed: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let path_config = PathConfig::from_env_and_cli(args.config_dir.clone());
    if let Err(e) = paths::ensure_dirs(&path_config) {
        eprintln!("Warning: Failed to create application directories: {:#}", e);
    }

    let log_path = args
        .log_file
        .as_ref()
        .map(|p| p.clone().unwrap_or_else(|| paths::data_file(paths::LOG_FILE, &path_config)));
    shell::init_logger(args.verbosity, log_path.as_deref())?;

    info!("Sprocket starting...");
    debug!("Command-line args: {:?}", args);

    let settings_path = paths::config_file(paths::SETTINGS_FILE, &path_config);
    info!("Config path: {}", settings_path.display());
    let mut settings = Settings::load_or_default(&settings_path);
    if !settings_path.exists() {
        if let Err(e) = settings.save(&settings_path) {
            warn!("Could not write default settings: {:#}", e);
        }
    }

    // CLI overrides
    if let Some(n) = args.workers {
        settings.workers = n.max(1);
    }
    if let Some(w) = args.width {
        settings.window_width = w;
    }
    if let Some(h) = args.height {
        settings.window_height = h;
    }

    let workers = settings.worker_threads();
    let fonts = settings.fonts();
    let font = Font::new(FontFamily::Proportional, settings.legible_font_size);
    let frame_delay = Duration::from_millis(settings.frame_delay_ms);
    info!("Decode workers: {}, frame delay: {:?}", workers, frame_delay);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("Sprocket v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size([settings.window_width, settings.window_height])
            .with_resizable(true)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let files = args.files;
    eframe::run_native(
        "Sprocket",
        native_options,
        Box::new(move |cc| {
            let network = DemoApp::new(files, font);
            let stepper = FrameStepper::new(network, fonts, workers)?;
            let sender = stepper.sender();
            Ok(Box::new(SprocketApp {
                stepper,
                backend: EguiBackend::new(cc.egui_ctx.clone()),
                input: InputTranslator::new(),
                sender,
                frame_delay,
            }))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))
}
