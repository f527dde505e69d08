use std::path::PathBuf;
use std::process;

use clap::Parser;
use eframe::emath::Rect;
use eframe::epaint::Color32;
use egui::ViewportBuilder;
use log::{error, info, trace};
use pcb_artwork::{
    Assembly, GerberFileSettings, LayerKind, LayerRenderer, LogDiagnostics, ParserConfiguration, RenderConfiguration,
    Side, ViewState, draw_crosshair, draw_extents,
};
use pcb_artwork::spacial::Position;

const ZOOM_FACTOR: f32 = 1.1;

#[derive(Parser)]
#[command(name = "pcb_artwork_demo")]
#[command(about = "Shows the gerber layers of one board, aligned to a common origin", long_about = None)]
#[command(version)]
struct Cli {
    /// Mechanical outline gerber file
    #[arg(long, value_name = "FILE")]
    outline: Option<PathBuf>,

    /// Top overlay (silkscreen) gerber file
    #[arg(long, value_name = "FILE")]
    top_overlay: Option<PathBuf>,

    /// Top paste gerber file
    #[arg(long, value_name = "FILE")]
    top_paste: Option<PathBuf>,

    /// Bottom overlay (silkscreen) gerber file
    #[arg(long, value_name = "FILE")]
    bottom_overlay: Option<PathBuf>,

    /// Bottom paste gerber file
    #[arg(long, value_name = "FILE")]
    bottom_paste: Option<PathBuf>,
}

impl From<Cli> for GerberFileSettings {
    fn from(cli: Cli) -> Self {
        Self {
            mechanical_outline: cli.outline,
            top_overlay: cli.top_overlay,
            top_paste: cli.top_paste,
            bottom_overlay: cli.bottom_overlay,
            bottom_paste: cli.bottom_paste,
        }
    }
}

struct DemoApp {
    assembly: Assembly,
    side: Side,
    view_state: ViewState,
    render_configuration: RenderConfiguration,
    needs_initial_view: bool,

    // only valid if the mouse is over the viewport
    cursor_layer_coords: Option<Position>,
}

impl DemoApp {
    pub fn new(mut assembly: Assembly) -> Self {
        if let Some(offset) = assembly.align_to_origin() {
            info!("Aligned layers to origin. offset: {:?}", offset);
        }

        let side = match assembly.layer(LayerKind::TopOverlay) {
            Some(_) => Side::Top,
            None => Side::Bottom,
        };

        Self {
            assembly,
            side,
            view_state: Default::default(),
            render_configuration: Default::default(),
            needs_initial_view: true,
            cursor_layer_coords: None,
        }
    }

    fn reset_view(&mut self, viewport: Rect) {
        if let Some(extents) = self.assembly.combined_extents() {
            self.view_state.fit_view(viewport, &extents);
        }
        self.needs_initial_view = false;
    }

    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary) {
            self.view_state.translation += response.drag_delta();
            ui.ctx().clear_animations();
        }

        if !response.hovered() {
            return;
        }

        self.cursor_layer_coords = ui
            .input(|i| i.pointer.hover_pos())
            .map(|pointer_pos| self.view_state.screen_to_layer_coords(pointer_pos));

        let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);
        if scroll_delta != 0.0 {
            let old_scale = self.view_state.scale;
            let new_scale = if scroll_delta > 0.0 {
                old_scale * ZOOM_FACTOR
            } else {
                old_scale / ZOOM_FACTOR
            };

            // keep the point under the mouse where it is
            if let Some(hover_pos) = response.hover_pos() {
                let mouse_world = (hover_pos - self.view_state.translation) / old_scale;
                self.view_state.translation = hover_pos - mouse_world * new_scale;
            }

            self.view_state.scale = new_scale;
        }
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel")
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("PCB Artwork Demo");
                ui.label("Pan by using left-mouse button + drag, zoom using scroll wheel.");

                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.side, Side::Top, "Top");
                    ui.selectable_value(&mut self.side, Side::Bottom, "Bottom");
                    ui.checkbox(&mut self.render_configuration.fill_pads, "Fill pads");
                });

                ui.label(format!("coords: {:?}", self.cursor_layer_coords));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_rect(ui.available_rect_before_wrap(), egui::Sense::drag());
            let viewport = response.rect;

            if self.needs_initial_view {
                self.reset_view(viewport)
            }

            self.handle_input(ui, &response);
            trace!("update. view_state: {:?}, viewport: {:?}", self.view_state, viewport);

            let painter = ui.painter().with_clip_rect(viewport);

            let origin_screen_pos = self
                .view_state
                .layer_to_screen_coords(Position::origin());
            draw_crosshair(&painter, origin_screen_pos, Color32::BLUE);

            let renderer = LayerRenderer::default();
            for (kind, layer) in self.assembly.layers_for_side(self.side) {
                renderer.paint_layer(
                    &painter,
                    self.view_state,
                    layer,
                    layer_color(kind),
                    &self.render_configuration,
                );
            }

            if let Some(extents) = self.assembly.combined_extents() {
                draw_extents(&painter, &self.view_state, &extents, Color32::RED);
            }
        });
    }
}

fn layer_color(kind: LayerKind) -> Color32 {
    match kind {
        LayerKind::MechanicalOutline => Color32::LIGHT_GRAY,
        LayerKind::TopOverlay | LayerKind::BottomOverlay => Color32::WHITE,
        LayerKind::TopPaste | LayerKind::BottomPaste => Color32::from_rgb(0xC0, 0xC0, 0x40),
    }
}

fn main() -> eframe::Result<()> {
    init();

    let cli = Cli::parse();
    let settings = GerberFileSettings::from(cli);

    let assembly = match Assembly::load(&settings, &ParserConfiguration::default(), LogDiagnostics) {
        Ok(assembly) => assembly,
        Err(cause) => {
            error!("Unable to load layers. cause: {}", cause);
            eprintln!("Error: {}", cause);
            process::exit(1);
        }
    };

    for (kind, layer) in assembly.layers() {
        info!("{} extents: {:?}", kind, layer.find_extents());
    }

    eframe::run_native(
        "PCB Artwork Demo (egui)",
        eframe::NativeOptions {
            viewport: ViewportBuilder::default().with_inner_size([1024.0, 768.0]),
            ..Default::default()
        },
        Box::new(|_cc| Ok(Box::new(DemoApp::new(assembly)))),
    )
}

pub fn init() {
    env_logger::init(); // Log to stderr (optional).

    #[cfg(feature = "profile-with-puffin")]
    {
        start_puffin_server();
    }
}

#[cfg(feature = "profile-with-puffin")]
fn start_puffin_server() {
    profiling::puffin::set_scopes_on(true); // tell puffin to collect data

    match puffin_http::Server::new("127.0.0.1:8585") {
        Ok(puffin_server) => {
            info!("Run:  cargo install puffin_viewer && puffin_viewer --url 127.0.0.1:8585");

            std::process::Command::new("puffin_viewer")
                .arg("--url")
                .arg("127.0.0.1:8585")
                .spawn()
                .ok();

            // Dropping the server closes it.
            #[allow(clippy::mem_forget)]
            std::mem::forget(puffin_server);
        }
        Err(err) => {
            error!("Failed to start puffin server: {err}");
        }
    };
}
