use std::rc::Rc;

use anyhow::Context;
use gallery_select::gtk_grid::{attach, GtkGridSurface, DRAG_MARKER_CSS_CLASS, SELECTED_CSS_CLASS};
use gallery_select::{
    load_gesture_config, logging, AppResult, GestureConfig, PhotoId, PhotoSequence,
};
use gtk4::prelude::*;
use gtk4::{
    Application, ApplicationWindow, Box as GtkBox, Button, CssProvider, FlowBox, Frame, Label,
    Orientation, ScrolledWindow,
};

const APP_ID: &str = "io.github.gallery_select.Demo";
const DEMO_PHOTO_COUNT: usize = 600;
const TILE_SIZE: i32 = 120;
const IDLE_STATUS: &str = "Long-press a photo to start selecting";

fn main() -> anyhow::Result<()> {
    logging::init();
    let config = startup_config().context("gesture config rejected")?;
    tracing::info!(?config, "starting gallery-select demo");

    let application = Application::builder().application_id(APP_ID).build();
    application.connect_activate(move |app| build_window(app, config.clone()));
    let exit_code = application.run();
    if exit_code != gtk4::glib::ExitCode::SUCCESS {
        anyhow::bail!("gtk application exited with {exit_code:?}");
    }
    Ok(())
}

fn startup_config() -> AppResult<GestureConfig> {
    let config = load_gesture_config();
    config.validate()?;
    Ok(config)
}

fn build_window(app: &Application, config: GestureConfig) {
    install_css();
    let photos: PhotoSequence = (0..DEMO_PHOTO_COUNT)
        .map(|n| PhotoId::new(format!("demo-{n:04}")))
        .collect();

    let flow = FlowBox::new();
    flow.set_selection_mode(gtk4::SelectionMode::None);
    flow.set_homogeneous(true);
    flow.set_max_children_per_line(12);
    flow.set_valign(gtk4::Align::Start);

    let scroller = ScrolledWindow::new();
    scroller.set_vexpand(true);
    scroller.set_child(Some(&flow));

    let mut surface = GtkGridSurface::new(&scroller);
    for id in photos.ids() {
        let tile = Frame::new(None);
        tile.set_child(Some(&Label::new(Some(id.as_str()))));
        tile.set_size_request(TILE_SIZE, TILE_SIZE);
        tile.add_css_class("photo-tile");
        flow.insert(&tile, -1);
        surface.register_tile(id, &tile);
    }

    let status = Label::new(Some(IDLE_STATUS));
    status.set_hexpand(true);
    status.set_xalign(0.0);
    let status_for_commit = status.clone();
    surface.connect_selection_committed(move |selection| {
        if selection.select_mode_active {
            status_for_commit.set_text(&format!("{} selected", selection.count()));
        } else {
            status_for_commit.set_text(IDLE_STATUS);
        }
    });
    let status_for_live = status.clone();
    surface.connect_live_count_changed(move |count| {
        status_for_live.set_text(&format!("{count} selected…"));
    });

    let engine = attach(&scroller, config, surface, |id| {
        tracing::info!(%id, "viewer requested");
    });
    engine.borrow_mut().replace_photos(photos);

    let done = Button::with_label("Done");
    let done_engine = Rc::clone(&engine);
    done.connect_clicked(move |_| {
        done_engine.borrow_mut().exit_select_mode();
    });

    let header = GtkBox::new(Orientation::Horizontal, 8);
    header.set_margin_top(6);
    header.set_margin_bottom(6);
    header.set_margin_start(12);
    header.set_margin_end(12);
    header.append(&status);
    header.append(&done);

    let root = GtkBox::new(Orientation::Vertical, 0);
    root.append(&header);
    root.append(&scroller);

    let window = ApplicationWindow::builder()
        .application(app)
        .title("gallery-select")
        .default_width(960)
        .default_height(720)
        .child(&root)
        .build();
    window.present();
}

fn install_css() {
    let css = format!(
        ".photo-tile {{ border-radius: 6px; }}\n\
         .photo-tile.{SELECTED_CSS_CLASS}, .photo-tile.{DRAG_MARKER_CSS_CLASS} {{ \
         outline: 3px solid #3584e4; outline-offset: -3px; }}"
    );
    let provider = CssProvider::new();
    provider.load_from_data(&css);
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
