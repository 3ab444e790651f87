#![cfg(target_arch = "wasm32")]

use rock_field::config::{GameConfig, WORLD_HEIGHT, WORLD_WIDTH};
use rock_field::sim::{Controls, Game};
use rock_field::ui::UiManager;
use rock_field::{context_2d, render, viewport};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas(width: u32, height: u32) -> HtmlCanvasElement {
    let window = web_sys::window().expect("no window");
    let document = window.document().expect("no document");
    let canvas = document
        .create_element("canvas")
        .expect("create canvas")
        .dyn_into::<HtmlCanvasElement>()
        .expect("canvas element");
    canvas.set_width(width);
    canvas.set_height(height);
    canvas
}

fn pixel(canvas: &HtmlCanvasElement, x: f64, y: f64) -> Vec<u8> {
    let ctx = context_2d(canvas).expect("2d context");
    ctx.get_image_data(x, y, 1.0, 1.0)
        .expect("image data")
        .data()
        .0
}

#[wasm_bindgen_test]
fn canvas_2d_context_available() {
    let canvas = canvas(64, 48);
    assert!(context_2d(&canvas).is_ok());
}

#[wasm_bindgen_test]
fn title_frame_draws_letterbox_and_field() {
    let canvas = canvas(1600, 600);
    let ctx = context_2d(&canvas).expect("2d context");
    let config = GameConfig::default();
    let game = Game::new(config.clone(), 17);
    let mut ui = UiManager::new(&config);
    ui.sync(&game);

    let info = viewport::compute_draw_info(1600.0, 600.0, WORLD_WIDTH, WORLD_HEIGHT);
    render::draw_frame(&ctx, &info, &game, &ui).expect("draw");

    // Left bar stays black, the field inside the frame is the dark blue fill.
    assert_eq!(pixel(&canvas, 10.0, 300.0), vec![0, 0, 0, 255]);
    let inside = pixel(&canvas, 402.0, 598.0);
    assert_eq!(inside[3], 255);
    assert!(inside[2] > inside[0]);
}

#[wasm_bindgen_test]
fn every_overlay_renders_without_error() {
    let canvas = canvas(800, 600);
    let ctx = context_2d(&canvas).expect("2d context");
    let config = GameConfig {
        debug: true,
        starting_lives: 1,
        ..GameConfig::default()
    };
    let mut game = Game::new(config.clone(), 3);
    let mut ui = UiManager::new(&config);
    let info = viewport::compute_draw_info(800.0, 600.0, WORLD_WIDTH, WORLD_HEIGHT);

    game.start();
    let fire = Controls {
        fire: true,
        thrust: true,
        ..Controls::default()
    };
    for _ in 0..30 {
        game.update(1.0 / 60.0, &fire);
    }
    ui.handle_events(&game.drain_events(), game.elapsed());
    ui.sync(&game);
    render::draw_frame(&ctx, &info, &game, &ui).expect("playing frame");

    game.toggle_pause();
    ui.sync(&game);
    assert!(ui.paused);
    render::draw_frame(&ctx, &info, &game, &ui).expect("paused frame");
    game.toggle_pause();

    let mut guard = 0;
    while game.phase() != rock_field::sim::Phase::GameOver && guard < 60 * 120 {
        game.update(1.0 / 60.0, &Controls::default());
        guard += 1;
    }
    ui.handle_events(&game.drain_events(), game.elapsed());
    ui.sync(&game);
    render::draw_frame(&ctx, &info, &game, &ui).expect("final frame");
}
