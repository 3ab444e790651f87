use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Event, HtmlButtonElement, HtmlCanvasElement,
    HtmlDivElement, HtmlElement, KeyboardEvent, Window,
};

pub mod clock;
pub mod config;
pub mod input;
pub mod render;
pub mod sim;
pub mod ui;
pub mod viewport;

use clock::FrameClock;
use config::{GameConfig, WORLD_HEIGHT, WORLD_WIDTH};
use input::{Command, InputState};
use sim::{Game, Phase};
use ui::UiManager;
use viewport::DrawInfo;

const CANVAS_ID: &str = "game-canvas";
const MAX_BACKING_DIM: f64 = 4096.0;
const DIAGNOSTICS_EVERY: u64 = 15;

struct AppState {
    ctx: CanvasRenderingContext2d,
    canvas: HtmlCanvasElement,
    diagnostics: HtmlDivElement,
    diagnostics_text: HtmlElement,
    tools_button: HtmlButtonElement,
    document: Document,
    config: GameConfig,
    seed: u64,
    game: Game,
    ui: UiManager,
    input: InputState,
    clock: FrameClock,
    draw_info: Option<DrawInfo>,
    hud_frame_css: Option<(i32, i32, i32, i32)>,
    geometry_dirty: bool,
    frame_count: u64,
    user_agent: String,
    last_event: String,
}

fn window() -> Window {
    web_sys::window().expect("missing window")
}

fn js_value_to_string(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn command_name(command: Command) -> &'static str {
    match command {
        Command::Start => "start",
        Command::Pause => "pause",
        Command::ToggleDebug => "toggle_debug",
        Command::ToggleMinimap => "toggle_minimap",
    }
}

fn set_status(document: &Document, diagnostics_text: &HtmlElement, status: &str, message: &str) {
    if let Some(el) = document.document_element() {
        let _ = el.set_attribute("data-render-status", status);
    }
    diagnostics_text.set_text_content(Some(message));
}

fn set_frame_css_vars(document: &Document, x: i32, y: i32, w: i32, h: i32) {
    let Some(el) = document.document_element() else {
        return;
    };
    let Ok(html_el) = el.dyn_into::<HtmlElement>() else {
        return;
    };

    let style = html_el.style();
    let _ = style.set_property("--frame-x", &format!("{}px", x));
    let _ = style.set_property("--frame-y", &format!("{}px", y));
    let _ = style.set_property("--frame-w", &format!("{}px", w));
    let _ = style.set_property("--frame-h", &format!("{}px", h));
}

fn set_diagnostics_open(state: &mut AppState, open: bool) {
    state.ui.debug.enabled = open;

    if let Some(el) = state.document.document_element() {
        let _ = el.set_attribute("data-diag-open", if open { "1" } else { "0" });
    }

    let _ = state
        .tools_button
        .set_attribute("aria-expanded", if open { "true" } else { "false" });
    let _ = state
        .tools_button
        .set_attribute("aria-pressed", if open { "true" } else { "false" });
    let _ = state.tools_button.set_attribute(
        "title",
        if open {
            "Hide diagnostics"
        } else {
            "Diagnostics"
        },
    );
    let _ = state
        .diagnostics
        .set_attribute("aria-hidden", if open { "false" } else { "true" });
}

fn update_geometry(state: &mut AppState) -> Result<(), JsValue> {
    let window = window();
    let dpr = window.device_pixel_ratio();
    let css_width = window.inner_width()?.as_f64().unwrap_or(1.0).max(1.0);
    let css_height = window.inner_height()?.as_f64().unwrap_or(1.0).max(1.0);
    let (width, height) = viewport::backing_size(css_width, css_height, dpr, MAX_BACKING_DIM);

    if state.canvas.width() != width {
        state.canvas.set_width(width);
    }
    if state.canvas.height() != height {
        state.canvas.set_height(height);
    }

    let info = viewport::compute_draw_info(width as f64, height as f64, WORLD_WIDTH, WORLD_HEIGHT);
    state.draw_info = Some(info);

    let scale_x = (width as f64) / css_width;
    let scale_y = (height as f64) / css_height;
    let frame_css = (
        (info.frame_x / scale_x).round() as i32,
        (info.frame_y / scale_y).round() as i32,
        (info.frame_width / scale_x).round() as i32,
        (info.frame_height / scale_y).round() as i32,
    );
    if state.hud_frame_css != Some(frame_css) {
        set_frame_css_vars(
            &state.document,
            frame_css.0,
            frame_css.1,
            frame_css.2,
            frame_css.3,
        );
        state.hud_frame_css = Some(frame_css);
    }

    state.geometry_dirty = false;
    Ok(())
}

fn update_diagnostics(state: &AppState) -> Result<(), JsValue> {
    let window = window();
    let dpr = window.device_pixel_ratio();

    let frame_line = match state.draw_info {
        Some(info) => format!(
            "frame: {}x{} @ ({}, {}) scale {:.3}",
            info.frame_width.round(),
            info.frame_height.round(),
            info.frame_x.round(),
            info.frame_y.round(),
            info.scale
        ),
        None => "frame: (pending)".to_string(),
    };

    let status = state
        .document
        .document_element()
        .and_then(|el| el.get_attribute("data-render-status"))
        .unwrap_or_else(|| "unknown".to_string());

    let user_agent = if state.user_agent.is_empty() {
        "(unavailable)".to_string()
    } else {
        let mut ua = state.user_agent.clone();
        if ua.len() > 120 {
            ua.truncate(120);
        }
        ua
    };

    let mut lines = vec![
        format!("status: {}", status),
        format!("event: {}", state.last_event),
        format!("seed: {}", state.seed),
        format!(
            "config: lives={} wave={} minimap={}",
            state.config.starting_lives, state.config.starting_wave, state.ui.minimap.visible
        ),
    ];
    lines.extend(state.ui.debug.lines());
    lines.extend([
        format!("score: {} (hi {})", state.ui.hud.score, state.ui.hud.high_score),
        format!("lives: {}  wave: {}", state.ui.hud.lives, state.ui.hud.wave),
        format!("messages: {}", state.ui.messages.len()),
        format!(
            "canvas: {}x{} (dpr {:.2})",
            state.canvas.width(),
            state.canvas.height(),
            dpr
        ),
        format!(
            "viewport: {}x{}",
            window.inner_width()?.as_f64().unwrap_or(0.0).floor(),
            window.inner_height()?.as_f64().unwrap_or(0.0).floor()
        ),
        frame_line,
        format!("world: {}x{}", WORLD_WIDTH, WORLD_HEIGHT),
        format!("ua: {}", user_agent),
    ]);

    state.diagnostics_text.set_text_content(Some(&lines.join("\n")));
    Ok(())
}

fn start_run(state: &mut AppState) {
    state.game.start();
    state.input.release_all();
    state.last_event = "run_start".to_string();
    set_status(&state.document, &state.diagnostics_text, "playing", "Playing");
}

fn apply_command(state: &mut AppState, command: Command) {
    state.last_event = format!("key_{}", command_name(command));
    match command {
        Command::Start => match state.game.phase() {
            Phase::Title | Phase::GameOver => start_run(state),
            Phase::Paused => state.game.toggle_pause(),
            Phase::Playing => {}
        },
        Command::Pause => state.game.toggle_pause(),
        Command::ToggleDebug => {
            let open = !state.ui.debug.enabled;
            set_diagnostics_open(state, open);
        }
        Command::ToggleMinimap => state.ui.minimap.toggle(),
    }
}

fn frame(state: &mut AppState, timestamp: f64) -> Result<(), JsValue> {
    if state.geometry_dirty || state.draw_info.is_none() {
        update_geometry(state)?;
    }

    let tick = state.clock.advance(timestamp);
    state.ui.debug.record_frame(tick.real_dt);

    let controls = state.input.controls();
    for _ in 0..tick.steps {
        state.game.update(config::FIXED_STEP, &controls);
    }

    let events = state.game.drain_events();
    if events
        .iter()
        .any(|event| matches!(event, sim::GameEvent::GameOver { .. }))
    {
        state.last_event = "game_over".to_string();
        set_status(&state.document, &state.diagnostics_text, "game_over", "Game over");
    }
    state.ui.handle_events(&events, state.game.elapsed());
    state.ui.sync(&state.game);

    if let Some(info) = state.draw_info {
        render::draw_frame(&state.ctx, &info, &state.game, &state.ui)?;
    }

    state.frame_count += 1;
    if state.ui.debug.enabled && state.frame_count % DIAGNOSTICS_EVERY == 0 {
        update_diagnostics(state)?;
    }
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(err) = start_impl() {
        let message = format!("fatal: {}", js_value_to_string(&err));
        log::error!("{}", message);

        if let Some(win) = web_sys::window() {
            if let Some(doc) = win.document() {
                if let Some(el) = doc.document_element() {
                    let _ = el.set_attribute("data-render-status", "error");
                }
                if let Some(diag) = doc.get_element_by_id("diagnostics-text") {
                    diag.set_text_content(Some(&message));
                } else if let Some(diag) = doc.get_element_by_id("diagnostics") {
                    diag.set_text_content(Some(&message));
                }
                if let Some(fallback) = doc.get_element_by_id("fallback") {
                    let _ = fallback.remove_attribute("hidden");
                }
            }
        }

        web_sys::console::error_1(&err);
    }
}

fn load_config(win: &Window) -> GameConfig {
    let search = win.location().search().unwrap_or_default();
    let (config, errors) = GameConfig::from_query(&search);

    // The logger can only be installed once; a second call just fails.
    let _ = console_log::init_with_level(config.log_level);
    for err in errors {
        log::warn!("ignoring query parameter: {}", err);
    }
    config
}

/// Builds the 2D context for `canvas`. Public so browser tests can drive the
/// renderer against a detached canvas.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D canvas unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("context is not a CanvasRenderingContext2d"))
}

fn start_impl() -> Result<(), JsValue> {
    let win = window();
    let document = win
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let config = load_config(&win);

    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| JsValue::from_str("Missing canvas"))?
        .dyn_into::<HtmlCanvasElement>()?;

    let tools_button = document
        .get_element_by_id("tools-button")
        .ok_or_else(|| JsValue::from_str("Missing tools button"))?
        .dyn_into::<HtmlButtonElement>()?;

    let diagnostics = document
        .get_element_by_id("diagnostics")
        .ok_or_else(|| JsValue::from_str("Missing diagnostics"))?
        .dyn_into::<HtmlDivElement>()?;
    let diagnostics_text = document
        .get_element_by_id("diagnostics-text")
        .ok_or_else(|| JsValue::from_str("Missing diagnostics text"))?
        .dyn_into::<HtmlElement>()?;

    let ctx = context_2d(&canvas)?;
    let user_agent = win.navigator().user_agent().unwrap_or_default();

    let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
    let game = Game::new(config.clone(), seed);
    let ui = UiManager::new(&config);
    log::info!("rock field starting (seed {})", seed);

    let state = Rc::new(RefCell::new(AppState {
        ctx,
        canvas,
        diagnostics,
        diagnostics_text,
        tools_button,
        document: document.clone(),
        seed,
        game,
        ui,
        input: InputState::default(),
        clock: FrameClock::default(),
        draw_info: None,
        hud_frame_css: None,
        geometry_dirty: true,
        frame_count: 0,
        user_agent,
        last_event: "init".to_string(),
        config,
    }));

    {
        let mut state = state.borrow_mut();
        let open = state.config.debug;
        set_diagnostics_open(&mut state, open);
        update_geometry(&mut state)?;
        set_status(
            &state.document,
            &state.diagnostics_text,
            "ready",
            "Press Enter or tap to start",
        );
        let _ = update_diagnostics(&state);
    }

    let state_toggle = Rc::clone(&state);
    let toggle = Closure::wrap(Box::new(move |_event: Event| {
        let mut state = state_toggle.borrow_mut();
        state.last_event = "toggle_diagnostics".to_string();
        let open = !state.ui.debug.enabled;
        set_diagnostics_open(&mut state, open);
        let _ = update_diagnostics(&state);
    }) as Box<dyn FnMut(_)>);

    state
        .borrow()
        .tools_button
        .add_event_listener_with_callback("click", toggle.as_ref().unchecked_ref())?;
    toggle.forget();

    let state_keydown = Rc::clone(&state);
    let on_keydown = Closure::wrap(Box::new(move |event: Event| {
        let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let key = key_event.key();
        if InputState::is_game_key(&key) {
            event.prevent_default();
        }

        let mut st = state_keydown.borrow_mut();
        if let Some(command) = st.input.key_down(&key, key_event.repeat()) {
            apply_command(&mut st, command);
        }
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref())?;
    on_keydown.forget();

    let state_keyup = Rc::clone(&state);
    let on_keyup = Closure::wrap(Box::new(move |event: Event| {
        let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        state_keyup.borrow_mut().input.key_up(&key_event.key());
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("keyup", on_keyup.as_ref().unchecked_ref())?;
    on_keyup.forget();

    let state_blur = Rc::clone(&state);
    let on_blur = Closure::wrap(Box::new(move |_event: Event| {
        let mut st = state_blur.borrow_mut();
        st.input.release_all();
        st.last_event = "blur".to_string();
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("blur", on_blur.as_ref().unchecked_ref())?;
    on_blur.forget();

    let state_visibility = Rc::clone(&state);
    let on_visibility = Closure::wrap(Box::new(move |_event: Event| {
        let mut st = state_visibility.borrow_mut();
        if st.document.hidden() {
            st.game.pause();
            st.input.release_all();
            st.last_event = "hidden".to_string();
        } else {
            st.clock.reset();
            st.last_event = "visible".to_string();
        }
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback(
        "visibilitychange",
        on_visibility.as_ref().unchecked_ref(),
    )?;
    on_visibility.forget();

    let state_pointer = Rc::clone(&state);
    let on_pointerdown = Closure::wrap(Box::new(move |event: Event| {
        event.prevent_default();

        // Taps on the canvas start a run from the title or game-over screen.
        // HUD controls are siblings of the canvas and never reach this handler.
        let mut st = state_pointer.borrow_mut();
        st.last_event = "pointerdown".to_string();
        if matches!(st.game.phase(), Phase::Title | Phase::GameOver) {
            start_run(&mut st);
        }
    }) as Box<dyn FnMut(_)>);

    state
        .borrow()
        .canvas
        .add_event_listener_with_callback("pointerdown", on_pointerdown.as_ref().unchecked_ref())?;
    on_pointerdown.forget();

    let state_resize = Rc::clone(&state);
    let resize_timer_handle: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));

    let state_resize_settle = Rc::clone(&state_resize);
    let resize_settle_cb: Rc<Closure<dyn FnMut()>> = Rc::new(Closure::wrap(Box::new(move || {
        let mut state = state_resize_settle.borrow_mut();
        state.last_event = "resize_settled".to_string();
        state.geometry_dirty = true;
    })
        as Box<dyn FnMut()>));

    let resize_timer_handle_ev = Rc::clone(&resize_timer_handle);
    let resize_settle_cb_ev = Rc::clone(&resize_settle_cb);
    let resize = Closure::wrap(Box::new(move |_event: Event| {
        state_resize.borrow_mut().last_event = "resize_event".to_string();

        if let Some(id) = resize_timer_handle_ev.borrow_mut().take() {
            window().clear_timeout_with_handle(id);
        }

        match window().set_timeout_with_callback_and_timeout_and_arguments_0(
            resize_settle_cb_ev.as_ref().as_ref().unchecked_ref(),
            140,
        ) {
            Ok(id) => {
                *resize_timer_handle_ev.borrow_mut() = Some(id);
            }
            Err(_) => {
                state_resize.borrow_mut().geometry_dirty = true;
            }
        }
    }) as Box<dyn FnMut(_)>);

    win.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
    resize.forget();

    let raf_holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let raf_next = Rc::clone(&raf_holder);
    let state_frame = Rc::clone(&state);
    *raf_holder.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        {
            let mut st = state_frame.borrow_mut();
            if let Err(err) = frame(&mut st, ts) {
                st.last_event = format!("frame_error ({})", js_value_to_string(&err));
                log::error!("{}", st.last_event);
            }
        }

        if let Some(cb) = raf_next.borrow().as_ref() {
            let _ = window().request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(cb) = raf_holder.borrow().as_ref() {
        win.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }

    Ok(())
}
