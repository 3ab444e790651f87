use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::sim::{Game, Vec2};
use crate::ui::{BlipKind, UiManager};
use crate::viewport::DrawInfo;

const LETTERBOX: &str = "#000";
const FIELD: &str = "#05070d";
const INK: &str = "#e8ecf4";
const DIM: &str = "rgba(232, 236, 244, 0.55)";
const BULLET: &str = "#ffe27a";
const FLAME: &str = "#ff9a3c";
const DEBUG: &str = "rgba(90, 255, 140, 0.8)";
const MINIMAP_BG: &str = "rgba(10, 14, 26, 0.75)";
const SHADE: &str = "rgba(0, 0, 0, 0.55)";
const FONT: &str = "monospace";

/// Copies of a circle needed to draw it across the wrap seam: the original
/// plus one per edge it straddles, and a corner copy when it straddles two.
pub fn wrap_offsets(pos: Vec2, radius: f64, width: f64, height: f64) -> Vec<(f64, f64)> {
    let mut xs = vec![0.0];
    if pos.x - radius < 0.0 {
        xs.push(width);
    } else if pos.x + radius > width {
        xs.push(-width);
    }
    let mut ys = vec![0.0];
    if pos.y - radius < 0.0 {
        ys.push(height);
    } else if pos.y + radius > height {
        ys.push(-height);
    }

    xs.iter()
        .flat_map(|&dx| ys.iter().map(move |&dy| (dx, dy)))
        .collect()
}

fn font(ctx: &CanvasRenderingContext2d, px: u32) {
    ctx.set_font(&format!("{}px {}", px, FONT));
}

fn polyline(ctx: &CanvasRenderingContext2d, points: impl IntoIterator<Item = Vec2>, dx: f64, dy: f64) {
    ctx.begin_path();
    let mut first = true;
    for p in points {
        if first {
            ctx.move_to(p.x + dx, p.y + dy);
            first = false;
        } else {
            ctx.line_to(p.x + dx, p.y + dy);
        }
    }
    ctx.close_path();
}

fn circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(x, y, r, 0.0, TAU)
}

pub fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    info: &DrawInfo,
    game: &Game,
    ui: &UiManager,
) -> Result<(), JsValue> {
    let (width, height) = game.size();

    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.set_global_alpha(1.0);
    ctx.set_fill_style_str(LETTERBOX);
    ctx.fill_rect(0.0, 0.0, info.canvas_width, info.canvas_height);

    ctx.set_transform(info.scale, 0.0, 0.0, info.scale, info.frame_x, info.frame_y)?;
    ctx.save();
    ctx.begin_path();
    ctx.rect(0.0, 0.0, width, height);
    ctx.clip();
    ctx.set_fill_style_str(FIELD);
    ctx.fill_rect(0.0, 0.0, width, height);
    ctx.set_line_width(1.5);
    ctx.set_line_join("round");

    draw_asteroids(ctx, game);
    draw_bullets(ctx, game)?;
    draw_ship(ctx, game, ui.now());
    if ui.debug.enabled {
        draw_collision_circles(ctx, game)?;
    }
    ctx.restore();

    draw_hud(ctx, game, ui)?;
    draw_messages(ctx, game, ui)?;
    if ui.minimap.visible {
        draw_minimap(ctx, game, ui)?;
    }

    if ui.title {
        draw_title(ctx, game, ui)?;
    } else if ui.paused {
        draw_pause(ctx, game)?;
    } else if ui.game_over.visible {
        draw_game_over(ctx, game, ui)?;
    }

    if ui.debug.enabled {
        draw_debug_text(ctx, ui)?;
    }

    ctx.set_global_alpha(1.0);
    Ok(())
}

fn draw_asteroids(ctx: &CanvasRenderingContext2d, game: &Game) {
    let (width, height) = game.size();
    ctx.set_stroke_style_str(INK);
    for asteroid in game.asteroids() {
        let body = &asteroid.body;
        for (dx, dy) in wrap_offsets(body.pos, body.radius * 1.15, width, height) {
            polyline(ctx, asteroid.polygon(), dx, dy);
            ctx.stroke();
        }
    }
}

fn draw_bullets(ctx: &CanvasRenderingContext2d, game: &Game) -> Result<(), JsValue> {
    ctx.set_fill_style_str(BULLET);
    for bullet in game.bullets() {
        circle(ctx, bullet.body.pos.x, bullet.body.pos.y, bullet.body.radius)?;
        ctx.fill();
    }
    Ok(())
}

fn draw_ship(ctx: &CanvasRenderingContext2d, game: &Game, now: f64) {
    let Some(ship) = game.ship() else {
        return;
    };
    // Blink at 8 Hz while the spawn shield is up.
    if !ship.is_vulnerable() && (now * 8.0).floor() as i64 % 2 == 1 {
        return;
    }

    let (width, height) = game.size();
    for (dx, dy) in wrap_offsets(ship.body.pos, ship.body.radius * 1.5, width, height) {
        if ship.thrusting && (now * 30.0).floor() as i64 % 2 == 0 {
            ctx.set_stroke_style_str(FLAME);
            polyline(ctx, ship.flame(), dx, dy);
            ctx.stroke();
        }
        ctx.set_stroke_style_str(INK);
        polyline(ctx, ship.hull(), dx, dy);
        ctx.stroke();
    }
}

fn draw_collision_circles(ctx: &CanvasRenderingContext2d, game: &Game) -> Result<(), JsValue> {
    ctx.set_stroke_style_str(DEBUG);
    ctx.set_line_width(1.0);
    let bodies = game
        .asteroids()
        .iter()
        .map(|a| a.body)
        .chain(game.bullets().iter().map(|b| b.body))
        .chain(game.ship().map(|s| s.body));
    for body in bodies {
        circle(ctx, body.pos.x, body.pos.y, body.radius)?;
        ctx.stroke();
    }
    Ok(())
}

fn draw_life_icon(ctx: &CanvasRenderingContext2d, x: f64, y: f64) {
    let r = 9.0;
    let points = [
        Vec2::new(x, y - r * 1.3),
        Vec2::new(x - r * 0.8, y + r),
        Vec2::new(x, y + r * 0.5),
        Vec2::new(x + r * 0.8, y + r),
    ];
    polyline(ctx, points, 0.0, 0.0);
    ctx.stroke();
}

fn draw_hud(ctx: &CanvasRenderingContext2d, game: &Game, ui: &UiManager) -> Result<(), JsValue> {
    let (width, _) = game.size();
    let hud = &ui.hud;

    ctx.set_fill_style_str(INK);
    ctx.set_text_baseline("top");
    font(ctx, 26);
    ctx.set_text_align("left");
    ctx.fill_text(&hud.score_text(), 20.0, 16.0)?;

    font(ctx, 16);
    ctx.set_fill_style_str(DIM);
    ctx.fill_text(&hud.high_score_text(), 20.0, 48.0)?;

    if !ui.title {
        ctx.set_text_align("center");
        ctx.fill_text(&hud.wave_text(), width * 0.5, 18.0)?;

        ctx.set_stroke_style_str(INK);
        ctx.set_line_width(1.5);
        for i in 0..hud.lives {
            draw_life_icon(ctx, width - 28.0 - i as f64 * 24.0, 32.0);
        }
    }
    Ok(())
}

fn draw_messages(ctx: &CanvasRenderingContext2d, game: &Game, ui: &UiManager) -> Result<(), JsValue> {
    let (width, height) = game.size();
    font(ctx, 22);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str(INK);

    for (i, (message, alpha)) in ui.messages.visible(ui.now()).enumerate() {
        ctx.set_global_alpha(alpha);
        ctx.fill_text(&message.text, width * 0.5, height * 0.28 + i as f64 * 30.0)?;
    }
    ctx.set_global_alpha(1.0);
    Ok(())
}

fn draw_minimap(ctx: &CanvasRenderingContext2d, game: &Game, ui: &UiManager) -> Result<(), JsValue> {
    let (width, height) = game.size();
    let map = &ui.minimap;
    let x0 = width - map.width - 16.0;
    let y0 = height - map.height - 16.0;

    ctx.set_fill_style_str(MINIMAP_BG);
    ctx.fill_rect(x0, y0, map.width, map.height);
    ctx.set_stroke_style_str(DIM);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(x0, y0, map.width, map.height);

    for blip in map.blips() {
        let color = match blip.kind {
            BlipKind::Ship => "#5ad1ff",
            BlipKind::Asteroid => INK,
            BlipKind::Bullet => BULLET,
        };
        ctx.set_fill_style_str(color);
        circle(ctx, x0 + blip.pos.x, y0 + blip.pos.y, blip.radius)?;
        ctx.fill();
    }
    Ok(())
}

fn shade(ctx: &CanvasRenderingContext2d, game: &Game) {
    let (width, height) = game.size();
    ctx.set_fill_style_str(SHADE);
    ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_title(ctx: &CanvasRenderingContext2d, game: &Game, ui: &UiManager) -> Result<(), JsValue> {
    let (width, height) = game.size();
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str(INK);
    font(ctx, 64);
    ctx.fill_text("ROCK FIELD", width * 0.5, height * 0.42)?;

    if (ui.now() * 1.5).fract() < 0.65 {
        font(ctx, 20);
        ctx.fill_text("PRESS ENTER OR TAP TO START", width * 0.5, height * 0.56)?;
    }
    font(ctx, 14);
    ctx.set_fill_style_str(DIM);
    ctx.fill_text(
        "ARROWS / WASD MOVE   SPACE FIRE   P PAUSE   M MAP   F3 DEBUG",
        width * 0.5,
        height * 0.64,
    )?;
    Ok(())
}

fn draw_pause(ctx: &CanvasRenderingContext2d, game: &Game) -> Result<(), JsValue> {
    let (width, height) = game.size();
    shade(ctx, game);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str(INK);
    font(ctx, 48);
    ctx.fill_text("PAUSED", width * 0.5, height * 0.45)?;
    font(ctx, 18);
    ctx.fill_text("PRESS P TO RESUME", width * 0.5, height * 0.53)?;
    Ok(())
}

fn draw_game_over(ctx: &CanvasRenderingContext2d, game: &Game, ui: &UiManager) -> Result<(), JsValue> {
    let (width, height) = game.size();
    let screen = &ui.game_over;
    shade(ctx, game);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str(INK);
    font(ctx, 56);
    ctx.fill_text("GAME OVER", width * 0.5, height * 0.36)?;

    font(ctx, 22);
    ctx.fill_text(
        &format!("SCORE {}   WAVE {}", screen.final_score, screen.wave_reached),
        width * 0.5,
        height * 0.46,
    )?;
    let record = if screen.new_record {
        format!("NEW HIGH SCORE {}", screen.high_score)
    } else {
        format!("HIGH SCORE {}", screen.high_score)
    };
    ctx.fill_text(&record, width * 0.5, height * 0.52)?;

    if screen.prompt_visible(ui.now()) {
        font(ctx, 18);
        ctx.fill_text("PRESS ENTER OR TAP TO PLAY AGAIN", width * 0.5, height * 0.62)?;
    }
    Ok(())
}

fn draw_debug_text(ctx: &CanvasRenderingContext2d, ui: &UiManager) -> Result<(), JsValue> {
    font(ctx, 13);
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");
    ctx.set_fill_style_str(DEBUG);
    for (i, line) in ui.debug.lines().iter().enumerate() {
        ctx.fill_text(line, 20.0, 80.0 + i as f64 * 16.0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_circle_draws_once() {
        let offsets = wrap_offsets(Vec2::new(50.0, 50.0), 10.0, 100.0, 100.0);
        assert_eq!(offsets, [(0.0, 0.0)]);
    }

    #[test]
    fn edge_circle_gets_a_ghost() {
        let offsets = wrap_offsets(Vec2::new(95.0, 50.0), 10.0, 100.0, 100.0);
        assert_eq!(offsets, [(0.0, 0.0), (-100.0, 0.0)]);
    }

    #[test]
    fn corner_circle_gets_three_ghosts() {
        let offsets = wrap_offsets(Vec2::new(3.0, 97.0), 10.0, 100.0, 100.0);
        assert_eq!(offsets.len(), 4);
        assert!(offsets.contains(&(100.0, -100.0)));
    }
}
