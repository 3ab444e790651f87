/// Where the world lands on the canvas: a letterboxed frame with the
/// world's aspect ratio, centred in the backing store.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawInfo {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub frame_x: f64,
    pub frame_y: f64,
    pub frame_width: f64,
    pub frame_height: f64,
    pub scale: f64,
}

pub fn compute_frame(
    canvas_width: f64,
    canvas_height: f64,
    target_aspect: f64,
) -> (f64, f64, f64, f64) {
    let canvas_aspect = canvas_width / canvas_height;

    let (frame_width, frame_height) = if canvas_aspect > target_aspect {
        (canvas_height * target_aspect, canvas_height)
    } else {
        (canvas_width, canvas_width / target_aspect)
    };

    let frame_x = (canvas_width - frame_width) * 0.5;
    let frame_y = (canvas_height - frame_height) * 0.5;

    (frame_width, frame_height, frame_x, frame_y)
}

pub fn compute_draw_info(
    canvas_width: f64,
    canvas_height: f64,
    world_width: f64,
    world_height: f64,
) -> DrawInfo {
    let canvas_width = canvas_width.max(1.0);
    let canvas_height = canvas_height.max(1.0);
    let (frame_width, frame_height, frame_x, frame_y) =
        compute_frame(canvas_width, canvas_height, world_width / world_height);

    DrawInfo {
        canvas_width,
        canvas_height,
        frame_x,
        frame_y,
        frame_width,
        frame_height,
        scale: frame_width / world_width,
    }
}

/// Backing-store size for a CSS box at the given device pixel ratio, capped
/// so the longest side stays within `max_dim`.
pub fn backing_size(css_width: f64, css_height: f64, dpr: f64, max_dim: f64) -> (u32, u32) {
    let dpr = dpr.clamp(1.0, 2.5);
    let mut width = (css_width.max(1.0) * dpr).max(1.0);
    let mut height = (css_height.max(1.0) * dpr).max(1.0);

    let max_side = width.max(height);
    if max_side > max_dim {
        let scale = max_dim / max_side;
        width *= scale;
        height *= scale;
    }

    (
        width.floor().max(1.0) as u32,
        height.floor().max(1.0) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn wide_canvas_gets_side_bars() {
        let info = compute_draw_info(1600.0, 600.0, 1024.0, 768.0);
        assert!(close(info.frame_height, 600.0));
        assert!(close(info.frame_width, 800.0));
        assert!(close(info.frame_x, 400.0));
        assert!(close(info.frame_y, 0.0));
        assert!(close(info.scale, 800.0 / 1024.0));
    }

    #[test]
    fn tall_canvas_gets_top_bars() {
        let info = compute_draw_info(400.0, 900.0, 1024.0, 768.0);
        assert!(close(info.frame_width, 400.0));
        assert!(close(info.frame_height, 300.0));
        assert!(close(info.frame_y, 300.0));
    }

    #[test]
    fn backing_size_caps_long_side() {
        assert_eq!(backing_size(800.0, 600.0, 2.0, 4096.0), (1600, 1200));
        assert_eq!(backing_size(4096.0, 1024.0, 2.0, 4096.0), (4096, 1024));
        assert_eq!(backing_size(0.0, 0.0, 1.0, 4096.0), (1, 1));
    }
}
