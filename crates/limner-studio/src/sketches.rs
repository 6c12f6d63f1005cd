use std::f32::consts::{PI, TAU};

use limner_engine::prelude::*;

pub const NAMES: [&str; 3] = ["cube", "circles", "camera"];

pub fn by_name(name: &str) -> Option<Sketch> {
    match name {
        "cube" => Some(rgb_cube()),
        "circles" => Some(circles()),
        "camera" => Some(camera_box()),
        _ => None,
    }
}

/// Unit cube faces as (position, color) corners; colors follow position.
const CUBE: [[(f32, f32, f32); 4]; 6] = [
    [(-1.0, 1.0, 1.0), (1.0, 1.0, 1.0), (1.0, -1.0, 1.0), (-1.0, -1.0, 1.0)],
    [(1.0, 1.0, 1.0), (1.0, 1.0, -1.0), (1.0, -1.0, -1.0), (1.0, -1.0, 1.0)],
    [(1.0, 1.0, -1.0), (-1.0, 1.0, -1.0), (-1.0, -1.0, -1.0), (1.0, -1.0, -1.0)],
    [(-1.0, 1.0, -1.0), (-1.0, 1.0, 1.0), (-1.0, -1.0, 1.0), (-1.0, -1.0, -1.0)],
    [(-1.0, 1.0, -1.0), (1.0, 1.0, -1.0), (1.0, 1.0, 1.0), (-1.0, 1.0, 1.0)],
    [(-1.0, -1.0, -1.0), (1.0, -1.0, -1.0), (1.0, -1.0, 1.0), (-1.0, -1.0, 1.0)],
];

/// Corner (x, y, z) in [-1, 1]³ maps to RGB (x, y, z) in [0, 1]³.
fn corner_color((x, y, z): (f32, f32, f32)) -> ColorRgba {
    ColorRgba::new((x + 1.0) / 2.0, (y + 1.0) / 2.0, (z + 1.0) / 2.0, 1.0)
}

/// RGB color cube that eases toward the pointer.
fn rgb_cube() -> Sketch {
    let mut mag = Vec2::ZERO;

    Sketch::new()
        .setup(|g| {
            g.size(300, 300)?;
            g.smooth()
        })
        .draw(move |g| {
            g.background(ColorRgba::new(0.5, 0.5, 0.45, 1.0))?;
            g.push_matrix()?;
            g.translate(g.width() as f32 / 2.0, g.height() as f32 / 2.0, -30.0)?;

            let target = Vec2::new(
                g.mouse_x() / g.width() as f32 * TAU,
                g.mouse_y() / g.height() as f32 * TAU,
            );
            let diff = mag - target;
            if diff.x.abs() > 0.01 {
                mag.x -= diff.x / 4.0;
            }
            if diff.y.abs() > 0.01 {
                mag.y -= diff.y / 4.0;
            }

            g.rotate_x(-mag.y)?;
            g.rotate_y(-mag.x)?;
            g.scale(50.0, 50.0, 50.0)?;

            g.begin_shape(ShapeKind::Quads)?;
            for corner in CUBE.iter().flatten() {
                g.fill(corner_color(*corner));
                g.vertex(corner.0, corner.1, corner.2)?;
            }
            g.end_shape(CloseMode::Close)?;

            g.pop_matrix()
        })
}

/// Smoothed and aliased circles side by side, drawn once.
fn circles() -> Sketch {
    Sketch::new().setup(|_| Ok(())).draw(|g| {
        g.background(ColorRgba::gray(0.5))?;
        g.smooth()?;
        g.ellipse(70.0, 48.0, 36.0, 36.0)?;
        g.no_smooth()?;
        g.ellipse(30.0, 48.0, 36.0, 36.0)?;
        g.no_loop();
        Ok(())
    })
}

/// Wireframe box seen through a shifted camera. No draw callback: the
/// setup frame is kept and replayed.
fn camera_box() -> Sketch {
    Sketch::new()
        .setup(|g| {
            g.no_fill();
            g.push_matrix()?;
            g.begin_camera()?;
            g.translate(10.0, 10.0, 0.0)?;
            g.end_camera()?;

            g.translate(50.0, 50.0, 0.0)?;
            g.rotate_y(PI / 3.0)?;
            g.draw_box(45.0, 45.0, 45.0)?;
            g.pop_matrix()
        })
        .on_key_pressed(|g| {
            if g.key() == 's' {
                if let Some(frame) = g.save()? {
                    log::info!("captured {}x{} frame", frame.width(), frame.height());
                }
            }
            Ok(())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_resolves() {
        for name in NAMES {
            assert!(by_name(name).is_some(), "{name}");
        }
        assert!(by_name("teapot").is_none());
    }

    #[test]
    fn cube_corner_colors_span_the_rgb_cube() {
        assert_eq!(corner_color((-1.0, -1.0, -1.0)), ColorRgba::black());
        assert_eq!(corner_color((1.0, 1.0, 1.0)), ColorRgba::white());
        assert_eq!(corner_color((1.0, -1.0, -1.0)), ColorRgba::new(1.0, 0.0, 0.0, 1.0));
    }
}
