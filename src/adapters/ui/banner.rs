//! Startup banner: "CLINIC ADMIN" in the standard figlet font with a vertical gradient.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Rose (#f0609e).
const ROSE: (u8, u8, u8) = (0xf0, 0x60, 0x9e);
/// Teal (#2ec4b6).
const TEAL: (u8, u8, u8) = (0x2e, 0xc4, 0xb6);

const TITLE: &str = "CLINIC ADMIN";

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let mix = |x: u8, y: u8| (f64::from(x) * (1.0 - t) + f64::from(y) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn render_title() -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(TITLE).map(|figure| figure.to_string()))
        .unwrap_or_else(|| format!("{}\n", TITLE))
}

/// Prints the title art, then version and backend line.
pub fn print_welcome(backend: &str) {
    let mut out = stdout();
    let art = render_title();
    let lines: Vec<&str> = art.lines().filter(|l| !l.trim().is_empty()).collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(ROSE, TEAL, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: TEAL.0,
        g: TEAL.1,
        b: TEAL.2,
    }));
    let _ = out.execute(Print(format!(
        "v{}  ·  memberships backend: {}\r\n\r\n",
        env!("CARGO_PKG_VERSION"),
        backend
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
