/// Per-category accent colours
///
/// Each category gets a stable colour picked from a small palette by hashing
/// its name, so the header tint tells at a glance which category is open.
/// Search results use the neutral colour.
use iced::Color;

const NEUTRAL: Color = rgb(0.22, 0.24, 0.28);

const PALETTE: [Color; 8] = [
    rgb(0.55, 0.27, 0.20),
    rgb(0.20, 0.42, 0.30),
    rgb(0.18, 0.33, 0.55),
    rgb(0.50, 0.40, 0.12),
    rgb(0.42, 0.22, 0.50),
    rgb(0.15, 0.45, 0.48),
    rgb(0.55, 0.22, 0.35),
    rgb(0.35, 0.40, 0.18),
];

const fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color { r, g, b, a: 1.0 }
}

pub fn accent(category: Option<&str>) -> Color {
    match category {
        Some(name) => PALETTE[(fnv1a(name) % PALETTE.len() as u64) as usize],
        None => NEUTRAL,
    }
}

fn fnv1a(name: &str) -> u64 {
    name.bytes().fold(0xcbf29ce484222325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x100000001b3)
    })
}
