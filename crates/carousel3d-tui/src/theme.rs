use ratatui::style::Color;

/// Gruvbox Material (dark) palette
pub struct GruvboxMaterial;

impl GruvboxMaterial {
    pub const BG0: Color = Color::Rgb(0x28, 0x28, 0x28);
    pub const BG1: Color = Color::Rgb(0x32, 0x30, 0x2f);
    pub const BG2: Color = Color::Rgb(0x45, 0x40, 0x3d);
    pub const FG0: Color = Color::Rgb(0xd4, 0xbe, 0x98);
    pub const GREY2: Color = Color::Rgb(0xa8, 0x99, 0x84);
    pub const ACCENT: Color = Color::Rgb(0xd8, 0xa6, 0x57);

    /// Card colors, cycled by item index
    pub const CARDS: [(u8, u8, u8); 6] = [
        (0xea, 0x69, 0x62), // red
        (0xe7, 0x8a, 0x4e), // orange
        (0xd8, 0xa6, 0x57), // yellow
        (0xa9, 0xb6, 0x65), // green
        (0x7d, 0xae, 0xa3), // blue
        (0xd3, 0x86, 0x9b), // purple
    ];

    /// Card color for `index`, faded toward the background by `opacity`
    pub fn card(index: usize, opacity: f64) -> Color {
        let (r, g, b) = Self::CARDS[index % Self::CARDS.len()];
        let (br, bg, bb) = (0x28u8, 0x28u8, 0x28u8);
        let t = opacity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (bg as f64 + (fg as f64 - bg as f64) * t).round() as u8;
        Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
    }
}
