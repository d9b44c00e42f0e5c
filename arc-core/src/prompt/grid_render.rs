use arc_provider::Grid;

/// Fixed 16-symbol positional palette for alien-communication mode (spec
/// §4.2 "Grid rendering"). Index = cell value, 0..=15.
const EMOJI_PALETTE: [&str; 16] = [
    "⬛", "🟦", "🟥", "🟩", "🟨", "⬜", "🟪", "🟧", "🟫", "🔵", "🔴", "🟢", "🟡", "⚪", "🟣", "🟤",
];

/// Renders a grid as plain integers, one row per line, space-separated.
pub fn render_numeric(grid: &Grid) -> String {
    grid.0
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a grid through the emoji palette (alien-communication mode).
/// Out-of-range cell values fall back to their numeric form rather than
/// panicking — a malformed puzzle should degrade, not crash prompt assembly.
pub fn render_emoji(grid: &Grid) -> String {
    grid.0
        .iter()
        .map(|row| {
            row.iter()
                .map(|&c| {
                    EMOJI_PALETTE
                        .get(c as usize)
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| c.to_string())
                })
                .collect::<Vec<_>>()
                .join("")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render(grid: &Grid, emoji_mode: bool) -> String {
    if emoji_mode {
        render_emoji(grid)
    } else {
        render_numeric(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_numeric_grid() {
        let g = Grid(vec![vec![0, 1], vec![2, 3]]);
        assert_eq!(render_numeric(&g), "0 1\n2 3");
    }

    #[test]
    fn emoji_render_falls_back_out_of_range() {
        let g = Grid(vec![vec![99]]);
        assert_eq!(render_emoji(&g), "99");
    }
}
