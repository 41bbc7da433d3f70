//! Terminal colorization for tree output
//!
//! Applies ANSI escape codes to rendered tree rows using crossterm:
//! - Branch glyphs: Cyan
//! - Labels: the node's fill color, when it names a known color
//! - Title: Bold
//! - Ellipsis placeholders: Dim

use crossterm::style::{Attribute, Color, Stylize};
use scenetree::plugins::structure::TreeLine;
use scenetree::{display_width, NodeKind};

/// Colorize tree rows, optionally followed by an aligned fill-color column
pub fn colorize_tree(lines: &[TreeLine<'_>], show_colors: bool) -> String {
    let column = lines
        .iter()
        .map(|line| display_width(&line.text()))
        .max()
        .unwrap_or(0)
        + 2;

    let rows: Vec<String> = lines
        .iter()
        .map(|line| {
            let mut row = format!("{}{}", line.prefix.as_str().with(Color::Cyan), styled_label(line));
            if show_colors {
                let padding = column.saturating_sub(display_width(&line.text()));
                row.push_str(&" ".repeat(padding));
                row.push_str(&line.node.fill_color);
            }
            row
        })
        .collect();
    rows.join("\n")
}

fn styled_label(line: &TreeLine<'_>) -> String {
    let label = line.node.label.as_str();
    match line.node.kind {
        NodeKind::Title => format!("{}", label.attribute(Attribute::Bold)),
        NodeKind::Ellipsis => format!("{}", label.attribute(Attribute::Dim)),
        NodeKind::Record => match parse_color(&line.node.fill_color) {
            Some(color) => format!("{}", label.with(color)),
            None => label.to_string(),
        },
    }
}

/// Terminal color for a Graphviz color name or `#rrggbb` value
pub fn parse_color(name: &str) -> Option<Color> {
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range).and_then(|h| u8::from_str_radix(h, 16).ok())
        };
        return Some(Color::Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        });
    }

    let (r, g, b) = match name.to_ascii_lowercase().as_str() {
        "white" => (255, 255, 255),
        "black" => (0, 0, 0),
        "gray" | "grey" => (190, 190, 190),
        "red" => (255, 0, 0),
        "green" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "lightblue" => (173, 216, 230),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "gold" => (255, 215, 0),
        "turquoise" => (64, 224, 208),
        "cyan" => (0, 255, 255),
        "magenta" => (255, 0, 255),
        "violet" => (238, 130, 238),
        "purple" => (160, 32, 240),
        "pink" => (255, 192, 203),
        "tan" => (210, 180, 140),
        "brown" => (165, 42, 42),
        _ => return None,
    };
    Some(Color::Rgb { r, g, b })
}
