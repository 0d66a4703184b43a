use std::io::{self, Write};

use crossterm::{cursor, queue, style, terminal};

/// Player key bindings, shown in the top row.
pub const PLAYER_ITEMS: &[&str] = &[
    "[Space] play/pause",
    "[←][→] step",
    "[p][n] prev/next step",
    "[Home][End] jump",
    "[r] restart",
    "[q][Esc] quit",
];

/// Split a menu item into `(is_key, text)` runs. Keys are the `[...]` parts,
/// brackets included. An unclosed bracket is plain text.
pub fn segments(item: &str) -> Vec<(bool, &str)> {
    let mut out = Vec::new();
    let mut rest = item;
    while let Some(open) = rest.find('[') {
        let Some(len) = rest[open..].find(']') else {
            break;
        };
        if open > 0 {
            out.push((false, &rest[..open]));
        }
        out.push((true, &rest[open..=open + len]));
        rest = &rest[open + len + 1..];
    }
    if !rest.is_empty() {
        out.push((false, rest));
    }
    out
}

/// Draw the menu bar on row 0: keys bold, descriptions dim.
pub fn print_menu(stdout: &mut io::Stdout, items: &[&str]) -> anyhow::Result<()> {
    queue!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(" "),
    )?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            queue!(stdout, style::Print("  "))?;
        }
        for (is_key, text) in segments(item) {
            let attr = if is_key {
                style::Attribute::Bold
            } else {
                style::Attribute::Dim
            };
            queue!(
                stdout,
                style::SetAttribute(attr),
                style::Print(text),
                style::SetAttribute(style::Attribute::Reset),
            )?;
        }
    }
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_and_labels_alternate() {
        assert_eq!(
            segments("[q][Esc] quit"),
            vec![(true, "[q]"), (true, "[Esc]"), (false, " quit")]
        );
        assert_eq!(segments("plain"), vec![(false, "plain")]);
        assert_eq!(segments("x [open"), vec![(false, "x [open")]);
    }
}
