//! Terminal rendering for markdown output.
//!
//! Display wrappers in the core produce markdown. With color enabled,
//! headers keep their `#` markers and are colored by level, and the rest is
//! styled inline through termimad. Otherwise the markdown is printed as is.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_fg(Color::Green);
        skin.inline_code.set_bg(Color::AnsiValue(236));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to the terminal.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            match header_color(line) {
                Some(code) => println!("\x1b[{code}m{line}\x1b[0m"),
                None => {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        }
        Ok(())
    }

    /// Print machine-readable output unstyled, whatever the color setting.
    pub fn render_raw(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }
}

/// ANSI color code for a markdown header line: mission and phase titles in
/// bold cyan, unit headings in blue.
fn header_color(line: &str) -> Option<&'static str> {
    let level = line.chars().take_while(|&c| c == '#').count();
    match level {
        0 => None,
        1 | 2 => Some("1;36"),
        _ => Some("34"),
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }

    #[test]
    fn test_header_colors_by_level() {
        assert_eq!(header_color("# Mission"), Some("1;36"));
        assert_eq!(header_color("## Phase"), Some("1;36"));
        assert_eq!(header_color("### Unit"), Some("34"));
        assert_eq!(header_color("- Time: now"), None);
    }
}
