//! Terminal output for brew frames.
//!
//! Frames are markdown produced by the core `Display` wrappers. With rich
//! output they go through termimad; otherwise the markdown is printed as is,
//! which keeps piped output and tests free of escape codes.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Prints markdown frames, styled or plain.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        // Current pour in bold, countdowns as inline code.
        skin.set_headers_fg(Color::DarkYellow);
        skin.bold.set_fg(Color::Green);
        skin.inline_code.set_fg(Color::Cyan);
        skin.inline_code.set_bg(Color::AnsiValue(236));

        Self { rich_enabled, skin }
    }

    /// Whether output is styled.
    pub fn is_rich(&self) -> bool {
        self.rich_enabled
    }

    /// Prints `markdown`.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if self.rich_enabled {
            for line in markdown.lines() {
                if let Some(title) = line.strip_prefix("# ") {
                    println!("\x1b[33m{title}\x1b[0m");
                } else {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        } else {
            print!("{markdown}");
        }
        Ok(())
    }
}
