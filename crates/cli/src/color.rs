// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use std::io::IsTerminal;

pub mod codes {
    /// Section headers and report keys: steel blue
    pub const HEADER: u8 = 74;
    /// Commands and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Descriptions and context: medium grey
    pub const CONTEXT: u8 = 245;
}

const RESET: &str = "\x1b[0m";

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| v == "1")
}

/// Determine if help output should be colored.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if env_flag("NO_COLOR") {
        return false;
    }
    if env_flag("COLOR") {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Determine if reports should be colored: `--color` or `COLOR=1`, unless `NO_COLOR=1`.
pub fn colorize_reports(flag: bool) -> bool {
    !env_flag("NO_COLOR") && (flag || env_flag("COLOR"))
}

/// Build clap `Styles` using the project palette.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .literal(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::LITERAL)))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::CONTEXT)))))
}

/// Wrap text in a 256-color foreground code.
pub fn paint(code: u8, text: &str) -> String {
    format!("\x1b[38;5;{code}m{text}{RESET}")
}

/// Format a report key with the header color.
pub fn key(text: &str) -> String {
    paint(codes::HEADER, text)
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
