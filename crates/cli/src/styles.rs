//! Help and usage colors.
//!
//! Section headers and flags follow cargo's palette. Parse errors are red
//! and the offending value is yellow, so a mistyped `--port` or package name
//! stands out from the usage line below it.

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Style};

const ACCENT: Style = AnsiColor::Green.on_default().bold();
const LITERAL: Style = AnsiColor::Cyan.on_default();

pub fn cli_styles() -> Styles {
	Styles::styled()
		.header(ACCENT)
		.usage(ACCENT)
		.literal(LITERAL.bold())
		.placeholder(LITERAL)
		.valid(LITERAL)
		.error(AnsiColor::Red.on_default().bold())
		.invalid(AnsiColor::Yellow.on_default().bold())
}
