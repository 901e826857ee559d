//! Terminal output for the abigen CLI.

use console::{measure_text_width, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Color palette
pub mod colors {
    use console::Color;

    pub const ACCENT: Color = Color::Color256(39); // Azure
    pub const OK: Color = Color::Color256(78); // Sea green
    pub const FAIL: Color = Color::Color256(203); // Coral
    pub const DIM: Color = Color::Color256(244); // Gray
}

pub mod symbols {
    pub const BULLET: &str = "\u{25CF}"; // ●
    pub const RING: &str = "\u{25CB}"; // ○
    pub const CROSS: &str = "\u{2717}"; // ✗
    pub const TRIANGLE: &str = "\u{25B8}"; // ▸
    pub const DOT: &str = "\u{00B7}"; // ·
}

/// Inner width of a box, borders excluded.
const BOX_WIDTH: usize = 56;

pub fn success(msg: &str) {
    println!("  {} {}", style(symbols::BULLET).fg(colors::OK), msg);
}

pub fn error(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::CROSS).fg(colors::FAIL),
        style(msg).fg(colors::FAIL)
    );
}

pub fn info(msg: &str) {
    println!("  {} {}", style(symbols::RING).fg(colors::ACCENT), msg);
}

pub fn dim(msg: &str) {
    println!("  {}", style(msg).fg(colors::DIM));
}

/// A spinner that ticks until cleared.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::default_spinner()
        .tick_chars("\u{25DC}\u{25DD}\u{25DE}\u{25DF} ") // ◜◝◞◟
        .template("  {spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(spinner_style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub fn box_header(title: &str) {
    let title = format!(" {} ", title);
    let dashes = BOX_WIDTH.saturating_sub(measure_text_width(&title) + 1);
    println!(
        "  {}{}{}{}",
        style("\u{250C}\u{2500}").fg(colors::ACCENT), // ┌─
        style(title).fg(colors::ACCENT).bold(),
        style("\u{2500}".repeat(dashes)).fg(colors::ACCENT),
        style("\u{2510}").fg(colors::ACCENT) // ┐
    );
}

/// A line inside a box, padded to the box width.
pub fn box_line(content: &str) {
    println!(
        "  {} {}{}",
        style("\u{2502}").fg(colors::ACCENT), // │
        content,
        style(format!("{}\u{2502}", " ".repeat(padding(content)))).fg(colors::ACCENT)
    );
}

pub fn box_footer() {
    println!(
        "  {}{}{}",
        style("\u{2514}").fg(colors::ACCENT), // └
        style("\u{2500}".repeat(BOX_WIDTH + 1)).fg(colors::ACCENT),
        style("\u{2518}").fg(colors::ACCENT) // ┘
    );
}

/// Box row for a struct: name and field count.
pub fn struct_line(name: &str, fields: usize, is_event: bool) {
    let marker = if is_event { " (event)" } else { "" };
    box_line(&format!(
        "{} {:28} {}{}",
        style(symbols::TRIANGLE).fg(colors::ACCENT),
        style(name).bold(),
        plural(fields, "field"),
        style(marker).fg(colors::DIM)
    ));
}

pub fn timing(label: &str, duration_ms: u128) {
    println!(
        "  {} {} in {}ms",
        style(symbols::RING).fg(colors::ACCENT),
        label,
        duration_ms
    );
}

/// Header printed above a refusal or failure.
pub fn nope_header() {
    println!();
    println!(
        "  {} {}",
        style(symbols::CROSS).fg(colors::FAIL).bold(),
        style("Not so fast.").fg(colors::FAIL).bold()
    );
    println!();
}

/// `1 field`, `3 fields`.
pub fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Spaces needed after `content` to reach the right border.
fn padding(content: &str) -> usize {
    BOX_WIDTH.saturating_sub(measure_text_width(content))
}
