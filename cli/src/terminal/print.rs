//! Line-oriented terminal output.
//!
//! Everything goes through [`print`], which emits a `tracing` event on [`PRINT_TARGET`].
//! The formatter writes those events verbatim, so report lines and log lines share the
//! spinner-aware writer.

use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;
pub const PRINT_TARGET: &str = "adscout::print";

const TREE_KEY_WIDTH: usize = 8;
const THIN_RULE: char = '─';
const FAT_RULE: char = '═';

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

/// Left and right fill needed to center `visible` columns in [`TOTAL_WIDTH`].
fn fill_around(visible: usize) -> (usize, usize) {
    let free = TOTAL_WIDTH.saturating_sub(visible);
    (free / 2, free - free / 2)
}

fn rule(ch: char, len: usize) -> String {
    ch.to_string().repeat(len)
}

/// `title` wrapped in `⟦ ⟧` and centered on a line of `ch`.
fn framed(title: &str, ch: char) -> String {
    let title = format!("⟦ {title} ⟧");
    let (left, right) = fill_around(title.width());
    format!(
        "{}{}{}",
        rule(ch, left).color(colors::SEPARATOR),
        title.bright_green().bold(),
        rule(ch, right).color(colors::SEPARATOR)
    )
}

pub fn banner(no_banner: bool, q_level: u8) {
    if no_banner || q_level > 0 {
        return;
    }
    print(&framed(&format!("ADSCOUT v{}", env!("CARGO_PKG_VERSION")), FAT_RULE));
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }
    print(&framed(&msg.to_uppercase(), THIN_RULE));
}

pub fn fat_separator() {
    print(&rule(FAT_RULE, TOTAL_WIDTH).color(colors::SEPARATOR).to_string());
}

/// `key....:` padded so the colon lands after `width` columns.
fn dotted_key(key: &str, width: usize, key_color: Color) -> String {
    format!(
        "{}{}{}",
        key.color(key_color),
        ".".repeat(width.saturating_sub(key.len())).color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    )
}

/// `> key.....: value`, with keys padded to `key_width`.
pub fn aligned_line(key: &str, value: ColoredString, key_width: usize) {
    print(&format!(
        "{} {} {}",
        ">".color(colors::SEPARATOR),
        dotted_key(key, key_width + 1, colors::PRIMARY),
        value
    ));
}

pub fn tree_head(idx: usize, name: &str) {
    print(&format!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    ));
}

pub fn as_tree_one_level(rows: Vec<(String, ColoredString)>) {
    let last = rows.len().saturating_sub(1);
    for (i, (key, value)) in rows.into_iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        print(&format!(
            " {} {} {}",
            branch.color(colors::SEPARATOR),
            dotted_key(&key, TREE_KEY_WIDTH, colors::TEXT_DEFAULT),
            value
        ));
    }
}

pub fn centerln(msg: &str) {
    let (left, _) = fill_around(console::measure_text_width(msg));
    print(&format!("{}{}", " ".repeat(left), msg));
}

const NO_RESULTS: &str = r#"
          ┌──────────────────────────────────────────┐
          │     no hosts found in the scan report    │
          └──────────────────────────────────────────┘
"#;

pub fn no_results() {
    print(&NO_RESULTS.red().bold().to_string());
}

pub fn end_of_program(q_level: u8) {
    if q_level > 1 {
        return;
    }
    fat_separator();
}
