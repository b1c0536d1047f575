use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Color as CtColor, Stylize};
use unicode_width::UnicodeWidthStr;

const SECTION_WIDTH: usize = 60;

// ---------------------------------------------------------------------------
// Clap Styles
// ---------------------------------------------------------------------------

pub fn get_styles() -> Styles {
    Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue))),
        )
        .literal(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

pub mod colors {
    use crossterm::style::Color;

    pub const SEA: Color = Color::Rgb {
        r: 0,
        g: 180,
        b: 200,
    };
    pub const SAND: Color = Color::Rgb {
        r: 240,
        g: 200,
        b: 130,
    };
    pub const CORAL: Color = Color::Rgb {
        r: 255,
        g: 120,
        b: 100,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 80,
        g: 220,
        b: 120,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

// ---------------------------------------------------------------------------
// Status lines
// ---------------------------------------------------------------------------

pub fn print_success(message: &str) {
    println!(
        " {} {}",
        "✓".with(colors::GREEN).bold(),
        message.with(colors::GREEN)
    );
}

pub fn print_error(message: &str) {
    println!(
        " {} {}",
        "✗".with(colors::RED).bold(),
        message.with(colors::RED)
    );
}

pub fn print_warning(message: &str) {
    println!(
        " {} {}",
        "⚠".with(colors::SAND).bold(),
        message.with(colors::SAND)
    );
}

pub fn print_info(message: &str) {
    println!(
        " {} {}",
        "ℹ".with(colors::SEA).bold(),
        message.with(colors::SEA)
    );
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

pub fn print_section_header(title: &str) {
    let title_len = title.width();
    let padding = SECTION_WIDTH.saturating_sub(title_len + 4) / 2;
    let rest = SECTION_WIDTH.saturating_sub(title_len + 4 + padding);

    println!();
    println!(
        "{}{} {} {}{}",
        "╭".with(colors::SEA),
        "─".repeat(padding).with(colors::SEA),
        title.with(colors::SEA).bold().attribute(Attribute::Italic),
        "─".repeat(rest).with(colors::SEA),
        "╮".with(colors::SEA)
    );
}

pub fn print_section_footer() {
    println!(
        "{}{}{}",
        "╰".with(colors::SEA),
        "─".repeat(SECTION_WIDTH).with(colors::SEA),
        "╯".with(colors::SEA)
    );
    println!();
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        "●".with(colors::CORAL),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

pub fn print_list_item(item: &str, indent: usize) {
    print_list_item_styled(item, colors::WHITE, indent);
}

pub fn print_list_item_styled(item: &str, color: CtColor, indent: usize) {
    println!(
        "{}{}  {}",
        "  ".repeat(indent),
        "▶".with(colors::SEA),
        item.with(color)
    );
}

pub fn print_empty_list(message: &str) {
    println!(
        "  {} {}",
        "○".with(colors::DIM),
        message.with(colors::DIM).attribute(Attribute::Italic)
    );
}

/// Prints a multi-line block inside a section frame.
pub fn print_block(title: &str, block: &str) {
    print_section_header(title);
    for line in block.lines() {
        println!("  {}", line);
    }
    print_section_footer();
}

// ---------------------------------------------------------------------------
// Prompt, welcome and goodbye
// ---------------------------------------------------------------------------

pub fn get_prompt() -> String {
    format!("{} ", "✈".with(colors::SEA).bold())
}

pub fn print_welcome(api_base_url: &str, cookie_location: &str) {
    print_section_header("Share Trips");
    print_key_value("Backend", api_base_url);
    print_key_value("Cookies", cookie_location);
    print_key_value(
        "Version",
        &format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("GIT_HASH")),
    );
    println!();
    println!("  {}", "Type 'help' for available commands".with(colors::DIM));
    print_section_footer();
}

pub fn print_goodbye() {
    println!();
    println!(
        "  {}",
        "Bye! Safe travels.".with(colors::CORAL).bold()
    );
    println!();
}
