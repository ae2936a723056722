//! CLI command messaging system
//!
//! Consistent console output for commands that run outside the terminal UI.

use crate::ui::splash::LOGO_NAME;

const YELLOW: &str = "\x1b[1;33m";
const BRIGHT_RED: &str = "\x1b[1;91m";
const RED: &str = "\x1b[1;31m";
const GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

fn print_tagged(color: &str, tag: &str, title: &str, details: &str) {
    if details.is_empty() {
        println!("{}[{}]{} {}", color, tag, RESET, title);
    } else {
        println!("{}[{}]{} {}\t {}", color, tag, RESET, title, details);
    }
}

pub fn print_info(title: &str, details: &str) {
    print_tagged(YELLOW, "INFO", title, details);
}

pub fn print_warn(title: &str, details: &str) {
    print_tagged(BRIGHT_RED, "WARN", title, details);
}

pub fn print_error(title: &str, details: Option<&str>) {
    println!("{}[ERROR]{} {}", RED, RESET, title);
    if let Some(details) = details {
        println!("{}[ERROR]{} Details: {}", RED, RESET, details);
    }
}

pub fn print_success(title: &str, details: &str) {
    print_tagged(GREEN, "SUCCESS", title, details);
}

/// Shown instead of a bare error when the site is down or unreachable.
pub fn print_site_unavailable(base_url: &str) {
    // RGB: FF = 255, AA = 170, 00 = 0
    println!("\x1b[38;2;255;170;0m{}{}", LOGO_NAME, RESET);
    println!("\x1b[38;2;255;170;0mWe'll be back shortly!{}", RESET);
    println!(
        "{} could not be reached or is failing right now. Please try again in a few minutes.\n",
        base_url
    );
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_info($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_warn {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_warn($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_error {
    ($title:expr) => {
        $crate::cli_messages::print_error($title, None)
    };
    ($title:expr, $details:expr) => {
        $crate::cli_messages::print_error($title, Some($details))
    };
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_success($title, &format!($($details)*))
    };
}
