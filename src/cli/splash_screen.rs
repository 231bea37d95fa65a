//! The module contains function for displaying CLI splash screen:
//! - Title
//! - Short Description
//! - Version Information

use colored::*;

use crate::cli::colors::MINISQL_TEAL;

pub fn splash_screen() {
    show_splash_screen();
    show_version_info();
}

fn show_splash_screen() {
    print!(
        r#"
    {}
        "#,
        r"
    ███╗   ███╗██╗███╗   ██╗██╗███████╗ ██████╗ ██╗
    ████╗ ████║██║████╗  ██║██║██╔════╝██╔═══██╗██║
    ██╔████╔██║██║██╔██╗ ██║██║███████╗██║   ██║██║
    ██║╚██╔╝██║██║██║╚██╗██║██║╚════██║██║▄▄ ██║██║
    ██║ ╚═╝ ██║██║██║ ╚████║██║███████║╚██████╔╝███████╗
    ╚═╝     ╚═╝╚═╝╚═╝  ╚═══╝╚═╝╚══════╝ ╚══▀▀═╝ ╚══════╝
        "
        .color(MINISQL_TEAL)
    )
}

fn show_version_info() {
    println!(
        r"
    {}

    Version {}
        ",
        env!("CARGO_PKG_DESCRIPTION").color(MINISQL_TEAL),
        env!("CARGO_PKG_VERSION").color(MINISQL_TEAL).italic(),
    )
}
