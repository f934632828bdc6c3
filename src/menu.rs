use colored::*;

use crate::colors;

/// One screen of the interactive menu. Kept as plain data so choice parsing
/// and dispatch stay testable without a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Create,
    Read,
    Write,
    Append,
    Rename,
    Delete,
    Copy,
    Move,
    Search,
    Compress,
    Extract,
    Organize,
    Storage,
    Quit,
}

impl MenuAction {
    pub const ALL: &'static [MenuAction] = &[
        MenuAction::Create,
        MenuAction::Read,
        MenuAction::Write,
        MenuAction::Append,
        MenuAction::Rename,
        MenuAction::Delete,
        MenuAction::Copy,
        MenuAction::Move,
        MenuAction::Search,
        MenuAction::Compress,
        MenuAction::Extract,
        MenuAction::Organize,
        MenuAction::Storage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Create => "Create a file",
            MenuAction::Read => "Read a file",
            MenuAction::Write => "Write to a file",
            MenuAction::Append => "Append to a file",
            MenuAction::Rename => "Rename a file or folder",
            MenuAction::Delete => "Delete a file or folder",
            MenuAction::Copy => "Copy a file or folder",
            MenuAction::Move => "Move a file or folder",
            MenuAction::Search => "Search for files",
            MenuAction::Compress => "Compress into a zip",
            MenuAction::Extract => "Extract a zip",
            MenuAction::Organize => "Organize a folder",
            MenuAction::Storage => "Storage report",
            MenuAction::Quit => "Quit",
        }
    }

    /// Parse a menu choice. Numbers follow the printed order; `0` and `q`
    /// both quit. Anything else is rejected so the caller can re-prompt.
    pub fn from_choice(input: &str) -> Option<MenuAction> {
        match input.trim().to_lowercase().as_str() {
            "1" => Some(MenuAction::Create),
            "2" => Some(MenuAction::Read),
            "3" => Some(MenuAction::Write),
            "4" => Some(MenuAction::Append),
            "5" => Some(MenuAction::Rename),
            "6" => Some(MenuAction::Delete),
            "7" => Some(MenuAction::Copy),
            "8" => Some(MenuAction::Move),
            "9" => Some(MenuAction::Search),
            "10" => Some(MenuAction::Compress),
            "11" => Some(MenuAction::Extract),
            "12" => Some(MenuAction::Organize),
            "13" => Some(MenuAction::Storage),
            "0" | "q" | "quit" | "exit" => Some(MenuAction::Quit),
            _ => None,
        }
    }
}

pub fn print_menu() {
    println!();
    println!("{}", "tidykit".bold().color(colors::HEADER));
    for (i, action) in MenuAction::ALL.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, action.label());
    }
    println!("   0. {}", MenuAction::Quit.label());
}
