use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::env;
use std::path::{Path, PathBuf};

use tidykit::cli::{Cli, Commands, OrganizeArgs, SearchArgs};
use tidykit::colors;
use tidykit::config::Config;
use tidykit::menu::{self, MenuAction};
use tidykit::organize::{Classifier, OrganizeOptions, OrganizeReport};
use tidykit::search::SearchFilters;
use tidykit::{archive, ops, organize, search, storage};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load().context("Failed to load configuration")?;
    let classifier = Classifier::new();

    match cli.command {
        Commands::Create { path } => handle_create(&path)?,
        Commands::Read { path } => handle_read(&path)?,
        Commands::Write { path, text } => handle_write(&path, &text, false, &config)?,
        Commands::Append { path, text } => handle_write(&path, &text, true, &config)?,
        Commands::Rename { src, dst } => handle_rename(&src, &dst)?,
        Commands::Delete { path, trash } => handle_delete(&path, trash, cli.yes, &config)?,
        Commands::Copy { src, dst } => handle_copy(&src, &dst, &config)?,
        Commands::Move { src, dst } => handle_move(&src, &dst, &config)?,
        Commands::Search(args) => handle_search(&args)?,
        Commands::Compress { src, dst } => handle_compress(&src, &dst)?,
        Commands::Extract { src, dst } => handle_extract(&src, &dst)?,
        Commands::Organize(args) => handle_organize(&args, &classifier, &config)?,
        Commands::Storage => handle_storage(cli.yes)?,
        Commands::Config { init } => handle_config(&config, init)?,
        Commands::Menu => run_menu(&config, &classifier, cli.yes)?,
    }

    Ok(())
}

fn handle_create(path: &Path) -> Result<()> {
    ops::create_file(path).context("Failed to create file")?;
    println!(
        "{} created {}",
        "✓".color(colors::SUCCESS),
        path.display().to_string().color(colors::PATH)
    );
    Ok(())
}

fn handle_read(path: &Path) -> Result<()> {
    let contents = ops::read_file(path).context("Failed to read file")?;
    print!("{contents}");
    Ok(())
}

fn handle_write(path: &Path, text: &str, append: bool, config: &Config) -> Result<()> {
    ops::write_file(path, text, append, config.compress_suggest_mb)
        .context("Failed to write file")?;
    let verb = if append { "appended to" } else { "wrote" };
    println!(
        "{} {verb} {}",
        "✓".color(colors::SUCCESS),
        path.display().to_string().color(colors::PATH)
    );
    Ok(())
}

fn handle_rename(src: &Path, dst: &Path) -> Result<()> {
    ops::rename_item(src, dst).context("Failed to rename")?;
    println!(
        "{} renamed {} -> {}",
        "✓".color(colors::SUCCESS),
        src.display().to_string().color(colors::PATH),
        dst.display().to_string().color(colors::PATH)
    );
    Ok(())
}

fn handle_delete(path: &Path, trash: bool, yes: bool, config: &Config) -> Result<()> {
    if !yes && config.confirm_delete {
        use dialoguer::{theme::ColorfulTheme, Confirm};
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete {}?", path.display()))
            .default(false)
            .interact()
            .context("Confirmation prompt failed")?;
        if !confirmed {
            println!("{}", "Cancelled.".color(colors::WARNING));
            return Ok(());
        }
    }

    ops::delete_item(path, trash).context("Failed to delete")?;
    let verb = if trash { "sent to trash" } else { "deleted" };
    println!(
        "{} {verb} {}",
        "✓".color(colors::SUCCESS),
        path.display().to_string().color(colors::PATH)
    );
    Ok(())
}

fn handle_copy(src: &Path, dst: &Path, config: &Config) -> Result<()> {
    ops::copy_item(src, dst, config.compress_suggest_mb).context("Failed to copy")?;
    println!(
        "{} copied {} -> {}",
        "✓".color(colors::SUCCESS),
        src.display().to_string().color(colors::PATH),
        dst.display().to_string().color(colors::PATH)
    );
    Ok(())
}

fn handle_move(src: &Path, dst: &Path, config: &Config) -> Result<()> {
    ops::move_item(src, dst, config.compress_suggest_mb).context("Failed to move")?;
    println!(
        "{} moved {} -> {}",
        "✓".color(colors::SUCCESS),
        src.display().to_string().color(colors::PATH),
        dst.display().to_string().color(colors::PATH)
    );
    Ok(())
}

fn handle_search(args: &SearchArgs) -> Result<()> {
    let filters = SearchFilters {
        name: args.name.clone(),
        extension: args.extension.clone(),
        keyword: args.keyword.clone(),
    };
    let report = search::search(&args.directory, &filters).context("Search failed")?;

    if report.matches.is_empty() {
        println!("{}", "No matches found.".color(colors::WARNING));
    } else {
        println!(
            "{} {} match{}",
            "✓".color(colors::SUCCESS),
            report.matches.len().to_string().color(colors::SUCCESS),
            if report.matches.len() == 1 { "" } else { "es" }
        );
        for path in &report.matches {
            println!("  {}", path.display().to_string().color(colors::PATH));
        }
    }
    if report.dirs_skipped > 0 {
        println!(
            "{} {} entries could not be read",
            "!".color(colors::WARNING),
            report.dirs_skipped
        );
    }
    Ok(())
}

fn handle_compress(src: &Path, dst: &Path) -> Result<()> {
    let (count, archive_path) = archive::compress(src, dst).context("Compression failed")?;
    println!(
        "{} compressed {count} file{} into {}",
        "✓".color(colors::SUCCESS),
        if count == 1 { "" } else { "s" },
        archive_path.display().to_string().color(colors::PATH)
    );
    Ok(())
}

fn handle_extract(src: &Path, dst: &Path) -> Result<()> {
    let count = archive::extract(src, dst).context("Extraction failed")?;
    println!(
        "{} extracted {count} entr{} into {}",
        "✓".color(colors::SUCCESS),
        if count == 1 { "y" } else { "ies" },
        dst.display().to_string().color(colors::PATH)
    );
    Ok(())
}

fn handle_organize(args: &OrganizeArgs, classifier: &Classifier, config: &Config) -> Result<()> {
    let opts = OrganizeOptions {
        dry_run: args.dry_run,
        bundle: args.bundle,
        bundle_dest: args.bundle_dest.clone(),
    };
    let report =
        organize::organize(&args.folder, classifier, config, &opts).context("Organize failed")?;
    print_organize_report(&report, args.dry_run);
    Ok(())
}

fn print_organize_report(report: &OrganizeReport, dry_run: bool) {
    if dry_run {
        println!(
            "{} {} move{} planned (dry run, nothing changed)",
            "✓".color(colors::SUCCESS),
            report.planned,
            if report.planned == 1 { "" } else { "s" }
        );
        return;
    }

    println!(
        "{} {} file{} organized, {} skipped",
        "✓".color(colors::SUCCESS),
        report.moved.len().to_string().color(colors::SUCCESS),
        if report.moved.len() == 1 { "" } else { "s" },
        report.skipped.len()
    );
    for item in &report.moved {
        println!(
            "  {} -> {}/",
            item.original_path.display().to_string().color(colors::PATH),
            item.category.color(colors::HEADER)
        );
    }
    for (path, reason) in &report.skipped {
        println!(
            "  {} skipped {}: {reason}",
            "!".color(colors::WARNING),
            path.display().to_string().color(colors::PATH)
        );
    }
    if let Some(bundle) = &report.bundle {
        println!(
            "{} bundled into {}",
            "✓".color(colors::SUCCESS),
            bundle.display().to_string().color(colors::PATH)
        );
    }
}

fn handle_storage(yes: bool) -> Result<()> {
    storage::report();

    let temp_dir = env::temp_dir();
    let clean = if yes {
        true
    } else {
        use dialoguer::{theme::ColorfulTheme, Confirm};
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Clean the temp folder ({})?", temp_dir.display()))
            .default(false)
            .interact()
            .context("Confirmation prompt failed")?
    };

    if clean {
        use indicatif::ProgressBar;
        use std::time::Duration;
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Cleaning temp files...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        let removed = storage::clean_temp(&temp_dir);
        spinner.finish_and_clear();
        println!(
            "{} removed {} temp file{}",
            "✓".color(colors::SUCCESS),
            removed.to_string().color(colors::SUCCESS),
            if removed == 1 { "" } else { "s" }
        );
    }
    Ok(())
}

fn handle_config(config: &Config, init: bool) -> Result<()> {
    if init {
        config.save().context("Failed to write config file")?;
        if let Ok(path) = Config::config_path() {
            println!(
                "{} wrote {}",
                "✓".color(colors::SUCCESS),
                path.display().to_string().color(colors::PATH)
            );
        }
    }
    config.display();
    Ok(())
}

fn run_menu(config: &Config, classifier: &Classifier, yes: bool) -> Result<()> {
    use dialoguer::{theme::ColorfulTheme, Input};

    let theme = ColorfulTheme::default();
    let ask = |prompt: &str| -> Result<PathBuf> {
        let raw: String = Input::with_theme(&theme)
            .with_prompt(prompt)
            .interact_text()
            .context("Input prompt failed")?;
        Ok(PathBuf::from(raw.trim()))
    };
    let ask_text = |prompt: &str| -> Result<String> {
        Input::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("Input prompt failed")
    };

    loop {
        menu::print_menu();
        let choice: String = Input::with_theme(&theme)
            .with_prompt("Choice")
            .interact_text()
            .context("Input prompt failed")?;

        let action = match MenuAction::from_choice(&choice) {
            Some(a) => a,
            None => {
                println!("{}", "Unrecognized choice, try again.".color(colors::WARNING));
                continue;
            }
        };

        // One bad path should bounce back to the menu, not exit the program.
        let outcome = match action {
            MenuAction::Quit => break,
            MenuAction::Create => ask("File to create").and_then(|p| handle_create(&p)),
            MenuAction::Read => ask("File to read").and_then(|p| handle_read(&p)),
            MenuAction::Write => ask("File to write").and_then(|p| {
                let text = ask_text("Text")?;
                handle_write(&p, &text, false, config)
            }),
            MenuAction::Append => ask("File to append to").and_then(|p| {
                let text = ask_text("Text")?;
                handle_write(&p, &text, true, config)
            }),
            MenuAction::Rename => ask("Current path").and_then(|src| {
                let dst = ask("New path")?;
                handle_rename(&src, &dst)
            }),
            MenuAction::Delete => {
                ask("Path to delete").and_then(|p| handle_delete(&p, false, yes, config))
            }
            MenuAction::Copy => ask("Source").and_then(|src| {
                let dst = ask("Destination")?;
                handle_copy(&src, &dst, config)
            }),
            MenuAction::Move => ask("Source").and_then(|src| {
                let dst = ask("Destination")?;
                handle_move(&src, &dst, config)
            }),
            MenuAction::Search => ask("Directory to search").and_then(|dir| {
                let name = ask_text("Name contains (blank to skip)")?;
                let extension = ask_text("Extension (blank to skip)")?;
                let keyword = ask_text("Content keyword (blank to skip)")?;
                let not_blank = |s: String| if s.trim().is_empty() { None } else { Some(s) };
                handle_search(&SearchArgs {
                    directory: dir,
                    name: not_blank(name),
                    extension: not_blank(extension),
                    keyword: not_blank(keyword),
                })
            }),
            MenuAction::Compress => ask("Source").and_then(|src| {
                let dst = ask("Archive path")?;
                handle_compress(&src, &dst)
            }),
            MenuAction::Extract => ask("Archive").and_then(|src| {
                let dst = ask("Extract into")?;
                handle_extract(&src, &dst)
            }),
            MenuAction::Organize => ask("Folder to organize").and_then(|folder| {
                handle_organize(
                    &OrganizeArgs {
                        folder,
                        dry_run: false,
                        bundle: false,
                        bundle_dest: None,
                    },
                    classifier,
                    config,
                )
            }),
            MenuAction::Storage => handle_storage(yes),
        };

        if let Err(e) = outcome {
            eprintln!("{} {e:#}", "error:".red().bold());
        }
    }

    println!("{}", "Bye!".color(colors::SUCCESS));
    Ok(())
}
