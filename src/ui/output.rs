use crate::diagnostics::SkippedFile;
use crate::output::is_quiet;
use crate::report::ReportEntry;
use crate::ui::{err_theme, theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::ROCKET, text.style(theme().header.clone()));
}

pub fn banner(title: &str, subtitle: &str) {
    println!();
    println!("  {}", title);
    println!("  {}", subtitle.style(theme().dim.clone()));
    println!();
}

pub fn status(icon: &str, label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}: {}", icon, label.style(theme().dim.clone()), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

/// One unresolved identifier as a compiler-style line
pub fn diagnostic(entry: &ReportEntry) {
    let location = match entry.location {
        Some(location) => format!("{}:{}", entry.file_path, location),
        None => entry.file_path.clone(),
    };
    let message = match entry.message.strip_suffix(entry.identifier.as_str()) {
        Some(prefix) => format!("{}{}", prefix, entry.identifier.style(theme().identifier.clone())),
        None => entry.message.clone(),
    };
    println!(
        "{} {} {}",
        location.style(theme().path.clone()),
        entry.code.as_str().style(theme().code.clone()),
        message
    );
}

pub fn skipped(file: &SkippedFile) {
    eprintln!(
        "{} {} {}",
        Icons::SKIP.style(err_theme().warn.clone()),
        file.file_path,
        file.reason.style(err_theme().muted.clone())
    );
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}
