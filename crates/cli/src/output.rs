//! Output formatting for CLI
//!
//! Results go to stdout in the selected format. Notices (hints, summaries,
//! warnings) go to stdout only for human formats and to stderr otherwise, so
//! `--format json` output stays parseable.

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputFormat::Table | OutputFormat::Plain)
    }
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

/// Render rows; `single` renders the first item as an object instead of a list
pub fn render<T: Serialize + TableDisplay>(items: &[T], single: bool, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table if items.is_empty() => "No results.\n".to_string(),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(T::headers());
            for item in items {
                table.add_row(item.row());
            }
            format!("{table}\n")
        }
        OutputFormat::Json => {
            let json = match items.first() {
                Some(item) if single => serde_json::to_string_pretty(item),
                _ => serde_json::to_string_pretty(items),
            };
            format!("{}\n", json.unwrap_or_default())
        }
        OutputFormat::Yaml => {
            let yaml = match items.first() {
                Some(item) if single => serde_yaml::to_string(item),
                _ => serde_yaml::to_string(items),
            };
            yaml.unwrap_or_default()
        }
        OutputFormat::Plain => items
            .iter()
            .map(|item| {
                T::headers()
                    .iter()
                    .zip(item.row())
                    .map(|(header, value)| format!("{}: {}\n", header, value))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("---\n"),
    }
}

/// Print a single item
pub fn print_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) {
    print!("{}", render(std::slice::from_ref(item), true, format));
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) {
    print!("{}", render(items, false, format));
}

#[derive(Debug, Clone, Copy)]
pub enum Notice {
    Success,
    Warning,
    Info,
}

impl Notice {
    fn symbol(self) -> &'static str {
        match self {
            Notice::Success => "✅",
            Notice::Warning => "⚠️ ",
            Notice::Info => "ℹ️ ",
        }
    }
}

/// Print a notice next to the results without polluting machine output
pub fn notify(notice: Notice, message: &str, format: OutputFormat) {
    if format.is_human() {
        println!("{} {}", notice.symbol(), message);
    } else {
        eprintln!("{} {}", notice.symbol(), message);
    }
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}

/// Progress bar for a batch of comparisons; hidden for machine formats
pub fn progress_bar(total: u64, format: OutputFormat) -> ProgressBar {
    if !format.is_human() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar
}
