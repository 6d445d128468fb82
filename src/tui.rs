//! Text User Interface (TUI) utilities.
//!
//! Renders snapshots and result tables for the terminal driver. The
//! `render_*` / `format_*` functions build strings so they can be tested;
//! the `print_*` functions write them to stdout.

use std::time::Duration;

use terminal_size::{terminal_size, Width};

use crate::data::{DataMode, Item, Rgb};
use crate::pacing::Pacing;
use crate::registry::AlgorithmRegistry;
use crate::session::SortRecord;
use crate::sorting::SortAlgorithm;
use crate::utils::timer::{format_duration, DurationSummary};

/// Key reference printed under every frame
pub const CONTROLS_HELP: &str =
    "Enter: step (pauses) | p: pause/resume | +/-: faster/slower | r: restart | n: next algorithm | q: quit";

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const RESET: &str = "\x1b[0m";

/// Command typed on stdin while a run is on screen, one per line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Pause and advance a single step
    Step,
    TogglePause,
    Faster,
    Slower,
    Restart,
    NextAlgorithm,
    Quit,
}

impl Command {
    /// An empty line (bare Enter) is a step; unknown input is ignored
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "s" => Some(Command::Step),
            "p" | "space" => Some(Command::TogglePause),
            "+" | "=" => Some(Command::Faster),
            "-" => Some(Command::Slower),
            "r" => Some(Command::Restart),
            "n" => Some(Command::NextAlgorithm),
            "q" | "quit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Get the current terminal width, constrained to a reasonable range
pub fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

/// Lines showing `items` in a form suited to `mode`, at most `width` columns wide
pub fn render_items(items: &[Item], mode: DataMode, width: usize) -> Vec<String> {
    match mode {
        DataMode::Numbers => render_bars(items, width),
        DataMode::Colors => render_swatches(items, width),
        DataMode::Words | DataMode::Letters => wrap_tokens(items, width),
    }
}

/// One horizontal bar per number, scaled to the largest magnitude
fn render_bars(items: &[Item], width: usize) -> Vec<String> {
    let values: Vec<i64> = items
        .iter()
        .filter_map(|it| match it {
            Item::Number(n) => Some(*n),
            _ => None,
        })
        .collect();
    let label_width = values.iter().map(|v| v.to_string().len()).max().unwrap_or(1);
    let bar_room = width.saturating_sub(label_width + 3).max(1);
    let largest = values.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0).max(1);

    values
        .iter()
        .map(|&v| {
            let len = ((v.unsigned_abs() as f64 / largest as f64) * bar_room as f64).round() as usize;
            format!("{:>lw$} │{}", v, "█".repeat(len.max(1)), lw = label_width)
        })
        .collect()
}

/// Two-column true-colour cells, wrapped to the width
fn render_swatches(items: &[Item], width: usize) -> Vec<String> {
    let per_line = (width / 2).max(1);
    items
        .chunks(per_line)
        .map(|chunk| {
            let mut line = String::new();
            for item in chunk {
                if let Item::Color(Rgb(r, g, b)) = item {
                    line.push_str(&format!("\x1b[48;2;{};{};{}m  ", r, g, b));
                }
            }
            line.push_str(RESET);
            line
        })
        .collect()
}

/// Space-separated items, wrapped at word boundaries
fn wrap_tokens(items: &[Item], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for item in items {
        let token = item.to_string();
        let needed = if line.is_empty() {
            token.chars().count()
        } else {
            line.chars().count() + 1 + token.chars().count()
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&token);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Status line under the snapshot
pub fn format_status(
    algorithm: Option<&str>,
    steps: usize,
    elapsed: Option<Duration>,
    pacing: &Pacing,
) -> String {
    format!(
        "{} | step {} | {} | speed {} ({} per step)",
        algorithm.unwrap_or("idle"),
        steps,
        elapsed.map(format_duration).unwrap_or_else(|| "-".to_string()),
        pacing.speed_label(),
        format_duration(pacing.delay()),
    )
}

/// One-line summary of a completed run
pub fn format_record(record: &SortRecord) -> String {
    let memory = match record.peak_memory_kb {
        Some(kb) => format!("peak memory {:.2} KiB", kb),
        None => "peak memory unavailable".to_string(),
    };
    format!(
        "{} on {} {}: {:.3} ms, {}",
        record.algorithm, record.input.count, record.data_mode, record.duration_ms, memory
    )
}

/// Redraw the whole screen with the current snapshot and status
pub fn draw_frame(items: &[Item], mode: DataMode, status: &str) {
    let width = get_term_width();
    let mut frame = String::from(CLEAR_SCREEN);
    for line in render_items(items, mode, width) {
        frame.push_str(&line);
        frame.push('\n');
    }
    frame.push('\n');
    frame.push_str(&truncate(status, width));
    println!("{}", frame);
}

/// Print the application header
pub fn print_header() {
    let term_width = get_term_width().min(80); // Cap header at 80
    let title = " Sorting Algorithm Visualizer ";
    let padding = term_width.saturating_sub(title.len() + 2) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);

    println!("╔{}╗", border);
    println!(
        "║{}{}{}║",
        " ".repeat(padding),
        title,
        " ".repeat(right_padding)
    );
    println!("╚{}╝", border);
    println!();
}

/// Print algorithm info box
pub fn print_algo_info_box(algo: &dyn SortAlgorithm) {
    let term_width = get_term_width();
    let max_content_width = term_width.saturating_sub(4).max(40);

    let name_line = format!("Algorithm: {} ({})", algo.name(), algo.id());
    let desc_line = algo.description();
    let stable_line = format!("Stable:    {}", if algo.is_stable() { "yes" } else { "no" });

    let content_width = [name_line.len(), desc_line.len(), stable_line.len()]
        .iter()
        .cloned()
        .max()
        .unwrap_or(60)
        .min(max_content_width);

    let border = "─".repeat(content_width + 2);

    println!("┌{}┐", border);
    for line in [name_line.as_str(), desc_line, stable_line.as_str()] {
        println!(
            "│ {:<width$} │",
            truncate(line, content_width),
            width = content_width
        );
    }
    println!("└{}┘", border);
    println!();
}

/// Print the list of available algorithms
pub fn print_available_algorithms(registry: &AlgorithmRegistry) {
    println!("Available algorithms:");
    println!();
    for algo in registry.all() {
        println!(
            "  {:<10} {:<16} - {}",
            algo.id(),
            algo.name(),
            algo.description()
        );
    }
}

/// Rows of the comparison table, fastest first as given
pub fn render_comparison(rows: &[(String, DurationSummary)], width: usize) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }
    // 12+12+12+6+9 = 51 chars + 5 spaces + 2 indent
    let fixed_width = 58;
    let name_col_width = width.saturating_sub(fixed_width).clamp(15, 30);
    let table_width = name_col_width + 51 + 5;

    let baseline = rows[0].1.avg.as_nanos().max(1) as f64;

    let mut lines = vec![
        format!("  {}", "─".repeat(table_width)),
        format!(
            "  {:<n_width$} {:>12} {:>12} {:>12} {:>6} {:>9}",
            "Algorithm",
            "Average",
            "Min",
            "Max",
            "Runs",
            "Relative",
            n_width = name_col_width
        ),
        format!("  {}", "─".repeat(table_width)),
    ];
    for (name, s) in rows {
        let relative = s.avg.as_nanos() as f64 / baseline;
        lines.push(format!(
            "  {:<n_width$} {:>12} {:>12} {:>12} {:>6} {:>8.2}x",
            truncate(name, name_col_width),
            format_duration(s.avg),
            format_duration(s.min),
            format_duration(s.max),
            s.runs,
            relative,
            n_width = name_col_width
        ));
    }
    lines
}

/// Print the comparison table of completed runs
pub fn print_comparison(rows: &[(String, DurationSummary)], mode: DataMode, count: usize) {
    if rows.is_empty() {
        println!("  No completed runs.");
        return;
    }
    println!("  Data: {} {}", count, mode);
    for line in render_comparison(rows, get_term_width()) {
        println!("{}", line);
    }
    println!();
}
