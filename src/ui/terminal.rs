//! Terminal frontend for the interactive shell.
//!
//! Dialogs read answers from stdin; charts are drawn as horizontal bars.

use std::collections::HashSet;
use std::io::{self, BufRead, Write};

use colored::Colorize;

use super::{ChartHandle, ChartKind, ChartSlot, ChartSpec, Frontend};

/// Width of the longest bar, in cells.
const BAR_WIDTH: usize = 40;

#[derive(Debug, Default)]
pub struct TerminalFrontend {
    next_handle: u64,
    live: HashSet<ChartHandle>,
}

impl TerminalFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chart instances created and not yet destroyed.
    pub fn live_charts(&self) -> usize {
        self.live.len()
    }

    fn read_line(&self, question: &str) -> Option<String> {
        print!("{} ", question.bold());
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Frontend for TerminalFrontend {
    fn alert(&mut self, message: &str) {
        println!("{} {}", "!".yellow().bold(), message);
    }

    fn confirm(&mut self, question: &str) -> bool {
        let answer = self
            .read_line(&format!("{question} [y/N]"))
            .unwrap_or_default();
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn prompt(&mut self, question: &str) -> Option<String> {
        self.read_line(question)
    }

    fn create_chart(&mut self, _slot: ChartSlot, spec: &ChartSpec) -> ChartHandle {
        print!("{}", render_chart(spec));
        self.next_handle += 1;
        let handle = ChartHandle(self.next_handle);
        self.live.insert(handle);
        handle
    }

    fn destroy_chart(&mut self, handle: ChartHandle) {
        self.live.remove(&handle);
    }
}

/// Render a chart as text: a title line and one bar per label.
pub fn render_chart(spec: &ChartSpec) -> String {
    let mut out = format!("{}\n", spec.title.bold().cyan());

    if spec.labels.is_empty() {
        out.push_str(&format!("  {}\n", "no data".dimmed()));
        return out;
    }

    let max = spec.values.iter().copied().max().unwrap_or(0).max(1);
    let total: u64 = spec.values.iter().sum();
    let label_width = spec.labels.iter().map(|l| l.len()).max().unwrap_or(0);

    for (label, value) in spec.labels.iter().zip(&spec.values) {
        let cells = ((*value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
        let bar = "█".repeat(cells);
        let suffix = match spec.kind {
            ChartKind::Doughnut if total > 0 => {
                format!("{value} ({:.0}%)", *value as f64 / total as f64 * 100.0)
            }
            _ => value.to_string(),
        };
        out.push_str(&format!("  {label:<label_width$} {} {suffix}\n", bar.green()));
    }
    out
}
