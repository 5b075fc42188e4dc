use std::io::{self, Write};

use mdkernel::{Platform, State};

use crate::util::text::truncate;

const INDENT: &str = "      ";

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Column {
    title: &'static str,
    width: usize,
    align: Align,
}

impl Column {
    const fn left(title: &'static str, width: usize) -> Self {
        Self {
            title,
            width,
            align: Align::Left,
        }
    }

    const fn right(title: &'static str, width: usize) -> Self {
        Self {
            title,
            width,
            align: Align::Right,
        }
    }

    fn cell(&self, text: &str) -> String {
        let text = truncate(text, self.width);
        match self.align {
            Align::Left => format!("{:<w$}", text, w = self.width),
            Align::Right => format!("{:>w$}", text, w = self.width),
        }
    }
}

fn rule(columns: &[Column], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = columns.iter().map(|c| "─".repeat(c.width + 2)).collect();
    format!("{INDENT}{left}{}{right}", segments.join(&mid.to_string()))
}

fn row(columns: &[Column], cells: &[&str]) -> String {
    let cells: Vec<String> = columns
        .iter()
        .zip(cells)
        .map(|(column, text)| column.cell(text))
        .collect();
    format!("{INDENT}│ {} │", cells.join(" │ "))
}

fn print_table(out: &mut impl Write, title: &str, columns: &[Column], rows: &[Vec<String>]) {
    let inner: usize = columns.iter().map(|c| c.width + 3).sum::<usize>() - 1;

    let _ = writeln!(out, "{INDENT}┌─ {} ─┐", truncate(title, inner.saturating_sub(4)));
    let _ = writeln!(out, "{}", rule(columns, '┌', '┬', '┐'));
    let titles: Vec<&str> = columns.iter().map(|c| c.title).collect();
    let _ = writeln!(out, "{}", row(columns, &titles));
    let _ = writeln!(out, "{}", rule(columns, '├', '┼', '┤'));
    for cells in rows {
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        let _ = writeln!(out, "{}", row(columns, &cells));
    }
    let _ = writeln!(out, "{}", rule(columns, '└', '┴', '┘'));
    let _ = writeln!(out);
}

pub fn print_platform_summary(platform: &Platform) {
    let rows = vec![
        vec!["Name".to_string(), platform.name().to_string()],
        vec!["Relative speed".to_string(), format!("{:.1}", platform.speed())],
        vec![
            "Double precision".to_string(),
            yes_no(platform.supports_double_precision()).to_string(),
        ],
        vec!["Kernels".to_string(), platform.kernel_names().len().to_string()],
    ];

    let columns = [Column::left("Property", 18), Column::right("Value", 30)];
    print_table(&mut io::stdout().lock(), "Platform", &columns, &rows);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelStatus {
    Registered,
    Required,
    Missing,
}

impl KernelStatus {
    fn label(self) -> &'static str {
        match self {
            KernelStatus::Registered => "registered",
            KernelStatus::Required => "registered (required)",
            KernelStatus::Missing => "MISSING",
        }
    }
}

pub fn print_kernel_table(kernels: &[(&str, KernelStatus)]) {
    let rows: Vec<Vec<String>> = kernels
        .iter()
        .map(|(name, status)| vec![name.to_string(), status.label().to_string()])
        .collect();

    let columns = [Column::left("Kernel", 32), Column::left("Status", 21)];
    print_table(&mut io::stdout().lock(), "Kernels", &columns, &rows);
}

/// One line of an energy report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyRow {
    pub step: usize,
    /// ps
    pub time: f64,
    /// kJ/mol
    pub potential: f64,
    pub kinetic: f64,
}

impl EnergyRow {
    pub fn new(step: usize, state: &State) -> Self {
        Self {
            step,
            time: state.time,
            potential: state.potential_energy,
            kinetic: state.kinetic_energy,
        }
    }

    pub fn total(&self) -> f64 {
        self.potential + self.kinetic
    }
}

pub fn print_energy_table(title: &str, rows: &[EnergyRow]) {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.step.to_string(),
                format!("{:.4}", r.time),
                format!("{:.6}", r.potential),
                format!("{:.6}", r.kinetic),
                format!("{:.6}", r.total()),
            ]
        })
        .collect();

    let columns = [
        Column::right("Step", 8),
        Column::right("Time (ps)", 10),
        Column::right("Potential", 14),
        Column::right("Kinetic", 14),
        Column::right("Total", 14),
    ];
    print_table(&mut io::stdout().lock(), title, &columns, &rows);
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
