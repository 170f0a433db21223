//! Run summary printed after a successful command.

use std::path::PathBuf;

use comfy_table::{ContentArrangement, Table, presets};

/// One written output table.
#[derive(Debug)]
pub struct OutputSummary {
    pub name: String,
    pub rows: usize,
    pub path: PathBuf,
}

/// Everything a command wrote, in write order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outputs: Vec<OutputSummary>,
}

impl RunSummary {
    pub fn push(&mut self, name: impl Into<String>, rows: usize, path: PathBuf) {
        self.outputs.push(OutputSummary {
            name: name.into(),
            rows,
            path,
        });
    }

    pub fn single(name: impl Into<String>, rows: usize, path: PathBuf) -> Self {
        let mut summary = Self::default();
        summary.push(name, rows, path);
        summary
    }
}

pub fn print_summary(summary: &RunSummary) {
    let mut table = Table::new();
    table.set_header(vec!["Output", "Rows", "Path"]);
    apply_table_style(&mut table);
    for output in &summary.outputs {
        table.add_row(vec![
            output.name.clone(),
            output.rows.to_string(),
            output.path.display().to_string(),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
}
