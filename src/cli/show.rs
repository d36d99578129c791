use anyhow::Result;

use super::join::load_event;
use crate::client::{EventSession, connect};
use crate::core::AppConfig;
use crate::schedule::{GroupGrid, IntensityTier};

const CELL_WIDTH: usize = 8;

fn shade(tier: IntensityTier) -> char {
    match tier {
        IntensityTier::Empty => '.',
        IntensityTier::Low => '░',
        IntensityTier::Medium => '▒',
        IntensityTier::High => '▓',
        IntensityTier::Full => '█',
    }
}

/// Plain text heatmap. Each cell shows its shade and count, best
/// slots are marked with `*`.
pub fn render_grid(grid: &GroupGrid) -> String {
    let label_width = grid
        .rows
        .iter()
        .map(|row| row.label.len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();

    out.push_str(&" ".repeat(label_width));
    for column in &grid.columns {
        out.push_str(&format!(" {:<width$}", column.label.primary, width = CELL_WIDTH));
    }
    out.push('\n');
    if grid.columns.iter().any(|column| column.label.secondary.is_some()) {
        out.push_str(&" ".repeat(label_width));
        for column in &grid.columns {
            let secondary = column.label.secondary.as_deref().unwrap_or("");
            out.push_str(&format!(" {:<width$}", secondary, width = CELL_WIDTH));
        }
        out.push('\n');
    }

    for row in &grid.rows {
        let label = if row.show_label { row.label.as_str() } else { "" };
        out.push_str(&format!("{:>width$}", label, width = label_width));
        for cell in &row.cells {
            let mark = if cell.is_best { "*" } else { "" };
            let text = format!("{}{}{}", shade(cell.tier), cell.count, mark);
            out.push_str(&format!(" {:<width$}", text, width = CELL_WIDTH));
        }
        out.push('\n');
    }

    if grid.is_empty() {
        out.push_str("No responses yet\n");
    } else {
        out.push_str(&format!(
            "{} responding: {}\n",
            grid.total,
            grid.participants.join(", ")
        ));
    }
    out
}

pub async fn run(config: &AppConfig, event_id: &str) -> Result<()> {
    let store = connect(config);
    let event = load_event(&store, event_id).await?;
    let session = EventSession::load(event, &store).await?;

    println!("{}", session.event().name);
    print!("{}", render_grid(&session.grid()));
    Ok(())
}
