use crate::analysis::AnalysisOutcome;
use crate::indicators::FractalKind;
use crate::recommendation::Recommendation;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, modifiers::UTF8_ROUND_CORNERS,
    presets::UTF8_BORDERS_ONLY,
};

fn recommendation_color(rec: Recommendation) -> Color {
    match rec {
        Recommendation::Buy => Color::Green,
        Recommendation::Sell => Color::Red,
        Recommendation::Hold => Color::Yellow,
    }
}

fn value_row(label: &str, value: String) -> Vec<Cell> {
    vec![
        Cell::new(label).fg(Color::DarkGrey),
        Cell::new(value).set_alignment(CellAlignment::Right),
    ]
}

/// Console summary of one run.
pub fn summary_table(outcome: &AnalysisOutcome) -> Table {
    let analysis = &outcome.analysis;

    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
        ]);

    table.add_row(value_row("Price points", outcome.row_count.to_string()));
    table.add_row(value_row("Current price", format!("{:.6}", analysis.current_price)));
    table.add_row(value_row("RSI (window)", format!("{:.2}", analysis.rsi)));
    table.add_row(value_row(
        "RSI (rolling)",
        analysis
            .rolling_rsi
            .map_or_else(|| "N/A".to_string(), |v| format!("{:.2}", v)),
    ));

    for (label, level) in analysis.fib_levels.labelled() {
        table.add_row(value_row(&format!("Fib {}", label), format!("{:.6}", level)));
    }

    let highs = analysis.fractals.iter().filter(|f| f.kind == FractalKind::High).count();
    let lows = analysis.fractals.len() - highs;
    table.add_row(value_row("Fractals (high/low)", format!("{}/{}", highs, lows)));

    table.add_row(vec![
        Cell::new("Recommendation").add_attribute(Attribute::Bold),
        Cell::new(analysis.recommendation)
            .fg(recommendation_color(analysis.recommendation))
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
    ]);

    table
}
