use ataxia_screen::export::{MotorExport, SessionAccumulator};
use ataxia_screen::state::TestState;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

fn opt(v: Option<f64>, digits: usize) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{:.*}", digits, x),
        _ => "—".to_string(),
    }
}

fn severity_color(score: f64) -> Color {
    if score < 0.5 {
        Color::Green
    } else if score < 2.5 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn print_motor_report(export: &MotorExport, state: TestState) {
    let s = &export.stats;
    let c = &s.clinical;

    println!("\nTest: {} ({})", export.test, state);
    println!(
        "Patient: {} (ID: {})",
        export.patient.name, export.patient.id
    );

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    let rows = [
        ("Deviation area", format!("{:.2}", s.deviation_area)),
        (
            "Deviation shown",
            format!("{:.2} ({})", s.deviation_shown, s.deviation_mode),
        ),
        (
            "Turn shown",
            format!("{:.2} ({})", s.turn_shown, s.turn_mode.label()),
        ),
        ("Horizontal turns", s.horizontal_turns.to_string()),
        ("Vertical turns", s.vertical_turns.to_string()),
        ("Discontinuities", s.discontinuities.to_string()),
        ("Out of bounds", s.out_of_bounds.to_string()),
        ("Start fails", s.start_fails.to_string()),
        (
            "Off-by events",
            format!("{} (> {})", s.off_by_count, s.off_by_threshold),
        ),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    println!("{}", table);

    let mut scores = Table::new();
    scores
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    scores.add_row(vec![
        Cell::new("Dev").add_attribute(Attribute::Bold),
        Cell::new("Turn").add_attribute(Attribute::Bold),
        Cell::new("Dis").add_attribute(Attribute::Bold),
        Cell::new("Bounds").add_attribute(Attribute::Bold),
        Cell::new("SARA").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    for i in 0..=4 {
        if let Some(col) = scores.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    scores.add_row(vec![
        Cell::new(format!("{:.2}", c.score_dev)),
        Cell::new(format!("{:.2}", c.score_turn)),
        Cell::new(format!("{:.2}", c.score_dis)),
        Cell::new(format!("{:.2}", c.score_bounds)),
        Cell::new(format!("{:.2}", c.sara_score)).fg(severity_color(c.sara_score)),
    ]);
    println!("{}", scores);

    println!("SARA score: {:.2}", c.sara_score);
    println!("Severity: {}", c.description);
}

pub fn print_speech_report(results: &SessionAccumulator) {
    if results.is_empty() {
        println!("\nNo trials recorded.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Test").add_attribute(Attribute::Bold),
        Cell::new("Rep"),
        Cell::new("Dur (s)"),
        Cell::new("Mean RMS"),
        Cell::new("RMS CV").fg(Color::Cyan),
        Cell::new("Mean F0"),
        Cell::new("F0 CV").fg(Color::Cyan),
        Cell::new("Voiced"),
        Cell::new("Score").add_attribute(Attribute::Bold),
    ]);
    for i in 1..=8 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for r in results.iter() {
        let f = &r.features;
        let score_color = match f.score.score06 {
            0..=1 => Color::Green,
            2..=3 => Color::Yellow,
            _ => Color::Red,
        };
        table.add_row(vec![
            Cell::new(&r.task_title).add_attribute(Attribute::Bold),
            Cell::new(r.rep),
            Cell::new(format!("{:.2}", f.duration_secs)),
            Cell::new(format!("{:.3}", f.mean_rms)),
            Cell::new(opt(f.score.rms_cv, 3)),
            Cell::new(opt(f.mean_f0, 1)),
            Cell::new(opt(f.score.f0_cv, 3)),
            Cell::new(format!("{}/{}", f.voiced_frames, f.frame_count)),
            Cell::new(f.score.score06).fg(score_color),
        ]);
    }
    println!("\n{}", table);

    for r in results.iter() {
        println!("{}: score {}/6", r.task_title, r.features.score.score06);
    }
}
