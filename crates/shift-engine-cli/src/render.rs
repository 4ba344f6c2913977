//! Plain-text table output.

use shift_engine::notes::note_for;
use shift_engine::{NoteMap, ScheduleRow, Zones};

/// Render the schedule as an aligned table, one line per row, with the note
/// for each date in the last column.
pub fn render_table(rows: &[ScheduleRow], notes: &NoteMap, zones: &Zones) -> String {
    let header = vec![
        "Day".to_string(),
        "Date".to_string(),
        format!("Sleep ({})", zones.local),
        format!("Wake ({})", zones.local),
        format!("Sleep ({})", zones.remote),
        format!("Wake ({})", zones.remote),
        "Note".to_string(),
    ];

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.day.to_string(),
                row.date.format("%Y-%m-%d").to_string(),
                span(&row.sleep_start, &row.sleep_end),
                span(&row.wake_start, &row.wake_end),
                span(&row.sleep_start_remote, &row.sleep_end_remote),
                span(&row.wake_start_remote, &row.wake_end_remote),
                note_for(notes, row.date).unwrap_or_default().to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for cells in &body {
        push_line(&mut out, cells, &widths);
    }
    out
}

fn span(start: &str, end: &str) -> String {
    format!("{start} - {end}")
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
