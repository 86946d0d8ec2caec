use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use keycomfort::analysis::AnalysisResult;
use keycomfort::api::LayoutReport;
use keycomfort::comfort::{Comfort, ComfortBucket, ComfortHistogram};
use keycomfort::layout::LayoutStats;
use strum::IntoEnumIterator;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right_from(table: &mut Table, first: usize, last: usize) {
    for i in first..=last {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn comfort_color(c: Comfort) -> Color {
    match c {
        Comfort::Comfortable => Color::Green,
        Comfort::Partial => Color::Yellow,
        Comfort::Uncomfortable => Color::Red,
    }
}

fn symbol_label(c: char) -> String {
    c.escape_debug().to_string()
}

pub fn print_penalty_report(r: &AnalysisResult) {
    println!("\n📊 Penalty: {} ({})", r.layout_name, r.input_kind);

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    let rows: [(&str, String); 8] = [
        ("Total penalty", format!("{:.2}", r.total_penalty)),
        ("Words", r.word_count.to_string()),
        ("Symbols", r.total_symbol_count.to_string()),
        ("Processed", r.processed_symbol_count.to_string()),
        ("Coverage", format!("{:.1}%", r.coverage * 100.0)),
        ("Avg / word", format!("{:.3}", r.avg_penalty_per_word)),
        ("Avg / symbol", format!("{:.3}", r.avg_penalty_per_symbol)),
        ("Unknown", r.unknown_symbols.len().to_string()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    align_right_from(&mut table, 1, 1);
    println!("{}", table);

    if !r.unknown_symbols.is_empty() {
        let list: Vec<String> = r.unknown_symbols.iter().map(|&c| symbol_label(c)).collect();
        println!("⚠️  Unknown symbols: {}", list.join(" "));
    }

    if !r.finger_press_counts.is_empty() {
        let total: u64 = r.finger_press_counts.values().sum();
        let mut fingers = new_table();
        fingers.set_header(vec!["Finger", "Presses", "Share"]);
        for (finger, count) in &r.finger_press_counts {
            fingers.add_row(vec![
                Cell::new(finger),
                Cell::new(count),
                Cell::new(format!("{:.1}%", *count as f64 / total as f64 * 100.0)),
            ]);
        }
        align_right_from(&mut fingers, 1, 2);
        println!("{}", fingers);
    }
}

fn bucket_row(label: String, b: &ComfortBucket) -> Vec<Cell> {
    let mut row = vec![Cell::new(label).add_attribute(Attribute::Bold)];
    for c in Comfort::iter() {
        row.push(
            Cell::new(format!("{} ({:.1}%)", b.count(c), b.percent(c))).fg(comfort_color(c)),
        );
    }
    row.push(Cell::new(b.total));
    row
}

fn comfort_header(first: &str) -> Vec<Cell> {
    let mut header = vec![Cell::new(first).add_attribute(Attribute::Bold)];
    for c in Comfort::iter() {
        header.push(Cell::new(c).fg(comfort_color(c)));
    }
    header.push(Cell::new("Total"));
    header
}

pub fn print_comfort_report(h: &ComfortHistogram) {
    println!("\n🖐️  Comfort: {}", h.layout_name);

    let mut by_length = new_table();
    by_length.set_header(comfort_header("Length"));
    for (len, b) in &h.by_length {
        by_length.add_row(bucket_row(len.to_string(), b));
    }
    by_length.add_row(bucket_row("All".to_string(), &h.overall));
    align_right_from(&mut by_length, 1, 4);
    println!("{}", by_length);

    let mut by_hand = new_table();
    by_hand.set_header(comfort_header("Hand"));
    for (hand, b) in &h.by_hand {
        by_hand.add_row(bucket_row(hand.to_string(), b));
    }
    align_right_from(&mut by_hand, 1, 4);
    println!("{}", by_hand);

    println!(
        "Words analyzed: {} / {} ({:.1}%)   With modifiers: {} ({:.1}%)",
        h.words_analyzed,
        h.total_words,
        h.analysis_percent,
        h.sequences_with_modifiers,
        h.modifiers_percent
    );

    let mut samples = new_table();
    samples.set_header(vec!["Class", "Examples", "Most frequent"]);
    for c in Comfort::iter() {
        let examples: Vec<&str> = h
            .examples
            .get(&c)
            .map(|v| v.iter().map(|e| e.sequence.as_str()).collect())
            .unwrap_or_default();
        let top: Vec<String> = h
            .top_sequences
            .get(&c)
            .map(|v| v.iter().take(5).map(|(s, n)| format!("{} ×{}", s, n)).collect())
            .unwrap_or_default();
        samples.add_row(vec![
            Cell::new(c).fg(comfort_color(c)),
            Cell::new(examples.join(", ")),
            Cell::new(top.join(", ")),
        ]);
    }
    println!("{}", samples);
}

pub fn print_comparison_report(results: &[LayoutReport]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Layout").add_attribute(Attribute::Bold),
        Cell::new("Penalty").fg(Color::Cyan),
        Cell::new("Avg/Word"),
        Cell::new("Avg/Sym"),
        Cell::new("Cover"),
        Cell::new("Comf").fg(Color::Green),
        Cell::new("Part").fg(Color::Yellow),
        Cell::new("Uncomf").fg(Color::Red),
        Cell::new("Score").add_attribute(Attribute::Bold),
    ]);

    for r in results {
        let share = |c: Comfort| match &r.comfort {
            Some(h) => format!("{:.1}%", h.overall.percent(c)),
            None => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(&r.layout_name).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.1}", r.penalty.total_penalty)).fg(Color::Cyan),
            Cell::new(format!("{:.3}", r.penalty.avg_penalty_per_word)),
            Cell::new(format!("{:.3}", r.penalty.avg_penalty_per_symbol)),
            Cell::new(format!("{:.1}%", r.penalty.coverage * 100.0)),
            Cell::new(share(Comfort::Comfortable)).fg(Color::Green),
            Cell::new(share(Comfort::Partial)).fg(Color::Yellow),
            Cell::new(share(Comfort::Uncomfortable)).fg(Color::Red),
            Cell::new(format!("{:.3}", r.stats.normalized_score)).add_attribute(Attribute::Bold),
        ]);
    }
    align_right_from(&mut table, 1, 8);
    println!("\n{}", table);
}

pub fn print_layout_report(name: &str, s: &LayoutStats) {
    println!("\n🧭 Layout: {}", name);

    let mut table = new_table();
    table.set_header(vec!["Finger", "Load", "Max Reach"]);
    for (finger, load) in &s.finger_load {
        let reach = s
            .max_reach
            .get(finger)
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(finger),
            Cell::new(format!("{:.1}%", load)),
            Cell::new(reach),
        ]);
    }
    align_right_from(&mut table, 1, 2);
    println!("{}", table);

    println!(
        "Top-two load: {:.1}%   Max reach: {}   Goodness: {:.3}   Normalized: {:.3}",
        s.top_two_load, s.overall_max_reach, s.goodness_score, s.normalized_score
    );

    let m = &s.modifiers;
    let mut mods = new_table();
    mods.set_header(vec!["Symbols", "Shift", "Alt", "Both", "None"]);
    mods.add_row(vec![
        Cell::new(m.total_symbols),
        Cell::new(format!("{} ({:.1}%)", m.with_shift, m.shift_percent)),
        Cell::new(format!("{} ({:.1}%)", m.with_alt, m.alt_percent)),
        Cell::new(m.with_both),
        Cell::new(m.no_modifiers),
    ]);
    align_right_from(&mut mods, 0, 4);
    println!("{}", mods);
}
