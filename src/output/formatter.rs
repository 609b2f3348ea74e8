use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::{
    AggregationMode, CellStatus, ClassRanking, CompletionMatrix, CompletionStatus, GroupStandings,
};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a total for display. Rank points are whole numbers; a raw value
/// sum keeps one decimal and gets a trailing `~` to mark the approximation.
pub fn format_points(total: f64, mode: AggregationMode) -> String {
    match mode {
        AggregationMode::Ranked => format!("{:.0}", total),
        AggregationMode::RawValueSum => format!("{:.1}~", total),
    }
}

/// "participated/expected", e.g. "2/3"
pub fn format_fraction(participated: usize, expected: usize) -> String {
    format!("{}/{}", participated, expected)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Pad to a display width counted in chars (names carry umlauts).
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

/// Width available for the name column given the other fixed columns.
fn name_width(fixed_width: usize) -> usize {
    match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => (width - fixed_width).min(24),
        Some(_) => 10,
        None => 24,
    }
}

/// Format one class as a ranking table.
///
/// Columns: rank, points, name, gender, group, games played, status, crown.
pub fn format_class_table(ranking: &ClassRanking, use_colors: bool) -> String {
    let mut lines = Vec::with_capacity(ranking.rows.len() + 1);

    let games: Vec<&str> = ranking.games.iter().map(|g| g.name.as_str()).collect();
    let header = format!(
        "Class {} ({} games: {}){}",
        ranking.class_label,
        ranking.games.len(),
        if games.is_empty() { "none".to_string() } else { games.join(", ") },
        if ranking.all_complete { "" } else { " - incomplete" }
    );
    lines.push(if use_colors { header.bold().to_string() } else { header });

    if ranking.rows.is_empty() {
        lines.push("No children in this class.".to_string());
        return lines.join("\n");
    }

    let width = name_width(40);
    for row in &ranking.rows {
        let rank = format!("{:>2}.", row.rank);
        let points = format!("{:>6}", format_points(row.total, ranking.mode));
        let name = pad(&truncate_name(&row.child_name, width), width);
        let group = pad(row.group_name.as_deref().unwrap_or("-"), 10);
        let fraction = format!(
            "{:>5}",
            format_fraction(row.games_participated, row.games_expected)
        );
        let status = match row.status {
            CompletionStatus::Complete => "",
            CompletionStatus::Incomplete => "*",
        };
        let crown = row.crown.unwrap_or("");

        let line = if use_colors {
            format!(
                "{} {}  {}  {}  {}  {}{}  {}",
                rank.dimmed(),
                points.bold(),
                name,
                row.gender,
                group.cyan(),
                fraction,
                status.red(),
                crown.yellow().bold()
            )
        } else {
            format!(
                "{} {}  {}  {}  {}  {}{}  {}",
                rank, points, name, row.gender, group, fraction, status, crown
            )
        };
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Format class rankings as tab-separated values for scripting
/// Columns: class, rank, name, gender, group, total, played/expected, status, crown
pub fn format_class_tsv(rankings: &[ClassRanking]) -> String {
    rankings
        .iter()
        .flat_map(|ranking| {
            ranking.rows.iter().map(move |row| {
                format!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    ranking.class_label,
                    row.rank,
                    row.child_name,
                    row.gender,
                    row.group_name.as_deref().unwrap_or(""),
                    format_points(row.total, ranking.mode),
                    format_fraction(row.games_participated, row.games_expected),
                    row.status,
                    row.crown.unwrap_or("")
                )
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One summary line per class: children, games, completion, crown holders.
pub fn format_class_overview(rankings: &[ClassRanking], use_colors: bool) -> String {
    if rankings.is_empty() {
        return "No classes found.".to_string();
    }

    rankings
        .iter()
        .map(|ranking| {
            let crowns = ranking
                .crowns
                .iter()
                .map(|c| format!("{}: {}", c.title, c.child_name))
                .collect::<Vec<_>>()
                .join(", ");
            let status = if ranking.all_complete { "complete" } else { "incomplete" };
            let label = pad(&ranking.class_label, 6);

            let line = if use_colors {
                format!(
                    "{}{:>3} children  {:>2} games  {:<10}  {}",
                    label.bold(),
                    ranking.rows.len(),
                    ranking.games.len(),
                    status,
                    crowns.yellow()
                )
            } else {
                format!(
                    "{}{:>3} children  {:>2} games  {:<10}  {}",
                    label,
                    ranking.rows.len(),
                    ranking.games.len(),
                    status,
                    crowns
                )
            };
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the live standings of one group with a progress header.
pub fn format_standings(standings: &GroupStandings, use_colors: bool) -> String {
    let mut lines = Vec::with_capacity(standings.rows.len() + 1);

    let header = format!(
        "{} ({}) - {} of {} games played",
        standings.group_name,
        standings.class_label,
        standings.completed_games,
        standings.expected_games
    );
    lines.push(if use_colors { header.bold().to_string() } else { header });

    if standings.rows.is_empty() {
        lines.push("No children in this group.".to_string());
        return lines.join("\n");
    }

    let width = name_width(20);
    for row in &standings.rows {
        let position = format!("{:>2}.", row.position);
        let points = format!("{:>6}", format_points(row.points, standings.mode));
        let name = pad(&truncate_name(&row.child_name, width), width);
        let fraction = format_fraction(row.games_participated, row.games_expected);

        let line = if use_colors {
            format!("{} {}  {}  {}", position.dimmed(), points.bold(), name, fraction)
        } else {
            format!("{} {}  {}  {}", position, points, name, fraction)
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Tab-separated standings: position, name, points, played/expected
pub fn format_standings_tsv(standings: &GroupStandings) -> String {
    standings
        .rows
        .iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}",
                row.position,
                row.child_name,
                format_points(row.points, standings.mode),
                format_fraction(row.games_participated, row.games_expected)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the completion matrix, one line per group and one column per game.
pub fn format_matrix(matrix: &CompletionMatrix, use_colors: bool) -> String {
    if matrix.rows.is_empty() {
        return "No groups found.".to_string();
    }

    let column_width = matrix
        .games
        .iter()
        .map(|g| g.name.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(7, 14);

    let mut header = pad("Group", 16);
    for game in &matrix.games {
        header.push_str(&pad(&truncate_name(&game.name, column_width), column_width + 2));
    }
    let mut lines = vec![header.trim_end().to_string()];

    for row in &matrix.rows {
        let label = format!("{} ({})", row.group_name, row.class_label);
        let mut line = pad(&truncate_name(&label, 15), 16);
        for cell in &row.cells {
            let text = pad(&cell.status.to_string(), column_width + 2);
            if use_colors {
                let colored = match cell.status {
                    CellStatus::NotAssigned => text.dimmed().to_string(),
                    CellStatus::Open => text.red().to_string(),
                    CellStatus::Partial => text.yellow().to_string(),
                    CellStatus::Complete => text.green().to_string(),
                };
                line.push_str(&colored);
            } else {
                line.push_str(&text);
            }
        }
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}
