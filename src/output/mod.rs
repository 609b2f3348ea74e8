pub mod export;
pub mod formatter;

pub use export::{write_export, ExportDocument};
pub use formatter::{
    format_class_overview, format_class_table, format_class_tsv, format_fraction, format_matrix,
    format_points, format_standings, format_standings_tsv, should_use_colors,
};
