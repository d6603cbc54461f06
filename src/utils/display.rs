//! Display and output formatting utilities

use crate::config::ReconstructionFormat;
use crate::reconstruct::Reconstruction;
use crate::schur::Coloring;
use anyhow::Result;

/// Format reconstructions for display
pub struct ReconstructionFormatter;

impl ReconstructionFormatter {
    /// Render a reconstruction in the requested format
    pub fn format(reconstruction: &Reconstruction, format: ReconstructionFormat) -> Result<String> {
        match format {
            ReconstructionFormat::Columns => Ok(Self::format_reconstruction(reconstruction)),
            ReconstructionFormat::Json => Ok(serde_json::to_string_pretty(reconstruction)? + "\n"),
        }
    }

    /// Two aligned lines when every item has exactly one label, otherwise one
    /// `item label` line per recovered fact
    pub fn format_reconstruction(reconstruction: &Reconstruction) -> String {
        match reconstruction.coloring() {
            Some(coloring) => Self::format_columns(&coloring),
            None => Self::format_pairs(reconstruction),
        }
    }

    /// Item indices on one line and their labels underneath, right-aligned in
    /// columns as wide as the widest number on either line
    pub fn format_columns(coloring: &Coloring) -> String {
        let largest = coloring
            .labels
            .iter()
            .copied()
            .chain(std::iter::once(coloring.items().saturating_sub(1)))
            .max()
            .unwrap_or(0);
        let width = largest.to_string().len();

        let items: Vec<String> = (0..coloring.items())
            .map(|item| format!("{:>width$}", item, width = width))
            .collect();
        let labels: Vec<String> = coloring
            .labels
            .iter()
            .map(|label| format!("{:>width$}", label, width = width))
            .collect();

        format!("{}\n{}\n", items.join(" "), labels.join(" "))
    }

    pub fn format_pairs(reconstruction: &Reconstruction) -> String {
        let mut output = String::new();
        for fact in &reconstruction.facts {
            output.push_str(&format!("{} {}\n", fact.item, fact.label));
        }
        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() &&
        (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconstruct::{Assignment, SolutionReconstructor};
    use crate::schur::parse_mapping;

    fn reconstruct(mapping: &str, assignment: &str, items: usize, labels: usize) -> Reconstruction {
        SolutionReconstructor::new(items, labels)
            .unwrap()
            .reconstruct(&Assignment::parse(assignment).unwrap(), &parse_mapping(mapping).unwrap())
    }

    #[test]
    fn test_columns_are_padded() {
        let coloring = Coloring::new(vec![0, 1, 1, 0, 2, 2, 0, 1, 1, 0, 2, 2]);
        let text = ReconstructionFormatter::format_columns(&coloring);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], " 0  1  2  3  4  5  6  7  8  9 10 11");
        assert_eq!(lines[1], " 0  1  1  0  2  2  0  1  1  0  2  2");
    }

    #[test]
    fn test_wide_labels_keep_columns_aligned() {
        let coloring = Coloring::new(vec![0, 10]);
        let text = ReconstructionFormatter::format_columns(&coloring);
        assert_eq!(text, " 0  1\n 0 10\n");
    }

    #[test]
    fn test_consistent_reconstruction_uses_columns() {
        let result = reconstruct("color_0_0 1\ncolor_1_1 2\ncolor_0_1 3\ncolor_1_0 4\n", "1 2 -3 -4", 2, 2);
        assert_eq!(ReconstructionFormatter::format_reconstruction(&result), "0 1\n0 1\n");
    }

    #[test]
    fn test_violation_falls_back_to_pairs() {
        let result = reconstruct("color_0_0 1\ncolor_1_1 2\n", "1 -2", 2, 2);
        assert_eq!(ReconstructionFormatter::format_reconstruction(&result), "0 0\n");
    }

    #[test]
    fn test_json_output() {
        let result = reconstruct("color_0_0 1\ncolor_1_1 2\n", "1 -2", 2, 2);
        let json = ReconstructionFormatter::format(&result, ReconstructionFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["facts"][0]["item"], 0);
        assert_eq!(value["findings"][0]["kind"], "cardinality_violation");
        assert_eq!(value["findings"][0]["item"], 1);
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        // Should either be colored or plain text
        assert!(colored.contains("test"));
        assert!(ColorOutput::success("OK").contains("OK"));
    }
}
