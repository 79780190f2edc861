//! Report rendering

use anyhow::{Context, Result};
use clap::ValueEnum;
use image_analyzer::{AnalysisReport, Category};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The report as a JSON object
    Json,
    /// A human-readable summary
    Text,
}

pub fn to_json(report: &AnalysisReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    json.context("Failed to serialize report to JSON")
}

pub fn to_text(report: &AnalysisReport) -> String {
    let mut lines = Vec::new();

    lines.push(format!("📸 {}", report.filename));
    lines.push(format!("  Category:   {}", category_label(report.category)));
    lines.push(format!(
        "  Clarity:    {:.2}{}",
        report.clarity_score,
        if report.is_blurry { " (blurry)" } else { "" }
    ));
    lines.push(format!(
        "  Brightness: {:.2}{}",
        report.brightness_score,
        if report.is_dark { " (dark)" } else { "" }
    ));
    lines.push(format!("  ⭐ Quality:  {:.2}", report.quality_score));
    lines.push(String::new());
    lines.push("  Suggestions:".to_string());
    for suggestion in &report.suggestions {
        lines.push(format!("   - {}", suggestion));
    }

    lines.join("\n")
}

fn category_label(category: Category) -> &'static str {
    match category {
        Category::Interior => "interior",
        Category::Exterior => "exterior",
        Category::Unknown => "unknown (image could not be analyzed)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisReport {
        AnalysisReport {
            filename: "front.jpg".to_string(),
            is_blurry: true,
            is_dark: false,
            brightness_score: 142.5,
            clarity_score: 12.25,
            suggestions: vec![
                "Image appears blurry. Try taking a sharper photo with better lighting.".into(),
            ],
            category: Category::Exterior,
            quality_score: 77.38,
        }
    }

    #[test]
    fn test_compact_json() -> Result<()> {
        let json = to_json(&sample(), false)?;
        assert!(!json.contains('\n'));
        assert!(json.contains("\"category\":\"exterior\""));
        assert!(json.contains("\"clarity_score\":12.25"));
        Ok(())
    }

    #[test]
    fn test_pretty_json_parses_back() -> Result<()> {
        let json = to_json(&sample(), true)?;
        assert!(json.contains('\n'));
        let parsed: AnalysisReport = serde_json::from_str(&json)?;
        assert_eq!(parsed, sample());
        Ok(())
    }

    #[test]
    fn test_text_summary() {
        let text = to_text(&sample());
        assert!(text.contains("front.jpg"));
        assert!(text.contains("Clarity:    12.25 (blurry)"));
        assert!(text.contains("Brightness: 142.50"));
        assert!(!text.contains("(dark)"));
        assert!(text.contains("Quality:  77.38"));
        assert!(text.contains("   - Image appears blurry."));
    }

    #[test]
    fn test_unknown_category_is_explained() {
        let mut report = sample();
        report.category = Category::Unknown;
        assert!(to_text(&report).contains("could not be analyzed"));
    }
}
