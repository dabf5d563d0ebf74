//! Report assembly
//!
//! Turns source reports into the final text document: one aligned header
//! per source, its item lines, then its notes. Layout and color are fixed by
//! a `Presentation` value built once per run.

use crate::config::PresentationConfig;
use crate::status::{SourceReport, Tier};
use owo_colors::OwoColorize;

/// Immutable layout and color settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    color: bool,
    header_pad: [usize; 2],
    content_pad: [usize; 2],
}

impl Presentation {
    pub fn new(layout: &PresentationConfig, color: bool) -> Self {
        Self {
            color,
            header_pad: layout.header_pad,
            content_pad: layout.content_pad,
        }
    }

    /// Default layout without colors
    pub fn plain() -> Self {
        Self::new(&PresentationConfig::default(), false)
    }

    fn paint(&self, text: &str, tier: Tier) -> String {
        if !self.color {
            return text.to_string();
        }
        match tier {
            Tier::Good => text.green().to_string(),
            Tier::Warning => text.yellow().to_string(),
            Tier::Critical => text.red().to_string(),
        }
    }

    /// `{indent}{name}:{gap}{value}`, the value column starting `pad[1]`
    /// spaces after the longest name
    fn line(&self, name: &str, value: &str, width: usize, pad: [usize; 2]) -> String {
        let len = name.chars().count();
        format!(
            "{}{}:{}{}",
            " ".repeat(pad[0]),
            name,
            " ".repeat(width.saturating_sub(len) + pad[1]),
            value
        )
    }

    /// Lines for one source. `title_width` aligns headers across sources.
    pub fn render_report(&self, report: &SourceReport, title_width: usize) -> Vec<String> {
        let mut lines = Vec::with_capacity(1 + report.items().len() + report.notes().len());

        let label = self.paint(report.header_label(), report.header_tier());
        lines.push(self.line(report.title(), &label, title_width, self.header_pad));

        let width = report
            .items()
            .iter()
            .map(|item| item.display_name.chars().count())
            .max()
            .unwrap_or(0);
        for item in report.items() {
            let label = self.paint(&item.label, item.tier);
            lines.push(self.line(&item.display_name, &label, width, self.content_pad));
        }

        let indent = " ".repeat(self.content_pad[0]);
        for note in report.notes() {
            lines.push(format!("{}{}", indent, note));
        }

        lines
    }

    /// Whole document, sources in the given order
    pub fn render_document(&self, reports: &[SourceReport]) -> String {
        let title_width = reports
            .iter()
            .map(|report| report.title().chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for report in reports {
            for line in self.render_report(report, title_width) {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Item;

    fn sample_report() -> SourceReport {
        SourceReport::new(
            "Systemd",
            Tier::Warning,
            "warning",
            vec![
                Item::new("cron.service", Tier::Good, "active"),
                Item::new("nginx.service", Tier::Critical, "failed"),
            ],
            vec!["Failed to read foo.service: Access denied".to_string()],
        )
    }

    #[test]
    fn test_render_report_alignment() {
        let lines = Presentation::plain().render_report(&sample_report(), 7);
        assert_eq!(
            lines,
            vec![
                "Systemd:  warning",
                "  cron.service:  active",
                "  nginx.service: failed",
                "  Failed to read foo.service: Access denied",
            ]
        );
    }

    #[test]
    fn test_headers_align_across_sources() {
        let reports = vec![
            SourceReport::header_only("Systemd", Tier::Good, "OK"),
            SourceReport::header_only("CPU temp", Tier::Good, "OK"),
        ];
        let doc = Presentation::plain().render_document(&reports);
        assert_eq!(doc, "Systemd:   OK\nCPU temp:  OK\n");
    }

    #[test]
    fn test_display_name_is_rendered() {
        let report = SourceReport::new(
            "Systemd",
            Tier::Good,
            "OK",
            vec![Item::new("sshd.service", Tier::Good, "active").with_display_name("sshd")],
            Vec::new(),
        );
        let lines = Presentation::plain().render_report(&report, 7);
        assert_eq!(lines[1], "  sshd: active");
    }

    #[test]
    fn test_color_wraps_labels_only() {
        let presentation = Presentation::new(&PresentationConfig::default(), true);
        let lines = presentation.render_report(&sample_report(), 7);
        assert!(lines[0].starts_with("Systemd:  "));
        assert!(lines[0].contains("\x1b["));
        assert!(lines[1].contains("cron.service"));
        assert!(!lines[3].contains("\x1b["));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(Presentation::plain().render_document(&[]), "");
    }
}
