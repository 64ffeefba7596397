//! Pretty marker reports with source context, via ariadne

use ariadne::{Color, Label, Report, ReportKind, Source};
use schemapad_common::{Marker, Severity};

/// Render markers with source context for terminal output.
pub fn format_markers(source: &str, filename: &str, markers: &[Marker]) -> String {
    let mut output = Vec::new();

    for marker in markers {
        let (kind, color) = match marker.severity {
            Severity::Error => (ReportKind::Error, Color::Red),
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
            Severity::Info => (ReportKind::Advice, Color::Blue),
        };

        let span = marker.span.start..marker.span.end.max(marker.span.start);
        let report = Report::build(kind, filename, marker.span.start)
            .with_message(&marker.message)
            .with_label(
                Label::new((filename, span))
                    .with_color(color)
                    .with_message(if marker.pointer.is_empty() {
                        marker.message.clone()
                    } else {
                        format!("at {}", marker.pointer)
                    }),
            )
            .finish();

        let _ = report.write((filename, Source::from(source)), &mut output);
    }

    String::from_utf8(output).unwrap_or_else(|_| "Report formatting failed".to_string())
}
