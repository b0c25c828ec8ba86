use chrono::NaiveDate;
use market::{Change, indicators::trend};
use rust_decimal::Decimal;

const RULE: &str = "━━━━━━━━━━━━━━━━";
const LINE_MARK: &str = "┃";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub name: String,
    pub open: Decimal,
    pub previous_close: Decimal,
    pub change: Change,
    pub session: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub title: String,
    pub emoji: String,
    pub lines: Vec<ReportLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Run date in the report time zone.
    pub date: NaiveDate,
    pub sections: Vec<ReportSection>,
    pub commentary: Option<String>,
}

impl Report {
    pub fn line_count(&self) -> usize {
        self.sections.iter().map(|s| s.lines.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.line_count() == 0
    }

    pub fn lines(&self) -> impl Iterator<Item = &ReportLine> {
        self.sections.iter().flat_map(|s| s.lines.iter())
    }
}

/// Render the chat message. Sections without lines are left out.
pub fn compose(report: &Report) -> String {
    let mut out = vec![
        "☀️ Good morning!".to_string(),
        format!("📊 **Market report · {}**", report.date.format("%a %d %b %Y")),
        String::new(),
    ];

    if report.is_empty() {
        out.push("⚠️ No market data available today: every quote request failed.".to_string());
        return out.join("\n");
    }

    out.push(RULE.to_string());

    for section in report.sections.iter().filter(|s| !s.lines.is_empty()) {
        out.push(String::new());
        out.push(format!("{} **{}**", section.emoji, section.title));
        out.extend(section.lines.iter().map(format_line));
    }

    out.push(String::new());
    out.push(RULE.to_string());

    if let Some(commentary) = &report.commentary {
        out.push(String::new());
        out.push("💡 **Today's takeaway**".to_string());
        out.push(String::new());
        out.push(commentary.trim().to_string());
        out.push(String::new());
        out.push(RULE.to_string());
    }

    out.push("Have a great day! 🍀".to_string());
    out.join("\n")
}

/// Plain one-line-per-index summary, used as model input.
pub fn data_lines(report: &Report) -> String {
    report
        .lines()
        .map(|l| {
            format!(
                "- {}: open {}, previous close {} ({}, {}%)",
                l.name,
                format_price(l.open),
                format_price(l.previous_close),
                format_signed(l.change.change),
                format_signed(l.change.percent)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_line(line: &ReportLine) -> String {
    format!(
        "{} {} [{}]  open {} · prev close {}  {} ({}%) {}",
        LINE_MARK,
        line.name,
        line.session.format("%m/%d"),
        format_price(line.open),
        format_price(line.previous_close),
        format_signed(line.change.change),
        format_signed(line.change.percent),
        trend::classify(line.change.percent).marker()
    )
}

/// Two decimals with thousands separators.
pub fn format_price(value: Decimal) -> String {
    let digits = format!("{:.2}", market::round(value).abs());
    let (int, frac) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

/// Like [`format_price`] but always carries a sign; zero is `+`.
pub fn format_signed(value: Decimal) -> String {
    let sign = if value < Decimal::ZERO { "-" } else { "+" };
    format!("{sign}{}", format_price(value.abs()))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn line(name: &str, open: Decimal, previous_close: Decimal) -> ReportLine {
        ReportLine {
            name: name.to_string(),
            open,
            previous_close,
            change: market::calculate_change(open, previous_close).unwrap(),
            session: date(10, 19),
        }
    }

    fn report(sections: Vec<ReportSection>) -> Report {
        Report {
            date: date(10, 19),
            sections,
            commentary: None,
        }
    }

    fn japan(lines: Vec<ReportLine>) -> ReportSection {
        ReportSection {
            title: "Japan".to_string(),
            emoji: "🇯🇵".to_string(),
            lines,
        }
    }

    #[test]
    fn prices_have_separators_and_two_decimals() {
        assert_eq!(format_price(dec!(28500)), "28,500.00");
        assert_eq!(format_price(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_price(dec!(999.995)), "1,000.00");
        assert_eq!(format_price(dec!(151.2)), "151.20");
        assert_eq!(format_price(dec!(0.5)), "0.50");
    }

    #[test]
    fn signs_are_explicit() {
        assert_eq!(format_signed(dec!(500)), "+500.00");
        assert_eq!(format_signed(dec!(-500)), "-500.00");
        assert_eq!(format_signed(dec!(-1.79)), "-1.79");
        assert_eq!(format_signed(Decimal::ZERO), "+0.00");
    }

    #[test]
    fn one_line_per_index() {
        let msg = compose(&report(vec![
            japan(vec![
                line("Nikkei 225", dec!(28500.00), dec!(28000.00)),
                line("TOPIX", dec!(2710.00), dec!(2720.00)),
            ]),
            ReportSection {
                title: "FX".to_string(),
                emoji: "💱".to_string(),
                lines: vec![line("USD/JPY", dec!(151.20), dec!(151.20))],
            },
        ]));

        let lines: Vec<&str> = msg.lines().filter(|l| l.starts_with(LINE_MARK)).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "┃ Nikkei 225 [10/19]  open 28,500.00 · prev close 28,000.00  +500.00 (+1.79%) 🚀"
        );
        assert!(lines[1].contains("-10.00 (-0.37%) 📉"));
        assert!(lines[2].contains("+0.00 (+0.00%) ➡️"));
        assert!(msg.contains("Mon 19 Oct 2026"));
        assert!(msg.contains("💱 **FX**"));
    }

    #[test]
    fn empty_sections_are_skipped() {
        let msg = compose(&report(vec![
            japan(vec![line("Nikkei 225", dec!(27500.00), dec!(28000.00))]),
            ReportSection {
                title: "FX".to_string(),
                emoji: "💱".to_string(),
                lines: vec![],
            },
        ]));

        assert!(msg.contains("-500.00 (-1.79%) ⚠️"));
        assert!(!msg.contains("**FX**"));
    }

    #[test]
    fn no_data_message_is_distinct() {
        let msg = compose(&report(vec![japan(vec![])]));

        assert!(msg.contains("No market data available"));
        assert!(msg.contains("Mon 19 Oct 2026"));
        assert!(!msg.contains(LINE_MARK));
        assert!(!msg.trim().is_empty());
    }

    #[test]
    fn commentary_is_appended() {
        let mut r = report(vec![japan(vec![line(
            "Nikkei 225",
            dec!(28500.00),
            dec!(28000.00),
        )])]);
        r.commentary = Some("  Exporters led the rally.\n".to_string());

        let msg = compose(&r);
        assert!(msg.contains("💡 **Today's takeaway**\n\nExporters led the rally.\n"));
    }

    #[test]
    fn data_lines_are_plain() {
        let r = report(vec![japan(vec![line(
            "Nikkei 225",
            dec!(28500.00),
            dec!(28000.00),
        )])]);

        assert_eq!(
            data_lines(&r),
            "- Nikkei 225: open 28,500.00, previous close 28,000.00 (+500.00, +1.79%)"
        );
    }
}
