//! HTML report rendering.
//!
//! Produces a single self-contained document. Every interpolated value goes
//! through [`escape_html`].

use crate::engine::{BusinessContext, Consultation, EpicLetter, RoadmapPhase, RoadmapTask};
use std::fmt::Write;

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:960px;margin:2rem auto;color:#222}\
h1{margin-bottom:.2rem}.meta{color:#666}\
.bar{background:#eee;border-radius:4px;height:14px;width:100%}\
.fill{background:#2f6fde;border-radius:4px;height:14px}\
table{border-collapse:collapse;width:100%;margin-bottom:1.5rem}\
td,th{border:1px solid #ddd;padding:.4rem;text-align:left;vertical-align:top}\
.priority-high{color:#b00020}.priority-medium{color:#a06000}.priority-low{color:#555}";

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render `consultation` for the business in `ctx` as an HTML document.
pub fn render_html(ctx: &BusinessContext, consultation: &Consultation) -> String {
    let mut html = String::with_capacity(16 * 1024);
    // writing into a String cannot fail
    let _ = write_document(&mut html, ctx, consultation);
    html
}

fn write_document(
    out: &mut String,
    ctx: &BusinessContext,
    c: &Consultation,
) -> std::fmt::Result {
    let company = escape_html(&c.company_name);
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\"><head><meta charset=\"utf-8\">")?;
    writeln!(out, "<title>EPIC Consultation: {}</title>", company)?;
    writeln!(out, "<style>{}</style></head><body>", STYLE)?;
    writeln!(out, "<h1>EPIC Consultation: {}</h1>", company)?;
    writeln!(
        out,
        "<p class=\"meta\">{} &middot; {} &middot; capacity {}</p>",
        escape_html(&c.industry),
        escape_html(&c.business_stage),
        c.capacity_tier.as_str()
    )?;
    if !ctx.challenge_text.is_empty() {
        writeln!(
            out,
            "<p><strong>Challenge:</strong> {}</p>",
            escape_html(&ctx.challenge_text)
        )?;
    }

    writeln!(out, "<h2>EPIC scores</h2><table>")?;
    for letter in EpicLetter::ALL {
        let value = c.epic_scores.get(letter);
        writeln!(
            out,
            "<tr><th>{} &middot; {}</th><td>{}</td><td style=\"width:60%\"><div class=\"bar\"><div class=\"fill\" style=\"width:{}%\"></div></div></td></tr>",
            letter,
            escape_html(letter.label()),
            value,
            value.clamp(0, 100)
        )?;
    }
    writeln!(out, "</table>")?;

    writeln!(out, "<h2>Focus</h2>")?;
    writeln!(
        out,
        "<p>Primary: <strong>{} ({})</strong>. Secondary: {} ({}).</p>",
        c.primary_focus,
        escape_html(c.primary_focus.label()),
        c.secondary_focus,
        escape_html(c.secondary_focus.label())
    )?;

    writeln!(out, "<h2>Recommendations</h2><ol>")?;
    for rec in &c.recommendations {
        let priority = match rec.priority {
            crate::engine::Priority::High => "high",
            crate::engine::Priority::Medium => "medium",
            crate::engine::Priority::Low => "low",
        };
        writeln!(
            out,
            "<li><span class=\"priority-{p}\">[{p}]</span> <strong>{}</strong> {}</li>",
            rec.epic_component,
            escape_html(&rec.text),
            p = priority
        )?;
    }
    writeln!(out, "</ol>")?;

    writeln!(out, "<h2>Roadmap</h2>")?;
    for phase in RoadmapPhase::ALL {
        write_phase(out, phase.title(), c.roadmap.phase(phase))?;
    }

    if !ctx.digital_presence.is_empty() {
        writeln!(out, "<h2>Digital presence</h2><ul>")?;
        for url in &ctx.digital_presence {
            writeln!(out, "<li>{}</li>", escape_html(url))?;
        }
        writeln!(out, "</ul>")?;
    }

    writeln!(out, "</body></html>")
}

fn write_phase(out: &mut String, title: &str, tasks: &[RoadmapTask]) -> std::fmt::Result {
    writeln!(out, "<h3>{}</h3>", escape_html(title))?;
    writeln!(
        out,
        "<table><tr><th>Task</th><th>Owner</th><th>Deadline</th><th>Success metric</th><th>EPIC</th></tr>"
    )?;
    for t in tasks {
        writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&t.task),
            escape_html(&t.owner_role),
            escape_html(&t.deadline_label),
            escape_html(&t.success_metric),
            t.epic_component
        )?;
    }
    writeln!(out, "</table>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{self, RawBusinessContext};

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Tom & Jerry's\"</b>"),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_report_escapes_user_input() {
        let ctx = engine::normalize(&RawBusinessContext {
            company_name: Some("<script>alert(1)</script>".into()),
            challenge_text: Some("growth & <b>leads</b>".into()),
            digital_presence: Some(vec!["https://example.com/?a=1&b=2".into()]),
            ..Default::default()
        });
        let html = render_html(&ctx, &engine::consult(&ctx));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("growth &amp; &lt;b&gt;leads&lt;/b&gt;"));
        assert!(html.contains("https://example.com/?a=1&amp;b=2"));
    }

    #[test]
    fn test_report_has_every_section() {
        let ctx = engine::normalize(&RawBusinessContext::default());
        let html = render_html(&ctx, &engine::consult(&ctx));
        assert!(html.starts_with("<!DOCTYPE html>"));
        for section in ["EPIC scores", "Focus", "Recommendations", "Roadmap"] {
            assert!(html.contains(section), "missing {}", section);
        }
        for phase in RoadmapPhase::ALL {
            assert!(html.contains(phase.title()));
        }
        assert!(!html.contains("Digital presence"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
