// Documento HTML imprimible (RTL) de la estadística.
use crate::csv::{headers, single_line, CsvOptions};
use crate::errors::{ExportError, Result};
use std::fmt::Write as _;
use survey_stats::StatsReport;

pub(crate) const STYLE: &str = "*{box-sizing:border-box} body{font-family:\"Cairo\",\"Amiri\",Tahoma,Arial,sans-serif;margin:0;padding:24px;color:#1f2937;background:#fff}\n\
.header{text-align:center;margin-bottom:12px}\n\
.h1{font-weight:700;font-size:22px;margin:4px 0 0 0}\n\
.sub{font-size:13px;color:#374151;margin-top:2px}\n\
.title{margin-top:10px;font-size:16px;font-weight:700;color:#111827}\n\
.meta{margin-top:4px;font-size:13px;color:#374151}\n\
table{width:100%;border-collapse:collapse;margin-top:14px}\n\
thead th{background:#f3f4f6;font-weight:700;font-size:13px;border:1px solid #e5e7eb;padding:8px 6px;text-align:right}\n\
tbody td{border:1px solid #e5e7eb;padding:8px 6px;font-size:13px;vertical-align:top}\n\
tbody td.col-idx{background:#fafafa;font-weight:700;text-align:center;width:54px}\n\
tfoot td{border:1px solid #e5e7eb;padding:8px 6px;font-weight:700;background:#fffbea}\n\
@media print{body{padding:12mm}}";

pub(crate) const AUTHORITY: &str = "هيئة الرقابة الإدارية";
pub(crate) const OFFICE: &str = "مكتب التفتيش وتقييم الأداء";

/// Escapa `&`, `<` y `>`.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Títulos del documento.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub title: String,
    /// Línea secundaria, p.ej. `عن شهر: 2025-08`.
    pub meta: String,
}

impl Default for Heading {
    fn default() -> Self {
        Self { title: "الاحصائية التجميعية الشهرية".into(), meta: String::new() }
    }
}

impl Heading {
    pub fn for_cycle(title: &str, cycle: &str) -> Self {
        Self { title: title.to_string(), meta: format!("عن شهر: {}", cycle) }
    }
}

pub(crate) fn document(title: &str, body: &str) -> String {
    format!("<!doctype html><html lang=\"ar\" dir=\"rtl\"><head>\n<meta charset=\"utf-8\"/>\n<title>{}</title>\n<style>\n{}\n</style>\n</head><body>\n{}</body></html>\n",
            escape(title),
            STYLE,
            body)
}

pub fn stats_html(report: &StatsReport, heading: &Heading, opts: CsvOptions) -> Result<String> {
    let totals = match report.totals {
        Some(t) if !report.rows.is_empty() => t,
        _ => return Err(ExportError::Empty),
    };
    let mut body = String::new();
    let _ = write!(body,
                   "<div class=\"header\">\n  <div class=\"h1\">{}</div>\n  <div class=\"sub\">{}</div>\n  <div class=\"title\">{}</div>\n",
                   AUTHORITY,
                   OFFICE,
                   escape(&heading.title));
    if !heading.meta.is_empty() {
        let _ = writeln!(body, "  <div class=\"meta\">{}</div>", escape(&heading.meta));
    }
    body.push_str("</div>\n<table>\n<thead><tr>");
    for h in headers(report.grouping, opts) {
        let _ = write!(body, "<th>{}</th>", h);
    }
    body.push_str("</tr></thead>\n<tbody>\n");
    for (i, r) in report.rows.iter().enumerate() {
        let t = &r.tally;
        let _ = write!(body,
                       "<tr><td class=\"col-idx\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
                       i + 1,
                       escape(&r.name),
                       t.prev,
                       t.monthly,
                       t.total,
                       t.done,
                       t.remain,
                       escape(&single_line(&r.note)));
        if opts.stage_notes {
            let _ = write!(body,
                           "<td>{}</td><td>{}</td>",
                           escape(&single_line(&r.manager_note)),
                           escape(&single_line(&r.branch_manager_note)));
        }
        body.push_str("</tr>\n");
    }
    let trailing = if opts.stage_notes { 3 } else { 1 };
    let _ = write!(body,
                   "</tbody>\n<tfoot><tr><td colspan=\"2\" style=\"text-align:right;\">الإجمالي</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>{}</tr></tfoot>\n</table>\n",
                   totals.prev,
                   totals.monthly,
                   totals.total,
                   totals.done,
                   totals.remain,
                   "<td></td>".repeat(trailing));
    Ok(document(&heading.title, &body))
}
