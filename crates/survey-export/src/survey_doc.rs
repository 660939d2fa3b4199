//! Exportación del formulario completo de un registro. Si el registro no trae
//! formulario se usa el sintetizado por `SurveyRecord::full_survey`.
use crate::csv::field;
use crate::html::{document, escape, AUTHORITY, OFFICE};
use std::fmt::Write as _;
use survey_domain::{SurveyPayload, SurveyRecord};

const BOM: char = '\u{FEFF}';
const NO_DATA: &str = "لا توجد بيانات";

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "—"
    } else {
        s
    }
}

/// CSV de una línea (con BOM) con la identidad y los contadores de comisiones.
pub fn survey_csv(record: &SurveyRecord) -> String {
    let s = record.full_survey();
    let c = s.committee_counters();
    let headers = ["الاسم", "الفرع", "الشهر", "الوظيفة", "الإدارة", "المؤهل", "التخصص", "المرحّل", "الوارد الشهري", "المجموع",
                   "المنجز", "المتبقي"];
    let values = [s.full_name.clone(),
                  s.branch.clone(),
                  s.cycle.clone(),
                  s.role.clone(),
                  s.department.clone(),
                  s.degree.clone(),
                  s.major.clone(),
                  c.prev.to_string(),
                  c.monthly.to_string(),
                  c.total().to_string(),
                  c.done.to_string(),
                  c.remain().to_string()];
    let line: Vec<String> = values.iter().map(|v| field(v)).collect();
    format!("{}{}\n{}", BOM, headers.join(","), line.join(","))
}

fn table(body: &mut String, headers: &[&str], rows: Vec<Vec<String>>) {
    body.push_str("<table>\n<thead><tr>");
    for h in headers {
        let _ = write!(body, "<th>{}</th>", h);
    }
    body.push_str("</tr></thead>\n<tbody>\n");
    if rows.is_empty() {
        let _ = writeln!(body, "<tr><td colspan=\"{}\" style=\"text-align:center;color:#777\">{}</td></tr>", headers.len(), NO_DATA);
    }
    for row in rows {
        body.push_str("<tr>");
        for cell in row {
            let _ = write!(body, "<td>{}</td>", escape(or_dash(&cell)));
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</tbody>\n</table>\n");
}

fn section(body: &mut String, title: &str) {
    let _ = writeln!(body, "<div class=\"title\">{}</div>", title);
}

fn paragraph(body: &mut String, text: &str) {
    let _ = writeln!(body, "<p>{}</p>", escape(or_dash(text)));
}

fn render(s: &SurveyPayload) -> String {
    let mut body = String::new();
    let _ = writeln!(body,
                     "<div class=\"header\">\n  <div class=\"h1\">{}</div>\n  <div class=\"sub\">{}</div>\n  <div class=\"title\">الإحصائية الشهرية</div>\n  <div class=\"meta\">لأعمال ونشاط الأعضاء والموظفين الفنيين بفروع الهيئة</div>\n</div>",
                     AUTHORITY,
                     OFFICE);

    section(&mut body, "البيانات الأساسية");
    table(&mut body,
          &["الاسم", "الفرع", "الشهر/السنة", "الصفة", "الإدارة", "المؤهل", "التخصص"],
          vec![vec![s.full_name.clone(),
                    s.branch.clone(),
                    s.cycle.clone(),
                    s.role.clone(),
                    s.department.clone(),
                    s.degree.clone(),
                    s.major.clone()]]);

    let c = s.committee_counters();
    section(&mut body, "أولا : اللجان المعروضة");
    table(&mut body,
          &["المرحّل من الشهر السابق", "الوارد الشهري", "المجموع", "المنجز", "المتبقي"],
          vec![vec![c.prev.to_string(),
                    c.monthly.to_string(),
                    c.total().to_string(),
                    c.done.to_string(),
                    c.remain().to_string()]]);

    section(&mut body, "كشف اللجان خلال الشهر");
    table(&mut body,
          &["موضوع التكليف", "مدة التكليف", "تاريخ التكليف", "تاريخ الإنجاز", "ملاحظات"],
          s.tasks
           .iter()
           .map(|t| {
               vec![t.subject.clone(), t.duration_days.to_string(), t.assign_date.clone(), t.done_date.clone(), t.remark.clone()]
           })
           .collect());

    section(&mut body, "ثانيا : الموضوعات المعروضة");
    table(&mut body,
          &["رقم الموضوع", "ملخص الموضوع", "تاريخ التكليف", "تاريخ التصرف", "نوع التصرف"],
          s.topics
           .iter()
           .map(|t| vec![t.number.clone(), t.summary.clone(), t.assign_date.clone(), t.action_date.clone(), t.action_type.clone()])
           .collect());
    if !s.topics_notes.trim().is_empty() {
        paragraph(&mut body, &s.topics_notes);
    }

    section(&mut body, "ثالثا : الموضوعات المتبقية (غير المنجزة ) خلال الشهر");
    table(&mut body,
          &["رقم", "ملخص", "تاريخ التكليف", "نوع التصرف"],
          s.remaining_topics
           .iter()
           .map(|t| vec![t.number.clone(), t.summary.clone(), t.assign_date.clone(), t.action_type.clone()])
           .collect());

    if !s.notes.trim().is_empty() {
        section(&mut body, "ملاحظات");
        paragraph(&mut body, &s.notes);
    }
    if !s.reasons_justifications.trim().is_empty() || !s.challenges_difficulties.trim().is_empty() {
        section(&mut body, "أسباب ومبررات عدم إنجاز الموضوعات");
        paragraph(&mut body, &s.reasons_justifications);
        section(&mut body, "المشاكل والصعوبات");
        paragraph(&mut body, &s.challenges_difficulties);
    }
    body
}

/// Documento HTML imprimible del formulario completo.
pub fn survey_html(record: &SurveyRecord) -> String {
    let s = record.full_survey();
    let title = format!("استبيان {}", or_dash(&s.full_name));
    document(&title, &render(&s))
}
