// CSV de la estadística: cabecera + filas numeradas desde 1.
use crate::errors::{ExportError, Result};
use survey_stats::{Grouping, StatsReport, StatsRow};

/// Opciones del CSV de estadística.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvOptions {
    /// Añade las columnas de nota del director y del director de sucursal.
    pub stage_notes: bool,
}

pub(crate) fn single_line(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Entrecomilla el campo si contiene comas o comillas.
pub(crate) fn field(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub(crate) fn headers(grouping: Grouping, opts: CsvOptions) -> Vec<&'static str> {
    let name = match grouping {
        Grouping::Employee => "الاسم",
        Grouping::Department => "الإدارة",
    };
    let mut h = vec!["الرقم", name, "الموضوعات المرحلة", "الوارد الشهري", "المجموع", "المنجز", "المتبقي", "ملاحظات"];
    if opts.stage_notes {
        h.push("ملاحظة مدير الإدارة");
        h.push("ملاحظة مدير الفرع");
    }
    h
}

fn line(index: usize, row: &StatsRow, opts: CsvOptions) -> String {
    let t = &row.tally;
    let mut cells = vec![index.to_string(),
                         field(&single_line(&row.name)),
                         t.prev.to_string(),
                         t.monthly.to_string(),
                         t.total.to_string(),
                         t.done.to_string(),
                         t.remain.to_string(),
                         field(&single_line(&row.note))];
    if opts.stage_notes {
        cells.push(field(&single_line(&row.manager_note)));
        cells.push(field(&single_line(&row.branch_manager_note)));
    }
    cells.join(",")
}

pub fn stats_csv(report: &StatsReport, opts: CsvOptions) -> Result<String> {
    if report.rows.is_empty() {
        return Err(ExportError::Empty);
    }
    let mut lines = vec![headers(report.grouping, opts).join(",")];
    lines.extend(report.rows.iter().enumerate().map(|(i, r)| line(i + 1, r, opts)));
    Ok(lines.join("\n"))
}
