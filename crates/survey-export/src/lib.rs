//! Proyecciones de exportación. Ninguna función de este crate modifica los
//! registros: todas reciben datos ya agregados y devuelven texto.
pub mod csv;
pub mod errors;
pub mod format;
pub mod html;
pub mod survey_doc;

pub use csv::{stats_csv, CsvOptions};
pub use errors::{ExportError, Result};
pub use format::ExportFormat;
pub use html::{escape, stats_html, Heading};
pub use survey_doc::{survey_csv, survey_html};

use log::info;
use survey_stats::StatsReport;

const MAX_FILE_NAME: usize = 120;

/// Exporta la estadística en el formato pedido.
pub fn export_stats(report: &StatsReport, format: ExportFormat, heading: &Heading, opts: CsvOptions) -> Result<String> {
    let out = match format {
        ExportFormat::Csv => stats_csv(report, opts)?,
        ExportFormat::PrintHtml => stats_html(report, heading, opts)?,
    };
    info!("exported {} stats rows as {}", report.rows.len(), format);
    Ok(out)
}

/// Sustituye `\ / : * ? " < > |` y los espacios por `-` y corta a 120
/// caracteres.
pub fn sanitize_file_name(name: &str) -> String {
    #[derive(PartialEq)]
    enum Run {
        None,
        Reserved,
        Space,
    }
    let mut out = String::with_capacity(name.len());
    let mut run = Run::None;
    for c in name.chars() {
        // cada racha de reservados o de espacios produce un solo guion
        let class = if matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
            Run::Reserved
        } else if c.is_whitespace() {
            Run::Space
        } else {
            Run::None
        };
        if class == Run::None {
            out.push(c);
        } else if class != run {
            out.push('-');
        }
        run = class;
    }
    out.chars().take(MAX_FILE_NAME).collect()
}

/// Nombre de archivo de la estadística de un departamento y ciclo.
pub fn stats_file_name(scope: &str, cycle: &str, format: ExportFormat) -> String {
    format!("{}.{}", sanitize_file_name(&format!("الاحصائية-التجميعية-{}-{}", scope, cycle)), format.extension())
}

/// Nombre de archivo del formulario completo de un registro.
pub fn survey_file_name(id: &str, format: ExportFormat) -> String {
    let id = if id.trim().is_empty() { "بدون-كود" } else { id };
    format!("{}.{}", sanitize_file_name(&format!("استبيان-{}", id)), format.extension())
}
