use flow::inbox::tabs_for;
use flow::{EngineConfig, InboxSort, SurveyService, TransitionKind, TransitionRequest};
use log::info;
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;
use survey_domain::{DomainStubs, NewSurvey, Role};
use survey_export::{export_stats, stats_file_name, survey_csv, survey_file_name, survey_html, CsvOptions, ExportFormat,
                    Heading};
use survey_persistence::DieselSurveyRepository;
use survey_stats::{for_role, Grouping, SortKey, StatsFilter, StatsQuery};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

type Service = SurveyService<DieselSurveyRepository>;

/// Menú interactivo sobre la cadena de aprobación, usando el repositorio
/// SQLite de `survey-persistence` (`SURVEY_DB_URL` / `DATABASE_URL`).
///
/// Opciones soportadas:
/// 1) Ver registros
/// 2) Crear registro (o cargar los de ejemplo)
/// 3) Aplicar una acción (enviar / devolver / remitir)
/// 4) Ver la bandeja de un rol
/// 5) Estadística por rol
/// 6) Exportar estadística o formulario
/// 7) Salir
fn main() -> Result<(), Box<dyn Error>> {
    // RUST_LOG controla el nivel; los `log::` de los crates pasan por el puente.
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let repo = Arc::new(survey_persistence::new_from_env()?);
    let service = SurveyService::new(repo.clone(), EngineConfig::default()).with_drafts(repo);

    loop {
        println!("\n== Survey CLI menu ==");
        println!("1) Ver registros");
        println!("2) Crear registro");
        println!("3) Aplicar acción sobre un registro");
        println!("4) Ver bandeja de un rol");
        println!("5) Estadística por rol");
        println!("6) Exportar");
        println!("7) Salir");
        let choice = prompt("Elige una opción: ")?;
        let outcome = match choice.trim() {
            "1" => list_records(&service),
            "2" => create_record(&service),
            "3" => apply_action(&service),
            "4" => show_inbox(&service),
            "5" => show_stats(&service),
            "6" => export(&service),
            "7" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
                Ok(())
            }
        };
        if let Err(e) = outcome {
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}

fn list_records(service: &Service) -> Result<(), Box<dyn Error>> {
    let records = service.records()?;
    if records.is_empty() {
        println!("(sin registros)");
        return Ok(());
    }
    println!("\nID                                   | ESTADO               | V | EMPLEADO / CICLO");
    println!("------------------------------------------------------------------------------------");
    for r in records {
        println!("{} | {:<20} | {} | {} / {}",
                 r.id(),
                 r.status().as_str(),
                 r.version(),
                 r.employee_name(),
                 r.cycle());
    }
    Ok(())
}

fn create_record(service: &Service) -> Result<(), Box<dyn Error>> {
    let sample = prompt("¿Cargar registros de ejemplo? (s/N): ")?;
    if sample.trim().eq_ignore_ascii_case("s") {
        let n = service.import(DomainStubs::sample_records())?;
        println!("{} registros creados", n);
        return Ok(());
    }
    let name = prompt("Nombre del empleado: ")?;
    let department = prompt("Departamento: ")?;
    let branch = prompt("Sucursal: ")?;
    let cycle = prompt("Ciclo (AAAA-MM): ")?;
    let owner = name.trim().to_string();
    let payload = DomainStubs::sample_payload(name.trim(), department.trim(), cycle.trim());
    let new = NewSurvey::new(name.trim(), department.trim(), branch.trim(), cycle.trim()).with_survey(payload);
    let rec = service.submit(&owner, new)?;
    println!("Registro creado: {} ({})", rec.id(), rec.status());
    Ok(())
}

fn apply_action(service: &Service) -> Result<(), Box<dyn Error>> {
    let id: Uuid = prompt("ID del registro: ")?.trim().parse()?;
    let role: Role = prompt("Rol (secretary, manager, branch_manager, unit, employee): ")?.parse()?;
    let actions = service.engine().available_actions(&id, role)?;
    if actions.is_empty() {
        println!("El rol {} no tiene acciones sobre este registro", role);
        return Ok(());
    }
    let names: Vec<String> = actions.iter().map(TransitionKind::to_string).collect();
    let kind: TransitionKind = prompt(&format!("Acción ({}): ", names.join(", ")))?.parse()?;
    let note = prompt("Nota (vacío para ninguna): ")?;
    let mut request = TransitionRequest::new(role, kind);
    if !note.trim().is_empty() {
        request = request.with_note(note.trim());
    }
    let rec = service.act(&id, request)?;
    let msg = rec.last_action().map(|a| a.note.clone()).unwrap_or_default();
    println!("Nuevo estado: {} (versión {}) {}", rec.status(), rec.version(), msg);
    Ok(())
}

fn show_inbox(service: &Service) -> Result<(), Box<dyn Error>> {
    let role: Role = prompt("Rol: ")?.parse()?;
    let tabs = tabs_for(role);
    let counts = service.inbox_counts(role)?;
    for (i, tab) in tabs.iter().enumerate() {
        println!("{}) {} [{}]", i + 1, tab, counts.get(tab).copied().unwrap_or(0));
    }
    let idx: usize = prompt("Pestaña: ")?.trim().parse()?;
    let Some(tab) = idx.checked_sub(1).and_then(|i| tabs.get(i)) else {
        println!("Pestaña inválida: {}", idx);
        return Ok(());
    };
    let query = prompt("Buscar (vacío para todo): ")?;
    let sort_in = prompt("Orden (recent, employee, cycle): ")?;
    let sort = if sort_in.trim().is_empty() { InboxSort::default() } else { sort_in.parse::<InboxSort>()? };
    for r in service.inbox(role, *tab, &query, sort)? {
        println!("{} | {} | {} | {}", r.id(), r.employee_name(), r.cycle(), r.status());
    }
    Ok(())
}

fn read_query() -> Result<(Role, StatsQuery), Box<dyn Error>> {
    let role: Role = prompt("Rol: ")?.parse()?;
    let branch = prompt("Sucursal (vacío para todas): ")?;
    let cycle = prompt("Ciclo (vacío para todos): ")?;
    let grouping = match prompt("Agrupar por (employee/department): ")?.trim() {
        "department" | "d" => Grouping::Department,
        _ => Grouping::Employee,
    };
    let mut query = StatsQuery::new(StatsFilter::new().branch(branch.trim()).cycle(cycle.trim())).grouped_by(grouping);
    let sort = prompt("Orden (name, total, done, remain; vacío sin orden): ")?;
    if !sort.trim().is_empty() {
        query = query.sorted_by(sort.parse::<SortKey>()?);
    }
    Ok((role, query))
}

fn show_stats(service: &Service) -> Result<(), Box<dyn Error>> {
    let (role, query) = read_query()?;
    let report = for_role(&service.records()?, role, &query);
    if report.is_empty() {
        println!("(sin datos)");
        return Ok(());
    }
    println!("\nNOMBRE                         | PREV | MES | TOTAL | HECHO | RESTA");
    for row in &report.rows {
        let t = &row.tally;
        println!("{:<30} | {:>4} | {:>3} | {:>5} | {:>5} | {:>5}",
                 row.name, t.prev, t.monthly, t.total, t.done, t.remain);
    }
    if let Some(t) = &report.totals {
        println!("Total: {} / hecho {} / resta {} ({}%)", t.total, t.done, t.remain, report.percent_done());
    }
    Ok(())
}

fn export(service: &Service) -> Result<(), Box<dyn Error>> {
    let format: ExportFormat = prompt("Formato (csv, print-html): ")?.parse()?;
    let what = prompt("¿Estadística (s) o formulario de un registro (f)?: ")?;
    let (file_name, body) = if what.trim().eq_ignore_ascii_case("f") {
        let id: Uuid = prompt("ID del registro: ")?.trim().parse()?;
        let rec = service.engine().get(&id)?;
        let body = match format {
            ExportFormat::Csv => survey_csv(&rec),
            ExportFormat::PrintHtml => survey_html(&rec),
        };
        (survey_file_name(&id.to_string(), format), body)
    } else {
        let (role, query) = read_query()?;
        let report = for_role(&service.records()?, role, &query);
        let scope = if query.filter.branch.is_empty() { role.as_str().to_string() } else { query.filter.branch.clone() };
        let cycle = query.filter.cycle.clone();
        let heading = Heading::for_cycle(&format!("الاحصائية التجميعية الشهرية - {}", scope), &cycle);
        let body = export_stats(&report, format, &heading, CsvOptions { stage_notes: true })?;
        (stats_file_name(&scope, &cycle, format), body)
    };
    std::fs::write(&file_name, body)?;
    info!("wrote {}", file_name);
    println!("Archivo escrito: {}", file_name);
    Ok(())
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
