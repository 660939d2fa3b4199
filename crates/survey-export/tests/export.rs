use survey_domain::{DomainStubs, NewSurvey, SurveyPayload, SurveyRecord, SurveyStatus, Topics};
use survey_export::{export_stats, sanitize_file_name, stats_csv, stats_file_name, stats_html, survey_csv, survey_file_name,
                    survey_html, CsvOptions, ExportError, ExportFormat, Heading};
use survey_stats::{aggregate, Grouping, StatsQuery, StatsReport};

fn report(grouping: Grouping) -> StatsReport {
  let st = SurveyStatus::SentToBranch;
  let p = |prev, monthly, done, notes: &str| SurveyPayload { topics_prev: Some(prev),
                                                             topics_monthly: Some(monthly),
                                                             topics_done: Some(done),
                                                             topics_notes: notes.to_string(),
                                                             ..SurveyPayload::default() };
  let recs = vec![SurveyRecord::new(NewSurvey::new("أحمد", "إدارة أ", "طرابلس", "2025-08").with_survey(p(5, 5, 6, "سطر أول\nسطر, ثان")))
                    .with_status(st)
                    .with_stage_notes("<مهم> & عاجل", ""),
                  SurveyRecord::new(NewSurvey::new("بشير", "إدارة أ", "طرابلس", "2025-08").with_survey(p(2, 3, 3, "")))
                    .with_status(st)];
  aggregate(&recs, &[st], &StatsQuery::default().grouped_by(grouping))
}

#[test]
fn stats_csv_layout() {
  let csv = stats_csv(&report(Grouping::Employee), CsvOptions::default()).expect("csv");
  let lines: Vec<&str> = csv.lines().collect();
  assert_eq!(lines.len(), 3);
  assert_eq!(lines[0], "الرقم,الاسم,الموضوعات المرحلة,الوارد الشهري,المجموع,المنجز,المتبقي,ملاحظات");
  assert_eq!(lines[1], "1,أحمد,5,5,10,6,4,\"سطر أول سطر, ثان\"");
  assert_eq!(lines[2], "2,بشير,2,3,5,3,2,");
}

#[test]
fn stats_csv_department_and_stage_notes() {
  let csv = stats_csv(&report(Grouping::Department), CsvOptions { stage_notes: true }).unwrap();
  let mut lines = csv.lines();
  let header = lines.next().unwrap();
  assert!(header.starts_with("الرقم,الإدارة,"));
  assert!(header.ends_with("ملاحظة مدير الإدارة,ملاحظة مدير الفرع"));
  assert!(lines.next().unwrap().starts_with("1,إدارة أ,7,8,15,9,6,"));
  assert!(lines.next().is_none());
}

#[test]
fn empty_result_is_an_error() {
  let empty = aggregate(&[], &[SurveyStatus::SentToBranch], &StatsQuery::default());
  assert!(matches!(stats_csv(&empty, CsvOptions::default()), Err(ExportError::Empty)));
  assert!(matches!(stats_html(&empty, &Heading::default(), CsvOptions::default()), Err(ExportError::Empty)));
}

#[test]
fn print_html_escapes_and_totals() {
  let heading = Heading::for_cycle("الاحصائية التجميعية الشهرية لإدارة <أ>", "2025-08");
  let html = export_stats(&report(Grouping::Employee), ExportFormat::PrintHtml, &heading, CsvOptions { stage_notes: true }).unwrap();
  assert!(html.starts_with("<!doctype html><html lang=\"ar\" dir=\"rtl\">"));
  assert!(html.contains("&lt;مهم&gt; &amp; عاجل"));
  assert!(!html.contains("<مهم>"));
  assert!(html.contains("لإدارة &lt;أ&gt;"));
  assert!(html.contains("عن شهر: 2025-08"));
  assert!(html.contains("الإجمالي</td><td>7</td><td>8</td><td>15</td><td>9</td><td>6</td>"));
}

#[test]
fn format_tokens() {
  assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
  assert_eq!("print-html".parse::<ExportFormat>().unwrap(), ExportFormat::PrintHtml);
  assert_eq!(ExportFormat::PrintHtml.to_string(), "print-html");
  assert!(matches!("pdf".parse::<ExportFormat>(), Err(ExportError::UnknownFormat(_))));
}

#[test]
fn full_survey_csv_has_bom_and_committee_counters() {
  let payload = DomainStubs::sample_payload("سالم", "إدارة الخدمات", "2025-08");
  let rec = SurveyRecord::new(NewSurvey::new("سالم", "إدارة الخدمات", "طرابلس", "2025-08").with_survey(payload));
  let csv = survey_csv(&rec);
  assert!(csv.starts_with('\u{FEFF}'));
  let lines: Vec<&str> = csv.trim_start_matches('\u{FEFF}').lines().collect();
  assert_eq!(lines[0], "الاسم,الفرع,الشهر,الوظيفة,الإدارة,المؤهل,التخصص,المرحّل,الوارد الشهري,المجموع,المنجز,المتبقي");
  assert_eq!(lines[1], "سالم,طرابلس,2025-08,موظف فني,إدارة الخدمات,بكالوريوس,محاسبة,2,3,5,4,1");
}

#[test]
fn full_survey_html_uses_fallback_payload() {
  let rec = SurveyRecord::new(NewSurvey::new("علي", "", "طرابلس", "2025-08")).with_topics(Topics::new(6, 4));
  let html = survey_html(&rec);
  assert!(html.contains("dir=\"rtl\""));
  assert!(html.contains("<td>علي</td>"));
  assert!(html.contains("نواقص بسيطة قيد الاستكمال."));
  assert!(html.contains("البيانات الأساسية"));
}

#[test]
fn file_names_are_sanitised() {
  assert_eq!(sanitize_file_name("a/b\\c:d"), "a-b-c-d");
  assert_eq!(sanitize_file_name("إدارة   الخدمات"), "إدارة-الخدمات");
  assert_eq!(sanitize_file_name("x: y"), "x--y");
  assert_eq!(sanitize_file_name(&"ن".repeat(300)).chars().count(), 120);
  assert_eq!(stats_file_name("إدارة الخدمات", "2025-08", ExportFormat::Csv), "الاحصائية-التجميعية-إدارة-الخدمات-2025-08.csv");
  let id = uuid::Uuid::new_v4().to_string();
  assert_eq!(survey_file_name(&id, ExportFormat::PrintHtml), format!("استبيان-{}.html", id));
  assert_eq!(survey_file_name("", ExportFormat::Csv), "استبيان-بدون-كود.csv");
}
