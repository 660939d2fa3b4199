use crate::{NewSurvey, SurveyPayload, SurveyRecord, SurveyStatus, TopicItem};

pub struct DomainStubs;

impl DomainStubs {
    /// Formulario de ejemplo: comisiones `prev=2, monthly=3, done=4`.
    pub fn sample_payload(full_name: &str, department: &str, cycle: &str) -> SurveyPayload {
        SurveyPayload { branch: "طرابلس".into(),
                        full_name: full_name.into(),
                        cycle: cycle.into(),
                        role: "موظف فني".into(),
                        department: department.into(),
                        degree: "بكالوريوس".into(),
                        major: "محاسبة".into(),
                        prev: 2,
                        monthly: 3,
                        done: 4,
                        notes: "لا توجد ملاحظات تذكر.".into(),
                        topics_notes: "ينبّه إلى تأخر ردّ جهة الإحالة.".into(),
                        topics: vec![TopicItem { number: "1/2025".into(),
                                                 summary: "مراجعة ملف".into(),
                                                 assign_date: format!("{}-03", cycle),
                                                 action_date: String::new(),
                                                 action_type: "متابعة".into() }],
                        ..SurveyPayload::default() }
    }

    /// Registros de ejemplo repartidos por la cadena, útiles para la CLI y
    /// para pruebas de estadística.
    pub fn sample_records() -> Vec<SurveyRecord> {
        let dep_a = "إدارة الرقابة على قطاعات الموارد الاقتصادية والطاقة";
        let dep_b = "إدارة الرقابة على قطاع الخدمات";
        let mk = |name: &str, dep: &str, status: SurveyStatus| {
            let payload = Self::sample_payload(name, dep, "2025-08");
            SurveyRecord::new(NewSurvey::new(name, dep, "طرابلس", "2025-08").with_survey(payload)).with_status(status)
        };
        vec![mk("أحمد علي", dep_a, SurveyStatus::AwaitingSecretary),
             mk("سالم محمد", dep_a, SurveyStatus::SentToManager),
             mk("خالد عمر", dep_b, SurveyStatus::SentToBranch).with_stage_notes("تدقيق أرقام الوارد الشهري.", ""),
             mk("فاطمة سالم", dep_b, SurveyStatus::SentToInspection).with_stage_notes("أرفقوا الردود الزمنية.",
                                                                                     "اعتمد وفق الملاحظة المثبتة.")]
    }
}
