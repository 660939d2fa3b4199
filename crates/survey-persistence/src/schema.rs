// Esquema Diesel (SQLite). El registro completo se guarda como JSON en
// `record`; las demás columnas son copias para filtrar y ordenar.
use diesel::allow_tables_to_appear_in_same_query;
diesel::table! {
    surveys (id) {
        id -> Text,
        employee_name -> Text,
        department -> Text,
        branch -> Text,
        cycle -> Text,
        status -> Text,
        submitted_at_ts -> BigInt,
        version -> BigInt,
        record -> Text,
    }
}
diesel::table! {
    survey_drafts (owner) {
        owner -> Text,
        payload -> Text,
        updated_at_ts -> BigInt,
    }
}
allow_tables_to_appear_in_same_query!(surveys, survey_drafts);
