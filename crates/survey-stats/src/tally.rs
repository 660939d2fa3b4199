use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use survey_domain::SurveyRecord;

/// Contadores de temas de una fila de estadística.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub prev: u64,
    pub monthly: u64,
    pub total: u64,
    pub done: u64,
    pub remain: u64,
}

impl Tally {
    /// `total = prev + monthly`, `remain = max(total - done, 0)`.
    pub fn new(prev: u64, monthly: u64, done: u64) -> Self {
        let total = prev + monthly;
        Self { prev, monthly, total, done, remain: total.saturating_sub(done) }
    }

    /// Contadores de un registro: los del formulario si trae cifras de temas,
    /// si no los `topics` del registro (todo como vigente del mes).
    pub fn from_record(record: &SurveyRecord) -> Self {
        match record.survey().and_then(|s| s.topic_counters()) {
            Some(c) => Self::new(c.prev.into(), c.monthly.into(), c.done.into()),
            None => {
                let t = record.topics();
                Self { prev: 0,
                       monthly: t.total().into(),
                       total: t.total().into(),
                       done: t.done().into(),
                       remain: t.remain().into() }
            }
        }
    }

    pub fn percent_done(&self) -> u64 {
        percent_done(self.done, self.total)
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.prev += rhs.prev;
        self.monthly += rhs.monthly;
        self.total += rhs.total;
        self.done += rhs.done;
        self.remain += rhs.remain;
    }
}

/// `round(done * 100 / total)` con redondeo a la mitad hacia arriba; `0` si
/// `total == 0`. Es la única fórmula de porcentaje del workspace.
pub fn percent_done(done: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (done * 200 + total) / (total * 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent_done(9, 15), 60);
        assert_eq!(percent_done(1, 8), 13); // 12.5
        assert_eq!(percent_done(1, 3), 33);
        assert_eq!(percent_done(2, 3), 67);
        assert_eq!(percent_done(5, 0), 0);
    }

    #[test]
    fn remain_never_negative() {
        let t = Tally::new(1, 1, 5);
        assert_eq!(t.total, 2);
        assert_eq!(t.remain, 0);
    }
}
