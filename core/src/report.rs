//! Aggregate counts for the reports screen.

use crate::client::PetClient;
use crate::http::Reply;
use crate::source::{FetchOutcome, RecordSource, Ticket};
use crate::types::{PetRecord, PetType};

/// Categories charted on the reports screen, matched exactly.
pub const REPORT_TYPES: [PetType; 3] = [PetType::Dog, PetType::Cat, PetType::Bird];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeRange {
    UpToTwo,
    ThreeToFive,
    SixToTen,
    ElevenPlus,
}

impl AgeRange {
    pub const ALL: [AgeRange; 4] = [
        AgeRange::UpToTwo,
        AgeRange::ThreeToFive,
        AgeRange::SixToTen,
        AgeRange::ElevenPlus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeRange::UpToTwo => "0-2",
            AgeRange::ThreeToFive => "3-5",
            AgeRange::SixToTen => "6-10",
            AgeRange::ElevenPlus => "11+",
        }
    }

    pub fn of(age: i32) -> Self {
        match age {
            i32::MIN..=2 => AgeRange::UpToTwo,
            3..=5 => AgeRange::ThreeToFive,
            6..=10 => AgeRange::SixToTen,
            _ => AgeRange::ElevenPlus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub pet_type: PetType,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeCount {
    pub range: AgeRange,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub total: usize,
    pub by_type: Vec<TypeCount>,
    pub by_age: Vec<AgeCount>,
}

impl Report {
    pub fn aggregate(records: &[PetRecord]) -> Self {
        let by_type = REPORT_TYPES
            .into_iter()
            .map(|pet_type| TypeCount {
                pet_type,
                count: records
                    .iter()
                    .filter(|pet| pet.pet_type == pet_type.label())
                    .count(),
            })
            .collect();
        let by_age = AgeRange::ALL
            .into_iter()
            .map(|range| AgeCount {
                range,
                count: records.iter().filter(|pet| AgeRange::of(pet.age) == range).count(),
            })
            .collect();
        Self {
            total: records.len(),
            by_type,
            by_age,
        }
    }
}

/// The reports screen: its own fetch, its own source set.
#[derive(Debug, Clone)]
pub struct ReportView {
    source: RecordSource,
    report: Report,
}

impl ReportView {
    pub fn new(client: PetClient) -> Self {
        Self {
            source: RecordSource::new(client),
            report: Report::aggregate(&[]),
        }
    }

    pub fn activate(&mut self) -> Ticket {
        self.source.begin_fetch()
    }

    pub fn on_fetched(&mut self, ticket: &Ticket, reply: Reply) -> FetchOutcome {
        let outcome = self.source.finish_fetch(ticket, reply);
        if outcome == FetchOutcome::Applied {
            self.report = Report::aggregate(self.source.records());
        }
        outcome
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn is_loading(&self) -> bool {
        self.source.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.source.error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;

    fn pets(json: &str) -> Vec<PetRecord> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn age_ranges_are_inclusive_on_lower_bound() {
        let cases = [
            (0, "0-2"),
            (2, "0-2"),
            (3, "3-5"),
            (5, "3-5"),
            (6, "6-10"),
            (10, "6-10"),
            (11, "11+"),
            (50, "11+"),
        ];
        for (age, label) in cases {
            assert_eq!(AgeRange::of(age).label(), label, "age {age}");
        }
    }

    #[test]
    fn type_buckets_match_exactly() {
        let records = pets(
            r#"[{"id":1,"type":"Dog","age":1},{"id":2,"type":"dog","age":4},
                {"id":3,"type":"Cat","age":7},{"id":4,"type":"Fish","age":12}]"#,
        );
        let report = Report::aggregate(&records);
        assert_eq!(report.total, 4);
        let counts: Vec<_> = report.by_type.iter().map(|t| (t.pet_type.label(), t.count)).collect();
        assert_eq!(counts, [("Dog", 1), ("Cat", 1), ("Bird", 0)]);
        let ages: Vec<_> = report.by_age.iter().map(|a| a.count).collect();
        assert_eq!(ages, [1, 1, 1, 1]);
    }

    #[test]
    fn view_recomputes_on_fetch() {
        let mut view = ReportView::new(PetClient::new("http://localhost:8080"));
        assert_eq!(view.report().total, 0);

        let ticket = view.activate();
        assert!(view.is_loading());
        let body = r#"[{"id":1,"name":"A","type":"Bird","age":3},{"id":2,"name":"B","type":"Bird","age":4}]"#;
        assert_eq!(
            view.on_fetched(&ticket, Ok(HttpResponse::new(200, body))),
            FetchOutcome::Applied
        );
        assert_eq!(view.report().by_type[2].count, 2);
        assert_eq!(view.report().by_age[1].count, 2);
    }
}
