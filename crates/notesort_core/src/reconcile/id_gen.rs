//! Node id generation for newly inserted file-link nodes.
//!
//! Kept behind a trait so reconciliation stays deterministic under test.

use crate::model::record::FileRecord;
use chrono::{Local, NaiveDateTime};
use uuid::Uuid;

/// `YYYYMMDDTHHmmss`, second precision, lexically ordered by time.
pub const TIMESTAMP_ID_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Source of ids for nodes the reconciler creates.
pub trait NodeIdGenerator {
    fn next_id(&mut self, record: &FileRecord) -> String;
}

/// Produces `<name>-<YYYYMMDDTHHmmss>` ids from local wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct TimestampIdGenerator {
    fixed: Option<NaiveDateTime>,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator pinned to one instant.
    pub fn at(instant: NaiveDateTime) -> Self {
        Self {
            fixed: Some(instant),
        }
    }
}

impl NodeIdGenerator for TimestampIdGenerator {
    fn next_id(&mut self, record: &FileRecord) -> String {
        let instant = self.fixed.unwrap_or_else(|| Local::now().naive_local());
        format!("{}-{}", record.name(), instant.format(TIMESTAMP_ID_FORMAT))
    }
}

/// Produces random v4 UUID ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl NodeIdGenerator for UuidIdGenerator {
    fn next_id(&mut self, _record: &FileRecord) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F> NodeIdGenerator for F
where
    F: FnMut(&FileRecord) -> String,
{
    fn next_id(&mut self, record: &FileRecord) -> String {
        self(record)
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeIdGenerator, TimestampIdGenerator, UuidIdGenerator};
    use crate::model::record::FileRecord;
    use chrono::NaiveDate;

    #[test]
    fn timestamp_ids_embed_name_and_second_precision_time() {
        let instant = NaiveDate::from_ymd_opt(2026, 3, 4)
            .and_then(|date| date.and_hms_opt(5, 6, 7))
            .expect("valid instant");
        let mut ids = TimestampIdGenerator::at(instant);
        let id = ids.next_id(&FileRecord::new("inbox/Idea.md"));
        assert_eq!(id, "Idea.md-20260304T050607");
    }

    #[test]
    fn uuid_ids_are_unique() {
        let record = FileRecord::new("a.md");
        let mut ids = UuidIdGenerator;
        assert_ne!(ids.next_id(&record), ids.next_id(&record));
    }

    #[test]
    fn closures_act_as_generators() {
        let mut counter = 0;
        let mut ids = |record: &FileRecord| {
            counter += 1;
            format!("{}#{counter}", record.name())
        };
        assert_eq!(ids.next_id(&FileRecord::new("x/a.md")), "a.md#1");
        assert_eq!(ids.next_id(&FileRecord::new("b.md")), "b.md#2");
    }
}
