pub mod day;
pub mod flat;
pub mod index;
pub mod ingest;
pub mod matrix;
pub mod merge;
pub mod row;
pub mod store;
pub mod teacher;

pub use day::{find_day_within, normalize_day, Day, ResolvedDay};
pub use flat::FlatTableExtractor;
pub use index::{ScheduleSnapshot, ScheduleStats};
pub use ingest::{Extractor, IngestError, ScheduleIngestor};
pub use matrix::MatrixExtractor;
pub use merge::{merge_lessons, MergedLessonEntry};
pub use row::NormalizedRow;
pub use store::{LoadOutcome, LoadedSchedule, ScheduleStore};
pub use teacher::normalize_teacher_name;
