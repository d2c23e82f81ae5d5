//! Keyed request cache.
//!
//! Every read goes through [`use_query`] under a [`QueryKey`]. Responses are
//! kept per key together with the generation they were fetched at. A
//! successful write records a [`Mutation`]; each key the mutation touches
//! moves to a new generation, its stored response stops being served and the
//! views reading that key refetch. Nothing is updated optimistically and
//! nothing is retried.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use chrono::NaiveDate;
use dioxus::prelude::*;
use shared_types::AppError;

/// Identity of one cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Courses,
    Course(i64),
    Lessons(i64),
    CourseStudents(i64),
    CourseAssignments(i64),
    MyAssignments,
    Submissions(i64),
    CourseAttendance { course_id: i64, date: NaiveDate },
    AttendanceStats { course_id: Option<i64>, student_id: Option<i64> },
    Memorization { student_id: Option<i64> },
    MemorizationStats { student_id: Option<i64> },
    Events,
    Users { role: Option<String> },
    LinkedStudents(i64),
    StudentProgress(i64),
}

/// A write that succeeded. Decides which keys are now stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mutation {
    CreateUser,
    CreateCourse,
    CreateLesson { course_id: i64 },
    Enroll { course_id: i64 },
    CreateAssignment { course_id: i64 },
    SubmitAssignment { assignment_id: i64 },
    RecordAttendance { course_id: i64 },
    RecordMemorization,
    CreateEvent,
    LinkStudent { parent_id: i64 },
}

impl Mutation {
    pub fn invalidates(&self, key: &QueryKey) -> bool {
        use QueryKey as K;
        match self {
            Mutation::CreateUser => matches!(key, K::Users { .. }),
            Mutation::CreateCourse => matches!(key, K::Courses),
            Mutation::CreateLesson { course_id } => key == &K::Lessons(*course_id),
            Mutation::Enroll { course_id } => matches!(
                key,
                K::Courses | K::MyAssignments | K::StudentProgress(_)
            ) || key == &K::CourseStudents(*course_id),
            Mutation::CreateAssignment { course_id } => {
                matches!(key, K::MyAssignments | K::StudentProgress(_))
                    || key == &K::CourseAssignments(*course_id)
            }
            Mutation::SubmitAssignment { assignment_id } => {
                matches!(key, K::MyAssignments | K::StudentProgress(_))
                    || key == &K::Submissions(*assignment_id)
            }
            Mutation::RecordAttendance { course_id } => match key {
                K::CourseAttendance { course_id: c, .. } => c == course_id,
                K::AttendanceStats { .. } | K::StudentProgress(_) => true,
                _ => false,
            },
            Mutation::RecordMemorization => matches!(
                key,
                K::Memorization { .. } | K::MemorizationStats { .. } | K::StudentProgress(_)
            ),
            Mutation::CreateEvent => matches!(key, K::Events),
            Mutation::LinkStudent { parent_id } => key == &K::LinkedStudents(*parent_id),
        }
    }
}

/// Counts of recorded mutations. A key's generation is the number of
/// recorded mutations that touch it, plus one per cache reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvalidationLog {
    counts: HashMap<Mutation, u64>,
    resets: u64,
}

impl InvalidationLog {
    pub fn record(&mut self, mutation: Mutation) {
        *self.counts.entry(mutation).or_default() += 1;
    }

    /// Forget everything, e.g. when the user signs out.
    pub fn reset(&mut self) {
        self.counts.clear();
        self.resets += 1;
    }

    pub fn generation(&self, key: &QueryKey) -> u64 {
        let touched: u64 = self
            .counts
            .iter()
            .filter(|(m, _)| m.invalidates(key))
            .map(|(_, n)| *n)
            .sum();
        touched + self.resets
    }

    /// True when `key` was invalidated after it was fetched at `fetched_at`.
    pub fn is_stale(&self, key: &QueryKey, fetched_at: u64) -> bool {
        self.generation(key) > fetched_at
    }
}

struct StoredResponse {
    generation: u64,
    value: Rc<dyn Any>,
}

/// Last successful response per key.
#[derive(Default)]
pub struct ResponseStore {
    entries: HashMap<QueryKey, StoredResponse>,
}

impl ResponseStore {
    /// The response stored under `key`, if it was fetched at `generation`.
    pub fn fresh<T: Clone + 'static>(&self, key: &QueryKey, generation: u64) -> Option<T> {
        let entry = self.entries.get(key)?;
        if entry.generation != generation {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Replace whatever was stored under `key`.
    pub fn insert<T: 'static>(&mut self, key: QueryKey, generation: u64, value: T) {
        self.entries.insert(
            key,
            StoredResponse {
                generation,
                value: Rc::new(value),
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// App-wide handle to the invalidation log and the stored responses.
#[derive(Clone, Copy, PartialEq)]
pub struct QueryCache {
    log: Signal<InvalidationLog>,
    responses: Signal<ResponseStore>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            log: Signal::new(InvalidationLog::default()),
            responses: Signal::new(ResponseStore::default()),
        }
    }

    pub fn generation(&self, key: &QueryKey) -> u64 {
        self.log.read().generation(key)
    }

    /// Untracked lookup; storing a response must not wake other queries.
    pub fn cached<T: Clone + 'static>(&self, key: &QueryKey, generation: u64) -> Option<T> {
        self.responses.peek().fresh(key, generation)
    }

    pub fn store<T: 'static>(&mut self, key: QueryKey, generation: u64, value: T) {
        self.responses.write().insert(key, generation, value);
    }

    pub fn invalidate(&mut self, mutation: Mutation) {
        tracing::debug!(?mutation, "Invalidating cached queries");
        self.log.write().record(mutation);
    }

    pub fn clear(&mut self) {
        self.responses.write().clear();
        self.log.write().reset();
    }
}

pub fn use_query_cache() -> QueryCache {
    use_context::<QueryCache>()
}

enum Lookup<T, Fut> {
    Hit(T),
    Miss(Fut),
}

/// Read under `key`: serve the stored response while it is current,
/// otherwise fetch, store and refetch whenever a mutation invalidates it.
/// Errors are never stored and arrive as the server's message, ready for
/// display.
///
/// The key is fixed for the lifetime of the calling component; views whose
/// key depends on route parameters render a keyed child instead.
pub fn use_query<T, F, Fut>(key: QueryKey, mut fetch: F) -> Resource<Result<T, String>>
where
    T: Clone + 'static,
    F: FnMut() -> Fut + 'static,
    Fut: Future<Output = Result<T, ServerFnError>> + 'static,
{
    let cache = use_query_cache();
    let memo_key = key.clone();
    // Memo so unrelated mutations do not wake this query.
    let generation = use_memo(move || cache.generation(&memo_key));

    use_resource(move || {
        let generation = generation();
        let key = key.clone();
        let lookup = match cache.cached::<T>(&key, generation) {
            Some(value) => Lookup::Hit(value),
            None => Lookup::Miss(fetch()),
        };
        let mut cache = cache;
        async move {
            match lookup {
                Lookup::Hit(value) => Ok(value),
                Lookup::Miss(request) => {
                    let value = request
                        .await
                        .map_err(|e| AppError::friendly_message(&e.to_string()))?;
                    cache.store(key, generation, value.clone());
                    Ok(value)
                }
            }
        }
    })
}

/// Why a write failed: a message for the toast, and any per-field errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationError {
    pub message: String,
    pub field_errors: HashMap<String, String>,
}

impl MutationError {
    pub fn from_server(err: &ServerFnError) -> Self {
        let text = err.to_string();
        Self {
            message: AppError::friendly_message(&text),
            field_errors: AppError::parse_field_errors(&text),
        }
    }
}

impl From<AppError> for MutationError {
    fn from(err: AppError) -> Self {
        Self {
            message: err.message,
            field_errors: err.field_errors,
        }
    }
}

/// Dispatch a write and, once it succeeds, invalidate what it touched.
pub async fn run_mutation<T, Fut>(
    mut cache: QueryCache,
    mutation: Mutation,
    request: Fut,
) -> Result<T, MutationError>
where
    Fut: Future<Output = Result<T, ServerFnError>>,
{
    let value = request.await.map_err(|e| MutationError::from_server(&e))?;
    cache.invalidate(mutation);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn creating_an_assignment_stales_that_course_only() {
        let mut log = InvalidationLog::default();
        let seen_a = log.generation(&QueryKey::CourseAssignments(1));
        let seen_b = log.generation(&QueryKey::CourseAssignments(2));

        log.record(Mutation::CreateAssignment { course_id: 1 });

        assert!(log.is_stale(&QueryKey::CourseAssignments(1), seen_a));
        assert!(!log.is_stale(&QueryKey::CourseAssignments(2), seen_b));
        assert!(!log.is_stale(&QueryKey::Events, 0));
    }

    #[test]
    fn generation_counts_each_matching_write() {
        let mut log = InvalidationLog::default();
        log.record(Mutation::RecordMemorization);
        log.record(Mutation::RecordMemorization);
        log.record(Mutation::SubmitAssignment { assignment_id: 4 });
        assert_eq!(log.generation(&QueryKey::StudentProgress(9)), 3);
        assert_eq!(log.generation(&QueryKey::Memorization { student_id: None }), 2);
        assert_eq!(log.generation(&QueryKey::Submissions(4)), 1);
        assert_eq!(log.generation(&QueryKey::Submissions(5)), 0);
    }

    #[test]
    fn attendance_stales_every_stats_filter() {
        let m = Mutation::RecordAttendance { course_id: 3 };
        assert!(m.invalidates(&QueryKey::AttendanceStats { course_id: None, student_id: None }));
        assert!(m.invalidates(&QueryKey::AttendanceStats { course_id: Some(8), student_id: Some(1) }));
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(m.invalidates(&QueryKey::CourseAttendance { course_id: 3, date: day }));
        assert!(!m.invalidates(&QueryKey::CourseAttendance { course_id: 4, date: day }));
    }

    #[test]
    fn reset_stales_everything() {
        let mut log = InvalidationLog::default();
        let seen = log.generation(&QueryKey::Courses);
        log.reset();
        assert!(log.is_stale(&QueryKey::Courses, seen));
        assert!(log.is_stale(&QueryKey::Events, 0));
    }

    #[test]
    fn stored_response_is_served_until_its_key_is_invalidated() {
        let mut log = InvalidationLog::default();
        let mut store = ResponseStore::default();
        let key = QueryKey::CourseAssignments(1);

        let fetched_at = log.generation(&key);
        store.insert(key.clone(), fetched_at, vec!["Surah Al-Mulk".to_string()]);
        assert_eq!(
            store.fresh::<Vec<String>>(&key, log.generation(&key)),
            Some(vec!["Surah Al-Mulk".to_string()])
        );

        log.record(Mutation::CreateEvent);
        assert!(store.fresh::<Vec<String>>(&key, log.generation(&key)).is_some());

        log.record(Mutation::CreateAssignment { course_id: 1 });
        assert_eq!(store.fresh::<Vec<String>>(&key, log.generation(&key)), None);
    }

    #[test]
    fn refetched_response_replaces_the_stored_one() {
        let mut store = ResponseStore::default();
        store.insert(QueryKey::Events, 0, vec![1_i64]);
        store.insert(QueryKey::Events, 1, vec![1_i64, 2]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.fresh::<Vec<i64>>(&QueryKey::Events, 0), None);
        assert_eq!(store.fresh::<Vec<i64>>(&QueryKey::Events, 1), Some(vec![1, 2]));
    }

    #[test]
    fn stored_response_of_another_type_is_a_miss() {
        let mut store = ResponseStore::default();
        store.insert(QueryKey::Courses, 0, 7_u32);
        assert_eq!(store.fresh::<String>(&QueryKey::Courses, 0), None);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn mutation_error_keeps_field_errors() {
        let err = MutationError::from(AppError::field("file", "Please attach a file to submit"));
        assert_eq!(err.field_errors["file"], "Please attach a file to submit");
    }

    #[test]
    fn unparseable_server_error_falls_back_to_generic_message() {
        let err = MutationError::from_server(&ServerFnError::new("connection reset"));
        assert_eq!(err.message, shared_types::GENERIC_ERROR_MESSAGE);
        assert!(err.field_errors.is_empty());
    }
}
