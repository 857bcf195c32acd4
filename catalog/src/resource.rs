use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::source::{Endpoint, SourceError};

/// How long fetched data counts as fresh unless configured otherwise.
pub const DEFAULT_STALE_TIME: TimeDelta = TimeDelta::minutes(5);

/// Fetch state of one collection.
#[derive(Debug, Clone)]
pub enum ResourceState<T> {
    Idle,
    Loading,
    Ready(Arc<Vec<T>>),
    Failed(Arc<SourceError>),
}

/// Proof that a fetch was started; only the newest ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Ticket {
    endpoint: Endpoint,
    generation: u64,
}

/// One remote collection, its fetch state and freshness.
///
/// Starting a new fetch with [`Resource::begin`] supersedes any fetch still
/// in flight: a result delivered with an older ticket is discarded.
#[derive(Debug, Clone)]
pub struct Resource<T> {
    endpoint: Endpoint,
    state: ResourceState<T>,
    last_ready: Option<Arc<Vec<T>>>,
    generation: u64,
    fetched_at: Option<DateTime<Utc>>,
    stale_time: TimeDelta,
}

impl<T> Resource<T> {
    pub fn new(endpoint: Endpoint) -> Self {
        Self::with_stale_time(endpoint, DEFAULT_STALE_TIME)
    }

    pub fn with_stale_time(endpoint: Endpoint, stale_time: TimeDelta) -> Self {
        Self {
            endpoint,
            state: ResourceState::Idle,
            last_ready: None,
            generation: 0,
            fetched_at: None,
            stale_time,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn state(&self) -> &ResourceState<T> {
        &self.state
    }

    /// Mark a fetch as started.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.state = ResourceState::Loading;
        Ticket {
            endpoint: self.endpoint,
            generation: self.generation,
        }
    }

    /// Apply a fetch result. Returns `false` when `ticket` was superseded
    /// and the result was dropped.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<T>, SourceError>,
        now: DateTime<Utc>,
    ) -> bool {
        if ticket.endpoint != self.endpoint || ticket.generation != self.generation {
            debug!(
                "discarding stale {} response (generation {}, current {})",
                ticket.endpoint, ticket.generation, self.generation
            );
            return false;
        }
        match result {
            Ok(data) => {
                let data = Arc::new(data);
                self.last_ready = Some(Arc::clone(&data));
                self.state = ResourceState::Ready(data);
                self.fetched_at = Some(now);
            }
            Err(err) => {
                warn!("fetching {} failed: {err}", self.endpoint);
                self.state = ResourceState::Failed(Arc::new(err));
            }
        }
        true
    }

    /// The newest successfully fetched data.
    ///
    /// Survives a refetch in flight and a failed refetch; `None` only until
    /// the first fetch succeeds.
    pub fn data(&self) -> Option<&Arc<Vec<T>>> {
        self.last_ready.as_ref()
    }

    pub fn error(&self) -> Option<&SourceError> {
        match &self.state {
            ResourceState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ResourceState::Loading)
    }

    /// Whether the data should be refetched at `now`.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match (&self.state, self.fetched_at) {
            (ResourceState::Ready(_), Some(at)) => now - at >= self.stale_time,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut grades = Resource::<u32>::new(Endpoint::Grades);
        assert!(matches!(grades.state(), ResourceState::Idle));

        let ticket = grades.begin();
        assert!(grades.is_loading());
        assert!(grades.data().is_none());

        let now = Utc::now();
        assert!(grades.complete(ticket, Ok(vec![5, 6]), now));
        assert_eq!(grades.data().unwrap().as_slice(), &[5, 6]);
        assert!(!grades.is_stale(now + TimeDelta::minutes(4)));
        assert!(grades.is_stale(now + TimeDelta::minutes(5)));
    }

    #[test]
    fn test_superseded_response_is_discarded() {
        let mut grades = Resource::<u32>::new(Endpoint::Grades);
        let first = grades.begin();
        let second = grades.begin();
        let now = Utc::now();

        assert!(grades.complete(second, Ok(vec![7]), now));
        assert!(!grades.complete(first, Ok(vec![1]), now));
        assert_eq!(grades.data().unwrap().as_slice(), &[7]);
    }

    #[test]
    fn test_refetch_keeps_last_ready_data() {
        let mut subjects = Resource::<u32>::new(Endpoint::Subjects);
        let now = Utc::now();
        let ticket = subjects.begin();
        subjects.complete(ticket, Ok(vec![1, 2]), now);
        let good = Arc::clone(subjects.data().unwrap());

        let ticket = subjects.begin();
        assert!(subjects.is_loading());
        assert!(Arc::ptr_eq(subjects.data().unwrap(), &good));

        subjects.complete(ticket, Err(SourceError::Missing(Endpoint::Subjects)), now);
        assert!(subjects.error().is_some());
        assert!(Arc::ptr_eq(subjects.data().unwrap(), &good));
        assert!(subjects.is_stale(now));
    }

    #[test]
    fn test_failure_is_a_state() {
        let mut courses = Resource::<u32>::new(Endpoint::Courses);
        let ticket = courses.begin();
        courses.complete(ticket, Err(SourceError::Missing(Endpoint::Courses)), Utc::now());
        assert!(courses.data().is_none());
        assert!(matches!(courses.error(), Some(SourceError::Missing(_))));
        assert!(courses.is_stale(Utc::now()));
    }
}
