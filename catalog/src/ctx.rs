//! Application context and catalog state.
//!
//! [`Catalog`] owns one [`Resource`] per collection and the lookups derived
//! from them. Lookups and filtered views are `None` until their collection
//! has resolved, and are rebuilt only when the fetched data changes.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};

use crate::{
    config::CatalogConfig,
    describe::CourseCard,
    filter::{CourseFilters, filter_courses},
    lookup::{LookupTable, build_lookup},
    records::{Course, Difficulty, Grade, Subject, Typed},
    resource::Resource,
    source::{ConfiguredSource, DataSource, Endpoint, SourceError},
};

/// A lookup memoised on the identity of the data it was built from.
#[derive(Debug)]
struct LookupMemo<T> {
    source: Option<Arc<Vec<T>>>,
    table: Option<Arc<LookupTable<T>>>,
}

impl<T> Default for LookupMemo<T> {
    fn default() -> Self {
        Self {
            source: None,
            table: None,
        }
    }
}

impl<T: Typed + Clone> LookupMemo<T> {
    fn get(&mut self, data: &Arc<Vec<T>>) -> Arc<LookupTable<T>> {
        if let (Some(source), Some(table)) = (&self.source, &self.table)
            && Arc::ptr_eq(source, data)
        {
            return Arc::clone(table);
        }
        let table = Arc::new(build_lookup(data));
        debug!("built lookup with {} entries", table.len());
        self.source = Some(Arc::clone(data));
        self.table = Some(Arc::clone(&table));
        table
    }
}

/// Catalog collections fetched from a [`DataSource`].
#[derive(Debug)]
pub struct Catalog<S> {
    source: S,
    pub subjects: Resource<Subject>,
    pub difficulties: Resource<Difficulty>,
    pub grades: Resource<Grade>,
    pub courses: Resource<Course>,
    subject_lookup: LookupMemo<Subject>,
    difficulty_lookup: LookupMemo<Difficulty>,
}

impl<S: DataSource> Catalog<S> {
    pub fn new(source: S) -> Self {
        Self::with_stale_time(source, crate::resource::DEFAULT_STALE_TIME)
    }

    pub fn with_stale_time(source: S, stale_time: TimeDelta) -> Self {
        Self {
            source,
            subjects: Resource::with_stale_time(Endpoint::Subjects, stale_time),
            difficulties: Resource::with_stale_time(Endpoint::Difficulties, stale_time),
            grades: Resource::with_stale_time(Endpoint::Grades, stale_time),
            courses: Resource::with_stale_time(Endpoint::Courses, stale_time),
            subject_lookup: LookupMemo::default(),
            difficulty_lookup: LookupMemo::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch all four collections concurrently.
    pub async fn refresh(&mut self) {
        let tickets = (
            self.subjects.begin(),
            self.difficulties.begin(),
            self.grades.begin(),
            self.courses.begin(),
        );
        let (subjects, difficulties, grades, courses) = tokio::join!(
            self.source.fetch::<Subject>(Endpoint::Subjects),
            self.source.fetch::<Difficulty>(Endpoint::Difficulties),
            self.source.fetch::<Grade>(Endpoint::Grades),
            self.source.fetch::<Course>(Endpoint::Courses),
        );
        let now = Utc::now();
        self.subjects.complete(tickets.0, subjects, now);
        self.difficulties.complete(tickets.1, difficulties, now);
        self.grades.complete(tickets.2, grades, now);
        self.courses.complete(tickets.3, courses, now);
    }

    /// Refetch everything when any collection is stale or missing.
    pub async fn ensure_fresh(&mut self) {
        let now = Utc::now();
        let stale = self.subjects.is_stale(now)
            || self.difficulties.is_stale(now)
            || self.grades.is_stale(now)
            || self.courses.is_stale(now);
        if stale {
            info!("refreshing catalog from {}", std::any::type_name::<S>());
            self.refresh().await;
        }
    }

    /// First fetch error among the collections, if any.
    pub fn error(&self) -> Option<(Endpoint, &SourceError)> {
        [
            (Endpoint::Subjects, self.subjects.error()),
            (Endpoint::Difficulties, self.difficulties.error()),
            (Endpoint::Grades, self.grades.error()),
            (Endpoint::Courses, self.courses.error()),
        ]
        .into_iter()
        .find_map(|(endpoint, err)| err.map(|e| (endpoint, e)))
    }

    pub fn subject_lookup(&mut self) -> Option<Arc<LookupTable<Subject>>> {
        let data = self.subjects.data()?;
        Some(self.subject_lookup.get(data))
    }

    pub fn difficulty_lookup(&mut self) -> Option<Arc<LookupTable<Difficulty>>> {
        let data = self.difficulties.data()?;
        Some(self.difficulty_lookup.get(data))
    }

    /// Courses passing `filters`, in source order.
    pub fn filtered_courses(&self, filters: &CourseFilters) -> Option<Vec<Course>> {
        let courses = self.courses.data()?;
        Some(
            filter_courses(courses, filters)
                .into_iter()
                .cloned()
                .collect(),
        )
    }

    /// Cards for the courses passing `filters`; `None` until courses and
    /// both lookups are available.
    pub fn cards(&mut self, filters: &CourseFilters) -> Option<Vec<CourseCard>> {
        let subjects = self.subject_lookup()?;
        let difficulties = self.difficulty_lookup()?;
        let courses = self.filtered_courses(filters)?;
        Some(
            courses
                .iter()
                .map(|course| CourseCard::new(course, &subjects, &difficulties))
                .collect(),
        )
    }
}

/// The main application context: configuration plus the catalog it points at.
#[derive(Debug)]
pub struct AppContext {
    pub config: CatalogConfig,
    pub catalog: Catalog<ConfiguredSource>,
}

impl AppContext {
    /// # Errors
    ///
    /// Returns an error when the configuration names no usable source.
    pub fn new(config: CatalogConfig) -> anyhow::Result<Self> {
        let source = config.source()?;
        info!("catalog source: {source}");
        let catalog = Catalog::with_stale_time(source, config.stale_time());
        Ok(Self { config, catalog })
    }

    /// Fetch the catalog, failing on the first collection that could not be
    /// loaded.
    pub async fn load(&mut self) -> anyhow::Result<()> {
        self.catalog.ensure_fresh().await;
        if let Some((endpoint, err)) = self.catalog.error() {
            bail!("failed to load {endpoint}: {err}");
        }
        Ok(())
    }
}
