use crate::geopoint::{parse_line, Category, Geopoint};
use anyhow::Result;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Anything that can hand us the raw geopoint lists, one per category.
/// `Sync` so the three category fetches can run concurrently.
pub trait GeopointSource: Sync {
    fn fetch_list(&self, category: Category) -> Result<Vec<String>>;
}

/// One category that failed to load. The store stays usable for the others.
#[derive(Debug)]
pub struct LoadFailure {
    pub category: Category,
    pub error: anyhow::Error,
}

/// Outcome of a store build. An empty failure list means every category
/// loaded; otherwise the store is serving in degraded form.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Immutable-after-build mapping from designator code to its candidate set,
/// kept per category. Candidate order within a code is provider order; that
/// order is the deterministic fallback when no reference coordinate exists.
#[derive(Debug, Default)]
pub struct GeopointStore {
    fixes: HashMap<String, Vec<Geopoint>>,
    navaids: HashMap<String, Vec<Geopoint>>,
    airports: HashMap<String, Vec<Geopoint>>,
}

impl GeopointStore {
    /// Fetches all three category lists concurrently and builds a fresh
    /// store. A category whose fetch fails is left empty and recorded in the
    /// report; the build itself never fails.
    pub fn build(source: &dyn GeopointSource) -> (Self, LoadReport) {
        use rayon::prelude::*;

        let results: Vec<(Category, Result<Vec<String>>)> = Category::ALL
            .par_iter()
            .map(|&category| (category, source.fetch_list(category)))
            .collect();

        let mut store = GeopointStore::default();
        let mut report = LoadReport::default();

        for (category, result) in results {
            match result {
                Ok(lines) => {
                    let added = store.populate(category, &lines);
                    info!(
                        "Loaded geopoint list — category={} lines={} parsed={}",
                        category,
                        lines.len(),
                        added
                    );
                }
                Err(error) => {
                    warn!("Failed to load geopoint list — category={} error={:#}", category, error);
                    report.failures.push(LoadFailure { category, error });
                }
            }
        }

        (store, report)
    }

    fn populate(&mut self, category: Category, lines: &[String]) -> usize {
        let mut added = 0;
        for line in lines {
            match parse_line(line, category) {
                Some(point) => {
                    self.map_mut(category)
                        .entry(point.code.clone())
                        .or_default()
                        .push(point);
                    added += 1;
                }
                None => {
                    if !line.trim().is_empty() {
                        debug!("Skipping malformed geopoint line — category={} line={:?}", category, line);
                    }
                }
            }
        }
        added
    }

    fn map(&self, category: Category) -> &HashMap<String, Vec<Geopoint>> {
        match category {
            Category::Fix => &self.fixes,
            Category::Navaid => &self.navaids,
            Category::Airport => &self.airports,
        }
    }

    fn map_mut(&mut self, category: Category) -> &mut HashMap<String, Vec<Geopoint>> {
        match category {
            Category::Fix => &mut self.fixes,
            Category::Navaid => &mut self.navaids,
            Category::Airport => &mut self.airports,
        }
    }

    /// Candidate set for a code, in provider order. A code the provider never
    /// listed yields an empty slice, not an error.
    pub fn lookup(&self, code: &str, category: Category) -> &[Geopoint] {
        self.map(category)
            .get(code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self, category: Category) -> usize {
        self.map(category).len()
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|&c| self.map(c).is_empty())
    }
}

/// Shared handle over the store. Rebuilds construct a brand-new store off to
/// the side and publish it with a single pointer swap, so readers holding a
/// snapshot never observe categories from different generations.
#[derive(Debug, Default)]
pub struct GeopointCache {
    inner: RwLock<Arc<GeopointStore>>,
}

impl GeopointCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// First-time build. Succeeds even when some categories failed; the
    /// report says which.
    pub fn initialize(&self, source: &dyn GeopointSource) -> LoadReport {
        info!("Initializing geopoint store...");
        self.rebuild(source)
    }

    /// Rebuilds from scratch and atomically replaces the previous store as a
    /// unit.
    pub fn reinitialize(&self, source: &dyn GeopointSource) -> LoadReport {
        info!("Reinitializing geopoint store...");
        self.rebuild(source)
    }

    fn rebuild(&self, source: &dyn GeopointSource) -> LoadReport {
        let (store, report) = GeopointStore::build(source);
        *self.inner.write().expect("geopoint store lock poisoned") = Arc::new(store);
        report
    }

    /// Read handle pinned to one generation. Hold it for the duration of a
    /// resolution pass.
    pub fn snapshot(&self) -> Arc<GeopointStore> {
        Arc::clone(&self.inner.read().expect("geopoint store lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct StubSource {
        fixes: Vec<String>,
        navaids: Vec<String>,
        airports: Vec<String>,
        fail: Option<Category>,
    }

    impl StubSource {
        fn new() -> Self {
            Self {
                fixes: Vec::new(),
                navaids: Vec::new(),
                airports: Vec::new(),
                fail: None,
            }
        }
    }

    impl GeopointSource for StubSource {
        fn fetch_list(&self, category: Category) -> Result<Vec<String>> {
            if self.fail == Some(category) {
                bail!("stub fetch failure");
            }
            let lines = match category {
                Category::Fix => &self.fixes,
                Category::Navaid => &self.navaids,
                Category::Airport => &self.airports,
            };
            Ok(lines.clone())
        }
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_groups_duplicates_in_source_order() {
        let mut source = StubSource::new();
        source.fixes = lines(&[
            "ANITO (14.5,120.9)",
            "ANITO (51.2,6.8)",
            "OTLK (40.0,-74.0)",
        ]);

        let (store, report) = GeopointStore::build(&source);
        assert!(!report.is_degraded());

        let candidates = store.lookup("ANITO", Category::Fix);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].lat, Some(14.5));
        assert_eq!(candidates[1].lat, Some(51.2));
        assert_eq!(store.lookup("OTLK", Category::Fix).len(), 1);
    }

    #[test]
    fn test_malformed_lines_are_skipped_not_fatal() {
        let mut source = StubSource::new();
        source.navaids = lines(&["VTK (35.9,126.6)", "garbage line", "FE"]);

        let (store, report) = GeopointStore::build(&source);
        assert!(!report.is_degraded());
        assert_eq!(store.len(Category::Navaid), 1);
        assert_eq!(store.lookup("VTK", Category::Navaid).len(), 1);
    }

    #[test]
    fn test_absent_code_yields_empty_slice() {
        let (store, _) = GeopointStore::build(&StubSource::new());
        assert!(store.lookup("NOPE", Category::Fix).is_empty());
        assert!(store.lookup("NOPE", Category::Airport).is_empty());
    }

    #[test]
    fn test_failed_category_degrades_without_poisoning_others() {
        let mut source = StubSource::new();
        source.fixes = lines(&["ANITO (14.5,120.9)"]);
        source.navaids = lines(&["VTK (35.9,126.6)"]);
        source.fail = Some(Category::Navaid);

        let (store, report) = GeopointStore::build(&source);
        assert!(report.is_degraded());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].category, Category::Navaid);

        assert!(store.lookup("VTK", Category::Navaid).is_empty());
        assert_eq!(store.lookup("ANITO", Category::Fix).len(), 1);
    }

    #[test]
    fn test_reinitialize_swaps_whole_generations() {
        let mut source = StubSource::new();
        source.fixes = lines(&["ANITO (14.5,120.9)"]);

        let cache = GeopointCache::new();
        cache.initialize(&source);
        let old = cache.snapshot();
        assert_eq!(old.lookup("ANITO", Category::Fix).len(), 1);

        let mut replacement = StubSource::new();
        replacement.fixes = lines(&["OTLK (40.0,-74.0)"]);
        cache.reinitialize(&replacement);

        // The held snapshot still sees the old generation in full
        assert_eq!(old.lookup("ANITO", Category::Fix).len(), 1);
        assert!(old.lookup("OTLK", Category::Fix).is_empty());

        // A fresh snapshot sees only the new generation
        let new = cache.snapshot();
        assert!(new.lookup("ANITO", Category::Fix).is_empty());
        assert_eq!(new.lookup("OTLK", Category::Fix).len(), 1);
    }
}
