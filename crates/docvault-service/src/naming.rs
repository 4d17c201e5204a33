//! Display-name disambiguation.
//!
//! A file landing in a folder keeps its name unless another file there
//! already uses it (compared case-insensitively). In that case an `(N)`
//! counter is appended to the base name, before the extension:
//!
//! ```
//! use docvault_service::naming::disambiguate;
//!
//! assert_eq!(disambiguate("report.pdf", &["Report.PDF"]), "report(1).pdf");
//! assert_eq!(disambiguate("report(2).pdf", &["report(2).pdf"]), "report(3).pdf");
//! ```

use std::collections::HashSet;

use docvault_entity::file::model::split_extension;

/// Return `candidate`, or the first `{base}(N){ext}` not present in `existing`.
///
/// Comparison ignores case; the returned name keeps the candidate's casing.
pub fn disambiguate<S: AsRef<str>>(candidate: &str, existing: &[S]) -> String {
    let snapshot = NameSnapshot::from_names(existing.iter().map(|s| s.as_ref()));
    snapshot.resolve(candidate)
}

/// The names already present in one destination folder.
///
/// Names are stored lower-cased. A batch placing several files into the
/// same folder claims each chosen name so later items see it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSnapshot {
    taken: HashSet<String>,
}

impl NameSnapshot {
    /// Build a snapshot from the names currently in a folder.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            taken: names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Whether `name` is taken, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(&name.to_lowercase())
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    /// Whether the folder has no names.
    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    /// Compute the name `candidate` would receive, without claiming it.
    pub fn resolve(&self, candidate: &str) -> String {
        if !self.contains(candidate) {
            return candidate.to_string();
        }

        let (base, ext) = split_extension(candidate);
        let (base, mut counter) = match counter_suffix(base) {
            Some((stripped, n)) => (stripped.trim_end(), n.saturating_add(1)),
            None => (base.trim_end(), 1),
        };

        loop {
            let name = format!("{base}({counter}){ext}");
            if !self.contains(&name) {
                return name;
            }
            counter = counter.saturating_add(1);
        }
    }

    /// Resolve `candidate` and record the result as taken.
    pub fn claim(&mut self, candidate: &str) -> String {
        let name = self.resolve(candidate);
        self.insert(&name);
        name
    }

    /// Record `name` as taken.
    pub fn insert(&mut self, name: &str) {
        self.taken.insert(name.to_lowercase());
    }

    /// Give back a claimed name that was never committed.
    pub fn release(&mut self, name: &str) {
        self.taken.remove(&name.to_lowercase());
    }
}

/// Split a trailing `(N)` off `base`, where `N` is all ASCII digits.
fn counter_suffix(base: &str) -> Option<(&str, u64)> {
    let inner = base.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let digits = &inner[open + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n = digits.parse::<u64>().ok()?;
    Some((&base[..open], n))
}
