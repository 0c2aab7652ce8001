/// Outcome of attempting to add a keyword to the filter. Only `Added`
/// changes the set; the other variants carry the reason for the
/// rejection so the frontend can surface it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Added,
    Empty,
    AlreadyApplied,
    /// The keyword is not registered; filters only accept values the
    /// keyword registry knows about.
    Unknown,
}

/// The set of keyword strings currently narrowing the result view.
/// Ordered by insertion (tag rendering order) and duplicate-free.
/// Client-only state; never persisted server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    keywords: Vec<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `raw` against the known-keyword registry and appends
    /// it on success. Validation happens at insertion time only.
    pub fn add(&mut self, raw: &str, known: &[String]) -> FilterOutcome {
        let keyword = raw.trim();
        if keyword.is_empty() {
            return FilterOutcome::Empty;
        }
        if self.keywords.iter().any(|existing| existing == keyword) {
            return FilterOutcome::AlreadyApplied;
        }
        if !known.iter().any(|k| k == keyword) {
            return FilterOutcome::Unknown;
        }
        self.keywords.push(keyword.to_string());
        FilterOutcome::Added
    }

    /// Removes the keyword if present. Absence is a neutral no-op.
    pub fn remove(&mut self, keyword: &str) -> bool {
        let before = self.keywords.len();
        self.keywords.retain(|existing| existing != keyword);
        self.keywords.len() != before
    }

    pub fn clear(&mut self) -> bool {
        if self.keywords.is_empty() {
            return false;
        }
        self.keywords.clear();
        true
    }

    /// Intersects the set with the current registry, dropping members
    /// whose keyword no longer exists. Returns whether anything was
    /// dropped so the caller can re-trigger a load.
    pub fn retain_known(&mut self, known: &[String]) -> bool {
        let before = self.keywords.len();
        self.keywords.retain(|kw| known.iter().any(|k| k == kw));
        self.keywords.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Comma-joined query value, or `None` when no filter is applied.
    pub fn as_param(&self) -> Option<String> {
        if self.keywords.is_empty() {
            None
        } else {
            Some(self.keywords.join(","))
        }
    }
}
