use std::path::{is_separator, Path};

/// Folder-scoped permission verdict. Absence of any matching rule is Deny:
/// the engine mutates nothing the user has not explicitly opened up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Allow,
    Deny,
}

#[derive(Debug, Clone)]
pub struct PathRule {
    pub path: String,
    pub kind: RuleKind,
}

impl PathRule {
    fn new(raw: &str, kind: RuleKind) -> Option<Self> {
        let trimmed = raw.trim_end_matches(is_separator);
        let path = if trimmed.is_empty() && !raw.is_empty() {
            // "/" trims to nothing; keep the root rule addressable.
            raw[..1].to_string()
        } else {
            trimmed.to_string()
        };
        if path.is_empty() {
            return None;
        }
        Some(Self { path, kind })
    }
}

/// The persisted `editableFolders` / `readonlyFolders` lists compiled into a
/// resolvable rule set. The most specific (longest) matching folder wins.
#[derive(Debug, Clone, Default)]
pub struct PathRuleSet {
    rules: Vec<PathRule>,
}

impl PathRuleSet {
    pub fn from_lists(editable: &[String], readonly: &[String]) -> Self {
        let mut rules = Vec::with_capacity(editable.len() + readonly.len());
        rules.extend(
            editable
                .iter()
                .filter_map(|p| PathRule::new(p, RuleKind::Allow)),
        );
        rules.extend(
            readonly
                .iter()
                .filter_map(|p| PathRule::new(p, RuleKind::Deny)),
        );
        Self { rules }
    }

    /// Effective permission for `path`: among all matching rules the longest
    /// rule path wins; a length tie or no match resolves to Deny.
    pub fn resolve(&self, path: &Path) -> RuleKind {
        let queried = path.to_string_lossy();
        let queried = queried.trim_end_matches(is_separator);

        let mut best_len = 0usize;
        let mut best = RuleKind::Deny;
        for rule in &self.rules {
            if !rule_matches(&rule.path, queried) {
                continue;
            }
            let len = rule.path.len();
            if len > best_len {
                best_len = len;
                best = rule.kind;
            } else if len == best_len && rule.kind == RuleKind::Deny {
                best = RuleKind::Deny;
            }
        }
        best
    }

    pub fn allows(&self, path: &Path) -> bool {
        self.resolve(path) == RuleKind::Allow
    }
}

/// A rule governs the folder itself and anything lexically nested under it.
/// The boundary must land on a separator so "/home/bob" does not capture
/// "/home/bob2".
fn rule_matches(rule_path: &str, queried: &str) -> bool {
    if queried == rule_path {
        return true;
    }
    match queried.strip_prefix(rule_path) {
        Some(rest) => rule_path.ends_with(is_separator) || rest.starts_with(is_separator),
        None => false,
    }
}
