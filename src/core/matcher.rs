//! Criteria evaluation against a single note
//!
//! Every positive category has a matcher returning the criterion values that
//! matched, or `None`. Exclusions reuse the same matchers as a has-any test
//! and reject the note before the operator is considered.

use crate::core::criteria::{Category, Operator, PropertyValuePair, SearchCriteria};
use crate::core::document::Note;
use crate::core::front_matter::Frontmatter;
use crate::core::value::FrontmatterValue;
use serde::{Deserialize, Serialize};

/// Record of which categories matched a note, and with what values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_contains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_value: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<String>>,
}

impl MatchedParameters {
    /// Parameters recorded when a note is accepted without positive criteria
    pub fn path_only(relative_path: impl Into<String>) -> Self {
        Self {
            path: Some(relative_path.into()),
            ..Default::default()
        }
    }

    pub fn contains(&self, category: Category) -> bool {
        match category {
            Category::Path => self.path.is_some(),
            Category::PathContains => self.path_contains.is_some(),
            Category::Tags => self.tags.is_some(),
            Category::Properties => self.properties.is_some(),
            Category::PropertyValue => self.property_value.is_some(),
            Category::Title => self.title.is_some(),
            Category::Content => self.content.is_some(),
        }
    }

    /// Categories that matched, in evaluation order
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.categories().is_empty()
    }
}

/// Evaluates one set of criteria against notes
#[derive(Debug, Clone)]
pub struct MatchEvaluator {
    criteria: SearchCriteria,
    operator: Operator,
}

impl MatchEvaluator {
    pub fn new(criteria: SearchCriteria, operator: Operator) -> Self {
        Self { criteria, operator }
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the matched parameters, or `None` when the note is rejected.
    pub fn evaluate(&self, note: &Note) -> Option<MatchedParameters> {
        let criteria = &self.criteria;

        if criteria.is_empty() {
            return Some(MatchedParameters::path_only(&note.relative_path));
        }

        if self.is_excluded(note) {
            return None;
        }

        if !criteria.has_positive() {
            return Some(MatchedParameters::path_only(&note.relative_path));
        }

        let matched = MatchedParameters {
            path: match_path(&criteria.path, &note.relative_path),
            path_contains: match_path_contains(&criteria.path_contains, &note.relative_path),
            tags: match_tags(&criteria.tags, &note.frontmatter),
            properties: match_properties(&criteria.properties, &note.frontmatter),
            property_value: match_property_values(&criteria.property_values, &note.frontmatter),
            title: match_substring(&criteria.title, &note.title),
            content: match_substring(&criteria.content, &note.body),
        };

        let accepted = match self.operator {
            Operator::And => criteria
                .positive_categories()
                .into_iter()
                .all(|c| matched.contains(c)),
            Operator::Or => !matched.is_empty(),
        };

        accepted.then_some(matched)
    }

    fn is_excluded(&self, note: &Note) -> bool {
        let criteria = &self.criteria;
        match_path_contains(&criteria.without_path_contains, &note.relative_path).is_some()
            || match_tags(&criteria.without_tags, &note.frontmatter).is_some()
            || match_properties(&criteria.without_properties, &note.frontmatter).is_some()
            || match_property_values(&criteria.without_property_values, &note.frontmatter)
                .is_some()
    }
}

fn non_empty(found: Vec<String>) -> Option<Vec<String>> {
    if found.is_empty() {
        None
    } else {
        Some(found)
    }
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Exact path or directory prefix; the first matching criterion is recorded.
pub fn match_path(values: &[String], relative_path: &str) -> Option<String> {
    let normal = normalize_separators(relative_path);
    let with_slash = format!("{normal}/");
    values
        .iter()
        .map(|v| normalize_separators(v))
        .find(|v| normal == *v || with_slash.starts_with(&format!("{v}/")))
}

/// Case-insensitive substring of the relative path
pub fn match_path_contains(values: &[String], relative_path: &str) -> Option<Vec<String>> {
    match_substring(values, relative_path)
}

fn normalize_tag(tag: &str) -> &str {
    tag.trim().trim_start_matches('#')
}

/// Tags compare after stripping surrounding whitespace and leading `#`.
pub fn match_tags(values: &[String], frontmatter: &Frontmatter) -> Option<Vec<String>> {
    if values.is_empty() {
        return None;
    }
    let tags = frontmatter
        .get("tags")
        .map(FrontmatterValue::to_list)
        .unwrap_or_default();
    let normalized: Vec<&str> = tags.iter().map(|t| normalize_tag(t)).collect();

    non_empty(
        values
            .iter()
            .filter(|v| normalized.contains(&normalize_tag(v)))
            .cloned()
            .collect(),
    )
}

/// Keys present in the frontmatter, whatever their value
pub fn match_properties(names: &[String], frontmatter: &Frontmatter) -> Option<Vec<String>> {
    non_empty(
        names
            .iter()
            .filter(|name| frontmatter.contains_key(name))
            .cloned()
            .collect(),
    )
}

/// Pairs whose value is contained in a list property or equals the scalar
/// property's normalized string. Matches are recorded as `name=value`.
pub fn match_property_values(
    pairs: &[PropertyValuePair],
    frontmatter: &Frontmatter,
) -> Option<Vec<String>> {
    non_empty(
        pairs
            .iter()
            .filter(|pair| match frontmatter.get(&pair.name) {
                Some(FrontmatterValue::List(items)) => items.contains(&pair.value),
                Some(scalar) => scalar.to_normalized_string() == pair.value,
                None => false,
            })
            .map(ToString::to_string)
            .collect(),
    )
}

/// Case-insensitive substring test, used for path, title and content
pub fn match_substring(values: &[String], haystack: &str) -> Option<Vec<String>> {
    if values.is_empty() || haystack.is_empty() {
        return None;
    }
    let haystack = haystack.to_lowercase();
    non_empty(
        values
            .iter()
            .filter(|v| haystack.contains(&v.to_lowercase()))
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::Document;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn note(relative_path: &str, content: &str) -> Note {
        Note::new(
            PathBuf::from("/vault").join(relative_path),
            relative_path.to_string(),
            Document::parse(content),
            None,
        )
    }

    fn proj() -> Note {
        note(
            "work/proj.md",
            "---\ntags: [urgent, review]\nstatus: done\ndraft: false\n---\nQuarterly Roadmap\n",
        )
    }

    #[test]
    fn test_tag_match_and() {
        let evaluator = MatchEvaluator::new(SearchCriteria::new().with_tag("urgent"), Operator::And);
        let matched = evaluator.evaluate(&proj()).unwrap();
        assert_eq!(matched.tags, Some(vec!["urgent".to_string()]));
        assert_eq!(matched.categories(), vec![Category::Tags]);
    }

    #[test]
    fn test_or_records_only_matching_categories() {
        let criteria = SearchCriteria::new()
            .with_tag("missing")
            .with_path_contains("work");
        let matched = MatchEvaluator::new(criteria, Operator::Or)
            .evaluate(&proj())
            .unwrap();
        assert_eq!(matched.path_contains, Some(vec!["work".to_string()]));
        assert!(matched.tags.is_none());
    }

    #[test]
    fn test_and_requires_every_category() {
        let criteria = SearchCriteria::new()
            .with_tag("missing")
            .with_path_contains("work");
        assert!(MatchEvaluator::new(criteria, Operator::And)
            .evaluate(&proj())
            .is_none());
    }

    #[test]
    fn test_exclusion_dominates_both_operators() {
        for operator in [Operator::And, Operator::Or] {
            let criteria = SearchCriteria::new()
                .with_tag("urgent")
                .with_path("work")
                .without_property_value("status", "done");
            assert!(MatchEvaluator::new(criteria, operator)
                .evaluate(&proj())
                .is_none());
        }
    }

    #[test]
    fn test_only_exclusions() {
        let criteria = SearchCriteria::new().without_tag("other");
        let matched = MatchEvaluator::new(criteria, Operator::And)
            .evaluate(&proj())
            .unwrap();
        assert_eq!(matched, MatchedParameters::path_only("work/proj.md"));
    }

    #[test]
    fn test_empty_criteria_matches_everything() {
        let matched = MatchEvaluator::new(SearchCriteria::new(), Operator::Or)
            .evaluate(&proj())
            .unwrap();
        assert_eq!(matched.path.as_deref(), Some("work/proj.md"));
        assert_eq!(matched.categories(), vec![Category::Path]);
    }

    #[test]
    fn test_path_prefix_semantics() {
        let values = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            match_path(&values(&["work"]), "work/proj.md").as_deref(),
            Some("work")
        );
        assert_eq!(
            match_path(&values(&["work/proj.md"]), "work/proj.md").as_deref(),
            Some("work/proj.md")
        );
        assert_eq!(
            match_path(&values(&["work\\"]), "work\\proj.md"),
            None,
            "trailing separator in the criterion never matches"
        );
        assert_eq!(match_path(&values(&["wor"]), "work/proj.md"), None);
        assert_eq!(
            match_path(&values(&["a", "work"]), "work/x/y.md").as_deref(),
            Some("work")
        );
    }

    #[test]
    fn test_tag_normalization() {
        let n = note("a.md", "---\ntags: [\"#a\", b]\n---\n");
        let fm = &n.frontmatter;
        assert_eq!(match_tags(&["a".into()], fm), Some(vec!["a".to_string()]));
        assert_eq!(match_tags(&["#b".into()], fm), Some(vec!["#b".to_string()]));
        assert_eq!(match_tags(&["c".into()], fm), None);

        let scalar = note("s.md", "---\ntags: project\n---\n");
        assert!(match_tags(&["#project".into()], &scalar.frontmatter).is_some());
    }

    #[test]
    fn test_property_value_matching() {
        let n = note(
            "p.md",
            "---\naliases:\n  - One\n  - Two\ndraft: false\ncount: 3\n---\n",
        );
        let fm = &n.frontmatter;
        let pairs = vec![
            PropertyValuePair::new("aliases", "Two"),
            PropertyValuePair::new("draft", "false"),
            PropertyValuePair::new("count", "3"),
            PropertyValuePair::new("aliases", "two"),
            PropertyValuePair::new("missing", "x"),
        ];
        assert_eq!(
            match_property_values(&pairs, fm),
            Some(vec![
                "aliases=Two".to_string(),
                "draft=false".to_string(),
                "count=3".to_string(),
            ])
        );
    }

    #[test]
    fn test_properties_match_regardless_of_value() {
        let n = note("p.md", "---\nempty: []\nflag: false\n---\n");
        assert_eq!(
            match_properties(&["empty".into(), "flag".into(), "nope".into()], &n.frontmatter),
            Some(vec!["empty".to_string(), "flag".to_string()])
        );
    }

    #[test]
    fn test_title_and_content_case_insensitive() {
        let n = proj();
        assert_eq!(
            match_substring(&["PROJ".into()], &n.title),
            Some(vec!["PROJ".to_string()])
        );
        assert_eq!(
            match_substring(&["roadmap".into(), "budget".into()], &n.body),
            Some(vec!["roadmap".to_string()])
        );
        assert_eq!(match_substring(&["x".into()], ""), None);
    }

    #[test]
    fn test_and_with_property_value_needs_one_pair() {
        let criteria = SearchCriteria::new()
            .with_property_value("status", "done")
            .with_property_value("status", "open");
        let matched = MatchEvaluator::new(criteria, Operator::And)
            .evaluate(&proj())
            .unwrap();
        assert_eq!(matched.property_value, Some(vec!["status=done".to_string()]));
    }
}
