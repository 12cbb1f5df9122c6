//! Integration tests for the vaultnotes library
//!
//! Each test builds a throwaway vault, runs searches through the orchestrator
//! and then acts on the stored results the way the CLI does.

use chrono::{Local, NaiveDate, TimeZone};
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;
use vaultnotes::*;

struct TestVault {
    _temp_dir: TempDir,
    root: PathBuf,
    config: VaultConfig,
}

impl TestVault {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("vault");
        fs::create_dir_all(&root).unwrap();
        let config = VaultConfig::new(&root).with_state_file(temp_dir.path().join("storage/state.json"));
        Self {
            _temp_dir: temp_dir,
            root,
            config,
        }
    }

    fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn write_dated(&self, rel: &str, content: &str, date: &str) -> PathBuf {
        let path = self.write(rel, content);
        set_modified(&path, date);
        path
    }

    fn orchestrator(&self) -> SearchOrchestrator {
        SearchOrchestrator::new(self.config.clone()).unwrap()
    }

    fn ops(&self) -> NoteOperations {
        NoteOperations::new(self.config.clone())
    }

    fn search(&self, request: SearchRequest) -> Vec<SearchResult> {
        self.orchestrator().search(&request).unwrap()
    }
}

fn set_modified(path: &Path, date: &str) {
    let date: NaiveDate = date.parse().unwrap();
    let noon = Local
        .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
        .single()
        .unwrap();
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::from(noon)).unwrap();
}

fn paths(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.relative_path.as_str()).collect()
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_tag_match_records_matched_tag() {
    let vault = TestVault::new();
    vault.write("work/proj.md", "---\ntags: [urgent, review]\n---\nProject notes\n");
    vault.write("home.md", "---\ntags: [later]\n---\n");

    let results = vault.search(SearchRequest::new(SearchCriteria::new().with_tag("urgent")));

    assert_eq!(paths(&results), vec!["work/proj.md"]);
    assert_eq!(
        results[0].matched_parameters.tags,
        Some(vec!["urgent".to_string()])
    );
    assert_eq!(results[0].matched_parameters.path, None);
}

#[test]
fn test_or_records_only_matching_categories() {
    let vault = TestVault::new();
    vault.write("work/proj.md", "---\ntags: [urgent, review]\n---\n");

    let criteria = SearchCriteria::new()
        .with_tag("missing")
        .with_path_contains("work");
    let results = vault.search(SearchRequest::new(criteria).with_operator(Operator::Or));

    assert_eq!(results.len(), 1);
    let matched = &results[0].matched_parameters;
    assert_eq!(matched.path_contains, Some(vec!["work".to_string()]));
    assert_eq!(matched.tags, None);
    assert_eq!(matched.categories(), vec![Category::PathContains]);
}

#[test]
fn test_exclusion_dominates_under_both_operators() {
    let vault = TestVault::new();
    vault.write("done.md", "---\nstatus: done\ntags: [a]\n---\nbody\n");
    vault.write("open.md", "---\nstatus: open\ntags: [a]\n---\nbody\n");

    for operator in [Operator::And, Operator::Or] {
        let criteria = SearchCriteria::new()
            .with_tag("a")
            .with_property("status")
            .with_content("body")
            .without_property_value("status", "done");
        let results = vault.search(SearchRequest::new(criteria).with_operator(operator));
        assert_eq!(paths(&results), vec!["open.md"], "operator {operator}");
    }

    let only_exclusion = SearchCriteria::new().without_property_value("status", "done");
    let results = vault.search(SearchRequest::new(only_exclusion));
    assert_eq!(paths(&results), vec!["open.md"]);
    assert_eq!(
        results[0].matched_parameters,
        MatchedParameters::path_only("open.md")
    );
}

#[test]
fn test_and_requires_every_category() {
    let vault = TestVault::new();
    vault.write(
        "projects/apollo.md",
        "---\ntitle: Apollo Plan\ntags: [\"#space\", b]\nowner: ana\n---\nLaunch window in July\n",
    );
    vault.write("projects/gemini.md", "---\ntitle: Gemini\ntags: [space]\n---\nNothing here\n");

    let criteria = SearchCriteria::new()
        .with_path_contains("projects")
        .with_tag("#space")
        .with_property("owner")
        .with_property_value("owner", "ana")
        .with_property_value("owner", "bob")
        .with_title("apollo")
        .with_content("launch");
    let results = vault.search(SearchRequest::new(criteria.clone()));

    assert_eq!(paths(&results), vec!["projects/apollo.md"]);
    let matched = &results[0].matched_parameters;
    for category in criteria.positive_categories() {
        assert!(matched.contains(category), "missing {}", category.name());
    }
    assert_eq!(matched.tags, Some(vec!["#space".to_string()]));
    assert_eq!(matched.property_value, Some(vec!["owner=ana".to_string()]));
    assert_eq!(matched.title, Some(vec!["apollo".to_string()]));
}

#[test]
fn test_empty_criteria_lists_every_note() {
    let vault = TestVault::new();
    vault.write("a.md", "A");
    vault.write("sub/b.md", "---\ntitle: B\n---\n");
    vault.write("sub/ignored.txt", "not a note");
    vault.write(".hidden/c.md", "hidden");

    let results = vault.search(SearchRequest::default());

    assert_eq!(paths(&results), vec!["a.md", "sub/b.md"]);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.index, i);
        assert_eq!(
            result.matched_parameters,
            MatchedParameters::path_only(result.relative_path.clone())
        );
    }
    assert_eq!(results[0].title, "a");
    assert_eq!(results[1].title, "B");
}

#[test]
fn test_rescan_is_idempotent() {
    let vault = TestVault::new();
    for name in ["c.md", "a.md", "nested/b.md", "nested/deeper/d.md"] {
        vault.write(name, "---\ntags: [x]\n---\ncontent\n");
    }

    let request = SearchRequest::new(SearchCriteria::new().with_tag("x").with_content("content"));
    let first = vault.search(request.clone());
    let second = vault.search(request);

    let summary = |results: &[SearchResult]| -> Vec<(usize, String, MatchedParameters)> {
        results
            .iter()
            .map(|r| (r.index, r.relative_path.clone(), r.matched_parameters.clone()))
            .collect()
    };
    assert_eq!(first.len(), 4);
    assert_eq!(summary(&first), summary(&second));
}

#[test]
fn test_last_n_over_dated_notes() {
    let vault = TestVault::new();
    for day in 1..=5 {
        vault.write_dated(&format!("n{day}.md"), "note", &format!("2024-01-0{day}"));
    }

    let results = vault.search(SearchRequest::default().with_last(2));

    let dates: Vec<String> = results.iter().map(|r| r.display_date()).collect();
    assert_eq!(dates, vec!["2024-01-05", "2024-01-04"]);
    assert_eq!(paths(&results), vec!["n5.md", "n4.md"]);
}

#[test]
fn test_modification_date_range() {
    let vault = TestVault::new();
    for day in 1..=5 {
        vault.write_dated(&format!("n{day}.md"), "note", &format!("2024-01-0{day}"));
    }

    let request = SearchRequest::default().modified_between(
        NaiveDate::from_ymd_opt(2024, 1, 2),
        NaiveDate::from_ymd_opt(2024, 1, 3),
    );
    let results = vault.search(request);

    assert_eq!(paths(&results), vec!["n2.md", "n3.md"]);
    // Indices are assigned before post-filtering
    let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert!(vault.orchestrator().store().lookup_by_index("2").is_ok());
    assert!(vault.orchestrator().store().lookup_by_index("0").is_err());
}

#[test]
fn test_delete_unknown_index_fails_without_removing() {
    let vault = TestVault::new();
    let files: Vec<PathBuf> = (0..4)
        .map(|i| vault.write(&format!("note{i}.md"), "x"))
        .collect();
    assert_eq!(vault.search(SearchRequest::default()).len(), 4);

    let err = vault.ops().resolve_for_delete(&ids(&["1", "7"])).unwrap_err();

    assert!(matches!(err, VaultError::NoteNotFound { .. }));
    assert_eq!(err.to_string(), "Note with ID 7 not found in search results.");
    assert!(files.iter().all(|f| f.exists()));
}

#[test]
fn test_delete_by_index() {
    let vault = TestVault::new();
    let keep = vault.write("keep.md", "---\ntags: [keep]\n---\n");
    let drop_a = vault.write("drop-a.md", "---\ntags: [drop]\n---\n");
    let drop_b = vault.write("sub/drop-b.md", "---\ntags: [drop]\n---\n");

    let results = vault.search(SearchRequest::new(SearchCriteria::new().with_tag("drop")));
    assert_eq!(paths(&results), vec!["drop-a.md", "sub/drop-b.md"]);

    let ops = vault.ops();
    let targets = ops.resolve_for_delete(&ids(&["0", "1"])).unwrap();
    let outcome = ops.delete(&targets);

    assert_eq!(
        outcome,
        BatchOutcome {
            success: true,
            errors: vec![]
        }
    );
    assert!(keep.exists());
    assert!(!drop_a.exists());
    assert!(!drop_b.exists());
}

#[test]
fn test_modify_by_index_round_trips_through_search() {
    let vault = TestVault::new();
    let note = vault.write(
        "tasks/report.md",
        "---\ntitle: Report\ntags: [todo, \"#draft\"]\nstatus: open\n---\nFirst draft\n",
    );

    vault.search(SearchRequest::new(SearchCriteria::new().with_tag("todo")));

    let request = ModifyRequest {
        property_values: vec![
            PropertyValuePair::new("status", "done"),
            PropertyValuePair::new("reviewers", "ana,bob"),
        ],
        add_tags: vec!["#final".to_string()],
        remove_tags: vec!["todo".to_string()],
        ..Default::default()
    };
    let outcome = vault.ops().modify(&ids(&["0"]), &request).unwrap();
    assert!(outcome.success);

    assert_eq!(
        fs::read_to_string(&note).unwrap(),
        "---\ntitle: Report\ntags:\n  - \"#draft\"\n  - final\nstatus: done\nreviewers:\n  - ana\n  - bob\n---\nFirst draft\n"
    );

    let results = vault.search(SearchRequest::new(
        SearchCriteria::new()
            .with_tag("final")
            .with_property_value("status", "done")
            .with_property_value("reviewers", "bob"),
    ));
    assert_eq!(paths(&results), vec!["tasks/report.md"]);
}

#[test]
fn test_modify_without_prior_search() {
    let vault = TestVault::new();
    vault.write("a.md", "A");

    let err = vault
        .ops()
        .modify(&ids(&["0"]), &ModifyRequest::default())
        .unwrap_err();
    assert!(matches!(err, VaultError::NoResults));
}

#[test]
fn test_created_notes_are_searchable() {
    let vault = TestVault::new();
    vault.write(
        "templates/daily.md",
        "---\ntitle: Daily\ntags: [daily]\nmood: \"{{mood}}\"\n---\nToday felt {{mood}}.\n",
    );

    let ops = vault.ops();
    let created = ops
        .create(&NewNote {
            path: "inbox".to_string(),
            title: "Call the bank".to_string(),
            tags: vec!["#errand".to_string()],
            property_values: vec![PropertyValuePair::new("due", "friday")],
            content: Some("Ask about fees".to_string()),
        })
        .unwrap();
    assert_eq!(created.relative_path, "inbox/Call the bank.md");

    let from_template = ops
        .create_from_template(&TemplateNote {
            path: "journal".to_string(),
            title: "Monday, 1st".to_string(),
            template: PathBuf::from("templates/daily.md"),
            replacements: vec![PropertyValuePair::new("mood", "great")],
        })
        .unwrap();
    assert_eq!(from_template.relative_path, "journal/monday-1st.md");

    let results = vault.search(
        SearchRequest::new(
            SearchCriteria::new()
                .with_tag("errand")
                .with_property_value("mood", "great"),
        )
        .with_operator(Operator::Or),
    );
    assert_eq!(
        paths(&results),
        vec!["inbox/Call the bank.md", "journal/monday-1st.md"]
    );
    assert_eq!(results[1].title, "Monday, 1st");

    let doc = Document::parse(&fs::read_to_string(&from_template.full_path).unwrap());
    assert_eq!(doc.body(), "Today felt great.\n");
}

#[test]
fn test_unreadable_state_behaves_as_empty() {
    let vault = TestVault::new();
    vault.write("a.md", "A");
    let state = vault.config.state_file().to_path_buf();
    fs::create_dir_all(state.parent().unwrap()).unwrap();
    fs::write(&state, "{ not json").unwrap();

    let err = vault.ops().resolve_for_delete(&ids(&["0"])).unwrap_err();
    assert!(matches!(err, VaultError::NoResults));

    vault.search(SearchRequest::default());
    assert_eq!(vault.ops().resolve_for_delete(&ids(&["0"])).unwrap().len(), 1);
}

#[test]
fn test_unreadable_note_is_skipped() {
    let vault = TestVault::new();
    vault.write("a.md", "---\ntags: [x]\n---\n");
    fs::write(vault.root.join("broken.md"), [0xff, 0xfe, 0x00, 0xc3, 0x28]).unwrap();
    vault.write("c.md", "---\ntags: [x]\n---\n");

    let results = vault.search(SearchRequest::default());

    assert_eq!(paths(&results), vec!["a.md", "c.md"]);
    let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn test_modify_keeps_frontmatter_order() {
    let vault = TestVault::new();
    let note = vault.write("order.md", "---\ntags: [a]\ntitle: T\nstatus: x\n---\nbody");
    vault.search(SearchRequest::default());

    let request = ModifyRequest {
        content: Some("new".to_string()),
        ..Default::default()
    };
    assert!(vault.ops().modify(&ids(&["0"]), &request).unwrap().success);
    assert_eq!(
        fs::read_to_string(&note).unwrap(),
        "---\ntags:\n  - a\ntitle: T\nstatus: x\n---\nnew"
    );

    let request = ModifyRequest {
        add_tags: vec!["b".to_string()],
        property_values: vec![PropertyValuePair::new("status", "done")],
        ..Default::default()
    };
    assert!(vault.ops().modify(&ids(&["0"]), &request).unwrap().success);
    assert_eq!(
        fs::read_to_string(&note).unwrap(),
        "---\ntags:\n  - a\n  - b\ntitle: T\nstatus: done\n---\nnew"
    );
}

#[cfg(unix)]
#[test]
fn test_modify_keeps_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let vault = TestVault::new();
    let note = vault.write("shared.md", "---\ntitle: Shared\n---\n");
    fs::set_permissions(&note, fs::Permissions::from_mode(0o644)).unwrap();
    vault.search(SearchRequest::default());

    let request = ModifyRequest {
        add_tags: vec!["x".to_string()],
        ..Default::default()
    };
    assert!(vault.ops().modify(&ids(&["0"]), &request).unwrap().success);

    let mode = fs::metadata(&note).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[test]
fn test_windows_path_property_matches_as_written() {
    let vault = TestVault::new();
    vault.write("win.md", "---\npath: \"C:\\new\"\n---\n");

    let results = vault.search(SearchRequest::new(
        SearchCriteria::new().with_property_value("path", "C:\\new"),
    ));
    assert_eq!(paths(&results), vec!["win.md"]);
}
