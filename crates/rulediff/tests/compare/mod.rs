use super::*;

#[traced_test]
#[test]
fn test_fixture_report() -> TestResult<()> {
  let diff = compare_fixtures(&Config::default())?;
  let report = &diff.report;

  assert!(!report.is_identical());
  assert_eq!(report.protected_matched, 5);
  assert_eq!(report.protected_changed, 2);
  assert_eq!(report.removed, 11);
  assert_eq!(report.only_in_source, 3);
  assert_eq!(report.only_in_target, 4);
  assert_eq!(report.attribute_differences, 0);
  assert_eq!(report.text_differences, 0);
  Ok(())
}

#[traced_test]
#[test]
fn test_fixture_diff_document() -> TestResult<()> {
  let diff = compare_fixtures(&Config::default())?;
  let root = &diff.document.root;

  // Changed protected element keeps its identity and the divergent language
  let author = protected(root, "MetadataType", "Author").expect("Author is kept");
  let languages: Vec<_> = author.child_elements().filter(|c| c.name.local == "language").collect();
  assert_eq!(languages.len(), 1);
  assert_eq!(languages[0].text(), "Verfasser");
  assert!(author.comments().any(|c| c.contains(r#"only in source: <language name="de">Autor</language>"#)));

  // Unchanged protected elements are reduced to their identity
  let title = protected(root, "MetadataType", "TitleDocMain").expect("TitleDocMain is kept");
  assert_eq!(title.child_elements().count(), 1);
  let chapter = protected(root, "DocStrctType", "Chapter").expect("Chapter is kept");
  assert_eq!(chapter.child_elements().count(), 1);

  // New metadata reference in the structure type
  let monograph = protected(root, "DocStrctType", "Monograph").expect("Monograph is kept");
  assert_eq!(monograph.attribute("topStruct"), Some("true"));
  let metadata: Vec<_> = monograph.child_elements().filter(|c| c.name.local == "metadata").collect();
  assert_eq!(metadata.len(), 1);
  assert_eq!(metadata[0].text(), "Illustrator");

  // Added and removed protected elements
  assert!(protected(root, "MetadataType", "Illustrator").is_some());
  assert!(protected(root, "MetadataType", "Obsolete").is_none());
  assert!(root.comments().any(|c| c.contains("MetadataType 'Obsolete' only in source")));
  assert!(root.comments().any(|c| c.contains("MetadataType 'Illustrator' only in target")));

  // Equal non-protected subtrees are gone, changed ones are annotated
  assert!(root.find_child("Formats").is_none());
  assert_eq!(root.find_child("Version").and_then(|v| v.attribute("number")), Some("2"));
  assert!(root.comments().any(|c| c.contains(r#"only in source: <Version number="1"/>"#)));
  Ok(())
}

#[traced_test]
#[test]
fn test_changes_carry_context() -> TestResult<()> {
  let diff = compare_fixtures(&Config::default())?;
  let author = Identity { element: "MetadataType".into(), id: "Author".into() };
  let monograph = Identity { element: "DocStrctType".into(), id: "Monograph".into() };

  let in_author: Vec<_> =
    diff.report.changes.iter().filter(|c| c.context.as_ref() == Some(&author)).collect();
  assert_eq!(in_author.len(), 2);
  assert!(in_author.iter().any(|c| c.kind == ChangeKind::OnlyInSource));
  assert!(in_author.iter().any(|c| c.kind == ChangeKind::OnlyInTarget));

  assert!(diff
    .report
    .changes
    .iter()
    .any(|c| c.context.as_ref() == Some(&monograph) && c.kind == ChangeKind::OnlyInTarget));

  let top_level: Vec<_> = diff.report.changes.iter().filter(|c| c.context.is_none()).map(|c| c.kind).collect();
  assert!(top_level.contains(&ChangeKind::ProtectedOnlyInSource));
  assert!(top_level.contains(&ChangeKind::ProtectedOnlyInTarget));
  Ok(())
}

#[traced_test]
#[test]
fn test_prune_unchanged() -> TestResult<()> {
  let config = Config { prune_unchanged: true, ..Config::default() };
  let diff = compare_fixtures(&config)?;
  let root = &diff.document.root;

  assert!(protected(root, "MetadataType", "Editor").is_none());
  assert!(protected(root, "MetadataType", "TitleDocMain").is_none());
  assert!(protected(root, "DocStrctType", "Chapter").is_none());
  assert!(protected(root, "MetadataType", "Author").is_some());
  assert!(protected(root, "DocStrctType", "Monograph").is_some());
  // Findings do not depend on pruning
  assert_eq!(diff.report, compare_fixtures(&Config::default())?.report);
  Ok(())
}

#[traced_test]
#[test]
fn test_without_protection_everything_is_structural() -> TestResult<()> {
  let config = Config { protected: Vec::new(), ..Config::default() };
  let diff = compare_fixtures(&config)?;

  assert_eq!(diff.report.protected_matched, 0);
  // Editor, Chapter and Formats are equal subtrees and disappear entirely
  let root = &diff.document.root;
  assert!(protected(root, "MetadataType", "Editor").is_none());
  assert!(protected(root, "DocStrctType", "Chapter").is_none());
  // TitleDocMain only changed child order, which is irrelevant
  assert!(protected(root, "MetadataType", "TitleDocMain").is_none());
  // Changed types are replaced as a whole
  assert!(root.comments().any(|c| c.contains("only in source: <MetadataType><Name>Author</Name>")));
  Ok(())
}

#[traced_test]
#[test]
fn test_identical_rulesets() -> TestResult<()> {
  let source = RulesetReader::new(fixture("ruleset_old.xml"));
  let target = RulesetReader::new(fixture("ruleset_old.xml")).into_document()?;
  let mut integrity = Integrity::from_config(&Config::default());
  let diff = compare_documents(source.document()?, target, &mut integrity, &Config::default().options())?;

  assert!(diff.report.is_identical());
  assert_eq!(diff.report.protected_matched, 6);
  assert!(integrity.active_watches().is_empty());
  Ok(())
}

#[traced_test]
#[test]
fn test_written_diff_is_well_formed() -> TestResult<()> {
  let diff = compare_fixtures(&Config::default())?;
  let dir = tempdir()?;
  let path = dir.path().join("diff.xml");
  write_document(&path, &diff.document, 2)?;

  let reread = RulesetReader::new(&path).into_document()?;
  assert_eq!(reread.root.child_elements().count(), diff.document.root.child_elements().count());
  assert!(std::fs::read_to_string(&path)?.contains("<!-- rulediff: MetadataType 'Obsolete' only in source -->"));
  Ok(())
}
