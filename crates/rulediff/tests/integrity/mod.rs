use super::*;

#[traced_test]
#[test]
fn test_protected_elements_of_fixture() -> TestResult<()> {
  let reader = RulesetReader::new(fixture("ruleset_new.xml"));
  let integrity = Integrity::from_config(&Config::default());
  let found = integrity.protected_elements(reader.document()?);

  let ids: Vec<_> = found.iter().map(|p| p.identity.to_string()).collect();
  assert_eq!(ids, vec![
    "MetadataType 'Author'",
    "MetadataType 'Editor'",
    "MetadataType 'TitleDocMain'",
    "MetadataType 'Illustrator'",
    "DocStrctType 'Monograph'",
    "DocStrctType 'Chapter'",
  ]);
  assert!(found.iter().all(|p| p.path.starts_with("Preferences/")));
  Ok(())
}

#[traced_test]
#[test]
fn test_custom_class_reaches_into_formats() -> TestResult<()> {
  let reader = RulesetReader::new(fixture("ruleset_old.xml"));
  let integrity = Integrity::new().with_class(ProtectedClass::new("Metadata", "Name"));
  let found = integrity.protected_elements(reader.document()?);

  assert_eq!(found.len(), 1);
  assert_eq!(found[0].path, "Preferences/Formats/PicaPlus/Metadata");
  assert!(integrity.contains_protected(&reader.document()?.root));
  Ok(())
}

#[traced_test]
#[test]
fn test_duplicates_fixture() -> TestResult<()> {
  let reader = RulesetReader::new(fixture("ruleset_duplicates.xml"));
  let integrity = Integrity::from_config(&Config::default());
  let duplicates = integrity.duplicates(reader.document()?);

  assert_eq!(duplicates.len(), 1);
  assert_eq!(duplicates[0].identity.to_string(), "MetadataType 'Author'");
  assert_eq!(duplicates[0].occurrences, 2);

  let clean = RulesetReader::new(fixture("ruleset_old.xml"));
  assert!(integrity.duplicates(clean.document()?).is_empty());
  Ok(())
}
