//! Lifecycle Integration Tests
//!
//! Copy, rename, delete and merge against an in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::domain::{DomainError, FileId, Tag, TagId, NO_VALUE};
    use crate::lifecycle::{MergeWarning, TagLifecycleOperations, ValueLifecycleOperations};
    use crate::repository::{NamedRepository, Repository, Store};

    fn setup_test_db() -> Store {
        Store::open_in_memory().expect("Failed to init test DB")
    }

    fn tag_with_files(store: &Store, name: &str, files: &[FileId]) -> Tag {
        let tag = store.tags().insert(name).expect("Failed to create tag");
        for &file_id in files {
            store.file_tags().add(file_id, tag.id, NO_VALUE).unwrap();
        }
        tag
    }

    fn files_of(store: &Store, tag_id: TagId) -> Vec<FileId> {
        let mut files: Vec<FileId> = store
            .file_tags()
            .by_tag(tag_id)
            .unwrap()
            .into_iter()
            .map(|ft| ft.file_id)
            .collect();
        files.dedup();
        files
    }

    fn edges(store: &Store) -> Vec<(String, String)> {
        let mut edges: Vec<_> = store
            .implications()
            .all()
            .unwrap()
            .into_iter()
            .map(|i| (i.implying_tag.name, i.implied_tag.name))
            .collect();
        edges.sort();
        edges
    }

    // ========================
    // Merge
    // ========================

    #[test]
    fn test_merge_misspelled_tag() {
        let mut store = setup_test_db();
        let cheese = tag_with_files(&store, "cheese", &[1]);
        tag_with_files(&store, "cehese", &[2]);

        let report = store.merge_tags(&["cehese"], "cheese").expect("Merge failed");

        assert!(!report.completed_with_warnings());
        assert_eq!(report.destination, cheese);
        assert_eq!(report.merged.len(), 1);
        assert!(store.tags().find_by_name("cehese").unwrap().is_none());
        assert_eq!(files_of(&store, cheese.id), vec![1, 2]);
    }

    #[test]
    fn test_merge_skips_missing_and_self() {
        let mut store = setup_test_db();
        let cheese = tag_with_files(&store, "cheese", &[1, 3]);

        let report = store.merge_tags(&["ghost", "cheese"], "cheese").expect("Merge failed");

        assert!(report.completed_with_warnings());
        assert!(report.merged.is_empty());
        assert_eq!(
            report.warnings,
            vec![
                MergeWarning::NoSuchTag("ghost".to_string()),
                MergeWarning::IntoItself("cheese".to_string()),
            ]
        );
        assert_eq!(store.tags().find_by_name("cheese").unwrap(), Some(cheese.clone()));
        assert_eq!(files_of(&store, cheese.id), vec![1, 3]);
    }

    #[test]
    fn test_merge_applies_resolvable_sources_despite_warnings() {
        let mut store = setup_test_db();
        let outdoor = tag_with_files(&store, "outdoor", &[1]);
        tag_with_files(&store, "outdoors", &[2]);
        tag_with_files(&store, "outside", &[3]);

        let report = store
            .merge_tags(&["outdoors", "nowhere", "outside"], "outdoor")
            .unwrap();

        let merged: Vec<&str> = report.merged.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(merged, vec!["outdoors", "outside"]);
        assert_eq!(report.warnings, vec![MergeWarning::NoSuchTag("nowhere".to_string())]);
        assert_eq!(files_of(&store, outdoor.id), vec![1, 2, 3]);
        assert_eq!(store.tags().count().unwrap(), 1);
    }

    #[test]
    fn test_merge_into_missing_destination_fails() {
        let mut store = setup_test_db();
        let cehese = tag_with_files(&store, "cehese", &[2]);

        let err = store.merge_tags(&["cehese"], "cheese").unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(files_of(&store, cehese.id), vec![2]);
    }

    #[test]
    fn test_merge_preserves_values() {
        let mut store = setup_test_db();
        let dest = tag_with_files(&store, "year", &[]);
        let source = tag_with_files(&store, "yaer", &[]);
        let v = store.values().insert("2024").unwrap();
        store.file_tags().add(5, source.id, v.id).unwrap();

        store.merge_tags(&["yaer"], "year").unwrap();

        let file_tags = store.file_tags().by_tag(dest.id).unwrap();
        assert_eq!(file_tags.len(), 1);
        assert_eq!(file_tags[0].file_id, 5);
        assert_eq!(file_tags[0].value_id, v.id);
    }

    #[test]
    fn test_merge_does_not_tag_files_of_implying_tags() {
        let mut store = setup_test_db();
        let cheese = tag_with_files(&store, "cheese", &[1]);
        let cehese = tag_with_files(&store, "cehese", &[2]);
        let brie = tag_with_files(&store, "brie", &[3]);
        let soft = tag_with_files(&store, "soft-brie", &[4]);
        store.implications().add(brie.id, cehese.id).unwrap();
        store.implications().add(soft.id, brie.id).unwrap();

        store.merge_tags(&["cehese"], "cheese").unwrap();

        assert_eq!(files_of(&store, cheese.id), vec![1, 2]);
        assert_eq!(files_of(&store, brie.id), vec![3]);
        assert_eq!(files_of(&store, soft.id), vec![4]);
        let closure = store.implications().for_tags(&[soft.id]).unwrap();
        assert!(closure.implies(cheese.id));
    }

    #[test]
    fn test_merge_moves_implications_to_destination() {
        let mut store = setup_test_db();
        let cheese = tag_with_files(&store, "cheese", &[]);
        let cehese = tag_with_files(&store, "cehese", &[]);
        let dairy = tag_with_files(&store, "dairy", &[]);
        let brie = tag_with_files(&store, "brie", &[]);
        store.implications().add(cehese.id, dairy.id).unwrap();
        store.implications().add(brie.id, cehese.id).unwrap();
        store.implications().add(cheese.id, cehese.id).unwrap();

        store.merge_tags(&["cehese"], "cheese").unwrap();

        assert_eq!(
            edges(&store),
            vec![
                ("brie".to_string(), "cheese".to_string()),
                ("cheese".to_string(), "dairy".to_string()),
            ]
        );
        let closure = store.implications().for_tags(&[brie.id]).unwrap();
        assert!(closure.implies(dairy.id));
    }

    #[test]
    fn test_merge_rolls_back_on_storage_error() {
        let mut store = setup_test_db();
        let cheese = tag_with_files(&store, "cheese", &[1]);
        tag_with_files(&store, "cehese", &[2]);
        tag_with_files(&store, "stuck", &[3]);
        store
            .conn()
            .execute_batch(
                "CREATE TRIGGER refuse_stuck BEFORE DELETE ON tag
                 WHEN OLD.name = 'stuck'
                 BEGIN SELECT RAISE(ABORT, 'stuck'); END;",
            )
            .unwrap();

        let err = store.merge_tags(&["cehese", "stuck"], "cheese").unwrap_err();

        assert!(matches!(err, DomainError::Storage(_)));
        assert!(store.tags().find_by_name("cehese").unwrap().is_some());
        assert_eq!(files_of(&store, cheese.id), vec![1]);
    }

    #[test]
    fn test_merge_report_serializes_warnings() {
        let mut store = setup_test_db();
        tag_with_files(&store, "cheese", &[]);

        let report = store.merge_tags(&["ghost"], "cheese").unwrap();
        let json = serde_json::to_value(&report.warnings).unwrap();

        assert_eq!(json, serde_json::json!([{ "kind": "no_such_tag", "tag": "ghost" }]));
        assert_eq!(report.warnings[0].to_string(), "no such tag 'ghost'");
    }

    // ========================
    // Copy / rename / delete
    // ========================

    #[test]
    fn test_copy_tag_duplicates_file_tags() {
        let mut store = setup_test_db();
        let source = tag_with_files(&store, "photo", &[1, 2]);
        let v = store.values().insert("raw").unwrap();
        store.file_tags().add(3, source.id, v.id).unwrap();

        let copy = store.copy_tag(source.id, "picture").expect("Copy failed");

        assert_ne!(copy.id, source.id);
        assert_eq!(files_of(&store, copy.id), vec![1, 2, 3]);
        assert_eq!(files_of(&store, source.id), vec![1, 2, 3]);
        assert_eq!(store.file_tags().by_value(v.id).unwrap().len(), 2);
    }

    #[test]
    fn test_copy_tag_validates_and_requires_source() {
        let mut store = setup_test_db();
        let source = tag_with_files(&store, "photo", &[1]);

        assert!(matches!(
            store.copy_tag(source.id, "two words"),
            Err(DomainError::InvalidName { .. })
        ));
        assert!(matches!(store.copy_tag(999, "picture"), Err(DomainError::NotFound(_))));
        assert!(matches!(store.copy_tag(source.id, "photo"), Err(DomainError::Storage(_))));
        assert_eq!(store.tags().count().unwrap(), 1);
    }

    #[test]
    fn test_rename_tag_requires_existing_tag() {
        let mut store = setup_test_db();
        let tag = tag_with_files(&store, "cehese", &[]);

        assert!(matches!(store.rename_tag(404, "x"), Err(DomainError::NotFound(_))));
        assert!(matches!(store.rename_tag(tag.id, "or"), Err(DomainError::InvalidName { .. })));

        let renamed = store.rename_tag(tag.id, "cheese").unwrap();
        assert_eq!(renamed, Tag::new(tag.id, "cheese"));
    }

    #[test]
    fn test_delete_tag_leaves_no_dangling_references() {
        let mut store = setup_test_db();
        let a = tag_with_files(&store, "a", &[1]);
        let b = tag_with_files(&store, "b", &[1, 2]);
        let c = tag_with_files(&store, "c", &[]);
        store.implications().add(a.id, b.id).unwrap();
        store.implications().add(b.id, c.id).unwrap();
        store.implications().add(a.id, c.id).unwrap();

        store.delete_tag(b.id).expect("Delete failed");

        assert!(store.tags().find_by_id(b.id).unwrap().is_none());
        assert!(store.file_tags().by_tag(b.id).unwrap().is_empty());
        assert_eq!(edges(&store), vec![("a".to_string(), "c".to_string())]);
        assert_eq!(files_of(&store, a.id), vec![1]);

        store.delete_tag(b.id).expect("Deleting again should succeed");
    }

    // ========================
    // Values
    // ========================

    #[test]
    fn test_delete_and_rename_value() {
        let mut store = setup_test_db();
        let tag = tag_with_files(&store, "year", &[1]);
        let v = store.values().insert("1999").unwrap();
        store.file_tags().add(2, tag.id, v.id).unwrap();

        let renamed = store.rename_value(v.id, "2000").unwrap();
        assert_eq!(renamed.name, "2000");
        assert!(matches!(store.rename_value(NO_VALUE, "x"), Err(DomainError::NotFound(_))));
        assert!(matches!(store.rename_value(v.id, "a,b"), Err(DomainError::InvalidName { .. })));

        store.delete_value(v.id).unwrap();
        assert!(store.values().find_by_id(v.id).unwrap().is_none());
        assert_eq!(files_of(&store, tag.id), vec![1]);
    }
}
