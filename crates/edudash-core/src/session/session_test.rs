#[cfg(test)]
mod tests {
    use crate::error::{DashError, SessionError};
    use crate::gateway::{PersistenceGateway, RecordKey};
    use crate::record::{Record, Value};
    use crate::schema::{FieldSpec, RecordSchema};
    use crate::session::{
        ListSession, ListSpec, NoticeLevel, RecordSession, SaveOutcome, SaveStart, SessionState,
    };
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    // Mock gateway for testing
    struct MockGateway {
        records: Mutex<HashMap<RecordKey, Record>>,
        save_calls: Mutex<usize>,
        fail_with: Option<String>,
    }

    impl MockGateway {
        fn new() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
                save_calls: Mutex::new(0),
                fail_with: None,
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                fail_with: Some(reason.to_string()),
                ..Self::new()
            }
        }

        fn save_calls(&self) -> usize {
            *self.save_calls.lock().unwrap()
        }

        fn stored(&self, key: &RecordKey) -> Option<Record> {
            self.records.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait::async_trait]
    impl PersistenceGateway for MockGateway {
        async fn load(&self, key: &RecordKey) -> crate::error::Result<Option<Record>> {
            Ok(self.records.lock().unwrap().get(key).cloned())
        }

        async fn save(&self, key: &RecordKey, record: &Record) -> crate::error::Result<()> {
            *self.save_calls.lock().unwrap() += 1;
            if let Some(reason) = &self.fail_with {
                return Err(DashError::data_access(reason.clone()));
            }
            self.records
                .lock()
                .unwrap()
                .insert(key.clone(), record.clone());
            Ok(())
        }

        async fn list(&self, collection: &str) -> crate::error::Result<Vec<Record>> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|(k, _)| k.collection == collection)
                .map(|(_, r)| r.clone())
                .collect())
        }

        async fn delete(&self, key: &RecordKey) -> crate::error::Result<()> {
            self.records.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn course_schema() -> Arc<RecordSchema> {
        Arc::new(
            RecordSchema::new("course")
                .field(FieldSpec::text("title").required())
                .field(FieldSpec::number("fee").required())
                .field(FieldSpec::text("description")),
        )
    }

    fn course_key() -> RecordKey {
        RecordKey::new("courses", "c-1")
    }

    fn course_session() -> RecordSession {
        let record = Record::new()
            .with("id", "c-1")
            .with("title", "A")
            .with("fee", 100.0);
        RecordSession::for_record(course_key(), course_schema(), record)
    }

    fn benefit_spec() -> ListSpec {
        let schema = RecordSchema::new("benefit")
            .field(FieldSpec::text("title").required())
            .field(FieldSpec::text("description"));
        ListSpec::new(Arc::new(schema), "b")
    }

    fn benefits_session() -> ListSession {
        let items = vec![Record::new().with("id", "b_1").with("title", "X")];
        ListSession::for_items(RecordKey::new("course_benefits", "c-1"), benefit_spec(), items)
    }

    #[test]
    fn test_initial_state_is_viewing() {
        let session = course_session();
        assert_eq!(session.state(), SessionState::Viewing);
        assert_eq!(session.working(), session.snapshot());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_cancel_without_edit_is_noop() {
        let mut session = course_session();
        let before = session.working().clone();

        session.cancel().unwrap();

        assert_eq!(session.state(), SessionState::Viewing);
        assert_eq!(session.working(), &before);
        assert_eq!(session.snapshot(), &before);
    }

    #[test]
    fn test_cancel_restores_original_after_any_edits() {
        let mut session = course_session();
        let original = session.working().clone();

        session.start_edit().unwrap();
        session.set_field("title", "B").unwrap();
        session.set_field("fee", "").unwrap();
        session.set_field("description", "new").unwrap();
        session.set_field("title", "C").unwrap();
        assert!(session.is_dirty());

        session.cancel().unwrap();

        assert_eq!(session.state(), SessionState::Viewing);
        assert_eq!(session.working(), &original);
        assert_eq!(session.field("title"), Some(&Value::from("A")));
    }

    #[test]
    fn test_field_changes_rejected_outside_editing() {
        let mut session = course_session();
        let err = session.set_field("title", "B").unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                state: SessionState::Viewing,
                action: "edit a field",
            }
        );
    }

    #[test]
    fn test_id_and_unknown_fields_are_not_editable() {
        let mut session = course_session();
        session.start_edit().unwrap();

        assert_eq!(
            session.set_field("id", "c-2").unwrap_err(),
            SessionError::ImmutableField("id".to_string())
        );
        assert_eq!(
            session.set_field("color", "red").unwrap_err(),
            SessionError::UnknownField("color".to_string())
        );
        assert!(session.working().same_shape(session.snapshot()));
    }

    #[test]
    fn test_start_edit_while_editing_keeps_edits() {
        let mut session = course_session();
        session.start_edit().unwrap();
        session.set_field("title", "B").unwrap();

        session.start_edit().unwrap();

        assert_eq!(session.field("title"), Some(&Value::from("B")));
    }

    #[tokio::test]
    async fn test_successful_save_promotes_working_copy() {
        let gateway = MockGateway::new();
        let mut session = course_session();

        session.start_edit().unwrap();
        session.set_field("title", "B").unwrap();
        session.set_field("fee", 120.0).unwrap();
        let expected = session.working().clone();

        let outcome = session.save(&gateway).await.unwrap();

        assert!(outcome.is_saved());
        assert_eq!(session.state(), SessionState::Viewing);
        assert_eq!(session.snapshot(), &expected);
        assert_eq!(session.working(), &expected);
        assert_eq!(gateway.stored(&course_key()), Some(expected));
        assert_eq!(gateway.save_calls(), 1);

        let notice = session.take_notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert!(session.take_notice().is_none());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_edits_and_stays_editing() {
        let gateway = MockGateway::failing("network unreachable");
        let mut session = course_session();
        let original = session.snapshot().clone();

        session.start_edit().unwrap();
        session.set_field("title", "B").unwrap();

        let outcome = session.save(&gateway).await.unwrap();

        match outcome {
            SaveOutcome::Failed(err) => {
                assert_eq!(err.key, course_key());
                assert!(err.reason.contains("network unreachable"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Editing);
        assert_eq!(session.field("title"), Some(&Value::from("B")));
        assert_eq!(session.snapshot(), &original);
        assert_eq!(gateway.save_calls(), 1);

        let notice = session.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Failure);
        assert!(notice.message.contains("network unreachable"));
    }

    #[tokio::test]
    async fn test_validation_blocks_save_and_names_field() {
        let gateway = MockGateway::new();
        let mut session = course_session();

        session.start_edit().unwrap();
        session.set_field("fee", "").unwrap();

        let outcome = session.save(&gateway).await.unwrap();

        match outcome {
            SaveOutcome::Invalid(err) => assert_eq!(err.fields(), vec!["fee"]),
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Editing);
        assert_eq!(gateway.save_calls(), 0);
        assert!(session.notice().unwrap().message.contains("fee"));
    }

    #[tokio::test]
    async fn test_non_numeric_fee_blocks_save() {
        let gateway = MockGateway::new();
        let mut session = course_session();

        session.start_edit().unwrap();
        session.set_field("fee", "a hundred").unwrap();

        let outcome = session.save(&gateway).await.unwrap();
        assert!(matches!(outcome, SaveOutcome::Invalid(_)));
        assert_eq!(gateway.save_calls(), 0);
    }

    #[tokio::test]
    async fn test_save_requires_editing() {
        let gateway = MockGateway::new();
        let mut session = course_session();

        let err = session.save(&gateway).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
        assert_eq!(gateway.save_calls(), 0);
    }

    #[test]
    fn test_saving_disables_editors_and_second_save() {
        let mut session = course_session();
        session.start_edit().unwrap();

        let pending = match session.begin_save().unwrap() {
            SaveStart::Ready(pending) => pending,
            SaveStart::Invalid(err) => panic!("unexpected validation error: {}", err),
        };
        assert_eq!(session.state(), SessionState::Saving);
        assert!(!session.state().accepts_edits());

        assert!(session.begin_save().is_err());
        assert!(session.set_field("title", "B").is_err());
        assert!(session.cancel().is_err());
        assert!(session.start_edit().is_err());

        let outcome = session.complete_save(pending, Ok(())).unwrap();
        assert!(outcome.is_saved());
        assert_eq!(session.state(), SessionState::Viewing);
    }

    #[test]
    fn test_reload_invalidates_in_flight_save() {
        let mut session = course_session();
        session.start_edit().unwrap();
        session.set_field("title", "B").unwrap();
        let pending = match session.begin_save().unwrap() {
            SaveStart::Ready(pending) => pending,
            SaveStart::Invalid(err) => panic!("unexpected validation error: {}", err),
        };

        let fresh = Record::new().with("id", "c-1").with("title", "Z").with("fee", 5.0);
        session.reload_record(fresh);

        assert_eq!(session.state(), SessionState::Viewing);
        assert_eq!(session.field("title"), Some(&Value::from("Z")));
        assert_eq!(
            session.complete_save(pending, Ok(())).unwrap_err(),
            SessionError::StaleSave
        );
        assert_eq!(session.field("title"), Some(&Value::from("Z")));
    }

    #[test]
    fn test_loaded_record_is_conformed_to_schema() {
        let session = RecordSession::for_record(
            course_key(),
            course_schema(),
            Record::new().with("id", "c-1").with("title", "A"),
        );
        assert_eq!(session.field("fee"), Some(&Value::Absent));
        assert_eq!(session.field("description"), Some(&Value::Absent));
    }

    #[test]
    fn test_list_add_then_remove_restores_content() {
        let mut session = benefits_session();
        session.start_edit().unwrap();
        let before = session.working().clone();

        let id = session.add().unwrap();
        assert_eq!(session.items().len(), 2);
        assert!(session.remove(&id).unwrap());

        assert_eq!(session.working(), &before);
    }

    #[test]
    fn test_list_add_and_remove_original() {
        let mut session = benefits_session();
        session.start_edit().unwrap();

        let new_id = session.add().unwrap();
        assert_eq!(session.items().len(), 2);
        assert_ne!(new_id, "b_1");
        assert_eq!(session.items()[1].id("id"), Some(new_id.clone()));

        assert!(session.remove("b_1").unwrap());

        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].id("id"), Some(new_id));
    }

    #[test]
    fn test_list_remove_unknown_id_is_noop() {
        let mut session = benefits_session();
        session.start_edit().unwrap();
        assert!(!session.remove("b_404").unwrap());
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn test_list_changes_require_editing() {
        let mut session = benefits_session();
        assert!(session.add().is_err());
        assert!(session.remove("b_1").is_err());
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn test_list_set_item_field() {
        let mut session = benefits_session();
        session.start_edit().unwrap();

        session.set_item_field("b_1", "title", "Y").unwrap();
        assert_eq!(
            session.item("b_1").unwrap().get("title"),
            Some(&Value::from("Y"))
        );
        assert_eq!(
            session.set_item_field("b_9", "title", "Y").unwrap_err(),
            SessionError::UnknownItem("b_9".to_string())
        );
        assert_eq!(
            session.set_item_field("b_1", "id", "b_2").unwrap_err(),
            SessionError::ImmutableField("id".to_string())
        );
    }

    #[test]
    fn test_list_sort_by_id_suffix() {
        let items = vec![
            Record::new().with("id", "b_30").with("title", "third"),
            Record::new().with("id", "b_4").with("title", "first"),
            Record::new().with("id", "b_12").with("title", "second"),
        ];
        let mut session =
            ListSession::for_items(RecordKey::new("course_benefits", "c-1"), benefit_spec(), items);
        session.start_edit().unwrap();

        session.sort_by_id_suffix().unwrap();

        let ids: Vec<String> = session.items().iter().filter_map(|i| i.id("id")).collect();
        assert_eq!(ids, vec!["b_4", "b_12", "b_30"]);
    }

    #[test]
    fn test_list_cancel_discards_added_items() {
        let mut session = benefits_session();
        session.start_edit().unwrap();
        session.add().unwrap();
        session.add().unwrap();

        session.cancel().unwrap();

        assert_eq!(session.items().len(), 1);
        assert_eq!(session.state(), SessionState::Viewing);
    }

    #[tokio::test]
    async fn test_list_save_persists_whole_list() {
        let gateway = MockGateway::new();
        let mut session = benefits_session();
        session.start_edit().unwrap();
        let id = session.add().unwrap();
        session.set_item_field(&id, "title", "Mentorship").unwrap();

        let outcome = session.save(&gateway).await.unwrap();
        assert!(outcome.is_saved());

        let stored = gateway.stored(session.key()).unwrap();
        assert_eq!(stored.id("id").as_deref(), Some(session.key().id.as_str()));
        let items = stored.get("items").and_then(Value::as_list).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].get("title"), Some(&Value::from("Mentorship")));
        assert_eq!(gateway.save_calls(), 1);
    }

    #[tokio::test]
    async fn test_list_validation_names_item_field() {
        let gateway = MockGateway::new();
        let mut session = benefits_session();
        session.start_edit().unwrap();
        session.add().unwrap();

        let outcome = session.save(&gateway).await.unwrap();

        match outcome {
            SaveOutcome::Invalid(err) => assert_eq!(err.fields(), vec!["items[1].title"]),
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Editing);
        assert_eq!(gateway.save_calls(), 0);
    }

    #[test]
    fn test_list_from_document() {
        let document = Record::new().with(
            "items",
            vec![
                Record::new().with("id", "faq_1").with("title", "Q1"),
                Record::new().with("id", "faq_2").with("title", "Q2"),
            ],
        );
        let session = ListSession::from_document(
            RecordKey::new("faqs", "home"),
            benefit_spec(),
            &document,
        );
        assert_eq!(session.items().len(), 2);
        assert_eq!(
            session.items()[0].get("description"),
            Some(&Value::Absent)
        );
    }

    #[tokio::test]
    async fn test_reload_discards_previous_notice() {
        let gateway = MockGateway::new();
        let mut session = course_session();
        session.start_edit().unwrap();
        session.set_field("title", "B").unwrap();
        assert!(session.save(&gateway).await.unwrap().is_saved());
        assert!(session.notice().is_some());

        let fresh = Record::new().with("id", "c-1").with("title", "Z").with("fee", 5.0);
        session.reload_record(fresh);

        assert!(session.notice().is_none());
    }

    #[test]
    fn test_list_add_after_stored_id_at_counter_limit() {
        let stored_id = format!("b_{}", u64::MAX);
        let items = vec![Record::new().with("id", stored_id.as_str()).with("title", "X")];
        let mut session =
            ListSession::for_items(RecordKey::new("course_benefits", "c-1"), benefit_spec(), items);
        session.start_edit().unwrap();

        let first = session.add().unwrap();
        let second = session.add().unwrap();

        assert!(first.starts_with("b_"));
        assert_ne!(first, stored_id);
        assert_ne!(first, second);
        assert_eq!(session.items().len(), 3);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Edit {
            Title(String),
            Fee(Value),
            Description(String),
        }

        impl Edit {
            fn field(&self) -> &'static str {
                match self {
                    Edit::Title(_) => "title",
                    Edit::Fee(_) => "fee",
                    Edit::Description(_) => "description",
                }
            }

            fn value(&self) -> Value {
                match self {
                    Edit::Title(s) | Edit::Description(s) => Value::from(s.as_str()),
                    Edit::Fee(v) => v.clone(),
                }
            }
        }

        /// Any edit, including blanks and text that is not a number.
        fn any_edit() -> impl Strategy<Value = Edit> {
            prop_oneof![
                ".{0,12}".prop_map(Edit::Title),
                prop_oneof![
                    (0.0..1e6f64).prop_map(Value::Number),
                    "[a-z0-9 ]{0,6}".prop_map(Value::Text),
                ]
                .prop_map(Edit::Fee),
                ".{0,24}".prop_map(Edit::Description),
            ]
        }

        /// Edits that keep the course record valid.
        fn valid_edit() -> impl Strategy<Value = Edit> {
            prop_oneof![
                "[A-Za-z][A-Za-z ]{0,11}".prop_map(Edit::Title),
                (0.0..1e6f64).prop_map(|n| Edit::Fee(Value::Number(n))),
                ".{0,24}".prop_map(Edit::Description),
            ]
        }

        fn any_record() -> impl Strategy<Value = Record> {
            ("[A-Za-z][A-Za-z ]{0,11}", 0.0..1e6f64, proptest::option::of(".{0,24}")).prop_map(
                |(title, fee, description)| {
                    let record = Record::new()
                        .with("id", "c-1")
                        .with("title", title)
                        .with("fee", fee);
                    match description {
                        Some(text) => record.with("description", text),
                        None => record,
                    }
                },
            )
        }

        proptest! {
            #[test]
            fn cancel_restores_snapshot_after_any_edits(
                record in any_record(),
                edits in proptest::collection::vec(any_edit(), 0..16),
            ) {
                let mut session = RecordSession::for_record(course_key(), course_schema(), record);
                let original = session.snapshot().clone();

                session.start_edit().unwrap();
                for edit in &edits {
                    session.set_field(edit.field(), edit.value()).unwrap();
                }
                session.cancel().unwrap();

                prop_assert_eq!(session.state(), SessionState::Viewing);
                prop_assert_eq!(session.working(), &original);
                prop_assert_eq!(session.snapshot(), &original);
            }

            #[test]
            fn save_makes_edited_record_the_snapshot(
                record in any_record(),
                edits in proptest::collection::vec(valid_edit(), 0..16),
            ) {
                let mut session = RecordSession::for_record(course_key(), course_schema(), record);
                let mut expected = session.snapshot().clone();

                session.start_edit().unwrap();
                for edit in &edits {
                    session.set_field(edit.field(), edit.value()).unwrap();
                    expected.insert(edit.field(), edit.value());
                }

                let pending = match session.begin_save().unwrap() {
                    SaveStart::Ready(pending) => pending,
                    SaveStart::Invalid(err) => panic!("unexpected validation error: {}", err),
                };
                prop_assert_eq!(&pending.document, &expected);
                let outcome = session.complete_save(pending, Ok(())).unwrap();

                prop_assert!(outcome.is_saved());
                prop_assert_eq!(session.state(), SessionState::Viewing);
                prop_assert_eq!(session.snapshot(), &expected);
                prop_assert_eq!(session.working(), &expected);
            }

            #[test]
            fn removing_added_items_restores_list(
                titles in proptest::collection::vec("[A-Za-z]{1,8}", 0..6),
                adds in 1usize..6,
                reverse in any::<bool>(),
            ) {
                let items = titles
                    .iter()
                    .enumerate()
                    .map(|(i, title)| {
                        Record::new()
                            .with("id", format!("b_{}", i + 1))
                            .with("title", title.as_str())
                    })
                    .collect();
                let mut session = ListSession::for_items(
                    RecordKey::new("course_benefits", "c-1"),
                    benefit_spec(),
                    items,
                );
                session.start_edit().unwrap();
                let before = session.working().clone();

                let mut added: Vec<String> = (0..adds).map(|_| session.add().unwrap()).collect();
                prop_assert_eq!(session.items().len(), titles.len() + adds);
                if reverse {
                    added.reverse();
                }
                for id in &added {
                    prop_assert!(session.remove(id).unwrap());
                }

                prop_assert_eq!(session.working(), &before);
            }
        }
    }
}
