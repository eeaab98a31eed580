#[cfg(test)]
mod history_tests {
    use vendor_desk::data::record::{FieldValue, Record};
    use vendor_desk::data::record_store::RecordStore;
    use vendor_desk::record;
    use vendor_desk::state::events::StoreEvent;
    use vendor_desk::state::history::{RecordCommand, RecordHistory};
    use std::sync::{Arc, Mutex};

    fn seeded_store() -> RecordStore {
        let mut store = RecordStore::default();
        store.set_all(vec![
            record! { "id" => 1, "name" => "Northwind", "phone" => "555-0100" },
            record! { "id" => 2, "name" => "Contoso", "email" => "ops@contoso.com" },
            record! { "id" => 3, "name" => "Fabrikam" },
        ]);
        store
    }

    #[test]
    fn test_undo_all_restores_initial_state() {
        let mut store = seeded_store();
        let initial = store.get_all();
        let mut history = RecordHistory::new();

        let commands = vec![
            RecordCommand::add(record! { "id" => 4, "name" => "Tailspin" }),
            RecordCommand::update(2, record! { "name" => "Contoso Ltd", "city" => "Redmond" }),
            RecordCommand::delete(1),
            RecordCommand::update(4, record! { "phone" => "555-0199" }),
            RecordCommand::delete(3),
            RecordCommand::add(record! { "id" => 5, "name" => "Wingtip" }),
        ];
        for command in commands {
            assert!(history.execute_command(command, &mut store));
        }
        assert_ne!(store.get_all(), initial);

        while history.can_undo() {
            assert!(history.undo(&mut store));
        }
        assert_eq!(store.get_all(), initial);
        assert_eq!(history.redo_len(), 6);
    }

    #[test]
    fn test_undo_then_redo_reapplies_same_state() {
        let mut store = seeded_store();
        let mut history = RecordHistory::new();

        history.execute_command(RecordCommand::delete(2), &mut store);
        history.execute_command(RecordCommand::update(3, record! { "name" => "Fabrikam Inc" }), &mut store);
        let after = store.get_all();

        history.undo(&mut store);
        history.undo(&mut store);
        history.redo(&mut store);
        history.redo(&mut store);

        assert_eq!(store.get_all(), after);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_command_after_undo_discards_redo() {
        let mut store = seeded_store();
        let mut history = RecordHistory::new();

        history.execute_command(RecordCommand::delete(1), &mut store);
        history.undo(&mut store);
        assert!(history.can_redo());

        history.execute_command(RecordCommand::add(record! { "id" => 9 }), &mut store);
        assert!(!history.can_redo());
        assert!(!history.redo(&mut store));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_failed_commands_are_not_recorded() {
        let mut store = seeded_store();
        let mut history = RecordHistory::new();

        assert!(!history.execute_command(RecordCommand::delete(42), &mut store));
        assert!(!history.execute_command(RecordCommand::update(42, record! { "x" => 1 }), &mut store));
        assert!(!history.execute_command(RecordCommand::add(record! { "id" => 1 }), &mut store));
        assert!(!history.execute_command(RecordCommand::add(record! { "name" => "no id" }), &mut store));

        assert!(!history.can_undo());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_redo_is_dead_after_any_fresh_command() {
        let mut store = seeded_store();
        let mut history = RecordHistory::new();

        history.execute_command(RecordCommand::delete(1), &mut store);
        history.undo(&mut store);

        assert!(!history.execute_command(RecordCommand::delete(42), &mut store));
        assert!(!history.redo(&mut store));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_empty_history_is_a_no_op() {
        let mut store = seeded_store();
        let mut history = RecordHistory::new();
        let before = store.get_all();

        assert!(!history.undo(&mut store));
        assert!(!history.redo(&mut store));
        assert_eq!(store.get_all(), before);
    }

    #[test]
    fn test_depth_bound_drops_oldest() {
        let mut store = RecordStore::default();
        let mut history = RecordHistory::with_max_depth(2);

        for i in 0..4 {
            history.execute_command(RecordCommand::add(record! { "id" => i }), &mut store);
        }
        assert_eq!(history.undo_len(), 2);

        while history.undo(&mut store) {}
        let remaining: Vec<&FieldValue> = store.records().iter().map(|r| r.value("id")).collect();
        assert_eq!(remaining, vec![&FieldValue::from(0), &FieldValue::from(1)]);
    }

    #[test]
    fn test_undo_publishes_store_events() {
        let mut store = seeded_store();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        store.subscribe(move |event: &StoreEvent| {
            sink.lock().unwrap().push(event.name());
            Ok(())
        });

        let mut history = RecordHistory::new();
        history.execute_command(RecordCommand::delete(3), &mut store);
        history.execute_command(RecordCommand::update(1, record! { "name" => "NW" }), &mut store);
        history.undo(&mut store);
        history.undo(&mut store);

        assert_eq!(
            *events.lock().unwrap(),
            vec!["deleted", "updated", "updated", "added"]
        );
    }

    #[test]
    fn test_update_undo_removes_fields_added_by_change() {
        let mut store = seeded_store();
        let mut history = RecordHistory::new();

        history.execute_command(RecordCommand::update(3, record! { "email" => "hi@fabrikam.com" }), &mut store);
        assert!(store.get(&FieldValue::from(3)).unwrap().contains_field("email"));

        history.undo(&mut store);
        let restored: &Record = store.get(&FieldValue::from(3)).unwrap();
        assert!(!restored.contains_field("email"));
    }
}
