#[cfg(test)]
mod console_session_tests {
    use std::fs;
    use tempfile::tempdir;
    use vendor_desk::config::config::Config;
    use vendor_desk::console::{ConsoleCommand, ConsoleOutcome};
    use vendor_desk::data::record::FieldValue;
    use vendor_desk::state::app_context::AppContext;

    const VENDORS_CSV: &str = "id,name,category,phone,email\n\
1,Northwind,Food,+1 (555) 010-0100,orders@northwind.com\n\
2,Contoso,Tech,,sales@contoso\n\
3,Fabrikam,Tech,555 0199 42,\n\
4,Tailspin,Toys,call me,info@tailspin.com\n";

    fn run(context: &mut AppContext, line: &str) -> anyhow::Result<ConsoleOutcome> {
        ConsoleCommand::parse(line)?.execute(context, &Config::default())
    }

    fn names(context: &AppContext) -> Vec<String> {
        context
            .view()
            .derived_view()
            .iter()
            .map(|r| r.value("name").to_string())
            .collect()
    }

    fn session() -> (tempfile::TempDir, AppContext) {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("vendors.csv");
        fs::write(&csv_path, VENDORS_CSV).unwrap();

        let mut context = AppContext::new(&Config::default());
        run(&mut context, &format!("load {}", csv_path.display())).unwrap();
        (dir, context)
    }

    #[test]
    fn test_load_filter_sort_session() {
        let (_dir, mut context) = session();
        assert_eq!(context.view().total_count(), 4);

        run(&mut context, "filter category tech").unwrap();
        run(&mut context, "sort name").unwrap();
        assert_eq!(names(&context), vec!["Contoso", "Fabrikam"]);

        run(&mut context, "sort name").unwrap();
        assert_eq!(names(&context), vec!["Fabrikam", "Contoso"]);

        run(&mut context, "matcher exact").unwrap();
        assert!(names(&context).is_empty());

        run(&mut context, "clear").unwrap();
        run(&mut context, "unsort").unwrap();
        assert_eq!(names(&context), vec!["Northwind", "Contoso", "Fabrikam", "Tailspin"]);
    }

    #[test]
    fn test_edit_undo_redo_session() {
        let (_dir, mut context) = session();

        run(&mut context, r#"add {"id": 5, "name": "Wingtip", "category": "Toys"}"#).unwrap();
        run(&mut context, r#"update 2 {"name": "Contoso Ltd"}"#).unwrap();
        run(&mut context, "delete 1").unwrap();
        assert_eq!(names(&context), vec!["Contoso Ltd", "Fabrikam", "Tailspin", "Wingtip"]);

        run(&mut context, "undo").unwrap();
        run(&mut context, "undo").unwrap();
        assert_eq!(
            names(&context),
            vec!["Northwind", "Contoso", "Fabrikam", "Tailspin", "Wingtip"]
        );

        run(&mut context, "redo").unwrap();
        assert_eq!(
            context.store().get(&FieldValue::from(2)).unwrap().value("name"),
            &FieldValue::from("Contoso Ltd")
        );

        run(&mut context, "undo").unwrap();
        run(&mut context, "undo").unwrap();
        assert_eq!(
            run(&mut context, "undo").unwrap(),
            ConsoleOutcome::Message("Nothing to undo".to_string())
        );
    }

    #[test]
    fn test_rejected_edits_report_errors() {
        let (_dir, mut context) = session();

        assert!(run(&mut context, r#"add {"id": 1, "name": "Clash"}"#).is_err());
        assert!(run(&mut context, "delete 99").is_err());
        assert!(run(&mut context, "update 99 {\"name\": \"x\"}").is_err());
        assert!(!context.history().can_undo());
    }

    #[test]
    fn test_recipients_from_filtered_view() {
        let (_dir, mut context) = session();

        let outcome = run(&mut context, "recipients").unwrap();
        let ConsoleOutcome::Recipients(recipients) = outcome else {
            panic!("expected recipients, got {:?}", outcome);
        };
        assert_eq!(recipients.phones.len(), 2);
        assert_eq!(recipients.emails.len(), 2);
        assert_eq!(recipients.unreachable, vec![FieldValue::from(2)]);

        run(&mut context, "filter category toys").unwrap();
        let ConsoleOutcome::Recipients(recipients) = run(&mut context, "recipients").unwrap() else {
            panic!("expected recipients");
        };
        assert!(recipients.phones.is_empty());
        assert_eq!(recipients.emails.len(), 1);
    }

    #[test]
    fn test_stats_group_by_category() {
        let (_dir, mut context) = session();

        let ConsoleOutcome::Stats(stats) = run(&mut context, "stats category").unwrap() else {
            panic!("expected stats");
        };
        assert_eq!(stats.total, 4);
        assert_eq!(stats.groups.get("Tech"), Some(&2));
        assert_eq!(stats.missing_count("phone"), 1);
    }

    #[test]
    fn test_export_view_then_reload() {
        let (dir, mut context) = session();
        let out = dir.path().join("tech.json");

        run(&mut context, "filter category Tech").unwrap();
        run(&mut context, &format!("export {}", out.display())).unwrap();

        let mut reloaded = AppContext::new(&Config::default());
        run(&mut reloaded, &format!("load {}", out.display())).unwrap();
        assert_eq!(names(&reloaded), vec!["Contoso", "Fabrikam"]);
        assert_eq!(
            reloaded.store().get(&FieldValue::from(3)).unwrap().value("category"),
            &FieldValue::from("Tech")
        );
    }

    #[test]
    fn test_unknown_file_type_is_rejected() {
        let (dir, mut context) = session();
        let out = dir.path().join("view.xlsx");

        assert!(run(&mut context, &format!("export {}", out.display())).is_err());
        assert!(!out.exists());
    }
}
