#[cfg(test)]
mod verify {
    use std::path::Path;

    use sqlassay::parsing::directives::{self, DirectiveKind};
    use sqlassay::parsing::groups::{GroupingError, GroupKind};
    use sqlassay::parsing::{self, LoadingError};

    #[test]
    fn loading_a_missing_file() {
        let result = parsing::load(Path::new("tests/scripts/no-such-script.sql"));

        assert_eq!(
            result,
            Err(LoadingError {
                problem: "File not found".to_string(),
                details: String::new(),
            })
        );
    }

    #[test]
    fn line_comment_script_parses() {
        let content = parsing::load(Path::new("tests/scripts/count.sql")).unwrap();
        let groups = parsing::parse(&content).unwrap();

        let kinds: Vec<GroupKind> = groups
            .iter()
            .map(|group| group.kind)
            .collect();
        assert_eq!(kinds, vec![GroupKind::Instructions, GroupKind::Statement]);
    }

    #[test]
    fn block_comment_script_parses() {
        let content = parsing::load(Path::new("tests/scripts/rows.sql")).unwrap();
        let groups = parsing::parse(&content).unwrap();

        let kinds: Vec<GroupKind> = groups
            .iter()
            .map(|group| group.kind)
            .collect();
        assert_eq!(kinds, vec![GroupKind::Statement, GroupKind::Instructions]);
    }

    #[test]
    fn nested_start_marker_is_rejected() {
        let result = parsing::parse(
            "-- START_TEST outer\n\
             -- START_TEST inner\n\
             -- END_TEST\n",
        );

        assert_eq!(result, Err(GroupingError::StartInsideInstructions));
    }

    #[test]
    fn end_marker_inside_statement_is_rejected() {
        let result = parsing::parse(
            "SELECT 1;\n\
             -- END_TEST\n",
        );

        assert_eq!(result, Err(GroupingError::EndInsideStatement));
    }

    #[test]
    fn lone_end_marker_survives_parsing() {
        // deliberately deferred: the runner is the one to refuse this group
        let groups = parsing::parse("-- END_TEST\n").unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, GroupKind::Unresolved);
    }

    #[test]
    fn file_directive_reads_the_document() {
        let content = parsing::load(Path::new("tests/scripts/file.sql")).unwrap();
        let groups = parsing::parse(&content).unwrap();

        let directive = directives::extract(&groups[0]).unwrap();
        assert_eq!(directive.kind, DirectiveKind::File);
        assert_eq!(directive.name, Some("fruit inventory".to_string()));
        assert_eq!(
            directive.table,
            vec![
                vec!["apple".to_string(), "red".to_string()],
                vec!["banana".to_string(), "yellow".to_string()],
                vec!["cherry".to_string(), "red".to_string()],
            ]
        );
    }

    #[test]
    fn row_directives_inside_a_block_comment() {
        let content = parsing::load(Path::new("tests/scripts/rows.sql")).unwrap();
        let groups = parsing::parse(&content).unwrap();

        let directive = directives::extract(&groups[1]).unwrap();
        assert_eq!(directive.kind, DirectiveKind::Row);
        assert_eq!(directive.name, Some("players".to_string()));
        assert_eq!(
            directive.table,
            vec![
                vec!["alice".to_string(), "true".to_string(), "3.14".to_string()],
                vec!["bob".to_string(), "false".to_string(), "45".to_string()],
            ]
        );
    }
}
