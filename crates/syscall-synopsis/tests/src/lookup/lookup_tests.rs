use super::*;
use crate::manpage::InMemoryPages;

fn page(synopsis: &str) -> String {
    format!("NAME\n       test\n\nSYNOPSIS\n{synopsis}\nDESCRIPTION\n       Nothing here.\n")
}

fn settings() -> LookupSettings {
    LookupSettings::default()
}

#[test]
fn missing_page_is_no_manual_entry() {
    let result = classify_page("open", None, &settings()).expect("classified");
    assert_eq!(result, LookupResult::no_manual_entry("open"));
    assert_eq!(result.definition, None);
}

#[test]
fn unimplemented_page_is_classified_before_parsing() {
    let text = page("       Unimplemented system calls.\n       int afs_syscall(long long x);\n");
    let result = classify_page("afs_syscall", Some(&text), &settings()).expect("classified");
    assert_eq!(result.kind, LookupKind::Unimplemented);
    assert!(result.definition.is_none());
}

#[test]
fn page_without_declarations_is_not_found() {
    let text = page("       #include <unistd.h>\n");
    let result = classify_page("sync", Some(&text), &settings()).expect("classified");
    assert_eq!(result.kind, LookupKind::NoDeclarationFound);
}

#[test]
fn unparseable_declarations_are_not_found() {
    let text = page("       long long llseek(int fd, long long offset);\n");
    let result = classify_page("llseek", Some(&text), &settings()).expect("classified");
    assert_eq!(result.kind, LookupKind::NoDeclarationFound);
}

#[test]
fn unrelated_declarations_are_not_found() {
    let text = page("       int creat(const char *pathname, mode_t mode);\n");
    let result = classify_page("open", Some(&text), &settings()).expect("classified");
    assert_eq!(result, LookupResult::no_declaration_found("open"));
}

#[test]
fn malformed_line_is_dropped_not_fatal() {
    let text = page("       int close(int fd;\n       int close(int fd);\n");
    let result = classify_page("close", Some(&text), &settings()).expect("classified");
    assert_eq!(result.kind, LookupKind::Found);
    let definition = result.definition.expect("definition");
    assert_eq!(definition.to_string(), "int close(int fd)");
}

#[test]
fn richest_open_declaration_is_found() {
    let text = page(
        "       int open(const char *pathname, int flags);\n       int open(const char *pathname, int flags, mode_t mode);\n",
    );
    let result = classify_page("open", Some(&text), &settings()).expect("classified");
    assert_eq!(result.definition.expect("definition").parameter_count(), 3);
}

#[test]
fn ambiguous_selection_is_a_defect() {
    let text = page("       int eventfd(unsigned int initval);\n       int eventfd(unsigned int initval, int flags);\n");
    let err = classify_page("eventfd2", Some(&text), &settings()).expect_err("ambiguous");
    assert!(matches!(err, LookupError::Ambiguous(SelectError::AmbiguousDeclaration { .. })));
}

#[test]
fn display_matches_each_kind() {
    assert_eq!(
        LookupResult::no_manual_entry("foo").to_string(),
        "Syscall Name: foo\nDefinition:   No man entry found for this system call name."
    );
    assert_eq!(
        LookupResult::unimplemented("foo").to_string(),
        "Syscall Name: foo\nDefinition:   System call is Unimplemented"
    );
    assert_eq!(
        LookupResult::no_declaration_found("foo").to_string(),
        "Syscall Name: foo\nDefinition:   Definition not found in man page."
    );
    let definition = parse_declaration("pid_t fork(void);").expect("fork");
    assert_eq!(
        LookupResult::found("fork", definition).to_string(),
        "Syscall Name: fork\nDefinition:   pid_t fork(void)"
    );
}

#[test]
fn records_without_matching_definition_are_rejected() {
    let found_without_definition = serde_json::json!({
        "call_name": "open",
        "kind": "Found",
        "definition": null,
    });
    assert!(serde_json::from_value::<LookupResult>(found_without_definition).is_err());

    let definition = parse_declaration("int close(int fd);").expect("close");
    let missing_with_definition = serde_json::json!({
        "call_name": "close",
        "kind": "NoManualEntry",
        "definition": definition,
    });
    assert!(serde_json::from_value::<LookupResult>(missing_with_definition).is_err());
}

#[test]
fn records_must_spell_out_definition() {
    let without_key = serde_json::json!({
        "call_name": "open",
        "kind": "NoManualEntry",
    });
    assert!(serde_json::from_value::<LookupResult>(without_key).is_err());

    let explicit_null = serde_json::json!({
        "call_name": "open",
        "kind": "NoManualEntry",
        "definition": null,
    });
    let result = serde_json::from_value::<LookupResult>(explicit_null).expect("explicit null");
    assert_eq!(result, LookupResult::no_manual_entry("open"));
}

#[test]
fn result_round_trips_through_json() {
    let definition = parse_declaration("int close(int fd);").expect("close");
    let result = LookupResult::found("close", definition);
    let json = serde_json::to_string(&result).expect("serialize");
    let back: LookupResult = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, result);
}

#[tokio::test]
async fn resolver_classifies_each_outcome() {
    let pages = InMemoryPages::new()
        .with_page("fork", page("       pid_t fork(void);\n"))
        .with_page("afs_syscall", page("       Unimplemented system calls.\n"))
        .with_page("sync", page("       #include <unistd.h>\n"));
    let resolver = SyscallResolver::new(pages, settings());

    assert_eq!(resolver.lookup("fork").await.expect("fork").kind, LookupKind::Found);
    assert_eq!(resolver.lookup("afs_syscall").await.expect("afs").kind, LookupKind::Unimplemented);
    assert_eq!(resolver.lookup("sync").await.expect("sync").kind, LookupKind::NoDeclarationFound);
    assert_eq!(resolver.lookup("vfork").await.expect("vfork").kind, LookupKind::NoManualEntry);
}

#[tokio::test]
async fn fetch_failure_counts_as_no_manual_entry() {
    let resolver = SyscallResolver::new(crate::manpage::PageDirectory::new(std::env::temp_dir(), "2"), settings());
    let result = resolver.lookup("-k").await.expect("invalid names still classify");
    assert_eq!(result.kind, LookupKind::NoManualEntry);
}

#[tokio::test]
async fn batch_keeps_input_order_and_collects_defects() {
    let pages = InMemoryPages::new()
        .with_page("fork", page("       pid_t fork(void);\n"))
        .with_page("close", page("       int close(int fd);\n"))
        .with_page(
            "eventfd2",
            page("       int eventfd(unsigned int initval);\n       int eventfd(unsigned int initval, int flags);\n"),
        );
    let resolver = SyscallResolver::new(
        pages,
        LookupSettings {
            concurrency: 2,
            ..settings()
        },
    );

    let names: Vec<String> = ["close", "vfork", "eventfd2", "fork"].into_iter().map(String::from).collect();
    let report = resolver.lookup_batch(&names).await;

    let resolved: Vec<&str> = report.results.iter().map(|result| result.call_name.as_str()).collect();
    assert_eq!(resolved, ["close", "vfork", "fork"]);
    assert_eq!(report.defects.len(), 1);
    assert_eq!(report.defects[0].call_name, "eventfd2");
    assert_eq!(report.count(LookupKind::Found), 2);
    assert_eq!(report.count(LookupKind::NoManualEntry), 1);
    assert_eq!(report.summary(), "NoManualEntry=1 NoDeclarationFound=0 Unimplemented=0 Found=2 (1 defect(s))");
}

#[tokio::test]
async fn empty_batch_is_empty_report() {
    let resolver = SyscallResolver::new(InMemoryPages::new(), settings());
    assert_eq!(resolver.lookup_batch(&[]).await, BatchReport::default());
}
