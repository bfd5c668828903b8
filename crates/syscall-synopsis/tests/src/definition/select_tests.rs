use super::*;
use crate::definition::parse_declaration;

fn candidates(lines: &[&str]) -> Vec<Definition> {
    lines.iter().map(|line| parse_declaration(line).unwrap_or_else(|e| panic!("{line}: {e}"))).collect()
}

#[test]
fn single_prefix_candidate_is_returned() {
    let selected =
        select_definition(candidates(&["int open(const char *pathname, int flags);"]), "open").expect("open");
    assert_eq!(selected.name, "open");
}

#[test]
fn no_candidates_is_no_match() {
    let err = select_definition(Vec::new(), "open").expect_err("empty");
    assert_eq!(
        err,
        SelectError::NoMatchingDeclaration {
            call_name: "open".to_string(),
        }
    );
}

#[test]
fn unrelated_names_are_filtered_out() {
    let err = select_definition(candidates(&["int creat(const char *pathname, mode_t mode);"]), "open")
        .expect_err("creat is not a prefix of open");
    assert!(matches!(err, SelectError::NoMatchingDeclaration { .. }));
}

#[test]
fn leading_underscore_is_normalized() {
    let selected =
        select_definition(candidates(&["void _exit(int status);", "void exit2(int status);"]), "exit").expect("exit");
    assert_eq!(selected.name, "exit");
    assert_eq!(selected.return_type, "void");
}

#[test]
fn underscore_call_name_keeps_exact_candidate() {
    let selected =
        select_definition(candidates(&["void _exit(int status);", "void _Exit(int status);"]), "_exit").expect("_exit");
    assert_eq!(selected.name, "_exit");
}

#[test]
fn lone_underscore_is_not_normalized() {
    let err = select_definition(candidates(&["int _(int x);"]), "open").expect_err("`_` normalizes to nothing");
    assert!(matches!(err, SelectError::NoMatchingDeclaration { .. }));
}

#[test]
fn exact_match_with_most_parameters_wins() {
    let selected = select_definition(
        candidates(&[
            "int open(const char *pathname, int flags);",
            "int open(const char *pathname, int flags, mode_t mode);",
            "int openat(int dirfd, const char *pathname, int flags);",
        ]),
        "open",
    )
    .expect("open");
    assert_eq!(selected.parameter_count(), 3);
    assert_eq!(selected.parameters[2].name(), "mode");
}

#[test]
fn earliest_exact_match_wins_a_tie() {
    let selected = select_definition(
        candidates(&["int dup(int oldfd);", "int dup(int fd);", "int dup2(int oldfd, int newfd);"]),
        "dup",
    )
    .expect("dup");
    assert_eq!(selected.parameters[0].name(), "oldfd");
}

#[test]
fn versioned_call_falls_back_to_unversioned_entry() {
    let selected = select_definition(candidates(&["int eventfd(unsigned int initval, int flags);"]), "eventfd2")
        .expect("eventfd2");
    assert_eq!(selected.name, "eventfd");
}

#[test]
fn versioned_call_prefers_unversioned_among_prefixes() {
    let selected = select_definition(
        candidates(&[
            "int chown(const char *pathname, uid_t owner, gid_t group);",
            "int ch(int x);",
        ]),
        "chown32",
    )
    .expect("chown32");
    assert_eq!(selected.name, "chown");
    assert_eq!(selected.parameter_count(), 3);
}

#[test]
fn unversioned_call_without_exact_match_is_no_match() {
    let err = select_definition(candidates(&["int ev(int x);", "int eve(int y);"]), "event")
        .expect_err("no exact or versioned match");
    assert!(matches!(err, SelectError::NoMatchingDeclaration { .. }));
}

#[test]
fn several_versioned_synonyms_are_ambiguous() {
    let err = select_definition(
        candidates(&[
            "int eventfd(unsigned int initval);",
            "int eventfd(unsigned int initval, int flags);",
            "int event(int x);",
        ]),
        "eventfd2",
    )
    .expect_err("two eventfd candidates");
    assert_eq!(
        err,
        SelectError::AmbiguousDeclaration {
            call_name: "eventfd2".to_string(),
            candidates: vec![
                "int eventfd(unsigned int initval)".to_string(),
                "int eventfd(unsigned int initval, int flags)".to_string(),
            ],
        }
    );
}
