use std::ffi::OsStr;

use super::*;

fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("syscall-synopsis-{label}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn call_names_must_be_identifiers() {
    for name in ["open", "_exit", "eventfd2", "__NR_read", "x"] {
        assert!(is_valid_call_name(name), "{name}");
    }
    for name in ["", "-k", "2open", "../etc/passwd", "open close", "open;ls", "é"] {
        assert!(!is_valid_call_name(name), "{name}");
    }
}

#[test]
fn man_command_renders_plain_text() {
    let man = ManCommand::new("man", "2", Duration::from_secs(5));
    let command = man.command_for("open");
    let std_command = command.as_std();

    assert_eq!(std_command.get_program(), OsStr::new("man"));
    let args: Vec<&OsStr> = std_command.get_args().collect();
    assert_eq!(args, [OsStr::new("2"), OsStr::new("open")]);

    let envs: Vec<(&OsStr, Option<&OsStr>)> = std_command.get_envs().collect();
    assert!(envs.contains(&(OsStr::new("MANPAGER"), Some(OsStr::new("cat")))));
    assert!(envs.contains(&(OsStr::new("MANWIDTH"), Some(OsStr::new(MAN_WIDTH)))));
    assert!(envs.contains(&(OsStr::new("MAN_KEEP_FORMATTING"), None)));
}

#[tokio::test]
async fn man_command_rejects_option_like_names() {
    let man = ManCommand::new("man", "2", Duration::from_secs(5));
    let err = man.fetch("-k").await.expect_err("option-like name");
    assert!(matches!(err, FetchError::InvalidName { call_name } if call_name == "-k"));
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    let man = ManCommand::new("syscall-synopsis-no-such-program", "2", Duration::from_secs(5));
    let err = man.fetch("open").await.expect_err("program does not exist");
    assert!(matches!(err, FetchError::Spawn { .. }), "{err:?}");
}

#[tokio::test]
async fn page_directory_prefers_section_suffix() {
    let dir = scratch_dir("section-suffix");
    std::fs::write(dir.join("open.2"), "section page").expect("write open.2");
    std::fs::write(dir.join("open"), "bare page").expect("write open");
    std::fs::write(dir.join("close"), "close page").expect("write close");

    let pages = PageDirectory::new(&dir, "2");
    assert_eq!(pages.root(), dir.as_path());
    assert_eq!(pages.fetch("open").await.expect("open").as_deref(), Some("section page"));
    assert_eq!(pages.fetch("close").await.expect("close").as_deref(), Some("close page"));
    assert_eq!(pages.fetch("read").await.expect("read"), None);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn page_directory_lists_call_names() {
    let dir = scratch_dir("call-names");
    for file in ["write.2", "open.2", "open", ".hidden.2", "fork.2"] {
        std::fs::write(dir.join(file), "").expect("write page");
    }
    std::fs::create_dir_all(dir.join("nested")).expect("nested dir");
    std::fs::write(dir.join("nested").join("read.2"), "").expect("write nested page");

    let pages = PageDirectory::new(&dir, "2");
    assert_eq!(pages.call_names(), vec!["fork", "open", "write"]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn page_directory_skips_non_identifier_files() {
    let dir = scratch_dir("non-identifier");
    for file in ["close.2", "README.md", "notes.txt", "open.3", "dup-2"] {
        std::fs::write(dir.join(file), "").expect("write file");
    }

    let pages = PageDirectory::new(&dir, "2");
    assert_eq!(pages.call_names(), vec!["close"]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn page_directory_rejects_paths() {
    let pages = PageDirectory::new(std::env::temp_dir(), "2");
    let err = pages.fetch("../passwd").await.expect_err("path traversal");
    assert!(matches!(err, FetchError::InvalidName { .. }));
}

#[tokio::test]
async fn in_memory_pages_serve_what_they_hold() {
    let pages = InMemoryPages::new().with_page("fork", "SYNOPSIS\n       pid_t fork(void);\n");
    assert!(pages.fetch("fork").await.expect("fork").is_some());
    assert_eq!(pages.fetch("vfork").await.expect("vfork"), None);
}

#[tokio::test]
async fn page_source_delegates_to_directory() {
    let dir = scratch_dir("page-source");
    std::fs::write(dir.join("fork.2"), "fork page").expect("write fork.2");

    let source = PageSource::Directory(PageDirectory::new(&dir, "2"));
    assert_eq!(source.fetch("fork").await.expect("fork").as_deref(), Some("fork page"));

    let _ = std::fs::remove_dir_all(&dir);
}
