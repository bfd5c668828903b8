use std::{
    collections::{BTreeSet, HashMap},
    future::Future,
    path::{Path, PathBuf},
    time::Duration,
};

use tokio::process::Command;
use tracing::debug;
use walkdir::WalkDir;

/// Fixed width keeps long declarations on one line where the formatter allows it.
const MAN_WIDTH: &str = "200";

/// Retrieval failures that are not simply "no such page".
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("`{call_name}` is not a valid call name")]
    InvalidName { call_name: String },

    #[error("failed to run `{command}` for `{call_name}`: {source}")]
    Spawn {
        command: String,
        call_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` timed out after {timeout:?} for `{call_name}`")]
    Timeout {
        command: String,
        call_name: String,
        timeout: Duration,
    },

    #[error("manual page for `{call_name}` is not valid UTF-8")]
    InvalidUtf8 { call_name: String },

    #[error("failed to read page {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fetches the rendered text of a call's manual page.
pub trait ManualSource: Send + Sync {
    /// `Ok(None)` means the page does not exist.
    fn fetch(
        &self,
        call_name: &str,
    ) -> impl Future<Output = Result<Option<String>, FetchError>> + Send;
}

fn man_command(program: &str) -> Command {
    let mut command = Command::new(program);
    command.kill_on_drop(true);
    command
}

/// Renders pages with the system `man` command.
#[derive(Debug, Clone)]
pub struct ManCommand {
    program: String,
    section: String,
    timeout: Duration,
}

impl ManCommand {
    pub fn new(
        program: impl Into<String>,
        section: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            program: program.into(),
            section: section.into(),
            timeout,
        }
    }

    pub(crate) fn command_for(
        &self,
        call_name: &str,
    ) -> Command {
        let mut command = man_command(&self.program);
        command
            .args([self.section.as_str(), call_name])
            .env("MANPAGER", "cat")
            .env("MANWIDTH", MAN_WIDTH)
            .env_remove("MAN_KEEP_FORMATTING")
            .stdin(std::process::Stdio::null());
        command
    }
}

impl ManualSource for ManCommand {
    async fn fetch(
        &self,
        call_name: &str,
    ) -> Result<Option<String>, FetchError> {
        if !is_valid_call_name(call_name) {
            return Err(FetchError::InvalidName {
                call_name: call_name.to_string(),
            });
        }

        let mut command = self.command_for(call_name);
        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(FetchError::Spawn {
                    command: self.program.clone(),
                    call_name: call_name.to_string(),
                    source,
                });
            },
            Err(_) => {
                return Err(FetchError::Timeout {
                    command: self.program.clone(),
                    call_name: call_name.to_string(),
                    timeout: self.timeout,
                });
            },
        };

        if !output.status.success() {
            debug!("{} {} {call_name} exited with {}", self.program, self.section, output.status);
            return Ok(None);
        }

        String::from_utf8(output.stdout).map(Some).map_err(|_| FetchError::InvalidUtf8 {
            call_name: call_name.to_string(),
        })
    }
}

/// Reads pre-rendered pages stored as `<name>.<section>` or `<name>` files.
#[derive(Debug, Clone)]
pub struct PageDirectory {
    root: PathBuf,
    section: String,
}

impl PageDirectory {
    pub fn new(
        root: impl Into<PathBuf>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            section: section.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Call names of all pages directly inside the directory, sorted. Files whose
    /// name is not an identifier are skipped.
    pub fn call_names(&self) -> Vec<String> {
        let suffix = format!(".{}", self.section);
        let names: BTreeSet<String> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_owned))
            .filter(|file_name| !file_name.starts_with('.'))
            .map(|file_name| match file_name.strip_suffix(&suffix) {
                Some(stem) => stem.to_string(),
                None => file_name,
            })
            .filter(|name| is_valid_call_name(name))
            .collect();
        names.into_iter().collect()
    }

    fn candidate_paths(
        &self,
        call_name: &str,
    ) -> [PathBuf; 2] {
        [self.root.join(format!("{call_name}.{}", self.section)), self.root.join(call_name)]
    }
}

impl ManualSource for PageDirectory {
    async fn fetch(
        &self,
        call_name: &str,
    ) -> Result<Option<String>, FetchError> {
        if !is_valid_call_name(call_name) {
            return Err(FetchError::InvalidName {
                call_name: call_name.to_string(),
            });
        }

        for path in self.candidate_paths(call_name) {
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => return Ok(Some(text)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(source) => return Err(FetchError::Io { path, source }),
            }
        }
        Ok(None)
    }
}

/// Pages held in memory, keyed by call name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPages {
    pages: HashMap<String, String>,
}

impl InMemoryPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(
        mut self,
        call_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.pages.insert(call_name.into(), text.into());
        self
    }
}

impl ManualSource for InMemoryPages {
    async fn fetch(
        &self,
        call_name: &str,
    ) -> Result<Option<String>, FetchError> {
        Ok(self.pages.get(call_name).cloned())
    }
}

/// The source selected at startup: the `man` command or a page directory.
#[derive(Debug, Clone)]
pub enum PageSource {
    Man(ManCommand),
    Directory(PageDirectory),
}

impl ManualSource for PageSource {
    async fn fetch(
        &self,
        call_name: &str,
    ) -> Result<Option<String>, FetchError> {
        match self {
            Self::Man(man) => man.fetch(call_name).await,
            Self::Directory(directory) => directory.fetch(call_name).await,
        }
    }
}

/// Call names are C identifiers; anything else could be read as an option or a path.
fn is_valid_call_name(call_name: &str) -> bool {
    let mut chars = call_name.chars();
    chars.next().is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
#[path = "../../tests/src/manpage/source_tests.rs"]
mod tests;
