use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::{
    lookup::{LookupError, LookupKind, LookupResult, SyscallResolver},
    manpage::ManualSource,
};

/// A call name whose lookup ended in a defect instead of a classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupDefect {
    pub call_name: String,
    pub message: String,
}

/// Results of a batch in input order, plus the call names that hit a defect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<LookupResult>,
    pub defects: Vec<LookupDefect>,
}

impl BatchReport {
    pub fn count(
        &self,
        kind: LookupKind,
    ) -> usize {
        self.results.iter().filter(|result| result.kind == kind).count()
    }

    pub fn summary(&self) -> String {
        let counts: Vec<String> =
            LookupKind::ALL.iter().map(|kind| format!("{}={}", kind.as_str(), self.count(*kind))).collect();
        format!("{} ({} defect(s))", counts.join(" "), self.defects.len())
    }
}

impl<S: ManualSource + 'static> SyscallResolver<S> {
    /// Resolve many call names with at most `concurrency` lookups in flight.
    pub async fn lookup_batch(
        &self,
        call_names: &[String],
    ) -> BatchReport {
        let total = call_names.len();
        let concurrency = self.settings().resolved_concurrency();
        info!("Resolving {total} call name(s) with {concurrency} worker(s)…");

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let handles: Vec<_> = call_names
            .iter()
            .cloned()
            .map(|call_name| {
                let sem = semaphore.clone();
                let resolver = self.clone();
                tokio::spawn(async move {
                    let _permit = sem.acquire_owned().await;
                    resolver.lookup(&call_name).await
                })
            })
            .collect();

        let mut report = BatchReport::default();
        for (call_name, joined) in call_names.iter().zip(join_all(handles).await) {
            let message = match joined {
                Ok(Ok(result)) => {
                    report.results.push(result);
                    continue;
                },
                Ok(Err(LookupError::Ambiguous(e))) => e.to_string(),
                Err(e) => format!("lookup task failed: {e}"),
            };
            error!("[{call_name}] {message}");
            report.defects.push(LookupDefect {
                call_name: call_name.clone(),
                message,
            });
        }

        info!("Batch complete: {}", report.summary());
        report
    }
}
