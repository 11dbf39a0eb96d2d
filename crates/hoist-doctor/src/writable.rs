//! Writable directory check

use async_trait::async_trait;
use camino::Utf8PathBuf;
use hoist_core::types::RequirementCheckResult;
use tracing::debug;

use crate::check::RequirementCheck;

const CHECK_NAME: &str = "writableCheck";

/// Verifies that every configured directory accepts new files
///
/// Writability is probed by creating and dropping a temporary file, which
/// catches read-only mounts and ACLs that permission bits alone miss.
pub struct WritableCheck {
    paths: Vec<Utf8PathBuf>,
}

impl WritableCheck {
    pub fn new(paths: Vec<Utf8PathBuf>) -> Self {
        Self { paths }
    }

    fn probe(path: &Utf8PathBuf) -> Result<(), String> {
        if !path.is_dir() {
            return Err(format!("{} (not a directory)", path));
        }

        tempfile::Builder::new()
            .prefix(".hoist-write-probe")
            .tempfile_in(path)
            .map(drop)
            .map_err(|e| format!("{} ({})", path, e))
    }
}

#[async_trait]
impl RequirementCheck for WritableCheck {
    fn name(&self) -> &'static str {
        CHECK_NAME
    }

    async fn check(&self) -> RequirementCheckResult {
        let paths = self.paths.clone();

        let failures = tokio::task::spawn_blocking(move || {
            paths
                .iter()
                .filter_map(|path| {
                    debug!("Probing {} for write access", path);
                    WritableCheck::probe(path).err()
                })
                .collect::<Vec<_>>()
        })
        .await;

        match failures {
            Ok(failures) if failures.is_empty() => RequirementCheckResult::pass(
                CHECK_NAME,
                format!("{} path(s) writable", self.paths.len()),
            ),
            Ok(failures) => RequirementCheckResult::fail(
                CHECK_NAME,
                format!("Not writable: {}", failures.join(", ")),
            ),
            Err(e) => RequirementCheckResult::fail(CHECK_NAME, format!("Probe failed: {}", e)),
        }
    }
}
