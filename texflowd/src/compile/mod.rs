//! The compilation orchestration pipeline.
//!
//! One [`CompileEngine`] is shared by all requests. Each call to
//! [`CompileEngine::compile`] owns an isolated workspace, materializes the
//! inputs, drives the toolchain through the conditional multi-pass protocol
//! (render → bibliography-need detection → optional bibliography pass → two
//! reference-resolution passes), classifies the terminal state, and tears
//! the workspace down on every exit path.

pub mod materialize;
pub mod passes;
pub mod workspace;

use std::path::PathBuf;
use std::time::Duration;

use tracing::{error, info, warn};

use shared_types::CompileRequest;

use crate::config::Config;
use materialize::MAIN_TEX;
use passes::{needs_bibliography, run_pass, PassError, PassResult};
use workspace::Workspace;

/// Output artifact the renderer is expected to produce.
pub const MAIN_PDF: &str = "main.pdf";

/// Auxiliary metadata file inspected for the bibliography marker.
pub const MAIN_AUX: &str = "main.aux";

/// Terminal state of one compile request. Exactly one variant is produced
/// per request; any failure log reflects the last pass attempted.
#[derive(Debug)]
pub enum CompileOutcome {
    /// Final pass exited zero and produced the artifact.
    Success(Vec<u8>),

    /// A required pass exited non-zero.
    ToolchainFailure { log: String },

    /// Final pass reported success but the artifact is absent — a toolchain
    /// or environment anomaly, not a document defect.
    MissingArtifact { log: String },

    /// A full-budget pass exceeded the request's time budget.
    Timeout,

    /// Unexpected fault inside the pipeline.
    Internal { message: String },
}

/// Drives the external typesetting toolchain. Cheap to share: holds only
/// configuration, no per-request state.
pub struct CompileEngine {
    workspace_root: PathBuf,
    renderer_bin: String,
    bibtex_bin: String,
    default_budget: Duration,
    max_budget: Duration,
    bib_budget: Duration,
}

impl CompileEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            workspace_root: config.workspace_root.clone(),
            renderer_bin: config.renderer_bin.clone(),
            bibtex_bin: config.bibtex_bin.clone(),
            default_budget: config.default_timeout,
            max_budget: config.max_timeout,
            bib_budget: config.bib_timeout,
        }
    }

    /// Compile one request. Never panics outward: every failure mode maps to
    /// a [`CompileOutcome`] variant, and the workspace is removed before this
    /// returns regardless of which one.
    pub async fn compile(&self, req: &CompileRequest) -> CompileOutcome {
        let ws = match Workspace::create(&self.workspace_root).await {
            Ok(ws) => ws,
            Err(e) => {
                error!("failed to create workspace: {e}");
                return CompileOutcome::Internal {
                    message: e.to_string(),
                };
            }
        };

        // `ws` drops (and cleans up) on every path out of the pipeline,
        // including internal faults.
        match self.run_pipeline(&ws, req).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("unexpected compile fault: {e:#}");
                CompileOutcome::Internal {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Clamp the requested budget to the configured ceiling.
    fn budget_for(&self, requested: Option<u64>) -> Duration {
        let secs = requested.unwrap_or(self.default_budget.as_secs());
        Duration::from_secs(secs.min(self.max_budget.as_secs()))
    }

    async fn run_pipeline(
        &self,
        ws: &Workspace,
        req: &CompileRequest,
    ) -> anyhow::Result<CompileOutcome> {
        let budget = self.budget_for(req.timeout);
        materialize::materialize(ws, &req.latex, &req.images).await?;

        let mut last = match self.render_pass(ws, budget).await? {
            Some(result) => result,
            None => return Ok(CompileOutcome::Timeout),
        };

        // Absence of the aux file, or any read error, means no bibliography.
        // Aux files are not guaranteed UTF-8, so decode lossily before
        // looking for the marker.
        let needs_bib = match tokio::fs::read(ws.join(MAIN_AUX)).await {
            Ok(aux) => needs_bibliography(&String::from_utf8_lossy(&aux)),
            Err(_) => false,
        };

        if needs_bib && last.succeeded() {
            info!("bibliography marker detected, resolving citations");
            // Best-effort branch: bibtex is noisy but non-fatal, so its
            // failure (or its own timeout) is logged and the pipeline
            // continues.
            match run_pass(&self.bibtex_bin, &["main"], ws.path(), self.bib_budget).await {
                Ok(bib) if bib.succeeded() => info!("bibliography pass completed"),
                Ok(bib) => error!("bibliography pass failed (continuing): {}", bib.stdout),
                Err(e) => error!("bibliography pass error (continuing): {e}"),
            }

            // Two more full passes: the first pulls resolved citation text
            // into the document, the second re-numbers cross-references
            // that shifted as a result.
            for _ in 0..2 {
                last = match self.render_pass(ws, budget).await? {
                    Some(result) => result,
                    None => return Ok(CompileOutcome::Timeout),
                };
            }
        } else {
            info!(
                needs_bib,
                exit_code = last.exit_code,
                "skipping bibliography resolution"
            );
        }

        if !last.succeeded() {
            return Ok(CompileOutcome::ToolchainFailure {
                log: last.aggregated_log(),
            });
        }

        // A reported success with no artifact is a real anomaly; never
        // treat it as success.
        match tokio::fs::read(ws.join(MAIN_PDF)).await {
            Ok(pdf) => Ok(CompileOutcome::Success(pdf)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(CompileOutcome::MissingArtifact {
                    log: last.stdout.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// One renderer invocation against the entry point. `None` means the
    /// budget was exceeded and the pipeline must abort.
    async fn render_pass(
        &self,
        ws: &Workspace,
        budget: Duration,
    ) -> anyhow::Result<Option<PassResult>> {
        let args = ["-interaction=nonstopmode", "-halt-on-error", MAIN_TEX];
        match run_pass(&self.renderer_bin, &args, ws.path(), budget).await {
            Ok(result) => Ok(Some(result)),
            Err(PassError::Timeout(d)) => {
                warn!("render pass exceeded its {}s budget", d.as_secs());
                Ok(None)
            }
            Err(PassError::Io(e)) => Err(e.into()),
        }
    }
}
