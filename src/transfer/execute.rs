use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::{error, info};

use crate::errors::domain::ErrorCode;
use crate::fs_utils::{leaf_name, unique_path_with};
use crate::refresh::RefreshCounter;
use crate::rules::PathRuleSet;

use super::copier::{copy_entry, move_entry, EntryKind, FsPrimitives};
use super::error::{TransferError, TransferErrorCode, TransferResult};
use super::{TransferOp, TransferRequest};

/// Result of one orchestrated batch. A rejection during validation never
/// reaches this type; it surfaces as an error with zero filesystem effect.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransferOutcome {
    pub succeeded: bool,
    pub created: Vec<String>,
    pub failed_path: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
}

impl TransferOutcome {
    fn done(created: Vec<String>) -> Self {
        Self {
            succeeded: true,
            created,
            failed_path: None,
            reason: None,
            message: None,
        }
    }

    fn step_failed(created: Vec<String>, source: &Path, error: &TransferError) -> Self {
        Self {
            succeeded: false,
            created,
            failed_path: Some(source.to_string_lossy().to_string()),
            reason: Some(TransferErrorCode::StepFailed.as_code_str().to_string()),
            message: Some(error.to_string()),
        }
    }

    fn cancelled(created: Vec<String>) -> Self {
        Self {
            succeeded: false,
            created,
            failed_path: None,
            reason: Some(TransferErrorCode::Cancelled.as_code_str().to_string()),
            message: Some("Transfer cancelled before completion".to_string()),
        }
    }
}

/// Validate and run a batch copy/move.
///
/// Validation happens in full before the first mutation: permission checks
/// against the rule set, then self-containment. Execution then drains the
/// sources strictly in request order, one at a time; the first failing
/// source stops the rest and is named in the outcome. Completed
/// destinations are never rolled back.
pub fn execute<F: FsPrimitives>(
    fs: &F,
    rules: &PathRuleSet,
    request: &TransferRequest,
    refresh: &RefreshCounter,
) -> TransferResult<TransferOutcome> {
    execute_cancellable(fs, rules, request, refresh, &AtomicBool::new(false))
}

/// [`execute`] with a cancel flag checked between sources. An in-flight
/// source always finishes; cancellation takes effect at the next step
/// boundary and surfaces as an unsuccessful outcome, not an error.
pub fn execute_cancellable<F: FsPrimitives>(
    fs: &F,
    rules: &PathRuleSet,
    request: &TransferRequest,
    refresh: &RefreshCounter,
    cancel: &AtomicBool,
) -> TransferResult<TransferOutcome> {
    validate(fs, rules, request)?;

    let mut created: Vec<String> = Vec::with_capacity(request.sources.len());
    for source in &request.sources {
        if cancel.load(Ordering::Relaxed) {
            info!(completed = created.len(), "transfer cancelled between steps");
            if !created.is_empty() {
                refresh.bump();
            }
            return Ok(TransferOutcome::cancelled(created));
        }
        let name = leaf_name(source)
            .map_err(|e| TransferError::new(TransferErrorCode::InvalidPath, e))?;
        let dest = unique_path_with(&request.target_dir, name, |candidate| fs.exists(candidate));

        let step = match request.operation {
            TransferOp::Copy => copy_entry(fs, source, &dest),
            TransferOp::Move => move_entry(fs, source, &dest),
        };
        match step {
            Ok(()) => {
                info!(
                    source = %source.display(),
                    dest = %dest.display(),
                    op = ?request.operation,
                    "transfer step complete"
                );
                created.push(dest.to_string_lossy().to_string());
            }
            Err(step_error) => {
                error!(
                    source = %source.display(),
                    dest = %dest.display(),
                    %step_error,
                    "transfer aborted; remaining sources skipped"
                );
                // Partial output already landed in the target, so cached
                // listings are stale even though the batch failed.
                if !created.is_empty() || matches!(request.operation, TransferOp::Move) {
                    refresh.bump();
                }
                return Ok(TransferOutcome::step_failed(created, source, &step_error));
            }
        }
    }

    refresh.bump();
    Ok(TransferOutcome::done(created))
}

fn validate<F: FsPrimitives>(
    fs: &F,
    rules: &PathRuleSet,
    request: &TransferRequest,
) -> TransferResult<()> {
    if request.sources.is_empty() {
        return Err(TransferError::new(
            TransferErrorCode::InvalidInput,
            "Transfer requires at least one source",
        ));
    }
    if fs.kind(&request.target_dir)? != EntryKind::Dir {
        return Err(TransferError::new(
            TransferErrorCode::NotDirectory,
            format!("Target is not a directory: {}", request.target_dir.display()),
        ));
    }

    if !rules.allows(&request.target_dir) {
        return Err(TransferError::new(
            TransferErrorCode::PermissionDenied,
            format!("Writing is not allowed in {}", request.target_dir.display()),
        ));
    }
    if request.operation == TransferOp::Move {
        for source in &request.sources {
            if !rules.allows(source) {
                return Err(TransferError::new(
                    TransferErrorCode::PermissionDenied,
                    format!("Moving is not allowed for {}", source.display()),
                ));
            }
        }
    }

    for source in &request.sources {
        if is_self_referential(source, &request.target_dir) {
            return Err(TransferError::new(
                TransferErrorCode::SelfReferential,
                format!(
                    "Cannot transfer {} into itself or its own subfolder",
                    source.display()
                ),
            ));
        }
    }
    Ok(())
}

/// Target equals the source, or descends from it. `Path::starts_with`
/// compares whole components, so `/a/bob2` is not inside `/a/bob`.
fn is_self_referential(source: &Path, target_dir: &Path) -> bool {
    target_dir == source || target_dir.starts_with(source)
}
