//! Generation command handler.

use super::commands::GenerateArgs;
use super::output::print_json;
use std::path::Path;
use tracing::info;
use vermeer::{
    GenerationParams, GenerationState, HistoryError, HistoryErrorKind, HistoryStore, ModelProfile,
    OrchestratorError, ParameterOverrides, RemixPayload, StorageError, StorageErrorKind, VermeerApp,
    VermeerResult,
};

/// Submit a generation, report progress on stderr and print the result as JSON.
///
/// Ctrl-C cancels the running generation; the handler still waits for the
/// final result so a terminal status observed in flight is reported.
pub async fn run_generation(app: &VermeerApp, args: GenerateArgs) -> VermeerResult<()> {
    let (params, overrides) = prepare(app, args).await?;

    let handle = app.orchestrator().start(params, overrides);
    let mut state = handle.state();

    loop {
        tokio::select! {
            interrupted = tokio::signal::ctrl_c(), if !handle.is_cancelled() => {
                if interrupted.is_ok() {
                    eprintln!("Cancelling...");
                    handle.cancel();
                }
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = state.borrow_and_update().clone();
                report(&current);
                if current.is_finished() {
                    break;
                }
            }
        }
    }

    let result = handle.result().await?;
    app.orchestrator().drain_background().await;

    info!(task_id = %result.task_id, status = %result.status, "Generation finished");
    print_json(&result)
}

fn report(state: &GenerationState) {
    match state {
        GenerationState::Polling {
            task_id,
            status,
            progress,
            polls,
        } => match progress {
            Some(p) => eprintln!("[{}] {} {:.0}% (poll {})", task_id, status, p * 100.0, polls),
            None => eprintln!("[{}] {} (poll {})", task_id, status, polls),
        },
        GenerationState::Idle | GenerationState::Completed(_) => {}
        other => eprintln!("{}", other),
    }
}

/// Turn command-line arguments into parameters, starting from a history item when remixing.
async fn prepare(
    app: &VermeerApp,
    args: GenerateArgs,
) -> VermeerResult<(GenerationParams, ParameterOverrides)> {
    let (mut params, mut overrides) = match args.remix {
        Some(id) => {
            let item = app
                .history()
                .find_by_id(id)
                .await?
                .ok_or_else(|| HistoryError::new(HistoryErrorKind::NotFound))?;
            let remix = RemixPayload::from_history(&item);
            (remix.params, remix.overrides)
        }
        None => (GenerationParams::default(), ParameterOverrides::default()),
    };

    if let Some(prompt) = args.prompt {
        params.prompt = prompt;
    }
    if args.negative.is_some() {
        params.negative_prompt = args.negative;
    }
    if let Some(modality) = args.modality {
        params.modality = modality;
    }
    if let Some(id) = args.profile {
        let profile = ModelProfile::find(&id)
            .ok_or_else(|| OrchestratorError::invalid_input(format!("unknown profile '{}'", id)))?;
        params.profile = Some(profile);
    } else if args.model.is_some() {
        params.profile = None;
    }

    params.flags.nsfw |= args.nsfw;
    params.flags.high_res_fix |= args.hires;
    params.flags.face_restore |= args.face_restore;
    if !args.loras.is_empty() {
        params.modifiers = args.loras;
    }
    if let Some(path) = args.source {
        params.source_image = Some(read_image(&path).await?);
    }
    if let Some(path) = args.mask {
        params.mask_image = Some(read_image(&path).await?);
    }

    overrides.width = args.width.or(overrides.width);
    overrides.height = args.height.or(overrides.height);
    overrides.steps = args.steps.or(overrides.steps);
    overrides.cfg_scale = args.cfg.or(overrides.cfg_scale);
    overrides.sampler = args.sampler.or(overrides.sampler);
    overrides.seed = args.seed.or(overrides.seed);
    overrides.model_id = args.model.or(overrides.model_id);
    overrides.image_count = args.count.or(overrides.image_count);

    Ok((params, overrides))
}

async fn read_image(path: &Path) -> VermeerResult<Vec<u8>> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
    })?;
    Ok(bytes)
}
