//! Provider status and model catalog commands.

use super::output::print_json;
use vermeer::{GenerationClient, ModelCatalog, ModelProfile, VermeerApp, VermeerResult};

/// Fetch one task status and print it as JSON.
pub async fn show_status(app: &VermeerApp, task_id: &str) -> VermeerResult<()> {
    let snapshot = app.client().fetch_status(task_id).await?;
    print_json(&snapshot)
}

/// List provider models, or the built-in catalog when the provider is unreachable.
pub async fn list_models(app: &VermeerApp) -> VermeerResult<()> {
    let models = app.client().list_models().await;

    println!("{:<32} {:<40} {:<12}", "NAME", "DISPLAY NAME", "FLAGS");
    println!("{:-<86}", "");
    for model in &models {
        let mut flags = Vec::new();
        if model.is_recommended {
            flags.push("recommended");
        }
        if model.is_nsfw {
            flags.push("nsfw");
        }
        println!(
            "{:<32} {:<40} {}",
            model.name,
            model.display_name,
            flags.join(",")
        );
    }
    println!("Total: {} models", models.len());
    Ok(())
}

/// List the built-in model profiles.
pub fn list_profiles() -> VermeerResult<()> {
    let profiles = ModelProfile::defaults();

    for profile in &profiles {
        println!("{} - {}", profile.id(), profile.name());
        println!("  Model: {}", profile.model_id());
        if let Some(vae) = profile.vae_id() {
            println!("  VAE: {}", vae);
        }
        println!("  NSFW allowed: {}", profile.nsfw_allowed());
    }
    Ok(())
}
