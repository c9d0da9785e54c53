//! Settings command handlers.

use super::commands::SettingsCommands;
use super::output::{mask_secret, print_json};
use vermeer::{ModelCatalog, SettingsProvider, VermeerApp, VermeerResult};

/// Handle settings commands.
pub async fn handle_settings_command(
    app: &VermeerApp,
    cmd: SettingsCommands,
) -> VermeerResult<()> {
    let settings = app.settings();

    match cmd {
        SettingsCommands::Show => {
            let mut current = settings.current();
            current.api_key = current.api_key.as_deref().map(mask_secret);
            print_json(&current)
        }

        SettingsCommands::Set {
            model,
            sampler,
            width,
            height,
            steps,
            cfg,
            save_history,
            auto_download,
        } => {
            let mut updated = settings.current();
            if model.is_some() {
                updated.default_model_id = model;
            }
            if sampler.is_some() {
                updated.default_sampler = sampler;
            }
            if width.is_some() {
                updated.default_width = width;
            }
            if height.is_some() {
                updated.default_height = height;
            }
            if steps.is_some() {
                updated.default_steps = steps;
            }
            if cfg.is_some() {
                updated.default_cfg_scale = cfg;
            }
            if let Some(save_history) = save_history {
                updated.save_history = save_history;
            }
            if let Some(auto_download) = auto_download {
                updated.auto_download = auto_download;
            }

            settings.update(updated).await?;
            println!("Settings saved to {}", settings.path().display());
            Ok(())
        }

        SettingsCommands::ApiKey { key, clear } => {
            match key {
                Some(key) if !clear => {
                    settings.save_api_key(&key).await?;
                    println!("API key saved");
                }
                _ => {
                    settings.clear_api_key().await?;
                    println!("API key removed");
                }
            }
            Ok(())
        }

        SettingsCommands::Reset => {
            settings.reset_defaults().await?;
            println!("Stored defaults cleared");
            Ok(())
        }

        SettingsCommands::Validate { remote } => {
            settings.validate_api_key()?;
            println!("API key is present and well-formed");

            if remote {
                if app.client().verify_credentials().await? {
                    println!("Provider accepted the API key");
                } else {
                    println!("Provider rejected the API key");
                }
            }
            Ok(())
        }
    }
}
