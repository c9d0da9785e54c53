//! History command handlers.

use super::commands::{HistoryCommands, OutputFormat};
use super::output::print_json;
use vermeer::{HistoryItem, HistoryStore, VermeerApp, VermeerResult};

/// Handle history commands.
pub async fn handle_history_command(app: &VermeerApp, cmd: HistoryCommands) -> VermeerResult<()> {
    let history = app.history();

    match cmd {
        HistoryCommands::List { modality, format } => {
            let items = match modality {
                Some(modality) => history.query_by_modality(modality).await?,
                None => history.query_all().await?,
            };
            print_items(&items, format)
        }

        HistoryCommands::Search { query, format } => {
            let items = history.search_by_prompt(&query).await?;
            print_items(&items, format)
        }

        HistoryCommands::Show { id } => match history.find_by_id(id).await? {
            Some(item) => print_json(&item),
            None => {
                eprintln!("No history item with id {}", id);
                Ok(())
            }
        },

        HistoryCommands::Delete { id } => {
            if history.delete_by_id(id).await? {
                println!("Deleted history item {}", id);
            } else {
                println!("No history item with id {}", id);
            }
            Ok(())
        }

        HistoryCommands::DeleteTask { task_id } => {
            let removed = history.delete_by_task_id(&task_id).await?;
            println!("Deleted {} items for task {}", removed, task_id);
            Ok(())
        }

        HistoryCommands::Clear => {
            let removed = history.clear_all().await?;
            println!("Deleted {} items", removed);
            Ok(())
        }

        HistoryCommands::Count => {
            println!("{}", history.count().await?);
            Ok(())
        }
    }
}

fn print_items(items: &[HistoryItem], format: OutputFormat) -> VermeerResult<()> {
    match format {
        OutputFormat::Json => print_json(items),
        OutputFormat::Human => {
            for item in items {
                println!(
                    "#{:<5} {} {:<15} {}",
                    item.id,
                    item.created_at.format("%Y-%m-%d %H:%M"),
                    item.modality,
                    truncate(&item.prompt, 60)
                );
                println!("       {}", item.local_path.as_deref().unwrap_or(&item.thumbnail_url));
            }
            println!("Total: {} items", items.len());
            Ok(())
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long prompt", 10), "a very ...");
    }
}
