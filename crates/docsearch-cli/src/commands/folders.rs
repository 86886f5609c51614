use crate::app::App;
use anyhow::{Context, Result};
use docsearch_core::folder::Folder;
use std::path::PathBuf;

pub async fn list(app: &App) -> Result<()> {
    let folders = app
        .folders
        .refresh()
        .await
        .context("Failed to load folders")?;
    print_folders(&folders);
    Ok(())
}

pub async fn create(app: &App, name: &str) -> Result<()> {
    app.folders.refresh().await.context("Failed to load folders")?;
    let folders = app
        .folders
        .create_folder(name)
        .await
        .with_context(|| format!("Failed to create folder '{}'", name.trim()))?;
    println!("Created folder '{}'", name.trim());
    print_folders(&folders);
    Ok(())
}

pub async fn delete_folder(app: &App, folder_id: &str) -> Result<()> {
    let folders = app
        .folders
        .delete_folder(folder_id)
        .await
        .with_context(|| format!("Failed to delete folder {}", folder_id))?;
    println!("Deleted folder {}", folder_id);
    print_folders(&folders);
    Ok(())
}

pub async fn delete_file(app: &App, folder_id: &str, server_name: &str) -> Result<()> {
    let folders = app
        .folders
        .delete_file(folder_id, server_name)
        .await
        .with_context(|| format!("Failed to delete {}", server_name))?;
    println!("Deleted {}", server_name);
    print_folders(&folders);
    Ok(())
}

pub async fn upload(app: &App, folder_id: &str, paths: &[PathBuf]) -> Result<()> {
    let folders = app
        .folders
        .upload_files(folder_id, paths)
        .await
        .with_context(|| format!("Failed to upload into {}", folder_id))?;
    println!("Uploaded {} file(s) into {}", paths.len(), folder_id);
    print_folders(&folders);
    Ok(())
}

fn print_folders(folders: &[Folder]) {
    if folders.is_empty() {
        println!("No folders.");
        return;
    }
    for folder in folders {
        println!("{}  {} ({} files)", folder.id, folder.name, folder.files.len());
        for file in &folder.files {
            println!(
                "    {}  {}  {}",
                file.server_name,
                file.original_name,
                human_size(file.size)
            );
        }
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::human_size;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(50 * 1024 * 1024), "50.0 MB");
    }
}
