use crate::config::generate::generate_starter_config;
use std::fs;
use std::path::PathBuf;

pub fn init(stdout: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_content = generate_starter_config();

    if stdout {
        print!("{}", config_content);
        return Ok(());
    }

    let config_path = resolve_target_path()?;

    if config_path.exists() {
        return Err(format!(
            "Config file already exists at {}. Remove it first or use --stdout.",
            config_path.display()
        )
        .into());
    }

    fs::write(&config_path, config_content)
        .map_err(|e| format!("Failed to write {}: {}", config_path.display(), e))?;

    println!("Wrote starter config to {}", config_path.display());
    println!("Edit the webhook URL and depot path before running 'p4relay run'.");
    Ok(())
}

fn resolve_target_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(home_dir) = dirs::home_dir() {
        let user_config = home_dir.join(".config/p4relay/config.yml");
        if let Some(parent) = user_config.parent() {
            if fs::create_dir_all(parent).is_ok() {
                return Ok(user_config);
            }
            eprintln!("Warning: Could not create directory {}", parent.display());
            eprintln!("Falling back to /etc/p4relay/config.yml");
        }
    }

    let system_config = PathBuf::from("/etc/p4relay/config.yml");
    if let Some(parent) = system_config.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    Ok(system_config)
}
