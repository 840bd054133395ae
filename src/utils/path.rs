use std::path::{Path, PathBuf};

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "sirket", "Ziyaret")
}

/// Hämta databassökväg
pub fn get_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("ziyaret.db"))
        .unwrap_or_else(|| PathBuf::from("ziyaret.db"))
}

/// Hämta konfigurationssökväg
pub fn get_config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("settings.toml"))
        .unwrap_or_else(|| PathBuf::from("settings.toml"))
}

/// Standardkatalog för CSV-export (Hämtade filer)
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Normalisera sökväg för visning
pub fn display_path(path: &Path) -> String {
    // Förkorta hemkatalogen till ~
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_file_name() {
        assert_eq!(
            get_database_path().file_name().and_then(|n| n.to_str()),
            Some("ziyaret.db")
        );
        assert_eq!(
            get_config_path().file_name().and_then(|n| n.to_str()),
            Some("settings.toml")
        );
    }

    #[test]
    fn test_display_path_outside_home() {
        let p = Path::new("/tmp/visits_2024-05-01.csv");
        if dirs::home_dir().map(|h| !p.starts_with(h)).unwrap_or(true) {
            assert_eq!(display_path(p), "/tmp/visits_2024-05-01.csv");
        }
    }
}
