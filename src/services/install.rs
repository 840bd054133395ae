//! Installation som app: en startmeny-post för den inloggade användaren

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DESKTOP_ENTRY_NAME: &str = "ziyaret.desktop";

/// Plattformens installationsmekanism
pub trait Installer {
    fn is_supported(&self) -> bool;
    fn is_installed(&self) -> bool;
    fn install(&self) -> Result<()>;
}

/// Skriver en freedesktop `.desktop`-fil i användarens applications-katalog
pub struct DesktopEntryInstaller {
    applications_dir: PathBuf,
    exec: PathBuf,
    supported: bool,
}

impl DesktopEntryInstaller {
    /// Installerare för aktuell användare och körbar fil
    pub fn for_current_user() -> Option<Self> {
        let applications_dir = dirs::data_dir()?.join("applications");
        let exec = std::env::current_exe().ok()?;
        Some(Self {
            applications_dir,
            exec,
            supported: cfg!(all(unix, not(target_os = "macos"))),
        })
    }

    pub fn with_paths(applications_dir: impl Into<PathBuf>, exec: impl Into<PathBuf>) -> Self {
        Self {
            applications_dir: applications_dir.into(),
            exec: exec.into(),
            supported: true,
        }
    }

    pub fn entry_path(&self) -> PathBuf {
        self.applications_dir.join(DESKTOP_ENTRY_NAME)
    }

    fn entry_contents(exec: &Path) -> String {
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name=Müşteri Ziyaret Programı\n\
             Comment=Müşteri ziyaretlerini kaydet\n\
             Exec=\"{}\"\n\
             Terminal=false\n\
             Categories=Office;\n",
            exec.display()
        )
    }
}

impl Installer for DesktopEntryInstaller {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn is_installed(&self) -> bool {
        self.entry_path().exists()
    }

    fn install(&self) -> Result<()> {
        std::fs::create_dir_all(&self.applications_dir).with_context(|| {
            format!("Kunde inte skapa {}", self.applications_dir.display())
        })?;

        let path = self.entry_path();
        std::fs::write(&path, Self::entry_contents(&self.exec))
            .with_context(|| format!("Kunde inte skriva {}", path.display()))?;

        info!("Startmeny-post skapad: {}", path.display());
        Ok(())
    }
}

/// Signaler från plattformen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallSignal {
    Available,
    Installed,
}

/// Användarens svar i bekräftelsedialogen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    Accepted,
    Dismissed,
}

/// Knappen "Ana Ekrana Ekle" och indikatorn "Yüklendi"
#[derive(Debug, Default)]
pub struct InstallPrompt {
    deferred: bool,
    signal_seen: bool,
    installed: bool,
}

impl InstallPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Läs av installerarens läge vid start
    pub fn detect(installer: &dyn Installer) -> Self {
        let mut prompt = Self::new();
        if installer.is_installed() {
            prompt.handle_signal(InstallSignal::Installed);
        } else if installer.is_supported() {
            prompt.handle_signal(InstallSignal::Available);
        }
        prompt
    }

    /// "Available" fångas högst en gång per session
    pub fn handle_signal(&mut self, signal: InstallSignal) {
        match signal {
            InstallSignal::Available => {
                if !self.signal_seen && !self.installed {
                    self.signal_seen = true;
                    self.deferred = true;
                }
            }
            InstallSignal::Installed => {
                self.installed = true;
                self.deferred = false;
            }
        }
    }

    /// Visa knappen?
    pub fn can_prompt(&self) -> bool {
        self.deferred && !self.installed
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Statustext i toppfältet
    pub fn status_text(&self) -> Option<&'static str> {
        self.installed.then_some("Yüklendi")
    }

    /// Avsluta prompten. Den uppskjutna signalen förbrukas oavsett utfall.
    pub fn resolve(&mut self, outcome: PromptOutcome, installer: &dyn Installer) -> Result<()> {
        if !self.can_prompt() {
            debug!("Ingen installationsprompt att besvara");
            return Ok(());
        }
        self.deferred = false;

        match outcome {
            PromptOutcome::Accepted => {
                installer.install()?;
                self.handle_signal(InstallSignal::Installed);
            }
            PromptOutcome::Dismissed => {
                info!("Installationsprompten avfärdad för denna session");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn installer() -> (TempDir, DesktopEntryInstaller) {
        let dir = tempfile::tempdir().unwrap();
        let installer =
            DesktopEntryInstaller::with_paths(dir.path().join("applications"), "/usr/bin/ziyaret");
        (dir, installer)
    }

    #[test]
    fn test_accept_installs_entry() {
        let (_dir, installer) = installer();
        let mut prompt = InstallPrompt::detect(&installer);
        assert!(prompt.can_prompt());
        assert_eq!(prompt.status_text(), None);

        prompt.resolve(PromptOutcome::Accepted, &installer).unwrap();

        assert!(prompt.is_installed());
        assert!(!prompt.can_prompt());
        assert_eq!(prompt.status_text(), Some("Yüklendi"));

        let contents = std::fs::read_to_string(installer.entry_path()).unwrap();
        assert!(contents.starts_with("[Desktop Entry]\n"));
        assert!(contents.contains("Exec=\"/usr/bin/ziyaret\""));
    }

    #[test]
    fn test_dismiss_is_not_retried() {
        let (_dir, installer) = installer();
        let mut prompt = InstallPrompt::detect(&installer);

        prompt.resolve(PromptOutcome::Dismissed, &installer).unwrap();
        assert!(!prompt.can_prompt());

        // En ny signal under samma session ignoreras
        prompt.handle_signal(InstallSignal::Available);
        assert!(!prompt.can_prompt());
        assert!(!installer.entry_path().exists());
    }

    #[test]
    fn test_already_installed_shows_indicator() {
        let (_dir, installer) = installer();
        installer.install().unwrap();

        let prompt = InstallPrompt::detect(&installer);
        assert!(prompt.is_installed());
        assert!(!prompt.can_prompt());
    }

    #[test]
    fn test_unsupported_platform_never_prompts() {
        let (_dir, mut installer) = installer();
        installer.supported = false;

        let prompt = InstallPrompt::detect(&installer);
        assert!(!prompt.can_prompt());
        assert!(!prompt.is_installed());
    }

    #[test]
    fn test_installed_signal_hides_button() {
        let mut prompt = InstallPrompt::new();
        prompt.handle_signal(InstallSignal::Available);
        assert!(prompt.can_prompt());
        prompt.handle_signal(InstallSignal::Installed);
        assert!(!prompt.can_prompt());
        assert!(prompt.is_installed());
    }
}
