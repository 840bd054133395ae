use crate::models::config::{KeyboardShortcut, ShortcutAction, ShortcutMap, ShortcutModifiers};

/// Matchar tangentinmatning mot konfigurerade genvägar
pub struct ShortcutManager {
    shortcuts: ShortcutMap,
}

impl ShortcutManager {
    pub fn new(shortcuts: ShortcutMap) -> Self {
        Self { shortcuts }
    }

    /// Uppdatera genvägar (efter ändring i inställningar)
    pub fn update_shortcuts(&mut self, shortcuts: ShortcutMap) {
        self.shortcuts = shortcuts;
    }

    /// Första åtgärd vars genväg trycktes denna frame.
    /// När ett textfält har fokus släpps bara Escape (CloseModal) igenom.
    /// `capturing`: inställningsvyn spelar in en ny genväg.
    pub fn check(&self, ctx: &egui::Context, capturing: bool) -> Option<ShortcutAction> {
        if capturing {
            return None;
        }

        let text_focused = ctx.wants_keyboard_input();

        ctx.input(|input| {
            ShortcutAction::ALL.iter().copied().find(|action| {
                let Some(shortcut) = self.shortcuts.get(action) else {
                    return false;
                };
                if !input.key_pressed(shortcut.key) || !shortcut.matches(shortcut.key, &input.modifiers) {
                    return false;
                }
                !text_focused || Self::passes_text_focus(*action, shortcut)
            })
        })
    }

    fn passes_text_focus(action: ShortcutAction, shortcut: &KeyboardShortcut) -> bool {
        action == ShortcutAction::CloseModal
            && shortcut.key == egui::Key::Escape
            && !shortcut.modifiers.ctrl_or_cmd
    }

    /// Visningssträng för en åtgärds genväg (för tooltips)
    pub fn shortcut_hint(&self, action: ShortcutAction) -> Option<String> {
        self.shortcuts.get(&action).map(|s| s.display())
    }
}

/// Annan åtgärd som redan använder samma tangentkombination
pub fn find_conflict(
    shortcuts: &ShortcutMap,
    action: ShortcutAction,
    shortcut: &KeyboardShortcut,
) -> Option<ShortcutAction> {
    shortcuts
        .iter()
        .find(|(other, s)| **other != action && *s == shortcut)
        .map(|(other, _)| *other)
}

/// Spela in en tangent för genvägsändring.
/// Rena modifierare räknas inte; egui skickar dem inte som Key-händelser.
pub fn capture_shortcut(ctx: &egui::Context) -> Option<KeyboardShortcut> {
    ctx.input(|input| {
        input.events.iter().find_map(|event| match event {
            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => Some(KeyboardShortcut {
                key: *key,
                modifiers: ShortcutModifiers {
                    ctrl_or_cmd: modifiers.command,
                    shift: modifiers.shift,
                    alt: modifiers.alt,
                },
            }),
            _ => None,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::default_shortcuts;

    #[test]
    fn test_conflict_detection() {
        let shortcuts = default_shortcuts();
        let ctrl_e = KeyboardShortcut::new(egui::Key::E, true, false, false);

        assert_eq!(
            find_conflict(&shortcuts, ShortcutAction::NewCustomer, &ctrl_e),
            Some(ShortcutAction::ExportCsv)
        );
        assert_eq!(find_conflict(&shortcuts, ShortcutAction::ExportCsv, &ctrl_e), None);

        let ctrl_shift_e = KeyboardShortcut::new(egui::Key::E, true, true, false);
        assert_eq!(find_conflict(&shortcuts, ShortcutAction::NewCustomer, &ctrl_shift_e), None);
    }

    #[test]
    fn test_hint_for_default_export() {
        let manager = ShortcutManager::new(default_shortcuts());
        let hint = manager.shortcut_hint(ShortcutAction::ExportCsv).unwrap();
        assert!(hint.ends_with('E'));
    }
}
