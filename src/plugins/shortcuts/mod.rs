pub mod launcher;
pub mod types;

use crate::core::settings::AppSettings;
use launcher::ShortcutError;
use types::{find_shortcut, LaunchTarget};

/// Resolve a toolbar shortcut to what it should open, honoring user overrides.
pub fn resolve_shortcut(settings: &AppSettings, name: &str) -> Result<LaunchTarget, ShortcutError> {
    let shortcut =
        find_shortcut(name).ok_or_else(|| ShortcutError::UnknownShortcut(name.to_string()))?;
    let value = settings.preference(shortcut.key).unwrap_or_default();
    LaunchTarget::classify(&value).ok_or(ShortcutError::EmptyValue)
}

/// Resolve and launch a toolbar shortcut.
pub fn open_shortcut(settings: &AppSettings, name: &str) -> Result<LaunchTarget, ShortcutError> {
    let target = resolve_shortcut(settings, name)?;
    launcher::launch(&target)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_default_value() {
        let settings = AppSettings::default();
        assert_eq!(
            resolve_shortcut(&settings, "github").unwrap(),
            LaunchTarget::Url("https://github.com".to_string())
        );
        assert_eq!(
            resolve_shortcut(&settings, "notes").unwrap(),
            LaunchTarget::BundleId("com.apple.Notes".to_string())
        );
    }

    #[test]
    fn test_resolve_uses_override() {
        let mut settings = AppSettings::default();
        settings
            .set_preference("calcURL", "https://www.calculator.net/financial-calculator.html")
            .unwrap();
        assert_eq!(
            resolve_shortcut(&settings, "calc").unwrap(),
            LaunchTarget::Url("https://www.calculator.net/financial-calculator.html".to_string())
        );
    }

    #[test]
    fn test_resolve_unknown_shortcut() {
        let settings = AppSettings::default();
        assert!(matches!(
            resolve_shortcut(&settings, "myspace"),
            Err(ShortcutError::UnknownShortcut(_))
        ));
    }
}
