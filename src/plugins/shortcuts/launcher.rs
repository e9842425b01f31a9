use super::types::LaunchTarget;
use std::path::Path;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShortcutError {
    #[error("Unknown shortcut: {0}")]
    UnknownShortcut(String),
    #[error("Shortcut has no value")]
    EmptyValue,
    #[error("Failed to launch {target}: {reason}")]
    LaunchFailed { target: String, reason: String },
    #[error("App lookup failed for {app}: {reason}")]
    LookupFailed { app: String, reason: String },
    #[error("Not supported on this platform: {0}")]
    Unsupported(String),
}

/// Open a URL in the default browser or start an application.
pub fn launch(target: &LaunchTarget) -> Result<(), ShortcutError> {
    tracing::info!(target: "shortcuts", "Launching {:?}", target);

    match target {
        LaunchTarget::Url(url) => open_path(url),
        LaunchTarget::BundleId(bundle_id) => open_bundle(bundle_id),
    }
}

/// Show a directory in the platform file manager.
pub fn reveal_dir(path: &Path) -> Result<(), ShortcutError> {
    open_path(&path.to_string_lossy())
}

#[cfg(target_os = "macos")]
fn open_path(target: &str) -> Result<(), ShortcutError> {
    spawn(Command::new("open").arg(target), target)
}

#[cfg(not(target_os = "macos"))]
fn open_path(target: &str) -> Result<(), ShortcutError> {
    spawn(Command::new("xdg-open").arg(target), target).or_else(|_| {
        // Fallback: gio ships with most GTK desktops
        spawn(Command::new("gio").arg("open").arg(target), target)
    })
}

#[cfg(target_os = "macos")]
fn open_bundle(bundle_id: &str) -> Result<(), ShortcutError> {
    spawn(Command::new("open").args(["-b", bundle_id]), bundle_id)
}

#[cfg(not(target_os = "macos"))]
fn open_bundle(bundle_id: &str) -> Result<(), ShortcutError> {
    Err(ShortcutError::Unsupported(format!(
        "opening app bundle {}",
        bundle_id
    )))
}

fn spawn(command: &mut Command, target: &str) -> Result<(), ShortcutError> {
    command
        .spawn()
        .map(|_| ())
        .map_err(|e| ShortcutError::LaunchFailed {
            target: target.to_string(),
            reason: e.to_string(),
        })
}

/// Resolve an application name to its bundle identifier via AppleScript.
#[cfg(target_os = "macos")]
pub fn lookup_bundle_id(app_name: &str) -> Result<String, ShortcutError> {
    let script = format!("id of app \"{}\"", app_name.replace('"', "\\\""));
    let output = Command::new("osascript")
        .args(["-e", &script])
        .output()
        .map_err(|e| ShortcutError::LookupFailed {
            app: app_name.to_string(),
            reason: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    parse_lookup_output(app_name, output.status.success(), &stdout, &stderr)
}

#[cfg(not(target_os = "macos"))]
pub fn lookup_bundle_id(app_name: &str) -> Result<String, ShortcutError> {
    Err(ShortcutError::Unsupported(format!(
        "looking up bundle id for {}",
        app_name
    )))
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn parse_lookup_output(
    app_name: &str,
    success: bool,
    stdout: &str,
    stderr: &str,
) -> Result<String, ShortcutError> {
    let bundle_id = stdout.trim();
    if !success || bundle_id.is_empty() || bundle_id.contains("execution error") {
        let reason = if stderr.trim().is_empty() {
            bundle_id.to_string()
        } else {
            stderr.trim().to_string()
        };
        tracing::warn!(target: "shortcuts", "Error looking up app {}: {}", app_name, reason);
        return Err(ShortcutError::LookupFailed {
            app: app_name.to_string(),
            reason,
        });
    }

    Ok(bundle_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup_output_success() {
        let id = parse_lookup_output("Notes", true, "com.apple.Notes\n", "").unwrap();
        assert_eq!(id, "com.apple.Notes");
    }

    #[test]
    fn test_parse_lookup_output_execution_error() {
        let err = parse_lookup_output(
            "Nope",
            false,
            "",
            "execution error: Can’t get application \"Nope\". (-1728)",
        )
        .unwrap_err();
        assert!(matches!(err, ShortcutError::LookupFailed { .. }));
    }

    #[test]
    fn test_parse_lookup_output_empty_stdout() {
        assert!(parse_lookup_output("Ghost", true, "  \n", "").is_err());
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_bundle_ids_unsupported_off_macos() {
        let target = LaunchTarget::BundleId("com.apple.Notes".to_string());
        assert!(matches!(launch(&target), Err(ShortcutError::Unsupported(_))));
    }
}
