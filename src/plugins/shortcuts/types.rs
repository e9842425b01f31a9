use serde::Serialize;

/// A toolbar button that opens a web page or a local application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    /// Button name, also the icon name.
    pub name: &'static str,
    /// Preference key holding the user's value.
    pub key: &'static str,
    pub tooltip: &'static str,
    /// Value used when the user has not set one.
    pub default_value: &'static str,
    pub default_url: &'static str,
    /// Bundle identifier offered for app shortcuts.
    pub default_app: Option<&'static str>,
}

impl Shortcut {
    pub fn is_app(&self) -> bool {
        self.default_app.is_some()
    }
}

/// Toolbar shortcuts in display order.
pub const SHORTCUTS: &[Shortcut] = &[
    Shortcut {
        name: "cmc",
        key: "cmcURL",
        tooltip: "CodeMarc",
        default_value: "https://codemarc.net",
        default_url: "https://codemarc.net",
        default_app: None,
    },
    Shortcut {
        name: "invest",
        key: "investURL",
        tooltip: "Investments",
        default_value: "com.install4j.9968-4488-2169-7623.18",
        default_url: "https://client.schwab.com/app/accounts/positions/#/",
        default_app: Some("com.install4j.9968-4488-2169-7623.18"),
    },
    Shortcut {
        name: "chatgpt",
        key: "genaiURL",
        tooltip: "ChatGPT",
        default_value: "https://ai.com",
        default_url: "https://ai.com",
        default_app: None,
    },
    Shortcut {
        name: "github",
        key: "githubURL",
        tooltip: "GitHub",
        default_value: "https://github.com",
        default_url: "https://github.com",
        default_app: None,
    },
    Shortcut {
        name: "linkedin",
        key: "linkedinURL",
        tooltip: "LinkedIn",
        default_value: "https://linkedin.com",
        default_url: "https://linkedin.com",
        default_app: None,
    },
    Shortcut {
        name: "twitter",
        key: "twitterURL",
        tooltip: "Twitter",
        default_value: "https://twitter.com",
        default_url: "https://twitter.com",
        default_app: None,
    },
    Shortcut {
        name: "instagram",
        key: "instagramURL",
        tooltip: "Instagram",
        default_value: "https://instagram.com",
        default_url: "https://instagram.com",
        default_app: None,
    },
    Shortcut {
        name: "tiktok",
        key: "tiktokURL",
        tooltip: "TikTok",
        default_value: "https://tiktok.com",
        default_url: "https://tiktok.com",
        default_app: None,
    },
    Shortcut {
        name: "notes",
        key: "notesURL",
        tooltip: "Notes",
        default_value: "com.apple.Notes",
        default_url: "https://www.icloud.com/notes",
        default_app: Some("com.apple.Notes"),
    },
    Shortcut {
        name: "calc",
        key: "calcURL",
        tooltip: "Calculator",
        default_value: "com.apple.calculator",
        default_url: "https://www.calculator.net/financial-calculator.html",
        default_app: Some("com.apple.calculator"),
    },
    Shortcut {
        name: "outlook",
        key: "mailURL",
        tooltip: "Mail",
        default_value: "com.microsoft.Outlook",
        default_url: "http://outlook.office.com/mail",
        default_app: Some("com.microsoft.Outlook"),
    },
];

/// Look up a shortcut by button name or preference key, ignoring case.
pub fn find_shortcut(name_or_key: &str) -> Option<&'static Shortcut> {
    SHORTCUTS.iter().find(|s| {
        s.name.eq_ignore_ascii_case(name_or_key) || s.key.eq_ignore_ascii_case(name_or_key)
    })
}

/// What a shortcut value resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    Url(String),
    BundleId(String),
}

impl LaunchTarget {
    /// Values with a URL scheme open in the browser; anything else is taken
    /// as an application bundle identifier. Blank values give `None`.
    pub fn classify(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if has_url_scheme(value) {
            Some(LaunchTarget::Url(value.to_string()))
        } else {
            Some(LaunchTarget::BundleId(value.to_string()))
        }
    }
}

fn has_url_scheme(value: &str) -> bool {
    if value.starts_with("mailto:") {
        return true;
    }

    match value.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        None => false,
    }
}
