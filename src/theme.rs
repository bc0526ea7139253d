//! Light/dark theme toggle.
//!
//! Reads the shopper's preference from `localStorage` and applies a
//! `data-theme` attribute to `<body>`. Toggling writes the preference back,
//! swaps the toggle button's icon and points the navbar/footer logos at the
//! matching artwork. Logo sources come from [`ThemeAssets`], which the page
//! provides through `data-*` attributes.
//!
//! TRADE-OFFS
//! ==========
//! Preference persistence is best-effort browser-only behavior; host builds
//! always see the default theme.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use crate::util::storage;

/// `localStorage` key holding `"dark"` or `"light"`.
pub const STORAGE_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Theme for a stored (or missing) preference; unknown values mean default.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            None => Self::default(),
            Some(raw) => Self::parse(raw).unwrap_or_else(|| {
                log::debug!("ignoring unknown stored theme {raw:?}");
                Self::default()
            }),
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Toggle button content: a sun offers leaving dark mode, a moon offers entering it.
    pub fn icon_html(self) -> &'static str {
        match self {
            Self::Dark => r#"<i class="bi bi-sun"></i>"#,
            Self::Light => r#"<i class="bi bi-moon-stars"></i>"#,
        }
    }
}

/// Logo image sources per theme. Empty strings leave the image untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThemeAssets {
    pub nav_logo_dark: String,
    pub nav_logo_light: String,
    pub footer_logo_dark: String,
    pub footer_logo_light: String,
}

impl ThemeAssets {
    pub fn nav_logo(&self, theme: Theme) -> Option<&str> {
        non_empty(match theme {
            Theme::Dark => &self.nav_logo_dark,
            Theme::Light => &self.nav_logo_light,
        })
    }

    pub fn footer_logo(&self, theme: Theme) -> Option<&str> {
        non_empty(match theme {
            Theme::Dark => &self.footer_logo_dark,
            Theme::Light => &self.footer_logo_light,
        })
    }
}

fn non_empty(src: &str) -> Option<&str> {
    if src.is_empty() { None } else { Some(src) }
}

/// Read the stored preference, defaulting to dark.
pub fn read_preference() -> Theme {
    Theme::from_stored(storage::load_string(STORAGE_KEY).as_deref())
}

pub fn save_preference(theme: Theme) {
    storage::save_string(STORAGE_KEY, theme.as_str());
}

#[cfg(feature = "hydrate")]
pub use dom::ThemeToggle;

#[cfg(feature = "hydrate")]
mod dom {
    use web_sys::{HtmlElement, HtmlImageElement};

    use super::{Theme, ThemeAssets, read_preference, save_preference};

    /// Element handles the toggle manipulates.
    pub struct ThemeToggle {
        button: HtmlElement,
        nav_logo: Option<HtmlImageElement>,
        footer_logo: Option<HtmlImageElement>,
        assets: ThemeAssets,
    }

    impl ThemeToggle {
        pub fn new(
            button: HtmlElement,
            nav_logo: Option<HtmlImageElement>,
            footer_logo: Option<HtmlImageElement>,
            assets: ThemeAssets,
        ) -> Self {
            Self { button, nav_logo, footer_logo, assets }
        }

        pub fn button(&self) -> &HtmlElement {
            &self.button
        }

        /// Apply the stored preference on page load.
        pub fn restore(&self) -> Theme {
            let theme = read_preference();
            self.apply(theme);
            theme
        }

        /// Flip the theme currently on `<body>` and persist the result.
        pub fn toggle(&self) -> Theme {
            let next = current_theme().toggled();
            self.apply(next);
            save_preference(next);
            log::debug!("theme switched to {}", next.as_str());
            next
        }

        fn apply(&self, theme: Theme) {
            if let Some(body) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.body()) {
                if let Err(e) = body.set_attribute("data-theme", theme.as_str()) {
                    log::warn!("failed to set data-theme: {e:?}");
                }
            }
            self.button.set_inner_html(theme.icon_html());
            if let (Some(img), Some(src)) = (&self.nav_logo, self.assets.nav_logo(theme)) {
                img.set_src(src);
            }
            if let (Some(img), Some(src)) = (&self.footer_logo, self.assets.footer_logo(theme)) {
                img.set_src(src);
            }
        }
    }

    fn current_theme() -> Theme {
        let attr = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
            .and_then(|b| b.get_attribute("data-theme"));
        Theme::from_stored(attr.as_deref())
    }
}
