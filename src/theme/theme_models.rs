use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(AppError::Validation(format!("Unknown theme: {}", other))),
        }
    }
}

/// Which toggle icon is shown: the sun offers light mode while dark is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ThemeIcons {
    pub sun_visible: bool,
    pub moon_visible: bool,
}

impl ThemeIcons {
    pub fn for_theme(theme: Theme) -> Self {
        let dark = theme == Theme::Dark;
        Self {
            sun_visible: dark,
            moon_visible: !dark,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThemeResponse {
    pub theme: Theme,
    pub icons: ThemeIcons,
}

impl From<Theme> for ThemeResponse {
    fn from(theme: Theme) -> Self {
        Self {
            theme,
            icons: ThemeIcons::for_theme(theme),
        }
    }
}
