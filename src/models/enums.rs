use serde::{Deserialize, Serialize};

use super::settings::SettingsError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = SettingsError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_lowercase();
                match lower.as_str() {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(SettingsError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Language {
    English => "english",
    Hindi => "hindi",
});

str_enum!(ImageSource {
    Upload => "upload",
    Camera => "camera",
});

str_enum!(AdvisorySource {
    Stored => "stored",
    Default => "default",
    LoadFailed => "load_failed",
});

impl Default for Language {
    fn default() -> Self {
        Self::English
    }
}

impl Language {
    pub fn all() -> [Language; 2] {
        [Language::English, Language::Hindi]
    }
}
