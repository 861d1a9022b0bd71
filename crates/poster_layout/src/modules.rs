use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PosterError;

/// Role of a text field on the poster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKey {
    Headline,
    Sub,
    Info,
    Date,
}

impl ModuleKey {
    /// Reading order of the input fields.
    pub const ALL: [ModuleKey; 4] =
        [ModuleKey::Headline, ModuleKey::Sub, ModuleKey::Info, ModuleKey::Date];

    /// Font weight (100–900 scale) assigned to the role.
    pub fn weight(self) -> u16 {
        match self {
            ModuleKey::Headline => 900,
            ModuleKey::Sub => 500,
            ModuleKey::Info => 300,
            ModuleKey::Date => 200,
        }
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModuleKey::Headline => "headline",
            ModuleKey::Sub => "sub",
            ModuleKey::Info => "info",
            ModuleKey::Date => "date",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextModule {
    pub key: ModuleKey,
    pub value: String,
    pub weight: u16,
}

impl TextModule {
    pub fn new(key: ModuleKey, value: impl Into<String>) -> Self {
        Self { key, value: value.into(), weight: key.weight() }
    }
}

/// Raw contents of the four input fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleInput {
    pub headline: Option<String>,
    pub sub: Option<String>,
    pub info: Option<String>,
    pub date: Option<String>,
}

impl ModuleInput {
    fn field(&self, key: ModuleKey) -> Option<&str> {
        match key {
            ModuleKey::Headline => self.headline.as_deref(),
            ModuleKey::Sub => self.sub.as_deref(),
            ModuleKey::Info => self.info.as_deref(),
            ModuleKey::Date => self.date.as_deref(),
        }
    }
}

/// Trimmed, non-empty modules in field order.
///
/// Fails with [`PosterError::NoModules`] when every field is blank.
pub fn read_modules(input: &ModuleInput) -> Result<Vec<TextModule>, PosterError> {
    let modules: Vec<TextModule> = ModuleKey::ALL
        .into_iter()
        .filter_map(|key| {
            let value = input.field(key)?.trim();
            (!value.is_empty()).then(|| TextModule::new(key, value))
        })
        .collect();

    if modules.is_empty() {
        return Err(PosterError::NoModules);
    }

    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_skips_blank_fields() {
        let input = ModuleInput {
            headline: Some(String::from("  SALE ")),
            sub: Some(String::from("   ")),
            info: None,
            date: Some(String::from("12.06.")),
        };

        let modules = read_modules(&input).unwrap();
        assert_eq!(
            modules,
            vec![
                TextModule { key: ModuleKey::Headline, value: String::from("SALE"), weight: 900 },
                TextModule { key: ModuleKey::Date, value: String::from("12.06."), weight: 200 },
            ]
        );
    }

    #[test]
    fn keeps_field_order() {
        let input = ModuleInput {
            headline: Some(String::from("a")),
            sub: Some(String::from("b")),
            info: Some(String::from("c")),
            date: Some(String::from("d")),
        };

        let keys: Vec<ModuleKey> = read_modules(&input).unwrap().iter().map(|m| m.key).collect();
        assert_eq!(keys, ModuleKey::ALL.to_vec());
    }

    #[test]
    fn all_blank_is_rejected() {
        let input = ModuleInput { sub: Some(String::from("\t\n")), ..ModuleInput::default() };
        assert!(matches!(read_modules(&input), Err(PosterError::NoModules)));
        assert!(matches!(read_modules(&ModuleInput::default()), Err(PosterError::NoModules)));
    }
}
