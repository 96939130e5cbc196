// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::LazyLock;

const DEFAULT_LANG: &str = "pt";

// Catálogos embutidos no binário
const CATALOGS: &[(&str, &str)] = &[
    ("pt", include_str!("../../locales/pt.json")),
    ("en", include_str!("../../locales/en.json")),
];

static GLOBAL: LazyLock<I18nStore> = LazyLock::new(|| {
    I18nStore::load().unwrap_or_else(|e| {
        tracing::error!("🔥 Falha ao carregar traduções: {}", e);
        I18nStore::default()
    })
});

/// Mensagens de erro por idioma, indexadas pela chave de `AppError::key`.
#[derive(Debug, Default)]
pub struct I18nStore {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| anyhow::anyhow!("catálogo '{}' inválido: {}", lang, e))?;
            catalogs.insert(lang.to_string(), messages);
        }
        Ok(Self { catalogs })
    }

    pub fn global() -> &'static I18nStore {
        &GLOBAL
    }

    /// Traduz a chave; idioma desconhecido cai para `pt`, chave desconhecida volta como está.
    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        let template = self
            .catalogs
            .get(lang)
            .and_then(|c| c.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)));

        let Some(template) = template else {
            return key.to_string();
        };

        args.iter().fold(template.clone(), |msg, (name, value)| {
            msg.replace(&format!("{{{}}}", name), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_portuguese() {
        let store = I18nStore::load().unwrap();
        assert_eq!(
            store.translate("de", "duplicate_pastor", &[]),
            store.translate("pt", "duplicate_pastor", &[])
        );
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("en", "no.such.key", &[]), "no.such.key");
    }

    #[test]
    fn interpolates_named_arguments() {
        let store = I18nStore::load().unwrap();
        let msg = store.translate("en", "plan_create", &[("detail", "disk full".into())]);
        assert_eq!(msg, "Error creating plan: disk full");
    }
}
