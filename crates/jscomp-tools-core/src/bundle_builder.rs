use thiserror::Error;

use crate::message_id::MessageIdGenerator;
use crate::properties::PropertyMap;
use crate::xtb::TranslationBundle;

/// Text the compiler's id generator sees when handed a null message part.
const NULL_TEXT: &str = "null";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BundleBuildError {
    #[error("key {key} has a translation but no base message")]
    MissingBaseKey { key: String },
}

/// What to do with a translated key that the base file does not define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingBasePolicy {
    #[default]
    Fail,
    /// Compute the id over the text `null`, as the compiler tooling does.
    UseNullText,
}

pub fn meaning_for_key(key: &str) -> String {
    format!("MSG_{}", key.to_uppercase())
}

/// Builds one entry per source key, in source order. Ids are computed from
/// the key's meaning and the base text; entry texts come from `source`.
pub fn build_bundle(
    source: &PropertyMap,
    base: &PropertyMap,
    generator: &MessageIdGenerator,
    lang: &str,
    policy: MissingBasePolicy,
) -> Result<TranslationBundle, BundleBuildError> {
    let mut bundle = TranslationBundle::new(lang);
    for (key, text) in source.iter() {
        let base_text = match (base.get(key), policy) {
            (Some(base_text), _) => base_text,
            (None, MissingBasePolicy::UseNullText) => {
                tracing::warn!(key, "base message missing, id computed over null text");
                NULL_TEXT
            }
            (None, MissingBasePolicy::Fail) => {
                return Err(BundleBuildError::MissingBaseKey {
                    key: key.to_string(),
                });
            }
        };
        let id = generator.generate_id(&meaning_for_key(key), &[base_text]);
        bundle.push(id, text);
    }
    Ok(bundle)
}
