#![forbid(unsafe_code)]

mod bundle_builder;
mod message_id;
mod properties;
mod xml;
mod xtb;

pub use bundle_builder::{BundleBuildError, MissingBasePolicy, build_bundle, meaning_for_key};
pub use message_id::{MessageId, MessageIdGenerator, fingerprint, message_id};
pub use properties::{
    PropertiesError, PropertiesSyntaxError, PropertyMap, decode_properties, load_properties,
    parse_properties,
};
pub use xml::escape_xml;
pub use xtb::{TranslationBundle, TranslationEntry, write_bundle};
