use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::message_id::MessageId;
use crate::xml::escape_xml;

const BUNDLE_ELEMENT: &str = "translationbundle";
const LANG_ATTRIBUTE: &str = "lang";
const TRANSLATION_ELEMENT: &str = "translation";
const ID_ATTRIBUTE: &str = "id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    pub id: MessageId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationBundle {
    pub lang: String,
    pub entries: Vec<TranslationEntry>,
}

impl TranslationBundle {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, id: MessageId, text: impl Into<String>) {
        self.entries.push(TranslationEntry {
            id,
            text: text.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the bundle without an XML declaration. `lang` is trusted and
    /// written unescaped; ids and texts are escaped.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "<{BUNDLE_ELEMENT} {LANG_ATTRIBUTE}=\"{}\">", self.lang)?;
        for entry in &self.entries {
            writeln!(writer)?;
            write!(
                writer,
                "<{TRANSLATION_ELEMENT} {ID_ATTRIBUTE}=\"{}\">{}</{TRANSLATION_ELEMENT}>",
                escape_xml(&entry.id.to_string()),
                escape_xml(&entry.text)
            )?;
        }
        writeln!(writer)?;
        write!(writer, "</{BUNDLE_ELEMENT}>")
    }

    pub fn to_xml_string(&self) -> String {
        let mut buffer = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Creates or truncates `path` and writes the bundle as UTF-8.
pub fn write_bundle(path: &Path, bundle: &TranslationBundle) -> io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    bundle.write_to(&mut writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::{TranslationBundle, write_bundle};
    use crate::message_id::MessageId;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        path.push(format!("jscomp_tools_{name}_{nanos}.xtb"));
        path
    }

    #[test]
    fn serializes_fixed_layout() {
        let mut bundle = TranslationBundle::new("fr");
        bundle.push(MessageId::new(12), "Bonjour");
        bundle.push(MessageId::new(34), "Au revoir");
        assert_eq!(
            bundle.to_xml_string(),
            "<translationbundle lang=\"fr\">\n\
             <translation id=\"12\">Bonjour</translation>\n\
             <translation id=\"34\">Au revoir</translation>\n\
             </translationbundle>"
        );
    }

    #[test]
    fn empty_bundle_has_only_root() {
        let bundle = TranslationBundle::new("de");
        assert_eq!(
            bundle.to_xml_string(),
            "<translationbundle lang=\"de\">\n</translationbundle>"
        );
    }

    #[test]
    fn escapes_text_but_not_lang() {
        let mut bundle = TranslationBundle::new("x&y");
        bundle.push(MessageId::new(1), "a < b & \"c\"");
        let xml = bundle.to_xml_string();
        assert!(xml.starts_with("<translationbundle lang=\"x&y\">"));
        assert!(xml.contains(">a &lt; b &amp; &quot;c&quot;</translation>"));
    }

    #[test]
    fn write_bundle_truncates_existing_file() {
        let path = temp_path("bundle");
        fs::write(&path, "x".repeat(4096)).expect("write");
        let mut bundle = TranslationBundle::new("ja");
        bundle.push(MessageId::new(5), "こんにちは");
        write_bundle(&path, &bundle).expect("write bundle");
        let contents = fs::read_to_string(&path).expect("read");
        assert_eq!(contents, bundle.to_xml_string());
        assert!(contents.contains("こんにちは"));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn parses_back_to_entry_values() {
        let mut bundle = TranslationBundle::new("fr");
        bundle.push(MessageId::new(7), "Bonjour");
        bundle.push(MessageId::new(9_223_372_036_854_775_807), "<b> & \"c\" 'd' </b>");
        bundle.push(MessageId::new(0), "");
        let xml = bundle.to_xml_string();

        let doc = roxmltree::Document::parse(&xml).expect("well-formed xml");
        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "translationbundle");
        assert_eq!(root.attribute("lang"), Some("fr"));

        let parsed: Vec<(String, String)> = root
            .children()
            .filter(|node| node.is_element())
            .map(|node| {
                assert_eq!(node.tag_name().name(), "translation");
                let id = node.attribute("id").expect("id").to_string();
                (id, node.text().unwrap_or("").to_string())
            })
            .collect();
        let expected: Vec<(String, String)> = bundle
            .entries
            .iter()
            .map(|entry| (entry.id.to_string(), entry.text.clone()))
            .collect();
        assert_eq!(parsed, expected);
    }
}
