//! Reader for Qt Linguist `.ts` catalogs.
//!
//! The document is first read into a small element tree (xml-rs events keep
//! attribute order and raw whitespace), then mapped onto the catalog model.

use std::io::Read;
use std::path::Path;

use xml::attribute::OwnedAttribute;
use xml::reader::{
    EventReader,
    ParserConfig,
    XmlEvent,
};

use crate::error::{
    CatalogError,
    MalformedCatalogError,
};
use crate::model::{
    Catalog,
    Context,
    Extra,
    Message,
    NumerusForm,
    Translation,
};
use crate::plural::PluralFamily;
use crate::types::{
    Attributes,
    Location,
    Status,
};

/// Encodings the reader accepts in the XML declaration.
const SUPPORTED_ENCODINGS: &[&str] = &["utf-8", "utf8", "us-ascii", "ascii", "iso-8859-1", "latin1"];

#[derive(Debug)]
struct Element {
    name: String,
    attributes: Attributes,
    children: Vec<Node>,
}

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    fn unexpected(&self, parent: &str) -> MalformedCatalogError {
        MalformedCatalogError::UnexpectedElement {
            element: self.name.clone(),
            parent: parent.to_string(),
        }
    }
}

fn attribute_pair(attribute: OwnedAttribute) -> (String, String) {
    let name = match attribute.name.prefix {
        Some(prefix) => format!("{prefix}:{}", attribute.name.local_name),
        None => attribute.name.local_name,
    };
    (name, attribute.value)
}

fn check_encoding(encoding: &str) -> Result<(), MalformedCatalogError> {
    let normalized = encoding.to_ascii_lowercase();
    if SUPPORTED_ENCODINGS.contains(&normalized.as_str()) {
        Ok(())
    } else {
        Err(MalformedCatalogError::UnsupportedEncoding(encoding.to_string()))
    }
}

/// Encoding named in the XML declaration.
///
/// Read ahead of xml-rs, which fails on names it does not know with a plain
/// syntax error.
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let rest = bytes.strip_prefix(b"<?xml")?;
    let end = rest.windows(2).position(|pair| pair == b"?>")?;
    let declaration = std::str::from_utf8(rest.get(..end)?).ok()?;

    let (_, after) = declaration.split_once("encoding")?;
    let value = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = value.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    value.strip_prefix(quote)?.split_once(quote).map(|(name, _)| name)
}

fn read_tree<R: Read>(reader: R) -> Result<Element, MalformedCatalogError> {
    let config = ParserConfig::new()
        .trim_whitespace(false)
        .whitespace_to_characters(true)
        .cdata_to_characters(true)
        .coalesce_characters(true)
        .ignore_comments(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    for event in EventReader::new_with_config(reader, config) {
        match event.map_err(|e| MalformedCatalogError::Syntax(e.to_string()))? {
            XmlEvent::StartDocument { encoding, .. } => check_encoding(&encoding)?,
            XmlEvent::StartElement { name, attributes, .. } => {
                stack.push(Element {
                    name: name.local_name,
                    attributes: attributes.into_iter().map(attribute_pair).collect(),
                    children: Vec::new(),
                });
            }
            XmlEvent::EndElement { .. } => {
                let Some(element) = stack.pop() else {
                    return Err(MalformedCatalogError::Syntax("unbalanced end tag".to_string()));
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None => root = Some(element),
                }
            }
            XmlEvent::Characters(text) | XmlEvent::Whitespace(text) | XmlEvent::CData(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(text));
                }
            }
            _ => {}
        }
    }

    root.ok_or(MalformedCatalogError::MissingRoot)
}

/// Parses catalog bytes.
///
/// # Errors
/// Returns [`MalformedCatalogError`] on any structural problem; no partial
/// catalog is produced.
pub fn parse_catalog(bytes: &[u8]) -> Result<Catalog, MalformedCatalogError> {
    if let Some(encoding) = declared_encoding(bytes) {
        check_encoding(encoding)?;
    }
    let root = read_tree(bytes)?;
    build_catalog(root)
}

/// Reads and parses a catalog file.
///
/// When the document has no `language` attribute it is guessed from the file
/// name (`qt_pt_BR.ts` → `pt_BR`).
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    tracing::debug!(path = %path.display(), "Loading catalog");
    let bytes = std::fs::read(path)?;
    let mut catalog = parse_catalog(&bytes)?;

    if catalog.language.is_empty()
        && let Some(language) = detect_language_from_path(path)
    {
        tracing::info!(path = %path.display(), %language, "Catalog has no language; guessed from file name");
        catalog.language = language;
    }

    tracing::debug!(
        path = %path.display(),
        contexts = catalog.contexts().count(),
        messages = catalog.len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

/// Detect language from file name heuristically
///
/// Splits the file stem by '_' and '.', then returns the first suffix whose
/// leading part is a language with known plural rules.
///
/// # Examples
/// - `nls/qt_tr.ts` → `tr`
/// - `nls/VirtualBox_pt_BR.ts` → `pt_BR`
/// - `nls/strings.ts` → `None`
#[must_use]
pub fn detect_language_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    let parts: Vec<&str> = stem.split(['_', '.']).collect();

    (0..parts.len()).find_map(|start| {
        let head = parts.get(start)?;
        let is_code = (2..=3).contains(&head.len()) && head.chars().all(|c| c.is_ascii_lowercase());
        if !is_code {
            return None;
        }
        let candidate = parts.get(start..)?.join("_");
        PluralFamily::for_language(&candidate).is_ok().then_some(candidate)
    })
}

fn ensure_blank(text: &str, parent: &str) -> Result<(), MalformedCatalogError> {
    if text.trim().is_empty() {
        Ok(())
    } else {
        Err(MalformedCatalogError::UnexpectedText(parent.to_string()))
    }
}

fn build_catalog(root: Element) -> Result<Catalog, MalformedCatalogError> {
    if root.name != "TS" {
        return Err(MalformedCatalogError::UnexpectedRoot(root.name));
    }

    let mut catalog = Catalog::new("");
    catalog.version = None;
    for (key, value) in root.attributes {
        match key.as_str() {
            "version" => catalog.version = Some(value),
            "language" => catalog.language = value,
            "sourcelanguage" => catalog.source_language = Some(value),
            _ => catalog.attributes.push((key, value)),
        }
    }

    for child in root.children {
        match child {
            Node::Text(text) => ensure_blank(&text, "TS")?,
            Node::Element(element) if element.name == "context" => {
                catalog.add_context(read_context(element)?);
            }
            Node::Element(element) => return Err(element.unexpected("TS")),
        }
    }

    Ok(catalog)
}

fn read_context(element: Element) -> Result<Context, MalformedCatalogError> {
    let mut name = None;
    let mut context = Context::default();
    context.attributes = element.attributes;

    for child in element.children {
        match child {
            Node::Text(text) => ensure_blank(&text, "context")?,
            Node::Element(child) => match child.name.as_str() {
                "name" => name = Some(text_content(child)?),
                "comment" => context.comment = Some(text_content(child)?),
                "message" => context.push(read_message(child)?),
                _ => return Err(child.unexpected("context")),
            },
        }
    }

    context.name = name.ok_or_else(|| MalformedCatalogError::MissingElement {
        element: "name".to_string(),
        parent: "context".to_string(),
    })?;
    Ok(context)
}

fn read_message(element: Element) -> Result<Message, MalformedCatalogError> {
    let mut message = Message::default();
    for (key, value) in element.attributes {
        match key.as_str() {
            "id" => message.id = Some(value),
            "numerus" => {
                message.numerus = match value.as_str() {
                    "yes" => true,
                    "no" => false,
                    _ => {
                        return Err(MalformedCatalogError::InvalidAttribute {
                            element: "message".to_string(),
                            attribute: key,
                            value,
                        });
                    }
                };
            }
            _ => message.attributes.push((key, value)),
        }
    }

    let mut source = None;
    let mut translation = None;
    for child in element.children {
        let child = match child {
            Node::Text(text) => {
                ensure_blank(&text, "message")?;
                continue;
            }
            Node::Element(child) => child,
        };
        match child.name.as_str() {
            "location" => {
                message.locations.insert(read_location(&child)?);
            }
            "source" => source = Some(text_content(child)?),
            "oldsource" => message.old_source = Some(text_content(child)?),
            "comment" => message.comment = Some(text_content(child)?),
            "oldcomment" => message.old_comment = Some(text_content(child)?),
            "extracomment" => message.extra_comment = Some(text_content(child)?),
            "translatorcomment" => message.translator_comment = Some(text_content(child)?),
            "userdata" => message.userdata = Some(text_content(child)?),
            "translation" => translation = Some(child),
            name if name.starts_with("extra-") => {
                let name = child.name.clone();
                message.extras.push(Extra { name, content: text_content(child)? });
            }
            _ => return Err(child.unexpected("message")),
        }
    }

    message.source = source.ok_or_else(|| MalformedCatalogError::MissingElement {
        element: "source".to_string(),
        parent: "message".to_string(),
    })?;

    match translation {
        Some(element) => read_translation(element, &mut message)?,
        None => {
            message.translation = Translation::empty(message.numerus, 0);
            message.status = Status::Unfinished;
        }
    }

    if message.status == Status::Vanished && !message.locations.is_empty() {
        tracing::debug!(source = %message.source, "Dropping locations of vanished message");
        message.locations.clear();
    }

    Ok(message)
}

fn read_location(element: &Element) -> Result<Location, MalformedCatalogError> {
    let attribute = |name: &str| {
        element.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    };
    let missing = |name: &str| MalformedCatalogError::MissingAttribute {
        element: "location".to_string(),
        attribute: name.to_string(),
    };

    let file = attribute("filename").ok_or_else(|| missing("filename"))?;
    let line = attribute("line").ok_or_else(|| missing("line"))?;
    let line = line.parse::<u32>().map_err(|_| MalformedCatalogError::InvalidAttribute {
        element: "location".to_string(),
        attribute: "line".to_string(),
        value: line.to_string(),
    })?;

    Ok(Location::new(file, line))
}

fn read_translation(element: Element, message: &mut Message) -> Result<(), MalformedCatalogError> {
    let mut status_attr = None;
    for (key, value) in element.attributes {
        if key == "type" {
            status_attr = Some(value);
        } else {
            message.translation_attributes.push((key, value));
        }
    }
    message.status = Status::from_type_attr(status_attr.as_deref(), &message.source)?;

    if !message.numerus {
        let children = element.children;
        message.translation = Translation::Single(collect_text(children, "translation")?);
        return Ok(());
    }

    let mut forms = Vec::new();
    let mut loose_text = String::new();
    for child in element.children {
        match child {
            Node::Text(text) => loose_text.push_str(&text),
            Node::Element(child) if child.name == "numerusform" => {
                forms.push(read_numerus_form(child)?);
            }
            Node::Element(child) => return Err(child.unexpected("translation")),
        }
    }

    // A numerus message written without <numerusform> slots carries its only
    // form as plain text.
    if forms.is_empty() && !loose_text.trim().is_empty() {
        forms.push(NumerusForm::new(loose_text));
    } else {
        ensure_blank(&loose_text, "translation")?;
    }
    message.translation = Translation::Plural(forms);
    Ok(())
}

fn read_numerus_form(element: Element) -> Result<NumerusForm, MalformedCatalogError> {
    let mut form = NumerusForm::default();
    for (key, value) in element.attributes {
        if key == "type" {
            form.unfinished = match value.as_str() {
                "unfinished" => true,
                _ => {
                    return Err(MalformedCatalogError::InvalidAttribute {
                        element: "numerusform".to_string(),
                        attribute: key,
                        value,
                    });
                }
            };
        } else {
            form.attributes.push((key, value));
        }
    }
    form.text = collect_text(element.children, "numerusform")?;
    Ok(form)
}

fn text_content(element: Element) -> Result<String, MalformedCatalogError> {
    let name = element.name;
    collect_text(element.children, &name)
}

/// Concatenates text children, decoding `<byte value=".."/>` escapes.
fn collect_text(children: Vec<Node>, parent: &str) -> Result<String, MalformedCatalogError> {
    let mut text = String::new();
    for child in children {
        match child {
            Node::Text(chunk) => text.push_str(&chunk),
            Node::Element(element) if element.name == "byte" => {
                text.push(decode_byte(&element)?);
            }
            Node::Element(element) => return Err(element.unexpected(parent)),
        }
    }
    Ok(text)
}

/// `value` holds a decimal (`27`) or hex (`x1b`, `0x1b`) code point.
fn decode_byte(element: &Element) -> Result<char, MalformedCatalogError> {
    let raw = element
        .attributes
        .iter()
        .find(|(key, _)| key == "value")
        .map(|(_, value)| value.as_str())
        .ok_or_else(|| MalformedCatalogError::MissingAttribute {
            element: "byte".to_string(),
            attribute: "value".to_string(),
        })?;

    let parsed = if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix('x')) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        raw.parse::<u32>().ok()
    };

    parsed.and_then(char::from_u32).ok_or_else(|| invalid_byte(raw))
}

fn invalid_byte(raw: &str) -> MalformedCatalogError {
    MalformedCatalogError::InvalidAttribute {
        element: "byte".to_string(),
        attribute: "value".to_string(),
        value: raw.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use std::path::Path;

    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn parse(text: &str) -> Result<Catalog, MalformedCatalogError> {
        parse_catalog(text.as_bytes())
    }

    fn wrap(messages: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS version=\"2.1\" language=\"tr\">\n<context>\n    <name>Widget</name>\n{messages}</context>\n</TS>\n"
        )
    }

    #[googletest::test]
    fn test_parse_simple_catalog() {
        let catalog = parse(&wrap(
            "    <message>\n        <source>Close Tab</source>\n        <translation>Sekmeyi Kapat</translation>\n    </message>\n",
        ))
        .unwrap();

        expect_that!(catalog.language, eq("tr"));
        expect_that!(catalog.version.as_deref(), some(eq("2.1")));
        let context = catalog.context("Widget").unwrap();
        expect_that!(context.len(), eq(1));
        let message = &context.messages()[0];
        expect_that!(message.source, eq("Close Tab"));
        expect_that!(message.text(), some(eq("Sekmeyi Kapat")));
        expect_that!(message.status, eq(Status::Finished));
    }

    #[googletest::test]
    fn test_parse_decodes_entities_once() {
        let catalog = parse(&wrap(
            "    <message>\n        <source>&lt;b&gt;&quot;%1&quot; &amp;amp; &apos;x&apos;&lt;/b&gt;</source>\n        <translation type=\"unfinished\"></translation>\n    </message>\n",
        ))
        .unwrap();

        let message = &catalog.context("Widget").unwrap().messages()[0];
        expect_that!(message.source, eq("<b>\"%1\" &amp; 'x'</b>"));
        expect_that!(message.status, eq(Status::Unfinished));
    }

    #[googletest::test]
    fn test_parse_full_message() {
        let catalog = parse(&wrap(
            r#"    <message id="save.failed" numerus="yes" extra="kept">
        <location filename="../a.cpp" line="10"/>
        <location filename="../b.cpp" line="7"/>
        <source>%n file(s) failed</source>
        <comment>toolbar</comment>
        <extracomment>%n is a count</extracomment>
        <translatorcomment>check wording</translatorcomment>
        <translation type="unfinished">
            <numerusform>%n dosya başarısız</numerusform>
            <numerusform type="unfinished"></numerusform>
        </translation>
        <extra-po-flags>c-format</extra-po-flags>
    </message>
"#,
        ))
        .unwrap();

        let message = &catalog.context("Widget").unwrap().messages()[0];
        expect_that!(message.id.as_deref(), some(eq("save.failed")));
        expect_that!(message.numerus, eq(true));
        expect_that!(message.comment.as_deref(), some(eq("toolbar")));
        expect_that!(message.extra_comment.as_deref(), some(eq("%n is a count")));
        expect_that!(message.translator_comment.as_deref(), some(eq("check wording")));
        expect_that!(message.locations.len(), eq(2));
        assert_eq!(message.locations.as_slice()[1], Location::new("../b.cpp", 7));
        expect_that!(message.attributes.len(), eq(1));
        expect_that!(message.extras.len(), eq(1));
        expect_that!(message.extras[0].content, eq("c-format"));

        let forms = message.translation.forms().unwrap();
        expect_that!(forms.len(), eq(2));
        expect_that!(forms[0].text, eq("%n dosya başarısız"));
        expect_that!(forms[0].unfinished, eq(false));
        expect_that!(forms[1].unfinished, eq(true));
    }

    #[googletest::test]
    fn test_parse_keeps_significant_whitespace() {
        let catalog = parse(&wrap(
            "    <message>\n        <source>  Name: </source>\n        <translation> Ad:\n</translation>\n    </message>\n",
        ))
        .unwrap();

        let message = &catalog.context("Widget").unwrap().messages()[0];
        expect_that!(message.source, eq("  Name: "));
        expect_that!(message.text(), some(eq(" Ad:\n")));
    }

    #[googletest::test]
    fn test_parse_byte_elements() {
        let catalog = parse(&wrap(
            "    <message>\n        <source>a<byte value=\"x1b\"/>b<byte value=\"7\"/></source>\n        <translation></translation>\n    </message>\n",
        ))
        .unwrap();

        let message = &catalog.context("Widget").unwrap().messages()[0];
        expect_that!(message.source, eq("a\u{1b}b\u{7}"));
    }

    #[rstest]
    fn test_parse_vanished_drops_locations() {
        let catalog = parse(&wrap(
            "    <message>\n        <location filename=\"a.cpp\" line=\"3\"/>\n        <source>Old</source>\n        <translation type=\"vanished\">Eski</translation>\n    </message>\n",
        ))
        .unwrap();

        let message = &catalog.context("Widget").unwrap().messages()[0];
        assert_eq!(message.status, Status::Vanished);
        assert!(message.locations.is_empty());
    }

    #[rstest]
    fn test_unknown_status_is_malformed() {
        let result = parse(&wrap(
            "    <message>\n        <source>Save</source>\n        <translation type=\"approved\">Kaydet</translation>\n    </message>\n",
        ));

        assert_eq!(
            result,
            Err(MalformedCatalogError::UnknownStatus {
                value: "approved".to_string(),
                source_text: "Save".to_string(),
            })
        );
    }

    #[rstest]
    fn test_unexpected_root() {
        let result = parse("<?xml version=\"1.0\"?>\n<html><body/></html>\n");

        assert_eq!(result, Err(MalformedCatalogError::UnexpectedRoot("html".to_string())));
    }

    #[rstest]
    fn test_unclosed_tag_is_syntax_error() {
        let result = parse("<?xml version=\"1.0\"?>\n<TS version=\"2.1\" language=\"tr\">\n<context>\n");

        assert!(matches!(result, Err(MalformedCatalogError::Syntax(_))));
    }

    #[rstest]
    #[case::unknown("x-bogus-42")]
    #[case::utf16("UTF-16")]
    #[case::windows("windows-1252")]
    fn test_unsupported_encoding_is_rejected(#[case] encoding: &str) {
        let result = parse(&format!("<?xml version=\"1.0\" encoding=\"{encoding}\"?>\n<TS language=\"tr\"/>\n"));

        assert_eq!(result, Err(MalformedCatalogError::UnsupportedEncoding(encoding.to_string())));
    }

    #[rstest]
    #[case::latin1(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n".as_slice(), b"Fa\xe7ade".as_slice(), "Façade")]
    #[case::latin1_single_quotes(b"<?xml version='1.0' encoding='latin1'?>\n".as_slice(), b"Fa\xe7ade".as_slice(), "Façade")]
    #[case::ascii(b"<?xml version=\"1.0\" encoding=\"US-ASCII\"?>\n".as_slice(), b"Facade".as_slice(), "Facade")]
    #[case::utf8_default(b"<?xml version=\"1.0\"?>\n".as_slice(), "Façade".as_bytes(), "Façade")]
    fn test_declared_encoding_is_honored(#[case] declaration: &[u8], #[case] source: &[u8], #[case] expected: &str) {
        let mut bytes = declaration.to_vec();
        bytes.extend_from_slice(b"<TS version=\"2.1\" language=\"fr\">\n<context>\n    <name>W</name>\n    <message>\n        <source>");
        bytes.extend_from_slice(source);
        bytes.extend_from_slice(b"</source>\n        <translation>x</translation>\n    </message>\n</context>\n</TS>\n");

        let catalog = parse_catalog(&bytes).unwrap();

        assert_that!(catalog.context("W").unwrap().messages()[0].source, eq(expected));
    }

    #[rstest]
    #[case::unknown_child("<message><source>A</source><bogus/></message>")]
    #[case::missing_source("<message><translation>x</translation></message>")]
    #[case::bad_line("<message><location filename=\"a.cpp\" line=\"ten\"/><source>A</source></message>")]
    #[case::bad_numerus("<message numerus=\"maybe\"><source>A</source></message>")]
    #[case::length_variant(
        "<message><source>A</source><translation variants=\"yes\"><lengthvariant>a</lengthvariant></translation></message>"
    )]
    fn test_structural_errors(#[case] message: &str) {
        assert!(parse(&wrap(message)).is_err());
    }

    #[rstest]
    fn test_context_without_name() {
        let result = parse("<TS language=\"tr\"><context><message><source>A</source></message></context></TS>");

        assert_eq!(
            result,
            Err(MalformedCatalogError::MissingElement {
                element: "name".to_string(),
                parent: "context".to_string(),
            })
        );
    }

    #[rstest]
    fn test_unknown_root_attributes_are_kept() {
        let catalog = parse("<TS version=\"2.1\" language=\"it_IT\" sourcelanguage=\"en\" x-tool=\"lupdate\"></TS>").unwrap();

        assert_eq!(catalog.source_language.as_deref(), Some("en"));
        assert_eq!(catalog.attributes, vec![("x-tool".to_string(), "lupdate".to_string())]);
    }

    #[rstest]
    #[case("nls/qt_tr.ts", Some("tr"))]
    #[case("nls/qt_pt_BR.ts", Some("pt_BR"))]
    #[case("nls/VirtualBox_hr_HR.ts", Some("hr_HR"))]
    #[case("nls/strings.ts", None)]
    #[case("nls/qt.ts", None)]
    fn test_detect_language_from_path(#[case] path: &str, #[case] expected: Option<&str>) {
        assert_eq!(detect_language_from_path(Path::new(path)).as_deref(), expected);
    }

    #[rstest]
    fn test_load_catalog_guesses_language() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("qt_sl.ts");
        std::fs::write(&path, "<TS version=\"2.1\"></TS>").unwrap();

        let catalog = load_catalog(&path).unwrap();

        assert_eq!(catalog.language, "sl");
    }

    #[rstest]
    fn test_load_catalog_missing_file() {
        let result = load_catalog(Path::new("/nonexistent/qt_tr.ts"));

        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
