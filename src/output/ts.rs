//! Writer for Qt Linguist `.ts` catalogs.
//!
//! Output follows the layout lupdate produces (four-space indentation, one
//! element per line, implicit `Finished` status) so that an unmodified catalog
//! is written back byte for byte.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};
use tempfile::NamedTempFile;

use crate::error::{
    CatalogError,
    UnwritableAttributeError,
};
use crate::model::{
    Catalog,
    Context,
    Message,
    NumerusForm,
    Translation,
};
use crate::types::{
    Attributes,
    Status,
};

/// How `<location>` elements are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationsMode {
    /// `<location filename=".." line=".."/>` for every recorded location.
    #[default]
    Absolute,
    /// No location elements at all.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    pub locations: LocationsMode,
}

/// Serializes a catalog to text.
///
/// # Errors
/// Returns [`UnwritableAttributeError`] if an attribute value (a location file
/// name, an opaque attribute...) holds a character XML 1.0 cannot represent.
/// Text content never fails: such characters are written as `<byte>` elements.
pub fn write_catalog(catalog: &Catalog, options: &WriteOptions) -> Result<String, UnwritableAttributeError> {
    let mut out = String::with_capacity(catalog.len() * 128);
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS");

    if let Some(version) = &catalog.version {
        push_attribute(&mut out, "version", version)?;
    }
    push_attribute(&mut out, "language", &catalog.language)?;
    if let Some(source_language) = &catalog.source_language {
        push_attribute(&mut out, "sourcelanguage", source_language)?;
    }
    push_attributes(&mut out, &catalog.attributes)?;
    out.push_str(">\n");

    for context in catalog.contexts() {
        write_context(&mut out, context, options)?;
    }

    out.push_str("</TS>\n");
    Ok(out)
}

/// Writes a catalog file.
///
/// The content goes to a temporary file next to `path` which then replaces
/// `path`, so an interrupted write leaves the previous file intact.
///
/// # Errors
/// Returns [`CatalogError::Unwritable`] if the catalog cannot be serialized
/// and [`CatalogError::Io`] if the temporary file cannot be written or moved
/// into place. In both cases `path` is left untouched.
pub fn save_catalog(path: &Path, catalog: &Catalog, options: &WriteOptions) -> Result<(), CatalogError> {
    let text = write_catalog(catalog, options)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(text.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), bytes = text.len(), "Catalog saved");
    Ok(())
}

fn write_context(out: &mut String, context: &Context, options: &WriteOptions) -> Result<(), UnwritableAttributeError> {
    out.push_str("<context");
    push_attributes(out, &context.attributes)?;
    out.push_str(">\n");
    push_element(out, 4, "name", &context.name);
    if let Some(comment) = &context.comment {
        push_element(out, 4, "comment", comment);
    }
    for message in context.messages() {
        write_message(out, message, options)?;
    }
    out.push_str("</context>\n");
    Ok(())
}

fn write_message(out: &mut String, message: &Message, options: &WriteOptions) -> Result<(), UnwritableAttributeError> {
    out.push_str("    <message");
    if let Some(id) = &message.id {
        push_attribute(out, "id", id)?;
    }
    if message.numerus {
        push_attribute(out, "numerus", "yes")?;
    }
    push_attributes(out, &message.attributes)?;
    out.push_str(">\n");

    if options.locations == LocationsMode::Absolute && message.status != Status::Vanished {
        for location in &message.locations {
            out.push_str("        <location");
            push_attribute(out, "filename", &location.file)?;
            let _ = writeln!(out, " line=\"{}\"/>", location.line);
        }
    }

    push_element(out, 8, "source", &message.source);
    let optional = [
        ("oldsource", &message.old_source),
        ("comment", &message.comment),
        ("oldcomment", &message.old_comment),
        ("extracomment", &message.extra_comment),
        ("translatorcomment", &message.translator_comment),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            push_element(out, 8, name, value);
        }
    }

    write_translation(out, message)?;

    if let Some(userdata) = &message.userdata {
        push_element(out, 8, "userdata", userdata);
    }
    for extra in &message.extras {
        push_element(out, 8, &extra.name, &extra.content);
    }

    out.push_str("    </message>\n");
    Ok(())
}

fn write_translation(out: &mut String, message: &Message) -> Result<(), UnwritableAttributeError> {
    out.push_str("        <translation");
    if let Some(status) = message.status.type_attr() {
        push_attribute(out, "type", status)?;
    }
    push_attributes(out, &message.translation_attributes)?;
    out.push('>');

    match &message.translation {
        Translation::Single(text) => push_text(out, text),
        // numerusform 要素は numerus="yes" のメッセージでしか読めない
        Translation::Plural(forms) if !message.numerus => {
            push_text(out, forms.first().map_or("", |form| form.text.as_str()));
        }
        Translation::Plural(forms) if forms.is_empty() => {}
        Translation::Plural(forms) => {
            out.push('\n');
            for form in forms {
                write_numerus_form(out, form)?;
            }
            out.push_str("        ");
        }
    }

    out.push_str("</translation>\n");
    Ok(())
}

fn write_numerus_form(out: &mut String, form: &NumerusForm) -> Result<(), UnwritableAttributeError> {
    out.push_str("            <numerusform");
    if form.unfinished {
        push_attribute(out, "type", "unfinished")?;
    }
    push_attributes(out, &form.attributes)?;
    out.push('>');
    push_text(out, &form.text);
    out.push_str("</numerusform>\n");
    Ok(())
}

fn push_element(out: &mut String, indent: usize, name: &str, text: &str) {
    out.extend(std::iter::repeat_n(' ', indent));
    let _ = write!(out, "<{name}>");
    push_text(out, text);
    let _ = writeln!(out, "</{name}>");
}

fn push_attributes(out: &mut String, attributes: &Attributes) -> Result<(), UnwritableAttributeError> {
    for (name, value) in attributes {
        push_attribute(out, name, value)?;
    }
    Ok(())
}

fn push_attribute(out: &mut String, name: &str, value: &str) -> Result<(), UnwritableAttributeError> {
    let _ = write!(out, " {name}=\"");
    for c in value.chars() {
        match c {
            '\t' | '\n' | '\r' => {
                let _ = write!(out, "&#{};", u32::from(c));
            }
            c if is_xml_restricted(c) => {
                return Err(UnwritableAttributeError { attribute: name.to_string(), code: u32::from(c) });
            }
            c => push_escaped_char(out, c),
        }
    }
    out.push('"');
    Ok(())
}

/// Escapes character data. Characters XML 1.0 cannot carry (NUL, control
/// characters other than TAB and LF, U+FFFE, U+FFFF) are written as `<byte>`
/// elements, as are CR and DEL.
fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '\t' | '\n' => out.push(c),
            c if is_xml_restricted(c) || c == '\u{7f}' || c == '\r' => {
                let _ = write!(out, "<byte value=\"x{:x}\"/>", u32::from(c));
            }
            c => push_escaped_char(out, c),
        }
    }
}

/// Not a `Char` in XML 1.0, so neither literal text nor a character reference.
const fn is_xml_restricted(c: char) -> bool {
    matches!(c, '\0'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}')
}

/// Non-ASCII whitespace (NBSP, thin space...) is written as a character
/// reference, like lupdate does, so it stays visible in the file.
fn push_escaped_char(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&apos;"),
        c if !c.is_ascii() && c.is_whitespace() => {
            let _ = write!(out, "&#x{:x};", u32::from(c));
        }
        c => out.push(c),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::input::parse_catalog;
    use crate::test_utils::{
        catalog_with,
        translated,
    };
    use crate::types::Location;

    const HEADER: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n";

    fn write(catalog: &Catalog) -> String {
        write_catalog(catalog, &WriteOptions::default()).unwrap()
    }

    #[rstest]
    fn test_write_minimal_catalog() {
        let catalog = catalog_with("tr", &[("CloseButton", vec![translated("Close Tab", "Sekmeyi Kapat")])]);

        let expected = format!(
            "{HEADER}<TS version=\"2.1\" language=\"tr\">
<context>
    <name>CloseButton</name>
    <message>
        <source>Close Tab</source>
        <translation>Sekmeyi Kapat</translation>
    </message>
</context>
</TS>
"
        );
        assert_eq!(write(&catalog), expected);
    }

    #[rstest]
    fn test_write_status_and_locations() {
        let mut unfinished = Message::new("Save failed");
        unfinished.locations.insert(Location::new("../a.cpp", 10));
        unfinished.locations.insert(Location::new("../b.cpp", 3));
        let mut vanished = translated("Old", "Eski").with_status(Status::Vanished);
        vanished.locations.insert(Location::new("../c.cpp", 1));
        let mut obsolete = translated("Gone", "Gitti").with_status(Status::Obsolete);
        obsolete.locations.insert(Location::new("../d.cpp", 7));
        let catalog = catalog_with("tr", &[("Widget", vec![unfinished, vanished, obsolete])]);

        let text = write(&catalog);

        assert!(text.contains(
            "        <location filename=\"../a.cpp\" line=\"10\"/>\n        <location filename=\"../b.cpp\" line=\"3\"/>\n        <source>Save failed</source>\n        <translation type=\"unfinished\"></translation>\n"
        ));
        assert!(!text.contains("../c.cpp"));
        assert!(text.contains("<translation type=\"vanished\">Eski</translation>"));
        assert!(text.contains(
            "        <location filename=\"../d.cpp\" line=\"7\"/>\n        <source>Gone</source>\n        <translation type=\"obsolete\">Gitti</translation>\n"
        ));
    }

    #[rstest]
    fn test_write_without_locations() {
        let mut message = Message::new("Save failed");
        message.locations.insert(Location::new("../a.cpp", 10));
        let catalog = catalog_with("tr", &[("Widget", vec![message])]);

        let text = write_catalog(&catalog, &WriteOptions { locations: LocationsMode::None }).unwrap();

        assert!(!text.contains("<location"));
    }

    #[rstest]
    fn test_write_plural_keeps_empty_slots() {
        let mut message = Message::new("%n section(s)").with_forms(["%n odsek", "", "", ""]);
        message.status = Status::Unfinished;
        if let Translation::Plural(forms) = &mut message.translation {
            forms[1].unfinished = true;
        }
        let catalog = catalog_with("sl", &[("Elf", vec![message])]);

        let text = write(&catalog);

        assert!(text.contains(
            "    <message numerus=\"yes\">
        <source>%n section(s)</source>
        <translation type=\"unfinished\">
            <numerusform>%n odsek</numerusform>
            <numerusform type=\"unfinished\"></numerusform>
            <numerusform></numerusform>
            <numerusform></numerusform>
        </translation>
    </message>
"
        ));
    }

    #[rstest]
    #[case::markup("<b>\"x\" & 'y'</b>", "&lt;b&gt;&quot;x&quot; &amp; &apos;y&apos;&lt;/b&gt;")]
    #[case::control("a\u{1b}b\rc", "a<byte value=\"x1b\"/>b<byte value=\"xd\"/>c")]
    #[case::whitespace("line\n\tnext", "line\n\tnext")]
    #[case::nul("a\0b", "a<byte value=\"x0\"/>b")]
    #[case::noncharacter("a\u{fffe}b\u{ffff}", "a<byte value=\"xfffe\"/>b<byte value=\"xffff\"/>")]
    #[case::no_break_space("50\u{a0}%", "50&#xa0;%")]
    fn test_text_escaping(#[case] raw: &str, #[case] escaped: &str) {
        let mut out = String::new();
        push_text(&mut out, raw);

        assert_eq!(out, escaped);
    }

    #[rstest]
    fn test_write_optional_elements_in_order() {
        let mut message = translated("Open", "Aç").with_comment("menu");
        message.id = Some("open.menu".to_string());
        message.old_source = Some("Open...".to_string());
        message.extra_comment = Some("File menu".to_string());
        message.translator_comment = Some("short".to_string());
        message.userdata = Some("42".to_string());
        message.extras.push(crate::model::Extra {
            name: "extra-po-flags".to_string(),
            content: "no-wrap".to_string(),
        });
        message.attributes.push(("x-state".to_string(), "review".to_string()));
        let catalog = catalog_with("tr", &[("Menu", vec![message])]);

        let text = write(&catalog);

        assert!(text.contains(
            "    <message id=\"open.menu\" x-state=\"review\">
        <source>Open</source>
        <oldsource>Open...</oldsource>
        <comment>menu</comment>
        <extracomment>File menu</extracomment>
        <translatorcomment>short</translatorcomment>
        <translation>Aç</translation>
        <userdata>42</userdata>
        <extra-po-flags>no-wrap</extra-po-flags>
    </message>
"
        ));
    }

    #[googletest::test]
    fn test_written_catalog_parses_back() {
        let mut plural = Message::new("%n file(s)").with_forms(["%n dosya"]);
        plural.locations.insert(Location::new("main.cpp", 4));
        let catalog = catalog_with(
            "tr",
            &[
                ("Widget", vec![translated("A & B", "A ve B"), Message::new("<none>").with_comment("x")]),
                ("Dialog", vec![plural]),
            ],
        );

        let reparsed = parse_catalog(write(&catalog).as_bytes()).unwrap();

        expect_that!(reparsed, eq(&catalog));
    }

    #[rstest]
    #[case::nul("a\0b")]
    #[case::escape("a\u{1b}[0m")]
    #[case::noncharacters("a\u{fffe}b\u{ffff}")]
    #[case::carriage_return("a\rb")]
    #[case::no_break_space("a\u{a0}b\u{2009}c")]
    fn test_unusual_characters_survive_round_trip(#[case] text: &str) {
        let catalog = catalog_with("tr", &[("Widget", vec![translated(text, text).with_comment(text)])]);

        let reparsed = parse_catalog(write(&catalog).as_bytes()).unwrap();

        assert_eq!(reparsed, catalog);
    }

    #[rstest]
    #[case::control("a\u{1}b.cpp", 1)]
    #[case::nul("a\0b.cpp", 0)]
    #[case::noncharacter("a\u{ffff}.cpp", 0xffff)]
    fn test_unwritable_location_is_rejected(#[case] file: &str, #[case] code: u32) {
        let mut message = translated("Open", "Aç");
        message.locations.insert(Location::new(file, 1));
        let catalog = catalog_with("tr", &[("Widget", vec![message])]);

        let result = write_catalog(&catalog, &WriteOptions::default());

        assert_eq!(
            result,
            Err(UnwritableAttributeError { attribute: "filename".to_string(), code })
        );
    }

    #[rstest]
    fn test_attribute_whitespace_round_trips() {
        let mut message = translated("Open", "Aç");
        message.locations.insert(Location::new("tab\tnew\nline\r.cpp", 1));
        let catalog = catalog_with("tr", &[("Widget", vec![message])]);

        let text = write(&catalog);
        let reparsed = parse_catalog(text.as_bytes()).unwrap();

        assert!(text.contains("filename=\"tab&#9;new&#10;line&#13;.cpp\""));
        assert_eq!(reparsed, catalog);
    }

    #[rstest]
    fn test_plain_message_with_forms_stays_readable() {
        let mut message = translated("Open", "");
        message.translation = Translation::Plural(vec![NumerusForm::new("Aç"), NumerusForm::default()]);
        let catalog = catalog_with("tr", &[("Widget", vec![message])]);

        let reparsed = parse_catalog(write(&catalog).as_bytes()).unwrap();

        let message = &reparsed.context("Widget").unwrap().messages()[0];
        assert_eq!(message.translation, Translation::Single("Aç".to_string()));
    }

    #[rstest]
    fn test_save_refuses_unwritable_catalog() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("qt_tr.ts");
        std::fs::write(&path, "previous").unwrap();
        let mut message = translated("Open", "Aç");
        message.locations.insert(Location::new("a\u{1}.cpp", 1));
        let catalog = catalog_with("tr", &[("Widget", vec![message])]);

        let result = save_catalog(&path, &catalog, &WriteOptions::default());

        assert!(matches!(result, Err(CatalogError::Unwritable(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[rstest]
    fn test_save_catalog_replaces_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("qt_tr.ts");
        std::fs::write(&path, "stale").unwrap();
        let catalog = catalog_with("tr", &[("Widget", vec![translated("A", "a")])]);

        save_catalog(&path, &catalog, &WriteOptions::default()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, write(&catalog));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[rstest]
    fn test_save_catalog_missing_directory() {
        let catalog = Catalog::new("tr");

        let result = save_catalog(Path::new("/nonexistent/dir/qt_tr.ts"), &catalog, &WriteOptions::default());

        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
