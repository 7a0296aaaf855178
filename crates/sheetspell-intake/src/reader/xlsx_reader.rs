//! XLSX reader (first worksheet, first two columns)

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use sheetspell_core::Row;

use super::number_to_text;
use crate::error::{IntakeError, IntakeResult};

const ID_COLUMN: usize = 0;
const TEXT_COLUMN: usize = 1;

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// `_x000d_` is CR, `_x000a_` LF, `_x005f_` an escaped underscore.
fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// Split an A1-style reference into (1-based row, 0-based column)
fn split_cell_ref(reference: &str) -> Option<(u32, usize)> {
    let letters_end = reference
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(reference.len());
    let (letters, digits) = reference.split_at(letters_end);
    if letters.is_empty() {
        return None;
    }

    let mut col: usize = 0;
    for c in letters.chars() {
        col = col * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    let row = digits.parse::<u32>().ok()?;
    Some((row, col - 1))
}

/// Id for a row without one, unique among `taken`
fn fallback_id(row_num: u32, taken: &mut HashSet<String>) -> String {
    let mut id = row_num.to_string();
    let mut suffix = 1;
    while taken.contains(&id) {
        id = format!("{row_num}-{suffix}");
        suffix += 1;
    }
    taken.insert(id.clone());
    id
}

/// XLSX input reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read rows from an XLSX file
    pub fn read_file<P: AsRef<Path>>(path: P, has_header: bool) -> IntakeResult<Vec<Row>> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file), has_header)
    }

    /// Read the identifier / text columns of the first worksheet.
    ///
    /// A row with no identifier cell is identified by its row number, with a
    /// `-N` suffix if some other row already uses that number as its id.
    pub fn read<R: Read + Seek>(reader: R, has_header: bool) -> IntakeResult<Vec<Row>> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(IntakeError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let sheet_path = Self::first_sheet_path(&mut archive)?;
        let cells = Self::read_cells(&mut archive, &sheet_path, &shared_strings)?;

        let skip = usize::from(has_header);
        let mut taken: HashSet<String> = cells
            .values()
            .skip(skip)
            .filter_map(|(id, _)| id.clone())
            .collect();

        let mut rows = Vec::new();
        for (row_num, (id, text)) in cells.into_iter().skip(skip) {
            let id = match id {
                Some(id) => id,
                None => fallback_id(row_num, &mut taken),
            };
            rows.push(Row::new(id, text.unwrap_or_default()));
        }
        Ok(rows)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> IntakeResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings),
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        let mut buf = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"t" if in_si => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current));
                        in_si = false;
                    }
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(IntakeError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Resolve the archive path of the first worksheet listed in workbook.xml
    fn first_sheet_path<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> IntakeResult<String> {
        let first_rel_id = {
            let file = archive
                .by_name("xl/workbook.xml")
                .map_err(|_| IntakeError::InvalidFormat("missing xl/workbook.xml".into()))?;
            let mut xml_reader = Reader::from_reader(BufReader::new(file));
            let mut buf = Vec::new();
            let mut found = None;
            loop {
                match xml_reader.read_event_into(&mut buf) {
                    Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                        found = e
                            .attributes()
                            .flatten()
                            .find(|a| a.key.as_ref() == b"r:id")
                            .and_then(|a| a.unescape_value().ok().map(|v| v.to_string()));
                        break;
                    }
                    Ok(Event::Eof) => break,
                    Err(e) => return Err(IntakeError::Xml(e)),
                    _ => {}
                }
                buf.clear();
            }
            found
        };

        let fallback = "xl/worksheets/sheet1.xml".to_string();
        let Some(rel_id) = first_rel_id else {
            return Ok(fallback);
        };
        let rels = Self::read_workbook_rels(archive)?;
        Ok(rels.get(&rel_id).cloned().unwrap_or(fallback))
    }

    /// Read workbook.xml.rels into relationship id -> worksheet path
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> IntakeResult<HashMap<String, String>> {
        let mut rels = HashMap::new();
        let file = match archive.by_name("xl/_rels/workbook.xml.rels") {
            Ok(f) => f,
            Err(_) => return Ok(rels),
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        let mut buf = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = attr.unescape_value().ok().map(|s| s.to_string()),
                            b"Target" => target = attr.unescape_value().ok().map(|s| s.to_string()),
                            _ => {}
                        }
                    }
                    if let (Some(id), Some(target)) = (id, target) {
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("xl/{target}"),
                        };
                        rels.insert(id, full_path);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(IntakeError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Collect identifier / text cells per row number
    fn read_cells<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        shared_strings: &[String],
    ) -> IntakeResult<BTreeMap<u32, (Option<String>, Option<String>)>> {
        let file = archive
            .by_name(path)
            .map_err(|_| IntakeError::InvalidFormat(format!("missing worksheet {path}")))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        let mut buf = Vec::new();
        let mut cells: BTreeMap<u32, (Option<String>, Option<String>)> = BTreeMap::new();

        let mut current_ref: Option<(u32, usize)> = None;
        let mut current_type: Option<String> = None;
        let mut value = String::new();
        let mut in_value = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"c" => {
                        current_ref = None;
                        current_type = None;
                        value.clear();
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"r" => {
                                    current_ref = attr
                                        .unescape_value()
                                        .ok()
                                        .and_then(|s| split_cell_ref(&s));
                                }
                                b"t" => {
                                    current_type =
                                        attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                _ => {}
                            }
                        }
                    }
                    b"v" | b"t" if current_ref.is_some() => in_value = true,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_value => {
                    value.push_str(&e.unescape()?);
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"v" | b"t" => in_value = false,
                    b"c" => {
                        if let Some((row, col)) = current_ref.take() {
                            if col == ID_COLUMN || col == TEXT_COLUMN {
                                let text = Self::cell_text(
                                    current_type.as_deref(),
                                    &value,
                                    shared_strings,
                                )?;
                                let entry = cells.entry(row).or_default();
                                if col == ID_COLUMN {
                                    entry.0 = Some(text);
                                } else {
                                    entry.1 = Some(text);
                                }
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(IntakeError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(cells)
    }

    fn cell_text(
        cell_type: Option<&str>,
        raw: &str,
        shared_strings: &[String],
    ) -> IntakeResult<String> {
        let text = match cell_type {
            Some("s") => {
                let idx: usize = raw.trim().parse().map_err(|_| {
                    IntakeError::InvalidFormat(format!("bad shared string index '{raw}'"))
                })?;
                shared_strings.get(idx).cloned().ok_or_else(|| {
                    IntakeError::InvalidFormat(format!("shared string {idx} out of range"))
                })?
            }
            Some("inlineStr") | Some("str") => decode_excel_escapes(raw),
            Some("b") => if raw.trim() == "1" { "TRUE" } else { "FALSE" }.to_string(),
            Some("e") => raw.to_string(),
            _ => number_to_text(raw),
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};

    fn build_xlsx(sheet_data: &str, shared: &[&str]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();

        let mut add = |name: &str, body: String| {
            zip.start_file(name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        };

        add("[Content_Types].xml", "<Types/>".to_string());
        add(
            "xl/workbook.xml",
            r#"<workbook xmlns:r="r"><sheets><sheet name="Input" sheetId="1" r:id="rId7"/></sheets></workbook>"#
                .to_string(),
        );
        add(
            "xl/_rels/workbook.xml.rels",
            r#"<Relationships><Relationship Id="rId7" Type="t/worksheet" Target="worksheets/data.xml"/></Relationships>"#
                .to_string(),
        );
        let si: String = shared.iter().map(|s| format!("<si><t>{s}</t></si>")).collect();
        add("xl/sharedStrings.xml", format!("<sst>{si}</sst>"));
        add(
            "xl/worksheets/data.xml",
            format!("<worksheet><sheetData>{sheet_data}</sheetData></worksheet>"),
        );

        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("a_x000d__x000a_b"), "a\r\nb");
        assert_eq!(decode_excel_escapes("snake_x_case"), "snake_x_case");
        assert_eq!(decode_excel_escapes("plain"), "plain");
    }

    #[test]
    fn test_split_cell_ref() {
        assert_eq!(split_cell_ref("A1"), Some((1, 0)));
        assert_eq!(split_cell_ref("B12"), Some((12, 1)));
        assert_eq!(split_cell_ref("AA3"), Some((3, 26)));
        assert_eq!(split_cell_ref("12"), None);
    }

    #[test]
    fn test_read_first_two_columns() {
        let sheet = concat!(
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>"#,
            r#"<row r="2"><c r="A2"><v>1</v></c><c r="B2" t="s"><v>2</v></c><c r="C2"><v>9</v></c></row>"#,
            r#"<row r="3"><c r="A3"><v>2</v></c><c r="B3" t="inlineStr"><is><t>wrld</t></is></c></row>"#,
        );
        let bytes = build_xlsx(sheet, &["ID", "TEXT", "helo"]);

        let rows = XlsxReader::read(Cursor::new(bytes), true).unwrap();
        let pairs: Vec<(&str, &str)> = rows.iter().map(|r| (r.id(), r.text())).collect();
        assert_eq!(pairs, vec![("1", "helo"), ("2", "wrld")]);
    }

    #[test]
    fn test_missing_id_uses_row_number() {
        let sheet = r#"<row r="4"><c r="B4" t="s"><v>0</v></c></row>"#;
        let bytes = build_xlsx(sheet, &["lonely"]);

        let rows = XlsxReader::read(Cursor::new(bytes), false).unwrap();
        assert_eq!(rows[0].id(), "4");
        assert_eq!(rows[0].text(), "lonely");
    }

    #[test]
    fn test_missing_id_does_not_collide_with_explicit_id() {
        let sheet = concat!(
            r#"<row r="2"><c r="B2" t="s"><v>0</v></c></row>"#,
            r#"<row r="3"><c r="A3"><v>2</v></c><c r="B3" t="s"><v>1</v></c></row>"#,
        );
        let bytes = build_xlsx(sheet, &["no id", "explicit"]);

        let rows = XlsxReader::read(Cursor::new(bytes), false).unwrap();
        let pairs: Vec<(&str, &str)> = rows.iter().map(|r| (r.id(), r.text())).collect();
        assert_eq!(pairs, vec![("2-1", "no id"), ("2", "explicit")]);
        assert!(sheetspell_core::RowStore::from_rows(rows).is_ok());
    }

    #[test]
    fn test_not_a_workbook() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("readme.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        assert!(matches!(
            XlsxReader::read(Cursor::new(bytes), true),
            Err(IntakeError::InvalidFormat(_))
        ));
    }
}
