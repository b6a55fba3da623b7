//! Minimal single-sheet `.xlsx` workbooks for fixtures: inline strings,
//! digit-only cells stored as numbers, optional merged ranges.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::FileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Jadval" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// Zero-based (row, col) to an A1 reference.
fn cell_ref(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    format!("{}{}", String::from_utf8_lossy(&letters), row + 1)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn sheet_xml(cells: &[(usize, usize, &str)], merges: &[&str]) -> String {
    let mut sorted: Vec<_> = cells.to_vec();
    sorted.sort_by_key(|(row, col, _)| (*row, *col));

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    let mut open_row = None;
    for (row, col, value) in sorted {
        if open_row != Some(row) {
            if open_row.is_some() {
                xml.push_str("</row>");
            }
            xml.push_str(&format!(r#"<row r="{}">"#, row + 1));
            open_row = Some(row);
        }
        let reference = cell_ref(row, col);
        if !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit()) {
            xml.push_str(&format!(r#"<c r="{reference}"><v>{value}</v></c>"#));
        } else {
            xml.push_str(&format!(
                r#"<c r="{reference}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                escape(value)
            ));
        }
    }
    if open_row.is_some() {
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData>");
    if !merges.is_empty() {
        xml.push_str(&format!(r#"<mergeCells count="{}">"#, merges.len()));
        for range in merges {
            xml.push_str(&format!(r#"<mergeCell ref="{range}"/>"#));
        }
        xml.push_str("</mergeCells>");
    }
    xml.push_str("</worksheet>");
    xml
}

pub fn xlsx_bytes(cells: &[(usize, usize, &str)], merges: &[&str]) -> Vec<u8> {
    let sheet = sheet_xml(cells, merges);
    let parts: [(&str, &str); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/worksheets/sheet1.xml", &sheet),
    ];
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in parts {
        zip.start_file(name, FileOptions::default())
            .expect("zip entry should start");
        zip.write_all(body.as_bytes()).expect("zip entry should write");
    }
    zip.finish().expect("zip should finish").into_inner()
}

pub fn write_xlsx(path: &Path, cells: &[(usize, usize, &str)], merges: &[&str]) {
    std::fs::write(path, xlsx_bytes(cells, merges)).expect("workbook should be written");
}

/// Matrix sheet as a faculty office saves it: the first group's identifier is
/// merged across its marker column, the Monday label spans the whole block,
/// and room numbers are numeric cells.
pub fn merged_matrix_workbook() -> (Vec<(usize, usize, &'static str)>, Vec<&'static str>) {
    let cells = vec![
        (6, 2, "101-A (IT)"),
        (6, 4, "102-B (IT)"),
        (6, 5, "s/s"),
        (7, 4, "Fizika"),
        (8, 0, "Dúyshembi"),
        // Period I: first group only, room 305.
        (8, 2, "Algebra"),
        (9, 2, "Dr. Karimov (KT)"),
        (8, 3, "305"),
        // Period II: shared, room after the second group.
        (10, 2, "Physics"),
        (11, 2, "Prof. Aliev"),
        (10, 5, "210"),
    ];
    (cells, vec!["C7:D7", "A9:A16"])
}
