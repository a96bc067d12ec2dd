//! End-to-end CLI tests for the `fill` subcommand, driven against a
//! template package assembled in the test.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#,
);

const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#,
);

const DOCUMENT_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:body>"#,
    r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>WEEK NO: ____</w:t></w:r></w:p>"#,
    r#"<w:tbl><w:tr>"#,
    r#"<w:tc><w:p><w:r><w:t>FOR THE WEEK ENDING</w:t></w:r></w:p></w:tc>"#,
    r#"<w:tc><w:p><w:r><w:t/></w:r></w:p></w:tc>"#,
    r#"<w:tc><w:p><w:r><w:t/></w:r></w:p></w:tc>"#,
    r#"<w:tc><w:p><w:r><w:t>TRAINING MODE</w:t></w:r></w:p></w:tc>"#,
    r#"</w:tr>"#,
    r#"<w:tr><w:tc><w:p><w:r><w:t>DAY</w:t></w:r></w:p></w:tc>"#,
    r#"<w:tc><w:p><w:r><w:t>DATE</w:t></w:r></w:p></w:tc>"#,
    r#"<w:tc><w:p><w:r><w:t>WORK</w:t></w:r></w:p></w:tc></w:tr>"#,
    r#"<w:tr><w:tc><w:p><w:r><w:t>MONDAY</w:t></w:r></w:p></w:tc>"#,
    r#"<w:tc><w:p><w:r><w:t/></w:r></w:p></w:tc>"#,
    r#"<w:tc><w:p><w:r><w:t/></w:r></w:p></w:tc></w:tr>"#,
    r#"</w:tbl>"#,
    r#"</w:body></w:document>"#,
);

const WEEKLY_DATA: &str = r#"[
  {
    "week_no": "7",
    "week_ending": "2024-02-18",
    "training_mode": "Remote",
    "weekly_activities": [
      {"day": "Monday", "date": "2024-02-12", "description": "Substation survey"}
    ]
  }
]"#;

fn write_template(path: &Path) {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        ("word/document.xml", DOCUMENT_XML),
    ] {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    let bytes = zip.finish().unwrap().into_inner();
    std::fs::write(path, bytes).unwrap();
}

fn read_document_xml(path: &Path) -> String {
    let bytes = std::fs::read(path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut out = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut out)
        .unwrap();
    out
}

#[test]
fn fill_produces_one_document_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("template.docx");
    write_template(&template);
    let data = dir.path().join("weekly_data.json");
    std::fs::write(&data, WEEKLY_DATA).unwrap();
    let out_dir = dir.path().join("Weekly Reports");

    Command::cargo_bin("reportfill")
        .unwrap()
        .arg("fill")
        .arg("--template")
        .arg(&template)
        .arg("--data")
        .arg(&data)
        .arg("--out-dir")
        .arg(&out_dir)
        .arg("--signature")
        .arg(dir.path().join("missing.png"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 filled, 0 failed"));

    let output = out_dir.join("Daily Report 7.docx");
    assert!(output.exists());

    let xml = read_document_xml(&output);
    assert!(xml.contains("WEEK NO: 7"));
    assert!(xml.contains("2024-02-18"));
    assert!(xml.contains("Remote"));
    assert!(xml.contains("Substation survey"));
}

#[test]
fn fill_missing_template_fails_before_processing() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("reportfill")
        .unwrap()
        .arg("fill")
        .arg("--template")
        .arg(dir.path().join("nope.docx"))
        .arg("--data")
        .arg(dir.path().join("weekly_data.json"))
        .arg("--out-dir")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template not found"));
}

#[test]
fn fill_missing_data_file_is_an_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("template.docx");
    write_template(&template);

    Command::cargo_bin("reportfill")
        .unwrap()
        .arg("fill")
        .arg("--template")
        .arg(&template)
        .arg("--data")
        .arg(dir.path().join("absent.json"))
        .arg("--out-dir")
        .arg(dir.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No weekly records"));
}

#[test]
fn combine_empty_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("reportfill")
        .unwrap()
        .arg("combine")
        .arg("--input-dir")
        .arg(dir.path())
        .arg("--output")
        .arg(dir.path().join("combined.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no DOCX files"));
}
