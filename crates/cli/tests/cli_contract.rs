use assert_cmd::cargo::cargo_bin_cmd;
use lopdf::{dictionary, Document, Object};
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a PDF whose pages have the given MediaBox sizes in points.
fn write_pdf(dir: &Path, name: &str, sizes: &[(i64, i64)]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = sizes
        .iter()
        .map(|&(width, height)| {
            let media_box = Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ]);
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("fixture should serialize");
    fs::write(&path, bytes).expect("fixture should be written");
    path
}

/// Two pages: US Letter followed by a small 300x400 page.
fn two_page_pdf() -> (TempDir, PathBuf) {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = write_pdf(temp.path(), "two-page.pdf", &[(612, 792), (300, 400)]);
    (temp, path)
}

fn stdout_json(args: &[&str], file: &Path) -> Value {
    let output = cargo_bin_cmd!("folio-cli")
        .arg(args[0])
        .arg(file)
        .args(&args[1..])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_slice(&output).expect("stdout should contain valid json")
}

#[test]
fn info_reports_page_count_and_first_page_size() {
    let (_temp, pdf) = two_page_pdf();

    let value = stdout_json(&["info"], &pdf);

    assert_eq!(value["path"], Value::String(pdf.display().to_string()));
    assert_eq!(value["page_count"], 2);
    assert_eq!(value["first_page_size_pt"]["width"], 612.0);
    assert_eq!(value["first_page_size_pt"]["height"], 792.0);
}

#[test]
fn paginated_session_emits_stable_view_contract() {
    let (_temp, pdf) = two_page_pdf();

    let output = cargo_bin_cmd!("folio-cli")
        .arg("session")
        .arg(&pdf)
        .args(["--layout", "paginated", "--url", "doc.pdf", "--container-width", "918"])
        .args(["--actions", "fit-width,relations,debug,next"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).expect("stdout should be utf-8");
    insta::assert_snapshot!("session_paginated", stdout.trim_end());
}

#[test]
fn endless_session_lists_every_page() {
    let (_temp, pdf) = two_page_pdf();

    let value = stdout_json(&["session", "--actions", "ctrl+plus,ctrl+plus,image"], &pdf);

    assert_eq!(value["layout"], "endless");
    assert_eq!(value["view"]["class_name"], "endless-viewer");
    assert_eq!(value["view"]["header"]["toolbar"]["zoom_label"], "120%");
    assert_eq!(value["view"]["header"]["toolbar"]["image_active"], true);
    assert!(value["view"]["header"]["toolbar"].get("page_label").is_none());

    let pages = value["view"]["main"]["body"]["pages"].as_array().expect("pages array");
    let numbers: Vec<_> = pages.iter().map(|page| page["page_number"].clone()).collect();
    assert_eq!(numbers, vec![Value::from(1), Value::from(2)]);
    assert!(pages.iter().all(|page| page["annotation_mode"] == "IMAGE"));
}

#[test]
fn zoom_is_clamped_to_configured_bounds() {
    let (temp, pdf) = two_page_pdf();
    let config = temp.path().join("viewer.json");
    fs::write(&config, r#"{ "max_zoom": 1.5 }"#).expect("config should be written");

    let actions = vec!["zoom-in"; 12].join(",");
    let value = stdout_json(
        &["session", "--config", config.to_str().expect("utf-8 path"), "--actions", &actions],
        &pdf,
    );

    assert_eq!(value["view"]["header"]["toolbar"]["zoom_label"], "150%");
    assert_eq!(value["view"]["main"]["transform"], "scale(1.5)");
}

#[test]
fn fullscreen_follows_escape() {
    let (_temp, pdf) = two_page_pdf();

    let entered = stdout_json(&["session", "--actions", "fullscreen"], &pdf);
    assert_eq!(entered["view"]["header"]["toolbar"]["fullscreen"], true);

    let exited = stdout_json(&["session", "--actions", "fullscreen,escape"], &pdf);
    assert_eq!(exited["view"]["header"]["toolbar"]["fullscreen"], false);
}

#[test]
fn navigation_stops_at_document_ends() {
    let (_temp, pdf) = two_page_pdf();

    let value = stdout_json(&["session", "--layout", "paginated", "--actions", "prev"], &pdf);
    assert_eq!(value["view"]["header"]["toolbar"]["page_label"], "1 / 2");

    let value = stdout_json(
        &["session", "--layout", "paginated", "--actions", "next,next,next"],
        &pdf,
    );
    assert_eq!(value["view"]["header"]["toolbar"]["page_label"], "2 / 2");
}

#[test]
fn endless_session_rejects_page_navigation() {
    let (_temp, pdf) = two_page_pdf();

    cargo_bin_cmd!("folio-cli")
        .arg("session")
        .arg(&pdf)
        .args(["--actions", "next"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page navigation requires --layout paginated"));
}

#[test]
fn session_rejects_unknown_config_fields() {
    let (temp, pdf) = two_page_pdf();
    let config = temp.path().join("viewer.json");
    fs::write(&config, r#"{ "zoom_speed": 2 }"#).expect("config should be written");

    cargo_bin_cmd!("folio-cli")
        .arg("session")
        .arg(&pdf)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid viewer config"));
}

#[test]
fn annotate_then_list_projects_at_requested_zoom() {
    let (temp, pdf) = two_page_pdf();
    let journal = temp.path().join("journal.json");

    let stored = cargo_bin_cmd!("folio-cli")
        .arg("annotate")
        .arg(&pdf)
        .args(["--page", "2", "--rect", "75,100,150,200", "--url", "doc.pdf"])
        .args(["--body", r#"{"label":"figure"}"#])
        .arg("--journal")
        .arg(&journal)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stored: Value = serde_json::from_slice(&stored).expect("stdout should contain valid json");

    assert_eq!(stored["document_url"], "doc.pdf");
    assert_eq!(stored["page_number"], 2);
    assert_eq!(
        stored["selector"],
        serde_json::json!({ "type": "rect", "x": 0.25, "y": 0.25, "width": 0.5, "height": 0.5 })
    );
    assert!(journal.exists(), "journal should be written");

    let journal_arg = journal.to_str().expect("utf-8 path");
    let listed =
        stdout_json(&["annotations", "--page", "2", "--zoom", "2", "--journal", journal_arg], &pdf);
    assert_eq!(listed["page_number"], 2);
    let annotations = listed["annotations"].as_array().expect("annotations array");
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0]["id"], stored["id"]);
    assert_eq!(annotations[0]["body"], serde_json::json!({ "label": "figure" }));
    assert_eq!(
        annotations[0]["selector"],
        serde_json::json!({
            "type": "rect", "x": 150.0, "y": 200.0, "width": 300.0, "height": 400.0
        })
    );

    let other_page = stdout_json(&["annotations", "--page", "1", "--journal", journal_arg], &pdf);
    assert_eq!(other_page["annotations"], serde_json::json!([]));
}

#[test]
fn annotations_drawn_at_different_zooms_normalize_alike() {
    let (temp, pdf) = two_page_pdf();
    let journal = temp.path().join("journal.json");

    for (rect, zoom) in [("75,100,150,200", "1"), ("150,200,300,400", "2")] {
        cargo_bin_cmd!("folio-cli")
            .arg("annotate")
            .arg(&pdf)
            .args(["--page", "2", "--rect", rect, "--zoom", zoom])
            .arg("--journal")
            .arg(&journal)
            .assert()
            .success();
    }

    let listed = stdout_json(
        &["annotations", "--page", "2", "--journal", journal.to_str().expect("utf-8")],
        &pdf,
    );
    let annotations = listed["annotations"].as_array().expect("annotations array");
    assert_eq!(annotations.len(), 2);
    assert_eq!(annotations[0]["selector"], annotations[1]["selector"]);
    assert_ne!(annotations[0]["id"], annotations[1]["id"]);
}

#[test]
fn annotate_rejects_out_of_range_page() {
    let (temp, pdf) = two_page_pdf();

    cargo_bin_cmd!("folio-cli")
        .arg("annotate")
        .arg(&pdf)
        .args(["--page", "3", "--rect", "1,1,10,10"])
        .arg("--journal")
        .arg(temp.path().join("journal.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("page 3 out of range (page_count=2)"));
}

#[test]
fn info_fails_for_missing_file() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    cargo_bin_cmd!("folio-cli")
        .arg("info")
        .arg(temp.path().join("missing.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("file does not exist"));
}

#[test]
fn info_fails_for_invalid_pdf() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = temp.path().join("invalid.pdf");
    fs::write(&path, "this is not a pdf").expect("fixture should be written");

    cargo_bin_cmd!("folio-cli")
        .arg("info")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open PDF"));
}

#[test]
fn info_fails_for_encrypted_marker_pdf() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = write_pdf(temp.path(), "encrypted.pdf", &[(612, 792)]);
    let mut bytes = fs::read(&path).expect("fixture should be readable");
    bytes.extend_from_slice(b"\n% /Encrypt\n");
    fs::write(&path, bytes).expect("fixture should be written");

    cargo_bin_cmd!("folio-cli")
        .arg("info")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("encrypted PDFs are not supported"));
}

#[test]
fn version_prints_package_version() {
    cargo_bin_cmd!("folio-cli")
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", env!("CARGO_PKG_VERSION"))));
}
