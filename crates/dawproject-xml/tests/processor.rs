//! XML processor and project codec against real files.

use std::fs;

use dawproject_model::{ClipInfo, ProjectDocument, ProjectInfo, TrackInfo, TrackType};
use dawproject_xml::{
    QuickXmlProcessor, XmlNode, XmlProcessor, document_from_node, project_node, render_project,
};
use tempfile::tempdir;

fn sample_document() -> ProjectDocument {
    let info = ProjectInfo {
        title: "Demo & Co".to_string(),
        artist: "Unit".to_string(),
        tempo: 120.0,
        time_signature: "4/4".to_string(),
        ..Default::default()
    };
    ProjectDocument::new(info)
        .with_track(TrackInfo::new("t1", "Drums", TrackType::Audio).with_volume(0.8))
        .with_clip(ClipInfo::new("c1", "Beat \"A\"", "t1", 0.0, 4.0).with_audio_file("kick.wav"))
}

#[test]
fn render_project_layout() {
    let xml = render_project(&sample_document()).unwrap();
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<Project version="1.0">
  <ProjectInfo album="" artist="Unit" genre="" key="" tempo="120" timeSignature="4/4" title="Demo &amp; Co"/>
  <Track color="" id="t1" muted="false" name="Drums" orderIndex="0" pan="0" soloed="false" type="audio" volume="0.8"/>
  <Clip audioFile="kick.wav" duration="4" fadeIn="0" fadeOut="0" id="c1" name="Beat &quot;A&quot;" playbackRate="1" start="0" trackId="t1"/>
</Project>
"#);
}

#[test]
fn rendered_project_parses_back() {
    let mut document = sample_document().with_track(
        TrackInfo::new("t2", "Keys <L>", TrackType::Instrument)
            .with_pan(-0.25)
            .with_order_index(1),
    );
    document.info.created = Some(chrono::Utc::now());

    let processor = QuickXmlProcessor::new();
    let root = processor
        .parse_document(&render_project(&document).unwrap())
        .unwrap();
    assert_eq!(document_from_node(&root).unwrap(), document);
    assert_eq!(root, project_node(&document));
}

#[test]
fn save_and_load_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("doc.xml");
    let processor = QuickXmlProcessor::new();
    let document = project_node(&sample_document());

    let size = processor.save_document(&document, &path).unwrap();
    assert_eq!(size as u64, fs::metadata(&path).unwrap().len());
    assert_eq!(processor.load_document(&path).unwrap(), document);
}

#[test]
fn load_document_reports_path() {
    let dir = tempdir().unwrap();
    let processor = QuickXmlProcessor::new();

    let missing = dir.path().join("missing.xml");
    let err = processor.load_document(&missing).unwrap_err();
    assert!(err.to_string().contains("missing.xml"));

    let broken = dir.path().join("broken.xml");
    fs::write(&broken, "<Project><Track></Project>").unwrap();
    let err = processor.load_document(&broken).unwrap_err();
    assert!(err.to_string().contains("broken.xml"));

    let big = dir.path().join("big.xml");
    fs::write(&big, "<Project/>").unwrap();
    let small = QuickXmlProcessor::new().with_max_document_size(4);
    assert!(small.load_document(&big).is_err());
}

#[test]
fn validate_xml_diagnostics() {
    let dir = tempdir().unwrap();
    let processor = QuickXmlProcessor::new();

    let missing = processor.validate_xml(&dir.path().join("none.xml"));
    assert!(!missing.is_valid);

    let folder = processor.validate_xml(dir.path());
    assert!(!folder.is_valid);

    let empty = dir.path().join("empty.xml");
    fs::write(&empty, "").unwrap();
    let result = processor.validate_xml(&empty);
    assert!(result.is_valid);
    assert!(result.has_warnings());

    let prose = dir.path().join("prose.xml");
    fs::write(&prose, "hello\n<a/>").unwrap();
    let result = processor.validate_xml(&prose);
    assert!(!result.is_valid);
    assert_eq!(result.warning_count(), 1);

    let good = dir.path().join("good.xml");
    fs::write(&good, "<?xml version=\"1.0\"?>\n<Project/>\n").unwrap();
    let result = processor.validate_xml(&good);
    assert!(result.is_valid, "{:?}", result.errors);
    assert!(!result.has_warnings());
}

#[test]
fn validate_against_schema() {
    let dir = tempdir().unwrap();
    let processor = QuickXmlProcessor::new();
    let document = XmlNode::new("Project");

    let skipped = processor.validate_against_schema(&document, std::path::Path::new(""));
    assert!(skipped.is_valid);
    assert!(skipped.has_warnings());

    let missing = processor.validate_against_schema(&document, &dir.path().join("none.xsd"));
    assert!(!missing.is_valid);

    let empty = dir.path().join("empty.xsd");
    fs::write(&empty, "  \n").unwrap();
    assert!(!processor.validate_against_schema(&document, &empty).is_valid);

    let schema = dir.path().join("project.xsd");
    fs::write(
        &schema,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="Project"/>
  <xs:element name="MetaData"/>
</xs:schema>"#,
    )
    .unwrap();
    let result = processor.validate_against_schema(&document, &schema);
    assert!(result.is_valid, "{:?}", result.errors);

    let result = processor.validate_against_schema(&XmlNode::new("Song"), &schema);
    assert!(!result.is_valid);
    assert!(result.errors[0].contains("Project, MetaData"));
}
