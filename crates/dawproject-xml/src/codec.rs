//! Project records as XML elements.
//!
//! A project file is a `Project` root with one empty element per record:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Project version="1.0">
//!   <ProjectInfo title="Demo" tempo="120" .../>
//!   <Track id="t1" name="Drums" type="audio" .../>
//!   <Clip id="c1" name="Beat" trackId="t1" start="0" duration="4" .../>
//! </Project>
//! ```
//!
//! Optional fields are omitted when absent. Timestamps are RFC 3339.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;

use dawproject_model::{
    ClipInfo, DataError, ProjectDocument, ProjectInfo, Result, TrackInfo, TrackType,
};

use crate::node::XmlNode;
use crate::tree::to_element_string;

pub const ROOT_ELEMENT: &str = "Project";
pub const FORMAT_VERSION: &str = "1.0";
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Declaration and opening root tag.
pub fn header() -> String {
    format!("{XML_DECLARATION}\n<{ROOT_ELEMENT} version=\"{FORMAT_VERSION}\">\n")
}

/// Closing root tag.
pub fn footer() -> String {
    format!("</{ROOT_ELEMENT}>\n")
}

/// A record stored as one element under the project root.
pub trait ProjectElement: Sized {
    const ELEMENT: &'static str;

    fn to_node(&self) -> XmlNode;

    fn from_node(node: &XmlNode) -> Result<Self>;

    /// One indented line holding this record's element.
    fn to_fragment(&self) -> Result<String> {
        Ok(format!("  {}\n", to_element_string(&self.to_node())?))
    }
}

impl ProjectElement for ProjectInfo {
    const ELEMENT: &'static str = "ProjectInfo";

    fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new(Self::ELEMENT)
            .with_attribute("title", self.title.as_str())
            .with_attribute("artist", self.artist.as_str())
            .with_attribute("album", self.album.as_str())
            .with_attribute("genre", self.genre.as_str())
            .with_attribute("tempo", self.tempo.to_string())
            .with_attribute("timeSignature", self.time_signature.as_str())
            .with_attribute("key", self.key.as_str());
        if let Some(created) = self.created {
            node.set_attribute("created", timestamp(created));
        }
        if let Some(modified) = self.modified {
            node.set_attribute("modified", timestamp(modified));
        }
        node
    }

    fn from_node(node: &XmlNode) -> Result<Self> {
        Ok(Self {
            title: text(node, "title"),
            artist: text(node, "artist"),
            album: text(node, "album"),
            genre: text(node, "genre"),
            tempo: number(node, "tempo", 0.0)?,
            time_signature: text(node, "timeSignature"),
            key: text(node, "key"),
            created: parse_timestamp(node, "created")?,
            modified: parse_timestamp(node, "modified")?,
        })
    }
}

impl ProjectElement for TrackInfo {
    const ELEMENT: &'static str = "Track";

    fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new(Self::ELEMENT)
            .with_attribute("id", self.id.as_str())
            .with_attribute("name", self.name.as_str())
            .with_attribute("type", self.track_type.as_str())
            .with_attribute("color", self.color.as_str())
            .with_attribute("volume", self.volume.to_string())
            .with_attribute("pan", self.pan.to_string())
            .with_attribute("muted", self.muted.to_string())
            .with_attribute("soloed", self.soloed.to_string())
            .with_attribute("orderIndex", self.order_index.to_string());
        if let Some(instrument_id) = &self.instrument_id {
            node.set_attribute("instrumentId", instrument_id.as_str());
        }
        if let Some(audio_file) = &self.audio_file {
            node.set_attribute("audioFile", audio_file.as_str());
        }
        node
    }

    fn from_node(node: &XmlNode) -> Result<Self> {
        let track_type = match node.attribute("type") {
            Some(raw) => raw.parse::<TrackType>()?,
            None => TrackType::default(),
        };
        Ok(Self {
            id: text(node, "id"),
            name: text(node, "name"),
            track_type,
            color: text(node, "color"),
            volume: number(node, "volume", 1.0)?,
            pan: number(node, "pan", 0.0)?,
            muted: flag(node, "muted")?,
            soloed: flag(node, "soloed")?,
            order_index: integer(node, "orderIndex")?,
            instrument_id: optional(node, "instrumentId"),
            audio_file: optional(node, "audioFile"),
        })
    }
}

impl ProjectElement for ClipInfo {
    const ELEMENT: &'static str = "Clip";

    fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new(Self::ELEMENT)
            .with_attribute("id", self.id.as_str())
            .with_attribute("name", self.name.as_str())
            .with_attribute("trackId", self.track_id.as_str())
            .with_attribute("start", self.start_time.to_string())
            .with_attribute("duration", self.duration.to_string())
            .with_attribute("playbackRate", self.playback_rate.to_string())
            .with_attribute("fadeIn", self.fade_in_time.to_string())
            .with_attribute("fadeOut", self.fade_out_time.to_string());
        if let Some(content_id) = &self.content_id {
            node.set_attribute("contentId", content_id.as_str());
        }
        if let Some(audio_file) = &self.audio_file {
            node.set_attribute("audioFile", audio_file.as_str());
        }
        node
    }

    fn from_node(node: &XmlNode) -> Result<Self> {
        Ok(Self {
            id: text(node, "id"),
            name: text(node, "name"),
            track_id: text(node, "trackId"),
            start_time: number(node, "start", 0.0)?,
            duration: number(node, "duration", 0.0)?,
            playback_rate: number(node, "playbackRate", 1.0)?,
            fade_in_time: number(node, "fadeIn", 0.0)?,
            fade_out_time: number(node, "fadeOut", 0.0)?,
            content_id: optional(node, "contentId"),
            audio_file: optional(node, "audioFile"),
        })
    }
}

/// Render a whole project file.
pub fn render_project(document: &ProjectDocument) -> Result<String> {
    let mut out = header();
    out.push_str(&document.info.to_fragment()?);
    for track in &document.tracks {
        out.push_str(&track.to_fragment()?);
    }
    for clip in &document.clips {
        out.push_str(&clip.to_fragment()?);
    }
    out.push_str(&footer());
    Ok(out)
}

/// Build the XML tree of a whole project.
pub fn project_node(document: &ProjectDocument) -> XmlNode {
    let mut root = XmlNode::new(ROOT_ELEMENT).with_attribute("version", FORMAT_VERSION);
    root.push_child(document.info.to_node());
    root.children.extend(document.tracks.iter().map(ProjectElement::to_node));
    root.children.extend(document.clips.iter().map(ProjectElement::to_node));
    root
}

/// Read a project from its parsed root element.
pub fn document_from_node(root: &XmlNode) -> Result<ProjectDocument> {
    if root.name != ROOT_ELEMENT {
        return Err(DataError::invalid_format(format!(
            "root element is <{}>, expected <{ROOT_ELEMENT}>",
            root.name
        )));
    }
    if let Some(version) = root.attribute("version")
        && version != FORMAT_VERSION
    {
        warn!(version, "unexpected project format version");
    }

    let info_node = root.find_child(ProjectInfo::ELEMENT).ok_or_else(|| {
        DataError::invalid_format(format!("missing <{}> element", ProjectInfo::ELEMENT))
    })?;
    let tracks = root
        .find_children(TrackInfo::ELEMENT)
        .map(TrackInfo::from_node)
        .collect::<Result<Vec<_>>>()?;
    let clips = root
        .find_children(ClipInfo::ELEMENT)
        .map(ClipInfo::from_node)
        .collect::<Result<Vec<_>>>()?;

    Ok(ProjectDocument {
        info: ProjectInfo::from_node(info_node)?,
        tracks,
        clips,
    })
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn text(node: &XmlNode, key: &str) -> String {
    node.attribute_or(key, "").to_string()
}

fn optional(node: &XmlNode, key: &str) -> Option<String> {
    node.attribute(key).map(str::to_string)
}

fn bad_value(node: &XmlNode, key: &str, raw: &str, expected: &str) -> DataError {
    DataError::invalid_format(format!(
        "<{}> attribute '{key}' is not {expected}: '{raw}'",
        node.name
    ))
}

fn number(node: &XmlNode, key: &str, default: f64) -> Result<f64> {
    match node.attribute(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| bad_value(node, key, raw, "a number")),
    }
}

fn integer(node: &XmlNode, key: &str) -> Result<i32> {
    match node.attribute(key) {
        None => Ok(0),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| bad_value(node, key, raw, "an integer")),
    }
}

fn flag(node: &XmlNode, key: &str) -> Result<bool> {
    match node.attribute(key).map(str::trim) {
        None => Ok(false),
        Some("true" | "1") => Ok(true),
        Some("false" | "0") => Ok(false),
        Some(raw) => Err(bad_value(node, key, raw, "a boolean")),
    }
}

fn parse_timestamp(node: &XmlNode, key: &str) -> Result<Option<DateTime<Utc>>> {
    match node.attribute(key) {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .map(|value| Some(value.with_timezone(&Utc)))
            .map_err(|_| bad_value(node, key, raw, "an RFC 3339 timestamp")),
    }
}
