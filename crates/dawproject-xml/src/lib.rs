//! XML layer for DAWproject containers.
//!
//! - [`XmlNode`] - element tree with attribute and child lookup
//! - [`XmlProcessor`] - load/parse/save/validate collaborator, implemented by
//!   [`QuickXmlProcessor`]
//! - [`codec`] - project records as one XML element each

pub mod codec;
pub mod node;
pub mod processor;
pub mod tree;

pub use codec::{ProjectElement, document_from_node, project_node, render_project};
pub use node::XmlNode;
pub use processor::{QuickXmlProcessor, XmlProcessor};
