//! Score-level data: metadata, part references and the extraction result

use serde::{Deserialize, Serialize};

use super::events::MusicEvent;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_COMPOSER: &str = "Unknown Composer";
pub const UNKNOWN_PART_NAME: &str = "Unknown";

/// One entry of the score's `<part-list>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRef {
    pub id: String,
    pub name: String,
}

/// Document-level facts, fixed once the score is loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreMetadata {
    pub title: String,
    pub composer: String,
    pub parts: Vec<PartRef>,
    /// Measures in the first part only
    pub measure_count: usize,
}

impl Default for ScoreMetadata {
    fn default() -> Self {
        ScoreMetadata {
            title: UNKNOWN_TITLE.to_string(),
            composer: UNKNOWN_COMPOSER.to_string(),
            parts: Vec::new(),
            measure_count: 0,
        }
    }
}

impl ScoreMetadata {
    /// Property/value rows for an info panel
    ///
    /// ```text
    /// Title      Overture
    /// Composer   Rossini
    /// Measures   412
    /// Parts      2 part(s)
    ///   P1       Flute
    ///   P2       Oboe
    /// ```
    pub fn property_tree(&self) -> Vec<PropertyNode> {
        let part_rows = self
            .parts
            .iter()
            .map(|part| PropertyNode::leaf(&part.id, &part.name))
            .collect();

        vec![
            PropertyNode::leaf("Title", &self.title),
            PropertyNode::leaf("Composer", &self.composer),
            PropertyNode::leaf("Measures", &self.measure_count.to_string()),
            PropertyNode {
                label: "Parts".to_string(),
                value: format!("{} part(s)", self.parts.len()),
                children: part_rows,
            },
        ]
    }
}

/// A row in the metadata property tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyNode {
    pub label: String,
    pub value: String,
    pub children: Vec<PropertyNode>,
}

impl PropertyNode {
    pub fn leaf(label: &str, value: &str) -> Self {
        PropertyNode {
            label: label.to_string(),
            value: value.to_string(),
            children: Vec::new(),
        }
    }

    /// Render this node and its children as indented `label  value` lines
    pub fn render_lines(&self, depth: usize, out: &mut Vec<String>) {
        out.push(format!("{}{:<12} {}", "  ".repeat(depth), self.label, self.value));
        for child in &self.children {
            child.render_lines(depth + 1, out);
        }
    }
}

/// Everything one extraction pass produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedScore {
    pub metadata: ScoreMetadata,
    pub events: Vec<MusicEvent>,
    /// The score XML as read (the inner document for compressed files)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw_xml: String,
}
