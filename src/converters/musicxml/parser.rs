//! XML parsing layer for MusicXML documents
//!
//! Thin typed wrappers around roxmltree nodes. Each wrapper exposes named
//! accessors for the schema elements the extractor consumes, so callers never
//! match on tag names themselves.

use roxmltree::{Document, Node, ParsingOptions};

use super::errors::{ExtractError, Result};
use crate::models::{
    PartRef, Rational, ScoreMetadata, SpelledPitch, Step, UNKNOWN_COMPOSER, UNKNOWN_PART_NAME,
    UNKNOWN_TITLE,
};
use crate::settings::ExtractSettings;

// ============================================================================
// XML DOCUMENT WRAPPER
// ============================================================================

/// A parsed MusicXML document
pub struct XmlDocument<'input> {
    doc: Document<'input>,
}

impl<'input> XmlDocument<'input> {
    /// Parse XML text
    ///
    /// DTDs are allowed: nearly every exported MusicXML file starts with a
    /// `<!DOCTYPE score-partwise PUBLIC ...>` declaration.
    pub fn parse(xml: &'input str, settings: &ExtractSettings) -> Result<Self> {
        let mut options = ParsingOptions::default();
        options.allow_dtd = true;
        options.nodes_limit = settings.max_xml_nodes;

        let doc = Document::parse_with_options(xml, options).map_err(|e| match e {
            roxmltree::Error::NodesLimitReached => ExtractError::ResourceLimit(format!(
                "document has more than {} XML nodes",
                settings.max_xml_nodes
            )),
            other => ExtractError::Parse(format!("XML parse error: {}", other)),
        })?;

        Ok(XmlDocument { doc })
    }

    /// The root `<score-partwise>` element
    pub fn score(&self) -> Result<ScoreNode<'_, 'input>> {
        let root = self.doc.root_element();

        match root.tag_name().name() {
            "score-partwise" => Ok(ScoreNode { node: root }),
            "score-timewise" => Err(ExtractError::Format(
                "score-timewise documents are not supported (expected score-partwise)".to_string(),
            )),
            other => Err(ExtractError::Format(format!(
                "expected <score-partwise> root element, found <{}>",
                other
            ))),
        }
    }
}

// ============================================================================
// SCORE NODE
// ============================================================================

/// Wrapper around the `<score-partwise>` root
#[derive(Clone, Copy)]
pub struct ScoreNode<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input> ScoreNode<'a, 'input> {
    /// First non-empty `work-title`, else first non-empty `movement-title`
    pub fn extract_title(&self) -> Option<String> {
        first_descendant_text(self.node, "work-title")
            .or_else(|| first_descendant_text(self.node, "movement-title"))
    }

    /// First `creator type="composer"` with text
    pub fn extract_composer(&self) -> Option<String> {
        self.node
            .descendants()
            .filter(|n| n.has_tag_name("creator") && n.attribute("type") == Some("composer"))
            .find_map(non_empty_text)
    }

    /// Entries of the first `<part-list>`, in document order
    pub fn extract_part_refs(&self) -> Vec<PartRef> {
        let part_list = match self.node.descendants().find(|n| n.has_tag_name("part-list")) {
            Some(part_list) => part_list,
            None => return Vec::new(),
        };

        part_list
            .descendants()
            .filter(|n| n.has_tag_name("score-part"))
            .map(|score_part| PartRef {
                id: score_part.attribute("id").unwrap_or_default().to_string(),
                name: score_part
                    .descendants()
                    .find(|n| n.has_tag_name("part-name"))
                    .and_then(non_empty_text)
                    .unwrap_or_else(|| UNKNOWN_PART_NAME.to_string()),
            })
            .collect()
    }

    /// `part-name` declared in the part list for `part_id`
    pub fn part_name(&self, part_id: &str) -> Option<String> {
        self.node
            .descendants()
            .filter(|n| n.has_tag_name("score-part") && n.attribute("id") == Some(part_id))
            .find_map(|score_part| {
                score_part
                    .descendants()
                    .find(|n| n.has_tag_name("part-name"))
                    .and_then(non_empty_text)
            })
    }

    /// `<measure>` descendants of the first `<part>`
    pub fn count_measures(&self) -> usize {
        self.node
            .descendants()
            .find(|n| n.has_tag_name("part"))
            .map(|part| part.descendants().filter(|n| n.has_tag_name("measure")).count())
            .unwrap_or(0)
    }

    pub fn metadata(&self) -> ScoreMetadata {
        ScoreMetadata {
            title: self.extract_title().unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            composer: self
                .extract_composer()
                .unwrap_or_else(|| UNKNOWN_COMPOSER.to_string()),
            parts: self.extract_part_refs(),
            measure_count: self.count_measures(),
        }
    }

    /// All `<part>` elements directly under the root
    pub fn parts(&self) -> Vec<PartNode<'a, 'input>> {
        self.node
            .children()
            .filter(|n| n.has_tag_name("part"))
            .map(|node| PartNode { node })
            .collect()
    }
}

// ============================================================================
// PART, MEASURE AND NOTE NODES
// ============================================================================

/// Wrapper around a `<part>` element
#[derive(Clone, Copy)]
pub struct PartNode<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input> PartNode<'a, 'input> {
    pub fn id(&self) -> Option<&'a str> {
        self.node.attribute("id")
    }

    /// Element children in document order
    pub fn children(&self) -> impl Iterator<Item = Node<'a, 'input>> {
        self.node.children().filter(|n| n.is_element())
    }
}

/// Wrapper around a `<measure>` element
#[derive(Clone, Copy)]
pub struct MeasureNode<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input> MeasureNode<'a, 'input> {
    pub fn new(node: Node<'a, 'input>) -> Self {
        Self { node }
    }

    /// Raw `number` attribute (`"12"`, `"12a"`, `"X1"`)
    pub fn number_attr(&self) -> Option<&'a str> {
        self.node.attribute("number")
    }

    /// Leading digits of the `number` attribute; `None` when absent or 0
    pub fn number(&self) -> Option<u32> {
        let raw = self.number_attr()?.trim();
        let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse::<u32>().ok().filter(|n| *n >= 1)
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'a, 'input>> {
        self.node.children().filter(|n| n.is_element())
    }
}

/// Wrapper around a `<note>` element
#[derive(Clone, Copy)]
pub struct NoteNode<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input> NoteNode<'a, 'input> {
    pub fn new(node: Node<'a, 'input>) -> Self {
        Self { node }
    }

    /// Sounds together with the preceding note (`<chord/>`)
    pub fn is_chord_member(&self) -> bool {
        get_child(self.node, "chord").is_some()
    }

    pub fn is_rest(&self) -> bool {
        get_child(self.node, "rest").is_some()
    }

    pub fn is_grace(&self) -> bool {
        get_child(self.node, "grace").is_some()
    }

    /// `<voice>` text, trimmed
    pub fn voice(&self) -> Option<String> {
        get_child(self.node, "voice").and_then(non_empty_text)
    }

    /// `<duration>` in divisions; `None` when the element is absent
    pub fn duration_divisions(&self) -> Result<Option<Rational>> {
        match get_child(self.node, "duration") {
            Some(duration) => parse_divisions_value(duration, "duration").map(Some),
            None => Ok(None),
        }
    }

    /// Written pitch; `None` for rests and unpitched (percussion) notes
    pub fn pitch(&self) -> Result<Option<SpelledPitch>> {
        match get_child(self.node, "pitch") {
            Some(pitch_node) => parse_pitch(pitch_node).map(Some),
            None => Ok(None),
        }
    }
}

// ============================================================================
// ELEMENT PARSERS
// ============================================================================

/// Parse a `<pitch>` element
pub fn parse_pitch(pitch_node: Node) -> Result<SpelledPitch> {
    let step_text = get_child_text(pitch_node, "step")
        .ok_or_else(|| ExtractError::missing_element("step", "<pitch>"))?;
    let step = Step::from_musicxml(&step_text)
        .ok_or_else(|| ExtractError::invalid_value("step", &step_text, "expected A-G"))?;

    let alter = match get_child_text(pitch_node, "alter") {
        Some(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ExtractError::invalid_value("alter", &text, "expected a number"))?,
        None => 0.0,
    };

    let octave_text = get_child_text(pitch_node, "octave")
        .ok_or_else(|| ExtractError::missing_element("octave", "<pitch>"))?;
    let octave = octave_text
        .trim()
        .parse::<i8>()
        .map_err(|_| ExtractError::invalid_value("octave", &octave_text, "expected an integer"))?;

    Ok(SpelledPitch::new(
        step,
        SpelledPitch::quarter_tones_from_alter(alter),
        octave,
    ))
}

/// Parse a `<divisions>` element: strictly positive
pub fn parse_divisions(divisions_node: Node) -> Result<Rational> {
    let value = parse_divisions_value(divisions_node, "divisions")?;
    if value <= Rational::from_integer(0) {
        return Err(ExtractError::invalid_value(
            "divisions",
            &value.to_string(),
            "expected a positive number",
        ));
    }
    Ok(value)
}

/// `<duration>` child of a `<backup>` or `<forward>`, in divisions
pub fn parse_duration_child(node: Node, element: &str) -> Result<Rational> {
    let duration = get_child(node, "duration")
        .ok_or_else(|| ExtractError::missing_element("duration", &format!("<{}>", element)))?;
    parse_divisions_value(duration, "duration")
}

/// Non-negative decimal content of a `<duration>`-like element
fn parse_divisions_value(node: Node, element: &str) -> Result<Rational> {
    let text = non_empty_text(node).unwrap_or_default();
    match parse_decimal(&text) {
        Some(value) if value >= Rational::from_integer(0) => Ok(value),
        _ => Err(ExtractError::invalid_value(
            element,
            &text,
            "expected a non-negative decimal number",
        )),
    }
}

/// Parse a plain decimal (`"3"`, `"1.5"`, `"-2"`) into an exact rational
pub fn parse_decimal(text: &str) -> Option<Rational> {
    let text = text.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    // Keeps 10^len inside i64
    if int_part.len() + frac_part.len() > 18 {
        return None;
    }

    let digits = format!("{}{}", int_part, frac_part);
    let numer: i64 = digits.parse().ok()?;
    let denom = 10i64.checked_pow(frac_part.len() as u32)?;
    let value = Rational::new(numer, denom);

    Some(if negative { -value } else { value })
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Get first child element with given tag name
pub fn get_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.is_element() && n.has_tag_name(tag))
}

/// Trimmed text of first child with given tag
pub fn get_child_text(node: Node, tag: &str) -> Option<String> {
    get_child(node, tag).and_then(non_empty_text)
}

/// Trimmed text content, `None` when blank
pub fn non_empty_text(node: Node) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn first_descendant_text(node: Node, tag: &str) -> Option<String> {
    node.descendants()
        .filter(|n| n.has_tag_name(tag))
        .find_map(non_empty_text)
}
