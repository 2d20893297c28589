use std::fmt;

/// A formatting attribute that is either written on the element or left to
/// inheritance. `Unset` only ever equals `Unset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Attr<T> {
    Set(T),
    Unset,
}

// derive(Default) would demand `T: Default`, which `Alignment` is not
impl<T> Default for Attr<T> {
    fn default() -> Self {
        Attr::Unset
    }
}

impl<T> Attr<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Attr::Set(v),
            None => Attr::Unset,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Attr::Set(_))
    }
}

impl Attr<bool> {
    pub fn is_on(&self) -> bool {
        matches!(self, Attr::Set(true))
    }
}

// Booleans print as True/False and unset attributes as None; the report text
// shown to submitters has always used these words.
impl fmt::Display for Attr<bool> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attr::Set(true) => f.write_str("True"),
            Attr::Set(false) => f.write_str("False"),
            Attr::Unset => f.write_str("None"),
        }
    }
}

impl fmt::Display for Attr<String> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attr::Set(s) => f.write_str(s),
            Attr::Unset => f.write_str("None"),
        }
    }
}

impl fmt::Display for Attr<Alignment> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attr::Set(a) => write!(f, "{a}"),
            Attr::Unset => f.write_str("None"),
        }
    }
}

/// Point sizes print with at least one decimal place (`12.0`, `10.5`).
impl fmt::Display for Attr<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attr::Set(pt) => write!(f, "{pt:?}"),
            Attr::Unset => f.write_str("None"),
        }
    }
}

/// Paragraph justification as written in `w:jc`. Every token stays distinct;
/// `start`/`left` and `end`/`right` differ in right-to-left text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Alignment {
    Start,
    Left,
    Center,
    End,
    Right,
    Justify,
    JustifyLow,
    JustifyMedium,
    JustifyHigh,
    Distribute,
    ThaiDistribute,
    NumTab,
    /// A token outside ST_Jc, kept verbatim.
    Other(String),
}

impl Alignment {
    pub fn from_jc(val: &str) -> Self {
        match val {
            "start" => Alignment::Start,
            "left" => Alignment::Left,
            "center" => Alignment::Center,
            "end" => Alignment::End,
            "right" => Alignment::Right,
            "both" => Alignment::Justify,
            "lowKashida" => Alignment::JustifyLow,
            "mediumKashida" => Alignment::JustifyMedium,
            "highKashida" => Alignment::JustifyHigh,
            "distribute" => Alignment::Distribute,
            "thaiDistribute" => Alignment::ThaiDistribute,
            "numTab" => Alignment::NumTab,
            other => Alignment::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alignment::Start => "START",
            Alignment::Left => "LEFT",
            Alignment::Center => "CENTER",
            Alignment::End => "END",
            Alignment::Right => "RIGHT",
            Alignment::Justify => "JUSTIFY",
            Alignment::JustifyLow => "JUSTIFY_LOW",
            Alignment::JustifyMedium => "JUSTIFY_MED",
            Alignment::JustifyHigh => "JUSTIFY_HI",
            Alignment::Distribute => "DISTRIBUTE",
            Alignment::ThaiDistribute => "THAI_JUSTIFY",
            Alignment::NumTab => "NUM_TAB",
            Alignment::Other(token) => token.as_str(),
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct RunRecord {
    pub text: String,
    pub bold: Attr<bool>,
    pub italic: Attr<bool>,
    pub underline: Attr<bool>,
    pub font_name: Attr<String>,
    pub font_size: Attr<f64>, // points
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct ParagraphRecord {
    pub text: String, // trimmed
    pub alignment: Attr<Alignment>,
    pub has_image: bool,
    pub runs: Vec<RunRecord>,
}

impl ParagraphRecord {
    /// Blank paragraphs carry nothing worth comparing.
    pub fn is_significant(&self) -> bool {
        !self.text.is_empty() || self.has_image
    }
}

/// An image relationship of a header part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRef {
    pub rel_id: String,
    pub target: String,
}

/// Header table: rows of cell paragraphs, cells flattened in reading order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TableRecord {
    pub rows: Vec<Vec<ParagraphRecord>>,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct HeaderStructure {
    pub paragraphs: Vec<ParagraphRecord>,
    pub images: Vec<ImageRef>,
    pub tables: Vec<TableRecord>,
}

impl HeaderStructure {
    /// True when there is neither a paragraph nor an image to compare against.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty() && self.images.is_empty()
    }
}
