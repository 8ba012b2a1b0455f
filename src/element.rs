//! Element snapshots handed over by the document layer

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::geometry::{Canvas, Point, Rect};

/// Stable identifier of an element within one canvas
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of visual element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Shape,
    TextBox,
    Image,
    Connector,
    Placeholder,
}

impl ElementKind {
    /// Whether elements of this kind skip overlap and spacing checks unless
    /// told otherwise
    pub fn exempt_by_default(&self) -> bool {
        matches!(self, ElementKind::Connector)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Shape => write!(f, "shape"),
            ElementKind::TextBox => write!(f, "text box"),
            ElementKind::Image => write!(f, "image"),
            ElementKind::Connector => write!(f, "connector"),
            ElementKind::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// Start and end of a connector line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    pub start: Point,
    pub end: Point,
}

/// A positioned element on a canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub bounds: Rect,
    pub z_order: i32,
    pub exempt_from_overlap: bool,
    /// Connector endpoints, independent of `bounds`
    pub endpoints: Option<Endpoints>,
}

impl Element {
    pub fn new(id: impl Into<ElementId>, kind: ElementKind, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            kind,
            bounds,
            z_order: 0,
            exempt_from_overlap: kind.exempt_by_default(),
            endpoints: None,
        }
    }

    pub fn shape(id: impl Into<ElementId>, bounds: Rect) -> Self {
        Self::new(id, ElementKind::Shape, bounds)
    }

    pub fn text_box(id: impl Into<ElementId>, bounds: Rect) -> Self {
        Self::new(id, ElementKind::TextBox, bounds)
    }

    pub fn image(id: impl Into<ElementId>, bounds: Rect) -> Self {
        Self::new(id, ElementKind::Image, bounds)
    }

    pub fn placeholder(id: impl Into<ElementId>, bounds: Rect) -> Self {
        Self::new(id, ElementKind::Placeholder, bounds)
    }

    /// A connector line between two points
    pub fn connector(id: impl Into<ElementId>, bounds: Rect, start: Point, end: Point) -> Self {
        let mut element = Self::new(id, ElementKind::Connector, bounds);
        element.endpoints = Some(Endpoints { start, end });
        element
    }

    /// Set the stacking order
    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    /// Override the overlap/spacing exemption
    pub fn with_exempt(mut self, exempt: bool) -> Self {
        self.exempt_from_overlap = exempt;
        self
    }

    /// Copy of this element moved by a displacement, endpoints included
    pub fn translated(&self, dx: f64, dy: f64) -> Element {
        let mut moved = self.clone();
        moved.bounds = self.bounds.translate(dx, dy);
        moved.endpoints = self.endpoints.map(|e| Endpoints {
            start: e.start.translate(dx, dy),
            end: e.end.translate(dx, dy),
        });
        moved
    }

    /// Copy of this element with its bounds moved to `bounds`' position
    pub(crate) fn moved_to(&self, bounds: &Rect) -> Element {
        let mut moved = self.translated(
            bounds.left - self.bounds.left,
            bounds.top - self.bounds.top,
        );
        moved.bounds = *bounds;
        moved
    }
}

/// A canvas together with the elements placed on it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub canvas: Canvas,
    pub elements: Vec<Element>,
}

/// TOML structure for deserializing snapshots
#[derive(Deserialize)]
struct TomlSnapshot {
    canvas: Canvas,
    #[serde(default, rename = "element")]
    elements: Vec<TomlElement>,
}

#[derive(Deserialize)]
struct TomlElement {
    id: String,
    kind: ElementKind,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    z_order: i32,
    exempt: Option<bool>,
    start: Option<[f64; 2]>,
    end: Option<[f64; 2]>,
}

impl From<TomlElement> for Element {
    fn from(raw: TomlElement) -> Self {
        let bounds = Rect::new(raw.left, raw.top, raw.width, raw.height);
        let mut element = Element::new(raw.id, raw.kind, bounds).with_z_order(raw.z_order);
        if let Some(exempt) = raw.exempt {
            element.exempt_from_overlap = exempt;
        }
        if let (Some([sx, sy]), Some([ex, ey])) = (raw.start, raw.end) {
            element.endpoints = Some(Endpoints {
                start: Point::new(sx, sy),
                end: Point::new(ex, ey),
            });
        }
        element
    }
}

impl Snapshot {
    pub fn new(canvas: Canvas, elements: Vec<Element>) -> Self {
        Self { canvas, elements }
    }

    /// Load a snapshot from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a snapshot from a TOML string
    ///
    /// ```toml
    /// canvas = { width = 10.0, height = 7.5 }
    ///
    /// [[element]]
    /// id = "title"
    /// kind = "text_box"
    /// left = 0.5
    /// top = 0.5
    /// width = 9.0
    /// height = 1.0
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        let parsed: TomlSnapshot = toml::from_str(content)?;
        Ok(Snapshot {
            canvas: parsed.canvas,
            elements: parsed.elements.into_iter().map(Element::from).collect(),
        })
    }

    /// Look up an element by id
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id.as_str() == id)
    }
}
