//! Element & Port-Symbol Library
//!
//! The instantiable circuit elements and port annotations, with their named
//! connection points in symbol-local coordinates. The library is a plain
//! value handed to extraction and dot inference; the built-in table is
//! [ElementLibrary::default], and custom tables can be loaded from JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::Instance;
use crate::geometry::Point;

/// Enumerated element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    Nmos,
    Pmos,
    Res,
    Res3,
    Cap,
    Cap3,
    Ind,
    Ind3,
    Vsource,
    Vsource4,
    Isource,
    Isource4,
    Diode,
    Npn,
    Pnp,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Enumerated port-annotation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKind {
    Input,
    Output,
    Inout,
}

impl std::fmt::Display for PortKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Named connection point on an [Element], in symbol-local coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementPort {
    pub name: String,
    pub loc: Point,
}

/// # Element
///
/// Template for an instantiable primitive: its ports and label placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub svg_tag: String,
    pub ports: Vec<ElementPort>,
    /// Location of the instance-name label
    pub nameloc: Point,
    /// Location of the instance-of label
    pub ofloc: Point,
    pub default_name_prefix: String,
    pub default_of: String,
    pub keyboard_shortcut: String,
}

impl Element {
    pub fn port(&self, name: &str) -> Option<&ElementPort> {
        self.ports.iter().find(|p| p.name == name)
    }
}

/// # Port Element
///
/// Symbol for a schematic port annotation. Its single connection point is its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortElement {
    pub kind: PortKind,
    pub svg_tag: String,
    pub nameloc: Point,
    pub keyboard_shortcut: String,
    pub default_name: String,
}

/// Registry of [Element]s and [PortElement]s
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementLibrary {
    pub elements: Vec<Element>,
    pub port_elements: Vec<PortElement>,
}

impl ElementLibrary {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, crate::SchemnetError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    pub fn element(&self, kind: ElementKind) -> Option<&Element> {
        self.elements.iter().find(|e| e.kind == kind)
    }

    pub fn element_by_tag(&self, tag: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.svg_tag == tag)
    }

    pub fn element_by_shortcut(&self, key: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.keyboard_shortcut == key)
    }

    pub fn port_element(&self, kind: PortKind) -> Option<&PortElement> {
        self.port_elements.iter().find(|p| p.kind == kind)
    }

    pub fn port_element_by_tag(&self, tag: &str) -> Option<&PortElement> {
        self.port_elements.iter().find(|p| p.svg_tag == tag)
    }

    /// Absolute `(port name, location)` pairs of `instance`,
    /// or `None` if its kind is not in the library.
    pub fn instance_ports<'a>(&'a self, instance: &Instance) -> Option<Vec<(&'a str, Point)>> {
        let element = self.element(instance.kind)?;
        let place = instance.place();
        Some(
            element
                .ports
                .iter()
                .map(|port| (port.name.as_str(), place.transform(&port.loc)))
                .collect(),
        )
    }
}

impl Default for ElementLibrary {
    fn default() -> Self {
        builtin()
    }
}

#[allow(clippy::too_many_arguments)]
fn element(
    kind: ElementKind,
    svg_tag: &str,
    ports: &[(&str, i64, i64)],
    nameloc: (i64, i64),
    ofloc: (i64, i64),
    default_name_prefix: &str,
    default_of: &str,
    keyboard_shortcut: &str,
) -> Element {
    Element {
        kind,
        svg_tag: svg_tag.to_string(),
        ports: ports
            .iter()
            .map(|&(name, x, y)| ElementPort {
                name: name.to_string(),
                loc: Point::new(x, y),
            })
            .collect(),
        nameloc: nameloc.into(),
        ofloc: ofloc.into(),
        default_name_prefix: default_name_prefix.to_string(),
        default_of: default_of.to_string(),
        keyboard_shortcut: keyboard_shortcut.to_string(),
    }
}

fn port_element(kind: PortKind, svg_tag: &str, nameloc: (i64, i64), shortcut: &str, default_name: &str) -> PortElement {
    PortElement {
        kind,
        svg_tag: svg_tag.to_string(),
        nameloc: nameloc.into(),
        keyboard_shortcut: shortcut.to_string(),
        default_name: default_name.to_string(),
    }
}

/// The built-in element table
fn builtin() -> ElementLibrary {
    use ElementKind::*;

    const TWO_TERMINAL: &[(&str, i64, i64)] = &[("p", 0, 0), ("n", 0, 100)];
    const THREE_TERMINAL: &[(&str, i64, i64)] = &[("p", 0, 0), ("n", 0, 100), ("b", -20, 50)];
    const FOUR_TERMINAL_SOURCE: &[(&str, i64, i64)] =
        &[("p", 0, 0), ("n", 0, 100), ("cp", -40, 30), ("cn", -40, 70)];
    const BIPOLAR: &[(&str, i64, i64)] = &[("c", 0, 0), ("b", -50, 50), ("e", 0, 100)];

    let elements = vec![
        element(
            Nmos,
            "nmos",
            &[("d", 0, 0), ("g", -70, 50), ("s", 0, 100), ("b", 20, 50)],
            (10, 20),
            (10, 80),
            "n",
            "Nmos()",
            "n",
        ),
        element(
            Pmos,
            "pmos",
            &[("d", 0, 100), ("g", -70, 50), ("s", 0, 0), ("b", 20, 50)],
            (10, 20),
            (10, 80),
            "p",
            "Pmos()",
            "p",
        ),
        element(Res, "res", TWO_TERMINAL, (10, 0), (10, 90), "r", "Res()", "r"),
        element(Res3, "res3", THREE_TERMINAL, (10, 0), (10, 90), "res3", "Res3()", "R"),
        element(Cap, "cap", TWO_TERMINAL, (10, 0), (10, 90), "c", "Cap()", "c"),
        element(
            Cap3,
            "cap3",
            &[("p", 0, 0), ("n", 0, 100), ("b", -40, 50)],
            (10, 0),
            (10, 90),
            "cap3",
            "Cap3()",
            "C",
        ),
        element(Ind, "ind", TWO_TERMINAL, (10, 0), (10, 90), "l", "Ind()", "l"),
        element(Ind3, "ind3", THREE_TERMINAL, (10, 0), (10, 90), "ind3", "Ind3()", "L"),
        element(Vsource, "vsource", TWO_TERMINAL, (10, 0), (10, 90), "v", "V()", "v"),
        element(Vsource4, "vsource4", FOUR_TERMINAL_SOURCE, (10, 0), (10, 90), "v4", "V4()", "V"),
        element(Isource, "isource", TWO_TERMINAL, (10, 0), (10, 90), "i", "I()", "i"),
        element(Isource4, "isource4", FOUR_TERMINAL_SOURCE, (10, 0), (10, 90), "i4", "I4()", "I"),
        element(Diode, "diode", TWO_TERMINAL, (10, 0), (10, 90), "d", "D()", "d"),
        element(Npn, "npn", BIPOLAR, (10, 0), (10, 90), "npn", "Npn()", "q"),
        element(Pnp, "pnp", BIPOLAR, (10, 0), (10, 90), "pnp", "Pnp()", "Q"),
    ];

    let port_elements = vec![
        port_element(PortKind::Input, "input", (-50, -25), "i", "inp"),
        port_element(PortKind::Output, "output", (20, -25), "o", "out"),
        port_element(PortKind::Inout, "inout", (15, -25), "z", "io"),
    ];

    ElementLibrary {
        elements,
        port_elements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Orientation, Rotation};

    #[test]
    fn test_builtin_covers_every_kind() {
        let lib = ElementLibrary::default();
        assert_eq!(lib.elements.len(), 15);
        for element in &lib.elements {
            assert_eq!(lib.element(element.kind), Some(element));
            assert_eq!(lib.element_by_tag(&element.svg_tag), Some(element));
            assert_eq!(lib.element_by_shortcut(&element.keyboard_shortcut), Some(element));
            assert!(!element.ports.is_empty());
        }
        assert_eq!(lib.port_element(PortKind::Output).map(|p| p.default_name.as_str()), Some("out"));
        assert_eq!(lib.port_element_by_tag("inout").map(|p| p.kind), Some(PortKind::Inout));
    }

    #[test]
    fn test_port_tables() {
        let lib = ElementLibrary::default();
        let nmos = lib.element(ElementKind::Nmos).unwrap();
        assert_eq!(nmos.port("g").unwrap().loc, Point::new(-70, 50));
        let pmos = lib.element(ElementKind::Pmos).unwrap();
        assert_eq!(pmos.port("d").unwrap().loc, Point::new(0, 100));
        let cap3 = lib.element(ElementKind::Cap3).unwrap();
        assert_eq!(cap3.port("b").unwrap().loc, Point::new(-40, 50));
        let npn = lib.element(ElementKind::Npn).unwrap();
        let names: Vec<_> = npn.ports.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "e"]);
    }

    #[test]
    fn test_instance_ports_are_placed() {
        let lib = ElementLibrary::default();
        let inst = Instance {
            name: "r1".to_string(),
            of: "Res()".to_string(),
            kind: ElementKind::Res,
            loc: Point::new(200, 300),
            orientation: Orientation::new(false, Rotation::R90),
        };
        let ports = lib.instance_ports(&inst).unwrap();
        assert_eq!(ports, vec![("p", Point::new(200, 300)), ("n", Point::new(300, 300))]);
    }

    #[test]
    fn test_library_json_round_trip() {
        let lib = ElementLibrary::default();
        let json = serde_json::to_string(&lib).unwrap();
        assert_eq!(ElementLibrary::from_json(&json).unwrap(), lib);

        let custom = ElementLibrary::from_json(r#"{ "elements": [], "port_elements": [] }"#).unwrap();
        assert!(custom.element(ElementKind::Res).is_none());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lib.json");

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(ElementLibrary::load(&path), Err(crate::SchemnetError::Parse(_))));

        std::fs::write(&path, serde_json::to_string(&ElementLibrary::default()).unwrap()).unwrap();
        assert_eq!(ElementLibrary::load(&path).unwrap(), ElementLibrary::default());

        let missing = dir.path().join("missing.json");
        assert!(matches!(ElementLibrary::load(&missing), Err(crate::SchemnetError::Io(_))));
    }
}
