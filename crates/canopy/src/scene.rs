//! Scene snapshots: JSON documents and annotated SVG.
//!
//! A [`Scene`] is the plain-data form of a stage (size plus one pose per
//! tree), suitable for `serde_json`. [`scene_to_svg`] draws a stage with
//! colliding trees highlighted and the bounding square dashed; every tree
//! polygon carries `data-*` attributes so [`poses_from_svg`] can read the
//! poses back out of a saved snapshot.

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::shape::{ShapeTemplate, Silhouette, TREE_HEIGHT};
use crate::stage::Stage;
use crate::svg::SvgError;
use crate::transform::Pose;

/// Stage size, silhouette and tree poses, in tree order.
///
/// `template` holds the unit outline of a custom silhouette and is left
/// out for the built-in tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_tree_height")]
    pub tree_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Vec<(f64, f64)>>,
    #[serde(default)]
    pub trees: Vec<Pose>,
}

fn default_tree_height() -> f64 {
    TREE_HEIGHT
}

impl Scene {
    pub fn from_stage(stage: &Stage) -> Self {
        let silhouette = stage.silhouette();
        Self {
            width: stage.width(),
            height: stage.height(),
            tree_height: silhouette.height(),
            template: custom_units(silhouette),
            trees: stage.trees().iter().map(|t| t.pose).collect(),
        }
    }

    /// Check sizes, poses and template without building anything.
    pub fn validate(&self) -> Result<(), SceneError> {
        self.silhouette().map(|_| ())
    }

    /// The silhouette every tree in this scene uses.
    pub fn silhouette(&self) -> Result<Silhouette, SceneError> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("tree_height", self.tree_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SceneError::InvalidSize { name, value });
            }
        }
        if let Some(index) = self.trees.iter().position(|pose| !pose.is_finite()) {
            return Err(SceneError::NonFinitePose { index });
        }
        let template = match &self.template {
            Some(units) => ShapeTemplate::new(units.clone())?,
            None => ShapeTemplate::tree(),
        };
        Ok(Silhouette::new(template, self.tree_height))
    }

    /// Build a stage holding these trees.
    ///
    /// Poses are clamped to the stage like any other placement, and the
    /// stage's report is up to date on return.
    pub fn to_stage(&self) -> Result<Stage, SceneError> {
        let mut stage = Stage::with_silhouette(self.width, self.height, self.silhouette()?);
        for pose in &self.trees {
            stage.add_tree(*pose);
        }
        Ok(stage)
    }
}

// ============================================================================
// SVG EXPORT
// ============================================================================

const TREE_FILL: &str = "#2f7d4a";
const COLLIDING_FILL: &str = "#c8553d";
const SQUARE_STROKE: &str = "#3a6ea5";

/// Render a stage as a standalone SVG document.
pub fn scene_to_svg(stage: &Stage) -> String {
    let report = stage.report();
    let mut svg = String::new();

    svg.push_str(&format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" data-tree-height="{th}"{template}>
<rect width="100%" height="100%" fill="#f6f3ea"/>
<g id="trees" stroke="#1d3b2a" stroke-width="1" stroke-linejoin="round">
"##,
        w = stage.width(),
        h = stage.height(),
        th = stage.silhouette().height(),
        template = match custom_units(stage.silhouette()) {
            Some(units) => format!(" data-template=\"{}\"", format_units(&units)),
            None => String::new(),
        },
    ));

    for tree in stage.trees() {
        let polygon = stage.engine().polygon(&tree.pose);
        let points: String = polygon
            .points()
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        let (class, fill) = if tree.colliding {
            ("tree colliding", COLLIDING_FILL)
        } else {
            ("tree", TREE_FILL)
        };
        svg.push_str(&format!(
            "  <polygon class=\"{}\" data-index=\"{}\" data-label=\"{}\" data-x=\"{}\" data-y=\"{}\" data-rotation=\"{}\" fill=\"{}\" points=\"{}\"/>\n",
            class,
            tree.index,
            escape(tree.label.as_str()),
            tree.pose.x,
            tree.pose.y,
            tree.pose.rotation,
            fill,
            points
        ));
    }
    svg.push_str("</g>\n");

    if let Some(sq) = report.bounding_square {
        svg.push_str(&format!(
            "<rect id=\"bounding-square\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\" stroke-dasharray=\"6 4\"/>\n",
            sq.left, sq.top, sq.side, sq.side, SQUARE_STROKE
        ));
        svg.push_str(&format!(
            "<text x=\"8\" y=\"20\" font-family=\"sans-serif\" font-size=\"14\" fill=\"{}\">Bounding square: {:.1} px</text>\n",
            SQUARE_STROKE,
            sq.display_side()
        ));
    }

    svg.push_str(&format!(
        "<text x=\"8\" y=\"{:.0}\" font-family=\"sans-serif\" font-size=\"14\" fill=\"#333333\">{}</text>\n",
        stage.height() - 10.0,
        report.status_message()
    ));
    svg.push_str("</svg>\n");
    svg
}

/// Unit outline of a non-default template, `None` for the built-in tree.
fn custom_units(silhouette: &Silhouette) -> Option<Vec<(f64, f64)>> {
    let template = silhouette.template();
    (*template != ShapeTemplate::tree()).then(|| template.units().to_vec())
}

/// `"x,y x,y ..."`, the same layout as polygon `points`.
fn format_units(units: &[(f64, f64)]) -> String {
    units
        .iter()
        .map(|(x, y)| format!("{},{}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_units(value: &str) -> Result<Vec<(f64, f64)>, SvgError> {
    value
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| SvgError::Parse(format!("bad data-template point '{pair}'")))?;
            Ok((parse_attr("data-template", x)?, parse_attr("data-template", y)?))
        })
        .collect()
}

// ============================================================================
// SVG IMPORT
// ============================================================================

/// Read tree poses back from an SVG written by [`scene_to_svg`].
///
/// Streams through the XML with quick-xml, picking up every `<polygon>`
/// whose class list contains `tree`. Poses come back ordered by
/// `data-index`.
pub fn poses_from_svg(svg_content: &str) -> Result<Vec<Pose>, SvgError> {
    Ok(read_snapshot(svg_content)?.poses)
}

/// Rebuild a whole [`Scene`] from an SVG written by [`scene_to_svg`].
///
/// Stage size comes from the root `width`/`height` attributes, which must
/// be present. Tree height falls back to the built-in one. The result is
/// validated, so [`Scene::to_stage`] will accept it.
pub fn scene_from_svg(svg_content: &str) -> Result<Scene, SvgError> {
    let snapshot = read_snapshot(svg_content)?;
    let missing = |name: &str| SvgError::Parse(format!("root <svg> without {name}"));
    let scene = Scene {
        width: snapshot.width.ok_or_else(|| missing("width"))?,
        height: snapshot.height.ok_or_else(|| missing("height"))?,
        tree_height: snapshot.tree_height.unwrap_or(TREE_HEIGHT),
        template: snapshot.template,
        trees: snapshot.poses,
    };
    scene.validate()?;
    Ok(scene)
}

#[derive(Default)]
struct Snapshot {
    width: Option<f64>,
    height: Option<f64>,
    tree_height: Option<f64>,
    template: Option<Vec<(f64, f64)>>,
    poses: Vec<Pose>,
}

fn read_snapshot(svg_content: &str) -> Result<Snapshot, SvgError> {
    let mut reader = Reader::from_str(svg_content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut snapshot = Snapshot::default();
    let mut found: Vec<(usize, Pose)> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"svg" => read_root_attrs(e, &mut snapshot)?,
                b"polygon" => {
                    if let Some(entry) = read_tree_attrs(e)? {
                        found.push(entry);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SvgError::Parse(format!(
                    "XML parse error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    found.sort_by_key(|(index, _)| *index);
    snapshot.poses = found.into_iter().map(|(_, pose)| pose).collect();
    Ok(snapshot)
}

fn read_root_attrs(e: &BytesStart<'_>, snapshot: &mut Snapshot) -> Result<(), SvgError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| SvgError::Parse(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| SvgError::Parse(e.to_string()))?;
        match attr.key.as_ref() {
            b"width" => snapshot.width = Some(parse_attr("width", &value)?),
            b"height" => snapshot.height = Some(parse_attr("height", &value)?),
            b"data-tree-height" => snapshot.tree_height = Some(parse_attr("data-tree-height", &value)?),
            b"data-template" => snapshot.template = Some(parse_units(&value)?),
            _ => {}
        }
    }
    Ok(())
}

/// Pull `(data-index, pose)` off a tree polygon; `None` for other polygons.
fn read_tree_attrs(e: &BytesStart<'_>) -> Result<Option<(usize, Pose)>, SvgError> {
    let mut is_tree = false;
    let mut index = None;
    let mut x = None;
    let mut y = None;
    let mut rotation = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| SvgError::Parse(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| SvgError::Parse(e.to_string()))?;
        match attr.key.as_ref() {
            b"class" => is_tree = value.split_whitespace().any(|c| c == "tree"),
            b"data-index" => index = Some(parse_attr::<usize>("data-index", &value)?),
            b"data-x" => x = Some(parse_attr::<f64>("data-x", &value)?),
            b"data-y" => y = Some(parse_attr::<f64>("data-y", &value)?),
            b"data-rotation" => rotation = Some(parse_attr::<f64>("data-rotation", &value)?),
            _ => {}
        }
    }

    if !is_tree {
        return Ok(None);
    }

    let missing = |name: &str| SvgError::Parse(format!("tree polygon without {name}"));
    let x = x.ok_or_else(|| missing("data-x"))?;
    let y = y.ok_or_else(|| missing("data-y"))?;
    let index = index.ok_or_else(|| missing("data-index"))?;
    Ok(Some((index, Pose::new(x, y, rotation.unwrap_or(0.0)))))
}

fn parse_attr<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, SvgError> {
    value
        .trim()
        .parse()
        .map_err(|_| SvgError::Parse(format!("bad {name} value '{value}'")))
}
