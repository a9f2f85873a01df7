use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{MeshError, Result};
use crate::math::polygon_2d::newell_normal;
use crate::math::{Point3, Vector3};
use crate::mesh::{FaceData, MeshStore, ObjectData};

/// Name given to faces that appear before any `o` record.
pub const DEFAULT_OBJECT_NAME: &str = "default";

/// Line-level parse outcome; the message is wrapped with the line number.
type ParseResult<T> = std::result::Result<T, String>;

/// Reads a Wavefront OBJ file into a mesh store.
#[derive(Debug)]
pub struct ReadWavefront {
    path: PathBuf,
}

impl ReadWavefront {
    /// Creates a new `ReadWavefront` operation.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Executes the read.
    ///
    /// # Errors
    ///
    /// - `MeshError::Io` if the file cannot be read
    /// - `MeshError::Parse` for malformed records
    pub fn execute(&self) -> Result<MeshStore> {
        let source = std::fs::read_to_string(&self.path).map_err(MeshError::from)?;
        debug!(path = %self.path.display(), bytes = source.len(), "read wavefront file");
        ParseWavefront::new(&source).execute()
    }
}

/// Parses Wavefront OBJ text into a mesh store.
///
/// Understands `o`, `v`, `vn` and `f` records; everything else is ignored.
/// Vertex and normal indices are global to the file, 1-based, and may be
/// negative (relative to the most recent record). A face takes the normal
/// referenced by its first corner, or a computed one if it has none.
/// Degenerate faces are dropped with a warning.
#[derive(Debug)]
pub struct ParseWavefront<'a> {
    source: &'a str,
}

impl<'a> ParseWavefront<'a> {
    /// Creates a new `ParseWavefront` operation.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Executes the parse.
    ///
    /// # Errors
    ///
    /// Returns `MeshError::Parse` with the 1-based line number for malformed
    /// numbers, indices out of range, or records with missing fields.
    pub fn execute(&self) -> Result<MeshStore> {
        let mut parser = Parser::default();
        for (line_no, line) in self.source.lines().enumerate() {
            parser
                .parse_line(line)
                .map_err(|message| MeshError::Parse {
                    line: line_no + 1,
                    message,
                })?;
        }
        Ok(parser.finish())
    }
}

#[derive(Default)]
struct Parser {
    store: MeshStore,
    current: Option<ObjectData>,
    positions: Vec<Point3>,
    normals: Vec<Vector3>,
    dropped_faces: usize,
}

impl Parser {
    fn parse_line(&mut self, line: &str) -> ParseResult<()> {
        let line = line.split('#').next().unwrap_or_default();
        let mut fields = line.split_whitespace();
        let Some(keyword) = fields.next() else {
            return Ok(());
        };
        match keyword {
            "o" => {
                let name = fields.collect::<Vec<_>>().join(" ");
                if name.is_empty() {
                    return Err("object record without a name".to_owned());
                }
                self.flush_object();
                self.current = Some(ObjectData::new(name));
            }
            "v" => {
                let [x, y, z] = parse_triple(fields, "vertex")?;
                self.positions.push(Point3::new(x, y, z));
            }
            "vn" => {
                let [x, y, z] = parse_triple(fields, "normal")?;
                self.normals.push(Vector3::new(x, y, z));
            }
            "f" => self.parse_face(fields)?,
            _ => {}
        }
        Ok(())
    }

    fn parse_face<'s>(&mut self, corners: impl Iterator<Item = &'s str>) -> ParseResult<()> {
        let mut vertices = Vec::new();
        let mut normal = None;
        for (k, corner) in corners.enumerate() {
            let mut refs = corner.split('/');
            let v = refs.next().unwrap_or_default();
            let v = resolve_index(v, self.positions.len(), "vertex")?;
            vertices.push(self.positions[v]);
            if k == 0 {
                // `v/t/n` or `v//n`; the texture slot is ignored.
                if let Some(n) = refs.nth(1).filter(|n| !n.is_empty()) {
                    normal = Some(self.normals[resolve_index(n, self.normals.len(), "normal")?]);
                }
            }
        }
        if vertices.is_empty() {
            return Err("face record without vertices".to_owned());
        }

        let normal = normal.unwrap_or_else(|| newell_normal(&vertices));
        let object = self
            .current
            .get_or_insert_with(|| ObjectData::new(DEFAULT_OBJECT_NAME));
        match FaceData::new(vertices, normal) {
            Ok(face) => object.faces.push(face),
            Err(err) => {
                warn!(object = %object.name, "dropping face: {err}");
                self.dropped_faces += 1;
            }
        }
        Ok(())
    }

    fn flush_object(&mut self) {
        if let Some(object) = self.current.take() {
            debug!(object = %object.name, faces = object.faces.len(), "parsed object");
            self.store.add_object(object);
        }
    }

    fn finish(mut self) -> MeshStore {
        self.flush_object();
        if self.dropped_faces > 0 {
            warn!(count = self.dropped_faces, "dropped degenerate faces");
        }
        self.store
    }
}

fn parse_triple<'s>(
    mut fields: impl Iterator<Item = &'s str>,
    what: &str,
) -> ParseResult<[f64; 3]> {
    let mut out = [0.0; 3];
    for slot in &mut out {
        let field = fields
            .next()
            .ok_or_else(|| format!("{what} record needs three coordinates"))?;
        let value: f64 = field
            .parse()
            .map_err(|_| format!("invalid {what} coordinate '{field}'"))?;
        if !value.is_finite() {
            return Err(format!("non-finite {what} coordinate '{field}'"));
        }
        *slot = value;
    }
    Ok(out)
}

/// Turns a 1-based (or negative, relative) OBJ index into a 0-based one.
fn resolve_index(field: &str, len: usize, what: &str) -> ParseResult<usize> {
    let raw: i64 = field
        .parse()
        .map_err(|_| format!("invalid {what} index '{field}'"))?;
    let resolved = match raw {
        0 => None,
        r if r > 0 => usize::try_from(r - 1).ok(),
        r => usize::try_from(r.unsigned_abs())
            .ok()
            .and_then(|back| len.checked_sub(back)),
    };
    resolved
        .filter(|&i| i < len)
        .ok_or_else(|| format!("{what} index {raw} out of range (have {len})"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::MeshmapError;
    use crate::math::TOLERANCE;

    const TWO_OBJECTS: &str = "\
# exported
mtllib scene.mtl
o Ground
v 0 0 0
v 10 0 0
v 10 10 0
v 0 10 0
vn 0 0 1
usemtl grass
s off
f 1//1 2//1 3//1 4//1
o Block
v 2 2 3
v 4 2 3
v 4 4 3
vn 0.0 0.0 1.0
f 5//2 6//2 7//2
";

    #[test]
    fn parses_objects_in_order() {
        let store = ParseWavefront::new(TWO_OBJECTS).execute().unwrap();
        let objects: Vec<_> = store.objects().map(|(_, o)| o).collect();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].name, "Ground");
        assert_eq!(objects[0].faces.len(), 1);
        assert_eq!(objects[0].faces[0].vertices().len(), 4);
        assert_eq!(objects[1].name, "Block");
        assert_eq!(objects[1].faces[0].vertices()[0], Point3::new(2.0, 2.0, 3.0));
        assert!(objects.iter().all(|o| o.active));
    }

    #[test]
    fn first_corner_normal_is_used() {
        let src = "\
o Tilted
v 0 0 0
v 1 0 1
v 1 1 1
vn 0 0 1
vn -1 0 1
f 1//2 2//1 3//1
";
        let store = ParseWavefront::new(src).execute().unwrap();
        let (_, obj) = store.objects().next().unwrap();
        assert_eq!(obj.faces[0].normal(), Vector3::new(-1.0, 0.0, 1.0));
    }

    #[test]
    fn index_forms() {
        let src = "\
o Forms
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1/1/1 2/1/1 3/1/1
f 1/1 3/1 4/1
f 1 2 4
";
        let store = ParseWavefront::new(src).execute().unwrap();
        let (_, obj) = store.objects().next().unwrap();
        assert_eq!(obj.faces.len(), 3);
        for face in &obj.faces {
            let n = face.normal();
            assert!(n.x.abs() < TOLERANCE && n.y.abs() < TOLERANCE);
            assert!(n.z > 0.0);
        }
    }

    #[test]
    fn negative_indices_are_relative() {
        let src = "\
o Rel
v 0 0 1
v 2 0 1
v 0 2 1
vn 0 0 1
f -3//-1 -2//-1 -1//-1
";
        let store = ParseWavefront::new(src).execute().unwrap();
        let (_, obj) = store.objects().next().unwrap();
        assert_eq!(obj.faces[0].vertices()[1], Point3::new(2.0, 0.0, 1.0));
    }

    #[test]
    fn faces_before_object_go_to_default() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let store = ParseWavefront::new(src).execute().unwrap();
        let (_, obj) = store.objects().next().unwrap();
        assert_eq!(obj.name, DEFAULT_OBJECT_NAME);
        assert_eq!(obj.faces.len(), 1);
    }

    #[test]
    fn degenerate_faces_are_dropped() {
        let src = "\
o Bad
v 0 0 0
v 1 0 0
v 2 0 0
vn 0 0 0
f 1 2
f 1 2 3
f 1//1 2//1 3//1
";
        let store = ParseWavefront::new(src).execute().unwrap();
        let (_, obj) = store.objects().next().unwrap();
        assert!(obj.faces.is_empty());
    }

    #[test]
    fn bad_coordinate_reports_line() {
        let src = "o A\nv 0 0 0\nv 1 x 0\n";
        let err = ParseWavefront::new(src).execute().unwrap_err();
        assert!(matches!(
            err,
            MeshmapError::Mesh(MeshError::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        for src in [
            "o A\nv 0 0 0\nv 2 2 nan\n",
            "o A\nv 0 0 0\nv inf 0 0\n",
            "o A\nv 0 0 0\nvn 0 0 -infinity\n",
        ] {
            let err = ParseWavefront::new(src).execute().unwrap_err();
            assert!(matches!(
                err,
                MeshmapError::Mesh(MeshError::Parse { line: 3, .. })
            ));
        }
    }

    #[test]
    fn out_of_range_index() {
        let src = "o A\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n";
        let err = ParseWavefront::new(src).execute().unwrap_err();
        assert!(matches!(
            err,
            MeshmapError::Mesh(MeshError::Parse { line: 5, .. })
        ));
    }

    #[test]
    fn zero_index_is_invalid() {
        assert!(resolve_index("0", 3, "vertex").is_err());
        assert_eq!(resolve_index("3", 3, "vertex").unwrap(), 2);
        assert_eq!(resolve_index("-3", 3, "vertex").unwrap(), 0);
        assert!(resolve_index("-4", 3, "vertex").is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ReadWavefront::new("/nonexistent/mesh.obj").execute().unwrap_err();
        assert!(matches!(err, MeshmapError::Mesh(MeshError::Io(_))));
    }
}
