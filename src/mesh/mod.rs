pub mod face;
pub mod object;

pub use face::FaceData;
pub use object::{ObjectData, ObjectId};

use crate::error::MeshError;
use slotmap::SlotMap;

/// Arena that owns all objects of a mesh.
///
/// Objects are addressed by typed IDs and iterated in insertion order.
/// The store is built once at load time and only read during rasterization.
#[derive(Debug, Default)]
pub struct MeshStore {
    objects: SlotMap<ObjectId, ObjectData>,
    order: Vec<ObjectId>,
}

impl MeshStore {
    /// Creates a new, empty mesh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an object and returns its ID.
    pub fn add_object(&mut self, data: ObjectData) -> ObjectId {
        let id = self.objects.insert(data);
        self.order.push(id);
        id
    }

    /// Looks up the first object with the given name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.objects[id].name == name)
    }

    /// Shows or hides an object by name.
    ///
    /// # Errors
    ///
    /// Returns `MeshError::ObjectNotFound` if no object has that name.
    pub fn set_active_by_name(&mut self, name: &str, active: bool) -> Result<(), MeshError> {
        let id = self
            .find_by_name(name)
            .ok_or_else(|| MeshError::ObjectNotFound(name.to_owned()))?;
        self.objects[id].active = active;
        Ok(())
    }

    /// Iterates over all objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &ObjectData)> + '_ {
        self.order.iter().map(move |&id| (id, &self.objects[id]))
    }

    /// Iterates over the faces of active objects, in object then face order.
    pub fn active_faces(&self) -> impl Iterator<Item = &FaceData> + '_ {
        self.objects()
            .filter(|(_, o)| o.active)
            .flat_map(|(_, o)| o.faces.iter())
    }

    /// Number of objects in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of faces across all objects, active or not.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.objects.values().map(|o| o.faces.len()).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};

    fn triangle(z: f64) -> FaceData {
        FaceData::new(
            vec![
                Point3::new(0.0, 0.0, z),
                Point3::new(1.0, 0.0, z),
                Point3::new(0.0, 1.0, z),
            ],
            Vector3::z(),
        )
        .unwrap()
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut store = MeshStore::new();
        assert!(store.is_empty());
        for name in ["c", "a", "d", "b"] {
            store.add_object(ObjectData::new(name));
        }
        let names: Vec<_> = store.objects().map(|(_, o)| o.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "d", "b"]);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn find_by_name_returns_first_match() {
        let mut store = MeshStore::new();
        let first = store.add_object(ObjectData::new("dup"));
        store.add_object(ObjectData::new("dup"));
        assert_eq!(store.find_by_name("dup"), Some(first));
        assert_eq!(store.find_by_name("other"), None);
    }

    #[test]
    fn active_faces_skip_hidden_objects() {
        let mut store = MeshStore::new();
        store.add_object(ObjectData::with_faces("ground", vec![triangle(0.0)]));
        store.add_object(ObjectData::with_faces(
            "roof",
            vec![triangle(5.0), triangle(6.0)],
        ));
        assert_eq!(store.active_faces().count(), 3);

        store.set_active_by_name("roof", false).unwrap();
        assert_eq!(store.active_faces().count(), 1);
        assert_eq!(store.face_count(), 3);
    }

    #[test]
    fn set_active_unknown_name() {
        let mut store = MeshStore::new();
        let res = store.set_active_by_name("missing", false);
        assert!(matches!(res, Err(MeshError::ObjectNotFound(name)) if name == "missing"));
    }
}
