use crate::{mesh::TriangleMesh, transform::Transform};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct GroupId(pub u64);

/// The scene-graph operations an importer needs from its host application.
///
/// Hosts are not expected to be reentrant; an importer drives one host from a
/// single thread.
pub trait SceneHost {
    /// Create a named transform-only object.
    fn create_empty(&mut self, name: &str) -> ObjectId;

    /// Create a named object bound to `mesh`.
    fn create_mesh_object(&mut self, name: &str, mesh: TriangleMesh) -> ObjectId;

    fn set_parent(&mut self, child: ObjectId, parent: ObjectId);

    fn set_local_transform(&mut self, object: ObjectId, transform: Transform);

    fn set_hidden(&mut self, object: ObjectId, hidden: bool);

    /// Make the object part of the active scene.
    fn link_to_scene(&mut self, object: ObjectId);

    /// Look a group up by name, creating it on first use.
    ///
    /// Groups have no removal; removing objects only empties them.
    fn group(&mut self, name: &str) -> GroupId;

    fn add_to_group(&mut self, group: GroupId, object: ObjectId);

    /// Replace the contents of the named text block.
    fn write_text(&mut self, name: &str, contents: &str);

    /// Remove an object again, unlinking it from its parent, children and groups.
    fn remove_object(&mut self, object: ObjectId);
}
