use std::collections::HashMap;

use dts_core::{GroupId, ObjectId, SceneHost, Transform, TriangleMesh};
use glam::Mat4;
use log::warn;

#[derive(Clone, Debug)]
pub enum ObjectKind {
    Empty,
    Mesh(TriangleMesh),
}

#[derive(Clone, Debug)]
pub struct SceneObject {
    pub name: String,
    pub kind: ObjectKind,
    pub parent: Option<ObjectId>,
    pub children: Vec<ObjectId>,
    pub transform: Transform,
    pub hidden: bool,
    /// Part of the active scene, as opposed to merely existing.
    pub linked: bool,
}

impl SceneObject {
    fn new(name: &str, kind: ObjectKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            parent: None,
            children: Vec::new(),
            transform: Transform::default(),
            hidden: false,
            linked: false,
        }
    }

    pub fn mesh(&self) -> Option<&TriangleMesh> {
        match &self.kind {
            ObjectKind::Mesh(mesh) => Some(mesh),
            ObjectKind::Empty => None,
        }
    }
}

#[derive(Clone, Debug)]
struct Group {
    name: String,
    members: Vec<ObjectId>,
}

/// Objects live in slots indexed by their id; removed objects leave a hole
/// so ids are never reused.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    slots: Vec<Option<SceneObject>>,
    groups: Vec<Group>,
    texts: HashMap<String, String>,
}

impl SceneGraph {
    fn spawn(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.slots.len() as u64);
        self.slots.push(Some(object));
        id
    }

    fn slot_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn mesh(&self, id: ObjectId) -> Option<&TriangleMesh> {
        self.object(id).and_then(SceneObject::mesh)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|o| (ObjectId(i as u64), o)))
    }

    /// Live objects without a parent, in creation order.
    pub fn roots(&self) -> Vec<ObjectId> {
        self.iter()
            .filter(|(_, o)| o.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.object(id).map(|o| o.children.as_slice()).unwrap_or(&[])
    }

    /// First live object called `name`.
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.iter().find(|(_, o)| o.name == name).map(|(id, _)| id)
    }

    pub fn group_members(&self, name: &str) -> Option<&[ObjectId]> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.members.as_slice())
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    /// Object -> world space, composing parent transforms up to the root.
    pub fn world_matrix(&self, id: ObjectId) -> Option<Mat4> {
        let mut object = self.object(id)?;
        let mut matrix = object.transform.compute_matrix();
        while let Some(parent) = object.parent {
            object = self.object(parent)?;
            matrix = object.transform.compute_matrix() * matrix;
        }
        Some(matrix)
    }

    fn detach(&mut self, child: ObjectId) {
        let Some(parent) = self.object(child).and_then(|o| o.parent) else {
            return;
        };
        if let Some(p) = self.slot_mut(parent) {
            p.children.retain(|&c| c != child);
        }
        if let Some(c) = self.slot_mut(child) {
            c.parent = None;
        }
    }

    fn is_ancestor(&self, ancestor: ObjectId, mut of: ObjectId) -> bool {
        while let Some(parent) = self.object(of).and_then(|o| o.parent) {
            if parent == ancestor {
                return true;
            }
            of = parent;
        }
        false
    }
}

impl SceneHost for SceneGraph {
    fn create_empty(&mut self, name: &str) -> ObjectId {
        self.spawn(SceneObject::new(name, ObjectKind::Empty))
    }

    fn create_mesh_object(&mut self, name: &str, mesh: TriangleMesh) -> ObjectId {
        self.spawn(SceneObject::new(name, ObjectKind::Mesh(mesh)))
    }

    fn set_parent(&mut self, child: ObjectId, parent: ObjectId) {
        if self.object(child).is_none() || self.object(parent).is_none() {
            warn!("cannot parent {child:?} to {parent:?}: no such object");
            return;
        }
        if child == parent || self.is_ancestor(child, parent) {
            warn!("cannot parent {child:?} to {parent:?}: would form a cycle");
            return;
        }

        self.detach(child);
        if let Some(c) = self.slot_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.slot_mut(parent) {
            p.children.push(child);
        }
    }

    fn set_local_transform(&mut self, object: ObjectId, transform: Transform) {
        if let Some(o) = self.slot_mut(object) {
            o.transform = transform;
        }
    }

    fn set_hidden(&mut self, object: ObjectId, hidden: bool) {
        if let Some(o) = self.slot_mut(object) {
            o.hidden = hidden;
        }
    }

    fn link_to_scene(&mut self, object: ObjectId) {
        if let Some(o) = self.slot_mut(object) {
            o.linked = true;
        }
    }

    fn group(&mut self, name: &str) -> GroupId {
        if let Some(i) = self.groups.iter().position(|g| g.name == name) {
            return GroupId(i as u64);
        }
        self.groups.push(Group {
            name: name.to_string(),
            members: Vec::new(),
        });
        GroupId(self.groups.len() as u64 - 1)
    }

    fn add_to_group(&mut self, group: GroupId, object: ObjectId) {
        if self.object(object).is_none() {
            return;
        }
        if let Some(g) = self.groups.get_mut(group.0 as usize) {
            if !g.members.contains(&object) {
                g.members.push(object);
            }
        }
    }

    fn write_text(&mut self, name: &str, contents: &str) {
        self.texts.insert(name.to_string(), contents.to_string());
    }

    fn remove_object(&mut self, object: ObjectId) {
        self.detach(object);
        let Some(removed) = self.slots.get_mut(object.0 as usize).and_then(Option::take) else {
            return;
        };
        for child in removed.children {
            if let Some(c) = self.slot_mut(child) {
                c.parent = None;
            }
        }
        for group in &mut self.groups {
            group.members.retain(|&m| m != object);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;

    #[test]
    fn parenting_links_both_directions() {
        let mut scene = SceneGraph::default();
        let root = scene.create_empty("root");
        let a = scene.create_empty("a");
        let b = scene.create_mesh_object("b", TriangleMesh::default());
        scene.set_parent(a, root);
        scene.set_parent(b, root);

        assert_eq!(scene.children(root), &[a, b]);
        assert_eq!(scene.object(a).unwrap().parent, Some(root));
        assert_eq!(scene.roots(), vec![root]);
        assert!(scene.mesh(b).is_some());
        assert!(scene.mesh(a).is_none());

        // reparenting moves the child
        scene.set_parent(b, a);
        assert_eq!(scene.children(root), &[a]);
        assert_eq!(scene.children(a), &[b]);
    }

    #[test]
    fn cycles_are_refused() {
        let mut scene = SceneGraph::default();
        let a = scene.create_empty("a");
        let b = scene.create_empty("b");
        scene.set_parent(b, a);
        scene.set_parent(a, b);
        scene.set_parent(a, a);

        assert_eq!(scene.object(a).unwrap().parent, None);
        assert_eq!(scene.roots(), vec![a]);
    }

    #[test]
    fn world_matrix_composes_ancestors() {
        let mut scene = SceneGraph::default();
        let root = scene.create_empty("root");
        let arm = scene.create_empty("arm");
        scene.set_parent(arm, root);
        scene.set_local_transform(
            root,
            Transform::from_translation_rotation(
                Vec3::new(0.0, 0.0, 1.0),
                Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            ),
        );
        scene.set_local_transform(arm, Transform::from_xyz(1.0, 0.0, 0.0));

        let p = scene.world_matrix(arm).unwrap().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(0.0, 1.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn groups_are_created_once_and_hold_members() {
        let mut scene = SceneGraph::default();
        let a = scene.create_empty("a");
        let g = scene.group("detail32");
        assert_eq!(scene.group("detail32"), g);

        scene.add_to_group(g, a);
        scene.add_to_group(g, a);
        assert_eq!(scene.group_members("detail32"), Some(&[a][..]));
        assert_eq!(scene.group_names().collect::<Vec<_>>(), vec!["detail32"]);
        assert!(scene.group_members("detail16").is_none());
    }

    #[test]
    fn removal_unlinks_everywhere() {
        let mut scene = SceneGraph::default();
        let root = scene.create_empty("root");
        let mid = scene.create_empty("mid");
        let leaf = scene.create_empty("leaf");
        scene.set_parent(mid, root);
        scene.set_parent(leaf, mid);
        let g = scene.group("lod");
        scene.add_to_group(g, mid);

        scene.remove_object(mid);

        assert_eq!(scene.len(), 2);
        assert!(scene.object(mid).is_none());
        assert!(scene.children(root).is_empty());
        assert_eq!(scene.object(leaf).unwrap().parent, None);
        assert_eq!(scene.group_members("lod"), Some(&[] as &[ObjectId]));

        // ids are not recycled
        let next = scene.create_empty("next");
        assert_ne!(next, mid);
        assert_eq!(scene.find("next"), Some(next));
    }

    #[test]
    fn text_blocks_are_replaced() {
        let mut scene = SceneGraph::default();
        scene.write_text("NodeOrder", "a\nb");
        scene.write_text("NodeOrder", "c");
        assert_eq!(scene.text("NodeOrder"), Some("c"));
        assert_eq!(scene.text("missing"), None);
    }
}
