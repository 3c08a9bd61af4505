use dts_core::{ObjectId, SceneHost, Transform};
use dts_shape::ShapeAsset;
use glam::Quat;
use log::{debug, info};

use crate::{
    config::NodeMode,
    error::{FormatError, ImportError},
};

/// Host objects built for the shape's nodes, indexed like `ShapeAsset::nodes`.
#[derive(Clone, Debug, Default)]
pub struct NodeTree {
    pub objects: Vec<ObjectId>,
}

impl NodeTree {
    pub fn get(&self, node: usize) -> Option<ObjectId> {
        self.objects.get(node).copied()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Shape rotations store `(x, y, z, w)` with the scalar part negated
/// relative to the scene's convention. The scene wants `(-w, x, y, z)`.
pub fn convert_rotation(q: Quat) -> Quat {
    Quat::from_xyzw(q.x, q.y, q.z, -q.w)
}

/// Newline-joined node names, in shape order.
pub fn node_order(shape: &ShapeAsset) -> Result<String, FormatError> {
    let names = shape
        .nodes
        .iter()
        .map(|node| {
            shape
                .name(node.name)
                .ok_or(FormatError::NameIndex { index: node.name })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.join("\n"))
}

pub fn build_node_tree<H: SceneHost + ?Sized>(
    shape: &ShapeAsset,
    host: &mut H,
    mode: NodeMode,
) -> Result<NodeTree, ImportError> {
    if mode != NodeMode::Empty {
        info!("node mode {mode:?} builds no hierarchy; skipping {} nodes", shape.nodes.len());
        return Ok(NodeTree::default());
    }

    let mut tree = NodeTree {
        objects: Vec::with_capacity(shape.nodes.len()),
    };

    for (i, node) in shape.nodes.iter().enumerate() {
        let name = shape
            .name(node.name)
            .ok_or(FormatError::NameIndex { index: node.name })?;

        let parent = match node.parent() {
            Some(parent) if parent >= i => {
                return Err(ImportError::Structural { node: i, parent });
            }
            Some(parent) => Some(tree.objects[parent]),
            None => None,
        };

        let (Some(&translation), Some(&rotation)) = (
            shape.default_translations.get(i),
            shape.default_rotations.get(i),
        ) else {
            return Err(FormatError::MissingDefaultTransform { node: i }.into());
        };

        let object = host.create_empty(name);
        if let Some(parent) = parent {
            host.set_parent(object, parent);
        }
        host.set_local_transform(
            object,
            Transform::from_translation_rotation(translation, convert_rotation(rotation)),
        );
        host.link_to_scene(object);

        debug!("node {i} '{name}' -> {object:?}");
        tree.objects.push(object);
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use dts_scene::SceneGraph;
    use dts_shape::{NO_NODE, Node};
    use glam::Vec3;

    use super::*;

    fn shape_with(parents: &[i32]) -> ShapeAsset {
        let mut shape = ShapeAsset::default();
        for (i, &parent) in parents.iter().enumerate() {
            let name = shape.intern(&format!("node{i}"));
            shape.nodes.push(Node { name, parent });
            shape.default_translations.push(Vec3::new(i as f32, 0.0, 0.0));
            shape
                .default_rotations
                .push(Quat::from_xyzw(0.1 * i as f32, 0.2, 0.3, 0.9));
        }
        shape
    }

    #[test]
    fn rotation_flips_scalar_part() {
        let q = convert_rotation(Quat::from_xyzw(0.1, 0.2, 0.3, 0.4));
        // (w, x, y, z) = (-0.4, 0.1, 0.2, 0.3)
        assert_eq!([q.w, q.x, q.y, q.z], [-0.4, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn tree_matches_parent_relation() {
        let parents = [NO_NODE, 0, 1, 0, NO_NODE, 4];
        let shape = shape_with(&parents);
        let mut scene = SceneGraph::default();

        let tree = build_node_tree(&shape, &mut scene, NodeMode::Empty).unwrap();
        assert_eq!(tree.len(), parents.len());

        for (i, &parent) in parents.iter().enumerate() {
            let object = scene.object(tree.get(i).unwrap()).unwrap();
            assert_eq!(object.name, format!("node{i}"));
            let expected = usize::try_from(parent).ok().map(|p| tree.objects[p]);
            assert_eq!(object.parent, expected);
            assert!(object.linked);

            let source = shape.default_rotations[i];
            let r = object.transform.rotation;
            assert_eq!([r.w, r.x, r.y, r.z], [-source.w, source.x, source.y, source.z]);
            assert_eq!(object.transform.translation, shape.default_translations[i]);
        }

        let roots = scene.roots();
        assert_eq!(roots, vec![tree.objects[0], tree.objects[4]]);
        assert_eq!(
            scene.children(tree.objects[0]),
            &[tree.objects[1], tree.objects[3]]
        );
    }

    #[test]
    fn forward_parent_is_structural_error() {
        let shape = shape_with(&[NO_NODE, 2, 0]);
        let mut scene = SceneGraph::default();

        let err = build_node_tree(&shape, &mut scene, NodeMode::Empty).unwrap_err();
        assert!(matches!(err, ImportError::Structural { node: 1, parent: 2 }));
    }

    #[test]
    fn self_parent_is_structural_error() {
        let shape = shape_with(&[NO_NODE, 1]);
        let mut scene = SceneGraph::default();
        assert!(matches!(
            build_node_tree(&shape, &mut scene, NodeMode::Empty),
            Err(ImportError::Structural { node: 1, parent: 1 })
        ));
    }

    #[test]
    fn missing_default_transform_is_format_error() {
        let mut shape = shape_with(&[NO_NODE, 0]);
        shape.default_rotations.pop();
        let mut scene = SceneGraph::default();
        assert!(matches!(
            build_node_tree(&shape, &mut scene, NodeMode::Empty),
            Err(ImportError::Format(FormatError::MissingDefaultTransform { node: 1 }))
        ));
    }

    #[test]
    fn reserved_modes_build_nothing() {
        let shape = shape_with(&[NO_NODE, 0]);
        for mode in [NodeMode::Armature, NodeMode::Bone] {
            let mut scene = SceneGraph::default();
            let tree = build_node_tree(&shape, &mut scene, mode).unwrap();
            assert!(tree.is_empty());
            assert_eq!(scene.len(), 0);
        }
    }

    #[test]
    fn order_lists_names_in_shape_order() {
        let shape = shape_with(&[NO_NODE, 0, 0]);
        assert_eq!(node_order(&shape).unwrap(), "node0\nnode1\nnode2");

        let mut broken = shape.clone();
        broken.nodes[2].name = 99;
        assert!(matches!(
            node_order(&broken),
            Err(FormatError::NameIndex { index: 99 })
        ));
    }
}
