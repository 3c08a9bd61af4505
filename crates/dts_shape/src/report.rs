use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{codec::ShapeError, shape::ShapeAsset};

fn name_or_missing(shape: &ShapeAsset, index: usize) -> &str {
    shape.name(index).unwrap_or("<missing name>")
}

pub fn write_debug_report<W: Write>(shape: &ShapeAsset, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Names ({}):", shape.names.len())?;
    for (i, name) in shape.names.iter().enumerate() {
        writeln!(out, "  {i}: {name}")?;
    }

    writeln!(out, "Nodes ({}):", shape.nodes.len())?;
    for (i, node) in shape.nodes.iter().enumerate() {
        let parent = match node.parent() {
            Some(p) => shape
                .nodes
                .get(p)
                .map(|n| name_or_missing(shape, n.name))
                .unwrap_or("<bad parent>"),
            None => "-",
        };
        writeln!(out, "  {i}: {} (parent {parent})", name_or_missing(shape, node.name))?;
        if let (Some(t), Some(r)) = (
            shape.default_translations.get(i),
            shape.default_rotations.get(i),
        ) {
            writeln!(
                out,
                "      t = ({}, {}, {}) r = ({}, {}, {}, {})",
                t.x, t.y, t.z, r.x, r.y, r.z, r.w
            )?;
        }
    }

    writeln!(out, "Materials ({}):", shape.materials.len())?;
    for (i, material) in shape.materials.iter().enumerate() {
        writeln!(out, "  {i}: {} {:?}", material.name, material.flags())?;
    }

    writeln!(out, "IFL materials ({}):", shape.ifl_materials.len())?;
    for ifl in &shape.ifl_materials {
        writeln!(
            out,
            "  slot {}: {} frames {}+{} time {}",
            ifl.slot,
            name_or_missing(shape, ifl.name),
            ifl.first_frame,
            ifl.num_frames,
            ifl.time
        )?;
    }

    writeln!(out, "Meshes ({}):", shape.meshes.len())?;
    for (i, mesh) in shape.meshes.iter().enumerate() {
        writeln!(
            out,
            "  {i}: {} verts={} indices={} primitives={}",
            mesh.ty.name(),
            mesh.verts.len(),
            mesh.indices.len(),
            mesh.primitives.len()
        )?;
        for prim in &mesh.primitives {
            writeln!(
                out,
                "      {:?} material={:?} elements {}+{}",
                prim.draw_mode(),
                prim.material(),
                prim.first_element,
                prim.num_elements
            )?;
        }
    }

    writeln!(out, "Objects ({}):", shape.objects.len())?;
    for (i, object) in shape.objects.iter().enumerate() {
        writeln!(
            out,
            "  {i}: {} node={} meshes {}+{}",
            name_or_missing(shape, object.name),
            object.node,
            object.first_mesh,
            object.num_meshes
        )?;
    }

    writeln!(out, "Detail levels ({}):", shape.detail_levels.len())?;
    for lod in &shape.detail_levels {
        writeln!(
            out,
            "  {} objectDetail={} size={}",
            name_or_missing(shape, lod.name),
            lod.object_detail,
            lod.size
        )?;
    }

    writeln!(out, "Sequences ({}):", shape.sequences.len())?;
    for seq in &shape.sequences {
        writeln!(
            out,
            "  {} keyframes={} duration={}",
            name_or_missing(shape, seq.name),
            seq.num_keyframes,
            seq.duration
        )?;
    }

    out.flush()
}

pub fn write_debug_report_file(path: &Path, shape: &ShapeAsset) -> Result<(), ShapeError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_debug_report(shape, &mut out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Material, Node, NO_NODE};

    #[test]
    fn report_lists_nodes_with_parent_names() {
        let mut shape = ShapeAsset::default();
        let root = shape.intern("root");
        let hip = shape.intern("hip");
        shape.nodes.push(Node { name: root, parent: NO_NODE });
        shape.nodes.push(Node { name: hip, parent: 0 });
        shape.materials.push(Material {
            name: "red".into(),
            flags: 0,
        });

        let mut out = Vec::new();
        write_debug_report(&shape, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("0: root (parent -)"));
        assert!(text.contains("1: hip (parent root)"));
        assert!(text.contains("Materials (1):"));
    }

    #[test]
    fn report_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player.dts.txt");
        write_debug_report_file(&path, &ShapeAsset::default()).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("Names (0):"));
    }
}
