use std::{
    collections::HashMap,
    ffi::OsString,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use dts_core::{GroupId, ObjectId, SceneHost, Transform, TriangleMesh};
use dts_shape::{JsonShapeCodec, ShapeAsset, ShapeError, ShapeReader, ShapeWriter, report};
use log::{debug, info, warn};

use crate::{
    config::ImportConfig,
    error::{FormatError, ImportError},
    material::{MaterialResolver, ResolvedMaterials, apply_ifl_materials},
    mesh::MeshAssembler,
    nodes::{self, NodeTree},
    texture::{FileSystem, ImageTextureStore, OsFileSystem, TextureStore},
};

/// Host text block receiving the newline-joined node names.
pub const NODE_ORDER_TEXT: &str = "NodeOrder";

/// One mesh object created by an import.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportedObject {
    pub id: ObjectId,
    pub name: String,
    /// Shape node the object hangs off, if any.
    pub node: Option<usize>,
    /// Index into the shape's mesh list.
    pub mesh: usize,
    pub detail_level: Option<String>,
}

#[derive(Debug)]
pub struct ImportedScene {
    pub materials: ResolvedMaterials,
    pub nodes: NodeTree,
    pub objects: Vec<ImportedObject>,
    pub node_order: String,
    /// Null and unsupported meshes passed over.
    pub skipped_meshes: usize,
}

pub struct ShapeImporter<F = OsFileSystem, T = ImageTextureStore> {
    config: ImportConfig,
    fs: F,
    textures: T,
    reader: Box<dyn ShapeReader>,
}

impl ShapeImporter {
    pub fn new(config: ImportConfig) -> Self {
        Self::with_io(config, OsFileSystem, ImageTextureStore)
    }
}

impl<F: FileSystem, T: TextureStore> ShapeImporter<F, T> {
    pub fn with_io(config: ImportConfig, fs: F, textures: T) -> Self {
        Self {
            config,
            fs,
            textures,
            reader: Box::new(JsonShapeCodec::default()),
        }
    }

    /// Replace the decoder used by [`ShapeImporter::load`].
    pub fn with_reader(mut self, reader: impl ShapeReader + 'static) -> Self {
        self.reader = Box::new(reader);
        self
    }

    /// Read the shape at `path` and import it into `host`.
    pub fn load<H: SceneHost + ?Sized>(
        &mut self,
        path: &Path,
        host: &mut H,
    ) -> Result<ImportedScene, ImportError> {
        let file = File::open(path).map_err(ShapeError::from)?;
        let shape = self.reader.read_shape(&mut BufReader::new(file))?;
        debug!("read {} ({} nodes, {} meshes)", path.display(), shape.nodes.len(), shape.meshes.len());

        if self.config.debug_report {
            write_debug_files(path, &shape);
        }

        self.import(&shape, path, host)
    }

    /// Import an already decoded shape. `path` anchors the texture search.
    ///
    /// Either every object lands in `host` or, on error, none do.
    pub fn import<H: SceneHost + ?Sized>(
        &mut self,
        shape: &ShapeAsset,
        path: &Path,
        host: &mut H,
    ) -> Result<ImportedScene, ImportError> {
        let mut tracked = Tracked::new(host);

        match self.compose(shape, path, &mut tracked) {
            Ok(scene) => {
                tracked.host.write_text(NODE_ORDER_TEXT, &scene.node_order);
                info!(
                    "imported {}: {} nodes, {} materials, {} mesh objects ({} meshes skipped)",
                    path.display(),
                    scene.nodes.len(),
                    scene.materials.len(),
                    scene.objects.len(),
                    scene.skipped_meshes
                );
                Ok(scene)
            }
            Err(err) => {
                warn!(
                    "import of {} failed, removing {} created objects",
                    path.display(),
                    tracked.created.len()
                );
                let groups = tracked.rollback();
                if !groups.is_empty() {
                    warn!("groups {groups:?} stay in the scene and may now be empty");
                }
                Err(err)
            }
        }
    }

    fn compose<H: SceneHost + ?Sized>(
        &mut self,
        shape: &ShapeAsset,
        path: &Path,
        host: &mut H,
    ) -> Result<ImportedScene, ImportError> {
        let node_order = nodes::node_order(shape)?;

        // Materials first, so IFL mismatches abort before anything is created
        let mut resolver = MaterialResolver::new(&self.fs, &mut self.textures, path);
        resolver.resolve_all(shape);
        let mut materials = resolver.finish();
        apply_ifl_materials(&mut materials, shape)?;

        let tree = nodes::build_node_tree(shape, host, self.config.node_mode)?;

        // objectDetail -> detail level name; a later entry wins
        let mut detail_names: HashMap<i32, &str> = HashMap::new();
        for lod in &shape.detail_levels {
            let name = shape
                .name(lod.name)
                .ok_or(FormatError::NameIndex { index: lod.name })?;
            detail_names.insert(lod.object_detail, name);
        }

        let visibility = self.config.visibility();
        let assembler = MeshAssembler::new(shape, &materials);
        let mut objects = Vec::new();
        let mut skipped_meshes = 0;

        // One mesh object per (object, mesh) pair
        for (o, object) in shape.objects.iter().enumerate() {
            let name = shape
                .name(object.name)
                .ok_or(FormatError::NameIndex { index: object.name })?;

            let in_range = object
                .first_mesh
                .checked_add(object.num_meshes)
                .is_some_and(|end| end <= shape.meshes.len());
            if !in_range {
                return Err(FormatError::MeshRange {
                    object: o,
                    first: object.first_mesh,
                    count: object.num_meshes,
                }
                .into());
            }

            if let Some(node) = object.node() {
                if node >= shape.nodes.len() {
                    return Err(FormatError::NodeIndex { object: o, node }.into());
                }
            }

            for position in 0..object.num_meshes {
                let mesh_index = object.first_mesh + position;
                let Some(mesh) = assembler.assemble(mesh_index, name)? else {
                    skipped_meshes += 1;
                    continue;
                };

                let id = host.create_mesh_object(name, mesh);

                if let Some(node) = object.node() {
                    match tree.get(node) {
                        Some(parent) => host.set_parent(id, parent),
                        // only reachable when the node mode builds no tree
                        None => warn!(
                            "object '{name}' references node {node}, which was not built in {:?} mode; leaving it unparented",
                            self.config.node_mode
                        ),
                    }
                }

                if visibility.is_hidden(name) {
                    host.set_hidden(id, true);
                }

                let detail_level = i32::try_from(position)
                    .ok()
                    .and_then(|p| detail_names.get(&p).copied());
                match detail_level {
                    Some(level) => {
                        let group = host.group(level);
                        host.add_to_group(group, id);
                    }
                    None => warn!("object '{name}' mesh {position} has no detail level; not grouped"),
                }

                host.link_to_scene(id);
                debug!("object {o} '{name}' mesh {mesh_index} -> {id:?}");

                objects.push(ImportedObject {
                    id,
                    name: name.to_string(),
                    node: object.node(),
                    mesh: mesh_index,
                    detail_level: detail_level.map(str::to_string),
                });
            }
        }

        Ok(ImportedScene {
            materials,
            nodes: tree,
            objects,
            node_order,
            skipped_meshes,
        })
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Dump `<path>.txt` and re-serialise the shape to `<path>.pass.dts`.
fn write_debug_files(path: &Path, shape: &ShapeAsset) {
    let report_path = with_suffix(path, ".txt");
    if let Err(err) = report::write_debug_report_file(&report_path, shape) {
        warn!("cannot write debug report {}: {err}", report_path.display());
    }

    let pass_path = with_suffix(path, ".pass.dts");
    let written = File::create(&pass_path)
        .map_err(ShapeError::from)
        .and_then(|mut file| JsonShapeCodec { pretty: true }.write_shape(shape, &mut file));
    if let Err(err) = written {
        warn!("cannot write pass-through shape {}: {err}", pass_path.display());
    }
}

/// Records every object created through it so a failed import can undo them.
struct Tracked<'h, H: SceneHost + ?Sized> {
    host: &'h mut H,
    created: Vec<ObjectId>,
    // Groups are never removed, only their members.
    groups: Vec<String>,
}

impl<'h, H: SceneHost + ?Sized> Tracked<'h, H> {
    fn new(host: &'h mut H) -> Self {
        Self {
            host,
            created: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Remove every created object, newest first. Returns the names of the
    /// groups touched along the way, which outlive the rollback.
    fn rollback(self) -> Vec<String> {
        for object in self.created.into_iter().rev() {
            self.host.remove_object(object);
        }
        self.groups
    }
}

impl<H: SceneHost + ?Sized> SceneHost for Tracked<'_, H> {
    fn create_empty(&mut self, name: &str) -> ObjectId {
        let id = self.host.create_empty(name);
        self.created.push(id);
        id
    }

    fn create_mesh_object(&mut self, name: &str, mesh: TriangleMesh) -> ObjectId {
        let id = self.host.create_mesh_object(name, mesh);
        self.created.push(id);
        id
    }

    fn set_parent(&mut self, child: ObjectId, parent: ObjectId) {
        self.host.set_parent(child, parent);
    }

    fn set_local_transform(&mut self, object: ObjectId, transform: Transform) {
        self.host.set_local_transform(object, transform);
    }

    fn set_hidden(&mut self, object: ObjectId, hidden: bool) {
        self.host.set_hidden(object, hidden);
    }

    fn link_to_scene(&mut self, object: ObjectId) {
        self.host.link_to_scene(object);
    }

    fn group(&mut self, name: &str) -> GroupId {
        if !self.groups.iter().any(|g| g == name) {
            self.groups.push(name.to_string());
        }
        self.host.group(name)
    }

    fn add_to_group(&mut self, group: GroupId, object: ObjectId) {
        self.host.add_to_group(group, object);
    }

    fn write_text(&mut self, name: &str, contents: &str) {
        self.host.write_text(name, contents);
    }

    fn remove_object(&mut self, object: ObjectId) {
        self.created.retain(|&id| id != object);
        self.host.remove_object(object);
    }
}
