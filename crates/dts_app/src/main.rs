mod cli;

use std::process::ExitCode;

use clap::Parser;
use dts_core::ObjectId;
use dts_import::{ImportConfig, NODE_ORDER_TEXT, ShapeImporter};
use dts_scene::{ObjectKind, SceneGraph};
use log::{error, info};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_filter))
        .init();

    let base = match &cli.config {
        Some(path) => match ImportConfig::from_path(path) {
            Ok(config) => config,
            Err(err) => {
                error!("{}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => ImportConfig::default(),
    };
    let config = cli.apply(base);
    info!("import settings: {config:?}");

    let mut importer = ShapeImporter::new(config);
    let mut scene = SceneGraph::default();
    let mut failed = 0;

    for file in &cli.files {
        match importer.load(file, &mut scene) {
            Ok(imported) => println!(
                "{}: {} nodes, {} mesh objects, {} materials",
                file.display(),
                imported.nodes.len(),
                imported.objects.len(),
                imported.materials.len()
            ),
            Err(err) => {
                error!("{}: {err}", file.display());
                failed += 1;
            }
        }
    }

    if cli.tree {
        for root in scene.roots() {
            print_tree(&scene, root, 0);
        }
        for group in scene.group_names() {
            let members = scene.group_members(group).map_or(0, <[_]>::len);
            println!("group {group}: {members} objects");
        }
        if let Some(order) = scene.text(NODE_ORDER_TEXT) {
            println!("{NODE_ORDER_TEXT}:\n{order}");
        }
    }

    if failed > 0 {
        error!("{failed} of {} shapes failed to import", cli.files.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_tree(scene: &SceneGraph, id: ObjectId, depth: usize) {
    let Some(object) = scene.object(id) else {
        return;
    };
    let kind = match &object.kind {
        ObjectKind::Empty => String::from("empty"),
        ObjectKind::Mesh(mesh) => format!("mesh, {} triangles", mesh.triangles.len()),
    };
    let hidden = if object.hidden { " hidden" } else { "" };
    println!("{:indent$}{} ({kind}){hidden}", "", object.name, indent = depth * 2);

    for &child in scene.children(id) {
        print_tree(scene, child, depth + 1);
    }
}
