use std::path::PathBuf;

use clap::ValueHint;
use dts_import::{ImportConfig, NodeMode};

#[derive(Debug, Copy, Clone, Eq, PartialEq, clap::ValueEnum)]
pub enum NodeModeArg {
    Empty,
    Armature,
    Bone,
}

impl From<NodeModeArg> for NodeMode {
    fn from(arg: NodeModeArg) -> Self {
        match arg {
            NodeModeArg::Empty => NodeMode::Empty,
            NodeModeArg::Armature => NodeMode::Armature,
            NodeModeArg::Bone => NodeMode::Bone,
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about = "Import DTS shapes into an in-memory scene")]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(short, long, default_value = "info", env = "DTS_IMPORT_LOG")]
    pub log_filter: String,
    /// JSON import settings; flags below override it
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// How the node hierarchy is represented
    #[arg(long, value_enum)]
    pub node_mode: Option<NodeModeArg>,
    /// Hide every mesh object that is not part of the default player body
    #[arg(long)]
    pub hide_default_player: bool,
    /// Write `<file>.txt` and `<file>.pass.dts` next to each input
    #[arg(long)]
    pub debug_report: bool,
    /// Print the resulting scene tree
    #[arg(short, long)]
    pub tree: bool,
    /// Shapes to import
    #[arg(num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Layer the command-line switches over a base configuration.
    pub fn apply(&self, mut config: ImportConfig) -> ImportConfig {
        if let Some(mode) = self.node_mode {
            config.node_mode = mode.into();
        }
        config.hide_default_player |= self.hide_default_player;
        config.debug_report |= self.debug_report;
        config
    }
}
