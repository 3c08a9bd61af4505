use std::{
    fs,
    path::{Path, PathBuf},
};

use dts_core::TextureData;

/// Extensions tried for a material's texture, in order of precedence.
pub const TEXTURE_EXTENSIONS: [&str; 2] = ["png", "jpg"];

/// The slice of the filesystem the texture search looks at.
pub trait FileSystem {
    fn is_file(&self, path: &Path) -> bool;

    /// True when `path` is the root of a mounted filesystem.
    fn is_mount(&self, path: &Path) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    #[cfg(unix)]
    fn is_mount(&self, path: &Path) -> bool {
        use std::os::unix::fs::MetadataExt;

        let path = if path.as_os_str().is_empty() {
            Path::new(".")
        } else {
            path
        };
        let Ok(meta) = fs::symlink_metadata(path) else {
            return false;
        };
        if meta.file_type().is_symlink() {
            return false;
        }
        let Ok(parent) = fs::metadata(path.join("..")) else {
            return false;
        };
        meta.dev() != parent.dev() || meta.ino() == parent.ino()
    }

    #[cfg(not(unix))]
    fn is_mount(&self, path: &Path) -> bool {
        path.has_root() && path.parent().is_none()
    }
}

/// Search for `<name>.<ext>` next to the shape, then in each ancestor directory.
///
/// The walk stops at the first directory holding a match, at a mount point,
/// or when there is no parent left to visit.
pub fn find_texture<F: FileSystem + ?Sized>(
    fs: &F,
    shape_path: &Path,
    name: &str,
) -> Option<PathBuf> {
    let mut dir = shape_path.parent().unwrap_or(Path::new(""));

    loop {
        for extension in TEXTURE_EXTENSIONS {
            let candidate = dir.join(format!("{name}.{extension}"));
            if fs.is_file(&candidate) {
                return Some(candidate);
            }
        }

        if fs.is_mount(dir) {
            return None;
        }

        match dir.parent() {
            Some(parent) if parent != dir => dir = parent,
            _ => return None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("cannot load image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Loads texture files found by [`find_texture`].
pub trait TextureStore {
    fn load(&mut self, path: &Path) -> Result<TextureData, TextureError>;
}

/// Decodes textures from disk with the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageTextureStore;

impl TextureStore for ImageTextureStore {
    fn load(&mut self, path: &Path) -> Result<TextureData, TextureError> {
        let img = image::open(path)
            .map_err(|source| TextureError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let width = img.width();
        let height = img.height();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(TextureData {
            name,
            path: path.to_path_buf(),
            pixels: img.into_raw(),
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, collections::HashSet};

    use super::*;

    #[derive(Default)]
    struct FakeFs {
        files: HashSet<PathBuf>,
        mounts: HashSet<PathBuf>,
        lookups: Cell<usize>,
    }

    impl FileSystem for FakeFs {
        fn is_file(&self, path: &Path) -> bool {
            self.lookups.set(self.lookups.get() + 1);
            self.files.contains(path)
        }

        fn is_mount(&self, path: &Path) -> bool {
            self.mounts.contains(path)
        }
    }

    #[test]
    fn texture_next_to_shape_wins() {
        let mut fs = FakeFs::default();
        fs.files.insert(PathBuf::from("/game/shapes/red.png"));
        fs.files.insert(PathBuf::from("/game/red.png"));

        let found = find_texture(&fs, Path::new("/game/shapes/player.dts"), "red");
        assert_eq!(found, Some(PathBuf::from("/game/shapes/red.png")));
        assert_eq!(fs.lookups.get(), 1);
    }

    #[test]
    fn png_takes_precedence_over_jpg() {
        let mut fs = FakeFs::default();
        fs.files.insert(PathBuf::from("/a/skin.jpg"));
        fs.files.insert(PathBuf::from("/a/skin.png"));

        let found = find_texture(&fs, Path::new("/a/b.dts"), "skin");
        assert_eq!(found, Some(PathBuf::from("/a/skin.png")));
    }

    #[test]
    fn search_walks_up_to_ancestors() {
        let mut fs = FakeFs::default();
        fs.files.insert(PathBuf::from("/game/skin.jpg"));

        let found = find_texture(&fs, Path::new("/game/data/shapes/player.dts"), "skin");
        assert_eq!(found, Some(PathBuf::from("/game/skin.jpg")));
    }

    #[test]
    fn search_stops_at_mount_point() {
        let mut fs = FakeFs::default();
        fs.files.insert(PathBuf::from("/skin.png"));
        fs.mounts.insert(PathBuf::from("/mnt/usb"));

        let found = find_texture(&fs, Path::new("/mnt/usb/shapes/a.dts"), "skin");
        assert_eq!(found, None);
        // shapes/, then usb/ (a mount) and no further
        assert_eq!(fs.lookups.get(), 4);
    }

    #[test]
    fn search_ends_at_root_and_relative_paths() {
        let fs = FakeFs::default();
        assert_eq!(find_texture(&fs, Path::new("/a/b.dts"), "x"), None);
        assert_eq!(fs.lookups.get(), 4);

        let fs = FakeFs::default();
        assert_eq!(find_texture(&fs, Path::new("b.dts"), "x"), None);
        assert_eq!(fs.lookups.get(), 2);
    }

    #[test]
    fn real_directory_tree_is_searched() {
        let root = tempfile::tempdir().unwrap();
        let shapes = root.path().join("data").join("shapes");
        fs::create_dir_all(&shapes).unwrap();
        fs::write(root.path().join("data").join("base.png"), b"not really").unwrap();

        let found = find_texture(&OsFileSystem, &shapes.join("player.dts"), "base");
        assert_eq!(found, Some(root.path().join("data").join("base.png")));
    }

    #[test]
    fn image_store_decodes_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.png");
        image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let tex = ImageTextureStore.load(&path).unwrap();
        assert_eq!((tex.width, tex.height), (2, 3));
        assert_eq!(tex.name, "checker");
        assert_eq!(tex.pixels.len(), 2 * 3 * 4);
        assert_eq!(&tex.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn image_store_reports_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let err = ImageTextureStore.load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.png"));
    }
}
