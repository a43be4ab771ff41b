use std::fs;
use std::path::{Path, PathBuf};

use mocap_browser::browse::MocapFolder;
use mocap_browser::BvhLoader;

/// Scratch folder removed on drop.
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("mocap_browser_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        ScratchDir(dir)
    }

    fn touch(&self, relative: &str) {
        let path = self.0.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "HIERARCHY\n").unwrap();
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn relative<'a>(folder: &MocapFolder, paths: impl IntoIterator<Item = &'a Path>) -> Vec<String> {
    paths
        .into_iter()
        .map(|path| {
            path.strip_prefix(folder.root())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn populated(name: &str) -> ScratchDir {
    let dir = ScratchDir::new(name);
    dir.touch("walk.bvh");
    dir.touch("notes.txt");
    dir.touch("cmu/02/02_01.bvh");
    dir.touch("cmu/01/01_Run.BVH");
    dir.touch("cmu/01/preview.png");
    dir.touch("empty/deeper/README");
    dir
}

#[test]
fn scan_keeps_recognized_files_sorted() {
    let dir = populated("scan");
    let folder = MocapFolder::scan(&dir.0, &BvhLoader).unwrap();
    assert_eq!(folder.root(), dir.0.as_path());
    assert_eq!(
        relative(&folder, folder.files().iter().map(PathBuf::as_path)),
        vec!["cmu/01/01_Run.BVH", "cmu/02/02_01.bvh", "walk.bvh"]
    );
}

#[test]
fn filter_ignores_case_and_matches_folders() {
    let dir = populated("filter");
    let folder = MocapFolder::scan(&dir.0, &BvhLoader).unwrap();

    assert_eq!(relative(&folder, folder.filter("run")), vec!["cmu/01/01_Run.BVH"]);
    assert_eq!(relative(&folder, folder.filter("CMU/02")), vec!["cmu/02/02_01.bvh"]);
    assert_eq!(folder.filter("").len(), 3);
    assert!(folder.filter("jump").is_empty());
}

#[test]
fn missing_root_is_an_error() {
    let dir = ScratchDir::new("missing");
    let missing = dir.0.join("nope");
    assert!(MocapFolder::scan(missing, &BvhLoader).is_err());
}

#[test]
fn empty_root_has_no_files() {
    let dir = ScratchDir::new("empty");
    let folder = MocapFolder::scan(&dir.0, &BvhLoader).unwrap();
    assert!(folder.files().is_empty());
}

#[cfg(unix)]
#[test]
fn link_cycles_are_listed_once() {
    let dir = ScratchDir::new("cycle");
    dir.touch("a/x.bvh");
    std::os::unix::fs::symlink(&dir.0, dir.0.join("a/loop")).unwrap();

    let folder = MocapFolder::scan(&dir.0, &BvhLoader).unwrap();
    assert_eq!(relative(&folder, folder.files().iter().map(PathBuf::as_path)), vec!["a/x.bvh"]);
}

#[cfg(unix)]
#[test]
fn linked_folders_are_followed() {
    let dir = ScratchDir::new("linked");
    let outside = ScratchDir::new("linked_target");
    outside.touch("take.bvh");
    std::os::unix::fs::symlink(&outside.0, dir.0.join("shared")).unwrap();

    let folder = MocapFolder::scan(&dir.0, &BvhLoader).unwrap();
    assert_eq!(relative(&folder, folder.files().iter().map(PathBuf::as_path)), vec!["shared/take.bvh"]);
}
