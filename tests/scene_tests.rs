mod common;

use std::path::Path;
use std::sync::atomic::Ordering;

use common::{MockLoader, MockScene};
use mocap_browser::{LoadError, LoadState, SceneGraph, SceneHandle};

#[test]
fn hierarchy_excludes_the_root() {
    let loader = MockLoader::new().with_scene("abc.anim", MockScene::new("A", &[("B", "A"), ("C", "B")], Some((0, 10))));
    let scene = SceneHandle::load("abc.anim", &loader).unwrap();

    let hierarchy = scene.hierarchy();
    assert_eq!(hierarchy.len(), 2);
    assert_eq!(hierarchy.get("B").map(String::as_str), Some("A"));
    assert_eq!(hierarchy.get("C").map(String::as_str), Some("B"));
    assert!(!hierarchy.contains_key("A"));
}

#[test]
fn hierarchy_and_nodes_are_preorder() {
    let loader = MockLoader::new().with_scene("h.anim", MockScene::humanoid(None));
    let scene = SceneHandle::load("h.anim", &loader).unwrap();

    let hierarchy = scene.hierarchy();
    let keys: Vec<&str> = hierarchy.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Hips", "Spine", "Neck", "Head", "LeftLeg", "RightLeg"]);

    let graph = scene.graph().unwrap();
    let names: Vec<&str> = scene.all_nodes().into_iter().map(|node| graph.name(node)).collect();
    assert_eq!(names, vec!["Root", "Hips", "Spine", "Neck", "Head", "LeftLeg", "RightLeg"]);
    // recomputed, not consumed
    assert_eq!(scene.all_nodes().len(), 7);
}

#[test]
fn primary_stack_is_the_first_one() {
    let loader = MockLoader::new().with_scene("walk.anim", MockScene::humanoid(Some((5, 42))));
    let scene = SceneHandle::load("walk.anim", &loader).unwrap();
    assert_eq!(scene.start_frame(), 5);
    assert_eq!(scene.end_frame(), 42);
    assert_eq!(scene.animation_stack_name(), Some("Take 001"));
}

#[test]
fn no_stack_means_static_frame_zero() {
    let loader = MockLoader::new().with_scene("pose.anim", MockScene::humanoid(None));
    let scene = SceneHandle::load("pose.anim", &loader).unwrap();
    assert_eq!((scene.start_frame(), scene.end_frame()), (0, 0));
    assert_eq!(scene.animation_stack_name(), None);
}

#[test]
fn load_errors_are_typed() {
    let loader = MockLoader::new().with_broken("bad.anim");
    assert!(matches!(
        SceneHandle::load("missing.anim", &loader),
        Err(LoadError::NotFound { .. })
    ));
    assert!(matches!(
        SceneHandle::load("bad.anim", &loader),
        Err(LoadError::ParseFailure { .. })
    ));
}

#[test]
fn unload_is_idempotent() {
    let mock = MockScene::humanoid(Some((0, 3)));
    let closed = mock.close_counter();
    let loader = MockLoader::new().with_scene("h.anim", mock);
    let mut scene = SceneHandle::load("h.anim", &loader).unwrap();
    assert_eq!(scene.load_state(), LoadState::Loaded);
    assert_eq!(scene.path(), Path::new("h.anim"));

    scene.unload();
    scene.unload();
    assert_eq!(scene.load_state(), LoadState::Unloaded);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    assert!(scene.hierarchy().is_empty());
    assert!(scene.all_nodes().is_empty());

    drop(scene);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[test]
fn dropping_a_loaded_scene_closes_it() {
    let mock = MockScene::humanoid(None);
    let closed = mock.close_counter();
    let loader = MockLoader::new().with_scene("h.anim", mock);
    drop(SceneHandle::load("h.anim", &loader).unwrap());
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[test]
fn hiding_is_a_set() {
    let loader = MockLoader::new().with_scene("h.anim", MockScene::humanoid(None));
    let mut scene = SceneHandle::load("h.anim", &loader).unwrap();
    scene.hide_node("Neck");
    scene.hide_node("Neck");
    assert_eq!(scene.hidden_nodes().len(), 1);
    assert!(scene.is_hidden("Neck"));
    scene.show_node("Spine");
    scene.show_node("Neck");
    assert!(scene.hidden_nodes().is_empty());
}
