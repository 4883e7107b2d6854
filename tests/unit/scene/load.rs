use std::io::Cursor;

use super::*;

const SCENE: &str = r#"{
  "version": ["1", "0", "0"],
  "views": [
    {
      "viewId": "20",
      "poseId": "20",
      "intrinsicId": "7",
      "path": "imgs/b.jpg",
      "width": "640",
      "height": "480",
      "metadata": { "Orientation": "6", "Make": "Acme" }
    },
    {
      "viewId": 10,
      "poseId": 10,
      "intrinsicId": 7,
      "path": "/abs/a.jpg",
      "width": 640,
      "height": 480
    },
    {
      "viewId": "30",
      "poseId": "4294967295",
      "intrinsicId": "7",
      "path": "c.jpg",
      "width": "640",
      "height": "480"
    }
  ],
  "intrinsics": [
    {
      "intrinsicId": "7",
      "type": "radial3",
      "width": "640",
      "height": "480",
      "pxFocalLength": "500",
      "principalPoint": ["320", "240"],
      "distortionParams": ["0.01", "0", "0"]
    }
  ],
  "poses": [
    {
      "poseId": "10",
      "pose": { "transform": {
        "rotation": ["1", "0", "0", "0", "1", "0", "0", "0", "1"],
        "center": ["0", "0", "0"]
      } }
    },
    {
      "poseId": "20",
      "pose": { "transform": {
        "rotation": ["0", "0", "1", "-1", "0", "0", "0", "-1", "0"],
        "center": ["0", "0", "0"]
      } }
    }
  ]
}"#;

fn load(json: &str) -> PanoResult<Scene> {
    Scene::from_reader(Cursor::new(json), Path::new("/data/scene"))
}

#[test]
fn parses_string_encoded_numbers_and_sorts_views() {
    let scene = load(SCENE).unwrap();
    let ids: Vec<u32> = scene.views().iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![10, 20, 30]);

    let valid: Vec<u32> = scene.valid_views().iter().map(|v| v.view.id).collect();
    assert_eq!(valid, vec![10, 20]);
}

#[test]
fn undefined_pose_makes_view_invalid() {
    let scene = load(SCENE).unwrap();
    let v30 = &scene.views()[2];
    assert!(v30.pose.is_none());
    assert!(v30.intrinsic.is_some());
    assert!(!v30.is_valid());
}

#[test]
fn resolves_paths_and_orientation() {
    let scene = load(SCENE).unwrap();
    assert_eq!(scene.views()[0].image_path, PathBuf::from("/abs/a.jpg"));
    assert_eq!(
        scene.views()[1].image_path,
        PathBuf::from("/data/scene/imgs/b.jpg")
    );
    assert_eq!(scene.views()[0].orientation, ExifOrientation::Normal);
    assert_eq!(scene.views()[1].orientation, ExifOrientation::Right);
}

#[test]
fn rotation_is_read_column_major() {
    let scene = load(SCENE).unwrap();
    let pose = scene.views()[1].pose.unwrap();
    // Rows (0,-1,0), (0,0,-1), (1,0,0): camera +Z is world +X.
    let p = pose.transform(&Point3::new(1.0, 0.0, 0.0));
    assert!((p - nalgebra::Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
}

#[test]
fn rejects_malformed_json() {
    assert!(matches!(load("{ \"views\": ["), Err(PanoError::SceneLoad(_))));
    assert!(matches!(
        load(r#"{ "views": [ { "viewId": "x1", "path": "a", "width": 1, "height": 1 } ] }"#),
        Err(PanoError::SceneLoad(_))
    ));
}

#[test]
fn rejects_non_orthonormal_rotation() {
    let bad = SCENE.replace(
        r#""rotation": ["1", "0", "0", "0", "1", "0", "0", "0", "1"]"#,
        r#""rotation": ["2", "0", "0", "0", "1", "0", "0", "0", "1"]"#,
    );
    assert!(matches!(load(&bad), Err(PanoError::SceneLoad(_))));
}

#[test]
fn rejects_duplicate_ids() {
    let dup = SCENE.replace(r#""viewId": "20""#, r#""viewId": "10""#);
    assert!(load(&dup).is_err());
}

#[test]
fn rejects_wrong_distortion_count() {
    let bad = SCENE.replace(r#""distortionParams": ["0.01", "0", "0"]"#, r#""distortionParams": []"#);
    assert!(load(&bad).is_err());
}

#[test]
fn empty_scene_has_no_valid_views() {
    let scene = load("{}").unwrap();
    assert!(scene.views().is_empty());
    assert!(scene.valid_views().is_empty());
}

#[test]
fn missing_scene_file_is_a_load_error() {
    let err = Scene::from_path("/definitely/not/here/scene.json").unwrap_err();
    assert!(matches!(err, PanoError::SceneLoad(_)));
}
