mod common;

use std::fs;

use classremap::common::Config;
use classremap::{transform_directory, transform_path};

use common::{class_file, table, utf8_payloads, Const};

#[test]
fn directory_tree_is_mirrored() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");

    fs::create_dir_all(input.join("com/example")).unwrap();
    let hit = class_file(&[Const::Utf8("javax/ejb/Stateless")], &[]);
    let miss = class_file(&[Const::Utf8("com/example/Util")], &[]);
    fs::write(input.join("com/example/Bean.class"), &hit).unwrap();
    fs::write(input.join("com/example/Util.class"), &miss).unwrap();
    fs::write(input.join("readme.txt"), b"javax/ejb stays put here").unwrap();

    let mapping = table(&[("javax/ejb", "jakarta/ejb")]);
    let summary = transform_directory(&input, &output, &mapping, false).unwrap();
    assert_eq!(summary.files, 3);
    assert_eq!(summary.classes, 2);
    assert_eq!(summary.rewritten, 1);

    let bean = fs::read(output.join("com/example/Bean.class")).unwrap();
    assert_eq!(utf8_payloads(&bean), vec![b"jakarta/ejb/Stateless".to_vec()]);
    assert_eq!(
        fs::read(output.join("com/example/Util.class")).unwrap(),
        miss
    );
    assert_eq!(
        fs::read(output.join("readme.txt")).unwrap(),
        b"javax/ejb stays put here"
    );
}

#[test]
fn transform_path_dispatches_on_class_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Servlet.class");
    let output = dir.path().join("Servlet.out.class");
    let class = class_file(&[Const::Utf8("javax/servlet/http/Cookie")], &[]);
    fs::write(&input, &class).unwrap();

    transform_path(&input, &output, &Config::default()).unwrap();

    let out = fs::read(&output).unwrap();
    assert_eq!(
        utf8_payloads(&out),
        vec![b"jakarta/servlet/http/Cookie".to_vec()]
    );
}

#[test]
fn transform_path_rejects_unknown_input_kind() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, b"hello").unwrap();

    let result = transform_path(&input, &dir.path().join("notes.out.txt"), &Config::default());
    assert!(result.is_err());
}

#[test]
fn mapping_file_override_is_honored() {
    let dir = tempfile::tempdir().unwrap();
    let mapping_file = dir.path().join("custom.mapping");
    fs::write(&mapping_file, "com/old=com/new\n").unwrap();

    let input = dir.path().join("A.class");
    let output = dir.path().join("A.out.class");
    let class = class_file(&[Const::Utf8("com/old/Thing")], &[]);
    fs::write(&input, &class).unwrap();

    let config = Config::new().with_mapping_file(&mapping_file);
    transform_path(&input, &output, &config).unwrap();

    let out = fs::read(&output).unwrap();
    assert_eq!(utf8_payloads(&out), vec![b"com/new/Thing".to_vec()]);
}
