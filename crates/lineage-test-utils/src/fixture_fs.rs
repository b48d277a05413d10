use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::ClassWriter;

/// Writes each class to `<root>/<internal name>.class` inside a fresh temporary directory.
pub fn write_class_dir(classes: &[ClassWriter]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for class in classes {
        let path = dir
            .path()
            .join(format!("{}.class", class.internal_name()));
        write_file(&path, &class.build());
    }
    dir
}

fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create class dir");
    }
    fs::write(path, bytes).expect("write classfile");
}
