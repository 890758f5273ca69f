//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// `Foo<T>` imports `Bar<T>` and a plain module
pub const FOO: &str = r#"/*template
{
  "params": ["T"],
  "imports": [
    { "access": "private", "module": "lib.Bar", "args": ["T"] },
    { "module": "lib.Common", "args": [] }
  ],
  "instantiations": [
    { "name": "gen.FooBaz", "args": ["lib.Baz"] }
  ]
}
*/

/** A node wrapper over `T`. */
class Foo extends T::Node {
  Foo() { Bar::step(this) }
}
"#;

/// `Bar<U>` imports `Qux<U>`
pub const BAR: &str = r#"/*template
{
  "params": ["U"],
  "imports": [{ "module": "lib.Qux", "args": ["U"] }],
  "instantiations": [{ "name": "gen.BarBaz", "args": ["lib.Baz"] }]
}
*/
module Bar {}
"#;

/// `Qux<V>` has no imports
pub const QUX: &str = r#"/*template
{
  "params": ["V"],
  "imports": [],
  "instantiations": [{ "name": "gen.QuxBaz", "args": ["lib.Baz"] }]
}
*/
module Qux {}
"#;

/// A template file without metadata
pub const COMMON: &str = "module Common {}\n";

/// Write `files` (relative path, contents) under `root`
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}

/// A temporary library with the Foo -> Bar -> Qux chain
pub fn chained_library() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_tree(
        dir.path(),
        &[
            ("lib/Foo.qllt", FOO),
            ("lib/Bar.qllt", BAR),
            ("lib/Qux.qllt", QUX),
            ("lib/Common.qllt", COMMON),
        ],
    );
    dir
}
