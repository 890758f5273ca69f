//! Template system for parameterized library modules
//!
//! A template is a library file with a `/*template ... */` block describing
//! its parameters, the templated modules it imports and the instantiations to
//! generate. This module finds template files, parses them into a
//! [`TemplateRegistry`], and resolves imports against declared instantiations.
//!
//! # Example
//!
//! ```text
//! /*template
//! {
//!   "params": ["T"],
//!   "imports": [{ "module": "lib.Bar", "args": ["T"] }],
//!   "instantiations": [{ "name": "gen.FooBaz", "args": ["lib.Baz"] }]
//! }
//! */
//! class Foo extends T::Node { }
//! ```

mod discovery;
mod parser;
mod registry;
mod resolver;

pub use discovery::{discover, module_name_from_path, module_path, TemplateFile};
pub use parser::parse_template;
pub use registry::{
    ImportDecl, Instantiation, Template, TemplateDef, TemplateError, TemplateRegistry,
};
pub use resolver::{expand_template_params, find_instantiation, resolve_import, ResolutionContext};
