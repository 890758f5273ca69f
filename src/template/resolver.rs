//! Template resolution - binds parameters and maps imports to generated modules

use std::collections::HashMap;

use super::registry::{ImportDecl, Instantiation, TemplateDef, TemplateError, TemplateRegistry};

/// Parameter bindings for one instantiation of a template
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    /// Parameter name -> bound argument
    pub parameters: HashMap<String, String>,
}

impl ResolutionContext {
    /// Bind each formal parameter of `def` to the argument at the same
    /// position in `inst`
    pub fn for_instantiation(def: &TemplateDef, inst: &Instantiation) -> Self {
        let parameters = def
            .params
            .iter()
            .cloned()
            .zip(inst.args.iter().cloned())
            .collect();
        Self { parameters }
    }

    /// Replace every argument that names a parameter with its binding
    pub fn expand_args(&self, args: &[String]) -> Vec<String> {
        expand_template_params(args, &self.parameters)
    }
}

/// Given template arguments that may reference parameters of the current
/// template, return the arguments with each parameter use replaced by its
/// bound argument. Matching is on whole entries only.
pub fn expand_template_params(args: &[String], bindings: &HashMap<String, String>) -> Vec<String> {
    args.iter()
        .map(|arg| bindings.get(arg).unwrap_or(arg).clone())
        .collect()
}

/// Find the output module of the instantiation of `module` declared with
/// exactly `args`.
pub fn find_instantiation<'r>(
    registry: &'r TemplateRegistry,
    module: &str,
    args: &[String],
) -> Result<&'r str, TemplateError> {
    let template = registry.get(module).ok_or_else(|| TemplateError::NotFound {
        name: module.to_string(),
    })?;
    let def = template
        .def
        .as_ref()
        .ok_or_else(|| TemplateError::NotInstantiable {
            name: module.to_string(),
        })?;

    def.find_instantiation(args)
        .map(|inst| inst.name.as_str())
        .ok_or_else(|| TemplateError::NoMatchingInstantiation {
            template: module.to_string(),
            args: args.to_vec(),
        })
}

/// Resolve an import of the template being instantiated to the concrete
/// module it should name.
///
/// An import without arguments of a module that is not a parameterized
/// template refers to that module directly.
pub fn resolve_import(
    registry: &TemplateRegistry,
    import: &ImportDecl,
    ctx: &ResolutionContext,
) -> Result<String, TemplateError> {
    let args = ctx.expand_args(&import.args);
    let plain = args.is_empty()
        && registry
            .get(&import.module)
            .map_or(true, |t| !t.is_instantiable());
    if plain {
        return Ok(import.module.clone());
    }

    find_instantiation(registry, &import.module, &args).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::registry::Template;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn import(module: &str, args: &[&str]) -> ImportDecl {
        ImportDecl {
            module: module.to_string(),
            args: strings(args),
            access: None,
        }
    }

    fn registry() -> TemplateRegistry {
        let mut registry = TemplateRegistry::new();
        let bar = TemplateDef {
            params: strings(&["A", "B"]),
            instantiations: vec![
                Instantiation {
                    name: "gen.BarXY".to_string(),
                    args: strings(&["X", "Y"]),
                },
                Instantiation {
                    name: "gen.BarYX".to_string(),
                    args: strings(&["Y", "X"]),
                },
            ],
            ..TemplateDef::default()
        };
        registry
            .register(Template::with_def("lib.Bar", "lib/Bar.qllt", bar))
            .unwrap();
        registry
            .register(Template::inert("lib.Plain", "lib/Plain.qllt"))
            .unwrap();
        registry
    }

    #[test]
    fn test_expand_template_params() {
        let bindings: HashMap<String, String> =
            [("T".to_string(), "lib.Baz".to_string())].into_iter().collect();
        let expanded = expand_template_params(&strings(&["T", "U", "T"]), &bindings);
        assert_eq!(expanded, strings(&["lib.Baz", "U", "lib.Baz"]));
    }

    #[test]
    fn test_expand_is_whole_entry_only() {
        let bindings: HashMap<String, String> =
            [("T".to_string(), "X".to_string())].into_iter().collect();
        let expanded = expand_template_params(&strings(&["TT", "T.Node", "t"]), &bindings);
        assert_eq!(expanded, strings(&["TT", "T.Node", "t"]));
    }

    #[test]
    fn test_context_binds_positionally() {
        let def = TemplateDef {
            params: strings(&["A", "B"]),
            ..TemplateDef::default()
        };
        let inst = Instantiation {
            name: "gen.Out".to_string(),
            args: strings(&["X", "Y"]),
        };
        let ctx = ResolutionContext::for_instantiation(&def, &inst);
        assert_eq!(ctx.parameters.get("A").map(String::as_str), Some("X"));
        assert_eq!(ctx.parameters.get("B").map(String::as_str), Some("Y"));
        assert_eq!(ctx.parameters.len(), 2);
    }

    #[test]
    fn test_find_instantiation_order_sensitive() {
        let registry = registry();
        assert_eq!(
            find_instantiation(&registry, "lib.Bar", &strings(&["Y", "X"])).unwrap(),
            "gen.BarYX"
        );
        assert!(matches!(
            find_instantiation(&registry, "lib.Bar", &strings(&["X", "X"])),
            Err(TemplateError::NoMatchingInstantiation { .. })
        ));
    }

    #[test]
    fn test_resolve_import_substitutes_parameters() {
        let registry = registry();
        let mut ctx = ResolutionContext::default();
        ctx.parameters.insert("P".to_string(), "Y".to_string());
        ctx.parameters.insert("Q".to_string(), "X".to_string());

        let resolved = resolve_import(&registry, &import("lib.Bar", &["P", "Q"]), &ctx).unwrap();
        assert_eq!(resolved, "gen.BarYX");
    }

    #[test]
    fn test_resolve_plain_imports() {
        let registry = registry();
        let ctx = ResolutionContext::default();
        assert_eq!(
            resolve_import(&registry, &import("lib.Plain", &[]), &ctx).unwrap(),
            "lib.Plain"
        );
        assert_eq!(
            resolve_import(&registry, &import("external.Module", &[]), &ctx).unwrap(),
            "external.Module"
        );
    }

    #[test]
    fn test_resolve_import_errors() {
        let registry = registry();
        let ctx = ResolutionContext::default();
        assert!(matches!(
            resolve_import(&registry, &import("lib.Missing", &["X"]), &ctx),
            Err(TemplateError::NotFound { .. })
        ));
        assert!(matches!(
            resolve_import(&registry, &import("lib.Plain", &["X"]), &ctx),
            Err(TemplateError::NotInstantiable { .. })
        ));
        assert!(matches!(
            resolve_import(&registry, &import("lib.Bar", &[]), &ctx),
            Err(TemplateError::NoMatchingInstantiation { .. })
        ));
    }
}
