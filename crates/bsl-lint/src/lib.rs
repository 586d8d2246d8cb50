//! Linter driver: walk a source tree, analyze every module, merge the
//! report.
//!
//! Modules are analyzed independently: each worker owns its parser, visitor
//! and plugin instances, so the fan-out over a `rayon` pool shares nothing
//! mutable. A module that fails to scan or parse is logged and skipped; the
//! JSON report only ever contains plugin findings.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use walkdir::WalkDir;

use bsl_analyzer::plugins::default_checks;
use bsl_analyzer::{Plugin, Visitor};
use bsl_context::ModuleKind;
use bsl_parser::Parser;
use bsl_report::Issue;

/// Analysis switches shared by every module of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Report parameters nobody touches at all (the unused-variable check's
    /// strict mode)
    pub strict_params: bool,
}

/// Outcome of one full run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Merged issues of all modules
    pub issues: Vec<Issue>,
    /// Modules analyzed successfully
    pub modules: usize,
    /// Modules skipped because of scan/parse failures
    pub failures: usize,
}

/// Finds every `.bsl` module under `root`, case-insensitively.
pub fn find_modules(root: &Path) -> Vec<PathBuf> {
    let mut modules: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("bsl"))
        })
        .map(|entry| entry.into_path())
        .collect();
    modules.sort();
    modules
}

/// Infers the module kind from its position in the configuration dump.
///
/// The metadata tree itself is not consulted; the standard dump layout is
/// enough to pick the right global context.
pub fn module_kind_for_path(path: &Path) -> ModuleKind {
    let components: Vec<&str> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    let file = components.last().copied().unwrap_or("");
    let under = |dir: &str| components.iter().any(|part| part.eq_ignore_ascii_case(dir));

    if under("CommonModules") {
        ModuleKind::CommonModule
    } else if under("Forms") {
        ModuleKind::ClientApplicationForm
    } else if file.eq_ignore_ascii_case("ManagerModule.bsl") {
        ModuleKind::DocumentManager
    } else if file.eq_ignore_ascii_case("ObjectModule.bsl") {
        ModuleKind::DocumentObject
    } else {
        ModuleKind::Unknown
    }
}

/// Strips the UTF-8 byte-order mark, if present.
pub fn strip_bom(src: &str) -> &str {
    src.strip_prefix('\u{feff}').unwrap_or(src)
}

/// Parses and analyzes one module, returning its issues. `None` means the
/// module failed to parse; the failure has been logged.
pub fn analyze_module(path: &Path, src: &str, options: Options) -> Option<Vec<Issue>> {
    let src: Arc<str> = Arc::from(strip_bom(src));
    let kind = module_kind_for_path(path);

    let parsed = match Parser::new(&src, kind).parse() {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::error!(path = %path.display(), %error, "module failed to parse");
            return None;
        }
    };
    for diagnostic in &parsed.diagnostics {
        tracing::warn!(
            path = %path.display(),
            line = diagnostic.line,
            "{}",
            diagnostic.text
        );
    }

    let path_text = path.display().to_string();
    let mut checks = default_checks(&path_text, &src, options.strict_params);
    let plugins: Vec<&mut dyn Plugin> =
        checks.iter_mut().map(|check| &mut **check as &mut dyn Plugin).collect();
    let mut visitor = Visitor::new(plugins);
    visitor.walk(&parsed.module);
    drop(visitor);

    Some(checks.iter_mut().flat_map(|check| check.close()).collect())
}

/// Runs the linter over every module under `root`.
pub fn run(root: &Path, options: Options) -> RunSummary {
    let modules = find_modules(root);

    let results: Vec<Option<Vec<Issue>>> = modules
        .par_iter()
        .map(|path| {
            let src = match std::fs::read_to_string(path) {
                Ok(src) => src,
                Err(error) => {
                    tracing::error!(path = %path.display(), %error, "module is unreadable");
                    return None;
                }
            };
            analyze_module(path, &src, options)
        })
        .collect();

    let mut summary = RunSummary::default();
    for result in results {
        match result {
            Some(issues) => {
                summary.modules += 1;
                summary.issues.extend(issues);
            }
            None => summary.failures += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kind_inference_follows_the_dump_layout() {
        let kind = module_kind_for_path(Path::new("src/CommonModules/Ядро/Ext/Module.bsl"));
        assert_eq!(kind, ModuleKind::CommonModule);

        let kind = module_kind_for_path(Path::new(
            "src/Documents/Заказ/Forms/ФормаДокумента/Ext/Form/Module.bsl",
        ));
        assert_eq!(kind, ModuleKind::ClientApplicationForm);

        let kind =
            module_kind_for_path(Path::new("src/Documents/Заказ/Ext/ObjectModule.bsl"));
        assert_eq!(kind, ModuleKind::DocumentObject);

        let kind =
            module_kind_for_path(Path::new("src/Documents/Заказ/Ext/ManagerModule.bsl"));
        assert_eq!(kind, ModuleKind::DocumentManager);

        let kind = module_kind_for_path(Path::new("scratch/test.bsl"));
        assert_eq!(kind, ModuleKind::Unknown);
    }

    #[test]
    fn bom_is_stripped() {
        assert_eq!(strip_bom("\u{feff}Перем А;"), "Перем А;");
        assert_eq!(strip_bom("Перем А;"), "Перем А;");
    }

    #[test]
    fn analyze_module_reports_issues() {
        let src = "Function Test() Export\n  Return 1;\nEndFunction // test()";
        let issues =
            analyze_module(Path::new("Module.bsl"), src, Options::default()).expect("parses");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn parse_failures_yield_none() {
        let src = "Если Истина Тогда"; // unterminated
        assert!(analyze_module(Path::new("Module.bsl"), src, Options::default()).is_none());
    }
}
